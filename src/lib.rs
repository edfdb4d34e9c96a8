//! Crowd-reporting crisis map.
//!
//! Users submit disaster reports and register as volunteers; both are
//! geocoded and plotted on a map. In crisis mode new reports are queued
//! locally and flushed into the synced collection on demand.

pub mod app;
pub mod client;
pub mod config;
pub mod crisis;
pub mod logging;
pub mod map;
pub mod model;
pub mod notify;
pub mod render;
pub mod store;

pub use app::CrisisMap;
pub use config::Config;
pub use model::{
    BackendError, Coordinates, CrisisMapError, GeocodeError, HazardType, Report, ReportDraft, ReportId, Severity,
    Volunteer, VolunteerId,
};
