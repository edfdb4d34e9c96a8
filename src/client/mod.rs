/// Clients for the external services the map depends on.
///
/// Submodules:
/// - `nominatim` : place-name lookup against an OpenStreetMap Nominatim server.
/// - `backend`   : the reporting API that persists reports and volunteers.
///
/// Both sit behind traits so the stores can be driven by in-memory fakes.

pub mod backend;
pub mod nominatim;

use crate::model::{BackendError, Coordinates, GeocodeError};

pub use backend::{HttpBackend, ReportRecord, VolunteerRecord};
pub use nominatim::NominatimGeocoder;

/// Free-text location to best-match coordinates.
pub trait Geocoder {
    /// Returns the single best match for `query`.
    ///
    /// Zero results is `GeocodeError::NotFound`; anything that prevents
    /// asking is `GeocodeError::Transport`.
    fn locate(&self, query: &str) -> Result<Coordinates, GeocodeError>;
}

/// The reporting backend. Its schema is consumed as given.
pub trait ReportBackend {
    /// `GET /api/reports`
    fn fetch_reports(&self) -> Result<Vec<ReportRecord>, BackendError>;

    /// `GET /api/volunteers`
    fn fetch_volunteers(&self) -> Result<Vec<VolunteerRecord>, BackendError>;

    /// `POST /api/volunteer` with `{name, location}`; returns the created record.
    fn register_volunteer(&self, name: &str, location: &str) -> Result<VolunteerRecord, BackendError>;
}
