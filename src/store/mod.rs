/// Application state for reports and volunteers.
///
/// Submodules:
/// - `reports`    : synced/pending report collections, submit and sync.
/// - `volunteers` : backend-mirrored volunteer list, register and load.

pub mod reports;
pub mod volunteers;

pub use reports::{ReportEntry, ReportStore, SubmitOutcome, SyncOutcome};
pub use volunteers::{LoadSummary, Registration, VolunteerStore};
