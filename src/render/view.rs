/// View models derived from store state.
///
/// Pure functions: no display surface is touched here, so everything the
/// lists show can be checked in unit tests. `render::html` commits these rows
/// to markup.

use crate::map::{MapWidget, MarkerKey, MarkerRegistry};
use crate::model::{Coordinates, ReportId, VolunteerId};
use crate::store::{ReportStore, VolunteerStore};

/// File extensions treated as video; everything else is shown as an image.
pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".mov", ".ogg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    Video(String),
    Image(String),
}

impl Media {
    pub fn classify(reference: &str) -> Self {
        // Object URLs may carry a query string or fragment after the path.
        let path = reference
            .split(['?', '#'])
            .next()
            .unwrap_or(reference)
            .to_ascii_lowercase();
        if VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            Media::Video(reference.to_string())
        } else {
            Media::Image(reference.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub id: ReportId,
    pub hazard: String,
    pub severity: String,
    /// CSS class such as `severity-high`; absent for a blank severity.
    pub severity_class: Option<String>,
    /// True exactly when the report is still in the pending queue.
    pub offline: bool,
    pub reporter: String,
    pub location: String,
    pub details: String,
    pub media: Option<Media>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerRow {
    pub id: VolunteerId,
    pub label: String,
    /// Whether clicking the row can focus a marker.
    pub on_map: bool,
}

pub fn severity_class(label: &str) -> Option<String> {
    let label = label.trim();
    if label.is_empty() {
        None
    } else {
        Some(format!("severity-{}", label.to_lowercase()))
    }
}

/// One row per report, synced first, then pending.
pub fn report_rows(store: &ReportStore) -> Vec<ReportRow> {
    store
        .all()
        .map(|entry| {
            let r = entry.report;
            ReportRow {
                id: r.id,
                hazard: r.hazard_type.label().to_string(),
                severity: r.severity.label().to_string(),
                severity_class: severity_class(r.severity.label()),
                offline: entry.pending,
                reporter: r.reporter_name.clone(),
                location: r.location.clone(),
                details: r.details.clone(),
                media: r.media.as_deref().map(Media::classify),
            }
        })
        .collect()
}

/// One row per volunteer in store order. Rows are keyed by volunteer id,
/// not by position, so a click always reaches the right marker.
pub fn volunteer_rows<M: MapWidget>(store: &VolunteerStore, markers: &MarkerRegistry<M>) -> Vec<VolunteerRow> {
    store
        .volunteers()
        .iter()
        .map(|v| VolunteerRow {
            id: v.id,
            label: format!("{} ({})", v.name, v.location),
            on_map: markers.handle_for(MarkerKey::Volunteer(v.id)).is_some(),
        })
        .collect()
}

/// Placeholder text for the location field once the device position is known.
pub fn location_hint(at: Coordinates) -> String {
    format!("Detected Location: {:.4}, {:.4}", at.latitude, at.longitude)
}
