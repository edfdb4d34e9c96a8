/// Core data types for the crisis reporting map.
///
/// This module defines the shared domain model imported by all other modules:
/// reports, volunteers, coordinates, and the error kinds surfaced to users.
/// It contains no I/O.

use chrono::{DateTime, Utc};
use std::fmt;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Client-assigned identifier of a report, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportId(pub u64);

/// Client-assigned identifier of a volunteer, unique within a session.
///
/// The backend's own identifier (when it sends one) is kept separately in
/// `Volunteer::server_id`; this one only keys local state such as markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VolunteerId(pub u64);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "report-{}", self.0)
    }
}

impl fmt::Display for VolunteerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "volunteer-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Parses the decimal-degree strings used by the geocoder wire format.
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        let lat = latitude.trim().parse::<f64>().ok()?;
        let lon = longitude.trim().parse::<f64>().ok()?;
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        Some(Self::new(lat, lon))
    }
}

// ---------------------------------------------------------------------------
// Report classification
// ---------------------------------------------------------------------------

/// Kind of hazard being reported. Drives the marker icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardType {
    Flood,
    Fire,
    Earthquake,
    Cyclone,
    Other,
}

impl HazardType {
    pub const ALL: [HazardType; 5] = [
        HazardType::Flood,
        HazardType::Fire,
        HazardType::Earthquake,
        HazardType::Cyclone,
        HazardType::Other,
    ];

    /// Unknown labels fall back to `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Flood" => HazardType::Flood,
            "Fire" => HazardType::Fire,
            "Earthquake" => HazardType::Earthquake,
            "Cyclone" => HazardType::Cyclone,
            _ => HazardType::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HazardType::Flood => "Flood",
            HazardType::Fire => "Fire",
            HazardType::Earthquake => "Earthquake",
            HazardType::Cyclone => "Cyclone",
            HazardType::Other => "Other",
        }
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reported severity.
///
/// Records loaded from the backend may carry a label outside the three known
/// levels; it is kept verbatim in `Unrecognized` so it can still be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Unrecognized(String),
}

impl Severity {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Low" => Severity::Low,
            "Medium" => Severity::Medium,
            "High" => Severity::High,
            other => Severity::Unrecognized(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Unrecognized(label) => label,
        }
    }

    /// Popup color for this severity. Total: unknown levels are black.
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Low => "green",
            Severity::Medium => "orange",
            Severity::High => "red",
            Severity::Unrecognized(_) => "black",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// The values a user enters in the report form, before the store assigns an
/// identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub reporter_name: String,
    pub hazard_type: HazardType,
    pub severity: Severity,
    pub location: String,
    pub details: String,
    /// Object URL or path of an attached photo/video.
    pub media: Option<String>,
}

/// A disaster report.
///
/// Unresolved until geocoding succeeds; the only mutation after creation is
/// attaching `coordinates`.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: ReportId,
    pub reporter_name: String,
    pub hazard_type: HazardType,
    pub severity: Severity,
    pub location: String,
    pub details: String,
    pub media: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub submitted_at: DateTime<Utc>,
}

impl Report {
    pub fn from_draft(id: ReportId, draft: ReportDraft, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            reporter_name: draft.reporter_name,
            hazard_type: draft.hazard_type,
            severity: draft.severity,
            location: draft.location,
            details: draft.details,
            media: draft.media.filter(|m| !m.trim().is_empty()),
            coordinates: None,
            submitted_at,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.coordinates.is_some()
    }
}

// ---------------------------------------------------------------------------
// Volunteers
// ---------------------------------------------------------------------------

/// A registered volunteer. The backend owns identity; coordinates are
/// attached client-side.
#[derive(Debug, Clone, PartialEq)]
pub struct Volunteer {
    pub id: VolunteerId,
    pub server_id: Option<String>,
    pub name: String,
    pub location: String,
    pub coordinates: Option<Coordinates>,
}

impl Volunteer {
    pub fn is_resolved(&self) -> bool {
        self.coordinates.is_some()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures of a place-name lookup. "Nothing matched" and "could not ask"
/// are kept apart because the user is told different things.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeError {
    /// The lookup succeeded but returned zero results.
    NotFound(String),
    /// Network failure, non-2xx status, or an unreadable response.
    Transport(String),
}

impl GeocodeError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GeocodeError::NotFound(_) => "Location not found! Try entering village + district.",
            GeocodeError::Transport(_) => "Could not fetch location data.",
        }
    }
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::NotFound(query) => write!(f, "No geocoding results for '{}'", query),
            GeocodeError::Transport(msg) => write!(f, "Geocoding transport error: {}", msg),
        }
    }
}

impl std::error::Error for GeocodeError {}

/// Failures talking to the reporting backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The request could not be completed (connection, timeout, bad body).
    Transport(String),
    /// The backend answered with an error payload; the reason is shown verbatim.
    Rejected(String),
    /// A 2xx response whose body did not match the expected shape.
    Parse(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Transport(msg) => write!(f, "Backend transport error: {}", msg),
            BackendError::Rejected(reason) => write!(f, "Backend rejected request: {}", reason),
            BackendError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

/// Errors returned by the application handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum CrisisMapError {
    /// A required form field was blank; no network call was made.
    MissingField(&'static str),
    Geocode(GeocodeError),
    Backend(BackendError),
}

impl CrisisMapError {
    /// The blocking notification shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            CrisisMapError::MissingField(_) => "Please enter both name and location.".to_string(),
            CrisisMapError::Geocode(e) => e.user_message().to_string(),
            CrisisMapError::Backend(BackendError::Rejected(reason)) => format!("Error: {}", reason),
            CrisisMapError::Backend(_) => "Failed to register volunteer.".to_string(),
        }
    }
}

impl fmt::Display for CrisisMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrisisMapError::MissingField(field) => write!(f, "Missing required field: {}", field),
            CrisisMapError::Geocode(e) => write!(f, "{}", e),
            CrisisMapError::Backend(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CrisisMapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CrisisMapError::MissingField(_) => None,
            CrisisMapError::Geocode(e) => Some(e),
            CrisisMapError::Backend(e) => Some(e),
        }
    }
}

impl From<GeocodeError> for CrisisMapError {
    fn from(e: GeocodeError) -> Self {
        CrisisMapError::Geocode(e)
    }
}

impl From<BackendError> for CrisisMapError {
    fn from(e: BackendError) -> Self {
        CrisisMapError::Backend(e)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_color_is_total() {
        assert_eq!(Severity::Low.color(), "green");
        assert_eq!(Severity::Medium.color(), "orange");
        assert_eq!(Severity::High.color(), "red");
        assert_eq!(Severity::from_label("Catastrophic").color(), "black");
        assert_eq!(Severity::from_label("").color(), "black");
    }

    #[test]
    fn test_unrecognized_severity_keeps_its_label() {
        let severity = Severity::from_label("Extreme");
        assert_eq!(severity, Severity::Unrecognized("Extreme".to_string()));
        assert_eq!(severity.to_string(), "Extreme");
    }

    #[test]
    fn test_unknown_hazard_label_falls_back_to_other() {
        assert_eq!(HazardType::from_label("Flood"), HazardType::Flood);
        assert_eq!(HazardType::from_label("Landslide"), HazardType::Other);
        for hazard in HazardType::ALL {
            assert_eq!(HazardType::from_label(hazard.label()), hazard);
        }
    }

    #[test]
    fn test_coordinates_parse_decimal_strings() {
        let c = Coordinates::parse("20.5937", " 78.9629 ").expect("valid decimal strings");
        assert_eq!(c, Coordinates::new(20.5937, 78.9629));
        assert!(Coordinates::parse("north", "78.9").is_none());
        assert!(Coordinates::parse("NaN", "78.9").is_none());
    }

    #[test]
    fn test_draft_with_blank_media_has_no_media() {
        let draft = ReportDraft {
            reporter_name: "A".to_string(),
            hazard_type: HazardType::Fire,
            severity: Severity::Low,
            location: "Somewhere".to_string(),
            details: String::new(),
            media: Some("  ".to_string()),
        };
        let report = Report::from_draft(ReportId(1), draft, Utc::now());
        assert_eq!(report.media, None);
        assert!(!report.is_resolved());
    }

    #[test]
    fn test_user_messages_match_error_kind() {
        let not_found = CrisisMapError::from(GeocodeError::NotFound("X".to_string()));
        assert_eq!(
            not_found.user_message(),
            "Location not found! Try entering village + district."
        );

        let rejected = CrisisMapError::from(BackendError::Rejected("Name taken".to_string()));
        assert_eq!(rejected.user_message(), "Error: Name taken");

        let transport = CrisisMapError::from(BackendError::Transport("refused".to_string()));
        assert_eq!(transport.user_message(), "Failed to register volunteer.");
    }
}
