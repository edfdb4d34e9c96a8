/// Reporting backend client
///
/// Talks to the crowd-reporting REST API:
///   GET  /api/reports     → list of report records
///   GET  /api/volunteers  → list of volunteer records
///   POST /api/volunteer   → `{ "volunteer": {...} }` or `{ "error": "..." }`
///
/// Coordinates in records may arrive as JSON numbers or decimal strings
/// (records that were geocoded client-side keep Nominatim's string form).

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

use crate::client::ReportBackend;
use crate::config::BackendConfig;
use crate::logging::{self, Component};
use crate::model::{BackendError, Coordinates, HazardType, ReportDraft, Severity};

// ============================================================================
// Wire records
// ============================================================================

/// A report as stored by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub hazard_type: String,
    pub severity: String,
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub details: String,
    #[serde(default, rename = "mediaURL", alias = "mediaUrl")]
    pub media_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_degrees")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_degrees")]
    pub lon: Option<f64>,
}

impl ReportRecord {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    pub fn to_draft(&self) -> ReportDraft {
        ReportDraft {
            reporter_name: self.name.clone(),
            hazard_type: HazardType::from_label(&self.hazard_type),
            severity: Severity::from_label(&self.severity),
            location: self.location.clone(),
            details: self.details.clone(),
            media: self.media_url.clone(),
        }
    }
}

/// A volunteer as stored by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VolunteerRecord {
    #[serde(default, alias = "_id")]
    pub id: Option<serde_json::Value>,
    pub name: String,
    pub location: String,
    #[serde(default, deserialize_with = "deserialize_degrees")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_degrees")]
    pub lon: Option<f64>,
}

impl VolunteerRecord {
    /// Backend identifier rendered as text, whatever JSON type it used.
    pub fn server_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct RegistrationRequest<'a> {
    name: &'a str,
    location: &'a str,
}

#[derive(Debug, Deserialize)]
struct RegistrationResponse {
    #[serde(default)]
    volunteer: Option<VolunteerRecord>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireDegrees {
    Number(f64),
    Text(String),
}

/// Null and absent both read as empty text.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_degrees<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<WireDegrees> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(WireDegrees::Number(n)) if n.is_finite() => Some(n),
        Some(WireDegrees::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

// ============================================================================
// Client
// ============================================================================

pub struct HttpBackend {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Transport(format!("building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn get_text(&self, path: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .header("Accept", "application/json")
            .send()
            .map_err(|e| BackendError::Transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(BackendError::Transport(format!("HTTP error: {}", response.status())));
        }

        response
            .text()
            .map_err(|e| BackendError::Transport(format!("Failed to read response: {}", e)))
    }
}

impl ReportBackend for HttpBackend {
    fn fetch_reports(&self) -> Result<Vec<ReportRecord>, BackendError> {
        let body = self.get_text("reports")?;
        parse_record_list(&body)
    }

    fn fetch_volunteers(&self) -> Result<Vec<VolunteerRecord>, BackendError> {
        let body = self.get_text("volunteers")?;
        parse_record_list(&body)
    }

    fn register_volunteer(&self, name: &str, location: &str) -> Result<VolunteerRecord, BackendError> {
        let response = self
            .client
            .post(self.endpoint("volunteer"))
            .json(&RegistrationRequest { name, location })
            .send()
            .map_err(|e| BackendError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| BackendError::Transport(format!("Failed to read response: {}", e)))?;

        interpret_registration(status.as_u16(), &body)
    }
}

// ============================================================================
// Response interpretation
// ============================================================================

/// Decodes a JSON array of records one element at a time.
///
/// A body that is not an array is a parse error. Elements that do not match
/// the record shape are logged and skipped so the rest of the list loads.
pub fn parse_record_list<T>(body: &str) -> Result<Vec<T>, BackendError>
where
    T: for<'de> Deserialize<'de>,
{
    let items: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))?;

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value(item) {
            Ok(record) => records.push(record),
            Err(e) => logging::warn(
                Component::Backend,
                Some(&format!("record {}", index)),
                &format!("skipping malformed record: {}", e),
            ),
        }
    }
    Ok(records)
}

/// Maps a `POST /api/volunteer` reply to the created record or the
/// backend's stated reason for refusing it.
///
/// An unreadable body is a transport failure, as the request outcome is
/// unknown to the user.
pub fn interpret_registration(status: u16, body: &str) -> Result<VolunteerRecord, BackendError> {
    let parsed: RegistrationResponse = serde_json::from_str(body)
        .map_err(|e| BackendError::Transport(format!("unreadable registration response: {}", e)))?;

    if (200..300).contains(&status) {
        return parsed
            .volunteer
            .ok_or_else(|| BackendError::Parse("registration response has no 'volunteer'".to_string()));
    }

    let reason = parsed
        .error
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status));
    Err(BackendError::Rejected(reason))
}

// ============================================================================
// Tests
// ============================================================================
