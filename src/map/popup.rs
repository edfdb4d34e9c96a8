//! Popup markup bound to map markers.

use crate::model::{Coordinates, Report, Volunteer};
use crate::render::html::escape;

/// Turn-by-turn directions to `at` in Google Maps.
pub fn directions_link(at: Coordinates) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        at.latitude, at.longitude
    )
}

/// Hazard type, color-coded severity, location, details, and a directions link.
pub fn report_popup(report: &Report, at: Coordinates) -> String {
    format!(
        "<b>{}</b> (<span style=\"color:{}\">{}</span>)<br>{}<br>{}<br>\
         <a href=\"{}\" target=\"_blank\" style=\"color:blue;\">Get Directions</a>",
        report.hazard_type,
        report.severity.color(),
        escape(report.severity.label()),
        escape(&report.location),
        escape(&report.details),
        escape(&directions_link(at)),
    )
}

pub fn volunteer_popup(volunteer: &Volunteer) -> String {
    format!(
        "<b>Volunteer:</b> {}<br>Location: {}",
        escape(&volunteer.name),
        escape(&volunteer.location)
    )
}
