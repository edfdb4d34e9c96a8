/// HTML commit step for the list views.
///
/// Turns derived rows into the fragments the page swaps into the report and
/// volunteer lists. All user-supplied text is escaped.

use crate::render::view::{Media, ReportRow, VolunteerRow};
use crate::render::ListDisplay;

pub const EMPTY_VOLUNTEERS: &str = "No volunteers registered yet.";

/// Escapes text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn media_html(media: &Media) -> String {
    match media {
        Media::Video(src) => format!("<video src=\"{}\" controls></video>", escape(src)),
        Media::Image(src) => format!("<img src=\"{}\" alt=\"media\">", escape(src)),
    }
}

pub fn report_item(row: &ReportRow) -> String {
    let class = row.severity_class.as_deref().unwrap_or("");
    let offline_tag = if row.offline {
        " <span style='color:red;'>(Offline)</span>"
    } else {
        ""
    };
    let media = row.media.as_ref().map(media_html).unwrap_or_default();

    format!(
        "<div class=\"report-item\" data-report=\"{}\"><b>{}</b> - <span class=\"{}\">{}</span>{}<br>\
         Reported by <b>{}</b> at <i>{}</i><br>{}{}</div>",
        row.id.0,
        escape(&row.hazard),
        escape(class),
        escape(&row.severity),
        offline_tag,
        escape(&row.reporter),
        escape(&row.location),
        escape(&row.details),
        media,
    )
}

pub fn report_list(rows: &[ReportRow]) -> String {
    rows.iter().map(report_item).collect()
}

pub fn volunteer_list(rows: &[VolunteerRow]) -> String {
    if rows.is_empty() {
        return format!("<li>{}</li>", EMPTY_VOLUNTEERS);
    }
    rows.iter()
        .map(|row| {
            format!(
                "<li data-volunteer=\"{}\" style=\"cursor:pointer\">{}</li>",
                row.id.0,
                escape(&row.label)
            )
        })
        .collect()
}

/// List display that keeps the committed markup as strings.
#[derive(Debug, Default)]
pub struct HtmlLists {
    pub reports: String,
    pub volunteers: String,
}

impl ListDisplay for HtmlLists {
    fn show_reports(&mut self, rows: &[ReportRow]) {
        self.reports = report_list(rows);
    }

    fn show_volunteers(&mut self, rows: &[VolunteerRow]) {
        self.volunteers = volunteer_list(rows);
    }
}
