/// Render layer: projects store state into the report and volunteer lists.
///
/// Split in two steps. `view` derives plain row structs from the stores;
/// `html` commits rows to markup. A `ListDisplay` receives the rows after
/// every state change and holds no state of its own beyond what it shows.

pub mod html;
pub mod view;

pub use html::HtmlLists;
pub use view::{Media, ReportRow, VolunteerRow};

/// Surface the list views are committed to.
pub trait ListDisplay {
    fn show_reports(&mut self, rows: &[ReportRow]);
    fn show_volunteers(&mut self, rows: &[VolunteerRow]);
}
