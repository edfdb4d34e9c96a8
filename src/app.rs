/// Application controller for the crisis map.
///
/// Owns the stores, the marker registry and the crisis flag, and exposes one
/// method per user action. Every handler runs to completion on the calling
/// thread; network calls block only the handler that made them. After each
/// state change the lists are re-derived and committed to the display.

use crate::client::{Geocoder, ReportBackend};
use crate::config::Config;
use crate::crisis::{CrisisMode, CrisisStatus};
use crate::logging::{self, Component};
use crate::map::{MapWidget, MarkerKey, MarkerRegistry};
use crate::model::{CrisisMapError, ReportDraft, VolunteerId};
use crate::notify::Notifier;
use crate::render::{view, ListDisplay};
use crate::store::{Registration, ReportStore, SubmitOutcome, SyncOutcome, VolunteerStore};

pub const MSG_SAVED_OFFLINE: &str = "Report saved locally (offline mode). Sync later.";
pub const MSG_SYNCED: &str = "Offline reports synced successfully!";
pub const MSG_NOTHING_TO_SYNC: &str = "No offline reports to sync.";

pub struct CrisisMap<M: MapWidget, D: ListDisplay, N: Notifier> {
    geocoder: Box<dyn Geocoder>,
    backend: Box<dyn ReportBackend>,
    markers: MarkerRegistry<M>,
    reports: ReportStore,
    volunteers: VolunteerStore,
    crisis: CrisisMode,
    display: D,
    notifier: N,
    focus_zoom: u8,
}

impl<M: MapWidget, D: ListDisplay, N: Notifier> CrisisMap<M, D, N> {
    pub fn new(
        config: &Config,
        geocoder: Box<dyn Geocoder>,
        backend: Box<dyn ReportBackend>,
        map: M,
        display: D,
        notifier: N,
    ) -> Self {
        Self {
            geocoder,
            backend,
            markers: MarkerRegistry::new(map, config.map.fit_padding_px),
            reports: ReportStore::new(config.reports.queue_on_geocode_failure),
            volunteers: VolunteerStore::new(),
            crisis: CrisisMode::new(),
            display,
            notifier,
            focus_zoom: config.map.focus_zoom,
        }
    }

    // -----------------------------------------------------------------------
    // Startup
    // -----------------------------------------------------------------------

    /// Loads server reports, then volunteers, then renders both lists.
    /// Load failures are logged and leave the affected collection as it was.
    pub fn start(&mut self) {
        match self.backend.fetch_reports() {
            Ok(records) => {
                let loaded = self.reports.load_records(&records, &mut self.markers);
                logging::info(Component::Backend, None, &format!("loaded {} report(s)", loaded));
            }
            Err(e) => logging::log_backend_failure("/api/reports", "report load", &e),
        }

        match self
            .volunteers
            .load_all(self.backend.as_ref(), self.geocoder.as_ref(), &mut self.markers)
        {
            Ok(summary) => logging::info(
                Component::Backend,
                None,
                &format!("loaded {} volunteer(s), {} placed", summary.total, summary.resolved),
            ),
            Err(e) => logging::debug(Component::Backend, None, &format!("volunteer load skipped: {}", e)),
        }

        self.refresh();
    }

    // -----------------------------------------------------------------------
    // Crisis mode
    // -----------------------------------------------------------------------

    pub fn toggle_crisis_mode(&mut self) -> CrisisStatus {
        let active = self.crisis.toggle();
        logging::info(
            Component::System,
            None,
            if active { "crisis mode on" } else { "crisis mode off" },
        );
        self.crisis.status()
    }

    pub fn crisis_status(&self) -> CrisisStatus {
        self.crisis.status()
    }

    // -----------------------------------------------------------------------
    // Reports
    // -----------------------------------------------------------------------

    /// Submits the report form. Destination depends on crisis mode at the
    /// moment of the call.
    pub fn submit_report(&mut self, draft: ReportDraft) -> Result<SubmitOutcome, CrisisMapError> {
        if draft.reporter_name.trim().is_empty() {
            let err = CrisisMapError::MissingField("name");
            self.notifier.notify(&err.user_message());
            return Err(err);
        }
        if draft.location.trim().is_empty() {
            let err = CrisisMapError::MissingField("location");
            self.notifier.notify(&err.user_message());
            return Err(err);
        }

        let offline = self.crisis.is_active();
        let result = self
            .reports
            .submit(draft, offline, self.geocoder.as_ref(), &mut self.markers);

        match &result {
            Ok(SubmitOutcome::Synced { .. }) => {}
            Ok(SubmitOutcome::Queued { .. }) => self.notifier.notify(MSG_SAVED_OFFLINE),
            Ok(SubmitOutcome::QueuedAfterFailure { error, .. }) => {
                self.notifier.notify(error.user_message());
                self.notifier.notify(MSG_SAVED_OFFLINE);
            }
            Err(error) => self.notifier.notify(error.user_message()),
        }

        self.refresh_reports();
        result.map_err(CrisisMapError::from)
    }

    /// Flushes the offline queue into the synced collection.
    pub fn sync(&mut self) -> SyncOutcome {
        let outcome = self.reports.sync(&mut self.markers);
        match outcome {
            SyncOutcome::NothingToSync => self.notifier.notify(MSG_NOTHING_TO_SYNC),
            SyncOutcome::Synced { .. } => {
                self.refresh_reports();
                self.notifier.notify(MSG_SYNCED);
            }
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Volunteers
    // -----------------------------------------------------------------------

    pub fn register_volunteer(&mut self, name: &str, location: &str) -> Result<Registration, CrisisMapError> {
        let result = self.volunteers.register(
            name,
            location,
            self.backend.as_ref(),
            self.geocoder.as_ref(),
            &mut self.markers,
        );

        match &result {
            Ok(_) => {
                self.refresh_volunteers();
                self.notifier.notify(&format!(
                    "Thank you {}! You have been registered as a volunteer.",
                    name.trim()
                ));
            }
            Err(e) => self.notifier.notify(&e.user_message()),
        }
        result
    }

    /// A click on a volunteer row: center on their marker and open its popup.
    /// Returns `false` if the volunteer has no marker.
    pub fn volunteer_clicked(&mut self, id: VolunteerId) -> bool {
        self.markers.focus(MarkerKey::Volunteer(id), self.focus_zoom)
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn refresh(&mut self) {
        self.refresh_reports();
        self.refresh_volunteers();
    }

    fn refresh_reports(&mut self) {
        let rows = view::report_rows(&self.reports);
        self.display.show_reports(&rows);
    }

    fn refresh_volunteers(&mut self) {
        let rows = view::volunteer_rows(&self.volunteers, &self.markers);
        self.display.show_volunteers(&rows);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn reports(&self) -> &ReportStore {
        &self.reports
    }

    pub fn volunteers(&self) -> &VolunteerStore {
        &self.volunteers
    }

    pub fn markers(&self) -> &MarkerRegistry<M> {
        &self.markers
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn is_crisis_mode(&self) -> bool {
        self.crisis.is_active()
    }
}
