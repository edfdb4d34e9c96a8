/// Report store: the synced/pending two-collection model.
///
/// `synced` holds reports assumed persisted server-side; `pending` holds
/// reports queued locally while crisis mode is on. A report is in at most one
/// of the two at any time, and insertion order is preserved in both. The
/// combined view always yields every synced report before any pending one.
///
/// The queue lives in memory only and is lost on restart.

use chrono::Utc;

use crate::client::{Geocoder, ReportRecord};
use crate::logging::{self, Component};
use crate::map::{MapWidget, MarkerRegistry, MarkerSource, Placement};
use crate::model::{GeocodeError, Report, ReportDraft, ReportId};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Geocoded and appended to `synced`.
    Synced { id: ReportId, placement: Placement },
    /// Appended to `pending` without geocoding (crisis mode).
    Queued { id: ReportId },
    /// Geocoding failed and the store is configured to queue rather than
    /// drop; appended to `pending`.
    QueuedAfterFailure { id: ReportId, error: GeocodeError },
}

impl SubmitOutcome {
    pub fn id(&self) -> ReportId {
        match self {
            SubmitOutcome::Synced { id, .. }
            | SubmitOutcome::Queued { id }
            | SubmitOutcome::QueuedAfterFailure { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    NothingToSync,
    /// `moved` reports went from pending to synced; `placed` of them got a
    /// marker (only those that already had coordinates).
    Synced { moved: usize, placed: usize },
}

/// One row of the combined view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportEntry<'a> {
    pub report: &'a Report,
    pub pending: bool,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ReportStore {
    synced: Vec<Report>,
    pending: Vec<Report>,
    next_id: u64,
    queue_on_geocode_failure: bool,
}

impl ReportStore {
    pub fn new(queue_on_geocode_failure: bool) -> Self {
        Self {
            synced: Vec::new(),
            pending: Vec::new(),
            next_id: 1,
            queue_on_geocode_failure,
        }
    }

    fn allocate_id(&mut self) -> ReportId {
        let id = ReportId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Adds a new report.
    ///
    /// `offline` queues it in `pending` with no geocoding. Otherwise the
    /// location is geocoded (blocking this handler) and, on success, the
    /// report joins `synced` and gets a marker. On failure the report is
    /// dropped and the error returned, unless queue-on-failure is enabled.
    pub fn submit<G, M>(
        &mut self,
        draft: ReportDraft,
        offline: bool,
        geocoder: &G,
        markers: &mut MarkerRegistry<M>,
    ) -> Result<SubmitOutcome, GeocodeError>
    where
        G: Geocoder + ?Sized,
        M: MapWidget,
    {
        if offline {
            let id = self.allocate_id();
            self.pending.push(Report::from_draft(id, draft, Utc::now()));
            logging::info(Component::Store, Some(&id.to_string()), "queued offline report");
            return Ok(SubmitOutcome::Queued { id });
        }

        match geocoder.locate(&draft.location) {
            Ok(at) => {
                let id = self.allocate_id();
                let mut report = Report::from_draft(id, draft, Utc::now());
                report.coordinates = Some(at);
                let placement = markers.place(MarkerSource::Report(&report));
                self.synced.push(report);
                Ok(SubmitOutcome::Synced { id, placement })
            }
            Err(error) => {
                logging::log_geocode_failure(&draft.location, "report geocode", &error);
                if !self.queue_on_geocode_failure {
                    return Err(error);
                }
                let id = self.allocate_id();
                self.pending.push(Report::from_draft(id, draft, Utc::now()));
                Ok(SubmitOutcome::QueuedAfterFailure { id, error })
            }
        }
    }

    /// Moves every pending report into `synced`, in order, and asks for a
    /// marker for each. Pending reports are not geocoded here, so only those
    /// that already carry coordinates end up on the map.
    pub fn sync<M: MapWidget>(&mut self, markers: &mut MarkerRegistry<M>) -> SyncOutcome {
        if self.pending.is_empty() {
            return SyncOutcome::NothingToSync;
        }

        let moved = self.pending.len();
        let mut placed = 0;
        for report in self.pending.drain(..) {
            if markers.place(MarkerSource::Report(&report)).is_new() {
                placed += 1;
            }
            self.synced.push(report);
        }

        logging::log_sync_summary(moved, placed);
        SyncOutcome::Synced { moved, placed }
    }

    /// Appends records fetched from the backend to `synced`, placing markers
    /// for those that already have coordinates. Returns how many were added.
    pub fn load_records<M: MapWidget>(&mut self, records: &[ReportRecord], markers: &mut MarkerRegistry<M>) -> usize {
        for record in records {
            let id = self.allocate_id();
            let mut report = Report::from_draft(id, record.to_draft(), Utc::now());
            report.coordinates = record.coordinates();
            markers.place(MarkerSource::Report(&report));
            self.synced.push(report);
        }
        records.len()
    }

    /// `synced ++ pending`, recomputed on every call.
    pub fn all(&self) -> impl Iterator<Item = ReportEntry<'_>> + '_ {
        let synced = self.synced.iter().map(|report| ReportEntry { report, pending: false });
        let pending = self.pending.iter().map(|report| ReportEntry { report, pending: true });
        synced.chain(pending)
    }

    pub fn synced(&self) -> &[Report] {
        &self.synced
    }

    pub fn pending(&self) -> &[Report] {
        &self.pending
    }

    pub fn is_pending(&self, id: ReportId) -> bool {
        self.pending.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: ReportId) -> Option<&Report> {
        self.all().map(|e| e.report).find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.synced.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MemoryMap;
    use crate::model::{Coordinates, HazardType, Severity};
    use std::cell::Cell;

    /// Resolves every query to a fixed point and counts calls.
    struct FixedGeocoder {
        at: Option<Coordinates>,
        calls: Cell<usize>,
    }

    impl FixedGeocoder {
        fn found(lat: f64, lon: f64) -> Self {
            Self {
                at: Some(Coordinates::new(lat, lon)),
                calls: Cell::new(0),
            }
        }

        fn nothing() -> Self {
            Self { at: None, calls: Cell::new(0) }
        }
    }

    impl Geocoder for FixedGeocoder {
        fn locate(&self, query: &str) -> Result<Coordinates, GeocodeError> {
            self.calls.set(self.calls.get() + 1);
            self.at.ok_or_else(|| GeocodeError::NotFound(query.to_string()))
        }
    }

    fn draft(name: &str) -> ReportDraft {
        ReportDraft {
            reporter_name: name.to_string(),
            hazard_type: HazardType::Flood,
            severity: Severity::High,
            location: format!("{} Village", name),
            details: String::new(),
            media: None,
        }
    }

    fn registry() -> MarkerRegistry<MemoryMap> {
        MarkerRegistry::new(MemoryMap::new(Coordinates::new(20.5937, 78.9629), 5), 50)
    }

    fn names(store: &ReportStore) -> Vec<(String, bool)> {
        store
            .all()
            .map(|e| (e.report.reporter_name.clone(), e.pending))
            .collect()
    }

    #[test]
    fn test_offline_submit_queues_without_geocoding() {
        let mut store = ReportStore::new(false);
        let mut markers = registry();
        let geocoder = FixedGeocoder::found(1.0, 2.0);

        let outcome = store.submit(draft("B"), true, &geocoder, &mut markers).expect("queued");

        assert!(matches!(outcome, SubmitOutcome::Queued { .. }));
        assert_eq!(geocoder.calls.get(), 0, "offline submit must not geocode");
        assert!(store.synced().is_empty());
        assert_eq!(store.pending().len(), 1);
        assert!(store.is_pending(outcome.id()));
        assert!(markers.is_empty());
    }

    #[test]
    fn test_online_submit_geocodes_and_places_marker() {
        let mut store = ReportStore::new(false);
        let mut markers = registry();
        let geocoder = FixedGeocoder::found(10.0, 20.0);

        let outcome = store.submit(draft("A"), false, &geocoder, &mut markers).expect("synced");

        match outcome {
            SubmitOutcome::Synced { placement, .. } => assert!(placement.is_new()),
            other => panic!("expected Synced, got {:?}", other),
        }
        assert_eq!(store.synced().len(), 1);
        assert_eq!(store.synced()[0].coordinates, Some(Coordinates::new(10.0, 20.0)));
        assert_eq!(markers.len(), 1);
    }

    #[test]
    fn test_failed_geocode_drops_report_by_default() {
        let mut store = ReportStore::new(false);
        let mut markers = registry();

        let result = store.submit(draft("A"), false, &FixedGeocoder::nothing(), &mut markers);

        assert_eq!(result, Err(GeocodeError::NotFound("A Village".to_string())));
        assert!(store.is_empty(), "dropped report must not appear in either collection");
        assert!(markers.is_empty());
    }

    #[test]
    fn test_failed_geocode_queues_when_configured() {
        let mut store = ReportStore::new(true);
        let mut markers = registry();

        let outcome = store
            .submit(draft("A"), false, &FixedGeocoder::nothing(), &mut markers)
            .expect("queued instead of dropped");

        assert!(matches!(outcome, SubmitOutcome::QueuedAfterFailure { .. }));
        assert_eq!(store.pending().len(), 1);
        assert!(markers.is_empty());
    }

    #[test]
    fn test_sync_moves_pending_after_synced_in_order() {
        let mut store = ReportStore::new(false);
        let mut markers = registry();
        let geocoder = FixedGeocoder::found(10.0, 20.0);

        store.submit(draft("S1"), false, &geocoder, &mut markers).expect("synced");
        store.submit(draft("P1"), true, &geocoder, &mut markers).expect("queued");
        store.submit(draft("P2"), true, &geocoder, &mut markers).expect("queued");

        let outcome = store.sync(&mut markers);

        assert_eq!(outcome, SyncOutcome::Synced { moved: 2, placed: 0 });
        assert!(store.pending().is_empty());
        let synced: Vec<_> = store.synced().iter().map(|r| r.reporter_name.as_str()).collect();
        assert_eq!(synced, vec!["S1", "P1", "P2"]);
        // queued reports were never resolved, so only the first has a marker
        assert_eq!(markers.len(), 1);
    }

    #[test]
    fn test_sync_with_empty_queue_is_noop() {
        let mut store = ReportStore::new(false);
        let mut markers = registry();
        assert_eq!(store.sync(&mut markers), SyncOutcome::NothingToSync);
        assert!(store.is_empty());
    }

    #[test]
    fn test_all_yields_synced_before_pending() {
        let mut store = ReportStore::new(false);
        let mut markers = registry();
        let geocoder = FixedGeocoder::found(10.0, 20.0);

        store.submit(draft("P1"), true, &geocoder, &mut markers).expect("queued");
        store.submit(draft("S1"), false, &geocoder, &mut markers).expect("synced");
        store.submit(draft("P2"), true, &geocoder, &mut markers).expect("queued");
        store.submit(draft("S2"), false, &geocoder, &mut markers).expect("synced");

        assert_eq!(
            names(&store),
            vec![
                ("S1".to_string(), false),
                ("S2".to_string(), false),
                ("P1".to_string(), true),
                ("P2".to_string(), true),
            ]
        );
        // restartable: a second pass sees the same sequence
        assert_eq!(store.all().count(), 4);
    }

    #[test]
    fn test_ids_are_unique_across_collections() {
        let mut store = ReportStore::new(false);
        let mut markers = registry();
        let geocoder = FixedGeocoder::found(10.0, 20.0);

        let a = store.submit(draft("A"), true, &geocoder, &mut markers).expect("queued").id();
        let b = store.submit(draft("B"), false, &geocoder, &mut markers).expect("synced").id();
        assert_ne!(a, b);
        assert_eq!(store.get(a).map(|r| r.reporter_name.as_str()), Some("A"));
    }

    #[test]
    fn test_loaded_records_join_synced_with_markers_when_resolved() {
        let mut store = ReportStore::new(false);
        let mut markers = registry();
        let records: Vec<ReportRecord> = serde_json::from_str(
            r#"[
                {"name": "S", "type": "Fire", "severity": "Low", "location": "X", "lat": "1.5", "lon": "2.5"},
                {"name": "T", "type": "Flood", "severity": "High", "location": "Y"}
            ]"#,
        )
        .expect("valid records");

        assert_eq!(store.load_records(&records, &mut markers), 2);
        assert_eq!(store.synced().len(), 2);
        assert!(store.pending().is_empty());
        assert_eq!(markers.len(), 1);
    }
}
