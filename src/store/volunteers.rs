/// Volunteer store, backed by the reporting API.
///
/// The backend owns volunteer identity; this store mirrors its list, attaches
/// coordinates locally and asks for one marker per resolved volunteer.
/// Geocoding during a bulk load is strictly sequential so markers appear in
/// list order and at most one lookup is outstanding.

use crate::client::{Geocoder, ReportBackend, VolunteerRecord};
use crate::logging::{self, Component};
use crate::map::{MapWidget, MarkerKey, MarkerRegistry, MarkerSource, Placement};
use crate::model::{BackendError, Coordinates, CrisisMapError, Volunteer, VolunteerId};

#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub id: VolunteerId,
    pub placement: Placement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub total: usize,
    pub resolved: usize,
}

#[derive(Debug, Default)]
pub struct VolunteerStore {
    volunteers: Vec<Volunteer>,
    next_id: u64,
}

impl VolunteerStore {
    pub fn new() -> Self {
        Self {
            volunteers: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> VolunteerId {
        let id = VolunteerId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Registers a volunteer with the backend, then geocodes and marks them.
    ///
    /// Blank name or location is rejected before any network call. A
    /// geocoding failure after a successful registration is logged only; the
    /// volunteer stays registered without a marker.
    pub fn register<B, G, M>(
        &mut self,
        name: &str,
        location: &str,
        backend: &B,
        geocoder: &G,
        markers: &mut MarkerRegistry<M>,
    ) -> Result<Registration, CrisisMapError>
    where
        B: ReportBackend + ?Sized,
        G: Geocoder + ?Sized,
        M: MapWidget,
    {
        let name = name.trim();
        let location = location.trim();
        if name.is_empty() {
            return Err(CrisisMapError::MissingField("name"));
        }
        if location.is_empty() {
            return Err(CrisisMapError::MissingField("location"));
        }

        let record = backend.register_volunteer(name, location).map_err(|e| {
            logging::log_backend_failure("/api/volunteer", "volunteer registration", &e);
            e
        })?;

        let id = self.allocate_id();
        let volunteer = self.resolve(id, &record, geocoder);
        let placement = markers.place(MarkerSource::Volunteer(&volunteer));
        self.volunteers.push(volunteer);

        logging::info(Component::Store, Some(&id.to_string()), &format!("registered volunteer '{}'", name));
        Ok(Registration { id, placement })
    }

    /// Replaces the local list with the backend's, then resolves and marks
    /// each volunteer in list order, one lookup at a time.
    ///
    /// A record matching a known volunteer (by backend id, or by name and
    /// location when the backend sent none) keeps its local id. Its
    /// coordinates are reused only while the location is unchanged, so a
    /// reload never duplicates a marker nor leaves one at an old place.
    pub fn load_all<B, G, M>(
        &mut self,
        backend: &B,
        geocoder: &G,
        markers: &mut MarkerRegistry<M>,
    ) -> Result<LoadSummary, BackendError>
    where
        B: ReportBackend + ?Sized,
        G: Geocoder + ?Sized,
        M: MapWidget,
    {
        let records = backend.fetch_volunteers().map_err(|e| {
            logging::log_backend_failure("/api/volunteers", "volunteer load", &e);
            e
        })?;

        let mut known: Vec<Volunteer> = self.volunteers.drain(..).collect();

        let mut resolved = 0;
        for record in &records {
            let volunteer = match take_match(&mut known, record) {
                Some(mut existing) if existing.is_resolved() && existing.location == record.location => {
                    if existing.name != record.name {
                        // popup shows the name
                        markers.remove(MarkerKey::Volunteer(existing.id));
                        existing.name = record.name.clone();
                    }
                    existing
                }
                Some(existing) => {
                    // moved or never resolved: look it up again under the same id
                    markers.remove(MarkerKey::Volunteer(existing.id));
                    self.resolve(existing.id, record, geocoder)
                }
                None => {
                    let id = self.allocate_id();
                    self.resolve(id, record, geocoder)
                }
            };

            if markers.place(MarkerSource::Volunteer(&volunteer)).handle().is_some() {
                resolved += 1;
            }
            self.volunteers.push(volunteer);
        }

        // volunteers the backend no longer lists keep no marker
        for gone in &known {
            markers.remove(MarkerKey::Volunteer(gone.id));
        }

        let summary = LoadSummary {
            total: records.len(),
            resolved,
        };
        logging::info(
            Component::Store,
            None,
            &format!("loaded {} volunteer(s), {} on the map", summary.total, summary.resolved),
        );
        Ok(summary)
    }

    /// Builds the local volunteer, using record coordinates when present and
    /// geocoding the location otherwise.
    fn resolve<G>(&self, id: VolunteerId, record: &VolunteerRecord, geocoder: &G) -> Volunteer
    where
        G: Geocoder + ?Sized,
    {
        let coordinates = match (record.lat, record.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => match geocoder.locate(&record.location) {
                Ok(at) => Some(at),
                Err(e) => {
                    logging::log_geocode_failure(&record.location, "volunteer geocode", &e);
                    None
                }
            },
        };

        Volunteer {
            id,
            server_id: record.server_id(),
            name: record.name.clone(),
            location: record.location.clone(),
            coordinates,
        }
    }

    pub fn volunteers(&self) -> &[Volunteer] {
        &self.volunteers
    }

    pub fn get(&self, id: VolunteerId) -> Option<&Volunteer> {
        self.volunteers.iter().find(|v| v.id == id)
    }

    pub fn len(&self) -> usize {
        self.volunteers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volunteers.is_empty()
    }
}

/// Removes and returns the known volunteer `record` refers to.
fn take_match(known: &mut Vec<Volunteer>, record: &VolunteerRecord) -> Option<Volunteer> {
    let index = match record.server_id() {
        Some(sid) => known.iter().position(|v| v.server_id.as_deref() == Some(sid.as_str())),
        None => known
            .iter()
            .position(|v| v.server_id.is_none() && v.name == record.name && v.location == record.location),
    }?;
    Some(known.remove(index))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
