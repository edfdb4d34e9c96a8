/// Marker registry.
///
/// Owns every marker placed on the map, keyed by the entity it represents,
/// and keeps the viewport fitted around them. Invariant: each resolved
/// report or volunteer has exactly one marker; unresolved ones have none.
/// A marker is only removed when its volunteer moved on the backend.

use std::collections::HashMap;

use crate::logging::{self, Component};
use crate::map::icons::{self, MarkerIcon, VOLUNTEER_ICON};
use crate::map::popup;
use crate::model::{Coordinates, Report, ReportId, Volunteer, VolunteerId};

// ---------------------------------------------------------------------------
// Map widget seam
// ---------------------------------------------------------------------------

/// Opaque handle the map widget hands back for a placed marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Rectangle enclosing a set of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest bounds containing every point, or `None` for no points.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    south: p.latitude,
                    west: p.longitude,
                    north: p.latitude,
                    east: p.longitude,
                },
                Some(b) => Bounds {
                    south: b.south.min(p.latitude),
                    west: b.west.min(p.longitude),
                    north: b.north.max(p.latitude),
                    east: b.east.max(p.longitude),
                },
            })
        })
    }
}

/// The interactive map the markers live on.
pub trait MapWidget {
    fn add_marker(&mut self, at: Coordinates, icon: &'static MarkerIcon, popup_html: String) -> MarkerHandle;

    /// Fit the viewport to `bounds`, leaving `padding_px` on both axes.
    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32);

    fn set_view(&mut self, center: Coordinates, zoom: u8);

    fn open_popup(&mut self, marker: MarkerHandle);

    fn remove_marker(&mut self, marker: MarkerHandle);
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Which entity a marker stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKey {
    Report(ReportId),
    Volunteer(VolunteerId),
}

/// Entity handed to `MarkerRegistry::place`.
#[derive(Debug, Clone, Copy)]
pub enum MarkerSource<'a> {
    Report(&'a Report),
    Volunteer(&'a Volunteer),
}

impl MarkerSource<'_> {
    fn key(&self) -> MarkerKey {
        match self {
            MarkerSource::Report(r) => MarkerKey::Report(r.id),
            MarkerSource::Volunteer(v) => MarkerKey::Volunteer(v.id),
        }
    }

    fn coordinates(&self) -> Option<Coordinates> {
        match self {
            MarkerSource::Report(r) => r.coordinates,
            MarkerSource::Volunteer(v) => v.coordinates,
        }
    }
}

/// Result of asking for a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed(MarkerHandle),
    /// The entity already had a marker; nothing changed.
    Existing(MarkerHandle),
    /// The entity has no coordinates; nothing changed.
    Unresolved,
}

impl Placement {
    pub fn handle(&self) -> Option<MarkerHandle> {
        match self {
            Placement::Placed(h) | Placement::Existing(h) => Some(*h),
            Placement::Unresolved => None,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Placement::Placed(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct PlacedMarker {
    handle: MarkerHandle,
    at: Coordinates,
}

pub struct MarkerRegistry<M: MapWidget> {
    map: M,
    markers: HashMap<MarkerKey, PlacedMarker>,
    /// Placement order, for deterministic refits and listings.
    order: Vec<MarkerKey>,
    fit_padding_px: u32,
}

impl<M: MapWidget> MarkerRegistry<M> {
    pub fn new(map: M, fit_padding_px: u32) -> Self {
        Self {
            map,
            markers: HashMap::new(),
            order: Vec::new(),
            fit_padding_px,
        }
    }

    /// Places a marker for `source` and refits the viewport.
    ///
    /// No-op for unresolved entities and for entities that already have one.
    pub fn place(&mut self, source: MarkerSource<'_>) -> Placement {
        let key = source.key();
        if let Some(existing) = self.markers.get(&key) {
            return Placement::Existing(existing.handle);
        }
        let Some(at) = source.coordinates() else {
            return Placement::Unresolved;
        };

        let (icon, popup_html) = match source {
            MarkerSource::Report(r) => (icons::icon_for(r.hazard_type), popup::report_popup(r, at)),
            MarkerSource::Volunteer(v) => (&VOLUNTEER_ICON, popup::volunteer_popup(v)),
        };

        let handle = self.map.add_marker(at, icon, popup_html);
        self.markers.insert(key, PlacedMarker { handle, at });
        self.order.push(key);
        logging::debug(
            Component::Map,
            None,
            &format!("marker {:?} placed at ({}, {})", key, at.latitude, at.longitude),
        );

        self.refit();
        Placement::Placed(handle)
    }

    /// Fits the viewport around every live marker. No-op when there are none.
    pub fn refit(&mut self) {
        let positions = self.order.iter().filter_map(|k| self.markers.get(k)).map(|m| m.at);
        if let Some(bounds) = Bounds::enclosing(positions) {
            self.map.fit_bounds(bounds, self.fit_padding_px);
        }
    }

    /// Centers the map on the entity's marker and opens its popup.
    /// Returns `false` when the entity has no marker.
    pub fn focus(&mut self, key: MarkerKey, zoom: u8) -> bool {
        match self.markers.get(&key).copied() {
            Some(marker) => {
                self.map.set_view(marker.at, zoom);
                self.map.open_popup(marker.handle);
                true
            }
            None => false,
        }
    }

    pub fn handle_for(&self, key: MarkerKey) -> Option<MarkerHandle> {
        self.markers.get(&key).map(|m| m.handle)
    }

    /// Takes the entity's marker off the map, for an entity whose location
    /// changed. Returns `false` when it had none.
    pub fn remove(&mut self, key: MarkerKey) -> bool {
        let Some(marker) = self.markers.remove(&key) else {
            return false;
        };
        self.order.retain(|k| *k != key);
        self.map.remove_marker(marker.handle);
        logging::debug(Component::Map, None, &format!("marker {:?} removed", key));
        true
    }

    /// Keys in placement order.
    pub fn keys(&self) -> &[MarkerKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn map(&self) -> &M {
        &self.map
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::memory::MemoryMap;
    use crate::model::{HazardType, Severity};
    use chrono::Utc;

    fn report(id: u64, at: Option<(f64, f64)>) -> Report {
        Report {
            id: ReportId(id),
            reporter_name: "A".to_string(),
            hazard_type: HazardType::Fire,
            severity: Severity::Medium,
            location: "Somewhere".to_string(),
            details: String::new(),
            media: None,
            coordinates: at.map(|(lat, lon)| Coordinates::new(lat, lon)),
            submitted_at: Utc::now(),
        }
    }

    fn volunteer(id: u64, at: Option<(f64, f64)>) -> Volunteer {
        Volunteer {
            id: VolunteerId(id),
            server_id: None,
            name: format!("V{}", id),
            location: "Pune".to_string(),
            coordinates: at.map(|(lat, lon)| Coordinates::new(lat, lon)),
        }
    }

    fn registry() -> MarkerRegistry<MemoryMap> {
        MarkerRegistry::new(MemoryMap::new(Coordinates::new(20.5937, 78.9629), 5), 50)
    }

    #[test]
    fn test_unresolved_entity_gets_no_marker() {
        let mut reg = registry();
        assert_eq!(reg.place(MarkerSource::Report(&report(1, None))), Placement::Unresolved);
        assert!(reg.is_empty());
        assert!(reg.map().markers().is_empty());
        assert_eq!(reg.map().fit_calls(), 0);
    }

    #[test]
    fn test_placing_twice_keeps_one_marker() {
        let mut reg = registry();
        let r = report(1, Some((10.0, 20.0)));
        let first = reg.place(MarkerSource::Report(&r));
        let second = reg.place(MarkerSource::Report(&r));

        assert!(first.is_new());
        assert_eq!(second, Placement::Existing(first.handle().expect("placed")));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.map().markers().len(), 1);
    }

    #[test]
    fn test_report_and_volunteer_with_same_number_are_distinct() {
        let mut reg = registry();
        reg.place(MarkerSource::Report(&report(1, Some((10.0, 20.0)))));
        reg.place(MarkerSource::Volunteer(&volunteer(1, Some((11.0, 21.0)))));
        assert_eq!(reg.len(), 2);
        assert_eq!(
            reg.keys(),
            &[MarkerKey::Report(ReportId(1)), MarkerKey::Volunteer(VolunteerId(1))]
        );
    }

    #[test]
    fn test_each_placement_refits_around_all_markers() {
        let mut reg = registry();
        reg.place(MarkerSource::Report(&report(1, Some((10.0, 20.0)))));
        reg.place(MarkerSource::Volunteer(&volunteer(2, Some((-5.0, 30.0)))));

        assert_eq!(reg.map().fit_calls(), 2);
        let (bounds, padding) = reg.map().last_fit().expect("fitted");
        assert_eq!(padding, 50);
        assert_eq!(
            bounds,
            Bounds {
                south: -5.0,
                west: 20.0,
                north: 10.0,
                east: 30.0
            }
        );
    }

    #[test]
    fn test_refit_on_empty_registry_is_noop() {
        let mut reg = registry();
        reg.refit();
        assert_eq!(reg.map().fit_calls(), 0);
    }

    #[test]
    fn test_marker_uses_kind_specific_icon() {
        let mut reg = registry();
        reg.place(MarkerSource::Report(&report(1, Some((10.0, 20.0)))));
        reg.place(MarkerSource::Volunteer(&volunteer(1, Some((11.0, 21.0)))));
        let markers = reg.map().markers();
        assert_eq!(markers[0].icon_url, icons::icon_for(HazardType::Fire).url);
        assert_eq!(markers[1].icon_url, VOLUNTEER_ICON.url);
        assert!(markers[1].popup_html.contains("Volunteer:"));
    }

    #[test]
    fn test_focus_centers_and_opens_popup() {
        let mut reg = registry();
        let v = volunteer(7, Some((18.52, 73.85)));
        let handle = reg.place(MarkerSource::Volunteer(&v)).handle().expect("placed");

        assert!(reg.focus(MarkerKey::Volunteer(VolunteerId(7)), 12));
        assert_eq!(reg.map().view(), (Coordinates::new(18.52, 73.85), 12));
        assert_eq!(reg.map().popup_open(), Some(handle));

        assert!(!reg.focus(MarkerKey::Volunteer(VolunteerId(99)), 12));
    }

    #[test]
    fn test_removed_marker_can_be_placed_again() {
        let mut reg = registry();
        let mut v = volunteer(3, Some((18.52, 73.85)));
        reg.place(MarkerSource::Volunteer(&v));

        assert!(reg.remove(MarkerKey::Volunteer(VolunteerId(3))));
        assert!(reg.is_empty());
        assert!(reg.map().markers().is_empty());
        assert!(!reg.remove(MarkerKey::Volunteer(VolunteerId(3))));

        v.coordinates = Some(Coordinates::new(28.61, 77.21));
        assert!(reg.place(MarkerSource::Volunteer(&v)).is_new());
        assert_eq!(reg.map().markers_at(Coordinates::new(28.61, 77.21)).len(), 1);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_bounds_enclosing() {
        assert_eq!(Bounds::enclosing(Vec::new()), None);
        let b = Bounds::enclosing(vec![Coordinates::new(1.0, 2.0)]).expect("one point");
        assert_eq!(b.south, b.north);
        assert_eq!(b.west, b.east);
    }
}
