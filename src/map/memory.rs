/// In-memory map widget.
///
/// Records markers, the viewport and the open popup instead of drawing them.
/// Backs the headless binary and the test suites.

use crate::map::icons::MarkerIcon;
use crate::map::markers::{Bounds, MapWidget, MarkerHandle};
use crate::model::Coordinates;

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMarker {
    pub handle: MarkerHandle,
    pub at: Coordinates,
    pub icon_url: &'static str,
    pub popup_html: String,
}

#[derive(Debug)]
pub struct MemoryMap {
    markers: Vec<MemoryMarker>,
    center: Coordinates,
    zoom: u8,
    last_fit: Option<(Bounds, u32)>,
    fit_calls: usize,
    open_popup: Option<MarkerHandle>,
    next_handle: u64,
}

impl MemoryMap {
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        Self {
            markers: Vec::new(),
            center,
            zoom,
            last_fit: None,
            fit_calls: 0,
            open_popup: None,
            next_handle: 1,
        }
    }

    pub fn markers(&self) -> &[MemoryMarker] {
        &self.markers
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&MemoryMarker> {
        self.markers.iter().find(|m| m.handle == handle)
    }

    pub fn markers_at(&self, at: Coordinates) -> Vec<&MemoryMarker> {
        self.markers.iter().filter(|m| m.at == at).collect()
    }

    /// Current center and zoom.
    pub fn view(&self) -> (Coordinates, u8) {
        (self.center, self.zoom)
    }

    pub fn last_fit(&self) -> Option<(Bounds, u32)> {
        self.last_fit
    }

    pub fn fit_calls(&self) -> usize {
        self.fit_calls
    }

    pub fn popup_open(&self) -> Option<MarkerHandle> {
        self.open_popup
    }
}

impl MapWidget for MemoryMap {
    fn add_marker(&mut self, at: Coordinates, icon: &'static MarkerIcon, popup_html: String) -> MarkerHandle {
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;
        self.markers.push(MemoryMarker {
            handle,
            at,
            icon_url: icon.url,
            popup_html,
        });
        handle
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32) {
        self.center = Coordinates::new(
            (bounds.south + bounds.north) / 2.0,
            (bounds.west + bounds.east) / 2.0,
        );
        self.last_fit = Some((bounds, padding_px));
        self.fit_calls += 1;
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
    }

    fn open_popup(&mut self, marker: MarkerHandle) {
        self.open_popup = Some(marker);
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        self.markers.retain(|m| m.handle != marker);
        if self.open_popup == Some(marker) {
            self.open_popup = None;
        }
    }
}
