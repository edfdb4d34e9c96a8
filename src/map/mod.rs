/// Map-side state for the crisis map.
///
/// Submodules:
/// - `markers` : the marker registry and the `MapWidget` seam it draws through.
/// - `icons`   : marker artwork per hazard type and for volunteers.
/// - `popup`   : popup markup bound to each marker.
/// - `memory`  : an in-memory `MapWidget` for headless runs and tests.

pub mod icons;
pub mod markers;
pub mod memory;
pub mod popup;

pub use markers::{Bounds, MapWidget, MarkerHandle, MarkerKey, MarkerRegistry, MarkerSource, Placement};
pub use memory::MemoryMap;
