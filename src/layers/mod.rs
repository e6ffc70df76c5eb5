pub mod marker;
pub mod overlay;

pub use marker::{AccuracyCircle, Marker, MarkerStyle};
pub use overlay::{Overlay, OverlaySlot};
