//! PDF map variant: text-layer labels instead of dataset coordinates.

pub mod backend;
pub mod viewer;
pub mod zoom;

pub use backend::{PdfBackend, PdfSource, TextLayerBackend};
pub use viewer::PdfViewer;
pub use zoom::ZoomState;
