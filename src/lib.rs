//! # parkmap
//!
//! Theme-park facility directory engine.
//!
//! Raw facility records are normalized into a zone-grouped view model,
//! filtered by free text and zone, and every selection is turned into a
//! single spatial focus on either an interactive map or a rendered PDF map.
//! Controllers return [`ui::UiEffect`]s; the egui adapter behind the `egui`
//! feature is one way of presenting them.

pub mod core;
pub mod data;
pub mod layers;
pub mod pdf;
pub mod prelude;
pub mod search;
pub mod selection;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::Bounds,
    config::{ParkMapConfig, PlatformProfile},
    geo::{LatLng, LatLngBounds, Point},
    map::FacilityMap,
    viewport::{ScrollViewport, Viewport},
};

pub use data::{
    source::{DatasetSource, HttpSource, MergedSource, StaticSource},
    FacilityNormalizer, LabelIndex, LabelNormalizer, ViewModel,
};

#[cfg(feature = "tokio-runtime")]
pub use data::source::FileSource;

pub use pdf::{PdfBackend, PdfSource, PdfViewer};

pub use search::FilterState;

pub use selection::{GeoFix, GeolocationError, GeolocationErrorCode, Geolocator};

pub use ui::{ListRow, Presenter, UiEffect};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum ParkMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("{0}")]
    PdfLoad(String),

    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("Collation error: {0}")]
    Collation(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = ParkMapError;

/// Installs `env_logger` with `parkmap` at info level unless `RUST_LOG` says otherwise
#[cfg(feature = "debug")]
pub fn init_logging() {
    let result = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("parkmap=info"),
    )
    .try_init();
    if result.is_err() {
        log::debug!("logger already installed");
    }
}
