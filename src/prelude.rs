//! Prelude module for common parkmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use parkmap::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{
        DatasetConfig, GeolocationConfig, GeolocationOptions, MapViewConfig, ParkMapConfig,
        PdfViewConfig, PlatformProfile, PositionOptions,
    },
    geo::{LatLng, LatLngBounds, Point},
    map::FacilityMap,
    viewport::{ScrollViewport, Viewport},
};

pub use crate::data::{
    labels::{LabelIndex, LabelNormalizer, TextFragment, TextLayer},
    model::{MenuItem, ViewFacility, ViewLocation, ViewModel, ZoneCategory},
    normalizer::{FacilityNormalizer, NameCollator},
    record::FacilityRecord,
    source::{DatasetSource, HttpSource, MergedSource, StaticSource},
    zones::ZoneFilter,
    NormalizeStrategy, SpatialCatalog, SpatialTarget,
};

#[cfg(feature = "tokio-runtime")]
pub use crate::data::source::FileSource;

pub use crate::layers::{
    marker::{AccuracyCircle, Marker, MarkerStyle},
    overlay::{Overlay, OverlaySlot},
};

pub use crate::pdf::{PdfBackend, PdfSource, PdfViewer, TextLayerBackend, ZoomState};

pub use crate::search::filter::FilterState;

pub use crate::selection::{
    geolocation::{GeoFix, GeolocationError, GeolocationErrorCode, Geolocator, StaticGeolocator},
    sync::{ActiveSelection, SelectionSync},
};

pub use crate::ui::{
    effects::{MenuModal, UiEffect},
    list::ListRow,
    presenter::{Presenter, RecordingPresenter},
};

#[cfg(feature = "egui")]
pub use crate::ui::panel::{DotMap, PanelAction};

pub use crate::{Error as ParkMapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
