//! Configuration for the facility map, the geolocation flow and the PDF viewer
//!
//! Everything is defaulted so a config file only needs the fields it wants to
//! change. Geolocation behaviour is picked through platform presets that
//! resolve into concrete request options, the same way performance profiles
//! resolve into tuning options.

use crate::core::constants::{
    DEFAULT_ACCURACY_RADIUS_M, DEFAULT_CENTER, DEFAULT_PDF_URL, DEFAULT_ZOOM, FOCUS_ZOOM,
    INITIAL_SCALE, MAX_SCALE, MIN_LABEL_LENGTH, MIN_SCALE, SCALE_STEP,
};
use crate::core::geo::LatLng;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Platform the locate-me flow runs on.
///
/// Only the iOS preset carries a fallback attempt: its high-accuracy fix
/// fails often enough indoors that a coarse second request is worth one try.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum PlatformProfile {
    #[default]
    Desktop,
    Android,
    Ios,
    Custom(GeolocationOptions),
}

impl PlatformProfile {
    pub fn resolve(&self) -> GeolocationOptions {
        match self {
            Self::Desktop | Self::Android => GeolocationOptions {
                primary: PositionOptions {
                    enable_high_accuracy: true,
                    timeout_ms: 10_000,
                    maximum_age_ms: 0,
                },
                fallback: None,
            },
            Self::Ios => GeolocationOptions {
                primary: PositionOptions {
                    enable_high_accuracy: true,
                    timeout_ms: 10_000,
                    maximum_age_ms: 0,
                },
                fallback: Some(PositionOptions {
                    enable_high_accuracy: false,
                    timeout_ms: 15_000,
                    maximum_age_ms: 60_000,
                }),
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

/// Options handed to the platform for a single position request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

/// Primary request options plus the optional one-shot fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeolocationOptions {
    pub primary: PositionOptions,
    pub fallback: Option<PositionOptions>,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        PlatformProfile::default().resolve()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParkMapConfig {
    pub dataset: DatasetConfig,
    pub map: MapViewConfig,
    pub geolocation: GeolocationConfig,
    pub pdf: PdfViewConfig,
}

impl ParkMapConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::debug!("loaded config from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.map.validate()?;
        self.pdf.validate()
    }
}

/// Where the facility dataset comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatasetConfig {
    pub url: Option<String>,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    /// Zoom applied when jumping to a facility location
    pub focus_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fit the viewport to the dataset after each load
    pub fit_on_load: bool,
}

impl MapViewConfig {
    /// Rejects NaN and inverted zoom limits before they reach a clamp
    pub fn validate(&self) -> Result<()> {
        if !(self.min_zoom <= self.max_zoom) {
            return Err(Error::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !self.center.is_finite() || !self.zoom.is_finite() {
            return Err(Error::Config("map center and zoom must be finite".to_string()));
        }
        Ok(())
    }
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            focus_zoom: FOCUS_ZOOM,
            min_zoom: 12.0,
            max_zoom: 19.0,
            fit_on_load: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub profile: PlatformProfile,
    pub default_accuracy_radius_m: f64,
    pub recenter_on_fix: bool,
    pub zoom_on_fix: Option<f64>,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            profile: PlatformProfile::default(),
            default_accuracy_radius_m: DEFAULT_ACCURACY_RADIUS_M,
            recenter_on_fix: true,
            zoom_on_fix: Some(FOCUS_ZOOM),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfViewConfig {
    pub default_url: String,
    pub initial_scale: f64,
    pub scale_step: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub min_label_length: usize,
}

impl PdfViewConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_scale <= self.max_scale)
            || !(self.scale_step > 0.0)
            || !self.initial_scale.is_finite()
        {
            return Err(Error::Config(format!(
                "invalid PDF scale range [{}, {}] step {}",
                self.min_scale, self.max_scale, self.scale_step
            )));
        }
        Ok(())
    }
}

impl Default for PdfViewConfig {
    fn default() -> Self {
        Self {
            default_url: DEFAULT_PDF_URL.to_string(),
            initial_scale: INITIAL_SCALE,
            scale_step: SCALE_STEP,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            min_label_length: MIN_LABEL_LENGTH,
        }
    }
}
