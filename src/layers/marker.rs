use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

/// Visual flavour of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerStyle {
    /// Default pin for a facility location
    Facility,
    /// Fixed-style dot for the user's own position
    UserLocation,
}

impl std::fmt::Display for MarkerStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerStyle::Facility => write!(f, "facility"),
            MarkerStyle::UserLocation => write!(f, "user-location"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    id: String,
    position: LatLng,
    style: MarkerStyle,
    popup_text: Option<String>,
}

impl Marker {
    pub fn new(id: String, position: LatLng) -> Self {
        Self {
            id,
            position,
            style: MarkerStyle::Facility,
            popup_text: None,
        }
    }

    pub fn with_popup(mut self, text: String) -> Self {
        self.popup_text = Some(text);
        self
    }

    pub fn with_style(mut self, style: MarkerStyle) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn style(&self) -> MarkerStyle {
        self.style
    }

    pub fn popup_text(&self) -> Option<&str> {
        self.popup_text.as_deref()
    }

    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds::new(self.position, self.position)
    }
}

/// Circle around a geolocation fix, radius in metres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyCircle {
    pub center: LatLng,
    pub radius_m: f64,
}
