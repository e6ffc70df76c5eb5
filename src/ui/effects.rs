use crate::{
    core::{bounds::Bounds, geo::LatLng},
    data::model::{MenuItem, ViewFacility},
    layers::overlay::Overlay,
};
use serde::{Deserialize, Serialize};

/// One instruction for the presentation layer.
///
/// Controllers never touch widgets directly; they return effects in the
/// order they must be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiEffect {
    /// Rebuild the list from the controller's current model
    RefreshList,
    /// Remove the active marker/circle/highlights
    ClearOverlay,
    /// Draw a new overlay (always preceded by `ClearOverlay` when one existed)
    PlaceOverlay(Overlay),
    /// Recenter the map, optionally zooming
    SetView { center: LatLng, zoom: Option<f64> },
    /// Scroll the PDF container so the box is centered
    ScrollTo(Bounds),
    /// Show the menu modal
    OpenMenu(MenuModal),
    CloseMenu,
    /// Blocking alert (geolocation failures)
    Alert(String),
    /// Status line text (PDF viewer)
    Status(String),
    /// Error shown in place of the list (dataset fetch failures)
    ListError(String),
    /// Re-render the PDF page at a new scale; carries the zoom label
    Rescale { scale: f64, label: String },
}

/// Content of the menu modal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuModal {
    pub facility_id: String,
    pub title: String,
    pub items: Vec<MenuItem>,
}

impl MenuModal {
    /// Only restaurants with a non-empty sanitized menu get a modal
    pub fn for_facility(facility: &ViewFacility) -> Option<Self> {
        if !facility.offers_menu() {
            return None;
        }
        Some(Self {
            facility_id: facility.id.clone(),
            title: facility.name.clone(),
            items: facility.menu.clone(),
        })
    }
}
