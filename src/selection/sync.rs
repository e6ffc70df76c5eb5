//! Selection → exactly one spatial focus operation.
//!
//! Every focus goes the same way: retire the previous overlay, place the new
//! one, recenter on the first target. Multi-location facilities are the
//! exception: clicking the facility row only opens or closes its location
//! list, and the viewport stays where it is.

use crate::{
    core::bounds::Bounds,
    data::{
        labels::LabelIndex,
        model::{ViewFacility, ViewLocation, ViewModel},
    },
    layers::{
        marker::{AccuracyCircle, Marker, MarkerStyle},
        overlay::{Overlay, OverlaySlot},
    },
    selection::geolocation::GeoFix,
    ui::effects::UiEffect,
};

const USER_MARKER_ID: &str = "user-location";

/// What the user currently has selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveSelection {
    Facility(String),
    Location {
        facility_id: String,
        location_id: String,
    },
    Label(String),
    UserPosition,
}

/// Result of a selection step: an optional replacement model plus effects
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncUpdate {
    pub model: Option<ViewModel>,
    pub effects: Vec<UiEffect>,
}

impl SyncUpdate {
    fn effects(effects: Vec<UiEffect>) -> Self {
        Self {
            model: None,
            effects,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionSync {
    active: Option<ActiveSelection>,
    overlay: OverlaySlot,
}

impl SelectionSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveSelection> {
        self.active.as_ref()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.active()
    }

    pub fn active_facility_id(&self) -> Option<&str> {
        match &self.active {
            Some(ActiveSelection::Facility(id)) => Some(id),
            Some(ActiveSelection::Location { facility_id, .. }) => Some(facility_id),
            _ => None,
        }
    }

    pub fn active_label(&self) -> Option<&str> {
        match &self.active {
            Some(ActiveSelection::Label(label)) => Some(label),
            _ => None,
        }
    }

    /// Facility row click: toggle for multi-location facilities, jump otherwise
    pub fn click_facility(
        &mut self,
        model: &ViewModel,
        facility_id: &str,
        zoom: Option<f64>,
    ) -> SyncUpdate {
        let Some(facility) = model.facility(facility_id) else {
            log::debug!("click on unknown facility {}", facility_id);
            return SyncUpdate::default();
        };

        if facility.is_multi_location() {
            let mut next = model.clone();
            let expanded = match next.facility_mut(facility_id) {
                Some(f) => {
                    f.expanded = !f.expanded;
                    f.expanded
                }
                None => return SyncUpdate::default(),
            };
            log::debug!("{} sub-list expanded: {}", facility.name, expanded);
            return SyncUpdate {
                model: Some(next),
                effects: vec![UiEffect::RefreshList],
            };
        }

        let Some(location) = facility.locations.first() else {
            return SyncUpdate::default();
        };
        let marker = facility_marker(facility, location);
        let mut effects = self.focus(Overlay::Marker(marker), point_view(location, zoom));
        self.active = Some(ActiveSelection::Facility(facility.id.clone()));
        effects.push(UiEffect::RefreshList);
        SyncUpdate::effects(effects)
    }

    /// Location row click always jumps
    pub fn click_location(
        &mut self,
        model: &ViewModel,
        facility_id: &str,
        location_id: &str,
        zoom: Option<f64>,
    ) -> SyncUpdate {
        let Some(facility) = model.facility(facility_id) else {
            return SyncUpdate::default();
        };
        let Some(location) = facility.location(location_id) else {
            log::debug!("click on unknown location {} of {}", location_id, facility_id);
            return SyncUpdate::default();
        };

        let marker = facility_marker(facility, location);
        let mut effects = self.focus(Overlay::Marker(marker), point_view(location, zoom));
        self.active = Some(ActiveSelection::Location {
            facility_id: facility.id.clone(),
            location_id: location.id.clone(),
        });
        effects.push(UiEffect::RefreshList);
        SyncUpdate::effects(effects)
    }

    /// PDF label click; `None` when the label has no boxes
    pub fn select_label(&mut self, index: &LabelIndex, label: &str) -> Option<Vec<UiEffect>> {
        let boxes = index.boxes(label);
        self.active = Some(ActiveSelection::Label(label.to_string()));

        let first: Bounds = *boxes.first()?;
        Some(self.focus(
            Overlay::Highlights(boxes.to_vec()),
            UiEffect::ScrollTo(first),
        ))
    }

    /// Geolocation fix: fixed-style marker plus accuracy circle
    pub fn show_position(
        &mut self,
        fix: &GeoFix,
        default_radius_m: f64,
        recenter: bool,
        zoom: Option<f64>,
    ) -> Vec<UiEffect> {
        let marker = Marker::new(USER_MARKER_ID.to_string(), fix.position)
            .with_style(MarkerStyle::UserLocation);
        let circle = AccuracyCircle {
            center: fix.position,
            radius_m: fix.radius_m(default_radius_m),
        };

        let overlay = Overlay::PositionFix { marker, circle };
        let mut effects = self.retire();
        effects.push(UiEffect::PlaceOverlay(overlay.clone()));
        self.overlay.place(overlay);
        if recenter {
            effects.push(UiEffect::SetView {
                center: fix.position,
                zoom,
            });
        }
        self.active = Some(ActiveSelection::UserPosition);
        effects
    }

    /// Drops the selection if filtering hid it
    pub fn retain_visible(&mut self, model: &ViewModel) -> Vec<UiEffect> {
        let still_visible = match &self.active {
            Some(ActiveSelection::Facility(id)) => model.facility(id).is_some_and(|f| f.visible),
            Some(ActiveSelection::Location {
                facility_id,
                location_id,
            }) => model
                .facility(facility_id)
                .filter(|f| f.visible)
                .and_then(|f| f.location(location_id))
                .is_some_and(|l| l.visible),
            _ => true,
        };

        if still_visible {
            Vec::new()
        } else {
            self.clear()
        }
    }

    /// Drops a label selection that the current search no longer lists
    pub fn retain_labels(&mut self, listed: &[&str]) -> Vec<UiEffect> {
        match self.active_label() {
            Some(label) if !listed.contains(&label) => self.clear(),
            _ => Vec::new(),
        }
    }

    /// Forgets the selection and retires any overlay
    pub fn clear(&mut self) -> Vec<UiEffect> {
        self.active = None;
        self.retire()
    }

    fn retire(&mut self) -> Vec<UiEffect> {
        match self.overlay.clear() {
            Some(_) => vec![UiEffect::ClearOverlay],
            None => Vec::new(),
        }
    }

    fn focus(&mut self, overlay: Overlay, recenter: UiEffect) -> Vec<UiEffect> {
        let mut effects = self.retire();
        effects.push(recenter);
        effects.push(UiEffect::PlaceOverlay(overlay.clone()));
        self.overlay.place(overlay);
        effects
    }
}

fn facility_marker(facility: &ViewFacility, location: &ViewLocation) -> Marker {
    let popup = if facility.is_multi_location() {
        format!("{} · {}", facility.name, location.label)
    } else {
        facility.name.clone()
    };
    Marker::new(location.id.clone(), location.position).with_popup(popup)
}

fn point_view(location: &ViewLocation, zoom: Option<f64>) -> UiEffect {
    UiEffect::SetView {
        center: location.position,
        zoom,
    }
}
