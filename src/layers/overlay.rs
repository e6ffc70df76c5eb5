//! The single active spatial overlay.
//!
//! At most one marker, position fix or highlight set is on screen. Placing a
//! new overlay hands back the previous one so the caller can retire it before
//! anything new is drawn.

use crate::{
    core::bounds::Bounds,
    layers::marker::{AccuracyCircle, Marker},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Overlay {
    /// Facility or location pin
    Marker(Marker),
    /// User position: fixed-style marker plus accuracy circle
    PositionFix {
        marker: Marker,
        circle: AccuracyCircle,
    },
    /// Highlight boxes over a rendered PDF page
    Highlights(Vec<Bounds>),
}

impl Overlay {
    pub fn kind(&self) -> &'static str {
        match self {
            Overlay::Marker(_) => "marker",
            Overlay::PositionFix { .. } => "position-fix",
            Overlay::Highlights(_) => "highlights",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlaySlot {
    active: Option<Overlay>,
}

impl OverlaySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&Overlay> {
        self.active.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    /// Installs `overlay`, returning the one it retired
    pub fn place(&mut self, overlay: Overlay) -> Option<Overlay> {
        let retired = self.active.replace(overlay);
        if let Some(old) = &retired {
            log::debug!("retired {} overlay", old.kind());
        }
        retired
    }

    pub fn clear(&mut self) -> Option<Overlay> {
        self.active.take()
    }
}
