use serde::{Deserialize, Serialize};

/// Render scale of the PDF page, stepped by the zoom buttons
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomState {
    scale: f64,
    step: f64,
    min: f64,
    max: f64,
}

impl ZoomState {
    pub fn new(initial: f64, step: f64, min: f64, max: f64) -> Self {
        Self {
            scale: round_scale(initial.clamp(min, max)),
            step,
            min,
            max,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Moves `steps` button presses (negative zooms out).
    ///
    /// Returns the new scale, or `None` when the clamp left it unchanged.
    pub fn step_by(&mut self, steps: i32) -> Option<f64> {
        let target = self.scale + self.step * f64::from(steps);
        let next = round_scale(target.clamp(self.min, self.max));
        if next == self.scale {
            return None;
        }
        self.scale = next;
        Some(next)
    }

    pub fn zoom_in(&mut self) -> Option<f64> {
        self.step_by(1)
    }

    pub fn zoom_out(&mut self) -> Option<f64> {
        self.step_by(-1)
    }

    /// `140%` style label
    pub fn label(&self) -> String {
        format!("{}%", (self.scale * 100.0).round() as i64)
    }
}

impl Default for ZoomState {
    fn default() -> Self {
        use crate::core::constants::{INITIAL_SCALE, MAX_SCALE, MIN_SCALE, SCALE_STEP};
        Self::new(INITIAL_SCALE, SCALE_STEP, MIN_SCALE, MAX_SCALE)
    }
}

// Hundredths keep repeated 0.2 steps from drifting (1.4 + 0.2 != 1.6 in f64).
fn round_scale(scale: f64) -> f64 {
    (scale * 100.0).round() / 100.0
}
