use crate::{layers::overlay::Overlay, ui::effects::UiEffect};

/// Anything that turns controller effects into pixels
pub trait Presenter {
    fn present(&mut self, effect: &UiEffect);

    fn present_all(&mut self, effects: &[UiEffect]) {
        for effect in effects {
            self.present(effect);
        }
    }
}

/// Presenter that keeps what it was told to show.
///
/// Used by the tests and by the viewer binary, which redraws from this state
/// every frame.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub log: Vec<UiEffect>,
    pub overlay: Option<Overlay>,
    pub status: Option<String>,
    pub list_error: Option<String>,
    pub alerts: Vec<String>,
    pub menu: Option<crate::ui::effects::MenuModal>,
    pub zoom_label: Option<String>,
    pub list_refreshes: usize,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains pending alerts
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, effect: &UiEffect) {
        match effect {
            UiEffect::RefreshList => {
                self.list_refreshes += 1;
                self.list_error = None;
            }
            UiEffect::ClearOverlay => self.overlay = None,
            UiEffect::PlaceOverlay(overlay) => {
                if self.overlay.is_some() {
                    log::warn!("overlay placed without clearing the previous one");
                }
                self.overlay = Some(overlay.clone());
            }
            UiEffect::OpenMenu(modal) => self.menu = Some(modal.clone()),
            UiEffect::CloseMenu => self.menu = None,
            UiEffect::Alert(message) => self.alerts.push(message.clone()),
            UiEffect::Status(message) => self.status = Some(message.clone()),
            UiEffect::ListError(message) => self.list_error = Some(message.clone()),
            UiEffect::Rescale { label, .. } => self.zoom_label = Some(label.clone()),
            UiEffect::SetView { .. } | UiEffect::ScrollTo(_) => {}
        }
        self.log.push(effect.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bounds::Bounds;

    #[test]
    fn test_recording_presenter_tracks_state() {
        let mut presenter = RecordingPresenter::new();
        presenter.present_all(&[
            UiEffect::ListError("boom".to_string()),
            UiEffect::PlaceOverlay(Overlay::Highlights(vec![Bounds::from_rect(
                0.0, 0.0, 1.0, 1.0,
            )])),
            UiEffect::Alert("a".to_string()),
            UiEffect::ClearOverlay,
            UiEffect::RefreshList,
        ]);

        assert!(presenter.overlay.is_none());
        assert!(presenter.list_error.is_none());
        assert_eq!(presenter.list_refreshes, 1);
        assert_eq!(presenter.take_alerts(), vec!["a".to_string()]);
        assert!(presenter.alerts.is_empty());
        assert_eq!(presenter.log.len(), 5);
    }
}
