pub mod effects;
pub mod list;
pub mod presenter;

#[cfg(feature = "egui")]
pub mod panel;

pub use effects::{MenuModal, UiEffect};
pub use list::{facility_rows, label_rows, ListRow};
pub use presenter::{Presenter, RecordingPresenter};

#[cfg(feature = "egui")]
pub use panel::{facility_panel, list_rows, menu_window, pdf_page, pdf_panel, DotMap, PanelAction};
