//! egui rendering of the facility list, the menu modal, a projected dot map
//! and the PDF label page.

use crate::{
    core::{
        bounds::Bounds,
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    data::labels::LabelIndex,
    layers::{marker::MarkerStyle, overlay::Overlay},
    ui::{effects::MenuModal, list::ListRow},
};
use egui::{Color32, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2, Widget};

/// What the user did in the side panel this frame
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    SetQuery(String),
    SetZone(String),
    ToggleCategory(String),
    ClickFacility(String),
    ClickLocation {
        facility_id: String,
        location_id: String,
    },
    OpenMenu(String),
    SelectLabel(String),
    Locate,
    ReloadDefault,
    LoadUrl(String),
    LoadFile(String),
    ZoomIn,
    ZoomOut,
}

/// Search box, zone combo and the list rows
pub fn facility_panel(
    ui: &mut Ui,
    query: &mut String,
    zone: &str,
    zones: &[String],
    rows: &[ListRow],
) -> Vec<PanelAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        if ui.text_edit_singleline(query).changed() {
            actions.push(PanelAction::SetQuery(query.clone()));
        }
        if ui.button("📍").on_hover_text("定位").clicked() {
            actions.push(PanelAction::Locate);
        }
    });

    egui::ComboBox::from_id_source("zone-filter")
        .selected_text(zone)
        .show_ui(ui, |ui| {
            for name in zones {
                if ui.selectable_label(name == zone, name.as_str()).clicked() && name != zone {
                    actions.push(PanelAction::SetZone(name.clone()));
                }
            }
        });

    ui.separator();
    egui::ScrollArea::vertical().show(ui, |ui| {
        list_rows(ui, rows, &mut actions);
    });
    actions
}

/// Source controls, zoom, status line, search box and the label rows
pub fn pdf_panel(
    ui: &mut Ui,
    query: &mut String,
    url: &mut String,
    file: &mut String,
    status: &str,
    zoom_label: &str,
    rows: &[ListRow],
) -> Vec<PanelAction> {
    let mut actions = Vec::new();

    if ui.button("預設地圖").clicked() {
        actions.push(PanelAction::ReloadDefault);
    }
    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(url).hint_text("PDF 網址"));
        if ui.button("載入網址").clicked() {
            actions.push(PanelAction::LoadUrl(url.clone()));
        }
    });
    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(file).hint_text("本機檔案路徑"));
        if ui.button("開啟檔案").clicked() {
            actions.push(PanelAction::LoadFile(file.clone()));
        }
    });

    ui.horizontal(|ui| {
        if ui.button("−").clicked() {
            actions.push(PanelAction::ZoomOut);
        }
        ui.label(zoom_label);
        if ui.button("+").clicked() {
            actions.push(PanelAction::ZoomIn);
        }
    });
    ui.add(egui::Label::new(egui::RichText::new(status).small()).wrap(true));

    ui.separator();
    if ui
        .add(egui::TextEdit::singleline(query).hint_text("搜尋標籤"))
        .changed()
    {
        actions.push(PanelAction::SetQuery(query.clone()));
    }
    egui::ScrollArea::vertical().id_source("label-list").show(ui, |ui| {
        list_rows(ui, rows, &mut actions);
    });
    actions
}

pub fn list_rows(ui: &mut Ui, rows: &[ListRow], actions: &mut Vec<PanelAction>) {
    for row in rows {
        match row {
            ListRow::Category {
                name,
                collapsed,
                count,
            } => {
                let arrow = if *collapsed { "▸" } else { "▾" };
                let text = egui::RichText::new(format!("{} {} ({})", arrow, name, count)).strong();
                if ui.selectable_label(false, text).clicked() {
                    actions.push(PanelAction::ToggleCategory(name.clone()));
                }
            }
            ListRow::Facility {
                id,
                name,
                location_count,
                expanded,
                offers_menu,
                active,
            } => {
                ui.horizontal(|ui| {
                    ui.add_space(12.0);
                    let text = if *location_count > 1 {
                        let arrow = if *expanded { "▾" } else { "▸" };
                        format!("{} {} ×{}", arrow, name, location_count)
                    } else {
                        name.clone()
                    };
                    if ui.selectable_label(*active, text).clicked() {
                        actions.push(PanelAction::ClickFacility(id.clone()));
                    }
                    if *offers_menu && ui.small_button("菜單").clicked() {
                        actions.push(PanelAction::OpenMenu(id.clone()));
                    }
                });
            }
            ListRow::Location {
                facility_id,
                id,
                label,
                active,
            } => {
                ui.horizontal(|ui| {
                    ui.add_space(28.0);
                    if ui.selectable_label(*active, label.as_str()).clicked() {
                        actions.push(PanelAction::ClickLocation {
                            facility_id: facility_id.clone(),
                            location_id: id.clone(),
                        });
                    }
                });
            }
            ListRow::Label { label, active } => {
                if ui.selectable_label(*active, label.as_str()).clicked() {
                    actions.push(PanelAction::SelectLabel(label.clone()));
                }
            }
            ListRow::Empty(message) => {
                ui.weak(message.as_str());
            }
        }
    }
}

/// Menu window; returns false once the user closed it
pub fn menu_window(ctx: &egui::Context, modal: &MenuModal) -> bool {
    let mut open = true;
    egui::Window::new(modal.title.as_str())
        .id(egui::Id::new(("menu", &modal.facility_id)))
        .collapsible(false)
        .open(&mut open)
        .show(ctx, |ui| {
            for item in &modal.items {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(item.title()).strong());
                    if let Some(price) = item.formatted_price() {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(price);
                        });
                    }
                });
                if let Some(subtitle) = item.subtitle() {
                    ui.weak(subtitle);
                }
                ui.separator();
            }
        });
    open
}

/// Web-mercator dot plot of facility locations with the active overlay.
///
/// Dragging pans the viewport, the corner buttons zoom it.
pub struct DotMap<'a> {
    viewport: &'a mut Viewport,
    dots: Vec<LatLng>,
    overlay: Option<Overlay>,
    size: Option<Vec2>,
}

impl<'a> DotMap<'a> {
    pub fn new(viewport: &'a mut Viewport, dots: Vec<LatLng>) -> Self {
        Self {
            viewport,
            dots,
            overlay: None,
            size: None,
        }
    }

    pub fn overlay(mut self, overlay: Option<Overlay>) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }

    fn to_screen(&self, rect: Rect, position: &LatLng) -> Pos2 {
        let pixel = self.viewport.lat_lng_to_pixel(position);
        rect.min + Vec2::new(pixel.x as f32, pixel.y as f32)
    }

    fn metres_to_pixels(&self, metres: f64) -> f32 {
        let metres_per_pixel = 156_543.033_92 * self.viewport.center.lat.to_radians().cos()
            / 2_f64.powf(self.viewport.zoom);
        (metres / metres_per_pixel) as f32
    }
}

impl Widget for DotMap<'_> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let desired_size = self.size.unwrap_or_else(|| ui.available_size());
        let (rect, mut response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());
        self.viewport
            .set_size(Point::new(rect.width() as f64, rect.height() as f64));

        if response.dragged() {
            let delta = response.drag_delta();
            if delta.length_sq() > 0.5 {
                self.viewport
                    .pan_by(&Point::new(delta.x as f64, delta.y as f64));
                response.mark_changed();
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(232, 240, 226));

        for dot in &self.dots {
            let pos = self.to_screen(rect, dot);
            if rect.contains(pos) {
                painter.circle_filled(pos, 3.5, Color32::from_rgb(60, 110, 180));
            }
        }

        match &self.overlay {
            Some(Overlay::Marker(marker)) => {
                let pos = self.to_screen(rect, &marker.position());
                painter.circle_filled(pos, 7.0, Color32::from_rgb(220, 60, 50));
                painter.circle_stroke(pos, 7.0, Stroke::new(2.0, Color32::WHITE));
                if let Some(text) = marker.popup_text() {
                    painter.text(
                        pos + Vec2::new(0.0, -12.0),
                        egui::Align2::CENTER_BOTTOM,
                        text,
                        egui::FontId::proportional(13.0),
                        Color32::BLACK,
                    );
                }
            }
            Some(Overlay::PositionFix { marker, circle }) => {
                let pos = self.to_screen(rect, &circle.center);
                let radius = self.metres_to_pixels(circle.radius_m);
                painter.circle(
                    pos,
                    radius,
                    Color32::from_rgba_unmultiplied(30, 136, 229, 40),
                    Stroke::new(1.0, Color32::from_rgb(30, 136, 229)),
                );
                let fill = match marker.style() {
                    MarkerStyle::UserLocation => Color32::from_rgb(30, 136, 229),
                    MarkerStyle::Facility => Color32::from_rgb(220, 60, 50),
                };
                painter.circle_filled(pos, 6.0, fill);
                painter.circle_stroke(pos, 6.0, Stroke::new(2.0, Color32::WHITE));
            }
            Some(Overlay::Highlights(_)) | None => {}
        }

        let control_size = 30.0;
        let zoom_in_rect = Rect::from_min_size(
            rect.right_top() + Vec2::new(-40.0, 10.0),
            Vec2::splat(control_size),
        );
        let zoom_out_rect = Rect::from_min_size(
            rect.right_top() + Vec2::new(-40.0, 45.0),
            Vec2::splat(control_size),
        );
        for (control, label, delta) in [(zoom_in_rect, "+", 1.0), (zoom_out_rect, "−", -1.0)] {
            if ui.allocate_rect(control, Sense::click()).clicked() {
                let zoom = self.viewport.zoom + delta;
                self.viewport.set_zoom(zoom);
                response.mark_changed();
            }
            painter.rect_filled(control, 3.0, Color32::from_rgba_unmultiplied(255, 255, 255, 220));
            painter.rect_stroke(control, 3.0, Stroke::new(1.0, Color32::from_gray(100)));
            painter.text(
                control.center(),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(16.0),
                Color32::BLACK,
            );
        }

        response
    }
}

/// Rendered PDF page: every label box outlined, the active highlights on top.
///
/// `scroll_to` jumps the container to a page offset. Returns the visible
/// size of the container so the caller can re-render on resize.
pub fn pdf_page(
    ui: &mut Ui,
    index: &LabelIndex,
    highlights: &[Bounds],
    scroll_to: Option<Point>,
) -> Vec2 {
    let extent = index
        .labels()
        .iter()
        .flat_map(|label| index.boxes(label))
        .fold(Vec2::splat(200.0), |extent, b| {
            extent.max(Vec2::new(b.max.x as f32, b.max.y as f32))
        });

    let mut area = egui::ScrollArea::both()
        .id_source("pdf-page")
        .auto_shrink([false; 2]);
    if let Some(offset) = scroll_to {
        area = area.scroll_offset(Vec2::new(offset.x as f32, offset.y as f32));
    }

    let output = area.show(ui, |ui| {
        let (rect, _) = ui.allocate_exact_size(extent + Vec2::splat(40.0), Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::WHITE);

        let to_screen = |b: &Bounds| {
            Rect::from_min_max(
                rect.min + Vec2::new(b.min.x as f32, b.min.y as f32),
                rect.min + Vec2::new(b.max.x as f32, b.max.y as f32),
            )
        };

        for label in index.labels() {
            for b in index.boxes(label) {
                let r = to_screen(b);
                painter.rect_stroke(r, 0.0, Stroke::new(0.5, Color32::from_gray(190)));
                painter.text(
                    r.left_center(),
                    egui::Align2::LEFT_CENTER,
                    label,
                    egui::FontId::proportional((r.height() * 0.8).max(6.0)),
                    Color32::from_gray(40),
                );
            }
        }

        for b in highlights {
            painter.rect(
                to_screen(b),
                2.0,
                Color32::from_rgba_unmultiplied(255, 214, 0, 90),
                Stroke::new(2.0, Color32::from_rgb(230, 120, 0)),
            );
        }
    });

    output.inner_rect.size()
}
