use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use parkmap::{
    prelude::*,
    ui::panel::{facility_panel, menu_window, pdf_page, pdf_panel},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long, env = "PARKMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Dataset URL or file; repeat to merge several
    #[arg(short, long)]
    data: Vec<String>,

    /// Position reported by the locate button, as `lat,lng`
    #[arg(long)]
    at: Option<String>,

    /// Accuracy of `--at` in metres
    #[arg(long)]
    accuracy: Option<f64>,

    /// Geolocation platform preset
    #[arg(long, value_enum)]
    platform: Option<Platform>,

    /// Open the PDF label viewer instead; URL or file, default map when empty
    #[arg(long, value_name = "SOURCE", num_args = 0..=1, default_missing_value = "")]
    pdf: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Platform {
    Desktop,
    Android,
    Ios,
}

impl From<Platform> for PlatformProfile {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Desktop => PlatformProfile::Desktop,
            Platform::Android => PlatformProfile::Android,
            Platform::Ios => PlatformProfile::Ios,
        }
    }
}

fn main() -> Result<()> {
    parkmap::init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ParkMapConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ParkMapConfig::default(),
    };
    if let Some(platform) = cli.platform {
        config.geolocation.profile = platform.into();
    }

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("parkmap"),
        ..Default::default()
    };

    if let Some(pdf) = &cli.pdf {
        let viewer = PdfViewer::new(TextLayerBackend::new(), config.pdf.clone())
            .context("invalid PDF view config")?;
        let app = PdfApp::new(runtime, viewer, pdf_source(pdf));
        return eframe::run_native("parkmap-pdf", options, Box::new(move |_cc| Box::new(app)))
            .map_err(|e| anyhow::anyhow!("viewer exited: {}", e));
    }

    let geolocator = match &cli.at {
        Some(at) => StaticGeolocator::at(GeoFix::new(parse_lat_lng(at)?, cli.accuracy)),
        None => StaticGeolocator::failing(GeolocationErrorCode::PositionUnavailable),
    };
    let source = dataset_source(&cli.data, &config);
    let map = FacilityMap::new(config).context("invalid map config")?;

    eframe::run_native(
        "parkmap-app",
        options,
        Box::new(move |_cc| Box::new(ParkMapApp::new(runtime, map, source, geolocator))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited: {}", e))?;

    Ok(())
}

fn parse_lat_lng(text: &str) -> Result<LatLng> {
    let (lat, lng) = text.split_once(',').context("expected `lat,lng`")?;
    let lat: f64 = lat.trim().parse().context("latitude")?;
    let lng: f64 = lng.trim().parse().context("longitude")?;
    LatLng::try_new(lat, lng).context("coordinates out of range")
}

/// Blank selects the configured default document
fn pdf_source(location: &str) -> Option<PdfSource> {
    let location = location.trim();
    if location.is_empty() {
        None
    } else if location.starts_with("http://") || location.starts_with("https://") {
        Some(PdfSource::Url(location.to_string()))
    } else {
        Some(PdfSource::File(location.into()))
    }
}

fn dataset_source(data: &[String], config: &ParkMapConfig) -> Box<dyn DatasetSource> {
    let mut locations: Vec<String> = data.to_vec();
    if locations.is_empty() {
        locations.extend(config.dataset.url.clone());
        locations.extend(config.dataset.path.iter().map(|p| p.display().to_string()));
    }

    let mut parts: Vec<Box<dyn DatasetSource>> = locations
        .into_iter()
        .map(|location| -> Box<dyn DatasetSource> {
            if location.starts_with("http://") || location.starts_with("https://") {
                Box::new(HttpSource::new(location))
            } else {
                Box::new(FileSource::new(location))
            }
        })
        .collect();

    match parts.len() {
        0 => {
            log::warn!("no dataset configured; starting with an empty list");
            Box::new(StaticSource::new("[]"))
        }
        1 => parts.remove(0),
        _ => Box::new(MergedSource::new(parts)),
    }
}

struct ParkMapApp {
    runtime: tokio::runtime::Runtime,
    map: FacilityMap,
    source: Box<dyn DatasetSource>,
    geolocator: StaticGeolocator,
    presenter: RecordingPresenter,
    query: String,
}

impl ParkMapApp {
    fn new(
        runtime: tokio::runtime::Runtime,
        map: FacilityMap,
        source: Box<dyn DatasetSource>,
        geolocator: StaticGeolocator,
    ) -> Self {
        let mut app = Self {
            runtime,
            map,
            source,
            geolocator,
            presenter: RecordingPresenter::new(),
            query: String::new(),
        };
        app.reload();
        app
    }

    fn reload(&mut self) {
        let effects = self.runtime.block_on(self.map.load(self.source.as_ref()));
        self.presenter.present_all(&effects);
    }

    fn handle(&mut self, action: PanelAction) {
        let effects = match action {
            PanelAction::SetQuery(query) => self.map.set_query(&query),
            PanelAction::SetZone(label) => self.map.set_zone(ZoneFilter::from_label(&label)),
            PanelAction::ToggleCategory(name) => self.map.toggle_category(&name),
            PanelAction::ClickFacility(id) => self.map.click_facility(&id),
            PanelAction::ClickLocation {
                facility_id,
                location_id,
            } => self.map.click_location(&facility_id, &location_id),
            PanelAction::OpenMenu(id) => self.map.open_menu(&id),
            PanelAction::Locate => self.runtime.block_on(self.map.locate(&self.geolocator)),
            other => {
                log::debug!("{:?} has no effect on the facility map", other);
                Vec::new()
            }
        };
        self.presenter.present_all(&effects);
    }
}

impl eframe::App for ParkMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let zone = self.map.filter().zone.label().to_string();
        let zones = self.map.model().zone_names.clone();
        let rows = self.map.rows();
        let mut actions = Vec::new();

        egui::SidePanel::left("facility-list")
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.heading("設施");
                if let Some(error) = &self.presenter.list_error {
                    ui.colored_label(egui::Color32::from_rgb(200, 40, 40), error.as_str());
                    if ui.button("重新載入").clicked() {
                        actions.push(None);
                    }
                }
                actions.extend(
                    facility_panel(ui, &mut self.query, &zone, &zones, &rows)
                        .into_iter()
                        .map(Some),
                );
            });

        for action in actions {
            match action {
                Some(action) => self.handle(action),
                None => self.reload(),
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let dots: Vec<LatLng> = self
                .map
                .model()
                .visible_facilities()
                .flat_map(|f| f.visible_locations().map(|l| l.position))
                .collect();
            let overlay = self.map.selection().overlay().cloned();
            ui.add(DotMap::new(&mut self.map.viewport, dots).overlay(overlay));
        });

        if let Some(modal) = self.presenter.menu.clone() {
            if !menu_window(ctx, &modal) {
                let effects = self.map.close_menu();
                self.presenter.present_all(&effects);
            }
        }

        if let Some(message) = self.presenter.alerts.first().cloned() {
            egui::Window::new("定位")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message.as_str());
                    if ui.button("確定").clicked() {
                        self.presenter.alerts.remove(0);
                    }
                });
        }
    }
}

struct PdfApp {
    runtime: tokio::runtime::Runtime,
    viewer: PdfViewer<TextLayerBackend>,
    presenter: RecordingPresenter,
    query: String,
    url: String,
    file: String,
    scroll_to: Option<Point>,
}

impl PdfApp {
    fn new(
        runtime: tokio::runtime::Runtime,
        viewer: PdfViewer<TextLayerBackend>,
        source: Option<PdfSource>,
    ) -> Self {
        let mut app = Self {
            runtime,
            viewer,
            presenter: RecordingPresenter::new(),
            query: String::new(),
            url: String::new(),
            file: String::new(),
            scroll_to: None,
        };
        let effects = match source {
            Some(source) => app.runtime.block_on(app.viewer.load(source)),
            None => app.runtime.block_on(app.viewer.reload_default()),
        };
        app.apply(effects);
        app
    }

    fn apply(&mut self, effects: Vec<UiEffect>) {
        if effects.iter().any(|e| matches!(e, UiEffect::ScrollTo(_))) {
            self.scroll_to = Some(self.viewer.scroll().scroll);
        }
        self.presenter.present_all(&effects);
    }

    fn handle(&mut self, action: PanelAction) {
        let effects = match action {
            PanelAction::SetQuery(query) => self.viewer.set_query(&query),
            PanelAction::SelectLabel(label) => self.viewer.select_label(&label),
            PanelAction::ReloadDefault => self.runtime.block_on(self.viewer.reload_default()),
            PanelAction::LoadUrl(url) => self.runtime.block_on(self.viewer.load_from_url(&url)),
            PanelAction::LoadFile(path) => match path.trim() {
                "" => Vec::new(),
                path => self.runtime.block_on(self.viewer.load_file(path)),
            },
            PanelAction::ZoomIn => self.runtime.block_on(self.viewer.zoom_in()),
            PanelAction::ZoomOut => self.runtime.block_on(self.viewer.zoom_out()),
            other => {
                log::debug!("{:?} has no effect on the PDF view", other);
                Vec::new()
            }
        };
        self.apply(effects);
    }
}

impl eframe::App for PdfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let rows = self.viewer.rows();
        let status = self.viewer.status().to_string();
        let zoom = self.viewer.zoom().label();
        let mut actions = Vec::new();

        egui::SidePanel::left("label-list")
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.heading("地圖標籤");
                actions = pdf_panel(
                    ui,
                    &mut self.query,
                    &mut self.url,
                    &mut self.file,
                    &status,
                    &zoom,
                    &rows,
                );
            });

        for action in actions {
            self.handle(action);
        }

        let highlights = match self.viewer.selection().overlay() {
            Some(Overlay::Highlights(boxes)) => boxes.clone(),
            _ => Vec::new(),
        };
        let scroll_to = self.scroll_to.take();
        let mut visible = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            visible = Some(pdf_page(ui, self.viewer.index(), &highlights, scroll_to));
        });

        if let Some(size) = visible {
            let client_size = Point::new(size.x as f64, size.y as f64);
            if client_size != self.viewer.scroll().client_size {
                let effects = self.runtime.block_on(self.viewer.resize(client_size));
                self.apply(effects);
            }
        }
    }
}
