//! Facility map controller.
//!
//! Owns the view model, the filter state, the single active overlay and the
//! map viewport. Every user action goes through one `&mut self` method that
//! returns the [`UiEffect`]s to present, so a fetch or locate in flight keeps
//! the controller borrowed until it settles.

use crate::{
    core::{
        config::ParkMapConfig,
        constants::DATASET_LOAD_FAILED,
        geo::Point,
        viewport::Viewport,
    },
    data::{
        model::ViewModel,
        normalizer::FacilityNormalizer,
        record::FacilityRecord,
        source::DatasetSource,
        zones::ZoneFilter,
    },
    search::filter::{self, FilterState},
    selection::{
        geolocation::{self, Geolocator},
        sync::{ActiveSelection, SelectionSync, SyncUpdate},
    },
    ui::{
        effects::{MenuModal, UiEffect},
        list::{facility_rows, ListRow},
    },
    Result,
};

pub struct FacilityMap {
    pub viewport: Viewport,
    config: ParkMapConfig,
    normalizer: FacilityNormalizer,
    model: ViewModel,
    filter: FilterState,
    sync: SelectionSync,
    open_menu: Option<String>,
}

impl FacilityMap {
    pub fn new(config: ParkMapConfig) -> Result<Self> {
        Self::with_normalizer(config, FacilityNormalizer::new())
    }

    /// Fails with [`Error::Config`](crate::Error::Config) for an invalid config
    pub fn with_normalizer(config: ParkMapConfig, normalizer: FacilityNormalizer) -> Result<Self> {
        config.validate()?;
        let mut viewport =
            Viewport::new(config.map.center, config.map.zoom, Point::new(800.0, 600.0));
        viewport.set_zoom_limits(config.map.min_zoom, config.map.max_zoom);

        Ok(Self {
            viewport,
            config,
            normalizer,
            model: ViewModel::default(),
            filter: FilterState::default(),
            sync: SelectionSync::new(),
            open_menu: None,
        })
    }

    pub fn config(&self) -> &ParkMapConfig {
        &self.config
    }

    pub fn model(&self) -> &ViewModel {
        &self.model
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selection(&self) -> &SelectionSync {
        &self.sync
    }

    /// Facility id whose menu modal is open
    pub fn open_menu_id(&self) -> Option<&str> {
        self.open_menu.as_deref()
    }

    /// Rows for the list widget, active entry flagged
    pub fn rows(&self) -> Vec<ListRow> {
        let active_location = match self.sync.active() {
            Some(ActiveSelection::Location { location_id, .. }) => Some(location_id.as_str()),
            _ => None,
        };
        facility_rows(&self.model, self.sync.active_facility_id(), active_location)
    }

    /// Fetches and rebuilds the model.
    ///
    /// Previous selection and menu are dropped before the fetch starts. A
    /// failed fetch leaves an empty list with an error message; the map stays
    /// usable.
    pub async fn load(&mut self, source: &dyn DatasetSource) -> Vec<UiEffect> {
        let mut effects = self.reset();

        match source.fetch().await {
            Ok(records) => {
                log::info!("loaded {} raw records from {}", records.len(), source.describe());
                effects.extend(self.load_records(&records));
            }
            Err(e) => {
                log::warn!("dataset fetch from {} failed: {}", source.describe(), e);
                effects.push(UiEffect::ListError(format!("{}{}", DATASET_LOAD_FAILED, e)));
            }
        }
        effects
    }

    /// Rebuilds the model from records already in hand
    pub fn load_records(&mut self, records: &[FacilityRecord]) -> Vec<UiEffect> {
        let mut effects = self.reset();
        let built = self.normalizer.build(records);
        self.model = filter::apply(&built, &self.filter);

        if self.config.map.fit_on_load {
            if let Some(bounds) = self.model.bounds() {
                self.viewport.fit_bounds(&bounds);
                effects.push(UiEffect::SetView {
                    center: self.viewport.center,
                    zoom: Some(self.viewport.zoom),
                });
            }
        }
        effects.push(UiEffect::RefreshList);
        effects
    }

    pub fn set_query(&mut self, query: &str) -> Vec<UiEffect> {
        if self.filter.query == query {
            return Vec::new();
        }
        self.filter.query = query.to_string();
        self.refilter()
    }

    pub fn set_zone(&mut self, zone: ZoneFilter) -> Vec<UiEffect> {
        if self.filter.zone == zone {
            return Vec::new();
        }
        self.filter.zone = zone;
        self.refilter()
    }

    pub fn toggle_category(&mut self, name: &str) -> Vec<UiEffect> {
        self.model = filter::toggle_category(&self.model, name);
        vec![UiEffect::RefreshList]
    }

    pub fn click_facility(&mut self, facility_id: &str) -> Vec<UiEffect> {
        let update = self
            .sync
            .click_facility(&self.model, facility_id, Some(self.config.map.focus_zoom));
        self.commit(update)
    }

    pub fn click_location(&mut self, facility_id: &str, location_id: &str) -> Vec<UiEffect> {
        let update = self.sync.click_location(
            &self.model,
            facility_id,
            location_id,
            Some(self.config.map.focus_zoom),
        );
        self.commit(update)
    }

    /// Opens the menu modal; ignored for facilities without a menu
    pub fn open_menu(&mut self, facility_id: &str) -> Vec<UiEffect> {
        let Some(modal) = self.model.facility(facility_id).and_then(MenuModal::for_facility) else {
            return Vec::new();
        };
        self.open_menu = Some(facility_id.to_string());
        vec![UiEffect::OpenMenu(modal)]
    }

    pub fn close_menu(&mut self) -> Vec<UiEffect> {
        match self.open_menu.take() {
            Some(_) => vec![UiEffect::CloseMenu],
            None => Vec::new(),
        }
    }

    /// Locate-me: position fix overlay on success, alert on failure
    pub async fn locate(&mut self, geolocator: &dyn Geolocator) -> Vec<UiEffect> {
        let options = self.config.geolocation.profile.resolve();

        match geolocation::locate(geolocator, &options).await {
            Ok(fix) => {
                let settings = &self.config.geolocation;
                let zoom = settings.zoom_on_fix;
                let effects = self.sync.show_position(
                    &fix,
                    settings.default_accuracy_radius_m,
                    settings.recenter_on_fix,
                    zoom,
                );
                self.follow(&effects);
                effects
            }
            Err(e) => {
                log::warn!("locate failed with code {}", e.code.code());
                vec![UiEffect::Alert(e.to_string())]
            }
        }
    }

    fn refilter(&mut self) -> Vec<UiEffect> {
        self.model = filter::apply(&self.model, &self.filter);
        let mut effects = self.sync.retain_visible(&self.model);
        let menu_hidden = self
            .open_menu
            .as_deref()
            .is_some_and(|id| !self.model.facility(id).is_some_and(|f| f.visible));
        if menu_hidden {
            effects.extend(self.close_menu());
        }
        effects.push(UiEffect::RefreshList);
        effects
    }

    fn commit(&mut self, update: SyncUpdate) -> Vec<UiEffect> {
        if let Some(model) = update.model {
            self.model = model;
        }
        self.follow(&update.effects);
        update.effects
    }

    /// Mirrors recenter effects onto the owned viewport
    fn follow(&mut self, effects: &[UiEffect]) {
        for effect in effects {
            if let UiEffect::SetView { center, zoom } = effect {
                self.viewport.set_view(*center, *zoom);
            }
        }
    }

    fn reset(&mut self) -> Vec<UiEffect> {
        let mut effects = self.sync.clear();
        effects.extend(self.close_menu());
        self.model = ViewModel::default();
        effects
    }
}
