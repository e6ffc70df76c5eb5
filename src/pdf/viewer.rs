//! PDF label viewer controller.
//!
//! Loads a document through a [`PdfBackend`], indexes the rendered text layer
//! into labels, and drives search, highlight selection, zoom and resize.

use crate::{
    core::{
        config::PdfViewConfig,
        constants::{HINT_DEFAULT_SOURCE, HINT_OTHER_SOURCE, STATUS_LOADING, STATUS_READY},
        geo::Point,
        viewport::ScrollViewport,
    },
    data::labels::{LabelIndex, LabelNormalizer},
    pdf::{
        backend::{PdfBackend, PdfSource},
        zoom::ZoomState,
    },
    selection::sync::SelectionSync,
    ui::{
        effects::UiEffect,
        list::{label_rows, ListRow},
    },
    Error, Result,
};

pub struct PdfViewer<B: PdfBackend> {
    backend: B,
    config: PdfViewConfig,
    normalizer: LabelNormalizer,
    zoom: ZoomState,
    index: LabelIndex,
    query: String,
    sync: SelectionSync,
    scroll: ScrollViewport,
    source: Option<PdfSource>,
    status: String,
}

impl<B: PdfBackend> PdfViewer<B> {
    /// Fails with [`Error::Config`] for an inverted or NaN scale range
    pub fn new(backend: B, config: PdfViewConfig) -> Result<Self> {
        config.validate()?;
        let zoom = ZoomState::new(
            config.initial_scale,
            config.scale_step,
            config.min_scale,
            config.max_scale,
        );
        Ok(Self {
            backend,
            normalizer: LabelNormalizer::new(config.min_label_length),
            config,
            zoom,
            index: LabelIndex::default(),
            query: String::new(),
            sync: SelectionSync::new(),
            scroll: ScrollViewport::new(Point::new(800.0, 600.0)),
            source: None,
            status: String::new(),
        })
    }

    pub fn index(&self) -> &LabelIndex {
        &self.index
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn scroll(&self) -> &ScrollViewport {
        &self.scroll
    }

    pub fn selection(&self) -> &SelectionSync {
        &self.sync
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Source of the document currently shown
    pub fn source(&self) -> Option<&PdfSource> {
        self.source.as_ref()
    }

    pub fn default_source(&self) -> PdfSource {
        PdfSource::Url(self.config.default_url.clone())
    }

    /// Labels matching the current query, in display order
    pub fn visible_labels(&self) -> Vec<&str> {
        self.index.filter(&self.query)
    }

    pub fn rows(&self) -> Vec<ListRow> {
        label_rows(&self.visible_labels(), self.sync.active_label())
    }

    /// Opens and renders `source`.
    ///
    /// The previous index and highlights are discarded first; on failure the
    /// status line carries the error and a hint picked by source.
    pub async fn load(&mut self, source: PdfSource) -> Vec<UiEffect> {
        let mut effects = vec![self.set_status(STATUS_LOADING.to_string())];
        self.index = LabelIndex::default();
        self.source = None;
        effects.extend(self.sync.clear());
        effects.push(UiEffect::RefreshList);

        log::info!("loading PDF from {}", source.describe());
        let result = match self.backend.open(&source).await {
            Ok(()) => {
                self.source = Some(source.clone());
                self.render().await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(rendered) => {
                effects.extend(rendered);
                effects.push(self.set_status(STATUS_READY.to_string()));
            }
            Err(e) => {
                log::warn!("PDF load from {} failed: {}", source.describe(), e);
                effects.push(self.set_status(self.failure_message(&source, &e)));
            }
        }
        effects
    }

    pub async fn reload_default(&mut self) -> Vec<UiEffect> {
        self.load(self.default_source()).await
    }

    /// Loads a user-entered URL; blank input is ignored
    pub async fn load_from_url(&mut self, url: &str) -> Vec<UiEffect> {
        let url = url.trim();
        if url.is_empty() {
            return Vec::new();
        }
        self.load(PdfSource::Url(url.to_string())).await
    }

    #[cfg(feature = "tokio-runtime")]
    pub async fn load_file(&mut self, path: impl Into<std::path::PathBuf>) -> Vec<UiEffect> {
        self.load(PdfSource::File(path.into())).await
    }

    pub async fn zoom_in(&mut self) -> Vec<UiEffect> {
        self.change_scale(1).await
    }

    pub async fn zoom_out(&mut self) -> Vec<UiEffect> {
        self.change_scale(-1).await
    }

    /// Steps the render scale; nothing happens at the clamp
    pub async fn change_scale(&mut self, steps: i32) -> Vec<UiEffect> {
        if self.zoom.step_by(steps).is_none() {
            return Vec::new();
        }
        if self.source.is_none() {
            return vec![self.rescale_effect()];
        }
        self.rerender().await
    }

    /// Container resized: re-render at the current scale
    pub async fn resize(&mut self, client_size: Point) -> Vec<UiEffect> {
        self.scroll.client_size = client_size;
        if self.source.is_none() {
            return Vec::new();
        }
        self.rerender().await
    }

    pub fn set_query(&mut self, query: &str) -> Vec<UiEffect> {
        self.query = query.to_string();
        let listed = self.index.filter(&self.query);
        let mut effects = self.sync.retain_labels(&listed);
        effects.push(UiEffect::RefreshList);
        effects
    }

    /// Highlights every box of `label` and scrolls to the first
    pub fn select_label(&mut self, label: &str) -> Vec<UiEffect> {
        let mut effects = vec![UiEffect::RefreshList];
        match self.sync.select_label(&self.index, label) {
            Some(focus) => {
                self.follow_scroll(&focus);
                effects.extend(focus);
                effects.push(self.set_status(format!("已標出「{}」。", label)));
            }
            None => {
                effects.push(self.set_status(format!("找不到「{}」的座標。", label)));
            }
        }
        effects
    }

    async fn rerender(&mut self) -> Vec<UiEffect> {
        match self.render().await {
            Ok(effects) => effects,
            Err(e) => {
                log::warn!("re-render at scale {} failed: {}", self.zoom.scale(), e);
                let message = match &self.source {
                    Some(source) => self.failure_message(source, &e),
                    None => e.to_string(),
                };
                vec![self.set_status(message)]
            }
        }
    }

    /// Renders page one at the current scale and rebuilds the index.
    ///
    /// An active label keeps its highlights, re-measured at the new scale.
    async fn render(&mut self) -> Result<Vec<UiEffect>> {
        let layer = self.backend.render_text_layer(self.zoom.scale()).await?;
        self.index = self.normalizer.build(&layer);

        let mut effects = vec![UiEffect::RefreshList, self.rescale_effect()];
        match self.sync.active_label().map(str::to_string) {
            Some(label) if self.index.contains(&label) => {
                if let Some(focus) = self.sync.select_label(&self.index, &label) {
                    self.follow_scroll(&focus);
                    effects.extend(focus);
                }
            }
            Some(_) => effects.extend(self.sync.clear()),
            None => {}
        }
        Ok(effects)
    }

    fn follow_scroll(&mut self, effects: &[UiEffect]) {
        for effect in effects {
            if let UiEffect::ScrollTo(target) = effect {
                self.scroll.scroll_to(target);
            }
        }
    }

    fn rescale_effect(&self) -> UiEffect {
        UiEffect::Rescale {
            scale: self.zoom.scale(),
            label: self.zoom.label(),
        }
    }

    fn failure_message(&self, source: &PdfSource, error: &Error) -> String {
        let hint = if *source == self.default_source() {
            HINT_DEFAULT_SOURCE
        } else {
            HINT_OTHER_SOURCE
        };
        let reason = match error {
            Error::PdfLoad(reason) => reason.clone(),
            other => other.to_string(),
        };
        format!("載入失敗：{} {}", reason, hint)
    }

    fn set_status(&mut self, message: String) -> UiEffect {
        self.status = message.clone();
        UiEffect::Status(message)
    }
}
