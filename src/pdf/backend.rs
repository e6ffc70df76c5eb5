//! Document rendering seam.
//!
//! A backend opens one document at a time and renders page one into a text
//! layer: every text span with its client rect at the requested scale.

use crate::{
    core::bounds::Bounds,
    data::{labels::TextLayer, source::HTTP_CLIENT},
    Error, Result,
};
use async_trait::async_trait;
#[cfg(feature = "tokio-runtime")]
use std::path::PathBuf;

/// Where a PDF comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfSource {
    Url(String),
    #[cfg(feature = "tokio-runtime")]
    File(PathBuf),
    Bytes { name: String, data: Vec<u8> },
}

impl PdfSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            #[cfg(feature = "tokio-runtime")]
            Self::File(path) => path.display().to_string(),
            Self::Bytes { name, data } => format!("{} ({} bytes)", name, data.len()),
        }
    }

    /// Raw document bytes
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Url(url) => {
                let response = HTTP_CLIENT.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(Error::PdfLoad(format!("HTTP {}", response.status())));
                }
                Ok(response.bytes().await?.to_vec())
            }
            #[cfg(feature = "tokio-runtime")]
            Self::File(path) => Ok(tokio::fs::read(path).await?),
            Self::Bytes { data, .. } => Ok(data.clone()),
        }
    }
}

#[async_trait]
pub trait PdfBackend: Send {
    /// Opens `source`, replacing the current document
    async fn open(&mut self, source: &PdfSource) -> Result<()>;

    /// Renders page one of the open document at `scale`
    async fn render_text_layer(&mut self, scale: f64) -> Result<TextLayer>;
}

/// Serves a text layer extracted ahead of time.
///
/// The document is JSON holding a [`TextLayer`] measured at scale 1.0;
/// rendering scales every rect linearly.
#[derive(Debug, Default)]
pub struct TextLayerBackend {
    layer: Option<TextLayer>,
}

impl TextLayerBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PdfBackend for TextLayerBackend {
    async fn open(&mut self, source: &PdfSource) -> Result<()> {
        self.layer = None;
        let bytes = source.read_bytes().await?;
        let layer: TextLayer = serde_json::from_slice(&bytes)
            .map_err(|e| Error::PdfLoad(format!("not a text layer: {}", e)))?;
        log::debug!("opened {} with {} fragments", source.describe(), layer.fragments.len());
        self.layer = Some(layer);
        Ok(())
    }

    async fn render_text_layer(&mut self, scale: f64) -> Result<TextLayer> {
        let layer = self
            .layer
            .as_ref()
            .ok_or_else(|| Error::PdfLoad("no document open".to_string()))?;

        let mut scaled = layer.clone();
        scaled.origin = layer.origin.multiply(scale);
        for fragment in &mut scaled.fragments {
            fragment.bounds = scale_bounds(&fragment.bounds, scale);
        }
        Ok(scaled)
    }
}

fn scale_bounds(bounds: &Bounds, scale: f64) -> Bounds {
    Bounds::new(bounds.min.multiply(scale), bounds.max.multiply(scale))
}
