use async_trait::async_trait;
use parkmap::{constants, prelude::*};
use std::sync::{Arc, Mutex};

/// PDF viewer flows against a scripted backend
#[cfg(test)]
mod pdf_viewer_tests {
    use super::*;

    /// Backend that serves one fixed page and records every call
    #[derive(Clone, Default)]
    struct ScriptedBackend {
        fail_open: bool,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedBackend {
        fn failing() -> Self {
            Self {
                fail_open: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PdfBackend for ScriptedBackend {
        async fn open(&mut self, source: &PdfSource) -> parkmap::Result<()> {
            self.calls.lock().unwrap().push(format!("open {}", source.describe()));
            if self.fail_open {
                return Err(ParkMapError::PdfLoad("Failed to fetch".to_string()));
            }
            Ok(())
        }

        async fn render_text_layer(&mut self, scale: f64) -> parkmap::Result<TextLayer> {
            self.calls.lock().unwrap().push(format!("render {:.1}", scale));
            let origin = Point::new(50.0 * scale, 20.0 * scale);
            let rect = |x: f64, y: f64, w: f64| {
                Bounds::from_rect(
                    50.0 * scale + x * scale,
                    20.0 * scale + y * scale,
                    w * scale,
                    12.0 * scale,
                )
            };
            Ok(TextLayer {
                origin,
                fragments: vec![
                    TextFragment::new(" 旋轉木馬 ", rect(100.0, 100.0, 48.0)),
                    TextFragment::new("洗手間", rect(10.0, 10.0, 36.0)),
                    TextFragment::new("洗手間", rect(400.0, 300.0, 36.0)),
                    TextFragment::new("T", rect(0.0, 0.0, 6.0)),
                    TextFragment::new("   ", rect(0.0, 0.0, 6.0)),
                ],
            })
        }
    }

    async fn loaded(backend: ScriptedBackend) -> (PdfViewer<ScriptedBackend>, RecordingPresenter) {
        let mut viewer = PdfViewer::new(backend, PdfViewConfig::default()).unwrap();
        let mut presenter = RecordingPresenter::new();
        let effects = viewer.reload_default().await;
        presenter.present_all(&effects);
        (viewer, presenter)
    }

    #[tokio::test]
    async fn test_default_load_indexes_labels_relative_to_layer() {
        let backend = ScriptedBackend::default();
        let (viewer, presenter) = loaded(backend.clone()).await;

        assert_eq!(presenter.status.as_deref(), Some(constants::STATUS_READY));
        assert_eq!(presenter.zoom_label.as_deref(), Some("140%"));
        assert_eq!(viewer.index().len(), 2);
        assert_eq!(viewer.index().boxes("洗手間").len(), 2);
        assert!(viewer.index().contains("旋轉木馬"));

        let first = viewer.index().boxes("洗手間")[0];
        assert!((first.left() - 14.0).abs() < 1e-9);
        assert!((first.top() - 14.0).abs() < 1e-9);

        assert_eq!(
            backend.calls(),
            vec![format!("open {}", constants::DEFAULT_PDF_URL), "render 1.4".to_string()]
        );
    }

    #[tokio::test]
    async fn test_default_source_failure_hint() {
        let (viewer, presenter) = loaded(ScriptedBackend::failing()).await;

        let status = presenter.status.unwrap();
        assert_eq!(
            status,
            format!("載入失敗：Failed to fetch {}", constants::HINT_DEFAULT_SOURCE)
        );
        assert_eq!(viewer.status(), status);
        assert!(viewer.rows().iter().all(|row| matches!(row, ListRow::Empty(_))));
    }

    #[tokio::test]
    async fn test_user_url_failure_hint() {
        let mut viewer =
            PdfViewer::new(ScriptedBackend::failing(), PdfViewConfig::default()).unwrap();
        viewer.load_from_url(" https://example.com/map.pdf ").await;

        assert!(viewer.status().ends_with(constants::HINT_OTHER_SOURCE));
        assert!(viewer.source().is_none());
    }

    #[tokio::test]
    async fn test_highlight_selection_and_search() {
        let (mut viewer, mut presenter) = loaded(ScriptedBackend::default()).await;

        presenter.present_all(&viewer.select_label("洗手間"));
        assert!(matches!(&presenter.overlay, Some(Overlay::Highlights(boxes)) if boxes.len() == 2));
        assert_eq!(presenter.status.as_deref(), Some("已標出「洗手間」。"));
        assert!(viewer
            .rows()
            .contains(&ListRow::Label { label: "洗手間".to_string(), active: true }));

        presenter.present_all(&viewer.set_query("木馬"));
        assert!(presenter.overlay.is_none());
        assert_eq!(viewer.visible_labels(), vec!["旋轉木馬"]);

        presenter.present_all(&viewer.set_query(""));
        assert_eq!(viewer.visible_labels().len(), 2);
    }

    #[tokio::test]
    async fn test_zoom_steps_and_clamps() {
        let backend = ScriptedBackend::default();
        let (mut viewer, mut presenter) = loaded(backend.clone()).await;

        for _ in 0..10 {
            presenter.present_all(&viewer.zoom_in().await);
        }
        assert_eq!(viewer.zoom().scale(), constants::MAX_SCALE);
        assert_eq!(presenter.zoom_label.as_deref(), Some("260%"));

        let renders = backend.calls().iter().filter(|c| c.starts_with("render")).count();
        // initial render plus one per effective step (1.4 → 2.6)
        assert_eq!(renders, 7);
    }

    #[tokio::test]
    async fn test_resize_rerenders_and_scroll_clamps_at_zero() {
        let backend = ScriptedBackend::default();
        let (mut viewer, _) = loaded(backend.clone()).await;

        viewer.resize(Point::new(2000.0, 2000.0)).await;
        assert_eq!(backend.calls().last().map(String::as_str), Some("render 1.4"));

        viewer.select_label("洗手間");
        assert_eq!(viewer.scroll().scroll, Point::new(0.0, 0.0));
    }

    #[tokio::test]
    async fn test_missing_label_status() {
        let (mut viewer, mut presenter) = loaded(ScriptedBackend::default()).await;
        presenter.present_all(&viewer.select_label("雲霄飛車"));

        assert_eq!(presenter.status.as_deref(), Some("找不到「雲霄飛車」的座標。"));
        assert!(presenter.overlay.is_none());
    }
}

/// The PDF side panel and page render a loaded text layer with highlights
#[cfg(all(test, feature = "egui"))]
mod pdf_panel_tests {
    use super::*;
    use parkmap::ui::panel::{pdf_page, pdf_panel};

    fn layer_bytes() -> Vec<u8> {
        let layer = TextLayer {
            origin: Point::new(0.0, 0.0),
            fragments: vec![
                TextFragment::new("洗手間", Bounds::from_rect(10.0, 10.0, 36.0, 12.0)),
                TextFragment::new("城堡", Bounds::from_rect(300.0, 200.0, 24.0, 12.0)),
            ],
        };
        serde_json::to_vec(&layer).unwrap()
    }

    #[tokio::test]
    async fn test_pdf_panel_and_page_render_highlights() {
        let mut viewer = PdfViewer::new(TextLayerBackend::new(), PdfViewConfig::default()).unwrap();
        let source = PdfSource::Bytes {
            name: "map.json".to_string(),
            data: layer_bytes(),
        };
        viewer.load(source).await;
        viewer.select_label("城堡");
        assert_eq!(viewer.status(), "已標出「城堡」。");

        let highlights = match viewer.selection().overlay() {
            Some(Overlay::Highlights(boxes)) => boxes.clone(),
            other => panic!("expected highlights, got {:?}", other),
        };
        assert_eq!(highlights.len(), 1);

        let ctx = egui::Context::default();
        let rows = viewer.rows();
        let status = viewer.status().to_string();
        let zoom = viewer.zoom().label();
        let (mut query, mut url, mut file) = (String::new(), String::new(), String::new());
        let mut actions = Vec::new();
        let mut visible = None;

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::SidePanel::left("labels").show(ctx, |ui| {
                actions = pdf_panel(ui, &mut query, &mut url, &mut file, &status, &zoom, &rows);
            });
            egui::CentralPanel::default().show(ctx, |ui| {
                let scroll = Some(viewer.scroll().scroll);
                visible = Some(pdf_page(ui, viewer.index(), &highlights, scroll));
            });
        });

        assert_eq!(zoom, "140%");
        assert!(actions.is_empty());
        assert!(visible.map_or(false, |size| size.x > 0.0 && size.y > 0.0));
    }
}
