//! Loading decks and writing rendered slides.

use crate::cli::Format;
use serde::Serialize;
use slidekit_core::document::Deck;
use slidekit_core::elements::{AssetState, ElementContent, ElementId, ImageSource};
use slidekit_core::{ConfigError, EditError, Editor, EditorConfig};
use slidekit_render::{RenderMode, RenderResources, Renderer, RendererError, SvgRenderer, VisualTree, load_dimensions};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RendererError),
}

pub type AppResult<T> = Result<T, AppError>;

pub fn load_config(path: Option<&Path>) -> AppResult<EditorConfig> {
    Ok(match path {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    })
}

/// Load a deck into an editor and resolve inline image sizes. This counts as
/// part of loading, so the editor starts with an empty history.
pub fn load_editor(path: &Path, config: EditorConfig) -> AppResult<Editor> {
    let json = std::fs::read_to_string(path)?;
    let deck = Deck::from_json(&json)?;
    log::info!("Loaded deck '{}' with {} slides", deck.title, deck.len());
    let mut editor = Editor::with_deck(deck, config);
    let resolved = resolve_assets(&mut editor);
    if resolved > 0 {
        log::debug!("Resolved {resolved} inline images");
        editor.reset_history();
    }
    Ok(editor)
}

/// Read the size of every pending inline image and report the result to the editor.
pub fn resolve_assets(editor: &mut Editor) -> usize {
    let pending: Vec<(ElementId, ImageSource)> = editor
        .deck()
        .slides
        .iter()
        .flat_map(|slide| slide.elements.iter())
        .filter_map(|element| match &element.content {
            ElementContent::Image(image) if image.state == AssetState::Pending => match &image.source {
                Some(source @ ImageSource::Data { .. }) => Some((element.id(), source.clone())),
                _ => None,
            },
            _ => None,
        })
        .collect();
    pending
        .iter()
        .filter(|(id, source)| editor.complete_asset_load(*id, load_dimensions(source)))
        .count()
}

pub fn render_tree(editor: &Editor, index: usize, mode: RenderMode, scale: f64) -> AppResult<VisualTree> {
    let deck = editor.deck();
    let slide = deck.slide(index).ok_or(EditError::SlideOutOfRange {
        index,
        len: deck.len(),
    })?;
    let resources = RenderResources::with_themes(editor.themes().clone());
    Ok(slidekit_render::render_slide(
        slide,
        editor.config().slide_size(),
        mode,
        scale,
        &resources,
    ))
}

pub fn encode(tree: &VisualTree, format: Format) -> AppResult<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(tree)?,
        Format::Svg => SvgRenderer::new().render_to_string(tree)?,
    })
}

/// Write one thumbnail per slide as `slide-NNN.<ext>`.
pub fn write_thumbnails(editor: &Editor, scale: f64, format: Format, dir: &Path) -> AppResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut renderer = SvgRenderer::new();
    let mut written = Vec::with_capacity(editor.deck().len());
    for index in 0..editor.deck().len() {
        let tree = render_tree(editor, index, RenderMode::Thumbnail, scale)?;
        let body = match format {
            Format::Json => serde_json::to_string_pretty(&tree)?,
            Format::Svg => {
                renderer.build_scene(&tree)?;
                renderer.take_svg()
            }
        };
        let path = dir.join(format!("slide-{:03}.{}", index + 1, format.extension()));
        std::fs::write(&path, body)?;
        written.push(path);
    }
    log::info!("Wrote {} thumbnails to {}", written.len(), dir.display());
    Ok(written)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub title: String,
    pub slide_count: usize,
    pub element_count: usize,
    pub slides: Vec<SlideSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideSummary {
    pub index: usize,
    pub kinds: Vec<&'static str>,
}

pub fn summarize(deck: &Deck) -> DeckSummary {
    DeckSummary {
        title: deck.title.clone(),
        slide_count: deck.len(),
        element_count: deck.element_count(),
        slides: deck
            .slides
            .iter()
            .enumerate()
            .map(|(index, slide)| SlideSummary {
                index,
                kinds: slide.paint_order().iter().map(|e| e.kind().name()).collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidekit_core::elements::{Geometry, ImageFormat, ShapeKind, SlideElement};

    // 1x1 PNG.
    const PIXEL_PNG: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn write_deck(dir: &Path, slides: usize) -> PathBuf {
        let mut editor = Editor::default();
        editor
            .add_element(SlideElement::text(Geometry::new(40.0, 40.0, 300.0, 60.0), "Title"))
            .unwrap();
        for _ in 1..slides {
            editor.add_slide();
            editor
                .add_element(SlideElement::shape(
                    Geometry::new(100.0, 100.0, 80.0, 80.0),
                    ShapeKind::Star,
                ))
                .unwrap();
        }
        let path = dir.join("deck.json");
        std::fs::write(&path, editor.deck().to_json().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_render_slide_to_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(dir.path(), 1);
        let editor = load_editor(&path, EditorConfig::default()).unwrap();
        let tree = render_tree(&editor, 0, RenderMode::Export, 1.0).unwrap();
        assert!(tree.background.is_some());
        let svg = encode(&tree, Format::Svg).unwrap();
        assert!(svg.contains("Title"));
    }

    #[test]
    fn test_loaded_images_leave_no_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = Editor::default();
        let source = ImageSource::Data {
            format: ImageFormat::Png,
            data_base64: PIXEL_PNG.to_string(),
        };
        let id = editor
            .add_element(SlideElement::image(Geometry::new(0.0, 0.0, 100.0, 100.0), Some(source)))
            .unwrap();
        let path = dir.path().join("deck.json");
        std::fs::write(&path, editor.deck().to_json().unwrap()).unwrap();

        let mut editor = load_editor(&path, EditorConfig::default()).unwrap();
        let ElementContent::Image(image) = &editor.element(id).unwrap().content else {
            panic!("expected image");
        };
        assert_eq!(image.state, AssetState::Loaded { width: 1, height: 1 });
        assert!(!editor.can_undo());
        assert!(!editor.undo());
    }

    #[test]
    fn test_missing_slide_is_an_error() {
        let editor = Editor::default();
        let err = render_tree(&editor, 5, RenderMode::Export, 1.0).unwrap_err();
        assert!(matches!(
            err,
            AppError::Edit(EditError::SlideOutOfRange { index: 5, len: 1 })
        ));
    }

    #[test]
    fn test_thumbnails_written_per_slide() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(dir.path(), 3);
        let editor = load_editor(&path, EditorConfig::default()).unwrap();
        let out = dir.path().join("thumbs");
        let written = write_thumbnails(&editor, 0.25, Format::Svg, &out).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written[2].ends_with("slide-003.svg"));
        let svg = std::fs::read_to_string(&written[0]).unwrap();
        assert!(svg.contains("width=\"240\""));
    }

    #[test]
    fn test_summary_lists_kinds_in_paint_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_deck(dir.path(), 2);
        let editor = load_editor(&path, EditorConfig::default()).unwrap();
        let summary = summarize(editor.deck());
        assert_eq!(summary.slide_count, 2);
        assert_eq!(summary.element_count, 2);
        assert_eq!(summary.slides[0].kinds, vec!["text"]);
        assert_eq!(summary.slides[1].kinds, vec!["shape"]);
    }

    #[test]
    fn test_config_file_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "slide_width": 1280, "slide_height": 720 }"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.slide_size(), kurbo::Size::new(1280.0, 720.0));
    }
}
