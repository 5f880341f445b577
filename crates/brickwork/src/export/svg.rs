//! SVG snapshots of a workspace, rendered from bound views.
//!
//! [`SvgView`] is a [`View`] that records what it would draw. Once a
//! [`ViewManager<SvgView>`] has applied the workspace's layout events,
//! [`render_svg`] turns its views into a standalone document.

use std::{fs::File, io::Write, path::Path};

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use brickwork_core::{color::Color, geometry::Bounds};

use crate::{
    BrickworkError,
    config::StyleConfig,
    layout::{LayoutContext, LayoutId, LayoutKind, LayoutTree},
    view::{View, ViewManager},
};

const BLOCK_CORNER_RADIUS: f32 = 4.0;

/// What an [`SvgView`] draws.
#[derive(Debug, Default, Clone)]
pub enum SvgContent {
    #[default]
    Empty,
    Block {
        color: Option<Color>,
    },
    Label {
        text: String,
        font_family: String,
        font_size: f32,
    },
}

/// Records the frame and content of a block or label.
#[derive(Debug, Default, Clone)]
pub struct SvgView {
    frame: Bounds,
    depth: usize,
    content: SvgContent,
}

impl SvgView {
    pub fn frame(&self) -> Bounds {
        self.frame
    }

    pub fn content(&self) -> &SvgContent {
        &self.content
    }
}

impl View for SvgView {
    fn accepts(kind: &LayoutKind) -> bool {
        matches!(kind, LayoutKind::Block(_) | LayoutKind::Field(_))
    }

    fn refresh_view(&mut self, tree: &LayoutTree, layout: LayoutId, ctx: &LayoutContext<'_>) {
        let Some(node) = tree.get(layout) else {
            return;
        };

        let mut depth = 0;
        let mut current = node.parent();
        while let Some(parent) = current {
            depth += 1;
            current = tree.parent(parent);
        }
        self.depth = depth;

        self.content = match node.kind() {
            LayoutKind::Block(block) => SvgContent::Block {
                color: block.color().copied(),
            },
            LayoutKind::Field(field) => {
                let config = ctx.config();
                let style = config.label_style();
                SvgContent::Label {
                    text: field.text().to_string(),
                    font_family: style.font_family().to_string(),
                    font_size: style.font_size() * config.scale(),
                }
            }
            _ => SvgContent::Empty,
        };
    }

    fn refresh_position(&mut self, frame: Bounds) {
        self.frame = frame;
    }

    fn recycle(&mut self) {
        *self = Self::default();
    }
}

/// Renders every bound view into an SVG document.
///
/// Blocks are drawn outermost first so nested blocks stay visible, and
/// labels are drawn on top of all blocks.
///
/// # Errors
///
/// Returns [`BrickworkError::Export`] if a color in `style` cannot be parsed.
pub fn render_svg(
    views: &ViewManager<SvgView>,
    style: &StyleConfig,
) -> Result<String, BrickworkError> {
    let block_fill = style.block_color().map_err(BrickworkError::Export)?;
    let text_fill = style.text_color().map_err(BrickworkError::Export)?;
    let background = style.background_color().map_err(BrickworkError::Export)?;

    let extent = views
        .views()
        .map(|(_, view)| view.frame)
        .reduce(|acc, frame| acc.merge(&frame))
        .unwrap_or_default();

    let mut doc = Document::new()
        .set(
            "viewBox",
            format!(
                "{} {} {} {}",
                extent.min_x(),
                extent.min_y(),
                extent.width(),
                extent.height()
            ),
        )
        .set("width", extent.width())
        .set("height", extent.height());

    if let Some(color) = background {
        let bg = svg_element::Rectangle::new()
            .set("x", extent.min_x())
            .set("y", extent.min_y())
            .set("width", extent.width())
            .set("height", extent.height())
            .set("fill", color.to_string())
            .set("fill-opacity", color.alpha());
        doc = doc.add(bg);
    }

    let mut blocks: Vec<_> = views
        .views()
        .filter_map(|(_, view)| match &view.content {
            SvgContent::Block { color } => Some((view, color.unwrap_or(block_fill))),
            _ => None,
        })
        .collect();
    blocks.sort_by_key(|(view, _)| view.depth);

    for (view, color) in blocks {
        let rect = svg_element::Rectangle::new()
            .set("x", view.frame.min_x())
            .set("y", view.frame.min_y())
            .set("width", view.frame.width())
            .set("height", view.frame.height())
            .set("rx", BLOCK_CORNER_RADIUS)
            .set("fill", color.to_string())
            .set("fill-opacity", color.alpha())
            .set("stroke", "black")
            .set("stroke-opacity", 0.2);
        doc = doc.add(rect);
    }

    for (_, view) in views.views() {
        let SvgContent::Label {
            text,
            font_family,
            font_size,
        } = &view.content
        else {
            continue;
        };
        let label = svg_element::Text::new("")
            .set("x", view.frame.min_x())
            .set("y", view.frame.min_y() + view.frame.height() / 2.0)
            .set("dominant-baseline", "central")
            .set("font-family", font_family.as_str())
            .set("font-size", *font_size)
            .set("fill", text_fill.to_string())
            .set("fill-opacity", text_fill.alpha())
            .add(svg::node::Text::new(text.as_str()));
        doc = doc.add(label);
    }

    debug!(views = views.len(); "Rendered SVG snapshot");
    Ok(doc.to_string())
}

/// Renders the views and writes the document to `path`.
///
/// # Errors
///
/// Returns an error if rendering fails or the file cannot be written.
pub fn write_svg(
    path: impl AsRef<Path>,
    views: &ViewManager<SvgView>,
    style: &StyleConfig,
) -> Result<(), BrickworkError> {
    let path = path.as_ref();
    let content = render_svg(views, style)?;

    info!(path = path.display().to_string(); "Creating SVG file");
    let mut file = File::create(path).inspect_err(|err| {
        error!(path = path.display().to_string(), err:% = err; "Failed to create SVG file");
    })?;
    file.write_all(content.as_bytes()).inspect_err(|err| {
        error!(path = path.display().to_string(), err:% = err; "Failed to write SVG content");
    })?;
    Ok(())
}
