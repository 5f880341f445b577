use brickwork_core::{
    geometry::{Bounds, Size},
    text::{TextStyle, measure_single_line},
};

use super::View;
use crate::{
    config::LayoutConfig,
    layout::{FieldLayout, FieldMeasurer, LayoutContext, LayoutId, LayoutKind, LayoutTree},
};

/// Measures field labels with the system fonts, using the configured label
/// font at the current scale.
#[derive(Debug, Default, Clone, Copy)]
pub struct LabelMeasurer;

impl LabelMeasurer {
    fn style(config: &LayoutConfig) -> TextStyle {
        config.label_style().scaled(config.scale())
    }
}

impl FieldMeasurer for LabelMeasurer {
    fn measure_field(&self, field: &FieldLayout, config: &LayoutConfig) -> Size {
        measure_single_line(field.text(), &Self::style(config))
    }
}

/// Mirrors a field label: its text, its frame and the font size it is drawn
/// at.
#[derive(Debug, Default, Clone)]
pub struct FieldLabelView {
    text: String,
    frame: Bounds,
    font_size: f32,
}

impl FieldLabelView {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn frame(&self) -> Bounds {
        self.frame
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }
}

impl View for FieldLabelView {
    fn accepts(kind: &LayoutKind) -> bool {
        matches!(kind, LayoutKind::Field(_))
    }

    fn refresh_view(&mut self, tree: &LayoutTree, layout: LayoutId, ctx: &LayoutContext<'_>) {
        if let Some(LayoutKind::Field(field)) = tree.get(layout).map(|node| node.kind()) {
            self.text.clear();
            self.text.push_str(field.text());
        }
        self.font_size = LabelMeasurer::style(ctx.config()).font_size();
    }

    fn refresh_position(&mut self, frame: Bounds) {
        self.frame = frame;
    }

    fn recycle(&mut self) {
        self.text.clear();
        self.frame = Bounds::default();
        self.font_size = 0.0;
    }
}
