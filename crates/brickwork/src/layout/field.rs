use brickwork_core::geometry::Size;

use super::{LayoutContext, LayoutId, LayoutKind, LayoutTree, tree::report_kind_mismatch};
use crate::{config::LayoutConfig, model::FieldId};

/// Measures the room a field needs.
///
/// Implementations must be pure: the same field and configuration always
/// give the same size.
pub trait FieldMeasurer {
    fn measure_field(&self, field: &FieldLayout, config: &LayoutConfig) -> Size;
}

/// Leaf layout of a field, carrying the text to measure and draw.
#[derive(Debug, Clone)]
pub struct FieldLayout {
    field: FieldId,
    text: String,
}

impl FieldLayout {
    pub fn new(field: FieldId, text: impl Into<String>) -> Self {
        Self {
            field,
            text: text.into(),
        }
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl LayoutTree {
    /// Replaces the text of a field layout and marks it for redraw.
    ///
    /// The new size is only known after the next layout pass.
    pub fn set_field_text(&mut self, field_layout: LayoutId, text: impl Into<String>) {
        match self.kind_mut(field_layout) {
            Some(LayoutKind::Field(state)) => state.text = text.into(),
            other => {
                report_kind_mismatch(field_layout, "field", other.map(|kind| kind.name()));
                return;
            }
        }
        self.mark_display_changed(field_layout);
    }

    pub(super) fn layout_field(&mut self, field_layout: LayoutId, ctx: &LayoutContext<'_>) {
        let size = match self.get(field_layout).map(|node| node.kind()) {
            Some(LayoutKind::Field(state)) => ctx.measurer().measure_field(state, ctx.config()),
            _ => return,
        };
        self.set_content_size(field_layout, size);
    }
}
