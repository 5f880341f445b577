//! Helpers shared by layout tests.

use brickwork_core::geometry::Size;

use super::{BlockLayout, FieldLayout, FieldMeasurer, InputLayout, LayoutId, LayoutTree};
use crate::{
    config::LayoutConfig,
    model::{Alignment, BlockId, FieldId, InputId, InputType},
};

/// Reads a field's size from its text, written as `"<width>x<height>"`.
/// Anything else measures as zero.
pub(crate) struct SizeMeasurer;

impl FieldMeasurer for SizeMeasurer {
    fn measure_field(&self, field: &FieldLayout, config: &LayoutConfig) -> Size {
        parse_size(field.text())
            .map(|size| size.scale(config.scale()))
            .unwrap_or_default()
    }
}

fn parse_size(text: &str) -> Option<Size> {
    let (width, height) = text.split_once('x')?;
    Some(Size::new(width.parse().ok()?, height.parse().ok()?))
}

pub(crate) fn size_label(size: Size) -> String {
    format!("{}x{}", size.width(), size.height())
}

/// A block layout holding one dummy input with one field of `content` size.
pub(crate) fn sized_block(tree: &mut LayoutTree, index: usize, content: Size) -> LayoutId {
    let block = tree.insert_block(BlockLayout::new(BlockId::from_index(index), None));
    let input = tree.insert_input(InputLayout::new(
        InputId::from_index(index),
        InputType::Dummy,
        Alignment::Left,
        true,
    ));
    let field = tree.insert_field(FieldLayout::new(
        FieldId::from_index(index),
        size_label(content),
    ));
    tree.append_field_layout(input, field);
    tree.append_input_layout(block, input);
    block
}
