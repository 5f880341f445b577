use log::trace;

use brickwork_core::{
    color::Color,
    geometry::{Point, Size},
};

use super::{LayoutContext, LayoutId, LayoutKind, LayoutTree, tree::report_kind_mismatch};
use crate::model::{Alignment, BlockId};

/// Layout of a single block: its inputs stacked top to bottom inside the
/// block padding.
#[derive(Debug, Clone)]
pub struct BlockLayout {
    block: BlockId,
    color: Option<Color>,
    input_layouts: Vec<LayoutId>,
}

impl BlockLayout {
    pub fn new(block: BlockId, color: Option<Color>) -> Self {
        Self {
            block,
            color,
            input_layouts: Vec::new(),
        }
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn input_layouts(&self) -> &[LayoutId] {
        &self.input_layouts
    }

    pub(super) fn remove_input_layout(&mut self, input_layout: LayoutId) {
        self.input_layouts.retain(|&id| id != input_layout);
    }
}

impl LayoutTree {
    pub fn input_layouts(&self, block_layout: LayoutId) -> &[LayoutId] {
        match self.get(block_layout).map(|node| node.kind()) {
            Some(LayoutKind::Block(state)) => state.input_layouts(),
            _ => &[],
        }
    }

    /// The block a block layout renders.
    pub fn block_of(&self, block_layout: LayoutId) -> Option<BlockId> {
        match self.get(block_layout).map(|node| node.kind()) {
            Some(LayoutKind::Block(state)) => Some(state.block()),
            _ => None,
        }
    }

    pub fn append_input_layout(&mut self, block_layout: LayoutId, input_layout: LayoutId) {
        match self.kind_mut(block_layout) {
            Some(LayoutKind::Block(state)) => state.input_layouts.push(input_layout),
            other => {
                report_kind_mismatch(block_layout, "block", other.map(|kind| kind.name()));
                return;
            }
        }
        self.set_parent(input_layout, Some(block_layout));
    }

    pub(super) fn layout_block(&mut self, block_layout: LayoutId, ctx: &LayoutContext<'_>) {
        let input_layouts = self.input_layouts(block_layout).to_vec();
        for &input_layout in &input_layouts {
            self.layout_children(input_layout, ctx);
        }

        let content_width = input_layouts
            .iter()
            .map(|&id| self[id].total_size().width())
            .fold(0.0f32, f32::max);

        let padding = ctx.config().block_padding();
        let insets = padding.with_bottom(padding.bottom() + ctx.config().notch_height());

        let mut y_offset = 0.0;
        let mut size = Size::zero();
        for input_layout in input_layouts {
            let total = self[input_layout].total_size();
            let x = match self.input_alignment(input_layout) {
                Alignment::Left => 0.0,
                Alignment::Centre => (content_width - total.width()) / 2.0,
                Alignment::Right => content_width - total.width(),
            };
            let origin = Point::new(x, y_offset);
            self.set_relative_position(input_layout, origin.add_point(insets.top_left()));
            size = size.fit(origin, total);
            y_offset += total.height();
        }

        trace!(
            block:% = block_layout,
            width = size.width(),
            height = size.height();
            "Laid out block"
        );
        self.set_edge_insets(block_layout, insets);
        self.set_content_size(block_layout, size);
    }
}
