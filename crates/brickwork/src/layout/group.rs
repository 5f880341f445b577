//! Block groups: vertical stacks of chained blocks.
//!
//! Consecutive blocks overlap by the configured notch height so that the
//! connector of one block sits inside the one above it.

use log::{debug, trace};

use brickwork_core::geometry::{Point, Size};

use super::{LayoutContext, LayoutId, LayoutKind, LayoutTree, tree::report_kind_mismatch};

/// Ordered block layouts whose blocks are chained through next/previous
/// connections. The layout does not check the chain itself; the workspace
/// keeps the order in step with the connection graph.
#[derive(Debug, Clone, Default)]
pub struct BlockGroupLayout {
    block_layouts: Vec<LayoutId>,
}

impl BlockGroupLayout {
    pub fn block_layouts(&self) -> &[LayoutId] {
        &self.block_layouts
    }

    pub fn is_empty(&self) -> bool {
        self.block_layouts.is_empty()
    }

    pub(super) fn remove_block_layout(&mut self, block_layout: LayoutId) {
        self.block_layouts.retain(|&id| id != block_layout);
    }
}

impl LayoutTree {
    fn block_group_mut(&mut self, group: LayoutId) -> Option<&mut BlockGroupLayout> {
        match self.kind_mut(group) {
            Some(LayoutKind::BlockGroup(state)) => Some(state),
            other => {
                report_kind_mismatch(group, "block group", other.map(|kind| kind.name()));
                None
            }
        }
    }

    /// The block layouts of `group`, top to bottom.
    pub fn block_layouts(&self, group: LayoutId) -> &[LayoutId] {
        match self.get(group).map(|node| node.kind()) {
            Some(LayoutKind::BlockGroup(state)) => state.block_layouts(),
            _ => &[],
        }
    }

    /// Appends `block_layout` to the bottom of `group` and makes the group
    /// its parent.
    pub fn append_block_layout(&mut self, group: LayoutId, block_layout: LayoutId) {
        let Some(state) = self.block_group_mut(group) else {
            return;
        };
        state.block_layouts.push(block_layout);
        self.set_parent(block_layout, Some(group));
        trace!(group:% = group, block:% = block_layout; "Appended block layout");
    }

    /// Appends several block layouts, keeping their order.
    pub fn append_block_layouts(
        &mut self,
        group: LayoutId,
        block_layouts: impl IntoIterator<Item = LayoutId>,
    ) {
        for block_layout in block_layouts {
            self.append_block_layout(group, block_layout);
        }
    }

    /// Removes `block_layout` and every block layout after it from `group`,
    /// returning them in their original order with their parent cleared.
    ///
    /// When `block_layout` is not part of the group, or `group` is not a
    /// block group at all, nothing else changes and `block_layout` alone is
    /// detached from whatever parent it had and returned.
    pub fn remove_all_starting_from_block_layout(
        &mut self,
        group: LayoutId,
        block_layout: LayoutId,
    ) -> Vec<LayoutId> {
        let index = match self.get(group).map(|node| node.kind()) {
            Some(LayoutKind::BlockGroup(state)) => state
                .block_layouts
                .iter()
                .position(|&id| id == block_layout),
            _ => None,
        };
        let Some(index) = index else {
            debug!(
                group:% = group,
                block:% = block_layout;
                "Block layout not in group, detaching alone"
            );
            self.detach(block_layout);
            return vec![block_layout];
        };
        let Some(state) = self.block_group_mut(group) else {
            return vec![block_layout];
        };

        let removed = state.block_layouts.split_off(index);
        for &id in &removed {
            self.set_parent(id, None);
        }
        trace!(group:% = group, count = removed.len(); "Removed block layouts");
        removed
    }

    /// Places a top-level group at `position` in workspace coordinates.
    ///
    /// Groups nested in an input are positioned by their input and are left
    /// untouched. No sizing pass runs; every view in the group is
    /// repositioned.
    pub fn move_to_workspace_position(&mut self, group: LayoutId, position: Point) {
        if !self.is_top_level(group) {
            debug!(group:% = group; "Group is not top-level, ignoring move");
            return;
        }
        if let Some(node) = self.nodes.get_mut(group.index()) {
            node.relative_position = position;
        }
        self.refresh_view_bounds_for_tree(group);
    }

    /// Stacks the group's blocks top to bottom, each overlapping the previous
    /// one by the notch height.
    pub(super) fn layout_block_group(&mut self, group: LayoutId, ctx: &LayoutContext<'_>) {
        let block_layouts = self.block_layouts(group).to_vec();
        let notch_height = ctx.config().notch_height();

        let mut y_offset = 0.0;
        let mut size = Size::zero();
        for block_layout in block_layouts {
            self.layout_children(block_layout, ctx);

            let origin = Point::new(0.0, y_offset);
            self.set_relative_position(block_layout, origin);

            let total = self[block_layout].total_size();
            y_offset += total.height() - notch_height;
            size = size.fit(origin, total);
        }

        trace!(
            group:% = group,
            width = size.width(),
            height = size.height();
            "Laid out block group"
        );
        self.set_content_size(group, size);
    }
}
