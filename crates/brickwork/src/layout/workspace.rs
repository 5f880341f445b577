use log::trace;

use brickwork_core::geometry::Size;

use super::{LayoutContext, LayoutId, LayoutKind, LayoutTree};

/// Root layout: the top-level block groups placed on the workspace.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceLayout {
    block_groups: Vec<LayoutId>,
}

impl WorkspaceLayout {
    pub fn block_groups(&self) -> &[LayoutId] {
        &self.block_groups
    }

    pub(super) fn remove_block_group(&mut self, group: LayoutId) {
        self.block_groups.retain(|&id| id != group);
    }
}

impl LayoutTree {
    /// The top-level groups, in the order they were added.
    pub fn block_groups(&self) -> &[LayoutId] {
        match self.get(self.root()).map(|node| node.kind()) {
            Some(LayoutKind::Workspace(state)) => state.block_groups(),
            _ => &[],
        }
    }

    /// Places `group` on the workspace as a top-level stack.
    pub fn append_block_group(&mut self, group: LayoutId) {
        let root = self.root();
        if let Some(LayoutKind::Workspace(state)) = self.kind_mut(root) {
            state.block_groups.push(group);
        }
        self.set_parent(group, Some(root));
    }

    /// Grows the workspace to cover every top-level group, without laying
    /// the groups out again.
    pub fn refresh_workspace_size(&mut self) {
        let size = self
            .block_groups()
            .iter()
            .fold(Size::zero(), |size, &group| {
                let node = &self[group];
                size.fit(node.relative_position(), node.total_size())
            });
        self.set_content_size(self.root(), size);
    }

    pub(super) fn layout_workspace(&mut self, root: LayoutId, ctx: &LayoutContext<'_>) {
        for group in self.block_groups().to_vec() {
            self.layout_children(group, ctx);
        }
        self.refresh_workspace_size();
        trace!(workspace:% = root; "Laid out workspace");
    }
}
