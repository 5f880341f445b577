//! Arena storage for layout nodes, geometry queries and change events.

use std::ops::Index;

use indexmap::IndexSet;
use log::{error, trace};
use slab::Slab;

use brickwork_core::geometry::{Bounds, Insets, Point, Size};

use super::{
    BlockGroupLayout, BlockLayout, FieldLayout, InputLayout, LayoutContext, LayoutError,
    WorkspaceLayout,
};

arena_id!(
    /// Handle to a node of a [`LayoutTree`].
    LayoutId
);

/// The closed set of layout node kinds.
#[derive(Debug, Clone)]
pub enum LayoutKind {
    Workspace(WorkspaceLayout),
    BlockGroup(BlockGroupLayout),
    Block(BlockLayout),
    Input(InputLayout),
    Field(FieldLayout),
}

impl LayoutKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Workspace(_) => "workspace",
            Self::BlockGroup(_) => "block group",
            Self::Block(_) => "block",
            Self::Input(_) => "input",
            Self::Field(_) => "field",
        }
    }

    /// The node's children, in layout order.
    pub fn child_layouts(&self) -> Vec<LayoutId> {
        match self {
            Self::Workspace(workspace) => workspace.block_groups().to_vec(),
            Self::BlockGroup(group) => group.block_layouts().to_vec(),
            Self::Block(block) => block.input_layouts().to_vec(),
            Self::Input(input) => input
                .field_layouts()
                .iter()
                .copied()
                .chain(input.block_group())
                .collect(),
            Self::Field(_) => Vec::new(),
        }
    }
}

/// A node of the layout tree.
#[derive(Debug, Clone)]
pub struct Layout {
    parent: Option<LayoutId>,
    pub(super) relative_position: Point,
    content_size: Size,
    edge_insets: Insets,
    kind: LayoutKind,
}

impl Layout {
    fn new(kind: LayoutKind) -> Self {
        Self {
            parent: None,
            relative_position: Point::default(),
            content_size: Size::zero(),
            edge_insets: Insets::default(),
            kind,
        }
    }

    pub fn parent(&self) -> Option<LayoutId> {
        self.parent
    }

    /// Position of the node's top-left corner within its parent.
    pub fn relative_position(&self) -> Point {
        self.relative_position
    }

    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn edge_insets(&self) -> Insets {
        self.edge_insets
    }

    /// Content size grown by the edge insets.
    pub fn total_size(&self) -> Size {
        self.content_size.add_padding(self.edge_insets)
    }

    pub fn kind(&self) -> &LayoutKind {
        &self.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutEventKind {
    /// Content or size changed; the view must redraw.
    DisplayChanged,
    /// Only the absolute frame moved; the view must reposition.
    PositionChanged,
    /// The node left the tree; its view must be released.
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutEvent {
    pub layout: LayoutId,
    pub kind: LayoutEventKind,
}

impl LayoutEvent {
    pub fn new(layout: LayoutId, kind: LayoutEventKind) -> Self {
        Self { layout, kind }
    }
}

/// Owns every layout node of a workspace.
///
/// The tree is created with its workspace root. Other nodes start detached
/// and are attached through the kind-specific append operations.
#[derive(Debug)]
pub struct LayoutTree {
    pub(super) nodes: Slab<Layout>,
    root: LayoutId,
    events: IndexSet<LayoutEvent>,
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    pub fn new() -> Self {
        let mut nodes = Slab::new();
        let root = LayoutId(nodes.insert(Layout::new(LayoutKind::Workspace(
            WorkspaceLayout::default(),
        ))));
        Self {
            nodes,
            root,
            events: IndexSet::new(),
        }
    }

    /// The workspace layout every top-level group hangs from.
    pub fn root(&self) -> LayoutId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: LayoutId) -> bool {
        self.nodes.contains(id.0)
    }

    pub fn get(&self, id: LayoutId) -> Option<&Layout> {
        self.nodes.get(id.0)
    }

    pub(super) fn kind_mut(&mut self, id: LayoutId) -> Option<&mut LayoutKind> {
        self.nodes.get_mut(id.0).map(|node| &mut node.kind)
    }

    /// Like [`get`](Self::get), reporting a missing node as an error.
    pub fn try_get(&self, id: LayoutId) -> Result<&Layout, LayoutError> {
        self.get(id).ok_or(LayoutError::UnknownLayout(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayoutId, &Layout)> {
        self.nodes
            .iter()
            .map(|(index, node)| (LayoutId(index), node))
    }

    pub fn parent(&self, id: LayoutId) -> Option<LayoutId> {
        self.get(id).and_then(Layout::parent)
    }

    pub fn child_layouts(&self, id: LayoutId) -> Vec<LayoutId> {
        self.get(id)
            .map(|node| node.kind.child_layouts())
            .unwrap_or_default()
    }

    /// `id` followed by every node below it, in pre-order.
    pub fn descendants(&self, id: LayoutId) -> Vec<LayoutId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            result.push(current);
            let children = self.child_layouts(current);
            stack.extend(children.into_iter().rev());
        }
        result
    }

    /// Sum of relative positions from `id` up to its topmost ancestor.
    pub fn absolute_position(&self, id: LayoutId) -> Point {
        let mut position = Point::default();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.get(id)) {
            position = position.add_point(node.relative_position);
            current = node.parent;
        }
        position
    }

    /// Absolute frame of a node, in workspace coordinates.
    pub fn view_frame(&self, id: LayoutId) -> Bounds {
        let size = self.get(id).map(Layout::total_size).unwrap_or_default();
        Bounds::new_from_top_left(self.absolute_position(id), size)
    }

    /// The node with no parent above `id` (the root for attached nodes).
    pub fn topmost_ancestor(&self, id: LayoutId) -> LayoutId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// The block group directly under the workspace root that contains `id`.
    pub fn top_level_group_of(&self, id: LayoutId) -> Option<LayoutId> {
        let mut current = id;
        loop {
            let parent = self.parent(current)?;
            if parent == self.root {
                return matches!(self[current].kind, LayoutKind::BlockGroup(_)).then_some(current);
            }
            current = parent;
        }
    }

    pub fn is_top_level(&self, group: LayoutId) -> bool {
        self.parent(group) == Some(self.root)
    }

    pub fn insert_block_group(&mut self) -> LayoutId {
        self.insert(LayoutKind::BlockGroup(BlockGroupLayout::default()))
    }

    pub fn insert_block(&mut self, layout: BlockLayout) -> LayoutId {
        self.insert(LayoutKind::Block(layout))
    }

    /// Inserts an input layout. Value and statement inputs get an empty
    /// nested block group for the blocks plugged into them.
    pub fn insert_input(&mut self, layout: InputLayout) -> LayoutId {
        let has_group = layout.accepts_blocks();
        let input = self.insert(LayoutKind::Input(layout));
        if has_group {
            let group = self.insert_block_group();
            self.set_parent(group, Some(input));
            if let Some(LayoutKind::Input(input_layout)) = self.kind_mut(input) {
                input_layout.set_block_group(Some(group));
            }
        }
        input
    }

    pub fn insert_field(&mut self, layout: FieldLayout) -> LayoutId {
        self.insert(LayoutKind::Field(layout))
    }

    fn insert(&mut self, kind: LayoutKind) -> LayoutId {
        let id = LayoutId(self.nodes.insert(Layout::new(kind)));
        trace!(layout:% = id; "Inserted layout");
        self.push_event(id, LayoutEventKind::DisplayChanged);
        id
    }

    /// Moves a node within its parent. Emits position events for the node and
    /// its descendants when the position actually changes.
    pub fn set_relative_position(&mut self, id: LayoutId, position: Point) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        if node.relative_position == position {
            return;
        }
        node.relative_position = position;
        self.refresh_view_bounds_for_tree(id);
    }

    /// Emits a display event when the size actually changes.
    pub fn set_content_size(&mut self, id: LayoutId, size: Size) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        if node.content_size == size {
            return;
        }
        node.content_size = size;
        self.push_event(id, LayoutEventKind::DisplayChanged);
    }

    pub fn set_edge_insets(&mut self, id: LayoutId, insets: Insets) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        if node.edge_insets == insets {
            return;
        }
        node.edge_insets = insets;
        self.push_event(id, LayoutEventKind::DisplayChanged);
    }

    pub fn mark_display_changed(&mut self, id: LayoutId) {
        if self.contains(id) {
            self.push_event(id, LayoutEventKind::DisplayChanged);
        }
    }

    pub fn mark_display_changed_for_tree(&mut self, id: LayoutId) {
        for node in self.descendants(id) {
            self.push_event(node, LayoutEventKind::DisplayChanged);
        }
    }

    /// Queues a position event for `id` and every descendant, without
    /// running a sizing pass.
    pub fn refresh_view_bounds_for_tree(&mut self, id: LayoutId) {
        for node in self.descendants(id) {
            self.push_event(node, LayoutEventKind::PositionChanged);
        }
    }

    /// Detaches `id` from its parent and deletes it with all its descendants.
    pub fn remove_subtree(&mut self, id: LayoutId) {
        if id == self.root {
            error!("Attempted to remove the workspace layout");
            debug_assert!(false, "the workspace layout cannot be removed");
            return;
        }
        self.detach(id);
        for node in self.descendants(id) {
            self.nodes.remove(node.0);
            self.push_event(node, LayoutEventKind::Removed);
        }
        trace!(layout:% = id; "Removed layout subtree");
    }

    /// Drains the queued events in the order they were first raised.
    pub fn take_events(&mut self) -> Vec<LayoutEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Sizes the subtree under `id`, children before parents.
    pub fn layout_children(&mut self, id: LayoutId, ctx: &LayoutContext<'_>) {
        match self.get(id).map(Layout::kind) {
            Some(LayoutKind::Workspace(_)) => self.layout_workspace(id, ctx),
            Some(LayoutKind::BlockGroup(_)) => self.layout_block_group(id, ctx),
            Some(LayoutKind::Block(_)) => self.layout_block(id, ctx),
            Some(LayoutKind::Input(_)) => self.layout_input(id, ctx),
            Some(LayoutKind::Field(_)) => self.layout_field(id, ctx),
            None => error!(layout:% = id; "Layout pass requested for unknown layout"),
        }
    }

    /// Sets or clears the parent link. A node that changes parent changes both
    /// its absolute position and its nesting depth, so its whole subtree gets
    /// display events.
    pub(super) fn set_parent(&mut self, id: LayoutId, parent: Option<LayoutId>) {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return;
        };
        if node.parent == parent {
            return;
        }
        node.parent = parent;
        self.mark_display_changed_for_tree(id);
    }

    /// Unlinks `id` from whichever child list of its parent holds it.
    pub(super) fn detach(&mut self, id: LayoutId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent.0) {
            match &mut node.kind {
                LayoutKind::Workspace(workspace) => workspace.remove_block_group(id),
                LayoutKind::BlockGroup(group) => group.remove_block_layout(id),
                LayoutKind::Block(block) => block.remove_input_layout(id),
                LayoutKind::Input(input) => input.remove_child(id),
                LayoutKind::Field(_) => {}
            }
        }
        self.set_parent(id, None);
    }

    fn push_event(&mut self, layout: LayoutId, kind: LayoutEventKind) {
        if kind == LayoutEventKind::Removed {
            // Earlier events for a removed node are moot, and its index may be
            // reused before the queue is drained.
            self.events.retain(|event| event.layout != layout);
        }
        self.events.insert(LayoutEvent::new(layout, kind));
    }
}

impl Index<LayoutId> for LayoutTree {
    type Output = Layout;

    fn index(&self, id: LayoutId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

/// Logs and asserts on a layout operation applied to the wrong kind of node.
pub(super) fn report_kind_mismatch(layout: LayoutId, expected: &'static str, found: Option<&str>) {
    error!(
        layout:% = layout, expected = expected, found:? = found;
        "Layout operation on unexpected kind"
    );
    debug_assert!(false, "{layout} is not a {expected} layout");
}

#[cfg(test)]
mod tests {
    use brickwork_core::geometry::Point;

    use super::*;
    use crate::model::{BlockId, FieldId};

    fn field(tree: &mut LayoutTree, text: &str) -> LayoutId {
        tree.insert_field(FieldLayout::new(FieldId::from_index(0), text))
    }

    #[test]
    fn test_new_tree_has_workspace_root() {
        let tree = LayoutTree::new();
        assert_eq!(tree.len(), 1);
        assert!(matches!(tree[tree.root()].kind(), LayoutKind::Workspace(_)));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn test_content_size_event_only_on_change() {
        let mut tree = LayoutTree::new();
        let id = field(&mut tree, "a");
        tree.take_events();

        tree.set_content_size(id, Size::new(10.0, 5.0));
        tree.set_content_size(id, Size::new(10.0, 5.0));
        assert_eq!(
            tree.take_events(),
            vec![LayoutEvent::new(id, LayoutEventKind::DisplayChanged)]
        );
    }

    #[test]
    fn test_total_size_includes_insets() {
        let mut tree = LayoutTree::new();
        let id = field(&mut tree, "a");
        tree.set_content_size(id, Size::new(10.0, 5.0));
        tree.set_edge_insets(id, Insets::new(1.0, 2.0, 3.0, 4.0));

        assert_eq!(tree[id].total_size(), Size::new(16.0, 9.0));
    }

    #[test]
    fn test_position_events_reach_descendants() {
        let mut tree = LayoutTree::new();
        let group = tree.insert_block_group();
        let block = tree.insert_block(BlockLayout::new(BlockId::from_index(0), None));
        tree.append_block_layout(group, block);
        tree.take_events();

        tree.set_relative_position(group, Point::new(5.0, 5.0));
        let events = tree.take_events();
        assert_eq!(
            events,
            vec![
                LayoutEvent::new(group, LayoutEventKind::PositionChanged),
                LayoutEvent::new(block, LayoutEventKind::PositionChanged),
            ]
        );

        tree.set_relative_position(group, Point::new(5.0, 5.0));
        assert_eq!(tree.pending_events(), 0);
    }

    #[test]
    fn test_absolute_position_and_frame() {
        let mut tree = LayoutTree::new();
        let group = tree.insert_block_group();
        let block = tree.insert_block(BlockLayout::new(BlockId::from_index(0), None));
        tree.append_block_layout(group, block);
        tree.set_relative_position(group, Point::new(10.0, 20.0));
        tree.set_relative_position(block, Point::new(0.0, 7.0));
        tree.set_content_size(block, Size::new(30.0, 15.0));

        assert_eq!(tree.absolute_position(block), Point::new(10.0, 27.0));
        let frame = tree.view_frame(block);
        assert_eq!(frame.min_point(), Point::new(10.0, 27.0));
        assert_eq!(frame.to_size(), Size::new(30.0, 15.0));
    }

    #[test]
    fn test_remove_subtree_emits_removed_and_drops_earlier_events() {
        let mut tree = LayoutTree::new();
        let group = tree.insert_block_group();
        let block = tree.insert_block(BlockLayout::new(BlockId::from_index(0), None));
        tree.append_block_layout(group, block);
        tree.append_block_group(group);
        tree.take_events();

        tree.set_content_size(block, Size::new(1.0, 1.0));
        tree.remove_subtree(group);

        assert!(!tree.contains(group));
        assert!(!tree.contains(block));
        assert!(tree.block_groups().is_empty());
        let events = tree.take_events();
        assert!(events.contains(&LayoutEvent::new(group, LayoutEventKind::Removed)));
        assert!(events.contains(&LayoutEvent::new(block, LayoutEventKind::Removed)));
        assert!(
            !events.contains(&LayoutEvent::new(block, LayoutEventKind::DisplayChanged)),
            "display events of removed nodes are dropped"
        );
        assert_eq!(
            tree.try_get(block).unwrap_err(),
            LayoutError::UnknownLayout(block)
        );
    }

    #[test]
    fn test_reparenting_marks_subtree_display_changed() {
        let mut tree = LayoutTree::new();
        let outer = tree.insert_block_group();
        let inner = tree.insert_block_group();
        let block = tree.insert_block(BlockLayout::new(BlockId::from_index(0), None));
        tree.append_block_layout(inner, block);
        tree.take_events();

        tree.set_parent(inner, Some(outer));

        let events = tree.take_events();
        assert_eq!(
            events,
            vec![
                LayoutEvent::new(inner, LayoutEventKind::DisplayChanged),
                LayoutEvent::new(block, LayoutEventKind::DisplayChanged),
            ]
        );
        tree.set_parent(inner, Some(outer));
        assert_eq!(tree.pending_events(), 0);
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = LayoutTree::new();
        let group = tree.insert_block_group();
        let first = tree.insert_block(BlockLayout::new(BlockId::from_index(0), None));
        let second = tree.insert_block(BlockLayout::new(BlockId::from_index(1), None));
        tree.append_block_layouts(group, [first, second]);

        assert_eq!(tree.descendants(group), vec![group, first, second]);
        assert_eq!(tree.child_layouts(group), vec![first, second]);
    }
}
