use indexmap::IndexMap;
use log::{debug, trace};

use super::View;
use crate::layout::{LayoutContext, LayoutEvent, LayoutEventKind, LayoutId, LayoutTree};

/// Binds views to layout nodes and keeps them current.
///
/// Views whose layout goes away are recycled into a pool and handed out
/// again before any new view is created.
#[derive(Debug)]
pub struct ViewManager<V> {
    views: IndexMap<LayoutId, V>,
    pool: Vec<V>,
}

impl<V> Default for ViewManager<V> {
    fn default() -> Self {
        Self {
            views: IndexMap::new(),
            pool: Vec::new(),
        }
    }
}

impl<V: View> ViewManager<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the view bound to `layout`, binding one first if needed.
    ///
    /// Returns `None` when the layout is unknown or not rendered by `V`.
    pub fn view_for_layout(
        &mut self,
        tree: &LayoutTree,
        layout: LayoutId,
        ctx: &LayoutContext<'_>,
    ) -> Option<&V> {
        let node = tree.get(layout)?;
        if !V::accepts(node.kind()) {
            return None;
        }

        let view = self.views.entry(layout).or_insert_with(|| {
            let view = self.pool.pop().unwrap_or_default();
            trace!(layout:% = layout; "Bound view");
            view
        });
        view.refresh_view(tree, layout, ctx);
        view.refresh_position(tree.view_frame(layout));
        Some(view)
    }

    /// Binds a view to every accepted layout in the subtree under `root`.
    /// Returns the number of bound views in the subtree.
    pub fn bind_tree(
        &mut self,
        tree: &LayoutTree,
        root: LayoutId,
        ctx: &LayoutContext<'_>,
    ) -> usize {
        tree.descendants(root)
            .into_iter()
            .filter(|&layout| self.view_for_layout(tree, layout, ctx).is_some())
            .count()
    }

    /// Unbinds the view of `layout` and returns it to the pool.
    pub fn recycle_view(&mut self, layout: LayoutId) -> bool {
        let Some(mut view) = self.views.shift_remove(&layout) else {
            return false;
        };
        view.recycle();
        self.pool.push(view);
        trace!(layout:% = layout; "Recycled view");
        true
    }

    /// Applies drained layout events.
    ///
    /// Display changes redraw bound views and bind views to newly displayed
    /// layouts; position changes only move bound views. Views whose layout
    /// is gone are recycled.
    pub fn apply_events(
        &mut self,
        events: &[LayoutEvent],
        tree: &LayoutTree,
        ctx: &LayoutContext<'_>,
    ) {
        for event in events {
            if event.kind == LayoutEventKind::Removed || !tree.contains(event.layout) {
                self.recycle_view(event.layout);
                continue;
            }

            match event.kind {
                LayoutEventKind::DisplayChanged => {
                    self.view_for_layout(tree, event.layout, ctx);
                }
                LayoutEventKind::PositionChanged => {
                    if let Some(view) = self.views.get_mut(&event.layout) {
                        view.refresh_position(tree.view_frame(event.layout));
                    }
                }
                LayoutEventKind::Removed => {}
            }
        }
        debug!(
            events = events.len(),
            views = self.views.len(),
            pooled = self.pool.len();
            "Applied layout events"
        );
    }

    pub fn view(&self, layout: LayoutId) -> Option<&V> {
        self.views.get(&layout)
    }

    /// Bound views in binding order.
    pub fn views(&self) -> impl Iterator<Item = (LayoutId, &V)> {
        self.views.iter().map(|(&layout, view)| (layout, view))
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }
}
