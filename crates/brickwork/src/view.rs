//! The view layer: one view per rendered layout node, driven by layout
//! events and backed by a recycle pool.
//!
//! A rendering surface implements [`View`] and lets a [`ViewManager`] decide
//! when views are created, refreshed, repositioned and recycled.

mod label;
mod manager;

use brickwork_core::geometry::Bounds;

use crate::layout::{LayoutContext, LayoutId, LayoutKind, LayoutTree};

pub use label::{FieldLabelView, LabelMeasurer};
pub use manager::ViewManager;

/// A view bound to at most one layout node at a time.
///
/// Views are created with [`Default`] and reused after [`recycle`](View::recycle).
pub trait View: Default {
    /// Whether this kind of view renders layouts of `kind`.
    fn accepts(kind: &LayoutKind) -> bool;

    /// Redraws the view from its layout's current content.
    fn refresh_view(&mut self, tree: &LayoutTree, layout: LayoutId, ctx: &LayoutContext<'_>);

    /// Moves the view to a new absolute frame without redrawing it.
    fn refresh_position(&mut self, frame: Bounds);

    /// Drops everything tied to the previous layout before the view returns
    /// to the pool.
    fn recycle(&mut self);
}
