//! The layout tree: the geometric mirror of the block model.
//!
//! Every rendered block, input and field has a node in a [`LayoutTree`].
//! Nodes are arranged as
//!
//! ```text
//! Workspace
//! └── BlockGroup (a stack of chained blocks, positioned on the workspace)
//!     └── Block
//!         └── Input
//!             ├── Field ...
//!             └── BlockGroup (blocks plugged into the input)
//! ```
//!
//! Sizes are computed bottom-up by [`LayoutTree::layout_children`]; positions
//! are relative to the parent node and accumulate into absolute frames on
//! demand. Every change to a node's size or position queues a
//! [`LayoutEvent`] for the view layer.

mod block;
mod factory;
mod field;
mod group;
mod input;
mod tree;
mod workspace;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

use crate::config::LayoutConfig;

pub use block::BlockLayout;
pub use factory::{DefaultLayoutFactory, LayoutFactory};
pub use field::{FieldLayout, FieldMeasurer};
pub use group::BlockGroupLayout;
pub use input::InputLayout;
pub use tree::{Layout, LayoutEvent, LayoutEventKind, LayoutId, LayoutKind, LayoutTree};
pub use workspace::WorkspaceLayout;

/// Errors raised while building or checking layouts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("unknown layout {0}")]
    UnknownLayout(LayoutId),

    #[error("{layout} is not a {expected} layout")]
    UnexpectedKind {
        layout: LayoutId,
        expected: &'static str,
    },

    #[error("block order in {0} does not follow the connection chain")]
    BrokenChain(LayoutId),

    #[error("unsupported layout request: {0}")]
    Unsupported(String),
}

/// Everything a layout pass reads besides the tree itself.
///
/// The context is built by the workspace for each pass and is read-only for
/// its duration.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    config: &'a LayoutConfig,
    measurer: &'a dyn FieldMeasurer,
}

impl<'a> LayoutContext<'a> {
    pub fn new(config: &'a LayoutConfig, measurer: &'a dyn FieldMeasurer) -> Self {
        Self { config, measurer }
    }

    pub fn config(&self) -> &'a LayoutConfig {
        self.config
    }

    pub fn measurer(&self) -> &'a dyn FieldMeasurer {
        self.measurer
    }
}
