//! Brickwork - a layout engine for block-based visual program editors.
//!
//! Blocks link to each other through typed connections: statement blocks
//! stack through previous/next connections, and value blocks plug into the
//! inputs of other blocks. Brickwork mirrors that connection graph with a
//! layout tree, computes how every block, input and label is sized and
//! positioned, and tells a view layer which views need redrawing.
//!
//! The [`Workspace`] is the entry point: it owns the model (blocks, inputs,
//! fields and connections), the [`layout::LayoutTree`] and the shared
//! [`config::LayoutConfig`], and keeps them in lockstep on every mutation.
//!
//! # Examples
//!
//! ```rust,no_run
//! use brickwork::{
//!     Workspace,
//!     config::LayoutConfig,
//!     geometry::Point,
//!     model::{BlockBuilder, InputType},
//!     view::{FieldLabelView, ViewManager},
//! };
//!
//! let mut workspace = Workspace::new(LayoutConfig::default());
//!
//! let repeat = workspace
//!     .add_block(
//!         BlockBuilder::new("controls_repeat")
//!             .with_previous()
//!             .with_next(),
//!         Point::new(20.0, 20.0),
//!     )
//!     .expect("valid block shape");
//! let body = workspace.new_input(InputType::Statement, "DO");
//! let label = workspace.new_field("LABEL", "repeat 10 times");
//! workspace.append_field(body, label).expect("input exists");
//! workspace.append_input(repeat, body).expect("block exists");
//!
//! let mut views: ViewManager<FieldLabelView> = ViewManager::new();
//! let events = workspace.take_layout_events();
//! views.apply_events(&events, workspace.layouts(), &workspace.layout_context());
//! ```

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            #[allow(dead_code)]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index)
            }

            /// Raw arena index.
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

pub mod config;
pub mod export;
pub mod layout;
pub mod model;
pub mod view;

mod error;
mod workspace;

pub use brickwork_core::{color, geometry, identifier, text};

pub use error::BrickworkError;
pub use workspace::{Workspace, WorkspaceBuilder};

#[cfg(test)]
mod tests {
    use crate::{layout::LayoutId, model::ConnectionId};

    #[test]
    fn test_arena_ids_display_their_type() {
        assert_eq!(LayoutId::from_index(3).to_string(), "LayoutId#3");
        assert_eq!(ConnectionId::from_index(7).index(), 7);
    }
}
