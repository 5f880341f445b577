//! The block model: the source of truth the layout tree mirrors.
//!
//! Model objects live in arenas owned by [`crate::Workspace`] and refer to
//! each other through copyable ids. Back-references (a connection's owner, an
//! input's source block) are plain ids and never own what they point to.

mod block;
mod connection;
mod field;
mod input;

pub use block::{Block, BlockBuilder, BlockError, BlockId};
pub use connection::{
    Connection, ConnectionError, ConnectionGraph, ConnectionId, ConnectionKind, ConnectionOwner,
};
pub use field::{Field, FieldId};
pub use input::{Alignment, Input, InputBuilder, InputId, InputType};
