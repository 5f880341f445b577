//! Blocks: the nodes of the connection graph.

use brickwork_core::{color::Color, identifier::Id};
use thiserror::Error;

use super::{ConnectionId, FieldId, InputId};
use crate::layout::LayoutId;

arena_id!(
    /// Handle to a [`Block`] owned by a workspace.
    BlockId
);

/// Errors raised by block and input bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("a block cannot have both an output and a previous connection")]
    ConflictingConnections,

    #[error("unknown block {0}")]
    UnknownBlock(BlockId),

    #[error("unknown input {0}")]
    UnknownInput(InputId),

    #[error("unknown field {0}")]
    UnknownField(FieldId),

    #[error("{0} already belongs to a block")]
    InputAlreadyAttached(InputId),

    #[error("{0} already belongs to an input")]
    FieldAlreadyAttached(FieldId),
}

/// Describes the shape of a block before it is added to a workspace.
///
/// ```
/// # use brickwork::model::{BlockBuilder, BlockError};
/// let shape = BlockBuilder::new("math_number").with_output().with_previous();
/// assert_eq!(shape.validate(), Err(BlockError::ConflictingConnections));
/// ```
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    name: Id,
    previous: bool,
    next: bool,
    output: bool,
    color: Option<Color>,
}

impl BlockBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: Id::new(name),
            previous: false,
            next: false,
            output: false,
            color: None,
        }
    }

    pub fn with_previous(mut self) -> Self {
        self.previous = true;
        self
    }

    pub fn with_next(mut self) -> Self {
        self.next = true;
        self
    }

    pub fn with_output(mut self) -> Self {
        self.output = true;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn has_previous(&self) -> bool {
        self.previous
    }

    pub fn has_next(&self) -> bool {
        self.next
    }

    pub fn has_output(&self) -> bool {
        self.output
    }

    /// Checks that the requested connections can coexist.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::ConflictingConnections`] for output + previous.
    pub fn validate(&self) -> Result<(), BlockError> {
        if self.output && self.previous {
            return Err(BlockError::ConflictingConnections);
        }
        Ok(())
    }

    /// Builds the block with connections already allocated by the caller.
    pub(crate) fn build(
        self,
        previous_connection: Option<ConnectionId>,
        next_connection: Option<ConnectionId>,
        output_connection: Option<ConnectionId>,
    ) -> Block {
        Block {
            name: self.name,
            inputs: Vec::new(),
            previous_connection,
            next_connection,
            output_connection,
            color: self.color,
            layout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    name: Id,
    inputs: Vec<InputId>,
    previous_connection: Option<ConnectionId>,
    next_connection: Option<ConnectionId>,
    output_connection: Option<ConnectionId>,
    color: Option<Color>,
    layout: Option<LayoutId>,
}

impl Block {
    pub fn name(&self) -> Id {
        self.name
    }

    pub fn inputs(&self) -> &[InputId] {
        &self.inputs
    }

    pub fn previous_connection(&self) -> Option<ConnectionId> {
        self.previous_connection
    }

    pub fn next_connection(&self) -> Option<ConnectionId> {
        self.next_connection
    }

    pub fn output_connection(&self) -> Option<ConnectionId> {
        self.output_connection
    }

    /// The connection through which this block hangs below or inside another.
    pub fn upward_connection(&self) -> Option<ConnectionId> {
        self.previous_connection.or(self.output_connection)
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }

    pub fn layout(&self) -> Option<LayoutId> {
        self.layout
    }

    /// Every connection this block owns directly.
    pub(crate) fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        [
            self.previous_connection,
            self.next_connection,
            self.output_connection,
        ]
        .into_iter()
        .flatten()
    }

    pub(crate) fn push_input(&mut self, input: InputId) {
        self.inputs.push(input);
    }

    pub(crate) fn set_layout(&mut self, layout: Option<LayoutId>) {
        self.layout = layout;
    }
}
