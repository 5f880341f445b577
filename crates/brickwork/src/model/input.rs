//! Inputs: typed slots on a block holding fields and, optionally, a
//! connection another block plugs into.

use std::{fmt, str::FromStr};

use brickwork_core::identifier::Id;

use super::{BlockId, ConnectionId, FieldId};
use crate::layout::LayoutId;

arena_id!(
    /// Handle to an [`Input`] owned by a workspace.
    InputId
);

/// The kind of slot an input provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    /// Accepts a value block through an input value connection.
    Value,
    /// Holds a nested stack of statement blocks.
    Statement,
    /// Only carries fields.
    Dummy,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Value => "input_value",
            Self::Statement => "input_statement",
            Self::Dummy => "input_dummy",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input_value" => Ok(Self::Value),
            "input_statement" => Ok(Self::Statement),
            "input_dummy" => Ok(Self::Dummy),
            _ => Err(format!("Unknown input type: {s}")),
        }
    }
}

/// Horizontal alignment of an input's fields within its block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    Left,
    Centre,
    Right,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Centre => "CENTRE",
            Self::Right => "RIGHT",
        }
    }
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LEFT" => Ok(Self::Left),
            "CENTRE" => Ok(Self::Centre),
            "RIGHT" => Ok(Self::Right),
            _ => Err(format!("Unknown alignment: {s}")),
        }
    }
}

/// Describes an input before it is added to a workspace.
#[derive(Debug, Clone)]
pub struct InputBuilder {
    input_type: InputType,
    name: Id,
    alignment: Alignment,
    visible: bool,
}

impl InputBuilder {
    pub fn new(input_type: InputType, name: &str) -> Self {
        Self {
            input_type,
            name: Id::new(name),
            alignment: Alignment::default(),
            visible: true,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub(crate) fn build(self, connection: Option<ConnectionId>) -> Input {
        Input {
            input_type: self.input_type,
            name: self.name,
            alignment: self.alignment,
            visible: self.visible,
            source_block: None,
            connection,
            fields: Vec::new(),
            layout: None,
        }
    }

    pub fn input_type(&self) -> InputType {
        self.input_type
    }
}

#[derive(Debug, Clone)]
pub struct Input {
    input_type: InputType,
    name: Id,
    alignment: Alignment,
    visible: bool,
    source_block: Option<BlockId>,
    connection: Option<ConnectionId>,
    fields: Vec<FieldId>,
    layout: Option<LayoutId>,
}

impl Input {
    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The block this input belongs to, once appended.
    pub fn source_block(&self) -> Option<BlockId> {
        self.source_block
    }

    /// Present for value and statement inputs, absent for dummy inputs.
    pub fn connection(&self) -> Option<ConnectionId> {
        self.connection
    }

    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn layout(&self) -> Option<LayoutId> {
        self.layout
    }

    pub(crate) fn set_source_block(&mut self, block: Option<BlockId>) {
        self.source_block = block;
    }

    pub(crate) fn push_field(&mut self, field: FieldId) {
        self.fields.push(field);
    }

    pub(crate) fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    pub(crate) fn set_layout(&mut self, layout: Option<LayoutId>) {
        self.layout = layout;
    }
}
