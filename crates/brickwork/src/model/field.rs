use brickwork_core::identifier::Id;

use crate::layout::LayoutId;

arena_id!(
    /// Handle to a [`Field`] owned by a workspace.
    FieldId
);

/// Atomic, non-block content of an input, such as a text label.
///
/// The name is fixed at construction. The text can change through
/// [`crate::Workspace::set_field_text`], which keeps the layout in step.
#[derive(Debug, Clone)]
pub struct Field {
    name: Id,
    text: String,
    input: Option<super::InputId>,
    layout: Option<LayoutId>,
}

impl Field {
    pub(crate) fn new(name: &str, text: impl Into<String>) -> Self {
        Self {
            name: Id::new(name),
            text: text.into(),
            input: None,
            layout: None,
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The input this field was appended to, if any.
    pub fn input(&self) -> Option<super::InputId> {
        self.input
    }

    pub fn layout(&self) -> Option<LayoutId> {
        self.layout
    }

    pub(crate) fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub(crate) fn set_input(&mut self, input: Option<super::InputId>) {
        self.input = input;
    }

    pub(crate) fn set_layout(&mut self, layout: Option<LayoutId>) {
        self.layout = layout;
    }
}
