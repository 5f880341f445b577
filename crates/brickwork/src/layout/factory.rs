//! Pluggable construction of layout nodes for model objects.

use super::{BlockLayout, FieldLayout, InputLayout, LayoutError, LayoutId, LayoutTree};
use crate::model::{Block, BlockId, Field, FieldId, Input, InputId};

/// Creates the layout node for a model object.
///
/// The returned node is detached; the workspace attaches it where the model
/// object lives. A failing factory leaves the object unrendered but usable.
pub trait LayoutFactory {
    fn layout_for_block(
        &self,
        block: &Block,
        id: BlockId,
        tree: &mut LayoutTree,
    ) -> Result<LayoutId, LayoutError>;

    fn layout_for_input(
        &self,
        input: &Input,
        id: InputId,
        tree: &mut LayoutTree,
    ) -> Result<LayoutId, LayoutError>;

    fn layout_for_field(
        &self,
        field: &Field,
        id: FieldId,
        tree: &mut LayoutTree,
    ) -> Result<LayoutId, LayoutError>;

    fn layout_for_block_group(&self, tree: &mut LayoutTree) -> Result<LayoutId, LayoutError> {
        Ok(tree.insert_block_group())
    }
}

/// Builds the standard layout node for every model object.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLayoutFactory;

impl LayoutFactory for DefaultLayoutFactory {
    fn layout_for_block(
        &self,
        block: &Block,
        id: BlockId,
        tree: &mut LayoutTree,
    ) -> Result<LayoutId, LayoutError> {
        Ok(tree.insert_block(BlockLayout::new(id, block.color().copied())))
    }

    fn layout_for_input(
        &self,
        input: &Input,
        id: InputId,
        tree: &mut LayoutTree,
    ) -> Result<LayoutId, LayoutError> {
        Ok(tree.insert_input(InputLayout::new(
            id,
            input.input_type(),
            input.alignment(),
            input.is_visible(),
        )))
    }

    fn layout_for_field(
        &self,
        field: &Field,
        id: FieldId,
        tree: &mut LayoutTree,
    ) -> Result<LayoutId, LayoutError> {
        Ok(tree.insert_field(FieldLayout::new(id, field.text())))
    }
}
