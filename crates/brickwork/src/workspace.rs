//! The workspace: owner of the block model and its layout tree.
//!
//! Every mutation goes through [`Workspace`], which updates the connection
//! graph first and then reflects the change into the [`LayoutTree`]:
//! appending, detaching or moving layout nodes and re-running the sizing pass
//! on the affected top-level stack only.

use log::{debug, info, warn};
use slab::Slab;

use brickwork_core::geometry::Point;

use crate::{
    BrickworkError,
    config::{ConfigError, LayoutConfig},
    layout::{
        DefaultLayoutFactory, FieldMeasurer, LayoutContext, LayoutError, LayoutEvent,
        LayoutFactory, LayoutId, LayoutKind, LayoutTree,
    },
    model::{
        Alignment, Block, BlockBuilder, BlockError, BlockId, ConnectionError, ConnectionGraph,
        ConnectionId, ConnectionKind, ConnectionOwner, Field, FieldId, Input, InputBuilder,
        InputId, InputType,
    },
    view::LabelMeasurer,
};

/// Configures the collaborators of a [`Workspace`].
pub struct WorkspaceBuilder {
    config: LayoutConfig,
    factory: Option<Box<dyn LayoutFactory>>,
    measurer: Box<dyn FieldMeasurer>,
}

impl WorkspaceBuilder {
    /// Starts from the default layout factory and the font-based measurer.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            factory: Some(Box::new(DefaultLayoutFactory)),
            measurer: Box::new(LabelMeasurer),
        }
    }

    pub fn with_layout_factory(mut self, factory: impl LayoutFactory + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Builds a headless workspace: the model works, nothing is laid out.
    pub fn without_layout_factory(mut self) -> Self {
        self.factory = None;
        self
    }

    pub fn with_measurer(mut self, measurer: impl FieldMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    pub fn build(self) -> Workspace {
        Workspace {
            config: self.config,
            blocks: Slab::new(),
            inputs: Slab::new(),
            fields: Slab::new(),
            connections: ConnectionGraph::new(),
            layouts: LayoutTree::new(),
            factory: self.factory,
            measurer: self.measurer,
        }
    }
}

/// Top-level container of blocks, and the root coordinate space.
pub struct Workspace {
    config: LayoutConfig,
    blocks: Slab<Block>,
    inputs: Slab<Input>,
    fields: Slab<Field>,
    connections: ConnectionGraph,
    layouts: LayoutTree,
    factory: Option<Box<dyn LayoutFactory>>,
    measurer: Box<dyn FieldMeasurer>,
}

impl Workspace {
    pub fn new(config: LayoutConfig) -> Self {
        WorkspaceBuilder::new(config).build()
    }

    pub fn builder(config: LayoutConfig) -> WorkspaceBuilder {
        WorkspaceBuilder::new(config)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layouts(&self) -> &LayoutTree {
        &self.layouts
    }

    pub fn connections(&self) -> &ConnectionGraph {
        &self.connections
    }

    /// The context views need to refresh from this workspace's layouts.
    pub fn layout_context(&self) -> LayoutContext<'_> {
        LayoutContext::new(&self.config, self.measurer.as_ref())
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    pub fn input(&self, id: InputId) -> Option<&Input> {
        self.inputs.get(id.index())
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(id.index())
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Drains the layout events raised since the last call.
    pub fn take_layout_events(&mut self) -> Vec<LayoutEvent> {
        self.layouts.take_events()
    }

    fn block_ref(&self, id: BlockId) -> Result<&Block, BlockError> {
        self.block(id).ok_or(BlockError::UnknownBlock(id))
    }

    fn input_ref(&self, id: InputId) -> Result<&Input, BlockError> {
        self.input(id).ok_or(BlockError::UnknownInput(id))
    }

    fn field_ref(&self, id: FieldId) -> Result<&Field, BlockError> {
        self.field(id).ok_or(BlockError::UnknownField(id))
    }

    /// Creates an input with its connection and, when possible, its layout.
    pub fn new_input(&mut self, input_type: InputType, name: &str) -> InputId {
        self.add_input(InputBuilder::new(input_type, name))
    }

    /// Creates an input from a builder.
    ///
    /// A failing layout factory is logged and leaves the input unrendered;
    /// it can still hold fields and be connected. Use
    /// [`try_layout_input`](Self::try_layout_input) to see the error.
    pub fn add_input(&mut self, builder: InputBuilder) -> InputId {
        let entry = self.inputs.vacant_entry();
        let id = InputId::from_index(entry.key());

        let kind = match builder.input_type() {
            InputType::Value => Some(ConnectionKind::InputValue),
            InputType::Statement => Some(ConnectionKind::NextStatement),
            InputType::Dummy => None,
        };
        let connection = kind.map(|kind| self.connections.insert(kind, ConnectionOwner::Input(id)));
        let input = entry.insert(builder.build(connection));
        debug!(
            input:% = id,
            input_type:% = input.input_type(),
            name:% = input.name();
            "Created input"
        );

        if self.factory.is_some() {
            if let Err(err) = self.try_layout_input(id) {
                warn!(
                    input:% = id,
                    err:err;
                    "Failed to create input layout, input stays unrendered"
                );
            }
        }
        id
    }

    /// Creates the layout of an unrendered input and attaches it where the
    /// input lives. Returns the existing layout if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is unknown, the workspace has no layout
    /// factory, or the factory fails.
    pub fn try_layout_input(&mut self, input: InputId) -> Result<LayoutId, BrickworkError> {
        let model = self
            .inputs
            .get(input.index())
            .ok_or(BlockError::UnknownInput(input))?;
        if let Some(layout) = model.layout() {
            return Ok(layout);
        }
        let factory = self.factory.as_deref().ok_or_else(|| {
            LayoutError::Unsupported("workspace has no layout factory".to_string())
        })?;

        let layout = factory.layout_for_input(model, input, &mut self.layouts)?;
        let fields = model.fields().to_vec();
        let source_block = model.source_block();
        self.inputs[input.index()].set_layout(Some(layout));

        let field_layouts: Vec<_> = fields
            .iter()
            .filter_map(|field| self.fields.get(field.index()).and_then(Field::layout))
            .collect();
        self.layouts.append_field_layouts(layout, field_layouts);

        if let Some(block_layout) = source_block
            .and_then(|block| self.blocks.get(block.index()))
            .and_then(Block::layout)
        {
            self.layouts.append_input_layout(block_layout, layout);
        }

        self.relayout(layout);

        // Blocks plugged in while the input was unrendered join it now.
        if let Some(child) = self.connected_block(input) {
            self.attach_stack(ConnectionOwner::Input(input), child);
        }
        self.debug_validate();
        Ok(layout)
    }

    /// Creates a field and, when possible, its layout.
    pub fn new_field(&mut self, name: &str, text: impl Into<String>) -> FieldId {
        let id = FieldId::from_index(self.fields.insert(Field::new(name, text)));
        debug!(field:% = id, name = name; "Created field");

        let Some(factory) = self.factory.as_deref() else {
            return id;
        };
        match factory.layout_for_field(&self.fields[id.index()], id, &mut self.layouts) {
            Ok(layout) => {
                self.fields[id.index()].set_layout(Some(layout));
                self.relayout(layout);
            }
            Err(err) => {
                warn!(
                    field:% = id,
                    err:err;
                    "Failed to create field layout, field stays unrendered"
                );
            }
        }
        id
    }

    pub fn append_field(&mut self, input: InputId, field: FieldId) -> Result<(), BrickworkError> {
        self.append_fields(input, [field])
    }

    /// Appends fields to an input, in order. Field layouts follow into the
    /// input layout when both exist.
    ///
    /// # Errors
    ///
    /// Nothing is appended if any id is unknown or a field already belongs
    /// to an input.
    pub fn append_fields(
        &mut self,
        input: InputId,
        fields: impl IntoIterator<Item = FieldId>,
    ) -> Result<(), BrickworkError> {
        let fields: Vec<_> = fields.into_iter().collect();
        let input_layout = self.input_ref(input)?.layout();
        for (index, &field) in fields.iter().enumerate() {
            if self.field_ref(field)?.input().is_some() || fields[..index].contains(&field) {
                return Err(BlockError::FieldAlreadyAttached(field).into());
            }
        }

        for &field in &fields {
            self.inputs[input.index()].push_field(field);
            let model = &mut self.fields[field.index()];
            model.set_input(Some(input));
            if let (Some(input_layout), Some(field_layout)) = (input_layout, model.layout()) {
                self.layouts.append_field_layout(input_layout, field_layout);
            }
        }
        debug!(input:% = input, count = fields.len(); "Appended fields");

        if let Some(input_layout) = input_layout {
            self.relayout(input_layout);
        }
        Ok(())
    }

    /// Replaces a field's text and relayouts the stack it is displayed in.
    pub fn set_field_text(
        &mut self,
        field: FieldId,
        text: impl Into<String>,
    ) -> Result<(), BrickworkError> {
        let model = self
            .fields
            .get_mut(field.index())
            .ok_or(BlockError::UnknownField(field))?;
        let text = text.into();
        model.set_text(text.clone());

        if let Some(layout) = model.layout() {
            self.layouts.set_field_text(layout, text);
            self.relayout(layout);
        }
        Ok(())
    }

    /// Adds a block as a new top-level stack at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::ConflictingConnections`] for a block with both
    /// an output and a previous connection.
    pub fn add_block(
        &mut self,
        builder: BlockBuilder,
        position: Point,
    ) -> Result<BlockId, BrickworkError> {
        builder.validate()?;

        let entry = self.blocks.vacant_entry();
        let id = BlockId::from_index(entry.key());
        let owner = ConnectionOwner::Block(id);
        let mut connection = |present: bool, kind: ConnectionKind| {
            present.then(|| self.connections.insert(kind, owner))
        };
        let previous = connection(builder.has_previous(), ConnectionKind::PreviousStatement);
        let next = connection(builder.has_next(), ConnectionKind::NextStatement);
        let output = connection(builder.has_output(), ConnectionKind::OutputValue);
        let block = entry.insert(builder.build(previous, next, output));
        debug!(block:% = id, name:% = block.name(); "Added block");

        if let Some(block_layout) = self.create_block_layout(id) {
            self.create_top_level_group(vec![block_layout], position);
        }
        Ok(id)
    }

    fn create_block_layout(&mut self, block: BlockId) -> Option<LayoutId> {
        let factory = self.factory.as_deref()?;
        match factory.layout_for_block(&self.blocks[block.index()], block, &mut self.layouts) {
            Ok(layout) => {
                self.blocks[block.index()].set_layout(Some(layout));
                Some(layout)
            }
            Err(err) => {
                warn!(
                    block:% = block,
                    err:err;
                    "Failed to create block layout, block stays unrendered"
                );
                None
            }
        }
    }

    fn create_top_level_group(
        &mut self,
        block_layouts: Vec<LayoutId>,
        position: Point,
    ) -> LayoutId {
        let group = match self
            .factory
            .as_deref()
            .map(|factory| factory.layout_for_block_group(&mut self.layouts))
        {
            Some(Ok(group)) => group,
            Some(Err(err)) => {
                warn!(err:err; "Failed to create block group layout, using a plain group");
                self.layouts.insert_block_group()
            }
            None => self.layouts.insert_block_group(),
        };

        self.layouts.append_block_layouts(group, block_layouts);
        self.layouts.append_block_group(group);
        self.layouts.move_to_workspace_position(group, position);
        self.relayout(group);
        group
    }

    /// Appends an input to a block.
    ///
    /// # Errors
    ///
    /// Fails if either id is unknown, the input already belongs to a block,
    /// or the block is itself nested inside the input.
    pub fn append_input(&mut self, block: BlockId, input: InputId) -> Result<(), BrickworkError> {
        let block_layout = self.block_ref(block)?.layout();
        let model = self.input_ref(input)?;
        if model.source_block().is_some() {
            return Err(BlockError::InputAlreadyAttached(input).into());
        }
        let input_layout = model.layout();
        if self.blocks_nested_in_input(input).contains(&block) {
            return Err(ConnectionError::WouldCreateCycle.into());
        }

        self.inputs[input.index()].set_source_block(Some(block));
        self.blocks[block.index()].push_input(input);
        debug!(block:% = block, input:% = input; "Appended input");

        if let (Some(block_layout), Some(input_layout)) = (block_layout, input_layout) {
            self.layouts.append_input_layout(block_layout, input_layout);
            self.relayout(block_layout);
        }
        self.debug_validate();
        Ok(())
    }

    pub fn set_input_alignment(
        &mut self,
        input: InputId,
        alignment: Alignment,
    ) -> Result<(), BrickworkError> {
        let model = self
            .inputs
            .get_mut(input.index())
            .ok_or(BlockError::UnknownInput(input))?;
        model.set_alignment(alignment);

        if let Some(layout) = model.layout() {
            self.layouts.set_input_alignment(layout, alignment);
            self.relayout(layout);
        }
        Ok(())
    }

    /// Links two connections and moves the child block's stack into place.
    ///
    /// The child side is the output or previous connection. Its block and
    /// every block below it leave their stack and join the parent side: the
    /// bottom of the parent block's stack, or the input's nested group.
    ///
    /// # Errors
    ///
    /// Fails without modifying anything if the connections cannot link, both
    /// belong to the same block, or the link would nest a block in itself.
    pub fn connect(&mut self, a: ConnectionId, b: ConnectionId) -> Result<(), BrickworkError> {
        self.connections.check_connect(a, b)?;

        let (parent_side, child_side) = if self.connection_kind(a)?.is_child_side() {
            (b, a)
        } else {
            (a, b)
        };
        let parent_owner = self.connection_owner(parent_side)?;
        let child_owner = self.connection_owner(child_side)?;
        let child = self.owner_block(child_owner).ok_or_else(|| {
            LayoutError::Unsupported("child connections must belong to a block".to_string())
        })?;

        if let Some(parent_block) = self.owner_block(parent_owner) {
            if parent_block == child {
                return Err(ConnectionError::SameBlock.into());
            }
            if self.is_ancestor_or_self(child, parent_block) {
                return Err(ConnectionError::WouldCreateCycle.into());
            }
        }

        self.connections.connect(parent_side, child_side)?;
        self.attach_stack(parent_owner, child);
        self.debug_validate();
        Ok(())
    }

    /// Breaks the link of `connection` and moves the child block's stack to
    /// its own top-level group, where it was displayed.
    ///
    /// Returns the former partner, or `None` if it was not linked.
    pub fn disconnect(
        &mut self,
        connection: ConnectionId,
    ) -> Result<Option<ConnectionId>, BrickworkError> {
        let kind = self.connection_kind(connection)?;
        let Some(partner) = self.connections.disconnect(connection) else {
            return Ok(None);
        };

        let child_side = if kind.is_child_side() {
            connection
        } else {
            partner
        };
        if let Some(child) = self.owner_block(self.connection_owner(child_side)?) {
            self.detach_stack(child);
        }
        self.debug_validate();
        Ok(Some(partner))
    }

    /// Moves the top-level stack containing `block` to `position`. Blocks
    /// nested in an input cannot be moved on their own.
    pub fn move_stack(&mut self, block: BlockId, position: Point) -> Result<(), BrickworkError> {
        let Some(layout) = self.block_ref(block)?.layout() else {
            return Ok(());
        };
        if let Some(group) = self.layouts.parent(layout) {
            self.layouts.move_to_workspace_position(group, position);
            self.layouts.refresh_workspace_size();
        }
        Ok(())
    }

    /// Removes a block together with everything nested in its inputs.
    ///
    /// The block is first disconnected from the block above it, and the
    /// blocks below it are moved into their own stack.
    pub fn remove_block(&mut self, block: BlockId) -> Result<(), BrickworkError> {
        let model = self.block_ref(block)?;
        let upward = model.upward_connection();
        let next = model.next_connection();
        for connection in [upward, next].into_iter().flatten() {
            self.disconnect(connection)?;
        }

        let doomed = self.blocks_nested_in_block(block);
        let mut doomed_layouts = Vec::new();
        for id in &doomed {
            let model = self.blocks.remove(id.index());
            doomed_layouts.extend(model.layout());
            for connection in model.connections() {
                self.connections.remove(connection);
            }
            for input in model.inputs() {
                let input = self.inputs.remove(input.index());
                doomed_layouts.extend(input.layout());
                if let Some(connection) = input.connection() {
                    self.connections.remove(connection);
                }
                for field in input.fields() {
                    doomed_layouts.extend(self.fields.remove(field.index()).layout());
                }
            }
        }

        for layout in doomed_layouts {
            if !self.layouts.contains(layout) {
                continue;
            }
            let parent = self.layouts.parent(layout);
            self.layouts.remove_subtree(layout);
            if let Some(parent) = parent {
                self.discard_group_if_empty(parent);
            }
        }
        self.layouts.refresh_workspace_size();

        info!(block:% = block, removed = doomed.len(); "Removed block");
        self.debug_validate();
        Ok(())
    }

    /// Changes the global scale and relayouts every root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a scale that is not a positive
    /// number.
    pub fn set_scale(&mut self, scale: f32) -> Result<(), BrickworkError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ConfigError::Validation(format!(
                "scale must be a positive number, got {scale}"
            ))
            .into());
        }
        info!(scale = scale; "Rescaling workspace");
        self.config.set_scale(scale);
        self.relayout_all();
        Ok(())
    }

    /// Replaces the layout configuration and relayouts every root.
    pub fn set_config(&mut self, config: LayoutConfig) -> Result<(), BrickworkError> {
        config.validate()?;
        self.config = config;
        self.relayout_all();
        Ok(())
    }

    /// The block plugged into `input`, if any.
    pub fn connected_block(&self, input: InputId) -> Option<BlockId> {
        let connection = self.input(input)?.connection()?;
        match self.connections.linked_owner(connection)? {
            ConnectionOwner::Block(block) => Some(block),
            ConnectionOwner::Input(_) => None,
        }
    }

    /// The block that `block` hangs below or is plugged into.
    pub fn parent_block(&self, block: BlockId) -> Option<BlockId> {
        let connection = self.block(block)?.upward_connection()?;
        self.owner_block(self.connections.linked_owner(connection)?)
    }

    pub fn next_block(&self, block: BlockId) -> Option<BlockId> {
        let connection = self.block(block)?.next_connection()?;
        match self.connections.linked_owner(connection)? {
            ConnectionOwner::Block(next) => Some(next),
            ConnectionOwner::Input(_) => None,
        }
    }

    /// Blocks that are not linked below or inside another block.
    pub fn top_blocks(&self) -> Vec<BlockId> {
        self.blocks
            .iter()
            .filter(|(_, block)| {
                block
                    .upward_connection()
                    .and_then(|connection| self.connections.get(connection))
                    .is_none_or(|connection| !connection.is_connected())
            })
            .map(|(index, _)| BlockId::from_index(index))
            .collect()
    }

    /// Checks that every block group lists its blocks in connection order.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::BrokenChain`] naming the first group whose
    /// order does not follow the next/previous links, or the lookup error for
    /// a group entry that is not a block layout.
    pub fn validate_chains(&self) -> Result<(), LayoutError> {
        for (group, node) in self.layouts.iter() {
            let LayoutKind::BlockGroup(state) = node.kind() else {
                continue;
            };
            let blocks = state
                .block_layouts()
                .iter()
                .map(|&layout| match self.layouts.try_get(layout)?.kind() {
                    LayoutKind::Block(block) => Ok(block.block()),
                    _ => Err(LayoutError::UnexpectedKind {
                        layout,
                        expected: "block",
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;

            for pair in blocks.windows(2) {
                if self.next_block(pair[0]) != Some(pair[1]) {
                    return Err(LayoutError::BrokenChain(group));
                }
            }

            if let Some(&last) = blocks.last() {
                let next = self.next_block(last);
                if next.is_some_and(|next| self.is_rendered(next)) {
                    return Err(LayoutError::BrokenChain(group));
                }
            }

            let parent = node.parent().and_then(|parent| self.layouts.get(parent));
            if let Some(LayoutKind::Input(input)) = parent.map(|parent| parent.kind()) {
                let expected = self
                    .connected_block(input.input())
                    .filter(|&block| self.is_rendered(block));
                if blocks.first().copied() != expected {
                    return Err(LayoutError::BrokenChain(group));
                }
            }
        }
        Ok(())
    }

    fn debug_validate(&self) {
        if cfg!(debug_assertions) {
            let result = self.validate_chains();
            debug_assert!(result.is_ok(), "{result:?}");
        }
    }

    fn is_rendered(&self, block: BlockId) -> bool {
        self.block(block).and_then(Block::layout).is_some()
    }

    fn connection_kind(&self, connection: ConnectionId) -> Result<ConnectionKind, ConnectionError> {
        self.connections
            .get(connection)
            .map(|connection| connection.kind())
            .ok_or(ConnectionError::UnknownConnection(connection))
    }

    fn connection_owner(
        &self,
        connection: ConnectionId,
    ) -> Result<ConnectionOwner, ConnectionError> {
        self.connections
            .get(connection)
            .map(|connection| connection.owner())
            .ok_or(ConnectionError::UnknownConnection(connection))
    }

    /// The block an owner belongs to; inputs answer with their source block.
    fn owner_block(&self, owner: ConnectionOwner) -> Option<BlockId> {
        match owner {
            ConnectionOwner::Block(block) => Some(block),
            ConnectionOwner::Input(input) => self.input(input)?.source_block(),
        }
    }

    /// Whether `ancestor` is `block` or any block above it.
    fn is_ancestor_or_self(&self, ancestor: BlockId, block: BlockId) -> bool {
        let mut current = Some(block);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_block(id);
        }
        false
    }

    /// `block` followed by every block nested in its inputs, at any depth.
    fn blocks_nested_in_block(&self, block: BlockId) -> Vec<BlockId> {
        let mut result = vec![block];
        if let Some(model) = self.block(block) {
            for &input in model.inputs() {
                result.extend(self.blocks_nested_in_input(input));
            }
        }
        result
    }

    /// The chain plugged into `input`, without what is nested in it.
    fn chain_in_input(&self, input: InputId) -> Vec<BlockId> {
        let mut chain = Vec::new();
        let mut current = self.connected_block(input);
        while let Some(block) = current {
            chain.push(block);
            current = self.next_block(block);
        }
        chain
    }

    fn blocks_nested_in_input(&self, input: InputId) -> Vec<BlockId> {
        self.chain_in_input(input)
            .into_iter()
            .flat_map(|block| self.blocks_nested_in_block(block))
            .collect()
    }

    /// Moves the child's stack under the parent side of a new link.
    fn attach_stack(&mut self, parent: ConnectionOwner, child: BlockId) {
        let Some(child_layout) = self.blocks[child.index()].layout() else {
            return;
        };
        let target = match parent {
            ConnectionOwner::Block(block) => self.blocks[block.index()]
                .layout()
                .and_then(|layout| self.layouts.parent(layout)),
            ConnectionOwner::Input(input) => self.inputs[input.index()]
                .layout()
                .and_then(|layout| self.layouts.input_block_group(layout)),
        };
        let Some(target) = target else {
            debug!(block:% = child; "Parent side is unrendered, stack stays where it is");
            return;
        };

        let source = self.layouts.parent(child_layout);
        let moved = match source {
            Some(source) => self
                .layouts
                .remove_all_starting_from_block_layout(source, child_layout),
            None => vec![child_layout],
        };
        if let Some(source) = source {
            self.discard_group_if_empty(source);
        }
        debug!(block:% = child, moved = moved.len(); "Attached stack");
        self.layouts.append_block_layouts(target, moved);
        self.relayout(target);
    }

    /// Moves `child` and the blocks below it into a new top-level group at
    /// their current absolute position.
    fn detach_stack(&mut self, child: BlockId) {
        let Some(child_layout) = self.blocks[child.index()].layout() else {
            return;
        };
        let Some(group) = self.layouts.parent(child_layout) else {
            return;
        };
        if self.layouts.is_top_level(group)
            && self.layouts.block_layouts(group).first() == Some(&child_layout)
        {
            return;
        }

        let position = self.layouts.absolute_position(child_layout);
        let previous_top = self.layouts.top_level_group_of(group);
        let moved = self
            .layouts
            .remove_all_starting_from_block_layout(group, child_layout);
        debug!(block:% = child, moved = moved.len(); "Detached stack");
        self.create_top_level_group(moved, position);

        match previous_top {
            Some(top) => self.relayout(top),
            None => self.relayout(group),
        }
    }

    /// Drops a top-level group that no longer holds any block.
    fn discard_group_if_empty(&mut self, group: LayoutId) {
        if self.layouts.is_top_level(group) && self.layouts.block_layouts(group).is_empty() {
            self.layouts.remove_subtree(group);
            self.layouts.refresh_workspace_size();
        }
    }

    /// Re-runs the sizing pass for the top-level stack containing `layout`,
    /// or for its detached subtree.
    fn relayout(&mut self, layout: LayoutId) {
        let target = self
            .layouts
            .top_level_group_of(layout)
            .unwrap_or_else(|| self.layouts.topmost_ancestor(layout));
        let ctx = LayoutContext::new(&self.config, self.measurer.as_ref());
        self.layouts.layout_children(target, &ctx);
        self.layouts.refresh_workspace_size();
    }

    /// Lays out every root, detached subtrees included, and forces a redraw
    /// of every node.
    fn relayout_all(&mut self) {
        let roots: Vec<_> = self
            .layouts
            .iter()
            .filter(|(_, node)| node.parent().is_none())
            .map(|(id, _)| id)
            .collect();

        let ctx = LayoutContext::new(&self.config, self.measurer.as_ref());
        for root in roots {
            self.layouts.layout_children(root, &ctx);
            self.layouts.mark_display_changed_for_tree(root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::testing::SizeMeasurer;

    fn workspace() -> Workspace {
        Workspace::builder(LayoutConfig::default())
            .with_measurer(SizeMeasurer)
            .build()
    }

    fn statement_block(workspace: &mut Workspace, label: &str) -> BlockId {
        let block = workspace
            .add_block(
                BlockBuilder::new("statement").with_previous().with_next(),
                Point::default(),
            )
            .unwrap();
        let input = workspace.new_input(InputType::Dummy, "LABEL");
        let field = workspace.new_field("TEXT", label);
        workspace.append_field(input, field).unwrap();
        workspace.append_input(block, input).unwrap();
        block
    }

    #[test]
    fn test_validate_chains_detects_reordered_group() {
        let mut workspace = workspace();
        let first = statement_block(&mut workspace, "10x10");
        let second = statement_block(&mut workspace, "10x10");
        let next = workspace.block(first).unwrap().next_connection().unwrap();
        let previous = workspace
            .block(second)
            .unwrap()
            .previous_connection()
            .unwrap();
        workspace.connect(next, previous).unwrap();
        assert_eq!(workspace.validate_chains(), Ok(()));

        // Reverse the layout order behind the workspace's back.
        let first_layout = workspace.block(first).unwrap().layout().unwrap();
        let second_layout = workspace.block(second).unwrap().layout().unwrap();
        let group = workspace.layouts.parent(first_layout).unwrap();
        workspace
            .layouts
            .remove_all_starting_from_block_layout(group, first_layout);
        workspace
            .layouts
            .append_block_layouts(group, [second_layout, first_layout]);

        assert_eq!(
            workspace.validate_chains(),
            Err(LayoutError::BrokenChain(group))
        );
    }

    #[test]
    fn test_nested_block_collection() {
        let mut workspace = workspace();
        let outer = workspace
            .add_block(BlockBuilder::new("outer").with_next(), Point::default())
            .unwrap();
        let body = workspace.new_input(InputType::Statement, "DO");
        workspace.append_input(outer, body).unwrap();
        let inner = statement_block(&mut workspace, "5x5");
        let below_inner = statement_block(&mut workspace, "5x5");

        let body_connection = workspace.input(body).unwrap().connection().unwrap();
        let inner_previous = workspace
            .block(inner)
            .unwrap()
            .previous_connection()
            .unwrap();
        workspace.connect(body_connection, inner_previous).unwrap();
        let inner_next = workspace.block(inner).unwrap().next_connection().unwrap();
        let below_previous = workspace
            .block(below_inner)
            .unwrap()
            .previous_connection()
            .unwrap();
        workspace.connect(inner_next, below_previous).unwrap();

        assert_eq!(workspace.chain_in_input(body), vec![inner, below_inner]);
        assert_eq!(
            workspace.blocks_nested_in_block(outer),
            vec![outer, inner, below_inner]
        );
        assert!(workspace.is_ancestor_or_self(outer, below_inner));
        assert!(!workspace.is_ancestor_or_self(inner, outer));
    }
}
