use log::trace;

use brickwork_core::geometry::{Point, Size};

use super::{LayoutContext, LayoutId, LayoutKind, LayoutTree, tree::report_kind_mismatch};
use crate::model::{Alignment, InputId, InputType};

/// Layout of an input: its fields in a row, followed by the group of blocks
/// plugged into it.
#[derive(Debug, Clone)]
pub struct InputLayout {
    input: InputId,
    input_type: InputType,
    alignment: Alignment,
    visible: bool,
    field_layouts: Vec<LayoutId>,
    block_group: Option<LayoutId>,
}

impl InputLayout {
    pub fn new(input: InputId, input_type: InputType, alignment: Alignment, visible: bool) -> Self {
        Self {
            input,
            input_type,
            alignment,
            visible,
            field_layouts: Vec::new(),
            block_group: None,
        }
    }

    pub fn input(&self) -> InputId {
        self.input
    }

    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn field_layouts(&self) -> &[LayoutId] {
        &self.field_layouts
    }

    /// The group holding plugged-in blocks. Dummy inputs have none.
    pub fn block_group(&self) -> Option<LayoutId> {
        self.block_group
    }

    pub(super) fn accepts_blocks(&self) -> bool {
        self.input_type != InputType::Dummy
    }

    pub(super) fn set_block_group(&mut self, group: Option<LayoutId>) {
        self.block_group = group;
    }

    pub(super) fn remove_child(&mut self, child: LayoutId) {
        if self.block_group == Some(child) {
            self.block_group = None;
        }
        self.field_layouts.retain(|&id| id != child);
    }
}

impl LayoutTree {
    fn input_mut(&mut self, input_layout: LayoutId) -> Option<&mut InputLayout> {
        match self.kind_mut(input_layout) {
            Some(LayoutKind::Input(state)) => Some(state),
            other => {
                report_kind_mismatch(input_layout, "input", other.map(|kind| kind.name()));
                None
            }
        }
    }

    fn input_state(&self, input_layout: LayoutId) -> Option<&InputLayout> {
        match self.get(input_layout).map(|node| node.kind()) {
            Some(LayoutKind::Input(state)) => Some(state),
            _ => None,
        }
    }

    pub fn field_layouts(&self, input_layout: LayoutId) -> &[LayoutId] {
        self.input_state(input_layout)
            .map(InputLayout::field_layouts)
            .unwrap_or_default()
    }

    pub fn input_block_group(&self, input_layout: LayoutId) -> Option<LayoutId> {
        self.input_state(input_layout)
            .and_then(InputLayout::block_group)
    }

    pub(super) fn input_alignment(&self, input_layout: LayoutId) -> Alignment {
        self.input_state(input_layout)
            .map(InputLayout::alignment)
            .unwrap_or_default()
    }

    pub fn append_field_layout(&mut self, input_layout: LayoutId, field_layout: LayoutId) {
        let Some(state) = self.input_mut(input_layout) else {
            return;
        };
        state.field_layouts.push(field_layout);
        self.set_parent(field_layout, Some(input_layout));
    }

    /// Appends several field layouts, keeping their order.
    pub fn append_field_layouts(
        &mut self,
        input_layout: LayoutId,
        field_layouts: impl IntoIterator<Item = LayoutId>,
    ) {
        for field_layout in field_layouts {
            self.append_field_layout(input_layout, field_layout);
        }
    }

    pub fn set_input_alignment(&mut self, input_layout: LayoutId, alignment: Alignment) {
        let Some(state) = self.input_mut(input_layout) else {
            return;
        };
        if state.alignment != alignment {
            state.alignment = alignment;
            self.mark_display_changed(input_layout);
        }
    }

    pub(super) fn layout_input(&mut self, input_layout: LayoutId, ctx: &LayoutContext<'_>) {
        let Some(state) = self.input_state(input_layout) else {
            return;
        };
        if !state.is_visible() {
            self.set_content_size(input_layout, Size::zero());
            return;
        }
        let input_type = state.input_type();
        let field_layouts = state.field_layouts().to_vec();
        let block_group = state.block_group();

        let config = ctx.config();
        let mut x_offset = 0.0;
        let mut size = Size::zero();
        for (index, field_layout) in field_layouts.into_iter().enumerate() {
            self.layout_children(field_layout, ctx);
            if index > 0 {
                x_offset += config.field_spacing();
            }
            let origin = Point::new(x_offset, 0.0);
            self.set_relative_position(field_layout, origin);

            let total = self[field_layout].total_size();
            size = size.fit(origin, total);
            x_offset += total.width();
        }

        if let Some(group) = block_group {
            self.layout_children(group, ctx);

            let x = match input_type {
                InputType::Statement => x_offset.max(config.statement_indent()),
                InputType::Value | InputType::Dummy => x_offset,
            };
            let origin = Point::new(x, 0.0);
            self.set_relative_position(group, origin);
            size = size.fit(origin, self[group].total_size());

            if input_type == InputType::Statement && self.block_layouts(group).is_empty() {
                size = size.fit(origin, Size::new(0.0, config.empty_statement_height()));
            }
        }

        trace!(
            input:% = input_layout,
            width = size.width(),
            height = size.height();
            "Laid out input"
        );
        self.set_content_size(input_layout, size);
    }
}
