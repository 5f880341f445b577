//! Integration tests for the Workspace API
//!
//! Field labels are measured from their text, written as `"<width>x<height>"`,
//! so expected sizes can be computed by hand.

use brickwork::{
    BrickworkError, Workspace,
    config::{LayoutConfig, StyleConfig},
    export::svg::{SvgView, render_svg},
    geometry::{Point, Size},
    layout::{
        DefaultLayoutFactory, FieldLayout, FieldMeasurer, LayoutError, LayoutEventKind,
        LayoutFactory, LayoutId, LayoutTree,
    },
    model::{
        Block, BlockBuilder, BlockError, BlockId, ConnectionError, ConnectionId, Field, FieldId,
        Input, InputId, InputType,
    },
    view::{FieldLabelView, ViewManager},
};

struct TextSizeMeasurer;

impl FieldMeasurer for TextSizeMeasurer {
    fn measure_field(&self, field: &FieldLayout, config: &LayoutConfig) -> Size {
        let Some((width, height)) = field.text().split_once('x') else {
            return Size::zero();
        };
        match (width.parse(), height.parse()) {
            (Ok(width), Ok(height)) => Size::new(width, height).scale(config.scale()),
            _ => Size::zero(),
        }
    }
}

/// Renders blocks and fields, but no inputs.
struct NoInputLayouts;

impl LayoutFactory for NoInputLayouts {
    fn layout_for_block(
        &self,
        block: &Block,
        id: BlockId,
        tree: &mut LayoutTree,
    ) -> Result<LayoutId, LayoutError> {
        DefaultLayoutFactory.layout_for_block(block, id, tree)
    }

    fn layout_for_input(
        &self,
        _input: &Input,
        _id: InputId,
        _tree: &mut LayoutTree,
    ) -> Result<LayoutId, LayoutError> {
        Err(LayoutError::Unsupported("inputs are not rendered".to_string()))
    }

    fn layout_for_field(
        &self,
        field: &Field,
        id: FieldId,
        tree: &mut LayoutTree,
    ) -> Result<LayoutId, LayoutError> {
        DefaultLayoutFactory.layout_for_field(field, id, tree)
    }
}

fn workspace() -> Workspace {
    let _ = env_logger::builder().is_test(true).try_init();
    Workspace::builder(LayoutConfig::default())
        .with_measurer(TextSizeMeasurer)
        .build()
}

/// A statement block with one dummy input holding a `label` field.
fn statement_block(workspace: &mut Workspace, label: &str, position: Point) -> BlockId {
    let block = workspace
        .add_block(
            BlockBuilder::new("statement").with_previous().with_next(),
            position,
        )
        .expect("valid shape");
    let input = workspace.new_input(InputType::Dummy, "LABEL");
    let field = workspace.new_field("TEXT", label);
    workspace.append_field(input, field).expect("known ids");
    workspace.append_input(block, input).expect("known ids");
    block
}

fn block_layout(workspace: &Workspace, block: BlockId) -> LayoutId {
    workspace
        .block(block)
        .and_then(Block::layout)
        .expect("block is rendered")
}

fn previous_connection(workspace: &Workspace, block: BlockId) -> ConnectionId {
    workspace
        .block(block)
        .and_then(Block::previous_connection)
        .expect("block has a previous connection")
}

fn link_below(workspace: &mut Workspace, upper: BlockId, lower: BlockId) {
    let next = workspace.block(upper).unwrap().next_connection().unwrap();
    let previous = previous_connection(workspace, lower);
    workspace.connect(next, previous).expect("blocks can stack");
}

#[test]
fn test_block_size_follows_its_fields() {
    let mut workspace = workspace();
    let block = statement_block(&mut workspace, "40x10", Point::new(10.0, 10.0));
    let layout = block_layout(&workspace, block);

    // Padding (4, 8, 4, 8) plus a 4 notch below.
    assert_eq!(
        workspace.layouts()[layout].total_size(),
        Size::new(56.0, 22.0)
    );
    assert_eq!(
        workspace.layouts().absolute_position(layout),
        Point::new(10.0, 10.0)
    );
    assert_eq!(workspace.validate_chains(), Ok(()));
}

#[test]
fn test_connect_and_disconnect_move_stacks() {
    let mut workspace = workspace();
    let upper = statement_block(&mut workspace, "40x10", Point::new(10.0, 10.0));
    let lower = statement_block(&mut workspace, "40x10", Point::new(200.0, 200.0));
    assert_eq!(workspace.layouts().block_groups().len(), 2);

    link_below(&mut workspace, upper, lower);

    let lower_layout = block_layout(&workspace, lower);
    assert_eq!(workspace.layouts().block_groups().len(), 1);
    assert_eq!(
        workspace.layouts().parent(lower_layout),
        workspace.layouts().parent(block_layout(&workspace, upper))
    );
    // Stacked one block height minus the notch below the upper block.
    assert_eq!(
        workspace.layouts().absolute_position(lower_layout),
        Point::new(10.0, 28.0)
    );
    assert_eq!(workspace.next_block(upper), Some(lower));
    assert_eq!(workspace.parent_block(lower), Some(upper));
    assert_eq!(workspace.top_blocks(), vec![upper]);

    let previous = previous_connection(&workspace, lower);
    let next = workspace.block(upper).unwrap().next_connection().unwrap();
    assert_eq!(workspace.disconnect(previous).unwrap(), Some(next));

    assert_eq!(workspace.layouts().block_groups().len(), 2);
    assert_eq!(
        workspace.layouts().absolute_position(lower_layout),
        Point::new(10.0, 28.0)
    );
    assert_eq!(workspace.next_block(upper), None);
    assert_eq!(workspace.validate_chains(), Ok(()));

    // Disconnecting again is a no-op.
    assert_eq!(workspace.disconnect(previous).unwrap(), None);
}

#[test]
fn test_disconnect_in_the_middle_splits_the_stack() {
    let mut workspace = workspace();
    let blocks: Vec<_> = (0..3)
        .map(|_| statement_block(&mut workspace, "40x10", Point::default()))
        .collect();
    link_below(&mut workspace, blocks[0], blocks[1]);
    link_below(&mut workspace, blocks[1], blocks[2]);
    assert_eq!(workspace.layouts().block_groups().len(), 1);

    let previous = previous_connection(&workspace, blocks[1]);
    workspace.disconnect(previous).unwrap();

    let groups = workspace.layouts().block_groups();
    assert_eq!(groups.len(), 2);
    let moved = workspace.layouts().block_layouts(groups[1]);
    assert_eq!(
        moved,
        &[
            block_layout(&workspace, blocks[1]),
            block_layout(&workspace, blocks[2])
        ]
    );
    assert_eq!(
        workspace.layouts()[groups[1]].relative_position(),
        Point::new(0.0, 18.0)
    );
    assert_eq!(workspace.validate_chains(), Ok(()));
}

#[test]
fn test_statement_input_nests_a_stack() {
    let mut workspace = workspace();
    let outer = workspace
        .add_block(
            BlockBuilder::new("controls_repeat")
                .with_previous()
                .with_next(),
            Point::default(),
        )
        .unwrap();
    let body = workspace.new_input(InputType::Statement, "DO");
    let label = workspace.new_field("LABEL", "30x10");
    workspace.append_field(body, label).unwrap();
    workspace.append_input(outer, body).unwrap();

    let first = statement_block(&mut workspace, "40x10", Point::new(300.0, 0.0));
    let second = statement_block(&mut workspace, "40x10", Point::new(300.0, 100.0));
    link_below(&mut workspace, first, second);

    let body_connection = workspace.input(body).unwrap().connection().unwrap();
    let first_previous = previous_connection(&workspace, first);
    workspace.connect(body_connection, first_previous).unwrap();

    let body_layout = workspace.input(body).unwrap().layout().unwrap();
    let nested_group = workspace.layouts().input_block_group(body_layout).unwrap();
    assert_eq!(
        workspace.layouts().block_layouts(nested_group),
        &[block_layout(&workspace, first), block_layout(&workspace, second)]
    );
    assert_eq!(workspace.layouts().block_groups().len(), 1);
    assert_eq!(workspace.connected_block(body), Some(first));
    assert_eq!(workspace.parent_block(first), Some(outer));
    // The nested stack sits right of the label, inside the outer padding.
    assert_eq!(
        workspace
            .layouts()
            .absolute_position(block_layout(&workspace, first)),
        Point::new(38.0, 4.0)
    );
    assert_eq!(workspace.validate_chains(), Ok(()));
}

#[test]
fn test_same_block_and_cycles_are_rejected() {
    let mut workspace = workspace();
    let outer = workspace
        .add_block(BlockBuilder::new("outer").with_previous(), Point::default())
        .unwrap();
    let outer_body = workspace.new_input(InputType::Statement, "DO");
    workspace.append_input(outer, outer_body).unwrap();

    let outer_body_connection = workspace.input(outer_body).unwrap().connection().unwrap();
    let outer_previous = previous_connection(&workspace, outer);
    let err = workspace
        .connect(outer_body_connection, outer_previous)
        .unwrap_err();
    assert!(matches!(err, BrickworkError::Connection(ConnectionError::SameBlock)));

    let inner = workspace
        .add_block(BlockBuilder::new("inner").with_previous(), Point::default())
        .unwrap();
    let inner_body = workspace.new_input(InputType::Statement, "DO");
    workspace.append_input(inner, inner_body).unwrap();
    let inner_previous = previous_connection(&workspace, inner);
    workspace
        .connect(outer_body_connection, inner_previous)
        .unwrap();

    let inner_body_connection = workspace.input(inner_body).unwrap().connection().unwrap();
    let err = workspace
        .connect(inner_body_connection, outer_previous)
        .unwrap_err();
    assert!(matches!(
        err,
        BrickworkError::Connection(ConnectionError::WouldCreateCycle)
    ));
    let link = workspace.connections().get(outer_previous).unwrap();
    assert!(!link.is_connected());
}

#[test]
fn test_unrendered_input_still_connects() {
    let mut workspace = Workspace::builder(LayoutConfig::default())
        .with_measurer(TextSizeMeasurer)
        .with_layout_factory(NoInputLayouts)
        .build();
    let value = workspace.new_input(InputType::Value, "NUM");
    assert!(workspace.input(value).unwrap().layout().is_none());
    assert!(matches!(
        workspace.try_layout_input(value),
        Err(BrickworkError::Layout(LayoutError::Unsupported(_)))
    ));

    let number = workspace
        .add_block(
            BlockBuilder::new("math_number").with_output(),
            Point::default(),
        )
        .unwrap();
    let output = workspace
        .block(number)
        .unwrap()
        .output_connection()
        .unwrap();
    let socket = workspace.input(value).unwrap().connection().unwrap();
    workspace.connect(socket, output).unwrap();

    assert_eq!(workspace.connected_block(value), Some(number));
    let number_group = workspace
        .layouts()
        .parent(block_layout(&workspace, number))
        .unwrap();
    assert!(workspace.layouts().is_top_level(number_group));
    assert_eq!(workspace.validate_chains(), Ok(()));
}

#[test]
fn test_headless_workspace_keeps_the_model() {
    let mut workspace = Workspace::builder(LayoutConfig::default())
        .without_layout_factory()
        .build();
    let upper = statement_block(&mut workspace, "40x10", Point::default());
    let lower = statement_block(&mut workspace, "40x10", Point::default());
    link_below(&mut workspace, upper, lower);

    assert!(workspace.block(upper).unwrap().layout().is_none());
    assert_eq!(workspace.layouts().len(), 1);
    assert_eq!(workspace.next_block(upper), Some(lower));
    assert!(workspace.take_layout_events().is_empty());
}

#[test]
fn test_remove_block_recycles_its_views() {
    let mut workspace = workspace();
    let upper = statement_block(&mut workspace, "40x10", Point::default());
    let middle = statement_block(&mut workspace, "20x10", Point::default());
    let lower = statement_block(&mut workspace, "30x10", Point::default());
    link_below(&mut workspace, upper, middle);
    link_below(&mut workspace, middle, lower);

    let mut views: ViewManager<FieldLabelView> = ViewManager::new();
    let events = workspace.take_layout_events();
    views.apply_events(&events, workspace.layouts(), &workspace.layout_context());
    assert_eq!(views.len(), 3);

    let fields = workspace.field_count();
    workspace.remove_block(middle).unwrap();
    let events = workspace.take_layout_events();
    views.apply_events(&events, workspace.layouts(), &workspace.layout_context());

    assert!(workspace.block(middle).is_none());
    assert_eq!(workspace.field_count(), fields - 1);
    assert_eq!(views.len(), 2);
    assert_eq!(views.pool_len(), 1);
    assert_eq!(workspace.next_block(upper), None);
    assert_eq!(workspace.layouts().block_groups().len(), 2);
    assert_eq!(workspace.validate_chains(), Ok(()));
}

#[test]
fn test_remove_block_takes_nested_blocks_along() {
    let mut workspace = workspace();
    let outer = workspace
        .add_block(BlockBuilder::new("outer").with_previous(), Point::default())
        .unwrap();
    let body = workspace.new_input(InputType::Statement, "DO");
    workspace.append_input(outer, body).unwrap();
    let inner = statement_block(&mut workspace, "10x10", Point::default());
    let body_connection = workspace.input(body).unwrap().connection().unwrap();
    let inner_previous = previous_connection(&workspace, inner);
    workspace.connect(body_connection, inner_previous).unwrap();
    let connections = workspace.connections().len();

    workspace.remove_block(outer).unwrap();

    assert_eq!(workspace.block_count(), 0);
    assert_eq!(workspace.input_count(), 0);
    assert_eq!(workspace.field_count(), 0);
    assert!(workspace.connections().len() < connections);
    assert!(workspace.connections().is_empty());
    assert!(workspace.layouts().block_groups().is_empty());
    assert_eq!(workspace.layouts().len(), 1);
}

#[test]
fn test_set_scale_resizes_every_block() {
    let mut workspace = workspace();
    let block = statement_block(&mut workspace, "40x10", Point::default());
    let layout = block_layout(&workspace, block);
    workspace.take_layout_events();

    workspace.set_scale(2.0).unwrap();

    assert_eq!(
        workspace.layouts()[layout].total_size(),
        Size::new(112.0, 44.0)
    );
    let events = workspace.take_layout_events();
    assert!(events.iter().any(|event| {
        event.layout == layout && event.kind == LayoutEventKind::DisplayChanged
    }));

    assert!(matches!(workspace.set_scale(0.0), Err(BrickworkError::Config(_))));
    assert_eq!(workspace.config().scale(), 2.0);
}

#[test]
fn test_field_text_and_duplicate_fields() {
    let mut workspace = workspace();
    let block = statement_block(&mut workspace, "40x10", Point::default());
    let input = workspace.block(block).unwrap().inputs()[0];
    let field = workspace.input(input).unwrap().fields()[0];

    workspace.set_field_text(field, "60x10").unwrap();
    assert_eq!(workspace.field(field).unwrap().text(), "60x10");
    assert_eq!(
        workspace.layouts()[block_layout(&workspace, block)].total_size(),
        Size::new(76.0, 22.0)
    );

    let err = workspace.append_field(input, field).unwrap_err();
    assert!(matches!(
        err,
        BrickworkError::Block(BlockError::FieldAlreadyAttached(id)) if id == field
    ));
    let err = workspace.append_input(block, input).unwrap_err();
    assert!(matches!(
        err,
        BrickworkError::Block(BlockError::InputAlreadyAttached(_))
    ));
}

#[test]
fn test_svg_snapshot_of_workspace() {
    let mut workspace = workspace();
    let upper = statement_block(&mut workspace, "40x10", Point::new(10.0, 10.0));
    let lower = statement_block(&mut workspace, "30x10", Point::default());
    link_below(&mut workspace, upper, lower);

    let mut views: ViewManager<SvgView> = ViewManager::new();
    let events = workspace.take_layout_events();
    views.apply_events(&events, workspace.layouts(), &workspace.layout_context());

    let svg = render_svg(&views, &StyleConfig::default()).expect("default style renders");
    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert_eq!(svg.matches("<rect").count(), 2);
    assert!(svg.contains("40x10"));
    assert!(svg.contains("30x10"));
}

#[test]
fn test_svg_draws_stack_moved_into_statement_above_its_parent() {
    let mut workspace = workspace();
    // Created first, so its views are bound before the outer block's.
    let child = statement_block(&mut workspace, "40x10", Point::new(300.0, 0.0));
    let outer = workspace
        .add_block(
            BlockBuilder::new("controls_repeat")
                .with_previous()
                .with_next(),
            Point::default(),
        )
        .unwrap();
    let body = workspace.new_input(InputType::Statement, "DO");
    let label = workspace.new_field("LABEL", "30x10");
    workspace.append_field(body, label).unwrap();
    workspace.append_input(outer, body).unwrap();

    let mut views: ViewManager<SvgView> = ViewManager::new();
    let events = workspace.take_layout_events();
    views.apply_events(&events, workspace.layouts(), &workspace.layout_context());

    let body_connection = workspace.input(body).unwrap().connection().unwrap();
    let child_previous = previous_connection(&workspace, child);
    workspace.connect(body_connection, child_previous).unwrap();
    let events = workspace.take_layout_events();
    assert!(events.iter().any(|event| {
        event.layout == block_layout(&workspace, child)
            && event.kind == LayoutEventKind::DisplayChanged
    }));
    views.apply_events(&events, workspace.layouts(), &workspace.layout_context());

    let svg = render_svg(&views, &StyleConfig::default()).unwrap();
    assert_eq!(svg.matches("<rect").count(), 2);
    // Labels come after every block, so the first match is the block itself.
    let outer_rect = svg.find("x=\"0\"").unwrap();
    let child_rect = svg.find("x=\"38\"").unwrap();
    assert!(
        outer_rect < child_rect,
        "nested block must be drawn after its parent"
    );
}
