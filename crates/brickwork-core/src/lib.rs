//! Brickwork Core Types
//!
//! Leaf types shared by the Brickwork block layout engine:
//!
//! - **Geometry**: points, sizes, bounds and insets ([`geometry`] module)
//! - **Colors**: CSS color parsing for block fills ([`color::Color`])
//! - **Identifiers**: interned block, input and field names ([`identifier::Id`])
//! - **Text**: single-line label measurement ([`text`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod text;
