//! Coordinate and geometry types shared by the scene tree and the layout
//! solver.
//!
//! Canonical space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Renderers receive finalized [`Transform2D`] values and convert to their
//! own clip space; nothing in this crate assumes a particular backend.

mod axis;
mod edges;
mod rect;
mod transform;

pub use axis::Axis;
pub use edges::Edges;
pub use rect::Rect;
pub use transform::Transform2D;
