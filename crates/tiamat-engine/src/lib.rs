//! Tiamat engine crate.
//!
//! A retained 2D scene graph with dirty-flag-driven incremental updates and
//! a flexbox-style layout solver. No renderer lives here: a frame produces a
//! [`scene::RenderList`] of GPU-ready quads for a backend to consume.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`coords`] | `Rect`, `Edges`, `Axis`, `Transform2D` |
//! | [`scene`] | `SceneGraph`, `NodeId`, update/culling/z-order passes |
//! | [`flex`] | container/item facets and the layout solver |
//! | [`stage`] | `Stage`: per-frame pipeline orchestration |
//! | [`logging`] | env_logger setup shared by binaries and tests |

pub mod coords;
pub mod flex;
pub mod logging;
pub mod scene;
pub mod stage;

pub use scene::{NodeId, OutOfBounds, Recalc, RenderList, SceneGraph};
pub use stage::Stage;
