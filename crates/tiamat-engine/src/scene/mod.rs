//! The retained scene tree and its per-frame passes.
//!
//! Responsibilities:
//! - arena-backed tree storage with generational ids (`graph`);
//! - enumerated dirty tracking (`recalc`) driving incremental updates;
//! - transform/alpha/bounds recomputation and culling (`update`);
//! - z-context registration and lazy draw-order sorting (`zorder`);
//! - paint-order render list construction (`render`).

mod graph;
pub(crate) mod node;
mod recalc;
pub(crate) mod render;
pub(crate) mod update;
pub(crate) mod zorder;

pub use graph::{NodeId, SceneGraph};
pub use node::{OutOfBounds, SceneNode, SizeFn, TransformCtx};
pub use recalc::Recalc;
pub use render::{RenderItem, RenderList, RenderQuad};
