use core::fmt;

use crate::coords::{Rect, Transform2D};
use crate::flex::FlexState;

use super::recalc::Recalc;
use super::zorder::ZContext;
use super::NodeId;

/// Relative-size function: maps the padded parent axis extent to a size.
/// Re-evaluated every layout pass, never cached.
pub type SizeFn = Box<dyn Fn(f32) -> f32>;

/// Composed transform + alpha for one node.
///
/// Every node has a *world* context. A distinct *render* context exists only
/// below a render-to-offscreen ancestor, rooted at that ancestor's surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformCtx {
    pub alpha: f32,
    pub matrix: Transform2D,
}

impl TransformCtx {
    pub const IDENTITY: TransformCtx = TransformCtx {
        alpha: 1.0,
        matrix: Transform2D::IDENTITY,
    };
}

/// Culling classification against the effective clip region.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OutOfBounds {
    /// Intersects the clip region; rendered normally.
    #[default]
    In,
    /// Outside the clip but within the bounds margin. Not drawn, children
    /// still visited so preload signaling keeps working near the edge.
    Margin,
    /// Beyond the margin. The whole subtree is skipped; descendants inherit
    /// this state unconditionally until the next recompute.
    Out,
}

impl OutOfBounds {
    #[inline]
    pub fn is_out(self) -> bool {
        matches!(self, OutOfBounds::Out)
    }
}

/// One node of the scene tree.
///
/// Local geometry is what the application sets; everything under "computed"
/// is owned by the update pass and the layout solver. Fields are
/// crate-private; mutation goes through [`super::SceneGraph`] setters so
/// dirty bits stay consistent.
pub struct SceneNode {
    // tree links
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,

    // local geometry
    pub(crate) x: f32,
    pub(crate) y: f32,
    /// Specified sizes; zero means unset (fit-to-contents for containers).
    pub(crate) src_w: f32,
    pub(crate) src_h: f32,
    /// Resolved sizes, rewritten by the layout solver.
    pub(crate) w: f32,
    pub(crate) h: f32,
    pub(crate) scale_x: f32,
    pub(crate) scale_y: f32,
    pub(crate) rotation: f32,
    /// Rotation/scale center, relative `[0, 1]` within the node box.
    pub(crate) pivot_x: f32,
    pub(crate) pivot_y: f32,
    /// Anchor that `(x, y)` positions, relative `[0, 1]` within the node box.
    pub(crate) mount_x: f32,
    pub(crate) mount_y: f32,
    pub(crate) alpha: f32,
    pub(crate) visible: bool,
    pub(crate) z_index: i32,
    pub(crate) render_to_texture: bool,
    pub(crate) force_z_context: bool,

    pub(crate) func_w: Option<SizeFn>,
    pub(crate) func_h: Option<SizeFn>,

    // computed
    pub(crate) local: Transform2D,
    pub(crate) world: TransformCtx,
    /// `None` means the render context aliases the world context.
    pub(crate) render: Option<TransformCtx>,
    pub(crate) bbox: Rect,
    pub(crate) out_of_bounds: OutOfBounds,
    pub(crate) tree_order: u32,

    // dirty tracking
    pub(crate) recalc: Recalc,
    /// Subtree (self or any descendant) has pending recalc bits.
    pub(crate) has_updates: bool,
    /// Frame stamp guarding the became-visible work-list (one wake per tick).
    pub(crate) wake_frame: u64,

    // z ordering
    /// The z-context this node is registered with (set iff z_index != 0).
    pub(crate) z_owner: Option<NodeId>,
    /// Present iff this node is itself a z-context root.
    pub(crate) z_ctx: Option<Box<ZContext>>,

    // flex facets, created lazily
    pub(crate) flex: Option<Box<FlexState>>,
}

impl SceneNode {
    pub(crate) fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            src_w: 0.0,
            src_h: 0.0,
            w: 0.0,
            h: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            pivot_x: 0.0,
            pivot_y: 0.0,
            mount_x: 0.0,
            mount_y: 0.0,
            alpha: 1.0,
            visible: true,
            z_index: 0,
            render_to_texture: false,
            force_z_context: false,
            func_w: None,
            func_h: None,
            local: Transform2D::IDENTITY,
            world: TransformCtx::IDENTITY,
            render: None,
            bbox: Rect::default(),
            out_of_bounds: OutOfBounds::In,
            tree_order: 0,
            recalc: Recalc::REFRESH,
            has_updates: true,
            wake_frame: 0,
            z_owner: None,
            z_ctx: None,
            flex: None,
        }
    }

    /// Effective context for rendering: the offscreen-rooted one when it
    /// diverged, the world context otherwise.
    #[inline]
    pub fn render_ctx(&self) -> TransformCtx {
        self.render.unwrap_or(self.world)
    }

    /// Whether this node roots a z-context. The tree root is one regardless
    /// of configuration; `is_root` supplies that.
    #[inline]
    pub(crate) fn is_z_context_root(&self, is_root: bool) -> bool {
        is_root || self.force_z_context || self.z_index != 0 || self.render_to_texture
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("w", &self.w)
            .field("h", &self.h)
            .field("alpha", &self.alpha)
            .field("visible", &self.visible)
            .field("z_index", &self.z_index)
            .field("recalc", &self.recalc)
            .field("out_of_bounds", &self.out_of_bounds)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}
