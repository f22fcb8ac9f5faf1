//! The per-frame update pass.
//!
//! Responsibilities:
//! - stamp document order and refresh z-context registrations (full walk,
//!   integer work only);
//! - recompute local/world/render transforms, alpha and bounding boxes for
//!   dirty subtrees, skipping clean ones;
//! - classify nodes against the viewport with the bounds margin, stamping
//!   culled subtrees through a work-list and recording re-entries as the
//!   frame's preload signal.
//!
//! Runs after the layout scheduler, so resolved sizes and finalized item
//! positions are already in place.

use crate::coords::{Rect, Transform2D};
use crate::scene::node::{OutOfBounds, TransformCtx};
use crate::scene::{zorder, NodeId, Recalc, SceneGraph};

/// State inherited down the tree during the transform walk.
#[derive(Copy, Clone)]
struct Inherited {
    world: TransformCtx,
    /// Offscreen-rooted context; `None` until a render-to-texture ancestor.
    render: Option<TransformCtx>,
    /// Recalc bits the ancestors force on this subtree.
    forced: Recalc,
}

pub(crate) struct UpdatePass {
    viewport: Rect,
    margin: f32,
    frame: u64,
}

impl UpdatePass {
    pub(crate) fn new(viewport: Rect, margin: f32, frame: u64) -> Self {
        Self {
            viewport,
            margin,
            frame,
        }
    }

    pub(crate) fn run(&self, g: &mut SceneGraph) {
        stamp_order_and_z(g);

        let root = g.root();
        let inherited = Inherited {
            world: TransformCtx::IDENTITY,
            render: None,
            forced: Recalc::NONE,
        };
        self.visit(g, root, inherited);
    }

    fn visit(&self, g: &mut SceneGraph, id: NodeId, inh: Inherited) {
        if !g.node(id).visible {
            // Frozen subtree; pending recalc bits stay until it shows again.
            return;
        }

        let was_out = g.node(id).out_of_bounds.is_out();
        let recalc = {
            let n = g.node(id);
            let mut r = n.recalc;
            r.insert(inh.forced);
            r
        };

        if recalc.is_empty() && !g.node(id).has_updates {
            return;
        }

        let geometry = recalc.intersects(Recalc::POSITION | Recalc::SIZE | Recalc::TRANSFORM);
        if geometry {
            self.recompute_transforms(g, id, &inh);
            self.classify(g, id);
        }

        let out = g.node(id).out_of_bounds;
        if out.is_out() {
            stamp_subtree_out(g, id);
            let n = g.node_mut(id);
            n.recalc.clear();
            n.has_updates = false;
            return;
        }

        // Re-entry into the (margin-extended) viewport, or a subtree that
        // just became visible: a preload signal, at most one per frame.
        let reentered = (was_out || recalc.contains(Recalc::BECAME_VISIBLE))
            && g.node(id).wake_frame != self.frame;
        if reentered {
            g.node_mut(id).wake_frame = self.frame;
            g.entered_bounds.push(id);
        }

        // Children recompute when our geometry moved or the subtree was
        // previously culled with stale state underneath.
        let mut forced_children = inh.forced;
        if geometry {
            forced_children.insert(Recalc::TRANSFORM);
        }
        if was_out {
            forced_children.insert(Recalc::REFRESH);
        }

        let descend = g.node(id).has_updates || !forced_children.is_empty();
        {
            let n = g.node_mut(id);
            n.recalc.clear();
            n.has_updates = false;
        }
        if !descend {
            return;
        }

        let child_inh = Inherited {
            world: g.node(id).world,
            render: child_render_ctx(g, id),
            forced: forced_children,
        };
        let children = g.node(id).children.clone();
        for child in children {
            self.visit(g, child, child_inh);
        }
    }

    fn recompute_transforms(&self, g: &mut SceneGraph, id: NodeId, inh: &Inherited) {
        // Item positions come out of the layout solver relative to the
        // container; the node's own x/y then acts as an author offset.
        let (flex_x, flex_y) = g
            .flex(id)
            .and_then(|st| st.item.as_ref())
            .filter(|it| it.container.is_some())
            .map_or((0.0, 0.0), |it| (it.layout_x, it.layout_y));

        let n = g.node_mut(id);
        let (px, py) = (n.pivot_x * n.w, n.pivot_y * n.h);
        let origin_x = n.x + flex_x - n.mount_x * n.w;
        let origin_y = n.y + flex_y - n.mount_y * n.h;

        let local = if n.rotation == 0.0 && n.scale_x == 1.0 && n.scale_y == 1.0 {
            Transform2D::translation(origin_x, origin_y)
        } else {
            let m = Transform2D::rotation_scale(n.rotation, n.scale_x, n.scale_y);
            let (rx, ry) = m.apply_vector(px, py);
            m.with_translation(origin_x + px - rx, origin_y + py - ry)
        };
        n.local = local;

        n.world = TransformCtx {
            alpha: inh.world.alpha * n.alpha,
            matrix: inh.world.matrix.concat(n.local),
        };

        // The render context diverges below a render-to-texture ancestor.
        // The offscreen root itself renders into its own surface at the
        // identity; descendants compose from there.
        n.render = if n.render_to_texture {
            Some(TransformCtx::IDENTITY)
        } else {
            inh.render.map(|ctx| TransformCtx {
                alpha: ctx.alpha * n.alpha,
                matrix: ctx.matrix.concat(local),
            })
        };

        let w = n.world.matrix;
        let (x0, y0) = w.apply(0.0, 0.0);
        let (x1, y1) = w.apply(n.w, 0.0);
        let (x2, y2) = w.apply(0.0, n.h);
        let (x3, y3) = w.apply(n.w, n.h);
        n.bbox = Rect::from_extents(
            x0.min(x1).min(x2).min(x3),
            y0.min(y1).min(y2).min(y3),
            x0.max(x1).max(x2).max(x3),
            y0.max(y1).max(y2).max(y3),
        );
    }

    /// Tri-state culling against the viewport and its margin band.
    fn classify(&self, g: &mut SceneGraph, id: NodeId) {
        let bbox = g.node(id).bbox;
        let out = if bbox.intersects(self.viewport) {
            OutOfBounds::In
        } else if bbox.intersects(self.viewport.inflate(self.margin)) {
            OutOfBounds::Margin
        } else {
            OutOfBounds::Out
        };
        g.node_mut(id).out_of_bounds = out;
    }
}

/// Children of a render-to-texture node compose inside its surface.
fn child_render_ctx(g: &SceneGraph, id: NodeId) -> Option<TransformCtx> {
    let n = g.node(id);
    if n.render_to_texture {
        Some(TransformCtx::IDENTITY)
    } else {
        n.render
    }
}

/// Stamps a culled subtree without recursing; descendants keep their
/// pending recalc bits for the eventual re-entry.
fn stamp_subtree_out(g: &mut SceneGraph, id: NodeId) {
    let mut stack: Vec<NodeId> = g.node(id).children.clone();
    while let Some(n) = stack.pop() {
        g.node_mut(n).out_of_bounds = OutOfBounds::Out;
        stack.extend_from_slice(&g.node(n).children);
    }
}

/// Full-tree walk stamping document order and keeping z-context membership
/// current. Pure integer work; runs every frame.
fn stamp_order_and_z(g: &mut SceneGraph) {
    let root = g.root();
    let mut order: u32 = 0;
    // (node, nearest z-context root above it)
    let mut stack: Vec<(NodeId, NodeId)> = vec![(root, root)];
    while let Some((id, z_root)) = stack.pop() {
        let changed = {
            let n = g.node_mut(id);
            let changed = n.tree_order != order;
            n.tree_order = order;
            changed
        };
        order += 1;

        if g.node(id).z_index != 0 && (g.node(id).z_owner != Some(z_root) || changed) {
            zorder::register(g, id, z_root);
        }

        let child_z_root = if g.node(id).is_z_context_root(id == root) {
            id
        } else {
            z_root
        };
        // Reversed so the explicit stack visits children in document order.
        for &child in g.node(id).children.iter().rev() {
            stack.push((child, child_z_root));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frame(g: &mut SceneGraph, frame: u64) {
        let viewport = Rect::new(0.0, 0.0, g.width(g.root()), g.height(g.root()));
        UpdatePass::new(viewport, 100.0, frame).run(g);
    }

    #[test]
    fn world_transform_composes_down_the_tree() {
        let mut g = SceneGraph::new(1920.0, 1080.0);
        let a = g.create();
        let b = g.create();
        g.add_child(g.root(), a);
        g.add_child(a, b);
        g.set_position(a, 100.0, 50.0);
        g.set_position(b, 10.0, 20.0);
        g.set_size(b, 30.0, 30.0);

        run_frame(&mut g, 1);

        let w = g.world_ctx(b).matrix;
        assert_eq!(w.apply(0.0, 0.0), (110.0, 70.0));
        assert_eq!(g.bbox(b), Rect::new(110.0, 70.0, 30.0, 30.0));
    }

    #[test]
    fn alpha_multiplies_through_ancestors() {
        let mut g = SceneGraph::new(800.0, 600.0);
        let a = g.create();
        let b = g.create();
        g.add_child(g.root(), a);
        g.add_child(a, b);
        g.set_alpha(a, 0.5);
        g.set_alpha(b, 0.5);

        run_frame(&mut g, 1);

        assert!((g.world_ctx(b).alpha - 0.25).abs() < 1e-6);
    }

    #[test]
    fn render_context_diverges_below_offscreen_root() {
        let mut g = SceneGraph::new(800.0, 600.0);
        let surface = g.create();
        let inner = g.create();
        g.add_child(g.root(), surface);
        g.add_child(surface, inner);
        g.set_position(surface, 200.0, 200.0);
        g.set_position(inner, 10.0, 0.0);
        g.set_render_to_texture(surface, true);

        run_frame(&mut g, 1);

        // World keeps the full composition; render restarts at the surface.
        assert_eq!(g.world_ctx(inner).matrix.apply(0.0, 0.0), (210.0, 200.0));
        assert_eq!(g.render_ctx(inner).matrix.apply(0.0, 0.0), (10.0, 0.0));
        assert_eq!(
            g.render_ctx(surface).matrix.apply(0.0, 0.0),
            (0.0, 0.0)
        );
    }

    #[test]
    fn mount_and_pivot_affect_placement() {
        let mut g = SceneGraph::new(800.0, 600.0);
        let a = g.create();
        g.add_child(g.root(), a);
        g.set_size(a, 100.0, 40.0);
        g.set_position(a, 400.0, 300.0);
        g.set_mount(a, 0.5, 0.5);

        run_frame(&mut g, 1);
        assert_eq!(g.bbox(a), Rect::new(350.0, 280.0, 100.0, 40.0));

        // A 180° rotation about the center leaves the bbox in place.
        g.set_pivot(a, 0.5, 0.5);
        g.set_rotation(a, std::f32::consts::PI);
        run_frame(&mut g, 2);
        let bb = g.bbox(a);
        assert!((bb.x - 350.0).abs() < 1e-3 && (bb.y - 280.0).abs() < 1e-3);
    }

    #[test]
    fn culling_is_tristate_with_margin_band() {
        let mut g = SceneGraph::new(800.0, 600.0);
        let a = g.create();
        g.add_child(g.root(), a);
        g.set_size(a, 50.0, 50.0);

        g.set_position(a, 100.0, 100.0);
        run_frame(&mut g, 1);
        assert_eq!(g.out_of_bounds(a), OutOfBounds::In);

        g.set_position(a, 850.0, 100.0);
        run_frame(&mut g, 2);
        assert_eq!(g.out_of_bounds(a), OutOfBounds::Margin);

        g.set_position(a, 2000.0, 100.0);
        run_frame(&mut g, 3);
        assert_eq!(g.out_of_bounds(a), OutOfBounds::Out);
    }

    #[test]
    fn reentry_is_signaled_once_and_refreshes_the_subtree() {
        let mut g = SceneGraph::new(800.0, 600.0);
        let a = g.create();
        let b = g.create();
        g.add_child(g.root(), a);
        g.add_child(a, b);
        g.set_size(a, 50.0, 50.0);
        g.set_size(b, 10.0, 10.0);

        g.set_position(a, 2000.0, 0.0);
        run_frame(&mut g, 1);
        g.take_entered_bounds();
        assert!(g.out_of_bounds(a).is_out());
        assert!(g.out_of_bounds(b).is_out());

        // While culled, the child moves; its recalc stays pending.
        g.set_x(b, 25.0);

        g.set_position(a, 100.0, 100.0);
        run_frame(&mut g, 2);
        assert_eq!(g.out_of_bounds(a), OutOfBounds::In);
        assert_eq!(g.out_of_bounds(b), OutOfBounds::In);
        assert_eq!(g.world_ctx(b).matrix.apply(0.0, 0.0), (125.0, 100.0));

        let entered = g.take_entered_bounds();
        assert!(entered.contains(&a));

        run_frame(&mut g, 3);
        assert!(g.take_entered_bounds().is_empty());
    }

    #[test]
    fn hidden_subtree_is_frozen_until_shown() {
        let mut g = SceneGraph::new(800.0, 600.0);
        let a = g.create();
        g.add_child(g.root(), a);
        g.set_size(a, 50.0, 50.0);
        run_frame(&mut g, 1);

        g.set_visible(a, false);
        run_frame(&mut g, 2);

        g.set_visible(a, true);
        run_frame(&mut g, 3);
        assert!(g.take_entered_bounds().contains(&a));
    }

    #[test]
    fn document_order_is_sequential() {
        let mut g = SceneGraph::new(800.0, 600.0);
        let a = g.create();
        let b = g.create();
        let c = g.create();
        g.add_child(g.root(), a);
        g.add_child(a, b);
        g.add_child(g.root(), c);

        run_frame(&mut g, 1);

        let order =
            |id: NodeId, g: &SceneGraph| -> u32 { g.node(id).tree_order };
        assert!(order(a, &g) < order(b, &g));
        assert!(order(b, &g) < order(c, &g));
    }
}
