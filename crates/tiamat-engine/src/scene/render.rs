//! Render list construction.
//!
//! Walks the updated tree in paint order and emits one GPU-facing quad per
//! drawable node. Z-indexed nodes are skipped at their tree position and
//! drawn by their z-context root instead: negative levels first, then the
//! root's normal subtree, then positive levels.

use bytemuck::{Pod, Zeroable};

use crate::coords::Transform2D;
use crate::scene::{zorder, NodeId, SceneGraph};

/// Per-quad data in the layout a renderer uploads directly.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RenderQuad {
    pub transform: Transform2D,
    pub alpha: f32,
    pub w: f32,
    pub h: f32,
}

/// One draw entry. `offscreen` tells the renderer to begin a surface for
/// this node's subtree and composite it afterwards.
#[derive(Debug, Copy, Clone)]
pub struct RenderItem {
    pub id: NodeId,
    pub offscreen: bool,
    pub quad: RenderQuad,
}

/// Reusable per-frame draw list.
#[derive(Debug, Default)]
pub struct RenderList {
    items: Vec<RenderItem>,
}

impl RenderList {
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub(crate) fn build(g: &mut SceneGraph, list: &mut RenderList) {
    list.clear();
    collect(g, g.root(), false, list);
}

fn collect(g: &mut SceneGraph, id: NodeId, as_z_item: bool, list: &mut RenderList) {
    let skip = {
        let n = g.node(id);
        !n.visible
            || n.out_of_bounds.is_out()
            || n.world.alpha <= 0.0
            // Z-indexed nodes are drawn by their context, not in tree order.
            || (!as_z_item && n.z_index != 0)
    };
    if skip {
        return;
    }

    {
        let n = g.node(id);
        if n.out_of_bounds == crate::scene::node::OutOfBounds::In && n.w > 0.0 && n.h > 0.0 {
            let ctx = n.render_ctx();
            list.items.push(RenderItem {
                id,
                offscreen: n.render_to_texture,
                quad: RenderQuad {
                    transform: ctx.matrix,
                    alpha: ctx.alpha,
                    w: n.w,
                    h: n.h,
                },
            });
        }
    }

    if g.node(id).is_z_context_root(id == g.root()) {
        let sorted = zorder::sorted_items(g, id);
        let negatives: Vec<NodeId> = sorted
            .iter()
            .copied()
            .filter(|&m| g.node(m).z_index < 0)
            .collect();
        let positives: Vec<NodeId> = sorted
            .iter()
            .copied()
            .filter(|&m| g.node(m).z_index > 0)
            .collect();
        for m in negatives {
            collect(g, m, true, list);
        }
        let children = g.node(id).children.clone();
        for child in children {
            collect(g, child, false, list);
        }
        for m in positives {
            collect(g, m, true, list);
        }
    } else {
        let children = g.node(id).children.clone();
        for child in children {
            collect(g, child, false, list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::update::UpdatePass;
    use crate::coords::Rect;

    fn frame(g: &mut SceneGraph, list: &mut RenderList) {
        let viewport = Rect::new(0.0, 0.0, g.width(g.root()), g.height(g.root()));
        UpdatePass::new(viewport, 100.0, 1).run(g);
        build(g, list);
    }

    fn sized_child(g: &mut SceneGraph, parent: NodeId) -> NodeId {
        let id = g.create();
        g.add_child(parent, id);
        g.set_size(id, 10.0, 10.0);
        id
    }

    #[test]
    fn negative_z_draws_before_tree_then_positive() {
        let mut g = SceneGraph::new(800.0, 600.0);
        let root = g.root();
        let below = sized_child(&mut g, root);
        let normal = sized_child(&mut g, root);
        let above = sized_child(&mut g, root);
        g.set_z_index(below, -1);
        g.set_z_index(above, 1);

        let mut list = RenderList::default();
        frame(&mut g, &mut list);

        let order: Vec<NodeId> = list.items().iter().map(|i| i.id).collect();
        let pos = |id: NodeId| order.iter().position(|&n| n == id).unwrap();
        assert!(pos(below) < pos(normal));
        assert!(pos(normal) < pos(above));
    }

    #[test]
    fn culled_and_hidden_nodes_emit_nothing() {
        let mut g = SceneGraph::new(800.0, 600.0);
        let root = g.root();
        let hidden = sized_child(&mut g, root);
        let far = sized_child(&mut g, root);
        g.set_visible(hidden, false);
        g.set_position(far, 5000.0, 0.0);

        let mut list = RenderList::default();
        frame(&mut g, &mut list);

        assert!(!list.items().iter().any(|i| i.id == hidden));
        assert!(!list.items().iter().any(|i| i.id == far));
    }

    #[test]
    fn offscreen_root_is_marked_for_surface_composition() {
        let mut g = SceneGraph::new(800.0, 600.0);
        let root = g.root();
        let surface = sized_child(&mut g, root);
        g.set_render_to_texture(surface, true);

        let mut list = RenderList::default();
        frame(&mut g, &mut list);

        let item = list.items().iter().find(|i| i.id == surface).unwrap();
        assert!(item.offscreen);
    }
}
