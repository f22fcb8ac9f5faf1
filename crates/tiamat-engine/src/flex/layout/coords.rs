//! Coordinate finalization: slot positions to node-relative coordinates.
//!
//! The solver works in content-box slot positions (margin-box offsets along
//! each axis). This walk rewrites them into final positions relative to the
//! container node, adding margins and container padding and mirroring the
//! main axis for reversed containers. The scene update pass later adds the
//! node's own `x`/`y` as an author offset on top.

use crate::coords::Axis;
use crate::flex::axis;
use crate::scene::{NodeId, Recalc, SceneGraph};

/// Finalizes an entire laid-out tree, descending only into containers whose
/// pass actually ran this frame. Containers that merely moved keep their
/// children's relative coordinates.
pub(crate) fn finalize_root(g: &mut SceneGraph, id: NodeId) {
    finalize(g, id);
}

fn finalize(g: &mut SceneGraph, id: NodeId) {
    let (main, reverse) = match g.container(id) {
        Some(c) => (c.main_axis(), c.reverse),
        None => return,
    };
    let main_size = axis::size(g, id, main);

    let children = g.children(id).to_vec();
    for child in children {
        for ax in [Axis::Horizontal, Axis::Vertical] {
            let slot = axis::layout_pos(g, child, ax);
            let mirrored = if ax == main && reverse {
                main_size - slot - axis::layout_size(g, child, ax)
            } else {
                slot
            };
            let pos = mirrored + axis::margin_before(g, child, ax) + axis::padding_before(g, id, ax);
            set_final_pos(g, child, ax, pos);
        }

        let descend = g.flex(child).is_some_and(|st| st.needs_finalize);
        if descend {
            finalize(g, child);
        }
    }

    if let Some(st) = g.node_mut(id).flex.as_deref_mut() {
        st.needs_finalize = false;
    }
}

/// Stores the finalized position back on the item facet, flagging a scene
/// recalc when it moved.
fn set_final_pos(g: &mut SceneGraph, id: NodeId, ax: Axis, pos: f32) {
    let changed = {
        let item = g.flex_item_mut(id);
        if item.layout_pos(ax) != pos {
            item.set_layout_pos(ax, pos);
            true
        } else {
            false
        }
    };
    if changed {
        g.mark(id, Recalc::POSITION);
    }
}
