//! Axis-parameterized accessors over the scene graph.
//!
//! The solver never touches `w`/`h` or `left`/`top` directly; everything is
//! phrased in main/cross terms through these helpers so row and column
//! containers share one code path.

use crate::coords::Axis;
use crate::scene::{NodeId, Recalc, SceneGraph};

/// Resolved node size along `axis`.
#[inline]
pub(crate) fn size(g: &SceneGraph, id: NodeId, axis: Axis) -> f32 {
    let n = g.node(id);
    axis.pick(n.w, n.h)
}

/// Writes a resolved size, flagging a scene recalc when it changed.
pub(crate) fn set_size(g: &mut SceneGraph, id: NodeId, axis: Axis, v: f32) {
    let changed = {
        let n = g.node_mut(id);
        let slot = match axis {
            Axis::Horizontal => &mut n.w,
            Axis::Vertical => &mut n.h,
        };
        if *slot != v {
            *slot = v;
            true
        } else {
            false
        }
    };
    if changed {
        g.mark(id, Recalc::SIZE);
    }
}

/// Specified (source) size along `axis`; zero means unset.
#[inline]
pub(crate) fn src_size(g: &SceneGraph, id: NodeId, axis: Axis) -> f32 {
    let n = g.node(id);
    axis.pick(n.src_w, n.src_h)
}

/// Evaluates the relative-size function along `axis`, if attached.
/// The argument is the padded parent extent on the same axis.
pub(crate) fn eval_size_fn(g: &SceneGraph, id: NodeId, axis: Axis) -> Option<f32> {
    let n = g.node(id);
    let f = match axis {
        Axis::Horizontal => n.func_w.as_ref()?,
        Axis::Vertical => n.func_h.as_ref()?,
    };
    let parent = n.parent?;
    let basis = size(g, parent, axis) + padding_total(g, parent, axis);
    Some(f(basis))
}

// ── margins (item facet) ──────────────────────────────────────────────────

#[inline]
pub(crate) fn margin_before(g: &SceneGraph, id: NodeId, axis: Axis) -> f32 {
    g.flex_item(id).map_or(0.0, |i| i.margin.before(axis))
}

#[inline]
pub(crate) fn margin_total(g: &SceneGraph, id: NodeId, axis: Axis) -> f32 {
    g.flex_item(id).map_or(0.0, |i| i.margin.along(axis))
}

// ── padding (container facet) ─────────────────────────────────────────────

#[inline]
pub(crate) fn padding_before(g: &SceneGraph, id: NodeId, axis: Axis) -> f32 {
    g.container(id).map_or(0.0, |c| c.padding.before(axis))
}

#[inline]
pub(crate) fn padding_total(g: &SceneGraph, id: NodeId, axis: Axis) -> f32 {
    g.container(id).map_or(0.0, |c| c.padding.along(axis))
}

// ── footprints ────────────────────────────────────────────────────────────

/// The space an item occupies in its line: content size, plus own padding
/// when it is itself a container (container sizes are content-box), plus
/// margins.
#[inline]
pub(crate) fn layout_size(g: &SceneGraph, id: NodeId, axis: Axis) -> f32 {
    size(g, id, axis) + padding_total(g, id, axis) + margin_total(g, id, axis)
}

/// The smallest footprint the item can be shrunk to.
#[inline]
pub(crate) fn min_footprint(g: &SceneGraph, id: NodeId, axis: Axis) -> f32 {
    let min = g.flex_item(id).map_or(0.0, |i| i.min_along(axis));
    min + padding_total(g, id, axis) + margin_total(g, id, axis)
}

/// Solver-relative position of the item's margin box.
#[inline]
pub(crate) fn layout_pos(g: &SceneGraph, id: NodeId, axis: Axis) -> f32 {
    g.flex_item(id).map_or(0.0, |i| i.layout_pos(axis))
}

pub(crate) fn set_layout_pos(g: &mut SceneGraph, id: NodeId, axis: Axis, v: f32) {
    g.flex_item_mut(id).set_layout_pos(axis, v);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Edges;
    use crate::flex::FlexContainer;

    #[test]
    fn layout_size_includes_padding_and_margin() {
        let mut g = SceneGraph::new(500.0, 500.0);
        let parent = g.create();
        g.add_child(g.root(), parent);
        g.set_flex_container(parent, FlexContainer::default());

        let item = g.create();
        g.add_child(parent, item);
        g.set_size(item, 100.0, 40.0);
        g.set_item_margin(item, Edges::symmetric(2.0, 5.0));
        assert_eq!(layout_size(&g, item, Axis::Horizontal), 110.0);
        assert_eq!(layout_size(&g, item, Axis::Vertical), 44.0);

        // Once the item is itself a container, its padding joins the
        // footprint (sizes are content-box).
        g.set_flex_container(item, FlexContainer {
            padding: Edges::all(3.0),
            ..FlexContainer::default()
        });
        assert_eq!(layout_size(&g, item, Axis::Horizontal), 116.0);
    }

    #[test]
    fn size_fn_sees_padded_parent_extent() {
        let mut g = SceneGraph::new(500.0, 500.0);
        let parent = g.create();
        g.add_child(g.root(), parent);
        g.set_flex_container(parent, FlexContainer {
            padding: Edges::all(10.0),
            ..FlexContainer::default()
        });
        g.set_size(parent, 200.0, 100.0);

        let child = g.create();
        g.add_child(parent, child);
        g.set_width_fn(child, Some(Box::new(|w| w / 2.0)));

        // 200 content + 20 padding = 220 padded extent.
        assert_eq!(eval_size_fn(&g, child, Axis::Horizontal), Some(110.0));
        assert_eq!(eval_size_fn(&g, child, Axis::Vertical), None);
    }
}
