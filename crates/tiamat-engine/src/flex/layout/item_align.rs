//! Cross-axis alignment of the items within one line.

use crate::flex::axis;
use crate::flex::config::ItemAlign;
use crate::scene::{NodeId, SceneGraph};

use super::{FlexLayout, EPS};

/// Aligns every item of a line inside the band `[line_offset, line_offset +
/// line_size)` along the cross axis. Returns true when a stretch resize
/// changed some item's main-axis size (a nested fit-to-contents main axis
/// re-wrapping under the new cross size), in which case the caller re-runs
/// the line's positioning once.
pub(crate) fn align_line(
    g: &mut SceneGraph,
    fl: &FlexLayout,
    items: &[NodeId],
    line_offset: f32,
    line_size: f32,
) -> bool {
    let cross = fl.conf.cross;
    let mut main_changed = false;

    for &item in items {
        let align = effective_align(g, fl, item);

        // A relative cross size was evaluated at partition time against a
        // possibly stale container size; refresh it for non-stretch items
        // now that the container's cross extent is settled.
        if align != ItemAlign::Stretch && g.has_relative_size(item, cross) {
            if let Some(v) = axis::eval_size_fn(g, item, cross) {
                let clamped = g
                    .flex_item(item)
                    .map(|it| it.clamp_along(cross, v))
                    .unwrap_or(v);
                super::resize_axis(g, item, cross, clamped);
            }
        }

        let footprint = axis::layout_size(g, item, cross);
        let pos = match align {
            ItemAlign::FlexStart | ItemAlign::Stretch => line_offset,
            ItemAlign::FlexEnd => line_offset + line_size - footprint,
            ItemAlign::Center => line_offset + (line_size - footprint) / 2.0,
        };
        axis::set_layout_pos(g, item, cross, pos);

        if align == ItemAlign::Stretch {
            let target = line_size
                - axis::margin_total(g, item, cross)
                - if g.has_container(item) {
                    axis::padding_total(g, item, cross)
                } else {
                    0.0
                };
            let clamped = g
                .flex_item(item)
                .map(|it| it.clamp_along(cross, target))
                .unwrap_or(target)
                .max(0.0);

            let main_before = axis::size(g, item, fl.conf.main);
            super::resize_axis(g, item, cross, clamped);
            if (axis::size(g, item, fl.conf.main) - main_before).abs() > EPS {
                main_changed = true;
            }
        }
    }

    main_changed
}

/// Per-item alignment: `align_self` overrides the container's `align_items`.
/// An inherited stretch downgrades to flex-start for an item whose cross
/// size is fixed; an explicit `align_self: stretch` still wins.
fn effective_align(g: &SceneGraph, fl: &FlexLayout, item: NodeId) -> ItemAlign {
    let align_self = g.flex_item(item).and_then(|it| it.align_self);
    let align = align_self.unwrap_or(fl.conf.align_items);
    if align == ItemAlign::Stretch
        && align_self != Some(ItemAlign::Stretch)
        && g.has_fixed_size(item, fl.conf.cross)
    {
        ItemAlign::FlexStart
    } else {
        align
    }
}
