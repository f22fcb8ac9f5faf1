//! Iterative distribution of free main-axis space over a line.

use crate::flex::axis;
use crate::scene::{NodeId, SceneGraph};

use super::{FlexLayout, EPS};

struct GrowSlot {
    item: NodeId,
    factor: f32,
    active: bool,
}

/// Hands out `amount` of free space proportionally to the items' grow
/// factors. An item that hits its max has its factor removed and the
/// remainder is redistributed over the rest until the space is consumed or
/// no factors remain. Returns the space actually granted.
pub(crate) fn distribute(g: &mut SceneGraph, fl: &FlexLayout, items: &[NodeId], amount: f32) -> f32 {
    let main = fl.conf.main;
    let mut slots: Vec<GrowSlot> = items
        .iter()
        .filter_map(|&item| {
            let factor = g.flex_item(item).map_or(0.0, |it| it.grow);
            (factor > 0.0).then_some(GrowSlot {
                item,
                factor,
                active: true,
            })
        })
        .collect();

    let mut total_factor: f32 = slots.iter().map(|s| s.factor).sum();
    let mut remaining = amount;

    while remaining > EPS && total_factor > EPS {
        let share = remaining / total_factor;
        let mut progressed = false;

        for slot in slots.iter_mut().filter(|s| s.active) {
            let current = axis::size(g, slot.item, main);
            let max = g
                .flex_item(slot.item)
                .map_or(0.0, |it| it.max_along(main));
            let headroom = if max > 0.0 { max - current } else { f32::MAX };

            let mut delta = slot.factor * share;
            if delta >= headroom - EPS {
                delta = headroom.max(0.0);
                slot.active = false;
                total_factor -= slot.factor;
            }
            if delta > 0.0 {
                super::resize_axis(g, slot.item, main, current + delta);
                remaining -= delta;
                progressed = true;
            }
        }

        if !progressed {
            break;
        }
    }

    amount - remaining
}
