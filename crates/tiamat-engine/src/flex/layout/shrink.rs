//! Iterative reclamation of missing main-axis space from a line.

use crate::flex::axis;
use crate::scene::{NodeId, SceneGraph};

use super::{lines, FlexLayout, EPS};

struct ShrinkSlot {
    item: NodeId,
    factor: f32,
    active: bool,
}

/// Takes back `amount` of overflow proportionally to the items' shrink
/// factors. An item that reaches its floor has its factor removed and the
/// deficit is redistributed until the overflow is covered or no factors
/// remain. Returns the space actually reclaimed.
///
/// Container items default to a shrink factor of 1 and floor at their
/// content minimum, so nested containers compress before plain leaves do.
pub(crate) fn distribute(g: &mut SceneGraph, fl: &FlexLayout, items: &[NodeId], amount: f32) -> f32 {
    let main = fl.conf.main;
    let mut slots: Vec<ShrinkSlot> = items
        .iter()
        .filter_map(|&item| {
            let is_container = g.has_container(item);
            let factor = g
                .flex_item(item)
                .map_or(if is_container { 1.0 } else { 0.0 }, |it| {
                    it.effective_shrink(is_container)
                });
            (factor > 0.0).then_some(ShrinkSlot {
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
            let allowance = (current - floor(g, slot.item, fl)).max(0.0);

            let mut delta = slot.factor * share;
            if delta >= allowance - EPS {
                delta = allowance;
                slot.active = false;
                total_factor -= slot.factor;
            }
            if delta > 0.0 {
                super::resize_axis(g, slot.item, main, current - delta);
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

/// Smallest content size the item may be shrunk to along the parent's main
/// axis. A container shrinking along its own main axis floors at the larger
/// of its explicit minimum and its items' summed minimum footprints.
fn floor(g: &SceneGraph, item: NodeId, fl: &FlexLayout) -> f32 {
    let explicit = g
        .flex_item(item)
        .map_or(0.0, |it| it.min_along(fl.conf.main));
    let content_min = match g.container(item) {
        Some(c) if c.main_axis() == fl.conf.main => lines::main_axis_min_size(g, item),
        _ => 0.0,
    };
    explicit.max(content_min)
}
