//! Main-axis positioning of a sized line.

use crate::flex::axis;
use crate::flex::spacing::{spacing, SpacingMode};
use crate::scene::{NodeId, SceneGraph};

use super::lines::LineLayout;
use super::FlexLayout;

/// Walks the line assigning slot positions from the justify spacing. Slot
/// positions are margin-box offsets inside the container's content box; the
/// coordinate finalization adds margins, padding and reverse mirroring.
pub(crate) fn position_items(
    g: &mut SceneGraph,
    fl: &FlexLayout,
    line: &LineLayout,
    items: &[NodeId],
) {
    let mode = SpacingMode::from(fl.conf.justify);
    let (before, between) = spacing(mode, items.len(), line.available_space);

    let mut pos = before;
    for &item in items {
        axis::set_layout_pos(g, item, fl.conf.main, pos);
        pos += axis::layout_size(g, item, fl.conf.main) + between;
    }
}
