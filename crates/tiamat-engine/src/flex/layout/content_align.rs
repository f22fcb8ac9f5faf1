//! Cross-axis alignment of the lines themselves, then of their items.

use crate::flex::axis;
use crate::flex::config::ContentAlign;
use crate::scene::SceneGraph;

use super::{item_align, positioner, FlexLayout};

/// Resolves each line's cross extent, collapses a fit-to-contents cross
/// axis, spaces the lines per `align_content`, and aligns the items inside
/// each line. A line whose stretch resizes changed nested main sizes gets
/// its main-axis positioning re-run once.
pub(crate) fn align(g: &mut SceneGraph, fl: &mut FlexLayout) {
    let mut lines = std::mem::take(&mut fl.lines);
    if lines.is_empty() {
        if fl.conf.fit_cross {
            fl.cross_size = 0.0;
            axis::set_size(g, fl.conf.id, fl.conf.cross, 0.0);
        }
        return;
    }

    // A single line in an externally sized container spans the full cross
    // extent; multiple lines keep their intrinsic extents.
    if lines.len() == 1 && !fl.conf.fit_cross {
        lines[0].cross_size = fl.cross_size;
    }

    let total: f32 = lines.iter().map(|l| l.cross_size).sum();
    if fl.conf.fit_cross {
        fl.cross_size = total;
        axis::set_size(g, fl.conf.id, fl.conf.cross, total);
    }

    let mut leftover = fl.cross_size - total;
    if fl.conf.align_content == ContentAlign::Stretch && leftover > 0.0 {
        let extra = leftover / lines.len() as f32;
        for line in &mut lines {
            line.cross_size += extra;
        }
        leftover = 0.0;
    }

    let mode = fl.conf.align_content.spacing_mode();
    let (before, between) = crate::flex::spacing::spacing(mode, lines.len(), leftover);

    let mut offset = before;
    for line in &mut lines {
        let items = fl.items[line.start..=line.end].to_vec();
        let repositioned = item_align::align_line(g, fl, &items, offset, line.cross_size);
        if repositioned {
            // Nested main sizes moved under stretch; one bounded re-run of
            // the line's positions, never a fixed-point loop.
            positioner::position_items(g, fl, line, &items);
        }
        offset += line.cross_size + between;
    }

    fl.lines = lines;
}
