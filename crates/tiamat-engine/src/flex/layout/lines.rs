//! Line partitioning and the per-line main-axis pass.

use crate::coords::Axis;
use crate::flex::axis;
use crate::scene::{NodeId, SceneGraph};

use super::{grow, positioner, shrink, FlexLayout, EPS};

/// One wrapped line: an inclusive item index range into the pass item list
/// plus the main-axis bookkeeping the later stages consume.
#[derive(Debug, Clone, Default)]
pub(crate) struct LineLayout {
    pub start: usize,
    pub end: usize,
    /// Remaining main-axis space after sizing; feeds the justify spacing.
    pub available_space: f32,
    /// Sum of item footprints after sizing, used to collapse a
    /// fit-to-contents main axis.
    pub content_extent: f32,
    /// Resolved cross-axis extent of this line.
    pub cross_size: f32,
}

// ── partitioning ──────────────────────────────────────────────────────────

/// Splits the item list into lines. Wrapping closes a line before the item
/// that would overflow the main-axis budget, except a line's leading item,
/// which always stays even when oversized. A fit-to-contents main axis
/// never wraps (there is no budget to overflow).
pub(crate) fn partition(g: &mut SceneGraph, fl: &FlexLayout) -> Vec<LineLayout> {
    let mut lines = Vec::new();
    if fl.items.is_empty() {
        return lines;
    }

    let wrapping = fl.conf.wrap && !fl.conf.fit_main;
    let budget = fl.main_size;
    let mut start = 0usize;
    let mut used = 0.0f32;

    for i in 0..fl.items.len() {
        let item = fl.items[i];
        restore_basis(g, item, fl);
        let footprint = axis::layout_size(g, item, fl.conf.main);

        if wrapping && i > start && used + footprint > budget + EPS {
            lines.push(LineLayout {
                start,
                end: i - 1,
                available_space: budget - used,
                ..Default::default()
            });
            start = i;
            used = 0.0;
        }
        used += footprint;
    }

    let available = if fl.conf.fit_main { 0.0 } else { budget - used };
    lines.push(LineLayout {
        start,
        end: fl.items.len() - 1,
        available_space: available,
        ..Default::default()
    });
    lines
}

/// Resets an item to its natural basis before partitioning, so that the
/// pass is a pure function of configuration rather than of the previous
/// pass's grow/shrink results. Container items with a dirty or invalid
/// cache get a fresh intrinsic layout here; clean ones restore the cached
/// intrinsic sizes.
fn restore_basis(g: &mut SceneGraph, item: NodeId, fl: &FlexLayout) {
    if g.has_container(item) {
        let fresh = g
            .flex(item)
            .is_none_or(|st| !st.dirty.is_empty() || !st.cache.valid);
        if fresh {
            super::perform(g, item, false, false);
        } else {
            let cache = g.flex_mut(item).cache;
            if let Some((main, cross)) = g.container(item).map(|c| (c.main_axis(), c.cross_axis())) {
                axis::set_size(g, item, main, cache.intrinsic_main);
                axis::set_size(g, item, cross, cache.intrinsic_cross);
            }
        }
        clamp_to_limits(g, item, fl);
        return;
    }

    for ax in [Axis::Horizontal, Axis::Vertical] {
        let natural = axis::eval_size_fn(g, item, ax).unwrap_or_else(|| axis::src_size(g, item, ax));
        let clamped = g
            .flex_item(item)
            .map(|it| it.clamp_along(ax, natural))
            .unwrap_or(natural);
        axis::set_size(g, item, ax, clamped);
    }
}

fn clamp_to_limits(g: &mut SceneGraph, item: NodeId, fl: &FlexLayout) {
    for ax in [fl.conf.main, fl.conf.cross] {
        let current = axis::size(g, item, ax);
        let clamped = g
            .flex_item(item)
            .map(|it| it.clamp_along(ax, current))
            .unwrap_or(current);
        if (clamped - current).abs() > EPS {
            super::resize_axis(g, item, ax, clamped);
        }
    }
}

/// Main-axis floor for a container treated as an item by its parent.
/// Single-line containers can compress to the sum of their items' minimum
/// footprints plus own padding; wrapped ones hold their specified size.
pub(crate) fn main_axis_min_size(g: &SceneGraph, id: NodeId) -> f32 {
    let main = match g.container(id) {
        Some(c) => c.main_axis(),
        None => return 0.0,
    };
    let line_count = g.flex(id).map_or(0, |st| st.lines.len());
    if line_count > 1 {
        return super::specified_size(g, id, main);
    }
    let content: f32 = g
        .children(id)
        .iter()
        .map(|&item| axis::min_footprint(g, item, main))
        .sum();
    content
}

// ── per-line main-axis pass ───────────────────────────────────────────────

impl LineLayout {
    pub(crate) fn items<'a>(&self, fl: &'a FlexLayout) -> &'a [NodeId] {
        &fl.items[self.start..=self.end]
    }

    /// Distributes free or missing main-axis space over the line, then
    /// positions the items and records the line's content extents.
    pub(crate) fn perform_layout(&mut self, g: &mut SceneGraph, fl: &FlexLayout) {
        let items: Vec<NodeId> = self.items(fl).to_vec();

        if self.available_space > EPS {
            let granted = grow::distribute(g, fl, &items, self.available_space);
            self.available_space -= granted;
        } else if self.available_space < -EPS {
            let freed = shrink::distribute(g, fl, &items, -self.available_space);
            self.available_space += freed;
        }

        self.content_extent = items
            .iter()
            .map(|&item| axis::layout_size(g, item, fl.conf.main))
            .sum();
        self.cross_size = items
            .iter()
            .map(|&item| axis::layout_size(g, item, fl.conf.cross))
            .fold(0.0f32, f32::max);

        positioner::position_items(g, fl, self, &items);
    }
}
