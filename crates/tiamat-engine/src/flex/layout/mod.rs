//! The flex layout pass.
//!
//! Ordering is owned by an explicit scheduler over the arena rather than by
//! mutual recursion between containers:
//! - [`run`] drains the frame-level layout roots queued by dirty propagation;
//! - a root's pass computes nested containers' intrinsic sizes bottom-up
//!   while partitioning lines, then assigns final boxes top-down through the
//!   bounded `resize_*` entry points and the coordinate finalization walk.
//!
//! Termination is structural: every nested call moves strictly down the
//! tree, and the only re-entry (re-positioning a line after a stretch
//! changed a nested main size) is a single bounded extra pass, not a fixed
//! point.

pub(crate) mod content_align;
pub(crate) mod coords;
pub(crate) mod grow;
pub(crate) mod item_align;
pub(crate) mod lines;
pub(crate) mod positioner;
pub(crate) mod shrink;

use crate::coords::Axis;
use crate::flex::axis;
use crate::flex::config::{ContentAlign, ItemAlign, JustifyContent};
use crate::scene::{NodeId, Recalc, SceneGraph};

use lines::LineLayout;

/// Numeric tolerance for the iterative solvers and cache comparisons.
pub(crate) const EPS: f32 = 1e-6;

// ── pass state ────────────────────────────────────────────────────────────

/// Immutable snapshot of one container's configuration for a pass.
#[derive(Debug, Copy, Clone)]
pub(crate) struct LayoutConf {
    pub id: NodeId,
    pub main: Axis,
    pub cross: Axis,
    pub wrap: bool,
    pub justify: JustifyContent,
    pub align_items: ItemAlign,
    pub align_content: ContentAlign,
    /// Fit-to-contents per axis, already masked by the resize flags: an
    /// axis being resized by an ancestor is externally sized for this pass.
    pub fit_main: bool,
    pub fit_cross: bool,
}

/// One container's in-flight layout (transient; the produced lines persist
/// on the node for partial re-runs).
pub(crate) struct FlexLayout {
    pub conf: LayoutConf,
    pub main_size: f32,
    pub cross_size: f32,
    pub items: Vec<NodeId>,
    pub lines: Vec<LineLayout>,
}

fn make_conf(g: &SceneGraph, id: NodeId, resizing_main: bool, resizing_cross: bool) -> LayoutConf {
    let c = g
        .container(id)
        .expect("layout pass on a node without a container facet");
    let main = c.main_axis();
    let cross = c.cross_axis();
    LayoutConf {
        id,
        main,
        cross,
        wrap: c.wrap,
        justify: c.justify_content,
        align_items: c.align_items,
        align_content: c.align_content,
        fit_main: !resizing_main && g.fit_to_contents(id, main),
        fit_cross: !resizing_cross && g.fit_to_contents(id, cross),
    }
}

/// Specified size along `axis`: the relative function's value when attached,
/// the source size otherwise (zero when unset).
pub(crate) fn specified_size(g: &SceneGraph, id: NodeId, axis: Axis) -> f32 {
    axis::eval_size_fn(g, id, axis).unwrap_or_else(|| axis::src_size(g, id, axis))
}

// ── scheduler ─────────────────────────────────────────────────────────────

/// Drains queued layout roots and runs a full pass for each. Invoked once
/// per frame, before the scene update pass.
pub(crate) fn run(g: &mut SceneGraph) {
    let roots = g.take_layout_roots();
    for id in roots {
        if !g.contains(id) {
            continue;
        }
        // The flag doubles as queue membership; a stale entry (consumed by
        // an earlier root's pass, or a dropped facet) is skipped.
        if !g.node(id).recalc.contains(Recalc::LAYOUT_REQUESTED) {
            continue;
        }
        g.node_mut(id).recalc.remove(Recalc::LAYOUT_REQUESTED);
        if !g.has_container(id) {
            continue;
        }
        log::trace!("layout pass: root {id:?}");
        layout_tree(g, id);
    }
}

/// Full pass for a layout root: main → cross → absolute coordinates.
pub(crate) fn layout_tree(g: &mut SceneGraph, id: NodeId) {
    perform(g, id, false, false);
    coords::finalize_root(g, id);
}

/// One container's main/cross pass. The `resizing_*` flags mean an ancestor
/// already assigned the corresponding axis; the basis derivation is skipped
/// for it and fit-to-contents collapse is suppressed.
pub(crate) fn perform(g: &mut SceneGraph, id: NodeId, resizing_main: bool, resizing_cross: bool) {
    let conf = make_conf(g, id, resizing_main, resizing_cross);

    let mut fl = FlexLayout {
        conf,
        main_size: 0.0,
        cross_size: 0.0,
        items: g.children(id).to_vec(),
        lines: Vec::new(),
    };

    // Natural basis (§ main-axis setup): an axis assigned by the ancestor is
    // taken as-is; otherwise it restarts from the specified size so the pass
    // stays a pure function of configuration.
    fl.main_size = if resizing_main {
        axis::size(g, id, conf.main)
    } else {
        specified_size(g, id, conf.main).max(0.0)
    };
    fl.cross_size = if resizing_cross {
        axis::size(g, id, conf.cross)
    } else {
        specified_size(g, id, conf.cross).max(0.0)
    };
    axis::set_size(g, id, conf.main, fl.main_size);
    axis::set_size(g, id, conf.cross, fl.cross_size);

    layout_main_axis(g, &mut fl);
    layout_cross_axis(g, &mut fl);

    // Cache the result. Natural (intrinsic) sizes are only refreshed for
    // axes this pass actually derived; assigned sizes land in the target
    // slots consulted by the resize fast paths.
    let relative = g.has_relative_size(id, conf.main) || g.has_relative_size(id, conf.cross);
    let (main_size, cross_size) = (fl.main_size, fl.cross_size);
    let produced_lines = std::mem::take(&mut fl.lines);
    {
        let st = g.flex_mut(id);
        st.cache.valid = !relative;
        if !resizing_main {
            st.cache.intrinsic_main = main_size;
            st.cache.shrunk = false;
        }
        if !resizing_cross {
            st.cache.intrinsic_cross = cross_size;
        }
        st.cache.target_main = main_size;
        st.cache.target_cross = cross_size;
        st.lines = produced_lines;
        st.needs_finalize = true;
        st.dirty.clear();
    }
    // A container laid out mid-pass may still sit in the root queue from an
    // earlier invalidation; consuming the flag here makes the scheduler skip
    // the stale entry instead of re-running it at the specified size.
    g.node_mut(id).recalc.remove(Recalc::LAYOUT_REQUESTED);
}

/// Main-axis layout: partition into lines, size + position each, collapse a
/// fit-to-contents main axis to the content extent.
fn layout_main_axis(g: &mut SceneGraph, fl: &mut FlexLayout) {
    fl.lines = lines::partition(g, fl);

    let mut lines = std::mem::take(&mut fl.lines);
    for line in &mut lines {
        line.perform_layout(g, fl);
    }
    fl.lines = lines;

    if fl.conf.fit_main {
        let extent = fl
            .lines
            .iter()
            .map(|l| l.content_extent)
            .fold(0.0f32, f32::max);
        fl.main_size = extent;
        axis::set_size(g, fl.conf.id, fl.conf.main, extent);
    }
}

/// Cross-axis layout: content alignment across lines, collapse a fit cross
/// axis to the total line extent.
fn layout_cross_axis(g: &mut SceneGraph, fl: &mut FlexLayout) {
    content_align::align(g, fl);
}

// ── resize entry points (ancestor-driven) ─────────────────────────────────

/// Assigns `size` along `axis` to an item during an ancestor's pass,
/// routing to the right nested-axis resize for container items.
pub(crate) fn resize_axis(g: &mut SceneGraph, item: NodeId, axis: Axis, size: f32) {
    match g.container(item).map(|c| c.main_axis()) {
        Some(main) if main == axis => resize_main_axis(g, item, size),
        Some(_) => resize_cross_axis(g, item, size),
        None => axis::set_size(g, item, axis, size),
    }
}

/// Ancestor-assigned main-axis size for a nested container.
///
/// Dirty, or a size differing from the cached target, forces a full
/// relayout at the assigned size; a cache hit just stores it.
pub(crate) fn resize_main_axis(g: &mut SceneGraph, id: NodeId, size: f32) {
    let main = match g.container(id) {
        Some(c) => c.main_axis(),
        None => return,
    };

    // A main axis pushed below its specified size is recorded as shrunk;
    // the propagation rules then treat it as dynamic.
    let specified = specified_size(g, id, main);
    let shrunk = specified > 0.0 && size < specified - EPS;
    g.flex_mut(id).cache.shrunk = shrunk;

    let (hit, dirty) = {
        let st = g.flex_mut(id);
        (
            st.cache.valid && (st.cache.target_main - size).abs() <= EPS,
            !st.dirty.is_empty() || !st.cache.valid,
        )
    };

    axis::set_size(g, id, main, size);
    if dirty || !hit {
        perform(g, id, true, false);
    }
    g.flex_mut(id).cache.target_main = size;
}

/// Ancestor-assigned cross-axis size (the stretch path).
///
/// On a clean cache, a miss is tolerable when the cross axis is not
/// fit-to-contents: the size is stored and only cross alignment re-runs.
///
/// Cross assignment happens after the ancestor's main-axis stage, so the
/// current main size is already this pass's settled value (possibly a
/// grow/shrink assignment); any re-perform here treats it as assigned
/// rather than re-deriving it from the specified size.
pub(crate) fn resize_cross_axis(g: &mut SceneGraph, id: NodeId, size: f32) {
    let cross = match g.container(id) {
        Some(c) => c.cross_axis(),
        None => return,
    };

    let (hit, dirty, fit_cross) = {
        let fit = g.fit_to_contents(id, cross);
        let st = g.flex_mut(id);
        (
            st.cache.valid && (st.cache.target_cross - size).abs() <= EPS,
            !st.dirty.is_empty() || !st.cache.valid,
            fit,
        )
    };

    axis::set_size(g, id, cross, size);
    if dirty {
        perform(g, id, true, true);
    } else if hit {
        // Stored size already matches the laid-out state.
    } else if !fit_cross {
        realign_cross(g, id);
    } else {
        perform(g, id, true, true);
    }
    g.flex_mut(id).cache.target_cross = size;
}

/// Re-runs only the cross-axis alignment against the persisted lines.
fn realign_cross(g: &mut SceneGraph, id: NodeId) {
    let conf = make_conf(g, id, true, true);
    let mut fl = FlexLayout {
        conf,
        main_size: axis::size(g, id, conf.main),
        cross_size: axis::size(g, id, conf.cross),
        items: g.children(id).to_vec(),
        lines: std::mem::take(&mut g.flex_mut(id).lines),
    };
    content_align::align(g, &mut fl);
    let st = g.flex_mut(id);
    st.lines = fl.lines;
    st.needs_finalize = true;
}
