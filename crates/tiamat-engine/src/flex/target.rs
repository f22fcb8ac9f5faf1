//! Binding between scene nodes and the flex subsystem.
//!
//! Responsibilities:
//! - lazily attach container/item facets to nodes
//! - keep item→container associations in sync with tree surgery
//! - own the layout dirty mask and its bottom-up propagation rules
//!
//! Propagation is idempotent and early-terminating: a walk forwards only the
//! dirty bits not already present upstream, and stops at the first container
//! whose own sizing cannot be affected by the change; that container is then
//! queued as a frame-level layout root instead.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};

use crate::coords::{Axis, Edges};
use crate::scene::{NodeId, Recalc, SceneGraph};

use super::config::{ContentAlign, FlexDirection, ItemAlign, JustifyContent};
use super::container::FlexContainer;
use super::item::FlexItem;

// ── LayoutDirty ───────────────────────────────────────────────────────────

/// Pending layout invalidation for one node.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) struct LayoutDirty(u8);

impl LayoutDirty {
    pub const NONE: LayoutDirty = LayoutDirty(0);
    /// The node's width (or width basis) changed.
    pub const WIDTH: LayoutDirty = LayoutDirty(1 << 0);
    /// The node's height (or height basis) changed.
    pub const HEIGHT: LayoutDirty = LayoutDirty(1 << 1);
    /// Something inside the node changed; its children need re-arrangement.
    pub const CONTENTS: LayoutDirty = LayoutDirty(1 << 2);

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(self, other: LayoutDirty) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bits not already present in `upstream`.
    #[inline]
    pub fn missing_from(self, upstream: LayoutDirty) -> LayoutDirty {
        LayoutDirty(self.0 & !upstream.0)
    }

    #[inline]
    pub fn insert(&mut self, other: LayoutDirty) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

impl BitOr for LayoutDirty {
    type Output = LayoutDirty;
    #[inline]
    fn bitor(self, rhs: LayoutDirty) -> LayoutDirty {
        LayoutDirty(self.0 | rhs.0)
    }
}

impl BitOrAssign for LayoutDirty {
    #[inline]
    fn bitor_assign(&mut self, rhs: LayoutDirty) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for LayoutDirty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayoutDirty(")?;
        let mut sep = "";
        for (bit, name) in [
            (LayoutDirty::WIDTH, "width"),
            (LayoutDirty::HEIGHT, "height"),
            (LayoutDirty::CONTENTS, "contents"),
        ] {
            if self.contains(bit) {
                write!(f, "{sep}{name}")?;
                sep = "|";
            }
        }
        write!(f, ")")
    }
}

// ── LayoutCache ───────────────────────────────────────────────────────────

/// Cached result of a container's last layout pass.
///
/// `shrunk` records that the main axis was shrunk below its basis; such an
/// axis is treated as dynamic by the propagation rules even when the size is
/// nominally fixed, because releasing content could let it grow back.
/// The intrinsic sizes are what an unconstrained pass produced; partitioning
/// restarts items from them so repeated passes stay idempotent. The target
/// sizes are the last ancestor-assigned values, consulted by the resize fast
/// paths.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub(crate) struct LayoutCache {
    pub valid: bool,
    pub intrinsic_main: f32,
    pub intrinsic_cross: f32,
    pub target_main: f32,
    pub target_cross: f32,
    pub shrunk: bool,
}

// ── FlexState ─────────────────────────────────────────────────────────────

/// Per-node flex facets plus dirty/caching state. Boxed on the node and
/// created lazily the first time any flex property is touched.
#[derive(Debug, Default)]
pub struct FlexState {
    pub(crate) container: Option<FlexContainer>,
    pub(crate) item: Option<FlexItem>,
    pub(crate) dirty: LayoutDirty,
    pub(crate) cache: LayoutCache,
    /// Lines produced by the last main-axis pass, kept for cross-only
    /// re-alignment after an ancestor resize.
    pub(crate) lines: Vec<crate::flex::layout::lines::LineLayout>,
    /// Set when a pass rewrote this container's slot positions; cleared by
    /// the coordinate finalization walk.
    pub(crate) needs_finalize: bool,
}

// ── facet management ──────────────────────────────────────────────────────

impl SceneGraph {
    #[inline]
    pub(crate) fn flex(&self, id: NodeId) -> Option<&FlexState> {
        self.node(id).flex.as_deref()
    }

    pub(crate) fn flex_mut(&mut self, id: NodeId) -> &mut FlexState {
        let node = self.node_mut(id);
        node.flex.get_or_insert_with(Default::default)
    }

    /// True when the node arranges its children (has an enabled container
    /// facet).
    #[inline]
    pub fn has_container(&self, id: NodeId) -> bool {
        self.flex(id).is_some_and(|f| f.container.is_some())
    }

    #[inline]
    pub(crate) fn container(&self, id: NodeId) -> Option<&FlexContainer> {
        self.flex(id).and_then(|f| f.container.as_ref())
    }

    #[inline]
    pub(crate) fn flex_item(&self, id: NodeId) -> Option<&FlexItem> {
        self.flex(id).and_then(|f| f.item.as_ref())
    }

    pub(crate) fn flex_item_mut(&mut self, id: NodeId) -> &mut FlexItem {
        self.flex_mut(id).item.get_or_insert_with(FlexItem::new)
    }

    /// The container currently arranging this node, if any.
    #[inline]
    pub(crate) fn item_container(&self, id: NodeId) -> Option<NodeId> {
        self.flex_item(id).and_then(|i| i.container)
    }

    /// Enables flex arrangement on `id` with the given configuration.
    pub fn set_flex_container(&mut self, id: NodeId, container: FlexContainer) {
        self.flex_mut(id).container = Some(container);
        for child in self.children(id).to_vec() {
            self.refresh_item_association(child);
        }
        self.force_layout(id);
    }

    /// Disables flex arrangement on `id`; children keep their item facets
    /// but lose the association.
    pub fn clear_flex_container(&mut self, id: NodeId) {
        if !self.has_container(id) {
            return;
        }
        self.flex_mut(id).container = None;
        for child in self.children(id).to_vec() {
            self.refresh_item_association(child);
        }
        // The node's resolved sizes fall back to what was specified.
        let (w, h) = {
            let n = self.node(id);
            (n.src_w, n.src_h)
        };
        let n = self.node_mut(id);
        n.w = w;
        n.h = h;
        self.mark(id, Recalc::SIZE);
        self.changed_dimensions(id, true, true);
    }

    /// Re-derives the item→container association from the current parent.
    /// Called on attach, detach, and container enable/disable.
    pub(crate) fn refresh_item_association(&mut self, child: NodeId) {
        let arranger = self
            .parent(child)
            .filter(|&p| self.has_container(p));

        match arranger {
            Some(parent) => {
                self.flex_item_mut(child).container = Some(parent);
                self.flag_layout(child, LayoutDirty::WIDTH | LayoutDirty::HEIGHT);
            }
            None => self.clear_item_association(child),
        }
    }

    pub(crate) fn clear_item_association(&mut self, child: NodeId) {
        if let Some(f) = self.node_mut(child).flex.as_deref_mut() {
            if let Some(item) = f.item.as_mut() {
                item.container = None;
            }
        }
    }

    // ── container configuration ───────────────────────────────────────────

    fn with_container(&mut self, id: NodeId, f: impl FnOnce(&mut FlexContainer)) {
        let state = self.flex_mut(id);
        let container = state.container.get_or_insert_with(FlexContainer::default);
        f(container);
        // Config changes apply immediately but re-arrangement is deferred.
        self.changed_contents(id);
    }

    pub fn set_flex_direction(&mut self, id: NodeId, direction: FlexDirection, reverse: bool) {
        self.with_container(id, |c| {
            c.direction = direction;
            c.reverse = reverse;
        });
    }

    pub fn set_flex_wrap(&mut self, id: NodeId, wrap: bool) {
        self.with_container(id, |c| c.wrap = wrap);
    }

    pub fn set_justify_content(&mut self, id: NodeId, justify: JustifyContent) {
        self.with_container(id, |c| c.justify_content = justify);
    }

    pub fn set_align_items(&mut self, id: NodeId, align: ItemAlign) {
        self.with_container(id, |c| c.align_items = align);
    }

    pub fn set_align_content(&mut self, id: NodeId, align: ContentAlign) {
        self.with_container(id, |c| c.align_content = align);
    }

    /// Container padding contributes to the node's outer footprint, so this
    /// is a dimension change as seen from the arranging ancestor.
    pub fn set_padding(&mut self, id: NodeId, padding: Edges) {
        self.with_container(id, |c| c.padding = padding);
        self.changed_dimensions(id, true, true);
    }

    // ── item configuration ────────────────────────────────────────────────

    fn with_item(&mut self, id: NodeId, f: impl FnOnce(&mut FlexItem)) {
        f(self.flex_item_mut(id));
        self.changed_dimensions(id, true, true);
    }

    pub fn set_flex_grow(&mut self, id: NodeId, grow: f32) {
        debug_assert!(grow >= 0.0);
        self.with_item(id, |i| i.grow = grow);
    }

    pub fn set_flex_shrink(&mut self, id: NodeId, shrink: f32) {
        debug_assert!(shrink >= 0.0);
        self.with_item(id, |i| i.shrink = Some(shrink));
    }

    pub fn set_item_margin(&mut self, id: NodeId, margin: Edges) {
        self.with_item(id, |i| i.margin = margin);
    }

    pub fn set_align_self(&mut self, id: NodeId, align: Option<ItemAlign>) {
        self.with_item(id, |i| i.align_self = align);
    }

    pub fn set_min_size(&mut self, id: NodeId, min_w: f32, min_h: f32) {
        self.with_item(id, |i| {
            i.min_width = min_w;
            i.min_height = min_h;
        });
    }

    /// Zero disables the corresponding maximum.
    pub fn set_max_size(&mut self, id: NodeId, max_w: f32, max_h: f32) {
        self.with_item(id, |i| {
            i.max_width = max_w;
            i.max_height = max_h;
        });
    }

    // ── axis predicates ───────────────────────────────────────────────────

    /// An axis not fixed by configuration collapses to its laid-out content
    /// extent. Only meaningful for enabled containers.
    pub(crate) fn fit_to_contents(&self, id: NodeId, axis: Axis) -> bool {
        if !self.has_container(id) {
            return false;
        }
        let n = self.node(id);
        match axis {
            Axis::Horizontal => n.src_w == 0.0 && n.func_w.is_none(),
            Axis::Vertical => n.src_h == 0.0 && n.func_h.is_none(),
        }
    }

    /// A size function makes the axis relative (a function of the parent).
    pub(crate) fn has_relative_size(&self, id: NodeId, axis: Axis) -> bool {
        let n = self.node(id);
        match axis {
            Axis::Horizontal => n.func_w.is_some(),
            Axis::Vertical => n.func_h.is_some(),
        }
    }

    /// Fixed = explicitly specified and not relative.
    pub(crate) fn has_fixed_size(&self, id: NodeId, axis: Axis) -> bool {
        let n = self.node(id);
        match axis {
            Axis::Horizontal => n.src_w != 0.0 && n.func_w.is_none(),
            Axis::Vertical => n.src_h != 0.0 && n.func_h.is_none(),
        }
    }

    // ── invalidation surface ──────────────────────────────────────────────

    /// Application signal: the node's dimensions changed on the given axes.
    /// Also invoked internally by the size setters.
    pub fn changed_dimensions(&mut self, id: NodeId, w: bool, h: bool) {
        let mut bits = LayoutDirty::NONE;
        if w {
            bits |= LayoutDirty::WIDTH;
        }
        if h {
            bits |= LayoutDirty::HEIGHT;
        }
        self.flag_layout(id, bits);
    }

    /// Application signal: the node's children changed in a way that
    /// requires re-arranging them.
    pub fn changed_contents(&mut self, id: NodeId) {
        self.flag_layout(id, LayoutDirty::CONTENTS);
    }

    /// Unconditionally schedules a full relayout of `id`'s flex subtree.
    pub fn force_layout(&mut self, id: NodeId) {
        self.flag_layout(
            id,
            LayoutDirty::WIDTH | LayoutDirty::HEIGHT | LayoutDirty::CONTENTS,
        );
    }

    /// Core of the bottom-up walk (spec'd behavior of the flex target).
    pub(crate) fn flag_layout(&mut self, id: NodeId, bits: LayoutDirty) {
        // Nothing flex-related on this node: the signal has no consumer.
        if self.flex(id).is_none() && !self.parent(id).is_some_and(|p| self.has_container(p)) {
            return;
        }
        if bits.is_empty() {
            return;
        }

        let state = self.flex_mut(id);
        let new = bits.missing_from(state.dirty);
        if new.is_empty() {
            // Already flagged; repeated mutations within a tick are no-ops.
            return;
        }
        state.dirty.insert(new);
        state.cache.valid = false;

        // Is the change visible from outside the node? A dynamic axis on a
        // container (fit-to-contents, or previously shrunk by an ancestor)
        // turns internal changes into dimension changes.
        let contents = new.contains(LayoutDirty::CONTENTS);
        let ext_w = new.contains(LayoutDirty::WIDTH)
            || (contents && self.axis_is_dynamic(id, Axis::Horizontal));
        let ext_h = new.contains(LayoutDirty::HEIGHT)
            || (contents && self.axis_is_dynamic(id, Axis::Vertical));

        if !(ext_w || ext_h) {
            // Purely internal: the node re-arranges its own children.
            if self.has_container(id) {
                self.queue_layout(id);
            }
            return;
        }

        match self.item_container(id) {
            Some(parent) => {
                let affects = (ext_w
                    && self.item_change_affects_container(parent, Axis::Horizontal))
                    || (ext_h && self.item_change_affects_container(parent, Axis::Vertical));
                if affects {
                    self.flag_layout(parent, LayoutDirty::CONTENTS);
                } else {
                    // Parent absorbs the change at its current size.
                    self.queue_layout(parent);
                }
            }
            None => {
                // Topmost flex node: request a frame-level layout.
                if self.has_container(id) {
                    self.queue_layout(id);
                }
            }
        }
    }

    /// Marks `id` as needing re-arrangement and queues it as a layout root.
    fn queue_layout(&mut self, id: NodeId) {
        let state = self.flex_mut(id);
        state.dirty.insert(LayoutDirty::CONTENTS);
        state.cache.valid = false;
        self.request_layout_root(id);
    }

    /// An axis whose resolved size can change without a setter call:
    /// fit-to-contents, or a main axis previously shrunk below its basis.
    fn axis_is_dynamic(&self, id: NodeId, axis: Axis) -> bool {
        if self.fit_to_contents(id, axis) {
            return true;
        }
        let Some(config) = self.container(id) else {
            return false;
        };
        axis == config.main_axis() && self.flex(id).is_some_and(|f| f.cache.shrunk)
    }

    /// Does a child's change along `axis` affect `container`'s own sizing?
    fn item_change_affects_container(&self, container: NodeId, axis: Axis) -> bool {
        let Some(config) = self.container(container) else {
            return false;
        };
        let main = config.main_axis();
        let wrap = config.wrap;
        let shrunk = self
            .flex(container)
            .map(|f| f.cache.shrunk)
            .unwrap_or(false);

        if axis == main {
            // Main-axis growth can change the container's main extent, move
            // line breaks (coupling into a fit cross axis), or release a
            // previously shrunk axis.
            self.fit_to_contents(container, main)
                || (wrap && self.fit_to_contents(container, main.orthogonal()))
                || shrunk
        } else {
            self.fit_to_contents(container, axis)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Chain of `depth` fit-to-contents row containers with a plain leaf at
    /// the bottom; returns (graph, containers-top-down, leaf).
    fn fit_chain(depth: usize) -> (SceneGraph, Vec<NodeId>, NodeId) {
        let mut g = SceneGraph::new(1000.0, 1000.0);
        let mut containers = Vec::new();
        let mut parent = g.root();
        for _ in 0..depth {
            let c = g.create();
            g.add_child(parent, c);
            g.set_flex_container(c, FlexContainer::default());
            containers.push(c);
            parent = c;
        }
        let leaf = g.create();
        g.set_size(leaf, 10.0, 10.0);
        g.add_child(parent, leaf);
        (g, containers, leaf)
    }

    fn clear_dirty(g: &mut SceneGraph, ids: &[NodeId]) {
        for &id in ids {
            g.flex_mut(id).dirty.clear();
            g.node_mut(id).recalc.clear();
        }
        g.layout_roots.clear();
    }

    // ── propagation ───────────────────────────────────────────────────────

    #[test]
    fn leaf_resize_marks_exactly_the_fit_chain() {
        let (mut g, containers, leaf) = fit_chain(5);
        // A sibling subtree that must stay untouched.
        let sibling = g.create();
        g.add_child(containers[0], sibling);
        g.set_flex_container(sibling, FlexContainer::default());

        let mut all: Vec<NodeId> = containers.clone();
        all.push(leaf);
        all.push(sibling);
        clear_dirty(&mut g, &all);

        g.set_width(leaf, 42.0);

        for &c in &containers {
            assert!(
                g.flex(c).unwrap().dirty.contains(LayoutDirty::CONTENTS),
                "container in chain not flagged"
            );
        }
        assert!(g.flex(leaf).unwrap().dirty.contains(LayoutDirty::WIDTH));
        assert!(g.flex(sibling).unwrap().dirty.is_empty());

        // The topmost container became the frame-level layout root.
        assert_eq!(g.layout_roots, vec![containers[0]]);
    }

    #[test]
    fn repeated_identical_mutation_does_not_repropagate() {
        let (mut g, containers, leaf) = fit_chain(3);
        let mut all = containers.clone();
        all.push(leaf);
        clear_dirty(&mut g, &all);

        g.set_width(leaf, 42.0);
        let roots_after_first = g.layout_roots.clone();
        g.changed_dimensions(leaf, true, false);
        assert_eq!(g.layout_roots, roots_after_first, "second signal re-queued");
    }

    #[test]
    fn fixed_container_absorbs_child_resize() {
        let mut g = SceneGraph::new(1000.0, 1000.0);
        let c = g.create();
        g.add_child(g.root(), c);
        g.set_flex_container(c, FlexContainer::default());
        g.set_size(c, 300.0, 100.0); // fixed both axes, no wrap
        let child = g.create();
        g.add_child(c, child);
        g.set_size(child, 50.0, 50.0);
        clear_dirty(&mut g, &[c, child]);

        g.set_width(child, 80.0);

        // The container itself must re-arrange, but nothing propagates above.
        assert_eq!(g.layout_roots, vec![c]);
        assert!(g.flex(c).unwrap().dirty.contains(LayoutDirty::CONTENTS));
    }

    #[test]
    fn shrunk_axis_is_treated_as_dynamic() {
        let mut g = SceneGraph::new(1000.0, 1000.0);
        let outer = g.create();
        g.add_child(g.root(), outer);
        g.set_flex_container(outer, FlexContainer::default());

        let c = g.create();
        g.add_child(outer, c);
        g.set_flex_container(c, FlexContainer::default());
        g.set_size(c, 300.0, 100.0);
        let child = g.create();
        g.add_child(c, child);
        g.set_size(child, 50.0, 50.0);
        clear_dirty(&mut g, &[outer, c, child]);

        // Pretend the last pass shrank `c`'s main axis.
        g.flex_mut(c).cache.shrunk = true;

        g.set_width(child, 80.0);
        // With the shrunk flag the change escalates past the fixed size all
        // the way to the fit-to-contents outer container.
        assert!(g.flex(c).unwrap().dirty.contains(LayoutDirty::CONTENTS));
        assert!(g.flex(outer).unwrap().dirty.contains(LayoutDirty::CONTENTS));
        assert_eq!(g.layout_roots, vec![outer]);
    }

    #[test]
    fn plain_nodes_ignore_invalidation() {
        let mut g = SceneGraph::new(100.0, 100.0);
        let a = g.create();
        g.add_child(g.root(), a);
        g.set_width(a, 10.0);
        assert!(g.layout_roots.is_empty());
        assert!(g.flex(a).is_none());
    }
}
