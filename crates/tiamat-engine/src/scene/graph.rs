use crate::coords::Rect;
use crate::scene::node::{OutOfBounds, SceneNode, SizeFn, TransformCtx};
use crate::scene::recalc::Recalc;
use crate::scene::zorder;

/// Stable handle into the scene arena.
///
/// Ids are generational: destroying a node invalidates every outstanding
/// handle to it, even after the slot is reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// The scene tree, stored as an arena of nodes addressed by [`NodeId`].
///
/// Parent links, ordered child lists and z-context ownership are plain ids;
/// no reference cycles, and the whole graph is a single allocation pool.
/// All mutation goes through setters here so the dirty bits, flex facets and
/// z-context registrations stay consistent; heavy recomputation is deferred
/// to the frame boundary.
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    /// Containers queued for a frame-level layout pass.
    pub(crate) layout_roots: Vec<NodeId>,
    /// Nodes that re-entered the bounds margin this tick (preload signal).
    pub(crate) entered_bounds: Vec<NodeId>,
}

impl SceneGraph {
    /// Creates a graph with a root node of the given size.
    pub fn new(w: f32, h: f32) -> Self {
        let mut graph = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId { idx: 0, generation: 0 },
            layout_roots: Vec::new(),
            entered_bounds: Vec::new(),
        };
        let root = graph.create();
        graph.root = root;
        {
            let n = graph.node_mut(root);
            n.src_w = w;
            n.src_h = h;
            n.w = w;
            n.h = h;
        }
        graph
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocates a detached node.
    pub fn create(&mut self) -> NodeId {
        match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx as usize];
                slot.node = Some(SceneNode::new());
                NodeId { idx, generation: slot.generation }
            }
            None => {
                let idx = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, node: Some(SceneNode::new()) });
                NodeId { idx, generation: 0 }
            }
        }
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.idx as usize)
            .is_some_and(|s| s.generation == id.generation && s.node.is_some())
    }

    #[track_caller]
    pub(crate) fn node(&self, id: NodeId) -> &SceneNode {
        match self.slots.get(id.idx as usize) {
            Some(slot) if slot.generation == id.generation && slot.node.is_some() => {
                slot.node.as_ref().unwrap()
            }
            _ => panic!("stale NodeId {id:?}"),
        }
    }

    #[track_caller]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        match self.slots.get_mut(id.idx as usize) {
            Some(slot) if slot.generation == id.generation && slot.node.is_some() => {
                slot.node.as_mut().unwrap()
            }
            _ => panic!("stale NodeId {id:?}"),
        }
    }

    // ── tree structure ────────────────────────────────────────────────────

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Appends `child` to `parent`'s ordered child list.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.node(parent).children.len();
        self.insert_child(parent, index, child);
    }

    /// Inserts `child` at `index` in `parent`'s ordered child list.
    ///
    /// The child must be detached. Order is significant: it is the paint
    /// order for equal z-index and the item order for flex layout.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        debug_assert!(self.node(child).parent.is_none(), "child already attached");
        debug_assert_ne!(parent, child);

        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);

        // The whole subtree needs fresh transforms, bounds and z registration.
        self.mark_subtree(child, Recalc::REFRESH);

        // Parent becoming responsible for the child's arrangement.
        self.refresh_item_association(child);
        if self.has_container(parent) {
            self.changed_contents(parent);
        }
    }

    /// Detaches `child` (and its subtree) from its parent. Nodes stay alive
    /// and can be re-attached elsewhere.
    pub fn remove_child(&mut self, child: NodeId) {
        let Some(parent) = self.node(child).parent else {
            return;
        };

        self.node_mut(parent).children.retain(|&c| c != child);
        self.node_mut(child).parent = None;

        // Z-context owners above the detached subtree must drop its members.
        zorder::unregister_subtree(self, child);

        self.clear_item_association(child);
        if self.has_container(parent) {
            self.changed_contents(parent);
        }
        self.mark(parent, Recalc::POSITION);
    }

    /// Detaches and frees `id` and every descendant. All their ids become
    /// stale.
    pub fn destroy(&mut self, id: NodeId) {
        debug_assert_ne!(id, self.root, "cannot destroy the root");
        self.remove_child(id);

        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            stack.extend_from_slice(&self.node(n).children);
            let slot = &mut self.slots[n.idx as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(n.idx);
        }
    }

    // ── dirty bookkeeping ─────────────────────────────────────────────────

    /// Inserts recalc bits and bubbles `has_updates` toward the root,
    /// stopping at the first ancestor that already knows.
    pub(crate) fn mark(&mut self, id: NodeId, bits: Recalc) {
        let node = self.node_mut(id);
        node.recalc.insert(bits);

        let mut cur = id;
        loop {
            let node = self.node_mut(cur);
            if node.has_updates {
                break;
            }
            node.has_updates = true;
            match node.parent {
                Some(p) => cur = p,
                None => break,
            }
        }
    }

    /// Marks an entire subtree. Used for reattachment and z-topology flips,
    /// where every descendant's cached state is stale.
    pub(crate) fn mark_subtree(&mut self, id: NodeId, bits: Recalc) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            self.node_mut(n).recalc.insert(bits);
            self.node_mut(n).has_updates = true;
            stack.extend_from_slice(&self.node(n).children);
        }
        // Bubble from the subtree root only; internal nodes are covered.
        self.mark(id, Recalc::NONE);
    }

    /// Queues `id` as a frame-level layout root (idempotent).
    pub(crate) fn request_layout_root(&mut self, id: NodeId) {
        if self.node(id).recalc.contains(Recalc::LAYOUT_REQUESTED) {
            return;
        }
        self.mark(id, Recalc::LAYOUT_REQUESTED);
        self.layout_roots.push(id);
        log::trace!("layout root queued: {id:?}");
    }

    pub(crate) fn take_layout_roots(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.layout_roots)
    }

    // ── geometry setters ──────────────────────────────────────────────────

    pub fn set_x(&mut self, id: NodeId, x: f32) {
        if self.node(id).x != x {
            self.node_mut(id).x = x;
            self.mark(id, Recalc::POSITION);
        }
    }

    pub fn set_y(&mut self, id: NodeId, y: f32) {
        if self.node(id).y != y {
            self.node_mut(id).y = y;
            self.mark(id, Recalc::POSITION);
        }
    }

    pub fn set_position(&mut self, id: NodeId, x: f32, y: f32) {
        self.set_x(id, x);
        self.set_y(id, y);
    }

    /// Sets the specified width. Zero means unset: a flex container then
    /// fits the axis to its contents.
    pub fn set_width(&mut self, id: NodeId, w: f32) {
        if self.node(id).src_w == w {
            return;
        }
        {
            let n = self.node_mut(id);
            n.src_w = w;
            n.w = w;
        }
        self.mark(id, Recalc::SIZE);
        self.resized(id, true, false);
    }

    /// Sets the specified height; zero means unset (see [`set_width`]).
    pub fn set_height(&mut self, id: NodeId, h: f32) {
        if self.node(id).src_h == h {
            return;
        }
        {
            let n = self.node_mut(id);
            n.src_h = h;
            n.h = h;
        }
        self.mark(id, Recalc::SIZE);
        self.resized(id, false, true);
    }

    pub fn set_size(&mut self, id: NodeId, w: f32, h: f32) {
        self.set_width(id, w);
        self.set_height(id, h);
    }

    /// Attaches (or detaches) a relative width function, evaluated against
    /// the padded parent width on every pass.
    pub fn set_width_fn(&mut self, id: NodeId, f: Option<SizeFn>) {
        self.node_mut(id).func_w = f;
        self.mark(id, Recalc::SIZE);
        self.resized(id, true, false);
    }

    /// Attaches (or detaches) a relative height function.
    pub fn set_height_fn(&mut self, id: NodeId, f: Option<SizeFn>) {
        self.node_mut(id).func_h = f;
        self.mark(id, Recalc::SIZE);
        self.resized(id, false, true);
    }

    /// Common post-resize routing: layout invalidation plus re-evaluation
    /// of children whose size is a function of this node's size.
    fn resized(&mut self, id: NodeId, w: bool, h: bool) {
        self.changed_dimensions(id, w, h);

        let kids: Vec<NodeId> = self.node(id).children.clone();
        for child in kids {
            let relative_w = w && self.node(child).func_w.is_some();
            let relative_h = h && self.node(child).func_h.is_some();
            if relative_w || relative_h {
                self.mark(child, Recalc::SIZE);
                self.changed_dimensions(child, relative_w, relative_h);
            }
        }
    }

    pub fn set_scale(&mut self, id: NodeId, sx: f32, sy: f32) {
        let n = self.node(id);
        if n.scale_x != sx || n.scale_y != sy {
            let n = self.node_mut(id);
            n.scale_x = sx;
            n.scale_y = sy;
            self.mark(id, Recalc::TRANSFORM);
        }
    }

    pub fn set_rotation(&mut self, id: NodeId, radians: f32) {
        if self.node(id).rotation != radians {
            self.node_mut(id).rotation = radians;
            self.mark(id, Recalc::TRANSFORM);
        }
    }

    /// Rotation/scale center, relative `[0, 1]` within the node box.
    pub fn set_pivot(&mut self, id: NodeId, px: f32, py: f32) {
        let n = self.node(id);
        if n.pivot_x != px || n.pivot_y != py {
            let n = self.node_mut(id);
            n.pivot_x = px;
            n.pivot_y = py;
            self.mark(id, Recalc::TRANSFORM);
        }
    }

    /// Anchor that `(x, y)` positions, relative `[0, 1]` within the node box.
    pub fn set_mount(&mut self, id: NodeId, mx: f32, my: f32) {
        let n = self.node(id);
        if n.mount_x != mx || n.mount_y != my {
            let n = self.node_mut(id);
            n.mount_x = mx;
            n.mount_y = my;
            self.mark(id, Recalc::POSITION);
        }
    }

    pub fn set_alpha(&mut self, id: NodeId, alpha: f32) {
        if self.node(id).alpha != alpha {
            self.node_mut(id).alpha = alpha;
            self.mark(id, Recalc::TRANSFORM);
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        let was = self.node(id).visible;
        if was == visible {
            return;
        }
        self.node_mut(id).visible = visible;
        if visible {
            // The subtree was frozen while hidden; everything is stale.
            self.mark_subtree(id, Recalc::BECAME_VISIBLE | Recalc::TRANSFORM);
        } else {
            self.mark(id, Recalc::TRANSFORM);
        }
    }

    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        let old = self.node(id).z_index;
        if old == z {
            return;
        }
        self.node_mut(id).z_index = z;
        zorder::z_index_changed(self, id, old, z);
    }

    /// Toggles offscreen rendering. The node becomes the root of a distinct
    /// render context and an implicit z-context.
    pub fn set_render_to_texture(&mut self, id: NodeId, enabled: bool) {
        if self.node(id).render_to_texture == enabled {
            return;
        }
        self.node_mut(id).render_to_texture = enabled;
        // Render contexts and z registration below change shape.
        self.mark_subtree(id, Recalc::TRANSFORM);
    }

    /// Marks the node as an explicit z-context root.
    pub fn set_force_z_context(&mut self, id: NodeId, enabled: bool) {
        if self.node(id).force_z_context == enabled {
            return;
        }
        self.node_mut(id).force_z_context = enabled;
        self.mark_subtree(id, Recalc::TRANSFORM);
    }

    // ── getters ───────────────────────────────────────────────────────────

    #[inline]
    pub fn x(&self, id: NodeId) -> f32 {
        self.node(id).x
    }

    #[inline]
    pub fn y(&self, id: NodeId) -> f32 {
        self.node(id).y
    }

    /// Resolved width (after layout, if the node participates in flex).
    #[inline]
    pub fn width(&self, id: NodeId) -> f32 {
        self.node(id).w
    }

    /// Resolved height.
    #[inline]
    pub fn height(&self, id: NodeId) -> f32 {
        self.node(id).h
    }

    #[inline]
    pub fn alpha(&self, id: NodeId) -> f32 {
        self.node(id).alpha
    }

    #[inline]
    pub fn visible(&self, id: NodeId) -> bool {
        self.node(id).visible
    }

    #[inline]
    pub fn z_index(&self, id: NodeId) -> i32 {
        self.node(id).z_index
    }

    /// World-composed transform + alpha (valid after the last update pass).
    #[inline]
    pub fn world_ctx(&self, id: NodeId) -> TransformCtx {
        self.node(id).world
    }

    /// Render-facing transform + alpha: offscreen-rooted below a
    /// render-to-texture ancestor, world otherwise.
    #[inline]
    pub fn render_ctx(&self, id: NodeId) -> TransformCtx {
        self.node(id).render_ctx()
    }

    /// World-space bounding box (valid after the last update pass).
    #[inline]
    pub fn bbox(&self, id: NodeId) -> Rect {
        self.node(id).bbox
    }

    /// Culling classification from the last update pass.
    #[inline]
    pub fn out_of_bounds(&self, id: NodeId) -> OutOfBounds {
        self.node(id).out_of_bounds
    }

    /// Nodes that re-entered the bounds margin during the last update pass,
    /// for preload/visibility signaling. Draining resets the list.
    pub fn take_entered_bounds(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.entered_bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> SceneGraph {
        SceneGraph::new(800.0, 600.0)
    }

    // ── arena ─────────────────────────────────────────────────────────────

    #[test]
    fn destroy_invalidates_ids_and_reuses_slots() {
        let mut g = graph();
        let a = g.create();
        g.add_child(g.root(), a);
        g.destroy(a);
        assert!(!g.contains(a));

        // Slot reuse must not resurrect the old id.
        let b = g.create();
        assert!(g.contains(b));
        assert!(!g.contains(a));
        assert_eq!(a.idx, b.idx);
        assert_ne!(a.generation, b.generation);
    }

    #[test]
    fn destroy_frees_whole_subtree() {
        let mut g = graph();
        let a = g.create();
        let b = g.create();
        g.add_child(g.root(), a);
        g.add_child(a, b);
        g.destroy(a);
        assert!(!g.contains(a));
        assert!(!g.contains(b));
        assert!(g.children(g.root()).is_empty());
    }

    // ── tree surgery ──────────────────────────────────────────────────────

    #[test]
    fn insert_child_keeps_order() {
        let mut g = graph();
        let (a, b, c) = (g.create(), g.create(), g.create());
        g.add_child(g.root(), a);
        g.add_child(g.root(), c);
        g.insert_child(g.root(), 1, b);
        assert_eq!(g.children(g.root()), &[a, b, c]);
    }

    #[test]
    fn reparent_moves_subtree() {
        let mut g = graph();
        let (a, b) = (g.create(), g.create());
        g.add_child(g.root(), a);
        g.add_child(g.root(), b);
        g.remove_child(b);
        g.add_child(a, b);
        assert_eq!(g.parent(b), Some(a));
        assert_eq!(g.children(g.root()), &[a]);
    }

    // ── dirty bookkeeping ─────────────────────────────────────────────────

    #[test]
    fn mark_bubbles_has_updates() {
        let mut g = graph();
        let a = g.create();
        let b = g.create();
        g.add_child(g.root(), a);
        g.add_child(a, b);

        // Settle bookkeeping from construction.
        for id in [g.root(), a, b] {
            g.node_mut(id).recalc.clear();
            g.node_mut(id).has_updates = false;
        }

        g.set_x(b, 12.0);
        assert!(g.node(b).recalc.contains(Recalc::POSITION));
        assert!(g.node(a).has_updates);
        assert!(g.node(g.root()).has_updates);
        // Siblings untouched.
        assert!(g.node(a).recalc.is_empty());
    }

    #[test]
    fn identical_mutation_is_a_noop() {
        let mut g = graph();
        let a = g.create();
        g.add_child(g.root(), a);
        g.set_x(a, 5.0);
        g.node_mut(a).recalc.clear();

        g.set_x(a, 5.0);
        assert!(g.node(a).recalc.is_empty());
    }
}
