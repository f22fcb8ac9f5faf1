//! Z-context bookkeeping.
//!
//! A node with a non-zero `z_index` is drawn by the nearest enclosing
//! z-context root instead of at its tree position. Membership is refreshed
//! during the update pass; the sorted draw list is rebuilt lazily by
//! merging the still-valid portion of the previous list with the re-sorted
//! flagged entries, so an unchanged context never re-sorts.

use std::collections::HashSet;

use crate::scene::{NodeId, Recalc, SceneGraph};

/// Draw-list state owned by a z-context root.
#[derive(Debug, Default)]
pub(crate) struct ZContext {
    /// Last merged list, sorted by (z_index, tree_order).
    items: Vec<NodeId>,
    /// Members whose sort key changed (or that joined) since the last merge.
    flagged: Vec<NodeId>,
}

/// Sort key: z levels first, document order within a level.
#[inline]
fn key(g: &SceneGraph, id: NodeId) -> (i32, u32) {
    let n = g.node(id);
    (n.z_index, n.tree_order)
}

fn is_member(g: &SceneGraph, owner: NodeId, id: NodeId) -> bool {
    g.contains(id) && g.node(id).z_index != 0 && g.node(id).z_owner == Some(owner)
}

// ── membership ────────────────────────────────────────────────────────────

/// Binds `id` to the context rooted at `ctx_root` and flags it for the next
/// merge. Called from the update pass whenever a z-indexed node is visited;
/// a stale binding in a previous context is filtered out at merge time.
pub(crate) fn register(g: &mut SceneGraph, id: NodeId, ctx_root: NodeId) {
    g.node_mut(id).z_owner = Some(ctx_root);
    let ctx = g
        .node_mut(ctx_root)
        .z_ctx
        .get_or_insert_with(Default::default);
    ctx.flagged.push(id);
}

/// Flags an existing member so its key is re-read at the next merge.
fn flag(g: &mut SceneGraph, owner: NodeId, id: NodeId) {
    if let Some(ctx) = g.node_mut(owner).z_ctx.as_deref_mut() {
        ctx.flagged.push(id);
    }
}

/// Reacts to a z-index edit. Crossing zero in either direction changes the
/// render topology of the whole subtree (the node gains or loses z-context
///-root status), so the subtree is re-stamped for the update pass.
pub(crate) fn z_index_changed(g: &mut SceneGraph, id: NodeId, old: i32, new: i32) {
    if old == new {
        return;
    }
    if let Some(owner) = g.node(id).z_owner {
        if g.contains(owner) {
            flag(g, owner, id);
        }
    }
    if (old == 0) != (new == 0) {
        if new == 0 {
            g.node_mut(id).z_owner = None;
        }
        g.mark_subtree(id, Recalc::TRANSFORM);
    } else {
        g.mark(id, Recalc::TRANSFORM);
    }
}

/// Eagerly removes every member of a detached subtree from the contexts it
/// was registered with (those can live above the detach point).
pub(crate) fn unregister_subtree(g: &mut SceneGraph, root: NodeId) {
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        stack.extend_from_slice(&g.node(n).children);
        let Some(owner) = g.node_mut(n).z_owner.take() else {
            continue;
        };
        if !g.contains(owner) {
            continue;
        }
        if let Some(ctx) = g.node_mut(owner).z_ctx.as_deref_mut() {
            ctx.items.retain(|&m| m != n);
            ctx.flagged.retain(|&m| m != n);
        }
    }
}

// ── merge ─────────────────────────────────────────────────────────────────

/// Returns the context's members sorted by (z_index, tree_order), merging
/// in any flagged entries first. No flagged entries means no sorting work.
pub(crate) fn sorted_items(g: &mut SceneGraph, owner: NodeId) -> Vec<NodeId> {
    let Some(mut ctx) = g.node_mut(owner).z_ctx.take() else {
        return Vec::new();
    };

    if !ctx.flagged.is_empty() {
        let mut fresh: Vec<NodeId> = std::mem::take(&mut ctx.flagged);
        fresh.sort_unstable();
        fresh.dedup();
        fresh.retain(|&id| is_member(g, owner, id));
        fresh.sort_by_key(|&id| key(g, id));

        let dropped: HashSet<NodeId> = fresh.iter().copied().collect();
        let kept: Vec<NodeId> = ctx
            .items
            .iter()
            .copied()
            .filter(|&id| is_member(g, owner, id) && !dropped.contains(&id))
            .collect();

        // Both runs are sorted; a linear merge keeps the whole list sorted.
        let mut merged = Vec::with_capacity(kept.len() + fresh.len());
        let (mut i, mut j) = (0, 0);
        while i < kept.len() && j < fresh.len() {
            if key(g, kept[i]) <= key(g, fresh[j]) {
                merged.push(kept[i]);
                i += 1;
            } else {
                merged.push(fresh[j]);
                j += 1;
            }
        }
        merged.extend_from_slice(&kept[i..]);
        merged.extend_from_slice(&fresh[j..]);
        ctx.items = merged;
    } else {
        ctx.items.retain(|&id| is_member(g, owner, id));
    }

    let items = ctx.items.clone();
    g.node_mut(owner).z_ctx = Some(ctx);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp_order(g: &mut SceneGraph, ids: &[NodeId]) {
        for (i, &id) in ids.iter().enumerate() {
            g.node_mut(id).tree_order = i as u32;
        }
    }

    #[test]
    fn equal_z_preserves_tree_order() {
        let mut g = SceneGraph::new(100.0, 100.0);
        let root = g.root();
        let (a, b, c) = (g.create(), g.create(), g.create());
        for id in [a, b, c] {
            g.add_child(root, id);
            g.node_mut(id).z_index = 1;
        }
        stamp_order(&mut g, &[a, b, c]);
        for id in [a, b, c] {
            register(&mut g, id, root);
        }
        assert_eq!(sorted_items(&mut g, root), vec![a, b, c]);
    }

    #[test]
    fn z_change_reorders_only_the_flagged_entry() {
        let mut g = SceneGraph::new(100.0, 100.0);
        let root = g.root();
        let (a, b) = (g.create(), g.create());
        for id in [a, b] {
            g.add_child(root, id);
        }
        g.node_mut(a).z_index = 1;
        g.node_mut(b).z_index = 2;
        stamp_order(&mut g, &[a, b]);
        register(&mut g, a, root);
        register(&mut g, b, root);
        assert_eq!(sorted_items(&mut g, root), vec![a, b]);

        g.set_z_index(a, 3);
        assert_eq!(sorted_items(&mut g, root), vec![b, a]);
    }

    #[test]
    fn detached_member_drops_out() {
        let mut g = SceneGraph::new(100.0, 100.0);
        let root = g.root();
        let (a, b) = (g.create(), g.create());
        for id in [a, b] {
            g.add_child(root, id);
            g.node_mut(id).z_index = 1;
        }
        stamp_order(&mut g, &[a, b]);
        register(&mut g, a, root);
        register(&mut g, b, root);
        sorted_items(&mut g, root);

        g.remove_child(a);
        assert_eq!(sorted_items(&mut g, root), vec![b]);
    }

    #[test]
    fn zeroed_z_leaves_the_context() {
        let mut g = SceneGraph::new(100.0, 100.0);
        let root = g.root();
        let a = g.create();
        g.add_child(root, a);
        g.node_mut(a).z_index = 1;
        g.node_mut(a).tree_order = 0;
        register(&mut g, a, root);
        assert_eq!(sorted_items(&mut g, root), vec![a]);

        g.set_z_index(a, 0);
        assert!(sorted_items(&mut g, root).is_empty());
    }
}
