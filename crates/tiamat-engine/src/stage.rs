//! Frame orchestration.
//!
//! A [`Stage`] owns the scene graph and runs the frame pipeline in a fixed
//! order: layout scheduler, update pass, render list. Applications mutate
//! the graph freely between frames; all heavy recomputation happens here.

use crate::coords::Rect;
use crate::flex;
use crate::scene::update::UpdatePass;
use crate::scene::{render, NodeId, Recalc, RenderList, SceneGraph};

/// Default width of the band around the viewport within which culled nodes
/// still signal re-entry (preload headroom).
pub const DEFAULT_BOUNDS_MARGIN: f32 = 100.0;

pub struct Stage {
    graph: SceneGraph,
    viewport: Rect,
    bounds_margin: f32,
    frame_index: u64,
    render_list: RenderList,
}

impl Stage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            graph: SceneGraph::new(width, height),
            viewport: Rect::new(0.0, 0.0, width, height),
            bounds_margin: DEFAULT_BOUNDS_MARGIN,
            frame_index: 0,
            render_list: RenderList::default(),
        }
    }

    #[inline]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    #[inline]
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.graph.root()
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Widens or narrows the re-entry band. Every cached culling state is
    /// stale afterwards.
    pub fn set_bounds_margin(&mut self, margin: f32) {
        if self.bounds_margin != margin {
            self.bounds_margin = margin;
            let root = self.graph.root();
            self.graph.mark_subtree(root, Recalc::TRANSFORM);
        }
    }

    #[inline]
    pub fn bounds_margin(&self) -> f32 {
        self.bounds_margin
    }

    /// Runs one frame: drain queued layout roots, update transforms and
    /// bounds, rebuild the draw list.
    pub fn frame(&mut self) -> &RenderList {
        self.frame_index += 1;
        log::trace!("frame {} begin", self.frame_index);

        flex::layout::run(&mut self.graph);
        UpdatePass::new(self.viewport, self.bounds_margin, self.frame_index).run(&mut self.graph);
        render::build(&mut self.graph, &mut self.render_list);

        log::trace!(
            "frame {} done: {} draw items",
            self.frame_index,
            self.render_list.len()
        );
        &self.render_list
    }

    /// Nodes that came (back) into the margin-extended viewport during the
    /// last frame; consumed by the caller for preloading.
    pub fn take_entered_bounds(&mut self) -> Vec<NodeId> {
        self.graph.take_entered_bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flex::FlexContainer;

    #[test]
    fn frame_runs_layout_before_update() {
        let mut stage = Stage::new(800.0, 600.0);
        let root = stage.root();

        let row = stage.graph_mut().create();
        stage.graph_mut().add_child(root, row);
        stage.graph_mut().set_size(row, 300.0, 100.0);
        stage
            .graph_mut()
            .set_flex_container(row, FlexContainer::default());

        let (a, b) = (stage.graph_mut().create(), stage.graph_mut().create());
        for id in [a, b] {
            stage.graph_mut().add_child(row, id);
            stage.graph_mut().set_size(id, 50.0, 40.0);
        }

        stage.frame();

        // Items are placed by layout and carried into world transforms in
        // the same frame.
        let wa = stage.graph().world_ctx(a).matrix;
        let wb = stage.graph().world_ctx(b).matrix;
        assert_eq!(wa.apply(0.0, 0.0), (0.0, 0.0));
        assert_eq!(wb.apply(0.0, 0.0), (50.0, 0.0));
    }

    #[test]
    fn second_frame_without_changes_is_stable() {
        let mut stage = Stage::new(800.0, 600.0);
        let root = stage.root();
        let a = stage.graph_mut().create();
        stage.graph_mut().add_child(root, a);
        stage.graph_mut().set_size(a, 20.0, 20.0);

        let first: Vec<_> = stage.frame().items().iter().map(|i| i.quad).collect();
        let second: Vec<_> = stage.frame().items().iter().map(|i| i.quad).collect();
        assert_eq!(first, second);
    }
}
