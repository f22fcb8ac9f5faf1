//! Headless demo driving the tiamat engine.
//!
//! Builds a small flex-laid-out scene, runs a few frames while mutating it,
//! and prints the resulting boxes and draw list. Useful as a smoke test and
//! as a reference for embedding the engine without a renderer.

use anyhow::Result;
use tiamat_engine::coords::Edges;
use tiamat_engine::flex::{FlexContainer, FlexDirection, JustifyContent};
use tiamat_engine::logging::{init_logging, LoggingConfig};
use tiamat_engine::{NodeId, Stage};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut stage = Stage::new(1280.0, 720.0);
    let root = stage.root();

    // A sidebar column and a content row of cards.
    let sidebar = column(&mut stage, root, 280.0);
    for _ in 0..4 {
        let entry = stage.graph_mut().create();
        stage.graph_mut().add_child(sidebar, entry);
        stage.graph_mut().set_size(entry, 240.0, 48.0);
        stage.graph_mut().set_item_margin(
            entry,
            Edges {
                top: 8.0,
                ..Default::default()
            },
        );
    }

    let content = stage.graph_mut().create();
    stage.graph_mut().add_child(root, content);
    stage.graph_mut().set_position(content, 300.0, 0.0);
    stage.graph_mut().set_size(content, 960.0, 720.0);
    stage.graph_mut().set_flex_container(
        content,
        FlexContainer {
            direction: FlexDirection::Row,
            wrap: true,
            justify_content: JustifyContent::SpaceBetween,
            ..Default::default()
        },
    );
    let cards: Vec<NodeId> = (0..6)
        .map(|_| {
            let card = stage.graph_mut().create();
            stage.graph_mut().add_child(content, card);
            stage.graph_mut().set_size(card, 300.0, 200.0);
            stage.graph_mut().set_item_margin(card, Edges::all(10.0));
            card
        })
        .collect();

    let list = stage.frame();
    log::info!("frame 1: {} draw items", list.len());
    report(&stage, "sidebar", sidebar);
    for (i, &card) in cards.iter().enumerate() {
        report(&stage, &format!("card {i}"), card);
    }

    // Grow the first card and watch the row re-justify.
    stage.graph_mut().set_width(cards[0], 500.0);
    stage.frame();
    log::info!("after widening card 0:");
    for (i, &card) in cards.iter().enumerate() {
        report(&stage, &format!("card {i}"), card);
    }

    // Drop a card entirely; the container re-wraps on the next frame.
    stage.graph_mut().destroy(cards[5]);
    let list = stage.frame();
    log::info!("after destroy: {} draw items", list.len());

    Ok(())
}

/// Fit-to-contents column container of the given width.
fn column(stage: &mut Stage, parent: NodeId, width: f32) -> NodeId {
    let id = stage.graph_mut().create();
    stage.graph_mut().add_child(parent, id);
    stage.graph_mut().set_width(id, width);
    stage.graph_mut().set_flex_container(
        id,
        FlexContainer {
            direction: FlexDirection::Column,
            ..Default::default()
        },
    );
    id
}

fn report(stage: &Stage, name: &str, id: NodeId) {
    let g = stage.graph();
    let bb = g.bbox(id);
    log::info!(
        "{name}: ({}, {}) {}x{} [{:?}]",
        bb.x,
        bb.y,
        bb.w,
        bb.h,
        g.out_of_bounds(id)
    );
}
