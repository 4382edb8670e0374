//! Graph assembly — folds a `CenterResult` into the node/edge lists the
//! external widget renders. Pure and deterministic; styling derives from
//! (layer, mode) only.
//!
//! Node identity is the display name. A name recurring at layer 1 and
//! layer 2 collapses into a single node with multiple incoming edges: the
//! output is a general directed graph, not a tree, even though it is
//! generated layer by layer.

use std::collections::HashSet;

use crate::exploration::session::Mode;
use crate::models::entity::CenterResult;
use crate::models::graph::{GraphEdge, GraphNode, GraphView};

const CENTER_COLOR: &str = "#FF4B4B";
const LAYER1_COLOR: &str = "#00C0F2";
const LAYER2_COLOR: &str = "#A0A0A0";
const EDGE_COLOR: &str = "#505050";

const CENTER_SIZE: u32 = 40;
const LAYER1_SIZE: u32 = 25;
const LAYER2_SIZE: u32 = 14;

/// Builds the renderable view: center node first, then layer-1 connections
/// in order, each followed by its layer-2 sub-connections. First occurrence
/// of a name wins; later occurrences only contribute edges.
pub fn assemble(result: &CenterResult, mode: Mode) -> GraphView {
    let mut view = GraphView::default();
    let mut seen: HashSet<String> = HashSet::new();

    let center = result.center_entity.name.as_str();
    push_node(&mut view, &mut seen, center, 0, mode, None);

    for connection in &result.connections {
        push_node(
            &mut view,
            &mut seen,
            &connection.name,
            1,
            mode,
            Some(connection.reason.clone()),
        );
        push_edge(&mut view, center, &connection.name, 1, mode);

        for sub in connection.sub_connections.iter().flatten() {
            push_node(
                &mut view,
                &mut seen,
                &sub.name,
                2,
                mode,
                Some(sub.reason.clone()),
            );
            push_edge(&mut view, &connection.name, &sub.name, 2, mode);
        }
    }

    view
}

fn push_node(
    view: &mut GraphView,
    seen: &mut HashSet<String>,
    name: &str,
    layer: u8,
    mode: Mode,
    title: Option<String>,
) {
    if !seen.insert(name.to_string()) {
        return;
    }
    let (size, color) = match layer {
        0 => (CENTER_SIZE, CENTER_COLOR),
        1 => (LAYER1_SIZE, LAYER1_COLOR),
        _ => (LAYER2_SIZE, LAYER2_COLOR),
    };
    view.nodes.push(GraphNode {
        id: name.to_string(),
        label: name.to_string(),
        layer,
        size,
        color,
        shape: node_shape(layer, mode),
        title,
    });
}

fn push_edge(view: &mut GraphView, source: &str, target: &str, layer: u8, mode: Mode) {
    // A connection that shares the center's name would produce a self-loop.
    if source == target {
        return;
    }
    view.edges.push(GraphEdge {
        source: source.to_string(),
        target: target.to_string(),
        color: EDGE_COLOR,
        dashes: edge_dashes(layer, mode),
    });
}

/// The center is always a dot; outer layers take a per-mode shape so the
/// edge semantics read differently at a glance.
fn node_shape(layer: u8, mode: Mode) -> &'static str {
    if layer == 0 {
        return "dot";
    }
    match mode {
        Mode::Discovery => "dot",
        Mode::RoleSearch => "diamond",
        Mode::ResumeMatch => "hexagon",
    }
}

/// Discovery layer-1 edges are solid ("related to"); RoleSearch and
/// ResumeMatch edges are dashed ("leads to"). Layer-2 edges are always the
/// weaker dashed link.
fn edge_dashes(layer: u8, mode: Mode) -> bool {
    match (layer, mode) {
        (1, Mode::Discovery) => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entity::{CenterEntity, ConnectionEntity, EntityType, SubConnection};

    fn entity(name: &str) -> CenterEntity {
        CenterEntity {
            name: name.to_string(),
            entity_type: EntityType::Company,
            mission: "m".to_string(),
            positive_signals: "p".to_string(),
            caveats: "c".to_string(),
        }
    }

    fn connection(name: &str, subs: &[&str]) -> ConnectionEntity {
        ConnectionEntity {
            name: name.to_string(),
            reason: format!("reason for {name}"),
            category: None,
            sub_connections: if subs.is_empty() {
                None
            } else {
                Some(
                    subs.iter()
                        .map(|sub| SubConnection {
                            name: sub.to_string(),
                            reason: format!("reason for {sub}"),
                        })
                        .collect(),
                )
            },
        }
    }

    fn sample_result() -> CenterResult {
        CenterResult {
            center_entity: entity("OpenAI"),
            connections: vec![
                connection("Anthropic", &["DeepMind", "Cohere"]),
                connection("Mistral", &["Hugging Face"]),
                connection("xAI", &[]),
            ],
        }
    }

    #[test]
    fn test_node_count_equals_distinct_names() {
        let view = assemble(&sample_result(), Mode::Discovery);
        // OpenAI + Anthropic, Mistral, xAI + DeepMind, Cohere, Hugging Face
        assert_eq!(view.nodes.len(), 7);
        assert_eq!(view.edges.len(), 6);
    }

    #[test]
    fn test_every_edge_endpoint_exists_in_node_set() {
        let view = assemble(&sample_result(), Mode::Discovery);
        let ids: HashSet<&str> = view.nodes.iter().map(|node| node.id.as_str()).collect();
        for edge in &view.edges {
            assert!(ids.contains(edge.source.as_str()), "dangling source {}", edge.source);
            assert!(ids.contains(edge.target.as_str()), "dangling target {}", edge.target);
        }
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let result = sample_result();
        let first = assemble(&result, Mode::Discovery);
        let second = assemble(&result, Mode::Discovery);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cross_layer_duplicate_yields_one_node_two_edges() {
        let result = CenterResult {
            center_entity: entity("OpenAI"),
            connections: vec![
                connection("Anthropic", &[]),
                connection("Mistral", &["Anthropic"]),
            ],
        };
        let view = assemble(&result, Mode::Discovery);

        let anthropic_nodes: Vec<&GraphNode> = view
            .nodes
            .iter()
            .filter(|node| node.id == "Anthropic")
            .collect();
        assert_eq!(anthropic_nodes.len(), 1);
        // First occurrence wins: it stays a layer-1 node.
        assert_eq!(anthropic_nodes[0].layer, 1);

        let incoming: Vec<&GraphEdge> = view
            .edges
            .iter()
            .filter(|edge| edge.target == "Anthropic")
            .collect();
        assert_eq!(incoming.len(), 2);
    }

    #[test]
    fn test_connection_named_like_center_does_not_self_loop() {
        let result = CenterResult {
            center_entity: entity("OpenAI"),
            connections: vec![connection("OpenAI", &[]), connection("Anthropic", &[])],
        };
        let view = assemble(&result, Mode::Discovery);
        assert!(view.edges.iter().all(|edge| edge.source != edge.target));
        assert_eq!(view.nodes.len(), 2);
    }

    #[test]
    fn test_visual_hierarchy_center_most_prominent() {
        let view = assemble(&sample_result(), Mode::Discovery);
        let size_of = |layer: u8| {
            view.nodes
                .iter()
                .find(|node| node.layer == layer)
                .map(|node| node.size)
                .unwrap()
        };
        assert!(size_of(0) > size_of(1));
        assert!(size_of(1) > size_of(2));
    }

    #[test]
    fn test_modes_use_distinct_shapes_and_edge_styles() {
        let result = sample_result();
        let discovery = assemble(&result, Mode::Discovery);
        let role_search = assemble(&result, Mode::RoleSearch);

        let layer1_shape = |view: &GraphView| {
            view.nodes
                .iter()
                .find(|node| node.layer == 1)
                .map(|node| node.shape)
                .unwrap()
        };
        assert_ne!(layer1_shape(&discovery), layer1_shape(&role_search));

        // "related to" is solid, "leads to" is dashed
        assert!(!discovery.edges[0].dashes);
        assert!(role_search.edges[0].dashes);
    }

    #[test]
    fn test_layer_two_edges_are_always_dashed() {
        let view = assemble(&sample_result(), Mode::Discovery);
        let sub_edge = view
            .edges
            .iter()
            .find(|edge| edge.source == "Anthropic")
            .unwrap();
        assert!(sub_edge.dashes);
    }

    #[test]
    fn test_center_node_has_no_tooltip_connections_do() {
        let view = assemble(&sample_result(), Mode::Discovery);
        assert!(view.nodes[0].title.is_none());
        assert!(view.nodes[1].title.is_some());
    }
}
