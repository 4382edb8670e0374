//! Primitives consumed by the external node-link widget: nodes, edges, and
//! the widget config object. The widget owns layout, physics, and click
//! capture; this process only decides what exists and how it is styled.

use serde::Serialize;

/// A renderable node. `id` doubles as the identity key — the widget reports
/// clicks by id, and the controller routes them by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    /// Distance from the center entity: 0, 1, or 2.
    pub layer: u8,
    pub size: u32,
    pub color: &'static str,
    pub shape: &'static str,
    /// Tooltip text — the model's one-line reason, absent for the center.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A directed edge. Both endpoints are guaranteed to exist in the node set
/// of the `GraphView` that carries the edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub color: &'static str,
    pub dashes: bool,
}

/// The derived view handed to the widget. Recomputed from the current
/// fetch result on every render pass, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Widget configuration: dimensions, directedness, physics, highlight.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub width: u32,
    pub height: u32,
    pub directed: bool,
    pub physics: bool,
    pub hierarchical: bool,
    pub node_highlight_behavior: bool,
    pub highlight_color: &'static str,
    pub collapsible: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            directed: true,
            physics: true,
            hierarchical: false,
            node_highlight_behavior: true,
            highlight_color: "#F7A7A6",
            collapsible: false,
        }
    }
}
