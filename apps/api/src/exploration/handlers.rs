//! Axum route handlers for the Exploration API.
//!
//! The session mutex is held for the whole render pass — event application,
//! model call, commit — so passes never interleave and a later action
//! simply overwrites an earlier result (last-action-wins).

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::exploration::controller::{apply_event, run_pass, ExplorationEvent};
use crate::exploration::graph::assemble;
use crate::exploration::session::{ExplorationState, Filters, HistoryEntry, Mode, UsageTotals};
use crate::models::entity::{CenterEntity, ConnectionEntity};
use crate::models::graph::{GraphView, WidgetConfig};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub filters: Filters,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeClickRequest {
    pub node_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryClickRequest {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    /// No result yet — the UI shows its placeholder.
    Waiting,
    /// A graph is available.
    Ready,
    /// The most recent fetch failed; any previous graph is still included.
    Error,
}

/// Everything the client renders: graph + widget config, the detail pane
/// payload, history, and the running usage counters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorationView {
    pub status: ViewStatus,
    pub mode: Mode,
    pub active_query: String,
    pub filters: Filters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphView>,
    pub widget: WidgetConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<CenterEntity>,
    pub connections: Vec<ConnectionEntity>,
    pub history: Vec<HistoryEntry>,
    pub usage: UsageTotals,
}

impl ExplorationView {
    fn from_state(state: &ExplorationState) -> Self {
        let (graph, center, connections) = match &state.last_result {
            Some(last) => (
                Some(assemble(&last.result, last.mode)),
                Some(last.result.center_entity.clone()),
                last.result.connections.clone(),
            ),
            None => (None, None, Vec::new()),
        };
        let status = if state.last_error.is_some() {
            ViewStatus::Error
        } else if state.last_result.is_some() {
            ViewStatus::Ready
        } else {
            ViewStatus::Waiting
        };
        Self {
            status,
            mode: state.mode,
            active_query: state.active_query.clone(),
            filters: state.filters.clone(),
            error: state.last_error.clone(),
            graph,
            widget: WidgetConfig::default(),
            center,
            connections,
            history: state.recent_history(),
            usage: state.usage,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/explore
///
/// The current view. Read-only: never triggers a model call, so polling is
/// free.
pub async fn handle_get_view(State(state): State<AppState>) -> Json<ExplorationView> {
    let exploration = state.exploration.lock().await;
    Json(ExplorationView::from_state(&exploration))
}

/// POST /api/v1/explore/search
///
/// Submit a new query + mode + filters, then run one render pass. Fetch
/// failures come back inside the view with the previous graph intact.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<ExplorationView>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let mut exploration = state.exploration.lock().await;
    apply_event(
        &mut exploration,
        ExplorationEvent::Submit {
            query: request.query,
            mode: request.mode,
            filters: request.filters,
        },
    );
    run_pass(&mut exploration, state.llm.as_ref()).await;
    Ok(Json(ExplorationView::from_state(&exploration)))
}

/// POST /api/v1/explore/click
///
/// The widget reported a node click. Clicking the current center is a
/// no-op; any other node re-centers the exploration on it.
pub async fn handle_node_click(
    State(state): State<AppState>,
    Json(request): Json<NodeClickRequest>,
) -> Result<Json<ExplorationView>, AppError> {
    if request.node_id.trim().is_empty() {
        return Err(AppError::Validation("nodeId cannot be empty".to_string()));
    }

    let mut exploration = state.exploration.lock().await;
    apply_event(
        &mut exploration,
        ExplorationEvent::NodeClick {
            node_id: request.node_id,
        },
    );
    run_pass(&mut exploration, state.llm.as_ref()).await;
    Ok(Json(ExplorationView::from_state(&exploration)))
}

/// POST /api/v1/explore/history
///
/// Re-center on a previously resolved canonical name.
pub async fn handle_history_click(
    State(state): State<AppState>,
    Json(request): Json<HistoryClickRequest>,
) -> Result<Json<ExplorationView>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let mut exploration = state.exploration.lock().await;
    apply_event(
        &mut exploration,
        ExplorationEvent::HistoryClick { name: request.name },
    );
    run_pass(&mut exploration, state.llm.as_ref()).await;
    Ok(Json(ExplorationView::from_state(&exploration)))
}

/// POST /api/v1/explore/clear
///
/// Reset the session to defaults. No model call.
pub async fn handle_clear(State(state): State<AppState>) -> Json<ExplorationView> {
    let mut exploration = state.exploration.lock().await;
    apply_event(&mut exploration, ExplorationEvent::Clear);
    Json(ExplorationView::from_state(&exploration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exploration::session::FetchedResult;
    use crate::models::entity::{CenterResult, EntityType};
    use chrono::Utc;

    fn fetched(name: &str) -> FetchedResult {
        FetchedResult {
            mode: Mode::Discovery,
            result: CenterResult {
                center_entity: CenterEntity {
                    name: name.to_string(),
                    entity_type: EntityType::Company,
                    mission: "m".to_string(),
                    positive_signals: "p".to_string(),
                    caveats: "c".to_string(),
                },
                connections: vec![ConnectionEntity {
                    name: "Anthropic".to_string(),
                    reason: "r".to_string(),
                    category: None,
                    sub_connections: None,
                }],
            },
        }
    }

    #[test]
    fn test_view_is_waiting_for_a_fresh_session() {
        let view = ExplorationView::from_state(&ExplorationState::default());
        assert_eq!(view.status, ViewStatus::Waiting);
        assert!(view.graph.is_none());
        assert!(view.connections.is_empty());
    }

    #[test]
    fn test_view_is_ready_with_graph_and_details() {
        let mut state = ExplorationState::default();
        state.active_query = "OpenAI".to_string();
        state.last_result = Some(fetched("OpenAI"));

        let view = ExplorationView::from_state(&state);
        assert_eq!(view.status, ViewStatus::Ready);
        let graph = view.graph.as_ref().unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(view.center.as_ref().unwrap().name, "OpenAI");
        assert_eq!(view.connections.len(), 1);
    }

    #[test]
    fn test_failed_fetch_view_keeps_previous_graph() {
        let mut state = ExplorationState::default();
        state.active_query = "OpenAI".to_string();
        state.last_result = Some(fetched("OpenAI"));
        state.last_error = Some("provider error (status 503): overloaded".to_string());

        let view = ExplorationView::from_state(&state);
        assert_eq!(view.status, ViewStatus::Error);
        assert!(view.graph.is_some());
        assert!(view.error.as_ref().unwrap().contains("503"));
    }

    #[test]
    fn test_view_history_is_capped_and_newest_first() {
        let mut state = ExplorationState::default();
        for name in ["A", "B", "C", "D", "E", "F"] {
            state.history.push(HistoryEntry {
                name: name.to_string(),
                explored_at: Utc::now(),
            });
        }
        let view = ExplorationView::from_state(&state);
        assert_eq!(view.history.len(), 5);
        assert_eq!(view.history[0].name, "F");
    }
}
