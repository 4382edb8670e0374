//! Session/fetch controller — one event type per user action, one render
//! pass per event. A pass makes at most one model call; there is no
//! automatic retry, no prefetch, and no background fetching. After a
//! failure the state is only re-fetched when the user triggers another
//! action.

use chrono::Utc;
use tracing::{info, warn};

use crate::exploration::prompts::{build_prompt, ExplorationPrompt};
use crate::exploration::session::{ExplorationState, FetchedResult, Filters, HistoryEntry, Mode};
use crate::llm_client::{parse_payload, GenerativeBackend, LlmError, TokenUsage};
use crate::models::entity::CenterResult;

/// One user action. Every state mutation enters through `apply_event`.
#[derive(Debug, Clone)]
pub enum ExplorationEvent {
    /// Explicit submit of query + mode + filters. Filters only ever travel
    /// with a submit; changing them alone never refetches.
    Submit {
        query: String,
        mode: Mode,
        filters: Filters,
    },
    /// The widget reported a click on a node.
    NodeClick { node_id: String },
    /// A history entry was clicked — identical to resubmitting that name
    /// under the current mode and filters.
    HistoryClick { name: String },
    /// Reset the whole session to defaults.
    Clear,
}

pub fn apply_event(state: &mut ExplorationState, event: ExplorationEvent) {
    match event {
        ExplorationEvent::Submit {
            query,
            mode,
            filters,
        } => {
            state.active_query = query.trim().to_string();
            state.mode = mode;
            state.filters = filters;
            state.stale = true;
            state.last_error = None;
        }
        ExplorationEvent::NodeClick { node_id } => {
            let clicked_center = state
                .last_result
                .as_ref()
                .is_some_and(|last| last.result.center_entity.name == node_id);
            if clicked_center {
                return;
            }
            // Drill-down always pivots to Discovery.
            state.active_query = node_id;
            state.mode = Mode::Discovery;
            state.stale = true;
            state.last_error = None;
        }
        ExplorationEvent::HistoryClick { name } => {
            state.active_query = name;
            state.stale = true;
            state.last_error = None;
        }
        ExplorationEvent::Clear => {
            *state = ExplorationState::default();
        }
    }
}

/// A fetch is due when there is a query and either a user action marked the
/// state stale or the cached result no longer matches the (mode, canonical
/// name) pair.
pub fn should_fetch(state: &ExplorationState) -> bool {
    if state.active_query.is_empty() {
        return false;
    }
    if state.stale {
        return true;
    }
    match &state.last_result {
        None => true,
        Some(last) => {
            last.mode != state.mode || last.result.center_entity.name != state.active_query
        }
    }
}

/// Runs one render pass: fetch if stale, commit on success, record the
/// error and keep all prior state (including the previous graph) on
/// failure.
pub async fn run_pass(state: &mut ExplorationState, backend: &dyn GenerativeBackend) {
    if !should_fetch(state) {
        return;
    }

    let prompt = build_prompt(state.mode, &state.active_query, &state.filters);
    match fetch_center(backend, &prompt).await {
        Ok((result, usage)) => {
            state.usage.absorb(usage);

            // The canonical name replaces the raw query so the freshness
            // check stops seeing a mismatch the model would "correct" the
            // same way forever.
            let canonical = result.center_entity.name.clone();
            if canonical != state.active_query {
                info!(raw = %state.active_query, %canonical, "query normalized by model");
                state.active_query = canonical.clone();
            }

            if !state.history.iter().any(|entry| entry.name == canonical) {
                state.history.push(HistoryEntry {
                    name: canonical,
                    explored_at: Utc::now(),
                });
            }

            state.last_result = Some(FetchedResult {
                mode: state.mode,
                result,
            });
            state.stale = false;
            state.last_error = None;
        }
        Err(err) => {
            warn!(%err, "exploration fetch failed");
            state.last_error = Some(err.to_string());
        }
    }
}

/// One full fetch: model call, fence stripping + JSON parse, semantic
/// validation. Either a fully-populated result or an error — never partial.
async fn fetch_center(
    backend: &dyn GenerativeBackend,
    prompt: &ExplorationPrompt,
) -> Result<(CenterResult, TokenUsage), LlmError> {
    let reply = backend.generate(&prompt.system, &prompt.user).await?;
    let result: CenterResult = parse_payload(&reply.text)?;
    result.validate().map_err(LlmError::Schema)?;
    Ok((result, reply.usage))
}
