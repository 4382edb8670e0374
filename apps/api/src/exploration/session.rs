//! Session state for one exploration. The explorer is single-user by
//! design: the process owns exactly one `ExplorationState`, mutated only by
//! the controller, one render pass at a time. Nothing here survives a
//! restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm_client::TokenUsage;
use crate::models::entity::CenterResult;

/// Which exploration strategy governs prompt shape and graph semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Company → competitors and similar-culture companies.
    #[default]
    Discovery,
    /// Job title → companies hiring the role.
    RoleSearch,
    /// Résumé text → candidate career paths and what unlocks them.
    ResumeMatch,
}

/// Independent prompt constraints. "Any" means unconstrained but is still
/// spelled out to the model verbatim — filters are never silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    pub industry: String,
    pub company_size: String,
    pub work_style: String,
    pub role_function: String,
}

pub const FILTER_ANY: &str = "Any";

impl Default for Filters {
    fn default() -> Self {
        Self {
            industry: FILTER_ANY.to_string(),
            company_size: FILTER_ANY.to_string(),
            work_style: FILTER_ANY.to_string(),
            role_function: FILTER_ANY.to_string(),
        }
    }
}

impl Filters {
    /// Stable (label, value) pairs for prompt interpolation.
    pub fn as_pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("Industry", self.industry.as_str()),
            ("Company size", self.company_size.as_str()),
            ("Work style", self.work_style.as_str()),
            ("Role function", self.role_function.as_str()),
        ]
    }
}

/// One resolved exploration center, remembered for re-centering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub name: String,
    pub explored_at: DateTime<Utc>,
}

/// Running token/cost counters, monotonically non-decreasing within a
/// session. Estimates, not billing records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub estimated_cost_usd: f64,
}

impl UsageTotals {
    pub fn absorb(&mut self, usage: TokenUsage) {
        self.input_tokens += usage.input_tokens;
        self.output_tokens += usage.output_tokens;
        self.estimated_cost_usd += usage.cost_usd();
    }
}

/// A successful fetch plus the mode it was fetched under — the pair
/// freshness checks compare against.
#[derive(Debug, Clone)]
pub struct FetchedResult {
    pub mode: Mode,
    pub result: CenterResult,
}

/// Process-wide exploration state, lifecycle = one user session.
#[derive(Debug, Clone, Default)]
pub struct ExplorationState {
    pub mode: Mode,
    /// Company name, job title, or résumé text. Rewritten to the canonical
    /// center name after a successful fetch.
    pub active_query: String,
    pub filters: Filters,
    pub last_result: Option<FetchedResult>,
    /// Set by user actions to force the next pass to refetch even when the
    /// cached result still matches. Cleared only by a successful fetch, so
    /// the next user-triggered pass after a failure retries.
    pub stale: bool,
    /// Canonical names in insertion order, no duplicates.
    pub history: Vec<HistoryEntry>,
    pub usage: UsageTotals,
    /// User-visible message from the most recent failed fetch.
    pub last_error: Option<String>,
}

/// Most recent entries shown in the history list.
pub const HISTORY_DISPLAY_CAP: usize = 5;

impl ExplorationState {
    /// The displayed slice of history: newest first, capped.
    pub fn recent_history(&self) -> Vec<HistoryEntry> {
        self.history
            .iter()
            .rev()
            .take(HISTORY_DISPLAY_CAP)
            .cloned()
            .collect()
    }
}
