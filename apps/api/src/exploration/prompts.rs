//! Prompt construction for the exploration fetch. Pure and deterministic:
//! the same (mode, query, filters) always yields the same prompt text.
//! Reuses the cross-cutting JSON-only fragment from llm_client::prompts.

use crate::exploration::session::{Filters, Mode};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Output schema stated to the model. The gateway parses against exactly
/// this shape; drift here breaks every fetch.
const OUTPUT_SCHEMA: &str = r#"Structure:
{
    "centerEntity": {
        "name": "Corrected canonical name of the input",
        "type": "Company" or "Job" or "Candidate",
        "mission": "One-sentence mission or profile summary",
        "positiveSignals": "Short, punchy upside notes (max 20 words)",
        "caveats": "Short, honest caveats (max 20 words)"
    },
    "connections": [
        {
            "name": "Entity name",
            "reason": "A short, punchy reason (max 15 words) for the connection",
            "category": "Industry or category name",
            "subConnections": [
                { "name": "Entity name", "reason": "Why it follows (max 12 words)" }
            ]
        }
    ]
}"#;

const DISCOVERY_RULES: &str = "The input is a company. \
    Return 6-8 competitors or companies with a similar engineering culture \
    as connections. For each connection, list exactly 2 subConnections: \
    second-order companies a candidate comparing them would also consider.";

const ROLE_SEARCH_RULES: &str = "The input is a job title or skill. \
    Return exactly 10 top companies known for hiring this role, with a good \
    reputation, as connections. For each connection, list exactly 2 \
    subConnections: adjacent roles this title leads to at such companies.";

const RESUME_MATCH_RULES: &str = "The input is resume text. \
    Return exactly 5 candidate career paths this resume supports as \
    connections. For each connection, list exactly 2 subConnections: \
    certifications or skills that unlock the path.";

/// System + user message pair produced by `build_prompt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorationPrompt {
    pub system: String,
    pub user: String,
}

/// Builds the full prompt for one fetch. Every filter value is interpolated
/// verbatim as a constraint line, including the default "Any".
pub fn build_prompt(mode: Mode, query: &str, filters: &Filters) -> ExplorationPrompt {
    let rules = match mode {
        Mode::Discovery => DISCOVERY_RULES,
        Mode::RoleSearch => ROLE_SEARCH_RULES,
        Mode::ResumeMatch => RESUME_MATCH_RULES,
    };

    let system = format!(
        "You are a Career Data Engine. {JSON_ONLY_SYSTEM}\n\n{rules}\n\n{OUTPUT_SCHEMA}"
    );

    let mut user = match mode {
        Mode::ResumeMatch => format!("Analyze this resume:\n{query}\n"),
        Mode::Discovery | Mode::RoleSearch => format!("Analyze this query: '{query}'\n"),
    };
    user.push_str("\nConstraints (honor every one; 'Any' means unconstrained):\n");
    for (label, value) in filters.as_pairs() {
        user.push_str(&format!("- {label}: {value}\n"));
    }

    ExplorationPrompt { system, user }
}
