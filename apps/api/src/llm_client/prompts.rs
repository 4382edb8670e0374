// Shared prompt fragments. Each module that talks to the model defines its
// own prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output. The gateway's
/// parser depends on this contract but cannot enforce it — it can only
/// strip fences when the model ignores it.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
