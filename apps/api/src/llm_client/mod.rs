/// LLM Client — the single point of entry for all Gemini API calls in the
/// explorer.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All model interactions MUST go through `GenerativeBackend`.
///
/// Model: gemini-1.5-flash (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// The model used for all LLM calls in the explorer.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-1.5-flash";
const MAX_OUTPUT_TOKENS: u32 = 2048;

// Flat USD rates for the hardcoded model. Cost figures are estimates for
// the session counters, not billing-grade accounting.
const INPUT_USD_PER_TOKEN: f64 = 0.075 / 1_000_000.0;
const OUTPUT_USD_PER_TOKEN: f64 = 0.30 / 1_000_000.0;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY is not configured — set it in the secrets file or environment")]
    CredentialMissing,

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider error (status {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("model output is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model output failed validation: {0}")]
    Schema(String),

    #[error("model returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types — generateContent request
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    // system_instruction is snake_case, generationConfig camelCase — the
    // endpoint mixes conventions.
    system_instruction: SystemInstruction<'a>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    response_mime_type: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types — generateContent response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = self
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?;
        let text: String = parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Token accounting
// ────────────────────────────────────────────────────────────────────────────

/// Tokens consumed by a single call. Taken from `usageMetadata` when the
/// provider reports it, estimated otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Rough length/4 estimate for responses without usage metadata.
    pub fn estimate(input_text: &str, output_text: &str) -> Self {
        Self {
            input_tokens: (input_text.len() / 4) as u64,
            output_tokens: (output_text.len() / 4) as u64,
        }
    }

    pub fn cost_usd(&self) -> f64 {
        self.input_tokens as f64 * INPUT_USD_PER_TOKEN
            + self.output_tokens as f64 * OUTPUT_USD_PER_TOKEN
    }
}

/// Raw model output plus what it cost to obtain.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub text: String,
    pub usage: TokenUsage,
}

// ────────────────────────────────────────────────────────────────────────────
// Backend trait + Gemini implementation
// ────────────────────────────────────────────────────────────────────────────

/// The model backend seam. Carried in `AppState` as `Arc<dyn GenerativeBackend>`
/// so tests can swap a scripted fake for the real client.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<ModelReply, LlmError>;
}

/// The production Gemini client.
///
/// Calls are NOT retried: a failed fetch is reported to the user, who
/// re-triggers it. An upstream outage must not turn into a loop of billable
/// calls.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, system: &str, user: &str) -> Result<ModelReply, LlmError> {
        // Fail fast, before any network traffic, when no credential is set.
        let api_key = self.api_key.as_deref().ok_or(LlmError::CredentialMissing)?;

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: user }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![Part { text: system }],
            },
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                temperature: 1.0,
                response_mime_type: "application/json",
            },
        };

        let url = format!("{GEMINI_API_BASE}/models/{MODEL}:generateContent");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the provider's error envelope
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed.text().ok_or(LlmError::EmptyContent)?;

        let usage = match &parsed.usage_metadata {
            Some(meta) => TokenUsage {
                input_tokens: meta.prompt_token_count,
                output_tokens: meta.candidates_token_count,
            },
            None => TokenUsage::estimate(&format!("{system}{user}"), &text),
        };

        debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "LLM call succeeded"
        );

        Ok(ModelReply { text, usage })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output parsing
// ────────────────────────────────────────────────────────────────────────────

/// Deserializes model output as JSON after stripping any code fences.
/// The prompt must instruct the model to return valid JSON.
pub fn parse_payload<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    serde_json::from_str(extract_json_payload(text)).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// Anything after the closing fence (trailing prose) is discarded.
fn extract_json_payload(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    match rest.find("```") {
        Some(close) => rest[..close].trim(),
        None => rest.trim(),
    }
}
