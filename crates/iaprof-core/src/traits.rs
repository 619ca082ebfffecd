//! Core trait definitions for generative-model providers.
//!
//! The async trait is implemented by the `iaprof-providers` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::schema::Schema;

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for generative-model backends that answer a prompt, optionally
/// constrained to a JSON response schema.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate a reply for a request.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// One piece of user content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Text(String),
    /// Base64-encoded binary data such as a JPEG photo.
    InlineData { mime_type: String, data: String },
}

impl Part {
    pub fn text(s: impl Into<String>) -> Self {
        Part::Text(s.into())
    }

    pub fn jpeg(base64_data: impl Into<String>) -> Self {
        Part::InlineData {
            mime_type: "image/jpeg".to_string(),
            data: base64_data.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(s) => Some(s),
            Part::InlineData { .. } => None,
        }
    }
}

/// Request to generate content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gemini-3-flash-preview").
    pub model: String,
    /// Persona / system instruction.
    #[serde(default)]
    pub system_instruction: Option<String>,
    /// User content parts, in order.
    pub parts: Vec<Part>,
    /// When set, the reply must be JSON matching this schema.
    #[serde(default)]
    pub response_schema: Option<Schema>,
    /// Sampling temperature; provider default when `None`.
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl GenerateRequest {
    /// All text parts joined with newlines.
    pub fn prompt_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_image(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, Part::InlineData { .. }))
    }
}

/// Response from a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw reply text (JSON when a schema was requested).
    pub text: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Whether the model accepts image parts.
    pub vision: bool,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// JSON payload extraction
// ---------------------------------------------------------------------------

/// Extract the JSON payload from a model reply.
///
/// Handles:
/// - Bare JSON (returned trimmed)
/// - A ```json or generic ``` fenced block (first one wins)
/// - Leading prose before the first `{` or `[`
pub fn extract_json_payload(reply: &str) -> &str {
    let trimmed = reply.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }

    if let Some(fence) = trimmed.find("```") {
        let after = &trimmed[fence + 3..];
        // Skip the info string ("json", "JSON", ...) up to end of line
        let body_start = after.find('\n').map(|i| i + 1).unwrap_or(after.len());
        let body = &after[body_start..];
        let body = match body.find("```") {
            Some(end) => &body[..end],
            // Truncated (unclosed) fence: take what we have
            None => body,
        };
        return body.trim();
    }

    match trimmed.find(['{', '[']) {
        Some(start) => &trimmed[start..],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_passes_through() {
        assert_eq!(extract_json_payload("  {\"a\": 1}\n"), "{\"a\": 1}");
        assert_eq!(extract_json_payload("[1, 2]"), "[1, 2]");
    }

    #[test]
    fn fenced_json_block() {
        let reply = "Aqui está:\n\n```json\n{\"score\": 800}\n```\nBons estudos!";
        assert_eq!(extract_json_payload(reply), "{\"score\": 800}");
    }

    #[test]
    fn generic_fence() {
        assert_eq!(extract_json_payload("```\n[\"a\"]\n```"), "[\"a\"]");
    }

    #[test]
    fn truncated_fence() {
        assert_eq!(extract_json_payload("```json\n{\"a\": 1"), "{\"a\": 1");
    }

    #[test]
    fn leading_prose_without_fence() {
        assert_eq!(extract_json_payload("Resultado: {\"x\": true}"), "{\"x\": true}");
    }

    #[test]
    fn plain_text_is_returned_trimmed() {
        assert_eq!(extract_json_payload("  nenhum json  "), "nenhum json");
    }

    #[test]
    fn request_prompt_text_skips_images() {
        let request = GenerateRequest {
            model: "m".into(),
            system_instruction: None,
            parts: vec![Part::jpeg("AAAA"), Part::text("analise"), Part::text("agora")],
            response_schema: None,
            temperature: None,
        };
        assert_eq!(request.prompt_text(), "analise\nagora");
        assert!(request.has_image());
    }
}
