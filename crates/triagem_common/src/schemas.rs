//! Wire schemas shared by the daemon and the bench tooling.

use serde::{Deserialize, Serialize};

// ============================================================================
// Inbound API
// ============================================================================

/// Body of `POST /api/find-service`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindServiceRequest {
    pub intent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindServiceData {
    pub service_id: u32,
    pub service_name: String,
}

/// Response envelope: exactly one of `data` (success) or `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindServiceResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<FindServiceData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FindServiceResponse {
    pub fn matched(service_id: u32, service_name: String) -> Self {
        Self {
            success: true,
            data: Some(FindServiceData {
                service_id,
                service_name,
            }),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

// ============================================================================
// Outbound chat completions (OpenRouter)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

/// Only the fields the service reads back.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: String,
}

// ============================================================================
// Model answer
// ============================================================================

/// The single JSON object the model must answer with.
///
/// `id` is signed so out-of-range output still deserializes and gets
/// rejected by catalog validation instead of failing the parse. `name` is
/// advisory only and may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierAnswer {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}
