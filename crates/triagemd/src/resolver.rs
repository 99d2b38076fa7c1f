//! Intent resolution - the classification pipeline.
//!
//! Renders the prompt from the catalog, makes one bounded call to the
//! completion backend, parses the structured answer and validates it
//! against the catalog. Catalog membership is the only safety net: an id
//! the catalog does not know is silently rejected, never passed through.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use triagem_common::prompts::{classification_prompt, CLASSIFIER_SYSTEM_PROMPT};
use triagem_common::{ClassifierAnswer, Resolution, ServiceCatalog};

/// Hard wall-clock bound for one completion call, independent of whatever
/// deadline the caller passes in. The shorter of the two governs.
pub const COMPLETION_DEADLINE: Duration = Duration::from_secs(8);

/// Sends one classification prompt and returns the raw answer text.
///
/// Implementors own transport and vendor-specific API details; the
/// resolver stays decoupled from any particular provider.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Whether a credential is configured. Checked before any call is
    /// attempted.
    fn is_configured(&self) -> bool;

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Why a classification attempt could not reach a decision.
///
/// All variants collapse to one generic failure message at the HTTP
/// boundary; the detail here is for logs only.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("completion credential is not configured")]
    MissingCredential,

    #[error("completion call exceeded {0:?}")]
    Timeout(Duration),

    #[error("completion transport failed: {0}")]
    Transport(#[source] anyhow::Error),

    #[error("model answer is not the expected JSON object: {0}")]
    MalformedAnswer(String),
}

/// Stateless classification pipeline over an immutable catalog.
///
/// Holds no cross-request state; arbitrarily many `resolve` calls may run
/// concurrently.
pub struct IntentResolver {
    catalog: Arc<ServiceCatalog>,
    backend: Arc<dyn CompletionBackend>,
}

impl IntentResolver {
    pub fn new(catalog: Arc<ServiceCatalog>, backend: Arc<dyn CompletionBackend>) -> Self {
        Self { catalog, backend }
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Classify one utterance. One outbound call, no retries; dropping the
    /// in-flight call on deadline expiry discards any partial response.
    pub async fn resolve(
        &self,
        utterance: &str,
        deadline: Duration,
    ) -> Result<Resolution, ResolveError> {
        if !self.backend.is_configured() {
            return Err(ResolveError::MissingCredential);
        }

        let prompt = classification_prompt(&self.catalog, utterance);
        let budget = deadline.min(COMPLETION_DEADLINE);

        let reply = match tokio::time::timeout(
            budget,
            self.backend.complete(CLASSIFIER_SYSTEM_PROMPT, &prompt),
        )
        .await
        {
            Err(_) => return Err(ResolveError::Timeout(budget)),
            Ok(Err(e)) => return Err(ResolveError::Transport(e)),
            Ok(Ok(text)) => text,
        };

        let answer = parse_answer(&reply)?;
        Ok(self.validate(&answer))
    }

    /// Map a parsed answer onto the catalog. The model's own label is
    /// advisory and ignored; only catalog membership decides.
    fn validate(&self, answer: &ClassifierAnswer) -> Resolution {
        if answer.id == 0 {
            info!("[R]  Model declined: utterance outside the service domain");
            return Resolution::NoMatch;
        }

        let id = match u32::try_from(answer.id) {
            Ok(id) => id,
            Err(_) => {
                warn!("[R]  Model answered out-of-range service id {}", answer.id);
                return Resolution::NoMatch;
            }
        };

        match self.catalog.lookup(id) {
            Some(label) => Resolution::Matched {
                id,
                label: label.to_string(),
            },
            None => {
                warn!("[R]  Model answered unknown service id {}", id);
                Resolution::NoMatch
            }
        }
    }
}

/// Parse the model's reply as one `{"id":N,"name":"..."}` object.
///
/// Direct parse first; if the object arrives wrapped in prose, retry on
/// the outermost brace slice.
fn parse_answer(text: &str) -> Result<ClassifierAnswer, ResolveError> {
    if let Ok(answer) = serde_json::from_str::<ClassifierAnswer>(text) {
        return Ok(answer);
    }

    serde_json::from_str(&extract_json(text)).map_err(|_| {
        warn!("[R]  Unparseable model answer: {}", text);
        ResolveError::MalformedAnswer(text.to_string())
    })
}

/// Extract JSON from text that may have prose around it.
fn extract_json(text: &str) -> String {
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return text[start..=end].to_string();
        }
    }
    text.to_string()
}
