//! Text-classification call plumbing.
//!
//! The clustering and matching orchestrators both hand a prompt to an
//! OpenAI-compatible chat endpoint and get free text back. The response is
//! untrusted: it may be prose-wrapped, fenced, malformed, or absent, so the
//! only contract this module offers is "a string came back"; everything
//! stricter lives in the per-orchestrator parse stages.
//!
//! [`ClassifierDriver`] is the injection seam; tests substitute scripted
//! drivers for the HTTP implementation.

pub mod chat_completions;
pub mod json;
pub mod provider;

pub use chat_completions::ChatCompletionsClassifier;
pub use provider::Provider;

/// Classifier connection and model settings.
#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    /// Base URL for the API (e.g. `https://api.openai.com`).
    pub base_url: String,
    /// Optional API key for authentication.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Provider type, auto-detected from `base_url`.
    pub provider: Provider,
}

/// One roster line submitted to the classifier.
///
/// Members are presented as anonymous 1-based sequential indices so the
/// external call is never trusted with (or asked to reproduce) real
/// identifiers.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    /// 1-based sequential index, never a real member id.
    pub index: usize,
    pub name: String,
    pub text: String,
}

/// A single classification request.
#[derive(Debug, Clone)]
pub struct ClassifyRequest {
    /// Optional system framing.
    pub system: Option<String>,
    /// The user prompt carrying the roster and formatting rules.
    pub prompt: String,
    /// Upper bound on the response length.
    pub max_tokens: u32,
}

/// Errors from the external classification call.
///
/// None of these propagate past the orchestrators; every variant resolves to
/// a deterministic fallback value there.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The request could not be sent or the connection failed.
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("classifier returned status {0}")]
    Status(reqwest::StatusCode),

    /// The response body carried no assistant text.
    #[error("classifier response missing content")]
    EmptyResponse,
}

/// Trait for classification drivers.
#[async_trait::async_trait]
pub trait ClassifierDriver: Send + Sync {
    /// Submit a request and return the raw response text.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or yields no text. No retries are
    /// performed at this layer.
    async fn complete(&self, req: ClassifyRequest) -> Result<String, ClassifyError>;
}
