//! OpenAI Chat Completions classification driver.
//!
//! Non-streaming: the orchestrators consume whole responses, so this driver
//! posts a single request and returns `choices[0].message.content`.

use super::{ClassifierDriver, ClassifierSettings, ClassifyError, ClassifyRequest};

/// Driver for the OpenAI Chat Completions API (`/v1/chat/completions`).
#[derive(Clone)]
pub struct ChatCompletionsClassifier {
    http: reqwest::Client,
    settings: ClassifierSettings,
}

impl std::fmt::Debug for ChatCompletionsClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClassifier")
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsClassifier {
    /// Create a new driver with the given settings.
    #[must_use]
    pub fn new(settings: ClassifierSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait::async_trait]
impl ClassifierDriver for ChatCompletionsClassifier {
    async fn complete(&self, req: ClassifyRequest) -> Result<String, ClassifyError> {
        let url = self.settings.provider.build_chat_url(&self.settings.base_url);

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &req.system {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": req.prompt}));

        let body = serde_json::json!({
            "model": self.settings.model,
            "messages": messages,
            "max_tokens": req.max_tokens,
        });

        let mut rb = self.http.post(&url).json(&body);
        if let Some(k) = &self.settings.api_key {
            rb = rb.bearer_auth(k);
        }

        let resp = rb.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClassifyError::Status(status));
        }

        let v: serde_json::Value = resp.json().await?;
        let content = v["choices"][0]["message"]["content"]
            .as_str()
            .map(ToString::to_string)
            .filter(|s| !s.is_empty())
            .ok_or(ClassifyError::EmptyResponse)?;

        tracing::debug!(
            model = %self.settings.model,
            response_length = content.len(),
            "Classifier response received"
        );

        Ok(content)
    }
}
