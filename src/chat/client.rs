use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info, warn};
use serde_json::{Value, json};

use crate::chat::prompt::{OutputMode, Prompt, SYSTEM_PROMPT};
use crate::chat::schema::RESUME_SCHEMA;
use crate::errors::ServiceError;
use crate::utils::config::LLMConfig;

/// The one network boundary of the pipeline. Implementations make a single
/// attempt and either return the complete text or say why they couldn't.
pub trait GenerationClient {
    fn generate(&self, prompt: &Prompt) -> impl Future<Output = Result<String, ServiceError>> + Send;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn new(config: &LLMConfig) -> Result<Self, ServiceError> {
        let api_key = config.resolve_api_key().ok_or_else(|| ServiceError::MissingCredentials {
            env: config.api_key_env.clone(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn request_body(&self, prompt: &Prompt) -> Value {
        let mut generation_config = json!({
            "temperature": self.temperature,
            "topP": 0.95,
            "topK": 40,
            "maxOutputTokens": self.max_output_tokens,
        });

        if prompt.mode == OutputMode::Structured {
            generation_config["responseMimeType"] = json!("application/json");
            generation_config["responseJsonSchema"] = RESUME_SCHEMA.to_json_schema();
        }

        json!({
            "contents": [
                {
                    "parts": [
                        {
                            "text": prompt.text
                        }
                    ]
                }
            ],
            "systemInstruction": {
                "parts": [
                    {
                        "text": SYSTEM_PROMPT
                    }
                ]
            },
            "generationConfig": generation_config
        })
    }
}

impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ServiceError> {
        info!("calling Gemini API (model: {}, mode: {:?})", self.model, prompt.mode);
        debug!("prompt length: {} bytes", prompt.text.len());

        let url = format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}", status);
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        let text = candidate_text(&body)?;
        debug!("received {} bytes", text.len());

        Ok(text)
    }
}

/// Pulls the generated text out of a `generateContent` envelope, refusing
/// anything that did not finish normally.
pub fn candidate_text(body: &Value) -> Result<String, ServiceError> {
    if let Some(reason) = body
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(Value::as_str)
    {
        return Err(ServiceError::Blocked(reason.to_string()));
    }

    let candidate = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .ok_or_else(|| ServiceError::Envelope("no candidates".to_string()))?;

    match candidate.get("finishReason").and_then(Value::as_str) {
        None | Some("STOP") => {}
        Some("MAX_TOKENS") => return Err(ServiceError::Truncated("MAX_TOKENS".to_string())),
        Some(other) => return Err(ServiceError::Blocked(other.to_string())),
    }

    let parts = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .ok_or_else(|| ServiceError::Envelope("candidate has no content parts".to_string()))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        return Err(ServiceError::Empty);
    }

    Ok(text)
}

/// Serves a previously saved raw response instead of calling the service.
pub struct ReplayClient {
    path: PathBuf,
}

impl ReplayClient {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl GenerationClient for ReplayClient {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, ServiceError> {
        info!("replaying saved response from {}", self.path.display());

        let text = tokio::fs::read_to_string(&self.path).await?;
        if text.trim().is_empty() {
            return Err(ServiceError::Empty);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::ada;
    use crate::chat::prompt::compile;

    fn test_config() -> LLMConfig {
        LLMConfig {
            api_key: Some("test-key".into()),
            ..LLMConfig::default()
        }
    }

    #[test]
    fn test_candidate_text_joins_parts() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": " 1}" }] },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(candidate_text(&body).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_candidate_text_flags_truncation() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"fullName\": \"Ada" }] },
                "finishReason": "MAX_TOKENS"
            }]
        });
        assert!(matches!(
            candidate_text(&body),
            Err(ServiceError::Truncated(_))
        ));
    }

    #[test]
    fn test_candidate_text_rejects_empty_and_blocked() {
        let empty = json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] }, "finishReason": "STOP" }]
        });
        assert!(matches!(candidate_text(&empty), Err(ServiceError::Empty)));

        let blocked = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(matches!(candidate_text(&blocked), Err(ServiceError::Blocked(_))));

        assert!(matches!(
            candidate_text(&json!({})),
            Err(ServiceError::Envelope(_))
        ));
    }

    #[test]
    fn test_structured_request_carries_schema() {
        let client = GeminiClient::new(&test_config()).unwrap();
        let body = client.request_body(&compile(&ada(), OutputMode::Structured));
        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseJsonSchema"], RESUME_SCHEMA.to_json_schema());

        let body = client.request_body(&compile(&ada(), OutputMode::Markup));
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_missing_key_is_reported() {
        let config = LLMConfig {
            api_key: None,
            api_key_env: "RESUME_FORGE_TEST_UNSET_KEY".into(),
            ..LLMConfig::default()
        };
        assert!(matches!(
            GeminiClient::new(&config),
            Err(ServiceError::MissingCredentials { .. })
        ));
    }

    #[tokio::test]
    async fn test_replay_client_rejects_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let client = ReplayClient::new(file.path().to_path_buf());
        let prompt = compile(&ada(), OutputMode::Structured);
        assert!(matches!(
            client.generate(&prompt).await,
            Err(ServiceError::Empty)
        ));
    }
}
