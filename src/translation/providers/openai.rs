//! OpenAI 兼容的 chat completions 后端（默认指向 Groq Cloud）

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::{prompt, read_success_body, TranslationBackend};
use crate::translation::config::{constants, OpenAiCompatibleSettings};
use crate::translation::error::{TranslationError, TranslationResult};

pub struct OpenAiCompatibleBackend {
    name: String,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiCompatibleBackend {
    pub fn new(name: impl Into<String>, settings: &OpenAiCompatibleSettings, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            client,
        }
    }

    /// Groq Cloud 主后端
    pub fn groq(settings: &OpenAiCompatibleSettings, client: reqwest::Client) -> Self {
        Self::new(constants::GROQ_PROVIDER_NAME, settings, client)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TranslationBackend for OpenAiCompatibleBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }

    async fn translate(
        &self,
        batch: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<Vec<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TranslationError::backend(&self.name, "API key not configured"))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
                .map_err(|_| TranslationError::backend(&self.name, "invalid API key"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let system = prompt::system_prompt(source_lang, target_lang);
        let payload = prompt::user_payload(batch)?;
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &payload,
                },
            ],
        };

        tracing::debug!("调用 {} ({})，共 {} 条文本", self.name, self.model, batch.len());

        let response = self
            .client
            .post(self.endpoint())
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationError::backend(&self.name, e))?;

        let text = read_success_body(&self.name, response).await?;
        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            TranslationError::backend(&self.name, format!("malformed response: {}", e))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.content)
            .ok_or_else(|| TranslationError::backend(&self.name, "response has no message content"))?;

        prompt::parse_batch_response(&self.name, &content)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}
