//! Google AI Studio (Gemini) 后端

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{prompt, read_success_body, TranslationBackend};
use crate::translation::config::{constants, GeminiSettings};
use crate::translation::error::{TranslationError, TranslationResult};

pub struct GeminiBackend {
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(settings: &GeminiSettings, client: reqwest::Client) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
            client,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TranslationBackend for GeminiBackend {
    fn name(&self) -> &str {
        constants::GOOGLE_PROVIDER_NAME
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
            .ok_or_else(|| TranslationError::backend(self.name(), "API key not configured"))?;

        let text = prompt::combined_prompt(batch, source_lang, target_lang)?;
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &text }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
                response_mime_type: "application/json",
            },
        };

        tracing::debug!("调用 {} ({})，共 {} 条文本", self.name(), self.model, batch.len());

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key.trim())])
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationError::backend(self.name(), e))?;

        let raw = read_success_body(self.name(), response).await?;
        let parsed: GenerateResponse = serde_json::from_str(&raw).map_err(|e| {
            TranslationError::backend(self.name(), format!("malformed response: {}", e))
        })?;

        let content = parsed
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .ok_or_else(|| TranslationError::backend(self.name(), "response has no candidate text"))?;

        prompt::parse_batch_response(self.name(), &content)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
