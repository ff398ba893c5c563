//! Cloudflare Workers AI 后端（应急）

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{prompt, read_success_body, TranslationBackend};
use crate::translation::config::{constants, CloudflareSettings};
use crate::translation::error::{TranslationError, TranslationResult};

pub struct CloudflareBackend {
    account_id: Option<String>,
    api_token: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl CloudflareBackend {
    pub fn new(settings: &CloudflareSettings, client: reqwest::Client) -> Self {
        Self {
            account_id: settings.account_id.clone(),
            api_token: settings.api_token.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            client,
        }
    }

    fn endpoint(&self, account_id: &str) -> String {
        format!("{}/accounts/{}/ai/run/{}", self.base_url, account_id, self.model)
    }
}

#[async_trait]
impl TranslationBackend for CloudflareBackend {
    fn name(&self) -> &str {
        constants::CLOUDFLARE_PROVIDER_NAME
    }

    fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.account_id) && present(&self.api_token)
    }

    async fn translate(
        &self,
        batch: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<Vec<String>> {
        let (Some(account_id), Some(api_token)) = (self.account_id.as_deref(), self.api_token.as_deref())
        else {
            return Err(TranslationError::backend(self.name(), "credentials not configured"));
        };

        let system = prompt::system_prompt(source_lang, target_lang);
        let payload = prompt::user_payload(batch)?;
        let body = RunRequest {
            messages: vec![
                RunMessage {
                    role: "system",
                    content: &system,
                },
                RunMessage {
                    role: "user",
                    content: &payload,
                },
            ],
        };

        tracing::debug!("调用 {} ({})，共 {} 条文本", self.name(), self.model, batch.len());

        let response = self
            .client
            .post(self.endpoint(account_id.trim()))
            .bearer_auth(api_token.trim())
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslationError::backend(self.name(), e))?;

        let raw = read_success_body(self.name(), response).await?;
        let parsed: RunResponse = serde_json::from_str(&raw).map_err(|e| {
            TranslationError::backend(self.name(), format!("malformed response: {}", e))
        })?;

        if !parsed.success {
            let messages: Vec<String> = parsed.errors.into_iter().map(|e| e.message).collect();
            return Err(TranslationError::backend(
                self.name(),
                format!("request unsuccessful: {}", messages.join("; ")),
            ));
        }

        // 模型输出合法 JSON 时，接口可能直接返回解析后的值而不是字符串
        let output = parsed
            .result
            .and_then(|result| result.response)
            .ok_or_else(|| TranslationError::backend(self.name(), "response has no result"))?;

        prompt::strings_from_value(self.name(), output)
    }
}

#[derive(Serialize)]
struct RunRequest<'a> {
    messages: Vec<RunMessage<'a>>,
}

#[derive(Serialize)]
struct RunMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    result: Option<RunResult>,
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    errors: Vec<RunError>,
}

#[derive(Debug, Deserialize)]
struct RunResult {
    response: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RunError {
    #[serde(default)]
    message: String,
}

fn default_success() -> bool {
    true
}
