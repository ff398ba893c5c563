//! 翻译后端模块
//!
//! 每个后端把一批原文翻译成同样数量的译文。后端只负责把各自的响应格式归一化为
//! 字符串列表，长度校验由分发器统一完成。
//!
//! 默认链按配置顺序构建：Groq Cloud → Google AI Studio → Cloudflare Workers AI。

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::translation::config::TranslationConfig;
use crate::translation::error::{TranslationError, TranslationResult};

pub mod cloudflare;
pub mod gemini;
pub mod openai;
pub mod prompt;

pub use cloudflare::CloudflareBackend;
pub use gemini::GeminiBackend;
pub use openai::OpenAiCompatibleBackend;

/// 翻译后端
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// 后端名称，成功时作为 provider 返回给调用方
    fn name(&self) -> &str;

    /// 凭据是否齐全；未配置的后端由分发器直接记为失败，不发起请求
    fn is_configured(&self) -> bool {
        true
    }

    /// 翻译一批文本，返回的顺序必须与输入一致
    async fn translate(
        &self,
        batch: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<Vec<String>>;
}

/// 按优先级排列的后端链
#[derive(Clone, Default)]
pub struct ProviderChain {
    backends: Vec<Arc<dyn TranslationBackend>>,
}

impl ProviderChain {
    pub fn new(backends: Vec<Arc<dyn TranslationBackend>>) -> Self {
        Self { backends }
    }

    /// 在链尾追加一个后端
    pub fn with_backend<B: TranslationBackend + 'static>(mut self, backend: B) -> Self {
        self.backends.push(Arc::new(backend));
        self
    }

    /// 按配置构建默认链，跳过被禁用的后端
    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        let providers = &config.providers;
        let mut chain = Self::default();

        if providers.groq.enabled {
            chain = chain.with_backend(OpenAiCompatibleBackend::groq(&providers.groq, client.clone()));
        }
        if providers.google.enabled {
            chain = chain.with_backend(GeminiBackend::new(&providers.google, client.clone()));
        }
        if providers.cloudflare.enabled {
            chain = chain.with_backend(CloudflareBackend::new(&providers.cloudflare, client));
        }

        for backend in chain.iter() {
            if !backend.is_configured() {
                tracing::warn!("{} 缺少凭据，调用时将被跳过", backend.name());
            }
        }

        Ok(chain)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TranslationBackend>> {
        self.backends.iter()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }
}

impl fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.backends.iter().map(|b| b.name())).finish()
    }
}

/// 检查 HTTP 状态并读取响应体，非 2xx 一律视为该后端失败
pub(crate) async fn read_success_body(
    provider: &str,
    response: reqwest::Response,
) -> TranslationResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string());

    if !status.is_success() {
        return Err(TranslationError::backend(
            provider,
            format!("HTTP {}: {}", status, truncate(&body, 300)),
        ));
    }

    Ok(body)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}…", cut)
    }
}
