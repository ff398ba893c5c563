//! 批量分发器
//!
//! 把一批原文交给提供者链：按顺序逐个尝试后端，第一个返回合法结果的后端胜出。
//! 每个后端调用都有独立的超时；超时、传输错误、格式错误和数量不符都只让链前进到下一个后端。
//! 所有后端都失败时返回 `AllProvidersExhausted`，携带最后一个错误的描述。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::translation::config::constants;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::providers::{ProviderChain, TranslationBackend};

/// 一次批量翻译请求
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    pub texts: &'a [String],
    pub source_lang: &'a str,
    pub target_lang: &'a str,
}

/// 批量翻译结果
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    /// 与请求顺序一致、数量相同的译文
    pub translations: Vec<String>,
    pub provider: String,
    /// 成功前已失败的后端
    pub failed_attempts: Vec<ProviderAttempt>,
}

/// 单个后端的失败记录
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderAttempt {
    pub provider: String,
    pub error: TranslationError,
    pub elapsed: Duration,
}

/// 分发统计
#[derive(Debug, Default)]
pub struct DispatcherStats {
    pub batches_dispatched: AtomicUsize,
    pub backend_calls: AtomicUsize,
    pub backend_failures: AtomicUsize,
    pub fallbacks_used: AtomicUsize,
    pub chains_exhausted: AtomicUsize,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            batches_dispatched: self.batches_dispatched.load(Ordering::Relaxed),
            backend_calls: self.backend_calls.load(Ordering::Relaxed),
            backend_failures: self.backend_failures.load(Ordering::Relaxed),
            fallbacks_used: self.fallbacks_used.load(Ordering::Relaxed),
            chains_exhausted: self.chains_exhausted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatcherStatsSnapshot {
    pub batches_dispatched: usize,
    pub backend_calls: usize,
    pub backend_failures: usize,
    pub fallbacks_used: usize,
    pub chains_exhausted: usize,
}

/// 提供者链分发器
#[derive(Debug, Clone)]
pub struct Dispatcher {
    chain: ProviderChain,
    timeout: Duration,
    stats: Arc<DispatcherStats>,
}

impl Dispatcher {
    pub fn new(chain: ProviderChain) -> Self {
        Self {
            chain,
            timeout: constants::DEFAULT_REQUEST_TIMEOUT,
            stats: Arc::new(DispatcherStats::default()),
        }
    }

    /// 设置每个后端调用的超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// 分发一批原文
    ///
    /// 空批次直接返回空结果，不调用任何后端。
    pub async fn translate_batch(&self, request: BatchRequest<'_>) -> TranslationResult<BatchResult> {
        if request.texts.is_empty() {
            return Ok(BatchResult {
                translations: Vec::new(),
                provider: constants::NO_PROVIDER.to_string(),
                failed_attempts: Vec::new(),
            });
        }

        self.stats.batches_dispatched.fetch_add(1, Ordering::Relaxed);
        let mut attempts: Vec<ProviderAttempt> = Vec::new();

        for backend in self.chain.iter() {
            let started = Instant::now();
            match self.try_backend(backend.as_ref(), &request).await {
                Ok(translations) => {
                    if !attempts.is_empty() {
                        self.stats.fallbacks_used.fetch_add(1, Ordering::Relaxed);
                        tracing::info!(
                            "备用提供者 {} 翻译成功（此前 {} 个提供者失败）",
                            backend.name(),
                            attempts.len()
                        );
                    } else {
                        tracing::info!(
                            "{} 翻译成功: {} 条文本 → {}",
                            backend.name(),
                            translations.len(),
                            request.target_lang
                        );
                    }
                    return Ok(BatchResult {
                        translations,
                        provider: backend.name().to_string(),
                        failed_attempts: attempts,
                    });
                }
                Err(error) => {
                    self.stats.backend_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("{}", error);
                    attempts.push(ProviderAttempt {
                        provider: backend.name().to_string(),
                        error,
                        elapsed: started.elapsed(),
                    });
                }
            }
        }

        self.stats.chains_exhausted.fetch_add(1, Ordering::Relaxed);

        let last_error = attempts
            .last()
            .map(|attempt| attempt.error.to_string())
            .unwrap_or_else(|| "no translation providers configured".to_string());
        let exhausted = TranslationError::AllProvidersExhausted {
            attempts: attempts.len(),
            last_error,
        };
        tracing::error!("{} → {}: {}", request.source_lang, request.target_lang, exhausted);
        Err(exhausted)
    }

    /// 调用单个后端；任何失败都归一化为该后端的 `BackendFailure`
    async fn try_backend(
        &self,
        backend: &dyn TranslationBackend,
        request: &BatchRequest<'_>,
    ) -> TranslationResult<Vec<String>> {
        let name = backend.name();

        if !backend.is_configured() {
            return Err(TranslationError::backend(name, "not configured (missing credentials)"));
        }

        self.stats.backend_calls.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("尝试 {}: {} → {}", name, request.source_lang, request.target_lang);

        let call = backend.translate(request.texts, request.source_lang, request.target_lang);
        let translations = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(translations)) => translations,
            Ok(Err(error)) => return Err(normalize_failure(name, error)),
            Err(_) => {
                return Err(TranslationError::backend(
                    name,
                    format!("timed out after {:?}", self.timeout),
                ))
            }
        };

        if translations.len() != request.texts.len() {
            return Err(TranslationError::backend(
                name,
                format!(
                    "returned {} translations for {} texts",
                    translations.len(),
                    request.texts.len()
                ),
            ));
        }

        Ok(translations)
    }
}

fn normalize_failure(provider: &str, error: TranslationError) -> TranslationError {
    match error {
        TranslationError::BackendFailure { .. } => error,
        other => TranslationError::backend(provider, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl TranslationBackend for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn translate(&self, batch: &[String], _: &str, _: &str) -> TranslationResult<Vec<String>> {
            Ok(batch.to_vec())
        }
    }

    struct Broken;

    #[async_trait]
    impl TranslationBackend for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn translate(&self, _: &[String], _: &str, _: &str) -> TranslationResult<Vec<String>> {
            Err(TranslationError::NetworkError("connection reset".to_string()))
        }
    }

    struct Unconfigured;

    #[async_trait]
    impl TranslationBackend for Unconfigured {
        fn name(&self) -> &str {
            "unconfigured"
        }

        fn is_configured(&self) -> bool {
            false
        }

        async fn translate(&self, _: &[String], _: &str, _: &str) -> TranslationResult<Vec<String>> {
            unreachable!("unconfigured backends are never called")
        }
    }

    fn request(texts: &[String]) -> BatchRequest<'_> {
        BatchRequest {
            texts,
            source_lang: "en",
            target_lang: "fr",
        }
    }

    #[tokio::test]
    async fn test_failures_are_normalized_and_chain_advances() {
        let dispatcher = Dispatcher::new(
            ProviderChain::default()
                .with_backend(Unconfigured)
                .with_backend(Broken)
                .with_backend(Echo),
        );
        let texts = vec!["Hello".to_string()];
        let result = dispatcher.translate_batch(request(&texts)).await.unwrap();

        assert_eq!(result.provider, "echo");
        assert_eq!(result.translations, texts);
        assert_eq!(result.failed_attempts.len(), 2);
        assert_eq!(
            result.failed_attempts[1].error,
            TranslationError::backend("broken", "network error: connection reset")
        );

        let stats = dispatcher.stats();
        assert_eq!(stats.backend_calls, 2);
        assert_eq!(stats.backend_failures, 2);
        assert_eq!(stats.fallbacks_used, 1);
    }

    #[tokio::test]
    async fn test_empty_chain_is_exhausted() {
        let dispatcher = Dispatcher::new(ProviderChain::default());
        let texts = vec!["Hello".to_string()];
        let err = dispatcher.translate_batch(request(&texts)).await.unwrap_err();
        assert_eq!(
            err,
            TranslationError::AllProvidersExhausted {
                attempts: 0,
                last_error: "no translation providers configured".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_batch_skips_dispatch() {
        let dispatcher = Dispatcher::new(ProviderChain::default().with_backend(Broken));
        let result = dispatcher.translate_batch(request(&[])).await.unwrap();
        assert!(result.translations.is_empty());
        assert_eq!(dispatcher.stats(), DispatcherStatsSnapshot::default());
    }
}
