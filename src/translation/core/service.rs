//! 统一翻译服务
//!
//! 串联 提取 → 分发 → 注入 → 方向修正。提取对整个请求只做一次，
//! 每个目标语言的后三个阶段独立并发执行，互不影响。
//!
//! 提取和注入都在同步代码里完成并立即释放DOM，跨越 `.await` 的只有普通数据，
//! 所以服务的 future 可以在多线程运行时上调度。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::dispatcher::{BatchRequest, Dispatcher, DispatcherStatsSnapshot};
use crate::parsers::html::{apply_directionality, TraversalRules};
use crate::translation::config::{constants, TranslationConfig};
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::translation::pipeline::{Extraction, TextExtractor, TextInjector};
use crate::translation::providers::ProviderChain;

/// 一个或多个目标语言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetLangs {
    Single(String),
    Multiple(Vec<String>),
}

impl TargetLangs {
    pub fn as_slice(&self) -> &[String] {
        match self {
            TargetLangs::Single(lang) => std::slice::from_ref(lang),
            TargetLangs::Multiple(langs) => langs,
        }
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, TargetLangs::Multiple(_))
    }
}

impl From<&str> for TargetLangs {
    fn from(lang: &str) -> Self {
        TargetLangs::Single(lang.to_string())
    }
}

impl From<Vec<String>> for TargetLangs {
    fn from(langs: Vec<String>) -> Self {
        TargetLangs::Multiple(langs)
    }
}

/// 文档翻译请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub markup: String,
    pub source_lang: String,
    pub target_langs: TargetLangs,
}

impl TranslationRequest {
    pub fn new(
        markup: impl Into<String>,
        source_lang: impl Into<String>,
        target_langs: impl Into<TargetLangs>,
    ) -> Self {
        Self {
            markup: markup.into(),
            source_lang: source_lang.into(),
            target_langs: target_langs.into(),
        }
    }

    /// 缺少必填字段时在任何管道阶段之前拒绝
    pub fn validate(&self) -> TranslationResult<()> {
        if self.markup.is_empty() {
            return Err(helpers::validation_error("markup is empty"));
        }
        if self.source_lang.trim().is_empty() {
            return Err(helpers::validation_error("source language is empty"));
        }
        let targets = self.target_langs.as_slice();
        if targets.is_empty() {
            return Err(helpers::validation_error("no target language given"));
        }
        if targets.iter().any(|lang| lang.trim().is_empty()) {
            return Err(helpers::validation_error("target language is empty"));
        }
        Ok(())
    }
}

/// 单个语言的翻译结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedDocument {
    pub markup: String,
    /// 产出译文的后端；没有可翻译内容时为 `None`
    pub provider: String,
    pub units_translated: usize,
}

/// 每个目标语言一个结果，按语言标识而不是完成顺序对应
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageOutcome {
    pub language: String,
    pub result: TranslationResult<TranslatedDocument>,
}

impl LanguageOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error_description(&self) -> Option<String> {
        self.result.as_ref().err().map(|e| e.to_string())
    }
}

/// 服务统计
#[derive(Debug, Default)]
pub struct ServiceStats {
    pub documents_processed: AtomicUsize,
    pub units_extracted: AtomicUsize,
    pub languages_succeeded: AtomicUsize,
    pub languages_failed: AtomicUsize,
    pub short_circuits: AtomicUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceStatsSnapshot {
    pub documents_processed: usize,
    pub units_extracted: usize,
    pub languages_succeeded: usize,
    pub languages_failed: usize,
    pub short_circuits: usize,
    pub dispatcher: DispatcherStatsSnapshot,
}

/// 统一翻译服务
#[derive(Debug, Clone)]
pub struct TranslationService {
    extractor: TextExtractor,
    injector: TextInjector,
    dispatcher: Dispatcher,
    stats: Arc<ServiceStats>,
}

impl TranslationService {
    /// 用给定的提供者链创建服务
    pub fn new(chain: ProviderChain) -> Self {
        Self::with_rules(chain, TraversalRules::default())
    }

    /// 自定义跳过元素和可翻译属性
    pub fn with_rules(chain: ProviderChain, rules: TraversalRules) -> Self {
        Self {
            extractor: TextExtractor::new(rules.clone()),
            injector: TextInjector::new(rules),
            dispatcher: Dispatcher::new(chain),
            stats: Arc::new(ServiceStats::default()),
        }
    }

    /// 按配置构建默认提供者链
    pub fn from_config(config: &TranslationConfig) -> TranslationResult<Self> {
        let chain = ProviderChain::from_config(config)?;
        tracing::info!("提供者链: {:?}", chain);
        Ok(Self::new(chain).with_timeout(config.request_timeout()))
    }

    /// 设置单个后端调用的超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.dispatcher = self.dispatcher.with_timeout(timeout);
        self
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.dispatcher.chain().names()
    }

    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }

    pub fn get_stats(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            documents_processed: self.stats.documents_processed.load(Ordering::Relaxed),
            units_extracted: self.stats.units_extracted.load(Ordering::Relaxed),
            languages_succeeded: self.stats.languages_succeeded.load(Ordering::Relaxed),
            languages_failed: self.stats.languages_failed.load(Ordering::Relaxed),
            short_circuits: self.stats.short_circuits.load(Ordering::Relaxed),
            dispatcher: self.dispatcher.stats(),
        }
    }

    /// 翻译文档到一个或多个目标语言
    ///
    /// 请求本身无效时返回 `Err(InvalidInput)`；否则每个目标语言都有一个结果，
    /// 顺序与请求一致，单个语言的失败不影响其他语言。
    pub async fn translate_document(
        &self,
        request: &TranslationRequest,
    ) -> TranslationResult<Vec<LanguageOutcome>> {
        request.validate()?;

        let extraction = self.extractor.extract(&request.markup);
        self.stats.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.stats
            .units_extracted
            .fetch_add(extraction.len(), Ordering::Relaxed);

        if let Some(degraded) = extraction.degradation() {
            tracing::warn!("{}，继续使用尽力恢复的文档树", degraded);
        }

        let targets = request.target_langs.as_slice();
        tracing::info!(
            "开始翻译: {} 个单元, {} → {:?}",
            extraction.len(),
            request.source_lang,
            targets
        );

        let pipelines = targets.iter().map(|target| {
            self.translate_language(&request.markup, &request.source_lang, target, &extraction)
        });
        let outcomes = join_all(pipelines).await;

        for outcome in &outcomes {
            match &outcome.result {
                Ok(_) => self.stats.languages_succeeded.fetch_add(1, Ordering::Relaxed),
                Err(_) => self.stats.languages_failed.fetch_add(1, Ordering::Relaxed),
            };
        }

        Ok(outcomes)
    }

    /// 翻译到单个目标语言
    pub async fn translate_single(
        &self,
        markup: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<TranslatedDocument> {
        let request = TranslationRequest::new(markup, source_lang, target_lang);
        let mut outcomes = self.translate_document(&request).await?;
        match outcomes.pop() {
            Some(outcome) => outcome.result,
            None => Err(TranslationError::InternalError(
                "no outcome produced for target language".to_string(),
            )),
        }
    }

    async fn translate_language(
        &self,
        markup: &str,
        source_lang: &str,
        target_lang: &str,
        extraction: &Extraction,
    ) -> LanguageOutcome {
        let result = self
            .run_pipeline(markup, source_lang, target_lang, extraction)
            .await;

        match &result {
            Ok(document) => tracing::info!(
                "{} 翻译完成，提供者: {}",
                target_lang,
                document.provider
            ),
            Err(e) => helpers::log_error(e),
        }

        LanguageOutcome {
            language: target_lang.to_string(),
            result,
        }
    }

    async fn run_pipeline(
        &self,
        markup: &str,
        source_lang: &str,
        target_lang: &str,
        extraction: &Extraction,
    ) -> TranslationResult<TranslatedDocument> {
        if target_lang.trim().eq_ignore_ascii_case(source_lang.trim()) {
            return Err(helpers::validation_error(format!(
                "target language '{}' is the same as the source language",
                target_lang
            )));
        }

        if extraction.is_empty() {
            self.stats.short_circuits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("没有可翻译内容，{} 直接返回原文", target_lang);
            return Ok(TranslatedDocument {
                markup: markup.to_string(),
                provider: constants::NO_PROVIDER.to_string(),
                units_translated: 0,
            });
        }

        let texts = extraction.texts();
        let batch = self
            .dispatcher
            .translate_batch(BatchRequest {
                texts: &texts,
                source_lang,
                target_lang,
            })
            .await?;

        let injected = self
            .injector
            .inject(markup, &extraction.units, &batch.translations)?;
        let markup = apply_directionality(&injected, target_lang);

        Ok(TranslatedDocument {
            markup,
            provider: batch.provider,
            units_translated: extraction.len(),
        })
    }
}
