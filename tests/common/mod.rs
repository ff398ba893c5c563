// 集成测试公共模块
//
// 提供确定性的假翻译后端，不访问网络

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use transmark::translation::{
    ProviderChain, TranslationBackend, TranslationError, TranslationResult, TranslationService,
};

/// 把每条文本转成大写，便于检查位置对应关系
pub struct UppercaseBackend {
    pub name: String,
}

impl UppercaseBackend {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl TranslationBackend for UppercaseBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, batch: &[String], _: &str, _: &str) -> TranslationResult<Vec<String>> {
        Ok(batch.iter().map(|text| text.to_uppercase()).collect())
    }
}

/// 模拟传输错误
pub struct FailingBackend {
    pub name: String,
    pub reason: String,
}

impl FailingBackend {
    pub fn new(name: &str, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl TranslationBackend for FailingBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, _: &[String], _: &str, _: &str) -> TranslationResult<Vec<String>> {
        Err(TranslationError::backend(&self.name, &self.reason))
    }
}

/// 返回的译文比原文少一条
pub struct WrongLengthBackend {
    pub name: String,
}

impl WrongLengthBackend {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl TranslationBackend for WrongLengthBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, batch: &[String], _: &str, _: &str) -> TranslationResult<Vec<String>> {
        let mut translated: Vec<String> = batch.iter().map(|t| format!("~{}", t)).collect();
        translated.pop();
        Ok(translated)
    }
}

/// 按词典翻译，未收录的文本原样返回
pub struct DictionaryBackend {
    pub name: String,
    pub entries: HashMap<String, String>,
}

impl DictionaryBackend {
    pub fn new(name: &str, entries: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            entries: entries
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl TranslationBackend for DictionaryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, batch: &[String], _: &str, _: &str) -> TranslationResult<Vec<String>> {
        Ok(batch
            .iter()
            .map(|text| self.entries.get(text).cloned().unwrap_or_else(|| text.clone()))
            .collect())
    }
}

/// 在译文前加上目标语言前缀；对指定语言总是失败
pub struct LanguageTagBackend {
    pub name: String,
    pub failing_language: Option<String>,
}

impl LanguageTagBackend {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            failing_language: None,
        }
    }

    pub fn failing_for(mut self, language: &str) -> Self {
        self.failing_language = Some(language.to_string());
        self
    }
}

#[async_trait]
impl TranslationBackend for LanguageTagBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(
        &self,
        batch: &[String],
        _: &str,
        target_lang: &str,
    ) -> TranslationResult<Vec<String>> {
        if self.failing_language.as_deref() == Some(target_lang) {
            return Err(TranslationError::backend(&self.name, "HTTP 503: unavailable"));
        }
        Ok(batch.iter().map(|text| format!("{}:{}", target_lang, text)).collect())
    }
}

/// 等待一段时间后再返回，用于超时测试
pub struct SlowBackend {
    pub name: String,
    pub delay: Duration,
}

#[async_trait]
impl TranslationBackend for SlowBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, batch: &[String], _: &str, _: &str) -> TranslationResult<Vec<String>> {
        tokio::time::sleep(self.delay).await;
        Ok(batch.to_vec())
    }
}

/// 记录调用次数和每次收到的批次
pub struct CountingBackend<B> {
    pub inner: B,
    pub calls: Arc<AtomicUsize>,
    pub batches: Arc<std::sync::Mutex<Vec<Vec<String>>>>,
}

impl<B> CountingBackend<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
            batches: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl<B: TranslationBackend> TranslationBackend for CountingBackend<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn translate(
        &self,
        batch: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().push(batch.to_vec());
        self.inner.translate(batch, source_lang, target_lang).await
    }
}

/// 用给定的后端链创建服务
pub fn service_with(chain: ProviderChain) -> TranslationService {
    TranslationService::new(chain).with_timeout(Duration::from_secs(5))
}
