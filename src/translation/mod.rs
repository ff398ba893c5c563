//! 翻译模块
//!
//! 把 HTML 中用户可见的文本翻译成其他语言，标签、链接、标识符等保持不变：
//! - **pipeline**: 文本提取与译文注入
//! - **providers**: 翻译后端（Groq Cloud、Google AI Studio、Cloudflare Workers AI）
//! - **core**: 分发器与统一翻译服务
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use transmark::translation::{TranslationRequest, TranslationService};
//! use transmark::translation::config::load_translation_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_translation_config();
//! let service = TranslationService::from_config(&config)?;
//!
//! let request = TranslationRequest::new(
//!     r#"<p title="Greeting">Hello</p>"#,
//!     "English",
//!     vec!["Arabic".to_string(), "French".to_string()],
//! );
//! for outcome in service.translate_document(&request).await? {
//!     match outcome.result {
//!         Ok(doc) => println!("{} ({}): {}", outcome.language, doc.provider, doc.markup),
//!         Err(e) => eprintln!("{}: {}", outcome.language, e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// 配置管理模块
pub mod config;

/// 分发器与翻译服务
pub mod core;

/// 错误处理模块
pub mod error;

/// 文本提取与注入
pub mod pipeline;

/// 翻译后端
pub mod providers;

pub use config::{constants, ConfigManager, TranslationConfig};
pub use core::{
    BatchRequest, BatchResult, Dispatcher, LanguageOutcome, ProviderAttempt, ServiceStats,
    TargetLangs, TranslatedDocument, TranslationRequest, TranslationService,
};
pub use error::{ErrorCategory, ErrorSeverity, TranslationError, TranslationResult};
pub use pipeline::{Extraction, ExtractionUnit, TextExtractor, TextInjector, UnitKind};
pub use providers::{ProviderChain, TranslationBackend};

/// 使用默认规则提取可翻译单元
pub fn extract(markup: &str) -> Extraction {
    TextExtractor::default().extract(markup)
}

/// 使用默认规则把译文按序号写回标记
pub fn inject(
    markup: &str,
    units: &[ExtractionUnit],
    translations: &[String],
) -> TranslationResult<String> {
    TextInjector::default().inject(markup, units, translations)
}

/// 用环境中的配置翻译标记（便利函数）
///
/// 每次调用都会重新加载配置并构建提供者链，批量使用时请直接持有 `TranslationService`。
pub async fn translate_markup(
    markup: &str,
    source_lang: &str,
    target_langs: impl Into<TargetLangs>,
) -> TranslationResult<Vec<LanguageOutcome>> {
    let config = config::load_translation_config();
    let service = TranslationService::from_config(&config)?;
    let request = TranslationRequest::new(markup, source_lang, target_langs);
    service.translate_document(&request).await
}

/// 检查翻译配置文件是否存在
pub fn config_file_exists() -> bool {
    config::config_file_exists()
}
