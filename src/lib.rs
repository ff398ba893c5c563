//! # Transmark Library
//!
//! 翻译 HTML 文档中用户可见的文本，标签、属性、链接和脚本保持原样。
//!
//! ## 模块组织
//!
//! - `parsers` - HTML 解析、确定性遍历、序列化和方向修正
//! - `translation` - 提取、分发、注入以及翻译后端
//! - `env` - 类型安全的环境变量
//! - `web` - Web服务器功能（可选）

pub mod env;
pub mod parsers;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used items for convenience
pub use parsers::*;
pub use translation::{
    LanguageOutcome, TargetLangs, TranslatedDocument, TranslationError, TranslationRequest,
    TranslationResult, TranslationService,
};
