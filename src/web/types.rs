//! Web 模块的数据类型定义
//!
//! 字段名沿用 `translate-code` 接口的 camelCase 约定。

use serde::{Deserialize, Serialize};

use crate::translation::{TargetLangs, TranslationService};

/// 缺少必填字段时的错误信息
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: code, sourceLang, targetLang";

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub service: TranslationService,
}

/// 翻译请求
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateCodeRequest {
    pub code: Option<String>,
    pub source_lang: Option<String>,
    pub target_lang: Option<TargetLangs>,
}

impl TranslateCodeRequest {
    /// 空字符串和空数组都按缺失处理；代码只要非空即可，只含空白也算提供
    pub fn has_required_fields(&self) -> bool {
        let code_present = self.code.as_deref().is_some_and(|code| !code.is_empty());
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        let targets_present = match &self.target_lang {
            Some(TargetLangs::Single(lang)) => !lang.trim().is_empty(),
            Some(TargetLangs::Multiple(langs)) => !langs.is_empty(),
            None => false,
        };
        code_present && present(&self.source_lang) && targets_present
    }
}

/// 单语言翻译响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateCodeResponse {
    pub translated_code: String,
    pub provider: String,
    pub success: bool,
}

/// 多语言响应中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageTranslation {
    pub language: String,
    pub translated_code: String,
    pub provider: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 多语言翻译响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiTranslateResponse {
    pub translations: Vec<LanguageTranslation>,
}

/// 错误响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// 健康检查响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub providers: Vec<String>,
}
