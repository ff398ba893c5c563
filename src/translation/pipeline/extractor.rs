//! 文本提取器模块
//!
//! 从标记中收集需要翻译的文本内容和属性值，每个单元带有定位路径和序号。
//! 提取结果不持有DOM句柄，可以在异步任务之间自由传递。

use serde::Serialize;

use crate::parsers::html::{
    parse_markup, DomWalker, MarkupMode, ParsedMarkup, SlotKind, TranslatableSlot, TraversalRules,
};
use crate::translation::error::TranslationError;

/// 提取单元的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// 元素之间的文本内容
    TextContent,
    /// 可翻译属性的值
    Attribute,
}

impl From<SlotKind> for UnitKind {
    fn from(kind: SlotKind) -> Self {
        match kind {
            SlotKind::Text => UnitKind::TextContent,
            SlotKind::Attribute => UnitKind::Attribute,
        }
    }
}

/// 一个可翻译的文本单元
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionUnit {
    pub kind: UnitKind,
    /// 去掉首尾空白后的原文
    pub original_text: String,
    pub location_path: String,
    /// 属性名（仅属性单元）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// 在遍历顺序中的位置，从 0 开始连续编号
    pub ordinal_index: usize,
}

impl ExtractionUnit {
    fn from_slot(slot: TranslatableSlot, ordinal_index: usize) -> Self {
        Self {
            kind: slot.kind.into(),
            original_text: slot.raw_value.trim().to_string(),
            location_path: slot.path,
            attribute: slot.attribute,
            ordinal_index,
        }
    }
}

/// 一次提取的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub units: Vec<ExtractionUnit>,
    pub mode: MarkupMode,
    /// 解析器报告的可恢复错误
    pub parse_errors: Vec<String>,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// 按序号顺序排列的原文
    pub fn texts(&self) -> Vec<String> {
        self.units.iter().map(|u| u.original_text.clone()).collect()
    }

    /// 解析不完整时的非致命诊断
    pub fn degradation(&self) -> Option<TranslationError> {
        if self.parse_errors.is_empty() {
            None
        } else {
            Some(TranslationError::ParseDegraded {
                errors: self.parse_errors.len(),
            })
        }
    }
}

/// 文本提取器
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    rules: TraversalRules,
}

impl TextExtractor {
    pub fn new(rules: TraversalRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &TraversalRules {
        &self.rules
    }

    /// 解析并提取；畸形标记尽力恢复，不会失败
    pub fn extract(&self, markup: &str) -> Extraction {
        let parsed = parse_markup(markup);
        if parsed.is_degraded() {
            tracing::debug!("标记解析出现 {} 个可恢复错误", parsed.errors.len());
        }

        let units = self.extract_parsed(&parsed);
        tracing::debug!("提取到 {} 个可翻译单元", units.len());

        Extraction {
            units,
            mode: parsed.mode,
            parse_errors: parsed.errors,
        }
    }

    /// 从已解析的树中提取单元
    pub fn extract_parsed(&self, parsed: &ParsedMarkup) -> Vec<ExtractionUnit> {
        let mut units = Vec::new();
        DomWalker::new(&self.rules).walk(&parsed.root(), |slot| {
            let ordinal = units.len();
            units.push(ExtractionUnit::from_slot(slot, ordinal));
        });
        units
    }
}
