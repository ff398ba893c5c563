//! 译文注入器
//!
//! 重新解析原始标记，用与提取阶段相同的遍历器定位每个位置，写入译文后整体重新序列化。
//! 修改发生在树上而不是字符串偏移上，所以前面位置的长度变化不会影响后面的位置。

use crate::parsers::html::{
    parse_markup, serialize_markup, set_node_attr, set_text_content,
    split_surrounding_whitespace, DomWalker, ParsedMarkup, SlotKind, TraversalRules,
};
use crate::translation::error::{TranslationError, TranslationResult};

use super::extractor::{ExtractionUnit, UnitKind};

/// 译文注入器
#[derive(Debug, Clone, Default)]
pub struct TextInjector {
    rules: TraversalRules,
}

impl TextInjector {
    pub fn new(rules: TraversalRules) -> Self {
        Self { rules }
    }

    /// 把译文写回原始标记
    ///
    /// `translations[i]` 对应 `units[i]`。数量不一致时返回 `LengthMismatch`，不做部分注入。
    pub fn inject(
        &self,
        markup: &str,
        units: &[ExtractionUnit],
        translations: &[String],
    ) -> TranslationResult<String> {
        if units.len() != translations.len() {
            return Err(TranslationError::LengthMismatch {
                expected: units.len(),
                actual: translations.len(),
            });
        }

        if units.is_empty() {
            return Ok(markup.to_string());
        }

        let parsed = parse_markup(markup);
        self.inject_parsed(&parsed, units, translations)?;
        serialize_markup(&parsed)
    }

    /// 在已解析的树上就地写入译文
    pub fn inject_parsed(
        &self,
        parsed: &ParsedMarkup,
        units: &[ExtractionUnit],
        translations: &[String],
    ) -> TranslationResult<()> {
        if units.len() != translations.len() {
            return Err(TranslationError::LengthMismatch {
                expected: units.len(),
                actual: translations.len(),
            });
        }

        let slots = DomWalker::new(&self.rules).collect(&parsed.root());
        if slots.len() != units.len() {
            return Err(TranslationError::InternalError(format!(
                "markup yields {} translatable positions but {} units were extracted",
                slots.len(),
                units.len()
            )));
        }

        for ((slot, unit), translated) in slots.iter().zip(units).zip(translations) {
            if slot.path != unit.location_path || UnitKind::from(slot.kind) != unit.kind {
                return Err(TranslationError::InternalError(format!(
                    "unit {} points at {} but the markup has {} at that position",
                    unit.ordinal_index, unit.location_path, slot.path
                )));
            }

            let (leading, _, trailing) = split_surrounding_whitespace(&slot.raw_value);
            let replacement = format!("{}{}{}", leading, translated.trim(), trailing);

            let written = match (slot.kind, slot.attribute.as_deref()) {
                (SlotKind::Text, _) => set_text_content(&slot.node, &replacement),
                (SlotKind::Attribute, Some(name)) => set_node_attr(&slot.node, name, &replacement),
                (SlotKind::Attribute, None) => false,
            };

            if !written {
                return Err(TranslationError::InternalError(format!(
                    "failed to write translation at {}",
                    slot.path
                )));
            }
        }

        tracing::debug!("已写入 {} 个译文", units.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::pipeline::TextExtractor;

    fn upper(units: &[ExtractionUnit]) -> Vec<String> {
        units.iter().map(|u| u.original_text.to_uppercase()).collect()
    }

    #[test]
    fn test_injects_text_and_attributes() {
        let markup = r#"<p>Hello <b>world</b></p><input placeholder="Your name">"#;
        let extraction = TextExtractor::default().extract(markup);
        let output = TextInjector::default()
            .inject(markup, &extraction.units, &upper(&extraction.units))
            .unwrap();

        assert_eq!(
            output,
            r#"<p>HELLO <b>WORLD</b></p><input placeholder="YOUR NAME">"#
        );
    }

    #[test]
    fn test_identity_translation_round_trips() {
        let markup = r#"<div class="x"><h1 title="Head">Title</h1><p>Body text</p><img src="a.png" alt="A"></div>"#;
        let extraction = TextExtractor::default().extract(markup);
        let output = TextInjector::default()
            .inject(markup, &extraction.units, &extraction.texts())
            .unwrap();
        assert_eq!(output, markup);
    }

    #[test]
    fn test_surrounding_whitespace_is_preserved() {
        let markup = "<p>\n    Indented line\n  </p>";
        let extraction = TextExtractor::default().extract(markup);
        assert_eq!(extraction.texts(), vec!["Indented line"]);

        let output = TextInjector::default()
            .inject(markup, &extraction.units, &["Ligne".to_string()])
            .unwrap();
        assert_eq!(output, "<p>\n    Ligne\n  </p>");
    }

    #[test]
    fn test_translations_longer_than_originals_do_not_shift_positions() {
        let markup = "<p>a</p><p>b</p><p>c</p>";
        let extraction = TextExtractor::default().extract(markup);
        let translations = vec![
            "a much longer first sentence".to_string(),
            "x".to_string(),
            "third & <last>".to_string(),
        ];
        let output = TextInjector::default()
            .inject(markup, &extraction.units, &translations)
            .unwrap();
        assert_eq!(
            output,
            "<p>a much longer first sentence</p><p>x</p><p>third &amp; &lt;last&gt;</p>"
        );
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let markup = "<p>One</p><p>Two</p>";
        let extraction = TextExtractor::default().extract(markup);
        let err = TextInjector::default()
            .inject(markup, &extraction.units, &["Un".to_string()])
            .unwrap_err();
        assert_eq!(
            err,
            TranslationError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_units_from_other_markup_are_rejected() {
        let extraction = TextExtractor::default().extract("<p>One</p>");
        let result = TextInjector::default().inject(
            "<h1>One</h1>",
            &extraction.units,
            &["Un".to_string()],
        );
        assert!(matches!(result, Err(TranslationError::InternalError(_))));
    }

    #[test]
    fn test_skipped_regions_are_byte_identical() {
        let markup = r#"<p>Run</p><pre>  keep   this </pre><code>let x = 1;</code>"#;
        let extraction = TextExtractor::default().extract(markup);
        let output = TextInjector::default()
            .inject(markup, &extraction.units, &["Courir".to_string()])
            .unwrap();
        assert_eq!(
            output,
            r#"<p>Courir</p><pre>  keep   this </pre><code>let x = 1;</code>"#
        );
    }
}
