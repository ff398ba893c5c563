//! 从右到左语言的方向修正

use std::sync::OnceLock;

use regex::Regex;

use super::utils::root_tag_offset;
use crate::translation::config::constants::{RTL_LANGUAGE_CODES, RTL_LANGUAGE_NAMES};

const RTL_DIR_ATTR: &str = r#" dir="rtl""#;

fn html_start_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)\A<html((?:\s+[^\s=>/"']+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>"']+))?)*)\s*/?>"#,
        )
        .expect("valid html start tag pattern")
    })
}

fn attr_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\s+([^\s=>/"']+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>"']+))?"#)
            .expect("valid attribute pattern")
    })
}

/// 判断目标语言是否从右到左书写
///
/// 语言名称按大小写不敏感的子串匹配（"Arabic (Egypt)"），
/// 语言代码只与主子标签精确匹配（"ar-EG"），避免 "Bulgarian" 这类误判。
pub fn is_rtl_language(lang: &str) -> bool {
    let lang = lang.trim().to_lowercase();
    if lang.is_empty() {
        return false;
    }

    if RTL_LANGUAGE_NAMES.iter().any(|name| lang.contains(name)) {
        return true;
    }

    let primary = lang.split(['-', '_']).next().unwrap_or_default();
    RTL_LANGUAGE_CODES.contains(&primary)
}

/// 目标语言为 RTL 时给根元素加上 `dir="rtl"`
///
/// 只处理文档序言之后的根 `<html>` 起始标签；已有 dir 属性时不改动，
/// 没有根元素（片段）时原样返回。脚本、注释和正文中的 `<html` 文本不会被当成根元素。
/// 重复调用结果不变。
pub fn apply_directionality(markup: &str, target_lang: &str) -> String {
    if !is_rtl_language(target_lang) {
        return markup.to_string();
    }

    let Some(offset) = root_tag_offset(markup) else {
        return markup.to_string();
    };
    let Some(captures) = html_start_tag().captures(&markup[offset..]) else {
        return markup.to_string();
    };
    let Some(attrs) = captures.get(1) else {
        return markup.to_string();
    };

    let has_dir = attr_name()
        .captures_iter(attrs.as_str())
        .filter_map(|c| c.get(1))
        .any(|name| name.as_str().eq_ignore_ascii_case("dir"));
    if has_dir {
        return markup.to_string();
    }

    let insert_at = offset + attrs.end();
    let mut result = String::with_capacity(markup.len() + RTL_DIR_ATTR.len());
    result.push_str(&markup[..insert_at]);
    result.push_str(RTL_DIR_ATTR);
    result.push_str(&markup[insert_at..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtl_detection() {
        assert!(is_rtl_language("Arabic"));
        assert!(is_rtl_language("arabic (Egypt)"));
        assert!(is_rtl_language("ar"));
        assert!(is_rtl_language("ar-EG"));
        assert!(is_rtl_language("HE"));
        assert!(is_rtl_language("Persian"));
        assert!(is_rtl_language("العربية"));
        assert!(!is_rtl_language("French"));
        assert!(!is_rtl_language("Bulgarian"));
        assert!(!is_rtl_language("Hungarian"));
        assert!(!is_rtl_language("en"));
        assert!(!is_rtl_language(""));
    }

    #[test]
    fn test_adds_dir_to_root() {
        assert_eq!(
            apply_directionality("<html><body>x</body></html>", "ar"),
            r#"<html dir="rtl"><body>x</body></html>"#
        );
        assert_eq!(
            apply_directionality(r#"<!DOCTYPE html><HTML lang="ar"><body></body></HTML>"#, "Arabic"),
            r#"<!DOCTYPE html><HTML lang="ar" dir="rtl"><body></body></HTML>"#
        );
    }

    #[test]
    fn test_existing_dir_is_kept() {
        let markup = r#"<html DIR="ltr" lang="ar"><body></body></html>"#;
        assert_eq!(apply_directionality(markup, "ar"), markup);
    }

    #[test]
    fn test_attribute_value_mentioning_dir_is_not_an_attribute() {
        assert_eq!(
            apply_directionality(r#"<html data-note="dir=ltr"></html>"#, "he"),
            r#"<html data-note="dir=ltr" dir="rtl"></html>"#
        );
    }

    #[test]
    fn test_idempotent_and_noop_cases() {
        let once = apply_directionality("<html><p>x</p></html>", "fa");
        assert_eq!(apply_directionality(&once, "fa"), once);

        assert_eq!(apply_directionality("<p>fragment</p>", "ar"), "<p>fragment</p>");
        assert_eq!(apply_directionality("<html></html>", "fr"), "<html></html>");
        assert_eq!(apply_directionality("<htmlx></htmlx>", "ar"), "<htmlx></htmlx>");
    }

    #[test]
    fn test_html_text_in_script_of_fragment_is_untouched() {
        let markup = r#"<p>Hi</p><script>var s = "<html>";</script>"#;
        assert_eq!(apply_directionality(markup, "ar"), markup);
    }

    #[test]
    fn test_root_after_commented_html_gets_dir() {
        let markup = "<!-- <html> --><!DOCTYPE html><html><body><p>x</p></body></html>";
        assert_eq!(
            apply_directionality(markup, "ar"),
            r#"<!-- <html> --><!DOCTYPE html><html dir="rtl"><body><p>x</p></body></html>"#
        );
    }

    #[test]
    fn test_only_root_start_tag_changes() {
        let markup = "<!DOCTYPE html><html lang=\"ur\"><head><script>document.write('<html>')</script>\
                      </head><body><!-- <html> --><pre><html></pre></body></html>";
        let result = apply_directionality(markup, "Urdu");
        assert_eq!(result, markup.replacen(r#"lang="ur""#, r#"lang="ur" dir="rtl""#, 1));
        assert_eq!(result.matches("dir=").count(), 1);
    }
}
