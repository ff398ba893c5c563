/// ASCII 空白字符
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// 跳过开头的 BOM、空白和注释；注释未闭合时返回 `None`
fn skip_leading_comments(markup: &str) -> Option<&str> {
    let mut rest = markup.trim_start_matches('\u{feff}');

    loop {
        rest = rest.trim_start();
        match rest.strip_prefix("<!--") {
            Some(after) => rest = &after[after.find("-->")? + 3..],
            None => return Some(rest),
        }
    }
}

fn starts_with_tag(rest: &str, tag: &str) -> bool {
    let Some(head) = rest.get(..tag.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(tag)
        && rest[tag.len()..]
            .chars()
            .next()
            .map_or(true, |c| c == '>' || c == '/' || WHITESPACES.contains(&c))
}

/// 判断输入是完整文档还是片段
///
/// 跳过开头的空白、BOM 和注释后，以 doctype、`<html>`、`<head>` 或 `<body>` 开头即视为文档。
pub fn looks_like_document(markup: &str) -> bool {
    let Some(rest) = skip_leading_comments(markup) else {
        return false;
    };

    rest.get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"))
        || ["<html", "<head", "<body"]
            .iter()
            .any(|tag| starts_with_tag(rest, tag))
}

/// 根元素 `<html` 起始标签的字节偏移
///
/// 只认文档序言（BOM、空白、注释、doctype）之后紧接着的 `<html>`，
/// 注释、脚本或正文中出现的 `<html` 文本都不算。
pub fn root_tag_offset(markup: &str) -> Option<usize> {
    let mut rest = skip_leading_comments(markup)?;

    if rest
        .get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"))
    {
        let end = rest.find('>')?;
        rest = skip_leading_comments(&rest[end + 1..])?;
    }

    starts_with_tag(rest, "<html").then(|| markup.len() - rest.len())
}

/// 拆分首尾空白：返回 (前导空白, 核心文本, 尾随空白)
pub fn split_surrounding_whitespace(text: &str) -> (&str, &str, &str) {
    let core_start = text.len() - text.trim_start().len();
    let core_end = text.trim_end().len();

    if core_start >= core_end {
        return (text, "", "");
    }

    (
        &text[..core_start],
        &text[core_start..core_end],
        &text[core_end..],
    )
}

/// 是否只包含空白
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_document() {
        assert!(looks_like_document("<!DOCTYPE html><html></html>"));
        assert!(looks_like_document("  \n<html lang=\"en\">"));
        assert!(looks_like_document("<!-- banner --><HTML>"));
        assert!(looks_like_document("<body><p>x</p></body>"));
        assert!(!looks_like_document("<p>Hello</p>"));
        assert!(!looks_like_document("<header>nav</header>"));
        assert!(!looks_like_document("<htmlish>"));
        assert!(!looks_like_document("plain text"));
        assert!(!looks_like_document("<!-- open comment <html>"));
    }

    #[test]
    fn test_root_tag_offset_skips_prologue_only() {
        assert_eq!(root_tag_offset("<html><body></body></html>"), Some(0));
        assert_eq!(root_tag_offset("\u{feff} <!DOCTYPE html>\n<HTML lang=\"ar\">"), Some(20));

        let commented = "<!-- <html> --><!DOCTYPE html><!-- x --><html>";
        assert_eq!(root_tag_offset(commented), Some(commented.len() - "<html>".len()));

        assert_eq!(root_tag_offset("<!DOCTYPE html><body></body>"), None);
        assert_eq!(root_tag_offset(r#"<p>Hi</p><script>var s = "<html>";</script>"#), None);
        assert_eq!(root_tag_offset("<htmlx>"), None);
    }

    #[test]
    fn test_split_surrounding_whitespace() {
        assert_eq!(split_surrounding_whitespace("  Hi there\n"), ("  ", "Hi there", "\n"));
        assert_eq!(split_surrounding_whitespace("Hi"), ("", "Hi", ""));
        assert_eq!(split_surrounding_whitespace(" \t "), (" \t ", "", ""));
        assert!(is_blank("\n\u{a0} "));
        assert!(!is_blank(" x "));
    }
}
