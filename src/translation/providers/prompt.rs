//! 所有后端共用的批量翻译提示词与响应解析
//!
//! 原文以 JSON 字符串数组发送，要求模型返回同样长度的 JSON 字符串数组。
//! 模型经常把结果包在代码块里或附带说明文字，解析时会先剥离这些外壳。

use serde_json::Value;

use crate::translation::error::{TranslationError, TranslationResult};

/// 系统提示词
pub fn system_prompt(source_lang: &str, target_lang: &str) -> String {
    format!(
        "You are a professional translator for website content. \
         Translate each string in the JSON array you receive from {source} to {target}.\n\
         \n\
         Rules:\n\
         - Reply with a JSON array of strings only, no commentary and no code fences.\n\
         - The reply must contain exactly as many strings as the input, in the same order.\n\
         - Translate user-visible text only. Keep URLs, e-mail addresses, numbers, \
         placeholders such as {{name}} or %s, and inline code unchanged.\n\
         - Do not add or remove HTML. The strings contain plain text.\n\
         - If a string should not be translated, return it unchanged.",
        source = source_lang,
        target = target_lang
    )
}

/// 用户消息：一批原文编码为 JSON 数组
pub fn user_payload(batch: &[String]) -> TranslationResult<String> {
    Ok(serde_json::to_string(batch)?)
}

/// 单条消息形式的提示词，供只接受一段文本的接口使用
pub fn combined_prompt(
    batch: &[String],
    source_lang: &str,
    target_lang: &str,
) -> TranslationResult<String> {
    Ok(format!(
        "{}\n\nInput:\n{}",
        system_prompt(source_lang, target_lang),
        user_payload(batch)?
    ))
}

/// 把模型回复解析为字符串列表
///
/// 接受裸数组、`{"translations": [...]}` 对象，以及被代码块或说明文字包裹的上述两种形式。
/// 不检查长度，长度由分发器统一校验。
pub fn parse_batch_response(provider: &str, raw: &str) -> TranslationResult<Vec<String>> {
    let cleaned = strip_code_fence(raw.trim());

    let value = parse_json_candidate(cleaned).ok_or_else(|| {
        TranslationError::backend(provider, "response does not contain a JSON array of strings")
    })?;

    strings_from_value(provider, value)
}

/// 从已经是 JSON 的值中取出字符串列表
pub fn strings_from_value(provider: &str, value: Value) -> TranslationResult<Vec<String>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("translations") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(TranslationError::backend(
                    provider,
                    "response object has no \"translations\" array",
                ))
            }
        },
        Value::String(text) => return parse_batch_response(provider, &text),
        other => {
            return Err(TranslationError::backend(
                provider,
                format!("unexpected response shape: {}", type_name(&other)),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(text) => Ok(text),
            other => Err(TranslationError::backend(
                provider,
                format!("item {} is {}, expected a string", i, type_name(&other)),
            )),
        })
        .collect()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // 跳过语言标记（```json）
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn parse_json_candidate(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    // 回复前后带有说明文字时，截取最外层的数组或对象再试
    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (text.find(open), text.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) {
                    return Some(value);
                }
            }
        }
    }

    None
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
