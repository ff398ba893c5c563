use encoding_rs::Encoding;
use html5ever::interface::QualName;
use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_url, ns, parse_document, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use serde::Serialize;

use super::utils::looks_like_document;

/// 标记的解析方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupMode {
    /// 完整文档（以 doctype 或 `<html>` 开头），序列化时保留文档结构
    Document,
    /// 片段，按 `<template>` 上下文解析（表格行、单元格等任意内容都保留），
    /// 序列化时不补全 html/head/body
    Fragment,
}

/// 解析后的标记树
pub struct ParsedMarkup {
    pub dom: RcDom,
    pub mode: MarkupMode,
    /// 解析器报告的可恢复错误
    pub errors: Vec<String>,
}

impl ParsedMarkup {
    /// 遍历的起点：文档节点，或片段解析时的上下文容器
    pub fn root(&self) -> Handle {
        match self.mode {
            MarkupMode::Document => self.dom.document.clone(),
            MarkupMode::Fragment => self
                .dom
                .document
                .children
                .borrow()
                .iter()
                .find(|child| matches!(child.data, NodeData::Element { .. }))
                .cloned()
                .unwrap_or_else(|| self.dom.document.clone()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// 宽松解析标记，畸形输入不会失败，只会记录解析错误
pub fn parse_markup(markup: &str) -> ParsedMarkup {
    let mode = if looks_like_document(markup) {
        MarkupMode::Document
    } else {
        MarkupMode::Fragment
    };

    let dom = match mode {
        MarkupMode::Document => parse_document(RcDom::default(), Default::default()).one(markup),
        MarkupMode::Fragment => parse_fragment(
            RcDom::default(),
            Default::default(),
            QualName::new(None, ns!(html), local_name!("template")),
            vec![],
        )
        .one(markup),
    };

    let errors = dom
        .errors
        .borrow()
        .iter()
        .map(|e| e.to_string())
        .collect();

    ParsedMarkup { dom, mode, errors }
}

/// 按给定字符集把字节解码为字符串，未知标签回退到有损 UTF-8
pub fn decode_bytes(data: &[u8], encoding_label: Option<&str>) -> String {
    match encoding_label.and_then(|label| Encoding::for_label(label.trim().as_bytes())) {
        Some(encoding) => {
            let (decoded, _, had_errors) = encoding.decode(data);
            if had_errors {
                tracing::warn!("使用 {} 解码时出现无效字节", encoding.name());
            }
            decoded.into_owned()
        }
        None => String::from_utf8_lossy(data).into_owned(),
    }
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 设置已有属性的值，返回是否找到该属性
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: &str) -> bool {
    if let NodeData::Element { attrs, .. } = &node.data {
        if let Some(attr) = attrs
            .borrow_mut()
            .iter_mut()
            .find(|attr| &*attr.name.local == attr_name)
        {
            attr.value.clear();
            attr.value.push_slice(attr_value);
            return true;
        }
    }
    false
}

/// 替换文本节点的内容
pub fn set_text_content(node: &Handle, text: &str) -> bool {
    if let NodeData::Text { contents } = &node.data {
        let mut contents = contents.borrow_mut();
        contents.clear();
        contents.push_slice(text);
        return true;
    }
    false
}
