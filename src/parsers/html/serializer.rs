use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::SerializableHandle;

use super::dom::{MarkupMode, ParsedMarkup};
use crate::translation::error::{TranslationError, TranslationResult};

/// 序列化标记树
///
/// 文档输出完整文档结构；片段只输出上下文容器的子节点，不补全 html/head/body。
pub fn serialize_markup(parsed: &ParsedMarkup) -> TranslationResult<String> {
    let mut buf: Vec<u8> = Vec::new();

    let serializable: SerializableHandle = match parsed.mode {
        MarkupMode::Document => parsed.dom.document.clone().into(),
        MarkupMode::Fragment => parsed.root().into(),
    };

    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };

    serialize(&mut buf, &serializable, opts)
        .map_err(|e| TranslationError::InternalError(format!("unable to serialize DOM: {}", e)))?;

    String::from_utf8(buf).map_err(|e| {
        TranslationError::SerializationError(format!("serialized markup is not UTF-8: {}", e))
    })
}
