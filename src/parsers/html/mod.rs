//! HTML解析和处理模块
//!
//! - `utils`: 基础工具函数和常量
//! - `dom`: 解析与基础DOM操作
//! - `serializer`: 序列化功能
//! - `walker`: 提取与注入共享的确定性遍历
//! - `direction`: 从右到左语言的方向修正

pub mod direction;
pub mod dom;
pub mod serializer;
pub mod utils;
pub mod walker;

// 重新导出主要的公共 API
pub use direction::{apply_directionality, is_rtl_language};
pub use dom::{
    decode_bytes, get_node_attr, get_node_name, parse_markup, set_node_attr, set_text_content,
    MarkupMode, ParsedMarkup,
};
pub use serializer::serialize_markup;
pub use utils::{
    is_blank, looks_like_document, root_tag_offset, split_surrounding_whitespace, WHITESPACES,
};
pub use walker::{DomWalker, SlotKind, TranslatableSlot, TraversalRules};
