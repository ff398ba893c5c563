//! # 解析器模块
//!
//! 负责标记的解析、遍历、序列化以及方向性修正：
//!
//! - `html` - HTML 文档/片段解析、确定性遍历、序列化、RTL 方向修正

pub mod html;

// Re-export commonly used items for convenience
pub use html::{
    apply_directionality, decode_bytes, is_rtl_language, parse_markup, serialize_markup,
    MarkupMode, ParsedMarkup,
};
