//! 翻译管道模块
//!
//! 提取 → 分发 → 注入 中与标记打交道的两端：
//!
//! - `extractor`: 按确定顺序收集可翻译文本单元
//! - `injector`: 把译文按相同顺序写回标记树并重新序列化

pub mod extractor;
pub mod injector;

// 重新导出主要类型
pub use extractor::{Extraction, ExtractionUnit, TextExtractor, UnitKind};
pub use injector::TextInjector;
