//! Web 路由处理器

pub mod health;
pub mod translation;

pub use health::health;
pub use translation::translate_code;
