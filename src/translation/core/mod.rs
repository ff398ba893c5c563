//! 翻译系统核心模块
//!
//! - **分发器** (`dispatcher.rs`): 沿提供者链顺序回退，校验每个后端返回的批次
//! - **服务层** (`service.rs`): 串联各阶段，并发处理多个目标语言
//!
//! ```text
//! TranslationService (service.rs)
//!     ├── TextExtractor (pipeline/extractor.rs)
//!     ├── Dispatcher (dispatcher.rs)
//!     │       └── ProviderChain (providers/mod.rs)
//!     ├── TextInjector (pipeline/injector.rs)
//!     └── apply_directionality (parsers/html/direction.rs)
//! ```

pub mod dispatcher;
pub mod service;

pub use dispatcher::{
    BatchRequest, BatchResult, Dispatcher, DispatcherStats, DispatcherStatsSnapshot,
    ProviderAttempt,
};
pub use service::{
    LanguageOutcome, ServiceStats, ServiceStatsSnapshot, TargetLangs, TranslatedDocument,
    TranslationRequest, TranslationService,
};
