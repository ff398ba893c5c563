//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{
    CloudflareSettings, ConfigManager, GeminiSettings, OpenAiCompatibleSettings, ProviderSettings,
    TranslationConfig,
};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 提供者调用
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_TEMPERATURE: f32 = 0.3;
    pub const DEFAULT_MAX_TOKENS: u32 = 4000;
    pub const DEFAULT_SOURCE_LANG: &str = "en";

    // 没有调用任何后端时报告的提供者名称
    pub const NO_PROVIDER: &str = "None";

    // Groq Cloud（主提供者：速度）
    pub const GROQ_PROVIDER_NAME: &str = "Groq Cloud";
    pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
    pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";

    // Google AI Studio（次提供者：准确度）
    pub const GOOGLE_PROVIDER_NAME: &str = "Google AI Studio";
    pub const GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const GOOGLE_MODEL: &str = "gemini-2.0-flash";

    // Cloudflare Workers AI（应急提供者）
    pub const CLOUDFLARE_PROVIDER_NAME: &str = "Cloudflare Workers AI";
    pub const CLOUDFLARE_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
    pub const CLOUDFLARE_MODEL: &str = "@cf/meta/llama-3.1-8b-instruct";

    // 可翻译属性
    pub const TRANSLATABLE_ATTRS: &[&str] = &[
        "placeholder",
        "title",
        "alt",
        "aria-label",
        "aria-description",
        "aria-placeholder",
        "aria-roledescription",
    ];

    // 跳过的元素（整个子树既不提取也不修改）
    pub const SKIP_ELEMENTS: &[&str] = &[
        "script", "style", "code", "pre", "noscript", "kbd", "samp", "var", "template",
    ];

    // 需要从右到左布局的语言名称（大小写不敏感的子串匹配）
    pub const RTL_LANGUAGE_NAMES: &[&str] = &[
        "arabic", "العربية", "hebrew", "עברית", "persian", "فارسی", "farsi", "urdu", "اردو",
        "yiddish", "pashto", "sorani", "dhivehi",
    ];

    // 需要从右到左布局的语言代码（与主子标签精确匹配）
    pub const RTL_LANGUAGE_CODES: &[&str] = &[
        "ar", "he", "iw", "fa", "ur", "yi", "ps", "ckb", "dv", "sd", "ug",
    ];

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "transmark.toml",
        ".transmark.toml",
        "~/.config/transmark/config.toml",
        "/etc/transmark/config.toml",
    ];
}

/// 检查是否存在配置文件
pub fn config_file_exists() -> bool {
    constants::CONFIG_PATHS
        .iter()
        .any(|path| std::path::Path::new(shellexpand::tilde(path).as_ref()).exists())
}

/// 加载配置，失败时回退到默认配置
pub fn load_translation_config() -> TranslationConfig {
    match ConfigManager::new() {
        Ok(manager) => manager.into_config(),
        Err(e) => {
            tracing::warn!("配置加载失败，使用默认配置: {}", e);
            let mut config = TranslationConfig::default();
            config.apply_env_overrides();
            config
        }
    }
}
