//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::error::{TranslationError, TranslationResult};

/// OpenAI 兼容接口的提供者设置（Groq Cloud）
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OpenAiCompatibleSettings {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for OpenAiCompatibleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: constants::GROQ_BASE_URL.to_string(),
            model: constants::GROQ_MODEL.to_string(),
            temperature: constants::DEFAULT_TEMPERATURE,
            max_tokens: constants::DEFAULT_MAX_TOKENS,
        }
    }
}

/// Google AI Studio 设置
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GeminiSettings {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            base_url: constants::GOOGLE_BASE_URL.to_string(),
            model: constants::GOOGLE_MODEL.to_string(),
            temperature: constants::DEFAULT_TEMPERATURE,
            max_output_tokens: constants::DEFAULT_MAX_TOKENS,
        }
    }
}

/// Cloudflare Workers AI 设置
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CloudflareSettings {
    pub enabled: bool,
    pub account_id: Option<String>,
    pub api_token: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for CloudflareSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            account_id: None,
            api_token: None,
            base_url: constants::CLOUDFLARE_BASE_URL.to_string(),
            model: constants::CLOUDFLARE_MODEL.to_string(),
        }
    }
}

/// 提供者链设置，顺序固定：Groq → Google → Cloudflare
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
    pub groq: OpenAiCompatibleSettings,
    pub google: GeminiSettings,
    pub cloudflare: CloudflareSettings,
}

/// 翻译配置
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    /// CLI 未指定源语言时使用的默认值
    pub default_source_lang: String,
    /// 单个后端调用的超时时间（秒）
    pub request_timeout_secs: u64,
    pub providers: ProviderSettings,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            default_source_lang: constants::DEFAULT_SOURCE_LANG.to_string(),
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            providers: ProviderSettings::default(),
        }
    }
}

impl TranslationConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(TranslationError::ConfigError(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let providers = &self.providers;
        if !providers.groq.enabled && !providers.google.enabled && !providers.cloudflare.enabled {
            return Err(TranslationError::ConfigError(
                "at least one translation provider must be enabled".to_string(),
            ));
        }

        for (name, enabled, base_url) in [
            ("providers.groq", providers.groq.enabled, &providers.groq.base_url),
            ("providers.google", providers.google.enabled, &providers.google.base_url),
            (
                "providers.cloudflare",
                providers.cloudflare.enabled,
                &providers.cloudflare.base_url,
            ),
        ] {
            if !enabled {
                continue;
            }
            let parsed = url::Url::parse(base_url).map_err(|e| {
                TranslationError::ConfigError(format!("{}.base_url '{}': {}", name, base_url, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(TranslationError::ConfigError(format!(
                    "{}.base_url must use http or https",
                    name
                )));
            }
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{providers, translation, EnvVar};

        // 超时变量带默认值，只有显式设置时才覆盖配置文件
        if std::env::var(translation::RequestTimeout::NAME).is_ok() {
            match translation::RequestTimeout::get() {
                Ok(timeout) => self.request_timeout_secs = timeout.as_secs(),
                Err(e) => tracing::warn!("忽略无效的环境变量: {}", e),
            }
        }

        if let Ok(key) = providers::GroqApiKey::get() {
            self.providers.groq.api_key = Some(key);
        }

        if let Ok(key) = providers::GoogleAiApiKey::get() {
            self.providers.google.api_key = Some(key);
        }

        if let Ok(account_id) = providers::CloudflareAccountId::get() {
            self.providers.cloudflare.account_id = Some(account_id);
        }

        if let Ok(token) = providers::CloudflareApiToken::get() {
            self.providers.cloudflare.api_token = Some(token);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器：.env → 配置文件 → 环境变量覆盖 → 验证
    pub fn new() -> TranslationResult<Self> {
        Self::load_dotenv();
        let config = Self::load_config()?;
        Self::finish(config)
    }

    /// 从指定文件创建配置管理器
    pub fn from_file<P: AsRef<Path>>(path: P) -> TranslationResult<Self> {
        Self::load_dotenv();
        let config = Self::load_from_file(path.as_ref())?;
        Self::finish(config)
    }

    fn finish(mut config: TranslationConfig) -> TranslationResult<Self> {
        config.apply_env_overrides();
        config.validate()?;
        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn into_config(self) -> TranslationConfig {
        self.config
    }

    fn load_config() -> TranslationResult<TranslationConfig> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let candidate = Path::new(expanded_path.as_ref());
            if candidate.exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(candidate);
            }
        }

        tracing::debug!("未找到配置文件，使用默认配置");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置（.toml 按 TOML 解析，其余按 JSON 解析）
    pub fn load_from_file(path: &Path) -> TranslationResult<TranslationConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "toml") {
            Ok(toml::from_str(&content)?)
        } else {
            serde_json::from_str(&content).map_err(|e| {
                TranslationError::ConfigError(format!("failed to parse {}: {}", path.display(), e))
            })
        }
    }

    /// 加载 `.env.local` 或 `.env`，不覆盖已存在的环境变量
    pub fn load_dotenv() {
        let env_files = [".env.local", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config<P: AsRef<Path>>(path: P) -> TranslationResult<()> {
        let config = TranslationConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("failed to serialize config: {}", e)))?;

        std::fs::write(path.as_ref(), content).map_err(|e| {
            TranslationError::ConfigError(format!(
                "failed to write {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(())
    }
}
