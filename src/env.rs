//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问。提供者凭据只通过这里注入，不写死在代码中。

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "TRANSMARK_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 单个后端调用的超时时间
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "TRANSMARK_REQUEST_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30));
        const DESCRIPTION: &'static str = "Per-provider request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout must be greater than 0".to_string(),
                });
            }

            if seconds > 300 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout too long (max 300 seconds)".to_string(),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }
}

/// 翻译提供者凭据
pub mod providers {
    use super::*;

    /// Groq Cloud API 密钥
    pub struct GroqApiKey;
    impl EnvVar<String> for GroqApiKey {
        const NAME: &'static str = "GROQ_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "API key for Groq Cloud (primary provider)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_secret(value, Self::NAME)
        }
    }

    /// Google AI Studio API 密钥
    pub struct GoogleAiApiKey;
    impl EnvVar<String> for GoogleAiApiKey {
        const NAME: &'static str = "GOOGLE_AI_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "API key for Google AI Studio (secondary provider)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_secret(value, Self::NAME)
        }
    }

    /// Cloudflare 账户 ID
    pub struct CloudflareAccountId;
    impl EnvVar<String> for CloudflareAccountId {
        const NAME: &'static str = "CLOUDFLARE_ACCOUNT_ID";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Cloudflare account id for Workers AI (emergency provider)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_secret(value, Self::NAME)
        }
    }

    /// Cloudflare API 令牌
    pub struct CloudflareApiToken;
    impl EnvVar<String> for CloudflareApiToken {
        const NAME: &'static str = "CLOUDFLARE_API_TOKEN";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Cloudflare API token for Workers AI";

        fn parse(value: &str) -> EnvResult<String> {
            parse_secret(value, Self::NAME)
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "TRANSMARK_WEB_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("127.0.0.1".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "TRANSMARK_WEB_PORT";
        const DEFAULT: Option<u16> = Some(7080);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port must be greater than 0".to_string(),
                });
            }

            Ok(port)
        }
    }
}

fn parse_secret(value: &str, var_name: &str) -> EnvResult<String> {
    let secret = value.trim();
    if secret.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Value cannot be empty".to_string(),
        });
    }
    Ok(secret.to_string())
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: info)\n",
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION
    ));

    docs.push_str("\n## Translation Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        translation::RequestTimeout::NAME,
        translation::RequestTimeout::DESCRIPTION,
        translation::RequestTimeout::DEFAULT
    ));

    docs.push_str("\n## Provider Credentials\n\n");
    for (name, description) in [
        (providers::GroqApiKey::NAME, providers::GroqApiKey::DESCRIPTION),
        (providers::GoogleAiApiKey::NAME, providers::GoogleAiApiKey::DESCRIPTION),
        (
            providers::CloudflareAccountId::NAME,
            providers::CloudflareAccountId::DESCRIPTION,
        ),
        (
            providers::CloudflareApiToken::NAME,
            providers::CloudflareApiToken::DESCRIPTION,
        ),
    ] {
        docs.push_str(&format!("- `{}`: {}\n", name, description));
    }

    docs.push_str("\n## Web Server Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: 127.0.0.1)\n",
        web::BindAddress::NAME,
        web::BindAddress::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        web::Port::NAME,
        web::Port::DESCRIPTION,
        web::Port::DEFAULT
    ));

    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(core::LogLevel::parse("DEBUG").unwrap(), "debug");
        assert!(core::LogLevel::parse("verbose").is_err());
    }

    #[test]
    fn test_timeout_validation() {
        assert_eq!(
            translation::RequestTimeout::parse("45").unwrap(),
            Duration::from_secs(45)
        );
        assert!(translation::RequestTimeout::parse("0").is_err());
        assert!(translation::RequestTimeout::parse("301").is_err());
        assert!(translation::RequestTimeout::parse("soon").is_err());
    }

    #[test]
    fn test_secrets_are_trimmed_and_non_empty() {
        assert_eq!(providers::GroqApiKey::parse("  gsk_abc \n").unwrap(), "gsk_abc");
        assert!(providers::GoogleAiApiKey::parse("   ").is_err());
    }

    #[test]
    fn test_port_parsing() {
        assert_eq!(web::Port::parse("8080").unwrap(), 8080);
        assert!(web::Port::parse("0").is_err());
        assert!(web::Port::parse("70000").is_err());
    }

    #[test]
    fn test_env_docs_list_provider_keys() {
        let docs = generate_env_docs();
        assert!(docs.contains("GROQ_API_KEY"));
        assert!(docs.contains("CLOUDFLARE_API_TOKEN"));
        assert!(docs.contains("TRANSMARK_WEB_PORT"));
    }
}
