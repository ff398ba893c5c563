//! Web 服务器主程序入口

use clap::Parser;
use tracing_subscriber::EnvFilter;

use transmark::env::{self, EnvVar};
use transmark::translation::config::load_translation_config;
use transmark::translation::{ConfigManager, TranslationService};
use transmark::web::{WebConfig, WebServer};

#[derive(Parser, Debug)]
#[command(name = "transmark-web", version, about = "Transmark Web Server")]
struct Args {
    /// 绑定地址（默认取 TRANSMARK_WEB_BIND_ADDRESS 或 127.0.0.1）
    #[arg(short, long, value_name = "ADDRESS")]
    bind: Option<String>,

    /// 端口（默认取 TRANSMARK_WEB_PORT 或 7080）
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// 配置文件（TOML 或 JSON）
    #[arg(short, long, value_name = "FILE")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ConfigManager::load_dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(env::core::LogLevel::get_or_default("info".to_string()))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let translation_config = match &args.config {
        Some(path) => ConfigManager::from_file(path)?.into_config(),
        None => load_translation_config(),
    };

    let mut web_config = WebConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!("Web 配置读取失败，使用默认值: {}", e);
        WebConfig::default()
    });
    if let Some(bind) = args.bind {
        web_config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        web_config.port = port;
    }

    let service = TranslationService::from_config(&translation_config)?;
    let server = WebServer::new(web_config, service);
    server.start().await?;

    Ok(())
}
