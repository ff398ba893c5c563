//! 命令行入口

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use transmark::env::{self, EnvVar};
use transmark::parsers::html::decode_bytes;
use transmark::translation::config::load_translation_config;
use transmark::translation::{
    ConfigManager, TargetLangs, TextExtractor, TranslationConfig, TranslationRequest,
    TranslationService,
};

#[derive(Parser, Debug)]
#[command(
    name = "transmark",
    version,
    about = "Translate the user-visible text of HTML documents while leaving markup untouched"
)]
struct Cli {
    /// 输入文件，`-` 表示标准输入
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// 源语言（默认取配置中的 default_source_lang）
    #[arg(short, long, value_name = "LANG")]
    from: Option<String>,

    /// 目标语言，可重复或用逗号分隔
    #[arg(short, long, value_name = "LANG", value_delimiter = ',')]
    to: Vec<String>,

    /// 把每个语言的结果写成 <文件名>.<语言>.html
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// 输入文件的字符集
    #[arg(short, long, value_name = "LABEL")]
    encoding: Option<String>,

    /// 配置文件（TOML 或 JSON）
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 单个后端调用的超时（秒）
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// 只输出提取到的单元（JSON），不调用任何后端
    #[arg(long)]
    extract_only: bool,

    /// 写出示例配置文件后退出
    #[arg(long, value_name = "PATH")]
    init_config: Option<PathBuf>,

    /// 输出环境变量说明后退出
    #[arg(long)]
    env_docs: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(env::core::LogLevel::get_or_default("info".to_string()))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env 中的日志级别要在安装订阅器之前生效
    ConfigManager::load_dotenv();
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// 返回是否所有目标语言都成功
async fn run(cli: Cli) -> Result<bool, Box<dyn Error>> {
    if cli.env_docs {
        print!("{}", env::generate_env_docs());
        return Ok(true);
    }

    if let Some(path) = &cli.init_config {
        ConfigManager::generate_example_config(path)?;
        println!("Example configuration written to {}", path.display());
        return Ok(true);
    }

    let input = cli
        .input
        .as_deref()
        .ok_or("no input given (use a file path or `-` for stdin)")?;
    let markup = read_input(input, cli.encoding.as_deref()).await?;

    if cli.extract_only {
        let extraction = TextExtractor::default().extract(&markup);
        if let Some(degraded) = extraction.degradation() {
            tracing::warn!("{}", degraded);
        }
        println!("{}", serde_json::to_string_pretty(&extraction)?);
        return Ok(true);
    }

    if cli.to.is_empty() {
        return Err("at least one target language is required (--to)".into());
    }
    if cli.to.len() > 1 && cli.output_dir.is_none() {
        return Err("multiple target languages require --output-dir".into());
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(secs) = cli.timeout {
        config.request_timeout_secs = secs;
        config.validate()?;
    }

    let source_lang = cli
        .from
        .clone()
        .unwrap_or_else(|| config.default_source_lang.clone());
    let target_langs = if cli.to.len() == 1 {
        TargetLangs::Single(cli.to[0].clone())
    } else {
        TargetLangs::Multiple(cli.to.clone())
    };

    let service = TranslationService::from_config(&config)?;
    let request = TranslationRequest::new(markup, source_lang, target_langs);
    let outcomes = service.translate_document(&request).await?;

    let mut all_succeeded = true;
    for outcome in outcomes {
        match outcome.result {
            Ok(document) => {
                tracing::info!("{}: 完成（{}）", outcome.language, document.provider);
                match &cli.output_dir {
                    Some(dir) => {
                        let path = output_path(dir, input, &outcome.language);
                        tokio::fs::create_dir_all(dir).await?;
                        tokio::fs::write(&path, document.markup.as_bytes()).await?;
                        eprintln!(
                            "{} → {} ({})",
                            outcome.language,
                            path.display(),
                            document.provider
                        );
                    }
                    None => print!("{}", document.markup),
                }
            }
            Err(e) => {
                all_succeeded = false;
                eprintln!("Error: {}: {}", outcome.language, e);
            }
        }
    }

    Ok(all_succeeded)
}

fn load_config(path: Option<&Path>) -> Result<TranslationConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(ConfigManager::from_file(path)?.into_config()),
        None => Ok(load_translation_config()),
    }
}

async fn read_input(input: &str, encoding: Option<&str>) -> Result<String, Box<dyn Error>> {
    let bytes = if input == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        buf
    } else {
        tokio::fs::read(input)
            .await
            .map_err(|e| format!("failed to read {}: {}", input, e))?
    };

    Ok(decode_bytes(&bytes, encoding))
}

/// 输出文件名：<输入文件名>.<语言>.html，语言中的非字母数字字符替换为 `_`
fn output_path(dir: &Path, input: &str, language: &str) -> PathBuf {
    let stem = if input == "-" {
        "stdin".to_string()
    } else {
        Path::new(input)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string())
    };

    let lang: String = language
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();

    dir.join(format!("{}.{}.html", stem, lang))
}
