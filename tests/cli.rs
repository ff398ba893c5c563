//! 命令行集成测试（不访问网络）

#![cfg(feature = "cli")]

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use serde_json::Value;

const CREDENTIAL_VARS: &[&str] = &[
    "GROQ_API_KEY",
    "GOOGLE_AI_API_KEY",
    "CLOUDFLARE_ACCOUNT_ID",
    "CLOUDFLARE_API_TOKEN",
];

/// 在空的临时目录中运行，避免读到本机的配置文件和凭据
fn isolated_cmd(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("transmark").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("RUST_LOG")
        .env_remove("TRANSMARK_LOG_LEVEL");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_extract_only_prints_units_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.html");
    fs::write(
        &input,
        r#"<div title="Hello"><p>Hi <b>there</b></p><script>var x="Hi";</script></div>"#,
    )
    .unwrap();

    let assert = isolated_cmd(&dir)
        .arg(&input)
        .arg("--extract-only")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let value: Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(value["mode"], "fragment");
    let units = value["units"].as_array().unwrap();
    assert_eq!(units.len(), 3);
    assert_eq!(units[0]["kind"], "attribute");
    assert_eq!(units[0]["attribute"], "title");
    assert_eq!(units[0]["location_path"], "/div[1]/@title");
    assert_eq!(units[1]["original_text"], "Hi");
    assert_eq!(units[2]["ordinal_index"], 2);
}

#[test]
fn test_env_docs() {
    let dir = tempfile::tempdir().unwrap();
    let assert = isolated_cmd(&dir).arg("--env-docs").assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for var in CREDENTIAL_VARS {
        assert!(stdout.contains(var), "missing {} in env docs", var);
    }
}

#[test]
fn test_init_config_writes_loadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transmark.toml");

    isolated_cmd(&dir)
        .arg("--init-config")
        .arg(&path)
        .assert()
        .success();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("request_timeout_secs"));
    assert!(content.contains("[providers.groq]"));
}

#[test]
fn test_translation_without_credentials_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.html");
    fs::write(&input, "<p>Hello</p>").unwrap();

    let assert = isolated_cmd(&dir)
        .arg(&input)
        .args(["--from", "en", "--to", "fr"])
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("All translation providers failed"), "{}", stderr);
}

#[test]
fn test_multiple_targets_require_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.html");
    fs::write(&input, "<p>Hello</p>").unwrap();

    let assert = isolated_cmd(&dir)
        .arg(&input)
        .args(["--to", "fr,de"])
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("--output-dir"));
}

#[test]
fn test_nothing_to_translate_succeeds_offline() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("icon.html");
    let markup = r#"<svg><path d="M0 0"/></svg>"#;
    fs::write(&input, markup).unwrap();
    let out = dir.path().join("out");

    isolated_cmd(&dir)
        .arg(&input)
        .args(["--to", "ar,fr", "--output-dir"])
        .arg(&out)
        .assert()
        .success();

    for lang in ["ar", "fr"] {
        let written = fs::read_to_string(out.join(format!("icon.{}.html", lang))).unwrap();
        assert_eq!(written, markup);
    }
}

#[test]
fn test_log_level_from_dotenv_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("page.html");
    fs::write(&input, "<p>one</p><p>two</p>").unwrap();

    let quiet = isolated_cmd(&dir)
        .arg(&input)
        .arg("--extract-only")
        .assert()
        .success();
    let stderr = String::from_utf8_lossy(&quiet.get_output().stderr).to_string();
    assert!(!stderr.contains("提取到 2 个可翻译单元"), "{}", stderr);

    fs::write(dir.path().join(".env"), "TRANSMARK_LOG_LEVEL=debug\n").unwrap();
    let verbose = isolated_cmd(&dir)
        .arg(&input)
        .arg("--extract-only")
        .assert()
        .success();
    let stderr = String::from_utf8_lossy(&verbose.get_output().stderr).to_string();
    assert!(stderr.contains("提取到 2 个可翻译单元"), "{}", stderr);
}
