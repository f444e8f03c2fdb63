use httpmock::prelude::*;
use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn lucky(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lucky-numerology"));
    command.args(args).env_remove("GROQ_API_KEY");
    command
}

fn exit_code(output: &Output) -> Option<i32> {
    output.status.code()
}

#[test]
fn test_invalid_strategy_exits_with_config_code() {
    let output = lucky(&["--birth", "1990-05-20", "--strategy", "random"])
        .output()
        .unwrap();

    assert_eq!(exit_code(&output), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_rejected_birth_date_exits_with_two() {
    let output = lucky(&["--birth", "1899-01-01", "--today", "2024-06-15"])
        .output()
        .unwrap();

    assert_eq!(exit_code(&output), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("請輸入正確年份範圍"));
}

#[test]
fn test_rejected_birth_date_exits_with_two_when_narrating() {
    // 驗證失敗時不應呼叫模型
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200);
    });

    let mut config_file = NamedTempFile::new().unwrap();
    write!(config_file, "[narrative]\nendpoint = \"{}\"\n", server.url("/v1")).unwrap();
    let config_path = config_file.path().to_str().unwrap();

    for extra in [&[][..], &["--json"][..]] {
        let mut args = vec![
            "--birth",
            "1899-01-01",
            "--today",
            "2024-06-15",
            "--narrative",
            "-c",
            config_path,
        ];
        args.extend_from_slice(extra);

        let output = lucky(&args).env("GROQ_API_KEY", "dummy").output().unwrap();

        assert_eq!(exit_code(&output), Some(2));
        assert!(output.stdout.is_empty());
    }

    api_mock.assert_hits(0);
}

#[test]
fn test_json_output_for_worked_example() {
    let output = lucky(&["--birth", "1990-05-20", "--today", "2024-06-15", "--json"])
        .output()
        .unwrap();

    assert_eq!(exit_code(&output), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["life_path"], 8);
    assert_eq!(json["personal_day"], 9);
    assert_eq!(json["lucky_codes"], serde_json::json!(["20", "35", "03"]));
}

#[test]
fn test_narrative_flag_uses_file_connection_settings() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer file-key")
            .json_body_partial(r#"{"model": "file-model"}"#);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "ok"}}]
            }));
    });

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"
[narrative]
enabled = false
endpoint = "{}"
model = "file-model"
api_key = "file-key"
"#,
        server.url("/v1")
    )
    .unwrap();

    let output = lucky(&[
        "--birth",
        "1990-05-20",
        "--today",
        "2024-06-15",
        "--narrative",
        "-c",
        config_file.path().to_str().unwrap(),
    ])
    .output()
    .unwrap();

    api_mock.assert();
    assert_eq!(exit_code(&output), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok");
}

#[test]
fn test_enabled_in_file_turns_narration_on() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer env-key");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "from file"}}]
            }));
    });

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        "[narrative]\nenabled = true\nendpoint = \"{}\"\n",
        server.url("/v1")
    )
    .unwrap();

    let output = lucky(&[
        "--birth",
        "1990-05-20",
        "--today",
        "2024-06-15",
        "--json",
        "-c",
        config_file.path().to_str().unwrap(),
    ])
    .env("GROQ_API_KEY", "env-key")
    .output()
    .unwrap();

    api_mock.assert();
    assert_eq!(exit_code(&output), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["narrative"], "from file");
    assert_eq!(json["result"]["lucky_codes"][0], "20");
}

#[test]
fn test_narration_without_any_api_key_is_a_config_error() {
    let output = lucky(&["--birth", "1990-05-20", "--narrative"])
        .output()
        .unwrap();

    assert_eq!(exit_code(&output), Some(1));
}
