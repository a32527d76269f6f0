//! CLI integration tests
//!
//! Every invocation points `--config` at a temporary file so the user's
//! settings are never read or written.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn cli(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("text2motion-rs").unwrap();
    cmd.env_remove("T2M_API_KEY")
        .env_remove("T2M_CONFIG")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("HTTPS_PROXY")
        .env_remove("https_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .env("NO_PROXY", "127.0.0.1,localhost")
        .arg("--config")
        .arg(config_dir.path().join("settings.json"));
    cmd
}

/// Answer one HTTP request with `200 OK` and `body`, returning the request body
fn serve_once(body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end().to_ascii_lowercase();
            if line.is_empty() {
                break;
            }
            if let Some(value) = line.strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap();
            }
        }

        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();

        String::from_utf8(request_body).unwrap()
    });

    (host, handle)
}

#[test]
fn test_skeleton_extract_prints_normalized_names() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["skeleton", "extract"])
        .arg(data("rig.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mixamorigHips\""))
        .stdout(predicate::str::contains("world_matrix"))
        .stdout(predicate::str::contains("mixamorig:").not());
}

#[test]
fn test_skeleton_extract_to_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("skeleton.json");
    cli(&dir)
        .args(["skeleton", "extract", "--pretty", "--object-id", "7"])
        .arg(data("rig.json"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["root"]["name"], "mixamorigHips");
    assert_eq!(value["root"]["children"].as_array().unwrap().len(), 2);
}

#[test]
fn test_skeleton_tree() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["skeleton", "tree", "--no-color"])
        .arg(data("rig.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Armature"))
        .stdout(predicate::str::contains("bones: 4"))
        .stdout(predicate::str::contains("mixamorigHead"));
}

#[test]
fn test_import_writes_action() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("action.json");
    cli(&dir)
        .arg("import")
        .arg(data("rig.json"))
        .arg(data("walk.json"))
        .args(["--fps", "24", "--action-name", "Walk"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("mixamorigTail"));

    let action: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(action["name"], "Walk");
    assert_eq!(action["frame_start"], 0);
    assert_eq!(action["frame_end"], 60);
    assert_eq!(
        action["channels"]["mixamorig:Hips"]["location"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
    assert_eq!(action["channels"]["mixamorig:Hips"]["rotation"][1]["frame"], 24.0);
    assert!(action["channels"].get("mixamorigTail").is_none());
}

#[test]
fn test_import_without_root_motion() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("import")
        .arg(data("rig.json"))
        .arg(data("walk.json"))
        .arg("--no-root-motion")
        .assert()
        .success()
        .stdout(predicate::str::contains("mixamorig:Spine"))
        .stdout(predicate::str::contains("mixamorig:Hips").not());
}

#[test]
fn test_import_rejects_invalid_payload() {
    let dir = TempDir::new().unwrap();
    let payload = dir.path().join("broken.json");
    fs::write(&payload, r#"{"duration": -1.0, "bones": {}}"#).unwrap();

    cli(&dir)
        .arg("import")
        .arg(data("rig.json"))
        .arg(&payload)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid animation"));
}

#[test]
fn test_import_rejects_zero_frame_rate() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("action.json");
    cli(&dir)
        .arg("import")
        .arg(data("rig.json"))
        .arg(data("walk.json"))
        .args(["--fps", "0"])
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid frame rate"));
    assert!(!output.exists());
}

#[test]
fn test_config_set_and_show_api_key() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "set-api-key", "abcdef123456"])
        .assert()
        .success();

    cli(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********3456"))
        .stdout(predicate::str::contains("abcdef123456").not());
}

#[test]
fn test_config_path() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settings.json"));
}

#[test]
fn test_generate_requires_api_key() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("generate")
        .arg(data("rig.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key configured"));
}

#[test]
fn test_generate_offline_makes_no_request() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("action.json");
    cli(&dir)
        .arg("generate")
        .arg(data("rig.json"))
        .args(["--api-key", "abcdef123456", "--offline", "--prompt", "jump"])
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("online access"));
    assert!(!output.exists());
}

#[test]
fn test_generate_imports_and_saves_result() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("action.json");
    let save = dir.path().join("wave.t2m");

    let payload = r#"{"duration": 2.0, "bones": {"mixamorigHips": {"rotation": {"0.0": [0, 0, 0, 1], "1.0": [0, 0, 0, 1]}}}}"#;
    let (host, server) = serve_once(serde_json::json!({ "result": payload }).to_string());

    cli(&dir)
        .arg("generate")
        .arg(data("rig.json"))
        .args(["--api-key", "abcdef123456", "--prompt", "wave", "--seconds", "2"])
        .args(["--host", host.as_str(), "--fps", "24"])
        .arg("--save")
        .arg(&save)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let request: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
    assert_eq!(request["prompt"], "wave");
    assert_eq!(request["seconds"], 2);
    assert_eq!(request["target_skeleton"]["root"]["name"], "mixamorigHips");

    let action: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(action["name"], "T2MGeneratedAction");
    assert_eq!(action["frame_end"], 48);
    assert_eq!(action["channels"]["mixamorig:Hips"]["rotation"][1]["frame"], 24.0);

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&save).unwrap()).unwrap();
    assert_eq!(saved["version"], "1.0");
    let content: serde_json::Value =
        serde_json::from_str(saved["content"].as_str().unwrap()).unwrap();
    assert_eq!(content["prompt"], "wave");
    assert_eq!(content["duration"], 2.0);
}

#[test]
fn test_generate_without_result_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("action.json");
    let (host, server) = serve_once(r#"{"result": null}"#.to_string());

    cli(&dir)
        .arg("generate")
        .arg(data("rig.json"))
        .args(["--api-key", "abcdef123456", "--prompt", "jump", "--host", host.as_str()])
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("No animation was generated"));

    server.join().unwrap();
    assert!(!output.exists());
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("text2motion-rs"));
}
