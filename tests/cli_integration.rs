// CLI integration tests for decode, print and re-encode flows.
use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::Command;

use flate2::read::GzDecoder;
use serde_json::Value;

const FIXTURE: &str = include_str!("fixtures/tournament.state");

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_tournament-state");
    let mut command = Command::new(exe);
    command.env_remove("RUST_LOG");
    command
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn stage_plain(dir: &Path) -> std::path::PathBuf {
    let state = dir.join("tournament.state");
    fs::write(&state, FIXTURE).expect("write fixture");
    state
}

fn gunzip(bytes: &[u8]) -> String {
    let mut text = String::new();
    GzDecoder::new(bytes)
        .read_to_string(&mut text)
        .expect("gzip");
    text
}

#[test]
fn decode_writes_paired_json_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let state = stage_plain(temp.path());

    let decode = cmd().arg(&state).output().expect("decode");
    assert!(decode.status.success(), "{}", String::from_utf8_lossy(&decode.stderr));
    assert!(decode.stdout.is_empty());

    let text = fs::read_to_string(temp.path().join("tournament.json")).expect("json file");
    assert!(text.starts_with("{\n  \""));
    let canonical = parse_json(&text);
    assert_eq!(canonical["heats"]["Heat 0"]["teams"][1][0], "Ships/Kestrel Mk2.craft");
    assert_eq!(canonical["scores"]["scores"]["Wolfhound"][0]["hitCounts"]["Vanguard"], 3);
}

#[test]
fn print_echoes_the_written_json() {
    let temp = tempfile::tempdir().expect("tempdir");
    let state = stage_plain(temp.path());

    let decode = cmd().arg(&state).arg("-p").output().expect("decode");
    assert!(decode.status.success());
    let written = fs::read_to_string(temp.path().join("tournament.json")).expect("json file");
    let printed = String::from_utf8(decode.stdout).expect("utf8");
    assert_eq!(printed.trim_end(), written);
}

#[test]
fn re_encode_writes_gzip_and_decodes_back() {
    let temp = tempfile::tempdir().expect("tempdir");
    let state = stage_plain(temp.path());

    let decode = cmd().arg(&state).output().expect("decode");
    assert!(decode.status.success());
    let first = fs::read_to_string(temp.path().join("tournament.json")).expect("json");

    let encode = cmd().arg(&state).arg("--re-encode").output().expect("encode");
    assert!(encode.status.success(), "{}", String::from_utf8_lossy(&encode.stderr));
    assert!(encode.stdout.is_empty());

    let raw = fs::read(&state).expect("state");
    assert_eq!(&raw[..2], &[0x1f, 0x8b]);
    let wire = parse_json(&gunzip(&raw));
    assert_eq!(wire["_scores"].as_str().map(|text| text.starts_with('{')), Some(true));
    assert_eq!(wire["tournamentID"], 1714820321);

    fs::remove_file(temp.path().join("tournament.json")).expect("remove json");
    let decode_again = cmd().arg(&state).output().expect("decode gzip");
    assert!(decode_again.status.success());
    let second = fs::read_to_string(temp.path().join("tournament.json")).expect("json");
    assert_eq!(parse_json(&first), parse_json(&second));
}

#[test]
fn malformed_heat_fails_without_output() {
    let temp = tempfile::tempdir().expect("tempdir");
    let state = temp.path().join("tournament.state");
    let mut wire = parse_json(FIXTURE);
    wire["_heats"][0] = Value::String("{\"_teams\":[".to_string());
    fs::write(&state, serde_json::to_string(&wire).expect("encode")).expect("write");

    let decode = cmd().arg(&state).output().expect("decode");
    assert_eq!(decode.status.code(), Some(4));
    assert!(!temp.path().join("tournament.json").exists());

    let stderr = String::from_utf8_lossy(&decode.stderr);
    let line = stderr
        .lines()
        .find(|line| line.starts_with("{\"error\""))
        .expect("json error line");
    let err = parse_json(line);
    assert_eq!(err["error"]["kind"], "Parse");
    assert_eq!(err["error"]["field"], "_heats[0]");
    assert!(err["error"]["path"].as_str().unwrap().ends_with("tournament.state"));
}

#[test]
fn schema_error_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let state = temp.path().join("tournament.state");
    fs::write(&state, r#"{"_heats":[]}"#).expect("write");

    let decode = cmd().arg(&state).output().expect("decode");
    assert_eq!(decode.status.code(), Some(5));
    assert!(!temp.path().join("tournament.json").exists());
}

#[test]
fn missing_state_is_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let decode = cmd()
        .arg(temp.path().join("absent.state"))
        .output()
        .expect("decode");
    assert_eq!(decode.status.code(), Some(3));

    let encode = cmd()
        .arg(temp.path().join("absent.state"))
        .arg("-r")
        .output()
        .expect("encode");
    assert_eq!(encode.status.code(), Some(3));
}

#[test]
fn json_state_path_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("tournament.json");
    fs::write(&path, "{}").expect("write");
    let decode = cmd().arg(&path).output().expect("decode");
    assert_eq!(decode.status.code(), Some(2));
    assert_eq!(fs::read_to_string(&path).expect("read"), "{}");
}

#[test]
fn usage_exit_code() {
    let output = cmd().arg("--nope").output().expect("run");
    assert_eq!(output.status.code(), Some(2));
}
