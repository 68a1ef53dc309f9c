use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::tempdir;

fn layout_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../templates/pqr.yaml")
}

fn labform(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_labform"))
        .arg("--config")
        .arg(dir.join("config.yaml"))
        .args(args)
        .env("LABFORM_LAYOUT_PATH", layout_path())
        .env("LABFORM_PREPARED_BY", "j.doe")
        .env_remove("LABFORM_SERVER_URL")
        .env_remove("LABFORM_API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn record_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_new_edit_show_flow() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    let record = dir.join("pqr.json");
    let file = record.to_str().unwrap();

    let output = labform(dir, &["record", "new", "--out", file]);
    assert!(output.status.success(), "{:?}", output);
    let json = record_json(&record);
    assert_eq!(json["formName"], "pqr");
    assert_eq!(json["variant"], "asme-ix");
    assert_eq!(json["preparedBy"], "j.doe");
    assert_eq!(json["sections"].as_object().unwrap().len(), 5);

    let output = labform(dir, &["edit", file, "joints", "set-cell", "r1", "value", "Single V"]);
    assert!(output.status.success(), "{:?}", output);
    let output = labform(dir, &["edit", file, "electrical", "set-cell", "r1", "amps", "145"]);
    assert!(output.status.success(), "{:?}", output);

    let json = record_json(&record);
    assert_eq!(json["sections"]["joints"]["rows"][0]["value"], "Single V");
    assert_eq!(json["sections"]["electrical"]["rows"][0]["amps"], 145.0);

    let output = labform(dir, &["edit", file, "joints", "add-row", "--after", "r1"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("Added row row_"));
    let json = record_json(&record);
    assert_eq!(json["sections"]["joints"]["rows"].as_array().unwrap().len(), 5);
    assert_eq!(json["sections"]["joints"]["rows"][1]["value"], "");

    let output = labform(dir, &["record", "show", file, "--section", "joints"]);
    assert!(output.status.success(), "{:?}", output);
    let text = stdout(&output);
    assert!(text.contains("Joints (QW-402)"));
    assert!(text.contains("Single V"));

    let output = labform(dir, &["record", "check", file]);
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("ok (has data)"));
}

#[test]
fn test_rejected_edits_leave_file_alone() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    let record = dir.join("pqr.json");
    let file = record.to_str().unwrap();
    assert!(labform(dir, &["record", "new", "--out", file]).status.success());
    let before = std::fs::read_to_string(&record).unwrap();

    let output = labform(dir, &["edit", file, "joints", "delete-column", "label"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("fixed label"));

    let output = labform(dir, &["edit", file, "welders", "add-row"]);
    assert!(!output.status.success());

    let output = labform(dir, &["edit", file, "base_metals", "set-photo", "https://x/y.png"]);
    assert!(!output.status.success());

    assert_eq!(std::fs::read_to_string(&record).unwrap(), before);
}

#[test]
fn test_variant_switch_resets_sections() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    let record = dir.join("pqr.json");
    let file = record.to_str().unwrap();
    assert!(labform(dir, &["record", "new", "--out", file]).status.success());
    assert!(
        labform(dir, &["edit", file, "joints", "set-cell", "r1", "value", "Single V"])
            .status
            .success()
    );

    let output = labform(dir, &["record", "variant", file, "aws-d1.1"]);
    assert!(output.status.success(), "{:?}", output);
    let json = record_json(&record);
    assert_eq!(json["variant"], "aws-d1.1");
    let sections = json["sections"].as_object().unwrap();
    assert_eq!(sections.len(), 3);
    assert_eq!(json["sections"]["joints"]["columns"][1]["id"], "detail");
}

#[test]
fn test_submit_needs_backend() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    let record = dir.join("pqr.json");
    let file = record.to_str().unwrap();
    assert!(labform(dir, &["record", "new", "--out", file]).status.success());

    let output = labform(dir, &["submit", file]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Backend not configured"));

    let output = labform(dir, &["ping"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Not configured"));
}

#[test]
fn test_config_init_and_show() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();

    let output = labform(dir, &["config", "init"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(dir.join("config.yaml").exists());

    let output = labform(dir, &["config", "show"]);
    let text = stdout(&output);
    assert!(text.contains("prepared_by: j.doe"));
    assert!(text.contains("source: environment"));
}
