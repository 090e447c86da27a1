use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasker-{nanos}-{file_name}"))
}

fn run(store_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tasker"))
        .args(args)
        .env("TASKER_STORE_PATH", store_path)
        .env("TASKER_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run tasker")
}

fn read_store(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("store file");
    serde_json::from_str(&content).expect("store json")
}

#[test]
fn add_creates_store_with_record() {
    let store_path = temp_path("cli-add.json");

    let output = run(
        &store_path,
        &[
            "add",
            "Buy milk",
            "--description",
            "two litres",
            "--difficulty",
            "3",
            "--due",
            "2024-01-15",
        ],
    );
    let records = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: Buy milk"));

    let record = &records[0];
    assert_eq!(record["nombre"], "Buy milk");
    assert_eq!(record["descripcion"], "two litres");
    assert_eq!(record["dificultad"], 3);
    assert_eq!(record["estado"], 1);
    assert_eq!(record["eliminada"], false);
}

#[test]
fn add_appends_to_existing_tasks() {
    let store_path = temp_path("cli-add-append.json");

    run(&store_path, &["add", "Buy milk"]);
    let output = run(&store_path, &["add", "Walk the dog", "--status", "2"]);
    let records = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["nombre"], "Buy milk");
    assert_eq!(records[1]["nombre"], "Walk the dog");
    assert_eq!(records[1]["estado"], 2);
}

#[test]
fn add_json_outputs_task() {
    let store_path = temp_path("cli-add-json.json");

    let output = run(&store_path, &["add", "Buy milk", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["title"], "Buy milk");
    assert_eq!(value["status"], "Pending");
    assert_eq!(value["difficulty"], "Easy");
    assert!(value["due_date"].is_null());
}

#[test]
fn add_short_title_fails() {
    let store_path = temp_path("cli-add-short.json");

    let output = run(&store_path, &["add", "abc"]);

    assert!(!output.status.success());
    assert!(!store_path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn add_invalid_due_date_saves_without_due_date() {
    let store_path = temp_path("cli-add-due.json");

    let output = run(&store_path, &["add", "Buy milk", "--due", "tomorrow"]);
    let records = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No data"));
    assert_eq!(records[0]["fechaVencimiento"], "9999-01-01T00:00:00.000Z");
}

#[test]
fn add_out_of_range_difficulty_is_rejected() {
    let store_path = temp_path("cli-add-range.json");

    let output = run(&store_path, &["add", "Buy milk", "--difficulty", "5"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("ERROR: invalid_input"));
}
