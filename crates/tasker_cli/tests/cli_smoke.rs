use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasker-{nanos}-{file_name}"))
}

#[test]
fn help_lists_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_tasker"))
        .arg("--help")
        .output()
        .expect("failed to run tasker --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["add", "list", "search", "stats"] {
        assert!(stdout.contains(command), "missing {command}");
    }
}

#[test]
fn unknown_command_reports_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_tasker"))
        .arg("nope")
        .output()
        .expect("failed to run tasker");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("ERROR: invalid_input"));
}

#[test]
fn store_flag_takes_precedence_over_environment() {
    let env_path = temp_path("smoke-env.json");
    let flag_path = temp_path("smoke-flag.json");

    let output = Command::new(env!("CARGO_BIN_EXE_tasker"))
        .args(["add", "Buy milk", "--store"])
        .arg(&flag_path)
        .env("TASKER_STORE_PATH", &env_path)
        .env("TASKER_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run tasker");

    let flag_exists = flag_path.exists();
    let env_exists = env_path.exists();
    std::fs::remove_file(&flag_path).ok();
    std::fs::remove_file(&env_path).ok();

    assert!(output.status.success());
    assert!(flag_exists);
    assert!(!env_exists);
}

#[test]
fn unknown_config_override_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_tasker"))
        .args(["list", "--config-override", "colour=red"])
        .env("TASKER_STORE_PATH", temp_path("smoke-override.json"))
        .env("TASKER_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run tasker");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown config field"));
}

#[test]
fn configured_offset_shifts_listed_due_dates() {
    let config_path = temp_path("smoke-config.json");
    let store_path = temp_path("smoke-offset.json");
    std::fs::write(&config_path, r#"{ "offset": "-03:00" }"#).unwrap();
    let records = serde_json::json!([{
        "id": "task-1",
        "nombre": "Buy milk",
        "descripcion": "No description",
        "dificultad": 1,
        "estado": 1,
        "fechaCreacion": "2024-01-01T00:00:00.000Z",
        "fechaEdicion": "2024-01-01T00:00:00.000Z",
        "fechaVencimiento": "2024-01-15T00:00:00.000Z",
        "eliminada": false
    }]);
    std::fs::write(&store_path, records.to_string()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tasker"))
        .arg("list")
        .env("TASKER_STORE_PATH", &store_path)
        .env("TASKER_CONFIG_PATH", &config_path)
        .output()
        .expect("failed to run tasker");

    std::fs::remove_file(&config_path).ok();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("14/01/2024"));
}

#[test]
fn offset_override_reads_typed_due_date() {
    let store_path = temp_path("smoke-offset-add.json");

    let output = Command::new(env!("CARGO_BIN_EXE_tasker"))
        .args(["--config-override", "offset=+05:00", "add", "Buy milk", "--due", "2024/01/15"])
        .env("TASKER_STORE_PATH", &store_path)
        .env("TASKER_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run tasker");

    let content = std::fs::read_to_string(&store_path).unwrap_or_default();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value[0]["fechaVencimiento"], "2024-01-14T19:00:00.000Z");
}

#[test]
fn interactive_session_ignores_invalid_utf8() {
    let store_path = temp_path("smoke-utf8.json");

    let mut child = Command::new(env!("CARGO_BIN_EXE_tasker"))
        .env("TASKER_STORE_PATH", &store_path)
        .env("TASKER_CONFIG_PATH", temp_path("no-config.json"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");
    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(b"\xff\n\n0\n")
        .expect("failed to write to stdin");
    let output = child.wait_with_output().expect("failed to read output");

    let saved = store_path.exists();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-INVALID OPTION-"));
    assert!(stdout.contains("See you next time!"));
    assert!(saved);
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let config_path = temp_path("smoke-bad-config.json");
    let store_path = temp_path("smoke-bad-config-store.json");
    std::fs::write(&config_path, "{ nope").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_tasker"))
        .arg("list")
        .env("TASKER_STORE_PATH", &store_path)
        .env("TASKER_CONFIG_PATH", &config_path)
        .output()
        .expect("failed to run tasker");

    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("There are no tasks yet"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("using default configuration"));
}
