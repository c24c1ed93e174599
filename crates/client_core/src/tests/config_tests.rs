use super::*;

use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_path(tag: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let root = env::temp_dir().join(format!("task_client_config_{tag}_{suffix}"));
    fs::create_dir_all(&root).expect("temp root");
    root.join(SETTINGS_FILE)
}

#[test]
fn defaults_to_local_backend() {
    let settings = load_settings_from(Path::new("/nonexistent/task_client.toml"), |_| None);
    assert_eq!(settings.api_url, "http://localhost:8080");
}

#[test]
fn env_overrides_settings_file() {
    let path = temp_settings_path("env_over_file");
    fs::write(&path, "api_url = \"http://tasks.internal:9000/\"\n").expect("write settings");

    let from_file = load_settings_from(&path, |_| None);
    assert_eq!(from_file.api_url, "http://tasks.internal:9000");

    let from_env = load_settings_from(&path, |name| {
        (name == "TASK_API_URL").then(|| "http://10.0.0.5:8080".to_string())
    });
    assert_eq!(from_env.api_url, "http://10.0.0.5:8080");

    let prefixed_wins = load_settings_from(&path, |name| match name {
        "TASK_API_URL" => Some("http://10.0.0.5:8080".to_string()),
        "APP__API_URL" => Some("http://10.0.0.6:8080".to_string()),
        _ => None,
    });
    assert_eq!(prefixed_wins.api_url, "http://10.0.0.6:8080");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn blank_values_keep_previous_url() {
    let settings = load_settings_from(Path::new("/nonexistent/task_client.toml"), |_| {
        Some("   ".to_string())
    });
    assert_eq!(settings.api_url, DEFAULT_API_URL);
}

#[test]
fn malformed_settings_file_is_ignored() {
    let path = temp_settings_path("malformed");
    fs::write(&path, "api_url = [not toml").expect("write settings");

    let settings = load_settings_from(&path, |_| None);
    assert_eq!(settings, ClientSettings::default());

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn normalizes_whitespace_and_trailing_slashes() {
    assert_eq!(
        normalize_api_url("  https://api.example.com//  "),
        "https://api.example.com"
    );
    assert_eq!(normalize_api_url(""), "");
}
