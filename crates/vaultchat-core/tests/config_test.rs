use std::fs;

use tempfile::TempDir;
use vaultchat_core::Error;
use vaultchat_core::config::{RenderConfig, load_config_from};

#[test]
fn loads_render_config_from_file() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join("render.toml");
    fs::write(
        &path,
        r#"
default_extension = "txt"
file_suggestion_limit = 5
assistant_label = "Claude"
"#,
    )
    .expect("Failed to write config");

    let config = load_config_from(&path).expect("config should load");
    assert_eq!(config.default_extension, "txt");
    assert_eq!(config.file_suggestion_limit, 5);
    assert_eq!(config.assistant_label, "Claude");
    assert_eq!(config.user_label, RenderConfig::default().user_label);
}

#[test]
fn malformed_config_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join("render.toml");
    fs::write(&path, "file_suggestion_limit = \"ten\"").expect("Failed to write config");

    assert!(matches!(load_config_from(&path), Err(Error::Toml(_))));
}

#[test]
fn missing_file_reports_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join("absent.toml");

    assert!(matches!(load_config_from(&path), Err(Error::Io(_))));
}

#[test]
fn empty_extension_list_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let path = temp_dir.path().join("render.toml");
    fs::write(&path, "reference_extensions = []").expect("Failed to write config");

    assert!(matches!(
        load_config_from(&path),
        Err(Error::Configuration(_))
    ));
}
