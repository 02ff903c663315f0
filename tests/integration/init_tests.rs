//! Integration tests for the init command

use crate::common::{assertions, CliTestRunner};
use custdelta::config::DeltaConfig;
use std::fs;

#[test]
fn test_init_creates_config_and_directories() {
    let runner = CliTestRunner::new().unwrap();
    let root = runner.fixture().root().to_path_buf();
    let config_path = root.join("site/custdelta.json");
    let config_arg = config_path.to_string_lossy().to_string();

    runner.expect_success(&["--config", &config_arg, "init"]);

    assertions::assert_file_exists_and_not_empty(&config_path);
    let config = DeltaConfig::load(&config_path).unwrap();
    assert_eq!(config.data_directory, root.join("site/data"));
    assert_eq!(config.online_source_id, 2);

    assertions::assert_dir_exists(&root.join("site/data"));
    assertions::assert_dir_exists(&root.join("site/plots"));
    assertions::assert_dir_exists(&root.join("site/log"));
}

#[test]
fn test_init_keeps_existing_config() {
    let runner = CliTestRunner::new().unwrap();
    let config_path = runner.fixture().config_path.clone();
    let config_arg = config_path.to_string_lossy().to_string();

    let mut edited = runner.fixture().config.clone();
    edited.online_source_id = 9;
    edited.save(&config_path, true).unwrap();

    runner.expect_success(&["--config", &config_arg, "init"]);
    assert_eq!(DeltaConfig::load(&config_path).unwrap().online_source_id, 9);
}

#[test]
fn test_init_force_overwrites() {
    let runner = CliTestRunner::new().unwrap();
    let config_path = runner.fixture().root().join("custdelta.json");
    let config_arg = config_path.to_string_lossy().to_string();
    fs::write(&config_path, r#"{"online_source_id": 5}"#).unwrap();

    runner.expect_success(&["--config", &config_arg, "init", "--force"]);

    let config = DeltaConfig::load(&config_path).unwrap();
    assert_eq!(config.online_source_id, 2);
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
    assert!(raw.get("created").is_some());
}

#[test]
fn test_init_data_dir_override() {
    let runner = CliTestRunner::new().unwrap();
    let root = runner.fixture().root().to_path_buf();
    let config_arg = root.join("other/custdelta.json").to_string_lossy().to_string();
    let data_arg = root.join("elsewhere").to_string_lossy().to_string();

    runner.expect_success(&["--config", &config_arg, "--data-dir", &data_arg, "init"]);

    assertions::assert_dir_exists(&root.join("elsewhere"));
    let config = DeltaConfig::load(&root.join("other/custdelta.json")).unwrap();
    assert_eq!(config.data_directory, root.join("elsewhere"));
}

#[test]
fn test_commands_fail_on_invalid_config() {
    let runner = CliTestRunner::new().unwrap();
    let config_path = runner.fixture().root().join("broken.json");
    fs::write(&config_path, "{ not json").unwrap();
    let config_arg = config_path.to_string_lossy().to_string();

    let err = runner.expect_failure(&["--config", &config_arg, "list"]);
    assert!(matches!(err, custdelta::DeltaError::Config { .. }));
    assert_eq!(err.exit_code(), 1);
}
