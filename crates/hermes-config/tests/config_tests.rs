//! Configuration loading and precedence tests

use hermes_config::loader::{ENV_ENGINE_LIBRARY, ENV_LOG, ENV_SERIALIZE_CALLS};
use hermes_config::{ConfigError, ConfigLoader, HermesConfig};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join("hermes.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}

fn clear_env() {
    env::remove_var(ENV_ENGINE_LIBRARY);
    env::remove_var(ENV_SERIALIZE_CALLS);
    env::remove_var(ENV_LOG);
}

// ============================================================================
// Loading
// ============================================================================

#[test]
#[serial]
fn test_load_full_config() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[engine]
library = "hermes_ffi_test"
search_paths = ["target/debug", "/opt/hermes/lib"]

[gateway]
serialize_calls = true

[logging]
filter = "hermes_ffi=debug"
"#,
    );

    let config = ConfigLoader::without_user_config()
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert_eq!(config.engine.library.as_deref(), Some("hermes_ffi_test"));
    assert_eq!(
        config.engine.search_paths,
        vec![PathBuf::from("target/debug"), PathBuf::from("/opt/hermes/lib")]
    );
    assert!(config.gateway.serialize_calls);
    assert_eq!(config.logging.filter.as_deref(), Some("hermes_ffi=debug"));
}

#[test]
#[serial]
fn test_load_from_nested_subdirectory() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[gateway]\nserialize_calls = true\n");

    let nested = temp_dir.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    let config = ConfigLoader::without_user_config()
        .load_from_directory(&nested)
        .unwrap();
    assert!(config.gateway.serialize_calls);
}

#[test]
#[serial]
fn test_no_config_is_default() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    let config = ConfigLoader::without_user_config()
        .load_from_directory(temp_dir.path())
        .unwrap();
    assert_eq!(config, HermesConfig::default());
}

#[test]
#[serial]
fn test_user_config_used_without_project_config() {
    clear_env();
    let user_dir = TempDir::new().unwrap();
    let user_config = create_config_file(user_dir.path(), "[logging]\nfilter = \"info\"\n");
    let project_dir = TempDir::new().unwrap();

    let config = ConfigLoader::with_user_config(user_config)
        .load_from_directory(project_dir.path())
        .unwrap();
    assert_eq!(config.logging.filter.as_deref(), Some("info"));
}

#[test]
#[serial]
fn test_project_config_wins_over_user_config() {
    clear_env();
    let user_dir = TempDir::new().unwrap();
    let user_config = create_config_file(user_dir.path(), "[logging]\nfilter = \"info\"\n");
    let project_dir = TempDir::new().unwrap();
    create_config_file(project_dir.path(), "[logging]\nfilter = \"trace\"\n");

    let config = ConfigLoader::with_user_config(user_config)
        .load_from_directory(project_dir.path())
        .unwrap();
    assert_eq!(config.logging.filter.as_deref(), Some("trace"));
}

#[test]
#[serial]
fn test_load_from_specific_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[engine]\nlibrary = \"./libengine.so\"\n");

    let config = ConfigLoader::without_user_config()
        .load_from_file(&path)
        .unwrap();
    assert_eq!(config.engine.library.as_deref(), Some("./libengine.so"));
}

#[test]
fn test_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigLoader::without_user_config()
        .load_from_file(&temp_dir.path().join("missing.toml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

// ============================================================================
// Invalid configs
// ============================================================================

#[rstest]
#[case::syntax("[engine\nlibrary = 1")]
#[case::unknown_section("[transport]\nhost = \"localhost\"\n")]
#[case::unknown_key("[engine]\nlibary = \"x\"\n")]
#[case::wrong_type("[gateway]\nserialize_calls = \"sometimes\"\n")]
fn test_invalid_toml_rejected(#[case] content: &str) {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), content);
    let result = HermesConfig::load_from_file(&path);
    assert!(matches!(result, Err(ConfigError::TomlParseError { .. })));
}

#[test]
fn test_blank_filter_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[logging]\nfilter = \"  \"\n");
    let result = HermesConfig::load_from_file(&path);
    assert!(
        matches!(result, Err(ConfigError::InvalidValue { ref field, .. }) if field == "logging.filter")
    );
}

// ============================================================================
// Environment overrides
// ============================================================================

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        "[engine]\nlibrary = \"from_file\"\n\n[gateway]\nserialize_calls = false\n",
    );

    env::set_var(ENV_ENGINE_LIBRARY, "from_env");
    env::set_var(ENV_SERIALIZE_CALLS, "yes");
    env::set_var(ENV_LOG, "hermes_ffi=trace");

    let config = ConfigLoader::without_user_config()
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert_eq!(config.engine.library.as_deref(), Some("from_env"));
    assert!(config.gateway.serialize_calls);
    assert_eq!(config.logging.filter.as_deref(), Some("hermes_ffi=trace"));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_boolean_rejected() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    env::set_var(ENV_SERIALIZE_CALLS, "sometimes");

    let result = ConfigLoader::without_user_config().load_from_directory(temp_dir.path());
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

    clear_env();
}

#[test]
fn test_toml_round_trip() {
    let mut config = HermesConfig::default();
    config.engine.library = Some("hermes_ffi_test".into());
    config.gateway.serialize_calls = true;

    let text = config.to_toml().unwrap();
    let back = HermesConfig::parse(&text, Path::new("hermes.toml")).unwrap();
    assert_eq!(back, config);
}
