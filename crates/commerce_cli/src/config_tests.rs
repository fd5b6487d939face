use super::*;
use commerce_client::{Environment, ResidualArgumentPolicy};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_app_config_default() {
    let config = AppConfig::default();

    assert!(config.catalog_path.is_none());
    assert_eq!(config.client, ClientConfig::default());
    assert_eq!(config.authentication.token_env_var, "COMMERCE_ACCESS_TOKEN");
}

#[test]
fn test_app_config_load_partial_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("commerce.toml");
    fs::write(
        &config_path,
        r#"
[client]
environment = "sandbox"
residual_arguments = "reject"
"#,
    )
    .expect("Failed to write config");

    let config = AppConfig::load(&config_path).expect("Failed to load config");

    assert_eq!(config.client.environment, Environment::Sandbox);
    assert_eq!(config.client.residual_arguments, ResidualArgumentPolicy::Reject);
    assert_eq!(
        config.client.timeout_seconds,
        commerce_client::config::DEFAULT_TIMEOUT_SECONDS
    );
    assert_eq!(config.authentication, AuthenticationConfig::default());
}

#[test]
fn test_app_config_load_invalid_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("invalid_config.toml");

    fs::write(&config_path, "invalid = toml = syntax").expect("Failed to write invalid TOML");

    let result = AppConfig::load(&config_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Failed to parse configuration file"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_app_config_load_unknown_environment() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("commerce.toml");

    fs::write(&config_path, "[client]\nenvironment = \"staging\"\n")
        .expect("Failed to write config");

    assert!(matches!(
        AppConfig::load(&config_path),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_app_config_load_nonexistent_file() {
    let nonexistent_path = PathBuf::from("nonexistent_commerce.toml");
    let result = AppConfig::load(&nonexistent_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Configuration file not found"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_app_config_load_or_default_without_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let config = AppConfig::load_or_default(&temp_dir.path().join("commerce.toml"))
        .expect("Missing file should fall back to defaults");

    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_app_config_save_and_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("commerce.toml");

    let original_config = AppConfig {
        catalog_path: Some("./catalog.json".to_string()),
        client: ClientConfig::with_base_url("http://localhost:8080"),
        authentication: AuthenticationConfig {
            token_env_var: "SANDBOX_TOKEN".to_string(),
        },
    };

    original_config
        .save(&config_path)
        .expect("Failed to save config");
    assert!(config_path.exists());

    let loaded_config = AppConfig::load(&config_path).expect("Failed to load config");

    assert_eq!(loaded_config, original_config);
}

#[test]
fn test_app_config_embedded_catalog() {
    let catalog = AppConfig::default()
        .catalog()
        .expect("Embedded catalog should load");

    assert!(catalog.get("retrieve_loyalty_account").is_some());
}

#[test]
fn test_app_config_missing_catalog_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = AppConfig {
        catalog_path: Some(
            temp_dir
                .path()
                .join("missing.json")
                .to_string_lossy()
                .into_owned(),
        ),
        ..AppConfig::default()
    };

    assert!(matches!(
        config.catalog(),
        Err(Error::Client(commerce_client::Error::CatalogError(_)))
    ));
}

#[test]
fn test_get_config_path_with_none() {
    let result = get_config_path(None);
    let expected = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(DEFAULT_CONFIG_FILENAME);
    assert_eq!(result, expected);
}

#[test]
fn test_get_config_path_with_provided_path() {
    let custom_path = "/custom/path/commerce.toml";
    let result = get_config_path(Some(custom_path));
    assert_eq!(result, PathBuf::from(custom_path));
}
