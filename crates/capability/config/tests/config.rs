use std::collections::BTreeMap;
use std::path::Path;

use domain::ServiceKind;
use rax_config::{ConfigError, ServiceToggles, SessionConfig};

#[test]
fn load_config_from_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rax.toml");
    std::fs::write(&path, "[settings]\nregion = \"ORD\"\n\n[services]\ndns = false\n")
        .expect("write");

    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("RAX_CONFIG_FILE", &path);
        std::env::set_var("RAX_REGION", "LON");
        std::env::set_var("RAX_IDENTITY_ENDPOINT", "https://lon.identity.api.rackspacecloud.com/v2.0/");
    }

    let config = SessionConfig::load().expect("config");
    assert_eq!(config.default_region.as_deref(), Some("LON"));
    assert_eq!(
        config.identity_endpoint.as_deref(),
        Some("https://lon.identity.api.rackspacecloud.com/v2.0/")
    );
    assert!(!config.services.is_enabled(ServiceKind::Dns));
}

#[test]
fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = SessionConfig::from_file(&dir.path().join("absent.toml")).expect("config");
    assert!(config.default_region.is_none());
    assert!(config.identity_endpoint.is_none());
    assert_eq!(config.services, ServiceToggles::default());
}

#[test]
fn default_toggles() {
    let toggles = ServiceToggles::default();
    assert_eq!(
        toggles.enabled(),
        vec![
            ServiceKind::Servers,
            ServiceKind::Files,
            ServiceKind::Keystone,
            ServiceKind::LoadBalancers,
            ServiceKind::Dns,
        ]
    );
    assert!(!toggles.is_enabled(ServiceKind::Databases));
    assert!(!toggles.is_enabled(ServiceKind::BlockStorage));
}

#[test]
fn file_overrides_merge_over_defaults() {
    let content = r#"
[settings]
region = "SYD"

[services]
servers = false
databases = true
files = "True"
"#;
    let config = SessionConfig::from_toml_str(content, Path::new("rax.toml")).expect("config");
    assert_eq!(config.default_region.as_deref(), Some("SYD"));
    assert!(!config.services.is_enabled(ServiceKind::Servers));
    assert!(config.services.is_enabled(ServiceKind::Databases));
    assert!(config.services.is_enabled(ServiceKind::Files));
    // 未出现的键保持默认值
    assert!(config.services.is_enabled(ServiceKind::Keystone));
    assert!(!config.services.is_enabled(ServiceKind::BlockStorage));
}

#[test]
fn merge_is_last_writer_wins() {
    let mut toggles = ServiceToggles::none();
    let mut first = BTreeMap::new();
    first.insert(ServiceKind::Files, true);
    first.insert(ServiceKind::Dns, true);
    toggles.merge(&first);

    let mut second = BTreeMap::new();
    second.insert(ServiceKind::Dns, false);
    toggles.merge(&second);

    assert!(toggles.is_enabled(ServiceKind::Files));
    assert!(!toggles.is_enabled(ServiceKind::Dns));
    assert_eq!(toggles.enabled(), vec![ServiceKind::Files]);
}

#[test]
fn unknown_service_ignored() {
    let content = "[services]\nqueues = true\nservers = false\n";
    let config = SessionConfig::from_toml_str(content, Path::new("rax.toml")).expect("config");
    assert!(!config.services.is_enabled(ServiceKind::Servers));
}

#[test]
fn empty_region_treated_as_unset() {
    let content = "[settings]\nregion = \"\"\n";
    let config = SessionConfig::from_toml_str(content, Path::new("rax.toml")).expect("config");
    assert!(config.default_region.is_none());
}

#[test]
fn malformed_file_rejected() {
    let result = SessionConfig::from_toml_str("[settings\nregion = ORD", Path::new("rax.toml"));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidConfigurationFile { .. })
    ));
}

#[test]
fn non_boolean_flag_rejected() {
    let result = SessionConfig::from_toml_str("[services]\nservers = 3\n", Path::new("rax.toml"));
    match result {
        Err(ConfigError::InvalidConfigurationFile { path, reason }) => {
            assert_eq!(path, "rax.toml");
            assert!(reason.contains("services.servers"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn service_keys_ignore_case() {
    let content = "[services]\nDNS = false\nServers = false\nDataBases = \"on\"\n";
    let config = SessionConfig::from_toml_str(content, Path::new("rax.toml")).expect("config");
    assert!(!config.services.is_enabled(ServiceKind::Dns));
    assert!(!config.services.is_enabled(ServiceKind::Servers));
    assert!(config.services.is_enabled(ServiceKind::Databases));
}

#[test]
fn string_flags() {
    let content = "[services]\nfiles = \"False\"\ndns = \"0\"\nblockstorage = \"YES\"\n";
    let config = SessionConfig::from_toml_str(content, Path::new("rax.toml")).expect("config");
    assert!(!config.services.is_enabled(ServiceKind::Files));
    assert!(!config.services.is_enabled(ServiceKind::Dns));
    assert!(config.services.is_enabled(ServiceKind::BlockStorage));
}

#[test]
fn unrecognised_string_flag_rejected() {
    let result = SessionConfig::from_toml_str("[services]\ndns = \"maybe\"\n", Path::new("rax.toml"));
    match result {
        Err(ConfigError::InvalidConfigurationFile { reason, .. }) => {
            assert!(reason.contains("services.dns"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
