//! Unit tests for configuration use-cases.

#![allow(clippy::expect_used)]

use datacats_cli::application::services::config_service::{load_config, set_value};
use datacats_cli::domain::{ConfigError, DatacatsConfig};

use crate::mocks::MemoryConfigStore;

#[test]
fn test_load_without_saved_config_returns_defaults() {
    let store = MemoryConfigStore::default();
    let config = load_config(&store).expect("load");
    assert_eq!(config, DatacatsConfig::default());
    assert!(config.provision.rollback);
    assert_eq!(config.runtime.program, "docker");
}

#[test]
fn test_set_value_persists_change() {
    let store = MemoryConfigStore::default();
    let config = set_value(&store, "images.web", "registry.local/web:2.9").expect("set");
    assert_eq!(config.images.web, "registry.local/web:2.9");
    assert_eq!(store.saved(), Some(config));
}

#[test]
fn test_set_timeout_none_clears_it() {
    let store = MemoryConfigStore::default();
    set_value(&store, "runtime.timeout_secs", "300").expect("set");
    let config = set_value(&store, "runtime.timeout_secs", "none").expect("clear");
    assert_eq!(config.runtime.timeout_secs, None);
}

#[test]
fn test_set_unknown_key_is_rejected_without_saving() {
    let store = MemoryConfigStore::default();
    let err = set_value(&store, "images.cache", "x").expect_err("unknown key");
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::UnknownKey { .. })
    ));
    assert_eq!(store.saved(), None);
}

#[test]
fn test_set_invalid_value_is_rejected() {
    let store = MemoryConfigStore::default();
    let err = set_value(&store, "provision.rollback", "maybe").expect_err("invalid");
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidValue { .. })
    ));
}
