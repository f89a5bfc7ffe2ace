#![allow(dead_code)]

pub mod mocks;

use mocks::{MockLLMClient, MockLLMFactory};
use std::sync::Arc;
use umrah::travel::TravelServices;
use umrah::utils::toml_config::UmrahConfig;
use umrah::{AppState, ConfigManager};

/// Parse a config from TOML, with `[auth].api_key_env` pointing at `key_env`.
pub fn config_with_key(key_env: &str, extra: &str) -> UmrahConfig {
    let content = format!(
        r#"
[auth]
api_key_env = "{}"

{}
"#,
        key_env, extra
    );
    toml::from_str(&content).expect("test config is valid TOML")
}

/// App state with every agent answering `reply`, protected by `key` stored
/// in the env var `key_env`.
pub fn state_with(key_env: &str, key: &str, extra: &str, reply: MockLLMClient) -> AppState {
    std::env::set_var(key_env, key);
    let config_manager = Arc::new(ConfigManager::from_config(config_with_key(key_env, extra)));
    AppState::with_factory(
        config_manager,
        MockLLMFactory::shared(reply),
        &TravelServices::default(),
    )
    .expect("test state builds")
}
