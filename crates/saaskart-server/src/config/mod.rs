// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;

use saaskart_core::resolve_policy_root;

pub const ENV_BIND: &str = "SAASKART_BIND";
pub const ENV_DB: &str = "SAASKART_DB";
pub const ENV_LOG_JSON: &str = "SAASKART_LOG_JSON";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub policy_root: PathBuf,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            db_path: PathBuf::from("saaskart.sqlite"),
            policy_root: PathBuf::from("."),
            log_json: true,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_string(ENV_BIND).unwrap_or(defaults.bind_addr),
            db_path: env_string(ENV_DB).map_or(defaults.db_path, PathBuf::from),
            policy_root: resolve_policy_root(),
            log_json: env_bool(ENV_LOG_JSON, defaults.log_json),
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[must_use]
pub fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}
