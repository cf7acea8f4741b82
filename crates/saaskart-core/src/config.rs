// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigPathScope {
    User,
    Workspace,
}

#[must_use]
pub fn resolve_saaskart_config_path(scope: ConfigPathScope) -> PathBuf {
    match scope {
        ConfigPathScope::User => {
            if let Some(xdg_config_home) = non_empty_env("XDG_CONFIG_HOME") {
                return PathBuf::from(xdg_config_home)
                    .join("saaskart")
                    .join("policy.json");
            }
            if let Some(home) = non_empty_env("HOME") {
                return PathBuf::from(home)
                    .join(".config")
                    .join("saaskart")
                    .join("policy.json");
            }
            PathBuf::from(".saaskart").join("policy.json")
        }
        ConfigPathScope::Workspace => PathBuf::from("configs").join("policy").join("policy.json"),
    }
}

/// Root directory that holds `configs/policy/policy.json`.
///
/// `SAASKART_POLICY_ROOT` wins when set; otherwise the current directory.
#[must_use]
pub fn resolve_policy_root() -> PathBuf {
    non_empty_env(crate::ENV_SAASKART_POLICY_ROOT)
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
