// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::evaluation::{evaluate_policy, PolicySeverity};
use crate::schema::PolicyConfig;

const POLICY_CONFIG_PATH: &str = "configs/policy/policy.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyValidationError(pub String);

impl std::fmt::Display for PolicyValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PolicyValidationError {}

#[must_use]
pub fn policy_config_path(root: &Path) -> PathBuf {
    root.join(POLICY_CONFIG_PATH)
}

pub fn load_policy_from_workspace(root: &Path) -> Result<PolicyConfig, PolicyValidationError> {
    let raw = fs::read_to_string(policy_config_path(root))
        .map_err(|e| PolicyValidationError(format!("read policy config failed: {e}")))?;
    parse_policy_json(&raw)
}

/// Like [`load_policy_from_workspace`], but a root without a policy file
/// yields the built-in defaults.
pub fn load_policy_or_default(root: &Path) -> Result<PolicyConfig, PolicyValidationError> {
    if policy_config_path(root).is_file() {
        load_policy_from_workspace(root)
    } else {
        Ok(PolicyConfig::default())
    }
}

pub fn parse_policy_json(raw: &str) -> Result<PolicyConfig, PolicyValidationError> {
    let cfg: PolicyConfig = serde_json::from_str(raw)
        .map_err(|e| PolicyValidationError(format!("decode policy config failed: {e}")))?;
    validate_policy_config(&cfg)?;
    Ok(cfg)
}

pub fn validate_policy_config(cfg: &PolicyConfig) -> Result<(), PolicyValidationError> {
    if let Some(v) = evaluate_policy(cfg)
        .into_iter()
        .find(|v| matches!(v.severity, PolicySeverity::Error))
    {
        return Err(PolicyValidationError(format!(
            "{}: {} ({})",
            v.id, v.message, v.evidence
        )));
    }
    Ok(())
}

pub fn canonical_config_json(cfg: &PolicyConfig) -> Result<String, PolicyValidationError> {
    let value = serde_json::to_value(cfg)
        .map_err(|e| PolicyValidationError(format!("encode policy config failed: {e}")))?;
    serde_json::to_string(&normalize_json(value))
        .map_err(|e| PolicyValidationError(format!("encode policy config failed: {e}")))
}

fn normalize_json(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map
                .into_iter()
                .map(|(k, v)| (k, normalize_json(v)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = Map::new();
            for (k, v) in entries {
                out.insert(k, v);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_json).collect()),
        other => other,
    }
}
