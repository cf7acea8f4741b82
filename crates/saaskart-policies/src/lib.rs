// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod evaluation;
mod limits;
mod schema;
mod validate;

pub use evaluation::{evaluate_policy, PolicySeverity, PolicyViolation};
pub use limits::{MAX_ALLOWED_LIMIT, MAX_CACHE_AGE_SECS, MAX_TEXT_LEN_HARD};
pub use schema::{
    CachePolicy, PolicyConfig, PolicySchemaVersion, SearchBudgetPolicy, TelemetryPolicy,
};
pub use validate::{
    canonical_config_json, load_policy_from_workspace, load_policy_or_default, parse_policy_json,
    policy_config_path, validate_policy_config, PolicyValidationError,
};

pub const CRATE_NAME: &str = "saaskart-policies";
