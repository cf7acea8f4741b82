// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PolicySchemaVersion {
    #[serde(rename = "1")]
    V1,
}

impl PolicySchemaVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    pub schema_version: PolicySchemaVersion,
    pub search: SearchBudgetPolicy,
    pub cache: CachePolicy,
    pub telemetry: TelemetryPolicy,
}

/// Request-shaping knobs for company search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchBudgetPolicy {
    /// Row limits a caller may ask for, ascending.
    pub allowed_limits: Vec<u32>,
    pub default_limit: u32,
    /// Sort key used when a request carries no `sort` parameter.
    pub default_sort: String,
    /// Free-text terms longer than this are truncated, in characters.
    pub max_text_len: u32,
}

/// Static HTTP cache directives for the route layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CachePolicy {
    pub search_max_age_secs: u64,
    pub facet_options_max_age_secs: u64,
    pub stale_while_revalidate_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryPolicy {
    pub slow_query_log_ms: u64,
    pub log_compiled_sql: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            schema_version: PolicySchemaVersion::V1,
            search: SearchBudgetPolicy {
                allowed_limits: vec![10, 25, 50, 100],
                default_limit: 25,
                default_sort: "revenue".to_string(),
                max_text_len: 128,
            },
            cache: CachePolicy {
                search_max_age_secs: 60,
                facet_options_max_age_secs: 3_600,
                stale_while_revalidate_secs: 300,
            },
            telemetry: TelemetryPolicy {
                slow_query_log_ms: 250,
                log_compiled_sql: false,
            },
        }
    }
}
