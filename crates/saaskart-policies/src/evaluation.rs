// SPDX-License-Identifier: Apache-2.0

use saaskart_model::SortKey;
use serde::Serialize;

use crate::limits::{MAX_ALLOWED_LIMIT, MAX_CACHE_AGE_SECS, MAX_TEXT_LEN_HARD};
use crate::schema::PolicyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum PolicySeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyViolation {
    pub id: &'static str,
    pub severity: PolicySeverity,
    pub message: &'static str,
    pub evidence: String,
}

impl PolicyViolation {
    fn error(id: &'static str, message: &'static str, evidence: impl ToString) -> Self {
        Self {
            id,
            severity: PolicySeverity::Error,
            message,
            evidence: evidence.to_string(),
        }
    }

    fn warning(id: &'static str, message: &'static str, evidence: impl ToString) -> Self {
        Self {
            id,
            severity: PolicySeverity::Warning,
            message,
            evidence: evidence.to_string(),
        }
    }
}

/// Evaluates every rule and returns all violations in rule order.
#[must_use]
pub fn evaluate_policy(cfg: &PolicyConfig) -> Vec<PolicyViolation> {
    let mut out = Vec::new();
    let search = &cfg.search;
    let limits = &search.allowed_limits;

    if limits.is_empty() {
        out.push(PolicyViolation::error(
            "policy.search.allowed_limits.non_empty",
            "search.allowed_limits must not be empty",
            "[]",
        ));
    }
    if limits.contains(&0) {
        out.push(PolicyViolation::error(
            "policy.search.allowed_limits.positive",
            "search.allowed_limits must be positive",
            format!("{limits:?}"),
        ));
    }
    if limits.windows(2).any(|w| w[0] >= w[1]) {
        out.push(PolicyViolation::error(
            "policy.search.allowed_limits.ascending",
            "search.allowed_limits must be strictly ascending",
            format!("{limits:?}"),
        ));
    }
    if limits.iter().any(|l| *l > MAX_ALLOWED_LIMIT) {
        out.push(PolicyViolation::error(
            "policy.search.allowed_limits.max",
            "search.allowed_limits exceeds hard maximum",
            format!("{limits:?} > {MAX_ALLOWED_LIMIT}"),
        ));
    }
    if !limits.contains(&search.default_limit) {
        out.push(PolicyViolation::error(
            "policy.search.default_limit.allowed",
            "search.default_limit must be one of search.allowed_limits",
            search.default_limit,
        ));
    }
    if search.max_text_len == 0 || search.max_text_len > MAX_TEXT_LEN_HARD {
        out.push(PolicyViolation::error(
            "policy.search.max_text_len.range",
            "search.max_text_len must be within 1..=256",
            search.max_text_len,
        ));
    }
    if search.default_sort.trim().is_empty() {
        out.push(PolicyViolation::error(
            "policy.search.default_sort.non_empty",
            "search.default_sort must not be empty",
            "\"\"",
        ));
    } else if SortKey::parse(&search.default_sort).is_none() {
        out.push(PolicyViolation::error(
            "policy.search.default_sort.sortable",
            "search.default_sort must be `name`, a metric or `categories`",
            &search.default_sort,
        ));
    }

    for (id, value) in [
        ("policy.cache.search_max_age.max", cfg.cache.search_max_age_secs),
        (
            "policy.cache.facet_options_max_age.max",
            cfg.cache.facet_options_max_age_secs,
        ),
    ] {
        if value > MAX_CACHE_AGE_SECS {
            out.push(PolicyViolation::error(
                id,
                "cache max-age exceeds one day",
                value,
            ));
        }
    }
    if cfg.cache.search_max_age_secs == 0 {
        out.push(PolicyViolation::warning(
            "policy.cache.search_max_age.disabled",
            "search responses will not be cached by clients",
            0,
        ));
    }
    if cfg.telemetry.log_compiled_sql {
        out.push(PolicyViolation::warning(
            "policy.telemetry.log_compiled_sql.enabled",
            "compiled SQL is logged; parameters stay bound and are not logged",
            true,
        ));
    }
    out
}
