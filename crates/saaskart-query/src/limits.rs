// SPDX-License-Identifier: Apache-2.0

use saaskart_policies::PolicyConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryLimits {
    pub allowed_limits: Vec<usize>,
    pub default_limit: usize,
    pub default_sort: String,
    pub max_text_len: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self::from_policy(&PolicyConfig::default())
    }
}

impl QueryLimits {
    #[must_use]
    pub fn from_policy(policy: &PolicyConfig) -> Self {
        Self {
            allowed_limits: policy
                .search
                .allowed_limits
                .iter()
                .map(|l| *l as usize)
                .collect(),
            default_limit: policy.search.default_limit as usize,
            default_sort: policy.search.default_sort.clone(),
            max_text_len: policy.search.max_text_len as usize,
        }
    }

    /// Snaps a requested limit onto the allowed set: the largest allowed
    /// value not above the request, or the smallest allowed value when the
    /// request is below all of them. Missing or unparsable input yields the
    /// default.
    #[must_use]
    pub fn resolve_limit(&self, raw: Option<&str>) -> usize {
        let Some(requested) = raw.and_then(|r| r.trim().parse::<usize>().ok()) else {
            return self.default_limit;
        };
        self.allowed_limits
            .iter()
            .copied()
            .filter(|allowed| *allowed <= requested)
            .max()
            .or_else(|| self.allowed_limits.iter().copied().min())
            .unwrap_or(self.default_limit)
    }
}
