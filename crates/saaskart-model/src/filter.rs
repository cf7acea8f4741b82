// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::facet::{lookup, FacetBinding, FacetName};
use crate::metric::MetricField;

/// Inclusive numeric bounds; construction guarantees `min <= max` and finite
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeFilter {
    min: f64,
    max: f64,
}

impl RangeFilter {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Option<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return None;
        }
        Some(Self { min, max })
    }

    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// `0-0` is how clients encode an untouched range control; it means
    /// "no constraint", not "exactly zero".
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    Range(RangeFilter),
    Set(Vec<String>),
    Text(String),
}

/// Decoded facet values for one request, keyed by facet.
pub type FacetValues = BTreeMap<FacetName, FilterValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Metric(MetricField),
    Category,
}

impl SortKey {
    /// Sortable names are `name`, every metric facet and `categories`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name == "name" {
            return Some(Self::Name);
        }
        match lookup(name)?.binding {
            FacetBinding::Metric(metric) => Some(Self::Metric(metric)),
            FacetBinding::Category => Some(Self::Category),
            FacetBinding::Text(_) | FacetBinding::Scalar(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullsOrder {
    /// The sort column is required; nulls cannot occur.
    NotApplicable,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
    pub nulls: NullsOrder,
}

impl SortSpec {
    pub const BY_NAME: Self = Self {
        key: SortKey::Name,
        direction: SortDirection::Asc,
        nulls: NullsOrder::NotApplicable,
    };
}
