// SPDX-License-Identifier: Apache-2.0

use saaskart_model::{MetricField, ScalarColumn};

use crate::filters::CompanyRecord;
use crate::options::FacetOption;
use crate::planner::CompiledQuery;

/// Opaque storage failure. Callers never see driver error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self(value.to_string())
    }
}

/// Where the distinct values of a multiselect facet come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctSource {
    Scalar(ScalarColumn),
    Category,
}

/// Storage query interface the search core runs against.
///
/// `query_companies` applies every predicate conjunctively, then the sort
/// and the limit. Each company appears at most once in its output.
pub trait CompanyStore {
    fn query_companies(&self, query: &CompiledQuery) -> Result<Vec<CompanyRecord>, StoreError>;

    /// Values present in data, unsorted, NULL and blank values excluded.
    fn distinct_values(&self, source: DistinctSource) -> Result<Vec<FacetOption>, StoreError>;

    /// `(min, max)` over the non-null values of a metric, `None` when there
    /// are none.
    fn metric_bounds(&self, metric: MetricField) -> Result<Option<(f64, f64)>, StoreError>;
}
