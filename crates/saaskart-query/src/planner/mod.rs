// SPDX-License-Identifier: Apache-2.0

mod sort;

pub use sort::resolve_sort;

use saaskart_model::{
    lookup, FacetBinding, FacetValues, FilterValue, MetricField, ScalarColumn, SortSpec,
    TextColumn,
};
use serde::Serialize;

/// One conjunct of a company search. Storage adapters translate each
/// variant; no variant carries SQL text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Predicate {
    /// Case-insensitive substring match against any of `columns`.
    TextMatch {
        columns: &'static [TextColumn],
        term: String,
    },
    ScalarIn {
        column: ScalarColumn,
        values: Vec<String>,
    },
    /// The company has at least one of the listed category ids.
    CategoryIn { category_ids: Vec<String> },
    /// Inclusive; a NULL metric never matches.
    MetricBetween {
        metric: MetricField,
        min: f64,
        max: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub predicates: Vec<Predicate>,
    pub sort: SortSpec,
    pub limit: usize,
}

impl CompiledQuery {
    #[must_use]
    pub fn new(predicates: Vec<Predicate>, sort: SortSpec, limit: usize) -> Self {
        Self {
            predicates,
            sort,
            limit,
        }
    }
}

/// Turns decoded facet values into predicates. A `0-0` range is the unset
/// sentinel and contributes nothing; a value whose shape does not match the
/// facet's binding is dropped.
#[must_use]
pub fn compile_predicates(values: &FacetValues) -> Vec<Predicate> {
    let mut out = Vec::with_capacity(values.len());
    for (name, value) in values {
        let Some(facet) = lookup(name.as_str()) else {
            continue;
        };
        let predicate = match (facet.binding, value) {
            (FacetBinding::Text(columns), FilterValue::Text(term)) => Some(Predicate::TextMatch {
                columns,
                term: term.clone(),
            }),
            (FacetBinding::Scalar(column), FilterValue::Set(values)) => {
                Some(Predicate::ScalarIn {
                    column,
                    values: values.clone(),
                })
            }
            (FacetBinding::Category, FilterValue::Set(values)) => Some(Predicate::CategoryIn {
                category_ids: values.clone(),
            }),
            (FacetBinding::Metric(metric), FilterValue::Range(range)) if !range.is_unset() => {
                Some(Predicate::MetricBetween {
                    metric,
                    min: range.min(),
                    max: range.max(),
                })
            }
            _ => None,
        };
        out.extend(predicate);
    }
    out
}
