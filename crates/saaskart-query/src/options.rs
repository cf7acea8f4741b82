// SPDX-License-Identifier: Apache-2.0

use saaskart_model::{lookup, FacetBinding};
use serde::{Deserialize, Serialize};

use crate::query_error::{QueryError, QueryErrorCode};
use crate::store::{CompanyStore, DistinctSource};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
}

impl FacetOption {
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Value domain of a facet as offered to a filter UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum FacetOptions {
    Values { options: Vec<FacetOption> },
    Range { min: f64, max: f64 },
    /// The metric has no non-null value anywhere.
    RangeUnavailable,
}

/// Resolves the option domain for an exact facet name. Text facets have no
/// domain and are reported like unknown names.
pub fn resolve_facet_options(
    store: &dyn CompanyStore,
    name: &str,
) -> Result<FacetOptions, QueryError> {
    let facet = lookup(name).ok_or_else(|| unknown_facet(name))?;
    let source = match facet.binding {
        FacetBinding::Metric(metric) => {
            return Ok(match store.metric_bounds(metric)? {
                Some((min, max)) if min.is_finite() && max.is_finite() => FacetOptions::Range {
                    min: min.floor(),
                    max: max.ceil(),
                },
                _ => FacetOptions::RangeUnavailable,
            });
        }
        FacetBinding::Scalar(column) => DistinctSource::Scalar(column),
        FacetBinding::Category => DistinctSource::Category,
        FacetBinding::Text(_) => return Err(unknown_facet(name)),
    };
    let mut options: Vec<FacetOption> = store
        .distinct_values(source)?
        .into_iter()
        .filter(|o| !o.value.trim().is_empty())
        .collect();
    options.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.value.cmp(&b.value)));
    options.dedup_by(|a, b| a.value == b.value);
    Ok(FacetOptions::Values { options })
}

fn unknown_facet(name: &str) -> QueryError {
    QueryError::new(
        QueryErrorCode::UnknownFacet,
        format!("facet `{name}` has no option domain"),
    )
}
