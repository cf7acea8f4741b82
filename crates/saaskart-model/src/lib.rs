// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! SaaSKart directory model: companies, their metrics and categories, and the
//! closed facet registry that search requests are decoded against.

mod company;
mod facet;
mod filter;
mod metric;

pub use company::{
    Category, CategoryId, Company, CompanyId, CompanySummary, DirectorySnapshot, ParseError,
    ID_MAX_LEN, NAME_MAX_LEN,
};
pub use facet::{
    lookup, Facet, FacetBinding, FacetKind, FacetName, ScalarColumn, TextColumn, FACETS,
};
pub use filter::{
    FacetValues, FilterValue, NullsOrder, RangeFilter, SortDirection, SortKey, SortSpec,
};
pub use metric::{CompanyMetrics, MetricField};

pub const CRATE_NAME: &str = "saaskart-model";
