// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

//! Faceted company search: raw parameters are decoded into typed facet
//! values, compiled into predicates with a sort and a limit, and executed
//! against a [`CompanyStore`].

mod db;
mod executor;
mod filters;
mod limits;
mod memory;
mod normalize;
mod options;
mod parser;
mod planner;
mod query_error;
mod row_decode;
mod store;

pub use db::{build_sql, schema_sql, ImportSummary, SqliteStore, SQLITE_SCHEMA_VERSION};
pub use executor::execute;
pub use filters::{escape_like, normalize_text_term, CompanyRecord, SearchResponse};
pub use limits::QueryLimits;
pub use memory::MemoryStore;
pub use normalize::normalized_query_hash;
pub use options::{resolve_facet_options, FacetOption, FacetOptions};
pub use parser::{
    decode_params, parse_range, raw_params_from_pairs, RawParams, RawValue, LIMIT_PARAM,
    SORT_PARAM,
};
pub use planner::{compile_predicates, resolve_sort, CompiledQuery, Predicate};
pub use query_error::{QueryError, QueryErrorCode};
pub use store::{CompanyStore, DistinctSource, StoreError};

pub const CRATE_NAME: &str = "saaskart-query";

/// Decodes and compiles a raw request without touching storage.
///
/// An absent or blank `sort` parameter falls back to the policy's default
/// sort; a present but unrecognised one sorts by name.
#[must_use]
pub fn compile_request(raw: &RawParams, limits: &QueryLimits) -> CompiledQuery {
    let values = decode_params(raw, limits.max_text_len);
    let predicates = compile_predicates(&values);
    let sort_key = raw
        .get(SORT_PARAM)
        .and_then(RawValue::first)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(limits.default_sort.as_str());
    let sort = resolve_sort(Some(sort_key));
    let limit = limits.resolve_limit(raw.get(LIMIT_PARAM).and_then(RawValue::first));
    CompiledQuery::new(predicates, sort, limit)
}

/// Runs a search end to end.
pub fn search(
    store: &dyn CompanyStore,
    raw: &RawParams,
    limits: &QueryLimits,
) -> Result<SearchResponse, QueryError> {
    execute(store, &compile_request(raw, limits))
}
