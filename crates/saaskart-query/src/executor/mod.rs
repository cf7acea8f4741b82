// SPDX-License-Identifier: Apache-2.0

use std::time::Instant;

use tracing::{debug, warn};

use crate::filters::SearchResponse;
use crate::planner::CompiledQuery;
use crate::query_error::QueryError;
use crate::store::CompanyStore;

/// Runs a compiled query. Storage failures surface as a single opaque
/// error; there is no retry and no partial result.
pub fn execute(
    store: &dyn CompanyStore,
    query: &CompiledQuery,
) -> Result<SearchResponse, QueryError> {
    let started = Instant::now();
    let companies = store.query_companies(query).map_err(|e| {
        warn!(error = %e, "company search failed");
        QueryError::from(e)
    })?;
    debug!(
        predicates = query.predicates.len(),
        sort = ?query.sort.key,
        limit = query.limit,
        rows = companies.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "company search executed"
    );
    Ok(SearchResponse { companies })
}
