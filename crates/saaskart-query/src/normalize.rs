// SPDX-License-Identifier: Apache-2.0

use saaskart_core::canonical;
use saaskart_model::SortSpec;
use serde::Serialize;

use crate::planner::CompiledQuery;
use crate::query_error::{QueryError, QueryErrorCode};

#[derive(Serialize)]
struct NormalizedQuery<'a> {
    predicates: Vec<String>,
    sort: &'a SortSpec,
    limit: usize,
}

/// Stable hash of a compiled query. Requests that decode to the same
/// predicates, sort and limit share a hash regardless of parameter order or
/// noise keys.
pub fn normalized_query_hash(query: &CompiledQuery) -> Result<String, QueryError> {
    let mut predicates: Vec<String> = query
        .predicates
        .iter()
        .map(|p| {
            canonical::stable_json_bytes(p)
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .map_err(|e| QueryError::new(QueryErrorCode::Encoding, e.to_string()))
        })
        .collect::<Result<_, _>>()?;
    predicates.sort();
    let normalized = NormalizedQuery {
        predicates,
        sort: &query.sort,
        limit: query.limit,
    };
    canonical::stable_json_hash_hex(&normalized)
        .map_err(|e| QueryError::new(QueryErrorCode::Encoding, e.to_string()))
}
