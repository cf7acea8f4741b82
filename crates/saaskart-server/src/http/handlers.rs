// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use saaskart_core::{canonical, sha256_hex, ErrorCode, MachineError};
use saaskart_model::{lookup, Facet, FacetKind, FACETS};
use saaskart_query::{
    build_sql, compile_request, execute, normalized_query_hash, raw_params_from_pairs,
    resolve_facet_options, FacetOptions, QueryError, QueryErrorCode, RawParams, SearchResponse,
    SqliteStore,
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};
use url::form_urlencoded;

use crate::app::AppState;

pub(crate) const QUERY_HASH_HEADER: &str = "x-saaskart-query-hash";

#[derive(Serialize)]
struct FacetRegistryBody {
    facets: &'static [Facet],
}

#[derive(Serialize)]
struct FacetOptionsBody {
    facet: String,
    options: FacetOptions,
}

#[derive(Debug, Clone, Copy)]
struct CacheDirective {
    max_age_secs: u64,
    stale_while_revalidate_secs: u64,
}

pub(crate) fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> Response {
    let body = Json(json!({ "error": MachineError::new(code.as_str(), message) }));
    (status, body).into_response()
}

fn query_error_response(err: &QueryError) -> Response {
    match err.code {
        QueryErrorCode::UnknownFacet => {
            error_response(StatusCode::NOT_FOUND, ErrorCode::UnknownFacet, &err.message)
        }
        QueryErrorCode::Storage => {
            error!(error = %err, "storage failure");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::StorageFailure,
                "company store unavailable",
            )
        }
        _ => {
            error!(error = %err, "query failure");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::Internal,
                "internal error",
            )
        }
    }
}

fn join_error_response(err: &tokio::task::JoinError) -> Response {
    error!(error = %err, "blocking query task failed");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::Internal,
        "internal error",
    )
}

pub(crate) fn if_none_match(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string)
}

fn put_cache_headers(headers: &mut HeaderMap, cache: CacheDirective, etag: &str) {
    if let Ok(value) = HeaderValue::from_str(&format!(
        "public, max-age={}, stale-while-revalidate={}",
        cache.max_age_secs, cache.stale_while_revalidate_secs
    )) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert(header::ETAG, value);
    }
}

/// Omitted when the hash could not be computed.
fn put_query_hash(headers: &mut HeaderMap, query_hash: Option<&str>) {
    if let Some(value) = query_hash.and_then(|hash| HeaderValue::from_str(hash).ok()) {
        headers.insert(QUERY_HASH_HEADER, value);
    }
}

/// Canonical JSON body with a content ETag. A matching `If-None-Match`
/// yields `304` without a body.
fn cached_json<T: Serialize>(
    request_headers: &HeaderMap,
    payload: &T,
    cache: CacheDirective,
) -> Response {
    let bytes = match canonical::stable_json_bytes(payload) {
        Ok(bytes) => bytes,
        Err(err) => {
            error!(error = %err, "response encoding failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::Internal,
                "response encoding failed",
            );
        }
    };
    let etag = format!("\"{}\"", sha256_hex(&bytes));
    let mut response = if if_none_match(request_headers).as_deref() == Some(etag.as_str()) {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response()
    };
    put_cache_headers(response.headers_mut(), cache, &etag);
    response
}

fn parse_query_string(query: Option<&str>) -> RawParams {
    raw_params_from_pairs(
        form_urlencoded::parse(query.unwrap_or_default().as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned())),
    )
}

pub(crate) async fn healthz_handler() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

pub(crate) async fn facets_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    cached_json(
        &headers,
        &FacetRegistryBody { facets: FACETS },
        CacheDirective {
            max_age_secs: state.cache.facet_options_max_age_secs,
            stale_while_revalidate_secs: state.cache.stale_while_revalidate_secs,
        },
    )
}

pub(crate) async fn companies_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let raw = parse_query_string(query.as_deref());
    let compiled = compile_request(&raw, &state.limits);
    let query_hash = match normalized_query_hash(&compiled) {
        Ok(hash) => Some(hash),
        Err(err) => {
            warn!(error = %err, "query hash unavailable");
            None
        }
    };
    let hash_field = query_hash.as_deref().unwrap_or("-");
    if state.telemetry.log_compiled_sql {
        let (sql, params) = build_sql(&compiled);
        info!(query_hash = %hash_field, sql = %sql, params = params.len(), "compiled company search");
    }

    let db = Arc::clone(&state.db_path);
    let started = Instant::now();
    let joined = tokio::task::spawn_blocking(move || -> Result<SearchResponse, QueryError> {
        let store = SqliteStore::open_read_only(&db)?;
        execute(&store, &compiled)
    })
    .await;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if elapsed_ms >= state.telemetry.slow_query_log_ms {
        warn!(query_hash = %hash_field, elapsed_ms, "slow company search");
    }

    let response = match joined {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => return query_error_response(&err),
        Err(err) => return join_error_response(&err),
    };
    let mut http = cached_json(
        &headers,
        &response,
        CacheDirective {
            max_age_secs: state.cache.search_max_age_secs,
            stale_while_revalidate_secs: state.cache.stale_while_revalidate_secs,
        },
    );
    put_query_hash(http.headers_mut(), query_hash.as_deref());
    http
}

pub(crate) async fn facet_options_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Response {
    if lookup(&name).map_or(true, |facet| facet.kind == FacetKind::Text) {
        return error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::UnknownFacet,
            &format!("facet `{name}` has no option domain"),
        );
    }
    let db = Arc::clone(&state.db_path);
    let facet = name.clone();
    let joined = tokio::task::spawn_blocking(move || -> Result<FacetOptions, QueryError> {
        let store = SqliteStore::open_read_only(&db)?;
        resolve_facet_options(&store, &facet)
    })
    .await;
    match joined {
        Ok(Ok(options)) => cached_json(
            &headers,
            &FacetOptionsBody {
                facet: name,
                options,
            },
            CacheDirective {
                max_age_secs: state.cache.facet_options_max_age_secs,
                stale_while_revalidate_secs: state.cache.stale_while_revalidate_secs,
            },
        ),
        Ok(Err(err)) => query_error_response(&err),
        Err(err) => join_error_response(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_query_string, put_query_hash, QUERY_HASH_HEADER};
    use axum::http::HeaderMap;
    use saaskart_query::RawValue;

    #[test]
    fn query_hash_header_is_omitted_without_a_hash() {
        let mut headers = HeaderMap::new();
        put_query_hash(&mut headers, None);
        assert!(headers.get(QUERY_HASH_HEADER).is_none());

        put_query_hash(&mut headers, Some("abc123"));
        assert_eq!(
            headers.get(QUERY_HASH_HEADER).and_then(|v| v.to_str().ok()),
            Some("abc123")
        );
    }

    #[test]
    fn repeated_keys_and_percent_encoding_survive() {
        let raw = parse_query_string(Some("countries=US&countries=DE&query=100%25+off&x"));
        assert_eq!(
            raw.get("countries"),
            Some(&RawValue::Many(vec!["US".to_string(), "DE".to_string()]))
        );
        assert_eq!(raw.get("query"), Some(&RawValue::One("100% off".to_string())));
        assert_eq!(raw.get("x"), Some(&RawValue::One(String::new())));
        assert!(parse_query_string(None).is_empty());
    }
}
