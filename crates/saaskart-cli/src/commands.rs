// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;

use saaskart_core::{
    resolve_policy_root, resolve_saaskart_config_path, ConfigPathScope, ErrorCode,
    ResultExt,
};
use saaskart_model::{DirectorySnapshot, FACETS};
use saaskart_policies::{load_policy_or_default, policy_config_path};
use saaskart_query::{
    build_sql, compile_request, normalized_query_hash, raw_params_from_pairs,
    resolve_facet_options, QueryError, QueryErrorCode, QueryLimits, RawParams, SqliteStore,
    StoreError,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::output::{emit_ok, sql_value_json};
use crate::{CliError, OutputMode};

fn storage_error(err: StoreError) -> CliError {
    CliError::new(ErrorCode::StorageFailure, err.to_string())
}

fn import_failed(message: &str) -> CliError {
    CliError::new(ErrorCode::ImportFailed, message)
}

fn query_error(err: QueryError) -> CliError {
    let code = match err.code {
        QueryErrorCode::UnknownFacet => ErrorCode::UnknownFacet,
        QueryErrorCode::Storage => ErrorCode::StorageFailure,
        _ => ErrorCode::Internal,
    };
    CliError::new(code, err.message)
}

fn emit(output_mode: OutputMode, payload: &Value) -> Result<(), CliError> {
    emit_ok(output_mode, payload).map_err(CliError::internal)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, CliError> {
    serde_json::to_value(value).map_err(|e| CliError::internal(e.to_string()))
}

/// Policy from `--policy-root`, else `SAASKART_POLICY_ROOT`, else the current
/// directory. A missing policy file means built-in defaults; a present but
/// invalid one is an error.
fn load_limits(policy_root: Option<&Path>) -> Result<QueryLimits, CliError> {
    let root = policy_root.map_or_else(resolve_policy_root, Path::to_path_buf);
    debug!(policy = %policy_config_path(&root).display(), "loading search policy");
    let policy = load_policy_or_default(&root)
        .map_err(|e| CliError::new(ErrorCode::PolicyInvalid, e.to_string()))?;
    Ok(QueryLimits::from_policy(&policy))
}

fn parse_params(params: &[String]) -> Result<RawParams, CliError> {
    let mut pairs = Vec::with_capacity(params.len());
    for param in params {
        let (key, value) = param.split_once('=').ok_or_else(|| {
            CliError::new(
                ErrorCode::InvalidQueryParameter,
                format!("parameter `{param}` must be key=value"),
            )
        })?;
        pairs.push((key.trim().to_string(), value.to_string()));
    }
    Ok(raw_params_from_pairs(pairs))
}

pub(crate) fn init_db(db: &Path, output_mode: OutputMode) -> Result<(), CliError> {
    let store = SqliteStore::open(db).map_err(storage_error)?;
    store.init_schema().map_err(storage_error)?;
    let version = store.schema_version().map_err(storage_error)?;
    info!(db = %db.display(), version, "initialised company schema");
    emit(
        output_mode,
        &json!({
            "command": "init-db",
            "status": "ok",
            "db": db.display().to_string(),
            "schema_version": version,
        }),
    )
}

pub(crate) fn import(db: &Path, file: &Path, output_mode: OutputMode) -> Result<(), CliError> {
    let raw = fs::read(file)
        .with_context("read snapshot")
        .map_err(|e| import_failed(&format!("{e} ({})", file.display())))?;
    let snapshot: DirectorySnapshot = serde_json::from_slice(&raw)
        .with_context("decode snapshot")
        .map_err(|e| import_failed(&e.to_string()))?;
    snapshot
        .validate()
        .with_context("invalid snapshot")
        .map_err(|e| import_failed(&e.to_string()))?;

    let mut store = SqliteStore::open(db).map_err(storage_error)?;
    store.init_schema().map_err(storage_error)?;
    let summary = store.import_snapshot(&snapshot).map_err(storage_error)?;
    info!(
        categories = summary.categories,
        companies = summary.companies,
        "import finished"
    );
    emit(
        output_mode,
        &json!({
            "command": "import",
            "status": "ok",
            "categories": summary.categories,
            "companies": summary.companies,
        }),
    )
}

pub(crate) fn search(
    db: &Path,
    params: &[String],
    policy_root: Option<&Path>,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let limits = load_limits(policy_root)?;
    let raw = parse_params(params)?;
    let store = SqliteStore::open_read_only(db).map_err(storage_error)?;
    let response = saaskart_query::search(&store, &raw, &limits).map_err(query_error)?;
    emit(output_mode, &to_json(&response)?)
}

pub(crate) fn facet_options(
    db: &Path,
    name: &str,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let store = SqliteStore::open_read_only(db).map_err(storage_error)?;
    let options = resolve_facet_options(&store, name).map_err(query_error)?;
    emit(
        output_mode,
        &json!({
            "facet": name,
            "options": to_json(&options)?,
        }),
    )
}

pub(crate) fn explain(
    db: &Path,
    params: &[String],
    policy_root: Option<&Path>,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let limits = load_limits(policy_root)?;
    let raw = parse_params(params)?;
    let compiled = compile_request(&raw, &limits);
    let (sql, values) = build_sql(&compiled);
    let store = SqliteStore::open_read_only(db).map_err(storage_error)?;
    let plan = store.explain_query_plan(&compiled).map_err(storage_error)?;
    let query_hash = normalized_query_hash(&compiled).map_err(query_error)?;
    emit(
        output_mode,
        &json!({
            "query_hash": query_hash,
            "predicates": to_json(&compiled.predicates)?,
            "sort": to_json(&compiled.sort)?,
            "limit": compiled.limit,
            "sql": sql,
            "params": values.iter().map(sql_value_json).collect::<Vec<_>>(),
            "plan": plan,
        }),
    )
}

pub(crate) fn registry(output_mode: OutputMode) -> Result<(), String> {
    let facets = serde_json::to_value(FACETS).map_err(|e| e.to_string())?;
    emit_ok(output_mode, &json!({ "facets": facets }))
}

pub(crate) fn emit_config_paths(output_mode: OutputMode) -> Result<(), String> {
    let root = resolve_policy_root();
    emit_ok(
        output_mode,
        &json!({
            "user_policy": resolve_saaskart_config_path(ConfigPathScope::User),
            "workspace_policy": resolve_saaskart_config_path(ConfigPathScope::Workspace),
            "policy_root": root,
            "resolved_policy": policy_config_path(&root),
        }),
    )
}
