// SPDX-License-Identifier: Apache-2.0

//! SQLite adapter for [`CompanyStore`].

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{
    params, params_from_iter, types::Value, Connection, OpenFlags, OptionalExtension,
};
use saaskart_model::{
    Category, CategoryId, Company, CompanyMetrics, DirectorySnapshot, MetricField, ScalarColumn,
    SortKey, TextColumn,
};
use tracing::debug;

use crate::filters::{escape_like, CompanyRecord};
use crate::options::FacetOption;
use crate::planner::{CompiledQuery, Predicate};
use crate::row_decode::RawCompanyRow;
use crate::store::{CompanyStore, DistinctSource, StoreError};

pub const SQLITE_SCHEMA_VERSION: i64 = 1;

const COMPANY_COLUMNS: &str =
    "c.id, c.name, c.country, c.state, c.city, c.year_founded, c.claimed, c.domain, c.logo_url";
const FIRST_CATEGORY_SQL: &str =
    "(SELECT MIN(cc.category_id) FROM company_categories cc WHERE cc.company_id = c.id)";

#[must_use]
pub fn schema_sql() -> String {
    let metric_columns: Vec<String> = MetricField::ALL
        .iter()
        .map(|m| format!("  {} REAL", m.as_str()))
        .collect();
    format!(
        "
        CREATE TABLE IF NOT EXISTS categories (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS company_metrics (
          id INTEGER PRIMARY KEY,
{}
        );
        CREATE TABLE IF NOT EXISTS companies (
          id TEXT PRIMARY KEY,
          name TEXT NOT NULL,
          description TEXT,
          country TEXT,
          state TEXT,
          city TEXT,
          year_founded INTEGER,
          claimed INTEGER NOT NULL DEFAULT 0,
          domain TEXT,
          logo_url TEXT,
          metrics_id INTEGER NOT NULL UNIQUE REFERENCES company_metrics(id)
        );
        CREATE TABLE IF NOT EXISTS company_categories (
          company_id TEXT NOT NULL REFERENCES companies(id),
          category_id TEXT NOT NULL REFERENCES categories(id),
          PRIMARY KEY (company_id, category_id)
        ) WITHOUT ROWID;
        CREATE INDEX IF NOT EXISTS idx_companies_name ON companies(name, id);
        CREATE INDEX IF NOT EXISTS idx_companies_country ON companies(country);
        CREATE INDEX IF NOT EXISTS idx_companies_state ON companies(state);
        CREATE INDEX IF NOT EXISTS idx_companies_city ON companies(city);
        CREATE INDEX IF NOT EXISTS idx_companies_year_founded ON companies(year_founded);
        CREATE INDEX IF NOT EXISTS idx_company_categories_category ON company_categories(category_id, company_id);
        ",
        metric_columns.join(",\n")
    )
}

fn text_column_sql(column: TextColumn) -> String {
    format!("c.{}", column.as_str())
}

fn scalar_column_sql(column: ScalarColumn) -> String {
    match column {
        ScalarColumn::YearFounded => "CAST(c.year_founded AS TEXT)".to_string(),
        other => format!("c.{}", other.as_str()),
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Builds the company search statement and its bound parameters. User input
/// only ever reaches SQL as a parameter; identifiers come from the registry.
#[must_use]
pub fn build_sql(query: &CompiledQuery) -> (String, Vec<Value>) {
    let metric_columns: Vec<String> = MetricField::ALL
        .iter()
        .map(|m| format!("m.{}", m.as_str()))
        .collect();
    let mut sql = format!(
        "SELECT {COMPANY_COLUMNS}, {} FROM companies c LEFT JOIN company_metrics m ON m.id = c.metrics_id",
        metric_columns.join(", ")
    );
    let mut where_parts: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    for predicate in &query.predicates {
        match predicate {
            Predicate::TextMatch { columns, term } => {
                let pattern = format!("%{}%", escape_like(term));
                let ors: Vec<String> = columns
                    .iter()
                    .map(|col| format!("{} LIKE ? ESCAPE '!'", text_column_sql(*col)))
                    .collect();
                params.extend(columns.iter().map(|_| Value::Text(pattern.clone())));
                where_parts.push(format!("({})", ors.join(" OR ")));
            }
            Predicate::ScalarIn { column, values } => {
                where_parts.push(format!(
                    "{} IN ({})",
                    scalar_column_sql(*column),
                    placeholders(values.len())
                ));
                params.extend(values.iter().cloned().map(Value::Text));
            }
            Predicate::CategoryIn { category_ids } => {
                where_parts.push(format!(
                    "EXISTS (SELECT 1 FROM company_categories cc WHERE cc.company_id = c.id AND cc.category_id IN ({}))",
                    placeholders(category_ids.len())
                ));
                params.extend(category_ids.iter().cloned().map(Value::Text));
            }
            Predicate::MetricBetween { metric, min, max } => {
                where_parts.push(format!("m.{} BETWEEN ? AND ?", metric.as_str()));
                params.push(Value::Real(*min));
                params.push(Value::Real(*max));
            }
        }
    }

    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }

    let direction = query.sort.direction.as_sql();
    match query.sort.key {
        SortKey::Name => sql.push_str(&format!(" ORDER BY c.name {direction}, c.id ASC")),
        SortKey::Metric(metric) => sql.push_str(&format!(
            " ORDER BY m.{col} IS NULL ASC, m.{col} {direction}, c.name ASC, c.id ASC",
            col = metric.as_str()
        )),
        SortKey::Category => sql.push_str(&format!(
            " ORDER BY {FIRST_CATEGORY_SQL} IS NULL ASC, {FIRST_CATEGORY_SQL} {direction}, c.name ASC, c.id ASC"
        )),
    }
    sql.push_str(" LIMIT ?");
    params.push(Value::Integer(
        i64::try_from(query.limit).unwrap_or(i64::MAX),
    ));

    (sql, params)
}

/// Relational [`CompanyStore`] over one SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    pub fn open_read_only(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch("PRAGMA query_only=ON; PRAGMA temp_store=MEMORY;")?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(&schema_sql())?;
        self.conn
            .execute_batch(&format!("PRAGMA user_version={SQLITE_SCHEMA_VERSION};"))?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i64, StoreError> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))?)
    }

    /// Upserts every category and company of a validated snapshot in one
    /// transaction. A company already present under the same id is replaced
    /// together with its metrics record and category links.
    pub fn import_snapshot(
        &mut self,
        snapshot: &DirectorySnapshot,
    ) -> Result<ImportSummary, StoreError> {
        snapshot
            .validate()
            .map_err(|e| StoreError(format!("invalid snapshot: {e}")))?;
        let metric_names: Vec<&str> = MetricField::ALL.iter().map(|m| m.as_str()).collect();
        let insert_metrics_sql = format!(
            "INSERT INTO company_metrics ({}) VALUES ({})",
            metric_names.join(", "),
            placeholders(metric_names.len())
        );

        let tx = self.conn.transaction()?;
        {
            let mut category_stmt = tx.prepare(
                "INSERT INTO categories (id, name) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            )?;
            for category in &snapshot.categories {
                category_stmt.execute(params![category.id.as_str(), category.name])?;
            }

            let mut metrics_stmt = tx.prepare(&insert_metrics_sql)?;
            let mut company_stmt = tx.prepare(
                "INSERT INTO companies (
                  id, name, description, country, state, city, year_founded, claimed, domain, logo_url, metrics_id
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            let mut link_stmt = tx.prepare(
                "INSERT OR IGNORE INTO company_categories (company_id, category_id) VALUES (?1, ?2)",
            )?;
            for company in &snapshot.companies {
                remove_company(&tx, company.id.as_str())?;
                metrics_stmt.execute(params_from_iter(metric_values(&company.metrics)))?;
                let metrics_id = tx.last_insert_rowid();
                insert_company(&mut company_stmt, company, metrics_id)?;
                for category in &company.categories {
                    link_stmt.execute(params![company.id.as_str(), category.as_str()])?;
                }
            }
        }
        tx.commit()?;
        debug!(
            categories = snapshot.categories.len(),
            companies = snapshot.companies.len(),
            "imported directory snapshot"
        );
        Ok(ImportSummary {
            categories: snapshot.categories.len(),
            companies: snapshot.companies.len(),
        })
    }

    /// `EXPLAIN QUERY PLAN` detail lines for the statement `query` compiles to.
    pub fn explain_query_plan(&self, query: &CompiledQuery) -> Result<Vec<String>, StoreError> {
        let (sql, params) = build_sql(query);
        let explain_sql = format!("EXPLAIN QUERY PLAN {sql}");
        let mut stmt = self.conn.prepare(&explain_sql)?;
        let lines = stmt
            .query_map(params_from_iter(params.iter()), |row| row.get::<_, String>(3))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines)
    }

    fn categories_for(
        &self,
        company_ids: &[String],
    ) -> Result<BTreeMap<String, Vec<Category>>, StoreError> {
        let mut out: BTreeMap<String, Vec<Category>> = BTreeMap::new();
        if company_ids.is_empty() {
            return Ok(out);
        }
        let sql = format!(
            "SELECT cc.company_id, cat.id, cat.name FROM company_categories cc
             JOIN categories cat ON cat.id = cc.category_id
             WHERE cc.company_id IN ({})
             ORDER BY cc.company_id ASC, cat.id ASC",
            placeholders(company_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(company_ids.iter()), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        for (company_id, category_id, name) in rows {
            let id = CategoryId::parse(&category_id)
                .map_err(|e| StoreError(format!("stored category id `{category_id}`: {e}")))?;
            out.entry(company_id).or_default().push(Category { id, name });
        }
        Ok(out)
    }
}

/// Row counts written by one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ImportSummary {
    pub categories: usize,
    pub companies: usize,
}

fn metric_values(metrics: &CompanyMetrics) -> Vec<Value> {
    MetricField::ALL
        .iter()
        .map(|m| metrics.get(*m).map_or(Value::Null, Value::Real))
        .collect()
}

fn remove_company(conn: &Connection, company_id: &str) -> Result<(), StoreError> {
    let metrics_id: Option<i64> = conn
        .query_row(
            "SELECT metrics_id FROM companies WHERE id = ?1",
            params![company_id],
            |row| row.get(0),
        )
        .optional()?;
    conn.execute(
        "DELETE FROM company_categories WHERE company_id = ?1",
        params![company_id],
    )?;
    conn.execute("DELETE FROM companies WHERE id = ?1", params![company_id])?;
    if let Some(metrics_id) = metrics_id {
        conn.execute(
            "DELETE FROM company_metrics WHERE id = ?1",
            params![metrics_id],
        )?;
    }
    Ok(())
}

fn insert_company(
    stmt: &mut rusqlite::Statement<'_>,
    company: &Company,
    metrics_id: i64,
) -> Result<(), StoreError> {
    stmt.execute(params![
        company.id.as_str(),
        company.name,
        company.description,
        company.country,
        company.state,
        company.city,
        company.year_founded,
        company.claimed,
        company.domain,
        company.logo_url,
        metrics_id,
    ])?;
    Ok(())
}

impl CompanyStore for SqliteStore {
    fn query_companies(&self, query: &CompiledQuery) -> Result<Vec<CompanyRecord>, StoreError> {
        let (sql, params) = build_sql(query);
        debug!(sql = %sql, params = params.len(), "company search sql");
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), RawCompanyRow::from_sql_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut categories = self.categories_for(&ids)?;
        rows.into_iter()
            .map(|row| -> Result<CompanyRecord, StoreError> {
                let categories = categories.remove(&row.id).unwrap_or_default();
                let (company, metrics) = row.into_parts()?;
                Ok(CompanyRecord {
                    company,
                    metrics,
                    categories,
                })
            })
            .collect()
    }

    fn distinct_values(&self, source: DistinctSource) -> Result<Vec<FacetOption>, StoreError> {
        match source {
            DistinctSource::Scalar(column) => {
                let expr = scalar_column_sql(column);
                let sql = format!(
                    "SELECT DISTINCT {expr} FROM companies c WHERE c.{} IS NOT NULL AND TRIM({expr}) <> ''",
                    column.as_str()
                );
                let mut stmt = self.conn.prepare_cached(&sql)?;
                let values = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(values.into_iter().map(FacetOption::plain).collect())
            }
            DistinctSource::Category => {
                let mut stmt = self.conn.prepare_cached(
                    "SELECT DISTINCT cat.id, cat.name FROM categories cat
                     JOIN company_categories cc ON cc.category_id = cat.id",
                )?;
                let options = stmt
                    .query_map([], |row| {
                        Ok(FacetOption {
                            value: row.get::<_, String>(0)?,
                            label: row.get::<_, String>(1)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(options)
            }
        }
    }

    fn metric_bounds(&self, metric: MetricField) -> Result<Option<(f64, f64)>, StoreError> {
        let sql = format!(
            "SELECT MIN(m.{col}), MAX(m.{col}) FROM companies c JOIN company_metrics m ON m.id = c.metrics_id",
            col = metric.as_str()
        );
        let (min, max) = self.conn.query_row(&sql, [], |row| {
            Ok((row.get::<_, Option<f64>>(0)?, row.get::<_, Option<f64>>(1)?))
        })?;
        Ok(min.zip(max))
    }
}
