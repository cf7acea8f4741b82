// SPDX-License-Identifier: Apache-2.0

use saaskart_model::{CompanyId, CompanyMetrics, CompanySummary, MetricField};

use crate::store::StoreError;

/// Column offset of the first metric in a company select list.
pub const METRIC_OFFSET: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct RawCompanyRow {
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub year_founded: Option<i64>,
    pub claimed: i64,
    pub domain: Option<String>,
    pub logo_url: Option<String>,
    pub metrics: CompanyMetrics,
}

impl RawCompanyRow {
    pub fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let mut metrics = CompanyMetrics::default();
        for (idx, field) in MetricField::ALL.into_iter().enumerate() {
            metrics.set(field, row.get::<_, Option<f64>>(METRIC_OFFSET + idx)?);
        }
        Ok(Self {
            id: row.get::<_, String>(0)?,
            name: row.get::<_, String>(1)?,
            country: row.get::<_, Option<String>>(2)?,
            state: row.get::<_, Option<String>>(3)?,
            city: row.get::<_, Option<String>>(4)?,
            year_founded: row.get::<_, Option<i64>>(5)?,
            claimed: row.get::<_, i64>(6)?,
            domain: row.get::<_, Option<String>>(7)?,
            logo_url: row.get::<_, Option<String>>(8)?,
            metrics,
        })
    }

    pub fn into_parts(self) -> Result<(CompanySummary, CompanyMetrics), StoreError> {
        let id = CompanyId::parse(&self.id)
            .map_err(|e| StoreError(format!("stored company id `{}`: {e}", self.id)))?;
        let year_founded = self
            .year_founded
            .map(i32::try_from)
            .transpose()
            .map_err(|_| StoreError(format!("company `{}` has out-of-range year", self.id)))?;
        Ok((
            CompanySummary {
                id,
                name: self.name,
                country: self.country,
                state: self.state,
                city: self.city,
                year_founded,
                claimed: self.claimed != 0,
                domain: self.domain,
                logo_url: self.logo_url,
            },
            self.metrics,
        ))
    }
}
