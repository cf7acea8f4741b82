// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Numeric facts stored on the one-to-one metrics record of a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Revenue,
    Mrr,
    Arr,
    Valuation,
    Funding,
    Customers,
    TeamSize,
    GrowthRate,
    ChurnRate,
    NetRetention,
    GrossMargin,
    Profit,
    Ebitda,
    BurnRate,
    RunwayMonths,
    Arpu,
    Ltv,
    Cac,
    ActiveUsers,
    MonthlyVisits,
    Downloads,
}

impl MetricField {
    pub const ALL: [Self; 21] = [
        Self::Revenue,
        Self::Mrr,
        Self::Arr,
        Self::Valuation,
        Self::Funding,
        Self::Customers,
        Self::TeamSize,
        Self::GrowthRate,
        Self::ChurnRate,
        Self::NetRetention,
        Self::GrossMargin,
        Self::Profit,
        Self::Ebitda,
        Self::BurnRate,
        Self::RunwayMonths,
        Self::Arpu,
        Self::Ltv,
        Self::Cac,
        Self::ActiveUsers,
        Self::MonthlyVisits,
        Self::Downloads,
    ];

    /// Column name on the metrics table; also the facet and sort key name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Mrr => "mrr",
            Self::Arr => "arr",
            Self::Valuation => "valuation",
            Self::Funding => "funding",
            Self::Customers => "customers",
            Self::TeamSize => "team_size",
            Self::GrowthRate => "growth_rate",
            Self::ChurnRate => "churn_rate",
            Self::NetRetention => "net_retention",
            Self::GrossMargin => "gross_margin",
            Self::Profit => "profit",
            Self::Ebitda => "ebitda",
            Self::BurnRate => "burn_rate",
            Self::RunwayMonths => "runway_months",
            Self::Arpu => "arpu",
            Self::Ltv => "ltv",
            Self::Cac => "cac",
            Self::ActiveUsers => "active_users",
            Self::MonthlyVisits => "monthly_visits",
            Self::Downloads => "downloads",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::Mrr => "MRR",
            Self::Arr => "ARR",
            Self::Valuation => "Valuation",
            Self::Funding => "Funding",
            Self::Customers => "Customers",
            Self::TeamSize => "Team size",
            Self::GrowthRate => "Growth rate",
            Self::ChurnRate => "Churn rate",
            Self::NetRetention => "Net retention",
            Self::GrossMargin => "Gross margin",
            Self::Profit => "Profit",
            Self::Ebitda => "EBITDA",
            Self::BurnRate => "Burn rate",
            Self::RunwayMonths => "Runway (months)",
            Self::Arpu => "ARPU",
            Self::Ltv => "LTV",
            Self::Cac => "CAC",
            Self::ActiveUsers => "Active users",
            Self::MonthlyVisits => "Monthly visits",
            Self::Downloads => "Downloads",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == raw)
    }
}

/// Metrics record of a company. Every fact is nullable; a missing fact is
/// `None`, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompanyMetrics {
    pub revenue: Option<f64>,
    pub mrr: Option<f64>,
    pub arr: Option<f64>,
    pub valuation: Option<f64>,
    pub funding: Option<f64>,
    pub customers: Option<f64>,
    pub team_size: Option<f64>,
    pub growth_rate: Option<f64>,
    pub churn_rate: Option<f64>,
    pub net_retention: Option<f64>,
    pub gross_margin: Option<f64>,
    pub profit: Option<f64>,
    pub ebitda: Option<f64>,
    pub burn_rate: Option<f64>,
    pub runway_months: Option<f64>,
    pub arpu: Option<f64>,
    pub ltv: Option<f64>,
    pub cac: Option<f64>,
    pub active_users: Option<f64>,
    pub monthly_visits: Option<f64>,
    pub downloads: Option<f64>,
}

impl CompanyMetrics {
    #[must_use]
    pub const fn get(&self, field: MetricField) -> Option<f64> {
        match field {
            MetricField::Revenue => self.revenue,
            MetricField::Mrr => self.mrr,
            MetricField::Arr => self.arr,
            MetricField::Valuation => self.valuation,
            MetricField::Funding => self.funding,
            MetricField::Customers => self.customers,
            MetricField::TeamSize => self.team_size,
            MetricField::GrowthRate => self.growth_rate,
            MetricField::ChurnRate => self.churn_rate,
            MetricField::NetRetention => self.net_retention,
            MetricField::GrossMargin => self.gross_margin,
            MetricField::Profit => self.profit,
            MetricField::Ebitda => self.ebitda,
            MetricField::BurnRate => self.burn_rate,
            MetricField::RunwayMonths => self.runway_months,
            MetricField::Arpu => self.arpu,
            MetricField::Ltv => self.ltv,
            MetricField::Cac => self.cac,
            MetricField::ActiveUsers => self.active_users,
            MetricField::MonthlyVisits => self.monthly_visits,
            MetricField::Downloads => self.downloads,
        }
    }

    pub fn set(&mut self, field: MetricField, value: Option<f64>) {
        let slot = match field {
            MetricField::Revenue => &mut self.revenue,
            MetricField::Mrr => &mut self.mrr,
            MetricField::Arr => &mut self.arr,
            MetricField::Valuation => &mut self.valuation,
            MetricField::Funding => &mut self.funding,
            MetricField::Customers => &mut self.customers,
            MetricField::TeamSize => &mut self.team_size,
            MetricField::GrowthRate => &mut self.growth_rate,
            MetricField::ChurnRate => &mut self.churn_rate,
            MetricField::NetRetention => &mut self.net_retention,
            MetricField::GrossMargin => &mut self.gross_margin,
            MetricField::Profit => &mut self.profit,
            MetricField::Ebitda => &mut self.ebitda,
            MetricField::BurnRate => &mut self.burn_rate,
            MetricField::RunwayMonths => &mut self.runway_months,
            MetricField::Arpu => &mut self.arpu,
            MetricField::Ltv => &mut self.ltv,
            MetricField::Cac => &mut self.cac,
            MetricField::ActiveUsers => &mut self.active_users,
            MetricField::MonthlyVisits => &mut self.monthly_visits,
            MetricField::Downloads => &mut self.downloads,
        };
        *slot = value;
    }

    /// Rejects NaN and infinite facts; they cannot be ordered or range-matched.
    pub fn validate(&self) -> Result<(), crate::ParseError> {
        for field in MetricField::ALL {
            if self.get(field).is_some_and(|v| !v.is_finite()) {
                return Err(crate::ParseError::NonFiniteMetric(field.as_str()));
            }
        }
        Ok(())
    }
}
