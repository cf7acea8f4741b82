// SPDX-License-Identifier: Apache-2.0

//! Closed registry of the facets a company search understands.
//!
//! The table is static: adding a facet is a code change, never a data
//! migration. Request parameters whose names are not listed here are ignored
//! by the decoder.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::metric::MetricField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    Range,
    Multiselect,
    Text,
}

/// Free-text columns searched by the `query` facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextColumn {
    Name,
    Description,
}

impl TextColumn {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
        }
    }
}

/// Scalar company columns usable as multiselect facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarColumn {
    Country,
    State,
    City,
    YearFounded,
}

impl ScalarColumn {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::State => "state",
            Self::City => "city",
            Self::YearFounded => "year_founded",
        }
    }
}

/// What a facet targets in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "target", content = "column", rename_all = "snake_case")]
pub enum FacetBinding {
    Text(&'static [TextColumn]),
    Scalar(ScalarColumn),
    Category,
    Metric(MetricField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FacetName {
    Query,
    Countries,
    States,
    Cities,
    Founded,
    Categories,
    Metric(MetricField),
}

impl FacetName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Countries => "countries",
            Self::States => "states",
            Self::Cities => "cities",
            Self::Founded => "founded",
            Self::Categories => "categories",
            Self::Metric(metric) => metric.as_str(),
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        lookup(raw).map(|facet| facet.name)
    }
}

impl Display for FacetName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FacetName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FacetName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown facet `{raw}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub name: FacetName,
    pub kind: FacetKind,
    pub title: &'static str,
    pub binding: FacetBinding,
}

const fn metric_facet(metric: MetricField) -> Facet {
    Facet {
        name: FacetName::Metric(metric),
        kind: FacetKind::Range,
        title: metric.title(),
        binding: FacetBinding::Metric(metric),
    }
}

const fn scalar_facet(name: FacetName, title: &'static str, column: ScalarColumn) -> Facet {
    Facet {
        name,
        kind: FacetKind::Multiselect,
        title,
        binding: FacetBinding::Scalar(column),
    }
}

pub const FACETS: &[Facet] = &[
    Facet {
        name: FacetName::Query,
        kind: FacetKind::Text,
        title: "Search",
        binding: FacetBinding::Text(&[TextColumn::Name, TextColumn::Description]),
    },
    scalar_facet(FacetName::Countries, "Country", ScalarColumn::Country),
    scalar_facet(FacetName::States, "State", ScalarColumn::State),
    scalar_facet(FacetName::Cities, "City", ScalarColumn::City),
    scalar_facet(FacetName::Founded, "Year founded", ScalarColumn::YearFounded),
    Facet {
        name: FacetName::Categories,
        kind: FacetKind::Multiselect,
        title: "Category",
        binding: FacetBinding::Category,
    },
    metric_facet(MetricField::Revenue),
    metric_facet(MetricField::Mrr),
    metric_facet(MetricField::Arr),
    metric_facet(MetricField::Valuation),
    metric_facet(MetricField::Funding),
    metric_facet(MetricField::Customers),
    metric_facet(MetricField::TeamSize),
    metric_facet(MetricField::GrowthRate),
    metric_facet(MetricField::ChurnRate),
    metric_facet(MetricField::NetRetention),
    metric_facet(MetricField::GrossMargin),
    metric_facet(MetricField::Profit),
    metric_facet(MetricField::Ebitda),
    metric_facet(MetricField::BurnRate),
    metric_facet(MetricField::RunwayMonths),
    metric_facet(MetricField::Arpu),
    metric_facet(MetricField::Ltv),
    metric_facet(MetricField::Cac),
    metric_facet(MetricField::ActiveUsers),
    metric_facet(MetricField::MonthlyVisits),
    metric_facet(MetricField::Downloads),
];

/// Resolves a request parameter name to its registry entry.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static Facet> {
    FACETS.iter().find(|facet| facet.name.as_str() == name)
}
