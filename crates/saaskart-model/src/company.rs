// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use crate::metric::CompanyMetrics;

pub const ID_MAX_LEN: usize = 128;
pub const NAME_MAX_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooLong(&'static str, usize),
    NonFiniteMetric(&'static str),
    Duplicate(&'static str, String),
    UnknownCategory(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::NonFiniteMetric(name) => write!(f, "metric {name} must be a finite number"),
            Self::Duplicate(kind, id) => write!(f, "duplicate {kind} `{id}`"),
            Self::UnknownCategory(id) => write!(f, "company references unknown category `{id}`"),
        }
    }
}

impl std::error::Error for ParseError {}

fn validate_id(kind: &'static str, input: &str) -> Result<(), ParseError> {
    if input.is_empty() {
        return Err(ParseError::Empty(kind));
    }
    if input.trim() != input {
        return Err(ParseError::Trimmed(kind));
    }
    if input.len() > ID_MAX_LEN {
        return Err(ParseError::TooLong(kind, ID_MAX_LEN));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompanyId(String);

impl CompanyId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        validate_id("company_id", input)?;
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CompanyId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_id("company_id", &value)?;
        Ok(Self(value))
    }
}

impl From<CompanyId> for String {
    fn from(value: CompanyId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryId(String);

impl CategoryId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        validate_id("category_id", input)?;
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategoryId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_id("category_id", &value)?;
        Ok(Self(value))
    }
}

impl From<CategoryId> for String {
    fn from(value: CategoryId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Public shape of a company in search results: every descriptive field
/// except the heavy free-text description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanySummary {
    pub id: CompanyId,
    pub name: String,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub year_founded: Option<i32>,
    pub claimed: bool,
    pub domain: Option<String>,
    pub logo_url: Option<String>,
}

/// A company as maintained by the admin surface, with its metrics record and
/// category associations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub year_founded: Option<i32>,
    #[serde(default)]
    pub claimed: bool,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub metrics: CompanyMetrics,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
}

impl Company {
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.name.trim().is_empty() {
            return Err(ParseError::Empty("company name"));
        }
        if self.name.len() > NAME_MAX_LEN {
            return Err(ParseError::TooLong("company name", NAME_MAX_LEN));
        }
        self.metrics.validate()
    }

    #[must_use]
    pub fn summary(&self) -> CompanySummary {
        CompanySummary {
            id: self.id.clone(),
            name: self.name.clone(),
            country: self.country.clone(),
            state: self.state.clone(),
            city: self.city.clone(),
            year_founded: self.year_founded,
            claimed: self.claimed,
            domain: self.domain.clone(),
            logo_url: self.logo_url.clone(),
        }
    }
}

/// Import document: the full category list plus every company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectorySnapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub companies: Vec<Company>,
}

impl DirectorySnapshot {
    /// Checks ids are unique and every category reference resolves.
    pub fn validate(&self) -> Result<(), ParseError> {
        let mut category_ids = BTreeSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(ParseError::Empty("category name"));
            }
            if !category_ids.insert(category.id.as_str()) {
                return Err(ParseError::Duplicate(
                    "category",
                    category.id.as_str().to_string(),
                ));
            }
        }
        let mut company_ids = BTreeSet::new();
        for company in &self.companies {
            company.validate()?;
            if !company_ids.insert(company.id.as_str()) {
                return Err(ParseError::Duplicate(
                    "company",
                    company.id.as_str().to_string(),
                ));
            }
            if let Some(missing) = company
                .categories
                .iter()
                .find(|id| !category_ids.contains(id.as_str()))
            {
                return Err(ParseError::UnknownCategory(missing.as_str().to_string()));
            }
        }
        Ok(())
    }
}
