// SPDX-License-Identifier: Apache-2.0

use std::cmp::Ordering;
use std::collections::BTreeMap;

use saaskart_model::{
    Category, CategoryId, Company, DirectorySnapshot, MetricField, ParseError, ScalarColumn,
    SortDirection, SortKey, SortSpec, TextColumn,
};

use crate::filters::{contains_ignore_ascii_case, CompanyRecord};
use crate::options::FacetOption;
use crate::planner::{CompiledQuery, Predicate};
use crate::store::{CompanyStore, DistinctSource, StoreError};

/// [`CompanyStore`] over an in-process snapshot. Ordering and matching
/// follow the SQLite adapter: byte-order names, ASCII case folding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    categories: BTreeMap<CategoryId, Category>,
    companies: Vec<Company>,
}

impl MemoryStore {
    pub fn from_snapshot(snapshot: DirectorySnapshot) -> Result<Self, ParseError> {
        snapshot.validate()?;
        Ok(Self {
            categories: snapshot
                .categories
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
            companies: snapshot.companies,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.companies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    fn record(&self, company: &Company) -> CompanyRecord {
        let mut categories: Vec<Category> = company
            .categories
            .iter()
            .filter_map(|id| self.categories.get(id).cloned())
            .collect();
        categories.sort_by(|a, b| a.id.cmp(&b.id));
        categories.dedup_by(|a, b| a.id == b.id);
        CompanyRecord {
            company: company.summary(),
            metrics: company.metrics.clone(),
            categories,
        }
    }
}

fn text_value(company: &Company, column: TextColumn) -> Option<&str> {
    match column {
        TextColumn::Name => Some(company.name.as_str()),
        TextColumn::Description => company.description.as_deref(),
    }
}

fn scalar_value(company: &Company, column: ScalarColumn) -> Option<String> {
    match column {
        ScalarColumn::Country => company.country.clone(),
        ScalarColumn::State => company.state.clone(),
        ScalarColumn::City => company.city.clone(),
        ScalarColumn::YearFounded => company.year_founded.map(|y| y.to_string()),
    }
}

fn matches(company: &Company, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::TextMatch { columns, term } => columns.iter().any(|col| {
            text_value(company, *col).is_some_and(|v| contains_ignore_ascii_case(v, term))
        }),
        Predicate::ScalarIn { column, values } => {
            scalar_value(company, *column).is_some_and(|v| values.contains(&v))
        }
        Predicate::CategoryIn { category_ids } => company
            .categories
            .iter()
            .any(|c| category_ids.iter().any(|id| id == c.as_str())),
        Predicate::MetricBetween { metric, min, max } => company
            .metrics
            .get(*metric)
            .is_some_and(|v| *min <= v && v <= *max),
    }
}

fn first_category(company: &Company) -> Option<&CategoryId> {
    company.categories.iter().min()
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Missing keys sort after present ones regardless of direction.
fn nulls_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &Company, b: &Company, sort: &SortSpec) -> Ordering {
    let primary = match sort.key {
        SortKey::Name => directed(a.name.cmp(&b.name), sort.direction),
        SortKey::Metric(metric) => nulls_last(a.metrics.get(metric), b.metrics.get(metric), |x, y| {
            directed(x.total_cmp(&y), sort.direction)
        }),
        SortKey::Category => nulls_last(first_category(a), first_category(b), |x, y| {
            directed(x.cmp(y), sort.direction)
        }),
    };
    primary
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

impl CompanyStore for MemoryStore {
    fn query_companies(&self, query: &CompiledQuery) -> Result<Vec<CompanyRecord>, StoreError> {
        let mut hits: Vec<&Company> = self
            .companies
            .iter()
            .filter(|c| query.predicates.iter().all(|p| matches(c, p)))
            .collect();
        hits.sort_by(|a, b| compare(a, b, &query.sort));
        Ok(hits
            .into_iter()
            .take(query.limit)
            .map(|c| self.record(c))
            .collect())
    }

    fn distinct_values(&self, source: DistinctSource) -> Result<Vec<FacetOption>, StoreError> {
        let mut out: BTreeMap<String, String> = BTreeMap::new();
        for company in &self.companies {
            match source {
                DistinctSource::Scalar(column) => {
                    if let Some(v) = scalar_value(company, column) {
                        if !v.trim().is_empty() {
                            out.insert(v.clone(), v);
                        }
                    }
                }
                DistinctSource::Category => {
                    for category in company
                        .categories
                        .iter()
                        .filter_map(|id| self.categories.get(id))
                    {
                        out.insert(
                            category.id.as_str().to_string(),
                            category.name.clone(),
                        );
                    }
                }
            }
        }
        Ok(out
            .into_iter()
            .map(|(value, label)| FacetOption { value, label })
            .collect())
    }

    fn metric_bounds(&self, metric: MetricField) -> Result<Option<(f64, f64)>, StoreError> {
        let mut bounds: Option<(f64, f64)> = None;
        for value in self.companies.iter().filter_map(|c| c.metrics.get(metric)) {
            bounds = Some(match bounds {
                None => (value, value),
                Some((min, max)) => (min.min(value), max.max(value)),
            });
        }
        Ok(bounds)
    }
}
