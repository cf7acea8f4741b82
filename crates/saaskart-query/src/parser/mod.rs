// SPDX-License-Identifier: Apache-2.0

//! Raw request parameters to typed facet values.
//!
//! Decoding is total: malformed or unknown input is dropped, never reported.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use saaskart_model::{lookup, FacetKind, FacetValues, FilterValue, RangeFilter};
use serde::{Deserialize, Serialize};

use crate::filters::normalize_text_term;

pub const SORT_PARAM: &str = "sort";
pub const LIMIT_PARAM: &str = "limit";

/// A parameter sent once or repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    One(String),
    Many(Vec<String>),
}

impl RawValue {
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::One(v) => std::slice::from_ref(v),
            Self::Many(vs) => vs,
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.values().first().map(String::as_str)
    }

    fn push(&mut self, value: String) {
        match self {
            Self::One(first) => {
                let first = std::mem::take(first);
                *self = Self::Many(vec![first, value]);
            }
            Self::Many(vs) => vs.push(value),
        }
    }
}

pub type RawParams = BTreeMap<String, RawValue>;

/// Collects `key=value` pairs, turning repeated keys into `RawValue::Many`
/// in arrival order.
pub fn raw_params_from_pairs<I, K, V>(pairs: I) -> RawParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut out = RawParams::new();
    for (key, value) in pairs {
        match out.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(RawValue::One(value.into()));
            }
            Entry::Occupied(mut slot) => slot.get_mut().push(value.into()),
        }
    }
    out
}

/// Decodes every registered facet present in `raw`. Reserved keys and
/// unknown names are skipped; so is any facet whose value does not decode.
#[must_use]
pub fn decode_params(raw: &RawParams, max_text_len: usize) -> FacetValues {
    let mut out = FacetValues::new();
    for (key, value) in raw {
        if key == SORT_PARAM || key == LIMIT_PARAM {
            continue;
        }
        let Some(facet) = lookup(key) else {
            continue;
        };
        let decoded = match facet.kind {
            FacetKind::Text => value
                .first()
                .and_then(|v| normalize_text_term(v, max_text_len))
                .map(FilterValue::Text),
            FacetKind::Multiselect => decode_set(value.values()).map(FilterValue::Set),
            FacetKind::Range => value.first().and_then(parse_range).map(FilterValue::Range),
        };
        if let Some(decoded) = decoded {
            out.insert(facet.name, decoded);
        }
    }
    out
}

fn decode_set(values: &[String]) -> Option<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if value.is_empty() || out.iter().any(|seen| seen == value) {
            continue;
        }
        out.push(value.to_string());
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Parses `"<min>-<max>"` with both bounds non-negative decimals. Anything
/// else, including `min > max`, is `None`.
#[must_use]
pub fn parse_range(raw: &str) -> Option<RangeFilter> {
    let (min, max) = raw.split_once('-')?;
    RangeFilter::new(parse_decimal(min)?, parse_decimal(max)?)
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let mut digits = 0_usize;
    let mut dots = 0_usize;
    for c in raw.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{decode_params, parse_range, raw_params_from_pairs, RawValue};
    use saaskart_model::{FacetName, FilterValue, MetricField};

    #[test]
    fn repeated_pairs_become_many() {
        let raw = raw_params_from_pairs([("countries", "US"), ("query", "crm"), ("countries", "DE")]);
        assert_eq!(
            raw.get("countries"),
            Some(&RawValue::Many(vec!["US".to_string(), "DE".to_string()]))
        );
        assert_eq!(raw.get("query"), Some(&RawValue::One("crm".to_string())));
    }

    #[test]
    fn range_grammar() {
        let r = parse_range("100-500").expect("range");
        assert_eq!((r.min(), r.max()), (100.0, 500.0));
        let r = parse_range("0.5-1.25").expect("range");
        assert_eq!((r.min(), r.max()), (0.5, 1.25));
        assert!(parse_range(" 1 - 2 ").is_some());
        for bad in [
            "abc", "100", "-100-5", "5-", "-5", "1-2-3", "1e3-5", "inf-5", "NaN-1", ".-1",
            "1..2-3", "500-100", "",
        ] {
            assert!(parse_range(bad).is_none(), "{bad}");
        }
    }

    #[test]
    fn decodes_each_kind() {
        let raw = raw_params_from_pairs([
            ("query", "  analytics "),
            ("countries", "US"),
            ("countries", " "),
            ("countries", "DE"),
            ("countries", "US"),
            ("revenue", "0-0"),
            ("mrr", "abc"),
            ("notAFacet", "x"),
            ("sort", "revenue"),
            ("limit", "10"),
        ]);
        let decoded = decode_params(&raw, 128);
        assert_eq!(decoded.len(), 3);
        assert_eq!(
            decoded.get(&FacetName::Query),
            Some(&FilterValue::Text("analytics".to_string()))
        );
        assert_eq!(
            decoded.get(&FacetName::Countries),
            Some(&FilterValue::Set(vec!["US".to_string(), "DE".to_string()]))
        );
        assert!(matches!(
            decoded.get(&FacetName::Metric(MetricField::Revenue)),
            Some(FilterValue::Range(r)) if r.is_unset()
        ));
        assert!(!decoded.contains_key(&FacetName::Metric(MetricField::Mrr)));
    }

    #[test]
    fn first_value_wins_for_text_and_range() {
        let raw = raw_params_from_pairs([
            ("query", "first"),
            ("query", "second"),
            ("revenue", "1-2"),
            ("revenue", "3-4"),
        ]);
        let decoded = decode_params(&raw, 128);
        assert_eq!(
            decoded.get(&FacetName::Query),
            Some(&FilterValue::Text("first".to_string()))
        );
        assert!(matches!(
            decoded.get(&FacetName::Metric(MetricField::Revenue)),
            Some(FilterValue::Range(r)) if r.min() == 1.0 && r.max() == 2.0
        ));
    }

    #[test]
    fn blank_inputs_are_omitted() {
        let raw = raw_params_from_pairs([("query", "   "), ("cities", ""), ("states", " ")]);
        assert!(decode_params(&raw, 128).is_empty());
    }
}
