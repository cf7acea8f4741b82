// SPDX-License-Identifier: Apache-2.0

mod common;

use std::collections::BTreeSet;

use common::{ids, large_directory, params, stores, stores_for};
use saaskart_query::{search, QueryLimits};

#[test]
fn search_is_idempotent() {
    for (label, store) in stores() {
        let raw = params(&[("countries", "US"), ("sort", "mrr")]);
        let a = search(store.as_ref(), &raw, &QueryLimits::default()).expect("search");
        let b = search(store.as_ref(), &raw, &QueryLimits::default()).expect("search");
        assert_eq!(a, b, "{label}");
    }
}

#[test]
fn adding_a_facet_only_narrows() {
    let narrowing: &[(&str, &str)] = &[
        ("countries", "US"),
        ("categories", "crm"),
        ("revenue", "500-6000000"),
        ("query", "o"),
        ("founded", "2015"),
    ];
    for (label, store) in stores() {
        let mut applied: Vec<(&str, &str)> = vec![("limit", "100")];
        let mut previous: BTreeSet<String> = ids(store.as_ref(), &applied).into_iter().collect();
        for facet in narrowing {
            applied.push(*facet);
            let current: BTreeSet<String> = ids(store.as_ref(), &applied).into_iter().collect();
            assert!(current.is_subset(&previous), "{label}: {facet:?}");
            previous = current;
        }
        assert_eq!(
            previous.into_iter().collect::<Vec<_>>(),
            vec!["echo".to_string()],
            "{label}"
        );
    }
}

#[test]
fn zero_zero_range_is_no_filter() {
    for (label, store) in stores() {
        assert_eq!(
            ids(store.as_ref(), &[("revenue", "0-0")]),
            ids(store.as_ref(), &[]),
            "{label}"
        );
        assert_eq!(
            ids(store.as_ref(), &[("revenue", "0-0"), ("sort", "name")]).len(),
            6,
            "{label}"
        );
    }
}

#[test]
fn default_order_is_revenue_desc_nulls_last() {
    for (label, store) in stores() {
        assert_eq!(
            ids(store.as_ref(), &[]),
            vec!["cirrus", "acme", "bolt", "echo", "delta", "foxtrot"],
            "{label}"
        );
    }
}

#[test]
fn explicit_sorts() {
    for (label, store) in stores() {
        assert_eq!(
            ids(store.as_ref(), &[("sort", "name")]),
            vec!["acme", "bolt", "cirrus", "delta", "echo", "foxtrot"],
            "{label}"
        );
        assert_eq!(
            ids(store.as_ref(), &[("sort", "bogus")]),
            ids(store.as_ref(), &[("sort", "name")]),
            "{label}"
        );
        assert_eq!(
            ids(store.as_ref(), &[("sort", "mrr")]),
            vec!["acme", "delta", "bolt", "cirrus", "echo", "foxtrot"],
            "{label}"
        );
        assert_eq!(
            ids(store.as_ref(), &[("sort", "categories")]),
            vec!["acme", "bolt", "echo", "cirrus", "delta", "foxtrot"],
            "{label}"
        );
    }
}

#[test]
fn multiselect_results_are_members() {
    for (label, store) in stores() {
        let raw = params(&[("countries", "US"), ("countries", "GB"), ("limit", "100")]);
        let response = search(store.as_ref(), &raw, &QueryLimits::default()).expect("search");
        assert_eq!(response.companies.len(), 4, "{label}");
        for record in &response.companies {
            let country = record.company.country.as_deref();
            assert!(matches!(country, Some("US" | "GB")), "{label}: {country:?}");
        }

        let raw = params(&[("categories", "crm")]);
        let response = search(store.as_ref(), &raw, &QueryLimits::default()).expect("search");
        assert_eq!(response.companies.len(), 2, "{label}");
        for record in &response.companies {
            assert!(
                record.categories.iter().any(|c| c.id.as_str() == "crm"),
                "{label}"
            );
        }

        assert_eq!(
            ids(store.as_ref(), &[("founded", "2015"), ("sort", "name")]),
            vec!["acme", "echo"],
            "{label}"
        );
    }
}

#[test]
fn unknown_and_malformed_params_are_ignored() {
    for (label, store) in stores() {
        let baseline = ids(store.as_ref(), &[]);
        assert_eq!(ids(store.as_ref(), &[("notAFacet", "x")]), baseline, "{label}");
        assert_eq!(ids(store.as_ref(), &[("revenue", "abc")]), baseline, "{label}");
        assert_eq!(ids(store.as_ref(), &[("revenue", "100")]), baseline, "{label}");
        assert_eq!(ids(store.as_ref(), &[("revenue", "900-100")]), baseline, "{label}");
        assert_eq!(ids(store.as_ref(), &[("query", "   ")]), baseline, "{label}");
    }
}

#[test]
fn text_search_matches_name_or_description_literally() {
    for (label, store) in stores() {
        assert_eq!(ids(store.as_ref(), &[("query", "ANALYTICS")]), vec!["acme"], "{label}");
        assert_eq!(ids(store.as_ref(), &[("query", "automated")]), vec!["delta"], "{label}");
        assert_eq!(ids(store.as_ref(), &[("query", "100%")]), vec!["delta"], "{label}");
        assert_eq!(ids(store.as_ref(), &[("query", "%")]), vec!["delta"], "{label}");
        assert!(ids(store.as_ref(), &[("query", "_")]).is_empty(), "{label}");
        assert!(ids(store.as_ref(), &[("query", "zzz")]).is_empty(), "{label}");
    }
}

#[test]
fn range_filter_is_inclusive_and_excludes_nulls() {
    for (label, store) in stores() {
        assert_eq!(
            ids(store.as_ref(), &[("revenue", "2000000-5000000")]),
            vec!["acme", "bolt"],
            "{label}"
        );
        assert_eq!(ids(store.as_ref(), &[("mrr", "0-10000")]), vec!["delta"], "{label}");
    }
}

#[test]
fn limit_is_enforced() {
    for (label, store) in stores_for(large_directory()) {
        assert_eq!(ids(store.as_ref(), &[]).len(), 25, "{label}");
        assert_eq!(ids(store.as_ref(), &[("limit", "10")]).len(), 10, "{label}");
        assert_eq!(ids(store.as_ref(), &[("limit", "49")]).len(), 25, "{label}");
        assert_eq!(ids(store.as_ref(), &[("limit", "1")]).len(), 10, "{label}");
        assert_eq!(ids(store.as_ref(), &[("limit", "1000")]).len(), 30, "{label}");
        assert_eq!(ids(store.as_ref(), &[("limit", "x")]).len(), 25, "{label}");
        assert_eq!(
            ids(store.as_ref(), &[("limit", "10")]).first().map(String::as_str),
            Some("co-29"),
            "{label}"
        );
    }
}

#[test]
fn rows_carry_metrics_and_categories_but_not_description() {
    for (label, store) in stores() {
        let raw = params(&[("query", "acme")]);
        let response = search(store.as_ref(), &raw, &QueryLimits::default()).expect("search");
        let record = response.companies.first().expect("acme");
        assert_eq!(record.metrics.mrr, Some(400_000.0), "{label}");
        let categories: Vec<(&str, &str)> = record
            .categories
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();
        assert_eq!(
            categories,
            vec![("analytics", "Analytics"), ("devtools", "Developer Tools")],
            "{label}"
        );
        let json = serde_json::to_value(record).expect("json");
        assert!(json["company"].get("description").is_none(), "{label}");
        assert_eq!(json["company"]["claimed"], true, "{label}");
    }
}

#[test]
fn empty_result_is_not_an_error() {
    for (label, store) in stores() {
        let raw = params(&[("countries", "FR")]);
        let response = search(store.as_ref(), &raw, &QueryLimits::default()).expect("search");
        assert!(response.companies.is_empty(), "{label}");
    }
}
