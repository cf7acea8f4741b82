// SPDX-License-Identifier: Apache-2.0

use saaskart_policies::{
    evaluate_policy, validate_policy_config, PolicyConfig, PolicySeverity, MAX_ALLOWED_LIMIT,
};

fn violation_ids(cfg: &PolicyConfig) -> Vec<&'static str> {
    evaluate_policy(cfg).into_iter().map(|v| v.id).collect()
}

#[test]
fn default_policy_has_no_violations() {
    assert!(evaluate_policy(&PolicyConfig::default()).is_empty());
    assert!(validate_policy_config(&PolicyConfig::default()).is_ok());
}

#[test]
fn default_limit_must_be_allowed() {
    let mut cfg = PolicyConfig::default();
    cfg.search.default_limit = 30;
    assert_eq!(
        violation_ids(&cfg),
        vec!["policy.search.default_limit.allowed"]
    );
    let err = validate_policy_config(&cfg).expect_err("must fail");
    assert!(err.0.contains("policy.search.default_limit.allowed"));
    assert!(err.0.contains("(30)"));
}

#[test]
fn allowed_limits_must_be_ascending_and_distinct() {
    let mut cfg = PolicyConfig::default();
    cfg.search.allowed_limits = vec![10, 50, 25, 25];
    assert!(violation_ids(&cfg).contains(&"policy.search.allowed_limits.ascending"));
}

#[test]
fn allowed_limits_must_be_non_empty_and_positive() {
    let mut cfg = PolicyConfig::default();
    cfg.search.allowed_limits = Vec::new();
    let ids = violation_ids(&cfg);
    assert!(ids.contains(&"policy.search.allowed_limits.non_empty"));
    assert!(ids.contains(&"policy.search.default_limit.allowed"));

    cfg.search.allowed_limits = vec![0, 25];
    assert!(violation_ids(&cfg).contains(&"policy.search.allowed_limits.positive"));
}

#[test]
fn allowed_limits_are_capped() {
    let mut cfg = PolicyConfig::default();
    cfg.search.allowed_limits = vec![25, MAX_ALLOWED_LIMIT + 1];
    assert!(violation_ids(&cfg).contains(&"policy.search.allowed_limits.max"));
}

#[test]
fn text_length_must_be_bounded() {
    let mut cfg = PolicyConfig::default();
    cfg.search.max_text_len = 0;
    assert_eq!(violation_ids(&cfg), vec!["policy.search.max_text_len.range"]);
    cfg.search.max_text_len = 10_000;
    assert_eq!(violation_ids(&cfg), vec!["policy.search.max_text_len.range"]);
}

#[test]
fn warnings_do_not_fail_validation() {
    let mut cfg = PolicyConfig::default();
    cfg.cache.search_max_age_secs = 0;
    cfg.telemetry.log_compiled_sql = true;
    let violations = evaluate_policy(&cfg);
    assert_eq!(violations.len(), 2);
    assert!(violations
        .iter()
        .all(|v| v.severity == PolicySeverity::Warning));
    assert!(validate_policy_config(&cfg).is_ok());
}

#[test]
fn excessive_cache_age_is_an_error() {
    let mut cfg = PolicyConfig::default();
    cfg.cache.facet_options_max_age_secs = 90_000;
    assert_eq!(
        violation_ids(&cfg),
        vec!["policy.cache.facet_options_max_age.max"]
    );
}

#[test]
fn default_sort_must_name_a_sortable_key() {
    let mut cfg = PolicyConfig::default();
    cfg.search.default_sort = "revnue".to_string();
    assert_eq!(
        violation_ids(&cfg),
        vec!["policy.search.default_sort.sortable"]
    );
    let err = validate_policy_config(&cfg).expect_err("typo must fail");
    assert!(err.0.contains("policy.search.default_sort.sortable"));
    assert!(err.0.contains("(revnue)"));

    cfg.search.default_sort = "countries".to_string();
    assert_eq!(
        violation_ids(&cfg),
        vec!["policy.search.default_sort.sortable"]
    );

    cfg.search.default_sort = "   ".to_string();
    assert_eq!(
        violation_ids(&cfg),
        vec!["policy.search.default_sort.non_empty"]
    );

    for sortable in ["name", "arr", "categories"] {
        cfg.search.default_sort = sortable.to_string();
        assert!(evaluate_policy(&cfg).is_empty(), "{sortable}");
    }
}
