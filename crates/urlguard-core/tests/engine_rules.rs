//! Filter engine behaviour over rule sequences.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use urlguard_core::{evaluate, Decision, PatternField, Rule, RuleSet};

fn both(path: &str, principal: &str, rules: &[Rule]) -> bool {
    let loose = evaluate(path, principal, rules);
    let compiled = RuleSet::compile(rules.to_vec()).evaluate(path, principal);
    assert_eq!(loose, compiled, "free fn and RuleSet disagree on {path} / {principal}");
    loose
}

#[test]
fn literal_exclusion_exempts() {
    let rules = vec![Rule::new(".*secrets.*", "alice")];
    assert!(!both("/app/secrets/view", "alice", &rules));
    assert!(both("/app/secrets/view", "bob", &rules));
}

#[test]
fn pattern_exclusion_exempts() {
    let rules = vec![Rule::new(".*admin.*", "mic.*")];
    assert!(!both("/app/admin", "michael", &rules));
    assert!(both("/app/admin", "jack", &rules));
}

#[test]
fn empty_rule_set_never_blocks() {
    assert!(!both("/anything", "x", &[]));
    assert!(!both("", "", &[]));
    assert!(!RuleSet::default().evaluate("/admin", "anonymous"));
}

#[test]
fn broken_path_pattern_never_blocks() {
    let rules = vec![Rule::new("[invalid(", "")];
    assert!(!both("/anything", "x", &rules));

    let set = RuleSet::compile(rules);
    assert_eq!(set.diagnostics().len(), 1);
    assert_eq!(set.diagnostics()[0].field, PatternField::Path);
    assert_eq!(set.diagnostics()[0].rule, 0);
}

#[test]
fn broken_rule_does_not_stop_later_rules() {
    let rules = vec![Rule::new("[invalid(", ""), Rule::new("/admin.*", "root")];
    assert!(both("/admin/users", "bob", &rules));
    assert_eq!(
        RuleSet::compile(rules).decide("/admin/users", "bob"),
        Decision::Block { rule: 1 }
    );
}

#[test]
fn broken_exclusion_token_only_loses_itself() {
    let rules = vec![Rule::new("/admin.*", "we(ird mic.* alice")];
    assert!(!both("/admin", "michael", &rules));
    assert!(!both("/admin", "alice", &rules));
    assert!(!both("/admin", "we(ird", &rules));
    assert!(both("/admin", "weird", &rules));

    let set = RuleSet::compile(rules);
    assert_eq!(set.diagnostics().len(), 1);
    assert_eq!(set.diagnostics()[0].field, PatternField::Exclusion);
    assert_eq!(set.diagnostics()[0].pattern, "we(ird");
}

#[test]
fn path_match_is_whole_string() {
    let rules = vec![Rule::new("secrets", "")];
    assert!(!both("/app/secrets/view", "bob", &rules));
    assert!(both("secrets", "bob", &rules));
}

#[test]
fn exclusion_match_is_whole_string() {
    let rules = vec![Rule::new(".*", "ali")];
    assert!(both("/x", "alice", &rules));
    assert!(both("/x", "mali", &rules));
    assert!(!both("/x", "ali", &rules));
}

#[test]
fn blank_exclusions_exempt_nobody() {
    for exclusions in ["", "   ", "\t\n"] {
        let rules = vec![Rule::new(".*", exclusions)];
        assert!(both("/x", "alice", &rules));
        assert!(both("/x", "", &rules), "empty principal must not be exempt under {exclusions:?}");
    }
}

#[test]
fn repeated_whitespace_does_not_exempt_everyone() {
    let rules = vec![Rule::new(".*", "alice   bob")];
    assert!(!both("/x", "bob", &rules));
    assert!(both("/x", "carol", &rules));
    assert!(both("/x", "", &rules));
}

#[test]
fn matching_is_case_sensitive_without_normalisation() {
    let rules = vec![Rule::new("/Admin", "Alice")];
    assert!(!both("/admin", "bob", &rules));
    assert!(!both("/Admin/", "bob", &rules));
    assert!(!both("/Admin?x=1", "bob", &rules));
    assert!(both("/Admin", "alice", &rules));
    assert!(!both("/Admin", "Alice", &rules));
}

#[test]
fn first_blocking_rule_decides() {
    let r1 = Rule::new("/admin.*", "root");
    let r2 = Rule::new(".*", "bob");
    assert!(both("/admin", "bob", &[r1.clone(), r2.clone()]));
    assert_eq!(
        RuleSet::compile(vec![r1, r2]).decide("/admin", "bob"),
        Decision::Block { rule: 0 }
    );
}

#[test]
fn exempt_under_first_falls_through_to_next() {
    let rules = vec![Rule::new("/admin.*", "bob"), Rule::new(".*", "alice")];
    assert!(both("/admin", "bob", &rules));
    assert_eq!(
        RuleSet::compile(rules).decide("/admin", "bob"),
        Decision::Block { rule: 1 }
    );
}

#[test]
fn position_of_non_matching_rules_is_irrelevant() {
    let hit = Rule::new("/jobs/.*", "ci-.*");
    let miss_a = Rule::new("/admin", "");
    let miss_b = Rule::new("/login", "");

    let orders = [
        vec![hit.clone(), miss_a.clone(), miss_b.clone()],
        vec![miss_a.clone(), hit.clone(), miss_b.clone()],
        vec![miss_a.clone(), miss_b.clone(), hit.clone()],
    ];
    for rules in &orders {
        assert!(both("/jobs/build", "alice", rules));
        assert!(!both("/jobs/build", "ci-runner", rules));
    }
}

#[test]
fn dotted_usernames_match_literally_and_as_pattern() {
    let rules = vec![Rule::new(".*", "john.doe")];
    assert!(!both("/x", "john.doe", &rules));
    // `.` is a regex metacharacter; dual-mode matching keeps that behaviour.
    assert!(!both("/x", "johnxdoe", &rules));
}

#[test]
fn anonymous_sentinel_can_be_referenced() {
    let rules = vec![Rule::new("/public/.*", "anonymous .*")];
    assert!(!both("/public/readme", "anonymous", &rules));

    let rules = vec![Rule::new("/private/.*", "alice")];
    assert!(both("/private/x", "anonymous", &rules));
}

#[test]
fn whoami_rule_with_mixed_exclusions() {
    let rules = vec![Rule::new(".*whoAmI.*", "alice bob mic.*")];
    assert!(!both("/whoAmI/", "alice", &rules));
    assert!(!both("/whoAmI/", "bob", &rules));
    assert!(!both("/whoAmI/", "michael", &rules));
    assert!(both("/whoAmI/", "janice", &rules));
    assert!(both("/whoAmI/", "jack", &rules));
    assert!(both("/whoAmI/", "anonymous", &rules));
    assert!(!both("/configure", "anonymous", &rules));
}

#[test]
fn compile_strict_rejects_any_diagnostic() {
    let err = RuleSet::compile_strict(vec![Rule::new("/ok", "a(")]).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INVALID_PATTERN");

    let set = RuleSet::compile_strict(vec![Rule::new("/ok", "alice")]).expect("must compile");
    assert_eq!(set.len(), 1);
    assert!(set.diagnostics().is_empty());
}

#[test]
fn rules_deserialize_with_default_exclusions() {
    let rules: Vec<Rule> =
        serde_json::from_str(r#"[{"pattern": "/a"}, {"pattern": "/b", "exclusions": "x y"}]"#)
            .unwrap();
    assert_eq!(rules[0], Rule::new("/a", ""));
    assert_eq!(rules[1], Rule::new("/b", "x y"));

    let bad = serde_json::from_str::<Vec<Rule>>(r#"[{"pattern": "/a", "exclude": "x"}]"#);
    assert!(bad.is_err());
}

#[test]
fn verbose_patterns_with_trailing_comments_stay_active() {
    let rules = vec![Rule::new("(?x)/admin # protect admin", "(?x)mic.*#c")];
    let set = RuleSet::compile(rules.clone());
    assert!(set.diagnostics().is_empty(), "{:?}", set.diagnostics());

    assert!(both("/admin", "bob", &rules));
    assert!(!both("/admin", "michael", &rules));
    assert!(!both("/admin/users", "bob", &rules));
    assert!(!both("/x/admin", "bob", &rules));
}

#[test]
fn inline_flags_do_not_leak_past_the_anchors() {
    // Multi-line mode must not turn a whole-path match into a per-line one.
    let rules = vec![Rule::new("(?m)/admin", "")];
    assert!(both("/admin", "bob", &rules));
    assert!(!both("/admin\n/other", "bob", &rules));
}
