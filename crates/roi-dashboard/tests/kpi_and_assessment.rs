use roi_dashboard::assessment::{
    session, AssessmentResponses, EligibilityDecision, EligibilityScorer, IneligibilityReason,
    DEFAULT_THRESHOLD_PERCENT,
};
use roi_dashboard::kpi::{resolve, resolve_match, CanonicalRecord, KpiReference, MatchRule};
use roi_dashboard::storage::{InMemoryStore, KeyValueStore};

#[derive(Debug, PartialEq)]
struct Kpi {
    id: &'static str,
    name: &'static str,
    target: f64,
}

impl CanonicalRecord for Kpi {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }
}

fn kpis() -> Vec<Kpi> {
    vec![
        Kpi {
            id: "duplicate-payment",
            name: "Duplicate Payment Prevention",
            target: 99.5,
        },
        Kpi {
            id: "fraud",
            name: "Fraud Detection Coverage",
            target: 95.0,
        },
        Kpi {
            id: "vendor-risk",
            name: "Vendor Risk Monitoring",
            target: 90.0,
        },
    ]
}

#[test]
fn detection_slug_resolves_to_prevention_kpi() {
    let candidates = vec![KpiReference::new(
        "duplicate-payment",
        "Duplicate Payment Prevention",
    )];
    let resolved = resolve_match("duplicate-payment-detection", &candidates).expect("resolves");
    assert_eq!(resolved.rule, MatchRule::NormalizedSuffix);
    assert_eq!(resolved.record, &candidates[0]);
}

#[test]
fn route_slugs_resolve_through_each_rule() {
    let kpis = kpis();

    let exact = resolve_match("vendor-risk", &kpis).expect("exact id");
    assert_eq!(exact.rule, MatchRule::Exact);

    let by_name = resolve_match("fraud-detection-coverage", &kpis).expect("name slug");
    assert_eq!(by_name.rule, MatchRule::NameSlug);
    assert_eq!(by_name.record.target, 95.0);

    let stripped = resolve_match("vendor-risk-compliance", &kpis).expect("stripped");
    assert_eq!(stripped.rule, MatchRule::NormalizedSuffix);
    assert_eq!(stripped.record.id, "vendor-risk");

    let partial = resolve_match("fraud-detection", &kpis).expect("containment");
    assert_eq!(partial.rule, MatchRule::Containment);
    assert_eq!(partial.record.id, "fraud");
}

#[test]
fn exact_id_beats_containment_candidates_earlier_in_the_list() {
    let kpis = vec![
        Kpi {
            id: "payment-accuracy-review",
            name: "Payment Accuracy Review",
            target: 80.0,
        },
        Kpi {
            id: "payment",
            name: "Payment Timeliness",
            target: 97.0,
        },
    ];
    assert_eq!(resolve("payment", &kpis).map(|kpi| kpi.id), Some("payment"));
}

#[test]
fn unknown_slug_is_not_found() {
    assert_eq!(resolve("working-capital", &kpis()), None);
}

#[test]
fn saved_answers_feed_the_gate() {
    let store = InMemoryStore::new();
    let scorer = EligibilityScorer::standard(DEFAULT_THRESHOLD_PERCENT);

    let strong: AssessmentResponses = [
        ("erp_system", "sap"),
        ("data_access", "full"),
        ("annual_spend", "over_500m"),
        ("vendor_count", "1000_5000"),
        ("history_months", "36_plus"),
        ("entity_count", "6_20"),
        ("prior_audit", "never"),
        ("executive_sponsor", "yes"),
        ("payment_controls", "basic"),
        ("timeline", "60_90_days"),
    ]
    .into_iter()
    .collect();

    session::save_responses(&store, "northwind", &strong).expect("saved");
    let restored = session::load_responses(&store, "northwind");
    let outcome = scorer.evaluate(&restored);

    assert_eq!(outcome.score.total_score, 26);
    assert_eq!(outcome.score.max_score, 30);
    assert!(outcome.score.percentage > 86.0);
    assert_eq!(outcome.decision, EligibilityDecision::Eligible);
}

#[test]
fn high_score_with_missing_sponsor_is_blocked() {
    let scorer = EligibilityScorer::standard(DEFAULT_THRESHOLD_PERCENT);
    let responses: AssessmentResponses = [
        ("erp_system", "sap"),
        ("data_access", "full"),
        ("annual_spend", "over_500m"),
        ("vendor_count", "over_5000"),
        ("history_months", "36_plus"),
        ("entity_count", "over_20"),
        ("prior_audit", "never"),
        ("executive_sponsor", "informal"),
        ("payment_controls", "none"),
        ("timeline", "over_90_days"),
    ]
    .into_iter()
    .collect();

    let outcome = scorer.evaluate(&responses);
    assert!(outcome.score.percentage >= 90.0);
    assert_eq!(
        outcome.decision,
        EligibilityDecision::NotEligible {
            reasons: vec![IneligibilityReason::RequiredAnswerMismatch {
                question_id: "executive_sponsor".to_string(),
                expected: "yes".to_string(),
                actual: Some("informal".to_string()),
            }],
        }
    );
}

#[test]
fn corrupted_store_entry_starts_a_fresh_assessment() {
    let store = InMemoryStore::new();
    store
        .set("config-northwind", "\u{0}garbage".to_string())
        .expect("set");

    let scorer = EligibilityScorer::standard(DEFAULT_THRESHOLD_PERCENT);
    let outcome = scorer.evaluate(&session::load_responses(&store, "northwind"));
    assert_eq!(outcome.answered, 0);
    assert!(matches!(
        outcome.decision,
        EligibilityDecision::NotEligible { ref reasons }
            if matches!(reasons[0], IneligibilityReason::ScoreTooLow { .. })
    ));
}
