use super::*;
use crate::storage::{InMemoryStore, KeyValueStore};

fn answer_all(questions: &[AssessmentQuestion], pick: impl Fn(&AssessmentQuestion) -> &str) -> AssessmentResponses {
    questions
        .iter()
        .map(|question| (question.id.clone(), pick(question).to_string()))
        .collect()
}

fn best_option(question: &AssessmentQuestion) -> &str {
    question
        .options
        .iter()
        .max_by_key(|option| option.score)
        .map(|option| option.value.as_str())
        .unwrap_or_default()
}

fn two_questions() -> Vec<AssessmentQuestion> {
    let option = |value: &str, score| AnswerOption {
        value: value.to_string(),
        label: value.to_uppercase(),
        score,
    };
    vec![
        AssessmentQuestion {
            id: "q1".to_string(),
            question: "First?".to_string(),
            options: vec![option("a", 3), option("b", 1)],
        },
        AssessmentQuestion {
            id: "q2".to_string(),
            question: "Second?".to_string(),
            options: vec![option("x", 2), option("y", 0)],
        },
    ]
}

#[test]
fn max_score_ignores_responses() {
    let questions = two_questions();
    let empty = score(&questions, &AssessmentResponses::new());
    assert_eq!(empty.max_score, 5);
    assert_eq!(empty.total_score, 0);
    assert_eq!(empty.percentage, 0.0);
}

#[test]
fn unanswered_and_unknown_answers_score_zero() {
    let questions = two_questions();
    let responses = AssessmentResponses::new()
        .with_answer("q1", "b")
        .with_answer("q2", "not-an-option")
        .with_answer("q9", "a");

    let result = score(&questions, &responses);
    assert_eq!(result.total_score, 1);
    assert_eq!(result.percentage, 20.0);
}

#[test]
fn standard_assessment_spans_zero_to_hundred() {
    let scorer = EligibilityScorer::standard(DEFAULT_THRESHOLD_PERCENT);
    let questions = scorer.questions();

    let best = answer_all(questions, best_option);
    let full = scorer.score(&best);
    assert_eq!(full.max_score, 30);
    assert_eq!(full.total_score, 30);
    assert_eq!(full.percentage, 100.0);

    let none = scorer.score(&AssessmentResponses::new());
    assert_eq!(none.percentage, 0.0);
}

#[test]
fn gate_requires_both_threshold_and_required_answers() {
    let policy = EligibilityPolicy::new(70.0).require("data_access", "full");
    let matching = AssessmentResponses::new().with_answer("data_access", "full");
    let mismatched = AssessmentResponses::new().with_answer("data_access", "manual");

    let at = |percentage: f64| AssessmentScore {
        total_score: 0,
        max_score: 30,
        percentage,
    };

    assert!(!policy.is_eligible(&at(80.0), &mismatched));
    assert!(!policy.is_eligible(&at(60.0), &matching));
    assert!(policy.is_eligible(&at(80.0), &matching));
    assert!(policy.is_eligible(&at(70.0), &matching));
    assert!(!policy.is_eligible(&at(f64::NAN), &matching));
}

#[test]
fn zero_threshold_gate_rejects_unconfigured_assessment() {
    let policy = EligibilityPolicy::new(0.0);
    let responses = AssessmentResponses::new();
    let result = score(&[], &responses);

    assert_eq!(result.max_score, 0);
    assert!(!policy.is_eligible(&result, &responses));
    assert_eq!(
        policy.evaluate(&result, &responses).is_eligible(),
        policy.is_eligible(&result, &responses)
    );
}

#[test]
fn decision_reports_each_failing_reason() {
    let questions = two_questions();
    let policy = EligibilityPolicy::new(70.0).require("q2", "x");
    let responses = AssessmentResponses::new().with_answer("q1", "b").with_answer("q2", "y");

    let result = score(&questions, &responses);
    match policy.evaluate(&result, &responses) {
        EligibilityDecision::NotEligible { reasons } => {
            assert_eq!(
                reasons,
                vec![
                    IneligibilityReason::ScoreTooLow {
                        percentage: 20.0,
                        threshold: 70.0,
                    },
                    IneligibilityReason::RequiredAnswerMismatch {
                        question_id: "q2".to_string(),
                        expected: "x".to_string(),
                        actual: Some("y".to_string()),
                    },
                ]
            );
        }
        other => panic!("expected ineligible decision, got {other:?}"),
    }
}

#[test]
fn unanswered_required_question_is_a_mismatch() {
    let policy = EligibilityPolicy::new(0.0).require("q1", "a");
    let responses = AssessmentResponses::new();
    let result = score(&two_questions(), &responses);

    let decision = policy.evaluate(&result, &responses);
    assert!(!decision.is_eligible());
    assert!(decision.summary().contains("q1 must be 'a' (unanswered)"));
}

#[test]
fn empty_question_set_is_not_configured() {
    let scorer = EligibilityScorer::new(Vec::new(), EligibilityPolicy::new(0.0));
    let outcome = scorer.evaluate(&AssessmentResponses::new());

    assert_eq!(outcome.score.percentage, 0.0);
    assert!(!outcome.score.percentage.is_nan());
    assert_eq!(
        outcome.decision,
        EligibilityDecision::NotEligible {
            reasons: vec![IneligibilityReason::NoAssessmentConfigured],
        }
    );
}

#[test]
fn strong_standard_answers_pass_the_gate() {
    let scorer = EligibilityScorer::standard(DEFAULT_THRESHOLD_PERCENT);
    let responses = answer_all(scorer.questions(), best_option);

    let outcome = scorer.evaluate(&responses);
    assert_eq!(outcome.answered, 10);
    assert_eq!(outcome.question_count, 10);
    assert!(outcome.decision.is_eligible());
}

#[test]
fn oversized_unvalidated_scores_saturate() {
    let mut questions = two_questions();
    questions[0].options[0].score = u32::MAX;
    questions[1].options[0].score = u32::MAX;
    let responses = AssessmentResponses::new()
        .with_answer("q1", "a")
        .with_answer("q2", "x");

    let result = score(&questions, &responses);
    assert_eq!(result.max_score, u32::MAX);
    assert_eq!(result.total_score, u32::MAX);
    assert_eq!(result.percentage, 100.0);
}

#[test]
fn validation_rejects_empty_and_oversized_options() {
    let mut questions = two_questions();
    questions[1].options[0].score = 4;
    assert!(matches!(
        validate(&questions),
        Err(QuestionnaireError::ScoreOutOfRange { score: 4, .. })
    ));

    questions[0].options.clear();
    assert_eq!(
        validate(&questions),
        Err(QuestionnaireError::NoOptions("q1".to_string()))
    );
}

#[test]
fn responses_round_trip_through_the_store() {
    let store = InMemoryStore::new();
    let responses = AssessmentResponses::new()
        .with_answer("erp_system", "sap")
        .with_answer("timeline", "30_60_days");

    session::save_responses(&store, "acme", &responses).expect("save succeeds");
    assert_eq!(
        store.get("config-acme").expect("get"),
        Some(r#"{"erp_system":"sap","timeline":"30_60_days"}"#.to_string())
    );
    assert_eq!(session::load_responses(&store, "acme"), responses);
}

#[test]
fn malformed_saved_responses_load_as_empty() {
    let store = InMemoryStore::new();
    store
        .set("config-acme", "{not json".to_string())
        .expect("set");
    assert!(session::load_responses(&store, "acme").is_empty());

    store
        .set("config-acme", r#"["erp_system"]"#.to_string())
        .expect("set");
    assert!(session::load_responses(&store, "acme").is_empty());
    assert!(session::load_responses(&store, "unknown").is_empty());
}
