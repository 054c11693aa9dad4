use super::questions::AssessmentResponses;
use super::scoring::AssessmentScore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score percentage an assessment must reach to pass the gate.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 70.0;

/// Gate configuration: a score threshold plus answers that must match exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    pub threshold_percent: f64,
    #[serde(default)]
    pub required_answers: BTreeMap<String, String>,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            required_answers: BTreeMap::new(),
        }
    }
}

/// Outcome of the eligibility gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EligibilityDecision {
    Eligible,
    NotEligible { reasons: Vec<IneligibilityReason> },
}

impl EligibilityDecision {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Eligible => "eligible to proceed".to_string(),
            Self::NotEligible { reasons } => {
                let reasons: Vec<String> = reasons.iter().map(IneligibilityReason::summary).collect();
                format!("not eligible: {}", reasons.join("; "))
            }
        }
    }
}

/// Why an assessment failed the gate, for user-facing messaging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IneligibilityReason {
    NoAssessmentConfigured,
    ScoreTooLow {
        percentage: f64,
        threshold: f64,
    },
    RequiredAnswerMismatch {
        question_id: String,
        expected: String,
        actual: Option<String>,
    },
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            Self::NoAssessmentConfigured => "no assessment configured".to_string(),
            Self::ScoreTooLow {
                percentage,
                threshold,
            } => format!("score {percentage:.0}% is below the {threshold:.0}% threshold"),
            Self::RequiredAnswerMismatch {
                question_id,
                expected,
                actual: Some(actual),
            } => format!("{question_id} must be '{expected}' (answered '{actual}')"),
            Self::RequiredAnswerMismatch {
                question_id,
                expected,
                actual: None,
            } => format!("{question_id} must be '{expected}' (unanswered)"),
        }
    }
}

impl EligibilityPolicy {
    pub fn new(threshold_percent: f64) -> Self {
        Self {
            threshold_percent,
            ..Self::default()
        }
    }

    pub fn require(mut self, question_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.required_answers.insert(question_id.into(), value.into());
        self
    }

    /// Bare gate: a configured assessment, threshold met and every required
    /// answer matching. NaN fails.
    pub fn is_eligible(&self, score: &AssessmentScore, responses: &AssessmentResponses) -> bool {
        score.is_configured()
            && score.percentage >= self.threshold_percent
            && self.mismatches(responses).is_empty()
    }

    /// Full decision with every failing reason listed.
    pub fn evaluate(
        &self,
        score: &AssessmentScore,
        responses: &AssessmentResponses,
    ) -> EligibilityDecision {
        if !score.is_configured() {
            return EligibilityDecision::NotEligible {
                reasons: vec![IneligibilityReason::NoAssessmentConfigured],
            };
        }

        let mut reasons = Vec::new();
        if score.percentage.is_nan() || score.percentage < self.threshold_percent {
            reasons.push(IneligibilityReason::ScoreTooLow {
                percentage: score.percentage,
                threshold: self.threshold_percent,
            });
        }
        reasons.extend(self.mismatches(responses));

        if reasons.is_empty() {
            EligibilityDecision::Eligible
        } else {
            EligibilityDecision::NotEligible { reasons }
        }
    }

    fn mismatches(&self, responses: &AssessmentResponses) -> Vec<IneligibilityReason> {
        self.required_answers
            .iter()
            .filter_map(|(question_id, expected)| {
                let actual = responses.get(question_id);
                if actual == Some(expected.as_str()) {
                    None
                } else {
                    Some(IneligibilityReason::RequiredAnswerMismatch {
                        question_id: question_id.clone(),
                        expected: expected.clone(),
                        actual: actual.map(str::to_string),
                    })
                }
            })
            .collect()
    }
}
