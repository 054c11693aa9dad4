//! Multi-question readiness assessment and its pass/fail gate.

mod policy;
pub mod questionnaire;
mod questions;
mod scoring;
pub mod session;

#[cfg(test)]
mod tests;

pub use policy::{
    EligibilityDecision, EligibilityPolicy, IneligibilityReason, DEFAULT_THRESHOLD_PERCENT,
};
pub use questions::{
    validate, AnswerOption, AssessmentQuestion, AssessmentResponses, QuestionnaireError,
    MAX_OPTION_SCORE,
};
pub use scoring::AssessmentScore;

use serde::Serialize;

/// Aggregate answers into a score, independent of any gate.
pub fn score(questions: &[AssessmentQuestion], responses: &AssessmentResponses) -> AssessmentScore {
    scoring::score_responses(questions, responses)
}

/// Stateless scorer pairing a question set with its gate.
#[derive(Debug, Clone)]
pub struct EligibilityScorer {
    questions: Vec<AssessmentQuestion>,
    policy: EligibilityPolicy,
}

impl EligibilityScorer {
    pub fn new(questions: Vec<AssessmentQuestion>, policy: EligibilityPolicy) -> Self {
        Self { questions, policy }
    }

    /// The standard questionnaire gated at `threshold_percent`.
    pub fn standard(threshold_percent: f64) -> Self {
        let policy = EligibilityPolicy {
            threshold_percent,
            required_answers: questionnaire::standard_required_answers(),
        };
        Self::new(questionnaire::standard(), policy)
    }

    pub fn questions(&self) -> &[AssessmentQuestion] {
        &self.questions
    }

    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    pub fn score(&self, responses: &AssessmentResponses) -> AssessmentScore {
        score(&self.questions, responses)
    }

    pub fn evaluate(&self, responses: &AssessmentResponses) -> AssessmentOutcome {
        let score = self.score(responses);
        let decision = self.policy.evaluate(&score, responses);
        AssessmentOutcome {
            answered: responses
                .iter()
                .filter(|(question_id, _)| {
                    self.questions
                        .iter()
                        .any(|question| question.id == *question_id)
                })
                .count(),
            question_count: self.questions.len(),
            score,
            decision,
        }
    }
}

/// Score and gate decision for one set of responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentOutcome {
    pub answered: usize,
    pub question_count: usize,
    pub score: AssessmentScore,
    pub decision: EligibilityDecision,
}
