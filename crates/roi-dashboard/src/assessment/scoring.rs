use super::questions::{AssessmentQuestion, AssessmentResponses};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessmentScore {
    pub total_score: u32,
    pub max_score: u32,
    /// `0.0` when no question carries any score.
    pub percentage: f64,
}

impl AssessmentScore {
    pub fn is_configured(&self) -> bool {
        self.max_score > 0
    }
}

pub(crate) fn score_responses(
    questions: &[AssessmentQuestion],
    responses: &AssessmentResponses,
) -> AssessmentScore {
    let max_score = questions
        .iter()
        .map(AssessmentQuestion::max_score)
        .fold(0u32, u32::saturating_add);

    let total_score: u32 = questions
        .iter()
        .filter_map(|question| {
            let selected = responses.get(&question.id)?;
            match question.option(selected) {
                Some(option) => Some(option.score),
                None => {
                    debug!(
                        question = %question.id,
                        value = selected,
                        "response does not match any option; scoring zero"
                    );
                    None
                }
            }
        })
        .fold(0u32, u32::saturating_add);

    let percentage = if max_score == 0 {
        0.0
    } else {
        f64::from(total_score) / f64::from(max_score) * 100.0
    };

    AssessmentScore {
        total_score,
        max_score,
        percentage,
    }
}
