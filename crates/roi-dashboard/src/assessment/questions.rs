use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest score any answer option carries.
pub const MAX_OPTION_SCORE: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub label: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<AnswerOption>,
}

impl AssessmentQuestion {
    pub fn max_score(&self) -> u32 {
        self.options
            .iter()
            .map(|option| option.score)
            .max()
            .unwrap_or(0)
    }

    pub fn option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

/// Selected option value per question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentResponses(BTreeMap<String, String>);

impl AssessmentResponses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(question_id.into(), value.into());
    }

    pub fn with_answer(mut self, question_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.answer(question_id, value);
        self
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(question, value)| (question.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for AssessmentResponses
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(question, value)| (question.into(), value.into()))
                .collect(),
        )
    }
}

/// Observed question structure: each option carries a score in `0..=MAX_OPTION_SCORE`.
pub fn validate(questions: &[AssessmentQuestion]) -> Result<(), QuestionnaireError> {
    for question in questions {
        if question.options.is_empty() {
            return Err(QuestionnaireError::NoOptions(question.id.clone()));
        }
        if let Some(option) = question
            .options
            .iter()
            .find(|option| option.score > MAX_OPTION_SCORE)
        {
            return Err(QuestionnaireError::ScoreOutOfRange {
                question_id: question.id.clone(),
                value: option.value.clone(),
                score: option.score,
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionnaireError {
    #[error("question '{0}' has no answer options")]
    NoOptions(String),
    #[error("option '{value}' of question '{question_id}' scores {score}, above the maximum")]
    ScoreOutOfRange {
        question_id: String,
        value: String,
        score: u32,
    },
}
