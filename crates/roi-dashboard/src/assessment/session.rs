use super::questions::AssessmentResponses;
use crate::storage::{assessment_key, KeyValueStore, StorageError};
use tracing::{debug, warn};

/// Saved responses for `subject_id`. Missing, unreadable or malformed entries
/// yield empty responses.
pub fn load_responses(store: &dyn KeyValueStore, subject_id: &str) -> AssessmentResponses {
    let key = assessment_key(subject_id);
    let raw = match store.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(%key, "no saved assessment responses");
            return AssessmentResponses::new();
        }
        Err(err) => {
            warn!(%key, error = %err, "failed to read saved assessment responses");
            return AssessmentResponses::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(responses) => responses,
        Err(err) => {
            warn!(%key, error = %err, "discarding malformed saved assessment responses");
            AssessmentResponses::new()
        }
    }
}

pub fn save_responses(
    store: &dyn KeyValueStore,
    subject_id: &str,
    responses: &AssessmentResponses,
) -> Result<(), StorageError> {
    let payload = serde_json::to_string(responses)?;
    store.set(&assessment_key(subject_id), payload)
}
