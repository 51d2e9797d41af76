use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    #[validate(length(min = 1, max = 128, message = "Student id must be between 1 and 128 characters"))]
    pub student_id: String,
    /// Selected choice value, compared as-is
    pub submission: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub submission: String,
    pub status: SubmissionStatus,
    /// Matching tips wrapped in one group, `None` when no tip applies
    pub tips: Option<String>,
    pub weight: f64,
    pub score: u8,
}

/// Per-student state of one block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentState {
    pub student_id: String,
    pub block_id: String,
    pub student_choice: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudentStateQuery {
    #[validate(length(min = 1, max = 128, message = "Student id must be between 1 and 128 characters"))]
    pub student_id: String,
}

#[derive(Debug, Serialize)]
pub struct StudentStateResponse {
    pub student_id: String,
    pub block_id: String,
    pub student_choice: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StudentStateResponse {
    /// State of a student who never submitted: empty choice.
    pub fn empty(student_id: &str, block_id: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            block_id: block_id.to_string(),
            student_choice: String::new(),
            updated_at: None,
        }
    }
}

impl From<StudentState> for StudentStateResponse {
    fn from(state: StudentState) -> Self {
        Self {
            student_id: state.student_id,
            block_id: state.block_id,
            student_choice: state.student_choice,
            updated_at: Some(state.updated_at),
        }
    }
}
