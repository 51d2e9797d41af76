use serde::{Deserialize, Serialize};
use validator::Validate;

pub mod choice;
pub mod fragment;
pub mod question;
pub mod submission;
pub mod tip;
pub mod validation;

use question::Question;
use validation::ValidationMessage;

/// Legacy XML content to import as a new block
#[derive(Debug, Deserialize, Validate)]
pub struct ImportRequest {
    #[validate(length(min = 1, message = "XML content must not be empty"))]
    pub xml: String,
    /// Overrides the generated block id
    pub id: Option<String>,
}

/// Response for every authoring save: the stored block and its advisory messages.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub block: Question,
    pub messages: Vec<ValidationMessage>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub messages: Vec<ValidationMessage>,
}
