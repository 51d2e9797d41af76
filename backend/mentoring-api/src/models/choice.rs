use serde::{Deserialize, Serialize};
use validator::Validate;

/// Custom choice authored as a child of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    /// Label shown to students, may contain inline markup
    #[serde(default)]
    pub display_name: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display_name: display_name.into(),
        }
    }
}

/// Display-facing `{value, display_name}` pair derived from a question's choice set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanReadableChoice {
    pub value: String,
    pub display_name: String,
}

impl From<&Choice> for HumanReadableChoice {
    fn from(choice: &Choice) -> Self {
        HumanReadableChoice {
            value: choice.value.clone(),
            display_name: choice.display_name.clone(),
        }
    }
}

/// Looks up the display name for `value`, falling back to the raw value.
pub fn choice_name<'a>(choices: &'a [HumanReadableChoice], value: &'a str) -> &'a str {
    choices
        .iter()
        .find(|choice| choice.value == value)
        .map(|choice| choice.display_name.as_str())
        .unwrap_or(value)
}

/// Request to add a custom choice to a question
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddChoiceRequest {
    #[validate(length(min = 1, max = 200, message = "Choice value must be between 1 and 200 characters"))]
    pub value: String,
    #[serde(default)]
    pub display_name: String,
}

impl From<AddChoiceRequest> for Choice {
    fn from(req: AddChoiceRequest) -> Self {
        Choice {
            value: req.value,
            display_name: req.display_name,
        }
    }
}
