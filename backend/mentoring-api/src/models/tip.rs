use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;
use validator::Validate;

use crate::i18n::I18n;
use crate::models::choice::HumanReadableChoice;
use crate::utils::html::{strip_tags, truncate_with_ellipsis};

/// Choice labels longer than this are cut in the studio display name.
pub const DISPLAY_NAME_MAX_CHARS: usize = 20;

/// Feedback shown when the student picks one of `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub id: String,
    /// Rich-text fragment, markup is kept as authored
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub values: BTreeSet<String>,
    /// Popup width, e.g. "400px"
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
}

impl Tip {
    pub fn new<I, S>(content: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            values: values.into_iter().map(Into::into).collect(),
            width: String::new(),
            height: String::new(),
        }
    }

    pub fn applies_to(&self, submission: &str) -> bool {
        self.values.contains(submission)
    }

    /// Label for the authoring UI, built from the owning question's choices in their order.
    pub fn studio_display_name(&self, choices: &[HumanReadableChoice], i18n: &I18n) -> String {
        let values_list: Vec<String> = choices
            .iter()
            .filter(|entry| self.values.contains(&entry.value))
            .map(|entry| {
                // studio can't show markup in a display name
                truncate_with_ellipsis(&strip_tags(&entry.display_name), DISPLAY_NAME_MAX_CHARS)
            })
            .collect();

        i18n.format(
            "Tip for {list_of_choices}",
            "list_of_choices",
            &values_list.join(", "),
        )
    }
}

/// De-duplicates tip values coming from a studio edit.
pub fn clean_tip_values<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddTipRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 32, message = "Width must be at most 32 characters"))]
    pub width: String,
    #[serde(default)]
    #[validate(length(max = 32, message = "Height must be at most 32 characters"))]
    pub height: String,
}

impl From<AddTipRequest> for Tip {
    fn from(req: AddTipRequest) -> Self {
        Tip {
            id: Uuid::new_v4().to_string(),
            content: req.content,
            values: clean_tip_values(req.values),
            width: req.width,
            height: req.height,
        }
    }
}

/// Studio edit of an existing tip; absent fields are left as they are
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTipRequest {
    pub content: Option<String>,
    pub values: Option<Vec<String>>,
    #[validate(length(max = 32, message = "Width must be at most 32 characters"))]
    pub width: Option<String>,
    #[validate(length(max = 32, message = "Height must be at most 32 characters"))]
    pub height: Option<String>,
}

impl UpdateTipRequest {
    pub fn apply_to(self, tip: &mut Tip) {
        if let Some(content) = self.content {
            tip.content = content;
        }
        if let Some(values) = self.values {
            tip.values = clean_tip_values(values);
        }
        if let Some(width) = self.width {
            tip.width = width;
        }
        if let Some(height) = self.height {
            tip.height = height;
        }
    }
}

/// A single legacy `<tip>` element to attach to an existing block
#[derive(Debug, Deserialize, Validate)]
pub struct ImportTipRequest {
    #[validate(length(min = 1, message = "XML content must not be empty"))]
    pub xml: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateTipRequest {
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TipDetail {
    pub id: String,
    pub display_name: String,
    pub values: Vec<String>,
    pub html: String,
}
