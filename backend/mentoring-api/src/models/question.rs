use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;
use validator::Validate;

use super::choice::{Choice, HumanReadableChoice};
use super::tip::Tip;

/// Built-in values of the five-point rating scale.
pub const FIXED_VALUES: [&str; 5] = ["1", "2", "3", "4", "5"];

pub const DEFAULT_LOW: &str = "Less";
pub const DEFAULT_HIGH: &str = "More";

fn default_low() -> String {
    DEFAULT_LOW.to_string()
}

fn default_high() -> String {
    DEFAULT_HIGH.to_string()
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq,
    /// Likert-style scale; `low`/`high` anchor the labels of "1" and "5"
    Rating {
        #[serde(default = "default_low")]
        low: String,
        #[serde(default = "default_high")]
        high: String,
    },
}

impl QuestionKind {
    pub fn rating() -> Self {
        QuestionKind::Rating {
            low: default_low(),
            high: default_high(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::Rating { .. } => "rating",
        }
    }

    /// Correct choices a fresh block of this kind starts with.
    pub fn default_correct_choices(&self) -> BTreeSet<String> {
        match self {
            QuestionKind::Mcq => BTreeSet::new(),
            QuestionKind::Rating { .. } => FIXED_VALUES.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Choice set derivation, implemented per question variant.
pub trait ChoiceSource {
    /// Every value a student can submit, fixed values first.
    fn all_choice_values(&self) -> Vec<String>;

    fn human_readable_choices(&self) -> Vec<HumanReadableChoice>;
}

/// MCQ or rating block with its authored children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub question: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub custom_choices: Vec<Choice>,
    #[serde(default)]
    pub correct_choices: BTreeSet<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub tips: Vec<Tip>,
}

impl Question {
    pub fn new(id: impl Into<String>, question: impl Into<String>, kind: QuestionKind) -> Self {
        let correct_choices = kind.default_correct_choices();
        Self {
            id: id.into(),
            question: question.into(),
            kind,
            custom_choices: Vec::new(),
            correct_choices,
            weight: default_weight(),
            tips: Vec::new(),
        }
    }

    pub fn mcq(id: impl Into<String>, question: impl Into<String>) -> Self {
        Self::new(id, question, QuestionKind::Mcq)
    }

    pub fn rating(id: impl Into<String>, question: impl Into<String>) -> Self {
        Self::new(id, question, QuestionKind::rating())
    }

    pub fn with_choice(mut self, value: &str, display_name: &str) -> Self {
        self.custom_choices.push(Choice::new(value, display_name));
        self
    }

    pub fn with_correct<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.correct_choices = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tip(mut self, tip: Tip) -> Self {
        self.tips.push(tip);
        self
    }

    pub fn find_tip(&self, tip_id: &str) -> Option<&Tip> {
        self.tips.iter().find(|tip| tip.id == tip_id)
    }

    /// Tips triggered by `submission`, in authoring order.
    pub fn tips_for<'a>(&'a self, submission: &'a str) -> impl Iterator<Item = &'a Tip> + 'a {
        self.tips.iter().filter(move |tip| tip.applies_to(submission))
    }

    fn custom_human_readable_choices(&self) -> impl Iterator<Item = HumanReadableChoice> + '_ {
        self.custom_choices.iter().map(HumanReadableChoice::from)
    }
}

impl ChoiceSource for Question {
    fn all_choice_values(&self) -> Vec<String> {
        let custom = self.custom_choices.iter().map(|c| c.value.clone());
        match &self.kind {
            QuestionKind::Mcq => custom.collect(),
            QuestionKind::Rating { .. } => FIXED_VALUES
                .iter()
                .map(|v| v.to_string())
                .chain(custom)
                .collect(),
        }
    }

    fn human_readable_choices(&self) -> Vec<HumanReadableChoice> {
        match &self.kind {
            QuestionKind::Mcq => self.custom_human_readable_choices().collect(),
            QuestionKind::Rating { low, high } => {
                let display_names = [
                    format!("1 - {}", low),
                    "2".to_string(),
                    "3".to_string(),
                    "4".to_string(),
                    format!("5 - {}", high),
                ];
                FIXED_VALUES
                    .iter()
                    .zip(display_names)
                    .map(|(value, display_name)| HumanReadableChoice {
                        value: value.to_string(),
                        display_name,
                    })
                    .chain(self.custom_human_readable_choices())
                    .collect()
            }
        }
    }
}

/// Field data as submitted by the authoring UI, before it is applied.
///
/// `correct_choices` stays a list here so duplicated entries can be reported.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct QuestionFields {
    pub question: Option<String>,
    pub correct_choices: Option<Vec<String>>,
    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub weight: Option<f64>,
    pub low: Option<String>,
    pub high: Option<String>,
}

impl QuestionFields {
    /// Submitted correct choices, or the stored ones when the edit leaves them alone.
    pub fn submitted_correct_choices(&self, current: &Question) -> Vec<String> {
        match &self.correct_choices {
            Some(values) => values.clone(),
            None => current.correct_choices.iter().cloned().collect(),
        }
    }

    pub fn apply_to(self, question: &mut Question) {
        if let Some(text) = self.question {
            question.question = text;
        }
        if let Some(values) = self.correct_choices {
            question.correct_choices = values.into_iter().collect();
        }
        if let Some(weight) = self.weight {
            question.weight = weight;
        }
        if let QuestionKind::Rating { low, high } = &mut question.kind {
            if let Some(new_low) = self.low {
                *low = new_low;
            }
            if let Some(new_high) = self.high {
                *high = new_high;
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 128, message = "Block id must be between 1 and 128 characters"))]
    pub id: Option<String>,
    #[serde(default)]
    pub question: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub custom_choices: Vec<Choice>,
    pub correct_choices: Option<Vec<String>>,
    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub weight: Option<f64>,
}

impl CreateQuestionRequest {
    /// Builds the block and returns it with the field data to validate.
    pub fn into_question(self) -> (Question, QuestionFields) {
        let id = self.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut question = Question::new(id, self.question, self.kind);
        question.custom_choices = self.custom_choices;

        let fields = QuestionFields {
            correct_choices: self.correct_choices,
            weight: self.weight,
            ..QuestionFields::default()
        };
        fields.clone().apply_to(&mut question);
        (question, fields)
    }
}
