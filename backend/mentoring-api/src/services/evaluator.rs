use std::collections::BTreeSet;

use crate::i18n::I18n;

/// How a single choice relates to the accepted answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceCorrectness {
    Correct,
    Acceptable,
    Wrong,
    NotAcceptable,
}

impl ChoiceCorrectness {
    /// Phrasing differs when the question has a single correct answer.
    pub fn classify(choice_value: &str, correct_choices: &BTreeSet<String>) -> Self {
        let single = correct_choices.len() == 1;
        match (correct_choices.contains(choice_value), single) {
            (true, true) => ChoiceCorrectness::Correct,
            (true, false) => ChoiceCorrectness::Acceptable,
            (false, true) => ChoiceCorrectness::Wrong,
            (false, false) => ChoiceCorrectness::NotAcceptable,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            // adjective, describing a choice as correct
            ChoiceCorrectness::Correct => "Correct",
            ChoiceCorrectness::Acceptable => "Acceptable",
            ChoiceCorrectness::Wrong => "Wrong",
            ChoiceCorrectness::NotAcceptable => "Not Acceptable",
        }
    }
}

/// Exact membership test, no trimming or case folding.
pub fn is_correct(submission: &str, correct_choices: &BTreeSet<String>) -> bool {
    correct_choices.contains(submission)
}

pub fn describe_choice_correctness(
    choice_value: &str,
    correct_choices: &BTreeSet<String>,
    i18n: &I18n,
) -> String {
    i18n.gettext(ChoiceCorrectness::classify(choice_value, correct_choices).label())
}
