use std::collections::BTreeSet;

use crate::i18n::I18n;
use crate::metrics::VALIDATION_MESSAGES_TOTAL;
use crate::models::choice::choice_name;
use crate::models::question::{ChoiceSource, Question, QuestionFields};
use crate::models::validation::ValidationSink;

/// Checks a question's submitted field data against its choice set.
///
/// Every problem is reported; nothing here aborts a save.
pub fn validate_question_fields(
    question: &Question,
    data: &QuestionFields,
    i18n: &I18n,
    validation: &mut dyn ValidationSink,
) {
    let mut errors = 0u64;
    let mut add_error = |msg: String| {
        errors += 1;
        validation.add_error(msg);
    };

    let all_values: BTreeSet<String> = question.all_choice_values().into_iter().collect();
    let submitted = data.submitted_correct_choices(question);
    let correct: BTreeSet<String> = submitted.iter().cloned().collect();

    if all_values.is_empty() {
        add_error(i18n.gettext("No choices set yet."));
    } else if correct.is_empty() {
        add_error(i18n.gettext(
            "You must indicate the correct answer[s], or the student will always get this question wrong.",
        ));
    }
    if correct.len() < submitted.len() {
        add_error(i18n.gettext("Duplicate correct choices set"));
    }

    let choices = question.human_readable_choices();
    for value in correct.difference(&all_values) {
        add_error(i18n.format(
            "A choice value listed as correct does not exist: {choice}",
            "choice",
            choice_name(&choices, value),
        ));
    }

    if errors > 0 {
        tracing::debug!("Block {} has {} validation error(s)", question.id, errors);
        VALIDATION_MESSAGES_TOTAL
            .with_label_values(&[question.kind.as_str()])
            .inc_by(errors);
    }
}

/// Checks that every tip value exists on the owning question.
///
/// Skipped when the parent can't be resolved, e.g. a tip mid-authoring.
pub fn validate_tip_values<S: AsRef<str>>(
    parent: Option<&Question>,
    values: &[S],
    i18n: &I18n,
    validation: &mut dyn ValidationSink,
) {
    let Some(parent) = parent else {
        tracing::debug!("Tip parent not resolvable, skipping tip validation");
        return;
    };

    let valid_values: BTreeSet<String> = parent.all_choice_values().into_iter().collect();
    let submitted: BTreeSet<&str> = values.iter().map(AsRef::as_ref).collect();

    let mut errors = 0u64;
    for _ in submitted.iter().filter(|value| !valid_values.contains(**value)) {
        errors += 1;
        validation.add_error(i18n.gettext("A choice selected for this tip does not exist."));
    }

    if errors > 0 {
        VALIDATION_MESSAGES_TOTAL
            .with_label_values(&["tip"])
            .inc_by(errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validation::Validation;

    fn errors_for(question: &Question, data: &QuestionFields) -> Vec<String> {
        let mut validation = Validation::new();
        validate_question_fields(question, data, &I18n::default(), &mut validation);
        validation.errors().map(str::to_string).collect()
    }

    fn with_correct(values: &[&str]) -> QuestionFields {
        QuestionFields {
            correct_choices: Some(values.iter().map(|v| v.to_string()).collect()),
            ..QuestionFields::default()
        }
    }

    #[test]
    fn empty_choice_set_reports_only_that() {
        let question = Question::mcq("q", "");
        let errors = errors_for(&question, &QuestionFields::default());
        assert_eq!(errors, vec!["No choices set yet."]);
    }

    #[test]
    fn missing_correct_answer() {
        let question = Question::mcq("q", "").with_choice("a", "A");
        let errors = errors_for(&question, &with_correct(&[]));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("You must indicate the correct answer[s]"));
    }

    #[test]
    fn unknown_correct_value_is_named() {
        let question = Question::mcq("q", "")
            .with_choice("a", "A")
            .with_choice("b", "B");
        let errors = errors_for(&question, &with_correct(&["x"]));
        assert_eq!(
            errors,
            vec!["A choice value listed as correct does not exist: x"]
        );
    }

    #[test]
    fn duplicates_are_reported_alongside_other_errors() {
        let question = Question::mcq("q", "").with_choice("a", "A");
        let errors = errors_for(&question, &with_correct(&["a", "a", "y", "z"]));
        assert_eq!(
            errors,
            vec![
                "Duplicate correct choices set",
                "A choice value listed as correct does not exist: y",
                "A choice value listed as correct does not exist: z",
            ]
        );
    }

    #[test]
    fn valid_rating_defaults_pass() {
        let question = Question::rating("r", "Rate");
        assert!(errors_for(&question, &QuestionFields::default()).is_empty());
    }

    #[test]
    fn stored_correct_choices_are_used_when_not_submitted() {
        let question = Question::mcq("q", "")
            .with_choice("a", "A")
            .with_correct(["gone"]);
        let errors = errors_for(&question, &QuestionFields::default());
        assert_eq!(
            errors,
            vec!["A choice value listed as correct does not exist: gone"]
        );
    }

    #[test]
    fn tip_values_checked_against_parent() {
        let question = Question::rating("r", "").with_choice("na", "N/A");
        let mut validation = Validation::new();
        validate_tip_values(
            Some(&question),
            &["1", "na", "7", "8", "7"],
            &I18n::default(),
            &mut validation,
        );
        let errors: Vec<_> = validation.errors().collect();
        assert_eq!(
            errors,
            vec![
                "A choice selected for this tip does not exist.",
                "A choice selected for this tip does not exist.",
            ]
        );
    }

    #[test]
    fn orphan_tip_is_not_validated() {
        let mut validation = Validation::new();
        validate_tip_values(None, &["anything"], &I18n::default(), &mut validation);
        assert!(validation.is_empty());
    }
}
