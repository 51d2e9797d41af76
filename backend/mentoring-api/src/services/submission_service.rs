use serde_json::json;
use std::sync::Arc;

use super::block_store::BlockStore;
use super::error::{RenderError, ServiceError};
use super::evaluator::is_correct;
use super::templates::{TemplateRenderer, TIP_CHOICE_GROUP_TEMPLATE, TIP_TEMPLATE};
use crate::metrics::SUBMISSIONS_TOTAL;
use crate::models::question::Question;
use crate::models::submission::{SubmissionResult, SubmissionStatus};
use crate::models::tip::Tip;

pub struct SubmissionService {
    store: Arc<dyn BlockStore>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn BlockStore>, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self { store, renderer }
    }

    /// Grades `submission` and records it as the student's latest choice.
    ///
    /// Any value is accepted; unknown ones simply score as incorrect.
    pub async fn submit(
        &self,
        block_id: &str,
        student_id: &str,
        submission: &str,
    ) -> Result<SubmissionResult, ServiceError> {
        tracing::debug!(
            "Received submission: block={}, student={}, submission=\"{}\"",
            block_id,
            student_id,
            submission
        );

        let question = self.store.get_question(block_id).await?;
        let result = grade(&question, submission, self.renderer.as_ref())?;

        self.store
            .set_student_choice(student_id, block_id, submission)
            .await?;

        let status_label = match result.status {
            SubmissionStatus::Correct => "correct",
            SubmissionStatus::Incorrect => "incorrect",
        };
        SUBMISSIONS_TOTAL
            .with_label_values(&[question.kind.as_str(), status_label])
            .inc();

        tracing::debug!("Submission result: {:?}", result);
        Ok(result)
    }
}

pub fn render_tip(tip: &Tip, renderer: &dyn TemplateRenderer) -> Result<String, RenderError> {
    renderer.render_template(
        TIP_TEMPLATE,
        &json!({
            "content": tip.content,
            "width": tip.width,
            "height": tip.height,
        }),
    )
}

/// Scores one submission against a question without touching student state.
pub fn grade(
    question: &Question,
    submission: &str,
    renderer: &dyn TemplateRenderer,
) -> Result<SubmissionResult, RenderError> {
    let correct = is_correct(submission, &question.correct_choices);

    let tips_html = question
        .tips_for(submission)
        .map(|tip| render_tip(tip, renderer))
        .collect::<Result<Vec<_>, _>>()?;

    let tips = if tips_html.is_empty() {
        None
    } else {
        Some(renderer.render_template(
            TIP_CHOICE_GROUP_TEMPLATE,
            &json!({ "tips_html": tips_html }),
        )?)
    };

    Ok(SubmissionResult {
        submission: submission.to_string(),
        status: if correct {
            SubmissionStatus::Correct
        } else {
            SubmissionStatus::Incorrect
        },
        tips,
        weight: question.weight,
        score: if correct { 1 } else { 0 },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::block_store::InMemoryBlockStore;
    use crate::services::templates::BuiltinTemplates;

    fn question() -> Question {
        Question::mcq("q1", "Pick")
            .with_choice("a", "A")
            .with_choice("b", "B")
            .with_choice("c", "C")
            .with_correct(["a"])
            .with_tip(Tip::new("<p>T1</p>", ["a"]))
            .with_tip(Tip::new("<p>T2</p>", ["b", "a"]))
    }

    #[test]
    fn correct_submission_scores_one_with_all_matching_tips() {
        let result = grade(&question(), "a", &BuiltinTemplates).unwrap();
        assert_eq!(result.status, SubmissionStatus::Correct);
        assert_eq!(result.score, 1);
        assert_eq!(result.weight, 1.0);

        let tips = result.tips.unwrap();
        let first = tips.find("T1").unwrap();
        let second = tips.find("T2").unwrap();
        assert!(first < second);
    }

    #[test]
    fn submission_without_tips_has_null_tips() {
        let result = grade(&question(), "c", &BuiltinTemplates).unwrap();
        assert_eq!(result.status, SubmissionStatus::Incorrect);
        assert_eq!(result.score, 0);
        assert!(result.tips.is_none());
    }

    #[test]
    fn unknown_value_is_just_incorrect() {
        let result = grade(&question(), "no such choice", &BuiltinTemplates).unwrap();
        assert_eq!(result.status, SubmissionStatus::Incorrect);
        assert_eq!(result.submission, "no such choice");
    }

    #[tokio::test]
    async fn submit_persists_choice_regardless_of_correctness() {
        let store = Arc::new(InMemoryBlockStore::new());
        store.insert_question(question()).await.unwrap();
        let service = SubmissionService::new(store.clone(), Arc::new(BuiltinTemplates));

        service.submit("q1", "student", "a").await.unwrap();
        service.submit("q1", "student", "zzz").await.unwrap();

        let state = store.get_student_state("student", "q1").await.unwrap().unwrap();
        assert_eq!(state.student_choice, "zzz");
    }

    #[tokio::test]
    async fn submit_to_unknown_block_fails() {
        let service = SubmissionService::new(
            Arc::new(InMemoryBlockStore::new()),
            Arc::new(BuiltinTemplates),
        );
        let err = service.submit("missing", "student", "a").await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}
