use serde_json::json;
use std::sync::Arc;

use super::block_store::BlockStore;
use super::error::{RenderError, ServiceError, StoreError};
use super::evaluator::describe_choice_correctness;
use super::import_service::{import_question_xml, import_tip_xml};
use super::submission_service::render_tip;
use super::templates::{
    TemplateRenderer, ADD_BUTTONS_TEMPLATE, RATING_PREVIEW_TEMPLATE, STUDIO_CHILD_TEMPLATE,
};
use super::validation_service::{validate_question_fields, validate_tip_values};
use crate::i18n::I18n;
use crate::models::choice::{AddChoiceRequest, Choice};
use crate::models::fragment::Fragment;
use crate::models::question::{
    ChoiceSource, CreateQuestionRequest, Question, QuestionFields, QuestionKind, FIXED_VALUES,
};
use crate::models::tip::{AddTipRequest, Tip, TipDetail, UpdateTipRequest};
use crate::models::validation::Validation;
use crate::models::{SaveResponse, ValidateResponse};
use crate::utils::html::strip_tags;

const EDIT_CSS: &str = "css/questionnaire-edit.css";

/// Studio-side operations: saving content, validation and the edit view.
pub struct AuthoringService {
    store: Arc<dyn BlockStore>,
    renderer: Arc<dyn TemplateRenderer>,
    i18n: I18n,
    assets_base_url: String,
}

impl AuthoringService {
    pub fn new(
        store: Arc<dyn BlockStore>,
        renderer: Arc<dyn TemplateRenderer>,
        i18n: I18n,
        assets_base_url: String,
    ) -> Self {
        Self {
            store,
            renderer,
            i18n,
            assets_base_url,
        }
    }

    pub async fn create(&self, req: CreateQuestionRequest) -> Result<SaveResponse, ServiceError> {
        let (question, fields) = req.into_question();
        tracing::info!("Creating {} block {}", question.kind.as_str(), question.id);

        self.store.insert_question(question.clone()).await?;
        Ok(self.save_response(question, &fields))
    }

    /// Applies an edit; validation messages are returned but never block the save.
    pub async fn update(
        &self,
        block_id: &str,
        fields: QuestionFields,
    ) -> Result<SaveResponse, ServiceError> {
        let mut question = self.store.get_question(block_id).await?;

        // validated against the submitted list, duplicates included
        let mut validation = Validation::new();
        validate_question_fields(&question, &fields, &self.i18n, &mut validation);

        fields.apply_to(&mut question);
        self.store.save_question(question.clone()).await?;

        tracing::info!(
            "Updated block {} with {} validation message(s)",
            block_id,
            validation.messages.len()
        );
        Ok(SaveResponse {
            block: question,
            messages: validation.messages,
        })
    }

    pub async fn add_choice(
        &self,
        block_id: &str,
        req: AddChoiceRequest,
    ) -> Result<SaveResponse, ServiceError> {
        let mut question = self.store.get_question(block_id).await?;
        let choice = Choice::from(req);

        if question.all_choice_values().contains(&choice.value) {
            return Err(ServiceError::DuplicateChoice(choice.value));
        }

        tracing::info!("Adding choice '{}' to block {}", choice.value, block_id);
        question.custom_choices.push(choice);
        self.store.save_question(question.clone()).await?;
        Ok(self.save_response(question, &QuestionFields::default()))
    }

    pub async fn add_tip(
        &self,
        block_id: &str,
        req: AddTipRequest,
    ) -> Result<SaveResponse, ServiceError> {
        self.attach_tip(block_id, Tip::from(req)).await
    }

    /// Removes a custom choice; the fixed rating values can't be removed.
    pub async fn delete_choice(&self, block_id: &str, value: &str) -> Result<(), ServiceError> {
        let mut question = self.store.get_question(block_id).await?;
        let position = question
            .custom_choices
            .iter()
            .position(|choice| choice.value == value)
            .ok_or_else(|| StoreError::ChoiceNotFound(value.to_string()))?;

        question.custom_choices.remove(position);
        self.store.save_question(question).await?;
        tracing::info!("Removed choice '{}' from block {}", value, block_id);
        Ok(())
    }

    /// Applies a studio edit to a tip and reports problems with its values.
    pub async fn update_tip(
        &self,
        block_id: &str,
        tip_id: &str,
        req: UpdateTipRequest,
    ) -> Result<SaveResponse, ServiceError> {
        let mut question = self.store.get_question(block_id).await?;
        let tip = question
            .tips
            .iter_mut()
            .find(|tip| tip.id == tip_id)
            .ok_or_else(|| StoreError::TipNotFound(tip_id.to_string()))?;
        req.apply_to(tip);

        self.store.save_question(question.clone()).await?;
        tracing::info!("Updated tip {} of block {}", tip_id, block_id);
        Ok(self.tip_response(question, tip_id))
    }

    pub async fn delete_tip(&self, block_id: &str, tip_id: &str) -> Result<(), ServiceError> {
        let mut question = self.store.get_question(block_id).await?;
        let before = question.tips.len();
        question.tips.retain(|tip| tip.id != tip_id);
        if question.tips.len() == before {
            return Err(StoreError::TipNotFound(tip_id.to_string()).into());
        }

        self.store.save_question(question).await?;
        tracing::info!("Removed tip {} from block {}", tip_id, block_id);
        Ok(())
    }

    pub async fn import(&self, xml: &str, id: Option<String>) -> Result<SaveResponse, ServiceError> {
        let question = import_question_xml(xml, id)?;
        tracing::info!(
            "Imported {} block {} with {} choice(s) and {} tip(s)",
            question.kind.as_str(),
            question.id,
            question.custom_choices.len(),
            question.tips.len()
        );

        self.store.insert_question(question.clone()).await?;
        Ok(self.save_response(question, &QuestionFields::default()))
    }

    pub async fn import_tip(&self, block_id: &str, xml: &str) -> Result<SaveResponse, ServiceError> {
        let tip = import_tip_xml(xml)?;
        self.attach_tip(block_id, tip).await
    }

    /// Validates proposed field data without saving it.
    pub async fn validate(
        &self,
        block_id: &str,
        fields: &QuestionFields,
    ) -> Result<ValidateResponse, ServiceError> {
        let question = self.store.get_question(block_id).await?;

        let mut validation = Validation::new();
        validate_question_fields(&question, fields, &self.i18n, &mut validation);

        Ok(ValidateResponse {
            valid: validation.is_empty(),
            messages: validation.messages,
        })
    }

    /// Validates proposed values for a tip, resolving its parent by tip id.
    pub async fn validate_tip(&self, tip_id: &str, values: &[String]) -> ValidateResponse {
        let parent = self.store.find_tip_parent(tip_id).await;
        if parent.is_none() {
            tracing::warn!("Tip {} has no resolvable parent, skipping validation", tip_id);
        }

        let mut validation = Validation::new();
        validate_tip_values(parent.as_ref(), values, &self.i18n, &mut validation);

        ValidateResponse {
            valid: validation.is_empty(),
            messages: validation.messages,
        }
    }

    pub async fn tip_detail(&self, block_id: &str, tip_id: &str) -> Result<TipDetail, ServiceError> {
        let question = self.store.get_question(block_id).await?;
        let tip = question
            .find_tip(tip_id)
            .ok_or_else(|| StoreError::TipNotFound(tip_id.to_string()))?;

        Ok(TipDetail {
            id: tip.id.clone(),
            display_name: tip.studio_display_name(&question.human_readable_choices(), &self.i18n),
            values: tip.values.iter().cloned().collect(),
            html: render_tip(tip, self.renderer.as_ref())?,
        })
    }

    pub async fn author_edit_view(&self, block_id: &str) -> Result<Fragment, ServiceError> {
        let question = self.store.get_question(block_id).await?;
        Ok(self.render_author_edit_view(&question)?)
    }

    /// Question header (rating scale preview for ratings), children, then add buttons.
    pub fn render_author_edit_view(&self, question: &Question) -> Result<Fragment, RenderError> {
        let mut fragment = match &question.kind {
            QuestionKind::Mcq => Fragment::new(format!("<p>{}</p>", question.question)),
            QuestionKind::Rating { low, high } => {
                // the 1-5 scale isn't made of child blocks, show it anyway
                let mut accepted_statuses = vec![serde_json::Value::Null];
                accepted_statuses.extend(FIXED_VALUES.iter().map(|value| {
                    json!(describe_choice_correctness(
                        value,
                        &question.correct_choices,
                        &self.i18n
                    ))
                }));

                Fragment::new(self.renderer.render_template(
                    RATING_PREVIEW_TEMPLATE,
                    &json!({
                        "question": question.question,
                        "low": low,
                        "high": high,
                        "accepted_statuses": accepted_statuses,
                    }),
                )?)
            }
        };

        fragment.add_content(&self.render_children(question)?);
        fragment.add_content(
            &self
                .renderer
                .render_template(ADD_BUTTONS_TEMPLATE, &json!({}))?,
        );
        fragment.add_css_url(format!(
            "{}/{}",
            self.assets_base_url.trim_end_matches('/'),
            EDIT_CSS
        ));
        Ok(fragment)
    }

    fn render_children(&self, question: &Question) -> Result<String, RenderError> {
        let choices = question.human_readable_choices();
        let mut html = String::new();

        for choice in &question.custom_choices {
            html.push_str(&self.renderer.render_template(
                STUDIO_CHILD_TEMPLATE,
                &json!({
                    "id": choice.value,
                    "category": "pb-choice",
                    "display_name": strip_tags(&choice.display_name),
                    "children": describe_choice_correctness(
                        &choice.value,
                        &question.correct_choices,
                        &self.i18n
                    ),
                }),
            )?);
        }

        for tip in &question.tips {
            html.push_str(&self.renderer.render_template(
                STUDIO_CHILD_TEMPLATE,
                &json!({
                    "id": tip.id,
                    "category": "pb-tip",
                    "display_name": tip.studio_display_name(&choices, &self.i18n),
                    "children": render_tip(tip, self.renderer.as_ref())?,
                }),
            )?);
        }

        Ok(html)
    }

    async fn attach_tip(&self, block_id: &str, tip: Tip) -> Result<SaveResponse, ServiceError> {
        let mut question = self.store.get_question(block_id).await?;
        tracing::info!("Adding tip {} to block {}", tip.id, block_id);

        let tip_id = tip.id.clone();
        question.tips.push(tip);
        self.store.save_question(question.clone()).await?;
        Ok(self.tip_response(question, &tip_id))
    }

    fn save_response(&self, question: Question, fields: &QuestionFields) -> SaveResponse {
        let mut validation = Validation::new();
        validate_question_fields(&question, fields, &self.i18n, &mut validation);
        SaveResponse {
            block: question,
            messages: validation.messages,
        }
    }

    /// Messages for one tip only; the question's own fields are reported by its saves.
    fn tip_response(&self, question: Question, tip_id: &str) -> SaveResponse {
        let mut validation = Validation::new();
        if let Some(tip) = question.find_tip(tip_id) {
            let values: Vec<&str> = tip.values.iter().map(String::as_str).collect();
            validate_tip_values(Some(&question), &values, &self.i18n, &mut validation);
        }
        SaveResponse {
            block: question,
            messages: validation.messages,
        }
    }
}
