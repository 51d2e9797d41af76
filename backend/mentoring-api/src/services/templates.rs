use serde_json::Value;

use super::error::RenderError;
use crate::utils::html::escape;

pub const TIP_TEMPLATE: &str = "templates/html/tip.html";
pub const TIP_CHOICE_GROUP_TEMPLATE: &str = "templates/html/tip_choice_group.html";
pub const ADD_BUTTONS_TEMPLATE: &str = "templates/html/questionnaire_add_buttons.html";
pub const RATING_PREVIEW_TEMPLATE: &str = "templates/html/ratingblock_edit_preview.html";
pub const STUDIO_CHILD_TEMPLATE: &str = "templates/html/studio_child.html";

/// Turns a named template and its context into markup.
pub trait TemplateRenderer: Send + Sync {
    fn render_template(&self, name: &str, context: &Value) -> Result<String, RenderError>;
}

/// Templates shipped with the service.
///
/// Values that carry authored rich text (`content`, `tips_html`, `question`,
/// `children`) are inserted as-is; everything else is escaped.
#[derive(Debug, Default, Clone)]
pub struct BuiltinTemplates;

impl TemplateRenderer for BuiltinTemplates {
    fn render_template(&self, name: &str, context: &Value) -> Result<String, RenderError> {
        let html = match name {
            TIP_TEMPLATE => render_tip(context),
            TIP_CHOICE_GROUP_TEMPLATE => render_tip_choice_group(context),
            ADD_BUTTONS_TEMPLATE => render_add_buttons(),
            RATING_PREVIEW_TEMPLATE => render_rating_preview(context),
            STUDIO_CHILD_TEMPLATE => render_studio_child(context),
            other => return Err(RenderError::UnknownTemplate(other.to_string())),
        };
        Ok(html)
    }
}

fn str_param<'a>(context: &'a Value, key: &str) -> &'a str {
    context.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn render_tip(context: &Value) -> String {
    let width = str_param(context, "width");
    let height = str_param(context, "height");

    let mut attrs = String::new();
    if !width.is_empty() {
        attrs.push_str(&format!(" data-width=\"{}\"", escape(width)));
    }
    if !height.is_empty() {
        attrs.push_str(&format!(" data-height=\"{}\"", escape(height)));
    }

    format!(
        "<div class=\"tip\"{}>{}</div>",
        attrs,
        str_param(context, "content")
    )
}

fn render_tip_choice_group(context: &Value) -> String {
    let tips: String = context
        .get("tips_html")
        .and_then(Value::as_array)
        .map(|tips| tips.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    format!("<div class=\"tip-choice-group\">{}</div>", tips)
}

fn render_add_buttons() -> String {
    concat!(
        "<div class=\"add-xblock-component new-component-item adding\">",
        "<div class=\"new-component\">",
        "<ul class=\"new-component-type\">",
        "<li><a href=\"#\" class=\"single-template add-xblock-component-button\" ",
        "data-category=\"pb-choice\" data-boilerplate=\"\">Custom Choice</a></li>",
        "<li><a href=\"#\" class=\"single-template add-xblock-component-button\" ",
        "data-category=\"pb-tip\" data-boilerplate=\"\">Tip</a></li>",
        "</ul></div></div>"
    )
    .to_string()
}

fn render_rating_preview(context: &Value) -> String {
    let low = escape(str_param(context, "low"));
    let high = escape(str_param(context, "high"));
    let statuses: Vec<Option<&str>> = context
        .get("accepted_statuses")
        .and_then(Value::as_array)
        .map(|values| values.iter().map(Value::as_str).collect())
        .unwrap_or_default();

    let mut html = format!(
        "<div class=\"rating-edit-preview\"><p>{}</p><ol class=\"rating-scale\">",
        str_param(context, "question")
    );
    for value in 1..=5usize {
        let label = match value {
            1 => format!("1 - {}", low),
            5 => format!("5 - {}", high),
            _ => value.to_string(),
        };
        // index 0 is a placeholder so the list lines up with the rating values
        let status = statuses.get(value).copied().flatten().unwrap_or_default();
        html.push_str(&format!(
            "<li data-value=\"{}\"><span class=\"rating-label\">{}</span> <span class=\"rating-status\">{}</span></li>",
            value,
            label,
            escape(status)
        ));
    }
    html.push_str("</ol></div>");
    html
}

fn render_studio_child(context: &Value) -> String {
    format!(
        "<div class=\"studio-xblock-wrapper\" data-usage-id=\"{}\" data-category=\"{}\"><span class=\"xblock-display-name\">{}</span>{}</div>",
        escape(str_param(context, "id")),
        escape(str_param(context, "category")),
        escape(str_param(context, "display_name")),
        str_param(context, "children")
    )
}
