use uuid::Uuid;

use super::error::ImportError;
use crate::metrics::IMPORTS_TOTAL;
use crate::models::choice::Choice;
use crate::models::question::{Question, QuestionKind, DEFAULT_HIGH, DEFAULT_LOW};
use crate::models::tip::Tip;

/// Read access to one element of legacy XML content.
pub trait LegacyNode: Sized {
    fn tag_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Text before the first child node.
    fn text(&self) -> Option<&str>;

    /// Serialized child nodes (elements, comments and processing instructions),
    /// each followed by the text that trails it.
    fn children_markup(&self) -> Vec<String>;

    fn child_elements(&self) -> Vec<Self>;
}

#[derive(Debug, Clone, Copy)]
pub struct XmlNode<'a, 'input> {
    node: roxmltree::Node<'a, 'input>,
}

impl<'a, 'input> XmlNode<'a, 'input> {
    pub fn new(node: roxmltree::Node<'a, 'input>) -> Self {
        Self { node }
    }
}

impl<'a, 'input> LegacyNode for XmlNode<'a, 'input> {
    fn tag_name(&self) -> &str {
        self.node.tag_name().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.node.attribute(name)
    }

    fn text(&self) -> Option<&str> {
        self.node.first_child().filter(|n| n.is_text()).and_then(|n| n.text())
    }

    fn children_markup(&self) -> Vec<String> {
        let source = self.node.document().input_text();
        let nodes: Vec<_> = self.node.children().filter(|n| !n.is_text()).collect();
        let Some(content_end) = self.node.last_child().map(|n| n.range().end) else {
            return Vec::new();
        };

        nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                // raw slice keeps the markup and the trailing text exactly as authored
                let end = nodes
                    .get(i + 1)
                    .map(|next| next.range().start)
                    .unwrap_or(content_end);
                source[node.range().start..end].to_string()
            })
            .collect()
    }

    fn child_elements(&self) -> Vec<Self> {
        self.node
            .children()
            .filter(|n| n.is_element())
            .map(XmlNode::new)
            .collect()
    }
}

/// Comma list with surrounding whitespace trimmed; blank entries are dropped.
fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Text followed by every embedded child element, markup preserved.
fn mixed_content<N: LegacyNode>(node: &N) -> String {
    let mut content = node.text().unwrap_or_default().to_string();
    for markup in node.children_markup() {
        content.push_str(&markup);
    }
    content
}

pub fn parse_tip<N: LegacyNode>(node: &N) -> Tip {
    Tip {
        id: Uuid::new_v4().to_string(),
        values: split_list(node.attribute("values").unwrap_or_default()).collect(),
        width: node.attribute("width").unwrap_or_default().to_string(),
        height: node.attribute("height").unwrap_or_default().to_string(),
        content: mixed_content(node),
    }
}

pub fn parse_choice<N: LegacyNode>(node: &N) -> Result<Choice, ImportError> {
    let value = node
        .attribute("value")
        .ok_or_else(|| ImportError::MissingAttribute {
            element: node.tag_name().to_string(),
            attribute: "value",
        })?;

    Ok(Choice::new(value, mixed_content(node)))
}

/// Builds an MCQ or rating block from a `<mcq>` / `<rating>` element.
pub fn parse_question<N: LegacyNode>(node: &N, id: String) -> Result<Question, ImportError> {
    let kind = match node.tag_name() {
        "mcq" => QuestionKind::Mcq,
        "rating" => QuestionKind::Rating {
            low: node.attribute("low").unwrap_or(DEFAULT_LOW).to_string(),
            high: node.attribute("high").unwrap_or(DEFAULT_HIGH).to_string(),
        },
        other => return Err(ImportError::UnsupportedElement(other.to_string())),
    };

    let mut question = Question::new(id, node.attribute("question").unwrap_or_default(), kind);

    if let Some(raw) = node.attribute("weight") {
        question.weight = raw
            .trim()
            .parse()
            .map_err(|_| ImportError::InvalidWeight(raw.to_string()))?;
    }
    if let Some(raw) = node.attribute("correct_choices") {
        question.correct_choices = split_list(raw).collect();
    }

    for child in node.child_elements() {
        match child.tag_name() {
            "choice" => question.custom_choices.push(parse_choice(&child)?),
            "tip" => question.tips.push(parse_tip(&child)),
            other => {
                tracing::warn!("Skipping unsupported <{}> inside <{}>", other, node.tag_name());
            }
        }
    }

    Ok(question)
}

/// Imports a whole block from legacy XML text.
pub fn import_question_xml(xml: &str, id: Option<String>) -> Result<Question, ImportError> {
    let result = roxmltree::Document::parse(xml)
        .map_err(ImportError::from)
        .and_then(|doc| {
            let root = XmlNode::new(doc.root_element());
            parse_question(&root, id.unwrap_or_else(|| Uuid::new_v4().to_string()))
        });

    let status = if result.is_ok() { "success" } else { "error" };
    IMPORTS_TOTAL.with_label_values(&["question", status]).inc();
    result
}

/// Imports a single `<tip>` element from legacy XML text.
pub fn import_tip_xml(xml: &str) -> Result<Tip, ImportError> {
    let result = roxmltree::Document::parse(xml)
        .map_err(ImportError::from)
        .and_then(|doc| {
            let root = XmlNode::new(doc.root_element());
            match root.tag_name() {
                "tip" => Ok(parse_tip(&root)),
                other => Err(ImportError::UnsupportedElement(other.to_string())),
            }
        });

    let status = if result.is_ok() { "success" } else { "error" };
    IMPORTS_TOTAL.with_label_values(&["tip", status]).inc();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::ChoiceSource;

    #[test]
    fn tip_values_are_trimmed() {
        let tip = import_tip_xml(r#"<tip values="a, b ,c">Hi</tip>"#).unwrap();
        let values: Vec<_> = tip.values.iter().map(String::as_str).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
        assert_eq!(tip.content, "Hi");
        assert_eq!(tip.width, "");
        assert_eq!(tip.height, "");
    }

    #[test]
    fn tip_content_keeps_embedded_markup_in_order() {
        let tip = import_tip_xml(
            r#"<tip values="a" width="400px" height="200px">Read <b>this</b> and <a href="x">that</a>!</tip>"#,
        )
        .unwrap();
        assert_eq!(tip.content, r#"Read <b>this</b> and <a href="x">that</a>!"#);
        assert_eq!(tip.width, "400px");
        assert_eq!(tip.height, "200px");
    }

    #[test]
    fn tip_content_starting_with_element() {
        let tip = import_tip_xml(r#"<tip values="a"><p>One</p><p>Two</p></tip>"#).unwrap();
        assert_eq!(tip.content, "<p>One</p><p>Two</p>");
    }

    #[test]
    fn tip_content_keeps_comments_and_their_trailing_text() {
        let tip =
            import_tip_xml(r#"<tip values="a">Hi <!-- note --> there <b>x</b> end</tip>"#).unwrap();
        assert_eq!(tip.content, "Hi <!-- note --> there <b>x</b> end");

        let tip = import_tip_xml(r#"<tip values="a"><!-- c -->Read this</tip>"#).unwrap();
        assert_eq!(tip.content, "<!-- c -->Read this");
    }

    #[test]
    fn tip_content_keeps_processing_instructions() {
        let tip = import_tip_xml(r#"<tip values="a">One<?render inline?>Two</tip>"#).unwrap();
        assert_eq!(tip.content, "One<?render inline?>Two");
    }

    #[test]
    fn blank_tip_values_are_dropped() {
        let tip = import_tip_xml(r#"<tip values="a,, b,">Hi</tip>"#).unwrap();
        let values: Vec<_> = tip.values.iter().map(String::as_str).collect();
        assert_eq!(values, vec!["a", "b"]);

        let tip = import_tip_xml(r#"<tip values="">Hi</tip>"#).unwrap();
        assert!(tip.values.is_empty());
    }

    #[test]
    fn empty_tip() {
        let tip = import_tip_xml(r#"<tip/>"#).unwrap();
        assert!(tip.values.is_empty());
        assert_eq!(tip.content, "");
    }

    #[test]
    fn non_tip_root_is_rejected() {
        let err = import_tip_xml("<choice value=\"a\"/>").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedElement(tag) if tag == "choice"));
    }

    #[test]
    fn malformed_xml_is_rejected() {
        let err = import_tip_xml("<tip values=\"a\">").unwrap_err();
        assert!(matches!(err, ImportError::Xml(_)));
    }

    #[test]
    fn imports_mcq_with_children() {
        let xml = r#"
            <mcq question="Best fruit?" correct_choices="a" weight="2">
                <choice value="a">Apple <i>(red)</i></choice>
                <choice value="b">Banana</choice>
                <tip values="a">Good pick</tip>
                <tip values="b">Too yellow</tip>
            </mcq>
        "#;
        let question = import_question_xml(xml, Some("q1".to_string())).unwrap();

        assert_eq!(question.id, "q1");
        assert_eq!(question.kind, QuestionKind::Mcq);
        assert_eq!(question.question, "Best fruit?");
        assert_eq!(question.weight, 2.0);
        assert_eq!(question.all_choice_values(), vec!["a", "b"]);
        assert_eq!(question.custom_choices[0].display_name, "Apple <i>(red)</i>");
        assert!(question.correct_choices.contains("a"));
        assert_eq!(question.tips.len(), 2);
        assert_eq!(question.tips[1].content, "Too yellow");
    }

    #[test]
    fn imports_rating_with_defaults() {
        let question = import_question_xml(r#"<rating question="Rate" low="Bad"/>"#, None).unwrap();
        assert_eq!(
            question.kind,
            QuestionKind::Rating {
                low: "Bad".to_string(),
                high: DEFAULT_HIGH.to_string()
            }
        );
        assert_eq!(question.correct_choices.len(), 5);
        assert!(!question.id.is_empty());
    }

    #[test]
    fn choice_without_value_is_rejected() {
        let err = import_question_xml("<mcq><choice>oops</choice></mcq>", None).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingAttribute { attribute: "value", .. }
        ));
    }

    #[test]
    fn invalid_weight_is_rejected() {
        let err = import_question_xml(r#"<mcq weight="heavy"/>"#, None).unwrap_err();
        assert!(matches!(err, ImportError::InvalidWeight(w) if w == "heavy"));
    }
}
