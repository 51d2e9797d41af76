use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub text: String,
}

impl ValidationMessage {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Error,
            text: text.into(),
        }
    }
}

/// Collects authoring messages; problems are reported, never raised.
pub trait ValidationSink {
    fn add(&mut self, message: ValidationMessage);

    fn add_error(&mut self, text: String) {
        self.add(ValidationMessage::error(text));
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Validation {
    pub messages: Vec<ValidationMessage>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|m| m.message_type == MessageType::Error)
            .map(|m| m.text.as_str())
    }
}

impl ValidationSink for Validation {
    fn add(&mut self, message: ValidationMessage) {
        self.messages.push(message);
    }
}
