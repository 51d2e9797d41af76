use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),
    #[error("Block already exists: {0}")]
    BlockExists(String),
    #[error("Tip not found: {0}")]
    TipNotFound(String),
    #[error("Choice not found: {0}")]
    ChoiceNotFound(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Unsupported element <{0}>")]
    UnsupportedElement(String),
    #[error("Element <{element}> is missing the '{attribute}' attribute")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
    #[error("Invalid weight '{0}'")]
    InvalidWeight(String),
}

/// Errors surfaced by block services to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("Choice value already exists: {0}")]
    DuplicateChoice(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Store(StoreError::BlockNotFound(_))
            | ServiceError::Store(StoreError::TipNotFound(_))
            | ServiceError::Store(StoreError::ChoiceNotFound(_)) => StatusCode::NOT_FOUND,
            ServiceError::Store(StoreError::BlockExists(_)) | ServiceError::DuplicateChoice(_) => {
                StatusCode::CONFLICT
            }
            ServiceError::Import(_) => StatusCode::BAD_REQUEST,
            ServiceError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
