use std::sync::Arc;

use crate::config::Config;
use crate::i18n::I18n;
use authoring_service::AuthoringService;
use block_store::{BlockStore, InMemoryBlockStore};
use submission_service::SubmissionService;
use templates::{BuiltinTemplates, TemplateRenderer};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn BlockStore>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub i18n: I18n,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let i18n = I18n::from_catalog(config.i18n_catalog.clone());
        tracing::info!(
            "Translation catalog loaded with {} entries",
            config.i18n_catalog.len()
        );

        Self::with_store(config, Arc::new(InMemoryBlockStore::new()), i18n)
    }

    pub fn with_store(config: Config, store: Arc<dyn BlockStore>, i18n: I18n) -> Self {
        Self {
            config,
            store,
            renderer: Arc::new(BuiltinTemplates),
            i18n,
        }
    }

    pub fn authoring_service(&self) -> AuthoringService {
        AuthoringService::new(
            self.store.clone(),
            self.renderer.clone(),
            self.i18n.clone(),
            self.config.assets_base_url.clone(),
        )
    }

    pub fn submission_service(&self) -> SubmissionService {
        SubmissionService::new(self.store.clone(), self.renderer.clone())
    }
}

pub mod authoring_service;
pub mod block_store;
pub mod error;
pub mod evaluator;
pub mod import_service;
pub mod submission_service;
pub mod templates;
pub mod validation_service;
