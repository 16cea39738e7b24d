// src/nlp/resources.rs
//! Shared, lazily loaded language resources.
//!
//! Loaders run at most once per handle; the loaded model and embedder are then
//! shared read-only by every engine and thread holding the handle.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use super::embedding::{EmbeddingBackend, NgramEmbedder};
use super::model::{LanguageModel, RuleBasedModel};
use crate::config::{Capabilities, Lexicon};
use crate::extractors::pattern;
use crate::utils::error::ExtractError;

type ModelLoader = Box<dyn Fn() -> Result<Arc<dyn LanguageModel>, ExtractError> + Send + Sync>;
type EmbedderLoader =
    Box<dyn Fn() -> Result<Arc<dyn EmbeddingBackend>, ExtractError> + Send + Sync>;

pub struct NlpResources {
    model_loader: ModelLoader,
    embedder_loader: Option<EmbedderLoader>,
    model: OnceCell<Result<Arc<dyn LanguageModel>, String>>,
    embedder: OnceCell<Option<Arc<dyn EmbeddingBackend>>>,
}

impl fmt::Debug for NlpResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NlpResources")
            .field("model_loaded", &self.model.get().is_some())
            .field("embedder_loaded", &self.embedder.get().is_some())
            .field("has_embedder_loader", &self.embedder_loader.is_some())
            .finish()
    }
}

impl NlpResources {
    pub fn new<F>(model_loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn LanguageModel>, ExtractError> + Send + Sync + 'static,
    {
        Self {
            model_loader: Box::new(model_loader),
            embedder_loader: None,
            model: OnceCell::new(),
            embedder: OnceCell::new(),
        }
    }

    pub fn with_embedder_loader<F>(mut self, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn EmbeddingBackend>, ExtractError> + Send + Sync + 'static,
    {
        self.embedder_loader = Some(Box::new(loader));
        self
    }

    /// Rule-based model with a gazetteer built from `lexicon`, plus the
    /// n-gram embedder.
    pub fn builtin(lexicon: &Lexicon) -> Self {
        let lexicon = lexicon.clone();
        Self::new(move || {
            let model: Arc<dyn LanguageModel> = Arc::new(RuleBasedModel::from_lexicon(&lexicon));
            Ok(model)
        })
        .with_embedder_loader(|| {
            let embedder: Arc<dyn EmbeddingBackend> = Arc::new(NgramEmbedder::default());
            Ok(embedder)
        })
    }

    /// Already-constructed components, mainly for tests.
    pub fn from_parts(
        model: Arc<dyn LanguageModel>,
        embedder: Option<Arc<dyn EmbeddingBackend>>,
    ) -> Self {
        let mut resources = Self::new(move || Ok(Arc::clone(&model)));
        if let Some(embedder) = embedder {
            resources = resources.with_embedder_loader(move || Ok(Arc::clone(&embedder)));
        }
        resources
    }

    /// Loads the language model on first call. A failed load is remembered.
    pub fn model(&self) -> Result<Arc<dyn LanguageModel>, ExtractError> {
        let loaded = self.model.get_or_init(|| match (self.model_loader)() {
            Ok(model) => {
                info!("Language model '{}' loaded", model.name());
                Ok(model)
            }
            Err(e) => {
                warn!("Language model failed to load: {}", e);
                Err(e.to_string())
            }
        });
        loaded.clone().map_err(ExtractError::Model)
    }

    /// Loads the embedding backend on first call; `None` when there is no
    /// loader or it failed.
    pub fn embedder(&self) -> Option<Arc<dyn EmbeddingBackend>> {
        self.embedder
            .get_or_init(|| {
                let loader = self.embedder_loader.as_ref()?;
                match loader() {
                    Ok(embedder) => {
                        info!(
                            "Embedding backend '{}' loaded ({} dimensions)",
                            embedder.name(),
                            embedder.dimensions()
                        );
                        Some(embedder)
                    }
                    Err(e) => {
                        warn!("Embedding backend unavailable, semantic matching disabled: {}", e);
                        None
                    }
                }
            })
            .clone()
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            semantic_available: self.embedder().is_some(),
            patterns_available: pattern::patterns_available(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::config::lexicon::tech_lexicon;

    #[test]
    fn loaders_run_once_across_threads() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let resources = Arc::new(NlpResources::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let model: Arc<dyn LanguageModel> = Arc::new(RuleBasedModel::new());
            Ok(model)
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let resources = Arc::clone(&resources);
                std::thread::spawn(move || resources.model().is_ok())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_embedder_disables_semantic_capability() {
        let resources = NlpResources::builtin(&tech_lexicon())
            .with_embedder_loader(|| Err(ExtractError::Embedding("no weights".into())));
        let caps = resources.capabilities();
        assert!(!caps.semantic_available);
        assert!(caps.patterns_available);
    }

    #[test]
    fn failed_model_is_reported_every_time() {
        let resources = NlpResources::new(|| Err(ExtractError::Model("missing".into())));
        assert!(resources.model().is_err());
        assert!(resources.model().is_err());
    }

    #[test]
    fn builtin_resources_have_semantic_capability() {
        let resources = NlpResources::builtin(&tech_lexicon());
        assert!(resources.capabilities().semantic_available);
        assert!(resources.model().is_ok());
    }
}
