//! Adapter registry
//!
//! Single source of truth for which models exist. Registration happens
//! once at process start from the configuration; after that the registry
//! is read-only and shared behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::error::{Result, TtsError};
use super::traits::{ModelAdapter, ModelDescriptor};

/// One registered model: its adapter plus the lock that serializes
/// synthesis against it
pub struct RegisteredModel {
    adapter: Arc<dyn ModelAdapter>,
    /// Held for the duration of a synthesize call. Backend runtimes are
    /// not assumed safe for concurrent use on one loaded model.
    synthesis_lock: Mutex<()>,
}

impl std::fmt::Debug for RegisteredModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredModel")
            .field("id", &self.adapter.descriptor().id)
            .finish()
    }
}

impl RegisteredModel {
    pub fn adapter(&self) -> &Arc<dyn ModelAdapter> {
        &self.adapter
    }

    pub fn descriptor(&self) -> &ModelDescriptor {
        self.adapter.descriptor()
    }

    pub fn synthesis_lock(&self) -> &Mutex<()> {
        &self.synthesis_lock
    }
}

/// Registry mapping a model identifier to its adapter
#[derive(Default)]
pub struct AdapterRegistry {
    models: HashMap<String, Arc<RegisteredModel>>,
    /// Registration order, preserved for listings
    order: Vec<String>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its descriptor id
    ///
    /// Fails if the id is already taken; ids are the registry key and
    /// must be unique.
    pub fn register(&mut self, adapter: Arc<dyn ModelAdapter>) -> Result<()> {
        let id = adapter.descriptor().id.clone();
        if self.models.contains_key(&id) {
            return Err(TtsError::Config {
                message: format!("Model '{}' registered twice", id),
                path: None,
            });
        }
        self.models.insert(
            id.clone(),
            Arc::new(RegisteredModel {
                adapter,
                synthesis_lock: Mutex::new(()),
            }),
        );
        self.order.push(id);
        Ok(())
    }

    /// Resolve a model id to its registered entry
    pub fn resolve(&self, model_id: &str) -> Result<Arc<RegisteredModel>> {
        self.models
            .get(model_id)
            .cloned()
            .ok_or_else(|| TtsError::UnknownModel {
                model: model_id.to_string(),
            })
    }

    /// Check whether a model id is registered
    pub fn is_registered(&self, model_id: &str) -> bool {
        self.models.contains_key(model_id)
    }

    /// Descriptors of all registered models, in registration order
    pub fn descriptors(&self) -> Vec<ModelDescriptor> {
        self.order
            .iter()
            .filter_map(|id| self.models.get(id))
            .map(|m| m.descriptor().clone())
            .collect()
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
