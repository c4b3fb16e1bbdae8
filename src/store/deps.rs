//! Typed container of shared services available to effects.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Services injected at store construction and handed to every effect.
///
/// Effects look services up by type; the model never sees them.
#[derive(Clone, Default)]
pub struct Deps {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Deps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Send + Sync + 'static>(mut self, service: T) -> Self {
        self.insert(Arc::new(service));
        self
    }

    pub fn insert<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
        self.services.insert(TypeId::of::<T>(), service);
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let service = self.services.get(&TypeId::of::<T>())?;
        Arc::clone(service).downcast::<T>().ok()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl std::fmt::Debug for Deps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deps").field("services", &self.len()).finish()
    }
}
