//! Handler registry: domain name → handler.
//!
//! Populated once during startup, then shared read-only (typically behind an
//! `Arc`). There is no global instance and no runtime unregistration.

use std::collections::BTreeMap;

use remedy_core::DomainId;
use thiserror::Error;
use tracing::debug;

use crate::handler::DomainHandler;
use crate::{BatchHandler, ConversionHandler, InventoryHandler, ProductHandler, RecipeHandler};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Another handler already owns this domain.
    #[error("a handler is already registered for domain `{0}`")]
    DuplicateDomain(DomainId),

    /// Domains must have a non-empty name.
    #[error("cannot register a handler under an empty domain")]
    EmptyDomain,

    /// No handler is registered for this domain.
    #[error("no handler registered for domain `{0}`")]
    UnknownDomain(DomainId),
}

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<DomainId, Box<dyn DomainHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the batch, inventory, conversion, recipe and product handlers.
    pub fn with_builtin_handlers() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(DomainId::batch(), BatchHandler)?;
        registry.register(DomainId::inventory(), InventoryHandler)?;
        registry.register(DomainId::conversion(), ConversionHandler)?;
        registry.register(DomainId::recipe(), RecipeHandler)?;
        registry.register(DomainId::product(), ProductHandler)?;
        Ok(registry)
    }

    /// Register `handler` for `domain`. Never overrides an existing entry.
    pub fn register(
        &mut self,
        domain: DomainId,
        handler: impl DomainHandler + 'static,
    ) -> Result<(), RegistryError> {
        if domain.is_empty() {
            return Err(RegistryError::EmptyDomain);
        }
        if self.handlers.contains_key(&domain) {
            return Err(RegistryError::DuplicateDomain(domain));
        }
        debug!(%domain, codes = handler.codes().len(), "registered domain handler");
        self.handlers.insert(domain, Box::new(handler));
        Ok(())
    }

    pub fn lookup(&self, domain: &DomainId) -> Result<&dyn DomainHandler, RegistryError> {
        self.handlers
            .get(domain)
            .map(|h| h.as_ref())
            .ok_or_else(|| RegistryError::UnknownDomain(domain.clone()))
    }

    pub fn contains(&self, domain: &DomainId) -> bool {
        self.handlers.contains_key(domain)
    }

    pub fn domains(&self) -> impl Iterator<Item = &DomainId> {
        self.handlers.keys()
    }

    /// Every registered `(domain, code)` pair.
    pub fn routes(&self) -> impl Iterator<Item = (&DomainId, &'static str)> {
        self.handlers
            .iter()
            .flat_map(|(domain, handler)| handler.codes().iter().map(move |code| (domain, *code)))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl core::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("domains", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
