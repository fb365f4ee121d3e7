//! Service registry and updater registration
//!
//! [`ServiceRegistry`] is a small type-erased service container: services are
//! stored under string identifiers and resolved as `Rc<dyn Any>`, leaving it
//! to the caller to check the concrete type.
//!
//! [`RegistryBuilder`] registers services and tags some of them as updaters.
//! Building it yields the registry plus the [`UpdaterIndexes`] the install
//! manager consumes: updater service ids ordered by descending priority
//! (registration order among equal priorities) and a lookup from updater
//! identifier to service id.

use crate::error::RegistryError;
use crate::installer::updater::Updater;
use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Type-erased service container
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Rc<dyn Any>>,
    order: Vec<String>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service under an identifier
    pub fn register<T: Any>(&mut self, id: &str, service: T) -> Result<(), RegistryError> {
        if self.services.contains_key(id) {
            return Err(RegistryError::Duplicate(id.to_string()));
        }
        self.services.insert(id.to_string(), Rc::new(service));
        self.order.push(id.to_string());
        Ok(())
    }

    /// Resolve a service by identifier
    pub fn resolve(&self, id: &str) -> Result<Rc<dyn Any>, RegistryError> {
        self.services
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    /// Every registered identifier, in registration order
    pub fn service_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Indexes built at registration time for the install manager
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdaterIndexes {
    /// Updater service ids, in the order updaters are visited
    pub updater_index: Vec<String>,
    /// Updater identifier to service id
    pub class_index: HashMap<String, String>,
}

#[derive(Debug)]
struct UpdaterTag {
    service_id: String,
    identifier: String,
    priority: i32,
}

/// Collects services and updater tags, then builds the registry and indexes
#[derive(Default)]
pub struct RegistryBuilder {
    registry: ServiceRegistry,
    tags: Vec<UpdaterTag>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plain service, not tagged as an updater
    pub fn service<T: Any>(&mut self, id: &str, service: T) -> Result<&mut Self, RegistryError> {
        self.registry.register(id, service)?;
        Ok(self)
    }

    /// Register an updater service and tag it, with default priority
    pub fn updater(&mut self, id: &str, updater: Updater) -> Result<&mut Self, RegistryError> {
        self.updater_with_priority(id, updater, 0)
    }

    /// Register an updater service and tag it; higher priorities are visited first
    ///
    /// The updater's name is its version store key, so it must be non-empty
    /// and must not start with `\`.
    pub fn updater_with_priority(
        &mut self,
        id: &str,
        updater: Updater,
        priority: i32,
    ) -> Result<&mut Self, RegistryError> {
        let identifier = updater.name().to_string();
        self.check_identifier(&identifier)?;
        self.registry.register(id, updater)?;
        self.tag_updater(id, &identifier, priority)
    }

    fn check_identifier(&self, identifier: &str) -> Result<(), RegistryError> {
        if identifier.is_empty() || identifier.starts_with('\\') {
            return Err(RegistryError::InvalidIdentifier(identifier.to_string()));
        }
        if self.tags.iter().any(|tag| tag.identifier == identifier) {
            return Err(RegistryError::DuplicateIdentifier(identifier.to_string()));
        }
        Ok(())
    }

    /// Tag an already registered service id as an updater
    ///
    /// The tagged service is only checked to be an [`Updater`] when the install
    /// manager resolves it.
    pub fn tag_updater(
        &mut self,
        service_id: &str,
        identifier: &str,
        priority: i32,
    ) -> Result<&mut Self, RegistryError> {
        let identifier = identifier.trim_start_matches('\\');
        self.check_identifier(identifier)?;
        self.tags.push(UpdaterTag {
            service_id: service_id.to_string(),
            identifier: identifier.to_string(),
            priority,
        });
        Ok(self)
    }

    pub fn build(self) -> (ServiceRegistry, UpdaterIndexes) {
        let mut tags = self.tags;
        // Stable: equal priorities keep registration order
        tags.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut indexes = UpdaterIndexes::default();
        for tag in tags {
            debug!(
                "registered updater '{}' as service '{}' (priority {})",
                tag.identifier, tag.service_id, tag.priority
            );
            indexes.updater_index.push(tag.service_id.clone());
            indexes.class_index.insert(tag.identifier, tag.service_id);
        }

        (self.registry, indexes)
    }
}
