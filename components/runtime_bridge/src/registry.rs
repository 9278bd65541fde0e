//! Instance registry.
//!
//! Owns every live [`AppInstance`] keyed by its string id. All mutation of
//! an instance goes through a borrow from here; the take/reinsert pattern
//! in the runtime exists so a framework hook can hold the instance mutably
//! while the registry stays free for lookups.

use app_core::AppInstance;
use std::collections::HashMap;

/// Table of live instances keyed by id.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: HashMap<String, AppInstance>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an instance, returning whatever previously held its id.
    pub fn insert(&mut self, app: AppInstance) -> Option<AppInstance> {
        self.instances.insert(app.id().to_string(), app)
    }

    /// Removes and returns the instance at `id`.
    pub fn take(&mut self, id: &str) -> Option<AppInstance> {
        self.instances.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&AppInstance> {
        self.instances.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut AppInstance> {
        self.instances.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
