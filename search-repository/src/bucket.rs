//! Registry of named repositories.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::errors::RepositoryError;
use crate::interfaces::{Repository, SharedRepository};

/// Maps logical repository names to repositories.
///
/// The bucket is populated once at startup through [`register`](Self::register),
/// which takes `&mut self`; once it is shared behind an `Arc` it can only be
/// read. Each repository sits behind its own mutex so concurrent producers
/// serialize on `add_item` / `flush`.
pub struct RepositoryBucket<R> {
    repositories: BTreeMap<String, SharedRepository<R>>,
}

impl<R: Send + 'static> RepositoryBucket<R> {
    pub fn new() -> Self {
        Self {
            repositories: BTreeMap::new(),
        }
    }

    /// Register a repository under `name`.
    ///
    /// Fails with `DuplicateRepository` if the name is taken; the repository
    /// already registered under it stays in place.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        repository: Box<dyn Repository<R>>,
    ) -> Result<(), RepositoryError> {
        let name = name.into();
        if self.repositories.contains_key(&name) {
            return Err(RepositoryError::duplicate(name));
        }

        info!(repository = %name, "Registered repository");
        self.repositories
            .insert(name, Arc::new(Mutex::new(repository)));
        Ok(())
    }

    /// Repository registered under `name`.
    pub fn get(&self, name: &str) -> Result<SharedRepository<R>, RepositoryError> {
        self.repositories
            .get(name)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(name))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.repositories.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

impl<R: Send + 'static> Default for RepositoryBucket<R> {
    fn default() -> Self {
        Self::new()
    }
}
