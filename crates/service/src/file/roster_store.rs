use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::roster::{RosterDocument, RosterRepository};
use crate::storage::json_document_store::JsonDocumentStore;

/// File-backed roster: a single JSON file holding `{ "students": [...] }`.
pub struct RosterFileStore {
    store: JsonDocumentStore<RosterDocument>,
}

impl RosterFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        Arc::new(Self { store: JsonDocumentStore::new(path) })
    }

    pub fn path(&self) -> &std::path::Path {
        self.store.path()
    }
}

#[async_trait]
impl RosterRepository for RosterFileStore {
    async fn load(&self) -> Result<RosterDocument, ServiceError> { self.store.load().await }
    async fn store(&self, roster: &RosterDocument) -> Result<(), ServiceError> { self.store.save(roster).await }
}
