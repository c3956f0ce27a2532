use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex, MutexGuard,
};

use super::{DocumentPatch, RemoteDocumentStore, UserDocument};
use crate::errors::{CalendarError, Result};

/// Process-local remote document store with upsert semantics.
///
/// Can be switched offline to exercise failure handling.
#[derive(Debug)]
pub struct InMemoryRemote {
    user_id: String,
    document: Mutex<Option<UserDocument>>,
    online: AtomicBool,
    upserts: AtomicUsize,
}

impl InMemoryRemote {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            document: Mutex::new(None),
            online: AtomicBool::new(true),
            upserts: AtomicUsize::new(0),
        }
    }

    pub fn with_document(document: UserDocument) -> Self {
        let remote = Self::new(document.user_id.clone());
        *remote.lock() = Some(document);
        remote
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Number of upserts that reached the store.
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Option<UserDocument> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<UserDocument>> {
        // A poisoned lock still holds a consistent document.
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_online(&self) -> Result<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CalendarError::Remote("remote store unreachable".into()))
        }
    }
}

#[async_trait]
impl RemoteDocumentStore for InMemoryRemote {
    async fn fetch(&self) -> Result<Option<UserDocument>> {
        self.ensure_online()?;
        Ok(self.lock().clone())
    }

    async fn upsert(&self, patch: DocumentPatch) -> Result<()> {
        self.ensure_online()?;
        if patch.is_empty() {
            return Ok(());
        }
        let mut guard = self.lock();
        guard
            .get_or_insert_with(|| UserDocument::new(self.user_id.clone()))
            .apply(patch);
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
