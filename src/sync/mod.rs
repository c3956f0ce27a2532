//! # Remote Sync
//!
//! Optional mirroring of the calendar collection into a per-user remote
//! document. The remote is best-effort: local storage stays authoritative,
//! pushes are fire-and-forget, and remote failures are logged and dropped.

pub mod memory;
pub mod worker;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{calendar::RecurringTransactionRecord, errors::Result};

pub use memory::InMemoryRemote;
pub use worker::RemoteSync;

/// Per-user remote document. Accounts and balances belong to other
/// subsystems and are carried as opaque JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub user_id: String,
    #[serde(default)]
    pub accounts: Vec<Value>,
    #[serde(default)]
    pub balances: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_events: Option<Vec<RecurringTransactionRecord>>,
}

impl UserDocument {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    /// Overwrites only the fields present in `patch`.
    pub fn apply(&mut self, patch: DocumentPatch) {
        if let Some(accounts) = patch.accounts {
            self.accounts = accounts;
        }
        if let Some(balances) = patch.balances {
            self.balances = balances;
        }
        if let Some(events) = patch.calendar_events {
            self.calendar_events = Some(events);
        }
    }
}

/// Partial document upsert; absent fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balances: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_events: Option<Vec<RecurringTransactionRecord>>,
}

impl DocumentPatch {
    pub fn calendar_events(events: Vec<RecurringTransactionRecord>) -> Self {
        Self {
            calendar_events: Some(events),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_none() && self.balances.is_none() && self.calendar_events.is_none()
    }
}

/// Remote document store for the signed-in user.
#[async_trait]
pub trait RemoteDocumentStore: Send + Sync {
    /// Returns the user's document, or `None` when nothing was stored yet.
    async fn fetch(&self) -> Result<Option<UserDocument>>;

    /// Upserts the provided fields of the user's document.
    async fn upsert(&self, patch: DocumentPatch) -> Result<()>;
}

/// Decides whether cloud sync may run right now (signed in, online, opted in).
pub trait SyncGate: Send + Sync {
    fn cloud_sync_allowed(&self) -> bool;
}

impl<F> SyncGate for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn cloud_sync_allowed(&self) -> bool {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn apply_overwrites_only_present_fields() {
        let mut doc = UserDocument::new("user-1");
        doc.accounts = vec![json!({ "id": "acc-1" })];
        doc.apply(DocumentPatch::calendar_events(Vec::new()));
        assert_eq!(doc.accounts.len(), 1);
        assert_eq!(doc.calendar_events, Some(Vec::new()));

        doc.apply(DocumentPatch {
            accounts: Some(Vec::new()),
            ..Default::default()
        });
        assert!(doc.accounts.is_empty());
        assert_eq!(doc.calendar_events, Some(Vec::new()));
    }

    #[test]
    fn document_decodes_without_calendar_events() {
        let doc: UserDocument = serde_json::from_value(json!({
            "userId": "user-9",
            "accounts": [],
            "balances": [{ "id": "b1", "amount": 10 }]
        }))
        .unwrap();
        assert_eq!(doc.balances.len(), 1);
        assert!(doc.calendar_events.is_none());
    }

    #[test]
    fn patch_serializes_only_provided_fields() {
        let patch = DocumentPatch::calendar_events(Vec::new());
        assert!(!patch.is_empty());
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, json!({ "calendarEvents": [] }));
        assert!(DocumentPatch::default().is_empty());
    }

    #[test]
    fn closures_act_as_gates() {
        let open = || true;
        let closed = || false;
        assert!(open.cloud_sync_allowed());
        assert!(!closed.cloud_sync_allowed());
    }
}
