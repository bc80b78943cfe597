// ── Application state ──
//
// An immutable snapshot of everything the client mirrors from the server.
// Each slice sits behind its own `Arc`: a reducer that leaves a slice alone
// keeps its pointer, which is what subscriptions compare.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

use crate::action::{Intent, Modal, OperationId};
use crate::error::ErrorRecord;
use crate::model::{
    Analysis, Document, GenbankRecord, Group, HistoryChange, Hmm, HmmStatus, Job, Otu, OtuName,
    Page, Pagination, Reference, Sample, Settings,
};

// ── ListSlice ────────────────────────────────────────────────────────

/// Find results, cursor and the document currently open in detail view.
///
/// `None` means "never fetched", which views render differently from an
/// empty result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSlice<T> {
    pub documents: Option<Vec<T>>,
    pub cursor: Option<Pagination>,
    pub detail: Option<T>,
}

impl<T> Default for ListSlice<T> {
    fn default() -> Self {
        Self {
            documents: None,
            cursor: None,
            detail: None,
        }
    }
}

impl<T: Document> ListSlice<T> {
    /// Replace documents and cursor with a fresh server page.
    pub(crate) fn replace_page(&mut self, page: &Page<T>) {
        self.documents = Some(page.documents.clone());
        self.cursor = Some(Pagination::from(page));
    }

    /// Replace documents from an unpaginated listing.
    pub(crate) fn replace_all(&mut self, documents: &[T]) {
        self.documents = Some(documents.to_vec());
        self.cursor = None;
    }

    /// Swap in the server copy of a document, or append it if unseen.
    pub(crate) fn upsert(&mut self, document: &T) {
        let documents = self.documents.get_or_insert_with(Vec::new);
        match documents.iter_mut().find(|d| d.id() == document.id()) {
            Some(existing) => *existing = document.clone(),
            None => documents.push(document.clone()),
        }
        if self.detail.as_ref().is_some_and(|d| d.id() == document.id()) {
            self.detail = Some(document.clone());
        }
    }

    /// Open a document in detail view, refreshing its list entry.
    pub(crate) fn set_detail(&mut self, document: &T) {
        if let Some(existing) = self
            .documents
            .as_mut()
            .and_then(|docs| docs.iter_mut().find(|d| d.id() == document.id()))
        {
            *existing = document.clone();
        }
        self.detail = Some(document.clone());
    }

    pub(crate) fn remove(&mut self, id: &str) {
        if let Some(documents) = self.documents.as_mut() {
            documents.retain(|d| d.id() != id);
        }
        if self.detail.as_ref().is_some_and(|d| d.id() == id) {
            self.detail = None;
        }
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.documents
            .as_ref()
            .is_some_and(|docs| docs.iter().any(|d| d.id() == id))
            || self.detail.as_ref().is_some_and(|d| d.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.documents
            .as_ref()
            .and_then(|docs| docs.iter().find(|d| d.id() == id))
            .or_else(|| self.detail.as_ref().filter(|d| d.id() == id))
    }
}

// ── Resource-specific slices ─────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OtuSlice {
    #[serde(flatten)]
    pub list: ListSlice<Otu>,
    pub names: Option<Vec<OtuName>>,
    pub history: Option<Vec<HistoryChange>>,
    pub last_genbank: Option<GenbankRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HmmSlice {
    #[serde(flatten)]
    pub list: ListSlice<Hmm>,
    pub status: Option<HmmStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterState {
    pub path: String,
    pub modals: BTreeSet<Modal>,
}

impl Default for RouterState {
    fn default() -> Self {
        Self {
            path: "/".into(),
            modals: BTreeSet::new(),
        }
    }
}

// ── AppState ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub references: Arc<ListSlice<Reference>>,
    pub otus: Arc<OtuSlice>,
    pub groups: Arc<ListSlice<Group>>,
    pub samples: Arc<ListSlice<Sample>>,
    pub analyses: Arc<ListSlice<Analysis>>,
    pub jobs: Arc<ListSlice<Job>>,
    pub hmms: Arc<HmmSlice>,
    pub settings: Arc<Option<Settings>>,
    pub router: Arc<RouterState>,
    /// In-flight operations that carry a pending flag.
    pub pending: Arc<BTreeMap<OperationId, Intent>>,
    /// Last failure per intent, keyed `"{INTENT}_ERROR"`.
    pub errors: Arc<BTreeMap<String, ErrorRecord>>,
}

impl AppState {
    /// Whether any operation of this intent is in flight.
    pub fn is_pending(&self, intent: Intent) -> bool {
        self.pending.values().any(|i| *i == intent)
    }

    pub fn is_op_pending(&self, op: OperationId) -> bool {
        self.pending.contains_key(&op)
    }

    pub fn error(&self, intent: Intent) -> Option<&ErrorRecord> {
        self.errors.get(&intent.error_key())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use super::*;

    fn group(id: &str, modify_otu: bool) -> Group {
        Group {
            id: id.into(),
            permissions: BTreeMap::from([("modify_otu".to_owned(), modify_otu)]),
            extra: Map::new(),
        }
    }

    #[test]
    fn upsert_replaces_or_appends() {
        let mut slice = ListSlice::default();
        slice.replace_all(&[group("a", false)]);
        slice.upsert(&group("a", true));
        slice.upsert(&group("b", false));

        let docs = slice.documents.as_ref().map(Vec::len);
        assert_eq!(docs, Some(2));
        assert_eq!(slice.get("a").map(|g| g.permissions["modify_otu"]), Some(true));
    }

    #[test]
    fn remove_clears_detail() {
        let mut slice = ListSlice::default();
        slice.replace_all(&[group("a", false), group("b", false)]);
        slice.set_detail(&group("a", false));
        slice.remove("a");

        assert!(slice.detail.is_none());
        assert!(!slice.contains("a"));
        assert!(slice.contains("b"));
    }

    #[test]
    fn state_serializes_by_slice() {
        let value = serde_json::to_value(AppState::default()).unwrap_or_default();
        assert_eq!(value["router"], json!({ "path": "/", "modals": [] }));
        assert_eq!(value["references"]["documents"], json!(null));
    }
}
