//! Persisted state layout.
//!
//! Navigation state survives a full process teardown through a single
//! [`StateBlob`]: one section per registered scope, keyed by the scope key's
//! stable name. Each section holds the scope's ordered destination payloads,
//! the parallel transition metadata, the last-removed pair (so the correct
//! exit transition plays on the first render after a restore), and a nested
//! dialog-overlay sub-blob.
//!
//! The host contract is two explicit calls:
//!
//! - [`Navigator::restore`](crate::navigator::Navigator::restore) hands the
//!   engine the blob read back at construction;
//! - [`Navigator::persist`](crate::navigator::Navigator::persist) produces
//!   the blob to write out before teardown.
//!
//! Restoration *consumes* a scope's section the first time that scope is
//! resolved ([`StateBlob::take_section`]), which is what guarantees at most
//! one restore per scope per process lifetime.
//!
//! Payloads are stored as JSON values and the whole blob round-trips through
//! [`to_bytes`](StateBlob::to_bytes) / [`from_bytes`](StateBlob::from_bytes);
//! where the bytes live (file, key-value store, host bundle) is the host's
//! business.

use crate::transition::Transition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============================================================================
// Sections
// ============================================================================

/// Persisted form of one scope: its history plus its dialog overlays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeSection {
    /// Ordered destination payloads, oldest first.
    pub destinations: Vec<Value>,

    /// Transition metadata, parallel to `destinations`.
    pub transitions: Vec<Transition>,

    /// The record most recently removed before the save, if any.
    pub last_removed: Option<RemovedEntry>,

    /// Nested dialog-overlay sub-blob.
    #[serde(default)]
    pub dialogs: DialogSection,
}

/// Persisted form of a removed record: destination payload plus the
/// transition it was pushed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedEntry {
    pub destination: Value,
    pub transition: Transition,
}

/// Persisted form of a scope's dialog-overlay stack. A missing or empty
/// section means "no overlays were open".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogSection {
    /// Ordered overlay id payloads, oldest first.
    pub overlays: Vec<Value>,
}

// ============================================================================
// StateBlob
// ============================================================================

/// The shared top-level blob: one [`ScopeSection`] per scope, keyed by the
/// scope's stable name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateBlob {
    sections: BTreeMap<String, ScopeSection>,
}

impl StateBlob {
    /// Create an empty blob.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sections held.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the blob holds no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether a section exists for the given scope name.
    pub fn contains(&self, scope_name: &str) -> bool {
        self.sections.contains_key(scope_name)
    }

    /// Iterate the section keys currently held.
    pub fn section_keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Insert (or replace) the section for a scope.
    pub fn insert_section(&mut self, scope_name: impl Into<String>, section: ScopeSection) {
        self.sections.insert(scope_name.into(), section);
    }

    /// Remove and return the section for a scope.
    ///
    /// Returns `None` when no section exists — a fresh scope, not an error.
    /// Removal is what makes restoration consume-once: a second call for the
    /// same scope yields `None`.
    pub fn take_section(&mut self, scope_name: &str) -> Option<ScopeSection> {
        self.sections.remove(scope_name)
    }

    /// Encode the blob to bytes for the host to store.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a blob previously produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

// ============================================================================
// Tests
// ============================================================================
