//! Modal overlay stack, layered above a scope's current screen.
//!
//! A [`DialogHistory`] is an independent LIFO stack of dialog ids per scope.
//! It does not interact with the scope's [`History`](crate::history::History)
//! except through back-navigation priority: the registry dismisses the top
//! overlay before it considers popping a destination.
//!
//! Only the top overlay is "showing" unless the rendering layer chooses to
//! stack them — [`peek`](DialogHistory::peek) gives the top,
//! [`get`](DialogHistory::get) the full stack; removal is always by value
//! identity, so two overlays of the same kind may coexist when their payloads
//! differ.
//!
//! # Failure modes
//!
//! - [`pop`](DialogHistory::pop) on an empty stack returns `None` (no panic).
//! - [`remove`](DialogHistory::remove) of an id that is not present returns
//!   `None`; the caller decides whether that is a programmer error
//!   (`Controller::close_dialog` treats it as one).

use crate::destination::{DialogId, ScopeKey};
use crate::error::NavigationError;
use crate::persistence::DialogSection;
use crate::trace_log;

/// Stack of modal overlay ids for one scope.
#[derive(Debug)]
pub struct DialogHistory<D: DialogId> {
    key: ScopeKey,
    overlays: Vec<D>,
}

impl<D: DialogId> DialogHistory<D> {
    /// Create an empty overlay stack for the given scope.
    pub fn new(key: ScopeKey) -> Self {
        Self {
            key,
            overlays: Vec::new(),
        }
    }

    /// The scope key this stack belongs to.
    pub fn key(&self) -> &ScopeKey {
        &self.key
    }

    /// Append an overlay; it becomes the shown one.
    pub fn add(&mut self, dialog: D) {
        trace_log!("'{}': show dialog {:?}", self.key, dialog);
        self.overlays.push(dialog);
    }

    /// Remove the **last** occurrence equal to `dialog`.
    ///
    /// Returns the removed id, or `None` when no occurrence is present.
    pub fn remove(&mut self, dialog: &D) -> Option<D> {
        let index = self.overlays.iter().rposition(|d| d == dialog)?;
        let removed = self.overlays.remove(index);
        trace_log!("'{}': dismiss dialog {:?}", self.key, removed);
        Some(removed)
    }

    /// The top overlay, if any.
    pub fn peek(&self) -> Option<&D> {
        self.overlays.last()
    }

    /// Remove and return the top overlay, if any.
    pub fn pop(&mut self) -> Option<D> {
        let removed = self.overlays.pop();
        if let Some(dialog) = &removed {
            trace_log!("'{}': dismiss dialog {:?}", self.key, dialog);
        }
        removed
    }

    /// Empty the stack in one operation — used when the owning scope itself
    /// collapses, so no overlay registration leaks past its scope.
    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    /// Read-only view of the stack, oldest first.
    pub fn get(&self) -> &[D] {
        &self.overlays
    }

    /// Number of overlays on the stack.
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    /// Whether no overlay is open.
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encode the overlay stack as the scope section's dialog sub-blob.
    pub fn serialize_into(&self, section: &mut DialogSection) -> Result<(), NavigationError> {
        for dialog in &self.overlays {
            let value =
                serde_json::to_value(dialog).map_err(|err| NavigationError::SerializeFailed {
                    scope: self.key.name().to_string(),
                    message: err.to_string(),
                })?;
            section.overlays.push(value);
        }
        Ok(())
    }

    /// Rehydrate the overlay stack from a dialog sub-blob.
    ///
    /// An empty sub-blob means no overlays were open; a sub-blob that fails
    /// to decode is a [`NavigationError::CorruptState`].
    pub fn restore_from(&mut self, section: &DialogSection) -> Result<(), NavigationError> {
        if section.overlays.is_empty() {
            return Ok(());
        }
        let mut overlays = Vec::with_capacity(section.overlays.len());
        for value in &section.overlays {
            let dialog: D = serde_json::from_value(value.clone()).map_err(|err| {
                NavigationError::CorruptState {
                    scope: self.key.name().to_string(),
                    message: format!("dialog overlay: {}", err),
                }
            })?;
            overlays.push(dialog);
        }
        self.overlays = overlays;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Overlay {
        Confirm { subject: String },
        Notice,
    }

    impl DialogId for Overlay {
        fn kind(&self) -> &'static str {
            match self {
                Overlay::Confirm { .. } => "confirm",
                Overlay::Notice => "notice",
            }
        }
    }

    fn confirm(subject: &str) -> Overlay {
        Overlay::Confirm {
            subject: subject.to_string(),
        }
    }

    #[test]
    fn test_add_and_peek() {
        let mut dialogs = DialogHistory::new(ScopeKey::new("root"));
        assert!(dialogs.is_empty());
        dialogs.add(Overlay::Notice);
        dialogs.add(confirm("delete"));
        assert_eq!(dialogs.peek(), Some(&confirm("delete")));
        assert_eq!(dialogs.len(), 2);
    }

    #[test]
    fn test_pop_empty_returns_none() {
        let mut dialogs: DialogHistory<Overlay> = DialogHistory::new(ScopeKey::new("root"));
        assert_eq!(dialogs.pop(), None);
    }

    #[test]
    fn test_remove_by_identity_takes_last_occurrence() {
        let mut dialogs = DialogHistory::new(ScopeKey::new("root"));
        dialogs.add(confirm("a"));
        dialogs.add(confirm("b"));
        dialogs.add(confirm("a"));

        // Same kind, distinguishing payload: only the matching value goes.
        assert_eq!(dialogs.remove(&confirm("b")), Some(confirm("b")));
        // Of two equal values, the later one goes.
        assert_eq!(dialogs.remove(&confirm("a")), Some(confirm("a")));
        assert_eq!(dialogs.get(), &[confirm("a")]);
    }

    #[test]
    fn test_remove_missing_returns_none() {
        let mut dialogs = DialogHistory::new(ScopeKey::new("root"));
        dialogs.add(Overlay::Notice);
        assert_eq!(dialogs.remove(&confirm("x")), None);
        assert_eq!(dialogs.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut dialogs = DialogHistory::new(ScopeKey::new("root"));
        dialogs.add(Overlay::Notice);
        dialogs.add(confirm("a"));
        dialogs.clear();
        assert!(dialogs.is_empty());
    }

    #[test]
    fn test_serialize_restore_round_trip() {
        let mut dialogs = DialogHistory::new(ScopeKey::new("root"));
        dialogs.add(Overlay::Notice);
        dialogs.add(confirm("quit"));

        let mut section = DialogSection::default();
        dialogs.serialize_into(&mut section).unwrap();

        let mut restored: DialogHistory<Overlay> = DialogHistory::new(ScopeKey::new("root"));
        restored.restore_from(&section).unwrap();
        assert_eq!(restored.get(), dialogs.get());
    }

    #[test]
    fn test_restore_empty_section_means_no_overlays() {
        let mut dialogs: DialogHistory<Overlay> = DialogHistory::new(ScopeKey::new("root"));
        dialogs.restore_from(&DialogSection::default()).unwrap();
        assert!(dialogs.is_empty());
    }

    #[test]
    fn test_restore_corrupt_overlay_is_fatal() {
        let mut dialogs: DialogHistory<Overlay> = DialogHistory::new(ScopeKey::new("root"));
        let section = DialogSection {
            overlays: vec![serde_json::json!(42)],
        };
        let err = dialogs.restore_from(&section).unwrap_err();
        assert!(matches!(err, NavigationError::CorruptState { .. }));
    }
}
