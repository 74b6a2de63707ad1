//! The navigation registry: every active scope, in activation order.
//!
//! A [`NavigationRegistry`] owns one entry per live scope — the scope's
//! [`History`] plus its [`DialogHistory`], stored behind an erased interface
//! so scopes with different destination types coexist. Iteration order is
//! activation order: the **last** entry is the active scope, the one
//! back-navigation inspects first and the one whose transitions the renderer
//! plays. [`bring_to_top`](NavigationRegistry::bring_to_top) is the only
//! operation allowed to reorder entries, and a successful navigate calls it
//! exactly once.
//!
//! Global back-navigation resolves here:
//!
//! 1. the active scope's top dialog is dismissed first, if any;
//! 2. an exhausted non-root scope (one record left, other scopes remain)
//!    collapses — its entry leaves the registry, its overlays are cleared,
//!    and control returns to the scope owning its parent association;
//! 3. otherwise the active scope pops locally, and if some scope's parent
//!    association equals the now-current destination, that scope is raised
//!    to the top of the order.
//!
//! The registry also holds the pending restore blob: a scope's persisted
//! section is consumed the first time that scope is resolved, never twice.

use crate::destination::{Destination, DialogId, ErasedDestination, ScopeKey};
use crate::dialog::DialogHistory;
use crate::error::NavigationError;
use crate::history::History;
use crate::persistence::{ScopeSection, StateBlob};
use crate::{debug_log, trace_log};
use std::any::Any;
use std::fmt;

// ============================================================================
// Scope entries
// ============================================================================

/// A registered scope: one history, one overlay stack, and the dialog kinds
/// declared creatable for it.
pub(crate) struct Scope<T: Destination, D: DialogId> {
    pub(crate) history: History<T>,
    pub(crate) dialogs: DialogHistory<D>,
    pub(crate) dialog_kinds: Vec<&'static str>,
}

/// Type-erased view of a [`Scope`], exposing only what the registry's
/// algorithms need. Controllers recover the concrete type via `as_any`.
pub(crate) trait ErasedScope {
    fn key(&self) -> &ScopeKey;
    fn depth(&self) -> usize;
    fn dialog_len(&self) -> usize;
    fn pop_record(&mut self) -> Option<Box<dyn ErasedDestination>>;
    fn pop_dialog(&mut self) -> Option<Box<dyn ErasedDestination>>;
    fn clear_dialogs(&mut self);
    fn current_any(&self) -> &dyn Any;
    fn current_cloned(&self) -> Box<dyn ErasedDestination>;
    fn parent_association(&self) -> Option<&dyn ErasedDestination>;
    fn save_into(&self, blob: &mut StateBlob) -> Result<(), NavigationError>;
    fn record_descriptions(&self) -> Vec<String>;
    fn dialog_descriptions(&self) -> Vec<String>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Destination, D: DialogId> ErasedScope for Scope<T, D> {
    fn key(&self) -> &ScopeKey {
        self.history.key()
    }

    fn depth(&self) -> usize {
        self.history.len()
    }

    fn dialog_len(&self) -> usize {
        self.dialogs.len()
    }

    fn pop_record(&mut self) -> Option<Box<dyn ErasedDestination>> {
        self.history
            .pop()
            .map(|record| Box::new(record.into_destination()) as Box<dyn ErasedDestination>)
    }

    fn pop_dialog(&mut self) -> Option<Box<dyn ErasedDestination>> {
        self.dialogs
            .pop()
            .map(|dialog| Box::new(dialog) as Box<dyn ErasedDestination>)
    }

    fn clear_dialogs(&mut self) {
        self.dialogs.clear();
    }

    fn current_any(&self) -> &dyn Any {
        self.history.peek().destination()
    }

    fn current_cloned(&self) -> Box<dyn ErasedDestination> {
        Box::new(self.history.peek().destination().clone())
    }

    fn parent_association(&self) -> Option<&dyn ErasedDestination> {
        self.history.parent_association()
    }

    fn save_into(&self, blob: &mut StateBlob) -> Result<(), NavigationError> {
        let mut section = ScopeSection::default();
        self.history.serialize_into(&mut section)?;
        self.dialogs.serialize_into(&mut section.dialogs)?;
        blob.insert_section(self.history.key().name(), section);
        Ok(())
    }

    fn record_descriptions(&self) -> Vec<String> {
        self.history
            .records()
            .iter()
            .map(|record| format!("{:?}", record.destination()))
            .collect()
    }

    fn dialog_descriptions(&self) -> Vec<String> {
        self.dialogs
            .get()
            .iter()
            .map(|dialog| format!("{:?}", dialog))
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ============================================================================
// Back-navigation results and introspection
// ============================================================================

/// What a single global back action removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoppedKind {
    /// A destination record popped off the active scope.
    Record,
    /// A dialog overlay dismissed from the active scope.
    Dialog,
    /// An exhausted nested scope collapsed; the value is its last shown
    /// destination.
    ScopeCollapsed,
}

/// The erased result of [`NavigationRegistry::go_back`]. A controller narrows
/// it back to its own destination type with [`destination`](Self::destination).
pub struct PoppedEntry {
    scope: ScopeKey,
    kind: PoppedKind,
    value: Box<dyn ErasedDestination>,
}

impl PoppedEntry {
    /// The scope the back action resolved in.
    pub fn scope(&self) -> &ScopeKey {
        &self.scope
    }

    /// What kind of entry was removed.
    pub fn kind(&self) -> PoppedKind {
        self.kind
    }

    /// Narrow the popped destination to a concrete type. Returns `None` for a
    /// dialog dismissal or when the type does not match.
    pub fn destination<T: Destination>(self) -> Option<T> {
        if self.kind == PoppedKind::Dialog {
            return None;
        }
        self.value.into_any().downcast::<T>().ok().map(|value| *value)
    }

    /// Narrow a dismissed dialog to a concrete id type.
    pub fn dialog<D: DialogId>(self) -> Option<D> {
        if self.kind != PoppedKind::Dialog {
            return None;
        }
        self.value.into_any().downcast::<D>().ok().map(|value| *value)
    }
}

impl fmt::Debug for PoppedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoppedEntry")
            .field("scope", &self.scope)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .finish()
    }
}

/// Kind of entry in the flattened [`all_history`](NavigationRegistry::all_history) view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A destination record.
    Record,
    /// A dialog overlay of the top scope.
    Dialog,
}

/// One entry of the flattened debug view of the whole scope tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The scope the entry belongs to.
    pub scope: ScopeKey,
    /// Record or dialog.
    pub kind: EntryKind,
    /// Debug rendering of the destination or dialog id.
    pub description: String,
}

// ============================================================================
// NavigationRegistry
// ============================================================================

/// Insertion-ordered collection of every active scope, plus the pending
/// restore blob. See the module docs for the ordering and back-navigation
/// rules.
pub struct NavigationRegistry {
    entries: Vec<Box<dyn ErasedScope>>,
    pending: StateBlob,
}

impl NavigationRegistry {
    /// Create an empty registry with nothing to restore.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            pending: StateBlob::new(),
        }
    }

    /// Create a registry whose scopes rehydrate lazily from `blob` as they
    /// are first resolved.
    pub fn with_pending(blob: StateBlob) -> Self {
        Self {
            entries: Vec::new(),
            pending: blob,
        }
    }

    /// Number of registered scopes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no scope is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a scope is registered under `key`.
    pub fn contains(&self, key: &ScopeKey) -> bool {
        self.position(key).is_some()
    }

    /// Scope keys in iteration order; the last one is the active scope.
    pub fn scope_keys(&self) -> Vec<ScopeKey> {
        self.entries.iter().map(|scope| scope.key().clone()).collect()
    }

    fn position(&self, key: &ScopeKey) -> Option<usize> {
        self.entries.iter().position(|scope| scope.key() == key)
    }

    /// Register a scope if it is not yet known, restoring it from the pending
    /// blob exactly once. An already-registered scope is left unchanged.
    ///
    /// A persisted section that fails to decode aborts the registration with
    /// [`NavigationError::CorruptState`]; the scope is not registered fresh,
    /// so the caller keeps the chance to handle the loss explicitly.
    pub(crate) fn get_or_create<T: Destination, D: DialogId>(
        &mut self,
        key: ScopeKey,
        initial: T,
        parent: Option<Box<dyn ErasedDestination>>,
        dialog_kinds: Vec<&'static str>,
    ) -> Result<(), NavigationError> {
        if self.contains(&key) {
            return Ok(());
        }
        let mut history = History::new(key.clone(), initial);
        if let Some(parent) = parent {
            history.set_parent_association(parent);
        }
        let mut dialogs = DialogHistory::<D>::new(key.clone());
        if let Some(section) = history.restore(&mut self.pending)? {
            dialogs.restore_from(&section.dialogs)?;
        }
        debug_log!("registered scope '{}' ({} total)", key, self.entries.len() + 1);
        self.entries.push(Box::new(Scope {
            history,
            dialogs,
            dialog_kinds,
        }));
        Ok(())
    }

    /// Run `f` against the concrete scope for `key`. Returns `None` when the
    /// key is unknown or was registered with different types.
    pub(crate) fn with_scope<T: Destination, D: DialogId, R, F>(
        &self,
        key: &ScopeKey,
        f: F,
    ) -> Option<R>
    where
        F: FnOnce(&Scope<T, D>) -> R,
    {
        let index = self.position(key)?;
        let scope = self.entries[index].as_any().downcast_ref::<Scope<T, D>>()?;
        Some(f(scope))
    }

    /// Mutable variant of [`with_scope`](Self::with_scope).
    pub(crate) fn with_scope_mut<T: Destination, D: DialogId, R, F>(
        &mut self,
        key: &ScopeKey,
        f: F,
    ) -> Option<R>
    where
        F: FnOnce(&mut Scope<T, D>) -> R,
    {
        let index = self.position(key)?;
        let scope = self.entries[index]
            .as_any_mut()
            .downcast_mut::<Scope<T, D>>()?;
        Some(f(scope))
    }

    /// Reorder the scope under `key` to the end of iteration order, making it
    /// the active scope. The relative order of all other scopes is unchanged.
    ///
    /// Returns whether the key was found. This is the only reordering
    /// operation; a successful navigate calls it exactly once.
    pub fn bring_to_top(&mut self, key: &ScopeKey) -> bool {
        match self.position(key) {
            Some(index) => {
                self.raise(index);
                true
            }
            None => false,
        }
    }

    fn raise(&mut self, index: usize) {
        if index + 1 == self.entries.len() {
            return;
        }
        let scope = self.entries.remove(index);
        trace_log!("scope '{}' brought to top", scope.key());
        self.entries.push(scope);
    }

    /// Whether a global back action would remove anything.
    ///
    /// With several scopes registered this is a property of the whole tree:
    /// the aggregate record count exceeding the scope count means some scope,
    /// somewhere, has depth to give — a leaf scope sitting at its root does
    /// not block back-navigation while an ancestor still has depth. With a
    /// single scope it is simply that scope's depth.
    ///
    /// Open dialogs do not count, even though [`go_back`](Self::go_back)
    /// would dismiss one first.
    pub fn can_go_back(&self) -> bool {
        let Some(last) = self.entries.last() else {
            return false;
        };
        if self.entries.len() > 1 {
            let aggregate: usize = self.entries.iter().map(|scope| scope.depth()).sum();
            aggregate != self.entries.len()
        } else {
            last.depth() > 1
        }
    }

    /// Resolve one global back action across the scope tree.
    ///
    /// Dialog dismissal takes priority over destination pops, regardless of
    /// the underlying history's depth. An exhausted non-root scope collapses
    /// — the whole action — and its last shown destination is the result.
    /// Otherwise the active scope pops locally and, when the now-current
    /// destination owns a nested scope (by parent association), that scope is
    /// raised to the top of the order.
    ///
    /// Returns `None` when nothing could be removed anywhere.
    pub fn go_back(&mut self) -> Option<PoppedEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;

        if self.entries[last].dialog_len() > 0 {
            let scope = self.entries[last].key().clone();
            let value = self.entries[last].pop_dialog()?;
            return Some(PoppedEntry {
                scope,
                kind: PoppedKind::Dialog,
                value,
            });
        }

        if self.entries.len() > 1 && self.entries[last].depth() == 1 {
            let mut collapsed = self.entries.pop()?;
            collapsed.clear_dialogs();
            let scope = collapsed.key().clone();
            let value = collapsed.current_cloned();
            debug_log!("scope '{}' collapsed, control returns to '{}'",
                scope,
                self.entries[self.entries.len() - 1].key());
            return Some(PoppedEntry {
                scope,
                kind: PoppedKind::ScopeCollapsed,
                value,
            });
        }

        let value = self.entries[last].pop_record()?;
        let scope = self.entries[last].key().clone();

        let owner = {
            let current = self.entries[last].current_any();
            self.entries[..last]
                .iter()
                .position(|s| s.parent_association().is_some_and(|p| p.eq_any(current)))
        };
        if let Some(index) = owner {
            self.raise(index);
        }

        Some(PoppedEntry {
            scope,
            kind: PoppedKind::Record,
            value,
        })
    }

    /// Flatten every scope's records in iteration order, followed by the top
    /// scope's dialog overlays. The last entry is what is currently visible.
    pub fn all_history(&self) -> Vec<HistoryEntry> {
        let mut entries = Vec::new();
        for scope in &self.entries {
            for description in scope.record_descriptions() {
                entries.push(HistoryEntry {
                    scope: scope.key().clone(),
                    kind: EntryKind::Record,
                    description,
                });
            }
        }
        if let Some(top) = self.entries.last() {
            for description in top.dialog_descriptions() {
                entries.push(HistoryEntry {
                    scope: top.key().clone(),
                    kind: EntryKind::Dialog,
                    description,
                });
            }
        }
        entries
    }

    /// Write every registered scope into the shared blob under its own
    /// section key.
    pub fn save(&self, blob: &mut StateBlob) -> Result<(), NavigationError> {
        for scope in &self.entries {
            scope.save_into(blob)?;
        }
        Ok(())
    }
}

impl Default for NavigationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NavigationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationRegistry")
            .field("scopes", &self.scope_keys())
            .field("pending_sections", &self.pending.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::NoDialogs;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Root {
        Home,
        Settings,
        Detail,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Nested {
        First,
        Second,
    }

    fn register_root(registry: &mut NavigationRegistry) {
        registry
            .get_or_create::<Root, NoDialogs>(ScopeKey::new("root"), Root::Home, None, Vec::new())
            .unwrap();
    }

    fn push_on<T: Destination>(registry: &mut NavigationRegistry, key: &ScopeKey, destination: T) {
        registry
            .with_scope_mut::<T, NoDialogs, _, _>(key, |scope| {
                scope
                    .history
                    .push(crate::history::BackStackRecord::new(destination));
            })
            .unwrap();
        registry.bring_to_top(key);
    }

    #[test]
    fn test_get_or_create_registers_once() {
        let mut registry = NavigationRegistry::new();
        register_root(&mut registry);
        push_on(&mut registry, &ScopeKey::new("root"), Root::Settings);

        // A second resolve leaves the existing history untouched.
        register_root(&mut registry);
        assert_eq!(registry.len(), 1);
        let depth = registry
            .with_scope::<Root, NoDialogs, _, _>(&ScopeKey::new("root"), |scope| scope.history.len())
            .unwrap();
        assert_eq!(depth, 2);
    }

    #[test]
    fn test_bring_to_top_preserves_relative_order() {
        let mut registry = NavigationRegistry::new();
        for name in ["a", "b", "c", "d"] {
            registry
                .get_or_create::<Root, NoDialogs>(ScopeKey::new(name), Root::Home, None, Vec::new())
                .unwrap();
        }
        assert!(registry.bring_to_top(&ScopeKey::new("b")));
        let names: Vec<_> = registry.scope_keys().iter().map(|k| k.name().to_string()).collect();
        assert_eq!(names, ["a", "c", "d", "b"]);
    }

    #[test]
    fn test_bring_to_top_unknown_key() {
        let mut registry = NavigationRegistry::new();
        register_root(&mut registry);
        assert!(!registry.bring_to_top(&ScopeKey::new("missing")));
    }

    #[test]
    fn test_can_go_back_single_scope() {
        let mut registry = NavigationRegistry::new();
        register_root(&mut registry);
        assert!(!registry.can_go_back());
        push_on(&mut registry, &ScopeKey::new("root"), Root::Settings);
        assert!(registry.can_go_back());
    }

    #[test]
    fn test_can_go_back_aggregate_across_scopes() {
        let mut registry = NavigationRegistry::new();
        register_root(&mut registry);
        registry
            .get_or_create::<Nested, NoDialogs>(
                ScopeKey::new("nested"),
                Nested::First,
                None,
                Vec::new(),
            )
            .unwrap();

        // Two scopes, each at its single root record: nothing to pop anywhere.
        assert!(!registry.can_go_back());

        push_on(&mut registry, &ScopeKey::new("root"), Root::Settings);
        assert!(registry.can_go_back());
    }

    #[test]
    fn test_go_back_empty_registry() {
        let mut registry = NavigationRegistry::new();
        assert!(registry.go_back().is_none());
    }

    #[test]
    fn test_go_back_root_scope_never_collapses() {
        let mut registry = NavigationRegistry::new();
        register_root(&mut registry);
        assert!(registry.go_back().is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_go_back_collapses_exhausted_nested_scope() {
        let mut registry = NavigationRegistry::new();
        register_root(&mut registry);
        push_on(&mut registry, &ScopeKey::new("root"), Root::Detail);
        registry
            .get_or_create::<Nested, NoDialogs>(
                ScopeKey::new("nested"),
                Nested::First,
                Some(Box::new(Root::Detail)),
                Vec::new(),
            )
            .unwrap();
        registry.bring_to_top(&ScopeKey::new("nested"));

        let popped = registry.go_back().unwrap();
        assert_eq!(popped.kind(), PoppedKind::ScopeCollapsed);
        assert_eq!(popped.scope().name(), "nested");
        assert_eq!(popped.destination::<Nested>(), Some(Nested::First));
        assert_eq!(registry.len(), 1);

        // The collapse consumed the whole action; the parent still shows
        // Detail and pops it only on the next call.
        let next = registry.go_back().unwrap();
        assert_eq!(next.kind(), PoppedKind::Record);
        assert_eq!(next.destination::<Root>(), Some(Root::Detail));
    }

    #[test]
    fn test_go_back_raises_owner_of_current_destination() {
        let mut registry = NavigationRegistry::new();
        register_root(&mut registry);
        push_on(&mut registry, &ScopeKey::new("root"), Root::Detail);
        registry
            .get_or_create::<Nested, NoDialogs>(
                ScopeKey::new("nested"),
                Nested::First,
                Some(Box::new(Root::Detail)),
                Vec::new(),
            )
            .unwrap();
        push_on(&mut registry, &ScopeKey::new("nested"), Nested::Second);
        push_on(&mut registry, &ScopeKey::new("root"), Root::Settings);

        // Popping Settings makes Detail current again; the nested scope it
        // owns comes back to the top of the order.
        let popped = registry.go_back().unwrap();
        assert_eq!(popped.destination::<Root>(), Some(Root::Settings));
        let names: Vec<_> = registry.scope_keys().iter().map(|k| k.name().to_string()).collect();
        assert_eq!(names, ["root", "nested"]);
    }

    #[test]
    fn test_all_history_flattens_in_order() {
        let mut registry = NavigationRegistry::new();
        register_root(&mut registry);
        push_on(&mut registry, &ScopeKey::new("root"), Root::Settings);
        registry
            .get_or_create::<Nested, NoDialogs>(
                ScopeKey::new("nested"),
                Nested::First,
                None,
                Vec::new(),
            )
            .unwrap();

        let entries = registry.all_history();
        let descriptions: Vec<_> = entries.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, ["Home", "Settings", "First"]);
        assert!(entries.iter().all(|e| e.kind == EntryKind::Record));
    }

    #[test]
    fn test_save_writes_every_scope() {
        let mut registry = NavigationRegistry::new();
        register_root(&mut registry);
        registry
            .get_or_create::<Nested, NoDialogs>(
                ScopeKey::new("nested"),
                Nested::First,
                None,
                Vec::new(),
            )
            .unwrap();

        let mut blob = StateBlob::new();
        registry.save(&mut blob).unwrap();
        assert!(blob.contains("root"));
        assert!(blob.contains("nested"));
    }

    #[test]
    fn test_restore_consumed_once_per_scope() {
        let mut registry = NavigationRegistry::new();
        register_root(&mut registry);
        push_on(&mut registry, &ScopeKey::new("root"), Root::Settings);
        let mut blob = StateBlob::new();
        registry.save(&mut blob).unwrap();

        let mut fresh = NavigationRegistry::with_pending(blob);
        register_root(&mut fresh);
        let depth = fresh
            .with_scope::<Root, NoDialogs, _, _>(&ScopeKey::new("root"), |scope| scope.history.len())
            .unwrap();
        assert_eq!(depth, 2);
        assert!(!fresh.pending.contains("root"));
    }
}
