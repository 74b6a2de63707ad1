//! The navigator: engine construction, scope resolution, and the persistence
//! contract with the host.
//!
//! A [`Navigator`] owns the [`NavigationRegistry`] behind a shared handle and
//! hands out [`Controller`]s for individual scopes. The host is contractually
//! required to make two calls across a process restart:
//!
//! - [`Navigator::restore`] at construction, with whatever blob the host
//!   read back (or [`Navigator::new`] on a first run);
//! - [`Navigator::persist`] before teardown, storing the returned blob.
//!
//! Everything between those two calls is synchronous, single-threaded state
//! manipulation; the shared handle is the one boundary a multi-threaded host
//! would have to put a lock around.
//!
//! # Example
//!
//! ```
//! use backstack_navigator::{Navigator, ScopeConfig};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! enum Screen { Home, Settings }
//!
//! let navigator = Navigator::new();
//! let controller = navigator
//!     .controller(ScopeConfig::new("root", Screen::Home))
//!     .unwrap();
//!
//! controller.navigate_to(Screen::Settings).unwrap();
//! assert_eq!(controller.current(), Some(Screen::Settings));
//! assert!(navigator.can_go_back());
//! ```

use crate::controller::Controller;
use crate::destination::{Destination, DialogId, ErasedDestination, NoDialogs, ScopeKey};
use crate::error::NavigationError;
use crate::persistence::StateBlob;
use crate::registry::{HistoryEntry, NavigationRegistry, PoppedEntry};
use crate::info_log;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// ============================================================================
// ScopeConfig
// ============================================================================

/// Everything needed to resolve (create or restore) one scope: its key, the
/// destination it starts from, optionally the destination in the containing
/// scope that owns it, and the dialog kinds creatable in it.
pub struct ScopeConfig<T: Destination> {
    key: ScopeKey,
    initial: T,
    parent_association: Option<Box<dyn ErasedDestination>>,
    dialog_kinds: Vec<&'static str>,
}

impl<T: Destination> ScopeConfig<T> {
    /// Config for a scope starting at `initial`.
    pub fn new(key: impl Into<ScopeKey>, initial: T) -> Self {
        Self {
            key: key.into(),
            initial,
            parent_association: None,
            dialog_kinds: Vec::new(),
        }
    }

    /// Record which destination in the containing scope owns this one.
    ///
    /// Back-navigation uses the association to hand the top of the order back
    /// to this scope when its owning destination becomes current again. Set
    /// once at creation; it is a back-reference by value, not an ownership
    /// edge.
    pub fn child_of<P: Destination>(mut self, parent_destination: P) -> Self {
        self.parent_association = Some(Box::new(parent_destination));
        self
    }

    /// Declare the dialog kinds creatable in this scope.
    pub fn with_dialogs(mut self, kinds: &[&'static str]) -> Self {
        self.dialog_kinds = kinds.to_vec();
        self
    }

    /// The scope key.
    pub fn key(&self) -> &ScopeKey {
        &self.key
    }

    /// The destination the scope starts from.
    pub fn initial(&self) -> &T {
        &self.initial
    }

    pub(crate) fn parent_association(&self) -> Option<&dyn ErasedDestination> {
        self.parent_association.as_deref()
    }

    pub(crate) fn dialog_kinds(&self) -> &[&'static str] {
        &self.dialog_kinds
    }
}

impl<T: Destination> Clone for ScopeConfig<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            initial: self.initial.clone(),
            parent_association: self.parent_association.clone(),
            dialog_kinds: self.dialog_kinds.clone(),
        }
    }
}

impl<T: Destination> fmt::Debug for ScopeConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeConfig")
            .field("key", &self.key)
            .field("initial", &self.initial)
            .field("parent_association", &self.parent_association)
            .field("dialog_kinds", &self.dialog_kinds)
            .finish()
    }
}

// ============================================================================
// Navigator
// ============================================================================

/// Owner of the whole navigation tree. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Navigator {
    registry: Rc<RefCell<NavigationRegistry>>,
}

impl Navigator {
    /// Create a navigator with no persisted state (first run).
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(NavigationRegistry::new())),
        }
    }

    /// Create a navigator that rehydrates scopes from `blob` as they are
    /// first resolved. Each scope's section is consumed exactly once.
    pub fn restore(blob: StateBlob) -> Self {
        info_log!("navigator constructed with {} pending section(s)", blob.len());
        Self {
            registry: Rc::new(RefCell::new(NavigationRegistry::with_pending(blob))),
        }
    }

    /// Resolve a dialog-free scope and return a controller bound to it.
    ///
    /// The first resolution of a scope key creates its history — fresh from
    /// the config's initial destination, or rehydrated from the pending blob.
    /// Later resolutions return a controller over the same, unchanged scope.
    pub fn controller<T: Destination>(
        &self,
        config: ScopeConfig<T>,
    ) -> Result<Controller<T>, NavigationError> {
        self.controller_with_dialogs::<T, NoDialogs>(config)
    }

    /// Resolve a scope whose controller can also show dialogs of type `D`.
    pub fn controller_with_dialogs<T: Destination, D: DialogId>(
        &self,
        config: ScopeConfig<T>,
    ) -> Result<Controller<T, D>, NavigationError> {
        self.registry.borrow_mut().get_or_create::<T, D>(
            config.key().clone(),
            config.initial().clone(),
            config.parent_association().map(|p| p.clone_erased()),
            config.dialog_kinds().to_vec(),
        )?;
        Ok(Controller::new(Rc::clone(&self.registry), config))
    }

    /// Whether a global back action would remove anything, tree-wide.
    pub fn can_go_back(&self) -> bool {
        self.registry.borrow().can_go_back()
    }

    /// Resolve one global back action. See
    /// [`NavigationRegistry::go_back`] for the resolution rules.
    pub fn go_back(&self) -> Option<PoppedEntry> {
        self.registry.borrow_mut().go_back()
    }

    /// Flattened debug view of the whole tree; the last entry is what is
    /// currently visible.
    pub fn all_history(&self) -> Vec<HistoryEntry> {
        self.registry.borrow().all_history()
    }

    /// Number of registered scopes.
    pub fn scope_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Serialize every registered scope into a fresh blob for the host to
    /// store before teardown.
    pub fn persist(&self) -> Result<StateBlob, NavigationError> {
        let mut blob = StateBlob::new();
        let registry = self.registry.borrow();
        registry.save(&mut blob)?;
        info_log!("persisted {} scope(s)", blob.len());
        Ok(blob)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.registry.borrow().fmt(f)
    }
}

// ============================================================================
// Tests
// ============================================================================
