//! Per-scope navigation façade.
//!
//! A [`Controller`] is the entry point ordinary navigation code uses: it is
//! bound to exactly one scope, statically knows that scope's destination
//! type, and turns [`NavOptions`] into the snapshot-and-replace sequence the
//! scope's [`History`](crate::history::History) applies atomically.
//!
//! Controllers are cheap handles over the shared registry; cloning one (or
//! asking the [`Navigator`](crate::navigator::Navigator) for another with the
//! same config) observes and mutates the same scope. A controller whose
//! scope entry has vanished — possible when a host recreates its UI subtree
//! in an unexpected order — re-registers the scope lazily rather than
//! failing, and logs the invariant violation.

use crate::destination::{Destination, DialogId, ScopeKey};
use crate::error::NavigationError;
use crate::history::{BackStackRecord, NavigationDirection};
use crate::navigator::ScopeConfig;
use crate::options::NavOptions;
use crate::registry::{NavigationRegistry, Scope};
use crate::warn_log;
use std::cell::RefCell;
use std::rc::Rc;

/// Scope-local façade bound to one registered scope.
///
/// `T` is the scope's destination type; `D` its dialog id type, defaulting to
/// [`NoDialogs`](crate::destination::NoDialogs) for scopes without overlays.
pub struct Controller<T: Destination, D: DialogId = crate::destination::NoDialogs> {
    registry: Rc<RefCell<NavigationRegistry>>,
    config: ScopeConfig<T>,
    _dialogs: std::marker::PhantomData<D>,
}

impl<T: Destination, D: DialogId> Controller<T, D> {
    pub(crate) fn new(registry: Rc<RefCell<NavigationRegistry>>, config: ScopeConfig<T>) -> Self {
        Self {
            registry,
            config,
            _dialogs: std::marker::PhantomData,
        }
    }

    /// The scope this controller is bound to.
    pub fn key(&self) -> &ScopeKey {
        self.config.key()
    }

    /// Navigate to `destination`, plainly appending one record.
    pub fn navigate_to(&self, destination: T) -> Result<(), NavigationError> {
        self.navigate_with(destination, NavOptions::new())
    }

    /// Navigate to `destination` with options.
    ///
    /// The options resolve into one atomic history replacement: the current
    /// records are snapshotted, pop-up-to truncates the snapshot, single-top
    /// drops existing instances of the destination, and exactly one new
    /// record is appended. The scope then becomes the active one.
    pub fn navigate_with(
        &self,
        destination: T,
        options: NavOptions<T>,
    ) -> Result<(), NavigationError> {
        let mut registry = self.registry.borrow_mut();
        self.ensure_registered(&mut registry)?;

        let applied = registry.with_scope_mut::<T, D, _, _>(self.key(), |scope| {
            let mut snapshot = scope.history.records().to_vec();

            if let Some(pop) = options.pop_up_to_target() {
                let matched = if pop.all {
                    snapshot.iter().position(|r| r.destination() == &pop.target)
                } else {
                    snapshot.iter().rposition(|r| r.destination() == &pop.target)
                };
                if let Some(index) = matched {
                    snapshot.truncate(index + usize::from(!pop.inclusive));
                }
            }

            if options.is_single_top() {
                snapshot.retain(|r| r.destination() != &destination);
            }

            snapshot.push(BackStackRecord::with_transition(
                destination,
                options.transition_meta(),
            ));
            scope.history.set(snapshot);
        });
        if applied.is_none() {
            warn_log!(
                "scope '{}' is registered with different types; navigation dropped",
                self.key()
            );
            return Ok(());
        }

        registry.bring_to_top(self.key());
        Ok(())
    }

    /// Resolve one global back action, narrowed to this scope's destination
    /// type.
    ///
    /// Returns `None` when nothing was popped anywhere, and also when the
    /// action resolved outside this scope's type (a dialog dismissal or a pop
    /// in a scope of another destination type).
    pub fn go_back(&self) -> Option<T> {
        self.registry
            .borrow_mut()
            .go_back()
            .and_then(|popped| popped.destination::<T>())
    }

    /// Whether a global back action would remove anything, tree-wide.
    pub fn can_go_back(&self) -> bool {
        self.registry.borrow().can_go_back()
    }

    // ------------------------------------------------------------------
    // Dialogs
    // ------------------------------------------------------------------

    /// Show a dialog overlay above this scope's current screen.
    ///
    /// The dialog's kind must have been declared in the scope's config;
    /// showing an undeclared dialog is a construction bug and fails with
    /// [`NavigationError::DialogNotDeclared`].
    pub fn show_dialog(&self, dialog: D) -> Result<(), NavigationError> {
        let mut registry = self.registry.borrow_mut();
        self.ensure_registered(&mut registry)?;
        registry
            .with_scope_mut::<T, D, _, _>(self.key(), |scope| {
                if !scope.dialog_kinds.contains(&dialog.kind()) {
                    return Err(NavigationError::DialogNotDeclared {
                        scope: self.key().name().to_string(),
                        kind: dialog.kind().to_string(),
                    });
                }
                scope.dialogs.add(dialog);
                Ok(())
            })
            .unwrap_or_else(|| {
                Err(NavigationError::DialogNotDeclared {
                    scope: self.key().name().to_string(),
                    kind: "<scope type mismatch>".to_string(),
                })
            })
    }

    /// Dismiss a specific dialog overlay, by value identity.
    ///
    /// Closing a dialog that is not showing is a construction bug and fails
    /// with [`NavigationError::DialogNotShowing`].
    pub fn close_dialog(&self, dialog: &D) -> Result<D, NavigationError> {
        let mut registry = self.registry.borrow_mut();
        registry
            .with_scope_mut::<T, D, _, _>(self.key(), |scope| scope.dialogs.remove(dialog))
            .flatten()
            .ok_or_else(|| NavigationError::DialogNotShowing {
                scope: self.key().name().to_string(),
                dialog: format!("{:?}", dialog),
            })
    }

    // ------------------------------------------------------------------
    // Read-only views for the rendering collaborator
    // ------------------------------------------------------------------

    /// Snapshot of the scope's records, oldest first. The snapshot is the
    /// caller's own copy; later navigations do not alter it.
    pub fn records(&self) -> Vec<BackStackRecord<T>> {
        self.read(|scope| scope.history.records().to_vec())
            .unwrap_or_default()
    }

    /// The currently shown destination.
    pub fn current(&self) -> Option<T> {
        self.read(|scope| scope.history.peek().destination().clone())
    }

    /// Direction of the scope's most recent mutation.
    pub fn last_direction(&self) -> Option<NavigationDirection> {
        self.read(|scope| scope.history.last_direction())
    }

    /// The record most recently removed from the scope, for exit-transition
    /// selection.
    pub fn last_removed(&self) -> Option<BackStackRecord<T>> {
        self.read(|scope| scope.history.last_removed().cloned())
            .flatten()
    }

    /// Snapshot of the scope's dialog overlays, oldest first.
    pub fn dialogs(&self) -> Vec<D> {
        self.read(|scope| scope.dialogs.get().to_vec())
            .unwrap_or_default()
    }

    fn read<R>(&self, f: impl FnOnce(&Scope<T, D>) -> R) -> Option<R> {
        self.registry.borrow().with_scope::<T, D, _, _>(self.key(), f)
    }

    /// Re-register the scope if its entry has vanished. Indicates a
    /// construction-ordering bug upstream, so it is logged, but it is
    /// recoverable and navigation proceeds.
    fn ensure_registered(&self, registry: &mut NavigationRegistry) -> Result<(), NavigationError> {
        if registry.contains(self.key()) {
            return Ok(());
        }
        warn_log!(
            "scope '{}' was not registered at use time; registering lazily",
            self.key()
        );
        registry.get_or_create::<T, D>(
            self.key().clone(),
            self.config.initial().clone(),
            self.config.parent_association().map(|p| p.clone_erased()),
            self.config.dialog_kinds().to_vec(),
        )
    }
}

impl<T: Destination, D: DialogId> Clone for Controller<T, D> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
            config: self.config.clone(),
            _dialogs: std::marker::PhantomData,
        }
    }
}

impl<T: Destination, D: DialogId> std::fmt::Debug for Controller<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("scope", self.key())
            .finish_non_exhaustive()
    }
}
