//! Hierarchical back-stack navigation engine for tree-shaped UI hosts.
//!
//! This crate manages, for any number of independently-scoped screen stacks
//! (including stacks nested inside other stacks, and modal overlay stacks),
//! an ordered history of destinations. It lets callers push, pop, and jump
//! within that history, resolves which scope currently owns the back
//! gesture, and persists all of it across a full process teardown and
//! restart. It does **not** render anything: how a destination becomes
//! visible content, and how transitions play, is the host's business — the
//! engine only stores the metadata the host needs for both.
//!
//! # Concepts
//!
//! - **Destination** — an immutable, equality-comparable value describing a
//!   screen; typically an `enum` per scope ([`Destination`] is blanket-
//!   implemented).
//! - **Scope** — one [`History`] of records plus one [`DialogHistory`] of
//!   overlays, identified by a stable [`ScopeKey`].
//! - **[`Navigator`]** — owns the scope tree, hands out [`Controller`]s,
//!   and speaks the two-call persistence contract with the host
//!   ([`Navigator::restore`] at construction, [`Navigator::persist`] before
//!   teardown).
//! - **[`Controller`]** — the per-scope façade: `navigate_to`, `go_back`,
//!   dialog operations, and the read-only views the renderer subscribes to.
//!
//! # Quick start
//!
//! ```
//! use backstack_navigator::{NavOptions, Navigator, ScopeConfig, Transition};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! enum Screen {
//!     Home,
//!     Settings,
//!     Profile { user_id: u64 },
//! }
//!
//! let navigator = Navigator::new();
//! let root = navigator
//!     .controller(ScopeConfig::new("root", Screen::Home))
//!     .unwrap();
//!
//! root.navigate_to(Screen::Settings).unwrap();
//! root.navigate_with(
//!     Screen::Profile { user_id: 7 },
//!     NavOptions::new().transition(Transition::slide_left(250)),
//! )
//! .unwrap();
//!
//! assert_eq!(root.go_back(), Some(Screen::Profile { user_id: 7 }));
//! assert_eq!(root.current(), Some(Screen::Settings));
//!
//! // Before teardown, and after restart:
//! let blob = navigator.persist().unwrap();
//! let revived = Navigator::restore(blob);
//! let root = revived
//!     .controller(ScopeConfig::new("root", Screen::Home))
//!     .unwrap();
//! assert_eq!(root.current(), Some(Screen::Settings));
//! ```
//!
//! # Nested scopes
//!
//! A scope nested inside another declares which destination owns it with
//! [`ScopeConfig::child_of`]. Back-navigation then resolves across the tree:
//! the active scope's dialogs first, then its records, collapsing an
//! exhausted nested scope entirely and handing control back to its owner.
//!
//! # Threading
//!
//! The engine is single-threaded cooperative: every mutation is a complete,
//! synchronous state transition on the host's event thread. Handles are
//! `Rc`-based and deliberately not `Send`; the shared registry is the single
//! boundary a multi-threaded host would have to guard.

pub mod controller;
pub mod destination;
pub mod dialog;
pub mod error;
pub mod history;
mod logging;
pub mod navigator;
pub mod options;
pub mod persistence;
pub mod registry;
pub mod transition;

pub use controller::Controller;
pub use destination::{Destination, DialogId, NoDialogs, ScopeKey};
pub use dialog::DialogHistory;
pub use error::NavigationError;
pub use history::{BackStackRecord, History, NavigationDirection};
pub use navigator::{Navigator, ScopeConfig};
pub use options::{NavOptions, PopUpTo};
pub use persistence::{DialogSection, RemovedEntry, ScopeSection, StateBlob};
pub use registry::{EntryKind, HistoryEntry, NavigationRegistry, PoppedEntry, PoppedKind};
pub use transition::{SlideDirection, Transition};
