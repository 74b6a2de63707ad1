//! Error handling for the navigation engine.
//!
//! This module defines [`NavigationError`], the error type returned when a
//! navigation or persistence operation cannot complete.
//!
//! The engine distinguishes three failure classes:
//!
//! - **Programmer errors** (showing a dialog that was never declared for a
//!   scope, closing a dialog that is not on the overlay stack) — returned as
//!   errors so they surface during development instead of silently no-oping.
//! - **Recoverable absences** (popping a single-record history, restoring a
//!   scope with no persisted section, pop-until with no match) — these are
//!   *not* errors; the operations return `None` / `false` sentinels.
//! - **Corrupt persisted state** — a persisted section exists but fails to
//!   decode. Fatal to that scope's restoration and always surfaced; silently
//!   starting fresh would hide the loss of the user's navigation state.
//!
//! # Examples
//!
//! ```
//! use backstack_navigator::error::NavigationError;
//!
//! let err = NavigationError::DialogNotDeclared {
//!     scope: "settings".into(),
//!     kind: "confirm-delete".into(),
//! };
//! assert!(err.is_programmer_error());
//! ```

use std::fmt;

/// Errors produced by navigation and persistence operations.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display) for
/// idiomatic error handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// A dialog kind was shown without being declared for its scope
    DialogNotDeclared { scope: String, kind: String },

    /// A dialog was closed that is not on the scope's overlay stack
    DialogNotShowing { scope: String, dialog: String },

    /// A persisted section exists for the scope but failed to decode
    CorruptState { scope: String, message: String },

    /// A record could not be encoded into the persistence blob
    SerializeFailed { scope: String, message: String },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::DialogNotDeclared { scope, kind } => {
                write!(f, "dialog kind '{}' was never declared for scope '{}'", kind, scope)
            }
            NavigationError::DialogNotShowing { scope, dialog } => {
                write!(f, "dialog {} is not showing in scope '{}'", dialog, scope)
            }
            NavigationError::CorruptState { scope, message } => {
                write!(f, "persisted state for scope '{}' is corrupt: {}", scope, message)
            }
            NavigationError::SerializeFailed { scope, message } => {
                write!(f, "failed to serialize scope '{}': {}", scope, message)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

impl NavigationError {
    /// Whether this error indicates a construction/usage bug rather than a
    /// runtime condition.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            NavigationError::DialogNotDeclared { .. } | NavigationError::DialogNotShowing { .. }
        )
    }

    /// Whether this error came from the persistence layer.
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            NavigationError::CorruptState { .. } | NavigationError::SerializeFailed { .. }
        )
    }

    /// The scope the error originated in.
    pub fn scope(&self) -> &str {
        match self {
            NavigationError::DialogNotDeclared { scope, .. }
            | NavigationError::DialogNotShowing { scope, .. }
            | NavigationError::CorruptState { scope, .. }
            | NavigationError::SerializeFailed { scope, .. } => scope,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
