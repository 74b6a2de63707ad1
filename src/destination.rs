//! Destination and scope identity types.
//!
//! A **destination** is an immutable, equality-comparable value describing
//! "what to show"; every destination type reachable from one controller
//! shares a [`ScopeKey`]. The engine never inspects a destination's payload —
//! it only orders, compares, and persists destinations — so [`Destination`]
//! is a blanket trait over the bounds those three things require.
//!
//! Scopes with different destination types coexist in one registry. The
//! registry stores them behind an erased interface and the [`Controller`]
//! (which statically knows its own scope's destination type) recovers the
//! concrete type; [`ErasedDestination`] carries the cross-type equality used
//! when back-navigation hands control to the scope owning a destination.
//!
//! [`Controller`]: crate::controller::Controller

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;

// ============================================================================
// Scope keys
// ============================================================================

/// Stable identifier grouping all destinations reachable from one
/// controller/history pair.
///
/// The key's name doubles as the section key under which the scope's state
/// is persisted, so it must stay stable across process restarts.
///
/// # Examples
///
/// ```
/// use backstack_navigator::ScopeKey;
///
/// let key = ScopeKey::new("settings");
/// assert_eq!(key.name(), "settings");
/// assert_eq!(ScopeKey::from("settings"), key);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey(Cow<'static, str>);

impl ScopeKey {
    /// Create a scope key with the given stable name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The stable name, also used as the persisted section key.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ScopeKey {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for ScopeKey {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

// ============================================================================
// Destinations
// ============================================================================

/// Marker trait for destination values.
///
/// Blanket-implemented for every type that is cloneable, equality-comparable,
/// debuggable, serializable, and `'static` — typically a plain `enum` of the
/// screens one scope can show:
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// enum RootScreen {
///     Home,
///     Profile { user_id: u64 },
/// }
/// // RootScreen is a Destination, nothing to implement.
/// ```
pub trait Destination:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + 'static
{
}

impl<T> Destination for T where
    T: Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + 'static
{
}

/// Identifier for a modal overlay, layered above a scope's current screen.
///
/// Unlike [`Destination`] this is not blanket-implemented: a dialog id names
/// its **kind** — the stable name under which the dialog must be declared on
/// the scope before [`show_dialog`](crate::controller::Controller::show_dialog)
/// will accept it. Two ids of the same kind may coexist on the overlay stack
/// when they carry distinguishing payload; removal is always by full value
/// equality.
pub trait DialogId:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + 'static
{
    /// Stable kind name, used for declaration checks and diagnostics.
    fn kind(&self) -> &'static str;
}

/// Dialog id type for scopes that declare no dialogs.
///
/// Uninhabited, so `show_dialog`/`close_dialog` can never be called with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoDialogs {}

impl DialogId for NoDialogs {
    fn kind(&self) -> &'static str {
        match *self {}
    }
}

// ============================================================================
// Erased destinations
// ============================================================================

/// Object-safe view of a destination, used where two scopes of different
/// destination types must compare values (parent-association lookup) or where
/// a popped destination crosses the registry boundary before a controller
/// narrows it back to its concrete type.
pub trait ErasedDestination: fmt::Debug {
    /// The destination as `Any`, for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Consume the box and expose `Any`, for by-value downcasting.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Equality against a destination of unknown type. False when the types
    /// differ.
    fn eq_any(&self, other: &dyn Any) -> bool;

    /// Clone into a new erased box.
    fn clone_erased(&self) -> Box<dyn ErasedDestination>;
}

impl<T: Destination> ErasedDestination for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn eq_any(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn clone_erased(&self) -> Box<dyn ErasedDestination> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn ErasedDestination> {
    fn clone(&self) -> Self {
        self.clone_erased()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Screen {
        Home,
        Detail { id: u32 },
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum OtherScreen {
        Home,
    }

    #[test]
    fn test_scope_key_name() {
        let key = ScopeKey::new("root");
        assert_eq!(key.name(), "root");
        assert_eq!(key.to_string(), "root");
    }

    #[test]
    fn test_scope_key_from_string() {
        let key = ScopeKey::from(format!("tab-{}", 3));
        assert_eq!(key.name(), "tab-3");
    }

    #[test]
    fn test_erased_equality_same_type() {
        let a: Box<dyn ErasedDestination> = Box::new(Screen::Detail { id: 7 });
        assert!(a.eq_any(&Screen::Detail { id: 7 }));
        assert!(!a.eq_any(&Screen::Detail { id: 8 }));
        assert!(!a.eq_any(&Screen::Home));
    }

    #[test]
    fn test_erased_equality_cross_type() {
        // Same variant shape, different type: never equal.
        let a: Box<dyn ErasedDestination> = Box::new(Screen::Home);
        assert!(!a.eq_any(&OtherScreen::Home));
    }

    #[test]
    fn test_erased_clone_and_downcast() {
        let a: Box<dyn ErasedDestination> = Box::new(Screen::Detail { id: 42 });
        let b = a.clone();
        let concrete = b.into_any().downcast::<Screen>().expect("same type");
        assert_eq!(*concrete, Screen::Detail { id: 42 });
    }
}
