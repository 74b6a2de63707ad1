//! Per-scope navigation history.
//!
//! A [`History`] is the ordered back stack of one navigation scope: the
//! records pushed so far, which direction the last mutation went, and the
//! record most recently removed (the renderer reads it to pick the exit
//! transition). Histories never go empty while live — the sole remaining
//! record cannot be popped; when a nested scope reaches that point, the
//! registry collapses the whole scope instead.

use crate::destination::{Destination, ErasedDestination, ScopeKey};
use crate::error::NavigationError;
use crate::persistence::{RemovedEntry, ScopeSection, StateBlob};
use crate::transition::Transition;
use crate::{debug_log, trace_log, warn_log};
use serde::{Deserialize, Serialize};

/// Direction of the most recent history mutation.
///
/// Exists purely so the rendering collaborator can choose forward
/// vs. backward transition semantics; updated atomically with the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationDirection {
    /// The last mutation added or replaced records.
    Forward,
    /// The last mutation removed records.
    Backward,
}

/// One entry of a back stack: a destination plus the transition to play when
/// it becomes current. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct BackStackRecord<T> {
    destination: T,
    transition: Transition,
}

impl<T: Destination> BackStackRecord<T> {
    /// Create a record with no transition.
    pub fn new(destination: T) -> Self {
        Self {
            destination,
            transition: Transition::None,
        }
    }

    /// Create a record carrying transition metadata.
    pub fn with_transition(destination: T, transition: Transition) -> Self {
        Self {
            destination,
            transition,
        }
    }

    /// The destination this record shows.
    pub fn destination(&self) -> &T {
        &self.destination
    }

    /// The transition to play when this record becomes current.
    pub fn transition(&self) -> Transition {
        self.transition
    }

    /// Consume the record, yielding its destination.
    pub fn into_destination(self) -> T {
        self.destination
    }
}

/// Ordered navigation history for one scope.
///
/// Supports push, pop, pop-until, atomic bulk replace, and save/restore
/// against the shared [`StateBlob`].
///
/// # Invariants
///
/// - `records` is never empty while the history is live; the first element is
///   the initial destination unless explicitly replaced.
/// - [`pop`](Self::pop) never removes the last remaining record; it returns
///   `None` and leaves collapsing the scope to the registry.
/// - [`last_direction`](Self::last_direction) always reflects the most recent
///   mutation.
#[derive(Debug)]
pub struct History<T: Destination> {
    key: ScopeKey,
    initial: T,
    records: Vec<BackStackRecord<T>>,
    last_removed: Option<BackStackRecord<T>>,
    last_direction: NavigationDirection,
    parent_association: Option<Box<dyn ErasedDestination>>,
}

impl<T: Destination> History<T> {
    /// Create a live history holding its initial destination.
    pub fn new(key: ScopeKey, initial: T) -> Self {
        Self {
            key,
            records: vec![BackStackRecord::new(initial.clone())],
            initial,
            last_removed: None,
            last_direction: NavigationDirection::Forward,
            parent_association: None,
        }
    }

    /// The scope key this history belongs to.
    pub fn key(&self) -> &ScopeKey {
        &self.key
    }

    /// The destination this history started from.
    pub fn initial(&self) -> &T {
        &self.initial
    }

    /// Read-only view of the records, oldest first.
    pub fn records(&self) -> &[BackStackRecord<T>] {
        &self.records
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// A live history is never empty; this exists for completeness.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Direction of the most recent mutation.
    pub fn last_direction(&self) -> NavigationDirection {
        self.last_direction
    }

    /// The record most recently removed by `pop`, `pop_until`, or `set`.
    pub fn last_removed(&self) -> Option<&BackStackRecord<T>> {
        self.last_removed.as_ref()
    }

    /// The current (last) record, without mutation.
    pub fn peek(&self) -> &BackStackRecord<T> {
        &self.records[self.records.len() - 1]
    }

    pub(crate) fn set_parent_association(&mut self, parent: Box<dyn ErasedDestination>) {
        self.parent_association = Some(parent);
    }

    pub(crate) fn parent_association(&self) -> Option<&dyn ErasedDestination> {
        self.parent_association.as_deref()
    }

    /// Append a record. Duplicate destinations are allowed; records are
    /// distinguished by position, not identity.
    pub fn push(&mut self, record: BackStackRecord<T>) {
        trace_log!("'{}': push {:?}", self.key, record.destination());
        self.records.push(record);
        self.last_direction = NavigationDirection::Forward;
    }

    /// Atomically replace the whole record list.
    ///
    /// No-ops (returning `false`) when the new list equals the current one,
    /// so observers see no spurious change. Otherwise remembers the previous
    /// current record as last-removed and reports `true`.
    pub fn set(&mut self, new_records: Vec<BackStackRecord<T>>) -> bool {
        if new_records.is_empty() {
            warn_log!("'{}': refusing to set an empty record list", self.key);
            return false;
        }
        if new_records == self.records {
            return false;
        }
        self.last_removed = self.records.last().cloned();
        self.records = new_records;
        self.last_direction = NavigationDirection::Forward;
        true
    }

    /// Remove and return the last record.
    ///
    /// Returns `None` when only one record remains — the sole current
    /// destination is never popped; the registry collapses the whole scope
    /// instead.
    pub fn pop(&mut self) -> Option<BackStackRecord<T>> {
        if self.records.len() <= 1 {
            return None;
        }
        let record = self.records.pop()?;
        trace_log!("'{}': pop {:?}", self.key, record.destination());
        self.last_removed = Some(record.clone());
        self.last_direction = NavigationDirection::Backward;
        Some(record)
    }

    /// Remove records from the end, down to the last record whose destination
    /// matches.
    ///
    /// With `inclusive` the matching record itself is removed too. Returns
    /// the number of records removed; an absent target is a no-op returning
    /// zero. The sole remaining record is never removed. This is the only
    /// operation that may remove more than one record at a time.
    pub fn pop_until(&mut self, matcher: impl Fn(&T) -> bool, inclusive: bool) -> usize {
        let Some(index) = self.records.iter().rposition(|r| matcher(r.destination())) else {
            return 0;
        };
        let cut = (index + usize::from(!inclusive)).clamp(1, self.records.len());
        let removed = self.records.len() - cut;
        if removed == 0 {
            return 0;
        }
        self.last_removed = self.records.last().cloned();
        self.records.truncate(cut);
        self.last_direction = NavigationDirection::Backward;
        debug_log!("'{}': pop_until removed {} record(s)", self.key, removed);
        removed
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encode records and the last-removed record into a [`ScopeSection`].
    ///
    /// An empty history (which the invariants rule out) writes nothing.
    pub fn serialize_into(&self, section: &mut ScopeSection) -> Result<(), NavigationError> {
        if self.records.is_empty() {
            return Ok(());
        }
        for record in &self.records {
            section
                .destinations
                .push(Self::encode(&self.key, record.destination())?);
            section.transitions.push(record.transition());
        }
        section.last_removed = match &self.last_removed {
            Some(record) => Some(RemovedEntry {
                destination: Self::encode(&self.key, record.destination())?,
                transition: record.transition(),
            }),
            None => None,
        };
        Ok(())
    }

    /// Consume this scope's section from the shared blob, if present, and
    /// rehydrate records and last-removed from it.
    ///
    /// Returns the consumed section (its dialog sub-blob still unread) so the
    /// caller can restore the overlay stack, or `None` when the blob holds no
    /// section for this scope — a fresh start, not an error. A section that
    /// exists but fails to decode is a [`NavigationError::CorruptState`];
    /// silently starting fresh would hide the loss of the user's last
    /// session.
    pub fn restore(&mut self, blob: &mut StateBlob) -> Result<Option<ScopeSection>, NavigationError> {
        let Some(section) = blob.take_section(self.key.name()) else {
            trace_log!("'{}': no persisted section, starting fresh", self.key);
            return Ok(None);
        };
        if section.destinations.len() != section.transitions.len() {
            return Err(NavigationError::CorruptState {
                scope: self.key.name().to_string(),
                message: format!(
                    "{} destinations but {} transitions",
                    section.destinations.len(),
                    section.transitions.len()
                ),
            });
        }
        if section.destinations.is_empty() {
            warn_log!("'{}': persisted section is empty, keeping initial", self.key);
            return Ok(Some(section));
        }

        let mut records = Vec::with_capacity(section.destinations.len());
        for (value, transition) in section.destinations.iter().zip(&section.transitions) {
            records.push(BackStackRecord::with_transition(
                Self::decode(&self.key, value)?,
                *transition,
            ));
        }
        self.last_removed = match &section.last_removed {
            Some(entry) => Some(BackStackRecord::with_transition(
                Self::decode(&self.key, &entry.destination)?,
                entry.transition,
            )),
            None => None,
        };
        debug_log!("'{}': restored {} record(s)", self.key, records.len());
        self.records = records;
        self.last_direction = NavigationDirection::Forward;
        Ok(Some(section))
    }

    fn encode(key: &ScopeKey, destination: &T) -> Result<serde_json::Value, NavigationError> {
        serde_json::to_value(destination).map_err(|err| NavigationError::SerializeFailed {
            scope: key.name().to_string(),
            message: err.to_string(),
        })
    }

    fn decode(key: &ScopeKey, value: &serde_json::Value) -> Result<T, NavigationError> {
        serde_json::from_value(value.clone()).map_err(|err| NavigationError::CorruptState {
            scope: key.name().to_string(),
            message: err.to_string(),
        })
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
    enum Screen {
        A,
        B,
        C,
        D,
        E,
    }

    fn history_of(screens: &[Screen]) -> History<Screen> {
        let mut history = History::new(ScopeKey::new("test"), screens[0].clone());
        for screen in &screens[1..] {
            history.push(BackStackRecord::new(screen.clone()));
        }
        history
    }

    #[test]
    fn test_push_grows_by_one() {
        let mut history = History::new(ScopeKey::new("test"), Screen::A);
        assert_eq!(history.len(), 1);
        history.push(BackStackRecord::new(Screen::B));
        assert_eq!(history.len(), 2);
        assert_eq!(history.peek().destination(), &Screen::B);
        assert_eq!(history.last_direction(), NavigationDirection::Forward);
    }

    #[test]
    fn test_duplicates_allowed() {
        let mut history = History::new(ScopeKey::new("test"), Screen::A);
        history.push(BackStackRecord::new(Screen::A));
        history.push(BackStackRecord::new(Screen::A));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_pop_returns_last_and_sets_direction() {
        let mut history = history_of(&[Screen::A, Screen::B]);
        let popped = history.pop().unwrap();
        assert_eq!(popped.destination(), &Screen::B);
        assert_eq!(history.last_direction(), NavigationDirection::Backward);
        assert_eq!(history.last_removed().unwrap().destination(), &Screen::B);
    }

    #[test]
    fn test_pop_never_empties() {
        let mut history = History::new(ScopeKey::new("test"), Screen::A);
        assert!(history.pop().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_set_no_ops_on_equal_list() {
        let mut history = history_of(&[Screen::A, Screen::B]);
        let same = history.records().to_vec();
        assert!(!history.set(same));
        assert!(history.last_removed().is_none());
    }

    #[test]
    fn test_set_replaces_and_remembers_previous_current() {
        let mut history = history_of(&[Screen::A, Screen::B]);
        let changed = history.set(vec![
            BackStackRecord::new(Screen::A),
            BackStackRecord::new(Screen::C),
        ]);
        assert!(changed);
        assert_eq!(history.peek().destination(), &Screen::C);
        assert_eq!(history.last_removed().unwrap().destination(), &Screen::B);
        assert_eq!(history.last_direction(), NavigationDirection::Forward);
    }

    #[test]
    fn test_set_refuses_empty() {
        let mut history = history_of(&[Screen::A, Screen::B]);
        assert!(!history.set(Vec::new()));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_pop_until_inclusive() {
        let mut history = history_of(&[Screen::A, Screen::B, Screen::C, Screen::D, Screen::E]);
        let removed = history.pop_until(|d| d == &Screen::B, true);
        assert_eq!(removed, 4);
        let remaining: Vec<_> = history.records().iter().map(|r| r.destination().clone()).collect();
        assert_eq!(remaining, vec![Screen::A]);
    }

    #[test]
    fn test_pop_until_exclusive() {
        let mut history = history_of(&[Screen::A, Screen::B, Screen::C, Screen::D, Screen::E]);
        let removed = history.pop_until(|d| d == &Screen::B, false);
        assert_eq!(removed, 3);
        let remaining: Vec<_> = history.records().iter().map(|r| r.destination().clone()).collect();
        assert_eq!(remaining, vec![Screen::A, Screen::B]);
    }

    #[test]
    fn test_pop_until_absent_target_no_ops() {
        let mut history = history_of(&[Screen::A, Screen::B, Screen::C]);
        assert_eq!(history.pop_until(|d| d == &Screen::E, true), 0);
        assert_eq!(history.len(), 3);
        assert_eq!(history.last_direction(), NavigationDirection::Forward);
    }

    #[test]
    fn test_pop_until_matches_last_duplicate() {
        let mut history = history_of(&[Screen::A, Screen::B, Screen::C, Screen::B, Screen::E]);
        history.pop_until(|d| d == &Screen::B, false);
        let remaining: Vec<_> = history.records().iter().map(|r| r.destination().clone()).collect();
        assert_eq!(remaining, vec![Screen::A, Screen::B, Screen::C, Screen::B]);
    }

    #[test]
    fn test_pop_until_never_empties() {
        let mut history = history_of(&[Screen::A, Screen::B]);
        let removed = history.pop_until(|d| d == &Screen::A, true);
        assert_eq!(removed, 1);
        assert_eq!(history.peek().destination(), &Screen::A);
    }

    #[test]
    fn test_serialize_restore_round_trip() {
        let mut original = history_of(&[Screen::A, Screen::B, Screen::C]);
        original.pop();

        let mut section = ScopeSection::default();
        original.serialize_into(&mut section).unwrap();
        let mut blob = StateBlob::new();
        blob.insert_section("test", section);

        let mut restored = History::new(ScopeKey::new("test"), Screen::A);
        let consumed = restored.restore(&mut blob).unwrap();
        assert!(consumed.is_some());
        assert_eq!(restored.records(), original.records());
        assert_eq!(
            restored.last_removed().map(|r| r.destination().clone()),
            Some(Screen::C)
        );
    }

    #[test]
    fn test_restore_is_consume_once() {
        let mut history = history_of(&[Screen::A, Screen::B]);
        let mut section = ScopeSection::default();
        history.serialize_into(&mut section).unwrap();
        let mut blob = StateBlob::new();
        blob.insert_section("test", section);

        let mut restored = History::new(ScopeKey::new("test"), Screen::A);
        assert!(restored.restore(&mut blob).unwrap().is_some());
        assert!(restored.restore(&mut blob).unwrap().is_none());
    }

    #[test]
    fn test_restore_missing_section_is_fresh_start() {
        let mut blob = StateBlob::new();
        let mut history = History::new(ScopeKey::new("test"), Screen::A);
        assert!(history.restore(&mut blob).unwrap().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_restore_corrupt_section_is_fatal() {
        let mut blob = StateBlob::new();
        blob.insert_section(
            "test",
            ScopeSection {
                destinations: vec![serde_json::json!({"NotAScreen": 1})],
                transitions: vec![Transition::None],
                last_removed: None,
                dialogs: Default::default(),
            },
        );
        let mut history = History::new(ScopeKey::new("test"), Screen::A);
        let err = history.restore(&mut blob).unwrap_err();
        assert!(matches!(err, NavigationError::CorruptState { .. }));
        // The history itself is untouched by the failed restore.
        assert_eq!(history.len(), 1);
        assert_eq!(history.peek().destination(), &Screen::A);
    }

    #[test]
    fn test_restore_length_mismatch_is_corrupt() {
        let mut blob = StateBlob::new();
        blob.insert_section(
            "test",
            ScopeSection {
                destinations: vec![serde_json::json!("A")],
                transitions: vec![],
                last_removed: None,
                dialogs: Default::default(),
            },
        );
        let mut history = History::new(ScopeKey::new("test"), Screen::A);
        assert!(matches!(
            history.restore(&mut blob),
            Err(NavigationError::CorruptState { .. })
        ));
    }
}
