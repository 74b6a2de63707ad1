//! Options for a single navigate call.
//!
//! [`NavOptions`] composes three orthogonal knobs:
//!
//! - **pop-up-to** — truncate the back stack to a target destination before
//!   the new record is appended;
//! - **single-top** — drop every existing record equal to the new
//!   destination, so at most one instance remains in history;
//! - **transition** — the metadata the new record carries for the renderer.
//!
//! ```
//! use backstack_navigator::{NavOptions, Transition};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! enum Screen { Home, Settings }
//!
//! let options = NavOptions::new()
//!     .pop_up_to(Screen::Home, false)
//!     .single_top()
//!     .transition(Transition::slide_left(250));
//! assert!(options.is_single_top());
//! ```

use crate::destination::Destination;
use crate::transition::Transition;

/// Back-stack truncation target for a navigate call.
#[derive(Debug, Clone, PartialEq)]
pub struct PopUpTo<T> {
    /// Destination to cut the stack back to, by structural equality.
    pub target: T,
    /// Whether the matching record itself is removed as well.
    pub inclusive: bool,
    /// Match the first occurrence from the bottom instead of the last one.
    /// Only observable when the stack holds duplicate destinations.
    pub all: bool,
}

/// Options applied by [`Controller::navigate_with`].
///
/// [`Controller::navigate_with`]: crate::controller::Controller::navigate_with
#[derive(Debug, Clone, PartialEq)]
pub struct NavOptions<T> {
    pop_up_to: Option<PopUpTo<T>>,
    single_top: bool,
    transition: Transition,
}

impl<T: Destination> Default for NavOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Destination> NavOptions<T> {
    /// Options that plainly append the new destination.
    pub fn new() -> Self {
        Self {
            pop_up_to: None,
            single_top: false,
            transition: Transition::None,
        }
    }

    /// Truncate the stack back to the last occurrence of `target` before
    /// appending. With `inclusive` the target record is removed too.
    pub fn pop_up_to(mut self, target: T, inclusive: bool) -> Self {
        self.pop_up_to = Some(PopUpTo {
            target,
            inclusive,
            all: false,
        });
        self
    }

    /// Like [`pop_up_to`](Self::pop_up_to), but cut at the **first**
    /// occurrence of the target when duplicates exist.
    pub fn pop_up_to_first(mut self, target: T, inclusive: bool) -> Self {
        self.pop_up_to = Some(PopUpTo {
            target,
            inclusive,
            all: true,
        });
        self
    }

    /// Keep at most one instance of the new destination in history.
    pub fn single_top(mut self) -> Self {
        self.single_top = true;
        self
    }

    /// Transition metadata for the new record.
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// The configured truncation target, if any.
    pub fn pop_up_to_target(&self) -> Option<&PopUpTo<T>> {
        self.pop_up_to.as_ref()
    }

    /// Whether single-top deduplication is requested.
    pub fn is_single_top(&self) -> bool {
        self.single_top
    }

    /// The transition the new record will carry.
    pub fn transition_meta(&self) -> Transition {
        self.transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Screen {
        Home,
        Settings,
    }

    #[test]
    fn test_defaults() {
        let options: NavOptions<Screen> = NavOptions::new();
        assert!(options.pop_up_to_target().is_none());
        assert!(!options.is_single_top());
        assert!(options.transition_meta().is_none());
    }

    #[test]
    fn test_builder_composition() {
        let options = NavOptions::new()
            .pop_up_to(Screen::Home, true)
            .single_top()
            .transition(Transition::fade(100));

        let pop = options.pop_up_to_target().unwrap();
        assert_eq!(pop.target, Screen::Home);
        assert!(pop.inclusive);
        assert!(!pop.all);
        assert!(options.is_single_top());
        assert_eq!(options.transition_meta(), Transition::fade(100));
    }

    #[test]
    fn test_pop_up_to_first_sets_all() {
        let options = NavOptions::new().pop_up_to_first(Screen::Settings, false);
        let pop = options.pop_up_to_target().unwrap();
        assert!(pop.all);
        assert!(!pop.inclusive);
    }
}
