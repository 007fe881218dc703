//! Visual states of a view element

use serde::{Deserialize, Serialize};

/// Class names and attributes a host toggles to express a [`ViewState`]
pub const HIDDEN_CLASS: &str = "hidden";
pub const ACTIVE_CLASS: &str = "is-active";
pub const LEAVING_CLASS: &str = "transitioning-out";
pub const ARIA_HIDDEN: &str = "aria-hidden";

/// Visibility state of a long-lived view subtree
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewState {
    /// `hidden`, not active, `aria-hidden=true`
    #[default]
    Hidden,
    /// Fading out: `transitioning-out`, not active
    Leaving,
    /// Unhidden and exposed to assistive technology, fade-in not started
    Revealed,
    /// Fully shown: `is-active`
    Active,
}

impl ViewState {
    pub fn is_visible(self) -> bool {
        matches!(self, ViewState::Leaving | ViewState::Revealed | ViewState::Active)
    }

    /// Value of `aria-hidden` for this state, if the state sets it
    pub fn aria_hidden(self) -> Option<&'static str> {
        match self {
            ViewState::Hidden => Some("true"),
            ViewState::Revealed | ViewState::Active => Some("false"),
            ViewState::Leaving => None,
        }
    }
}

/// How a scroll request moves the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        assert!(!ViewState::Hidden.is_visible());
        assert!(ViewState::Leaving.is_visible());
        assert!(ViewState::Revealed.is_visible());
        assert!(ViewState::Active.is_visible());
    }

    #[test]
    fn test_aria_hidden() {
        assert_eq!(ViewState::Hidden.aria_hidden(), Some("true"));
        assert_eq!(ViewState::Active.aria_hidden(), Some("false"));
        assert_eq!(ViewState::Leaving.aria_hidden(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ViewState::Revealed.to_string(), "revealed");
        assert_eq!(ScrollBehavior::Smooth.to_string(), "smooth");
    }
}
