use serde::{Deserialize, Serialize};

/// Navigation intents derived from raw host events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    /// Page loaded; run router initialization
    Loaded,
    /// A marked link with a route fragment was activated
    LinkActivated { href: String },
    /// A marked link was hovered or focused
    LinkHovered { href: String },
    /// The address fragment changed; the live fragment is authoritative
    FragmentChanged,
}

impl Msg {
    /// Whether the host must suppress the event's default action
    pub fn intercepts_default(&self) -> bool {
        matches!(self, Msg::LinkActivated { .. })
    }
}
