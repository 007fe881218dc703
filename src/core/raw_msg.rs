use serde::{Deserialize, Serialize};

/// Element carrying the navigation-link marker closest to an event target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTarget {
    /// Value of the `href` attribute, if any
    pub href: Option<String>,
    /// Whether the marked element is an anchor (`<a>`)
    pub is_anchor: bool,
}

impl LinkTarget {
    pub fn anchor(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            is_anchor: true,
        }
    }

    pub fn element(href: Option<String>) -> Self {
        Self {
            href,
            is_anchor: false,
        }
    }
}

/// Raw host events, before any routing decision is made
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawMsg {
    /// Document finished loading
    DomContentLoaded,
    /// Click anywhere in the body
    Click { link: Option<LinkTarget> },
    /// Pointer entered an element
    MouseOver { link: Option<LinkTarget> },
    /// An element received keyboard focus
    FocusIn { link: Option<LinkTarget> },
    /// The address fragment changed
    HashChange { fragment: String },
}

impl RawMsg {
    /// Pointer movement is high volume; keep it out of info-level logs
    pub fn is_frequent(&self) -> bool {
        matches!(self, RawMsg::MouseOver { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequent_detection() {
        assert!(RawMsg::MouseOver { link: None }.is_frequent());
        assert!(!RawMsg::Click { link: None }.is_frequent());
        assert!(!RawMsg::DomContentLoaded.is_frequent());
    }

    #[test]
    fn test_raw_msg_serialization() -> serde_json::Result<()> {
        let msg = RawMsg::Click {
            link: Some(LinkTarget::anchor("#/projects")),
        };
        let serialized = serde_json::to_string(&msg)?;
        let deserialized: RawMsg = serde_json::from_str(&serialized)?;
        assert_eq!(msg, deserialized);
        Ok(())
    }
}
