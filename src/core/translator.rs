//! Raw host events to navigation messages

use crate::core::{
    msg::Msg,
    raw_msg::{LinkTarget, RawMsg},
    route::ROUTE_PREFIX,
};

/// Translate a raw host event into a navigation message.
///
/// Returns `None` for events the router does not care about: clicks outside
/// marked anchors, anchors whose `href` is not a route fragment, and pointer
/// or focus movement over unmarked elements.
pub fn translate_raw_to_domain(raw: &RawMsg) -> Option<Msg> {
    match raw {
        RawMsg::DomContentLoaded => Some(Msg::Loaded),
        RawMsg::HashChange { .. } => Some(Msg::FragmentChanged),
        RawMsg::Click { link } => {
            let link = link.as_ref().filter(|link| link.is_anchor)?;
            route_href(link).map(|href| Msg::LinkActivated { href })
        }
        RawMsg::MouseOver { link } | RawMsg::FocusIn { link } => link
            .as_ref()
            .and_then(|link| link.href.clone())
            .map(|href| Msg::LinkHovered { href }),
    }
}

fn route_href(link: &LinkTarget) -> Option<String> {
    link.href
        .as_deref()
        .filter(|href| href.starts_with(ROUTE_PREFIX))
        .map(str::to_string)
}
