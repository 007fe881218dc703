use crate::core::{
    route::ViewId,
    view::{ScrollBehavior, ViewState},
};

/// Document capabilities the router consumes.
///
/// Every method is infallible from the router's point of view: a missing
/// element turns the corresponding operation into a no-op.
pub trait Dom {
    /// Current address fragment including the leading `#`, empty when absent
    fn fragment(&self) -> String;
    /// Write the address fragment; the host emits a change notification
    fn set_fragment(&self, fragment: &str);

    fn has_element(&self, id: &str) -> bool;
    fn set_view_state(&self, view: &ViewId, state: ViewState);

    /// Top of the element's bounding box relative to the viewport
    fn element_top(&self, id: &str) -> Option<f64>;
    /// Current vertical scroll offset of the document
    fn scroll_y(&self) -> f64;
    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);

    /// Make the first `h1, h2, h3` in the view focusable and focus it without
    /// scrolling. Returns `false` if the view has no heading.
    fn focus_first_heading(&self, view: &ViewId) -> bool;

    /// Raw values of `attribute` on elements inside the view
    fn image_lists(&self, view: &ViewId, attribute: &str) -> Vec<String>;
    /// Issue a fire-and-forget image request for caching
    fn prefetch_image(&self, url: &str);

    /// Call a globally registered zero-argument function.
    /// Returns `false` if nothing is registered under `name`.
    fn invoke_hook(&self, name: &str) -> bool;

    fn prefers_reduced_motion(&self) -> bool;
}
