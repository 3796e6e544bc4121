//! Auto-binding of the click sound to the page's buttons.
//!
//! Binding is a one-shot snapshot: elements present when
//! [`add_button_sounds`] runs get exactly one listener each, elements
//! inserted later get none, and running it twice binds twice.

use std::rc::Rc;

/// Elements that count as buttons.
pub const BUTTON_SELECTOR: &str = "button, .btn";

/// Mirrors `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn from_js(state: &str) -> Self {
        match state {
            "loading" => ReadyState::Loading,
            "interactive" => ReadyState::Interactive,
            _ => ReadyState::Complete,
        }
    }
}

/// Click handler shared by every bound element.
pub type ClickHandler = Rc<dyn Fn()>;

/// The slice of a DOM the bootstrap needs.
pub trait ButtonDocument {
    type Element;

    fn ready_state(&self) -> ReadyState;

    /// Run `callback` once the DOM has been parsed.
    fn when_ready(&self, callback: Box<dyn FnOnce()>);

    /// Every element currently matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Attach `handler` as a click listener on `element`.
    fn listen_click(&self, element: &Self::Element, handler: ClickHandler);
}

/// Outcome of [`install`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// The DOM was ready; this many elements were bound.
    Bound(usize),
    /// The DOM is still loading; binding runs on the ready signal.
    Deferred,
}

/// Bind `handler` to every element matching `selector` right now.
/// Returns the number of elements bound.
pub fn add_button_sounds<D: ButtonDocument + ?Sized>(
    doc: &D,
    selector: &str,
    handler: ClickHandler,
) -> usize {
    let elements = doc.query_all(selector);
    for element in &elements {
        doc.listen_click(element, Rc::clone(&handler));
    }
    tracing::debug!(count = elements.len(), selector, "bound click sounds");
    elements.len()
}

/// Page-load hook: bind now if the DOM is ready, otherwise on ready.
/// Call once per page load.
pub fn install<D>(doc: &D, selector: &str, handler: ClickHandler) -> Bootstrap
where
    D: ButtonDocument + Clone + 'static,
{
    if doc.ready_state() == ReadyState::Loading {
        let deferred_doc = doc.clone();
        let selector = selector.to_string();
        doc.when_ready(Box::new(move || {
            add_button_sounds(&deferred_doc, &selector, handler);
        }));
        Bootstrap::Deferred
    } else {
        Bootstrap::Bound(add_button_sounds(doc, selector, handler))
    }
}
