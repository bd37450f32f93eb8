//! Host lookups and event listener registration.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Element, Event, EventTarget, Window};

use crate::error::{Result, SiteError};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(SiteError::MissingWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(SiteError::MissingDocument)
}

/// Every element under `root` matching `selector`, in document order.
pub fn select_all(root: &Document, selector: &str) -> Result<Vec<Element>> {
    let nodes = root.query_selector_all(selector)?;
    Ok(collect_elements(&nodes))
}

pub fn select_all_within(root: &Element, selector: &str) -> Result<Vec<Element>> {
    let nodes = root.query_selector_all(selector)?;
    Ok(collect_elements(&nodes))
}

fn collect_elements(nodes: &web_sys::NodeList) -> Vec<Element> {
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// An event listener that stays attached for as long as the value lives.
///
/// Dropping it removes the callback from its target.
pub struct Listener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<T, F>(target: &T, event_type: &'static str, callback: F) -> Result<Self>
    where
        T: AsRef<EventTarget>,
        F: FnMut(Event) + 'static,
    {
        Self::with_options(target, event_type, false, callback)
    }

    /// Registers with `passive: true`; the callback cannot cancel the event.
    pub fn passive<T, F>(target: &T, event_type: &'static str, callback: F) -> Result<Self>
    where
        T: AsRef<EventTarget>,
        F: FnMut(Event) + 'static,
    {
        Self::with_options(target, event_type, true, callback)
    }

    fn with_options<T, F>(
        target: &T,
        event_type: &'static str,
        passive: bool,
        callback: F,
    ) -> Result<Self>
    where
        T: AsRef<EventTarget>,
        F: FnMut(Event) + 'static,
    {
        let target = target.as_ref().clone();
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event_type,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;

        Ok(Self {
            target,
            event_type,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.event_type,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

/// Runs `f` once the document has been parsed.
///
/// Runs it immediately when parsing already finished, otherwise on a
/// one-shot `DOMContentLoaded` listener.
pub fn when_ready<F>(document: &Document, f: F) -> Result<()>
where
    F: FnOnce() + 'static,
{
    if document.ready_state() != "loading" {
        f();
        return Ok(());
    }

    let options = AddEventListenerOptions::new();
    options.set_once(true);
    let callback = Closure::once_into_js(f);
    document.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        callback.unchecked_ref(),
        &options,
    )?;
    Ok(())
}
