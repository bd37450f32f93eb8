//! FAQ accordion.
//!
//! Each question element is followed by its answer panel. Opening a question
//! sets the panel's `max-height` to its content height so the stylesheet can
//! transition it; closing removes the inline height again.

use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent};

use crate::config::AccordionConfig;
use crate::dom::{self, Listener};
use crate::error::Result;

const EXPANDED_ATTR: &str = "aria-expanded";

/// A question header and the answer panel it controls.
pub trait Disclosure {
    fn is_same(&self, other: &Self) -> bool;
    fn is_expanded(&self) -> bool;
    fn set_expanded(&self, expanded: bool);
    /// Natural content height of the panel, `None` when there is no panel.
    fn panel_height(&self) -> Option<i32>;
    fn set_panel_height(&self, height: Option<i32>);
}

/// Toggles `question`, first closing the expanded entries of `siblings` when
/// `collapse_others` is set.
///
/// Returns the new expanded state, or `None` if the question has no panel.
pub fn activate<D: Disclosure>(question: &D, siblings: &[D], collapse_others: bool) -> Option<bool> {
    let height = question.panel_height()?;

    if collapse_others {
        for other in siblings {
            if !other.is_same(question) && other.is_expanded() {
                other.set_expanded(false);
                other.set_panel_height(None);
            }
        }
    }

    let expanded = !question.is_expanded();
    question.set_expanded(expanded);
    question.set_panel_height(expanded.then_some(height));
    Some(expanded)
}

/// Enter and Space act like a click.
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

/// Keydown handling: activation keys suppress the default (page scroll on
/// Space) and then activate. Returns whether the key was handled.
pub fn handle_key<P, A>(key: &str, prevent_default: P, activate: A) -> bool
where
    P: FnOnce(),
    A: FnOnce(),
{
    if !is_activation_key(key) {
        return false;
    }
    prevent_default();
    activate();
    true
}

#[derive(Clone)]
pub struct QuestionElement {
    element: Element,
}

impl QuestionElement {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    fn panel(&self) -> Option<HtmlElement> {
        self.element
            .next_element_sibling()
            .and_then(|panel| panel.dyn_into::<HtmlElement>().ok())
    }
}

impl Disclosure for QuestionElement {
    fn is_same(&self, other: &Self) -> bool {
        self.element.is_same_node(Some(other.element.as_ref()))
    }

    fn is_expanded(&self) -> bool {
        self.element.get_attribute(EXPANDED_ATTR).as_deref() == Some("true")
    }

    fn set_expanded(&self, expanded: bool) {
        let value = if expanded { "true" } else { "false" };
        if let Err(e) = self.element.set_attribute(EXPANDED_ATTR, value) {
            warn!("Failed to set {}: {:?}", EXPANDED_ATTR, e);
        }
    }

    fn panel_height(&self) -> Option<i32> {
        self.panel().map(|panel| panel.scroll_height())
    }

    fn set_panel_height(&self, height: Option<i32>) {
        let Some(panel) = self.panel() else {
            return;
        };
        let style = panel.style();
        let result = match height {
            Some(px) => style.set_property("max-height", &format!("{}px", px)),
            None => style.remove_property("max-height").map(|_| ()),
        };
        if let Err(e) = result {
            warn!("Failed to update answer height: {:?}", e);
        }
    }
}

#[derive(Clone)]
struct Activation {
    question_selector: String,
    category_selector: String,
    collapse_others: bool,
}

impl Activation {
    fn run(&self, question: &QuestionElement) {
        let siblings = match question.element.closest(&self.category_selector) {
            Ok(Some(category)) => dom::select_all_within(&category, &self.question_selector)
                .unwrap_or_default()
                .into_iter()
                .map(QuestionElement::new)
                .collect(),
            _ => Vec::new(),
        };

        if activate(question, &siblings, self.collapse_others).is_none() {
            warn!("FAQ question has no answer panel following it");
        }
    }
}

/// Click and keyboard handlers for every question on the page.
pub struct Accordion {
    listeners: Vec<Listener>,
}

impl Accordion {
    pub fn mount(document: &Document, config: &AccordionConfig) -> Result<Self> {
        let activation = Activation {
            question_selector: config.question_selector.clone(),
            category_selector: config.category_selector.clone(),
            collapse_others: config.collapse_others,
        };

        let questions = dom::select_all(document, &config.question_selector)?;
        let mut listeners = Vec::with_capacity(questions.len() * 2);

        for element in questions {
            let question = QuestionElement::new(element.clone());

            let on_click = {
                let question = question.clone();
                let activation = activation.clone();
                move |_: Event| activation.run(&question)
            };
            listeners.push(Listener::new(&element, "click", on_click)?);

            let on_key = {
                let activation = activation.clone();
                move |event: Event| {
                    let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    handle_key(
                        &key_event.key(),
                        || event.prevent_default(),
                        || match question.element.dyn_ref::<HtmlElement>() {
                            Some(html) => html.click(),
                            None => activation.run(&question),
                        },
                    );
                }
            };
            listeners.push(Listener::new(&element, "keydown", on_key)?);
        }

        debug!("Accordion mounted on {} questions", listeners.len() / 2);
        Ok(Self { listeners })
    }

    pub fn question_count(&self) -> usize {
        self.listeners.len() / 2
    }
}
