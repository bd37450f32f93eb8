//! Smooth scrolling for in-page links.

use std::borrow::Cow;

use log::debug;
use web_sys::{
    Document, Element, Event, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::config::AnchorConfig;
use crate::dom::{self, Listener};
use crate::error::Result;
use crate::motion::MotionPreference;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentTarget<'a> {
    /// Not a same-page reference.
    External,
    /// The bare `#`; the browser's own handling applies.
    Top,
    Id(Cow<'a, str>),
}

/// Classifies a link's literal `href`.
pub fn parse_fragment(href: &str) -> FragmentTarget<'_> {
    let Some(raw) = href.strip_prefix('#') else {
        return FragmentTarget::External;
    };
    if raw.is_empty() {
        return FragmentTarget::Top;
    }
    match urlencoding::decode(raw) {
        Ok(id) => FragmentTarget::Id(id),
        Err(_) => FragmentTarget::Id(Cow::Borrowed(raw)),
    }
}

/// Looks up the element a link points at. `None` means the click keeps its
/// default navigation; `Some` means it is cancelled and the target scrolled to.
pub fn resolve<T, F>(href: &str, lookup: F) -> Option<T>
where
    F: FnOnce(&str) -> Option<T>,
{
    match parse_fragment(href) {
        FragmentTarget::Id(id) => lookup(&id),
        FragmentTarget::Top | FragmentTarget::External => None,
    }
}

pub fn scroll_behavior(motion: MotionPreference, respect_reduced_motion: bool) -> ScrollBehavior {
    if respect_reduced_motion && motion.is_reduced() {
        ScrollBehavior::Auto
    } else {
        ScrollBehavior::Smooth
    }
}

fn scroll_to(target: &Element, behavior: ScrollBehavior) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(behavior);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

pub struct AnchorScroll {
    listeners: Vec<Listener>,
}

impl AnchorScroll {
    pub fn mount(
        document: &Document,
        config: &AnchorConfig,
        motion: MotionPreference,
    ) -> Result<Self> {
        let behavior = scroll_behavior(motion, config.respect_reduced_motion);
        let links = dom::select_all(document, &config.link_selector)?;

        let listeners = links
            .into_iter()
            .map(|link| {
                let document = document.clone();
                let anchor = link.clone();
                Listener::new(&link, "click", move |event: Event| {
                    let Some(href) = anchor.get_attribute("href") else {
                        return;
                    };
                    match resolve(&href, |id| document.get_element_by_id(id)) {
                        Some(target) => {
                            event.prevent_default();
                            scroll_to(&target, behavior);
                        }
                        None => debug!("Following {} natively", href),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { listeners })
    }

    pub fn link_count(&self) -> usize {
        self.listeners.len()
    }
}
