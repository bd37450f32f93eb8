//! Fade-in of content blocks the first time they scroll into view.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use stylist::GlobalStyle;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{
    Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::config::RevealConfig;
use crate::dom;
use crate::error::Result;
use crate::motion::MotionPreference;

pub const VISIBLE_CLASS: &str = "visible";
const ROOT_MARGIN: &str = "0px";
const ANIMATED_PROPERTIES: [&str; 3] = ["opacity", "transform", "transition"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Revealed,
}

/// One-way visibility flags for the observed blocks, by selection index.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    states: Vec<RevealState>,
}

impl RevealTracker {
    pub fn new(len: usize) -> Self {
        Self {
            states: vec![RevealState::Pending; len],
        }
    }

    /// Records an intersection report. Returns true only the first time the
    /// block is seen intersecting.
    pub fn observe(&mut self, index: usize, intersecting: bool) -> bool {
        let Some(state) = self.states.get_mut(index) else {
            return false;
        };
        if !intersecting || *state == RevealState::Revealed {
            return false;
        }
        *state = RevealState::Revealed;
        true
    }

    /// Applies one batch of `(index, intersecting)` reports and returns the
    /// blocks that just became visible. Those stop being observed.
    pub fn process<I>(&mut self, reports: I) -> Vec<usize>
    where
        I: IntoIterator<Item = (usize, bool)>,
    {
        reports
            .into_iter()
            .filter(|&(index, intersecting)| self.observe(index, intersecting))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn state(&self, index: usize) -> Option<RevealState> {
        self.states.get(index).copied()
    }

    pub fn revealed(&self) -> usize {
        self.states
            .iter()
            .filter(|state| **state == RevealState::Revealed)
            .count()
    }
}

pub fn hidden_transform(config: &RevealConfig) -> String {
    format!("translateY({}px)", config.offset_px)
}

/// Transition for the block at `index`; later blocks start later.
pub fn stagger_transition(index: usize, config: &RevealConfig) -> String {
    let delay = index as u64 * u64::from(config.stagger_ms);
    format!(
        "opacity {duration}ms ease {delay}ms, transform {duration}ms ease {delay}ms",
        duration = config.duration_ms,
    )
}

/// The rule that lets the visible class override the inline hidden state.
pub fn revealed_rule(config: &RevealConfig) -> String {
    let selectors = config
        .selectors
        .iter()
        .map(|selector| format!("{}.{}", selector, VISIBLE_CLASS))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} {{ opacity: 1 !important; transform: translateY(0) !important; }}",
        selectors
    )
}

/// Inline styles that hold a block hidden until it is revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStyle {
    pub transform: String,
    pub transition: String,
}

impl BlockStyle {
    pub fn properties(&self) -> [(&'static str, &str); 3] {
        [
            ("opacity", "0"),
            ("transform", &self.transform),
            ("transition", &self.transition),
        ]
    }
}

/// Hidden styles for `count` blocks, or `None` when nothing should animate.
pub fn plan(
    motion: MotionPreference,
    config: &RevealConfig,
    count: usize,
) -> Option<Vec<BlockStyle>> {
    if motion.is_reduced() || count == 0 {
        return None;
    }
    let transform = hidden_transform(config);
    Some(
        (0..count)
            .map(|index| BlockStyle {
                transform: transform.clone(),
                transition: stagger_transition(index, config),
            })
            .collect(),
    )
}

fn hide(block: &HtmlElement, block_style: &BlockStyle) -> Result<()> {
    let style = block.style();
    for (property, value) in block_style.properties() {
        style.set_property(property, value)?;
    }
    Ok(())
}

fn clear(block: &HtmlElement) {
    let style = block.style();
    for property in ANIMATED_PROPERTIES {
        let _ = style.remove_property(property);
    }
}

pub struct Reveal {
    blocks: Vec<HtmlElement>,
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
    style: GlobalStyle,
    tracker: Rc<RefCell<RevealTracker>>,
}

impl Reveal {
    /// Returns `Ok(None)` under reduced motion or when nothing matches.
    pub fn mount(
        document: &Document,
        config: &RevealConfig,
        motion: MotionPreference,
    ) -> Result<Option<Self>> {
        if motion.is_reduced() {
            info!("Reduced motion requested, skipping reveal animations");
            return Ok(None);
        }
        if config.selectors.is_empty() {
            return Ok(None);
        }

        let targets: Vec<HtmlElement> = dom::select_all(document, &config.selectors.join(", "))?
            .into_iter()
            .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
            .collect();
        let Some(styles) = plan(motion, config, targets.len()) else {
            debug!("No content blocks to reveal");
            return Ok(None);
        };

        let tracker = Rc::new(RefCell::new(RevealTracker::new(targets.len())));
        let callback = {
            let targets = targets.clone();
            let tracker = tracker.clone();
            Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
                let reports: Vec<(usize, bool)> = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter_map(|entry| {
                        let target = entry.target();
                        targets
                            .iter()
                            .position(|block| block.is_same_node(Some(target.as_ref())))
                            .map(|index| (index, entry.is_intersecting()))
                    })
                    .collect();

                let revealed = tracker.borrow_mut().process(reports);
                for index in revealed {
                    let block = &targets[index];
                    if let Err(e) = block.class_list().add_1(VISIBLE_CLASS) {
                        warn!("Failed to mark block visible: {:?}", e);
                    }
                    observer.unobserve(block);
                }
            }) as Box<dyn FnMut(Array, IntersectionObserver)>)
        };

        // Fallible host calls come before any block is touched.
        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.threshold));
        options.set_root_margin(ROOT_MARGIN);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        let style = GlobalStyle::new(revealed_rule(config))?;

        let mut reveal = Self {
            blocks: Vec::with_capacity(targets.len()),
            observer,
            _callback: callback,
            style,
            tracker,
        };
        for (block, block_style) in targets.iter().zip(&styles) {
            if let Err(e) = hide(block, block_style) {
                warn!("Leaving block unanimated: {}", e);
                clear(block);
                continue;
            }
            reveal.observer.observe(block);
            reveal.blocks.push(block.clone());
        }

        Ok(Some(reveal))
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn revealed(&self) -> usize {
        self.tracker.borrow().revealed()
    }
}

impl Drop for Reveal {
    fn drop(&mut self) {
        self.observer.disconnect();
        self.style.unregister();
        for block in &self.blocks {
            clear(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_first_intersection_reveals() {
        let mut tracker = RevealTracker::new(2);
        assert!(!tracker.observe(0, false));
        assert_eq!(tracker.state(0), Some(RevealState::Pending));

        assert!(tracker.observe(0, true));
        assert_eq!(tracker.state(0), Some(RevealState::Revealed));
        assert_eq!(tracker.state(1), Some(RevealState::Pending));
    }

    #[test]
    fn test_reveal_never_reverts() {
        let mut tracker = RevealTracker::new(1);
        tracker.observe(0, true);

        assert!(!tracker.observe(0, false));
        assert!(!tracker.observe(0, true));
        assert_eq!(tracker.state(0), Some(RevealState::Revealed));
        assert_eq!(tracker.revealed(), 1);
    }

    #[test]
    fn test_unknown_index_ignored() {
        let mut tracker = RevealTracker::new(1);
        assert!(!tracker.observe(3, true));
        assert_eq!(tracker.state(3), None);
        assert_eq!(tracker.revealed(), 0);
    }

    #[test]
    fn test_stagger_transition() {
        let config = RevealConfig::default();
        assert_eq!(
            stagger_transition(0, &config),
            "opacity 500ms ease 0ms, transform 500ms ease 0ms"
        );
        assert_eq!(
            stagger_transition(3, &config),
            "opacity 500ms ease 150ms, transform 500ms ease 150ms"
        );
    }

    #[test]
    fn test_hidden_transform() {
        assert_eq!(hidden_transform(&RevealConfig::default()), "translateY(20px)");
    }

    #[test]
    fn test_revealed_rule_covers_every_selector() {
        let rule = revealed_rule(&RevealConfig::default());
        assert!(rule.starts_with(
            ".feature-card.visible, .faq-category.visible, .privacy-section.visible {"
        ));
        assert!(rule.contains("opacity: 1 !important;"));
        assert!(rule.contains("transform: translateY(0) !important;"));
    }

    #[test]
    fn test_reduced_motion_plans_nothing() {
        let config = RevealConfig::default();
        assert_eq!(plan(MotionPreference::Reduced, &config, 4), None);
        assert_eq!(plan(MotionPreference::NoPreference, &config, 0), None);
    }

    #[test]
    fn test_plan_hides_and_staggers_each_block() {
        let styles = plan(MotionPreference::NoPreference, &RevealConfig::default(), 3).unwrap();
        assert_eq!(styles.len(), 3);

        let [opacity, transform, transition] = styles[2].properties();
        assert_eq!(opacity, ("opacity", "0"));
        assert_eq!(transform, ("transform", "translateY(20px)"));
        assert_eq!(
            transition,
            (
                "transition",
                "opacity 500ms ease 100ms, transform 500ms ease 100ms"
            )
        );
    }

    /// Delivers reports only for blocks still observed, dropping the ones
    /// the tracker reveals.
    struct Observed {
        blocks: BTreeSet<usize>,
        deliveries: Vec<usize>,
    }

    impl Observed {
        fn new(count: usize) -> Self {
            Self {
                blocks: (0..count).collect(),
                deliveries: Vec::new(),
            }
        }

        fn report(&mut self, tracker: &mut RevealTracker, reports: &[(usize, bool)]) -> Vec<usize> {
            let delivered: Vec<_> = reports
                .iter()
                .copied()
                .filter(|(index, _)| self.blocks.contains(index))
                .collect();
            self.deliveries.extend(delivered.iter().map(|(index, _)| *index));
            let revealed = tracker.process(delivered);
            for index in &revealed {
                self.blocks.remove(index);
            }
            revealed
        }
    }

    #[test]
    fn test_revealed_block_stops_being_observed() {
        let mut tracker = RevealTracker::new(3);
        let mut observed = Observed::new(3);

        assert_eq!(observed.report(&mut tracker, &[(0, true), (1, false)]), vec![0]);
        assert!(!observed.blocks.contains(&0));
        assert!(observed.blocks.contains(&1));

        // Block 0 leaves and re-enters the viewport.
        observed.report(&mut tracker, &[(0, false), (1, false)]);
        assert!(observed.report(&mut tracker, &[(0, true)]).is_empty());

        assert_eq!(tracker.state(0), Some(RevealState::Revealed));
        assert_eq!(observed.deliveries.iter().filter(|&&i| i == 0).count(), 1);
    }

    #[test]
    fn test_batch_reveals_each_block_once() {
        let mut tracker = RevealTracker::new(2);
        let revealed = tracker.process([(0, true), (0, true), (1, true)]);
        assert_eq!(revealed, vec![0, 1]);
        assert_eq!(tracker.revealed(), 2);
    }
}
