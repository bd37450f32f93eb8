//! Navigation bar background that darkens once the page is scrolled.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, Window};

use crate::config::NavConfig;
use crate::dom::Listener;
use crate::error::Result;
use crate::scheduler::{AnimationFrames, CoalescedTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Top,
    Scrolled,
}

impl NavState {
    pub fn at_offset(offset: f64, threshold: f64) -> Self {
        if offset > threshold {
            NavState::Scrolled
        } else {
            NavState::Top
        }
    }
}

/// Maps scroll offsets to backgrounds, remembering what was last painted.
pub struct NavPainter {
    threshold: f64,
    top_background: String,
    scrolled_background: String,
    painted: Cell<Option<NavState>>,
}

impl NavPainter {
    pub fn new(config: &NavConfig) -> Self {
        Self {
            threshold: config.threshold,
            top_background: config.top_background.clone(),
            scrolled_background: config.scrolled_background.clone(),
            painted: Cell::new(None),
        }
    }

    /// The state to paint for `offset`, or `None` if it is already painted.
    pub fn transition(&self, offset: f64) -> Option<NavState> {
        let state = NavState::at_offset(offset, self.threshold);
        if self.painted.get() == Some(state) {
            return None;
        }
        self.painted.set(Some(state));
        Some(state)
    }

    pub fn background(&self, state: NavState) -> &str {
        match state {
            NavState::Top => &self.top_background,
            NavState::Scrolled => &self.scrolled_background,
        }
    }

    pub fn painted(&self) -> Option<NavState> {
        self.painted.get()
    }
}

pub struct NavShader {
    nav: HtmlElement,
    _scroll: Listener,
    painter: Rc<NavPainter>,
}

impl NavShader {
    /// Returns `Ok(None)` when the page has no navigation bar.
    pub fn mount(window: &Window, document: &Document, config: &NavConfig) -> Result<Option<Self>> {
        let nav = document
            .query_selector(&config.selector)?
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        let Some(nav) = nav else {
            debug!("No {} element, nav shading disabled", config.selector);
            return Ok(None);
        };

        let painter = Rc::new(NavPainter::new(config));
        let repaint = {
            let window = window.clone();
            let nav = nav.clone();
            let painter = painter.clone();
            move || {
                let offset = window.scroll_y().unwrap_or(0.0);
                if let Some(state) = painter.transition(offset) {
                    if let Err(e) = nav
                        .style()
                        .set_property("background", painter.background(state))
                    {
                        warn!("Failed to set nav background: {:?}", e);
                    }
                }
            }
        };
        repaint();

        let task = CoalescedTask::new(repaint);
        let frames = AnimationFrames::new(window.clone());
        let scroll = Listener::passive(window, "scroll", move |_: Event| {
            task.schedule(&frames);
        })?;

        Ok(Some(Self {
            nav,
            _scroll: scroll,
            painter,
        }))
    }

    pub fn state(&self) -> Option<NavState> {
        self.painter.painted()
    }
}

impl Drop for NavShader {
    fn drop(&mut self) {
        let _ = self.nav.style().remove_property("background");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::tests::ManualFrames;

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(NavState::at_offset(0.0, 50.0), NavState::Top);
        assert_eq!(NavState::at_offset(50.0, 50.0), NavState::Top);
        assert_eq!(NavState::at_offset(50.5, 50.0), NavState::Scrolled);
        assert_eq!(NavState::at_offset(51.0, 50.0), NavState::Scrolled);
    }

    #[test]
    fn test_same_offset_same_state() {
        for offset in [0.0, 49.0, 50.0, 51.0, 900.0] {
            assert_eq!(
                NavState::at_offset(offset, 50.0),
                NavState::at_offset(offset, 50.0)
            );
        }
    }

    #[test]
    fn test_painter_skips_unchanged_state() {
        let painter = NavPainter::new(&NavConfig::default());

        assert_eq!(painter.transition(0.0), Some(NavState::Top));
        assert_eq!(painter.transition(10.0), None);
        assert_eq!(painter.transition(51.0), Some(NavState::Scrolled));
        assert_eq!(painter.transition(400.0), None);
        assert_eq!(painter.transition(50.0), Some(NavState::Top));
    }

    #[test]
    fn test_backgrounds() {
        let painter = NavPainter::new(&NavConfig::default());
        assert_eq!(painter.background(NavState::Top), "rgba(26, 26, 46, 0.9)");
        assert_eq!(
            painter.background(NavState::Scrolled),
            "rgba(26, 26, 46, 0.98)"
        );
    }

    #[test]
    fn test_scroll_burst_repaints_once_per_frame() {
        let frames = ManualFrames::default();
        let painter = Rc::new(NavPainter::new(&NavConfig::default()));
        let offset = Rc::new(Cell::new(0.0));
        let paints = Rc::new(Cell::new(0));

        let task = {
            let painter = painter.clone();
            let offset = offset.clone();
            let paints = paints.clone();
            CoalescedTask::new(move || {
                if painter.transition(offset.get()).is_some() {
                    paints.set(paints.get() + 1);
                }
            })
        };

        for y in [10.0, 30.0, 60.0, 120.0] {
            offset.set(y);
            task.schedule(&frames);
        }
        assert_eq!(frames.queued(), 1);

        frames.flush();
        assert_eq!(paints.get(), 1);
        assert_eq!(painter.painted(), Some(NavState::Scrolled));

        offset.set(0.0);
        task.schedule(&frames);
        frames.flush();
        assert_eq!(paints.get(), 2);
        assert_eq!(painter.painted(), Some(NavState::Top));
    }

    #[test]
    fn test_unmounted_shader_does_not_repaint() {
        let frames = ManualFrames::default();
        let painter = Rc::new(NavPainter::new(&NavConfig::default()));

        let task = {
            let painter = painter.clone();
            CoalescedTask::new(move || {
                painter.transition(200.0);
            })
        };
        task.schedule(&frames);
        drop(task);
        frames.flush();

        assert_eq!(painter.painted(), None);
    }
}
