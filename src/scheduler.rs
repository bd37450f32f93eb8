//! Frame scheduling and update coalescing.
//!
//! A [`CoalescedTask`] turns any number of update requests made between two
//! display refreshes into a single run of its job on the next frame.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::Result;

pub trait FrameScheduler {
    /// Queue `callback` to run before the next repaint.
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<()>;
}

/// `requestAnimationFrame` on the page's window.
#[derive(Clone)]
pub struct AnimationFrames {
    window: Window,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<()> {
        let callback = Closure::once_into_js(move || callback());
        self.window
            .request_animation_frame(callback.unchecked_ref())?;
        Ok(())
    }
}

/// Dropping the task cancels a run that is still waiting for its frame.
pub struct CoalescedTask {
    pending: Rc<Cell<bool>>,
    job: Rc<dyn Fn()>,
}

impl CoalescedTask {
    pub fn new<F>(job: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            pending: Rc::new(Cell::new(false)),
            job: Rc::new(job),
        }
    }

    /// Schedule the job unless a run is already pending.
    ///
    /// Returns whether a new frame was requested.
    pub fn schedule<S>(&self, scheduler: &S) -> bool
    where
        S: FrameScheduler + ?Sized,
    {
        if self.pending.get() {
            return false;
        }
        self.pending.set(true);

        let pending = self.pending.clone();
        let job: Weak<dyn Fn()> = Rc::downgrade(&self.job);
        let requested = scheduler.request_frame(Box::new(move || {
            if let Some(job) = job.upgrade() {
                job();
            }
            pending.set(false);
        }));

        match requested {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not request animation frame: {}", e);
                self.pending.set(false);
                false
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }
}
