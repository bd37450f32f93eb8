use std::cell::RefCell;

use log::{error, info};
use wasm_bindgen::prelude::*;

pub mod accordion;
pub mod anchor;
pub mod config;
pub mod dom;
pub mod error;
pub mod motion;
pub mod nav;
pub mod reveal;
pub mod scheduler;
pub mod site;

use config::SiteConfig;
use error::SiteError;
use site::Site;

thread_local! {
    static SITE: RefCell<Option<Site>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).map_err(SiteError::from)?;

    info!("Starting site scripts");
    let document = dom::document()?;
    dom::when_ready(&document, || {
        if let Err(e) = mount() {
            error!("Failed to mount site: {:?}", e);
        }
    })?;
    Ok(())
}

/// Mounts every behavior on the current page, replacing an earlier mount.
#[wasm_bindgen]
pub fn mount() -> Result<(), JsValue> {
    let window = dom::window()?;
    let document = window.document().ok_or(SiteError::MissingDocument)?;
    let config = SiteConfig::load(&document);

    SITE.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(previous) = slot.take() {
            previous.unmount();
        }
        *slot = Some(Site::mount(&window, &document, &config));
    });
    Ok(())
}

#[wasm_bindgen]
pub fn unmount() {
    SITE.with(|slot| {
        if let Some(site) = slot.borrow_mut().take() {
            site.unmount();
        }
    });
}
