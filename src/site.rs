use log::{info, warn};
use web_sys::{Document, Window};

use crate::accordion::Accordion;
use crate::anchor::AnchorScroll;
use crate::config::SiteConfig;
use crate::error::Result;
use crate::motion::MotionPreference;
use crate::nav::NavShader;
use crate::reveal::Reveal;

/// Everything mounted on the page. Dropping it detaches every listener and
/// observer it registered.
pub struct Site {
    accordion: Option<Accordion>,
    anchors: Option<AnchorScroll>,
    nav: Option<NavShader>,
    reveal: Option<Reveal>,
}

impl Site {
    /// Mounts each behavior independently; one that fails is skipped.
    pub fn mount(window: &Window, document: &Document, config: &SiteConfig) -> Self {
        let motion = MotionPreference::detect(window);

        let site = Self {
            accordion: mounted("FAQ accordion", Accordion::mount(document, &config.accordion)),
            anchors: mounted(
                "anchor scrolling",
                AnchorScroll::mount(document, &config.anchors, motion),
            ),
            nav: mounted("nav shading", NavShader::mount(window, document, &config.nav)).flatten(),
            reveal: mounted(
                "reveal animations",
                Reveal::mount(document, &config.reveal, motion),
            )
            .flatten(),
        };

        info!(
            "Site mounted: {} FAQ questions, {} anchor links, nav {}, {} reveal blocks",
            site.accordion.as_ref().map_or(0, Accordion::question_count),
            site.anchors.as_ref().map_or(0, AnchorScroll::link_count),
            if site.nav.is_some() { "on" } else { "off" },
            site.reveal.as_ref().map_or(0, Reveal::block_count),
        );
        site
    }

    pub fn unmount(self) {
        let revealed = self.reveal.as_ref().map_or(0, Reveal::revealed);
        let nav_state = self.nav.as_ref().and_then(NavShader::state);
        drop(self);
        info!(
            "Site unmounted ({} blocks revealed, nav {:?})",
            revealed, nav_state
        );
    }
}

fn mounted<T>(name: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(component) => Some(component),
        Err(e) => {
            warn!("Skipping {}: {}", name, e);
            None
        }
    }
}
