use log::{warn, Level};
use serde::Deserialize;
use web_sys::Document;

use crate::error::Result;

/// Id of the optional `<script type="application/json">` element carrying
/// page-level overrides.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub accordion: AccordionConfig,
    pub anchors: AnchorConfig,
    pub nav: NavConfig,
    pub reveal: RevealConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccordionConfig {
    pub question_selector: String,
    pub category_selector: String,
    /// Close the other open questions of a category when one opens.
    pub collapse_others: bool,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            question_selector: ".faq-question".to_string(),
            category_selector: ".faq-category".to_string(),
            collapse_others: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnchorConfig {
    pub link_selector: String,
    /// Jump instead of animating when the visitor asked for reduced motion.
    pub respect_reduced_motion: bool,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            link_selector: "a[href^=\"#\"]".to_string(),
            respect_reduced_motion: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavConfig {
    pub selector: String,
    /// Offsets strictly above this count as scrolled.
    pub threshold: f64,
    pub top_background: String,
    pub scrolled_background: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            selector: ".nav".to_string(),
            threshold: 50.0,
            top_background: "rgba(26, 26, 46, 0.9)".to_string(),
            scrolled_background: "rgba(26, 26, 46, 0.98)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    pub selectors: Vec<String>,
    pub threshold: f64,
    pub duration_ms: u32,
    pub stagger_ms: u32,
    pub offset_px: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selectors: vec![
                ".feature-card".to_string(),
                ".faq-category".to_string(),
                ".privacy-section".to_string(),
            ],
            threshold: 0.1,
            duration_ms: 500,
            stagger_ms: 50,
            offset_px: 20,
        }
    }
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Reads overrides embedded in the page, falling back to defaults when
    /// the element is missing or its JSON is malformed.
    pub fn load(document: &Document) -> Self {
        let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
            return Self::default();
        };
        let json = element.text_content().unwrap_or_default();
        match Self::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert!(config.accordion.collapse_others);
        assert_eq!(config.accordion.question_selector, ".faq-question");
        assert_eq!(config.nav.threshold, 50.0);
        assert_eq!(config.nav.scrolled_background, "rgba(26, 26, 46, 0.98)");
        assert_eq!(config.reveal.selectors.len(), 3);
        assert_eq!(config.reveal.stagger_ms, 50);
        assert!((config.reveal.threshold - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(SiteConfig::from_json("").unwrap(), SiteConfig::default());
        assert_eq!(SiteConfig::from_json("{}").unwrap(), SiteConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SiteConfig::from_json(
            r#"{"accordion": {"collapseOthers": false}, "nav": {"threshold": 80}}"#,
        )
        .unwrap();
        assert!(!config.accordion.collapse_others);
        assert_eq!(config.accordion.category_selector, ".faq-category");
        assert_eq!(config.nav.threshold, 80.0);
        assert_eq!(config.nav.selector, ".nav");
        assert_eq!(config.reveal, RevealConfig::default());
    }

    #[test]
    fn test_malformed_json() {
        assert!(SiteConfig::from_json("{\"nav\": ").is_err());
    }
}
