use web_sys::Window;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPreference {
    NoPreference,
    Reduced,
}

impl MotionPreference {
    /// Reads the visitor's preference; hosts without `matchMedia` count as
    /// having none.
    pub fn detect(window: &Window) -> Self {
        let reduced = window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .map(|query| query.matches())
            .unwrap_or(false);
        Self::from_matches(reduced)
    }

    pub fn from_matches(reduced: bool) -> Self {
        if reduced {
            MotionPreference::Reduced
        } else {
            MotionPreference::NoPreference
        }
    }

    pub fn is_reduced(self) -> bool {
        self == MotionPreference::Reduced
    }
}
