// Strong typing over strings. Newtypes for timestamps and section ids, plus the
// page-supplied configuration.

use serde::{Deserialize, Serialize};

use crate::error::NavError;

/// Timestamp in milliseconds on the animation-frame clock (`performance.now()`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestamp(f64);

impl Timestamp {
    pub fn from_millis(ms: f64) -> Self {
        Timestamp(ms)
    }

    pub fn as_millis(&self) -> f64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`. Negative if `earlier` is in the future.
    pub fn since(&self, earlier: Timestamp) -> f64 {
        self.0 - earlier.0
    }

    pub fn plus_millis(&self, ms: f64) -> Timestamp {
        Timestamp(self.0 + ms)
    }
}

/// Stable key of a page section; also the DOM id of its region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        SectionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        SectionId::new(id)
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named region of the page. The label arrives already localized.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Section {
    pub id: SectionId,
    #[serde(default)]
    pub label: String,
}

impl Section {
    pub fn new(id: &str, label: &str) -> Self {
        Section {
            id: SectionId::new(id),
            label: label.to_string(),
        }
    }
}

/// Ordered, fixed list of sections. Never empty, ids unique.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRegistry {
    sections: Vec<Section>,
}

impl SectionRegistry {
    pub fn new(sections: Vec<Section>) -> Result<Self, NavError> {
        if sections.is_empty() {
            return Err(NavError::InvalidConfig(
                "at least one section is required".to_string(),
            ));
        }
        for (i, section) in sections.iter().enumerate() {
            if section.id.as_str().is_empty() {
                return Err(NavError::InvalidConfig(format!(
                    "section at position {} has an empty id",
                    i
                )));
            }
            if sections[..i].iter().any(|s| s.id == section.id) {
                return Err(NavError::InvalidConfig(format!(
                    "duplicate section id `{}`",
                    section.id
                )));
            }
        }
        Ok(SectionRegistry { sections })
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn first(&self) -> &Section {
        &self.sections[0]
    }

    pub fn last_index(&self) -> usize {
        self.sections.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn index_of(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| &s.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &SectionId> {
        self.sections.iter().map(|s| &s.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }
}

/// Interaction mode. Desktop intercepts wheel/keyboard/touch and paginates;
/// mobile scrolls natively and only tracks visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Desktop,
    Mobile,
}

/// Navigation configuration passed from JS.
#[derive(Debug, Clone, Deserialize)]
pub struct NavConfig {
    pub sections: Vec<Section>,
    /// Minimum spacing between accepted navigations (milliseconds).
    #[serde(default = "default_throttle_delay")]
    pub throttle_delay_ms: f64,
    #[serde(default = "default_scroll_duration")]
    pub scroll_duration_ms: f64,
    /// Height of the fixed header; section tops land this far below the viewport top.
    #[serde(default = "default_header_offset")]
    pub header_offset_px: f64,
    /// Quiet period after an animation before input is handled again (milliseconds).
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: f64,
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint_px: f64,
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: Vec<f64>,
    #[serde(default = "default_root_margin")]
    pub root_margin: String,
}

impl NavConfig {
    pub fn with_sections(sections: Vec<Section>) -> Self {
        NavConfig {
            sections,
            throttle_delay_ms: default_throttle_delay(),
            scroll_duration_ms: default_scroll_duration(),
            header_offset_px: default_header_offset(),
            settle_delay_ms: default_settle_delay(),
            mobile_breakpoint_px: default_mobile_breakpoint(),
            visibility_threshold: default_visibility_threshold(),
            root_margin: default_root_margin(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, NavError> {
        let config: NavConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NavError> {
        if self.scroll_duration_ms.is_nan() || self.scroll_duration_ms <= 0.0 {
            return Err(NavError::InvalidConfig(
                "scroll_duration_ms must be positive".to_string(),
            ));
        }
        if self.throttle_delay_ms < 0.0 || self.settle_delay_ms < 0.0 {
            return Err(NavError::InvalidConfig(
                "delays must not be negative".to_string(),
            ));
        }
        if self
            .visibility_threshold
            .iter()
            .any(|t| !(0.0..=1.0).contains(t))
        {
            return Err(NavError::InvalidConfig(
                "visibility thresholds must lie in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

pub const DEFAULT_THROTTLE_DELAY_MS: f64 = 300.0;
pub const DEFAULT_SCROLL_DURATION_MS: f64 = 800.0;
pub const DEFAULT_HEADER_OFFSET_PX: f64 = 80.0;
pub const DEFAULT_SETTLE_DELAY_MS: f64 = 100.0;
pub const DEFAULT_MOBILE_BREAKPOINT: f64 = 768.0;

fn default_throttle_delay() -> f64 {
    DEFAULT_THROTTLE_DELAY_MS
}

fn default_scroll_duration() -> f64 {
    DEFAULT_SCROLL_DURATION_MS
}

fn default_header_offset() -> f64 {
    DEFAULT_HEADER_OFFSET_PX
}

fn default_settle_delay() -> f64 {
    DEFAULT_SETTLE_DELAY_MS
}

fn default_mobile_breakpoint() -> f64 {
    DEFAULT_MOBILE_BREAKPOINT
}

pub(crate) fn default_visibility_threshold() -> Vec<f64> {
    vec![0.0, 0.25, 0.5, 0.75, 1.0]
}

/// Matches the fixed header height.
pub(crate) fn default_root_margin() -> String {
    format!("-{}px 0px 0px 0px", DEFAULT_HEADER_OFFSET_PX)
}
