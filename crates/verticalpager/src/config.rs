//! Pager configuration
//!
//! Mirrors the widget's creation dictionary:
//! ```json
//! {
//!   "cacheSize": 3,
//!   "pageIndicator": {
//!     "type": "vertical",
//!     "pageIndicatorColor": "#30FF6B6B",
//!     "currentPageIndicatorColor": "#FF6B6B",
//!     "right": 16,
//!     "bottom": 100
//!   }
//! }
//! ```
//! Unknown keys are rejected.

use pagercache::DEFAULT_CAPACITY;
use pagerstore::{Error, Result};
use serde::Deserialize;

use crate::color::Color;
use crate::indicator::{
    HorizontalAnchor, IndicatorOrientation, IndicatorPlacement, IndicatorStyle, VerticalAnchor,
    DEFAULT_BOTTOM_MARGIN,
};

fn default_cache_size() -> usize {
    DEFAULT_CAPACITY
}

/// Recognized pager options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PagerConfig {
    /// Number of materialized pages kept, at least 1
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    /// Indicator options; no indicator style overrides when absent
    #[serde(default)]
    pub page_indicator: Option<IndicatorConfig>,

    /// Inactive dot color, overrides the indicator dictionary
    #[serde(default)]
    pub page_indicator_color: Option<Color>,

    /// Current dot color, overrides the indicator dictionary
    #[serde(default)]
    pub current_page_indicator_color: Option<Color>,
}

/// Indicator options
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IndicatorConfig {
    /// Strip orientation
    #[serde(rename = "type", default)]
    pub orientation: IndicatorOrientation,
    /// Inactive dot color
    pub page_indicator_color: Option<Color>,
    /// Current dot color
    pub current_page_indicator_color: Option<Color>,
    /// Left margin; wins over `right`
    pub left: Option<i32>,
    /// Right margin
    pub right: Option<i32>,
    /// Top margin; wins over `bottom`
    pub top: Option<i32>,
    /// Bottom margin
    pub bottom: Option<i32>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CAPACITY,
            page_indicator: None,
            page_indicator_color: None,
            current_page_indicator_color: None,
        }
    }
}

impl PagerConfig {
    /// Parse and validate a JSON creation dictionary
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PagerConfig = serde_json::from_str(json)
            .map_err(|e| Error::InvalidArgument(format!("invalid pager config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the cache size
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    /// Set the indicator options
    pub fn with_indicator(mut self, indicator: IndicatorConfig) -> Self {
        self.page_indicator = Some(indicator);
        self
    }

    /// Check option ranges
    pub fn validate(&self) -> Result<()> {
        if self.cache_size == 0 {
            return Err(Error::InvalidArgument(
                "cacheSize must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the indicator style
    pub fn indicator_style(&self) -> IndicatorStyle {
        let mut style = self
            .page_indicator
            .as_ref()
            .map(IndicatorConfig::style)
            .unwrap_or_default();

        if let Some(color) = self.page_indicator_color {
            style.page_color = color;
        }
        if let Some(color) = self.current_page_indicator_color {
            style.current_page_color = color;
        }
        style
    }
}

impl IndicatorConfig {
    /// Style described by these options
    pub fn style(&self) -> IndicatorStyle {
        let defaults = IndicatorStyle::default();

        IndicatorStyle {
            orientation: self.orientation,
            page_color: self.page_indicator_color.unwrap_or(defaults.page_color),
            current_page_color: self
                .current_page_indicator_color
                .unwrap_or(defaults.current_page_color),
            placement: self.placement(),
        }
    }

    fn placement(&self) -> IndicatorPlacement {
        let horizontal = match (self.left, self.right) {
            (Some(left), _) => HorizontalAnchor::Left(left),
            (None, Some(right)) => HorizontalAnchor::Right(right),
            (None, None) => HorizontalAnchor::Center,
        };
        let vertical = match (self.top, self.bottom) {
            (Some(top), _) => VerticalAnchor::Top(top),
            (None, Some(bottom)) => VerticalAnchor::Bottom(bottom),
            (None, None) => VerticalAnchor::Bottom(DEFAULT_BOTTOM_MARGIN),
        };

        IndicatorPlacement {
            horizontal,
            vertical,
        }
    }
}
