//! Page indicator model
//!
//! The core pushes an [`IndicatorState`] and an [`IndicatorStyle`] to the
//! host's indicator and never reads them back. The vertical dot strip layout
//! lives here so every host draws the same thing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Most dots drawn before the strip switches to a sliding window
pub const MAX_VISIBLE_DOTS: usize = 9;

const NORMAL_DOT_RADIUS: f32 = 6.0;
const ACTIVE_DOT_RADIUS: f32 = 8.0;
const MIN_DOT_RADIUS: f32 = 3.0;
const DOT_SPACING: f32 = 16.0;
const DOT_PITCH: f32 = ACTIVE_DOT_RADIUS * 2.0 + DOT_SPACING;
const STRIP_PADDING: f32 = 16.0;
const STRIP_FOOTER: f32 = 40.0;

/// Default bottom margin when no vertical anchor is configured
pub const DEFAULT_BOTTOM_MARGIN: i32 = 40;

/// Orientation of the indicator strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorOrientation {
    /// Dots laid out in a row
    #[default]
    Horizontal,
    /// Dots laid out in a column
    Vertical,
}

/// Horizontal anchor with its margin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    /// Anchored to the left edge
    Left(i32),
    /// Anchored to the right edge
    Right(i32),
    /// Centred
    Center,
}

/// Vertical anchor with its margin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    /// Anchored to the top edge
    Top(i32),
    /// Anchored to the bottom edge
    Bottom(i32),
}

/// Where the indicator sits over the pager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPlacement {
    /// Horizontal anchor
    pub horizontal: HorizontalAnchor,
    /// Vertical anchor
    pub vertical: VerticalAnchor,
}

impl Default for IndicatorPlacement {
    fn default() -> Self {
        Self {
            horizontal: HorizontalAnchor::Center,
            vertical: VerticalAnchor::Bottom(DEFAULT_BOTTOM_MARGIN),
        }
    }
}

/// Visual configuration for the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorStyle {
    /// Strip orientation
    pub orientation: IndicatorOrientation,
    /// Color of the inactive dots
    pub page_color: Color,
    /// Color of the current page's dot
    pub current_page_color: Color,
    /// Anchoring over the pager
    pub placement: IndicatorPlacement,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            orientation: IndicatorOrientation::Horizontal,
            page_color: Color::WHITE.with_alpha(0x80),
            current_page_color: Color::WHITE,
            placement: IndicatorPlacement::default(),
        }
    }
}

/// Position and count pushed to the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorState {
    /// Current page, `None` when there are no pages
    pub current: Option<usize>,
    /// Number of pages
    pub count: usize,
}

/// One dot of the vertical strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    /// Page the dot stands for
    pub page: usize,
    /// Vertical centre relative to the middle of the strip
    pub y: f32,
    /// Dot radius
    pub radius: f32,
    /// Opacity, 0-255
    pub alpha: u8,
    /// Whether this is the current page
    pub current: bool,
}

impl IndicatorState {
    /// Build a state
    pub fn new(current: Option<usize>, count: usize) -> Self {
        Self { current, count }
    }

    /// Human-readable position, e.g. "3 of 3"
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Preferred size of the vertical strip as (width, height)
    pub fn strip_size(&self) -> (f32, f32) {
        let visible = self.count.min(MAX_VISIBLE_DOTS) as f32;
        let width = ACTIVE_DOT_RADIUS * 2.0 + STRIP_PADDING;
        let height = ACTIVE_DOT_RADIUS * 2.0 * visible
            + DOT_SPACING * (visible - 1.0).max(0.0)
            + STRIP_FOOTER;
        (width, height)
    }

    /// Lay out the vertical dot strip
    ///
    /// `offset` is the fraction of a page the content has scrolled past the
    /// current page; it slides the condensed strip while dragging.
    pub fn dots(&self, offset: f32) -> Vec<Dot> {
        let current = match self.current {
            Some(current) if current < self.count => current,
            _ => return Vec::new(),
        };

        if self.count <= MAX_VISIBLE_DOTS {
            self.all_dots(current)
        } else {
            self.sliding_dots(current, offset)
        }
    }

    fn all_dots(&self, current: usize) -> Vec<Dot> {
        let total = ACTIVE_DOT_RADIUS * 2.0 * self.count as f32
            + DOT_SPACING * (self.count as f32 - 1.0);
        let start = -total / 2.0 + ACTIVE_DOT_RADIUS;

        (0..self.count)
            .map(|page| {
                let is_current = page == current;
                Dot {
                    page,
                    y: start + page as f32 * DOT_PITCH,
                    radius: if is_current { ACTIVE_DOT_RADIUS } else { NORMAL_DOT_RADIUS },
                    alpha: if is_current { 255 } else { 153 },
                    current: is_current,
                }
            })
            .collect()
    }

    fn sliding_dots(&self, current: usize, offset: f32) -> Vec<Dot> {
        let centre = MAX_VISIBLE_DOTS / 2;
        let half_height = self.strip_size().1 / 2.0;
        let max_distance = MAX_VISIBLE_DOTS as f32 / 2.0 * DOT_PITCH;
        let scroll = -offset * DOT_PITCH;

        // One extra dot above, two below so the incoming page is drawn
        let first = current.saturating_sub(centre + 1);
        let last = (current + centre + 2).min(self.count - 1);

        (first..=last)
            .filter_map(|page| {
                let relative = page as f32 - current as f32;
                let y = relative * DOT_PITCH + scroll;
                if y.abs() > half_height + ACTIVE_DOT_RADIUS * 2.0 {
                    return None;
                }

                let is_current = page == current;
                let (radius, alpha) = if is_current {
                    (ACTIVE_DOT_RADIUS, 255)
                } else {
                    let distance = (y.abs() / max_distance).min(1.0);
                    if distance > 0.8 {
                        (MIN_DOT_RADIUS, 128)
                    } else if distance > 0.5 {
                        (NORMAL_DOT_RADIUS * 0.8, 180)
                    } else {
                        (NORMAL_DOT_RADIUS, 204)
                    }
                };

                Some(Dot {
                    page,
                    y,
                    radius,
                    alpha,
                    current: is_current,
                })
            })
            .collect()
    }
}

impl fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.current {
            Some(current) => write!(f, "{} of {}", current + 1, self.count),
            None => write!(f, "0 of {}", self.count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(IndicatorState::new(Some(2), 3).label(), "3 of 3");
        assert_eq!(IndicatorState::new(None, 0).label(), "0 of 0");
    }

    #[test]
    fn test_default_style() {
        let style = IndicatorStyle::default();

        assert_eq!(style.page_color.to_string(), "#80FFFFFF");
        assert_eq!(style.current_page_color.to_string(), "#FFFFFFFF");
        assert_eq!(style.placement.vertical, VerticalAnchor::Bottom(40));
        assert_eq!(style.placement.horizontal, HorizontalAnchor::Center);
    }

    #[test]
    fn test_all_dots_symmetric() {
        let dots = IndicatorState::new(Some(1), 3).dots(0.0);

        assert_eq!(dots.len(), 3);
        assert!(dots[1].current);
        assert_eq!(dots[1].radius, 8.0);
        assert_eq!(dots[0].alpha, 153);
        assert_eq!(dots[0].y, -dots[2].y);
        assert_eq!(dots[1].y, 0.0);
    }

    #[test]
    fn test_no_dots_without_current() {
        assert!(IndicatorState::new(None, 0).dots(0.0).is_empty());
        assert!(IndicatorState::new(Some(4), 2).dots(0.0).is_empty());
    }

    #[test]
    fn test_sliding_dots() {
        let dots = IndicatorState::new(Some(10), 20).dots(0.0);
        let pages: Vec<usize> = dots.iter().map(|dot| dot.page).collect();

        // Six below would sit past the strip edge
        assert_eq!(pages, (5..=15).collect::<Vec<_>>());

        let current = dots.iter().find(|dot| dot.current).unwrap();
        assert_eq!(current.page, 10);
        assert_eq!(current.y, 0.0);

        let near = dots.iter().find(|dot| dot.page == 11).unwrap();
        assert_eq!((near.radius, near.alpha), (6.0, 204));

        let mid = dots.iter().find(|dot| dot.page == 13).unwrap();
        assert_eq!(mid.alpha, 180);

        let far = dots.iter().find(|dot| dot.page == 14).unwrap();
        assert_eq!((far.radius, far.alpha), (3.0, 128));
    }

    #[test]
    fn test_sliding_dots_at_start() {
        let dots = IndicatorState::new(Some(0), 12).dots(0.5);

        assert_eq!(dots.first().map(|dot| dot.page), Some(0));
        assert_eq!(dots[0].y, -16.0);
    }

    #[test]
    fn test_strip_size() {
        assert_eq!(IndicatorState::new(Some(0), 20).strip_size(), (32.0, 312.0));
        assert_eq!(IndicatorState::new(None, 0).strip_size(), (32.0, 40.0));
    }
}
