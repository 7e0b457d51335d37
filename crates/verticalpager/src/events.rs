//! Events fired by the pager

use std::fmt;

use pagerstore::ProxyId;

/// Direction of the last observed scroll movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    /// Towards earlier pages
    Up,
    /// Towards later pages
    Down,
    /// No movement observed yet
    #[default]
    None,
}

impl ScrollDirection {
    /// Name used in event payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
            ScrollDirection::None => "none",
        }
    }
}

/// Notifications delivered to pager listeners
#[derive(Debug, Clone, PartialEq)]
pub enum PagerEvent {
    /// The current page moved
    Change {
        /// New current page
        current_page: usize,
        /// Page that was current before
        previous_page: usize,
        /// Proxy on the new current page
        current_view: ProxyId,
        /// Proxy on the previous page
        previous_view: Option<ProxyId>,
    },

    /// A drag gesture started
    ScrollStart {
        /// Current page when the drag began
        current_page: Option<usize>,
        /// Last known direction
        direction: ScrollDirection,
    },

    /// Content moved during a drag
    Scroll {
        /// Page the surface is positioned on
        current_page: usize,
        /// Fraction of a page scrolled past `current_page`
        offset: f32,
        /// Direction of this movement
        direction: ScrollDirection,
    },

    /// A drag gesture settled
    ScrollEnd {
        /// Page the surface settled on
        current_page: Option<usize>,
    },
}

impl PagerEvent {
    /// Event name as registered by host listeners
    pub fn name(&self) -> &'static str {
        match self {
            PagerEvent::Change { .. } => "change",
            PagerEvent::ScrollStart { .. } => "scrollstart",
            PagerEvent::Scroll { .. } => "scroll",
            PagerEvent::ScrollEnd { .. } => "scrollend",
        }
    }
}

impl fmt::Display for PagerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagerEvent::Change {
                current_page,
                previous_page,
                current_view,
                ..
            } => write!(
                f,
                "change {} -> {} ({})",
                previous_page, current_page, current_view
            ),
            PagerEvent::ScrollStart {
                current_page,
                direction,
            } => write!(
                f,
                "scrollstart at {} ({})",
                page_or_dash(*current_page),
                direction.as_str()
            ),
            PagerEvent::Scroll {
                current_page,
                offset,
                direction,
            } => write!(
                f,
                "scroll {}+{:.2} ({})",
                current_page,
                offset,
                direction.as_str()
            ),
            PagerEvent::ScrollEnd { current_page } => {
                write!(f, "scrollend at {}", page_or_dash(*current_page))
            }
        }
    }
}

fn page_or_dash(page: Option<usize>) -> String {
    page.map_or_else(|| "-".to_string(), |page| page.to_string())
}
