//! # verticalpager
//!
//! Vertically paging container widget: one full-height page at a time,
//! swiped or scrolled programmatically, with a bounded cache of rendered
//! pages and an optional page indicator.
//!
//! ## Architecture
//! - **PagerController**: owns the page store and cell cache, drives the
//!   render surface and indicator, fires events
//! - **Host capabilities**: [`ViewHost`], [`RenderSurface`] and
//!   [`PageIndicator`] are supplied by the embedding framework
//! - **In-memory bindings**: [`memory`] implements them headlessly
//!
//! ## Example
//! ```
//! use verticalpager::memory::{MemoryHost, MemoryProxy, MemorySurface};
//! use verticalpager::{PagerConfig, PagerController};
//!
//! let config = PagerConfig::default();
//! let mut pager = PagerController::new(MemoryHost::new(), MemorySurface::new(), &config)?;
//! pager.set_views(vec![MemoryProxy::new(1, "a"), MemoryProxy::new(2, "b")])?;
//! pager.scroll_to_page(1, false)?;
//!
//! assert_eq!(pager.indicator_state().label(), "2 of 2");
//! # Ok::<(), verticalpager::Error>(())
//! ```

#![warn(missing_docs)]

pub mod color;
pub mod config;
pub mod controller;
pub mod events;
pub mod host;
pub mod indicator;
pub mod memory;

pub use color::{parse_color, Color};
pub use config::{IndicatorConfig, PagerConfig};
pub use controller::{PagerController, PagerState, ScrollOutcome, TransitionId};
pub use events::{PagerEvent, ScrollDirection};
pub use host::{PageIndicator, RenderSurface, ViewHost};
pub use indicator::{IndicatorOrientation, IndicatorState, IndicatorStyle};
pub use pagercache::CacheStats;
pub use pagerstore::{
    checked_index, checked_insert_index, Error, PageProxy, PageRef, ProxyId, Result,
};
