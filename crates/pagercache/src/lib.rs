//! # pagercache
//!
//! Bounded cache of materialized page views for the vertical pager.
//!
//! ## Architecture
//! - **HashMap**: AHash index from page number to arena slot (O(1))
//! - **Recency list**: arena-backed doubly-linked list (O(1) touch)
//! - **Protected window**: current page ± `window` is never evicted
//!
//! Evicted and invalidated views are returned to the caller so the host can
//! release them.

#![warn(missing_docs)]

mod cache;
mod lru;
mod stats;

pub use cache::{PageCellCache, DEFAULT_CAPACITY, DEFAULT_WINDOW};
pub use stats::CacheStats;
