//! # pagerstore
//!
//! Page model for the vertical pager widget.
//!
//! ## Contents
//! - **PageProxyStore**: ordered page proxies plus the current page
//! - **ProxyId / PageProxy**: identity reported by host view proxies
//! - **Error / Result**: error kinds shared by every pager crate
//!
//! The store has no rendering dependency. Indices are positions in the
//! ordered list and are recomputed on every query.

#![warn(missing_docs)]

mod error;
mod store;

pub use error::{Error, Result};
pub use store::{
    checked_index, checked_insert_index, PageProxy, PageProxyStore, PageRef, ProxyId, Removed,
};
