//! Ordered page-proxy store
//!
//! Holds the page proxies in page order together with the current page.
//! A proxy's page index is its position in the list; nothing caches it.

use std::collections::HashSet;
use std::fmt;
use ahash::RandomState;

use crate::error::{Error, Result};

/// Stable identity of a host view proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyId(pub u64);

impl fmt::Display for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A host view proxy that can be placed on a page
pub trait PageProxy {
    /// Identity used for duplicate detection and removal by reference
    fn id(&self) -> ProxyId;
}

/// Reference to a page for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRef {
    /// Page at a position
    Index(usize),
    /// Page holding the proxy with this identity
    Id(ProxyId),
}

/// A page taken out of the store
#[derive(Debug, Clone, PartialEq)]
pub struct Removed<P> {
    /// Position the page occupied before removal
    pub index: usize,
    /// The removed proxy
    pub proxy: P,
}

/// Ordered page proxies and the current page
#[derive(Debug, Clone)]
pub struct PageProxyStore<P> {
    /// Pages in display order
    pages: Vec<P>,

    /// Current page, `None` only while `pages` is empty
    current: Option<usize>,
}

impl<P> Default for PageProxyStore<P> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            current: None,
        }
    }
}

impl<P: PageProxy> PageProxyStore<P> {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every page
    ///
    /// # Arguments
    /// * `pages` - New pages in display order
    /// * `target` - Page to make current, defaults to the first page
    ///
    /// # Returns
    /// * `Result<Vec<P>>` - The pages that were replaced
    pub fn set_pages(&mut self, pages: Vec<P>, target: Option<usize>) -> Result<Vec<P>> {
        let mut seen = HashSet::with_capacity_and_hasher(pages.len(), RandomState::new());
        for proxy in &pages {
            if !seen.insert(proxy.id()) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate page proxy {}",
                    proxy.id()
                )));
            }
        }

        let current = match target {
            Some(index) if index < pages.len() => Some(index),
            Some(index) => return Err(Error::out_of_range(index, pages.len())),
            None if pages.is_empty() => None,
            None => Some(0),
        };

        self.current = current;
        Ok(std::mem::replace(&mut self.pages, pages))
    }

    /// Insert a page
    ///
    /// # Arguments
    /// * `proxy` - Page proxy to insert
    /// * `at` - Insertion position, defaults to appending
    ///
    /// # Returns
    /// * `Result<usize>` - Position the page was inserted at
    pub fn add_page(&mut self, proxy: P, at: Option<usize>) -> Result<usize> {
        let len = self.pages.len();
        let index = at.unwrap_or(len);
        if index > len {
            return Err(Error::out_of_range(index, len));
        }
        if self.position(proxy.id()).is_some() {
            return Err(Error::InvalidArgument(format!(
                "page proxy {} is already in the pager",
                proxy.id()
            )));
        }

        self.pages.insert(index, proxy);

        // Keep the same logical page current
        self.current = match self.current {
            None => Some(0),
            Some(current) if index <= current => Some(current + 1),
            other => other,
        };

        Ok(index)
    }

    /// Remove a page by position or identity
    pub fn remove_page(&mut self, target: PageRef) -> Result<Removed<P>> {
        let index = match target {
            PageRef::Index(index) if index < self.pages.len() => index,
            PageRef::Index(index) => {
                return Err(Error::NotFound(format!("no page at index {}", index)))
            }
            PageRef::Id(id) => self
                .position(id)
                .ok_or_else(|| Error::NotFound(format!("no page holds proxy {}", id)))?,
        };

        let proxy = self.pages.remove(index);
        let len = self.pages.len();

        self.current = match self.current {
            _ if len == 0 => None,
            Some(current) if index < current => Some(current - 1),
            Some(current) if current >= len => Some(len - 1),
            other => other,
        };

        Ok(Removed { index, proxy })
    }

    /// Make `index` the current page
    ///
    /// # Returns
    /// * `Result<usize>` - The previous current page
    pub fn set_current_page(&mut self, index: usize) -> Result<usize> {
        if index >= self.pages.len() {
            return Err(Error::out_of_range(index, self.pages.len()));
        }

        let previous = self.current.replace(index);
        Ok(previous.unwrap_or(0))
    }

    /// Current page, `None` when there are no pages
    pub fn current_page(&self) -> Option<usize> {
        self.current
    }

    /// Proxy on the current page
    pub fn current_proxy(&self) -> Option<&P> {
        self.current.and_then(|index| self.pages.get(index))
    }

    /// Proxy at a position
    pub fn get(&self, index: usize) -> Option<&P> {
        self.pages.get(index)
    }

    /// Position of the proxy with this identity
    pub fn position(&self, id: ProxyId) -> Option<usize> {
        self.pages.iter().position(|proxy| proxy.id() == id)
    }

    /// All pages in display order
    pub fn pages(&self) -> &[P] {
        &self.pages
    }

    /// Number of pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if there are no pages
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Convert a signed host index into a page position below `len`
pub fn checked_index(raw: i64, len: usize) -> Result<usize> {
    usize::try_from(raw)
        .ok()
        .filter(|&index| index < len)
        .ok_or(Error::IndexOutOfRange { index: raw, len })
}

/// Convert a signed host index into an insertion position, `len` included
pub fn checked_insert_index(raw: i64, len: usize) -> Result<usize> {
    usize::try_from(raw)
        .ok()
        .filter(|&index| index <= len)
        .ok_or(Error::IndexOutOfRange { index: raw, len })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Page(u64);

    impl PageProxy for Page {
        fn id(&self) -> ProxyId {
            ProxyId(self.0)
        }
    }

    fn store_of(ids: &[u64]) -> PageProxyStore<Page> {
        let mut store = PageProxyStore::new();
        store
            .set_pages(ids.iter().copied().map(Page).collect(), None)
            .unwrap();
        store
    }

    fn ids(store: &PageProxyStore<Page>) -> Vec<u64> {
        store.pages().iter().map(|page| page.0).collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store: PageProxyStore<Page> = PageProxyStore::new();

        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.current_page(), None);
        assert!(store.current_proxy().is_none());
    }

    #[test]
    fn test_set_pages_resets_current() {
        let mut store = store_of(&[1, 2, 3]);
        store.set_current_page(2).unwrap();

        let old = store.set_pages(vec![Page(7), Page(8)], None).unwrap();

        assert_eq!(old, vec![Page(1), Page(2), Page(3)]);
        assert_eq!(ids(&store), vec![7, 8]);
        assert_eq!(store.current_page(), Some(0));
    }

    #[test]
    fn test_set_pages_with_target() {
        let mut store = PageProxyStore::new();
        store.set_pages(vec![Page(1), Page(2), Page(3)], Some(2)).unwrap();

        assert_eq!(store.current_page(), Some(2));
        assert_eq!(store.current_proxy(), Some(&Page(3)));
    }

    #[test]
    fn test_set_pages_target_out_of_range() {
        let mut store = store_of(&[1, 2]);

        let result = store.set_pages(vec![Page(5)], Some(1));

        assert_eq!(result, Err(Error::IndexOutOfRange { index: 1, len: 1 }));
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_set_pages_rejects_duplicates() {
        let mut store = store_of(&[1, 2]);
        store.set_current_page(1).unwrap();

        let result = store.set_pages(vec![Page(3), Page(4), Page(3)], None);

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.current_page(), Some(1));
    }

    #[test]
    fn test_set_pages_empty() {
        let mut store = store_of(&[1, 2]);

        store.set_pages(Vec::new(), None).unwrap();

        assert!(store.is_empty());
        assert_eq!(store.current_page(), None);
    }

    #[test]
    fn test_add_page_append() {
        let mut store = store_of(&[1]);

        let index = store.add_page(Page(2), None).unwrap();

        assert_eq!(index, 1);
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.current_page(), Some(0));
    }

    #[test]
    fn test_add_page_before_current_shifts() {
        let mut store = store_of(&[1, 2, 3]);
        store.set_current_page(1).unwrap();

        store.add_page(Page(9), Some(1)).unwrap();

        assert_eq!(ids(&store), vec![1, 9, 2, 3]);
        assert_eq!(store.current_page(), Some(2));
        assert_eq!(store.current_proxy(), Some(&Page(2)));
    }

    #[test]
    fn test_add_page_after_current_keeps() {
        let mut store = store_of(&[1, 2, 3]);
        store.set_current_page(1).unwrap();

        store.add_page(Page(9), Some(2)).unwrap();

        assert_eq!(store.current_page(), Some(1));
    }

    #[test]
    fn test_add_page_into_empty() {
        let mut store = PageProxyStore::new();

        store.add_page(Page(4), Some(0)).unwrap();

        assert_eq!(store.current_page(), Some(0));
    }

    #[test]
    fn test_add_page_out_of_range() {
        let mut store = store_of(&[1, 2]);

        let result = store.add_page(Page(3), Some(3));

        assert_eq!(result, Err(Error::IndexOutOfRange { index: 3, len: 2 }));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_page_duplicate() {
        let mut store = store_of(&[1, 2]);

        let result = store.add_page(Page(2), None);

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_remove_before_current_shifts() {
        let mut store = store_of(&[1, 2, 3]);
        store.set_current_page(2).unwrap();

        let removed = store.remove_page(PageRef::Index(0)).unwrap();

        assert_eq!(removed, Removed { index: 0, proxy: Page(1) });
        assert_eq!(store.current_page(), Some(1));
        assert_eq!(store.current_proxy(), Some(&Page(3)));
    }

    #[test]
    fn test_remove_current_last_clamps() {
        let mut store = store_of(&[1, 2, 3]);
        store.set_current_page(2).unwrap();

        store.remove_page(PageRef::Id(ProxyId(3))).unwrap();

        assert_eq!(store.current_page(), Some(1));
    }

    #[test]
    fn test_remove_current_middle_keeps_index() {
        let mut store = store_of(&[1, 2, 3]);
        store.set_current_page(1).unwrap();

        store.remove_page(PageRef::Index(1)).unwrap();

        assert_eq!(store.current_page(), Some(1));
        assert_eq!(store.current_proxy(), Some(&Page(3)));
    }

    #[test]
    fn test_remove_last_page_empties() {
        let mut store = store_of(&[1]);

        store.remove_page(PageRef::Id(ProxyId(1))).unwrap();

        assert!(store.is_empty());
        assert_eq!(store.current_page(), None);
    }

    #[test]
    fn test_remove_not_found() {
        let mut store = store_of(&[1, 2]);

        assert!(matches!(
            store.remove_page(PageRef::Id(ProxyId(5))),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            store.remove_page(PageRef::Index(2)),
            Err(Error::NotFound(_))
        ));
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_set_current_page_returns_previous() {
        let mut store = store_of(&[1, 2, 3]);

        assert_eq!(store.set_current_page(2).unwrap(), 0);
        assert_eq!(store.set_current_page(1).unwrap(), 2);
        assert_eq!(store.current_page(), Some(1));
    }

    #[test]
    fn test_set_current_page_out_of_range() {
        let mut store = store_of(&[1, 2]);

        let result = store.set_current_page(2);

        assert_eq!(result, Err(Error::IndexOutOfRange { index: 2, len: 2 }));
        assert_eq!(store.current_page(), Some(0));
    }

    #[test]
    fn test_checked_index() {
        assert_eq!(checked_index(1, 3), Ok(1));
        assert_eq!(
            checked_index(-1, 3),
            Err(Error::IndexOutOfRange { index: -1, len: 3 })
        );
        assert!(checked_index(3, 3).is_err());

        assert_eq!(checked_insert_index(3, 3), Ok(3));
        assert!(checked_insert_index(4, 3).is_err());
        assert!(checked_insert_index(-2, 3).is_err());
    }
}
