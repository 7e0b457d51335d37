//! PageCellCache: bounded cache of materialized page views

use pagerstore::{Error, Result};

use crate::lru::LruCache;
use crate::stats::CacheStats;

/// Default number of materialized pages kept
pub const DEFAULT_CAPACITY: usize = 3;

/// Default protected radius around the current page
pub const DEFAULT_WINDOW: usize = 1;

/// Page index to materialized view, bounded by capacity
///
/// Entries within `window` pages of the current page are never evicted,
/// nor is the pinned page. When only protected entries remain the cache is allowed to sit above
/// capacity until the current page moves.
///
/// The cache never destroys a view. Every entry it lets go of is returned
/// to the caller, who hands it back to the host.
pub struct PageCellCache<V> {
    /// Materialized views keyed by page index
    entries: LruCache<usize, V>,

    /// Cache statistics
    stats: CacheStats,

    /// Target number of entries
    capacity: usize,

    /// Protected radius around the current page
    window: usize,

    /// Centre of the protected window
    current: Option<usize>,

    /// Extra page held outside the window, e.g. still on screen mid-scroll
    pinned: Option<usize>,
}

impl<V> PageCellCache<V> {
    /// Create a cache with the default protected window
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_window(capacity, DEFAULT_WINDOW)
    }

    /// Create a cache with an explicit protected radius
    ///
    /// # Arguments
    /// * `capacity` - Target number of materialized pages, at least 1
    /// * `window` - Pages on each side of the current page exempt from eviction
    pub fn with_window(capacity: usize, window: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument(
                "cache capacity must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            entries: LruCache::with_capacity(capacity + 2 * window),
            stats: CacheStats::new(),
            capacity,
            window,
            current: None,
            pinned: None,
        })
    }

    /// Look up the view for a page and mark it most recently used
    ///
    /// A miss is the caller's cue to materialize the page and `put` it.
    pub fn get(&mut self, index: usize) -> Option<&V> {
        match self.entries.get(&index) {
            Some(view) => {
                self.stats.record_hit();
                Some(view)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Look up a view without touching recency or statistics
    pub fn peek(&self, index: usize) -> Option<&V> {
        self.entries.peek(&index)
    }

    /// Check whether a page is cached
    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains(&index)
    }

    /// Insert or refresh the view for a page
    ///
    /// # Returns
    /// * `Vec<(usize, V)>` - Views dropped by this call: the one previously
    ///   stored under `index`, then any evicted entries
    pub fn put(&mut self, index: usize, view: V) -> Vec<(usize, V)> {
        let mut dropped = Vec::new();
        if let Some(old) = self.entries.put(index, view) {
            dropped.push((index, old));
        }
        self.stats.record_insert();

        dropped.extend(self.shrink());
        dropped
    }

    /// Drop the entry for one page
    pub fn invalidate(&mut self, index: usize) -> Option<V> {
        let view = self.entries.remove(&index)?;
        self.stats.record_invalidations(1);
        Some(view)
    }

    /// Drop every entry at or after `start`
    ///
    /// Used when an insertion or removal shifts the pages behind it.
    pub fn invalidate_from(&mut self, start: usize) -> Vec<(usize, V)> {
        let dropped = self.entries.drain_where(|&index| index >= start);
        self.stats.record_invalidations(dropped.len());
        dropped
    }

    /// Drop every entry
    pub fn invalidate_all(&mut self) -> Vec<(usize, V)> {
        let dropped = self.entries.drain();
        self.stats.record_invalidations(dropped.len());
        dropped
    }

    /// Move the protected window and trim back to capacity
    pub fn focus(&mut self, current: Option<usize>) -> Vec<(usize, V)> {
        self.current = current;
        self.shrink()
    }

    /// Protect one page regardless of the window, or clear with `None`
    ///
    /// Clearing trims back to capacity.
    pub fn pin(&mut self, index: Option<usize>) -> Vec<(usize, V)> {
        self.pinned = index;
        self.shrink()
    }

    /// Drop every entry outside the protected window
    pub fn trim_to_window(&mut self) -> Vec<(usize, V)> {
        let (current, window, pinned) = (self.current, self.window, self.pinned);
        let evicted = self
            .entries
            .drain_where(|&index| !is_protected(current, window, pinned, index));
        self.stats.record_evictions(evicted.len());
        evicted
    }

    /// Change the capacity, trimming if it shrank
    pub fn set_capacity(&mut self, capacity: usize) -> Result<Vec<(usize, V)>> {
        if capacity == 0 {
            return Err(Error::InvalidArgument(
                "cache capacity must be at least 1".to_string(),
            ));
        }

        self.capacity = capacity;
        Ok(self.shrink())
    }

    /// Check whether a page is exempt from eviction
    pub fn is_protected(&self, index: usize) -> bool {
        is_protected(self.current, self.window, self.pinned, index)
    }

    /// Cached page indices, most recently used first
    pub fn indices(&self) -> Vec<usize> {
        self.entries.keys().copied().collect()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get the number of cached pages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the target capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the protected radius
    pub fn window(&self) -> usize {
        self.window
    }

    /// Centre of the protected window
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Page protected outside the window
    pub fn pinned(&self) -> Option<usize> {
        self.pinned
    }

    /// Zero the statistics
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    fn shrink(&mut self) -> Vec<(usize, V)> {
        let (current, window, pinned) = (self.current, self.window, self.pinned);
        let mut evicted = Vec::new();

        while self.entries.len() > self.capacity {
            match self
                .entries
                .pop_lru_where(|&index| !is_protected(current, window, pinned, index))
            {
                Some(entry) => evicted.push(entry),
                None => {
                    // Only visible or adjacent pages left
                    self.stats.record_overflow();
                    break;
                }
            }
        }

        self.stats.record_evictions(evicted.len());
        evicted
    }
}

fn is_protected(
    current: Option<usize>,
    window: usize,
    pinned: Option<usize>,
    index: usize,
) -> bool {
    pinned == Some(index) || current.map_or(false, |current| index.abs_diff(current) <= window)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(dropped: &[(usize, &'static str)]) -> Vec<usize> {
        dropped.iter().map(|(index, _)| *index).collect()
    }

    #[test]
    fn test_cache_basic() {
        let mut cache = PageCellCache::new(3).unwrap();

        assert!(cache.put(0, "a").is_empty());
        assert_eq!(cache.get(0), Some(&"a"));
        assert_eq!(cache.get(1), None);

        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.stats().inserts(), 1);
    }

    #[test]
    fn test_cache_zero_capacity() {
        assert!(matches!(
            PageCellCache::<&str>::new(0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_cache_evicts_lru_outside_window() {
        let mut cache = PageCellCache::new(3).unwrap();
        cache.focus(Some(5));

        cache.put(0, "a");
        cache.put(5, "f");
        cache.put(4, "e");
        let dropped = cache.put(6, "g");

        // 0 is least recent and unprotected
        assert_eq!(indices(&dropped), vec![0]);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions(), 1);
    }

    #[test]
    fn test_cache_protected_window_skips_lru() {
        let mut cache = PageCellCache::new(2).unwrap();
        cache.focus(Some(1));

        cache.put(1, "b");
        cache.put(7, "h");
        let dropped = cache.put(2, "c");

        // 1 is the least recent entry but is the current page
        assert_eq!(indices(&dropped), vec![7]);
        assert_eq!(cache.indices(), vec![2, 1]);
    }

    #[test]
    fn test_cache_overflows_rather_than_evict_visible() {
        let mut cache = PageCellCache::new(1).unwrap();
        cache.focus(Some(1));

        cache.put(1, "b");
        let dropped = cache.put(2, "c");

        assert!(dropped.is_empty());
        assert_eq!(cache.len(), 2);
        assert!(cache.indices().iter().all(|&index| cache.is_protected(index)));
        assert_eq!(cache.stats().overflows(), 1);

        // Moving away lets the cache shrink again
        let evicted = cache.focus(Some(4));
        assert_eq!(evicted.len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_pinned_survives_focus_move() {
        let mut cache = PageCellCache::new(3).unwrap();
        cache.focus(Some(0));
        cache.put(0, "a");
        cache.put(1, "b");

        cache.pin(Some(0));
        cache.focus(Some(5));
        let dropped: Vec<usize> = [4, 6, 5]
            .into_iter()
            .flat_map(|index| indices(&cache.put(index, "v")))
            .collect();

        assert_eq!(dropped, vec![1]);
        assert!(cache.contains(0));
        assert!(cache.is_protected(0));
        assert_eq!(cache.trim_to_window(), Vec::new());

        // Unpinning trims the old page away
        assert_eq!(indices(&cache.pin(None)), vec![0]);
        assert_eq!(cache.pinned(), None);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_cache_reset_stats() {
        let mut cache = PageCellCache::new(2).unwrap();
        cache.put(0, "a");
        cache.get(0);

        cache.reset_stats();

        assert_eq!(cache.stats(), &CacheStats::new());
    }

    #[test]
    fn test_cache_capacity_one_boundary() {
        let mut cache = PageCellCache::new(1).unwrap();
        cache.focus(Some(0));
        cache.put(0, "a");

        cache.focus(Some(2));
        let dropped = cache.put(2, "c");

        assert_eq!(indices(&dropped), vec![0]);
        assert_eq!(cache.indices(), vec![2]);
    }

    #[test]
    fn test_cache_put_replaces() {
        let mut cache = PageCellCache::new(2).unwrap();

        cache.put(0, "a");
        let dropped = cache.put(0, "b");

        assert_eq!(dropped, vec![(0, "a")]);
        assert_eq!(cache.peek(0), Some(&"b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_invalidate() {
        let mut cache = PageCellCache::new(4).unwrap();
        for (index, view) in ["a", "b", "c", "d"].into_iter().enumerate() {
            cache.put(index, view);
        }

        assert_eq!(cache.invalidate(1), Some("b"));
        assert_eq!(cache.invalidate(1), None);

        let mut dropped = indices(&cache.invalidate_from(2));
        dropped.sort_unstable();
        assert_eq!(dropped, vec![2, 3]);
        assert_eq!(cache.indices(), vec![0]);

        assert_eq!(cache.invalidate_all(), vec![(0, "a")]);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations(), 4);
    }

    #[test]
    fn test_cache_trim_to_window() {
        let mut cache = PageCellCache::new(5).unwrap();
        for index in 0..5 {
            cache.put(index, "v");
        }
        cache.focus(Some(2));

        let mut evicted = indices(&cache.trim_to_window());
        evicted.sort_unstable();

        assert_eq!(evicted, vec![0, 4]);
        let mut left = cache.indices();
        left.sort_unstable();
        assert_eq!(left, vec![1, 2, 3]);
    }

    #[test]
    fn test_cache_set_capacity() {
        let mut cache = PageCellCache::new(3).unwrap();
        cache.focus(Some(0));
        cache.put(2, "c");
        cache.put(1, "b");
        cache.put(0, "a");

        let evicted = cache.set_capacity(2).unwrap();

        assert_eq!(indices(&evicted), vec![2]);
        assert_eq!(cache.capacity(), 2);
        assert!(cache.set_capacity(0).is_err());
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn test_cache_no_focus_protects_nothing() {
        let mut cache = PageCellCache::with_window(1, 2).unwrap();

        cache.put(0, "a");
        let dropped = cache.put(1, "b");

        assert_eq!(indices(&dropped), vec![0]);
        assert!(!cache.is_protected(1));
        assert_eq!(cache.window(), 2);
    }
}
