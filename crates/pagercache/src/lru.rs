//! Recency-ordered map backed by an arena linked list
//!
//! Nodes live in a `Vec` and link to each other by slot index; freed slots
//! are recycled through a free list. The list never evicts on its own: the
//! owner decides which entry to drop through `pop_lru_where`.

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

/// Node in the recency list
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Map ordered from most to least recently used
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty list with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
        }
    }

    /// Get a value and mark it most recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Get a value without touching its recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    /// Check whether a key is present
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or refresh an entry as most recently used
    ///
    /// Returns the value previously stored under `key`.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.map.get(&key) {
            let old = self.nodes[idx]
                .as_mut()
                .map(|node| std::mem::replace(&mut node.value, value));
            self.move_to_front(idx);
            return old;
        }

        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            key: key.clone(),
            value,
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }

        self.map.insert(key, idx);
        None
    }

    /// Remove a key
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.take_node(idx).map(|(_, value)| value)
    }

    /// Remove the least recently used entry whose key passes `evictable`
    pub fn pop_lru_where<F>(&mut self, mut evictable: F) -> Option<(K, V)>
    where
        F: FnMut(&K) -> bool,
    {
        let mut cursor = self.tail;
        while let Some(idx) = cursor {
            let node = self.nodes[idx].as_ref()?;
            if evictable(&node.key) {
                self.map.remove(&node.key);
                return self.take_node(idx);
            }
            cursor = node.prev;
        }
        None
    }

    /// Remove every entry whose key matches `pred`, least recent first
    pub fn drain_where<F>(&mut self, mut pred: F) -> Vec<(K, V)>
    where
        F: FnMut(&K) -> bool,
    {
        let mut drained = Vec::new();
        while let Some(entry) = self.pop_lru_where(&mut pred) {
            drained.push(entry);
        }
        drained
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }

    /// Get the current size
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Remove every entry, least recent first
    pub fn drain(&mut self) -> Vec<(K, V)> {
        let drained = self.drain_where(|_| true);
        self.nodes.clear();
        self.free_list.clear();
        drained
    }

    fn take_node(&mut self, idx: usize) -> Option<(K, V)> {
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free_list.push(idx);
        Some((node.key, node.value))
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.nodes[idx] {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }
}

/// Iterator over keys, most recent first
pub struct Keys<'a, K, V> {
    nodes: &'a [Option<Node<K, V>>],
    cursor: Option<usize>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.cursor?)?.as_ref()?;
        self.cursor = node.next;
        Some(&node.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(cache: &LruCache<u32, &'static str>) -> Vec<u32> {
        cache.keys().copied().collect()
    }

    #[test]
    fn test_lru_basic() {
        let mut cache = LruCache::with_capacity(2);

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.get(&2), Some(&"b"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_order() {
        let mut cache = LruCache::with_capacity(3);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");
        assert_eq!(keys(&cache), vec![3, 2, 1]);

        cache.get(&1);
        assert_eq!(keys(&cache), vec![1, 3, 2]);

        // peek leaves the order alone
        cache.peek(&2);
        assert_eq!(keys(&cache), vec![1, 3, 2]);
    }

    #[test]
    fn test_lru_pop_where_skips_pinned() {
        let mut cache = LruCache::with_capacity(3);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        assert_eq!(cache.pop_lru_where(|k| *k != 1), Some((2, "b")));
        assert_eq!(keys(&cache), vec![3, 1]);
        assert_eq!(cache.pop_lru_where(|_| false), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_update() {
        let mut cache = LruCache::with_capacity(2);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.get(&1);

        assert_eq!(cache.pop_lru_where(|_| true), Some((2, "b")));
        assert_eq!(cache.get(&1), Some(&"a"));
    }

    #[test]
    fn test_lru_remove() {
        let mut cache = LruCache::with_capacity(3);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.put(3, "c");

        assert_eq!(cache.remove(&2), Some("b"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&2), None);
        assert_eq!(keys(&cache), vec![3, 1]);
    }

    #[test]
    fn test_lru_slot_reuse() {
        let mut cache = LruCache::with_capacity(2);

        cache.put(1, "a");
        cache.put(2, "b");
        cache.remove(&1);
        cache.put(3, "c");

        assert_eq!(keys(&cache), vec![3, 2]);
        assert_eq!(cache.nodes.len(), 2);
    }

    #[test]
    fn test_lru_drain_where() {
        let mut cache = LruCache::with_capacity(4);

        for key in 0..4 {
            cache.put(key, "v");
        }

        let mut drained: Vec<u32> = cache.drain_where(|k| *k >= 2).into_iter().map(|(k, _)| k).collect();
        drained.sort_unstable();

        assert_eq!(drained, vec![2, 3]);
        assert_eq!(keys(&cache), vec![1, 0]);
    }

    #[test]
    fn test_lru_drain() {
        let mut cache = LruCache::with_capacity(3);

        cache.put(1, "a");
        cache.put(2, "b");

        assert_eq!(cache.drain(), vec![(1, "a"), (2, "b")]);
        assert!(cache.is_empty());
        assert_eq!(keys(&cache), Vec::<u32>::new());
    }

    #[test]
    fn test_lru_overwrite() {
        let mut cache = LruCache::with_capacity(2);

        cache.put(1, "a");
        assert_eq!(cache.put(1, "b"), Some("a"));

        assert_eq!(cache.get(&1), Some(&"b"));
        assert_eq!(cache.len(), 1);
    }
}
