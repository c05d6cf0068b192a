use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use hashbrown::HashTable;

use crate::hash::FixedHashState;

// -----------------------------------------------------------------------------
// OrderedMap

/// A hash map that iterates in insertion order.
///
/// Entries live in a `Vec`; a [`HashTable`] of indices provides the lookup.
/// Replacing the value of an existing key keeps its position.
///
/// # Examples
///
/// ```
/// use dx_utils::collections::OrderedMap;
///
/// let mut map = OrderedMap::new();
/// map.insert("b", 2);
/// map.insert("a", 1);
/// map.insert("b", 3);
///
/// let pairs: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
/// assert_eq!(pairs, [("b", 3), ("a", 1)]);
/// ```
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    indices: HashTable<usize>,
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            indices: HashTable::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            indices: HashTable::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry, keeping the allocations.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.indices.clear();
    }

    /// Returns the entry at insertion position `index`.
    #[inline]
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> + DoubleEndedIterator {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates over the entries in insertion order, values mutable.
    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = (&K, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: Hash + Eq, V> OrderedMap<K, V> {
    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = FixedHashState.hash_one(key);
        let entries = &self.entries;
        self.indices
            .find(hash, |&i| entries[i].0.borrow() == key)
            .copied()
    }

    /// Returns the position of `key` in insertion order.
    #[inline]
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|i| &mut self.entries[i].1)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Inserts a pair, returning the previous value of `key`.
    ///
    /// A new key is appended; an existing key keeps its position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(index) = self.find(&key) {
            return Some(core::mem::replace(&mut self.entries[index].1, value));
        }

        let hash = FixedHashState.hash_one(&key);
        let index = self.entries.len();
        self.entries.push((key, value));

        let entries = &self.entries;
        self.indices.insert_unique(hash, index, |&i| {
            FixedHashState.hash_one(&entries[i].0)
        });
        None
    }

    /// Removes `key`, shifting later entries one position down.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.find(key)?;
        let (_, value) = self.entries.remove(index);

        self.indices.clear();
        for (i, (k, _)) in self.entries.iter().enumerate() {
            let hash = FixedHashState.hash_one(k);
            let entries = &self.entries;
            self.indices
                .insert_unique(hash, i, |&j| FixedHashState.hash_one(&entries[j].0));
        }
        Some(value)
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for OrderedMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            indices: self.indices.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two maps are equal when they hold the same pairs in the same order.
impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::OrderedMap;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    #[test]
    fn insertion_order_survives_growth() {
        let mut map = OrderedMap::new();
        for i in (0..100).rev() {
            map.insert(i.to_string(), i);
        }

        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys[0], "99");
        assert_eq!(keys[99], "0");
        assert_eq!(map.get("42"), Some(&42));
        assert_eq!(map.index_of("42"), Some(57));
    }

    #[test]
    fn remove_reindexes() {
        let mut map: OrderedMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();

        assert_eq!(map.remove("a"), Some(1));
        assert_eq!(map.get("c"), Some(&3));
        assert_eq!(map.get_index(0), Some((&"b", &2)));
        assert_eq!(map.remove("a"), None);
        assert_eq!(map.len(), 2);
    }
}
