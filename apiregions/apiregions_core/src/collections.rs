//! Frozen collections.
//!
//! Tables published by the configuration store are shared between the
//! store and every in-flight resolution. They are built once and never
//! changed afterwards: each collection here is a cheaply clonable, shared,
//! read-only view. Mutating methods exist so that callers get an explicit
//! [`Error::UnsupportedMutation`] instead of silently working on a copy.
//!
//! Iteration follows insertion order. Equality of maps and sets ignores
//! order; equality of lists does not.

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::{Error, Result};

fn unsupported<T>(what: &str) -> Result<T> {
    Err(Error::UnsupportedMutation(format!(
        "{} on a published read-only collection",
        what
    )))
}

/// A read-only, insertion-ordered map.
pub struct FrozenMap<K, V> {
    inner: Arc<IndexMap<K, V>>,
}

impl<K, V> FrozenMap<K, V>
where
    K: Hash + Eq,
{
    /// Create an empty map.
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(IndexMap::new()),
        }
    }

    /// Get the value for a key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get(key)
    }

    /// Check if a key is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
        self.inner.iter()
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, K, V> {
        self.inner.keys()
    }

    /// Iterate over values in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, K, V> {
        self.inner.values()
    }

    /// Borrow the underlying map.
    pub fn as_index_map(&self) -> &IndexMap<K, V> {
        &self.inner
    }

    /// Always fails: published maps cannot gain keys.
    pub fn insert(&self, _key: K, _value: V) -> Result<Option<V>> {
        unsupported("insert")
    }

    /// Always fails: published maps cannot lose keys.
    pub fn remove<Q>(&self, _key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        unsupported("remove")
    }

    /// Always fails: published maps cannot be cleared.
    pub fn clear(&self) -> Result<()> {
        unsupported("clear")
    }
}

impl<K: Hash + Eq, V> From<IndexMap<K, V>> for FrozenMap<K, V> {
    fn from(map: IndexMap<K, V>) -> Self {
        Self {
            inner: Arc::new(map),
        }
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for FrozenMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<IndexMap<K, V>>())
    }
}

impl<K: Hash + Eq, V> Default for FrozenMap<K, V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, V> Clone for FrozenMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for FrozenMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K: Hash + Eq, V: Eq> Eq for FrozenMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for FrozenMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}

impl<K: Serialize, V: Serialize> Serialize for FrozenMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'a, K, V> IntoIterator for &'a FrozenMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = indexmap::map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// A read-only set that remembers first-insertion order.
pub struct FrozenSet<T> {
    inner: Arc<IndexSet<T>>,
}

impl<T: Hash + Eq> FrozenSet<T> {
    /// Create an empty set.
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(IndexSet::new()),
        }
    }

    /// Check if a value is a member.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains(value)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over members in first-insertion order.
    pub fn iter(&self) -> indexmap::set::Iter<'_, T> {
        self.inner.iter()
    }

    /// Borrow the underlying set.
    pub fn as_index_set(&self) -> &IndexSet<T> {
        &self.inner
    }

    /// Always fails: published sets cannot gain members.
    pub fn insert(&self, _value: T) -> Result<bool> {
        unsupported("insert")
    }

    /// Always fails: published sets cannot lose members.
    pub fn remove<Q>(&self, _value: &Q) -> Result<bool>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        unsupported("remove")
    }
}

impl<T: Hash + Eq> From<IndexSet<T>> for FrozenSet<T> {
    fn from(set: IndexSet<T>) -> Self {
        Self {
            inner: Arc::new(set),
        }
    }
}

impl<T: Hash + Eq> FromIterator<T> for FrozenSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<IndexSet<T>>())
    }
}

impl<T: Hash + Eq> Default for FrozenSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Clone for FrozenSet<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Hash + Eq> PartialEq for FrozenSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: Hash + Eq> Eq for FrozenSet<T> {}

impl<T: fmt::Debug> fmt::Debug for FrozenSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inner.iter()).finish()
    }
}

impl<T: Serialize> Serialize for FrozenSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'a, T> IntoIterator for &'a FrozenSet<T> {
    type Item = &'a T;
    type IntoIter = indexmap::set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// A read-only sequence.
pub struct FrozenList<T> {
    inner: Arc<Vec<T>>,
}

impl<T> FrozenList<T> {
    /// Create an empty list.
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(Vec::new()),
        }
    }

    /// Get the element at an index.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.inner.get(index)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.inner.iter()
    }

    /// Borrow the elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.inner
    }

    /// Always fails: published lists cannot grow.
    pub fn push(&self, _value: T) -> Result<()> {
        unsupported("push")
    }

    /// Always fails: published lists cannot shrink.
    pub fn remove(&self, _index: usize) -> Result<T> {
        unsupported("remove")
    }
}

impl<T> From<Vec<T>> for FrozenList<T> {
    fn from(values: Vec<T>) -> Self {
        Self {
            inner: Arc::new(values),
        }
    }
}

impl<T> FromIterator<T> for FrozenList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T> Default for FrozenList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Clone for FrozenList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: PartialEq> PartialEq for FrozenList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: Eq> Eq for FrozenList<T> {}

impl<T: fmt::Debug> fmt::Debug for FrozenList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.iter()).finish()
    }
}

impl<T: Serialize> Serialize for FrozenList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'a, T> IntoIterator for &'a FrozenList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
