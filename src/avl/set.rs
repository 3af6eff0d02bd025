//! An ordered set over [`AvlTreeMap`].

use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;

use super::AvlTreeMap;
use super::iter::Keys;

/// An ordered set backed by an [`AvlTreeMap`] with unit values.
///
/// # Examples
///
/// ```rust
/// use avltree::AvlTreeSet;
///
/// let mut set = AvlTreeSet::new();
/// assert!(set.insert(3));
/// assert!(set.insert(1));
/// assert!(!set.insert(3));
///
/// let items: Vec<&i32> = set.iter().collect();
/// assert_eq!(items, vec![&1, &3]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AvlTreeSet<T> {
    map: AvlTreeMap<T, ()>,
}

impl<T> AvlTreeSet<T> {
    /// Creates an empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            map: AvlTreeMap::new(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the smallest element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(item, ())| item)
    }

    /// Returns the largest element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|(item, ())| item)
    }

    /// Returns an iterator over the elements in ascending order.
    #[must_use]
    pub fn iter(&self) -> Keys<'_, T, ()> {
        self.map.keys()
    }

    /// Number of levels in the underlying tree.
    #[must_use]
    pub fn height(&self) -> usize {
        self.map.height()
    }
}

impl<T: Ord> AvlTreeSet<T> {
    /// Adds `item`, returning `false` if it was already present.
    pub fn insert(&mut self, item: T) -> bool {
        self.map.insert(item, ()).is_none()
    }

    /// Removes `item`, returning `true` if it was present.
    pub fn remove<Q>(&mut self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.remove(item).is_some()
    }

    /// Returns `true` if the set holds `item`.
    #[must_use]
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(item)
    }

    /// Removes and returns the smallest element.
    pub fn pop_first(&mut self) -> Option<T> {
        self.map.pop_first().map(|(item, ())| item)
    }

    /// Removes and returns the largest element.
    pub fn pop_last(&mut self) -> Option<T> {
        self.map.pop_last().map(|(item, ())| item)
    }
}

impl<T> Default for AvlTreeSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for AvlTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for AvlTreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.map.extend(iter.into_iter().map(|item| (item, ())));
    }
}

impl<'a, T> IntoIterator for &'a AvlTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Keys<'a, T, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlTreeSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}
