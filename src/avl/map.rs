//! The [`AvlTreeMap`] collection and its ordered-map surface.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::Index;

use super::error::KeyNotFoundError;
use super::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use super::node::{Direction, Node, NodeId, extreme, step};

// =============================================================================
// AvlTreeMap Definition
// =============================================================================

/// An ordered map backed by an AVL tree.
///
/// Nodes are stored in a single `Vec` arena and linked by index, with a
/// parent back-link on every node. Each node records the height difference
/// of its two subtrees, and every insertion or removal restores
/// `|balance| <= 1` through rotations, so the tree height stays within
/// `1.44 * log2(n + 2)`.
///
/// # Time Complexity
///
/// | Operation                     | Complexity |
/// |-------------------------------|------------|
/// | `new`                         | O(1)       |
/// | `get` / `contains_key`        | O(log N)   |
/// | `insert`                      | O(log N)   |
/// | `remove`                      | O(log N)   |
/// | `first_key_value` / `last_key_value` | O(log N) |
/// | `predecessor` / `successor`   | O(log N)   |
/// | `height`                      | O(log N)   |
/// | `len` / `is_empty`            | O(1)       |
///
/// # Examples
///
/// ```rust
/// use avltree::AvlTreeMap;
///
/// let mut map = AvlTreeMap::new();
/// map.insert(3, "three");
/// map.insert(1, "one");
/// map.insert(2, "two");
///
/// let keys: Vec<&i32> = map.keys().collect();
/// assert_eq!(keys, vec![&1, &2, &3]);
///
/// map.remove(&2);
/// assert_eq!(map.get(&2), None);
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
    /// Dense node storage; the entry count is its length.
    pub(super) nodes: Vec<Node<K, V>>,
    pub(super) root: Option<NodeId>,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avltree::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, String> = AvlTreeMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Creates an empty map with room for `capacity` entries before the
    /// arena reallocates.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avltree::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<_, _> = [(1, "one"), (2, "two")].into_iter().collect();
    /// assert_eq!(map.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes every entry, releasing all nodes at once.
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Returns the number of levels in the tree, `0` when empty.
    ///
    /// Follows the taller child at every level as recorded by the balance
    /// factors, so this costs O(log N) rather than a full traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avltree::AvlTreeMap;
    ///
    /// // Ascending insertion would degrade a plain BST into a list.
    /// let map: AvlTreeMap<i32, ()> = (1..=7).map(|key| (key, ())).collect();
    /// assert_eq!(map.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        let mut levels = 0;
        let mut current = self.root;
        while let Some(id) = current {
            levels += 1;
            let node = self.node(id);
            current = if node.balance < 0 {
                node.left
            } else {
                node.right.or(node.left)
            };
        }
        levels
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root
            .map(|root| extreme(&self.nodes, root, Direction::Left))
            .map(|id| self.entry(id))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root
            .map(|root| extreme(&self.nodes, root, Direction::Right))
            .map(|id| self.entry(id))
    }

    /// Returns an iterator over the entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avltree::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<_, _> = [(2, 'b'), (1, 'a')].into_iter().collect();
    /// let entries: Vec<(&i32, &char)> = map.iter().collect();
    /// assert_eq!(entries, vec![(&1, &'a'), (&2, &'b')]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.root)
    }

    /// Returns an iterator over the entries in ascending key order with
    /// mutable access to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order = self.in_order();
        IterMut::new(&mut self.nodes, order)
    }

    /// Returns an iterator over the keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in ascending key order.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns a mutable iterator over the values in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avltree::AvlTreeMap;
    ///
    /// let mut map: AvlTreeMap<_, _> = [(1, 10), (2, 20)].into_iter().collect();
    /// for value in map.values_mut() {
    ///     *value += 1;
    /// }
    /// assert_eq!(map.get(&2), Some(&21));
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    // =========================================================================
    // Arena Access
    // =========================================================================

    #[inline]
    pub(super) fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(super) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub(super) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[inline]
    pub(super) fn child(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        self.node(id).child(direction)
    }

    #[inline]
    pub(super) fn balance(&self, id: NodeId) -> i8 {
        self.node(id).balance
    }

    #[inline]
    pub(super) fn set_balance(&mut self, id: NodeId, balance: i8) {
        self.node_mut(id).balance = balance;
    }

    /// Side on which `id` hangs below its parent, `None` for the root.
    #[inline]
    pub(super) fn side_in_parent(&self, id: NodeId) -> Option<Direction> {
        self.parent(id).map(|parent| self.node(parent).side_of(id))
    }

    /// Points whatever referenced `old` from above (a parent slot or the
    /// root) at `new` instead.
    pub(super) fn replace_in_parent(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        new: Option<NodeId>,
    ) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.node(parent).side_of(old);
                self.node_mut(parent).set_child(side, new);
            }
        }
    }

    /// Pushes a fresh node into the arena.
    pub(super) fn allocate(&mut self, key: K, value: V, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::leaf(key, value, parent));
        id
    }

    /// Drops an already unlinked node out of the arena.
    ///
    /// The last node of the arena is moved into the freed slot, so every
    /// link to it (its parent's child slot or `root`, and its children's
    /// parent links) is rewritten to the new index.
    pub(super) fn release(&mut self, id: NodeId) -> Node<K, V> {
        let last = NodeId::new(self.nodes.len() - 1);
        let released = self.nodes.swap_remove(id.index());
        if id != last {
            let moved = self.node(id);
            let (parent, left, right) = (moved.parent, moved.left, moved.right);
            self.replace_in_parent(parent, last, Some(id));
            for child in [left, right].into_iter().flatten() {
                self.node_mut(child).parent = Some(id);
            }
        }
        released
    }

    /// Node ids in ascending key order.
    pub(super) fn in_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.len());
        let mut current = self
            .root
            .map(|root| extreme(&self.nodes, root, Direction::Left));
        while let Some(id) = current {
            order.push(id);
            current = step(&self.nodes, id, Direction::Right);
        }
        order
    }

    #[inline]
    fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = self.node(id);
        (&node.key, &node.value)
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Locates the node holding `key` by descending from the root.
    pub(super) fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            current = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avltree::AvlTreeMap;
    ///
    /// let mut map = AvlTreeMap::new();
    /// map.insert("hello".to_string(), 42);
    ///
    /// // Borrowed lookup: &str for String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &self.node(id).value)
    }

    /// Returns the stored key and value for `key`.
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| self.entry(id))
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// Mutating a value never touches the tree structure.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|id| &mut self.node_mut(id).value)
    }

    /// Looks `key` up, reporting absence as an error.
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFoundError`] if no entry is stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avltree::{AvlTreeMap, KeyNotFoundError};
    ///
    /// let map: AvlTreeMap<_, _> = [(1, "one")].into_iter().collect();
    /// assert_eq!(map.try_get(&1), Ok(&"one"));
    /// assert_eq!(map.try_get(&2), Err(KeyNotFoundError));
    /// ```
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V, KeyNotFoundError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(KeyNotFoundError)
    }

    /// Returns `true` if the map holds an entry for `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns the entry with the greatest key strictly below `key`.
    ///
    /// `key` itself does not have to be present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avltree::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<_, _> = [(10, 'a'), (20, 'b'), (30, 'c')].into_iter().collect();
    /// assert_eq!(map.predecessor(&20), Some((&10, &'a')));
    /// assert_eq!(map.predecessor(&25), Some((&20, &'b')));
    /// assert_eq!(map.predecessor(&10), None);
    /// ```
    #[must_use]
    pub fn predecessor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour(key, Direction::Left)
    }

    /// Returns the entry with the smallest key strictly above `key`.
    ///
    /// `key` itself does not have to be present.
    #[must_use]
    pub fn successor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour(key, Direction::Right)
    }

    /// Closest entry on `direction`'s side of `key`, excluding `key` itself.
    fn neighbour<Q>(&self, key: &Q, direction: Direction) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut best = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            let ordering = node.key.borrow().cmp(key);
            let beyond = match direction {
                Direction::Left => ordering == Ordering::Less,
                Direction::Right => ordering == Ordering::Greater,
            };
            if beyond {
                best = Some(id);
                current = node.child(direction.opposite());
            } else {
                current = node.child(direction);
            }
        }
        best.map(|id| self.entry(id))
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for AvlTreeMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> IntoIterator for AvlTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let order = self.in_order();
        IntoIter::new(self.nodes, order)
    }
}

impl<'a, K, V> IntoIterator for &'a AvlTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut AvlTreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, Q, V> Index<&Q> for AvlTreeMap<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

/// Two maps are equal when they hold the same entries, regardless of the
/// shape their insertion histories produced.
impl<K: PartialEq, V: PartialEq> PartialEq for AvlTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for AvlTreeMap<K, V> {}

impl<K: Hash, V: Hash> Hash for AvlTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

static_assertions::assert_impl_all!(AvlTreeMap<i32, String>: Send, Sync, Clone, Default);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn letters() -> AvlTreeMap<i32, char> {
        [(4, 'd'), (2, 'b'), (6, 'f'), (1, 'a'), (3, 'c'), (5, 'e'), (7, 'g')]
            .into_iter()
            .collect()
    }

    #[rstest]
    fn test_new_is_empty() {
        let map: AvlTreeMap<i32, char> = AvlTreeMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.height(), 0);
        assert_eq!(map.first_key_value(), None);
    }

    #[rstest]
    fn test_get_and_contains(letters: AvlTreeMap<i32, char>) {
        assert_eq!(letters.get(&3), Some(&'c'));
        assert!(letters.contains_key(&7));
        assert!(!letters.contains_key(&8));
        assert_eq!(letters.get_key_value(&5), Some((&5, &'e')));
    }

    #[rstest]
    fn test_get_mut_leaves_shape_alone(mut letters: AvlTreeMap<i32, char>) {
        let before = letters.shape();
        *letters.get_mut(&2).unwrap() = 'B';
        assert_eq!(letters.get(&2), Some(&'B'));
        assert_eq!(letters.shape(), before);
    }

    #[rstest]
    fn test_first_and_last(letters: AvlTreeMap<i32, char>) {
        assert_eq!(letters.first_key_value(), Some((&1, &'a')));
        assert_eq!(letters.last_key_value(), Some((&7, &'g')));
    }

    #[rstest]
    #[case(4, Some(3), Some(5))]
    #[case(1, None, Some(2))]
    #[case(7, Some(6), None)]
    #[case(0, None, Some(1))]
    #[case(9, Some(7), None)]
    fn test_neighbours(
        letters: AvlTreeMap<i32, char>,
        #[case] key: i32,
        #[case] below: Option<i32>,
        #[case] above: Option<i32>,
    ) {
        assert_eq!(letters.predecessor(&key).map(|(key, _)| *key), below);
        assert_eq!(letters.successor(&key).map(|(key, _)| *key), above);
    }

    #[rstest]
    fn test_height_matches_verified_height(letters: AvlTreeMap<i32, char>) {
        assert_eq!(letters.height(), 3);
        assert_eq!(letters.verify_balances(), Ok(3));
    }

    #[rstest]
    fn test_release_relinks_moved_node(mut letters: AvlTreeMap<i32, char>) {
        for key in [4, 1, 7, 2] {
            letters.remove(&key);
            assert!(letters.verify_balances().is_ok());
        }
        let keys: Vec<i32> = letters.keys().copied().collect();
        assert_eq!(keys, vec![3, 5, 6]);
    }

    #[rstest]
    fn test_clear_resets_root(mut letters: AvlTreeMap<i32, char>) {
        letters.clear();
        assert!(letters.is_empty());
        assert_eq!(letters.iter().next(), None);
        letters.insert(1, 'z');
        assert_eq!(letters.get(&1), Some(&'z'));
    }

    #[rstest]
    fn test_equality_ignores_shape() {
        let ascending: AvlTreeMap<i32, i32> = (0..10).map(|key| (key, key)).collect();
        let descending: AvlTreeMap<i32, i32> = (0..10).rev().map(|key| (key, key)).collect();
        assert_eq!(ascending, descending);
    }

    #[rstest]
    #[should_panic(expected = "no entry found for key")]
    fn test_index_panics_on_missing_key(letters: AvlTreeMap<i32, char>) {
        let _ = letters[&42];
    }

    #[rstest]
    fn test_debug_renders_as_map(letters: AvlTreeMap<i32, char>) {
        let small: AvlTreeMap<i32, char> = letters.into_iter().take(2).collect();
        assert_eq!(format!("{small:?}"), "{1: 'a', 2: 'b'}");
    }
}
