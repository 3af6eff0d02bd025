//! Structural inspection helpers.
//!
//! Compiled for the crate's own tests and, behind the `diagnostics` feature,
//! for downstream test suites. Nothing here is needed to use the map.

#[cfg(feature = "diagnostics")]
use std::borrow::Borrow;
#[cfg(feature = "diagnostics")]
use std::fmt;

use super::AvlTreeMap;
use super::error::InvariantViolation;
use super::node::NodeId;
#[cfg(feature = "diagnostics")]
use super::node::Direction;

// =============================================================================
// Invariant Verification
// =============================================================================

impl<K, V> AvlTreeMap<K, V> {
    /// Checks parent-link consistency only.
    ///
    /// Every child must point back at its parent, the root must have no
    /// parent, and every stored node must be reachable from the root.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn verify_links(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            return if self.nodes.is_empty() {
                Ok(())
            } else {
                Err(InvariantViolation::DetachedNodes {
                    reachable: 0,
                    stored: self.nodes.len(),
                })
            };
        };
        if self.parent(root).is_some() {
            return Err(InvariantViolation::RootHasParent);
        }

        let mut reachable = 0;
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            reachable += 1;
            if reachable > self.nodes.len() {
                break;
            }
            let node = self.node(id);
            for child in [node.left, node.right].into_iter().flatten() {
                if self.parent(child) != Some(id) {
                    return Err(InvariantViolation::BrokenParentLink);
                }
                pending.push(child);
            }
        }

        if reachable == self.nodes.len() {
            Ok(())
        } else {
            Err(InvariantViolation::DetachedNodes {
                reachable,
                stored: self.nodes.len(),
            })
        }
    }

    /// Recomputes subtree heights and compares them with the recorded
    /// balance factors, returning the subtree height.
    fn verify_subtree(&self, id: NodeId) -> Result<usize, InvariantViolation> {
        let node = self.node(id);
        let left = node.left.map_or(Ok(0), |child| self.verify_subtree(child))?;
        let right = node.right.map_or(Ok(0), |child| self.verify_subtree(child))?;

        #[allow(clippy::cast_possible_wrap)]
        let actual = right as isize - left as isize;
        if actual.abs() > 1 {
            return Err(InvariantViolation::Unbalanced { balance: actual });
        }
        if isize::from(node.balance) != actual {
            return Err(InvariantViolation::BalanceMismatch {
                recorded: node.balance,
                actual,
            });
        }
        Ok(1 + left.max(right))
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Verifies every structural invariant and returns the tree height.
    ///
    /// Checks parent links, strictly ascending in-order keys, and that each
    /// node's balance factor equals the measured height difference of its
    /// subtrees and lies within `-1..=1`.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "diagnostics")] {
    /// use avltree::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<i32, ()> = (0..100).map(|key| (key, ())).collect();
    /// assert_eq!(map.verify_balances(), Ok(7));
    /// # }
    /// ```
    pub fn verify_balances(&self) -> Result<usize, InvariantViolation> {
        self.verify_links()?;

        let mut previous: Option<&K> = None;
        for (position, (key, _)) in self.iter().enumerate() {
            if previous.is_some_and(|previous| previous >= key) {
                return Err(InvariantViolation::OutOfOrder { position });
            }
            previous = Some(key);
        }

        self.root.map_or(Ok(0), |root| self.verify_subtree(root))
    }
}

#[cfg(test)]
impl<K: std::fmt::Display, V> AvlTreeMap<K, V> {
    /// Compact one-line rendering: `key±balance(left,right)`, `.` for an
    /// empty slot, children omitted on leaves.
    pub(crate) fn shape(&self) -> String {
        fn render<K: std::fmt::Display, V>(map: &AvlTreeMap<K, V>, id: NodeId, out: &mut String) {
            let node = map.node(id);
            out.push_str(&format!("{}{:+}", node.key, node.balance));
            if node.left.is_none() && node.right.is_none() {
                return;
            }
            out.push('(');
            match node.left {
                Some(left) => render(map, left, out),
                None => out.push('.'),
            }
            out.push(',');
            match node.right {
                Some(right) => render(map, right, out),
                None => out.push('.'),
            }
            out.push(')');
        }

        let mut out = String::new();
        if let Some(root) = self.root {
            render(self, root, &mut out);
        }
        out
    }
}

// =============================================================================
// Read-only Node View
// =============================================================================

/// A read-only handle on one node of an [`AvlTreeMap`], for walking the tree
/// shape in tests.
#[cfg(feature = "diagnostics")]
pub struct NodeRef<'a, K, V> {
    map: &'a AvlTreeMap<K, V>,
    id: NodeId,
}

#[cfg(feature = "diagnostics")]
impl<'a, K, V> NodeRef<'a, K, V> {
    fn at(map: &'a AvlTreeMap<K, V>, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self { map, id })
    }

    /// The key stored in this node.
    #[must_use]
    pub fn key(&self) -> &'a K {
        &self.map.node(self.id).key
    }

    /// The value stored in this node.
    #[must_use]
    pub fn value(&self) -> &'a V {
        &self.map.node(self.id).value
    }

    /// The recorded `height(right) - height(left)`.
    #[must_use]
    pub fn balance(&self) -> i8 {
        self.map.balance(self.id)
    }

    /// The parent node, `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        Self::at(self.map, self.map.parent(self.id))
    }

    /// The left child.
    #[must_use]
    pub fn left(&self) -> Option<Self> {
        Self::at(self.map, self.map.child(self.id, Direction::Left))
    }

    /// The right child.
    #[must_use]
    pub fn right(&self) -> Option<Self> {
        Self::at(self.map, self.map.child(self.id, Direction::Right))
    }

    /// Returns `true` for a node without children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.left().is_none() && self.right().is_none()
    }
}

#[cfg(feature = "diagnostics")]
impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

#[cfg(feature = "diagnostics")]
impl<K, V> Copy for NodeRef<'_, K, V> {}

/// Two handles are equal when they point at the same node of the same map.
#[cfg(feature = "diagnostics")]
impl<K, V> PartialEq for NodeRef<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.map, other.map) && self.id == other.id
    }
}

#[cfg(feature = "diagnostics")]
impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .field("balance", &self.balance())
            .finish()
    }
}

#[cfg(feature = "diagnostics")]
impl<K, V> AvlTreeMap<K, V> {
    /// Returns a read-only view of the root node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "diagnostics")] {
    /// use avltree::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<_, _> = [(5, ()), (3, ()), (1, ())].into_iter().collect();
    /// let root = map.root().unwrap();
    /// assert_eq!(root.key(), &3);
    /// assert_eq!(root.left().map(|node| *node.key()), Some(1));
    /// assert_eq!(root.right().map(|node| *node.key()), Some(5));
    /// # }
    /// ```
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        NodeRef::at(self, self.root)
    }
}

#[cfg(feature = "diagnostics")]
impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Performs a bare right rotation around the node holding `key`.
    ///
    /// Balance factors are not updated, so the map is generally left with
    /// stale balances that [`verify_balances`](Self::verify_balances)
    /// reports. Returns `false` if `key` is absent or its node has no left
    /// child to rotate up.
    pub fn rotate_right_at<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.rotate_at(key, Direction::Right)
    }

    /// Performs a bare left rotation around the node holding `key`.
    ///
    /// See [`rotate_right_at`](Self::rotate_right_at).
    pub fn rotate_left_at<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.rotate_at(key, Direction::Left)
    }

    fn rotate_at<Q>(&mut self, key: &Q, direction: Direction) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(pivot) = self.find(key) else {
            return false;
        };
        if self.child(pivot, direction.opposite()).is_none() {
            return false;
        }
        self.rotate(pivot, direction);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_empty_tree_verifies_with_height_zero() {
        let map: AvlTreeMap<i32, ()> = AvlTreeMap::new();
        assert_eq!(map.verify_balances(), Ok(0));
    }

    #[rstest]
    fn test_detects_stale_balance() {
        let mut map: AvlTreeMap<i32, ()> = [(2, ()), (1, ()), (3, ())].into_iter().collect();
        let root = map.root.unwrap();
        map.set_balance(root, 1);
        assert_eq!(
            map.verify_balances(),
            Err(InvariantViolation::BalanceMismatch {
                recorded: 1,
                actual: 0
            })
        );
    }

    #[rstest]
    fn test_detects_unbalanced_subtree() {
        let mut map: AvlTreeMap<i32, ()> =
            [(2, ()), (1, ()), (3, ()), (4, ())].into_iter().collect();
        let root = map.root.unwrap();
        map.rotate(root, super::super::node::Direction::Right);
        assert_eq!(
            map.verify_balances(),
            Err(InvariantViolation::Unbalanced { balance: 2 })
        );
    }

    #[rstest]
    fn test_detects_broken_parent_link() {
        let mut map: AvlTreeMap<i32, ()> = [(2, ()), (1, ())].into_iter().collect();
        let one = map.find(&1).unwrap();
        map.node_mut(one).parent = None;
        assert_eq!(map.verify_links(), Err(InvariantViolation::BrokenParentLink));
    }

    #[rstest]
    fn test_detects_keys_out_of_order() {
        let mut map: AvlTreeMap<i32, ()> = [(2, ()), (1, ()), (3, ())].into_iter().collect();
        let one = map.find(&1).unwrap();
        map.node_mut(one).key = 5;
        assert_eq!(
            map.verify_balances(),
            Err(InvariantViolation::OutOfOrder { position: 1 })
        );
    }
}
