//! Removal, the positional node swap, and the upward height-decrease
//! correction.

use std::borrow::Borrow;

use log::{debug, trace};

use super::AvlTreeMap;
use super::node::{Direction, Node, NodeId, extreme, step};

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Removes `key` from the map, returning its value if it was present.
    ///
    /// Removing an absent key is a silent no-op. A node with two children
    /// first trades places with its in-order predecessor, so the node that
    /// is finally unlinked has at most one child. The height decrease is
    /// then corrected on the way up, which may rotate at every level.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avltree::AvlTreeMap;
    ///
    /// let mut map: AvlTreeMap<_, _> =
    ///     [(1, "one"), (2, "two"), (3, "three")].into_iter().collect();
    /// assert_eq!(map.remove(&2), Some("two"));
    /// assert_eq!(map.remove(&2), None);
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key` from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.find(key)?;
        let node = self.remove_node(target);
        Some((node.key, node.value))
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = extreme(&self.nodes, self.root?, Direction::Left);
        let node = self.remove_node(first);
        Some((node.key, node.value))
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = extreme(&self.nodes, self.root?, Direction::Right);
        let node = self.remove_node(last);
        Some((node.key, node.value))
    }

    /// Retains only the entries for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut current = self
            .root
            .map(|root| extreme(&self.nodes, root, Direction::Left));
        while let Some(id) = current {
            let node = self.node_mut(id);
            if keep(&node.key, &mut node.value) {
                current = self.successor_id(id);
                continue;
            }
            // Removal reshuffles arena slots, so resume by key.
            let removed = self.remove_node(id);
            current = self.first_above(&removed.key);
        }
    }
}

impl<K, V> AvlTreeMap<K, V> {
    /// Unlinks `target` from the tree and releases it from the arena.
    pub(super) fn remove_node(&mut self, target: NodeId) -> Node<K, V> {
        let (left, right) = (self.node(target).left, self.node(target).right);
        if let (Some(left), Some(_)) = (left, right) {
            let predecessor = extreme(&self.nodes, left, Direction::Right);
            debug!(
                "remove: {target:?} has two children, swapping with predecessor {predecessor:?}"
            );
            self.node_swap(target, predecessor);
        }

        let parent = self.parent(target);
        let child = {
            let node = self.node(target);
            node.left.or(node.right)
        };
        if let Some(child) = child {
            self.node_mut(child).parent = parent;
        }

        match parent {
            None => self.root = child,
            Some(parent) => {
                let side = self.node(parent).side_of(target);
                self.node_mut(parent).set_child(side, child);
                // Losing height on the left tilts the parent to the right.
                self.remove_fix(parent, -side.sign());
            }
        }

        let node = self.node_mut(target);
        node.parent = None;
        node.left = None;
        node.right = None;
        self.release(target)
    }

    /// Exchanges the tree positions of two distinct nodes.
    ///
    /// Each node keeps its own key and value but takes over the other's
    /// parent, children, and balance factor, so balance factors stay with
    /// the position. Handles the case where one node is the other's direct
    /// child, and moves `root` if either node held it.
    pub(super) fn node_swap(&mut self, first: NodeId, second: NodeId) {
        let first_side = self.side_in_parent(first);
        let second_side = self.side_in_parent(second);

        {
            let (low, high) = if first.index() < second.index() {
                (first, second)
            } else {
                (second, first)
            };
            let (head, tail) = self.nodes.split_at_mut(high.index());
            let low_node = &mut head[low.index()];
            let high_node = &mut tail[0];
            std::mem::swap(&mut low_node.parent, &mut high_node.parent);
            std::mem::swap(&mut low_node.left, &mut high_node.left);
            std::mem::swap(&mut low_node.right, &mut high_node.right);
            std::mem::swap(&mut low_node.balance, &mut high_node.balance);
        }

        // A node that was adjacent to the other now points at itself.
        let retarget = |link: &mut Option<NodeId>, own: NodeId, other: NodeId| {
            if *link == Some(own) {
                *link = Some(other);
            }
        };
        for (own, other) in [(first, second), (second, first)] {
            let node = self.node_mut(own);
            retarget(&mut node.parent, own, other);
            retarget(&mut node.left, own, other);
            retarget(&mut node.right, own, other);
        }

        // `first` now sits where `second` was, and vice versa.
        for (own, side) in [(first, second_side), (second, first_side)] {
            let node = self.node(own);
            let (parent, left, right) = (node.parent, node.left, node.right);
            match (parent, side) {
                (None, _) => self.root = Some(own),
                (Some(parent), Some(side)) if parent != first && parent != second => {
                    self.node_mut(parent).set_child(side, Some(own));
                }
                _ => {}
            }
            for child in [left, right].into_iter().flatten() {
                if child != first && child != second {
                    self.node_mut(child).parent = Some(own);
                }
            }
        }
    }

    /// Propagates a one-level height decrease upwards, starting at `node`.
    ///
    /// `diff` is the balance change `node` experiences: `+1` when its left
    /// subtree shrank, `-1` when its right subtree shrank. Unlike insertion,
    /// a rotation here can shorten the subtree too, so the loop may rotate
    /// at every level up to the root.
    pub(super) fn remove_fix(&mut self, node: NodeId, diff: i8) {
        let mut current = Some(node);
        let mut diff = diff;

        while let Some(node) = current {
            let parent = self.parent(node);
            let next_diff = self.side_in_parent(node).map_or(0, |side| -side.sign());
            let balance = self.balance(node) + diff;

            if balance == 0 {
                trace!("remove fix: {node:?} evened out, height dropped");
                self.set_balance(node, 0);
            } else if balance == diff {
                trace!("remove fix: {node:?} absorbed the loss");
                self.set_balance(node, diff);
                return;
            } else {
                let tall = Direction::from_sign(diff);
                let tall_child = self
                    .child(node, tall)
                    .expect("a doubly heavy node has a child on its taller side");
                let tall_balance = self.balance(tall_child);

                if tall_balance == diff {
                    trace!("remove fix: outer case at {node:?}, single rotation");
                    self.rotate(node, tall.opposite());
                    self.set_balance(node, 0);
                    self.set_balance(tall_child, 0);
                } else if tall_balance == 0 {
                    trace!("remove fix: flat case at {node:?}, single rotation, height kept");
                    self.rotate(node, tall.opposite());
                    self.set_balance(node, diff);
                    self.set_balance(tall_child, -diff);
                    return;
                } else {
                    trace!("remove fix: inner case at {node:?}, double rotation");
                    let grandchild = self
                        .child(tall_child, tall.opposite())
                        .expect("an inner-heavy child has a child on its inner side");
                    let grandchild_balance = self.balance(grandchild);
                    self.rotate(tall_child, tall);
                    self.rotate(node, tall.opposite());

                    let (node_balance, tall_child_balance) = match grandchild_balance {
                        0 => (0, 0),
                        balance if balance == diff => (-diff, 0),
                        _ => (0, diff),
                    };
                    self.set_balance(node, node_balance);
                    self.set_balance(tall_child, tall_child_balance);
                    self.set_balance(grandchild, 0);
                }
            }

            current = parent;
            diff = next_diff;
        }
    }

    fn successor_id(&self, id: NodeId) -> Option<NodeId> {
        step(&self.nodes, id, Direction::Right)
    }
}

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Id of the first node whose key is strictly greater than `key`.
    fn first_above(&self, key: &K) -> Option<NodeId> {
        let mut best = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node = self.node(id);
            if node.key > *key {
                best = Some(id);
                current = node.left;
            } else {
                current = node.right;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::super::AvlTreeMap;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn build(keys: &[i32]) -> AvlTreeMap<i32, i32> {
        keys.iter().map(|&key| (key, key * 10)).collect()
    }

    fn removed(keys: &[i32], key: i32) -> AvlTreeMap<i32, i32> {
        let mut map = build(keys);
        assert_eq!(map.remove(&key), Some(key * 10));
        assert!(map.verify_balances().is_ok(), "invalid after removing {key}");
        map
    }

    #[rstest]
    fn test_remove_root_of_three_node_tree_promotes_predecessor() {
        let map = removed(&[2, 1, 3], 2);
        assert_eq!(map.shape(), "1+1(.,3+0)");
        assert_eq!(map.first_key_value(), Some((&1, &10)));
    }

    #[rstest]
    fn test_remove_only_node_empties_tree() {
        let map = removed(&[1], 1);
        assert!(map.is_empty());
        assert_eq!(map.root, None);
    }

    #[rstest]
    #[case::root_with_single_child(&[1, 2], 1, "2+0")]
    #[case::leaf_absorbed(&[2, 1, 3], 3, "2-1(1+0,.)")]
    #[case::height_drop_propagates(&[5, 3, 8, 2, 4, 7, 9, 1], 1, "5+0(3+0(2+0,4+0),8+0(7+0,9+0))")]
    #[case::outer_rotation(&[2, 1, 3, 0], 3, "1+0(0+0,2+0)")]
    #[case::flat_rotation_keeps_height(&[4, 2, 5, 1, 3], 5, "2+1(1+0,4-1(3+0,.))")]
    #[case::inner_rotation_flat_grandchild(&[3, 1, 4, 2], 4, "2+0(1+0,3+0)")]
    #[case::inner_rotation_grandchild_leans_away(
        &[5, 2, 7, 1, 3, 8, 4],
        8,
        "3+0(2-1(1+0,.),5+0(4+0,7+0))"
    )]
    #[case::inner_rotation_grandchild_leans_toward(
        &[5, 2, 7, 1, 4, 8, 3],
        8,
        "4+0(2+0(1+0,3+0),5+1(.,7+0))"
    )]
    fn test_remove_fix_cases(#[case] keys: &[i32], #[case] key: i32, #[case] expected: &str) {
        assert_eq!(removed(keys, key).shape(), expected);
    }

    #[rstest]
    fn test_remove_with_distant_predecessor() {
        let map = removed(&[5, 3, 8, 2, 4, 7, 9, 1], 5);
        assert_eq!(map.shape(), "4+0(2+0(1+0,3+0),8+0(7+0,9+0))");
    }

    #[rstest]
    fn test_remove_with_adjacent_predecessor() {
        let map = removed(&[5, 3, 8, 2, 4], 3);
        assert_eq!(map.shape(), "5-1(2+1(.,4+0),8+0)");
    }

    #[rstest]
    fn test_removal_can_rotate_at_several_levels() {
        let keys = [5, 2, 8, 1, 3, 6, 10, 4, 7, 9, 11, 12];
        let map = build(&keys);
        assert_eq!(
            map.shape(),
            "5+1(2+1(1+0,3+1(.,4+0)),8+1(6+1(.,7+0),10+1(9+0,11+1(.,12+0))))"
        );
        assert_eq!(map.height(), 5);

        let map = removed(&keys, 1);
        assert_eq!(
            map.shape(),
            "8+0(5+0(3+0(2+0,4+0),6+1(.,7+0)),10+1(9+0,11+1(.,12+0)))"
        );
        assert_eq!(map.height(), 4);
    }

    #[rstest]
    fn test_remove_absent_key_changes_nothing() {
        let mut map = build(&[5, 3, 1, 2, 4, 0, 8, 7, 9]);
        let before = map.shape();
        assert_eq!(map.remove(&6), None);
        assert_eq!(map.remove(&-1), None);
        assert_eq!(map.shape(), before);
        assert_eq!(map.len(), 9);

        let mut empty: AvlTreeMap<i32, i32> = AvlTreeMap::new();
        assert_eq!(empty.remove(&1), None);
        assert!(empty.is_empty());
    }

    #[rstest]
    fn test_node_swap_moves_root_and_balances() {
        let mut map = build(&[2, 1, 3]);
        let two = map.root.unwrap();
        let one = map.find(&1).unwrap();
        map.set_balance(two, 1);
        map.node_swap(two, one);

        assert_eq!(map.root, Some(one));
        assert_eq!(map.balance(one), 1);
        assert_eq!(map.balance(two), 0);
        assert_eq!(map.parent(two), Some(one));
        assert!(map.verify_links().is_ok());
    }

    #[rstest]
    fn test_pop_first_and_last() {
        let mut map = build(&[4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(map.pop_first(), Some((1, 10)));
        assert_eq!(map.pop_last(), Some((7, 70)));
        assert_eq!(map.len(), 5);
        assert!(map.verify_balances().is_ok());
    }

    #[rstest]
    fn test_retain_keeps_matching_entries() {
        let mut map: AvlTreeMap<i32, i32> = (0..50).map(|key| (key, key)).collect();
        map.retain(|key, value| {
            *value += 1;
            key % 3 == 0
        });
        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, (0..50).step_by(3).collect::<Vec<_>>());
        assert_eq!(map.get(&9), Some(&10));
        assert!(map.verify_balances().is_ok());
    }

    #[rstest]
    fn test_draining_in_any_order_leaves_nothing_behind() {
        let mut map: AvlTreeMap<i32, i32> = (0..64).map(|key| (key, key)).collect();
        for key in (0..64).rev().step_by(2).chain((0..64).step_by(2)) {
            assert_eq!(map.remove(&key), Some(key));
            assert!(map.verify_balances().is_ok());
        }
        assert!(map.is_empty());
        assert!(map.nodes.is_empty());
        assert_eq!(map.root, None);
    }

    #[derive(Clone, Debug)]
    enum Operation {
        Insert(u8, i32),
        Remove(u8),
    }

    fn operation() -> impl Strategy<Value = Operation> {
        prop_oneof![
            (any::<u8>(), any::<i32>()).prop_map(|(key, value)| Operation::Insert(key, value)),
            any::<u8>().prop_map(Operation::Remove),
        ]
    }

    proptest! {
        /// Every mutation leaves a valid AVL tree that agrees with `BTreeMap`.
        #[test]
        fn prop_mutations_preserve_invariants(
            operations in prop::collection::vec(operation(), 0..200)
        ) {
            let mut map = AvlTreeMap::new();
            let mut model = BTreeMap::new();
            for operation in operations {
                match operation {
                    Operation::Insert(key, value) => {
                        prop_assert_eq!(map.insert(key, value), model.insert(key, value));
                    }
                    Operation::Remove(key) => {
                        prop_assert_eq!(map.remove(&key), model.remove(&key));
                    }
                }
                prop_assert!(map.verify_balances().is_ok());
            }
            prop_assert!(map.iter().eq(model.iter()));
        }
    }
}
