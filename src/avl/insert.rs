//! Insertion and the upward height-increase correction.

use std::cmp::Ordering;

use log::trace;

use super::AvlTreeMap;
use super::node::{Direction, NodeId};

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Inserts a key-value pair into the map.
    ///
    /// If the key is already present its value is overwritten in place and
    /// the previous value is returned; the tree shape and every balance
    /// factor stay exactly as they were. Otherwise a new leaf is attached
    /// and at most one single or double rotation restores the balance.
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
    /// let mut map = AvlTreeMap::new();
    /// assert_eq!(map.insert(1, "one"), None);
    /// assert_eq!(map.insert(1, "ONE"), Some("one"));
    /// assert_eq!(map.get(&1), Some(&"ONE"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let Some(mut current) = self.root else {
            self.root = Some(self.allocate(key, value, None));
            return None;
        };

        loop {
            let direction = match key.cmp(&self.node(current).key) {
                Ordering::Equal => {
                    return Some(std::mem::replace(&mut self.node_mut(current).value, value));
                }
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
            };

            if let Some(child) = self.child(current, direction) {
                current = child;
                continue;
            }

            let leaf = self.allocate(key, value, Some(current));
            self.node_mut(current).set_child(direction, Some(leaf));

            if self.balance(current) == -direction.sign() {
                // The shorter side caught up; the parent's height is unchanged.
                self.set_balance(current, 0);
            } else {
                self.set_balance(current, direction.sign());
                self.insert_fix(current, leaf);
            }
            return None;
        }
    }

    /// Propagates a one-level height increase of `parent`'s subtree upwards.
    ///
    /// `child` is the child of `parent` the increase came through. Climbs
    /// until a grandparent absorbs the change or a single rotation event
    /// (one rotation for the outer case, two for the inner case) restores
    /// the balance, after which nothing above can have changed height.
    pub(super) fn insert_fix(&mut self, mut parent: NodeId, mut child: NodeId) {
        while let Some(grandparent) = self.parent(parent) {
            let side = self.node(grandparent).side_of(parent);
            let direction = side.sign();
            let balance = self.balance(grandparent) + direction;
            self.set_balance(grandparent, balance);

            if balance == 0 {
                trace!("insert fix: {grandparent:?} absorbed growth on the {side:?}");
                return;
            }

            if balance == direction {
                child = parent;
                parent = grandparent;
                continue;
            }

            if self.balance(parent) == direction {
                trace!("insert fix: outer case at {grandparent:?}, single rotation");
                self.rotate(grandparent, side.opposite());
                self.set_balance(parent, 0);
                self.set_balance(grandparent, 0);
            } else {
                trace!("insert fix: inner case at {grandparent:?}, double rotation");
                let child_balance = self.balance(child);
                self.rotate(parent, side);
                self.rotate(grandparent, side.opposite());

                let (parent_balance, grandparent_balance) = match child_balance {
                    0 => (0, 0),
                    balance if balance == direction => (0, -direction),
                    _ => (direction, 0),
                };
                self.set_balance(parent, parent_balance);
                self.set_balance(grandparent, grandparent_balance);
                self.set_balance(child, 0);
            }
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::AvlTreeMap;
    use rstest::rstest;

    fn build(keys: &[i32]) -> AvlTreeMap<i32, i32> {
        let mut map = AvlTreeMap::new();
        for &key in keys {
            map.insert(key, key * 10);
            assert!(map.verify_balances().is_ok(), "invalid after inserting {key}");
        }
        map
    }

    #[rstest]
    fn test_first_insert_becomes_root() {
        let map = build(&[7]);
        assert_eq!(map.shape(), "7+0");
        assert_eq!(map.height(), 1);
    }

    #[rstest]
    #[case::filling_shorter_side(&[2, 1, 3], "2+0(1+0,3+0)")]
    #[case::growth_propagates(&[2, 1, 3, 4], "2+1(1+0,3+1(.,4+0))")]
    #[case::growth_reaches_root(&[3, 2, 5, 4], "3+1(2+0,5-1(4+0,.))")]
    #[case::absorbed_at_grandparent(&[3, 2, 5, 1, 4], "3+0(2-1(1+0,.),5-1(4+0,.))")]
    fn test_balance_propagation(#[case] keys: &[i32], #[case] expected: &str) {
        assert_eq!(build(keys).shape(), expected);
    }

    #[rstest]
    #[case::left_left(&[3, 2, 1])]
    #[case::right_right(&[1, 2, 3])]
    #[case::left_right(&[3, 1, 2])]
    #[case::right_left(&[1, 3, 2])]
    fn test_three_node_chains_rotate_into_balanced_triangle(#[case] keys: &[i32]) {
        assert_eq!(build(keys).shape(), "2+0(1+0,3+0)");
    }

    #[rstest]
    #[case::inner_child_leans_with_direction(&[5, 2, 8, 1, 4, 3], "4+0(2+0(1+0,3+0),5+1(.,8+0))")]
    #[case::inner_child_leans_against_direction(
        &[5, 2, 8, 1, 3, 4],
        "3+0(2-1(1+0,.),5+0(4+0,8+0))"
    )]
    #[case::mirrored_leans_with_direction(&[4, 1, 7, 5, 8, 6], "5+0(4-1(1+0,.),7+0(6+0,8+0))")]
    #[case::mirrored_leans_against_direction(&[4, 1, 7, 6, 8, 5], "6+0(4+0(1+0,5+0),7+1(.,8+0))")]
    fn test_double_rotation_balance_assignment(#[case] keys: &[i32], #[case] expected: &str) {
        assert_eq!(build(keys).shape(), expected);
    }

    #[rstest]
    fn test_third_insertion_rotates_three_over_one_and_five() {
        let map = build(&[5, 3, 1]);
        assert_eq!(map.shape(), "3+0(1+0,5+0)");

        let map = build(&[5, 3, 1, 2, 4, 0, 8, 7, 9]);
        assert_eq!(map.shape(), "3+1(1+0(0+0,2+0),5+1(4+0,8+0(7+0,9+0)))");
        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 4, 5, 7, 8, 9]);
    }

    #[rstest]
    fn test_ascending_insertion_stays_logarithmic() {
        let map = build(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(map.shape(), "4+0(2+0(1+0,3+0),6+0(5+0,7+0))");
        assert_eq!(map.height(), 3);

        let large: AvlTreeMap<i32, ()> = (0..1023).map(|key| (key, ())).collect();
        assert_eq!(large.height(), 10);
        assert_eq!(large.verify_balances(), Ok(10));
    }

    #[rstest]
    fn test_overwrite_keeps_shape_and_balances() {
        let mut map = build(&[5, 3, 1, 2, 4, 0, 8, 7, 9]);
        let before = map.shape();
        for key in [0, 4, 9, 3] {
            assert_eq!(map.insert(key, -1), Some(key * 10));
        }
        assert_eq!(map.shape(), before);
        assert_eq!(map.len(), 9);
        assert_eq!(map.get(&4), Some(&-1));
    }

    #[rstest]
    fn test_traced_insertions_take_both_rotation_paths() {
        // The logger is process-wide; a repeated init only returns an error.
        let _ = simplelog::TestLogger::init(
            simplelog::LevelFilter::Trace,
            simplelog::Config::default(),
        );
        assert!(log::log_enabled!(log::Level::Trace));

        // 30 triggers the outer case at 10, 28 the inner case at 30.
        let map = build(&[10, 20, 30, 25, 28]);
        assert_eq!(map.shape(), "20+1(10+0,28+0(25+0,30+0))");
    }
}
