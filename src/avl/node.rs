//! Arena node representation shared by the balancing procedures.
//!
//! Every node lives in the map's `Vec` arena and refers to its neighbours by
//! [`NodeId`]. Child links are owning in the sense that a subtree is only
//! reachable through them; the parent link is a navigation aid and never
//! keeps anything alive.

// =============================================================================
// Node Identifier
// =============================================================================

/// Index of a node inside the arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// Wraps an arena position.
    ///
    /// # Panics
    ///
    /// Panics if the arena has grown past `u32::MAX` entries.
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("arena index exceeds the u32 range"))
    }

    /// Returns the arena position.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// Direction
// =============================================================================

/// Which child slot of a node is meant.
///
/// The sign of a direction is the amount it contributes to a balance factor:
/// growing the left subtree subtracts one, growing the right subtree adds one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    /// `-1` for left, `+1` for right.
    #[inline]
    pub(crate) const fn sign(self) -> i8 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Maps a non-zero balance delta back to the side it points at.
    #[inline]
    pub(crate) const fn from_sign(sign: i8) -> Self {
        if sign < 0 { Self::Left } else { Self::Right }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// One stored entry plus its links and balance factor.
///
/// `balance` is `height(right) - height(left)` and stays within `-1..=1`
/// between public operations.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) balance: i8,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    /// Creates a balanced leaf hanging below `parent`.
    #[inline]
    pub(crate) const fn leaf(key: K, value: V, parent: Option<NodeId>) -> Self {
        Self {
            key,
            value,
            balance: 0,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, direction: Direction, child: Option<NodeId>) {
        match direction {
            Direction::Left => self.left = child,
            Direction::Right => self.right = child,
        }
    }

    /// Returns the side on which `child` hangs below this node.
    #[inline]
    pub(crate) fn side_of(&self, child: NodeId) -> Direction {
        if self.left == Some(child) {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}

// =============================================================================
// In-order Navigation
// =============================================================================

/// Descends to the last node on `direction`'s side of `start`.
pub(crate) fn extreme<K, V>(nodes: &[Node<K, V>], start: NodeId, direction: Direction) -> NodeId {
    let mut current = start;
    while let Some(child) = nodes[current.index()].child(direction) {
        current = child;
    }
    current
}

/// Steps one position through the in-order sequence.
///
/// `Direction::Right` yields the successor, `Direction::Left` the
/// predecessor. Walks up through parent links when the relevant subtree is
/// empty.
pub(crate) fn step<K, V>(
    nodes: &[Node<K, V>],
    from: NodeId,
    direction: Direction,
) -> Option<NodeId> {
    if let Some(child) = nodes[from.index()].child(direction) {
        return Some(extreme(nodes, child, direction.opposite()));
    }

    let mut current = from;
    let mut parent = nodes[current.index()].parent;
    while let Some(ancestor) = parent {
        if nodes[ancestor.index()].child(direction) != Some(current) {
            return Some(ancestor);
        }
        current = ancestor;
        parent = nodes[current.index()].parent;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::Left, -1)]
    #[case(Direction::Right, 1)]
    fn test_direction_sign_round_trips(#[case] direction: Direction, #[case] sign: i8) {
        assert_eq!(direction.sign(), sign);
        assert_eq!(Direction::from_sign(sign), direction);
        assert_eq!(direction.opposite().sign(), -sign);
    }

    #[rstest]
    fn test_leaf_starts_balanced_without_children() {
        let node = Node::leaf(1, "one", Some(NodeId::new(7)));
        assert_eq!(node.balance, 0);
        assert_eq!(node.parent, Some(NodeId::new(7)));
        assert_eq!(node.child(Direction::Left), None);
        assert_eq!(node.child(Direction::Right), None);
    }

    #[rstest]
    fn test_step_walks_in_order() {
        // 1 <- 2 -> 3, stored out of key order in the arena.
        let mut nodes = vec![
            Node::leaf(2, (), None),
            Node::leaf(3, (), Some(NodeId::new(0))),
            Node::leaf(1, (), Some(NodeId::new(0))),
        ];
        nodes[0].set_child(Direction::Right, Some(NodeId::new(1)));
        nodes[0].set_child(Direction::Left, Some(NodeId::new(2)));

        let first = extreme(&nodes, NodeId::new(0), Direction::Left);
        assert_eq!(nodes[first.index()].key, 1);

        let second = step(&nodes, first, Direction::Right).unwrap();
        let third = step(&nodes, second, Direction::Right).unwrap();
        assert_eq!(nodes[second.index()].key, 2);
        assert_eq!(nodes[third.index()].key, 3);
        assert_eq!(step(&nodes, third, Direction::Right), None);
        assert_eq!(step(&nodes, first, Direction::Left), None);
        assert_eq!(step(&nodes, third, Direction::Left), Some(second));
    }
}
