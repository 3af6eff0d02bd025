//! In-order iterators over an [`AvlTreeMap`](super::AvlTreeMap).

use std::iter::FusedIterator;

use super::node::{Direction, Node, NodeId, extreme, step};

// =============================================================================
// Borrowing Iterator
// =============================================================================

/// An iterator over the entries of an `AvlTreeMap`, in ascending key order.
///
/// Walks the tree through parent links, so it needs no auxiliary stack.
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(nodes: &'a [Node<K, V>], root: Option<NodeId>) -> Self {
        Self {
            nodes,
            front: root.map(|root| extreme(nodes, root, Direction::Left)),
            back: root.map(|root| extreme(nodes, root, Direction::Right)),
            remaining: nodes.len(),
        }
    }

    fn entry(&self, id: NodeId) -> (&'a K, &'a V) {
        let node = &self.nodes[id.index()];
        (&node.key, &node.value)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        self.front = step(self.nodes, id, Direction::Right);
        Some(self.entry(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        self.back = step(self.nodes, id, Direction::Left);
        Some(self.entry(id))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Mutable Iterator
// =============================================================================

/// An iterator over the entries of an `AvlTreeMap` with mutable values, in
/// ascending key order.
pub struct IterMut<'a, K, V> {
    slots: Vec<Option<(&'a K, &'a mut V)>>,
    order: std::vec::IntoIter<NodeId>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    /// Splits the arena into per-node borrows, handed out following `order`.
    pub(super) fn new(nodes: &'a mut [Node<K, V>], order: Vec<NodeId>) -> Self {
        let slots = nodes
            .iter_mut()
            .map(|node| Some((&node.key, &mut node.value)))
            .collect();
        Self {
            slots,
            order: order.into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        self.slots[id.index()].take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.order.next_back()?;
        self.slots[id.index()].take()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over the entries of an `AvlTreeMap`, in ascending key
/// order.
pub struct IntoIter<K, V> {
    slots: Vec<Option<(K, V)>>,
    order: std::vec::IntoIter<NodeId>,
}

impl<K, V> IntoIter<K, V> {
    pub(super) fn new(nodes: Vec<Node<K, V>>, order: Vec<NodeId>) -> Self {
        let slots = nodes
            .into_iter()
            .map(|node| Some((node.key, node.value)))
            .collect();
        Self {
            slots,
            order: order.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        self.slots[id.index()].take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.order.next_back()?;
        self.slots[id.index()].take()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

// =============================================================================
// Projections
// =============================================================================

/// An iterator over the keys of an `AvlTreeMap`, in ascending order.
#[derive(Clone)]
pub struct Keys<'a, K, V> {
    pub(super) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of an `AvlTreeMap`, in ascending key order.
#[derive(Clone)]
pub struct Values<'a, K, V> {
    pub(super) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of an `AvlTreeMap`.
pub struct ValuesMut<'a, K, V> {
    pub(super) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
