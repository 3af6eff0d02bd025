//! Single-rotation primitive used by both fix-up procedures.
//!
//! A rotation only relinks nodes. Balance factors are left untouched and set
//! by the caller, which knows the case it is in.

use log::trace;

use super::AvlTreeMap;
use super::node::{Direction, NodeId};

impl<K, V> AvlTreeMap<K, V> {
    /// Rotates the subtree rooted at `pivot` towards `direction`.
    ///
    /// The child on the opposite side rises into `pivot`'s position (taking
    /// over its parent slot, or the root), `pivot` becomes that child's
    /// `direction` child, and the riser's former inner subtree is handed to
    /// `pivot`.
    ///
    /// ```text
    ///        pivot               riser
    ///        /   \               /   \
    ///     riser   c    ==>      a   pivot
    ///     /   \                     /   \
    ///    a   inner               inner   c
    /// ```
    /// (shown for `Direction::Right`)
    ///
    /// # Panics
    ///
    /// Panics if `pivot` has no child on the rising side. The fix-up case
    /// analysis only rotates around nodes that have one.
    pub(super) fn rotate(&mut self, pivot: NodeId, direction: Direction) {
        let riser = self
            .child(pivot, direction.opposite())
            .expect("rotation requires a child on the rising side");
        let inner = self.child(riser, direction);
        let parent = self.parent(pivot);

        trace!("rotate {direction:?} around {pivot:?}, {riser:?} rises");

        self.replace_in_parent(parent, pivot, Some(riser));
        self.node_mut(riser).parent = parent;
        self.node_mut(riser).set_child(direction, Some(pivot));
        self.node_mut(pivot).parent = Some(riser);
        self.node_mut(pivot).set_child(direction.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(pivot);
        }
    }
}
