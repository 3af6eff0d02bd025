//! Error types for [`AvlTreeMap`](super::AvlTreeMap).
//!
//! Lookups report a missing key with [`KeyNotFoundError`]. Removing a
//! missing key is not an error at all. Broken structural invariants are
//! bugs in the rebalancing code; the diagnostics checker describes them
//! with [`InvariantViolation`].

use std::fmt;

/// Returned by [`AvlTreeMap::try_get`](super::AvlTreeMap::try_get) when no
/// entry is stored under the requested key.
///
/// # Examples
///
/// ```rust
/// use avltree::KeyNotFoundError;
///
/// assert_eq!(format!("{}", KeyNotFoundError), "key not found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyNotFoundError;

impl fmt::Display for KeyNotFoundError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "key not found")
    }
}

impl std::error::Error for KeyNotFoundError {}

/// A structural invariant that does not hold.
///
/// Produced by `AvlTreeMap::verify_balances` and
/// `AvlTreeMap::verify_links`. None of these can arise through the public
/// mutation API unless the balancing logic itself is wrong.
#[cfg(any(test, feature = "diagnostics"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root node records a parent.
    RootHasParent,
    /// A child does not point back at the node that holds it.
    BrokenParentLink,
    /// The number of nodes reachable from the root differs from the number
    /// of stored nodes.
    DetachedNodes {
        /// Nodes found by walking down from the root.
        reachable: usize,
        /// Nodes held in the arena.
        stored: usize,
    },
    /// In-order traversal is not strictly ascending at this position.
    OutOfOrder {
        /// Zero-based in-order position of the offending key.
        position: usize,
    },
    /// A subtree's heights differ by more than one.
    Unbalanced {
        /// `height(right) - height(left)` as measured.
        balance: isize,
    },
    /// A node's recorded balance factor disagrees with its subtree heights.
    BalanceMismatch {
        /// The stored balance factor.
        recorded: i8,
        /// `height(right) - height(left)` as measured.
        actual: isize,
    },
}

#[cfg(any(test, feature = "diagnostics"))]
impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootHasParent => write!(formatter, "root node has a parent"),
            Self::BrokenParentLink => {
                write!(formatter, "child does not link back to its parent")
            }
            Self::DetachedNodes { reachable, stored } => write!(
                formatter,
                "{reachable} nodes reachable from the root but {stored} stored"
            ),
            Self::OutOfOrder { position } => {
                write!(formatter, "keys out of order at in-order position {position}")
            }
            Self::Unbalanced { balance } => {
                write!(formatter, "subtree heights differ by {balance}")
            }
            Self::BalanceMismatch { recorded, actual } => write!(
                formatter,
                "balance factor mismatch: recorded {recorded}, measured {actual}"
            ),
        }
    }
}

#[cfg(any(test, feature = "diagnostics"))]
impl std::error::Error for InvariantViolation {}
