//! # avltree
//!
//! Ordered collections backed by an AVL tree: a self-balancing binary
//! search tree that keeps the heights of every node's two subtrees within
//! one of each other.
//!
//! ## Overview
//!
//! - **`AvlTreeMap`**: ordered key-value map with O(log N) insert, lookup
//!   and removal, in-order iteration, predecessor/successor queries
//! - **`AvlTreeSet`**: ordered set built on the map
//!
//! Nodes are kept in an index arena with parent links, so the crate
//! contains no `unsafe` code and no reference counting.
//!
//! ## Feature Flags
//!
//! - `set` (default): `AvlTreeSet`
//! - `diagnostics`: read-only root access (`AvlTreeMap::root`), bare
//!   rotations, and the `verify_balances` invariant checker for test suites
//! - `full`: Enable all features
//!
//! ## Logging
//!
//! Rotations and rebalancing decisions are reported through the [`log`]
//! facade at `trace` level, node swaps at `debug` level. Install any logger
//! to see them.
//!
//! ## Example
//!
//! ```rust
//! use avltree::prelude::*;
//!
//! let mut map = AvlTreeMap::new();
//! map.insert("b", 2);
//! map.insert("a", 1);
//! map.insert("c", 3);
//!
//! let keys: Vec<&&str> = map.keys().collect();
//! assert_eq!(keys, vec![&"a", &"b", &"c"]);
//! assert_eq!(map.try_get(&"z"), Err(KeyNotFoundError));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use avltree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::avl::*;
}

pub mod avl;

pub use avl::{AvlTreeMap, KeyNotFoundError};

#[cfg(feature = "set")]
pub use avl::AvlTreeSet;

#[cfg(any(test, feature = "diagnostics"))]
pub use avl::InvariantViolation;

#[cfg(feature = "diagnostics")]
pub use avl::NodeRef;
