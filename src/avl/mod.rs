//! AVL-balanced ordered collections.
//!
//! - [`AvlTreeMap`]: ordered key-value map
//! - [`AvlTreeSet`]: ordered set (feature `set`)
//!
//! # Internal Structure
//!
//! Nodes live in one `Vec` arena and link to each other by index. Every node
//! keeps a parent link next to its two child links, and a balance factor
//! `height(right) - height(left)`. After every public operation:
//!
//! 1. In-order traversal yields strictly ascending keys
//! 2. Every balance factor is in `-1..=1` and equals the real height
//!    difference of the node's subtrees
//! 3. Each child's parent link points at the node holding it, and the root
//!    has none
//!
//! Insertion walks up from the new leaf adjusting balance factors and stops
//! after at most one single or double rotation. Removal first swaps a node
//! with two children into its in-order predecessor's position, unlinks it,
//! then walks up and may rotate at every level.
//!
//! # Examples
//!
//! ```rust
//! use avltree::AvlTreeMap;
//!
//! let mut map = AvlTreeMap::new();
//! for key in 1..=7 {
//!     map.insert(key, key * key);
//! }
//!
//! // Ascending insertion still yields a perfectly balanced tree.
//! assert_eq!(map.height(), 3);
//! assert_eq!(map.get(&4), Some(&16));
//!
//! map.remove(&4);
//! assert_eq!(map.len(), 6);
//! assert_eq!(map.first_key_value(), Some((&1, &1)));
//! ```

mod error;
mod insert;
mod iter;
mod map;
mod node;
mod pretty;
mod remove;
mod rotation;

#[cfg(any(test, feature = "diagnostics"))]
mod diagnostics;

#[cfg(feature = "set")]
mod set;

pub use error::KeyNotFoundError;
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use map::AvlTreeMap;
pub use pretty::Pretty;

#[cfg(any(test, feature = "diagnostics"))]
pub use error::InvariantViolation;

#[cfg(feature = "diagnostics")]
pub use diagnostics::NodeRef;

#[cfg(feature = "set")]
pub use set::AvlTreeSet;
