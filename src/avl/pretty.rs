//! Sideways tree rendering for debugging output.

use std::fmt;

use super::AvlTreeMap;
use super::node::NodeId;

/// Renders an [`AvlTreeMap`] as an indented tree, one node per line with its
/// balance factor. Created by [`AvlTreeMap::pretty`].
///
/// A node with a single child shows the empty slot as `∅` so left and right
/// stay distinguishable.
pub struct Pretty<'a, K, V> {
    map: &'a AvlTreeMap<K, V>,
}

impl<K, V> AvlTreeMap<K, V> {
    /// Returns a [`Display`](fmt::Display) adaptor that draws the tree shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avltree::AvlTreeMap;
    ///
    /// let map: AvlTreeMap<_, _> = [(2, ()), (1, ()), (3, ()), (4, ())].into_iter().collect();
    /// let expected = "\
    /// 2 (+1)
    /// ├── 1 (+0)
    /// └── 3 (+1)
    ///     ├── ∅
    ///     └── 4 (+0)
    /// ";
    /// assert_eq!(map.pretty().to_string(), expected);
    /// ```
    #[must_use]
    pub const fn pretty(&self) -> Pretty<'_, K, V> {
        Pretty { map: self }
    }
}

impl<K: fmt::Display, V> Pretty<'_, K, V> {
    fn write_node(
        &self,
        formatter: &mut fmt::Formatter<'_>,
        id: NodeId,
        prefix: &str,
    ) -> fmt::Result {
        let node = self.map.node(id);
        writeln!(formatter, "{} ({:+})", node.key, node.balance)?;
        if node.left.is_none() && node.right.is_none() {
            return Ok(());
        }

        for (child, last) in [(node.left, false), (node.right, true)] {
            let (branch, extension) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            write!(formatter, "{prefix}{branch}")?;
            match child {
                Some(child) => self.write_node(formatter, child, &format!("{prefix}{extension}"))?,
                None => writeln!(formatter, "∅")?,
            }
        }
        Ok(())
    }
}

impl<K: fmt::Display, V> fmt::Display for Pretty<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.map.root {
            Some(root) => self.write_node(formatter, root, ""),
            None => writeln!(formatter, "∅"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::AvlTreeMap;
    use rstest::rstest;

    #[rstest]
    fn test_pretty_empty() {
        let map: AvlTreeMap<i32, ()> = AvlTreeMap::new();
        assert_eq!(map.pretty().to_string(), "∅\n");
    }

    #[rstest]
    fn test_pretty_nested_prefixes() {
        let map: AvlTreeMap<i32, ()> = [5, 3, 8, 2, 4, 7, 9, 1]
            .into_iter()
            .map(|key| (key, ()))
            .collect();
        let expected = "\
5 (-1)
├── 3 (-1)
│   ├── 2 (-1)
│   │   ├── 1 (+0)
│   │   └── ∅
│   └── 4 (+0)
└── 8 (+0)
    ├── 7 (+0)
    └── 9 (+0)
";
        assert_eq!(map.pretty().to_string(), expected);
    }
}
