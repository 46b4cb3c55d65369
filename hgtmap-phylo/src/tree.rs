use crate::{newick, FromNewick, Node, ToNewick};

use color_eyre::eyre::{Report, Result, WrapErr};
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

/// A rooted phylogenetic [`Tree`] with ordered children.
///
/// ```mermaid
/// graph LR;
/// root-->G2;
/// root-->X;
/// X-->G1;
/// X-->G3;
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Tree {
    /// A tip of the tree, typically a genome.
    Leaf(Node),
    /// An internal node and its children, in the order they were written.
    Clade { node: Node, children: Vec<Tree> },
}

impl Tree {
    /// Returns the [`Node`] at the top of this (sub)tree.
    pub fn node(&self) -> &Node {
        match self {
            Tree::Leaf(node) => node,
            Tree::Clade { node, .. } => node,
        }
    }

    /// Returns the label of the [`Node`] at the top of this (sub)tree.
    pub fn label(&self) -> &str {
        &self.node().label
    }

    /// Returns the immediate children, empty for a [`Tree::Leaf`].
    pub fn children(&self) -> &[Tree] {
        match self {
            Tree::Leaf(_) => &[],
            Tree::Clade { children, .. } => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Tree::Leaf(_))
    }

    /// Returns the leaf labels in depth-first, left-to-right order.
    ///
    /// Sister taxa end up adjacent, which is what makes this order useful for
    /// laying out matrices.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use hgtmap_phylo::{FromNewick, Tree};
    /// let tree = Tree::from_newick("((B,C),A);")?;
    /// assert_eq!(tree.leaves(), ["B", "C", "A"]);
    ///
    /// let tree = Tree::from_newick("(A:0.1,(B:0.2,(C,D)E:0.3)F)root;")?;
    /// assert_eq!(tree.leaves(), ["A", "B", "C", "D"]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];

        while let Some(tree) = stack.pop() {
            match tree {
                Tree::Leaf(node) => leaves.push(node.label.as_str()),
                // push in reverse so the leftmost child is visited first
                Tree::Clade { children, .. } => stack.extend(children.iter().rev()),
            }
        }

        leaves
    }

    /// Returns the number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Returns the number of edges on the longest root-to-tip path.
    ///
    /// ```rust
    /// use hgtmap_phylo::{FromNewick, Tree};
    /// assert_eq!(Tree::from_newick("A;")?.depth(), 0);
    /// assert_eq!(Tree::from_newick("(A,(B,C));")?.depth(), 2);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack = vec![(self, 0)];
        while let Some((tree, d)) = stack.pop() {
            depth = depth.max(d);
            stack.extend(tree.children().iter().map(|child| (child, d + 1)));
        }
        depth
    }

    /// Read a [`Tree`] from a Newick file.
    pub fn read(path: &Path) -> Result<Tree, Report> {
        let newick = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read tree file: {path:?}."))?;
        Tree::from_newick(&newick).wrap_err_with(|| format!("Failed to parse tree file: {path:?}."))
    }
}

impl FromNewick for Tree {
    /// Returns a [`Tree`] created from a [Newick](https://en.wikipedia.org/wiki/Newick_format) string.
    ///
    /// See [`newick::parse`] for the accepted syntax and the failure cases.
    fn from_newick(newick: &str) -> Result<Tree, Report> {
        newick::parse(newick)
    }
}

impl ToNewick for Tree {
    /// Returns a [Newick](https://en.wikipedia.org/wiki/Newick_format) string, terminated by `;`.
    ///
    /// ```rust
    /// use hgtmap_phylo::{FromNewick, ToNewick, Tree};
    /// let newick = "(A:0.1,(B,C)X:0.5)root;";
    /// assert_eq!(Tree::from_newick(newick)?.to_newick()?, newick);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn to_newick(&self) -> Result<String, Report> {
        fn subtree(tree: &Tree) -> Result<String, Report> {
            match tree {
                Tree::Leaf(node) => node.to_newick(),
                Tree::Clade { node, children } => {
                    let children = children.iter().map(subtree).collect::<Result<Vec<_>, Report>>()?;
                    Ok(format!("({}){}", children.iter().join(","), node.to_newick()?))
                }
            }
        }
        Ok(format!("{};", subtree(self)?))
    }
}

impl FromStr for Tree {
    type Err = Report;
    fn from_str(s: &str) -> Result<Self, Report> {
        Tree::from_newick(s)
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let newick = self.to_newick().map_err(|_| std::fmt::Error)?;
        write!(f, "{newick}")
    }
}
