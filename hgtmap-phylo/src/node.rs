use crate::{Branch, FromNewick, ToNewick};
use color_eyre::eyre::{Report, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt::{Display, Formatter};

/// A [`Node`] in the [`Tree`](crate::Tree), with the [`Branch`] leading to it.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Node {
    /// [`Node`] label, the genome name for tips. Empty for unnamed internal nodes.
    pub label: String,
    /// [`Branch`] from the parent to this node.
    pub branch: Branch,
}

#[rustfmt::skip]
impl Display for Node { fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.label) } }

impl Node {
    /// Returns a [`Node`] with a label and an empty [`Branch`].
    pub fn new(label: &str) -> Self {
        Node { label: label.to_string(), branch: Branch::new() }
    }
}

impl FromNewick for Node {
    /// Returns a [`Node`] created from a [Newick](https://en.wikipedia.org/wiki/Newick_format) node [`str`].
    ///
    /// ## Examples
    ///
    /// Just a node name.
    ///
    /// ```rust
    /// use hgtmap_phylo::{Node, FromNewick};
    /// let node = Node::from_newick(&"A;")?;
    /// assert_eq!(node, Node::new("A"));
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    ///
    /// A node name and branch attributes.
    ///
    /// ```rust
    /// use hgtmap_phylo::{Branch, Node, FromNewick};
    /// let node = Node::from_newick(&"A:2:90;")?;
    /// assert_eq!(node.label, "A");
    /// assert_eq!(node.branch, Branch { length: 2.0, confidence: 90.0 });
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn from_newick(newick: &str) -> Result<Self, Report> {
        let newick = newick.replace(';', "");
        let label = newick.split(':').next().unwrap_or_default().trim().to_string();
        let branch = Branch::from_newick(&newick)?;
        Ok(Node { label, branch })
    }
}

impl ToNewick for Node {
    /// Returns the label followed by the branch suffix, quoting labels with special characters.
    ///
    /// ```rust
    /// use hgtmap_phylo::{Node, ToNewick};
    /// assert_eq!(Node::new("E. coli, K-12").to_newick()?, "'E. coli, K-12'");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn to_newick(&self) -> Result<String, Report> {
        let special = |c: char| "(),:;[]'".contains(c) || c.is_whitespace();
        let label = match self.label.chars().any(special) {
            true => format!("'{}'", self.label.replace('\'', "''")),
            false => self.label.clone(),
        };
        Ok(format!("{label}{}", self.branch.to_newick()?))
    }
}
