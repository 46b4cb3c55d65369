//! Phylogenetic trees read from [Newick](https://en.wikipedia.org/wiki/Newick_format) text.
//!
//! The [`Tree`] is an immutable tagged-variant structure: a [`Tree::Leaf`] or a
//! [`Tree::Clade`] with ordered children. Its main use is [`Tree::leaves`], the
//! depth-first, left-to-right order of tip names.
//!
//! ```rust
//! use hgtmap_phylo::{FromNewick, Tree};
//! let tree = Tree::from_newick("(G2,(G1,G3));")?;
//! assert_eq!(tree.leaves(), ["G2", "G1", "G3"]);
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```

use color_eyre::eyre::{Report, Result};

mod branch;
pub mod newick;
mod node;
mod tree;

#[doc(inline)]
pub use branch::Branch;
#[doc(inline)]
pub use node::Node;
#[doc(inline)]
pub use tree::Tree;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Returns an object created from a [Newick](https://en.wikipedia.org/wiki/Newick_format) [`str`].
pub trait FromNewick {
    fn from_newick(newick: &str) -> Result<Self, Report>
    where
        Self: Sized;
}

/// Returns a [Newick](https://en.wikipedia.org/wiki/Newick_format) [`str`] created from an object.
pub trait ToNewick {
    fn to_newick(&self) -> Result<String, Report>;
}
