//! Reconcile the leaf order of a phylogeny with the loaded genomes.
//!
//! The [`TreeOrder`] is the left-to-right leaf order of the tree, restricted to genomes
//! that were loaded. A [`Permutation`] maps the rows (and columns) of a matrix into it.


use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Help;
use hgtmap_phylo::Tree;
use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ----------------------------------------------------------------------------
// Tree Order

/// Genome names in the left-to-right leaf order of a tree.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TreeOrder {
    names: Vec<String>,
}

/// The outcome of reconciling a tree with the loaded genomes.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Resolution {
    /// Tree leaves that are loaded genomes, in leaf order.
    pub order: TreeOrder,
    /// Tree leaves with no loaded genome.
    pub unmatched_leaves: Vec<String>,
    /// Loaded genomes that are not leaves of the tree.
    pub unmatched_genomes: Vec<String>,
}

impl TreeOrder {
    /// Resolve the order of `genomes` from the leaves of `tree`.
    ///
    /// Leaves and genomes without a counterpart are excluded from the order and reported.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use hgtmap::order::TreeOrder;
    /// use hgtmap_phylo::Tree;
    ///
    /// let tree: Tree = "(G2,(G1,(G3,G9)));".parse()?;
    /// let genomes = ["G1", "G2", "G3", "G4"].map(String::from);
    /// let resolution = TreeOrder::resolve(&tree, &genomes);
    /// assert_eq!(resolution.order.names(), ["G2", "G1", "G3"]);
    /// assert_eq!(resolution.unmatched_leaves, ["G9"]);
    /// assert_eq!(resolution.unmatched_genomes, ["G4"]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn resolve(tree: &Tree, genomes: &[String]) -> Resolution {
        let leaves = tree.leaves();
        let loaded: HashSet<&str> = genomes.iter().map(String::as_str).collect();
        let in_tree: HashSet<&str> = leaves.iter().copied().collect();

        let (matched, unmatched_leaves): (Vec<_>, Vec<_>) =
            leaves.iter().map(|l| l.to_string()).partition(|l| loaded.contains(l.as_str()));
        let unmatched_genomes =
            genomes.iter().filter(|g| !in_tree.contains(g.as_str())).cloned().collect_vec();

        info!("Tree order: {} of {} leaves matched to loaded genomes.", matched.len(), leaves.len());
        if !unmatched_leaves.is_empty() {
            warn!(
                "{} tree leaves have no loaded genome and are excluded: {}",
                unmatched_leaves.len(),
                unmatched_leaves.iter().join(", ")
            );
        }
        if !unmatched_genomes.is_empty() {
            warn!(
                "{} genomes are not in the tree and are excluded: {}",
                unmatched_genomes.len(),
                unmatched_genomes.iter().join(", ")
            );
        }

        Resolution { order: TreeOrder { names: matched }, unmatched_leaves, unmatched_genomes }
    }

    /// Returns the genome names, in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the permutation that selects and orders `genomes` (the row names of
    /// a matrix) into this tree order.
    ///
    /// Genomes absent from the order are dropped; every name in the order must be present.
    ///
    /// ```rust
    /// use hgtmap::order::TreeOrder;
    /// use hgtmap_phylo::Tree;
    ///
    /// let genomes = ["A", "B", "C"].map(String::from);
    /// let tree: Tree = "((B,C),A);".parse()?;
    /// let order = TreeOrder::resolve(&tree, &genomes).order;
    /// let permutation = order.permutation(&genomes)?;
    /// assert_eq!(permutation.indices(), [1, 2, 0]);
    /// assert_eq!(permutation.apply(&genomes)?, ["B", "C", "A"]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn permutation(&self, genomes: &[String]) -> Result<Permutation, Report> {
        let index: HashMap<&str, usize> =
            genomes.iter().enumerate().map(|(i, g)| (g.as_str(), i)).collect();
        let indices = self
            .names
            .iter()
            .map(|name| {
                index.get(name.as_str()).copied().ok_or_else(|| {
                    eyre!("Genome {name} of the tree order is not in the matrix.")
                        .suggestion("Resolve the tree order against the same genomes as the matrix.")
                })
            })
            .collect::<Result<Vec<_>, Report>>()?;
        Permutation::new(indices, genomes.len())
    }
}

impl From<Vec<String>> for TreeOrder {
    fn from(names: Vec<String>) -> Self {
        TreeOrder { names }
    }
}

// ----------------------------------------------------------------------------
// Permutation

/// Maps the rows of a source matrix into a new order.
///
/// Position `k` of the result holds the source row `indices[k]`. Source rows that
/// are not referenced are dropped.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Permutation {
    indices: Vec<usize>,
    source_len: usize,
}

impl Permutation {
    /// Create a permutation over a source of `source_len` rows.
    ///
    /// Fails if an index is out of range or repeated.
    pub fn new(indices: Vec<usize>, source_len: usize) -> Result<Permutation, Report> {
        if let Some(i) = indices.iter().find(|i| **i >= source_len) {
            return Err(eyre!("Permutation index {i} is out of range for {source_len} rows."));
        }
        if let Some(i) = indices.iter().duplicates().next() {
            return Err(eyre!("Permutation index {i} is used more than once."));
        }
        Ok(Permutation { indices, source_len })
    }

    /// Returns the identity permutation of `len` rows.
    pub fn identity(len: usize) -> Self {
        Permutation { indices: (0..len).collect(), source_len: len }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of rows in the result.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns true if every source row is kept.
    pub fn is_complete(&self) -> bool {
        self.indices.len() == self.source_len
    }

    fn check_len(&self, len: usize) -> Result<(), Report> {
        if len != self.source_len {
            return Err(eyre!("Permutation expects {} rows but the matrix has {len}.", self.source_len));
        }
        Ok(())
    }

    /// Returns the items in permuted order.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Result<Vec<T>, Report> {
        self.check_len(items.len())?;
        Ok(self.indices.iter().map(|i| items[*i].clone()).collect())
    }

    /// Returns the rows of a matrix in permuted order, leaving columns untouched.
    pub fn apply_rows<T: Clone>(&self, rows: &[Vec<T>]) -> Result<Vec<Vec<T>>, Report> {
        self.apply(rows)
    }

    /// Returns a square matrix with both rows and columns in permuted order.
    pub fn apply_square<T: Clone>(&self, cells: &[Vec<T>]) -> Result<Vec<Vec<T>>, Report> {
        self.check_len(cells.len())?;
        self.indices
            .iter()
            .map(|i| {
                let row = &cells[*i];
                self.check_len(row.len())?;
                Ok(self.indices.iter().map(|j| row[*j].clone()).collect())
            })
            .collect()
    }

    /// Returns the permutation that restores the source order.
    ///
    /// Only a complete permutation has an inverse.
    ///
    /// ```rust
    /// use hgtmap::order::Permutation;
    ///
    /// let permutation = Permutation::new(vec![2, 0, 1], 3)?;
    /// let items = permutation.apply(&["A", "B", "C"])?;
    /// assert_eq!(items, ["C", "A", "B"]);
    /// assert_eq!(permutation.inverse()?.apply(&items)?, ["A", "B", "C"]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn inverse(&self) -> Result<Permutation, Report> {
        if !self.is_complete() {
            return Err(eyre!(
                "Permutation keeps {} of {} rows and cannot be inverted.",
                self.indices.len(),
                self.source_len
            ));
        }
        let mut indices = vec![0; self.source_len];
        for (k, i) in self.indices.iter().enumerate() {
            indices[*i] = k;
        }
        Ok(Permutation { indices, source_len: self.source_len })
    }
}
