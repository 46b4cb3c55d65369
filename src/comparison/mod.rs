//! Pairwise genome × genome comparison matrices, one per gene.


use crate::genes::GeneClass;
use crate::order::Permutation;
use crate::presence::PresenceMatrix;
use crate::Table;
use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Help;
use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A square matrix marking the pairs of genomes that both carry a gene.
///
/// `cells[i][j]` is true when genome `i` and genome `j` both carry the gene, so the
/// matrix is symmetric and its diagonal is the presence of the gene in each genome.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ComparisonMatrix {
    pub class: GeneClass,
    pub gene: String,
    /// Row and column names.
    pub genomes: Vec<String>,
    pub cells: Vec<Vec<bool>>,
}

impl ComparisonMatrix {
    /// Derive the comparison matrix of one gene from a presence matrix.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use hgtmap::{comparison::ComparisonMatrix, presence::PresenceMatrix, GeneClass};
    ///
    /// let genomes = ["G1", "G2", "G3"].map(String::from).to_vec();
    /// let genes = vec!["traA".to_string()];
    /// let cells = vec![vec![true], vec![false], vec![true]];
    /// let presence = PresenceMatrix::from_rows(GeneClass::Hgt, genomes, genes, cells)?;
    ///
    /// let comparison = ComparisonMatrix::from_presence(&presence, "traA")?;
    /// assert_eq!(comparison.get("G1", "G3"), Some(true));
    /// assert_eq!(comparison.get("G1", "G2"), Some(false));
    /// assert_eq!(comparison.diagonal(), [true, false, true]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn from_presence(presence: &PresenceMatrix, gene: &str) -> Result<ComparisonMatrix, Report> {
        let column = presence.column(gene).ok_or_else(|| {
            eyre!("Gene {gene} is not a column of the {} presence matrix.", presence.class)
                .suggestion(format!("Available genes: {}", presence.genes.iter().join(", ")))
        })?;
        let cells = column.iter().map(|a| column.iter().map(|b| *a && *b).collect()).collect();

        Ok(ComparisonMatrix {
            class: presence.class,
            gene: gene.to_string(),
            genomes: presence.genomes.clone(),
            cells,
        })
    }

    /// Returns the cell for a pair of genomes, [`None`] if either is not in the matrix.
    pub fn get(&self, a: &str, b: &str) -> Option<bool> {
        let i = self.genomes.iter().position(|g| g == a)?;
        let j = self.genomes.iter().position(|g| g == b)?;
        Some(self.cells[i][j])
    }

    pub fn diagonal(&self) -> Vec<bool> {
        self.cells.iter().enumerate().map(|(i, row)| row[i]).collect()
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.cells.len();
        (0..n).cartesian_product(0..n).all(|(i, j)| self.cells[i][j] == self.cells[j][i])
    }

    /// Returns the matrix with rows and columns selected and ordered by a [`Permutation`].
    pub fn reorder(&self, permutation: &Permutation) -> Result<ComparisonMatrix, Report> {
        Ok(ComparisonMatrix {
            class: self.class,
            gene: self.gene.clone(),
            genomes: permutation.apply(&self.genomes)?,
            cells: permutation.apply_square(&self.cells)?,
        })
    }

    /// Returns the matrix as a table with a `Genome` corner cell and `0`/`1` values.
    pub fn to_table(&self) -> Result<Table<String>, Report> {
        let mut table = Table::new();
        table.headers = std::iter::once("Genome".to_string()).chain(self.genomes.iter().cloned()).collect();
        for (genome, row) in self.genomes.iter().zip(&self.cells) {
            let values = row.iter().map(|p| u8::from(*p).to_string());
            table.add_row(std::iter::once(genome.clone()).chain(values).collect())?;
        }
        Ok(table)
    }
}

/// Generate the comparison matrix of every gene of a presence matrix, in column order.
pub fn generate(presence: &PresenceMatrix) -> Result<Vec<ComparisonMatrix>, Report> {
    presence
        .genes
        .par_iter()
        .map(|gene| {
            debug!("Generating {} comparison matrix: {gene}", presence.class);
            ComparisonMatrix::from_presence(presence, gene)
        })
        .collect()
}
