//! Detect configured genes in genomes, and assemble the genome × gene [`PresenceMatrix`].

#[cfg(test)]
mod tests;

use crate::annotation::Genome;
use crate::genes::{GeneClass, MatchMode};
use crate::order::Permutation;
use crate::Table;
use color_eyre::eyre::{eyre, Report, Result};
use itertools::Itertools;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Detector

/// Decides whether a genome carries a gene, by matching the gene name against
/// the name and description of its annotation records.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Detector {
    pub mode: MatchMode,
}

impl Detector {
    pub fn new(mode: MatchMode) -> Self {
        Detector { mode }
    }

    /// Returns true if the text mentions the gene, according to the [`MatchMode`].
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use hgtmap::{presence::Detector, MatchMode};
    ///
    /// let token = Detector::new(MatchMode::Token);
    /// assert!(token.matches("tetA_2", "tetA"));
    /// assert!(token.matches("Tetracycline resistance protein TetA", "tetA"));
    /// assert!(!token.matches("tetAB", "tetA"));
    ///
    /// let substring = Detector::new(MatchMode::Substring);
    /// assert!(substring.matches("tetAB", "tetA"));
    /// ```
    pub fn matches(&self, text: &str, gene: &str) -> bool {
        let (text, gene) = (text.to_lowercase(), gene.trim().to_lowercase());
        if gene.is_empty() {
            return false;
        }
        let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric());
        match self.mode {
            MatchMode::Substring => text.contains(&gene),
            // every start position, a gene may overlap itself (ex. `aa` in `aaa aa`)
            MatchMode::Token => text.char_indices().any(|(start, _)| {
                text[start..].starts_with(&gene)
                    && !is_word(text[..start].chars().next_back())
                    && !is_word(text[start + gene.len()..].chars().next())
            }),
        }
    }

    /// Returns true if any annotation record of the genome mentions the gene.
    pub fn detect(&self, genome: &Genome, gene: &str) -> bool {
        let found = genome
            .records
            .iter()
            .find(|record| record.search_fields().any(|field| self.matches(field, gene)));
        if let Some(record) = found {
            debug!("{}: {gene} found in record {:?} ({:?})", genome.name, record.id, record.name);
        }
        found.is_some()
    }
}

// ----------------------------------------------------------------------------
// Presence Matrix

/// A genome × gene binary matrix for one [`GeneClass`].
///
/// Rows are genomes, columns are genes, and every cell is either present (`true`) or absent (`false`).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PresenceMatrix {
    pub class: GeneClass,
    /// Row names.
    pub genomes: Vec<String>,
    /// Column names.
    pub genes: Vec<String>,
    /// Cells, one row per genome and one value per gene.
    pub cells: Vec<Vec<bool>>,
}

impl PresenceMatrix {
    /// Detect every gene in every genome.
    ///
    /// Columns follow the order of `genes` (duplicates dropped, ignoring case), rows follow
    /// the order of `genomes`.
    /// An empty gene list gives a matrix with no columns but a row for every genome.
    ///
    /// ```rust
    /// use hgtmap::annotation::{Genome, Record};
    /// use hgtmap::{presence::{Detector, PresenceMatrix}, GeneClass};
    ///
    /// let genomes = vec![
    ///     Genome::from_records("G1", vec![Record::with_name("traA")]),
    ///     Genome::from_records("G2", vec![]),
    /// ];
    /// let presence = PresenceMatrix::build(GeneClass::Vgt, &[], &genomes, &Detector::default());
    /// assert_eq!(presence.genomes, ["G1", "G2"]);
    /// assert!(presence.genes.is_empty());
    /// ```
    pub fn build(
        class: GeneClass,
        genes: &[String],
        genomes: &[Genome],
        detector: &Detector,
    ) -> PresenceMatrix {
        let genes = genes.iter().unique_by(|g| g.to_lowercase()).cloned().collect_vec();
        if genes.is_empty() {
            warn!("No {class} genes are configured, the {class} presence matrix will have no columns.");
        }

        let cells = genomes
            .par_iter()
            .map(|genome| genes.iter().map(|gene| detector.detect(genome, gene)).collect_vec())
            .collect::<Vec<_>>();

        let presence = PresenceMatrix {
            class,
            genomes: genomes.iter().map(|g| g.name.clone()).collect(),
            genes,
            cells,
        };

        for gene in &presence.genes {
            let count = presence.count(gene).unwrap_or_default();
            info!("{class} {gene}: present in {count}/{} genome(s).", presence.genomes.len());
        }

        presence
    }

    /// Create a presence matrix from existing rows, checking the shape.
    pub fn from_rows(
        class: GeneClass,
        genomes: Vec<String>,
        genes: Vec<String>,
        cells: Vec<Vec<bool>>,
    ) -> Result<PresenceMatrix, Report> {
        if cells.len() != genomes.len() {
            return Err(eyre!("Presence matrix has {} rows for {} genomes.", cells.len(), genomes.len()));
        }
        if let Some(row) = cells.iter().find(|row| row.len() != genes.len()) {
            return Err(eyre!("Presence matrix row has {} values for {} genes.", row.len(), genes.len()));
        }
        Ok(PresenceMatrix { class, genomes, genes, cells })
    }

    fn genome_index(&self, genome: &str) -> Option<usize> {
        self.genomes.iter().position(|g| g == genome)
    }

    fn gene_index(&self, gene: &str) -> Option<usize> {
        self.genes.iter().position(|g| g == gene)
    }

    /// Returns the cell for a genome and gene, [`None`] if either is not in the matrix.
    pub fn get(&self, genome: &str, gene: &str) -> Option<bool> {
        Some(self.cells[self.genome_index(genome)?][self.gene_index(gene)?])
    }

    /// Returns the row of a genome.
    pub fn row(&self, genome: &str) -> Option<&[bool]> {
        self.genome_index(genome).map(|i| self.cells[i].as_slice())
    }

    /// Returns the presence vector of a gene across all genomes, in row order.
    pub fn column(&self, gene: &str) -> Option<Vec<bool>> {
        let j = self.gene_index(gene)?;
        Some(self.cells.iter().map(|row| row[j]).collect())
    }

    /// Returns the number of genomes carrying a gene.
    pub fn count(&self, gene: &str) -> Option<usize> {
        Some(self.column(gene)?.into_iter().filter(|p| *p).count())
    }

    /// Returns the matrix with rows selected and ordered by a [`Permutation`] of its genomes.
    pub fn reorder(&self, permutation: &Permutation) -> Result<PresenceMatrix, Report> {
        Ok(PresenceMatrix {
            class: self.class,
            genomes: permutation.apply(&self.genomes)?,
            genes: self.genes.clone(),
            cells: permutation.apply(&self.cells)?,
        })
    }

    /// Returns the matrix as a table with a `Genome` column and `0`/`1` values.
    pub fn to_table(&self) -> Result<Table<String>, Report> {
        let mut table = Table::new();
        table.headers = std::iter::once("Genome".to_string()).chain(self.genes.iter().cloned()).collect();
        for (genome, row) in self.genomes.iter().zip(&self.cells) {
            let values = row.iter().map(|p| u8::from(*p).to_string());
            table.add_row(std::iter::once(genome.clone()).chain(values).collect())?;
        }
        Ok(table)
    }
}
