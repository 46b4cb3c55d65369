//! Run the batch pipeline: load annotations, build matrices, order them by the tree and write them.

#[cfg(test)]
mod tests;

use crate::annotation::{self, Annotations, Skipped};
use crate::comparison;
use crate::export;
use crate::genes::{GeneClass, GeneSets, MatchMode};
use crate::order::TreeOrder;
use crate::presence::{Detector, PresenceMatrix};
use clap::Parser;
use color_eyre::eyre::{Report, Result, WrapErr};
use hgtmap_phylo::Tree;
use itertools::Itertools;
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

// ----------------------------------------------------------------------------
// Args

/// Build gene presence and comparison matrices, ordered by a phylogenetic tree.
#[derive(Clone, Debug, Deserialize, Parser, Serialize)]
#[clap(verbatim_doc_comment)]
pub struct Args {
    /// Input directory.
    ///
    /// Holds one subdirectory per genome with a GFF annotation file (.gff, .gff3),
    /// or the annotation files themselves.
    #[clap(short = 'i', long, required = true)]
    pub input_dir: PathBuf,

    /// Newick tree file, with genome names as leaf labels.
    #[clap(long, required = true)]
    pub tree: PathBuf,

    /// Output directory.
    ///
    /// If the directory does not exist, it will be created.
    #[clap(short = 'o', long, required = true)]
    pub output_dir: PathBuf,

    /// JSON file of HGT and VGT genes, ex. {"hgt": ["mecA"], "vgt": ["gyrA"]}.
    ///
    /// If not provided, the built-in gene sets are used.
    #[clap(short = 'g', long)]
    pub genes: Option<PathBuf>,

    /// How gene names are matched against annotation names and descriptions.
    #[clap(short = 'm', long, value_enum, default_value_t = Args::default().match_mode)]
    pub match_mode: MatchMode,

    /// Number of CPU threads to use.
    #[clap(short = 't', long, default_value_t = Args::default().threads)]
    #[serde(skip)]
    pub threads: usize,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            input_dir: PathBuf::new(),
            tree: PathBuf::new(),
            output_dir: PathBuf::new(),
            genes: None,
            match_mode: MatchMode::default(),
            threads: 1,
        }
    }
}

// ----------------------------------------------------------------------------
// Summary

/// How many genomes carry a gene.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GeneCount {
    pub gene: String,
    pub genomes: usize,
}

/// The outputs of one [`GeneClass`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ClassSummary {
    pub class: GeneClass,
    pub genes: Vec<GeneCount>,
    /// Presence matrix, relative to the output directory.
    pub presence_matrix: PathBuf,
    /// Comparison matrices, relative to the output directory.
    pub comparison_matrices: Vec<PathBuf>,
}

/// What a run loaded, left out and wrote.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Summary {
    pub version: String,
    pub match_mode: MatchMode,
    /// Loaded genomes, in load order.
    pub genomes: Vec<String>,
    pub skipped: Vec<Skipped>,
    pub malformed_lines: usize,
    pub tree_leaves: usize,
    /// Genomes in tree order, the row order of every matrix.
    pub tree_order: Vec<String>,
    /// Tree leaves with no loaded genome.
    pub unmatched_leaves: Vec<String>,
    /// Loaded genomes that are not in the tree.
    pub unmatched_genomes: Vec<String>,
    pub classes: Vec<ClassSummary>,
}

impl Summary {
    /// Log the genomes and entries that were left out of the matrices.
    pub fn log(&self) {
        info!(
            "Summary: {} genome(s) loaded, {} in tree order, {} skipped, {} malformed annotation line(s).",
            self.genomes.len(),
            self.tree_order.len(),
            self.skipped.len(),
            self.malformed_lines
        );
        for skipped in &self.skipped {
            warn!("Skipped genome {}: {}", skipped.name, skipped.reason);
        }
        if !self.unmatched_leaves.is_empty() {
            warn!("Excluded tree leaves: {}", self.unmatched_leaves.iter().join(", "));
        }
        if !self.unmatched_genomes.is_empty() {
            warn!("Excluded genomes: {}", self.unmatched_genomes.iter().join(", "));
        }
        for class in &self.classes {
            info!(
                "{}: {} gene(s), {} comparison matri(ces).",
                class.class,
                class.genes.len(),
                class.comparison_matrices.len()
            );
        }
    }
}

// ----------------------------------------------------------------------------
// Run

/// Run the pipeline from files on disk.
///
/// A genome that cannot be loaded is skipped, a tree that cannot be parsed is an error.
pub fn run(args: &Args) -> Result<Summary, Report> {
    let genes = match &args.genes {
        Some(path) => GeneSets::read(path)?,
        None => GeneSets::default(),
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()
        .wrap_err_with(|| format!("Failed to create a pool of {} thread(s).", args.threads))?;

    pool.install(|| {
        let annotations = annotation::load(&args.input_dir)?;
        let tree = Tree::read(&args.tree)?;
        run_with(&annotations, &tree, &genes, args.match_mode, &args.output_dir)
    })
}

/// Run the pipeline on genomes and a tree already in memory, writing to `output_dir`.
///
/// Gene sets that fail [`GeneSets::validate`] are an error, before anything is written.
pub fn run_with(
    annotations: &Annotations,
    tree: &Tree,
    genes: &GeneSets,
    mode: MatchMode,
    output_dir: &Path,
) -> Result<Summary, Report> {
    genes.validate()?;
    for (class, gene) in genes.duplicates() {
        warn!("{class} gene listed more than once, it will have a single column: {gene}");
    }
    let detector = Detector::new(mode);
    if mode == MatchMode::Substring {
        for (gene, other) in genes.collisions() {
            warn!("Gene {gene} is a substring of gene {other}, {other} will also be detected as {gene}.");
        }
    }

    // presence
    let presences = GeneClass::iter()
        .map(|class| PresenceMatrix::build(class, &genes.genes(class), &annotations.genomes, &detector))
        .collect_vec();

    // order
    info!("Tree: {} leaves, depth {}.", tree.leaf_count(), tree.depth());
    let resolution = TreeOrder::resolve(tree, &annotations.names());
    if resolution.order.is_empty() {
        warn!("No loaded genome is a leaf of the tree, all matrices will be empty.");
    }

    // comparison and export
    info!("Writing matrices: {output_dir:?}");
    let mut classes = Vec::new();
    for presence in &presences {
        let presence_path = export::write_presence(presence, &resolution.order, output_dir)?;
        let comparison_paths = comparison::generate(presence)?
            .par_iter()
            .map(|comparison| export::write_comparison(comparison, &resolution.order, output_dir))
            .collect::<Result<Vec<_>, Report>>()?;

        classes.push(ClassSummary {
            class: presence.class,
            genes: presence
                .genes
                .iter()
                .map(|gene| GeneCount { gene: gene.clone(), genomes: presence.count(gene).unwrap_or_default() })
                .collect(),
            presence_matrix: relative_to(&presence_path, output_dir),
            comparison_matrices: comparison_paths.iter().map(|p| relative_to(p, output_dir)).collect(),
        });
    }

    let summary = Summary {
        version: env!("CARGO_PKG_VERSION").to_string(),
        match_mode: mode,
        genomes: annotations.names(),
        skipped: annotations.skipped.clone(),
        malformed_lines: annotations.malformed_lines,
        tree_leaves: tree.leaf_count(),
        tree_order: resolution.order.names().to_vec(),
        unmatched_leaves: resolution.unmatched_leaves,
        unmatched_genomes: resolution.unmatched_genomes,
        classes,
    };

    export::write_tree_order(&resolution.order, output_dir)?;
    export::write_summary(&summary, output_dir)?;
    summary.log();

    Ok(summary)
}

fn relative_to(path: &Path, dir: &Path) -> PathBuf {
    path.strip_prefix(dir).map(Path::to_path_buf).unwrap_or_else(|_| path.to_path_buf())
}
