//! `hgtmap` maps **H**orizontal **G**ene **T**ransfer across genomes, in the order of their phylogeny.
//!
//! ## Why hgtmap?
//!
//! 1. `hgtmap` _detects_ which genomes carry a curated set of genes.
//!
//!    Genes are split into two classes: those associated with horizontal gene transfer
//!    (HGT, ex. `mecA`, `tetM`) and those inherited vertically (VGT, ex. `gyrA`, `recA`).
//!    Presence is read from each genome's GFF annotation.
//!
//! 1. `hgtmap` _compares_ genomes gene by gene.
//!
//!    For every gene, a genome × genome matrix marks the pairs of genomes that both carry it.
//!
//! 1. `hgtmap` _orders_ everything by a phylogenetic tree.
//!
//!    Rows and columns follow the left-to-right leaf order of a Newick tree, so that
//!    genomes with shared ancestry sit next to each other. Vertically inherited genes
//!    form blocks along the diagonal, horizontally transferred genes break out of them.
//!
//! ## Pipeline
//!
//! ```text
//! annotation::load ─▶ presence::PresenceMatrix ─▶ comparison::generate ─▶ export
//!                                    ▲                                      ▲
//!                         genes::GeneSets                     order::TreeOrder (Newick)
//! ```
//!
//! ```rust
//! use hgtmap::annotation::{Genome, Record};
//! use hgtmap::{genes::GeneClass, presence::{Detector, PresenceMatrix}};
//!
//! let genomes = vec![
//!     Genome::from_records("G1", vec![Record::with_name("traA")]),
//!     Genome::from_records("G2", vec![Record::with_name("gyrA")]),
//! ];
//! let genes = vec!["traA".to_string()];
//! let presence = PresenceMatrix::build(GeneClass::Hgt, &genes, &genomes, &Detector::default());
//! assert_eq!(presence.column("traA"), Some(vec![true, false]));
//! ```

pub mod annotation;
pub mod cli;
pub mod comparison;
pub mod export;
pub mod genes;
pub mod order;
pub mod presence;
pub mod run;
pub mod table;
pub mod utils;

#[doc(inline)]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::genes::{GeneClass, GeneSets, MatchMode};
#[doc(inline)]
pub use crate::run::Summary;
#[doc(inline)]
pub use crate::table::Table;
#[doc(inline)]
pub use crate::utils::verbosity::Verbosity;
