//! Gene classes, the configured gene sets, and how gene names are matched.


use crate::{export, Table};
use clap::{Parser, ValueEnum};
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use structdoc::StructDoc;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Genes associated with horizontal transfer, used when no gene file is given.
pub const HGT_GENES: &[&str] = &["mecA", "cmlA", "tetA", "tetM", "vanA"];
/// Genes inherited by vertical descent, used when no gene file is given.
pub const VGT_GENES: &[&str] = &["gapA", "gyrA", "gyrB", "recA", "rpoB"];

// ----------------------------------------------------------------------------
// Gene Class

/// The class of a gene, by mode of transfer.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize, ValueEnum,
)]
pub enum GeneClass {
    /// Horizontal gene transfer
    #[serde(rename = "hgt")]
    #[strum(serialize = "HGT")]
    Hgt,
    /// Vertical gene transfer
    #[serde(rename = "vgt")]
    #[strum(serialize = "VGT")]
    Vgt,
}

impl GeneClass {
    /// Returns the lowercase name, used for output directories (ex. `hgt`).
    pub fn dir_name(&self) -> String {
        self.to_string().to_lowercase()
    }
}

// ----------------------------------------------------------------------------
// Match Mode

/// How a configured gene name is matched against annotation text.
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive match of a whole token (ex. `tetA` matches `tetA_2`, not `tetAB`).
    #[default]
    #[strum(serialize = "token")]
    Token,
    /// Case-insensitive substring containment (ex. `tetA` also matches `tetAB`).
    #[strum(serialize = "substring")]
    Substring,
}

// ----------------------------------------------------------------------------
// Gene Sets

/// The target genes of each [`GeneClass`].
///
/// Read from a JSON file such as:
///
/// ```json
/// { "hgt": ["mecA", "tetM"], "vgt": ["gyrA", "recA"] }
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, StructDoc)]
pub struct GeneSets {
    /// Genes associated with horizontal gene transfer.
    #[serde(default)]
    pub hgt: Vec<String>,
    /// Genes inherited by vertical descent.
    #[serde(default)]
    pub vgt: Vec<String>,
}

impl Default for GeneSets {
    /// Returns the built-in [`HGT_GENES`] and [`VGT_GENES`].
    fn default() -> Self {
        GeneSets {
            hgt: HGT_GENES.iter().map(|g| g.to_string()).collect(),
            vgt: VGT_GENES.iter().map(|g| g.to_string()).collect(),
        }
    }
}

impl GeneSets {
    /// Returns gene sets with no genes in either class.
    pub fn new() -> Self {
        GeneSets { hgt: Vec::new(), vgt: Vec::new() }
    }

    /// Returns the genes of a class as configured, including any duplicates.
    pub fn get(&self, class: GeneClass) -> &[String] {
        match class {
            GeneClass::Hgt => &self.hgt,
            GeneClass::Vgt => &self.vgt,
        }
    }

    /// Returns the genes of a class in configuration order, trimmed, without blanks or
    /// duplicates. Duplicates are found ignoring case, the first spelling is kept.
    ///
    /// ```rust
    /// use hgtmap::{GeneClass, GeneSets};
    /// let genes = GeneSets { hgt: vec!["mecA".into(), " tetM ".into(), "MecA".into(), "".into()], vgt: vec![] };
    /// assert_eq!(genes.genes(GeneClass::Hgt), ["mecA", "tetM"]);
    /// assert!(genes.genes(GeneClass::Vgt).is_empty());
    /// ```
    pub fn genes(&self, class: GeneClass) -> Vec<String> {
        self.configured(class).unique_by(|g| g.to_lowercase()).map(String::from).collect()
    }

    fn configured(&self, class: GeneClass) -> impl Iterator<Item = &str> {
        self.get(class).iter().map(|g| g.trim()).filter(|g| !g.is_empty())
    }

    /// Returns the genes listed more than once within a class, ignoring case, each once.
    ///
    /// ```rust
    /// use hgtmap::{GeneClass, GeneSets};
    /// let genes = GeneSets { hgt: vec!["tetA".into(), "TetA".into(), "tetA".into()], vgt: vec!["gyrA".into()] };
    /// let duplicates = genes.duplicates();
    /// assert_eq!(duplicates.len(), 1);
    /// assert_eq!(duplicates[0].0, GeneClass::Hgt);
    /// ```
    pub fn duplicates(&self) -> Vec<(GeneClass, String)> {
        GeneClass::iter()
            .flat_map(|class| {
                self.configured(class)
                    .duplicates_by(|g| g.to_lowercase())
                    .map(move |g| (class, g.to_string()))
                    .collect_vec()
            })
            .collect()
    }

    /// Read gene sets from a JSON file.
    ///
    /// A class missing from the file has no genes. The gene sets must pass [`GeneSets::validate`].
    pub fn read(path: &Path) -> Result<GeneSets, Report> {
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read gene file: {path:?}."))?;
        let genes: GeneSets = serde_json::from_str(&json)
            .wrap_err_with(|| format!("Failed to parse gene file: {path:?}."))
            .suggestion("The gene file should look like: {\"hgt\": [\"mecA\"], \"vgt\": [\"gyrA\"]}")?;
        genes.validate().wrap_err_with(|| format!("Invalid gene file: {path:?}."))?;
        Ok(genes)
    }

    /// Check that the two classes are disjoint, ignoring case, and that no two genes of a
    /// class are written to the same comparison matrix file.
    ///
    /// ```rust
    /// use hgtmap::GeneSets;
    /// assert!(GeneSets::default().validate().is_ok());
    /// let genes = GeneSets { hgt: vec!["recA".into()], vgt: vec!["RecA".into()] };
    /// assert!(genes.validate().is_err());
    /// let genes = GeneSets { hgt: vec!["bla/TEM".into(), "bla_TEM".into()], vgt: vec![] };
    /// assert!(genes.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), Report> {
        let (hgt, vgt) = (self.genes(GeneClass::Hgt), self.genes(GeneClass::Vgt));

        let shared = hgt.iter().filter(|h| vgt.iter().any(|v| v.eq_ignore_ascii_case(h))).collect_vec();
        if !shared.is_empty() {
            return Err(eyre!("Genes are configured as both HGT and VGT: {}", shared.iter().join(", "))
                .suggestion("Each gene must belong to exactly one class."));
        }

        // file names are compared ignoring case, for case-insensitive file systems
        for (class, genes) in [(GeneClass::Hgt, &hgt), (GeneClass::Vgt, &vgt)] {
            let clashes = genes
                .iter()
                .into_group_map_by(|g| export::file_safe(g).to_lowercase())
                .into_values()
                .filter(|group| group.len() > 1)
                .map(|group| group.iter().join(" and "))
                .sorted()
                .collect_vec();
            if !clashes.is_empty() {
                return Err(eyre!(
                    "{class} genes would share a comparison matrix file: {}",
                    clashes.join(", ")
                )
                .suggestion("Gene names must differ by more than case or the characters / \\ : * ? \" < > |"));
            }
        }

        Ok(())
    }

    /// Returns pairs of configured genes where the first is a substring of the second,
    /// ignoring case. These pairs produce false positives under [`MatchMode::Substring`].
    ///
    /// ```rust
    /// use hgtmap::GeneSets;
    /// let genes = GeneSets { hgt: vec!["tetA".into(), "tetAB".into()], vgt: vec!["gyrA".into()] };
    /// assert_eq!(genes.collisions(), [("tetA".to_string(), "tetAB".to_string())]);
    /// assert!(GeneSets::default().collisions().is_empty());
    /// ```
    pub fn collisions(&self) -> Vec<(String, String)> {
        let genes = GeneClass::iter().flat_map(|class| self.genes(class)).collect_vec();
        genes
            .iter()
            .cartesian_product(genes.iter())
            .filter(|(a, b)| {
                let (a, b) = (a.to_lowercase(), b.to_lowercase());
                a != b && b.contains(&a)
            })
            .map(|(a, b)| (a.clone(), b.clone()))
            .collect()
    }

    /// Returns the gene sets as a table of class and gene, optionally for one class only.
    pub fn to_table(&self, class: Option<GeneClass>) -> Result<Table<String>, Report> {
        let mut table = Table::new();
        table.headers = vec!["Class".to_string(), "Gene".to_string()];
        for c in GeneClass::iter().filter(|c| class.is_none() || class == Some(*c)) {
            for gene in self.genes(c) {
                table.add_row(vec![c.to_string(), gene])?;
            }
        }
        Ok(table)
    }
}

// ----------------------------------------------------------------------------
// List

/// List the genes of each class.
#[derive(Clone, Debug, Default, Deserialize, Parser, Serialize)]
#[clap(verbatim_doc_comment)]
pub struct ListArgs {
    /// JSON file of HGT and VGT genes.
    ///
    /// If not provided, the built-in gene sets are listed.
    #[clap(short = 'g', long)]
    pub genes: Option<PathBuf>,

    /// Only list the genes of this class.
    #[clap(short = 'c', long, value_enum)]
    pub class: Option<GeneClass>,

    /// Describe the gene file format instead of listing genes.
    #[clap(long)]
    pub describe: bool,
}

/// List the configured genes as a table of class and gene.
pub fn list(args: &ListArgs) -> Result<Table<String>, Report> {
    let genes = match &args.genes {
        Some(path) => GeneSets::read(path)?,
        None => GeneSets::default(),
    };
    for (class, gene) in genes.duplicates() {
        warn!("{class} gene listed more than once: {gene}");
    }
    let collisions = genes.collisions();
    if !collisions.is_empty() {
        let pairs = collisions.iter().map(|(a, b)| format!("{a} in {b}")).join(", ");
        warn!("Gene names that overlap under substring matching: {pairs}");
    }
    genes.to_table(args.class)
}
