//! Write matrices, the tree order and the run summary to the output directory.
//!
//! ```text
//! <out>/
//! ├── summary.json
//! ├── tree_order.txt
//! ├── hgt/
//! │   ├── HGT_gene_presence_matrix.csv
//! │   └── <gene>_comparison_matrix_ordered_by_tree.csv
//! └── vgt/
//!     ├── VGT_gene_presence_matrix.csv
//!     └── <gene>_comparison_matrix_ordered_by_tree.csv
//! ```

#[cfg(test)]
mod tests;

use crate::comparison::ComparisonMatrix;
use crate::genes::GeneClass;
use crate::order::TreeOrder;
use crate::presence::PresenceMatrix;
use crate::run::Summary;
use color_eyre::eyre::{Report, Result, WrapErr};
use itertools::Itertools;
use log::debug;
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.json";
pub const TREE_ORDER_FILE: &str = "tree_order.txt";

/// Characters that cannot be part of a file name on common platforms.
const UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Returns the gene name with characters unsafe in file names replaced by `_`.
///
/// ```rust
/// use hgtmap::export::file_safe;
/// assert_eq!(file_safe("tetA"), "tetA");
/// assert_eq!(file_safe("aac(6')/aph(2'')"), "aac(6')_aph(2'')");
/// ```
pub fn file_safe(name: &str) -> String {
    name.chars().map(|c| if UNSAFE_CHARS.contains(&c) || c.is_control() { '_' } else { c }).collect()
}

/// Returns the directory of a gene class (ex. `<out>/hgt`).
pub fn class_dir(output_dir: &Path, class: GeneClass) -> PathBuf {
    output_dir.join(class.dir_name())
}

/// Returns the path of a presence matrix.
///
/// ```rust
/// use hgtmap::{export, GeneClass};
/// use std::path::Path;
/// let path = export::presence_path(Path::new("out"), GeneClass::Hgt);
/// assert_eq!(path, Path::new("out/hgt/HGT_gene_presence_matrix.csv"));
/// ```
pub fn presence_path(output_dir: &Path, class: GeneClass) -> PathBuf {
    class_dir(output_dir, class).join(format!("{class}_gene_presence_matrix.csv"))
}

/// Returns the path of the comparison matrix of a gene.
///
/// ```rust
/// use hgtmap::{export, GeneClass};
/// use std::path::Path;
/// let path = export::comparison_path(Path::new("out"), GeneClass::Vgt, "gyrA");
/// assert_eq!(path, Path::new("out/vgt/gyrA_comparison_matrix_ordered_by_tree.csv"));
/// ```
pub fn comparison_path(output_dir: &Path, class: GeneClass, gene: &str) -> PathBuf {
    class_dir(output_dir, class).join(format!("{}_comparison_matrix_ordered_by_tree.csv", file_safe(gene)))
}

/// Write a presence matrix, with rows in tree order.
pub fn write_presence(
    presence: &PresenceMatrix,
    order: &TreeOrder,
    output_dir: &Path,
) -> Result<PathBuf, Report> {
    let permutation = order.permutation(&presence.genomes)?;
    let ordered = presence.reorder(&permutation)?;

    let path = presence_path(output_dir, presence.class);
    create_parent(&path)?;
    ordered
        .to_table()?
        .write(&path, Some(','))
        .wrap_err_with(|| format!("Failed to write {} presence matrix: {path:?}", presence.class))?;
    debug!("Wrote {} presence matrix: {path:?}", presence.class);
    Ok(path)
}

/// Write a comparison matrix, with rows and columns in tree order.
pub fn write_comparison(
    comparison: &ComparisonMatrix,
    order: &TreeOrder,
    output_dir: &Path,
) -> Result<PathBuf, Report> {
    let permutation = order.permutation(&comparison.genomes)?;
    let ordered = comparison.reorder(&permutation)?;

    let path = comparison_path(output_dir, comparison.class, &comparison.gene);
    create_parent(&path)?;
    ordered
        .to_table()?
        .write(&path, Some(','))
        .wrap_err_with(|| format!("Failed to write {} comparison matrix: {path:?}", comparison.gene))?;
    debug!("Wrote {} comparison matrix: {path:?}", comparison.gene);
    Ok(path)
}

/// Write the tree order, one genome per line.
pub fn write_tree_order(order: &TreeOrder, output_dir: &Path) -> Result<PathBuf, Report> {
    let path = output_dir.join(TREE_ORDER_FILE);
    create_parent(&path)?;
    let mut file = File::create(&path).wrap_err_with(|| format!("Unable to create file: {path:?}"))?;
    let lines = order.names().iter().map(|name| format!("{name}\n")).join("");
    file.write_all(lines.as_bytes()).wrap_err_with(|| format!("Unable to write file: {path:?}"))?;
    Ok(path)
}

/// Write the run summary as pretty JSON.
pub fn write_summary(summary: &Summary, output_dir: &Path) -> Result<PathBuf, Report> {
    let path = output_dir.join(SUMMARY_FILE);
    create_parent(&path)?;
    let json = serde_json::to_string_pretty(summary).wrap_err("Failed to serialize run summary.")?;
    std::fs::write(&path, format!("{json}\n")).wrap_err_with(|| format!("Unable to write file: {path:?}"))?;
    Ok(path)
}

fn create_parent(path: &Path) -> Result<(), Report> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent).wrap_err_with(|| format!("Unable to create directory: {parent:?}"))?;
    }
    Ok(())
}
