//! Small path helpers shared by the readers and writers.

pub mod verbosity;

use color_eyre::eyre::{eyre, ContextCompat, Report, Result};
use color_eyre::Help;
use std::path::Path;

/// Returns the lowercase file extension of a path.
///
/// ```rust
/// use hgtmap::utils::path_to_ext;
/// use std::path::Path;
/// assert_eq!(path_to_ext(Path::new("genomes/strainA.GFF"))?, "gff");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn path_to_ext(path: &Path) -> Result<String, Report> {
    let ext = path
        .extension()
        .wrap_err_with(|| format!("Failed to get file extension: {path:?}"))?
        .to_str()
        .wrap_err_with(|| format!("Failed to convert file extension to str: {path:?}"))?;
    Ok(ext.to_lowercase())
}

/// Returns the table delimiter implied by a file extension.
///
/// ```rust
/// use hgtmap::utils::path_to_delim;
/// use std::path::Path;
/// assert_eq!(path_to_delim(Path::new("HGT_gene_presence_matrix.csv"))?, ',');
/// assert_eq!(path_to_delim(Path::new("tree_order.tsv"))?, '\t');
/// assert!(path_to_delim(Path::new("tree.nwk")).is_err());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn path_to_delim(path: &Path) -> Result<char, Report> {
    let ext = path_to_ext(path)?;
    match ext.as_str() {
        "csv" => Ok(','),
        "tsv" | "txt" => Ok('\t'),
        _ => Err(eyre!("Unknown table extension: {ext:?} in {path:?}")
            .suggestion("Please use .csv or .tsv instead.")),
    }
}

/// Returns the file name without its extension, the genome name for annotation files.
///
/// ```rust
/// use hgtmap::utils::path_to_stem;
/// use std::path::Path;
/// assert_eq!(path_to_stem(Path::new("input/strainA/strainA.gff"))?, "strainA");
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn path_to_stem(path: &Path) -> Result<String, Report> {
    let stem = path
        .file_stem()
        .wrap_err_with(|| format!("Failed to get file name: {path:?}"))?
        .to_str()
        .wrap_err_with(|| format!("Failed to convert file name to str: {path:?}"))?;
    Ok(stem.to_string())
}
