//! Load genome annotations (GFF) from one folder per genome.
//!
//! ```text
//! input/
//! ├── strainA/
//! │   ├── strainA.gff
//! │   └── strainA.ffn
//! ├── strainB/
//! │   └── strainB.gff
//! └── strainC.gff
//! ```

#[cfg(test)]
mod tests;

use crate::utils;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File extensions recognized as genome annotations.
pub const ANNOTATION_EXTENSIONS: &[&str] = &["gff", "gff3"];

// ----------------------------------------------------------------------------
// Record

/// One feature line of a GFF annotation.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Record {
    /// Sequence (contig) the feature lies on.
    pub seqid: String,
    /// Feature type (ex. `CDS`, `gene`).
    pub feature: String,
    /// Feature identifier, from `ID` or else `locus_tag`.
    pub id: String,
    /// Gene name, from `Name` or else `gene`.
    pub name: String,
    /// Free-text description, from `product`.
    pub description: String,
    /// All attributes of the feature, percent-decoded.
    pub attributes: BTreeMap<String, String>,
}

impl Record {
    /// Returns a record that only carries a gene name, for building genomes in memory.
    pub fn with_name(name: &str) -> Self {
        Record { name: name.to_string(), ..Default::default() }
    }

    /// Returns a record that only carries a description.
    pub fn with_description(description: &str) -> Self {
        Record { description: description.to_string(), ..Default::default() }
    }

    /// Returns the text fields searched for gene names: name, `gene` attribute and description.
    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        let gene = self.attributes.get("gene").map(|g| g.as_str()).filter(|g| *g != self.name);
        [Some(self.name.as_str()), gene, Some(self.description.as_str())]
            .into_iter()
            .flatten()
            .filter(|field| !field.is_empty())
    }
}

impl FromStr for Record {
    type Err = Report;

    /// Parse a tab-separated GFF feature line.
    ///
    /// ```rust
    /// use hgtmap::annotation::Record;
    /// let line = "contig_1\tProdigal:002006\tCDS\t10\t1200\t.\t+\t0\tID=G1_00001;Name=mecA;gene=mecA;product=Penicillin-binding protein 2%2C PBP2a";
    /// let record: Record = line.parse()?;
    /// assert_eq!(record.id, "G1_00001");
    /// assert_eq!(record.name, "mecA");
    /// assert_eq!(record.description, "Penicillin-binding protein 2, PBP2a");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn from_str(line: &str) -> Result<Self, Report> {
        let columns = line.trim_end_matches(['\r', '\n']).split('\t').collect_vec();
        if columns.len() < 9 {
            return Err(eyre!("Expected 9 tab-separated columns, found {}.", columns.len()));
        }

        let attributes = parse_attributes(columns[8]);
        let lookup = |keys: &[&str]| {
            keys.iter().find_map(|k| attributes.get(*k)).cloned().unwrap_or_default()
        };

        Ok(Record {
            seqid: columns[0].to_string(),
            feature: columns[2].to_string(),
            id: lookup(&["ID", "locus_tag"]),
            name: lookup(&["Name", "gene"]),
            description: lookup(&["product"]),
            attributes,
        })
    }
}

/// Parse the `key=value;key=value` attribute column, ignoring pairs without `=`.
fn parse_attributes(column: &str) -> BTreeMap<String, String> {
    column
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (decode(k.trim()), decode(v.trim())))
        .filter(|(k, _v)| !k.is_empty())
        .collect()
}

/// Decode GFF3 percent escapes (ex. `%2C` → `,`).
fn decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let hex = bytes
            .get(i + 1..i + 3)
            .filter(|h| h.iter().all(u8::is_ascii_hexdigit))
            .and_then(|h| std::str::from_utf8(h).ok());
        match (bytes[i], hex.and_then(|h| u8::from_str_radix(h, 16).ok())) {
            (b'%', Some(byte)) => {
                decoded.push(byte);
                i += 3;
            }
            (byte, _) => {
                decoded.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

// ----------------------------------------------------------------------------
// Genome

/// A named genome and its annotation records.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Genome {
    /// Unique genome name, also the label expected in the tree.
    pub name: String,
    /// Annotation records, in file order.
    pub records: Vec<Record>,
    /// Annotation file the genome was read from, if any.
    pub path: Option<PathBuf>,
}

impl Display for Genome {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} ({} records)", self.name, self.records.len())
    }
}

impl Genome {
    /// Returns a genome built from records in memory.
    pub fn from_records(name: &str, records: Vec<Record>) -> Self {
        Genome { name: name.to_string(), records, path: None }
    }
}

/// Parse annotation records from a GFF reader.
///
/// Returns the genome and the number of malformed lines that were skipped. Comment
/// lines are ignored, and everything after a `##FASTA` line is sequence data.
///
/// ```rust
/// use hgtmap::annotation;
/// let gff = "##gff-version 3\nc1\t.\tCDS\t1\t9\t.\t+\t0\tName=tetM\nbroken line\n##FASTA\n>c1\nACGT\n";
/// let (genome, malformed) = annotation::parse("G1", gff.as_bytes())?;
/// assert_eq!(genome.records.len(), 1);
/// assert_eq!(malformed, 1);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn parse<R: BufRead>(name: &str, reader: R) -> Result<(Genome, usize), Report> {
    let mut records = Vec::new();
    let mut malformed = 0;

    for (i, line) in reader.lines().enumerate() {
        let line = line.wrap_err_with(|| format!("Failed to read line {} of {name}.", i + 1))?;
        if line.starts_with("##FASTA") {
            break;
        }
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<Record>() {
            Ok(record) => records.push(record),
            Err(e) => {
                malformed += 1;
                debug!("{name}: skipping malformed line {}: {e}", i + 1);
            }
        }
    }

    Ok((Genome::from_records(name, records), malformed))
}

/// Read a genome from a GFF file, named after the file stem.
pub fn read(path: &Path) -> Result<(Genome, usize), Report> {
    let name = utils::path_to_stem(path)?;
    let file = File::open(path).wrap_err_with(|| format!("Failed to open: {path:?}"))?;
    let (mut genome, malformed) =
        parse(&name, BufReader::new(file)).wrap_err_with(|| format!("Failed to parse: {path:?}"))?;
    genome.path = Some(path.to_path_buf());
    Ok((genome, malformed))
}

// ----------------------------------------------------------------------------
// Loading

/// Why a genome was left out of the run.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum SkipReason {
    /// The genome folder has no annotation file.
    MissingAnnotationFile,
    /// The genome folder or its annotation file could not be read or decoded.
    Unreadable(String),
    /// The annotation file has malformed lines and no valid feature line.
    Unparsable { malformed: usize },
    /// Another genome with the same name was already loaded.
    DuplicateName,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            SkipReason::MissingAnnotationFile => write!(f, "missing annotation file"),
            SkipReason::Unreadable(e) => write!(f, "unreadable annotation: {e}"),
            SkipReason::Unparsable { malformed } => {
                write!(f, "no valid feature lines, {malformed} malformed line(s)")
            }
            SkipReason::DuplicateName => write!(f, "duplicate genome name"),
        }
    }
}

/// A genome that was left out of the run.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Skipped {
    pub name: String,
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// The genomes loaded from an input folder, and what was left out.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Annotations {
    /// Loaded genomes, in sorted folder order.
    pub genomes: Vec<Genome>,
    /// Genomes that were skipped.
    pub skipped: Vec<Skipped>,
    /// Total number of malformed annotation lines that were skipped.
    pub malformed_lines: usize,
}

impl Annotations {
    /// Returns the names of the loaded genomes, in load order.
    pub fn names(&self) -> Vec<String> {
        self.genomes.iter().map(|g| g.name.clone()).collect()
    }
}

/// Where a genome's annotation should come from.
enum Source {
    File(PathBuf),
    Missing { name: String, dir: PathBuf },
    Unreadable { name: String, dir: PathBuf, error: String },
}

/// Returns true if the path has an annotation extension.
fn is_annotation(path: &Path) -> bool {
    path.is_file()
        && utils::path_to_ext(path).map(|ext| ANNOTATION_EXTENSIONS.contains(&ext.as_str())).unwrap_or(false)
}

/// Returns the entries of a directory sorted by name, skipping hidden ones.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, Report> {
    let entries = std::fs::read_dir(dir)
        .wrap_err_with(|| format!("Failed to read directory: {dir:?}"))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .wrap_err_with(|| format!("Failed to list directory: {dir:?}"))?
        .into_iter()
        .filter(|p| !p.file_name().map(|n| n.to_string_lossy().starts_with('.')).unwrap_or(true))
        .sorted()
        .collect();
    Ok(entries)
}

/// Returns the annotation files at any depth under a genome folder, shallowest first, then
/// by path. Symbolic links to folders are not followed.
fn find_annotations(dir: &Path) -> Result<Vec<PathBuf>, Report> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for path in sorted_entries(&current)? {
            let is_link = path.symlink_metadata().map(|m| m.file_type().is_symlink()).unwrap_or(false);
            if path.is_dir() {
                if !is_link {
                    stack.push(path);
                }
            } else if is_annotation(&path) {
                files.push(path);
            }
        }
    }
    Ok(files.into_iter().sorted_by_key(|p| (p.components().count(), p.clone())).collect())
}

/// Locate the annotation file of one genome folder.
fn locate(dir: PathBuf) -> Source {
    let name = dir.file_name().unwrap_or_default().to_string_lossy().to_string();
    match find_annotations(&dir) {
        Ok(files) => match files.split_first() {
            Some((file, rest)) => {
                if !rest.is_empty() {
                    warn!("Multiple annotation files in {dir:?}, using {file:?} and ignoring: {rest:?}");
                }
                Source::File(file.clone())
            }
            None => Source::Missing { name, dir },
        },
        Err(e) => Source::Unreadable { name, dir, error: format!("{e:#}") },
    }
}

/// Load every genome under a root folder.
///
/// Each subfolder is one genome and should contain one annotation file, at any depth;
/// annotation files directly inside the root are genomes too. A genome that cannot be
/// loaded is skipped with a warning, only an unreadable root folder is an error.
pub fn load(root: &Path) -> Result<Annotations, Report> {
    info!("Loading annotations: {root:?}");

    let mut sources = Vec::new();
    for path in sorted_entries(root)? {
        if path.is_dir() {
            sources.push(locate(path));
        } else if is_annotation(&path) {
            sources.push(Source::File(path));
        }
    }

    // parse files in parallel, results keep the source order
    let results = sources
        .par_iter()
        .map(|source| match source {
            Source::File(path) => Some(read(path)),
            Source::Missing { .. } | Source::Unreadable { .. } => None,
        })
        .collect::<Vec<_>>();

    let mut annotations = Annotations::default();
    let mut names = HashSet::new();

    for (source, result) in sources.into_iter().zip(results) {
        let skipped = match (source, result) {
            (Source::Missing { name, dir }, _) => {
                Skipped { name, path: dir, reason: SkipReason::MissingAnnotationFile }
            }
            (Source::Unreadable { name, dir, error }, _) => {
                Skipped { name, path: dir, reason: SkipReason::Unreadable(error) }
            }
            (Source::File(path), Some(Ok((genome, malformed)))) => {
                if genome.records.is_empty() && malformed > 0 {
                    annotations.malformed_lines += malformed;
                    Skipped { name: genome.name, path, reason: SkipReason::Unparsable { malformed } }
                } else if names.insert(genome.name.clone()) {
                    debug!("Loaded genome: {genome}");
                    if malformed > 0 {
                        warn!("{}: skipped {malformed} malformed annotation line(s).", genome.name);
                    }
                    annotations.malformed_lines += malformed;
                    annotations.genomes.push(genome);
                    continue;
                } else {
                    Skipped { name: genome.name, path, reason: SkipReason::DuplicateName }
                }
            }
            (Source::File(path), Some(Err(e))) => {
                let name = utils::path_to_stem(&path).unwrap_or_default();
                Skipped { name, path, reason: SkipReason::Unreadable(format!("{e:#}")) }
            }
            (Source::File(path), None) => {
                return Err(eyre!("No result was produced for annotation file: {path:?}"))
            }
        };
        warn!("Skipping genome {}: {} ({:?})", skipped.name, skipped.reason, skipped.path);
        annotations.skipped.push(skipped);
    }

    info!(
        "Loaded {} genome(s), skipped {} genome(s), skipped {} malformed line(s).",
        annotations.genomes.len(),
        annotations.skipped.len(),
        annotations.malformed_lines
    );

    Ok(annotations)
}
