//! Create, read, and write the row-based [`Table`].

use crate::utils;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// A row-based table of generic data.
///
/// # Examples
///
/// ```
/// use hgtmap::Table;
///
/// let mut table = Table::new();
/// table.headers = vec!["Genome", "mecA", "tetM"];
/// table.add_row(vec!["G1", "1", "0"])?;
///
/// println!("{}", table.to_markdown());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
///
/// | Genome | mecA | tetM |
/// |--------|------|------|
/// |   G1   |  1   |  0   |
///
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Table<T> {
    /// Names of the table columns.
    pub headers: Vec<T>,
    /// Rows of table values.
    pub rows: Vec<Vec<T>>,
    /// Optional file path for where the table was read from.
    pub path: Option<PathBuf>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    /// Create a new table with empty headers and rows.
    pub fn new() -> Self {
        Table { headers: Vec::new(), rows: Vec::new(), path: None }
    }
}

/// Methods for when the table data can be viewed as strings.
impl<T> Table<T>
where
    T: AsRef<str> + Display,
{
    /// Add a new row to the table.
    ///
    /// # Arguments
    ///
    /// * `row` - A vector of new data to add as a row, one value per header.
    ///
    /// # Examples
    ///
    /// ```
    /// use hgtmap::Table;
    ///
    /// let mut table = Table::new();
    /// table.headers = vec!["1", "2", "3"];
    /// table.add_row(vec!["A", "B", "C"])?;
    /// assert!(table.add_row(vec!["D", "E"]).is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn add_row(&mut self, row: Vec<T>) -> Result<(), Report> {
        let (new, ex) = (row.len(), self.headers.len());
        if ex != new {
            return Err(eyre!("New row size ({new}) does not match the table headers ({ex})."));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Get the column index (0-based) corresponding to the header.
    ///
    /// # Examples
    ///
    /// ```
    /// use hgtmap::Table;
    ///
    /// let mut table = Table::new();
    /// table.headers = vec!["1", "2", "3"];
    /// assert_eq!(table.get_header_index("3")?, 2);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn get_header_index(&self, header: &str) -> Result<usize, Report> {
        self.headers
            .iter()
            .position(|h| h.as_ref() == header)
            .ok_or_else(|| eyre!("Column '{header}' was not found in table: {:?}.", self.path))
    }

    /// Return a vector of table values in a column.
    ///
    /// # Examples
    ///
    /// ```
    /// use hgtmap::Table;
    ///
    /// let mut table = Table::new();
    /// table.headers = vec!["1", "2", "3"];
    /// table.add_row(vec!["A", "B", "C"])?;
    /// table.add_row(vec!["D", "E", "F"])?;
    /// assert_eq!(table.get_column("3")?, vec![&"C", &"F"]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn get_column(&self, header: &str) -> Result<Vec<&T>, Report> {
        let header_i = self.get_header_index(header)?;
        Ok(self.rows.iter().map(|row| &row[header_i]).collect())
    }

    /// Write table to file.
    ///
    /// # Arguments
    ///
    /// * `path` - File path.
    /// * `delim` - Optional delimiter. Otherwise, will be identified based on path suffix (.tsv or .csv).
    ///
    /// # Examples
    ///
    /// ```
    /// use hgtmap::Table;
    ///
    /// let mut table = Table::new();
    /// table.headers = vec!["Genome", "G1", "G2"];
    /// table.add_row(vec!["G1", "1", "0"])?;
    /// table.add_row(vec!["G2", "0", "0"])?;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("matrix.csv");
    /// table.write(&path, None)?;
    /// assert_eq!(std::fs::read_to_string(&path)?, "Genome,G1,G2\nG1,1,0\nG2,0,0\n");
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn write(&self, path: &Path, delim: Option<char>) -> Result<(), Report> {
        // if not provided, lookup delimiter from file extension
        let delim = match delim {
            Some(c) => c,
            None => utils::path_to_delim(path)?,
        };

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delim as u8)
            .from_path(path)
            .wrap_err_with(|| format!("Unable to create file: {path:?}"))?;

        writer
            .write_record(self.headers.iter().map(|h| h.as_ref()))
            .wrap_err_with(|| format!("Unable to write table headers: {path:?}"))?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(|v| v.as_ref()))
                .wrap_err_with(|| format!("Unable to write table row: {path:?}"))?;
        }
        writer.flush().wrap_err_with(|| format!("Unable to flush file: {path:?}"))?;

        Ok(())
    }

    /// Convert table to markdown format.
    ///
    /// # Examples
    ///
    /// ```
    /// use hgtmap::Table;
    ///
    /// let mut table = Table::new();
    /// table.headers = vec!["1", "2", "3"];
    /// table.add_row(vec!["A", "B", "C"])?;
    ///
    /// let expected = "| 1 | 2 | 3 |\n|---|---|---|\n| A | B | C |\n";
    /// assert_eq!(table.to_markdown(), expected);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn to_markdown(&self) -> String {
        // get the maximum width of each column, +2 to add space on either side
        let col_widths = self
            .headers
            .iter()
            .enumerate()
            .map(|(col_i, header)| {
                let header_width = header.to_string().len();
                self.rows
                    .iter()
                    .map(|row| row[col_i].to_string().len())
                    .chain([header_width])
                    .max()
                    .unwrap_or(header_width)
                    + 2
            })
            .collect_vec();

        let mut markdown = String::from("|");
        // frame in between headers and rows
        let mut header_frame = String::from("|");

        for (header, col_width) in self.headers.iter().zip(col_widths.iter()) {
            markdown.push_str(&format!("{:^width$}|", header.to_string(), width = col_width));
            header_frame.push_str(&format!("{}|", "-".repeat(*col_width)));
        }
        markdown.push('\n');
        markdown.push_str(&header_frame);
        markdown.push('\n');

        for row in &self.rows {
            markdown.push('|');
            for (value, col_width) in row.iter().zip(col_widths.iter()) {
                markdown.push_str(&format!("{:^width$}|", value.to_string(), width = col_width));
            }
            markdown.push('\n');
        }

        markdown
    }
}

impl Table<String> {
    /// Read a TSV or CSV file into a Table.
    ///
    /// # Arguments
    ///
    /// * `path` - File path.
    /// * `delim` - Optional delimiter. Otherwise, will be identified based on path suffix (.tsv or .csv).
    ///
    /// # Examples
    ///
    /// ```
    /// use hgtmap::Table;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("table.tsv");
    /// std::fs::write(&path, "1\t2\t3\nA\tB\tC\n")?;
    /// let table = Table::read(&path, None)?;
    /// assert_eq!(table.headers, ["1", "2", "3"]);
    /// assert_eq!(table.rows, [["A", "B", "C"]]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn read(path: &Path, delim: Option<char>) -> Result<Table<String>, Report> {
        let mut table = Table::new();

        // if not provided, lookup delimiter from file extension
        let delim = match delim {
            Some(c) => c,
            None => utils::path_to_delim(path)?,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delim as u8)
            .has_headers(false)
            .from_path(path)
            .wrap_err_with(|| eyre!("Failed to read file: {path:?}"))?;

        for record in reader.records() {
            let record = record.wrap_err_with(|| eyre!("Failed to parse table row: {path:?}"))?;
            let row = record.iter().map(String::from).collect_vec();
            // if headers are empty, this is the first line, write headers
            if table.headers.is_empty() {
                table.headers = row;
            }
            // otherwise regular row
            else {
                table.rows.push(row);
            }
        }

        table.path = Some(path.to_path_buf());

        Ok(table)
    }
}
