//! [Command-line interface](Cli) (CLI) of the main binary.

use crate::{genes, run, Verbosity};
use clap::{Parser, Subcommand};
use indoc::indoc;
use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// CLI Entry Point
// ----------------------------------------------------------------------------

/// The command-line interface (CLI).
/// ---
/// The CLI is intended for parsing user input from the command-line in the main function. This is achieved with the `parse` function, which parses the command line arguments from [`std::env::args`](https://doc.rust-lang.org/std/env/fn.args.html).
/// ```no_run
/// use clap::Parser;
/// let args = hgtmap::Cli::parse();
/// ```
/// The command-line arguments from `std::env::args` are simply a vector of space separated strings. Here is a manual example of setting the command-line input:
/// ```rust
/// use clap::Parser;
/// use hgtmap::{cli::Command, Cli, MatchMode};
///
/// let input = ["hgtmap", "run", "--input-dir", "genomes", "--tree", "tree.nwk", "--output-dir", "output", "--match-mode", "substring"];
/// let args = Cli::parse_from(input);
/// match &args.command {
///     Command::Run(args) => assert_eq!(args.match_mode, MatchMode::Substring),
///     Command::Genes(_) => unreachable!(),
/// }
/// serde_json::to_string_pretty(&args)?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Debug, Deserialize, Parser, Serialize)]
#[clap(name = "hgtmap", author, version)]
#[clap(about = "hgtmap maps horizontal and vertical gene transfer across genomes, in the order of their phylogeny.")]
#[clap(after_help = indoc! {"
    Examples:
      hgtmap run --input-dir genomes --tree tree.nwk --output-dir output
      hgtmap run --input-dir genomes --tree tree.nwk --output-dir output --genes genes.json --threads 4
      hgtmap genes --class hgt
"})]
pub struct Cli {
    #[clap(subcommand)]
    /// Pass CLI arguments to a particular [Command].
    #[clap(help = "Set the command.")]
    pub command: Command,

    /// Set the output [Verbosity] level.
    #[clap(short = 'v', long)]
    #[clap(value_enum, default_value_t = Verbosity::default())]
    #[clap(hide_possible_values = false)]
    #[clap(global = true)]
    #[clap(help = "Set the output verbosity level.")]
    pub verbosity: Verbosity,
}

/// CLI [commands](#variants). Used to decide which runtime [Command](#variants) the CLI arguments should be passed to.
#[derive(Debug, Deserialize, Serialize, Subcommand)]
pub enum Command {
    /// Pass CLI arguments to the [run](crate::run::run()) pipeline.
    #[clap(about = "Build gene presence and comparison matrices, ordered by a tree.")]
    Run(run::Args),

    /// Pass CLI arguments to the gene [list](crate::genes::list()) method.
    ///
    /// ```rust
    /// use clap::Parser;
    /// use hgtmap::{cli::Command, Cli, GeneClass};
    ///
    /// let args = Cli::parse_from(["hgtmap", "genes", "--class", "vgt"]);
    /// match args.command {
    ///     Command::Genes(args) => assert_eq!(args.class, Some(GeneClass::Vgt)),
    ///     Command::Run(_) => unreachable!(),
    /// }
    /// ```
    #[clap(about = "List the HGT and VGT genes.")]
    Genes(genes::ListArgs),
}
