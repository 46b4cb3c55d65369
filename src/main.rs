use clap::Parser;
use color_eyre::eyre::{Report, Result};
use hgtmap::{cli::Command, genes, run, Cli, GeneSets};
use structdoc::StructDoc;

fn main() -> Result<(), Report> {
    // ------------------------------------------------------------------------
    // CLI Setup

    // Parse CLI parameters
    let args = Cli::parse();

    // initialize color_eyre crate for colorized logs
    color_eyre::install()?;

    // Set logging/verbosity level via RUST_LOG
    std::env::set_var("RUST_LOG", args.verbosity.to_string());

    // initialize env_logger crate for logging/verbosity level
    env_logger::init();

    match args.command {
        Command::Run(args) => _ = run::run(&args)?,
        Command::Genes(args) if args.describe => println!("{}", GeneSets::document()),
        Command::Genes(args) => println!("\n{}", genes::list(&args)?.to_markdown()),
    }

    Ok(())
}
