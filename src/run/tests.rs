use crate::annotation::{Annotations, Genome, Record, SkipReason};
use crate::export;
use crate::genes::{GeneClass, GeneSets, MatchMode};
use crate::run::{self, Args, Summary};
use color_eyre::eyre::{Report, Result};
use hgtmap_phylo::Tree;
use std::fs;
use std::path::{Path, PathBuf};

fn gff(genes: &[&str]) -> String {
    let mut gff = String::from("##gff-version 3\n");
    for (i, gene) in genes.iter().enumerate() {
        gff.push_str(&format!("contig_1\tProkka\tCDS\t{}\t{}\t.\t+\t0\tID=x_{i};Name={gene}\n", i * 10 + 1, i * 10 + 9));
    }
    gff
}

/// Write the G1..G3 input folder, with an extra genome folder that has no annotation.
fn write_input(root: &Path) -> Result<Args, Report> {
    let input_dir = root.join("input");
    for (name, genes) in [("G1", vec!["traA", "gyrA_1"]), ("G2", vec!["gyrA"]), ("G3", vec!["traA"])] {
        fs::create_dir_all(input_dir.join(name))?;
        fs::write(input_dir.join(name).join(format!("{name}.gff")), gff(&genes))?;
    }
    fs::create_dir_all(input_dir.join("G4"))?;
    fs::write(input_dir.join("G4/G4.ffn"), ">G4_00001\nATG\n")?;

    let tree = root.join("tree.nwk");
    fs::write(&tree, "(G2:0.1,(G1:0.05,G3:0.07):0.2);\n")?;
    let genes = root.join("genes.json");
    fs::write(&genes, r#"{"hgt": ["traA"], "vgt": ["gyrA"]}"#)?;

    Ok(Args {
        input_dir,
        tree,
        output_dir: root.join("output"),
        genes: Some(genes),
        ..Default::default()
    })
}

/// Returns the relative paths and contents of every file under a directory, sorted.
fn read_tree(dir: &Path) -> Result<Vec<(PathBuf, Vec<u8>)>, Report> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(path) = stack.pop() {
        if path.is_dir() {
            for entry in fs::read_dir(&path)? {
                stack.push(entry?.path());
            }
        } else {
            files.push((path.strip_prefix(dir)?.to_path_buf(), fs::read(&path)?));
        }
    }
    files.sort();
    Ok(files)
}

#[test]
fn run_scenario() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let args = write_input(dir.path())?;
    let summary = run::run(&args)?;

    assert_eq!(summary.genomes, ["G1", "G2", "G3"]);
    assert_eq!(summary.tree_order, ["G2", "G1", "G3"]);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].name, "G4");
    assert_eq!(summary.skipped[0].reason, SkipReason::MissingAnnotationFile);

    let out = &args.output_dir;
    let presence = fs::read_to_string(export::presence_path(out, GeneClass::Hgt))?;
    assert_eq!(presence, "Genome,traA\nG2,0\nG1,1\nG3,1\n");

    let traa = fs::read_to_string(export::comparison_path(out, GeneClass::Hgt, "traA"))?;
    assert_eq!(traa, "Genome,G2,G1,G3\nG2,0,0,0\nG1,0,1,1\nG3,0,1,1\n");

    let gyra = fs::read_to_string(out.join("vgt/gyrA_comparison_matrix_ordered_by_tree.csv"))?;
    assert_eq!(gyra, "Genome,G2,G1,G3\nG2,1,1,0\nG1,1,1,0\nG3,0,0,0\n");

    assert_eq!(fs::read_to_string(out.join("tree_order.txt"))?, "G2\nG1\nG3\n");
    Ok(())
}

#[test]
fn run_summary_json() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let args = write_input(dir.path())?;
    let summary = run::run(&args)?;

    let json = fs::read_to_string(args.output_dir.join(export::SUMMARY_FILE))?;
    let written: Summary = serde_json::from_str(&json)?;
    assert_eq!(written, summary);

    let hgt = &summary.classes[0];
    assert_eq!(hgt.class, GeneClass::Hgt);
    assert_eq!(hgt.genes[0].gene, "traA");
    assert_eq!(hgt.genes[0].genomes, 2);
    assert_eq!(hgt.presence_matrix, Path::new("hgt/HGT_gene_presence_matrix.csv"));
    assert_eq!(hgt.comparison_matrices, [Path::new("hgt/traA_comparison_matrix_ordered_by_tree.csv")]);
    Ok(())
}

#[test]
fn run_idempotent() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let args = write_input(dir.path())?;
    run::run(&args)?;
    let first = read_tree(&args.output_dir)?;

    let args = Args { threads: 4, ..args };
    run::run(&args)?;
    let second = read_tree(&args.output_dir)?;

    assert_eq!(first.len(), 6);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn run_invalid_tree() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let args = write_input(dir.path())?;
    fs::write(&args.tree, "((G1,G2);")?;
    assert!(run::run(&args).is_err());
    Ok(())
}

#[test]
fn run_default_genes() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let args = Args { genes: None, ..write_input(dir.path())? };
    let summary = run::run(&args)?;
    assert_eq!(summary.classes[0].genes.len(), 5);
    assert!(export::comparison_path(&args.output_dir, GeneClass::Vgt, "rpoB").exists());
    Ok(())
}

#[test]
fn run_with_no_genes() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let annotations = Annotations {
        genomes: vec![
            Genome::from_records("G1", vec![Record::with_name("traA")]),
            Genome::from_records("G2", vec![]),
        ],
        ..Default::default()
    };
    let tree: Tree = "(G2,G1);".parse()?;
    let summary = run::run_with(&annotations, &tree, &GeneSets::new(), MatchMode::Token, dir.path())?;

    assert!(summary.classes.iter().all(|c| c.genes.is_empty() && c.comparison_matrices.is_empty()));
    let presence = fs::read_to_string(export::presence_path(dir.path(), GeneClass::Hgt))?;
    assert_eq!(presence, "Genome\nG2\nG1\n");
    Ok(())
}

#[test]
fn run_with_unmatched() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let annotations = Annotations {
        genomes: vec![
            Genome::from_records("G1", vec![Record::with_name("mecA")]),
            Genome::from_records("G2", vec![Record::with_name("mecA")]),
            Genome::from_records("G5", vec![Record::with_name("mecA")]),
        ],
        ..Default::default()
    };
    let tree: Tree = "((G1,X),G2);".parse()?;
    let summary = run::run_with(&annotations, &tree, &GeneSets::default(), MatchMode::Substring, dir.path())?;

    assert_eq!(summary.tree_order, ["G1", "G2"]);
    assert_eq!(summary.unmatched_leaves, ["X"]);
    assert_eq!(summary.unmatched_genomes, ["G5"]);

    let meca = fs::read_to_string(export::comparison_path(dir.path(), GeneClass::Hgt, "mecA"))?;
    assert_eq!(meca, "Genome,G1,G2\nG1,1,1\nG2,1,1\n");
    Ok(())
}

#[test]
fn run_with_file_name_clash() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let annotations = Annotations {
        genomes: vec![Genome::from_records("G1", vec![Record::with_name("bla_TEM")])],
        ..Default::default()
    };
    let tree: Tree = "(G1,G2);".parse()?;
    let genes = GeneSets { hgt: vec!["bla/TEM".into(), "bla_TEM".into()], vgt: vec![] };
    let output_dir = dir.path().join("output");

    assert!(run::run_with(&annotations, &tree, &genes, MatchMode::Token, &output_dir).is_err());
    assert!(!output_dir.exists());
    Ok(())
}
