use crate::comparison::ComparisonMatrix;
use crate::export;
use crate::genes::GeneClass;
use crate::order::TreeOrder;
use crate::presence::PresenceMatrix;
use crate::run::Summary;
use color_eyre::eyre::{Report, Result};
use std::fs;

fn presence() -> Result<PresenceMatrix, Report> {
    let genomes = ["A", "B", "C"].map(String::from).to_vec();
    let genes = ["vanA", "tetM"].map(String::from).to_vec();
    let cells = vec![vec![true, false], vec![false, false], vec![true, true]];
    PresenceMatrix::from_rows(GeneClass::Hgt, genomes, genes, cells)
}

fn order(names: &[&str]) -> TreeOrder {
    TreeOrder::from(names.iter().map(|n| n.to_string()).collect::<Vec<_>>())
}

#[test]
fn write_presence_in_tree_order() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = export::write_presence(&presence()?, &order(&["C", "A", "B"]), dir.path())?;
    assert_eq!(path, dir.path().join("hgt/HGT_gene_presence_matrix.csv"));
    assert_eq!(fs::read_to_string(&path)?, "Genome,vanA,tetM\nC,1,1\nA,1,0\nB,0,0\n");
    Ok(())
}

#[test]
fn write_comparison_drops_excluded() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let comparison = ComparisonMatrix::from_presence(&presence()?, "vanA")?;
    let path = export::write_comparison(&comparison, &order(&["C", "A"]), dir.path())?;
    assert_eq!(path, dir.path().join("hgt/vanA_comparison_matrix_ordered_by_tree.csv"));
    assert_eq!(fs::read_to_string(&path)?, "Genome,C,A\nC,1,1\nA,1,1\n");
    Ok(())
}

#[test]
fn write_comparison_unknown_genome() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let comparison = ComparisonMatrix::from_presence(&presence()?, "vanA")?;
    assert!(export::write_comparison(&comparison, &order(&["D"]), dir.path()).is_err());
    Ok(())
}

#[test]
fn write_tree_order() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = export::write_tree_order(&order(&["B", "A"]), dir.path())?;
    assert_eq!(fs::read_to_string(path)?, "B\nA\n");
    Ok(())
}

#[test]
fn write_summary() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let summary = Summary { genomes: vec!["A".into()], malformed_lines: 2, ..Default::default() };
    let path = export::write_summary(&summary, dir.path())?;
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    assert_eq!(json["genomes"][0], "A");
    assert_eq!(json["malformed_lines"], 2);
    assert_eq!(json["match_mode"], "token");
    Ok(())
}

#[test]
fn unsafe_gene_names() {
    let path = export::comparison_path(std::path::Path::new("out"), GeneClass::Hgt, "bla/TEM");
    assert_eq!(path, std::path::Path::new("out/hgt/bla_TEM_comparison_matrix_ordered_by_tree.csv"));
}
