use crate::annotation::{Genome, Record};
use crate::genes::{GeneClass, MatchMode};
use crate::order::Permutation;
use crate::presence::{Detector, PresenceMatrix};
use color_eyre::eyre::{Report, Result};

fn genomes() -> Vec<Genome> {
    vec![
        Genome::from_records("G1", vec![Record::with_name("traA"), Record::with_name("gyrA")]),
        Genome::from_records("G2", vec![Record::with_description("DNA gyrase subunit A, GyrA")]),
        Genome::from_records("G3", vec![Record::with_name("TRAA_1")]),
    ]
}

fn genes(genes: &[&str]) -> Vec<String> {
    genes.iter().map(|g| g.to_string()).collect()
}

#[test]
fn token_match() {
    let detector = Detector::new(MatchMode::Token);
    assert!(detector.matches("vanA", "VANA"));
    assert!(detector.matches("blaTEM-1", "blaTEM"));
    assert!(detector.matches("aac(6')-Ib", "aac(6')"));
    assert!(!detector.matches("tetM", "tetA"));
    assert!(!detector.matches("vanAB", "vanA"));
    assert!(!detector.matches("xvanA", "vanA"));
    assert!(!detector.matches("anything", " "));
}

#[test]
fn substring_match() {
    let detector = Detector::new(MatchMode::Substring);
    assert!(detector.matches("vanAB", "vanA"));
    assert!(detector.matches("xvana", "vanA"));
    assert!(!detector.matches("vanB", "vanA"));
}

#[test]
fn detect_name_and_description() {
    let detector = Detector::default();
    let genomes = genomes();
    assert!(detector.detect(&genomes[0], "gyrA"));
    assert!(detector.detect(&genomes[1], "gyrA"));
    assert!(!detector.detect(&genomes[2], "gyrA"));
    assert!(detector.detect(&genomes[2], "traA"));
}

#[test]
fn build_presence() {
    let presence =
        PresenceMatrix::build(GeneClass::Hgt, &genes(&["traA", "mecA"]), &genomes(), &Detector::default());
    assert_eq!(presence.class, GeneClass::Hgt);
    assert_eq!(presence.genomes, ["G1", "G2", "G3"]);
    assert_eq!(presence.genes, ["traA", "mecA"]);
    assert_eq!(presence.column("traA"), Some(vec![true, false, true]));
    assert_eq!(presence.column("mecA"), Some(vec![false, false, false]));
    assert_eq!(presence.get("G2", "traA"), Some(false));
    assert_eq!(presence.row("G3"), Some([true, false].as_slice()));
    assert_eq!(presence.count("traA"), Some(2));
    assert_eq!(presence.get("G4", "traA"), None);
    assert_eq!(presence.column("tetM"), None);
}

#[test]
fn build_presence_unique_columns() {
    let presence =
        PresenceMatrix::build(GeneClass::Vgt, &genes(&["gyrA", "GyrA", "gyrA"]), &genomes(), &Detector::default());
    assert_eq!(presence.genes, ["gyrA"]);
}

#[test]
fn build_presence_no_genes() {
    let presence = PresenceMatrix::build(GeneClass::Hgt, &[], &genomes(), &Detector::default());
    assert!(presence.genes.is_empty());
    assert_eq!(presence.cells, vec![Vec::<bool>::new(); 3]);
}

#[test]
fn from_rows_checks_shape() {
    let names = genes(&["G1", "G2"]);
    assert!(PresenceMatrix::from_rows(GeneClass::Hgt, names.clone(), genes(&["traA"]), vec![vec![true]])
        .is_err());
    assert!(PresenceMatrix::from_rows(
        GeneClass::Hgt,
        names.clone(),
        genes(&["traA"]),
        vec![vec![true], vec![true, false]]
    )
    .is_err());
    assert!(PresenceMatrix::from_rows(GeneClass::Hgt, names, genes(&["traA"]), vec![vec![true], vec![false]])
        .is_ok());
}

#[test]
fn reorder_rows() -> Result<(), Report> {
    let presence =
        PresenceMatrix::build(GeneClass::Hgt, &genes(&["traA", "gyrA"]), &genomes(), &Detector::default());
    let permutation = Permutation::new(vec![1, 0, 2], 3)?;
    let ordered = presence.reorder(&permutation)?;
    assert_eq!(ordered.genomes, ["G2", "G1", "G3"]);
    assert_eq!(ordered.genes, presence.genes);
    assert_eq!(ordered.column("traA"), Some(vec![false, true, true]));
    assert_eq!(ordered.column("gyrA"), Some(vec![true, true, false]));
    Ok(())
}

#[test]
fn presence_table() -> Result<(), Report> {
    let presence = PresenceMatrix::build(GeneClass::Hgt, &genes(&["traA"]), &genomes(), &Detector::default());
    let table = presence.to_table()?;
    assert_eq!(table.headers, ["Genome", "traA"]);
    assert_eq!(table.rows, [["G1", "1"], ["G2", "0"], ["G3", "1"]]);
    Ok(())
}
