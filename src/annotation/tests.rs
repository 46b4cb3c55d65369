use crate::annotation::{self, Record, SkipReason, Source};
use color_eyre::eyre::{Report, Result};
use std::fs;
use std::path::Path;

const GFF: &str = "\
##gff-version 3
##sequence-region contig_1 1 5000
contig_1\tProdigal:002006\tgene\t10\t1200\t.\t+\t.\tID=G1_00001_gene;locus_tag=G1_00001
contig_1\tProdigal:002006\tCDS\t10\t1200\t.\t+\t0\tID=G1_00001;Name=tetA_2;gene=tetA_2;product=Tetracycline resistance protein%2C class A
contig_1\tProdigal:002006\tCDS\t1300\t2400\t.\t-\t0\tID=G1_00002;product=hypothetical protein
contig_1\tProdigal:002006\tCDS\t2500
##FASTA
>contig_1
ACGTACGTACGT
";

fn write_gff(path: &Path, content: &str) -> Result<(), Report> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[test]
fn parse_record_fields() -> Result<(), Report> {
    let (genome, malformed) = annotation::parse("G1", GFF.as_bytes())?;
    assert_eq!(genome.name, "G1");
    assert_eq!(genome.records.len(), 3);
    assert_eq!(malformed, 1);

    let gene = &genome.records[0];
    assert_eq!(gene.feature, "gene");
    assert_eq!(gene.id, "G1_00001_gene");
    assert_eq!(gene.name, "");

    let cds = &genome.records[1];
    assert_eq!(cds.seqid, "contig_1");
    assert_eq!(cds.name, "tetA_2");
    assert_eq!(cds.description, "Tetracycline resistance protein, class A");
    assert_eq!(cds.attributes["gene"], "tetA_2");

    let hypothetical = &genome.records[2];
    assert_eq!(hypothetical.name, "");
    assert_eq!(hypothetical.description, "hypothetical protein");
    Ok(())
}

#[test]
fn parse_record_fallbacks() -> Result<(), Report> {
    let record: Record = "c1\t.\tCDS\t1\t9\t.\t+\t0\tlocus_tag=X_1; gene=gyrB ;note".parse()?;
    assert_eq!(record.id, "X_1");
    assert_eq!(record.name, "gyrB");
    assert_eq!(record.search_fields().collect::<Vec<_>>(), ["gyrB"]);
    Ok(())
}

#[test]
fn parse_record_too_few_columns() {
    assert!("c1\t.\tCDS\t1\t9".parse::<Record>().is_err());
}

#[test]
fn load_folders() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    write_gff(&root.join("G2/G2.gff"), GFF)?;
    write_gff(&root.join("G1/G1.gff"), GFF)?;
    fs::write(root.join("G1/G1.ffn"), ">G1_00001\nATG\n")?;
    write_gff(&root.join("G4.gff3"), GFF)?;
    fs::write(root.join("tree.nwk"), "(G1,G2);")?;

    let annotations = annotation::load(root)?;
    assert_eq!(annotations.names(), ["G1", "G2", "G4"]);
    assert!(annotations.skipped.is_empty());
    assert_eq!(annotations.malformed_lines, 3);
    assert_eq!(annotations.genomes[0].path, Some(root.join("G1/G1.gff")));
    Ok(())
}

#[test]
fn load_skips_missing_annotation() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    write_gff(&root.join("G1/G1.gff"), GFF)?;
    fs::create_dir_all(root.join("G2"))?;
    fs::write(root.join("G2/G2.ffn"), ">G2_00001\nATG\n")?;
    write_gff(&root.join("G3/G3.gff"), GFF)?;

    let annotations = annotation::load(root)?;
    assert_eq!(annotations.names(), ["G1", "G3"]);
    assert_eq!(annotations.skipped.len(), 1);
    assert_eq!(annotations.skipped[0].name, "G2");
    assert_eq!(annotations.skipped[0].reason, SkipReason::MissingAnnotationFile);
    Ok(())
}

#[test]
fn load_skips_unreadable_and_duplicates() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    write_gff(&root.join("A/G1.gff"), GFF)?;
    write_gff(&root.join("B/G1.gff"), GFF)?;
    fs::create_dir_all(root.join("C"))?;
    fs::write(root.join("C/G3.gff"), [0xffu8, 0xfe, 0x00, 0x9f])?;

    let annotations = annotation::load(root)?;
    assert_eq!(annotations.names(), ["G1"]);
    assert_eq!(annotations.skipped.len(), 2);
    assert_eq!(annotations.skipped[0].reason, SkipReason::DuplicateName);
    assert!(matches!(annotations.skipped[1].reason, SkipReason::Unreadable(_)));
    Ok(())
}

#[test]
fn load_uses_first_of_multiple_files() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    write_gff(&root.join("G1/a.gff"), GFF)?;
    write_gff(&root.join("G1/b.gff"), GFF)?;

    let annotations = annotation::load(root)?;
    assert_eq!(annotations.names(), ["a"]);
    Ok(())
}

#[test]
fn load_missing_root() {
    assert!(annotation::load(Path::new("does/not/exist")).is_err());
}

#[test]
fn load_nested_annotation() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    write_gff(&root.join("strainA/prokka/strainA.gff"), GFF)?;
    write_gff(&root.join("strainB/strainB.gff"), GFF)?;
    write_gff(&root.join("strainB/old/strainB_v1.gff"), GFF)?;

    let annotations = annotation::load(root)?;
    assert_eq!(annotations.names(), ["strainA", "strainB"]);
    assert!(annotations.skipped.is_empty());
    assert_eq!(annotations.genomes[0].path, Some(root.join("strainA/prokka/strainA.gff")));
    assert_eq!(annotations.genomes[1].path, Some(root.join("strainB/strainB.gff")));
    Ok(())
}

#[test]
fn locate_unreadable_folder() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let not_a_dir = dir.path().join("G1");
    fs::write(&not_a_dir, "not a folder")?;

    match annotation::locate(not_a_dir.clone()) {
        Source::Unreadable { name, dir, error } => {
            assert_eq!(name, "G1");
            assert_eq!(dir, not_a_dir);
            assert!(error.contains("Failed to read directory"));
        }
        _ => panic!("expected an unreadable genome folder"),
    }
    Ok(())
}

#[test]
fn load_skips_unparsable_annotation() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    write_gff(&root.join("G1/G1.gff"), GFF)?;
    write_gff(&root.join("G2/G2.gff"), "contig_1 Prokka CDS 1 9 . + 0 Name=traA\n>contig_1\nACGT\n")?;
    write_gff(&root.join("G3/G3.gff"), "##gff-version 3\n")?;

    let annotations = annotation::load(root)?;
    assert_eq!(annotations.names(), ["G1", "G3"]);
    assert!(annotations.genomes[1].records.is_empty());
    assert_eq!(annotations.skipped.len(), 1);
    assert_eq!(annotations.skipped[0].name, "G2");
    assert_eq!(annotations.skipped[0].reason, SkipReason::Unparsable { malformed: 3 });
    Ok(())
}
