use clade_sort::clades::{self, extract_clades};
use clade_sort::newick::parse_tree;
use clade_sort::partition::{self, read_records, DEFAULT_EXTENSION};
use clade_sort::references::ReferenceList;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const TREE: &str = "((A,B),(C,(D,E)));\n";
const REFERENCES: &str = "A,first clade\nC\nD,third clade\n";
const SEQUENCES: &str = "\
>E protein e
MEEE
>Z not in the tree
MZZZ
>B
MBBB
>D
MDDD
>A protein a
MAAA
>C
MCCC
";

/// Write the inputs into `dir` and return the paths of tree, references, and sequences
fn write_inputs(dir: &Path, tree: &str, references: &str) -> [String; 3] {
    let files = [("tree.nwk", tree), ("refs.txt", references), ("seqs.faa", SEQUENCES)];
    let mut paths = [String::new(), String::new(), String::new()];
    for (path, (name, content)) in paths.iter_mut().zip(files.iter()) {
        let file = dir.join(name);
        fs::write(&file, content).unwrap();
        *path = file.to_str().unwrap().to_string();
    }
    paths
}

/// Read a FASTA file as (id, description, sequence) triples
fn read_fasta(path: &Path) -> Vec<(String, Option<String>, String)> {
    read_records(fs::File::open(path).unwrap())
        .unwrap()
        .into_iter()
        .map(|record| {
            (
                record.id().to_string(),
                record.desc().map(String::from),
                String::from_utf8(record.seq().to_vec()).unwrap(),
            )
        })
        .collect()
}

fn ids(path: &Path) -> Vec<String> {
    read_fasta(path).into_iter().map(|(id, _, _)| id).collect()
}

/// Run the binary with the given arguments
fn sort_by_clade(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sort_by_clade"))
        .env_remove("CLADE_SORT_LOG")
        .args(args)
        .output()
        .unwrap()
}

/// Test the library pipeline from Newick text and FASTA records to clade files
#[test]
fn library_pipeline() {
    let tmp = tempfile::tempdir().unwrap();
    let tree = parse_tree(TREE).unwrap();
    let references = ReferenceList::parse(REFERENCES).unwrap();
    assert_eq!(references.to_vec(), vec!["A", "C", "D"]);

    let clades = extract_clades(&tree, &references).unwrap();
    let records = read_records(SEQUENCES.as_bytes()).unwrap();
    let partitions = partition::partition(&records, &clades);
    let out = tmp.path().join("clades");
    let files = partition::write_partitions(&out, &partitions, DEFAULT_EXTENSION).unwrap();

    assert_eq!(files.len(), 3);
    assert_eq!(
        read_fasta(&out.join("A__clade.faa")),
        vec![
            ("B".to_string(), None, "MBBB".to_string()),
            ("A".to_string(), Some("protein a".to_string()), "MAAA".to_string()),
        ]
    );
    assert_eq!(ids(&out.join("C__clade.faa")), vec!["C"]);
    assert_eq!(ids(&out.join("D__clade.faa")), vec!["E", "D"]);
}

/// Test that the binary writes the clade files, replaces the output directory, and prints the
/// summary
#[test]
fn binary_writes_clades() {
    let tmp = tempfile::tempdir().unwrap();
    let [tree, refs, seqs] = write_inputs(tmp.path(), TREE, REFERENCES);
    let out = tmp.path().join("out");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("old.faa"), ">old\nM\n").unwrap();

    let output = sort_by_clade(&["-q", tree.as_str(), refs.as_str(), seqs.as_str(), out.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Reference sequences:\nA\nC\nD\n\n\
         Number of sequences in each clade:\nA\t2\nD\t2\nC\t1\n"
    );

    let mut entries = fs::read_dir(&out)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect::<Vec<_>>();
    entries.sort();
    assert_eq!(entries, vec!["A__clade.faa", "C__clade.faa", "D__clade.faa"]);
    assert_eq!(ids(&out.join("D__clade.faa")), vec!["E", "D"]);
}

/// Test that the extension option names the output files
#[test]
fn binary_extension() {
    let tmp = tempfile::tempdir().unwrap();
    let [tree, refs, seqs] = write_inputs(tmp.path(), TREE, REFERENCES);
    let out = tmp.path().join("out");

    let output = sort_by_clade(&["-q", "-e", "fasta", tree.as_str(), refs.as_str(), seqs.as_str(), out.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(ids(&out.join("A__clade.fasta")), vec!["B", "A"]);
}

/// Test that two references are rejected before any output is written
#[test]
fn binary_too_few_references() {
    let tmp = tempfile::tempdir().unwrap();
    let [tree, refs, seqs] = write_inputs(tmp.path(), TREE, "A\nC\nA\n");
    let out = tmp.path().join("out");

    let output = sort_by_clade(&["-q", tree.as_str(), refs.as_str(), seqs.as_str(), out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    let message = clades::Error::Configuration { found: 2, required: 3 }.to_string();
    assert!(String::from_utf8(output.stderr).unwrap().contains(&message));
    assert!(!out.exists());
}

/// Test that the reference list is logged even when it fails validation
#[test]
fn binary_logs_rejected_references() {
    let tmp = tempfile::tempdir().unwrap();
    let [tree, refs, seqs] = write_inputs(tmp.path(), TREE, "A\nC\nA\n");
    let out = tmp.path().join("out");

    let output = sort_by_clade(&[tree.as_str(), refs.as_str(), seqs.as_str(), out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr).unwrap().contains("Reference sequences: A, C, A"));
}

/// Test that a reference missing from the tree leaves the output directory untouched
#[test]
fn binary_missing_reference() {
    let tmp = tempfile::tempdir().unwrap();
    let [tree, refs, seqs] = write_inputs(tmp.path(), TREE, "A\nC\nQ\n");
    let out = tmp.path().join("out");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("old.faa"), ">old\nM\n").unwrap();

    let output = sort_by_clade(&["-q", tree.as_str(), refs.as_str(), seqs.as_str(), out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(out.join("old.faa").exists());
}

/// Test that a malformed tree and a missing input file have their own exit codes
#[test]
fn binary_input_errors() {
    let tmp = tempfile::tempdir().unwrap();
    let [tree, refs, seqs] = write_inputs(tmp.path(), "((A,B),(C,D)", REFERENCES);
    let out = tmp.path().join("out");

    let output = sort_by_clade(&["-q", tree.as_str(), refs.as_str(), seqs.as_str(), out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));

    let missing = tmp.path().join("missing.faa");
    let output = sort_by_clade(&["-q", tree.as_str(), refs.as_str(), missing.to_str().unwrap(), out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));

    fs::write(&tree, TREE).unwrap();
    let output = sort_by_clade(&["-q", tree.as_str(), refs.as_str(), missing.to_str().unwrap(), out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));
}
