use bed2gff::paths::{gff_path, normalized};
use std::path::Path;

/// Replaces a plain `.bed` extension.
#[test]
fn replaces_bed_extension() {
    assert_eq!(gff_path(Path::new("peaks.bed")), Path::new("peaks.gff"));
}

/// Only the last extension is replaced.
#[test]
fn keeps_inner_extensions() {
    assert_eq!(
        gff_path(Path::new("data/peaks.sorted.bed")),
        Path::new("data/peaks.sorted.gff")
    );
}

/// Extensionless inputs get `.gff` appended.
#[test]
fn appends_missing_extension() {
    assert_eq!(gff_path(Path::new("intervals")), Path::new("intervals.gff"));
}

/// Different spellings of one output share a key.
#[test]
fn normalizes_parent_spelling() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();

    let plain = dir.path().join("a.gff");
    let dotted = dir.path().join("sub").join("..").join("a.gff");
    assert_eq!(normalized(&plain), normalized(&dotted));
    assert_ne!(normalized(&plain), normalized(&dir.path().join("b.gff")));
}

/// Unresolvable parents fall back to the path as given.
#[test]
fn keeps_unresolvable_paths() {
    let path = Path::new("no/such/dir/a.gff");
    assert_eq!(normalized(path), path);
}
