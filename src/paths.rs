use std::path::{Path, PathBuf};

/// Extension given to every converted file.
pub const GFF_EXTENSION: &str = "gff";

/// Derives the GFF output path for a BED input.
///
/// Only the final extension is replaced, so `peaks.sorted.bed` becomes
/// `peaks.sorted.gff`. Inputs without an extension get one appended.
///
/// # Arguments
///
/// * `input` - Path to the BED input
///
/// # Returns
///
/// Returns the sibling path with a `.gff` extension.
///
/// # Example
///
/// ```rust, ignore
/// use bed2gff::paths::gff_path;
/// use std::path::Path;
///
/// assert_eq!(gff_path(Path::new("data/peaks.bed")), Path::new("data/peaks.gff"));
/// ```
pub fn gff_path(input: &Path) -> PathBuf {
    input.with_extension(GFF_EXTENSION)
}

/// Spells `path` through its canonical parent directory.
///
/// `a.gff`, `./a.gff` and `sub/../a.gff` all resolve to the same key, even
/// though the file itself may not exist yet. Paths whose parent cannot be
/// resolved are returned unchanged.
///
/// # Example
///
/// ```rust, ignore
/// use bed2gff::paths::normalized;
/// use std::path::Path;
///
/// assert_eq!(normalized(Path::new("sub/../a.gff")), normalized(Path::new("a.gff")));
/// ```
pub fn normalized(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    match (parent.canonicalize(), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}
