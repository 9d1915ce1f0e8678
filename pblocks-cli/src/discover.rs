//! Expansion of `-p` arguments into structure files.

use std::io;
use std::path::{Path, PathBuf};

use pblocks_struct::STRUCTURE_EXTENSIONS;

/// Files found for a list of `-p` arguments.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Structure files, in argument order; directory contents sorted by name.
    pub files: Vec<PathBuf>,
    /// Arguments that are neither a file nor a directory.
    pub invalid: Vec<PathBuf>,
}

/// Resolve each path: files are taken as given, directories contribute their
/// entries with a structure extension.
pub fn discover_structures(paths: &[PathBuf]) -> io::Result<Discovery> {
    let mut discovery = Discovery::default();
    for path in paths {
        if path.is_file() {
            discovery.files.push(path.clone());
        } else if path.is_dir() {
            discovery.files.extend(structures_in(path)?);
        } else {
            log::warn!("{}: not a valid file or directory", path.display());
            discovery.invalid.push(path.clone());
        }
    }
    Ok(discovery)
}

fn structures_in(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let recognized = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| STRUCTURE_EXTENSIONS.contains(&e));
        if recognized && path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    log::debug!("{}: {} structure file(s)", dir.display(), found.len());
    Ok(found)
}
