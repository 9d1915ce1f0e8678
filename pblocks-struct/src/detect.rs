//! Structure format detection and dispatch.

use pblocks_core::Result;

use crate::mmcif::parse_mmcif;
use crate::pdb::parse_pdb;
use crate::types::Structure;

/// File extensions recognized as structure inputs when scanning directories.
pub const STRUCTURE_EXTENSIONS: &[&str] = &["pdb", "PDB", "ent", "cif", "CIF"];

/// Coordinate formats a [`Structure`] can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Pdb,
    Mmcif,
}

impl StructureFormat {
    /// Format for a file extension (without the dot), ignoring case.
    /// `.cif` and `.mmcif` are mmCIF; everything else is read as PDB.
    pub fn from_extension(extension: &str) -> Self {
        if extension.eq_ignore_ascii_case("cif") || extension.eq_ignore_ascii_case("mmcif") {
            StructureFormat::Mmcif
        } else {
            StructureFormat::Pdb
        }
    }

    /// Format for a file path, by extension.
    #[cfg(feature = "std")]
    pub fn from_path(path: &::std::path::Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(StructureFormat::Pdb, Self::from_extension)
    }

    /// Guess the format from the first meaningful line of `text`, if it is
    /// recognizable.
    pub fn from_content(text: &str) -> Option<Self> {
        let first = text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))?;
        if first.starts_with("data_") || first.starts_with("loop_") || first.starts_with('_') {
            return Some(StructureFormat::Mmcif);
        }
        const PDB_RECORDS: &[&str] = &[
            "HEADER", "TITLE", "COMPND", "REMARK", "CRYST1", "MODEL", "ATOM", "HETATM", "SEQRES",
        ];
        PDB_RECORDS
            .iter()
            .any(|r| first.starts_with(r))
            .then_some(StructureFormat::Pdb)
    }
}

/// Parse `text` in the given format.
pub fn parse_structure(text: &str, format: StructureFormat) -> Result<Structure> {
    match format {
        StructureFormat::Pdb => parse_pdb(text),
        StructureFormat::Mmcif => parse_mmcif(text),
    }
}

/// Read a structure file, choosing the parser from the extension.
#[cfg(feature = "std")]
pub fn parse_structure_file(path: impl AsRef<::std::path::Path>) -> Result<Structure> {
    let path = path.as_ref();
    let format = StructureFormat::from_path(path);
    log::debug!("reading {} as {:?}", path.display(), format);
    let contents = ::std::fs::read_to_string(path)?;
    parse_structure(&contents, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDB_TEXT: &str = "\
ATOM      1  CA  ALA A   1       1.000   2.000   3.000  1.00  0.00           C\n";

    const CIF_TEXT: &str = "\
data_T
loop_
_atom_site.group_PDB
_atom_site.id
_atom_site.label_atom_id
_atom_site.label_comp_id
_atom_site.label_asym_id
_atom_site.label_seq_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
ATOM 1 CA ALA A 1 1.000 2.000 3.000
";

    #[test]
    fn extension_dispatch() {
        assert_eq!(StructureFormat::from_extension("cif"), StructureFormat::Mmcif);
        assert_eq!(StructureFormat::from_extension("CIF"), StructureFormat::Mmcif);
        assert_eq!(StructureFormat::from_extension("mmCIF"), StructureFormat::Mmcif);
        assert_eq!(StructureFormat::from_extension("pdb"), StructureFormat::Pdb);
        assert_eq!(StructureFormat::from_extension("ent"), StructureFormat::Pdb);
    }

    #[test]
    fn content_sniffing() {
        assert_eq!(StructureFormat::from_content(PDB_TEXT), Some(StructureFormat::Pdb));
        assert_eq!(StructureFormat::from_content(CIF_TEXT), Some(StructureFormat::Mmcif));
        assert_eq!(StructureFormat::from_content("hello\n"), None);
        assert_eq!(StructureFormat::from_content(""), None);
    }

    #[test]
    fn parse_either_format() {
        let pdb = parse_structure(PDB_TEXT, StructureFormat::Pdb).unwrap();
        let cif = parse_structure(CIF_TEXT, StructureFormat::Mmcif).unwrap();
        assert_eq!(pdb.atom_count(), 1);
        assert_eq!(cif.atom_count(), 1);
        assert_eq!(cif.id, "T");
    }

    #[cfg(feature = "std")]
    #[test]
    fn file_dispatch_by_extension() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();

        let cif_path = dir.path().join("model.CIF");
        std::fs::File::create(&cif_path)
            .unwrap()
            .write_all(CIF_TEXT.as_bytes())
            .unwrap();
        assert_eq!(parse_structure_file(&cif_path).unwrap().id, "T");

        let ent_path = dir.path().join("pdb1abc.ent");
        std::fs::write(&ent_path, PDB_TEXT).unwrap();
        assert_eq!(parse_structure_file(&ent_path).unwrap().atom_count(), 1);
    }
}
