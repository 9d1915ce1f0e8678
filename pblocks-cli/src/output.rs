//! Result files: `<NAME>.PB.fasta`, plus `<NAME>.PB.flat` and
//! `<NAME>.PB.phipsi` on request.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use pblocks_assign::output::{format_fasta, format_flat, format_phipsi};
use pblocks_assign::PbSequence;
use pblocks_core::AngleMap;

/// Paths of the result files for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub fasta: PathBuf,
    pub flat: Option<PathBuf>,
    pub phipsi: Option<PathBuf>,
}

impl OutputPaths {
    pub fn new(prefix: &str, flat: bool, phipsi: bool) -> Self {
        let with_suffix = |suffix: &str| PathBuf::from(format!("{}{}", prefix, suffix));
        Self {
            fasta: with_suffix(".PB.fasta"),
            flat: flat.then(|| with_suffix(".PB.flat")),
            phipsi: phipsi.then(|| with_suffix(".PB.phipsi")),
        }
    }

    /// Every path in use, fasta first.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.fasta.as_path())
            .chain(self.flat.as_deref())
            .chain(self.phipsi.as_deref())
    }
}

/// Open result files. Creating them truncates any previous content; records
/// are then appended in processing order.
pub struct OutputFiles {
    paths: OutputPaths,
    fasta: BufWriter<File>,
    flat: Option<BufWriter<File>>,
    phipsi: Option<BufWriter<File>>,
    records: usize,
}

fn create(path: &Path) -> io::Result<BufWriter<File>> {
    File::create(path).map(BufWriter::new)
}

impl OutputFiles {
    pub fn create(paths: OutputPaths) -> io::Result<Self> {
        Ok(Self {
            fasta: create(&paths.fasta)?,
            flat: paths.flat.as_deref().map(create).transpose()?,
            phipsi: paths.phipsi.as_deref().map(create).transpose()?,
            paths,
            records: 0,
        })
    }

    /// Phi/psi table of one record, when requested.
    pub fn write_phipsi(&mut self, comment: &str, angles: &AngleMap) -> io::Result<()> {
        if let Some(out) = self.phipsi.as_mut() {
            out.write_all(format_phipsi(comment, angles).as_bytes())?;
        }
        Ok(())
    }

    /// FASTA record, plus the flat line when requested.
    pub fn write_sequence(&mut self, comment: &str, sequence: &PbSequence) -> io::Result<()> {
        self.fasta
            .write_all(format_fasta(comment, sequence.as_str()).as_bytes())?;
        if let Some(out) = self.flat.as_mut() {
            out.write_all(format_flat(sequence).as_bytes())?;
        }
        self.records += 1;
        Ok(())
    }

    /// Number of sequences written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush everything and return the paths written.
    pub fn finish(mut self) -> io::Result<OutputPaths> {
        self.fasta.flush()?;
        for out in self.flat.iter_mut().chain(self.phipsi.iter_mut()) {
            out.flush()?;
        }
        Ok(self.paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pblocks_assign::{assign_protein_blocks, ReferenceLibrary};
    use pblocks_core::PhiPsi;
    use std::fs;

    #[test]
    fn path_suffixes() {
        let paths = OutputPaths::new("results/run1", true, false);
        assert_eq!(paths.fasta, PathBuf::from("results/run1.PB.fasta"));
        assert_eq!(paths.flat, Some(PathBuf::from("results/run1.PB.flat")));
        assert_eq!(paths.phipsi, None);
        assert_eq!(paths.iter().count(), 2);
    }

    #[test]
    fn records_are_appended_after_truncation() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out");
        let paths = OutputPaths::new(prefix.to_str().unwrap(), true, true);
        fs::write(&paths.fasta, "stale content\n").unwrap();

        let library = ReferenceLibrary::parse("a 0 0 0 0 0 0 0 0\n").unwrap();
        let angles: AngleMap = (1..=5).map(|i| (i, PhiPsi::new(0.0, 0.0))).collect();
        let pbs = assign_protein_blocks(&library, &angles);

        let mut files = OutputFiles::create(paths).unwrap();
        for comment in ["first", "second"] {
            files.write_phipsi(comment, &angles).unwrap();
            files.write_sequence(comment, &pbs).unwrap();
        }
        assert_eq!(files.records(), 2);
        let paths = files.finish().unwrap();

        assert_eq!(
            fs::read_to_string(&paths.fasta).unwrap(),
            ">first\nZZaZZ\n>second\nZZaZZ\n"
        );
        assert_eq!(
            fs::read_to_string(paths.flat.unwrap()).unwrap(),
            "ZZaZZ\nZZaZZ\n"
        );
        let phipsi = fs::read_to_string(paths.phipsi.unwrap()).unwrap();
        assert_eq!(phipsi.lines().count(), 10);
        assert!(phipsi.starts_with("first      1     0.00     0.00 \n"));
    }

    #[test]
    fn unrequested_files_are_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("only");
        let paths = OutputPaths::new(prefix.to_str().unwrap(), false, false);
        let files = OutputFiles::create(paths).unwrap();
        files.finish().unwrap();
        assert!(dir.path().join("only.PB.fasta").exists());
        assert!(!dir.path().join("only.PB.flat").exists());
        assert!(!dir.path().join("only.PB.phipsi").exists());
    }
}
