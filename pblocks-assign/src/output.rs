//! Text formats for Protein Block results.
//!
//! All functions return the text of one record; callers append it to their
//! output files.

use core::fmt::Write;

use pblocks_core::AngleMap;

use crate::classify::PbSequence;

use alloc::string::String;

/// Residues per line in FASTA records.
pub const FASTA_WIDTH: usize = 60;

/// FASTA record: `>comment` then the sequence wrapped at [`FASTA_WIDTH`].
///
/// ```
/// # use pblocks_assign::output::format_fasta;
/// assert_eq!(format_fasta("1abc.pdb | chain A", "ZZmmZZ"), ">1abc.pdb | chain A\nZZmmZZ\n");
/// ```
pub fn format_fasta(comment: &str, sequence: &str) -> String {
    let mut out = String::with_capacity(comment.len() + sequence.len() + sequence.len() / FASTA_WIDTH + 3);
    out.push('>');
    out.push_str(comment);
    out.push('\n');
    // Labels are ASCII, so byte chunks are character chunks.
    let lines: alloc::vec::Vec<&str> = sequence
        .as_bytes()
        .chunks(FASTA_WIDTH)
        .filter_map(|chunk| core::str::from_utf8(chunk).ok())
        .collect();
    out.push_str(&lines.join("\n"));
    out.push('\n');
    out
}

/// One sequence per line.
pub fn format_flat(sequence: &PbSequence) -> String {
    let mut out = String::with_capacity(sequence.as_str().len() + 1);
    out.push_str(sequence.as_str());
    out.push('\n');
    out
}

/// Phi/psi table: one line per residue with the record comment, residue
/// number, and both torsions (`None` when unresolved).
///
/// ```
/// # use pblocks_assign::output::format_phipsi;
/// # use pblocks_core::{AngleMap, PhiPsi};
/// let mut angles = AngleMap::new();
/// angles.insert(1, PhiPsi { phi: None, psi: Some(142.5) });
/// assert_eq!(format_phipsi("x.pdb", &angles), "x.pdb      1     None   142.50 \n");
/// ```
pub fn format_phipsi(comment: &str, angles: &AngleMap) -> String {
    let mut out = String::new();
    for (residue, torsions) in angles {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{} {:6} {} {} ",
            comment,
            residue,
            torsion_column(torsions.phi),
            torsion_column(torsions.psi)
        );
    }
    out
}

fn torsion_column(angle: Option<f64>) -> String {
    match angle {
        Some(a) => alloc::format!("{:8.2}", a),
        None => String::from("    None"),
    }
}
