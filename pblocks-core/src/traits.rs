//! Contracts shared by the pblocks crates.
//!
//! [`DihedralSource`] is the seam between structure readers and the
//! classifier; the rest describe how records identify and present themselves.

use crate::angles::AngleMap;

/// Anything that can report per-residue backbone dihedrals: a parsed chain,
/// a trajectory frame, or a precomputed table.
pub trait DihedralSource {
    /// Phi/psi angles keyed by residue number.
    fn angle_map(&self) -> AngleMap;
}

impl DihedralSource for AngleMap {
    fn angle_map(&self) -> AngleMap {
        self.clone()
    }
}

/// Symbols stored one byte each (amino acid codes, Protein Block letters).
pub trait Sequence {
    fn as_bytes(&self) -> &[u8];

    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// Identity derived from content: a lowercase hex SHA-256 digest.
pub trait ContentAddressable {
    fn content_hash(&self) -> String;
}

/// A value ranked by a numeric score, lower is better for deviations.
pub trait Scored {
    fn score(&self) -> f64;
}

/// Named records such as residues.
pub trait Annotated {
    fn name(&self) -> &str;

    /// Free-text description, if the record carries one.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// One-line, human-readable description of a record.
pub trait Summarizable {
    fn summary(&self) -> String;
}
