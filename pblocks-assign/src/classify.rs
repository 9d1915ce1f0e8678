//! Protein Block assignment.
//!
//! Each residue *i* is described by the eight backbone torsions of the
//! five-residue window centred on it:
//!
//! ```text
//! psi(i-2) phi(i-1) psi(i-1) phi(i) psi(i) phi(i+1) psi(i+1) phi(i+2)
//! ```
//!
//! The window is compared with every block of a [`ReferenceLibrary`] by the
//! sum of squared circular deviations, and the closest block wins. Residues
//! whose window cannot be built (chain ends, gaps in the numbering, missing
//! torsions) receive [`UNASSIGNED`].

use core::fmt;

use pblocks_core::{AngleMap, DihedralSource, PhiPsi, Scored, Sequence, Summarizable};

use crate::angle::squared_circular_deviation;
use crate::library::{ReferenceLibrary, UNASSIGNED, WINDOW_SIZE};

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// The eight torsions around one residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DihedralWindow([f64; WINDOW_SIZE]);

impl DihedralWindow {
    /// Wrap an explicit set of angles.
    pub fn new(angles: [f64; WINDOW_SIZE]) -> Self {
        Self(angles)
    }

    /// Build the window centred on `residue`.
    ///
    /// Neighbors are looked up by absolute residue number, so a gap in the
    /// numbering counts as a missing residue. Returns `None` if any of
    /// residues `residue-2..=residue+2` is absent, if a required torsion is
    /// unresolved or non-finite, or if the neighbor numbers overflow.
    pub fn around(angles: &AngleMap, residue: i32) -> Option<Self> {
        let at = |offset: i32| neighbor(angles, residue, offset);

        let window = [
            at(-2)?.psi?,
            at(-1)?.phi?,
            at(-1)?.psi?,
            at(0)?.phi?,
            at(0)?.psi?,
            at(1)?.phi?,
            at(1)?.psi?,
            at(2)?.phi?,
        ];
        if window.iter().all(|a| a.is_finite()) {
            Some(Self(window))
        } else {
            None
        }
    }

    /// The angles, in window order.
    pub fn angles(&self) -> &[f64; WINDOW_SIZE] {
        &self.0
    }
}

fn neighbor(angles: &AngleMap, residue: i32, offset: i32) -> Option<&PhiPsi> {
    angles.get(&residue.checked_add(offset)?)
}

/// The best-matching block for one window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockMatch {
    /// Label of the closest block.
    pub label: char,
    /// Sum of squared circular deviations to that block (degrees²).
    pub deviation: f64,
}

impl Scored for BlockMatch {
    fn score(&self) -> f64 {
        self.deviation
    }
}

/// Find the block closest to `window`.
///
/// Blocks are scanned in ascending label order and the incumbent is only
/// replaced by a strictly smaller deviation, so exact ties go to the
/// smallest label. Returns `None` only for an empty library.
pub fn classify_window(library: &ReferenceLibrary, window: &DihedralWindow) -> Option<BlockMatch> {
    let mut best: Option<BlockMatch> = None;
    for block in library.blocks() {
        let deviation = squared_circular_deviation(&block.angles, window.angles());
        match best {
            Some(b) if deviation >= b.deviation => {}
            _ => {
                best = Some(BlockMatch {
                    label: block.label,
                    deviation,
                })
            }
        }
    }
    best
}

/// Label of a single residue, or [`UNASSIGNED`].
pub fn assign_residue(library: &ReferenceLibrary, angles: &AngleMap, residue: i32) -> char {
    DihedralWindow::around(angles, residue)
        .and_then(|w| classify_window(library, &w))
        .map_or(UNASSIGNED, |m| m.label)
}

/// Assign a Protein Block to every residue of `angles`, in ascending
/// residue order.
///
/// Never fails: unclassifiable residues become [`UNASSIGNED`] and an empty
/// map gives an empty sequence.
///
/// ```
/// use pblocks_assign::{assign_protein_blocks, ReferenceLibrary};
/// use pblocks_core::{AngleMap, PhiPsi};
///
/// let lib = ReferenceLibrary::parse("a 0 0 0 0 0 0 0 0\nb 10 10 10 10 10 10 10 10\n").unwrap();
/// let angles: AngleMap = (1..=5).map(|i| (i, PhiPsi::new(0.0, 0.0))).collect();
/// assert_eq!(assign_protein_blocks(&lib, &angles).as_str(), "ZZaZZ");
/// ```
pub fn assign_protein_blocks(library: &ReferenceLibrary, angles: &AngleMap) -> PbSequence {
    let labels: String = angles
        .keys()
        .map(|&residue| assign_residue(library, angles, residue))
        .collect();
    PbSequence { labels }
}

/// Assign Protein Blocks to anything that can report backbone torsions.
pub fn assign_source<S: DihedralSource + ?Sized>(library: &ReferenceLibrary, source: &S) -> PbSequence {
    assign_protein_blocks(library, &source.angle_map())
}

/// Assign many angle maps against one library, e.g. the frames of a
/// trajectory. Results keep the input order.
pub fn assign_batch(library: &ReferenceLibrary, maps: &[AngleMap]) -> Vec<PbSequence> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        maps.par_iter()
            .map(|angles| assign_protein_blocks(library, angles))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    maps.iter()
        .map(|angles| assign_protein_blocks(library, angles))
        .collect()
}

/// One Protein Block label per residue, in residue order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PbSequence {
    labels: String,
}

impl PbSequence {
    /// The labels as a string.
    pub fn as_str(&self) -> &str {
        &self.labels
    }

    /// Consume into the label string.
    pub fn into_string(self) -> String {
        self.labels
    }

    /// Number of residues that received [`UNASSIGNED`].
    pub fn unassigned_count(&self) -> usize {
        self.labels.chars().filter(|&c| c == UNASSIGNED).count()
    }

    /// Occurrences of each assigned block label.
    pub fn block_counts(&self) -> BTreeMap<char, usize> {
        let mut counts = BTreeMap::new();
        for c in self.labels.chars().filter(|&c| c != UNASSIGNED) {
            *counts.entry(c).or_insert(0) += 1;
        }
        counts
    }
}

impl Sequence for PbSequence {
    fn as_bytes(&self) -> &[u8] {
        self.labels.as_bytes()
    }
}

impl fmt::Display for PbSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.labels)
    }
}

impl Summarizable for PbSequence {
    fn summary(&self) -> String {
        let unassigned = self.unassigned_count();
        format!(
            "PB sequence: {} residue(s), {} assigned, {} unassigned",
            self.len(),
            self.len() - unassigned,
            unassigned,
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn angle() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![
            9 => (-180.0f64..=180.0).prop_map(Some),
            1 => Just(None),
        ]
    }

    /// Sparse residue numbering with occasional unresolved torsions.
    fn angle_map() -> impl Strategy<Value = AngleMap> {
        proptest::collection::btree_map(-20i32..60, (angle(), angle()), 0..50).prop_map(|m| {
            m.into_iter()
                .map(|(k, (phi, psi))| (k, PhiPsi { phi, psi }))
                .collect()
        })
    }

    fn window_complete(angles: &AngleMap, i: i32) -> bool {
        let get = |o: i32| angles.get(&(i + o));
        matches!(
            (get(-2), get(-1), get(0), get(1), get(2)),
            (Some(a), Some(b), Some(c), Some(d), Some(e))
                if a.psi.is_some() && b.is_complete() && c.is_complete()
                    && d.is_complete() && e.phi.is_some()
        )
    }

    proptest! {
        #[test]
        fn one_label_per_residue(angles in angle_map()) {
            let lib = ReferenceLibrary::canonical().unwrap();
            let seq = assign_protein_blocks(&lib, &angles);
            prop_assert_eq!(seq.len(), angles.len());
        }

        #[test]
        fn sentinel_exactly_where_window_incomplete(angles in angle_map()) {
            let lib = ReferenceLibrary::canonical().unwrap();
            let seq = assign_protein_blocks(&lib, &angles);
            for (label, &residue) in seq.as_str().chars().zip(angles.keys()) {
                prop_assert_eq!(label == UNASSIGNED, !window_complete(&angles, residue));
            }
        }

        #[test]
        fn deterministic(angles in angle_map()) {
            let lib = ReferenceLibrary::canonical().unwrap();
            prop_assert_eq!(
                assign_protein_blocks(&lib, &angles),
                assign_protein_blocks(&lib, &angles)
            );
        }

        #[test]
        fn best_match_is_minimal(w in proptest::collection::vec(-180.0f64..=180.0, WINDOW_SIZE)) {
            let lib = ReferenceLibrary::canonical().unwrap();
            let mut arr = [0.0; WINDOW_SIZE];
            arr.copy_from_slice(&w);
            let window = DihedralWindow::new(arr);
            let best = classify_window(&lib, &window).unwrap();
            let deviations: Vec<f64> = lib
                .blocks()
                .iter()
                .map(|b| squared_circular_deviation(&b.angles, window.angles()))
                .collect();
            for d in &deviations {
                prop_assert!(best.deviation <= *d);
            }
            // Random windows do not produce exact ties with the canonical blocks.
            prop_assert_eq!(deviations.iter().filter(|&&d| d == best.deviation).count(), 1);
        }

        #[test]
        fn window_shift_invariance(w in proptest::collection::vec(-180.0f64..=180.0, WINDOW_SIZE), turns in -3i32..=3) {
            let lib = ReferenceLibrary::canonical().unwrap();
            let mut arr = [0.0; WINDOW_SIZE];
            arr.copy_from_slice(&w);
            let shifted = arr.map(|a| a + 360.0 * turns as f64);
            let a = classify_window(&lib, &DihedralWindow::new(arr)).unwrap();
            let b = classify_window(&lib, &DihedralWindow::new(shifted)).unwrap();
            prop_assert_eq!(a.label, b.label);
        }
    }
}
