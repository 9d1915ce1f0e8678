//! Per-residue backbone torsions exchanged between angle providers and the
//! Protein Block classifier.

use std::collections::BTreeMap;

/// Backbone phi/psi torsions of one residue, in degrees.
///
/// `None` marks a torsion that could not be computed (chain terminus,
/// missing neighbor, missing atom).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhiPsi {
    pub phi: Option<f64>,
    pub psi: Option<f64>,
}

impl PhiPsi {
    /// Both torsions resolved.
    pub fn new(phi: f64, psi: f64) -> Self {
        Self {
            phi: Some(phi),
            psi: Some(psi),
        }
    }

    /// Neither torsion resolved.
    pub fn unresolved() -> Self {
        Self::default()
    }

    /// Whether both torsions are present.
    pub fn is_complete(&self) -> bool {
        self.phi.is_some() && self.psi.is_some()
    }
}

/// Phi/psi torsions keyed by absolute residue number, iterated in ascending
/// residue order. Gaps in the numbering are missing residues.
pub type AngleMap = BTreeMap<i32, PhiPsi>;
