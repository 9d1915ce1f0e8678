//! Backbone phi/psi extraction.

use pblocks_core::{AngleMap, DihedralSource, PhiPsi};

use crate::geometry::dihedral_points;
use crate::types::{Chain, Residue};

use alloc::collections::BTreeMap;

/// Compute backbone dihedral angles (phi, psi) for a residue given its neighbors.
///
/// - `prev`: previous residue (needed for phi: C(i-1)–N(i)–CA(i)–C(i))
/// - `curr`: current residue
/// - `next`: next residue (needed for psi: N(i)–CA(i)–C(i)–N(i+1))
///
/// Each angle is `None` when a neighbor or one of its atoms is missing; the
/// other angle is still computed.
pub fn backbone_dihedrals(prev: Option<&Residue>, curr: &Residue, next: Option<&Residue>) -> PhiPsi {
    let position = |residue: &Residue, name: &str| residue.get_atom(name).map(|a| a.coords);

    let n_i = position(curr, "N");
    let ca_i = position(curr, "CA");
    let c_i = position(curr, "C");

    let phi = match (prev.and_then(|p| position(p, "C")), n_i, ca_i, c_i) {
        (Some(c_prev), Some(n), Some(ca), Some(c)) => Some(dihedral_points(&c_prev, &n, &ca, &c)),
        _ => None,
    };
    let psi = match (n_i, ca_i, c_i, next.and_then(|r| position(r, "N"))) {
        (Some(n), Some(ca), Some(c), Some(n_next)) => Some(dihedral_points(&n, &ca, &c, &n_next)),
        _ => None,
    };

    PhiPsi { phi, psi }
}

/// Phi/psi for every polymer residue, keyed by residue number.
///
/// Neighbors are looked up by number (i-1 and i+1), not by position, so a
/// numbering gap leaves the torsions that would span it unresolved. When a
/// number occurs more than once (insertion codes) the first residue is used.
/// Residues made only of HETATM records are ignored.
pub fn backbone_angle_map(residues: &[Residue]) -> AngleMap {
    let mut by_number: BTreeMap<i32, &Residue> = BTreeMap::new();
    for residue in residues.iter().filter(|r| r.is_polymer()) {
        if by_number.contains_key(&residue.seq_num) {
            log::debug!(
                "skipping duplicate residue {} {}{}",
                residue.name,
                residue.seq_num,
                residue.i_code.unwrap_or(' ')
            );
            continue;
        }
        by_number.insert(residue.seq_num, residue);
    }

    let neighbor = |number: i32, offset: i32| {
        number
            .checked_add(offset)
            .and_then(|n| by_number.get(&n).copied())
    };

    by_number
        .iter()
        .map(|(&number, residue)| {
            let angles = backbone_dihedrals(neighbor(number, -1), residue, neighbor(number, 1));
            (number, angles)
        })
        .collect()
}

impl DihedralSource for Chain {
    fn angle_map(&self) -> AngleMap {
        backbone_angle_map(&self.residues)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::builder::ideal_backbone;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn built_torsions_are_measured_back(
            torsions in proptest::collection::vec((-175.0f64..175.0, -175.0f64..175.0), 2..20)
        ) {
            let chain = ideal_backbone('A', &torsions);
            let angles = chain.angle_map();
            prop_assert_eq!(angles.len(), torsions.len());

            let measured: Vec<&PhiPsi> = angles.values().collect();
            for (i, (phi, psi)) in torsions.iter().enumerate() {
                if i > 0 {
                    let got = measured[i].phi.unwrap();
                    prop_assert!((got - phi).abs() < 1e-6, "phi {} vs {}", got, phi);
                }
                if i + 1 < torsions.len() {
                    let got = measured[i].psi.unwrap();
                    prop_assert!((got - psi).abs() < 1e-6, "psi {} vs {}", got, psi);
                }
            }
            prop_assert!(measured[0].phi.is_none());
            prop_assert!(measured[torsions.len() - 1].psi.is_none());
        }
    }
}
