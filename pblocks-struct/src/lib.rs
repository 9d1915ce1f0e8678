//! Protein structures and backbone torsions for the pblocks workspace.
//!
//! - **PDB parsing**: every model of a PDB file with [`pdb::parse_pdb`]
//! - **mmCIF parsing**: `_atom_site` tables with [`mmcif::parse_mmcif`]
//! - **Format dispatch**: extension-based [`parse_structure_file`]
//! - **Trajectories**: GRO frames and backbone [`gro::Topology`], plus XTC
//!   frames with the `xtc` feature
//! - **Dihedrals**: phi/psi tables in [`dihedrals`], exposed through
//!   [`DihedralSource`](pblocks_core::DihedralSource) on [`Chain`]
//! - **Ideal backbones**: NeRF chain construction in [`builder`]
//!
//! # Quick start
//!
//! ```
//! use pblocks_struct::pdb::parse_pdb;
//! use pblocks_core::{DihedralSource, Summarizable};
//!
//! let pdb_text = "\
//! HEADER                                                        1TST
//! ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
//! ATOM      2  CA  ALA A   1       1.458   0.000   0.000  1.00  0.00           C
//! ATOM      3  C   ALA A   1       2.008   1.420   0.000  1.00  0.00           C
//! ATOM      4  N   ALA A   2       3.326   1.559   0.000  1.00  0.00           N
//! TER
//! END
//! ";
//!
//! let structure = parse_pdb(pdb_text).unwrap();
//! assert!(structure.summary().contains("1TST"));
//!
//! let angles = structure.chains[0].angle_map();
//! assert_eq!(angles.len(), 2);
//! assert!(angles[&1].phi.is_none());
//! assert!(angles[&1].psi.is_some());
//! ```

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod builder;
pub mod detect;
pub mod dihedrals;
pub mod geometry;
pub mod gro;
pub mod mmcif;
pub mod pdb;
pub mod types;
#[cfg(feature = "xtc")]
pub mod xtc;

#[cfg(feature = "std")]
pub use detect::parse_structure_file;
pub use detect::{parse_structure, StructureFormat, STRUCTURE_EXTENSIONS};
pub use dihedrals::{backbone_angle_map, backbone_dihedrals};
pub use geometry::{dihedral, dihedral_points, distance};
pub use gro::{parse_gro, GroAtom, GroFrame, Topology};
pub use mmcif::parse_mmcif;
pub use pdb::{parse_pdb, write_pdb};
pub use types::{Atom, Chain, Point3D, Residue, Structure};
#[cfg(feature = "xtc")]
pub use xtc::{read_xtc, XtcFrame, XtcReader};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use pblocks_assign::{assign_source, ReferenceLibrary};
    use pblocks_core::Summarizable;

    #[test]
    fn integration_parse_and_assign() {
        let mut chain = builder::ideal_backbone('A', &[(-57.0, -47.0); 8]);
        chain.model = None;
        let text = write_pdb(&Structure {
            id: "HLX".into(),
            chains: vec![chain],
        });

        let s = parse_pdb(&text).unwrap();
        assert_eq!(s.chain_count(), 1);
        assert_eq!(s.residue_count(), 8);
        assert!(s.summary().contains("8 residue"));

        let library = ReferenceLibrary::canonical().unwrap();
        let pbs = assign_source(&library, s.get_chain('A').unwrap());
        assert_eq!(pbs.as_str(), "ZZmmmmZZ");
    }

    #[test]
    fn integration_strand_and_models() {
        let mut first = builder::ideal_backbone('B', &[(-120.0, 135.0); 7]);
        first.model = Some(1);
        let mut second = builder::ideal_backbone('B', &[(-57.0, -47.0); 7]);
        second.model = Some(2);
        let text = write_pdb(&Structure {
            id: "NMR".into(),
            chains: vec![first, second],
        });

        let s = parse_pdb(&text).unwrap();
        let library = ReferenceLibrary::canonical().unwrap();
        let sequences: vec::Vec<_> = s
            .chains
            .iter()
            .map(|c| assign_source(&library, c).into_string())
            .collect();
        assert_eq!(sequences, ["ZZdddZZ", "ZZmmmZZ"]);
    }
}
