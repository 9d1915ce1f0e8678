//! Protein Block assignment for the pblocks workspace.
//!
//! Protein Blocks (PBs) are 16 structural letters, each a prototype of the
//! backbone conformation of a five-residue fragment. This crate turns the
//! per-residue phi/psi torsions of a chain into a PB sequence:
//!
//! - **Circular angles**: periodic normalization and deviations in [`angle`]
//! - **Reference library**: parsing and validation of block prototypes in
//!   [`library`]
//! - **Assignment**: window construction and best-match selection in
//!   [`classify`]
//! - **Output**: FASTA, flat, and phi/psi text records in [`output`]
//!
//! # Quick start
//!
//! ```
//! use pblocks_assign::{assign_protein_blocks, ReferenceLibrary};
//! use pblocks_core::{AngleMap, PhiPsi};
//!
//! let library = ReferenceLibrary::canonical().unwrap();
//!
//! // Seven residues of ideal alpha-helix.
//! let angles: AngleMap = (1..=7).map(|i| (i, PhiPsi::new(-57.0, -47.0))).collect();
//!
//! let pbs = assign_protein_blocks(&library, &angles);
//! assert_eq!(pbs.as_str(), "ZZmmmZZ");
//! ```

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod angle;
pub mod classify;
pub mod library;
pub mod output;

pub use angle::{angle_modulo_360, circular_difference};
pub use classify::{
    assign_batch, assign_protein_blocks, assign_residue, assign_source, classify_window, BlockMatch,
    DihedralWindow, PbSequence,
};
pub use library::{ProteinBlock, ReferenceLibrary, PB_DEFINITIONS, UNASSIGNED, WINDOW_SIZE};
