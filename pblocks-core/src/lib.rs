//! Shared primitives and traits for the pblocks workspace.
//!
//! `pblocks-core` provides the foundation the other pblocks crates build on:
//!
//! - **Error types**: [`PbError`] and [`Result`] for structured error handling
//! - **Traits**: [`Summarizable`], [`ContentAddressable`], [`Scored`], and the
//!   [`DihedralSource`] seam between structure readers and the classifier
//! - **Angles**: [`PhiPsi`] and [`AngleMap`], the per-residue torsion table

pub mod angles;
pub mod error;
pub mod traits;

pub use angles::{AngleMap, PhiPsi};
pub use error::{PbError, Result};
pub use traits::*;
