//! Ideal backbone construction from torsion angles.
//!
//! Atoms are placed one at a time with the Natural Extension Reference Frame
//! (NeRF) method: each new atom is positioned from the three preceding atoms,
//! a bond length, a bond angle, and a torsion. Bond geometry is fixed to
//! standard peptide values and omega to 180 degrees, so the phi/psi angles
//! measured back from the chain equal the ones it was built from.

use crate::types::{Atom, Chain, Point3D, Residue};

use alloc::string::String;
use alloc::vec::Vec;

pub const N_CA_BOND: f64 = 1.458;
pub const CA_C_BOND: f64 = 1.525;
pub const C_N_BOND: f64 = 1.329;
pub const C_O_BOND: f64 = 1.231;

pub const N_CA_C_ANGLE: f64 = 111.2;
pub const CA_C_N_ANGLE: f64 = 116.2;
pub const C_N_CA_ANGLE: f64 = 121.7;
pub const CA_C_O_ANGLE: f64 = 120.5;

/// Position atom D so that |CD| = `bond`, angle BCD = `angle_deg`, and
/// torsion ABCD = `torsion_deg`.
pub fn place_atom(
    a: &Point3D,
    b: &Point3D,
    c: &Point3D,
    bond: f64,
    angle_deg: f64,
    torsion_deg: f64,
) -> Point3D {
    let bc = (*c - *b).unit();
    let n = (*b - *a).cross(bc).unit();
    let m = n.cross(bc);

    let theta = angle_deg.to_radians();
    let chi = torsion_deg.to_radians();

    *c + bc * (-bond * theta.cos())
        + m * (bond * theta.sin() * chi.cos())
        + n * (bond * theta.sin() * chi.sin())
}

/// Build an alanine backbone (N, CA, C, O) with one residue per
/// `(phi, psi)` pair, numbered from 1.
///
/// The first residue's phi and the last residue's psi have no neighbor to
/// span; psi still orients the last carbonyl oxygen.
pub fn ideal_backbone(id: char, torsions: &[(f64, f64)]) -> Chain {
    let mut residues: Vec<Residue> = Vec::with_capacity(torsions.len());
    let mut serial = 1u32;

    let mut n = Point3D::ORIGIN;
    let mut ca = Point3D::new(N_CA_BOND, 0.0, 0.0);
    let mut c = ca + Point3D::new(0.55, 1.42, 0.0);

    for (i, &(phi, psi)) in torsions.iter().enumerate() {
        if i > 0 {
            let (_, prev_psi) = torsions[i - 1];
            let next_n = place_atom(&n, &ca, &c, C_N_BOND, CA_C_N_ANGLE, prev_psi);
            let next_ca = place_atom(&ca, &c, &next_n, N_CA_BOND, C_N_CA_ANGLE, 180.0);
            let next_c = place_atom(&c, &next_n, &next_ca, CA_C_BOND, N_CA_C_ANGLE, phi);
            n = next_n;
            ca = next_ca;
            c = next_c;
        }
        let o = place_atom(&n, &ca, &c, C_O_BOND, CA_C_O_ANGLE, psi + 180.0);

        let atoms = [("N", n), ("CA", ca), ("C", c), ("O", o)]
            .into_iter()
            .map(|(name, coords)| {
                let mut atom = Atom::new(serial, name, coords);
                atom.element = name.get(..1).map(String::from);
                serial += 1;
                atom
            })
            .collect();

        residues.push(Residue {
            name: "ALA".into(),
            seq_num: i as i32 + 1,
            i_code: None,
            atoms,
        });
    }

    Chain::new(id, residues)
}
