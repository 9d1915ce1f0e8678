//! Coordinate geometry: distances and dihedrals.

use crate::types::{Atom, Point3D};

/// Euclidean distance between two atoms.
pub fn distance(a1: &Atom, a2: &Atom) -> f64 {
    (a1.coords - a2.coords).length()
}

/// Dihedral (torsion) angle in degrees defined by four atoms.
pub fn dihedral(a1: &Atom, a2: &Atom, a3: &Atom, a4: &Atom) -> f64 {
    dihedral_points(&a1.coords, &a2.coords, &a3.coords, &a4.coords)
}

/// Dihedral (torsion) angle in degrees defined by four points, in
/// (-180, 180] with the IUPAC sign convention.
pub fn dihedral_points(p1: &Point3D, p2: &Point3D, p3: &Point3D, p4: &Point3D) -> f64 {
    let b1 = *p2 - *p1;
    let b2 = *p3 - *p2;
    let b3 = *p4 - *p3;

    // Normals of the two planes, and a third axis completing the frame.
    let n1 = b1.cross(b2);
    let n2 = b2.cross(b3);
    let m1 = n1.cross(b2.unit());

    (-m1.dot(n2)).atan2(n1.dot(n2)).to_degrees()
}
