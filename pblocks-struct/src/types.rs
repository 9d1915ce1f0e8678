//! Atoms, residues, chains, and whole structures, plus the small vector type
//! their coordinates use.

use core::ops::{Add, Mul, Neg, Sub};

use pblocks_core::{Annotated, ContentAddressable, Summarizable};
use sha2::{Digest, Sha256};

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Cartesian coordinates, or a displacement between two of them, in
/// Angstroms.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const ORIGIN: Point3D = Point3D {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, rhs: Point3D) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn cross(self, rhs: Point3D) -> Point3D {
        Point3D::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Same direction, length 1. A zero vector stays zero.
    pub fn unit(self) -> Point3D {
        let len = self.length();
        if len < 1e-15 {
            Point3D::ORIGIN
        } else {
            self * (1.0 / len)
        }
    }
}

impl Add for Point3D {
    type Output = Point3D;

    fn add(self, rhs: Point3D) -> Point3D {
        Point3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Point3D;

    fn sub(self, rhs: Point3D) -> Point3D {
        Point3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3D {
    type Output = Point3D;

    fn mul(self, k: f64) -> Point3D {
        Point3D::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Neg for Point3D {
    type Output = Point3D;

    fn neg(self) -> Point3D {
        self * -1.0
    }
}

/// One ATOM or HETATM record.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    pub serial: u32,
    /// Trimmed atom name, e.g. `CA`.
    pub name: String,
    pub alt_loc: Option<char>,
    pub coords: Point3D,
    pub occupancy: f64,
    pub temp_factor: f64,
    pub element: Option<String>,
    /// Read from a HETATM record rather than ATOM.
    pub is_hetatm: bool,
}

impl Atom {
    /// A polymer atom with full occupancy and no alternate location.
    pub fn new(serial: u32, name: &str, coords: Point3D) -> Self {
        Self {
            serial,
            name: name.into(),
            alt_loc: None,
            coords,
            occupancy: 1.0,
            temp_factor: 0.0,
            element: None,
            is_hetatm: false,
        }
    }
}

/// Whether an atom name is one of the four peptide backbone atoms.
pub fn is_backbone_name(name: &str) -> bool {
    matches!(name.trim(), "N" | "CA" | "C" | "O")
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Residue {
    /// Residue name as written in the input, e.g. `ALA` or `HSD`.
    pub name: String,
    pub seq_num: i32,
    pub i_code: Option<char>,
    pub atoms: Vec<Atom>,
}

impl Residue {
    /// First atom called `name`; with alternate locations that is the first
    /// one listed.
    pub fn get_atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    /// True when at least one atom came from an ATOM record.
    pub fn is_polymer(&self) -> bool {
        self.atoms.iter().any(|a| !a.is_hetatm)
    }
}

impl Annotated for Residue {
    fn name(&self) -> &str {
        &self.name
    }
}

/// The residues sharing one chain identifier within one model.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chain {
    /// `' '` when the input leaves the identifier blank.
    pub id: char,
    /// Set for inputs with MODEL records (or `pdbx_PDB_model_num`).
    pub model: Option<u32>,
    pub residues: Vec<Residue>,
}

impl Chain {
    pub fn new(id: char, residues: Vec<Residue>) -> Self {
        Self::with_model(id, None, residues)
    }

    pub fn with_model(id: char, model: Option<u32>, residues: Vec<Residue>) -> Self {
        Self { id, model, residues }
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atoms.len()).sum()
    }

    pub fn is_polymer(&self) -> bool {
        self.residues.iter().any(Residue::is_polymer)
    }

    /// Record comment identifying this chain within `source`:
    /// `source | model M | chain C`, leaving out an absent model or blank
    /// chain identifier.
    pub fn comment(&self, source: &str) -> String {
        let mut comment = String::from(source);
        if let Some(model) = self.model {
            comment.push_str(&format!(" | model {}", model));
        }
        if !self.id.is_whitespace() {
            comment.push_str(&format!(" | chain {}", self.id));
        }
        comment
    }
}

/// Everything read from one structure file. Chains of successive models
/// follow each other in `chains`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure {
    /// PDB code from the header, or a name chosen by the caller.
    pub id: String,
    pub chains: Vec<Chain>,
}

impl Structure {
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Distinct models, counting a model-less structure as one.
    pub fn model_count(&self) -> usize {
        let mut models: Vec<Option<u32>> = self.chains.iter().map(|c| c.model).collect();
        models.dedup();
        models.len().max(1)
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(Chain::residue_count).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(Chain::atom_count).sum()
    }

    /// First chain with identifier `id`, in the first model that has it.
    pub fn get_chain(&self, id: char) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }
}

impl Summarizable for Structure {
    fn summary(&self) -> String {
        format!(
            "Structure {}: {} model(s), {} chain(s), {} residue(s), {} atom(s)",
            self.id,
            self.model_count(),
            self.chain_count(),
            self.residue_count(),
            self.atom_count(),
        )
    }
}

impl ContentAddressable for Structure {
    /// SHA-256 over identifiers, residue names and numbers, atom names, and
    /// coordinates, in input order.
    fn content_hash(&self) -> String {
        let mut digest = Sha256::new();
        digest.update(self.id.as_bytes());
        for chain in &self.chains {
            digest.update(chain.model.unwrap_or(0).to_le_bytes());
            digest.update(u32::from(chain.id).to_le_bytes());
            for residue in &chain.residues {
                digest.update(residue.name.as_bytes());
                digest.update(residue.seq_num.to_le_bytes());
                for atom in &residue.atoms {
                    digest.update(atom.name.as_bytes());
                    for v in [atom.coords.x, atom.coords.y, atom.coords.z] {
                        digest.update(v.to_le_bytes());
                    }
                }
            }
        }
        hex::encode(digest.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn atom_at(name: &str, x: f64, y: f64, z: f64) -> Atom {
        Atom::new(1, name, Point3D::new(x, y, z))
    }

    fn glycine(seq_num: i32) -> Residue {
        Residue {
            name: "GLY".into(),
            seq_num,
            i_code: None,
            atoms: vec![atom_at("N", 0.0, 0.0, 0.0), atom_at("CA", 1.5, 0.0, 0.0)],
        }
    }

    #[test]
    fn vector_operators() {
        let u = Point3D::new(1.0, -2.0, 0.5);
        let v = Point3D::new(0.0, 4.0, 2.0);
        assert_eq!(u + v, Point3D::new(1.0, 2.0, 2.5));
        assert_eq!(v - u, Point3D::new(-1.0, 6.0, 1.5));
        assert_eq!(u * 2.0, Point3D::new(2.0, -4.0, 1.0));
        assert_eq!(-u, Point3D::new(-1.0, 2.0, -0.5));
        assert_eq!(u.dot(v), -7.0);
    }

    #[test]
    fn cross_product_is_right_handed() {
        let k = Point3D::new(1.0, 0.0, 0.0).cross(Point3D::new(0.0, 1.0, 0.0));
        assert_eq!(k, Point3D::new(0.0, 0.0, 1.0));
        let u = Point3D::new(0.3, -1.2, 2.0);
        assert_eq!(u.cross(u), Point3D::ORIGIN);
    }

    #[test]
    fn length_and_unit() {
        let v = Point3D::new(0.0, 6.0, 8.0);
        assert_eq!(v.length(), 10.0);
        assert!((v.unit().length() - 1.0).abs() < 1e-12);
        assert_eq!(Point3D::ORIGIN.unit(), Point3D::ORIGIN);
    }

    #[test]
    fn backbone_names() {
        for name in ["N", "CA", "C", "O", " CA "] {
            assert!(is_backbone_name(name), "{}", name);
        }
        for name in ["CB", "OXT", "H", "NZ"] {
            assert!(!is_backbone_name(name), "{}", name);
        }
    }

    #[test]
    fn hetero_only_residue_is_not_polymer() {
        let mut r = glycine(7);
        assert!(r.is_polymer());
        assert_eq!(r.get_atom("CA").map(|a| a.coords.x), Some(1.5));
        assert!(r.get_atom("CB").is_none());
        r.atoms.iter_mut().for_each(|a| a.is_hetatm = true);
        assert!(!r.is_polymer());
        assert!(!Chain::new('W', vec![r]).is_polymer());
    }

    #[test]
    fn chain_comment() {
        let plain = Chain::new('A', vec![]);
        assert_eq!(plain.comment("1abc.pdb"), "1abc.pdb | chain A");
        let model = Chain::with_model('B', Some(3), vec![]);
        assert_eq!(model.comment("2xyz.pdb"), "2xyz.pdb | model 3 | chain B");
        let anonymous = Chain::with_model(' ', Some(1), vec![]);
        assert_eq!(anonymous.comment("nmr.pdb"), "nmr.pdb | model 1");
        assert_eq!(Chain::new(' ', vec![]).comment("x.pdb"), "x.pdb");
    }

    #[test]
    fn counts_across_models() {
        let s = Structure {
            id: "2NMR".into(),
            chains: vec![
                Chain::with_model('A', Some(1), vec![glycine(1), glycine(2)]),
                Chain::with_model('B', Some(1), vec![glycine(1)]),
                Chain::with_model('A', Some(2), vec![glycine(1), glycine(2)]),
            ],
        };
        assert_eq!(s.chain_count(), 3);
        assert_eq!(s.model_count(), 2);
        assert_eq!(s.residue_count(), 5);
        assert_eq!(s.atom_count(), 10);
        assert_eq!(s.get_chain('A').and_then(|c| c.model), Some(1));
        assert_eq!(
            s.summary(),
            "Structure 2NMR: 2 model(s), 3 chain(s), 5 residue(s), 10 atom(s)"
        );
    }

    #[test]
    fn content_hash_tracks_coordinates() {
        let mut s = Structure {
            id: "1ABC".into(),
            chains: vec![Chain::new('A', vec![glycine(1)])],
        };
        let before = s.content_hash();
        assert_eq!(before.len(), 64);
        assert_eq!(before, s.content_hash());

        s.chains[0].residues[0].atoms[1].coords.z = 0.001;
        assert_ne!(before, s.content_hash());
    }
}
