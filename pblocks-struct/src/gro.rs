//! GROMACS GRO coordinate files and backbone topologies.
//!
//! A GRO frame is a title line, an atom count, fixed-width atom lines, and a
//! box line. Coordinates are stored in nanometers and converted to Angstroms
//! on read. Several frames may follow one another in the same file.
//!
//! A [`Topology`] remembers which atoms of a system form the protein backbone
//! so that a chain can be rebuilt from any coordinate frame of that system,
//! such as the frames of an XTC trajectory.

use pblocks_core::{PbError, Result};

use crate::types::{is_backbone_name, Atom, Chain, Point3D, Residue};

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Nanometers to Angstroms.
pub const NM_TO_ANGSTROM: f64 = 10.0;

/// Residue names treated as protein when selecting the backbone.
const PROTEIN_RESIDUES: &[&str] = &[
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE", "LEU", "LYS", "MET",
    "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL", "HSD", "HSE", "HSP", "HID", "HIE", "HIP",
    "CYX", "ASH", "GLH", "LYN", "MSE",
];

/// One atom line of a GRO frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroAtom {
    pub res_num: i32,
    pub res_name: String,
    pub name: String,
    pub serial: u32,
    /// Position in Angstroms.
    pub coords: Point3D,
}

/// One frame of a GRO file.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroFrame {
    pub title: String,
    pub atoms: Vec<GroAtom>,
    /// Box edge lengths in Angstroms, when the box line is readable.
    pub box_lengths: Option<[f64; 3]>,
}

impl GroFrame {
    /// Flat `x, y, z` coordinates of every atom, in Angstroms.
    pub fn positions(&self) -> Vec<f32> {
        self.atoms
            .iter()
            .flat_map(|a| [a.coords.x as f32, a.coords.y as f32, a.coords.z as f32])
            .collect()
    }
}

/// Parse every frame of a GRO file.
///
/// # Errors
///
/// Returns a parse error for a missing or invalid atom count, an atom line
/// shorter than 44 characters or with unreadable fields, a truncated frame,
/// or input without any frame.
pub fn parse_gro(input: &str) -> Result<Vec<GroFrame>> {
    let mut lines = input.lines().enumerate();
    let mut frames = Vec::new();

    while let Some((_, title)) = lines.next() {
        if title.trim().is_empty()
            && !frames.is_empty()
            && lines.clone().all(|(_, rest)| rest.trim().is_empty())
        {
            // Only blank lines left after the last box line.
            break;
        }
        let (count_line, count) = lines
            .next()
            .ok_or_else(|| PbError::Parse("GRO frame ends after the title line".into()))?;
        let n_atoms: usize = count.trim().parse().map_err(|_| {
            PbError::Parse(alloc::format!(
                "invalid GRO atom count '{}' on line {}",
                count.trim(),
                count_line + 1
            ))
        })?;

        let mut atoms = Vec::with_capacity(n_atoms.min(1 << 16));
        for i in 0..n_atoms {
            let (line_no, line) = lines.next().ok_or_else(|| {
                PbError::Parse(alloc::format!(
                    "GRO frame truncated: expected {} atoms, found {}",
                    n_atoms,
                    i
                ))
            })?;
            atoms.push(parse_atom_line(line, line_no + 1)?);
        }

        let box_lengths = lines.next().and_then(|(_, line)| parse_box_line(line));

        frames.push(GroFrame {
            title: title.trim().to_string(),
            atoms,
            box_lengths,
        });
    }

    if frames.is_empty() {
        return Err(PbError::Parse("no GRO frame found".into()));
    }
    log::debug!("parsed {} GRO frame(s)", frames.len());
    Ok(frames)
}

/// Parse a GRO file from disk.
#[cfg(feature = "std")]
pub fn parse_gro_file(path: impl AsRef<::std::path::Path>) -> Result<Vec<GroFrame>> {
    let contents = ::std::fs::read_to_string(path)?;
    parse_gro(&contents)
}

/// Columns: residue number 0..5, residue name 5..10, atom name 10..15,
/// atom number 15..20, then x, y, z in nm over 20..28, 28..36, 36..44.
/// Velocities after column 44 are ignored.
fn parse_atom_line(line: &str, line_no: usize) -> Result<GroAtom> {
    if line.len() < 44 {
        return Err(PbError::Parse(alloc::format!(
            "GRO atom line {} too short ({} chars): expected at least 44",
            line_no,
            line.len()
        )));
    }
    let column = |start: usize, end: usize| line.get(start..end).unwrap_or("").trim();
    let bad = |what: &str| PbError::Parse(alloc::format!("invalid {} on GRO line {}", what, line_no));

    let res_num = column(0, 5).parse::<i32>().map_err(|_| bad("residue number"))?;
    let serial = column(15, 20).parse::<u32>().map_err(|_| bad("atom number"))?;
    let mut xyz = [0.0f64; 3];
    for (axis, value) in xyz.iter_mut().enumerate() {
        let start = 20 + axis * 8;
        *value = column(start, start + 8)
            .parse::<f64>()
            .map_err(|_| bad("coordinate"))?
            * NM_TO_ANGSTROM;
    }

    Ok(GroAtom {
        res_num,
        res_name: column(5, 10).to_string(),
        name: column(10, 15).to_string(),
        serial,
        coords: Point3D::new(xyz[0], xyz[1], xyz[2]),
    })
}

fn parse_box_line(line: &str) -> Option<[f64; 3]> {
    let mut values = line
        .split_whitespace()
        .map(|v| v.parse::<f64>().ok().map(|nm| nm * NM_TO_ANGSTROM));
    Some([values.next()??, values.next()??, values.next()??])
}

/// A backbone atom of the topology and its index in the full system.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopologyAtom {
    pub index: usize,
    pub serial: u32,
    pub name: String,
    pub res_num: i32,
    pub res_name: String,
}

/// Backbone selection (N, CA, C, O of protein residues) of a molecular
/// system.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topology {
    system_size: usize,
    backbone: Vec<TopologyAtom>,
}

impl Topology {
    /// Select the backbone atoms of `frame`.
    pub fn from_frame(frame: &GroFrame) -> Self {
        let backbone = frame
            .atoms
            .iter()
            .enumerate()
            .filter(|(_, a)| is_protein_residue(&a.res_name) && is_backbone_name(&a.name))
            .map(|(index, a)| TopologyAtom {
                index,
                serial: a.serial,
                name: a.name.clone(),
                res_num: a.res_num,
                res_name: a.res_name.clone(),
            })
            .collect();
        Self {
            system_size: frame.atoms.len(),
            backbone,
        }
    }

    /// Number of atoms in the whole system.
    pub fn system_size(&self) -> usize {
        self.system_size
    }

    /// Selected backbone atoms, in system order.
    pub fn backbone(&self) -> &[TopologyAtom] {
        &self.backbone
    }

    /// Rebuild the backbone chain from flat `x, y, z` coordinates of the
    /// whole system, in Angstroms.
    ///
    /// Consecutive backbone atoms sharing a residue number and name form one
    /// residue. The chain has a blank identifier and no model.
    ///
    /// # Errors
    ///
    /// [`PbError::InvalidInput`] when `positions` does not hold exactly
    /// three values per system atom.
    pub fn chain_from_positions(&self, positions: &[f32]) -> Result<Chain> {
        if positions.len() != self.system_size * 3 {
            return Err(PbError::InvalidInput(alloc::format!(
                "frame has {} coordinates, topology expects {} atoms ({} coordinates)",
                positions.len(),
                self.system_size,
                self.system_size * 3
            )));
        }

        let mut residues: Vec<Residue> = Vec::new();
        for atom in &self.backbone {
            let at = atom.index * 3;
            let coords = Point3D::new(
                f64::from(positions[at]),
                f64::from(positions[at + 1]),
                f64::from(positions[at + 2]),
            );
            let backbone_atom = Atom::new(atom.serial, &atom.name, coords);

            match residues.last_mut() {
                Some(r) if r.seq_num == atom.res_num && r.name == atom.res_name => {
                    r.atoms.push(backbone_atom)
                }
                _ => residues.push(Residue {
                    name: atom.res_name.clone(),
                    seq_num: atom.res_num,
                    i_code: None,
                    atoms: alloc::vec![backbone_atom],
                }),
            }
        }

        Ok(Chain::new(' ', residues))
    }
}

fn is_protein_residue(name: &str) -> bool {
    PROTEIN_RESIDUES.contains(&name)
}
