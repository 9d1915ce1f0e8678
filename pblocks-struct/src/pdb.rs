//! Reading and writing fixed-column PDB coordinate files.
//!
//! The reader understands HEADER, ATOM, HETATM, TER, MODEL, and ENDMDL and
//! ignores every other record. NMR ensembles keep all their models: a chain
//! is emitted per model and remembers the model number.

use pblocks_core::{PbError, Result};

use crate::types::{Atom, Chain, Point3D, Residue, Structure};

use core::fmt::Write;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

type ResidueKey = (i32, Option<char>, String);

/// Accumulates atoms into residues and residues into chains.
#[derive(Default)]
struct ChainBuilder {
    chains: Vec<Chain>,
    chain_id: Option<char>,
    residue_key: Option<ResidueKey>,
    residues: Vec<Residue>,
    atoms: Vec<Atom>,
}

impl ChainBuilder {
    fn push(&mut self, chain_id: char, key: ResidueKey, atom: Atom, model: Option<u32>) {
        if self.chain_id != Some(chain_id) {
            self.flush_chain(model);
            self.chain_id = Some(chain_id);
            self.residue_key = Some(key);
        } else if self.residue_key.as_ref() != Some(&key) {
            self.flush_residue();
            self.residue_key = Some(key);
        }
        self.atoms.push(atom);
    }

    fn flush_residue(&mut self) {
        if self.atoms.is_empty() {
            return;
        }
        if let Some((seq_num, i_code, name)) = self.residue_key.take() {
            self.residues.push(Residue {
                name,
                seq_num,
                i_code,
                atoms: core::mem::take(&mut self.atoms),
            });
        }
    }

    fn flush_chain(&mut self, model: Option<u32>) {
        self.flush_residue();
        if let Some(id) = self.chain_id.take() {
            if !self.residues.is_empty() {
                let residues = core::mem::take(&mut self.residues);
                self.chains.push(Chain::with_model(id, model, residues));
            }
        }
    }
}

/// Read PDB text into a [`Structure`], one [`Chain`] per chain identifier
/// and model, in file order.
///
/// # Errors
///
/// [`PbError::Parse`] for a coordinate record that is too short or has an
/// unreadable number, or for text with no coordinate records at all.
pub fn parse_pdb(input: &str) -> Result<Structure> {
    let mut id = String::from("UNKN");
    let mut builder = ChainBuilder::default();
    let mut model: Option<u32> = None;
    let mut models_seen = 0u32;
    let mut atom_count = 0u32;

    for line in input.lines() {
        if line.starts_with("MODEL") {
            builder.flush_chain(model);
            models_seen += 1;
            // Fall back to the ordinal when the serial field is blank.
            let serial = Columns(line).text(10, 14).parse::<u32>().ok();
            model = Some(serial.unwrap_or(models_seen));
            continue;
        }
        if line.starts_with("ENDMDL") {
            builder.flush_chain(model);
            continue;
        }

        let record = Columns(line).raw(0, 6);
        match record {
            "HEADER" => {
                let code = Columns(line).text(62, 66);
                if !code.is_empty() {
                    id = code.into();
                }
            }
            "ATOM  " | "HETATM" => {
                let (chain_id, key, atom) = parse_atom_line(line, record == "HETATM")?;
                builder.push(chain_id, key, atom, model);
                atom_count += 1;
            }
            _ if record.starts_with("TER") => builder.flush_chain(model),
            _ => {}
        }
    }
    builder.flush_chain(model);

    if atom_count == 0 {
        return Err(PbError::Parse("no ATOM records found".into()));
    }

    log::debug!(
        "parsed PDB {}: {} chain(s), {} atom(s)",
        id,
        builder.chains.len(),
        atom_count
    );
    Ok(Structure {
        id,
        chains: builder.chains,
    })
}

/// [`parse_pdb`] on the contents of `path`.
#[cfg(feature = "std")]
pub fn parse_pdb_file(path: impl AsRef<::std::path::Path>) -> Result<Structure> {
    let contents = ::std::fs::read_to_string(path)?;
    parse_pdb(&contents)
}

/// Render a [`Structure`] as PDB text: ATOM/HETATM records, a TER after each
/// chain, MODEL/ENDMDL around chains that carry a model number, then END.
pub fn write_pdb(structure: &Structure) -> String {
    let mut out = String::new();
    let mut serial = 1u32;
    let mut open_model: Option<u32> = None;

    for chain in &structure.chains {
        if chain.model != open_model {
            if open_model.is_some() {
                out.push_str("ENDMDL\n");
            }
            if let Some(m) = chain.model {
                let _ = writeln!(out, "MODEL     {:4}", m);
                serial = 1;
            }
            open_model = chain.model;
        }

        let mut last: Option<&Residue> = None;
        for residue in &chain.residues {
            let res_name = residue.name.get(..3).unwrap_or(residue.name.as_str());
            for atom in &residue.atoms {
                let _ = writeln!(
                    out,
                    "{}{:5} {:4}{}{:3} {}{:4}{}   {:8.3}{:8.3}{:8.3}{:6.2}{:6.2}          {:>2}",
                    if atom.is_hetatm { "HETATM" } else { "ATOM  " },
                    serial % 100_000,
                    format_atom_name(&atom.name),
                    atom.alt_loc.unwrap_or(' '),
                    res_name,
                    chain.id,
                    residue.seq_num,
                    residue.i_code.unwrap_or(' '),
                    atom.coords.x,
                    atom.coords.y,
                    atom.coords.z,
                    atom.occupancy,
                    atom.temp_factor,
                    atom.element.as_deref().unwrap_or(""),
                );
                serial += 1;
            }
            last = Some(residue);
        }
        if let Some(residue) = last {
            let _ = writeln!(
                out,
                "TER   {:5}      {:3} {}{:4}",
                serial % 100_000,
                residue.name.get(..3).unwrap_or(residue.name.as_str()),
                chain.id,
                residue.seq_num
            );
            serial += 1;
        }
    }
    if open_model.is_some() {
        out.push_str("ENDMDL\n");
    }
    out.push_str("END\n");
    out
}

/// Four-column atom name: names shorter than four characters start in the
/// second column.
fn format_atom_name(name: &str) -> String {
    match name.get(..4) {
        Some(full) => full.to_string(),
        None => alloc::format!(" {:<3}", name),
    }
}

/// Fixed-column view of one record line. Columns are 0-based, end
/// exclusive; anything past the end of a short line reads as blank.
#[derive(Clone, Copy)]
struct Columns<'a>(&'a str);

impl<'a> Columns<'a> {
    fn raw(self, start: usize, end: usize) -> &'a str {
        let end = end.min(self.0.len());
        // A multi-byte character straddling a boundary reads as blank too.
        self.0.get(start..end).unwrap_or("")
    }

    fn text(self, start: usize, end: usize) -> &'a str {
        self.raw(start, end).trim()
    }

    /// A one-character flag column; blank means absent.
    fn flag(self, col: usize) -> Option<char> {
        self.raw(col, col + 1).chars().next().filter(|c| *c != ' ')
    }

    fn number<T: core::str::FromStr>(self, start: usize, end: usize, what: &str) -> Result<T> {
        let field = self.text(start, end);
        field
            .parse()
            .map_err(|_| PbError::Parse(alloc::format!("bad {} '{}' in: {}", what, field, self.0)))
    }
}

/// Chain id, residue key, and atom of an ATOM/HETATM line.
fn parse_atom_line(line: &str, is_hetatm: bool) -> Result<(char, ResidueKey, Atom)> {
    // Coordinates end at column 54; occupancy onwards is optional.
    if line.len() < 54 {
        return Err(PbError::Parse(alloc::format!(
            "coordinate record shorter than 54 columns ({}): {}",
            line.len(),
            line
        )));
    }
    let cols = Columns(line);

    let atom = Atom {
        serial: cols.number(6, 11, "atom serial")?,
        name: cols.text(12, 16).to_string(),
        alt_loc: cols.flag(16),
        coords: Point3D::new(
            cols.number(30, 38, "x coordinate")?,
            cols.number(38, 46, "y coordinate")?,
            cols.number(46, 54, "z coordinate")?,
        ),
        occupancy: cols.number(54, 60, "occupancy").unwrap_or(1.0),
        temp_factor: cols.number(60, 66, "B-factor").unwrap_or(0.0),
        element: Some(cols.text(76, 78))
            .filter(|e| !e.is_empty())
            .map(String::from),
        is_hetatm,
    };
    let key = (
        cols.number(22, 26, "residue number")?,
        cols.flag(26),
        cols.text(17, 20).to_string(),
    );
    Ok((cols.flag(21).unwrap_or(' '), key, atom))
}
