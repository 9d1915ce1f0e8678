//! PDBx/mmCIF coordinates.
//!
//! Only the `_atom_site` loop is read. Its rows are grouped into chains and
//! residues. Author-assigned chain and residue identifiers are preferred over
//! the label ones so that residue numbers agree with the PDB file of the same
//! entry; every model listed in `pdbx_PDB_model_num` is kept.
//!
//! # Example
//!
//! ```
//! use pblocks_struct::mmcif::parse_mmcif;
//!
//! let mmcif_text = "\
//! data_1TST
//! #
//! loop_
//! _atom_site.group_PDB
//! _atom_site.id
//! _atom_site.type_symbol
//! _atom_site.label_atom_id
//! _atom_site.label_comp_id
//! _atom_site.label_asym_id
//! _atom_site.label_seq_id
//! _atom_site.Cartn_x
//! _atom_site.Cartn_y
//! _atom_site.Cartn_z
//! ATOM 1 N N ALA A 1 1.000 2.000 3.000
//! ATOM 2 C CA ALA A 1 2.000 2.000 3.000
//! #
//! ";
//!
//! let structure = parse_mmcif(mmcif_text).unwrap();
//! assert_eq!(structure.id, "1TST");
//! assert_eq!(structure.atom_count(), 2);
//! ```

use pblocks_core::{PbError, Result};

use crate::types::{Atom, Chain, Point3D, Residue, Structure};

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// One row of a `loop_` table, keyed by full field name.
pub type LoopRecord = BTreeMap<String, String>;

/// Read PDBx/mmCIF text into a [`Structure`] named after its `data_` block.
///
/// # Errors
///
/// [`PbError::Parse`] when the text has no `_atom_site` loop or the loop has
/// no rows, or when a row lacks a required item or carries an unreadable
/// number.
pub fn parse_mmcif(input: &str) -> Result<Structure> {
    let lines: Vec<&str> = input.lines().collect();
    let id = extract_data_id(&lines);
    let records = find_and_parse_atom_site_loop(&lines)?;

    if records.is_empty() {
        return Err(PbError::Parse("_atom_site loop has no rows".into()));
    }

    let structure = build_structure_from_records(&id, &records)?;
    log::debug!(
        "parsed mmCIF {}: {} chain(s), {} atom(s)",
        structure.id,
        structure.chain_count(),
        records.len()
    );
    Ok(structure)
}

/// [`parse_mmcif`] on the contents of `path`.
#[cfg(feature = "std")]
pub fn parse_mmcif_file(path: impl AsRef<::std::path::Path>) -> Result<Structure> {
    let contents = ::std::fs::read_to_string(path)?;
    parse_mmcif(&contents)
}

/// Rows of one `loop_` table.
///
/// `lines` starts at the first item name after `loop_`: item names
/// (`_category.item`) come first, then one row per line. The table ends at a
/// comment line following the rows, or at the next `loop_` or `data_`. Rows
/// with fewer values than items are skipped.
pub fn parse_mmcif_loop(lines: &[&str]) -> Vec<LoopRecord> {
    let mut items: Vec<String> = Vec::new();
    let mut rows: Vec<LoopRecord> = Vec::new();
    let mut in_header = true;

    for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        if line.starts_with('#') {
            if in_header {
                continue;
            }
            break;
        }
        if line.starts_with("loop_") || line.starts_with("data_") {
            break;
        }
        if in_header && line.starts_with('_') {
            items.push(line.to_string());
            continue;
        }
        in_header = false;

        let values = tokenize_mmcif_line(line);
        if values.len() < items.len() {
            log::debug!("skipping short mmCIF row: {}", line);
            continue;
        }
        let row = items.iter().cloned().zip(values.into_iter().map(String::from));
        rows.push(row.collect());
    }

    rows
}

fn extract_data_id(lines: &[&str]) -> String {
    lines
        .iter()
        .find_map(|line| line.trim().strip_prefix("data_"))
        .map(|id| id.to_string())
        .unwrap_or_else(|| String::from("UNKN"))
}

fn find_and_parse_atom_site_loop(lines: &[&str]) -> Result<Vec<LoopRecord>> {
    for (i, line) in lines.iter().enumerate() {
        if line.trim() != "loop_" {
            continue;
        }
        let first_field = lines[i + 1..]
            .iter()
            .position(|l| {
                let t = l.trim();
                !t.is_empty() && !t.starts_with('#')
            })
            .map(|offset| i + 1 + offset);
        if let Some(j) = first_field {
            if lines[j].trim().starts_with("_atom_site.") {
                return Ok(parse_mmcif_loop(&lines[j..]));
            }
        }
    }

    Err(PbError::Parse("no _atom_site loop in mmCIF text".into()))
}

/// Split a data line into tokens. A quote only closes a quoted token when it
/// is followed by whitespace or the end of the line.
fn tokenize_mmcif_line(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if bytes[i] == b'\'' || bytes[i] == b'"' {
            let quote = bytes[i];
            let start = i + 1;
            let mut end = start;
            while end < bytes.len()
                && !(bytes[end] == quote
                    && bytes.get(end + 1).map_or(true, |b| b.is_ascii_whitespace()))
            {
                end += 1;
            }
            tokens.push(&line[start..end]);
            i = end + 1;
            continue;
        }

        let start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        tokens.push(&line[start..i]);
    }

    tokens
}

type ChainKey = (Option<u32>, char);
type ResidueKey = (i32, Option<char>, String);

fn build_structure_from_records(id: &str, records: &[LoopRecord]) -> Result<Structure> {
    let mut chain_order: Vec<ChainKey> = Vec::new();
    let mut chain_residues: BTreeMap<ChainKey, Vec<(ResidueKey, Vec<Atom>)>> = BTreeMap::new();

    for (row, record) in records.iter().enumerate() {
        let is_hetatm = field(record, &["_atom_site.group_PDB"]) == Some("HETATM");

        let serial = parse_field::<u32>(record, &["_atom_site.id"], row)?;
        let atom_name = required(record, &["_atom_site.auth_atom_id", "_atom_site.label_atom_id"], row)?;
        let comp_id = required(record, &["_atom_site.auth_comp_id", "_atom_site.label_comp_id"], row)?;
        let asym_id = required(record, &["_atom_site.auth_asym_id", "_atom_site.label_asym_id"], row)?;
        let seq_id = parse_field::<i32>(record, &["_atom_site.auth_seq_id", "_atom_site.label_seq_id"], row)?;
        let model = match field(record, &["_atom_site.pdbx_PDB_model_num"]) {
            Some(m) => Some(m.parse::<u32>().map_err(|e| {
                PbError::Parse(alloc::format!("bad model number '{}' in row {}: {}", m, row, e))
            })?),
            None => None,
        };

        let x = parse_field::<f64>(record, &["_atom_site.Cartn_x"], row)?;
        let y = parse_field::<f64>(record, &["_atom_site.Cartn_y"], row)?;
        let z = parse_field::<f64>(record, &["_atom_site.Cartn_z"], row)?;

        let atom = Atom {
            serial,
            name: atom_name.to_string(),
            alt_loc: field(record, &["_atom_site.label_alt_id"]).and_then(|s| s.chars().next()),
            coords: Point3D::new(x, y, z),
            occupancy: optional_f64(record, "_atom_site.occupancy").unwrap_or(1.0),
            temp_factor: optional_f64(record, "_atom_site.B_iso_or_equiv").unwrap_or(0.0),
            element: field(record, &["_atom_site.type_symbol"]).map(|s| s.to_string()),
            is_hetatm,
        };

        // Multi-character chain names keep their first character.
        let chain_key = (model, asym_id.chars().next().unwrap_or(' '));
        let residue_key = (
            seq_id,
            field(record, &["_atom_site.pdbx_PDB_ins_code"]).and_then(|s| s.chars().next()),
            comp_id.to_string(),
        );

        let residues = chain_residues.entry(chain_key).or_insert_with(|| {
            chain_order.push(chain_key);
            Vec::new()
        });
        match residues.last_mut() {
            Some((key, atoms)) if *key == residue_key => atoms.push(atom),
            _ => residues.push((residue_key, alloc::vec![atom])),
        }
    }

    let chains = chain_order
        .into_iter()
        .filter_map(|key| {
            let residues: Vec<Residue> = chain_residues
                .remove(&key)?
                .into_iter()
                .map(|((seq_num, i_code, name), atoms)| Residue {
                    name,
                    seq_num,
                    i_code,
                    atoms,
                })
                .collect();
            Some(Chain::with_model(key.1, key.0, residues))
        })
        .collect();

    Ok(Structure {
        id: id.to_string(),
        chains,
    })
}

// ---- Field extraction helpers ----

/// First present value among `names`, with `.` and `?` read as missing.
fn field<'a>(record: &'a LoopRecord, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| record.get(*name))
        .map(|s| s.as_str())
        .find(|s| *s != "." && *s != "?")
}

fn required<'a>(record: &'a LoopRecord, names: &[&str], row: usize) -> Result<&'a str> {
    field(record, names).ok_or_else(|| {
        PbError::Parse(alloc::format!(
            "missing field {} in _atom_site row {}",
            names.join(" / "),
            row
        ))
    })
}

fn parse_field<T>(record: &LoopRecord, names: &[&str], row: usize) -> Result<T>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    let s = required(record, names, row)?;
    s.parse::<T>().map_err(|e| {
        PbError::Parse(alloc::format!(
            "bad {} value '{}' in row {}: {}",
            names[0],
            s,
            row,
            e
        ))
    })
}

fn optional_f64(record: &LoopRecord, name: &str) -> Option<f64> {
    field(record, &[name]).and_then(|s| s.parse::<f64>().ok())
}
