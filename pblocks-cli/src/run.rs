//! Assignment driver: reads inputs, assigns PBs chain by chain, and writes
//! records.

use std::path::Path;

use anyhow::{bail, Context, Result};
use pblocks_assign::{assign_protein_blocks, PbSequence, ReferenceLibrary};
use pblocks_core::{AngleMap, DihedralSource};
use pblocks_struct::parse_structure_file;

use crate::cli::{Args, Input};
use crate::discover::discover_structures;
use crate::output::{OutputFiles, OutputPaths};

/// Reference library from `--definitions`, or the built-in one.
pub fn load_library(definitions: Option<&Path>) -> Result<ReferenceLibrary> {
    match definitions {
        Some(path) => ReferenceLibrary::from_file(path)
            .with_context(|| format!("cannot load PB definitions from {}", path.display())),
        None => Ok(ReferenceLibrary::canonical()?),
    }
}

fn write_record(out: &mut OutputFiles, comment: &str, angles: &AngleMap, sequence: &PbSequence) -> Result<()> {
    out.write_phipsi(comment, angles)?;
    out.write_sequence(comment, sequence)?;
    log::info!("PBs assigned for {}", comment);
    Ok(())
}

/// Assign one chain and append its records.
fn assign_record(
    library: &ReferenceLibrary,
    source: &impl DihedralSource,
    comment: &str,
    out: &mut OutputFiles,
) -> Result<()> {
    let angles = source.angle_map();
    let sequence = assign_protein_blocks(library, &angles);
    write_record(out, comment, &angles, &sequence)
}

/// Every chain of every model of every structure file. Files that cannot be
/// parsed are skipped with a warning.
fn assign_structures(library: &ReferenceLibrary, files: &[std::path::PathBuf], out: &mut OutputFiles) -> Result<()> {
    for path in files {
        let structure = match parse_structure_file(path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let source = path.display().to_string();
        for chain in &structure.chains {
            if !chain.is_polymer() {
                log::debug!("{}: chain '{}' has no ATOM records", source, chain.id);
                continue;
            }
            assign_record(library, chain, &chain.comment(&source), out)?;
        }
    }
    Ok(())
}

/// Trajectory frames assigned together before their records are written.
#[cfg(feature = "xtc")]
const FRAME_CHUNK: usize = 64;

/// Assign the pending frames and write their records in frame order.
#[cfg(feature = "xtc")]
fn flush_frames(
    library: &ReferenceLibrary,
    comments: &mut Vec<String>,
    maps: &mut Vec<AngleMap>,
    out: &mut OutputFiles,
) -> Result<()> {
    let sequences = pblocks_assign::assign_batch(library, maps);
    for ((comment, angles), sequence) in comments.iter().zip(maps.iter()).zip(&sequences) {
        write_record(out, comment, angles, sequence)?;
    }
    comments.clear();
    maps.clear();
    Ok(())
}

/// One record per trajectory frame, built from the backbone of the GRO
/// system. Frames are streamed from the XTC file and written in chunks of
/// [`FRAME_CHUNK`].
#[cfg(feature = "xtc")]
fn assign_trajectory(library: &ReferenceLibrary, xtc: &Path, gro: &Path, out: &mut OutputFiles) -> Result<()> {
    use pblocks_struct::gro::{parse_gro_file, Topology};
    use pblocks_struct::xtc::XtcReader;

    let frames = parse_gro_file(gro).with_context(|| format!("cannot read {}", gro.display()))?;
    let topology = frames
        .first()
        .map(Topology::from_frame)
        .with_context(|| format!("{} has no frame", gro.display()))?;
    drop(frames);
    log::info!(
        "{}: {} atom(s), {} backbone atom(s)",
        gro.display(),
        topology.system_size(),
        topology.backbone().len()
    );

    let mut reader = XtcReader::open(xtc).with_context(|| format!("cannot read {}", xtc.display()))?;
    let mut comments = Vec::with_capacity(FRAME_CHUNK);
    let mut maps = Vec::with_capacity(FRAME_CHUNK);
    let mut index = 0usize;
    while let Some(frame) = reader.next_frame().with_context(|| format!("cannot read {}", xtc.display()))? {
        let chain = topology
            .chain_from_positions(&frame.positions)
            .with_context(|| format!("{} frame {} does not match {}", xtc.display(), index, gro.display()))?;
        if !chain.residues.is_empty() {
            comments.push(format!("{} | frame {}", xtc.display(), index));
            maps.push(chain.angle_map());
            if maps.len() == FRAME_CHUNK {
                flush_frames(library, &mut comments, &mut maps, out)?;
            }
        }
        index += 1;
    }
    flush_frames(library, &mut comments, &mut maps, out)?;
    log::debug!("{} trajectory frame(s) read", reader.frames_read());
    Ok(())
}

#[cfg(not(feature = "xtc"))]
fn assign_trajectory(_: &ReferenceLibrary, _: &Path, _: &Path, _: &mut OutputFiles) -> Result<()> {
    bail!("pbassign was built without XTC support (enable the `xtc` feature)")
}

/// Run the whole assignment and return the files written.
pub fn run(args: &Args, input: Input) -> Result<OutputPaths> {
    let files = match &input {
        Input::Structures(paths) => {
            let discovery = discover_structures(paths)?;
            if discovery.files.is_empty() {
                bail!("Nothing to do. Bye.");
            }
            println!("{} PDB file(s) to process", discovery.files.len());
            discovery.files
        }
        Input::Trajectory { xtc, gro } => {
            for path in [xtc, gro] {
                if !path.is_file() {
                    bail!("{}: not a valid file", path.display());
                }
            }
            Vec::new()
        }
    };

    let library = load_library(args.definitions.as_deref())?;
    let paths = OutputPaths::new(&args.output, args.flat, args.phipsi);
    let mut out = OutputFiles::create(paths.clone())
        .with_context(|| format!("cannot create {}", paths.fasta.display()))?;

    match &input {
        Input::Structures(_) => assign_structures(&library, &files, &mut out)?,
        Input::Trajectory { xtc, gro } => assign_trajectory(&library, xtc, gro, &mut out)?,
    }

    log::debug!("{} record(s) written", out.records());
    let paths = out.finish()?;
    for path in paths.iter() {
        println!("wrote {}", path.display());
    }
    Ok(paths)
}
