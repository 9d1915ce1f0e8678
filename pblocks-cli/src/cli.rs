//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "pbassign", version)]
#[command(about = "Read PDB structures and assign protein blocks (PBs).")]
pub struct Args {
    /// Name of a PDB/PDBx file or of a directory containing such files (repeatable)
    #[arg(short = 'p', value_name = "PATH")]
    pub pdb: Vec<PathBuf>,

    /// Name of an XTC trajectory file (GROMACS)
    #[arg(short = 'x', value_name = "XTC")]
    pub xtc: Option<PathBuf>,

    /// Name of the GRO file describing the trajectory's system (GROMACS)
    #[arg(short = 'g', value_name = "GRO")]
    pub gro: Option<PathBuf>,

    /// Name prefix for results
    #[arg(short = 'o', value_name = "NAME")]
    pub output: String,

    /// Also write phi and psi angles
    #[arg(long)]
    pub phipsi: bool,

    /// Also write one PB sequence per line
    #[arg(long)]
    pub flat: bool,

    /// Reference PB definitions replacing the built-in set
    #[arg(long, value_name = "FILE")]
    pub definitions: Option<PathBuf>,
}

/// What the run reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Structure files and directories given with `-p`.
    Structures(Vec<PathBuf>),
    /// A trajectory (`-x`) and the system it belongs to (`-g`).
    Trajectory { xtc: PathBuf, gro: PathBuf },
}

impl Args {
    /// Resolve the input mode. Structure inputs win when both `-p` and `-x`
    /// are given.
    pub fn input(&self) -> Result<Input, String> {
        if !self.pdb.is_empty() {
            return Ok(Input::Structures(self.pdb.clone()));
        }
        match (&self.xtc, &self.gro) {
            (None, _) => Err("use at least option -p or -x".into()),
            (Some(_), None) => Err("option -g is mandatory, with use of option -x".into()),
            (Some(xtc), Some(gro)) => Ok(Input::Trajectory {
                xtc: xtc.clone(),
                gro: gro.clone(),
            }),
        }
    }
}
