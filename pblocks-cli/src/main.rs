//! `pbassign`: Protein Block assignment for structure files and GROMACS
//! trajectories.
//!
//! ```bash
//! pbassign -p 1bta.pdb -p structures/ -o results --flat --phipsi
//! pbassign -x md.xtc -g md.gro -o trajectory
//! ```
//!
//! Writes `<NAME>.PB.fasta`, and `<NAME>.PB.flat` / `<NAME>.PB.phipsi` when
//! requested. Set `RUST_LOG=debug` for per-residue diagnostics.

mod cli;
mod discover;
mod output;
mod run;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::cli::Args;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let input = match args.input() {
        Ok(input) => input,
        Err(message) => Args::command()
            .error(ErrorKind::MissingRequiredArgument, message)
            .exit(),
    };

    run::run(&args, input)?;
    Ok(())
}
