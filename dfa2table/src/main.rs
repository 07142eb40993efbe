use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use relang::alphabet::{Alphabet, AlphabetError};
use relang::dfa_spec::{compile, DfaSpecError};
use relang::table::write_table;

/// Compile a hand-written DFA transition-function spec into a canonical
/// DFA table.
#[derive(Debug, Parser)]
#[command(name = "dfa2table")]
struct Args {
    /// The alphabet, as a plain string of symbols with no separators.
    alphabet: String,
    /// Path to the DFA spec source.
    spec: PathBuf,
    /// Path the DFA table is written to.
    output: PathBuf,
}

#[derive(Debug, Error)]
enum Error {
    #[error("invalid alphabet: {0}")]
    Alphabet(#[from] AlphabetError),
    #[error("could not read {path}: {source}")]
    ReadSpec {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    DfaSpec(#[from] DfaSpecError),
}

fn run(args: Args) -> Result<(), Error> {
    let alphabet = Alphabet::parse_plain(&args.alphabet)?;
    let text = fs::read_to_string(&args.spec).map_err(|source| Error::ReadSpec {
        path: args.spec.clone(),
        source,
    })?;
    let dfa = compile(&text, &alphabet)?;
    let table = write_table(&dfa);
    fs::write(&args.output, table).map_err(|source| Error::WriteOutput {
        path: args.output.clone(),
        source,
    })?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
