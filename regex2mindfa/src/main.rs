use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use relang::input_file::{parse_input_file, InputFileError};
use relang::regex::{check_dfa_state_limit, compile, RegexError};
use relang::table::write_table;

/// Compile a regex and alphabet into a minimized DFA table.
#[derive(Debug, Parser)]
#[command(name = "regex2mindfa")]
struct Args {
    /// Input file: line 1 is the regex, line 2 is the alphabet.
    input: PathBuf,
    /// Path the minimized DFA table is written to.
    output: PathBuf,
}

#[derive(Debug, Error)]
enum Error {
    #[error("could not read {path}: {source}")]
    ReadInput {
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
    InputFile(#[from] InputFileError),
    #[error("{0}")]
    Regex(#[from] RegexError),
}

fn run(args: Args) -> Result<(), Error> {
    let text = fs::read_to_string(&args.input).map_err(|source| Error::ReadInput {
        path: args.input.clone(),
        source,
    })?;
    let input = parse_input_file(&text)?;
    let nfa = compile(&input.regex_source, &input.alphabet)?;
    let unminimized = nfa.to_dfa(&input.alphabet);
    check_dfa_state_limit(&unminimized)?;
    let dfa = unminimized.minimize();
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
