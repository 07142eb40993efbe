use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use relang::checker::{check, parse_tests, CheckOutcome, TestsFileError};
use relang::table::{parse_table, TableError};

/// Check whether two DFA tables agree on every string in a tests file.
#[derive(Debug, Parser)]
#[command(name = "dfa_checker")]
struct Args {
    /// Path to the reference DFA table.
    reference: PathBuf,
    /// Path to the user-submitted DFA table.
    user: PathBuf,
    /// Path to the tests file.
    tests: PathBuf,
}

#[derive(Debug, Error)]
enum UsageError {
    #[error("could not read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Table(#[from] TableError),
    #[error("{0}")]
    TestsFile(#[from] TestsFileError),
}

fn read(path: &PathBuf) -> Result<String, UsageError> {
    fs::read_to_string(path).map_err(|source| UsageError::ReadFile {
        path: path.clone(),
        source,
    })
}

fn main() -> ExitCode {
    let args = Args::parse();

    let run = || -> Result<ExitCode, UsageError> {
        let reference_text = read(&args.reference)?;
        let user_text = read(&args.user)?;
        let reference = parse_table(&reference_text)?;
        let user = parse_table(&user_text)?;

        if reference.alphabet().as_bytes() != user.alphabet().as_bytes() {
            eprintln!(
                "error: alphabets differ: reference={} user={}",
                reference.alphabet(),
                user.alphabet()
            );
            return Ok(ExitCode::from(2));
        }

        let tests_text = read(&args.tests)?;
        let tests = parse_tests(&tests_text, reference.alphabet())?;

        let report = check(&reference, &user, &tests).expect("alphabets already verified equal");
        for warning in &report.warnings {
            eprintln!(
                "warning: line {}: test labeled {} but reference accepts={}: {}",
                warning.lineno,
                if warning.label { 1 } else { 0 },
                warning.reference_accepts,
                warning.display
            );
        }

        match report.outcome {
            CheckOutcome::Pass { count } => {
                println!("PASS: {count} tests matched");
                Ok(ExitCode::SUCCESS)
            }
            CheckOutcome::Mismatch {
                lineno,
                display,
                reference_accepts,
                user_accepts,
            } => {
                eprintln!(
                    "mismatch at line {lineno} ({display}): reference={reference_accepts} user={user_accepts}"
                );
                Ok(ExitCode::from(2))
            }
        }
    };

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
