//! Weftwork - command-line tool for deriving drawdowns and preparing
//! separation artwork

use std::process::ExitCode;

use weftwork::cli;

fn main() -> ExitCode {
    cli::run()
}
