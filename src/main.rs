//! dupefind - duplicate file finder
//!
//! Entry point for the dupefind CLI application.

use clap::Parser;
use dupefind::{cli::Cli, error::ExitCode};

fn main() {
    let cli = Cli::parse();

    match dupefind::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::from_error(&err);

            if exit_code == ExitCode::Interrupted {
                eprintln!("Operation cancelled by user.");
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
