//! # immich-dedup CLI
//!
//! Command-line interface for the Immich duplicate cleaner.
//!
//! ## Usage
//! ```bash
//! immich-dedup --url http://localhost:2283 --api-key KEY --dry-run
//! immich-dedup -u http://localhost:2283 -k KEY --auto-delete
//! ```

mod cli;

use console::style;
use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
