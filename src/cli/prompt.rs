//! Terminal plumbing shared with the progress bar: the deletion prompt and
//! a log writer that draws around the bar.

use console::{style, Term};
use immich_duplicate_cleaner::core::processor::{is_affirmative, Confirmer};
use indicatif::ProgressBar;
use std::io::{self, BufRead, Write};
use tracing_subscriber::fmt::MakeWriter;

/// Asks on the terminal before deleting, reading the answer from stdin
pub struct TerminalConfirmer {
    term: Term,
    progress: ProgressBar,
}

impl TerminalConfirmer {
    pub fn new(progress: ProgressBar) -> Self {
        Self {
            term: Term::stderr(),
            progress,
        }
    }
}

impl Confirmer for TerminalConfirmer {
    fn confirm_deletion(&self, pending: usize) -> io::Result<bool> {
        self.progress.suspend(|| {
            self.term.write_str(&format!(
                "\n{} About to delete {} duplicate(s). Continue? [y/N]: ",
                style("⚠").yellow().bold(),
                pending
            ))?;
            self.term.flush()?;

            let mut response = String::new();
            if io::stdin().lock().read_line(&mut response)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "no answer on stdin",
                ));
            }
            Ok(is_affirmative(&response))
        })
    }
}

/// Log writer that hides the progress bar while a line is written
#[derive(Clone)]
pub struct ProgressWriter {
    progress: ProgressBar,
}

impl ProgressWriter {
    pub fn new(progress: ProgressBar) -> Self {
        Self { progress }
    }
}

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.progress.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for ProgressWriter {
    type Writer = ProgressWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
