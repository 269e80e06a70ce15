//! # Immich Duplicate Cleaner
//!
//! Reconciles the duplicate groups an Immich server reports.
//!
//! ## What it does
//! - **Album sync** - every copy ends up in every album that holds any copy
//! - **Optional cleanup** - keeps the best copy (largest, then original
//!   filename, then oldest) and deletes the rest after confirmation
//!
//! ## Architecture
//! - `core` - The reconciliation engine (terminal-agnostic)
//! - `config` - Validated, immutable run configuration
//! - `events` - Progress events for the presentation layer
//! - `error` - Error types

pub mod config;
pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use config::CleanerConfig;
pub use error::{CleanerError, Result};

/// Initialize tracing for the binary
///
/// `writer` receives formatted lines, e.g. stderr or a writer that pauses a
/// progress bar.
pub fn init_tracing<W>(verbose: bool, writer: W)
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    // Keep HTTP client internals quiet unless RUST_LOG asks for them
    let default_level = if verbose {
        "warn,immich_duplicate_cleaner=debug"
    } else {
        "warn,immich_duplicate_cleaner=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
