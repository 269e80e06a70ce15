//! # Pipeline Module
//!
//! Runs the cleaner over every duplicate group on the server.
//!
//! ## Stages
//! 1. **List** - Fetch duplicate groups (a failure here ends the run)
//! 2. **Process** - Hand each group to the group processor, in listing order
//! 3. **Summarize** - Tally additions, deletions and failures
//!
//! Groups are processed sequentially; one group's failure never stops the run.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineResult};
