//! # Core Module
//!
//! The duplicate reconciliation engine. Nothing in here knows about the
//! terminal; every remote call goes through the [`gateway::Gateway`] trait.
//!
//! ## Modules
//! - `filename` - Recognizes camera-generated filenames
//! - `quality` - Picks the copy to keep
//! - `gateway` - Reads and writes server state
//! - `albums` - Synchronizes album membership across a group
//! - `processor` - Runs one group through sync, ranking and deletion
//! - `pipeline` - Runs every group on the server

pub mod albums;
pub mod filename;
pub mod gateway;
pub mod pipeline;
pub mod processor;
pub mod quality;

// Re-export commonly used types
pub use albums::{AlbumReconciler, SyncReport};
pub use filename::is_original;
pub use gateway::{AlbumMembership, AssetMetadata, DuplicateGroup, Gateway};
pub use processor::{DeletionOutcome, GroupOutcome, GroupProcessor};
pub use quality::QualityRanker;
