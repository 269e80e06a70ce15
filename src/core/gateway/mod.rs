//! # Gateway Module
//!
//! The boundary between the reconciliation engine and the Immich server.
//!
//! ## Backends
//! - `HttpGateway` - talks to a live server over its REST API
//! - `InMemoryGateway` - canned state for tests

mod http;
mod memory;
mod traits;
mod types;

pub use http::{HttpGateway, ALBUMS_ENDPOINT, ASSETS_ENDPOINT, DUPLICATES_ENDPOINT};
pub use memory::InMemoryGateway;
pub use traits::Gateway;
pub use types::{short_id, AlbumMembership, AssetMetadata, DuplicateGroup};
