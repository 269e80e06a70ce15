//! Gateway trait definition.

use super::{AlbumMembership, AssetMetadata, DuplicateGroup};
use crate::error::GatewayError;

/// Read/write access to duplicate, album and asset state on the server
///
/// Every call is blocking. Implementations must not retry; a failed call is
/// final for whatever scope the caller gives it.
pub trait Gateway: Send + Sync {
    /// List all duplicate groups known to the server
    fn list_duplicate_groups(&self) -> Result<Vec<DuplicateGroup>, GatewayError>;

    /// List the albums that currently contain an asset
    fn list_albums_for_asset(&self, asset_id: &str) -> Result<Vec<AlbumMembership>, GatewayError>;

    /// Fetch ranking metadata for one asset
    fn get_asset_metadata(&self, asset_id: &str) -> Result<AssetMetadata, GatewayError>;

    /// Add assets to an album in a single call
    ///
    /// Adding an asset that is already a member is a no-op on the server.
    fn add_assets_to_album(&self, album_id: &str, asset_ids: &[String]) -> Result<(), GatewayError>;

    /// Permanently delete one asset
    fn delete_asset(&self, asset_id: &str) -> Result<(), GatewayError>;
}
