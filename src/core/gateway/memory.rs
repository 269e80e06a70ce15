//! In-memory gateway for testing.

use super::{AlbumMembership, AssetMetadata, DuplicateGroup, Gateway};
use crate::error::GatewayError;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::RwLock;

/// In-memory gateway
///
/// Holds albums, assets and duplicate groups in memory, records every write,
/// and can be told to fail specific calls. Useful for testing and dry runs
/// against canned data.
#[derive(Default)]
pub struct InMemoryGateway {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    groups: Vec<DuplicateGroup>,
    albums: BTreeMap<String, AlbumMembership>,
    assets: BTreeMap<String, AssetMetadata>,
    fail_listing: bool,
    fail_albums_for: HashSet<String>,
    fail_metadata_for: HashSet<String>,
    fail_add_to: HashSet<String>,
    fail_delete_for: HashSet<String>,
    album_writes: Vec<(String, Vec<String>)>,
    deleted: Vec<String>,
}

fn poisoned(endpoint: &str) -> GatewayError {
    GatewayError::Decode {
        endpoint: endpoint.to_string(),
        reason: "in-memory state lock poisoned".to_string(),
    }
}

fn injected(endpoint: String) -> GatewayError {
    GatewayError::UnexpectedStatus {
        endpoint,
        status: 500,
        body: "injected failure".to_string(),
    }
}

impl InMemoryGateway {
    /// Create an empty gateway
    pub fn new() -> Self {
        Self::default()
    }

    fn update(self, f: impl FnOnce(&mut State)) -> Self {
        if let Ok(mut state) = self.state.write() {
            f(&mut state);
        }
        self
    }

    /// Add a duplicate group to the listing
    pub fn with_group(self, id: &str, asset_ids: &[&str]) -> Self {
        let group = DuplicateGroup::new(id, asset_ids.iter().map(|s| s.to_string()).collect());
        self.update(|s| s.groups.push(group))
    }

    /// Add an asset with metadata
    pub fn with_asset(self, metadata: AssetMetadata) -> Self {
        self.update(|s| {
            s.assets.insert(metadata.id.clone(), metadata);
        })
    }

    /// Add an album with its current members
    pub fn with_album(self, id: &str, name: &str, asset_ids: &[&str]) -> Self {
        let mut album = AlbumMembership::new(id, name);
        album.asset_ids = asset_ids.iter().map(|s| s.to_string()).collect();
        self.update(|s| {
            s.albums.insert(id.to_string(), album);
        })
    }

    /// Make the duplicate listing fail
    pub fn failing_listing(self) -> Self {
        self.update(|s| s.fail_listing = true)
    }

    /// Make album lookups for an asset fail
    pub fn failing_albums_for(self, asset_id: &str) -> Self {
        self.update(|s| {
            s.fail_albums_for.insert(asset_id.to_string());
        })
    }

    /// Make metadata lookups for an asset fail
    pub fn failing_metadata_for(self, asset_id: &str) -> Self {
        self.update(|s| {
            s.fail_metadata_for.insert(asset_id.to_string());
        })
    }

    /// Make additions to an album fail
    pub fn failing_add_to(self, album_id: &str) -> Self {
        self.update(|s| {
            s.fail_add_to.insert(album_id.to_string());
        })
    }

    /// Make deletion of an asset fail
    pub fn failing_delete_for(self, asset_id: &str) -> Self {
        self.update(|s| {
            s.fail_delete_for.insert(asset_id.to_string());
        })
    }

    /// Successful album writes, in call order
    pub fn album_writes(&self) -> Vec<(String, Vec<String>)> {
        self.state
            .read()
            .map(|s| s.album_writes.clone())
            .unwrap_or_default()
    }

    /// Successfully deleted assets, in call order
    pub fn deleted(&self) -> Vec<String> {
        self.state.read().map(|s| s.deleted.clone()).unwrap_or_default()
    }

    /// Current members of an album
    pub fn album_members(&self, album_id: &str) -> BTreeSet<String> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.albums.get(album_id).map(|a| a.asset_ids.clone()))
            .unwrap_or_default()
    }
}

impl Gateway for InMemoryGateway {
    fn list_duplicate_groups(&self) -> Result<Vec<DuplicateGroup>, GatewayError> {
        let state = self.state.read().map_err(|_| poisoned("duplicates"))?;
        if state.fail_listing {
            return Err(injected("GET /api/duplicates".to_string()));
        }
        Ok(state.groups.clone())
    }

    fn list_albums_for_asset(&self, asset_id: &str) -> Result<Vec<AlbumMembership>, GatewayError> {
        let state = self.state.read().map_err(|_| poisoned("albums"))?;
        if state.fail_albums_for.contains(asset_id) {
            return Err(injected(format!("GET /api/albums?assetId={}", asset_id)));
        }
        Ok(state
            .albums
            .values()
            .filter(|album| album.asset_ids.contains(asset_id))
            .cloned()
            .collect())
    }

    fn get_asset_metadata(&self, asset_id: &str) -> Result<AssetMetadata, GatewayError> {
        let state = self.state.read().map_err(|_| poisoned("assets"))?;
        let endpoint = format!("GET /api/assets/{}", asset_id);
        if state.fail_metadata_for.contains(asset_id) {
            return Err(injected(endpoint));
        }
        state
            .assets
            .get(asset_id)
            .cloned()
            .ok_or(GatewayError::UnexpectedStatus {
                endpoint,
                status: 404,
                body: "asset not found".to_string(),
            })
    }

    fn add_assets_to_album(&self, album_id: &str, asset_ids: &[String]) -> Result<(), GatewayError> {
        let mut state = self.state.write().map_err(|_| poisoned("albums"))?;
        let endpoint = format!("PUT /api/albums/{}/assets", album_id);
        if state.fail_add_to.contains(album_id) {
            return Err(injected(endpoint));
        }
        let album = state
            .albums
            .get_mut(album_id)
            .ok_or(GatewayError::UnexpectedStatus {
                endpoint,
                status: 400,
                body: "album not found".to_string(),
            })?;
        album.asset_ids.extend(asset_ids.iter().cloned());
        state
            .album_writes
            .push((album_id.to_string(), asset_ids.to_vec()));
        Ok(())
    }

    fn delete_asset(&self, asset_id: &str) -> Result<(), GatewayError> {
        let mut state = self.state.write().map_err(|_| poisoned("assets"))?;
        if state.fail_delete_for.contains(asset_id) {
            return Err(injected("DELETE /api/assets".to_string()));
        }
        state.assets.remove(asset_id);
        for album in state.albums.values_mut() {
            album.asset_ids.remove(asset_id);
        }
        state.deleted.push(asset_id.to_string());
        Ok(())
    }
}
