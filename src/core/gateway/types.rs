//! Domain types read from the Immich server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of assets the server considers copies of the same media
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Server-assigned group identifier
    pub id: String,
    /// Member asset identifiers
    pub asset_ids: Vec<String>,
}

impl DuplicateGroup {
    pub fn new(id: impl Into<String>, asset_ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            asset_ids,
        }
    }

    /// Number of member assets
    pub fn len(&self) -> usize {
        self.asset_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asset_ids.is_empty()
    }
}

/// Per-asset metadata used to rank duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub id: String,
    /// Original filename as uploaded (may be empty)
    pub original_file_name: String,
    /// File size in bytes; assets without it are never ranked
    pub size_bytes: Option<u64>,
    /// File creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Pixel width (display only)
    pub width: Option<u32>,
    /// Pixel height (display only)
    pub height: Option<u32>,
}

impl AssetMetadata {
    /// Resolution as `WxH`, or `unknown`
    pub fn resolution_display(&self) -> String {
        match (self.width, self.height) {
            (Some(w), Some(h)) => format!("{}x{}", w, h),
            _ => "unknown".to_string(),
        }
    }
}

/// An album as seen from one of its member assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumMembership {
    pub id: String,
    /// Display name
    pub name: String,
    /// Members observed at fetch time (may be stale)
    pub asset_ids: BTreeSet<String>,
}

impl AlbumMembership {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            asset_ids: BTreeSet::new(),
        }
    }
}

/// Shorten an identifier for log lines
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
