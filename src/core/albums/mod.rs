//! # Albums Module
//!
//! Makes every copy in a duplicate group a member of every album that holds
//! any copy. Only ever adds; nothing is removed from an album here.

use crate::config::CleanerConfig;
use crate::core::gateway::{short_id, DuplicateGroup, Gateway};
use crate::error::GatewayError;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// What a synchronization pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// (asset, album) pairs added, or that would be added in a dry run
    pub additions: usize,
    /// Albums that received at least one asset
    pub albums_updated: usize,
    /// Albums whose write failed
    pub failed_albums: Vec<String>,
    /// Assets whose album lookup failed
    pub unreadable_assets: Vec<String>,
}

/// Synchronizes album membership across a duplicate group
pub struct AlbumReconciler<'a> {
    gateway: &'a dyn Gateway,
    config: &'a CleanerConfig,
}

impl<'a> AlbumReconciler<'a> {
    pub fn new(gateway: &'a dyn Gateway, config: &'a CleanerConfig) -> Self {
        Self { gateway, config }
    }

    /// Add each group asset to every group album it is missing from.
    ///
    /// Lookup failures skip that asset and write failures skip that album.
    /// Neither fails the group; both are listed in the returned report.
    pub fn synchronize(&self, group: &DuplicateGroup) -> Result<SyncReport, GatewayError> {
        let mut report = SyncReport::default();

        // asset id -> album ids it belongs to
        let mut memberships: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        let mut album_names: BTreeMap<String, String> = BTreeMap::new();

        for asset_id in &group.asset_ids {
            match self.gateway.list_albums_for_asset(asset_id) {
                Ok(albums) => {
                    memberships.entry(asset_id.as_str()).or_default();
                    for album in albums {
                        memberships
                            .entry(asset_id.as_str())
                            .or_default()
                            .insert(album.id.clone());
                        // The album's own member list may reveal other copies
                        for member in &album.asset_ids {
                            if let Some(key) = group.asset_ids.iter().find(|id| *id == member) {
                                memberships
                                    .entry(key.as_str())
                                    .or_default()
                                    .insert(album.id.clone());
                            }
                        }
                        album_names.insert(album.id, album.name);
                    }
                }
                Err(e) => {
                    warn!(
                        "Failed to fetch albums for asset {}: {}",
                        short_id(asset_id),
                        e
                    );
                    report.unreadable_assets.push(asset_id.clone());
                }
            }
        }

        if self.config.verbose {
            info!("Current album assignments:");
            for asset_id in &group.asset_ids {
                let Some(albums) = memberships.get(asset_id.as_str()) else {
                    continue;
                };
                let names: Vec<&str> = albums
                    .iter()
                    .filter_map(|id| album_names.get(id).map(String::as_str))
                    .collect();
                info!("  Asset {}: {:?}", short_id(asset_id), names);
            }
        }

        for (album_id, album_name) in &album_names {
            let missing: Vec<String> = group
                .asset_ids
                .iter()
                .filter(|id| {
                    !memberships
                        .get(id.as_str())
                        .is_some_and(|albums| albums.contains(album_id))
                })
                .cloned()
                .collect();

            if missing.is_empty() {
                continue;
            }

            if self.config.dry_run {
                info!(
                    "[DRY RUN] Would add {} asset(s) to album {} ({})",
                    missing.len(),
                    album_name,
                    short_id(album_id)
                );
                report.additions += missing.len();
                report.albums_updated += 1;
                continue;
            }

            match self.gateway.add_assets_to_album(album_id, &missing) {
                Ok(()) => {
                    info!(
                        "Added {} asset(s) to album {} ({})",
                        missing.len(),
                        album_name,
                        short_id(album_id)
                    );
                    report.additions += missing.len();
                    report.albums_updated += 1;
                }
                Err(e) => {
                    warn!(
                        "Failed to add assets to album {} ({}): {}",
                        album_name,
                        short_id(album_id),
                        e
                    );
                    report.failed_albums.push(album_id.clone());
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gateway::InMemoryGateway;

    fn config(dry_run: bool) -> CleanerConfig {
        CleanerConfig::builder()
            .server_url("http://localhost:2283")
            .api_key("test")
            .dry_run(dry_run)
            .build()
            .unwrap()
    }

    fn group(ids: &[&str]) -> DuplicateGroup {
        DuplicateGroup::new("dup", ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn identical_albums_need_no_writes() {
        let gateway = InMemoryGateway::new()
            .with_album("x", "Trip", &["a", "b"])
            .with_album("y", "Family", &["a", "b"]);
        let config = config(false);

        let report = AlbumReconciler::new(&gateway, &config)
            .synchronize(&group(&["a", "b"]))
            .unwrap();

        assert_eq!(report.additions, 0);
        assert!(gateway.album_writes().is_empty());
    }

    #[test]
    fn missing_member_is_added_once() {
        let gateway = InMemoryGateway::new().with_album("x", "Trip", &["a"]);
        let config = config(false);

        let report = AlbumReconciler::new(&gateway, &config)
            .synchronize(&group(&["a", "b"]))
            .unwrap();

        assert_eq!(report.additions, 1);
        assert_eq!(
            gateway.album_writes(),
            vec![("x".to_string(), vec!["b".to_string()])]
        );
    }

    #[test]
    fn additions_are_batched_per_album() {
        let gateway = InMemoryGateway::new()
            .with_album("x", "Trip", &["a"])
            .with_album("y", "Family", &["c"]);
        let config = config(false);

        let report = AlbumReconciler::new(&gateway, &config)
            .synchronize(&group(&["a", "b", "c"]))
            .unwrap();

        assert_eq!(report.additions, 4);
        assert_eq!(report.albums_updated, 2);
        assert_eq!(
            gateway.album_writes(),
            vec![
                ("x".to_string(), vec!["b".to_string(), "c".to_string()]),
                ("y".to_string(), vec!["a".to_string(), "b".to_string()]),
            ]
        );
    }

    #[test]
    fn dry_run_counts_without_writing() {
        let gateway = InMemoryGateway::new().with_album("x", "Trip", &["a"]);
        let config = config(true);

        let report = AlbumReconciler::new(&gateway, &config)
            .synchronize(&group(&["a", "b", "c"]))
            .unwrap();

        assert_eq!(report.additions, 2);
        assert!(gateway.album_writes().is_empty());
        assert_eq!(gateway.album_members("x").len(), 1);
    }

    #[test]
    fn failed_album_write_does_not_stop_others() {
        let gateway = InMemoryGateway::new()
            .with_album("x", "Trip", &["a"])
            .with_album("y", "Family", &["a"])
            .failing_add_to("x");
        let config = config(false);

        let report = AlbumReconciler::new(&gateway, &config)
            .synchronize(&group(&["a", "b"]))
            .unwrap();

        assert_eq!(report.additions, 1);
        assert_eq!(report.failed_albums, vec!["x".to_string()]);
        assert!(gateway.album_members("y").contains("b"));
    }

    #[test]
    fn unreadable_asset_is_still_added() {
        let gateway = InMemoryGateway::new()
            .with_album("x", "Trip", &["a"])
            .failing_albums_for("b");
        let config = config(false);

        let report = AlbumReconciler::new(&gateway, &config)
            .synchronize(&group(&["a", "b"]))
            .unwrap();

        assert_eq!(report.unreadable_assets, vec!["b".to_string()]);
        assert_eq!(report.additions, 1);
        assert!(gateway.album_members("x").contains("b"));
    }

    #[test]
    fn all_lookups_failing_still_reports() {
        let gateway = InMemoryGateway::new()
            .with_album("x", "Trip", &["a"])
            .failing_albums_for("a")
            .failing_albums_for("b");
        let config = config(false);

        let report = AlbumReconciler::new(&gateway, &config)
            .synchronize(&group(&["a", "b"]))
            .unwrap();

        assert_eq!(
            report.unreadable_assets,
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(report.additions, 0);
        assert!(gateway.album_writes().is_empty());
    }

    #[test]
    fn assets_in_no_album_need_nothing() {
        let gateway = InMemoryGateway::new();
        let config = config(false);

        let report = AlbumReconciler::new(&gateway, &config)
            .synchronize(&group(&["a", "b"]))
            .unwrap();

        assert_eq!(report, SyncReport::default());
    }
}
