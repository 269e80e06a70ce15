//! # Processor Module
//!
//! Runs one duplicate group through its states:
//!
//! ```text
//! SKIP (< 2 assets) -> done
//! SYNC albums       -> lookup and write failures logged
//! RANK metadata     -> < 2 usable assets, done without deleting
//! SELECT best       -> nothing eligible aborts the group
//! CONFIRM           -> declined, done without deleting
//! DELETE the rest   -> per-asset failures logged
//! ```
//!
//! Only SELECT can fail a group. Everything else is recovered
//! locally and logged as a warning.

mod confirm;

pub use confirm::{is_affirmative, AutoConfirm, Confirmer};

use crate::config::CleanerConfig;
use crate::core::albums::{AlbumReconciler, SyncReport};
use crate::core::gateway::{short_id, AssetMetadata, DuplicateGroup, Gateway};
use crate::core::quality::QualityRanker;
use crate::error::{CleanerError, SelectionError};
use crate::events::{Event, EventSender, GroupEvent};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// How a group ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GroupOutcome {
    /// Fewer than two assets; nothing was done
    Skipped { asset_count: usize },
    /// Albums were synchronized and deletion was considered
    Processed(GroupReport),
}

/// What happened to a processed group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub group_id: String,
    pub sync: SyncReport,
    pub deletion: DeletionOutcome,
}

/// Result of the deletion phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeletionOutcome {
    /// Auto-delete is off
    Disabled,
    /// Too few assets had readable metadata to compare
    InsufficientMetadata { usable: usize },
    /// The best copy was the only one left
    NothingToDelete { kept: String },
    /// The operator declined at the prompt
    Cancelled { kept: String, pending: usize },
    /// Deletion ran; in a dry run `deleted` lists what would have gone
    Completed {
        kept: String,
        deleted: Vec<String>,
        failed: Vec<String>,
        dry_run: bool,
    },
}

/// Processes duplicate groups one at a time
pub struct GroupProcessor<'a> {
    gateway: &'a dyn Gateway,
    config: &'a CleanerConfig,
    confirmer: &'a dyn Confirmer,
    events: &'a EventSender,
    ranker: QualityRanker,
}

impl<'a> GroupProcessor<'a> {
    pub fn new(
        gateway: &'a dyn Gateway,
        config: &'a CleanerConfig,
        confirmer: &'a dyn Confirmer,
        events: &'a EventSender,
    ) -> Self {
        Self {
            gateway,
            config,
            confirmer,
            events,
            ranker: QualityRanker::new(),
        }
    }

    /// Reconcile albums for a group and, if enabled, delete all but the best copy.
    ///
    /// `index` is 1-based and only used for logging and events.
    pub fn process(
        &self,
        group: &DuplicateGroup,
        index: usize,
        total: usize,
    ) -> Result<GroupOutcome, CleanerError> {
        info!(
            "Processing group {}/{} ({} assets)",
            index,
            total,
            group.len()
        );
        self.emit(GroupEvent::Started {
            index,
            total,
            group_id: group.id.clone(),
            asset_count: group.len(),
        });

        if group.len() < 2 {
            warn!("Skipping group {} - less than 2 assets", short_id(&group.id));
            self.emit(GroupEvent::Skipped { index });
            return Ok(GroupOutcome::Skipped {
                asset_count: group.len(),
            });
        }

        let sync = AlbumReconciler::new(self.gateway, self.config).synchronize(group)?;
        if sync.additions > 0 {
            info!("Synchronized {} asset(s) across albums", sync.additions);
        } else {
            info!("Albums already synchronized");
        }
        self.emit(GroupEvent::AlbumsSynchronized {
            index,
            additions: sync.additions,
        });

        let deletion = if self.config.auto_delete {
            self.remove_duplicates(group, index)?
        } else {
            DeletionOutcome::Disabled
        };

        Ok(GroupOutcome::Processed(GroupReport {
            group_id: group.id.clone(),
            sync,
            deletion,
        }))
    }

    fn remove_duplicates(
        &self,
        group: &DuplicateGroup,
        index: usize,
    ) -> Result<DeletionOutcome, CleanerError> {
        info!("Analyzing quality of {} duplicate(s)...", group.len());

        let details = self.fetch_metadata(group);
        if details.len() < 2 {
            warn!("Not enough asset details to compare quality");
            return Ok(DeletionOutcome::InsufficientMetadata {
                usable: details.len(),
            });
        }

        let best = self.ranker.select_best(&details).ok_or_else(|| {
            SelectionError::NoEligibleCandidate {
                group_id: group.id.clone(),
                candidates: details.len(),
            }
        })?;

        info!("Best quality asset: {}", short_id(&best.id));
        if self.config.verbose {
            info!(
                "  Size: {} bytes, Resolution: {}",
                best.size_bytes.unwrap_or_default(),
                best.resolution_display()
            );
        }
        self.emit(GroupEvent::BestSelected {
            index,
            asset_id: best.id.clone(),
        });

        let kept = best.id.clone();
        let to_delete: Vec<String> = details
            .iter()
            .filter(|m| m.id != kept)
            .map(|m| m.id.clone())
            .collect();

        if to_delete.is_empty() {
            info!("No duplicates to delete");
            return Ok(DeletionOutcome::NothingToDelete { kept });
        }

        if !self.config.assume_yes && !self.config.dry_run {
            let approved = match self.confirmer.confirm_deletion(to_delete.len()) {
                Ok(answer) => answer,
                Err(e) => {
                    warn!("Could not read confirmation: {}", e);
                    false
                }
            };
            if !approved {
                info!("Deletion cancelled");
                self.emit(GroupEvent::DeletionCancelled { index });
                return Ok(DeletionOutcome::Cancelled {
                    kept,
                    pending: to_delete.len(),
                });
            }
        }

        let mut deleted = Vec::new();
        let mut failed = Vec::new();
        for asset_id in to_delete {
            if self.config.dry_run {
                info!("[DRY RUN] Would delete asset {}", short_id(&asset_id));
            } else if let Err(e) = self.gateway.delete_asset(&asset_id) {
                warn!("Failed to delete asset {}: {}", short_id(&asset_id), e);
                self.emit(GroupEvent::DeletionFailed {
                    index,
                    asset_id: asset_id.clone(),
                    message: e.to_string(),
                });
                failed.push(asset_id);
                continue;
            } else {
                info!("Deleted duplicate asset {}", short_id(&asset_id));
            }

            self.emit(GroupEvent::AssetDeleted {
                index,
                asset_id: asset_id.clone(),
                dry_run: self.config.dry_run,
            });
            deleted.push(asset_id);
        }

        Ok(DeletionOutcome::Completed {
            kept,
            deleted,
            failed,
            dry_run: self.config.dry_run,
        })
    }

    /// Metadata for each distinct group asset; failures are skipped
    fn fetch_metadata(&self, group: &DuplicateGroup) -> Vec<AssetMetadata> {
        let mut seen = HashSet::new();
        let mut details = Vec::with_capacity(group.len());

        for asset_id in &group.asset_ids {
            if !seen.insert(asset_id.as_str()) {
                continue;
            }
            match self.gateway.get_asset_metadata(asset_id) {
                Ok(meta) => details.push(meta),
                Err(e) => warn!(
                    "Failed to fetch details for asset {}: {}",
                    short_id(asset_id),
                    e
                ),
            }
        }

        details
    }

    fn emit(&self, event: GroupEvent) {
        self.events.send(Event::Group(event));
    }
}
