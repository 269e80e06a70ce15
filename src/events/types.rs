//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};

/// All events emitted while cleaning duplicates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Run-level events
    Run(RunEvent),
    /// Per-group events
    Group(GroupEvent),
}

/// Events about the run as a whole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    /// The run has started
    Started { dry_run: bool, auto_delete: bool },
    /// Duplicate groups were fetched from the server
    GroupsListed { total: usize },
    /// Every group has been visited
    Completed { summary: RunSummary },
    /// The run stopped on a fatal error
    Error { message: String },
}

/// Events while processing one duplicate group
///
/// `index` is 1-based within the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GroupEvent {
    /// Processing of a group has started
    Started {
        index: usize,
        total: usize,
        group_id: String,
        asset_count: usize,
    },
    /// The group had fewer than two assets
    Skipped { index: usize },
    /// Album membership was synchronized
    AlbumsSynchronized { index: usize, additions: usize },
    /// The copy to keep was chosen
    BestSelected { index: usize, asset_id: String },
    /// The operator declined, or could not answer, the deletion prompt
    DeletionCancelled { index: usize },
    /// A duplicate was deleted (or would be, in a dry run)
    AssetDeleted {
        index: usize,
        asset_id: String,
        dry_run: bool,
    },
    /// A duplicate could not be deleted
    DeletionFailed {
        index: usize,
        asset_id: String,
        message: String,
    },
    /// The group was aborted
    Failed { index: usize, message: String },
    /// The group reached its terminal state
    Completed { index: usize },
}

/// Totals for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Duplicate groups returned by the server
    pub total_groups: usize,
    /// Groups that went through album sync
    pub processed_groups: usize,
    /// Groups with fewer than two assets
    pub skipped_groups: usize,
    /// Groups aborted by an error
    pub failed_groups: usize,
    /// Groups where deletion was declined at the prompt
    pub cancelled_groups: usize,
    /// (asset, album) pairs added
    pub album_additions: usize,
    /// Duplicates deleted (or that would be, in a dry run)
    pub assets_deleted: usize,
    /// Duplicates whose deletion failed
    pub deletion_failures: usize,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Group(GroupEvent::AssetDeleted {
            index: 3,
            asset_id: "abc".to_string(),
            dry_run: true,
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Group(GroupEvent::AssetDeleted { index, dry_run, .. }) => {
                assert_eq!(index, 3);
                assert!(dry_run);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn run_summary_is_serializable() {
        let summary = RunSummary {
            total_groups: 12,
            album_additions: 7,
            assets_deleted: 9,
            ..Default::default()
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"album_additions\":7"));
    }
}
