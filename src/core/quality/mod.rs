//! # Quality Module
//!
//! Picks the copy to keep from a group of duplicates.
//!
//! ## Ranking
//! 1. Larger file size wins
//! 2. On equal size, a user-named original beats a camera-generated name
//! 3. Otherwise the strictly earlier creation time wins
//!
//! Candidates without a file size are never selected. Candidates are visited
//! in asset-id order so ties always resolve the same way.

use crate::core::filename::is_original;
use crate::core::gateway::AssetMetadata;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Selects the best-quality asset from a set of duplicates
#[derive(Debug, Default, Clone, Copy)]
pub struct QualityRanker;

impl QualityRanker {
    pub fn new() -> Self {
        Self
    }

    /// Return the best candidate, or `None` if no candidate has a size
    pub fn select_best<'a, I>(&self, candidates: I) -> Option<&'a AssetMetadata>
    where
        I: IntoIterator<Item = &'a AssetMetadata>,
    {
        let mut ordered: Vec<&AssetMetadata> = candidates
            .into_iter()
            .filter(|c| c.size_bytes.is_some())
            .collect();
        ordered.sort_by(|a, b| a.id.cmp(&b.id));

        let mut best: Option<&AssetMetadata> = None;
        for candidate in ordered {
            best = match best {
                Some(current) if !Self::beats(candidate, current) => Some(current),
                _ => Some(candidate),
            };
        }
        best
    }

    /// Whether `candidate` should replace `current` as the best
    fn beats(candidate: &AssetMetadata, current: &AssetMetadata) -> bool {
        match candidate.size_bytes.cmp(&current.size_bytes) {
            Ordering::Greater => return true,
            Ordering::Less => return false,
            Ordering::Equal => {}
        }

        let candidate_original = is_original(&candidate.original_file_name);
        let current_original = is_original(&current.original_file_name);
        if candidate_original != current_original {
            return candidate_original;
        }

        strictly_earlier(candidate.created_at, current.created_at)
    }
}

/// A missing timestamp is never earlier; a present one is earlier than a missing one
fn strictly_earlier(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a < b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Convenience wrapper over [`QualityRanker::select_best`]
pub fn select_best<'a, I>(candidates: I) -> Option<&'a AssetMetadata>
where
    I: IntoIterator<Item = &'a AssetMetadata>,
{
    QualityRanker.select_best(candidates)
}
