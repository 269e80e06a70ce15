//! Pipeline execution implementation.

use crate::config::CleanerConfig;
use crate::core::gateway::{Gateway, HttpGateway};
use crate::core::processor::{AutoConfirm, Confirmer, DeletionOutcome, GroupOutcome, GroupProcessor};
use crate::error::{CleanerError, ConfigError};
use crate::events::{null_sender, Event, EventSender, GroupEvent, RunEvent, RunSummary};
use std::time::Instant;
use tracing::{error, info, warn};

/// Result of a full run
#[derive(Debug)]
pub struct PipelineResult {
    /// Totals across all groups
    pub summary: RunSummary,
    /// Outcome of each group that did not fail, in listing order
    pub outcomes: Vec<GroupOutcome>,
    /// One message per failed group
    pub errors: Vec<String>,
}

/// Builder for a [`Pipeline`]
pub struct PipelineBuilder {
    config: CleanerConfig,
    gateway: Option<Box<dyn Gateway>>,
    confirmer: Option<Box<dyn Confirmer>>,
}

impl PipelineBuilder {
    /// Start from a validated configuration
    pub fn new(config: CleanerConfig) -> Self {
        Self {
            config,
            gateway: None,
            confirmer: None,
        }
    }

    /// Use a specific gateway instead of the HTTP one
    pub fn gateway(mut self, gateway: Box<dyn Gateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Set who answers deletion prompts
    pub fn confirmer(mut self, confirmer: Box<dyn Confirmer>) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    /// Build the pipeline
    ///
    /// Without an explicit gateway an [`HttpGateway`] is created from the
    /// configuration. Without a confirmer every prompt is declined, so
    /// nothing is deleted unless `assume_yes` is set.
    pub fn build(self) -> Result<Pipeline, ConfigError> {
        let gateway = match self.gateway {
            Some(gateway) => gateway,
            None => Box::new(HttpGateway::new(&self.config)?),
        };

        Ok(Pipeline {
            config: self.config,
            gateway,
            confirmer: self
                .confirmer
                .unwrap_or_else(|| Box::new(AutoConfirm::decline())),
        })
    }
}

/// The duplicate cleaning pipeline
pub struct Pipeline {
    config: CleanerConfig,
    gateway: Box<dyn Gateway>,
    confirmer: Box<dyn Confirmer>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder(config: CleanerConfig) -> PipelineBuilder {
        PipelineBuilder::new(config)
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, CleanerError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    ///
    /// Only a failure to list duplicate groups is returned as an error.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, CleanerError> {
        let start_time = Instant::now();

        events.send(Event::Run(RunEvent::Started {
            dry_run: self.config.dry_run,
            auto_delete: self.config.auto_delete,
        }));
        if self.config.dry_run {
            warn!("DRY RUN MODE - No changes will be made");
        }

        info!("Fetching duplicate groups...");
        let groups = match self.gateway.list_duplicate_groups() {
            Ok(groups) => groups,
            Err(e) => {
                events.send(Event::Run(RunEvent::Error {
                    message: e.to_string(),
                }));
                return Err(e.into());
            }
        };

        let total = groups.len();
        info!("Found {} duplicate group(s)", total);
        events.send(Event::Run(RunEvent::GroupsListed { total }));

        let mut summary = RunSummary {
            total_groups: total,
            dry_run: self.config.dry_run,
            ..Default::default()
        };
        let mut outcomes = Vec::with_capacity(total);
        let mut errors = Vec::new();

        if groups.is_empty() {
            info!("No duplicates found - nothing to do!");
        }

        let processor = GroupProcessor::new(
            self.gateway.as_ref(),
            &self.config,
            self.confirmer.as_ref(),
            events,
        );

        for (i, group) in groups.iter().enumerate() {
            let index = i + 1;
            match processor.process(group, index, total) {
                Ok(outcome) => {
                    tally(&mut summary, &outcome);
                    outcomes.push(outcome);
                }
                Err(e) => {
                    error!("Failed to process group {}: {}", index, e);
                    summary.failed_groups += 1;
                    errors.push(format!("group {} ({}): {}", index, group.id, e));
                    events.send(Event::Group(GroupEvent::Failed {
                        index,
                        message: e.to_string(),
                    }));
                }
            }
            events.send(Event::Group(GroupEvent::Completed { index }));
        }

        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        info!("Processing complete!");
        events.send(Event::Run(RunEvent::Completed {
            summary: summary.clone(),
        }));

        Ok(PipelineResult {
            summary,
            outcomes,
            errors,
        })
    }
}

fn tally(summary: &mut RunSummary, outcome: &GroupOutcome) {
    let report = match outcome {
        GroupOutcome::Skipped { .. } => {
            summary.skipped_groups += 1;
            return;
        }
        GroupOutcome::Processed(report) => report,
    };

    summary.processed_groups += 1;
    summary.album_additions += report.sync.additions;
    match &report.deletion {
        DeletionOutcome::Completed {
            deleted, failed, ..
        } => {
            summary.assets_deleted += deleted.len();
            summary.deletion_failures += failed.len();
        }
        DeletionOutcome::Cancelled { .. } => summary.cancelled_groups += 1,
        DeletionOutcome::Disabled
        | DeletionOutcome::InsufficientMetadata { .. }
        | DeletionOutcome::NothingToDelete { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gateway::{AssetMetadata, InMemoryGateway};
    use crate::events::EventChannel;

    fn config(auto_delete: bool) -> CleanerConfig {
        CleanerConfig::builder()
            .server_url("http://localhost:2283")
            .api_key("test")
            .auto_delete(auto_delete)
            .assume_yes(true)
            .build()
            .unwrap()
    }

    fn sized(id: &str, size: u64) -> AssetMetadata {
        AssetMetadata {
            id: id.to_string(),
            original_file_name: format!("{}.jpg", id),
            size_bytes: Some(size),
            ..Default::default()
        }
    }

    #[test]
    fn pipeline_builder_uses_given_gateway() {
        let pipeline = Pipeline::builder(config(false))
            .gateway(Box::new(InMemoryGateway::new()))
            .build()
            .unwrap();

        let result = pipeline.run().unwrap();
        assert_eq!(result.summary.total_groups, 0);
        assert!(result.outcomes.is_empty());
    }

    #[test]
    fn listing_failure_is_fatal() {
        let pipeline = Pipeline::builder(config(false))
            .gateway(Box::new(InMemoryGateway::new().failing_listing()))
            .build()
            .unwrap();

        assert!(matches!(pipeline.run(), Err(CleanerError::Gateway(_))));
    }

    #[test]
    fn failed_group_does_not_stop_the_run() {
        let gateway = InMemoryGateway::new()
            .with_group("bad", &["a", "b"])
            .with_group("good", &["c", "d"])
            .with_asset(AssetMetadata {
                id: "a".to_string(),
                ..Default::default()
            })
            .with_asset(AssetMetadata {
                id: "b".to_string(),
                ..Default::default()
            })
            .with_asset(sized("c", 10))
            .with_asset(sized("d", 20));

        let pipeline = Pipeline::builder(config(true))
            .gateway(Box::new(gateway))
            .build()
            .unwrap();

        let result = pipeline.run().unwrap();

        assert_eq!(result.summary.failed_groups, 1);
        assert_eq!(result.summary.processed_groups, 1);
        assert_eq!(result.summary.assets_deleted, 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("bad"));
    }

    #[test]
    fn events_cover_every_group() {
        let gateway = InMemoryGateway::new()
            .with_group("one", &["a"])
            .with_group("two", &["b", "c"]);
        let pipeline = Pipeline::builder(config(false))
            .gateway(Box::new(gateway))
            .build()
            .unwrap();

        let (sender, receiver) = EventChannel::new();
        let result = pipeline.run_with_events(&sender).unwrap();
        drop(sender);

        let completed: Vec<usize> = receiver
            .iter()
            .filter_map(|event| match event {
                Event::Group(GroupEvent::Completed { index }) => Some(index),
                _ => None,
            })
            .collect();

        assert_eq!(completed, vec![1, 2]);
        assert_eq!(result.summary.skipped_groups, 1);
    }
}
