//! Run results

use super::MatchSummary;
use crate::error::StationError;
use playlog_common::db::StationId;
use tracing::{info, warn};

/// Terminal state of one station
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationOutcome {
    Done(MatchSummary),
    Failed(StationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationReport {
    pub station_id: StationId,
    pub station_name: String,
    pub outcome: StationOutcome,
}

/// Per-station outcomes of a committed run, in configured station order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub stations: Vec<StationReport>,
}

impl RunReport {
    pub fn total_inserted(&self) -> usize {
        self.stations
            .iter()
            .map(|report| match &report.outcome {
                StationOutcome::Done(summary) => summary.inserted,
                StationOutcome::Failed(_) => 0,
            })
            .sum()
    }

    pub fn failed_count(&self) -> usize {
        self.stations
            .iter()
            .filter(|report| matches!(report.outcome, StationOutcome::Failed(_)))
            .count()
    }

    pub fn outcome(&self, station_id: StationId) -> Option<&StationOutcome> {
        self.stations
            .iter()
            .find(|report| report.station_id == station_id)
            .map(|report| &report.outcome)
    }

    pub fn log_summary(&self) {
        for report in &self.stations {
            match &report.outcome {
                StationOutcome::Done(summary) => info!(
                    station = %report.station_name,
                    inserted = summary.inserted,
                    skipped = summary.skipped,
                    resumed = summary.resumed,
                    "Station done"
                ),
                StationOutcome::Failed(err) => warn!(
                    station = %report.station_name,
                    error = %err,
                    "Station failed"
                ),
            }
        }

        info!(
            stations = self.stations.len(),
            inserted = self.total_inserted(),
            failed = self.failed_count(),
            "Run committed"
        );
    }
}
