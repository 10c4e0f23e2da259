//! Destinations for pose samples.
//!
//! [`StdoutSink`] prints one line per sample and is what the registered
//! reporter uses. [`RecordingSink`] keeps samples in memory behind a shared
//! handle so a host (or a test) can read them back after stepping.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;
use crate::pose::Pose;

/// One pose reading of one link at one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    /// Completed iterations when the reading was taken.
    pub iteration: u64,
    /// Simulated time of the reading.
    pub sim_time: Duration,
    /// The link that was read.
    pub link: EntityId,
    /// The link's name.
    pub link_name: String,
    /// World-frame pose.
    pub pose: Pose,
}

/// Receives pose samples from a reporter.
pub trait PoseSink: Send {
    /// Records one sample.
    fn record(&mut self, sample: &PoseSample);
}

/// Prints each pose as `x y z roll pitch yaw` on its own line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink {
    precision: Option<usize>,
}

impl StdoutSink {
    /// Creates a sink printing full precision.
    #[must_use]
    pub const fn new() -> Self {
        Self { precision: None }
    }

    /// Creates a sink printing a fixed number of decimals.
    #[must_use]
    pub const fn with_precision(precision: usize) -> Self {
        Self {
            precision: Some(precision),
        }
    }
}

impl PoseSink for StdoutSink {
    fn record(&mut self, sample: &PoseSample) {
        let mut out = io::stdout().lock();
        let result = match self.precision {
            Some(p) => writeln!(out, "{:.p$}", sample.pose),
            None => writeln!(out, "{}", sample.pose),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write pose to stdout");
        }
    }
}

/// Shared in-memory sink. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    samples: Arc<Mutex<Vec<PoseSample>>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every sample recorded so far.
    #[must_use]
    pub fn samples(&self) -> Vec<PoseSample> {
        self.samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of samples recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PoseSink for RecordingSink {
    fn record(&mut self, sample: &PoseSample) {
        self.samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sample.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(iteration: u64) -> PoseSample {
        PoseSample {
            iteration,
            sim_time: Duration::from_millis(iteration),
            link: EntityId::new(2),
            link_name: "base".to_owned(),
            pose: Pose::IDENTITY,
        }
    }

    #[test]
    fn recording_sink_clones_share_buffer() {
        let sink = RecordingSink::new();
        let mut writer: Box<dyn PoseSink> = Box::new(sink.clone());

        writer.record(&sample(1));
        writer.record(&sample(2));

        assert_eq!(sink.len(), 2);
        let iterations: Vec<_> = sink.samples().iter().map(|s| s.iteration).collect();
        assert_eq!(iterations, vec![1, 2]);
    }

    #[test]
    fn recording_sink_starts_empty() {
        assert!(RecordingSink::new().is_empty());
    }

    #[test]
    fn stdout_sink_does_not_panic() {
        let mut sink = StdoutSink::with_precision(3);
        sink.record(&sample(0));
        StdoutSink::new().record(&sample(1));
    }

    #[test]
    fn sample_serializes() {
        let json = serde_json::to_string(&sample(5)).unwrap();
        assert!(json.contains("\"link_name\":\"base\""));
    }
}
