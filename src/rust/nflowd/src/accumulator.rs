//! Where decoded metrics go.

use crate::type_decoders::FlowValue;
use nflow_utils::unix_time::unix_nanos;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;
use std::time::SystemTime;
use tracing::error;

pub type FieldMap = BTreeMap<String, FlowValue>;
pub type TagMap = BTreeMap<String, String>;

/// Receives one metric per decoded record.
pub trait Accumulator: Send + Sync {
    fn add_fields(&self, measurement: &str, fields: FieldMap, tags: TagMap, timestamp: SystemTime);
}

#[derive(Serialize)]
struct JsonMetric<'a> {
    name: &'a str,
    tags: &'a TagMap,
    fields: &'a FieldMap,
    /// Nanoseconds since the UNIX epoch.
    timestamp: u128,
}

/// Writes each metric as one line of JSON to stdout.
#[derive(Default)]
pub struct JsonLinesAccumulator;

impl Accumulator for JsonLinesAccumulator {
    fn add_fields(&self, measurement: &str, fields: FieldMap, tags: TagMap, timestamp: SystemTime) {
        let metric = JsonMetric {
            name: measurement,
            tags: &tags,
            fields: &fields,
            timestamp: unix_nanos(timestamp),
        };
        let line = match serde_json::to_string(&metric) {
            Ok(line) => line,
            Err(e) => {
                error!("Unable to serialize {measurement} metric: {e:?}");
                return;
            }
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{line}") {
            error!("Unable to write metric to stdout: {e:?}");
        }
    }
}

/// One metric as handed to an accumulator.
#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    pub measurement: String,
    pub fields: FieldMap,
    pub tags: TagMap,
    pub timestamp: SystemTime,
}

/// Keeps every metric in memory. Used by tests and benchmarks.
#[derive(Default)]
pub struct CollectingAccumulator {
    metrics: Mutex<Vec<Metric>>,
}

impl CollectingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything collected so far.
    pub fn take(&self) -> Vec<Metric> {
        match self.metrics.lock() {
            Ok(mut metrics) => std::mem::take(&mut *metrics),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Accumulator for CollectingAccumulator {
    fn add_fields(&self, measurement: &str, fields: FieldMap, tags: TagMap, timestamp: SystemTime) {
        let metric = Metric {
            measurement: measurement.to_string(),
            fields,
            tags,
            timestamp,
        };
        match self.metrics.lock() {
            Ok(mut metrics) => metrics.push(metric),
            Err(poisoned) => poisoned.into_inner().push(metric),
        }
    }
}
