use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub static PACKETS_RECEIVED: AtomicU64 = AtomicU64::new(0);
pub static PACKETS_DROPPED: AtomicU64 = AtomicU64::new(0);
pub static PACKETS_DECODED: AtomicU64 = AtomicU64::new(0);
pub static PACKETS_MALFORMED: AtomicU64 = AtomicU64::new(0);
pub static METRICS_EMITTED: AtomicU64 = AtomicU64::new(0);
pub static MISSING_TEMPLATES: AtomicU64 = AtomicU64::new(0);

/// Point-in-time copy of the process counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub packets_received: u64,
    pub packets_dropped: u64,
    pub packets_decoded: u64,
    pub packets_malformed: u64,
    pub metrics_emitted: u64,
    pub missing_templates: u64,
}

pub fn snapshot() -> StatsSnapshot {
    StatsSnapshot {
        packets_received: PACKETS_RECEIVED.load(Ordering::Relaxed),
        packets_dropped: PACKETS_DROPPED.load(Ordering::Relaxed),
        packets_decoded: PACKETS_DECODED.load(Ordering::Relaxed),
        packets_malformed: PACKETS_MALFORMED.load(Ordering::Relaxed),
        metrics_emitted: METRICS_EMITTED.load(Ordering::Relaxed),
        missing_templates: MISSING_TEMPLATES.load(Ordering::Relaxed),
    }
}
