//! Fixed-capacity FIFO of telemetry samples.
//!
//! Oldest samples are evicted first once the buffer is full. Aggregates are
//! computed on demand from the stored samples.

use std::collections::VecDeque;
use time::OffsetDateTime;

/// Default history length (one minute at one sample per second).
pub const TELEMETRY_CAPACITY: usize = 60;

/// One point of history.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySample {
    pub timestamp: OffsetDateTime,
    pub comfort_c: f64,
    pub actual_rpm: f64,
    pub cumulative_cost: f64,
}

/// Time-ordered sample history with FIFO eviction.
#[derive(Debug, Clone)]
pub struct TelemetryBuffer {
    samples: VecDeque<TelemetrySample>,
    capacity: usize,
}

impl TelemetryBuffer {
    pub fn new() -> Self {
        Self::with_capacity(TELEMETRY_CAPACITY)
    }

    /// Buffer holding at most `capacity` samples (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one if the buffer is full.
    pub fn record(
        &mut self,
        timestamp: OffsetDateTime,
        comfort_c: f64,
        actual_rpm: f64,
        cumulative_cost: f64,
    ) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(TelemetrySample {
            timestamp,
            comfort_c,
            actual_rpm,
            cumulative_cost,
        });
    }

    /// Samples from oldest to newest.
    pub fn samples(&self) -> impl Iterator<Item = &TelemetrySample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&TelemetrySample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn mean_rpm(&self) -> Option<f64> {
        self.mean_of(|s| s.actual_rpm)
    }

    pub fn mean_comfort(&self) -> Option<f64> {
        self.mean_of(|s| s.comfort_c)
    }

    fn mean_of(&self, field: impl Fn(&TelemetrySample) -> f64) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().map(field).sum();
        Some(sum / self.samples.len() as f64)
    }
}

impl Default for TelemetryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + time::Duration::seconds(secs)
    }

    #[test]
    fn test_record_and_read_back() {
        let mut buffer = TelemetryBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.mean_rpm(), None);

        buffer.record(at(0), 25.0, 100.0, 0.0);
        buffer.record(at(1), 27.0, 200.0, 0.1);

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.mean_rpm(), Some(150.0));
        assert_eq!(buffer.mean_comfort(), Some(26.0));
        assert_eq!(buffer.latest().map(|s| s.timestamp), Some(at(1)));
    }

    #[test]
    fn test_evicts_oldest_after_capacity() {
        let mut buffer = TelemetryBuffer::new();
        for i in 0..61 {
            buffer.record(at(i), 25.0, i as f64, 0.0);
        }

        assert_eq!(buffer.len(), TELEMETRY_CAPACITY);
        let first = buffer.samples().next().unwrap();
        assert_eq!(first.timestamp, at(1));
        assert_eq!(buffer.latest().unwrap().timestamp, at(60));
        assert!(buffer.samples().all(|s| s.timestamp != at(0)));
    }

    #[test]
    fn test_samples_are_ordered() {
        let mut buffer = TelemetryBuffer::with_capacity(3);
        for i in 0..5 {
            buffer.record(at(i), 20.0, 0.0, 0.0);
        }
        let stamps: Vec<_> = buffer.samples().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![at(2), at(3), at(4)]);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut buffer = TelemetryBuffer::with_capacity(0);
        buffer.record(at(0), 20.0, 0.0, 0.0);
        buffer.record(at(1), 21.0, 0.0, 0.0);
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.mean_comfort(), Some(21.0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn never_exceeds_capacity(count in 0usize..200) {
            let mut buffer = TelemetryBuffer::new();
            for i in 0..count {
                buffer.record(OffsetDateTime::UNIX_EPOCH, 25.0, i as f64, 0.0);
                prop_assert!(buffer.len() <= TELEMETRY_CAPACITY);
            }
            prop_assert_eq!(buffer.len(), count.min(TELEMETRY_CAPACITY));
        }
    }
}
