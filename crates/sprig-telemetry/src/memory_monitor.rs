// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Load Memory Monitor
//!
//! Samples a [`MemoryTracker`] and keeps the figures a host needs to decide
//! whether a platform memory budget is being approached.

use std::sync::Mutex;

use sprig_core::MemoryTracker;

/// One sample of load buffer usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryReport {
    /// Bytes held by load buffers at sampling time.
    pub current_usage_bytes: usize,
    /// Highest usage seen by the tracker.
    pub peak_usage_bytes: usize,
    /// Growth since the previous sample (zero when usage went down).
    pub allocation_delta_bytes: usize,
    /// Number of samples taken so far.
    pub sample_count: u64,
    /// Allocations not matched by a deallocation.
    pub outstanding_allocations: i64,
    /// Sum of all bytes ever registered.
    pub bytes_allocated_lifetime: u64,
}

#[derive(Debug, Default)]
struct MonitorState {
    last_report: Option<MemoryReport>,
    last_usage_bytes: usize,
    sample_count: u64,
}

/// Periodically samples a tracker.
#[derive(Debug)]
pub struct MemoryMonitor {
    id: String,
    state: Mutex<MonitorState>,
}

impl MemoryMonitor {
    /// Creates a monitor that has not sampled anything yet.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: Mutex::new(MonitorState::default()),
        }
    }

    /// The identifier given at construction.
    pub fn monitor_id(&self) -> &str {
        &self.id
    }

    /// Returns the latest report.
    pub fn last_report(&self) -> Option<MemoryReport> {
        match self.state.lock() {
            Ok(state) => state.last_report,
            Err(poisoned) => poisoned.into_inner().last_report,
        }
    }

    /// Reads `tracker` and records a new report.
    pub fn sample(&self, tracker: &MemoryTracker) -> MemoryReport {
        let stats = tracker.stats();
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        let allocation_delta = stats.current_bytes.saturating_sub(state.last_usage_bytes);
        state.last_usage_bytes = stats.current_bytes;
        state.sample_count += 1;

        let report = MemoryReport {
            current_usage_bytes: stats.current_bytes,
            peak_usage_bytes: stats.peak_bytes,
            allocation_delta_bytes: allocation_delta,
            sample_count: state.sample_count,
            outstanding_allocations: stats.outstanding_allocations(),
            bytes_allocated_lifetime: stats.bytes_allocated_lifetime,
        };
        state.last_report = Some(report);
        report
    }

    /// Samples `tracker` and logs a one-line summary.
    pub fn log_summary(&self, tracker: &MemoryTracker) {
        let report = self.sample(tracker);
        let current_kb = report.current_usage_bytes as f64 / 1024.0;
        let peak_kb = report.peak_usage_bytes as f64 / 1024.0;
        log::info!(
            "[{}] Load buffers: {:.2} KB (Peak: {:.2} KB, outstanding allocations: {})",
            self.id,
            current_kb,
            peak_kb,
            report.outstanding_allocations
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_monitor_creation() {
        let monitor = MemoryMonitor::new("LoadMemory");
        assert_eq!(monitor.monitor_id(), "LoadMemory");
        assert!(monitor.last_report().is_none());
    }

    #[test]
    fn memory_monitor_tracks_delta_and_peak() {
        let tracker = MemoryTracker::new();
        let monitor = MemoryMonitor::new("LoadMemory");

        tracker.allocate(4096);
        let first = monitor.sample(&tracker);
        assert_eq!(first.current_usage_bytes, 4096);
        assert_eq!(first.allocation_delta_bytes, 4096);
        assert_eq!(first.sample_count, 1);
        assert_eq!(first.outstanding_allocations, 1);

        tracker.deallocate(4096);
        let second = monitor.sample(&tracker);
        assert_eq!(second.current_usage_bytes, 0);
        assert_eq!(second.allocation_delta_bytes, 0);
        assert_eq!(second.peak_usage_bytes, 4096);
        assert_eq!(second.sample_count, 2);
        assert_eq!(monitor.last_report(), Some(second));
    }
}
