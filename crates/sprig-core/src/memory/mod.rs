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

//! Bookkeeping for the transient buffers used while a project is being loaded.
//!
//! The [`MemoryTracker`] is a set of atomic counters that the extraction code
//! bumps whenever it takes ownership of a load buffer and decrements when that
//! buffer is released. It never enforces a ceiling itself: collaborators read
//! the running total (or a [`MemoryStats`] snapshot) to impose their own limits.
//!
//! [`TrackedBuffer`] ties a byte buffer to a tracker so that every registered
//! allocation is matched by a deallocation on every exit path.

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// A snapshot of the tracker counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Bytes currently attributed to live load buffers.
    pub current_bytes: usize,
    /// Highest value `current_bytes` has reached.
    pub peak_bytes: usize,
    /// Number of `allocate` calls.
    pub total_allocations: u64,
    /// Number of `deallocate` calls.
    pub total_deallocations: u64,
    /// Sum of all bytes ever registered.
    pub bytes_allocated_lifetime: u64,
    /// Sum of all bytes ever released.
    pub bytes_deallocated_lifetime: u64,
}

impl MemoryStats {
    /// Allocations that have not been matched by a deallocation yet.
    pub fn outstanding_allocations(&self) -> i64 {
        self.total_allocations as i64 - self.total_deallocations as i64
    }
}

/// Running total of bytes held by load buffers.
#[derive(Debug, Default)]
pub struct MemoryTracker {
    current: AtomicUsize,
    peak: AtomicUsize,
    allocations: AtomicU64,
    deallocations: AtomicU64,
    allocated_lifetime: AtomicU64,
    deallocated_lifetime: AtomicU64,
}

impl MemoryTracker {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` as newly held by a load buffer.
    pub fn allocate(&self, bytes: usize) {
        let result = self
            .current
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_add(bytes)
            });

        match result {
            Ok(previous) => {
                self.peak.fetch_max(previous + bytes, Ordering::Relaxed);
            }
            Err(_) => {
                log::error!("Load memory counter overflowed during allocate! Size: {bytes}");
            }
        }

        self.allocations.fetch_add(1, Ordering::Relaxed);
        self.allocated_lifetime
            .fetch_add(bytes as u64, Ordering::Relaxed);
        log::trace!("Tracked {bytes} bytes, now {}", self.current_bytes());
    }

    /// Releases `bytes` previously registered with [`allocate`](Self::allocate).
    ///
    /// The running total never goes below zero; an unmatched release clamps it
    /// to zero and is logged.
    pub fn deallocate(&self, bytes: usize) {
        let result = self
            .current
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_sub(bytes)
            });

        if result.is_err() {
            log::error!("Load memory counter underflowed during deallocate! Size: {bytes}");
            self.current.store(0, Ordering::Relaxed);
        }

        self.deallocations.fetch_add(1, Ordering::Relaxed);
        self.deallocated_lifetime
            .fetch_add(bytes as u64, Ordering::Relaxed);
        log::trace!("Released {bytes} bytes, now {}", self.current_bytes());
    }

    /// Bytes currently attributed to live load buffers.
    pub fn current_bytes(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    /// Takes a snapshot of all counters.
    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            current_bytes: self.current.load(Ordering::Relaxed),
            peak_bytes: self.peak.load(Ordering::Relaxed),
            total_allocations: self.allocations.load(Ordering::Relaxed),
            total_deallocations: self.deallocations.load(Ordering::Relaxed),
            bytes_allocated_lifetime: self.allocated_lifetime.load(Ordering::Relaxed),
            bytes_deallocated_lifetime: self.deallocated_lifetime.load(Ordering::Relaxed),
        }
    }
}

/// A byte buffer whose size is registered with a [`MemoryTracker`] for as
/// long as it is alive.
///
/// The size is recorded once on construction and released on drop, so early
/// returns and `?` propagation cannot leak tracker entries.
#[derive(Debug)]
pub struct TrackedBuffer<'a> {
    bytes: Vec<u8>,
    tracked: usize,
    tracker: &'a MemoryTracker,
}

impl<'a> TrackedBuffer<'a> {
    /// Takes ownership of `bytes` and registers its length with `tracker`.
    pub fn new(tracker: &'a MemoryTracker, bytes: Vec<u8>) -> Self {
        let tracked = bytes.len();
        tracker.allocate(tracked);
        Self {
            bytes,
            tracked,
            tracker,
        }
    }

    /// The tracked contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes registered with the tracker.
    pub fn tracked_len(&self) -> usize {
        self.tracked
    }
}

impl Deref for TrackedBuffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for TrackedBuffer<'_> {
    fn drop(&mut self) {
        self.tracker.deallocate(self.tracked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_deallocate_balance() {
        let tracker = MemoryTracker::new();
        tracker.allocate(128);
        tracker.allocate(64);
        assert_eq!(tracker.current_bytes(), 192);

        tracker.deallocate(128);
        tracker.deallocate(64);
        assert_eq!(tracker.current_bytes(), 0);

        let stats = tracker.stats();
        assert_eq!(stats.peak_bytes, 192);
        assert_eq!(stats.total_allocations, 2);
        assert_eq!(stats.total_deallocations, 2);
        assert_eq!(stats.outstanding_allocations(), 0);
        assert_eq!(stats.bytes_allocated_lifetime, 192);
        assert_eq!(stats.bytes_deallocated_lifetime, 192);
    }

    #[test]
    fn underflow_clamps_to_zero() {
        let tracker = MemoryTracker::new();
        tracker.allocate(10);
        tracker.deallocate(50);
        assert_eq!(tracker.current_bytes(), 0);
    }

    #[test]
    fn tracked_buffer_releases_on_drop() {
        let tracker = MemoryTracker::new();
        {
            let buffer = TrackedBuffer::new(&tracker, vec![0u8; 300]);
            assert_eq!(buffer.tracked_len(), 300);
            assert_eq!(buffer.len(), 300);
            assert_eq!(tracker.current_bytes(), 300);
        }
        assert_eq!(tracker.current_bytes(), 0);
        assert_eq!(tracker.stats().peak_bytes, 300);
    }

    #[test]
    fn tracked_buffer_releases_on_early_return() {
        fn fails(tracker: &MemoryTracker) -> Result<(), ()> {
            let _buffer = TrackedBuffer::new(tracker, vec![1u8; 42]);
            Err(())
        }

        let tracker = MemoryTracker::new();
        assert!(fails(&tracker).is_err());
        assert_eq!(tracker.current_bytes(), 0);
    }
}
