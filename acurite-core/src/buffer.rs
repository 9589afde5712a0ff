//! Fixed-Size Rolling Window for Rain Totals
//!
//! ## Overview
//!
//! Trailing-hour and trailing-day rainfall need a sum over a sliding time
//! window. Storing every tip with its timestamp would be unbounded in a heavy
//! storm, so the window is quantised into N fixed-width time buckets kept in a
//! circular buffer. The size is fixed at compile time through const generics.
//!
//! ## Design Rationale
//!
//! ### Why Buckets?
//!
//! - O(1) insertion: a tip lands in the current bucket or opens a new one
//! - Memory is `N` buckets regardless of rain rate
//! - Resolution is one bucket width, which matches how consoles display it
//!   (5 minutes for the hour, 1 hour for the day)
//!
//! ### Memory Layout
//!
//! ```text
//! RollingWindow<4>, bucket = 5 min:
//! ┌────────┬────────┬────────┬────────┐
//! │ 10:05  │ 10:10  │ 09:55  │ 10:00  │  ← bucket start
//! │ 0.508  │ 0.254  │ 0.254  │ 0.000  │  ← mm
//! └────────┴────────┴────────┴────────┘
//!                       ↑
//!                       └── write_pos (oldest when full)
//! ```
//!
//! A bucket counts toward the total while `now - start < N * bucket_ms`.
//! Expired buckets are not removed eagerly; they are overwritten as new
//! buckets open and skipped when summing.
//!
//! ## Usage Example
//!
//! ```rust
//! use acurite_core::buffer::RollingWindow;
//!
//! // One hour in 5-minute buckets
//! let mut hour: RollingWindow<12> = RollingWindow::new(5 * 60 * 1000);
//!
//! hour.add(0, 0.254);
//! hour.add(60_000, 0.254);
//! assert!((hour.total(120_000) - 0.508).abs() < 1e-6);
//!
//! // Two hours later nothing is left in the window
//! assert_eq!(hour.total(2 * 3_600_000), 0.0);
//! ```

use crate::time::Timestamp;

/// Amount accumulated during one bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    /// Start of the bucket, aligned to the bucket width
    pub start: Timestamp,
    /// Amount accumulated in the bucket
    pub value: f32,
}

/// Sliding time window of N buckets
///
/// ## Internal Invariants
///
/// - `write_pos < N`
/// - `len <= N`
/// - Bucket starts increase from oldest to newest
#[derive(Debug, Clone)]
pub struct RollingWindow<const N: usize> {
    /// Storage; `None` until a slot is first written
    data: [Option<Bucket>; N],

    /// Index where the next bucket will open
    write_pos: usize,

    /// Buckets written so far, saturating at N
    len: usize,

    /// Width of one bucket in milliseconds
    bucket_ms: u64,
}

impl<const N: usize> RollingWindow<N> {
    /// Create an empty window with the given bucket width
    pub const fn new(bucket_ms: u64) -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
            bucket_ms,
        }
    }

    /// Add an amount at time `now`
    ///
    /// Timestamps older than the newest bucket are folded into it; a clock
    /// that steps backwards must not open buckets out of order.
    pub fn add(&mut self, now: Timestamp, value: f32) {
        let start = self.align(now);

        if let Some(last) = self.last_mut() {
            if start <= last.start {
                last.value += value;
                return;
            }
        }

        self.push(Bucket { start, value });
    }

    /// Sum of every bucket still inside the window at `now`
    pub fn total(&self, now: Timestamp) -> f32 {
        let span = self.span_ms();
        self.iter()
            .filter(|b| now.saturating_sub(b.start) < span)
            .map(|b| b.value)
            .sum()
    }

    /// Width of the whole window
    pub const fn span_ms(&self) -> u64 {
        self.bucket_ms * N as u64
    }

    /// Width of one bucket
    pub const fn bucket_ms(&self) -> u64 {
        self.bucket_ms
    }

    /// Get number of stored buckets
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no bucket was opened yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recent bucket
    pub fn last(&self) -> Option<&Bucket> {
        if self.is_empty() {
            return None;
        }
        self.data[self.newest_index()].as_ref()
    }

    /// Iterate over buckets from oldest to newest
    pub fn iter(&self) -> RollingWindowIter<'_, N> {
        RollingWindowIter {
            window: self,
            index: 0,
        }
    }

    /// Drop every bucket
    pub fn clear(&mut self) {
        self.data = [None; N];
        self.write_pos = 0;
        self.len = 0;
    }

    fn align(&self, now: Timestamp) -> Timestamp {
        if self.bucket_ms == 0 {
            return now;
        }
        now - now % self.bucket_ms
    }

    fn newest_index(&self) -> usize {
        if self.write_pos == 0 { N - 1 } else { self.write_pos - 1 }
    }

    fn last_mut(&mut self) -> Option<&mut Bucket> {
        if self.is_empty() {
            return None;
        }
        let idx = self.newest_index();
        self.data[idx].as_mut()
    }

    fn push(&mut self, bucket: Bucket) {
        self.data[self.write_pos] = Some(bucket);
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Bucket by logical index, 0 = oldest
    ///
    /// ```text
    /// Physical:  [D, E, A, B, C]  (write_pos = 2)
    /// Logical:   [A, B, C, D, E]
    /// logical[i] = physical[(write_pos + i) % N] once full
    /// ```
    fn get(&self, index: usize) -> Option<&Bucket> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < N {
            index
        } else {
            (self.write_pos + index) % N
        };

        self.data[actual_index].as_ref()
    }
}

/// Iterator over window buckets, oldest first
pub struct RollingWindowIter<'a, const N: usize> {
    window: &'a RollingWindow<N>,
    index: usize,
}

impl<'a, const N: usize> Iterator for RollingWindowIter<'a, N> {
    type Item = &'a Bucket;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.window.get(self.index)?;
        self.index += 1;
        Some(item)
    }
}
