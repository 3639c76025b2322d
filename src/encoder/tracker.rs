//! Position tracking for both encoder axes.
//!
//! Both counters live in one atomic word so that snapshots and resets are
//! never torn between axes, and the edge handler needs no lock.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::control::Axis;

use super::EdgeEvent;

#[inline]
fn pack(x: i32, y: i32) -> u64 {
    ((x as u32 as u64) << 32) | (y as u32 as u64)
}

#[inline]
fn unpack(word: u64) -> (i32, i32) {
    ((word >> 32) as u32 as i32, word as u32 as i32)
}

/// Absolute encoder counts for X and Y.
///
/// The edge handler is the only incremental writer; [`reset`](Self::reset)
/// is the only other mutation. Counts wrap at the `i32` range.
#[derive(Debug, Default)]
pub struct PositionTracker {
    counts: AtomicU64,
}

impl PositionTracker {
    /// Create a tracker at the origin.
    #[inline]
    pub const fn new() -> Self {
        Self {
            counts: AtomicU64::new(0),
        }
    }

    /// Record one phase-A transition: +1 if phase B is high, -1 if low.
    ///
    /// Safe to call from interrupt context concurrently with readers.
    #[inline]
    pub fn on_edge(&self, axis: Axis, phase_b_high: bool) {
        let delta: i32 = if phase_b_high { 1 } else { -1 };
        self.step(axis, delta);
    }

    /// Apply an edge delivered as a message.
    #[inline]
    pub fn apply(&self, event: EdgeEvent) {
        self.on_edge(event.axis, event.phase_b_high);
    }

    fn step(&self, axis: Axis, delta: i32) {
        // Closure never returns None, so this cannot fail
        let _ = self
            .counts
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                let (x, y) = unpack(word);
                Some(match axis {
                    Axis::X => pack(x.wrapping_add(delta), y),
                    Axis::Y => pack(x, y.wrapping_add(delta)),
                })
            });
    }

    /// Both counts as of a single instant.
    #[inline]
    pub fn get(&self) -> (i32, i32) {
        unpack(self.counts.load(Ordering::Acquire))
    }

    /// Count for one axis.
    #[inline]
    pub fn axis(&self, axis: Axis) -> i32 {
        let (x, y) = self.get();
        match axis {
            Axis::X => x,
            Axis::Y => y,
        }
    }

    /// Set both axes to zero in one store.
    #[inline]
    pub fn reset(&self) {
        self.counts.store(0, Ordering::Release);
    }

    /// Register this tracker's handlers with an edge source, one per axis.
    #[cfg(feature = "std")]
    pub fn attach<S>(self: &std::sync::Arc<Self>, source: &mut S) -> crate::Result<()>
    where
        S: super::EdgeEventSource + ?Sized,
    {
        for axis in Axis::ALL {
            let tracker = std::sync::Arc::clone(self);
            source.register(axis, Box::new(move |event| tracker.apply(event)))?;
        }
        Ok(())
    }
}
