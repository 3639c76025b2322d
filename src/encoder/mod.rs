//! Encoder module for gantry-motion.
//!
//! Counts quadrature edges into absolute positions. Edges arrive as
//! [`EdgeEvent`] messages from an interrupt-style source; the control loop
//! only ever reads snapshots.

mod channel;
mod tracker;

pub use channel::EncoderChannel;
pub use tracker::PositionTracker;

use crate::control::Axis;

/// A phase-A transition on one axis, with phase B sampled at that moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvent {
    /// Axis whose encoder fired.
    pub axis: Axis,
    /// Level of phase B at the transition.
    pub phase_b_high: bool,
}

impl EdgeEvent {
    /// Create an event.
    #[inline]
    pub const fn new(axis: Axis, phase_b_high: bool) -> Self {
        Self { axis, phase_b_high }
    }
}

/// Callback invoked by an edge source, possibly from another thread.
#[cfg(feature = "std")]
pub type EdgeHandler = Box<dyn Fn(EdgeEvent) + Send + Sync + 'static>;

/// Something that fires a handler on every encoder transition
/// (a GPIO interrupt service, a simulator, a test harness).
#[cfg(feature = "std")]
pub trait EdgeEventSource {
    /// Install the handler for one axis, replacing any previous one.
    fn register(&mut self, axis: Axis, handler: EdgeHandler) -> crate::Result<()>;
}
