//! Host hooks standing in for the platform animation-frame primitive and clock.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

/// Identifier of a scheduled frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// Schedules one frame callback at a time on behalf of an engine.
///
/// When a requested frame fires, the host calls [`crate::CanvasEngine::on_frame`] with the frame
/// timestamp.
pub trait FrameScheduler {
    /// Ask the host for the next frame callback.
    fn request_frame(&mut self) -> FrameRequestId;

    /// Withdraw a previously requested callback. Unknown ids are ignored.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Monotonic millisecond clock.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by [`std::time::Instant`].
#[derive(Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
}

impl SystemClock {
    /// Clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Settable clock. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Clock starting at `start_ms`.
    pub fn new(start_ms: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start_ms.to_bits())),
        }
    }

    /// Jump to `ms`.
    pub fn set(&self, ms: f64) {
        self.bits.store(ms.to_bits(), Ordering::SeqCst);
    }

    /// Move forward by `delta_ms` and return the new time.
    pub fn advance(&self, delta_ms: f64) -> f64 {
        let next = self.now_ms() + delta_ms;
        self.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Default)]
struct ManualSchedulerState {
    next_id: u64,
    requested: u64,
    cancelled: u64,
    pending: Option<FrameRequestId>,
}

/// Scheduler driven explicitly by the caller (tests, offline rendering).
///
/// Clones share state, so a test can keep a handle while the engine owns another. At most one
/// request is pending at a time; a new request replaces the previous one.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualSchedulerState>>,
}

impl ManualScheduler {
    /// Fresh scheduler with no pending request.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut ManualSchedulerState) -> R) -> R {
        let mut st = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut st)
    }

    /// Request currently waiting to fire, if any.
    pub fn pending(&self) -> Option<FrameRequestId> {
        self.with_state(|st| st.pending)
    }

    /// Consume the pending request. Returns `true` when a frame was due.
    pub fn take_pending(&self) -> bool {
        self.with_state(|st| st.pending.take().is_some())
    }

    /// Total `request_frame` calls so far.
    pub fn requested(&self) -> u64 {
        self.with_state(|st| st.requested)
    }

    /// Total `cancel_frame` calls that withdrew a pending request.
    pub fn cancelled(&self) -> u64 {
        self.with_state(|st| st.cancelled)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequestId {
        self.with_state(|st| {
            st.next_id += 1;
            st.requested += 1;
            let id = FrameRequestId(st.next_id);
            st.pending = Some(id);
            id
        })
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.with_state(|st| {
            if st.pending == Some(id) {
                st.pending = None;
                st.cancelled += 1;
            }
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/host.rs"]
mod tests;
