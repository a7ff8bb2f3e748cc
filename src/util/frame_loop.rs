//! Cancellable frame loop bookkeeping.
//!
//! Hosts (the browser `requestAnimationFrame` chain, the winit redraw loop)
//! call [`FrameLoop::begin_tick`] at the top of every frame callback and only
//! re-register for the next frame while it returns `true`. Cancelling is a
//! flag flip; the in-flight tick always runs to completion.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug)]
struct LoopState {
    running: Cell<bool>,
    /// Set once a callback observed the cancellation and stopped
    /// re-registering.
    parked: Cell<bool>,
    ticks: Cell<u64>,
}

/// Shared handle to a frame loop's run state.
///
/// Cloning yields another handle to the same loop.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: Rc<LoopState>,
}

impl FrameLoop {
    /// A running loop with no ticks recorded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(LoopState {
                running: Cell::new(true),
                parked: Cell::new(false),
                ticks: Cell::new(0),
            }),
        }
    }

    /// Whether the loop should keep re-registering.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    /// Number of ticks that ran.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.state.ticks.get()
    }

    /// Request the loop to stop after the current tick.
    pub fn cancel(&self) {
        self.state.running.set(false);
    }

    /// Resume a cancelled loop.
    ///
    /// Returns `true` when the host must register a fresh frame callback
    /// (the previous chain already parked). Returns `false` when the old
    /// callback is still pending and will simply keep going.
    pub fn restart(&self) -> bool {
        self.state.running.set(true);
        self.state.parked.replace(false)
    }

    /// Called at the top of each frame callback. Returns `false` (and parks
    /// the chain) when the loop was cancelled.
    pub fn begin_tick(&self) -> bool {
        if !self.state.running.get() {
            self.state.parked.set(true);
            return false;
        }
        self.state.ticks.set(self.state.ticks.get() + 1);
        true
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_until_cancelled() {
        let lp = FrameLoop::new();
        assert!(lp.is_running());
        assert!(lp.begin_tick());
        assert!(lp.begin_tick());
        lp.cancel();
        assert!(!lp.is_running());
        assert!(!lp.begin_tick());
        assert_eq!(lp.ticks(), 2);
    }

    #[test]
    fn restart_after_park_needs_new_callback() {
        let lp = FrameLoop::new();
        lp.cancel();
        assert!(!lp.begin_tick());
        assert!(lp.restart());
        assert!(lp.begin_tick());
    }

    #[test]
    fn restart_before_park_reuses_pending_callback() {
        let lp = FrameLoop::new();
        let host = lp.clone();
        lp.cancel();
        assert!(!lp.restart());
        assert!(host.begin_tick());
    }
}
