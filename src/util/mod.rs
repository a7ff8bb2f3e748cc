//! Shared utilities for the scenes and engines.
//!
//! Easing curves, the tween helper driving hover uniforms, the frame clock,
//! and the cancellable frame loop.

pub mod easing;
pub mod frame_loop;
pub mod frame_timing;
pub mod tween;
