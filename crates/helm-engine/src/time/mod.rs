//! Engine time.
//!
//! One `FrameClock` per session. The frame-begin subsystem calls `tick()`
//! once per frame; everything else reads the resulting `FrameTime` through
//! the session context.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
