//! Frame loop and top-level entry point.

mod frame_loop;

pub use frame_loop::{FrameLoop, Runtime};
