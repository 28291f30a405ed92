use anyhow::{ensure, Result};

use crate::core::WindowRect;

use super::backend::{HostEvents, PlatformBackend};

/// Flatscreen backend without a window.
///
/// Always focused. Useful for tests, tools and CI where no display exists.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    started: bool,
    frames: u64,
    close_after: Option<u64>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a close request once `frames` frames have begun.
    pub fn close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Frames begun since `init`.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl PlatformBackend for HeadlessBackend {
    fn name(&self) -> &str {
        "headless"
    }

    fn init(&mut self, app_name: &str, window: &WindowRect) -> Result<()> {
        ensure!(!self.started, "headless backend already started");
        log::debug!(
            "headless host for `{app_name}` ({}x{} at {},{})",
            window.width,
            window.height,
            window.x,
            window.y
        );
        self.started = true;
        self.frames = 0;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.started = false;
    }

    fn step_begin(&mut self) -> HostEvents {
        self.frames += 1;
        HostEvents {
            focused: true,
            close_requested: self.close_after.is_some_and(|n| self.frames >= n),
        }
    }

    fn step_end(&mut self) {}
}
