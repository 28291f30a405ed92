use anyhow::Result;

use crate::core::WindowRect;

/// Host signals gathered at the start of a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HostEvents {
    /// Whether the window or headset currently has the user's attention.
    pub focused: bool,
    /// The host asked the application to quit.
    pub close_requested: bool,
}

impl Default for HostEvents {
    fn default() -> Self {
        Self {
            focused: true,
            close_requested: false,
        }
    }
}

/// Windowing or XR runtime for a single display mode.
pub trait PlatformBackend {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Creates the window or XR session.
    fn init(&mut self, app_name: &str, window: &WindowRect) -> Result<()>;

    /// Tears down whatever `init` created.
    fn shutdown(&mut self);

    /// Pumps host events for the new frame.
    fn step_begin(&mut self) -> HostEvents;

    /// Finishes host-side work for the frame.
    fn step_end(&mut self);

    /// Presents the finished frame. Flatscreen backends wait for vsync here.
    fn present(&mut self) {}
}
