use crate::platform::HostEvents;
use crate::time::{FrameClock, FrameTime};

use super::settings::{DisplayMode, Settings};

/// Session context handed to every subsystem callback.
///
/// Holds everything the engine tracks across subsystems: the frozen
/// settings, the active display mode, engine time and the focus / continue
/// flags reported by the platform.
pub struct EngineCtx {
    settings: Settings,
    display: Option<DisplayMode>,
    clock: FrameClock,
    time: FrameTime,
    focused: bool,
    running: bool,
}

impl EngineCtx {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            display: None,
            clock: FrameClock::new(),
            time: FrameTime::default(),
            focused: true,
            running: true,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn app_name(&self) -> &str {
        &self.settings.app_name
    }

    /// Display mode the platform started in, once it has started.
    pub fn active_display(&self) -> Option<DisplayMode> {
        self.display
    }

    pub(crate) fn set_active_display(&mut self, mode: Option<DisplayMode>) {
        self.display = mode;
    }

    /// Timing snapshot of the current frame.
    pub fn frame(&self) -> &FrameTime {
        &self.time
    }

    /// Seconds since the first frame began, as of this frame.
    pub fn time(&self) -> f64 {
        self.time.total
    }

    pub fn time_f32(&self) -> f32 {
        self.time.total as f32
    }

    /// Seconds since the previous frame.
    pub fn elapsed(&self) -> f64 {
        self.time.dt64
    }

    pub fn elapsed_f32(&self) -> f32 {
        self.time.dt
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the frame loop should keep ticking.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Asks the frame loop to stop after the current tick.
    pub fn request_exit(&mut self) {
        if self.running {
            log::info!("exit requested");
        }
        self.running = false;
    }

    /// Applies platform signals and advances engine time.
    pub(crate) fn begin_frame(&mut self, events: HostEvents) {
        if self.focused != events.focused {
            log::debug!("host focus changed: {}", events.focused);
        }
        self.focused = events.focused;
        if events.close_requested {
            self.request_exit();
        }
        self.time = self.clock.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_frame_tracks_focus_and_time() {
        let mut ctx = EngineCtx::new(Settings::default());
        assert_eq!(ctx.frame().frame_index, 0);
        assert_eq!(ctx.time(), 0.0);

        ctx.begin_frame(HostEvents {
            focused: false,
            close_requested: false,
        });
        assert!(!ctx.is_focused());
        assert!(ctx.is_running());
        assert_eq!(ctx.elapsed(), 0.0);

        ctx.begin_frame(HostEvents::default());
        assert!(ctx.is_focused());
        assert_eq!(ctx.frame().frame_index, 1);
        assert!(ctx.elapsed() > 0.0);
    }

    #[test]
    fn close_request_stops_the_loop() {
        let mut ctx = EngineCtx::new(Settings::default());
        ctx.begin_frame(HostEvents {
            focused: true,
            close_requested: true,
        });
        assert!(!ctx.is_running());
    }
}
