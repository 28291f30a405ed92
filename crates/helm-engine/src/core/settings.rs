use std::fmt;
use std::time::Duration;

/// How the engine presents to the user.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DisplayMode {
    /// A regular desktop window.
    Flatscreen,
    /// A head-mounted display driven by an XR runtime.
    MixedReality,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Flatscreen => f.write_str("Flatscreen"),
            DisplayMode::MixedReality => f.write_str("MixedReality"),
        }
    }
}

/// Initial flatscreen window placement, in logical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            width: 800,
            height: 480,
        }
    }
}

/// Session settings.
///
/// Taken by value when a session starts and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,

    /// Display mode tried first.
    pub display_preference: DisplayMode,

    /// Retry in flatscreen when the preferred mode cannot start.
    pub display_fallback: bool,

    pub window: WindowRect,

    /// Sleep inserted between frames while the host is not focused.
    pub unfocused_idle: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "helm".to_string(),
            display_preference: DisplayMode::Flatscreen,
            display_fallback: false,
            window: WindowRect::default(),
            unfocused_idle: Duration::from_millis(250),
        }
    }
}
