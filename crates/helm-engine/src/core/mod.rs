//! Core engine-facing contracts.
//!
//! The application trait, the per-session context passed to every
//! subsystem, and the settings that configure a session.

mod app;
mod ctx;
mod settings;

pub use app::{App, AppControl};
pub use ctx::EngineCtx;
pub use settings::{DisplayMode, Settings, WindowRect};
