//! Helm engine crate.
//!
//! Subsystem scheduling plus the session host that runs the built-in
//! engine subsystems and a user app frame by frame.

pub mod builtin;
pub mod core;
pub mod logging;
pub mod platform;
pub mod runtime;
pub mod session;
pub mod systems;
pub mod time;

pub use crate::builtin::Collaborators;
pub use crate::core::{App, AppControl, DisplayMode, EngineCtx, Settings, WindowRect};
pub use crate::runtime::{FrameLoop, Runtime};
pub use crate::session::{Session, SessionBuilder};
