//! Platform host.
//!
//! A [`PlatformBackend`] owns the window or XR session for one display mode.
//! [`PlatformLayer`] picks the backend for the preferred mode at startup,
//! optionally falls back to flatscreen, and forwards per-frame calls to
//! whichever backend started.

mod backend;
mod headless;
mod layer;

pub use backend::{HostEvents, PlatformBackend};
pub use headless::HeadlessBackend;
pub use layer::PlatformLayer;
