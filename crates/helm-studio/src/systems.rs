//! Stand-in collaborators for the studio host.
//!
//! None of them do real work; they log their lifecycle so the order the
//! scheduler picked is visible at `debug` level.

use anyhow::{bail, Result};
use helm_engine::builtin::names;
use helm_engine::platform::{HeadlessBackend, HostEvents, PlatformBackend};
use helm_engine::systems::Subsystem;
use helm_engine::{Collaborators, EngineCtx, WindowRect};

/// Logs init and shutdown, and counts updates.
struct Logged {
    name: &'static str,
    updates: u64,
}

impl Logged {
    fn boxed(name: &'static str) -> Box<dyn Subsystem<EngineCtx>> {
        Box::new(Self { name, updates: 0 })
    }
}

impl Subsystem<EngineCtx> for Logged {
    fn init(&mut self, ctx: &mut EngineCtx) -> Result<()> {
        log::debug!("{} up for `{}`", self.name, ctx.app_name());
        Ok(())
    }

    fn update(&mut self, _ctx: &mut EngineCtx) {
        self.updates += 1;
    }

    fn shutdown(&mut self, _ctx: &mut EngineCtx) -> Result<()> {
        log::debug!("{} down after {} updates", self.name, self.updates);
        Ok(())
    }
}

/// Mixed-reality backend for machines without an XR runtime.
struct NoXrRuntime;

impl PlatformBackend for NoXrRuntime {
    fn name(&self) -> &str {
        "openxr"
    }

    fn init(&mut self, _app_name: &str, _window: &WindowRect) -> Result<()> {
        bail!("no XR runtime found")
    }

    fn shutdown(&mut self) {}

    fn step_begin(&mut self) -> HostEvents {
        HostEvents::default()
    }

    fn step_end(&mut self) {}
}

pub fn collaborators() -> Collaborators {
    Collaborators {
        graphics: Logged::boxed(names::GRAPHICS),
        defaults: Logged::boxed(names::DEFAULTS),
        physics: Logged::boxed(names::PHYSICS),
        renderer: Logged::boxed(names::RENDERER),
        input: Logged::boxed(names::INPUT),
        text: Logged::boxed(names::TEXT),
        flatscreen: Box::new(HeadlessBackend::new()),
        mixed_reality: Some(Box::new(NoXrRuntime)),
    }
}
