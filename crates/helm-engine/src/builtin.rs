//! Built-in subsystem table.
//!
//! Every session registers the same eleven subsystems before any user
//! subsystem. Six of them are supplied by the embedder through
//! [`Collaborators`]; the platform, frame markers and the app wrapper are
//! owned by the engine.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use crate::core::{App, AppControl, EngineCtx};
use crate::platform::{HeadlessBackend, PlatformBackend, PlatformLayer};
use crate::systems::{ConfigError, Hooks, Registry, Subsystem, SystemDesc};

/// Names of the built-in subsystems, for ordering user subsystems
/// against them.
pub mod names {
    pub const GRAPHICS: &str = "Graphics";
    pub const DEFAULTS: &str = "Defaults";
    pub const PLATFORM: &str = "Platform";
    pub const PHYSICS: &str = "Physics";
    pub const RENDERER: &str = "Renderer";
    pub const INPUT: &str = "Input";
    pub const TEXT: &str = "Text";
    pub const APP: &str = "App";
    pub const FRAME_BEGIN: &str = "FrameBegin";
    pub const FRAME_END: &str = "FrameEnd";
    pub const FRAME_PRESENT: &str = "FramePresent";
}

use names::*;

/// Engine pieces provided by the embedder.
pub struct Collaborators {
    pub graphics: Box<dyn Subsystem<EngineCtx>>,
    pub defaults: Box<dyn Subsystem<EngineCtx>>,
    pub physics: Box<dyn Subsystem<EngineCtx>>,
    pub renderer: Box<dyn Subsystem<EngineCtx>>,
    pub input: Box<dyn Subsystem<EngineCtx>>,
    pub text: Box<dyn Subsystem<EngineCtx>>,
    pub flatscreen: Box<dyn PlatformBackend>,
    pub mixed_reality: Option<Box<dyn PlatformBackend>>,
}

impl Collaborators {
    /// No-op collaborators on top of a [`HeadlessBackend`].
    pub fn headless() -> Self {
        Self::with_platform(Box::new(HeadlessBackend::new()), None)
    }

    /// No-op collaborators on top of the given platform backends.
    pub fn with_platform(
        flatscreen: Box<dyn PlatformBackend>,
        mixed_reality: Option<Box<dyn PlatformBackend>>,
    ) -> Self {
        Self {
            graphics: idle(),
            defaults: idle(),
            physics: idle(),
            renderer: idle(),
            input: idle(),
            text: idle(),
            flatscreen,
            mixed_reality,
        }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::headless()
    }
}

fn idle() -> Box<dyn Subsystem<EngineCtx>> {
    Box::new(Hooks::<EngineCtx>::default())
}

/// Registers the built-in table, in its fixed registration order.
pub(crate) fn register(
    registry: &mut Registry<EngineCtx>,
    collaborators: Collaborators,
    app: Box<dyn App>,
) -> Result<(), ConfigError> {
    let platform = Rc::new(RefCell::new(PlatformLayer::new(
        collaborators.flatscreen,
        collaborators.mixed_reality,
    )));

    registry
        .register(SystemDesc::new(GRAPHICS).boxed(collaborators.graphics))?
        .register(
            SystemDesc::new(DEFAULTS)
                .init_after([GRAPHICS])
                .boxed(collaborators.defaults),
        )?
        .register(
            SystemDesc::new(PLATFORM)
                .init_after([GRAPHICS, DEFAULTS])
                .system(PlatformSystem(platform.clone())),
        )?
        .register(
            SystemDesc::new(PHYSICS)
                .init_after([DEFAULTS])
                .update_after([INPUT, FRAME_BEGIN])
                .boxed(collaborators.physics),
        )?
        .register(
            SystemDesc::new(RENDERER)
                .init_after([GRAPHICS, DEFAULTS])
                .update_after([PHYSICS, FRAME_BEGIN])
                .boxed(collaborators.renderer),
        )?
        .register(
            SystemDesc::new(INPUT)
                .init_after([PLATFORM, DEFAULTS])
                .update_after([FRAME_BEGIN])
                .boxed(collaborators.input),
        )?
        .register(
            SystemDesc::new(TEXT)
                .init_after([DEFAULTS])
                .update_after([FRAME_BEGIN, APP])
                .boxed(collaborators.text),
        )?
        .register(
            SystemDesc::new(APP)
                .update_after([INPUT, DEFAULTS, FRAME_BEGIN, GRAPHICS, PHYSICS, RENDERER])
                .system(AppSystem(app)),
        )?
        .register(SystemDesc::new(FRAME_BEGIN).system(FrameBegin(platform.clone())))?
        .register(
            SystemDesc::new(FRAME_END)
                .update_after([APP, TEXT])
                .system(FrameEnd(platform.clone())),
        )?
        .register(
            SystemDesc::new(FRAME_PRESENT)
                .update_after([FRAME_END])
                .system(FramePresent(platform)),
        )?;

    Ok(())
}

type SharedPlatform = Rc<RefCell<PlatformLayer>>;

/// Starts the display and records which mode came up.
struct PlatformSystem(SharedPlatform);

impl Subsystem<EngineCtx> for PlatformSystem {
    fn init(&mut self, ctx: &mut EngineCtx) -> Result<()> {
        let mode = self.0.borrow_mut().init(ctx.settings())?;
        ctx.set_active_display(Some(mode));
        Ok(())
    }

    fn shutdown(&mut self, ctx: &mut EngineCtx) -> Result<()> {
        self.0.borrow_mut().shutdown();
        ctx.set_active_display(None);
        Ok(())
    }

    fn updates(&self) -> bool {
        false
    }
}

/// Pumps host events, then advances time.
struct FrameBegin(SharedPlatform);

impl Subsystem<EngineCtx> for FrameBegin {
    fn update(&mut self, ctx: &mut EngineCtx) {
        let events = self.0.borrow_mut().step_begin();
        ctx.begin_frame(events);
    }
}

struct FrameEnd(SharedPlatform);

impl Subsystem<EngineCtx> for FrameEnd {
    fn update(&mut self, _ctx: &mut EngineCtx) {
        self.0.borrow_mut().step_end();
    }
}

struct FramePresent(SharedPlatform);

impl Subsystem<EngineCtx> for FramePresent {
    fn update(&mut self, _ctx: &mut EngineCtx) {
        self.0.borrow_mut().present();
    }
}

/// Runs the user app once per tick.
struct AppSystem(Box<dyn App>);

impl Subsystem<EngineCtx> for AppSystem {
    fn update(&mut self, ctx: &mut EngineCtx) {
        if self.0.on_frame(ctx) == AppControl::Exit {
            ctx.request_exit();
        }
    }
}
