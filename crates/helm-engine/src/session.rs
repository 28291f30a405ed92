//! Session host.
//!
//! A [`Session`] is one start, steps, shutdown lifetime of an [`EngineCtx`]
//! together with the subsystems that run against it.

use crate::builtin::{self, Collaborators};
use crate::core::{App, EngineCtx, Settings};
use crate::systems::{Lifecycle, LifecycleState, NotRunning, Registry, StartError, SystemDesc};

/// Collects settings, collaborators and extra subsystems, then starts a
/// session.
///
/// Extra subsystems are registered after the built-in table and may name
/// built-ins (see [`builtin::names`]) as dependencies.
pub struct SessionBuilder {
    settings: Settings,
    collaborators: Collaborators,
    extra: Vec<SystemDesc<EngineCtx>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            collaborators: Collaborators::headless(),
            extra: Vec::new(),
        }
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    pub fn subsystem(mut self, desc: SystemDesc<EngineCtx>) -> Self {
        self.extra.push(desc);
        self
    }

    /// Registers everything, computes both orders and runs the init pass.
    ///
    /// On failure nothing is left running: configuration errors are found
    /// before any callback, and an init failure has already unwound the
    /// subsystems that started.
    pub fn start<A>(self, app: A) -> Result<Session, StartError>
    where
        A: App + 'static,
    {
        let mut registry = Registry::new();
        builtin::register(&mut registry, self.collaborators, Box::new(app))?;
        for desc in self.extra {
            registry.register(desc)?;
        }
        let mut lifecycle = registry.build()?;

        let mut ctx = EngineCtx::new(self.settings);
        log::info!("starting session `{}`", ctx.app_name());
        lifecycle.initialize(&mut ctx)?;

        Ok(Session { ctx, lifecycle })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running (or finished) engine session.
///
/// Dropping a session that is still running shuts it down.
pub struct Session {
    ctx: EngineCtx,
    lifecycle: Lifecycle<EngineCtx>,
}

impl Session {
    /// Runs one tick and reports whether the session wants another.
    pub fn step(&mut self) -> Result<bool, NotRunning> {
        self.lifecycle.update(&mut self.ctx)?;
        Ok(self.ctx.is_running())
    }

    /// Runs the shutdown pass. Calling it again does nothing.
    pub fn shutdown(&mut self) {
        self.lifecycle.shutdown(&mut self.ctx);
    }

    pub fn ctx(&self) -> &EngineCtx {
        &self.ctx
    }

    pub fn lifecycle(&self) -> &Lifecycle<EngineCtx> {
        &self.lifecycle
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.lifecycle.state() == LifecycleState::Running {
            log::debug!("session dropped while running, shutting down");
            self.shutdown();
        }
    }
}
