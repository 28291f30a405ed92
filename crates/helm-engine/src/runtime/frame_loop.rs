use std::thread;

use anyhow::{Context, Result};

use crate::core::App;
use crate::session::{Session, SessionBuilder};
use crate::systems::NotRunning;

/// Drives a started session until something asks it to stop.
pub struct FrameLoop;

impl FrameLoop {
    /// One update pass.
    ///
    /// While the host is unfocused and the session keeps going, the thread
    /// sleeps for `Settings::unfocused_idle` before returning.
    pub fn tick(session: &mut Session) -> Result<bool, NotRunning> {
        let running = session.step()?;

        let ctx = session.ctx();
        if running && !ctx.is_focused() {
            thread::sleep(ctx.settings().unfocused_idle);
        }
        Ok(running)
    }

    /// Ticks until the continue flag clears, then shuts the session down.
    ///
    /// Returns the number of ticks run.
    pub fn run(session: &mut Session) -> Result<u64, NotRunning> {
        let mut frames = 0u64;
        loop {
            frames += 1;
            if !Self::tick(session)? {
                break;
            }
        }

        log::info!("frame loop finished after {frames} frames");
        session.shutdown();
        Ok(frames)
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Starts a session for `app` and runs it to completion.
    pub fn run<A>(builder: SessionBuilder, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let mut session = builder.start(app).context("failed to start session")?;
        FrameLoop::run(&mut session).context("frame loop stopped unexpectedly")?;
        Ok(())
    }
}
