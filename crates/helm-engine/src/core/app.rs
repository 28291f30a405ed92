use super::ctx::EngineCtx;

/// Control directive returned by the application each frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by user code.
///
/// The engine runs the app as the `App` subsystem, after input, physics and
/// the renderer have updated for the frame.
pub trait App {
    /// Called once per frame.
    fn on_frame(&mut self, ctx: &mut EngineCtx) -> AppControl;
}

impl<F> App for F
where
    F: FnMut(&mut EngineCtx) -> AppControl,
{
    fn on_frame(&mut self, ctx: &mut EngineCtx) -> AppControl {
        self(ctx)
    }
}
