use anyhow::Result;

/// Lifecycle contract implemented by every engine subsystem.
///
/// `C` is the session context handed to each callback. All three operations
/// are optional; the defaults are no-ops that report success.
///
/// ```rust
/// use helm_engine::systems::Subsystem;
///
/// struct Physics { bodies: Vec<u32> }
///
/// impl Subsystem<()> for Physics {
///     fn init(&mut self, _ctx: &mut ()) -> anyhow::Result<()> {
///         self.bodies.reserve(64);
///         Ok(())
///     }
///
///     fn update(&mut self, _ctx: &mut ()) {
///         self.bodies.retain(|b| *b != 0);
///     }
/// }
/// ```
pub trait Subsystem<C> {
    /// Called once, after every init dependency has initialized.
    fn init(&mut self, ctx: &mut C) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called once per tick, after every update dependency's update.
    fn update(&mut self, ctx: &mut C) {
        let _ = ctx;
    }

    /// Called once, before any init dependency shuts down.
    ///
    /// Errors are logged by the scheduler and never stop sibling shutdowns.
    fn shutdown(&mut self, ctx: &mut C) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Whether [`update`](Self::update) does anything.
    ///
    /// Subsystems returning `false` are left out of the per-tick plan.
    fn updates(&self) -> bool {
        true
    }
}

type InitFn<C> = Box<dyn FnMut(&mut C) -> Result<()>>;
type UpdateFn<C> = Box<dyn FnMut(&mut C)>;
type ShutdownFn<C> = Box<dyn FnMut(&mut C) -> Result<()>>;

/// Subsystem assembled from up to three closures.
pub struct Hooks<C> {
    init: Option<InitFn<C>>,
    update: Option<UpdateFn<C>>,
    shutdown: Option<ShutdownFn<C>>,
}

impl<C> Default for Hooks<C> {
    fn default() -> Self {
        Self {
            init: None,
            update: None,
            shutdown: None,
        }
    }
}

impl<C> Subsystem<C> for Hooks<C> {
    fn init(&mut self, ctx: &mut C) -> Result<()> {
        match &mut self.init {
            Some(f) => f(ctx),
            None => Ok(()),
        }
    }

    fn update(&mut self, ctx: &mut C) {
        if let Some(f) = &mut self.update {
            f(ctx);
        }
    }

    fn shutdown(&mut self, ctx: &mut C) -> Result<()> {
        match &mut self.shutdown {
            Some(f) => f(ctx),
            None => Ok(()),
        }
    }

    fn updates(&self) -> bool {
        self.update.is_some()
    }
}

enum Body<C> {
    Anchor,
    Hooks(Hooks<C>),
    System(Box<dyn Subsystem<C>>),
}

/// Registration record for one subsystem.
///
/// Built with a small builder; a descriptor with no body is an ordering
/// anchor that other subsystems can depend on but which never runs code.
///
/// ```rust
/// use helm_engine::systems::SystemDesc;
///
/// let begin = SystemDesc::<()>::new("FrameBegin");
/// let physics = SystemDesc::<()>::new("Physics")
///     .init_after(["Defaults"])
///     .update_after(["Input", "FrameBegin"])
///     .on_update(|_ctx| {});
/// # let _ = (begin, physics);
/// ```
pub struct SystemDesc<C> {
    pub(crate) name: String,
    pub(crate) init_after: Vec<String>,
    pub(crate) update_after: Vec<String>,
    body: Body<C>,
}

impl<C> SystemDesc<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            init_after: Vec::new(),
            update_after: Vec::new(),
            body: Body::Anchor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds subsystems that must finish `init` before this one starts.
    pub fn init_after<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.init_after, names);
        self
    }

    /// Adds subsystems whose `update` must run earlier in the same tick.
    pub fn update_after<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.update_after, names);
        self
    }

    /// Uses `system` as the body, replacing any closures set so far.
    pub fn system(mut self, system: impl Subsystem<C> + 'static) -> Self {
        self.body = Body::System(Box::new(system));
        self
    }

    /// Uses an already boxed subsystem as the body.
    pub fn boxed(mut self, system: Box<dyn Subsystem<C>>) -> Self {
        self.body = Body::System(system);
        self
    }

    pub fn on_init(mut self, f: impl FnMut(&mut C) -> Result<()> + 'static) -> Self {
        self.hooks_mut().init = Some(Box::new(f));
        self
    }

    pub fn on_update(mut self, f: impl FnMut(&mut C) + 'static) -> Self {
        self.hooks_mut().update = Some(Box::new(f));
        self
    }

    pub fn on_shutdown(mut self, f: impl FnMut(&mut C) -> Result<()> + 'static) -> Self {
        self.hooks_mut().shutdown = Some(Box::new(f));
        self
    }

    /// True when the descriptor carries no callbacks at all.
    pub fn is_anchor(&self) -> bool {
        matches!(self.body, Body::Anchor)
    }

    pub(crate) fn into_body(self) -> Option<Box<dyn Subsystem<C>>>
    where
        C: 'static,
    {
        match self.body {
            Body::Anchor => None,
            Body::Hooks(hooks) => Some(Box::new(hooks)),
            Body::System(system) => Some(system),
        }
    }

    fn hooks_mut(&mut self) -> &mut Hooks<C> {
        if !matches!(self.body, Body::Hooks(_)) {
            self.body = Body::Hooks(Hooks::default());
        }
        match &mut self.body {
            Body::Hooks(hooks) => hooks,
            _ => unreachable!("body was just set to hooks"),
        }
    }
}

fn extend_unique<I, S>(list: &mut Vec<String>, names: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for name in names {
        let name = name.into();
        if !list.contains(&name) {
            list.push(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_lists_are_ordered_sets() {
        let desc = SystemDesc::<()>::new("App")
            .update_after(["Input", "FrameBegin"])
            .update_after(["Input", "Physics"]);
        assert_eq!(desc.update_after, ["Input", "FrameBegin", "Physics"]);
        assert!(desc.init_after.is_empty());
    }

    #[test]
    fn no_body_means_anchor() {
        assert!(SystemDesc::<()>::new("FrameBegin").is_anchor());
        assert!(!SystemDesc::<()>::new("Text").on_update(|_| {}).is_anchor());
    }

    #[test]
    fn hooks_report_only_present_update() {
        let hooks: Hooks<()> = Hooks {
            init: Some(Box::new(|_: &mut ()| -> Result<()> { Ok(()) })),
            ..Hooks::default()
        };
        assert!(!hooks.updates());
    }

    #[test]
    fn closures_accumulate_on_one_body() {
        let mut desc = SystemDesc::<Vec<&'static str>>::new("Renderer")
            .on_init(|log| {
                log.push("init");
                Ok(())
            })
            .on_update(|log| log.push("update"))
            .into_body()
            .unwrap();

        let mut log = Vec::new();
        desc.init(&mut log).unwrap();
        desc.update(&mut log);
        desc.shutdown(&mut log).unwrap();
        assert_eq!(log, ["init", "update"]);
    }
}
