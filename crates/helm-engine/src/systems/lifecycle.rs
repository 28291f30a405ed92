use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::anyhow;

use super::error::{NotRunning, ShutdownFault, StartError};
use super::subsystem::Subsystem;

/// Session lifecycle.
///
/// `Unstarted → Initializing → Running → ShuttingDown → Stopped`. A failed
/// initialize pass goes straight from `Initializing` through `ShuttingDown`
/// to `Stopped`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LifecycleState {
    Unstarted,
    Initializing,
    Running,
    ShuttingDown,
    Stopped,
}

pub(crate) struct Entry<C> {
    name: String,
    system: Option<Box<dyn Subsystem<C>>>,
    initialized: bool,
}

impl<C> Entry<C> {
    pub(crate) fn new(name: String, system: Option<Box<dyn Subsystem<C>>>) -> Self {
        Self {
            name,
            system,
            initialized: false,
        }
    }
}

/// Runs the three lifecycle passes over a frozen set of subsystems.
///
/// Produced by [`Registry::build`](super::Registry::build). The orders are
/// fixed for the life of the value; the update pass only walks a
/// precomputed index list and never allocates.
pub struct Lifecycle<C> {
    entries: Vec<Entry<C>>,
    init_order: Vec<usize>,
    update_order: Vec<usize>,
    /// `update_order` minus anchors and subsystems without an update.
    update_plan: Vec<usize>,
    state: LifecycleState,
}

impl<C> Lifecycle<C> {
    pub(crate) fn new(
        entries: Vec<Entry<C>>,
        init_order: Vec<usize>,
        update_order: Vec<usize>,
    ) -> Self {
        let update_plan = update_order
            .iter()
            .copied()
            .filter(|&i| entries[i].system.as_ref().is_some_and(|s| s.updates()))
            .collect();

        Self {
            entries,
            init_order,
            update_order,
            update_plan,
            state: LifecycleState::Unstarted,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn init_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.init_order.iter().map(|&i| self.entries[i].name.as_str())
    }

    pub fn update_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.update_order.iter().map(|&i| self.entries[i].name.as_str())
    }

    /// Whether `name` has completed init and not yet been shut down.
    pub fn is_initialized(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name && e.initialized)
    }

    /// Initializes every subsystem in init order.
    ///
    /// Stops at the first failing `init`; a panicking `init` counts as a
    /// failure. Subsystems already initialized are then shut down in reverse
    /// order, the lifecycle ends in `Stopped`, and the failure is returned.
    /// Subsystems after the failing one never see `init`.
    pub fn initialize(&mut self, ctx: &mut C) -> Result<(), StartError> {
        if self.state != LifecycleState::Unstarted {
            return Err(StartError::InvalidState(self.state));
        }
        self.state = LifecycleState::Initializing;

        let mut failure = None;
        for pos in 0..self.init_order.len() {
            let entry = &mut self.entries[self.init_order[pos]];
            log::debug!("initializing subsystem `{}`", entry.name);

            match init_entry(entry, ctx) {
                Ok(()) => entry.initialized = true,
                Err(source) => {
                    log::error!("subsystem `{}` failed to initialize: {source:#}", entry.name);
                    failure = Some((entry.name.clone(), source));
                    break;
                }
            }
        }

        if let Some((subsystem, source)) = failure {
            self.shutdown(ctx);
            return Err(StartError::Init { subsystem, source });
        }

        self.state = LifecycleState::Running;
        log::info!("{} subsystems initialized", self.entries.len());
        Ok(())
    }

    /// Runs one tick: every initialized subsystem's `update`, in update order.
    pub fn update(&mut self, ctx: &mut C) -> Result<(), NotRunning> {
        if self.state != LifecycleState::Running {
            return Err(NotRunning { state: self.state });
        }

        for &i in &self.update_plan {
            let entry = &mut self.entries[i];
            if !entry.initialized {
                continue;
            }
            if let Some(system) = &mut entry.system {
                system.update(ctx);
            }
        }
        Ok(())
    }

    /// Shuts down initialized subsystems in reverse init order.
    ///
    /// Best effort: a subsystem whose `shutdown` errors or panics is logged
    /// and the pass moves on. Outside `Running`/`Initializing` this does
    /// nothing, so it is safe to call more than once.
    pub fn shutdown(&mut self, ctx: &mut C) {
        match self.state {
            LifecycleState::Running | LifecycleState::Initializing => {}
            state => {
                log::debug!("shutdown skipped, lifecycle is {state:?}");
                return;
            }
        }
        self.state = LifecycleState::ShuttingDown;

        let mut faults = 0usize;
        for &i in self.init_order.iter().rev() {
            let entry = &mut self.entries[i];
            if !entry.initialized {
                continue;
            }

            log::debug!("shutting down subsystem `{}`", entry.name);
            if let Some(fault) = shutdown_entry(entry, ctx) {
                log::error!("{fault}");
                faults += 1;
            }
            entry.initialized = false;
        }

        self.state = LifecycleState::Stopped;
        if faults == 0 {
            log::info!("all subsystems shut down");
        } else {
            log::warn!("subsystems shut down with {faults} fault(s)");
        }
    }
}

fn init_entry<C>(entry: &mut Entry<C>, ctx: &mut C) -> anyhow::Result<()> {
    let Some(system) = entry.system.as_mut() else {
        return Ok(());
    };

    match panic::catch_unwind(AssertUnwindSafe(|| system.init(ctx))) {
        Ok(result) => result,
        Err(payload) => Err(anyhow!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn shutdown_entry<C>(entry: &mut Entry<C>, ctx: &mut C) -> Option<ShutdownFault> {
    let system = entry.system.as_mut()?;

    match panic::catch_unwind(AssertUnwindSafe(|| system.shutdown(ctx))) {
        Ok(Ok(())) => None,
        Ok(Err(source)) => Some(ShutdownFault::Failed {
            subsystem: entry.name.clone(),
            source,
        }),
        Err(payload) => Some(ShutdownFault::Panicked {
            subsystem: entry.name.clone(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::systems::{Registry, SystemDesc};

    type Log = Vec<String>;

    /// Subsystem that records every callback into the context.
    fn recorder(name: &'static str) -> SystemDesc<Log> {
        SystemDesc::new(name)
            .on_init(move |log: &mut Log| {
                log.push(format!("init:{name}"));
                Ok(())
            })
            .on_update(move |log: &mut Log| log.push(format!("update:{name}")))
            .on_shutdown(move |log: &mut Log| {
                log.push(format!("shutdown:{name}"));
                Ok(())
            })
    }

    fn build(descs: Vec<SystemDesc<Log>>) -> Lifecycle<Log> {
        let mut registry = Registry::new();
        for desc in descs {
            registry.register(desc).unwrap();
        }
        registry.build().unwrap()
    }

    fn events<'a>(log: &'a Log, prefix: &str) -> Vec<&'a str> {
        log.iter()
            .filter(|e| e.starts_with(prefix))
            .map(|e| &e[prefix.len()..])
            .collect()
    }

    // ── initialize ────────────────────────────────────────────────────────

    #[test]
    fn init_failure_unwinds_in_reverse() {
        let mut lifecycle = build(vec![
            recorder("A"),
            recorder("B"),
            SystemDesc::new("C")
                .init_after(["A", "B"])
                .on_init(|log: &mut Log| {
                    log.push("init:C".into());
                    Err(anyhow!("device lost"))
                })
                .on_shutdown(|log: &mut Log| {
                    log.push("shutdown:C".into());
                    Ok(())
                }),
            recorder("D").init_after(["C"]),
        ]);

        let mut log = Log::new();
        let err = lifecycle.initialize(&mut log).unwrap_err();

        assert_eq!(err.failed_subsystem(), Some("C"));
        assert_eq!(log, ["init:A", "init:B", "init:C", "shutdown:B", "shutdown:A"]);
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
        assert!(!lifecycle.is_initialized("A"));
        assert!(!lifecycle.is_initialized("C"));
    }

    #[test]
    fn init_panic_unwinds_like_an_error() {
        let mut lifecycle = build(vec![
            recorder("A"),
            SystemDesc::new("B")
                .init_after(["A"])
                .on_init(|_: &mut Log| panic!("shader compile crashed")),
        ]);

        let mut log = Log::new();
        let err = lifecycle.initialize(&mut log).unwrap_err();

        assert_eq!(err.failed_subsystem(), Some("B"));
        let StartError::Init { source, .. } = &err else {
            panic!("expected an init failure, got {err:?}");
        };
        assert!(source.to_string().contains("shader compile crashed"));
        assert_eq!(events(&log, "shutdown:"), ["A"]);
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
        assert!(!lifecycle.is_initialized("A"));
    }

    #[test]
    fn initialize_only_once() {
        let mut lifecycle = build(vec![recorder("A")]);
        let mut log = Log::new();
        lifecycle.initialize(&mut log).unwrap();

        assert!(matches!(
            lifecycle.initialize(&mut log),
            Err(StartError::InvalidState(LifecycleState::Running))
        ));
        assert_eq!(events(&log, "init:"), ["A"]);
    }

    #[test]
    fn anchors_count_as_initialized() {
        let mut lifecycle = build(vec![SystemDesc::new("FrameBegin")]);
        lifecycle.initialize(&mut Log::new()).unwrap();
        assert!(lifecycle.is_initialized("FrameBegin"));
    }

    // ── update ────────────────────────────────────────────────────────────

    #[test]
    fn update_runs_each_subsystem_once_per_pass() {
        let mut lifecycle = build(vec![
            recorder("Input").update_after(["FrameBegin"]),
            recorder("Physics").update_after(["Input"]),
            SystemDesc::new("FrameBegin"),
        ]);
        let mut log = Log::new();
        lifecycle.initialize(&mut log).unwrap();
        log.clear();

        for _ in 0..3 {
            lifecycle.update(&mut log).unwrap();
        }

        let once = ["Input", "Physics"];
        let expected: Vec<&str> = once.iter().cycle().take(6).copied().collect();
        assert_eq!(events(&log, "update:"), expected);
    }

    #[test]
    fn missing_update_is_skipped_without_changing_order() {
        let with_gap = build(vec![
            recorder("A"),
            SystemDesc::new("Defaults").on_init(|_: &mut Log| Ok(())),
            recorder("B").update_after(["Defaults", "A"]),
        ]);
        assert_eq!(with_gap.update_plan.len(), 2);

        let mut lifecycle = with_gap;
        let mut log = Log::new();
        lifecycle.initialize(&mut log).unwrap();
        lifecycle.update(&mut log).unwrap();
        assert_eq!(events(&log, "update:"), ["A", "B"]);
    }

    #[test]
    fn update_requires_running() {
        let mut lifecycle = build(vec![recorder("A")]);
        let mut log = Log::new();
        assert_eq!(
            lifecycle.update(&mut log),
            Err(NotRunning { state: LifecycleState::Unstarted })
        );
        assert!(log.is_empty());
    }

    #[test]
    fn update_after_failed_start_is_rejected() {
        let mut lifecycle = build(vec![
            SystemDesc::new("Platform").on_init(|_: &mut Log| Err(anyhow!("no display"))),
        ]);
        let mut log = Log::new();
        lifecycle.initialize(&mut log).unwrap_err();
        assert_eq!(
            lifecycle.update(&mut log),
            Err(NotRunning { state: LifecycleState::Stopped })
        );
    }

    // ── shutdown ──────────────────────────────────────────────────────────

    #[test]
    fn shutdown_mirrors_init() {
        let mut lifecycle = build(vec![
            recorder("Platform").init_after(["Graphics", "Defaults"]),
            recorder("Defaults").init_after(["Graphics"]),
            recorder("Graphics"),
        ]);
        let mut log = Log::new();
        lifecycle.initialize(&mut log).unwrap();
        lifecycle.shutdown(&mut log);

        assert_eq!(events(&log, "init:"), ["Graphics", "Defaults", "Platform"]);
        assert_eq!(events(&log, "shutdown:"), ["Platform", "Defaults", "Graphics"]);
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }

    #[test]
    fn shutdown_faults_do_not_stop_siblings() {
        let mut lifecycle = build(vec![
            recorder("A"),
            SystemDesc::new("B").on_shutdown(|_: &mut Log| Err(anyhow!("flush failed"))),
            SystemDesc::new("C").on_shutdown(|_: &mut Log| panic!("double free")),
            recorder("D"),
        ]);
        let mut log = Log::new();
        lifecycle.initialize(&mut log).unwrap();
        lifecycle.shutdown(&mut log);

        assert_eq!(events(&log, "shutdown:"), ["D", "A"]);
        for name in ["A", "B", "C", "D"] {
            assert!(!lifecycle.is_initialized(name), "{name} still initialized");
        }
    }

    #[test]
    fn shutdown_twice_is_a_no_op() {
        let mut lifecycle = build(vec![recorder("A")]);
        let mut log = Log::new();
        lifecycle.initialize(&mut log).unwrap();
        lifecycle.shutdown(&mut log);
        lifecycle.shutdown(&mut log);
        assert_eq!(events(&log, "shutdown:"), ["A"]);
    }

    #[test]
    fn shutdown_before_start_does_nothing() {
        let mut lifecycle = build(vec![recorder("A")]);
        let mut log = Log::new();
        lifecycle.shutdown(&mut log);
        assert!(log.is_empty());
        assert_eq!(lifecycle.state(), LifecycleState::Unstarted);
    }

    #[test]
    fn panic_payloads_render() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("bang")), "bang");
        assert_eq!(panic_message(&7u32), "non-string panic payload");
    }
}
