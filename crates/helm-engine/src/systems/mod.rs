//! Subsystem dependency scheduler.
//!
//! Subsystems register under a unique name with two independent lists of
//! predecessors: one for init/shutdown ordering and one for per-tick update
//! ordering. [`Registry::build`] resolves both into fixed orders, and the
//! resulting [`Lifecycle`] drives the initialize, update and shutdown passes.
//!
//! ```rust
//! use helm_engine::systems::{Registry, SystemDesc};
//!
//! let mut registry = Registry::<Vec<&'static str>>::new();
//! registry.register(SystemDesc::new("Graphics").on_init(|log: &mut Vec<&'static str>| {
//!     log.push("graphics up");
//!     Ok(())
//! }))?;
//! registry.register(SystemDesc::new("Defaults").init_after(["Graphics"]))?;
//!
//! let mut lifecycle = registry.build()?;
//! let mut log = Vec::new();
//! lifecycle.initialize(&mut log)?;
//! lifecycle.update(&mut log)?;
//! lifecycle.shutdown(&mut log);
//! assert_eq!(log, ["graphics up"]);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod error;
mod lifecycle;
mod order;
mod registry;
mod subsystem;

pub use error::{ConfigError, NotRunning, Pass, ShutdownFault, StartError};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use order::DependencyGraph;
pub use registry::Registry;
pub use subsystem::{Hooks, Subsystem, SystemDesc};
