use std::fmt;

use super::lifecycle::LifecycleState;

/// Which dependency graph an ordering problem was found in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Pass {
    /// Init/shutdown ordering.
    Init,
    /// Per-tick update ordering.
    Update,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Init => f.write_str("init"),
            Pass::Update => f.write_str("update"),
        }
    }
}

/// Structural problems detected before any subsystem callback runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("subsystem `{0}` is already registered")]
    DuplicateName(String),

    #[error("{pass} dependency `{dependency}` of subsystem `{subsystem}` is not registered")]
    UnknownDependency {
        pass: Pass,
        subsystem: String,
        dependency: String,
    },

    /// `members` lists one cycle in dependency order: each entry depends on
    /// the next one, and the last depends on the first.
    #[error("{pass} dependency cycle: {}", cycle_path(.members))]
    Cycle { pass: Pass, members: Vec<String> },
}

fn cycle_path(members: &[String]) -> String {
    let mut path = members.join(" -> ");
    if let Some(first) = members.first() {
        path.push_str(" -> ");
        path.push_str(first);
    }
    path
}

/// Failure to bring a session from `Unstarted` to `Running`.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("subsystem `{subsystem}` failed to initialize")]
    Init {
        subsystem: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("initialize pass requires an unstarted session, found {0:?}")]
    InvalidState(LifecycleState),
}

impl StartError {
    /// Name of the subsystem whose init failed, if that is what happened.
    pub fn failed_subsystem(&self) -> Option<&str> {
        match self {
            StartError::Init { subsystem, .. } => Some(subsystem),
            _ => None,
        }
    }
}

/// The update pass was requested outside the `Running` state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("update pass requires a running session, found {state:?}")]
pub struct NotRunning {
    pub state: LifecycleState,
}

/// A subsystem misbehaved while shutting down. Logged, never returned.
#[derive(Debug, thiserror::Error)]
pub enum ShutdownFault {
    #[error("subsystem `{subsystem}` failed to shut down: {source:#}")]
    Failed {
        subsystem: String,
        source: anyhow::Error,
    },

    #[error("subsystem `{subsystem}` panicked during shutdown: {message}")]
    Panicked { subsystem: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_closes_the_loop() {
        let err = ConfigError::Cycle {
            pass: Pass::Update,
            members: vec!["A".into(), "B".into()],
        };
        assert_eq!(err.to_string(), "update dependency cycle: A -> B -> A");
    }

    #[test]
    fn unknown_dependency_names_both_sides() {
        let err = ConfigError::UnknownDependency {
            pass: Pass::Init,
            subsystem: "Renderer".into(),
            dependency: "Graphix".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("`Graphix`"));
        assert!(msg.contains("`Renderer`"));
    }

    #[test]
    fn failed_subsystem_only_for_init_failures() {
        let init = StartError::Init {
            subsystem: "Platform".into(),
            source: anyhow::anyhow!("no display"),
        };
        assert_eq!(init.failed_subsystem(), Some("Platform"));

        let config = StartError::from(ConfigError::DuplicateName("A".into()));
        assert_eq!(config.failed_subsystem(), None);
    }
}
