use super::error::{ConfigError, Pass};
use super::lifecycle::{Entry, Lifecycle};
use super::order::DependencyGraph;
use super::subsystem::SystemDesc;

/// Append-only set of subsystem descriptors.
///
/// Registration happens once at startup. [`build`](Registry::build) consumes
/// the registry, so nothing can be registered after orders are computed.
pub struct Registry<C> {
    systems: Vec<SystemDesc<C>>,
}

impl<C: 'static> Registry<C> {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Adds a subsystem. Fails if the name is already taken.
    pub fn register(&mut self, desc: SystemDesc<C>) -> Result<&mut Self, ConfigError> {
        if self.contains(desc.name()) {
            return Err(ConfigError::DuplicateName(desc.name().to_string()));
        }

        log::trace!(
            "registered subsystem `{}` (init after {:?}, update after {:?})",
            desc.name(),
            desc.init_after,
            desc.update_after
        );
        self.systems.push(desc);
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.systems.iter().any(|s| s.name() == name)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.systems.iter().map(|s| s.name())
    }

    /// Graphviz rendering of one pass's dependency graph.
    pub fn to_dot(&self, pass: Pass) -> Result<String, ConfigError> {
        Ok(self.graph(pass)?.to_dot())
    }

    /// Computes the init and update orders and freezes the registry.
    ///
    /// Every configuration problem is reported here, before any callback
    /// has a chance to run.
    pub fn build(self) -> Result<Lifecycle<C>, ConfigError> {
        let init_order = self.graph(Pass::Init)?.order()?;
        let update_order = self.graph(Pass::Update)?.order()?;

        log::info!("subsystem init order: {:?}", self.names_in(&init_order));
        log::info!("subsystem update order: {:?}", self.names_in(&update_order));

        let entries = self
            .systems
            .into_iter()
            .map(|desc| Entry::new(desc.name.clone(), desc.into_body()))
            .collect();

        Ok(Lifecycle::new(entries, init_order, update_order))
    }

    fn graph(&self, pass: Pass) -> Result<DependencyGraph<'_>, ConfigError> {
        let mut graph = DependencyGraph::with_capacity(pass, self.systems.len());
        for desc in &self.systems {
            let deps = match pass {
                Pass::Init => &desc.init_after,
                Pass::Update => &desc.update_after,
            };
            graph.add_node(desc.name(), deps.iter().map(String::as_str))?;
        }
        Ok(graph)
    }

    fn names_in(&self, order: &[usize]) -> Vec<&str> {
        order.iter().map(|&i| self.systems[i].name()).collect()
    }
}

impl<C: 'static> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}
