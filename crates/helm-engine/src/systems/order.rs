//! Dependency ordering.
//!
//! A [`DependencyGraph`] is a set of named nodes in registration order, each
//! listing the nodes that must precede it. [`DependencyGraph::order`] runs
//! Kahn's algorithm with a min-heap on registration index, so among all valid
//! orders it always returns the one closest to registration order. The same
//! registration code therefore yields the same order on every run.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt::Write as _;

use super::error::{ConfigError, Pass};

/// Named nodes plus "must come before" edges for one pass.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    pass: Pass,
    names: Vec<&'a str>,
    deps: Vec<Vec<&'a str>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> DependencyGraph<'a> {
    pub fn new(pass: Pass) -> Self {
        Self::with_capacity(pass, 0)
    }

    pub fn with_capacity(pass: Pass, nodes: usize) -> Self {
        Self {
            pass,
            names: Vec::with_capacity(nodes),
            deps: Vec::with_capacity(nodes),
            index: HashMap::with_capacity(nodes),
        }
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of the node at registration index `node`.
    pub fn name(&self, node: usize) -> Option<&'a str> {
        self.names.get(node).copied()
    }

    /// Appends a node and returns its registration index.
    ///
    /// Dependencies are not resolved here; unknown names surface from
    /// [`order`](Self::order). Repeated dependency names count once.
    pub fn add_node<I>(&mut self, name: &'a str, deps: I) -> Result<usize, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.index.contains_key(name) {
            return Err(ConfigError::DuplicateName(name.to_string()));
        }

        let mut unique: Vec<&'a str> = Vec::new();
        for dep in deps {
            if !unique.contains(&dep) {
                unique.push(dep);
            }
        }

        let node = self.names.len();
        self.names.push(name);
        self.deps.push(unique);
        self.index.insert(name, node);
        Ok(node)
    }

    /// Computes a total order containing every node exactly once.
    pub fn order(&self) -> Result<Vec<usize>, ConfigError> {
        let resolved = self.resolve()?;
        let n = self.names.len();

        let mut in_degree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (node, deps) in resolved.iter().enumerate() {
            in_degree[node] = deps.len();
            for &dep in deps {
                dependents[dep].push(node);
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(node, _)| Reverse(node))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            for &dependent in &dependents[node] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() != n {
            return Err(ConfigError::Cycle {
                pass: self.pass,
                members: self.find_cycle(&resolved, &in_degree),
            });
        }

        Ok(order)
    }

    /// Graphviz rendering; edges point from dependency to dependent.
    pub fn to_dot(&self) -> String {
        let mut dot = format!("digraph {}_order {{\n", self.pass);
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box];\n\n");

        for (name, deps) in self.names.iter().zip(&self.deps) {
            let _ = writeln!(dot, "  \"{name}\";");
            for dep in deps {
                let _ = writeln!(dot, "  \"{dep}\" -> \"{name}\";");
            }
        }

        dot.push_str("}\n");
        dot
    }

    /// Maps dependency names to indices, in registration then declaration order.
    fn resolve(&self) -> Result<Vec<Vec<usize>>, ConfigError> {
        self.names
            .iter()
            .zip(&self.deps)
            .map(|(name, deps)| {
                deps.iter()
                    .map(|dep| {
                        self.index.get(dep).copied().ok_or_else(|| {
                            ConfigError::UnknownDependency {
                                pass: self.pass,
                                subsystem: name.to_string(),
                                dependency: dep.to_string(),
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }

    /// Walks unprocessed dependencies from the earliest stuck node until a
    /// node repeats. After Kahn's pass every node with a non-zero in-degree
    /// still has at least one dependency with a non-zero in-degree, so the
    /// walk always closes a loop.
    fn find_cycle(&self, resolved: &[Vec<usize>], in_degree: &[usize]) -> Vec<String> {
        let mut seen_at: Vec<Option<usize>> = vec![None; in_degree.len()];
        let mut path: Vec<usize> = Vec::new();

        let Some(mut current) = in_degree.iter().position(|&degree| degree > 0) else {
            return Vec::new();
        };

        loop {
            if let Some(start) = seen_at[current] {
                return path[start..]
                    .iter()
                    .map(|&node| self.names[node].to_string())
                    .collect();
            }
            seen_at[current] = Some(path.len());
            path.push(current);

            let Some(&next) = resolved[current].iter().find(|&&dep| in_degree[dep] > 0) else {
                break;
            };
            current = next;
        }

        path.iter().map(|&node| self.names[node].to_string()).collect()
    }
}
