// src/workload/graph.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::ConfigFile;
use crate::errors::{Result, SchedulerError};

/// Dependency graph of a workload, keyed by task name.
///
/// Acyclicity is already enforced by `config::validate`; this keeps the
/// adjacency lists plus one topological order so tasks can be built after
/// everything they depend on.
#[derive(Debug, Clone)]
pub struct WorkloadGraph {
    order: Vec<String>,
    deps: BTreeMap<String, Vec<String>>,
    dependents: BTreeMap<String, Vec<String>>,
}

impl WorkloadGraph {
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
        let mut deps: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut dependents: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (name, task) in cfg.task.iter() {
            graph.add_node(name.as_str());
            deps.insert(name.clone(), task.after.clone());
            dependents.entry(name.clone()).or_default();
        }

        for (name, task) in cfg.task.iter() {
            for dep in task.after.iter() {
                graph.add_edge(dep.as_str(), name.as_str(), ());
                dependents.entry(dep.clone()).or_default().push(name.clone());
            }
        }

        let order = toposort(&graph, None)
            .map_err(|cycle| {
                SchedulerError::DagCycle(format!(
                    "cycle detected in task graph involving task '{}'",
                    cycle.node_id()
                ))
            })?
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            order,
            deps,
            dependents,
        })
    }

    /// Every task name, each one after all of its dependencies.
    pub fn topological_order(&self) -> &[String] {
        &self.order
    }

    /// Immediate dependencies of a task (the tasks listed in its `after`).
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.deps.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Immediate dependents of a task (tasks that list this one in `after`).
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.dependents.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tasks with no dependencies.
    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter(|name| self.dependencies_of(name).is_empty())
            .map(String::as_str)
    }
}
