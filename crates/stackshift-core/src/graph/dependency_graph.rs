//! Task dependency graph for migration plans
//!
//! Provides scheduling operations over a plan's tasks:
//! - Dependency nodes with reverse-computed `blocked_by` lists
//! - Critical path marking (longest duration-weighted chain)
//! - Cycle detection
//! - Batched execution order for parallel runs
//!
//! # Critical path
//!
//! Path lengths are computed over a DAG: cycle edges are stripped first with
//! the same repair pass plan validation uses, then lengths are accumulated in
//! topological order (`len(task) = max(len(dep)) + task.estimated_minutes`).
//! The result is independent of task order, even when the input has cycles.
//!
//! # Example
//!
//! ```
//! use stackshift_core::graph::DependencyGraph;
//! use stackshift_core::models::{DependencyRef, MigrationTask, RiskLevel, TaskType};
//!
//! let task = |id: &str, minutes: u32, deps: &[&str]| MigrationTask {
//!     id: id.to_string(),
//!     name: id.to_string(),
//!     description: String::new(),
//!     task_type: TaskType::Automated,
//!     estimated_minutes: minutes,
//!     automated_minutes: minutes / 10,
//!     risk_level: RiskLevel::Low,
//!     affected_files: vec![],
//!     dependencies: deps.iter().map(|d| DependencyRef::task(*d)).collect(),
//!     breaking_changes: vec![],
//!     pattern: None,
//! };
//!
//! let graph = DependencyGraph::from_tasks(&[
//!     task("T1", 20, &[]),
//!     task("T2", 50, &["T1"]),
//! ])
//! .unwrap();
//!
//! assert_eq!(graph.execution_order(), vec![vec!["T1"], vec!["T2"]]);
//! assert!(graph.detect_circular_dependencies().is_empty());
//! assert_eq!(graph.critical_path(), vec!["T2"]);
//! assert_eq!(graph.max_path_length(), 70);
//! ```

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

use super::cycles::{detect_circular_dependencies, fix_circular_dependencies};
use crate::error::PlanError;
use crate::models::{DependencyNode, DependencyRef, MigrationTask};

/// Share of the longest path a node must reach to be marked critical
pub const DEFAULT_CRITICAL_PATH_RATIO: f64 = 0.9;

/// Dependency graph over a fixed task set
///
/// Tasks live in an arena indexed by position; `task_index` maps ids to
/// positions. Nodes and tasks are in 1:1 correspondence.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    tasks: Vec<MigrationTask>,
    task_index: HashMap<String, usize>,
    nodes: Vec<DependencyNode>,
    /// Longest accumulated duration to reach each task
    path_lengths: Vec<u32>,
}

impl DependencyGraph {
    /// Build with the default critical path ratio
    pub fn from_tasks(tasks: &[MigrationTask]) -> Result<Self, PlanError> {
        Self::build(tasks, DEFAULT_CRITICAL_PATH_RATIO)
    }

    /// Build nodes, blocking relationships and critical path flags
    ///
    /// Returns an error if two tasks share an id.
    pub fn build(tasks: &[MigrationTask], critical_path_ratio: f64) -> Result<Self, PlanError> {
        let mut task_index = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            if task_index.insert(task.id.clone(), i).is_some() {
                return Err(PlanError::DuplicateTaskId {
                    task_id: task.id.clone(),
                });
            }
        }

        // Reverse index: dependency -> tasks it blocks
        let mut blocked_by: Vec<Vec<String>> = vec![Vec::new(); tasks.len()];
        for task in tasks {
            for dep in task.task_dependencies() {
                if let Some(&target) = task_index.get(dep) {
                    let list = &mut blocked_by[target];
                    if !list.contains(&task.id) {
                        list.push(task.id.clone());
                    }
                }
            }
        }

        let nodes = tasks
            .iter()
            .zip(blocked_by)
            .map(|(task, blocked_by)| DependencyNode {
                task_id: task.id.clone(),
                depends_on: task.dependencies.clone(),
                blocked_by,
                can_run_in_parallel: task.dependencies.is_empty(),
                critical_path: false,
            })
            .collect();

        let mut graph = Self {
            tasks: tasks.to_vec(),
            task_index,
            nodes,
            path_lengths: Vec::new(),
        };
        graph.mark_critical_path(critical_path_ratio);

        tracing::debug!(
            tasks = graph.len(),
            max_path = graph.max_path_length(),
            "Dependency graph built"
        );

        Ok(graph)
    }

    fn mark_critical_path(&mut self, ratio: f64) {
        self.path_lengths = self.compute_path_lengths();
        let max_len = self.max_path_length();
        let threshold = f64::from(max_len) * ratio;

        for (node, &len) in self.nodes.iter_mut().zip(&self.path_lengths) {
            node.critical_path = f64::from(len) >= threshold;
        }
    }

    /// Longest path per task over the cycle-free version of the graph
    fn compute_path_lengths(&self) -> Vec<u32> {
        let cycles = detect_circular_dependencies(&self.tasks);
        let acyclic = if cycles.is_empty() {
            self.tasks.clone()
        } else {
            fix_circular_dependencies(&self.tasks, &cycles)
        };

        let mut dag: DiGraph<usize, ()> = DiGraph::with_capacity(acyclic.len(), 0);
        let indices: Vec<NodeIndex> = (0..acyclic.len()).map(|i| dag.add_node(i)).collect();
        for (i, task) in acyclic.iter().enumerate() {
            for dep in task.task_dependencies() {
                if let Some(&d) = self.task_index.get(dep) {
                    dag.add_edge(indices[d], indices[i], ());
                }
            }
        }

        let order = match toposort(&dag, None) {
            Ok(order) => order,
            Err(cycle) => {
                // Repair removes every back edge, so this is unreachable in practice
                tracing::warn!(
                    node = ?cycle.node_id(),
                    "Cycle survived repair; falling back to per-task durations"
                );
                return self.tasks.iter().map(|t| t.estimated_minutes).collect();
            }
        };

        let mut lengths = vec![0u32; acyclic.len()];
        for node in order {
            let i = dag[node];
            let longest_dep = dag
                .neighbors_directed(node, Direction::Incoming)
                .map(|pred| lengths[dag[pred]])
                .max()
                .unwrap_or(0);
            lengths[i] = longest_dep + acyclic[i].estimated_minutes;
        }
        lengths
    }

    /// Detect dependency cycles among this graph's tasks
    pub fn detect_circular_dependencies(&self) -> Vec<Vec<String>> {
        detect_circular_dependencies(&self.tasks)
    }

    /// Group tasks into batches that can run simultaneously
    ///
    /// A task joins the next batch once every task it depends on is already
    /// in an earlier batch. Phase gates and unknown ids count as satisfied.
    /// Stops early (returning the batches formed so far) when the remaining
    /// tasks are stuck on a cycle.
    pub fn execution_order(&self) -> Vec<Vec<String>> {
        let mut completed: HashSet<&str> = HashSet::with_capacity(self.nodes.len());
        let mut batches = Vec::new();

        while completed.len() < self.nodes.len() {
            let batch: Vec<String> = self
                .nodes
                .iter()
                .filter(|node| !completed.contains(node.task_id.as_str()))
                .filter(|node| node.depends_on.iter().all(|dep| self.is_satisfied(dep, &completed)))
                .map(|node| node.task_id.clone())
                .collect();

            if batch.is_empty() {
                tracing::warn!(
                    remaining = self.nodes.len() - completed.len(),
                    "Execution order stalled on circular dependencies"
                );
                break;
            }

            for id in &batch {
                if let Some(&i) = self.task_index.get(id) {
                    completed.insert(self.tasks[i].id.as_str());
                }
            }
            batches.push(batch);
        }

        batches
    }

    fn is_satisfied(&self, dep: &DependencyRef, completed: &HashSet<&str>) -> bool {
        match dep {
            DependencyRef::PhaseGate(_) => true,
            DependencyRef::Task(id) => {
                !self.task_index.contains_key(id) || completed.contains(id.as_str())
            }
        }
    }

    /// Total minutes when each batch runs fully in parallel
    ///
    /// Sums, per batch, the longest task (`automated_minutes` when
    /// `use_automation`, else `estimated_minutes`).
    pub fn estimate_total_time(&self, use_automation: bool) -> u32 {
        self.execution_order()
            .iter()
            .map(|batch| {
                batch
                    .iter()
                    .filter_map(|id| self.task(id))
                    .map(|task| {
                        if use_automation {
                            task.automated_minutes
                        } else {
                            task.estimated_minutes
                        }
                    })
                    .max()
                    .unwrap_or(0)
            })
            .sum()
    }

    /// Percentage of tasks with no dependencies at all (0 for an empty graph)
    pub fn parallelism_score(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        let independent = self.nodes.iter().filter(|n| n.depends_on.is_empty()).count();
        independent as f64 / self.nodes.len() as f64 * 100.0
    }

    /// Ids of critical tasks, shortest accumulated path first
    pub fn critical_path(&self) -> Vec<String> {
        let mut critical: Vec<(u32, &str)> = self
            .nodes
            .iter()
            .zip(&self.path_lengths)
            .filter(|(node, _)| node.critical_path)
            .map(|(node, &len)| (len, node.task_id.as_str()))
            .collect();
        critical.sort_by_key(|(len, _)| *len);
        critical.into_iter().map(|(_, id)| id.to_string()).collect()
    }

    /// Longest accumulated duration to reach a task
    pub fn path_length(&self, task_id: &str) -> Option<u32> {
        self.task_index
            .get(task_id)
            .and_then(|&i| self.path_lengths.get(i).copied())
    }

    pub fn max_path_length(&self) -> u32 {
        self.path_lengths.iter().copied().max().unwrap_or(0)
    }

    pub fn node(&self, task_id: &str) -> Option<&DependencyNode> {
        self.task_index.get(task_id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[DependencyNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<DependencyNode> {
        self.nodes
    }

    pub fn task(&self, task_id: &str) -> Option<&MigrationTask> {
        self.task_index.get(task_id).map(|&i| &self.tasks[i])
    }

    /// Number of tasks in graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
