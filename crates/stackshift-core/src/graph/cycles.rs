//! Cycle detection and repair over task dependency lists
//!
//! Only `DependencyRef::Task` references to ids present in the task set are
//! edges. Phase gates and dangling ids are skipped.

use std::collections::HashMap;

use crate::models::{DependencyRef, MigrationTask};

/// Adjacency list (task index → indices of the tasks it depends on)
fn adjacency(tasks: &[MigrationTask]) -> Vec<Vec<usize>> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        index.entry(task.id.as_str()).or_insert(i);
    }

    tasks
        .iter()
        .map(|task| {
            task.task_dependencies()
                .filter_map(|dep| index.get(dep).copied())
                .collect()
        })
        .collect()
}

/// Find dependency cycles with a depth-first walk
///
/// Keeps an explicit recursion stack plus a global visited set. When a
/// dependency is already on the active stack, the stack slice from that
/// dependency through the current task is recorded as a cycle. A task that
/// depends on itself yields a cycle of length 1.
pub fn detect_circular_dependencies(tasks: &[MigrationTask]) -> Vec<Vec<String>> {
    let edges = adjacency(tasks);
    let mut visited = vec![false; tasks.len()];
    let mut on_stack = vec![false; tasks.len()];
    let mut cycles = Vec::new();

    for start in 0..tasks.len() {
        if visited[start] {
            continue;
        }

        // (task index, next dependency to explore)
        let mut frames: Vec<(usize, usize)> = vec![(start, 0)];
        visited[start] = true;
        on_stack[start] = true;

        while let Some(frame) = frames.last_mut() {
            let node = frame.0;
            match edges[node].get(frame.1).copied() {
                Some(dep) => {
                    frame.1 += 1;
                    if on_stack[dep] {
                        if let Some(pos) = frames.iter().position(|(n, _)| *n == dep) {
                            cycles.push(
                                frames[pos..]
                                    .iter()
                                    .map(|(n, _)| tasks[*n].id.clone())
                                    .collect(),
                            );
                        }
                    } else if !visited[dep] {
                        visited[dep] = true;
                        on_stack[dep] = true;
                        frames.push((dep, 0));
                    }
                }
                None => {
                    on_stack[node] = false;
                    frames.pop();
                }
            }
        }
    }

    cycles
}

/// Break detected cycles, returning repaired copies of the tasks
///
/// Self-cycles lose the self reference. For a multi-task cycle, every member
/// drops every dependency on another member of that cycle, so all internal
/// edges go, not just one. The input slice is never modified.
pub fn fix_circular_dependencies(
    tasks: &[MigrationTask],
    cycles: &[Vec<String>],
) -> Vec<MigrationTask> {
    let mut repaired = tasks.to_vec();

    for cycle in cycles {
        match cycle.as_slice() {
            [] => {}
            [only] => {
                for task in repaired.iter_mut().filter(|t| &t.id == only) {
                    task.dependencies
                        .retain(|dep| dep.task_id() != Some(only.as_str()));
                }
            }
            members => {
                for task in repaired.iter_mut().filter(|t| members.contains(&t.id)) {
                    task.dependencies.retain(|dep| match dep {
                        DependencyRef::Task(id) => !members.contains(id),
                        DependencyRef::PhaseGate(_) => true,
                    });
                }
            }
        }
    }

    repaired
}
