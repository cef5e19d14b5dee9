//! Dependency graph construction, cycle handling and scheduling

pub mod cycles;
pub mod dependency_graph;

pub use cycles::{detect_circular_dependencies, fix_circular_dependencies};
pub use dependency_graph::{DependencyGraph, DEFAULT_CRITICAL_PATH_RATIO};
