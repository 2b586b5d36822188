use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;

use super::Task;

/// Directed graph with an edge from each dependency to its dependent.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn build(tasks: &[Task]) -> Self {
        let mut graph = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut nodes = HashMap::with_capacity(tasks.len());
        for task in tasks {
            nodes
                .entry(task.id.clone())
                .or_insert_with(|| graph.add_node(task.id.clone()));
        }
        for task in tasks {
            let to = nodes[&task.id];
            for dep in &task.dependencies {
                match nodes.get(dep) {
                    Some(&from) => {
                        graph.update_edge(from, to, ());
                    }
                    None => tracing::debug!("task '{}' depends on unknown task '{}'", task.id, dep),
                }
            }
        }
        Self { graph, nodes }
    }

    /// Tasks that directly depend on `id`, in insertion order.
    pub fn dependents(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Tasks `id` directly depends on.
    pub fn dependencies(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Every task reachable through dependent edges, excluding `id` itself.
    pub fn all_dependents(&self, id: &str) -> Vec<&str> {
        let Some(&start) = self.nodes.get(id) else {
            return Vec::new();
        };
        let mut dfs = Dfs::new(&self.graph, start);
        let mut out = Vec::new();
        while let Some(node) = dfs.next(&self.graph) {
            if node != start {
                out.push(self.graph[node].as_str());
            }
        }
        out
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn neighbors(&self, id: &str, dir: Direction) -> Vec<&str> {
        let Some(&node) = self.nodes.get(id) else {
            return Vec::new();
        };
        // petgraph walks adjacency lists newest first
        let mut out: Vec<&str> = self
            .graph
            .neighbors_directed(node, dir)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.reverse();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskSpec;

    fn tasks() -> Vec<Task> {
        [
            TaskSpec::new("a", "A", "2024-01-01", "2024-01-02"),
            TaskSpec::new("b", "B", "2024-01-02", "2024-01-03").with_dependencies(&["a"]),
            TaskSpec::new("c", "C", "2024-01-02", "2024-01-03").with_dependencies(&["a"]),
            TaskSpec::new("d", "D", "2024-01-03", "2024-01-04").with_dependencies(&["b", "ghost"]),
        ]
        .iter()
        .enumerate()
        .map(|(i, s)| Task::from_spec(s, i).unwrap())
        .collect()
    }

    #[test]
    fn direct_dependents_in_order() {
        let graph = DependencyGraph::build(&tasks());
        assert_eq!(graph.dependents("a"), vec!["b", "c"]);
        assert_eq!(graph.dependencies("d"), vec!["b"]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn closure_follows_chains() {
        let graph = DependencyGraph::build(&tasks());
        let mut all = graph.all_dependents("a");
        all.sort_unstable();
        assert_eq!(all, vec!["b", "c", "d"]);
        assert!(graph.all_dependents("d").is_empty());
        assert!(graph.all_dependents("missing").is_empty());
    }

    #[test]
    fn cycles_terminate() {
        let mut ts = tasks();
        ts[0].dependencies.push("d".into());
        let graph = DependencyGraph::build(&ts);
        let mut all = graph.all_dependents("b");
        all.sort_unstable();
        assert_eq!(all, vec!["a", "c", "d"]);
    }
}
