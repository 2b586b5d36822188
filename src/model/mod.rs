pub mod dependency;
pub mod group;
pub mod task;

pub use dependency::DependencyGraph;
pub use group::Group;
pub use task::{DependencyList, Task, TaskKind, TaskSpec};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Tasks and groups supplied wholesale on construction or refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttData {
    #[serde(alias = "elements")]
    pub tasks: Vec<TaskSpec>,
    #[serde(alias = "elementGroups", alias = "task_groups")]
    pub groups: Vec<Group>,
}

impl GanttData {
    pub fn new(tasks: Vec<TaskSpec>, groups: Vec<Group>) -> Self {
        Self { tasks, groups }
    }
}

/// Validate every spec, assigning vertical slots.
///
/// Without groups a task's slot is its position among accepted tasks, not its
/// position in `specs`: rejected tasks leave no empty rows and accepted bars
/// stay inside the grid. With groups the slot is the position of its group.
/// Rejected tasks are returned alongside so the caller can report them.
pub fn accept_tasks(specs: &[TaskSpec], groups: &[Group]) -> (Vec<Task>, Vec<ValidationError>) {
    let mut accepted = Vec::with_capacity(specs.len());
    let mut rejected = Vec::new();
    for spec in specs {
        let slot = if groups.is_empty() {
            Ok(accepted.len())
        } else {
            group_slot(spec, groups)
        };
        match slot.and_then(|slot| Task::from_spec(spec, slot)) {
            Ok(task) => accepted.push(task),
            Err(e) => rejected.push(e),
        }
    }
    (accepted, rejected)
}

fn group_slot(spec: &TaskSpec, groups: &[Group]) -> Result<usize, ValidationError> {
    let id = spec.display_id();
    let key = spec
        .group_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ValidationError::MissingGroupKey { id: id.clone() })?;
    groups
        .iter()
        .position(|g| g.key == key)
        .ok_or_else(|| ValidationError::UnknownGroup {
            id,
            key: key.to_string(),
        })
}
