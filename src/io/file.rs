use std::path::Path;

use tracing::info;

use crate::error::GanttError;
use crate::model::GanttData;

/// Load tasks and groups from a JSON file.
///
/// Accepts either a `{ "tasks": [...], "groups": [...] }` object or a bare
/// array of tasks.
pub fn load_data(path: &Path) -> Result<GanttData, GanttError> {
    let json = std::fs::read_to_string(path)?;
    let data = match serde_json::from_str::<GanttData>(&json) {
        Ok(data) => data,
        Err(err) => match serde_json::from_str(&json) {
            Ok(tasks) => GanttData::new(tasks, Vec::new()),
            Err(_) => return Err(err.into()),
        },
    };
    info!(
        "loaded {} tasks and {} groups from {}",
        data.tasks.len(),
        data.groups.len(),
        path.display()
    );
    Ok(data)
}

/// Save tasks and groups to a JSON file.
pub fn save_data(data: &GanttData, path: &Path) -> Result<(), GanttError> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    info!("saved chart data to {}", path.display());
    Ok(())
}

/// Load a chart from JSON or CSV, chosen by extension.
pub fn load_any(path: &Path) -> Result<GanttData, GanttError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        let (tasks, _) = super::csv_import::import_csv(path)?;
        Ok(GanttData::new(tasks, Vec::new()))
    } else {
        load_data(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskSpec;

    #[test]
    fn data_survives_a_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        let data = GanttData::new(
            vec![TaskSpec::new("a", "Design", "2024-01-01", "2024-01-03")],
            vec![],
        );
        save_data(&data, &path).unwrap();
        let loaded = load_data(&path).unwrap();
        assert_eq!(loaded.tasks[0].id.as_deref(), Some("a"));
        assert_eq!(loaded.tasks[0].start.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn bare_task_arrays_and_aliases_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let bare = dir.path().join("bare.json");
        std::fs::write(&bare, r#"[{"id": 7, "name": "A", "start": "2024-01-01", "duration": "2d"}]"#)
            .unwrap();
        assert_eq!(load_data(&bare).unwrap().tasks[0].id.as_deref(), Some("7"));

        let aliased = dir.path().join("aliased.json");
        std::fs::write(
            &aliased,
            r#"{"elements": [{"name": "A", "start": "2024-01-01", "end": "2024-01-02", "groupKey": "g"}],
                "elementGroups": [{"id": "g", "name": "Group"}]}"#,
        )
        .unwrap();
        let data = load_data(&aliased).unwrap();
        assert_eq!(data.groups[0].key, "g");
        assert_eq!(data.tasks[0].group_key.as_deref(), Some("g"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_data(&path), Err(GanttError::Json(_))));
        assert!(matches!(
            load_data(&dir.path().join("missing.json")),
            Err(GanttError::Io(_))
        ));
    }

    #[test]
    fn null_dependencies_do_not_abort_the_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nulls.json");
        std::fs::write(
            &path,
            r#"[{"id": "a", "name": "A", "start": "2024-01-01", "end": "2024-01-02", "dependencies": null},
                {"id": "b", "name": "B", "start": "2024-01-03", "end": "2024-01-04", "dependencies": "a"}]"#,
        )
        .unwrap();
        let data = load_data(&path).unwrap();
        assert_eq!(data.tasks.len(), 2);
        assert!(data.tasks[0].dependencies.normalized().is_empty());
        assert_eq!(data.tasks[1].dependencies.normalized(), vec!["a"]);
    }
}
