use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::GanttError;
use crate::model::{DependencyList, TaskKind, TaskSpec};

/// Map a status word or a number (optionally with `%`) to progress in percent.
fn parse_progress(value: &str) -> Option<f32> {
    let value = value.trim();
    if let Ok(n) = value.trim_end_matches('%').trim().parse::<f32>() {
        return Some(n);
    }
    match value.to_lowercase().as_str() {
        "finished" | "done" | "complete" | "completed" => Some(100.0),
        "in progress" | "in-progress" | "active" | "started" => Some(50.0),
        "released" | "planned" => Some(25.0),
        "not started" | "not-started" | "new" => Some(0.0),
        _ => None,
    }
}

/// Rewrite day-first and slash-separated dates as ISO; anything else is kept
/// verbatim for task validation to judge.
fn normalize_date(s: &str) -> String {
    let s = s.trim();
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.format("%Y-%m-%d").to_string();
        }
    }
    s.to_string()
}

fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons > commas && semicolons >= tabs {
        b';'
    } else if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    Start,
    End,
    Duration,
    Progress,
    Dependencies,
    Group,
    Color,
    Kind,
}

fn header_to_column(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    let column = match normalized.as_str() {
        "id" | "taskid" | "key" => Column::Id,
        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => Column::Name,
        "start" | "startdate" | "from" | "begin" | "begindate" => Column::Start,
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Column::End,
        "duration" | "length" => Column::Duration,
        "progress" | "status" | "state" | "complete" | "percentcomplete" => Column::Progress,
        "dependencies" | "dependson" | "depends" | "predecessors" => Column::Dependencies,
        "group" | "groupkey" | "taskgroup" | "taskgroupid" | "row" => Column::Group,
        "color" | "colour" => Column::Color,
        "type" | "kind" => Column::Kind,
        _ => return None,
    };
    Some(column)
}

/// Import task specs from a CSV file.
///
/// The delimiter (comma, semicolon, tab) is detected from the header line and
/// headers are matched loosely ("Task Name", "Start Date", ...). Rows without
/// a name are skipped; everything else is left to task validation.
/// Returns `(tasks, skipped_rows)`.
pub fn import_csv(path: &Path) -> Result<(Vec<TaskSpec>, usize), GanttError> {
    let content = std::fs::read_to_string(path)?;
    let result = parse_csv(&content)?;
    info!(
        "imported {} tasks from {} ({} rows skipped)",
        result.0.len(),
        path.display(),
        result.1
    );
    Ok(result)
}

pub fn parse_csv(content: &str) -> Result<(Vec<TaskSpec>, usize), GanttError> {
    let delimiter = detect_delimiter(content.lines().next().unwrap_or(""));
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(header_to_column).collect();
    let has = |c: Column| columns.contains(&Some(c));
    if !has(Column::Name) || !has(Column::Start) || !(has(Column::End) || has(Column::Duration)) {
        return Err(GanttError::MissingColumns(
            headers.iter().map(String::from).collect(),
        ));
    }

    let mut tasks = Vec::new();
    let mut skipped = 0usize;
    for (i, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping CSV row {}: {}", i + 2, e);
                skipped += 1;
                continue;
            }
        };

        let mut spec = TaskSpec::default();
        for (column, field) in columns.iter().zip(record.iter()) {
            let value = field.trim();
            if value.is_empty() {
                continue;
            }
            match column {
                Some(Column::Id) => spec.id = Some(value.to_string()),
                Some(Column::Name) => spec.name = value.to_string(),
                Some(Column::Start) => spec.start = Some(normalize_date(value)),
                Some(Column::End) => spec.end = Some(normalize_date(value)),
                Some(Column::Duration) => spec.duration = Some(value.to_string()),
                Some(Column::Progress) => spec.progress = parse_progress(value),
                Some(Column::Dependencies) => {
                    spec.dependencies = DependencyList::Csv(value.replace(';', ","))
                }
                Some(Column::Group) => spec.group_key = Some(value.to_string()),
                Some(Column::Color) => spec.color = Some(value.to_string()),
                Some(Column::Kind) => {
                    if value.eq_ignore_ascii_case("disabled") {
                        spec.kind = TaskKind::Disabled;
                    }
                }
                None => {}
            }
        }

        if spec.name.is_empty() {
            warn!("skipping CSV row {}: no task name", i + 2);
            skipped += 1;
            continue;
        }
        tasks.push(spec);
    }

    if tasks.is_empty() {
        return Err(GanttError::NoTasks(skipped));
    }
    Ok((tasks, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_semicolon_files_with_loose_headers() {
        let csv = "Task ID;Task Name;Start Date;End Date;Status;Depends On\n\
                   a;Design;01.02.2024;2024-02-05;done;\n\
                   b;Build;2024-02-05;2024-02-09;40%;a\n";
        let (tasks, skipped) = parse_csv(csv).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].start.as_deref(), Some("2024-02-01"));
        assert_eq!(tasks[0].progress, Some(100.0));
        assert_eq!(tasks[1].progress, Some(40.0));
        assert_eq!(tasks[1].dependencies.normalized(), vec!["a"]);
    }

    #[test]
    fn duration_may_replace_end() {
        let csv = "name,start,duration,type\nReview,2024-03-01,3d,disabled\n";
        let (tasks, _) = parse_csv(csv).unwrap();
        assert_eq!(tasks[0].duration.as_deref(), Some("3d"));
        assert_eq!(tasks[0].kind, TaskKind::Disabled);
    }

    #[test]
    fn missing_columns_are_reported() {
        let err = parse_csv("title,owner\nA,me\n").unwrap_err();
        assert!(matches!(err, GanttError::MissingColumns(h) if h == vec!["title", "owner"]));
    }

    #[test]
    fn nameless_rows_are_skipped() {
        let csv = "name,start,end\n,2024-01-01,2024-01-02\nOk,2024-01-01,2024-01-02\n";
        let (tasks, skipped) = parse_csv(csv).unwrap();
        assert_eq!((tasks.len(), skipped), (1, 1));

        let err = parse_csv("name,start,end\n,2024-01-01,2024-01-02\n").unwrap_err();
        assert!(matches!(err, GanttError::NoTasks(1)));
    }

    #[test]
    fn tabs_are_detected() {
        assert_eq!(detect_delimiter("name\tstart\tend"), b'\t');
        assert_eq!(detect_delimiter("name,start,end"), b',');
    }
}
