use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::date_utils::{self, parse_duration, DateScale};
use crate::error::ValidationError;

/// Longest accepted task, in years of 365 days.
pub const MAX_DURATION_YEARS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Task,
    /// Drawn hatched and never interactive.
    Disabled,
}

/// Dependencies as either a comma-separated string or a list of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyList {
    Csv(String),
    List(Vec<String>),
}

impl Default for DependencyList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl DependencyList {
    /// Trimmed ids with spaces replaced by underscores, empty and repeated
    /// entries dropped.
    pub fn normalized(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Self::Csv(s) => s.split(',').collect(),
            Self::List(list) => list.iter().map(String::as_str).collect(),
        };
        let mut ids: Vec<String> = Vec::with_capacity(raw.len());
        for id in raw.into_iter().map(normalize_id).filter(|id| !id.is_empty()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

/// A task as supplied by the caller, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskSpec {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub name: String,
    pub start: Option<String>,
    pub end: Option<String>,
    /// Used when `end` is absent, e.g. `"5d"`.
    pub duration: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub dependencies: DependencyList,
    #[serde(alias = "groupKey", alias = "task_group_id")]
    pub group_key: Option<String>,
    pub progress: Option<f32>,
    pub color: Option<String>,
    pub thumbnail: Option<String>,
    pub custom_class: Option<String>,
    #[serde(rename = "type")]
    pub kind: TaskKind,
}

impl TaskSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            start: Some(start.into()),
            end: Some(end.into()),
            ..Default::default()
        }
    }

    pub fn with_dependencies(mut self, deps: &[&str]) -> Self {
        self.dependencies = DependencyList::List(deps.iter().map(|d| d.to_string()).collect());
        self
    }

    pub fn with_group(mut self, key: impl Into<String>) -> Self {
        self.group_key = Some(key.into());
        self
    }

    pub fn with_progress(mut self, progress: f32) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = kind;
        self
    }

    /// Identifier used in diagnostics before an id has been assigned.
    pub fn display_id(&self) -> String {
        self.id.clone().unwrap_or_else(|| self.name.clone())
    }
}

/// A validated task placed in a row slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub dependencies: Vec<String>,
    pub group_key: Option<String>,
    /// Percent complete, `0..=100`.
    pub progress: f32,
    pub color: Option<String>,
    pub thumbnail: Option<String>,
    pub custom_class: Option<String>,
    pub kind: TaskKind,
    /// Vertical slot.
    pub index: usize,
}

impl Task {
    pub fn from_spec(spec: &TaskSpec, index: usize) -> Result<Self, ValidationError> {
        let id = spec.display_id();
        let invalid_date = |value: &str| ValidationError::InvalidDate {
            id: id.clone(),
            value: value.to_string(),
        };

        let raw_start = spec
            .start
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::MissingStart { id: id.clone() })?;
        let start = date_utils::parse_datetime(raw_start).ok_or_else(|| invalid_date(raw_start))?;

        let end = match (spec.end.as_deref(), spec.duration.as_deref()) {
            (Some(raw), _) if !raw.trim().is_empty() => {
                date_utils::parse_datetime(raw).ok_or_else(|| invalid_date(raw))?
            }
            (_, Some(raw)) if !raw.trim().is_empty() => {
                let period = parse_duration(raw).map_err(|_| ValidationError::InvalidDuration {
                    id: id.clone(),
                    value: raw.to_string(),
                })?;
                date_utils::add(start, period.quantity, period.unit)
            }
            _ => return Err(ValidationError::MissingEnd { id }),
        };

        if end <= start {
            return Err(ValidationError::EndNotAfterStart { id });
        }
        if date_utils::diff(end, start, DateScale::Year) > MAX_DURATION_YEARS {
            return Err(ValidationError::DurationTooLong { id });
        }

        let id = match spec.id.as_deref().map(normalize_id) {
            Some(id) if !id.is_empty() => id,
            _ => generate_id(&spec.name),
        };

        Ok(Self {
            id,
            name: spec.name.clone(),
            start,
            end,
            dependencies: spec.dependencies.normalized(),
            group_key: spec.group_key.clone(),
            progress: spec
                .progress
                .filter(|p| p.is_finite())
                .unwrap_or(0.0)
                .clamp(0.0, 100.0),
            color: spec.color.clone(),
            thumbnail: spec.thumbnail.clone(),
            custom_class: spec.custom_class.clone(),
            kind: spec.kind,
            index,
        })
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn is_disabled(&self) -> bool {
        self.kind == TaskKind::Disabled
    }

    /// Move both dates by `delta`, keeping the duration.
    pub fn shift(&mut self, delta: TimeDelta) {
        self.start += delta;
        self.end += delta;
    }
}

/// Spaces become underscores so ids are usable as lookup keys.
pub fn normalize_id(id: &str) -> String {
    id.trim().replace(' ', "_")
}

fn generate_id(name: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", normalize_id(name), &suffix[..10])
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Int(n)) => Some(n.to_string()),
        Some(Raw::Float(n)) => Some(n.to_string()),
        None => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn spec(start: Option<&str>, end: Option<&str>) -> TaskSpec {
        TaskSpec {
            id: Some("t".into()),
            name: "T".into(),
            start: start.map(String::from),
            end: end.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn end_derived_from_duration() {
        let mut s = spec(Some("2024-03-01 08:00"), None);
        s.duration = Some("6h".into());
        let task = Task::from_spec(&s, 0).unwrap();
        assert_eq!(task.end.hour(), 14);
        assert_eq!(task.duration(), TimeDelta::hours(6));
    }

    #[test]
    fn rejects_missing_or_inverted_dates() {
        assert_eq!(
            Task::from_spec(&spec(None, Some("2024-01-02")), 0),
            Err(ValidationError::MissingStart { id: "t".into() })
        );
        assert_eq!(
            Task::from_spec(&spec(Some("2024-01-02"), None), 0),
            Err(ValidationError::MissingEnd { id: "t".into() })
        );
        assert_eq!(
            Task::from_spec(&spec(Some("2024-01-02"), Some("2024-01-02")), 0),
            Err(ValidationError::EndNotAfterStart { id: "t".into() })
        );
        assert!(matches!(
            Task::from_spec(&spec(Some("soon"), Some("2024-01-02")), 0),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn rejects_tasks_longer_than_ten_years() {
        let err = Task::from_spec(&spec(Some("2024-05-01"), Some("2035-06-01")), 0);
        assert_eq!(err, Err(ValidationError::DurationTooLong { id: "t".into() }));
        assert!(Task::from_spec(&spec(Some("2024-05-01"), Some("2033-06-01")), 0).is_ok());
    }

    #[test]
    fn normalizes_ids_dependencies_and_progress() {
        let mut s = spec(Some("2024-01-01"), Some("2024-01-03"));
        s.id = Some("design review".into());
        s.dependencies = DependencyList::Csv(" kick off, ,plan,plan".into());
        s.progress = Some(140.0);
        let task = Task::from_spec(&s, 0).unwrap();
        assert_eq!(task.id, "design_review");
        assert_eq!(task.dependencies, vec!["kick_off", "plan"]);
        assert_eq!(task.progress, 100.0);
    }

    #[test]
    fn generates_missing_ids_from_name() {
        let mut s = spec(Some("2024-01-01"), Some("2024-01-03"));
        s.id = None;
        s.name = "Write docs".into();
        let a = Task::from_spec(&s, 0).unwrap();
        let b = Task::from_spec(&s, 0).unwrap();
        assert!(a.id.starts_with("Write_docs_"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn deserializes_loose_json() {
        let s: TaskSpec = serde_json::from_str(
            r#"{ "id": 7, "name": "N", "start": "2024-01-01", "duration": "2d",
                 "dependencies": "1, 2", "groupKey": "g", "type": "disabled" }"#,
        )
        .unwrap();
        assert_eq!(s.id.as_deref(), Some("7"));
        assert_eq!(s.group_key.as_deref(), Some("g"));
        assert_eq!(s.kind, TaskKind::Disabled);
        assert_eq!(s.dependencies.normalized(), vec!["1", "2"]);
    }

    #[test]
    fn null_dependencies_mean_none() {
        let s: TaskSpec = serde_json::from_str(
            r#"{ "id": "a", "name": "A", "start": "2024-01-01", "end": "2024-01-02",
                 "dependencies": null }"#,
        )
        .unwrap();
        assert_eq!(s.dependencies, DependencyList::default());
        assert!(Task::from_spec(&s, 0).unwrap().dependencies.is_empty());
    }
}
