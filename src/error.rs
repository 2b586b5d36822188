use thiserror::Error;

/// Fatal errors raised synchronously by the operation that triggered them.
#[derive(Debug, Error)]
pub enum GanttError {
    #[error("Invalid view mode '{0}'")]
    InvalidViewMode(String),

    #[error("Invalid duration '{0}': expected <integer><y|m|w|d|h|min|s|ms>")]
    InvalidDuration(String),

    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Couldn't read or write file.\n{0}")]
    Io(#[from] std::io::Error),

    #[error("Couldn't parse CSV.\n{0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns. Found headers: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("No valid tasks found ({0} rows skipped)")]
    NoTasks(usize),
}

/// Non-fatal task problems: the task is dropped and rendering continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task '{id}' has no start date")]
    MissingStart { id: String },

    #[error("task '{id}' has an unreadable date '{value}'")]
    InvalidDate { id: String, value: String },

    #[error("task '{id}' has no end date and no duration")]
    MissingEnd { id: String },

    #[error("task '{id}' has an invalid duration '{value}'")]
    InvalidDuration { id: String, value: String },

    #[error("task '{id}' ends before or when it starts")]
    EndNotAfterStart { id: String },

    #[error("task '{id}' lasts longer than 10 years")]
    DurationTooLong { id: String },

    #[error("missing group key on task '{id}' while groups are defined")]
    MissingGroupKey { id: String },

    #[error("group key '{key}' of task '{id}' matches no group")]
    UnknownGroup { id: String, key: String },
}

impl ValidationError {
    /// Translation key of the message.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Self::MissingStart { .. } => "task_no_start_date",
            Self::InvalidDate { .. } => "task_invalid_date",
            Self::MissingEnd { .. } => "task_no_end_date",
            Self::InvalidDuration { .. } => "task_invalid_duration",
            Self::EndNotAfterStart { .. } => "task_start_after_end",
            Self::DurationTooLong { .. } => "task_duration_too_long",
            Self::MissingGroupKey { .. } => "task_no_group_key",
            Self::UnknownGroup { .. } => "task_unknown_group",
        }
    }

    /// Placeholder values for the translated message.
    pub fn i18n_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = vec![("id", self.task_id())];
        match self {
            Self::InvalidDate { value, .. } | Self::InvalidDuration { value, .. } => {
                params.push(("value", value.as_str()))
            }
            Self::UnknownGroup { key, .. } => params.push(("key", key.as_str())),
            _ => {}
        }
        params
    }

    pub fn task_id(&self) -> &str {
        match self {
            Self::MissingStart { id }
            | Self::InvalidDate { id, .. }
            | Self::MissingEnd { id }
            | Self::InvalidDuration { id, .. }
            | Self::EndNotAfterStart { id }
            | Self::DurationTooLong { id }
            | Self::MissingGroupKey { id }
            | Self::UnknownGroup { id, .. } => id,
        }
    }
}
