use serde::{Deserialize, Serialize};

/// A named bucket assigning its tasks to one shared row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(alias = "id")]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Secondary line shown under the name in the sidebar.
    #[serde(default)]
    pub text: Option<String>,
}

impl Group {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            thumbnail: None,
            text: None,
        }
    }
}
