//! Configuration surface of the chart.
//!
//! Every field carries `#[serde(default)]` so that a partial JSON document is
//! valid: missing keys fall back to the built-in defaults. Callback fields are
//! not serialized and survive [`GanttOptions::merged`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::date_utils;
use crate::error::GanttError;
use crate::layout::scroll::ScrollTarget;
use crate::model::{Group, Task};
use crate::view_mode::{ViewMode, BUILTIN_KEYS};

/// Shared, type-erased callback that never takes part in (de)serialization.
pub struct Callback<F: ?Sized>(pub Arc<F>);

impl<F: ?Sized> Clone for Callback<F> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<F: ?Sized> fmt::Debug for Callback<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

pub type BarLabelFn = dyn Fn(&Task, Option<&Group>) -> String + Send + Sync;
pub type SideLabelFn = dyn Fn(&Group) -> String + Send + Sync;

/// Which grid lines to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lines {
    #[default]
    Both,
    Vertical,
    Horizontal,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayKeyword {
    Weekend,
}

/// A single named holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub name: String,
    pub date: NaiveDate,
}

/// Highlight rule for one band color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HolidayRule {
    Keyword(HolidayKeyword),
    Dates(Vec<Holiday>),
}

impl HolidayRule {
    pub fn weekend() -> Self {
        Self::Keyword(HolidayKeyword::Weekend)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Place labels that overflow their bar to its right instead of hiding them.
    pub show_label_on_offset: bool,
    #[serde(skip)]
    pub get_label: Option<Callback<BarLabelFn>>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            show_label_on_offset: true,
            get_label: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    pub sidebar_width: f32,
    #[serde(skip)]
    pub get_label: Option<Callback<SideLabelFn>>,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            sidebar_width: 200.0,
            get_label: None,
        }
    }
}

/// Partial redefinition of a view mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewModeOverride {
    pub padding: Option<String>,
    pub step: Option<String>,
    pub column_width: Option<f32>,
    pub date_format: Option<String>,
    pub lower_text: Option<String>,
    pub upper_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttOptions {
    pub arrow_curve: f32,
    pub auto_move_label: bool,
    pub bar_corner_radius: f32,
    pub bar_height: f32,
    pub bar_config: BarConfig,
    /// Fixed container height in pixels; `None` sizes to content.
    #[serde(with = "auto_or_px")]
    pub container_height: Option<f32>,
    /// Overrides every view mode's column width.
    pub column_width: Option<f32>,
    pub enable_left_sidebar_list: bool,
    pub sidebar_config: SidebarConfig,
    /// Band color → rule.
    pub holidays: BTreeMap<String, HolidayRule>,
    pub language: String,
    #[serde(with = "date_utils::opt_datetime")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(with = "date_utils::opt_datetime")]
    pub end_date: Option<NaiveDateTime>,
    pub lines: Lines,
    pub lower_header_height: f32,
    pub upper_header_height: f32,
    pub padding: f32,
    pub today_button: bool,
    pub view_mode_select: bool,
    /// Mode used at construction.
    pub view_mode: String,
    /// Modes offered by the view-mode select.
    pub view_modes: Vec<String>,
    pub view_mode_overrides: BTreeMap<String, ViewModeOverride>,
    pub scroll_to: ScrollTarget,
    /// Horizontal cutoff below which a dependency is routed as backward.
    /// Defaults to `padding`.
    pub backward_threshold: Option<f32>,
}

impl Default for GanttOptions {
    fn default() -> Self {
        let mut holidays = BTreeMap::new();
        holidays.insert("#f3f4f6".to_string(), HolidayRule::weekend());
        Self {
            arrow_curve: 5.0,
            auto_move_label: false,
            bar_corner_radius: 3.0,
            bar_height: 30.0,
            bar_config: BarConfig::default(),
            container_height: None,
            column_width: None,
            enable_left_sidebar_list: false,
            sidebar_config: SidebarConfig::default(),
            holidays,
            language: "en".to_string(),
            start_date: None,
            end_date: None,
            lines: Lines::Both,
            lower_header_height: 30.0,
            upper_header_height: 45.0,
            padding: 18.0,
            today_button: true,
            view_mode_select: false,
            view_mode: "day".to_string(),
            view_modes: BUILTIN_KEYS.iter().map(|k| k.to_string()).collect(),
            view_mode_overrides: BTreeMap::new(),
            scroll_to: ScrollTarget::Today,
            backward_threshold: None,
        }
    }
}

impl GanttOptions {
    /// Deep-merge a JSON patch into a copy of these options.
    pub fn merged(&self, patch: &Value) -> Result<Self, GanttError> {
        let mut base = serde_json::to_value(self)?;
        deep_merge(&mut base, patch);
        let mut merged: Self = serde_json::from_value(base)?;
        merged.bar_config.get_label = self.bar_config.get_label.clone();
        merged.sidebar_config.get_label = self.sidebar_config.get_label.clone();
        Ok(merged)
    }

    /// Resolve a view mode by key, applying any configured override.
    pub fn view_mode_def(&self, key: &str) -> Result<ViewMode, GanttError> {
        let mode =
            ViewMode::builtin(key).ok_or_else(|| GanttError::InvalidViewMode(key.to_string()))?;
        match self.view_mode_overrides.get(key) {
            Some(over) => mode.with_override(over),
            None => Ok(mode),
        }
    }

    pub fn backward_threshold(&self) -> f32 {
        self.backward_threshold.unwrap_or(self.padding)
    }

    /// Height of one row slot.
    pub fn row_height(&self) -> f32 {
        self.bar_height + self.padding
    }

    /// Load options from a JSON file, merged over the defaults.
    pub fn load(path: &Path) -> Result<Self, GanttError> {
        let json = std::fs::read_to_string(path)?;
        let patch: Value = serde_json::from_str(&json)?;
        Self::default().merged(&patch)
    }

    /// Location of the per-user settings file.
    pub fn settings_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "gantt-svg")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load the per-user settings, falling back to defaults.
    pub fn load_user_settings() -> Self {
        let Some(path) = Self::settings_path().filter(|p| p.exists()) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(options) => {
                tracing::info!("loaded settings from {}", path.display());
                options
            }
            Err(e) => {
                tracing::warn!("failed to load settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Objects merge key by key; any other value replaces the target.
pub fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                let nested = value.is_object() && target.get(key).is_some_and(Value::is_object);
                match target.get_mut(key) {
                    Some(existing) if nested => deep_merge(existing, value),
                    _ => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

/// Serde helper: `"auto"` or a pixel count.
mod auto_or_px {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Px(f32),
        Keyword(String),
    }

    pub fn serialize<S>(value: &Option<f32>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(px) => serializer.serialize_f32(*px),
            None => serializer.serialize_str("auto"),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Px(px) => Ok(Some(px)),
            Raw::Keyword(k) if k == "auto" => Ok(None),
            Raw::Keyword(k) => Err(serde::de::Error::custom(format!(
                "expected \"auto\" or a number, found '{k}'"
            ))),
        }
    }
}
