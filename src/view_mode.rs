//! Named time-scale presets controlling tick granularity and header labels.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Weekday};

use crate::date_utils::{self, parse_duration, DateScale, Period};
use crate::error::GanttError;
use crate::options::ViewModeOverride;

/// Header label renderer: `(tick date, previous tick date, language)`.
pub type LabelFn = Arc<dyn Fn(NaiveDateTime, Option<NaiveDateTime>, &str) -> String + Send + Sync>;

/// Marks ticks that get an emphasized gridline.
pub type ThickLineFn = Arc<dyn Fn(NaiveDateTime) -> bool + Send + Sync>;

/// Where a header label comes from.
#[derive(Clone, Default)]
pub enum LabelSource {
    #[default]
    Empty,
    /// strftime pattern applied to every tick.
    Format(String),
    Callback(LabelFn),
}

impl LabelSource {
    pub fn callback(
        f: impl Fn(NaiveDateTime, Option<NaiveDateTime>, &str) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::Callback(Arc::new(f))
    }

    /// Normalize into a single callable.
    pub fn resolve(&self) -> LabelFn {
        match self {
            Self::Empty => Arc::new(|_, _, _| String::new()),
            Self::Format(fmt) => {
                let fmt = fmt.clone();
                Arc::new(move |d, _, lang| date_utils::format(d, &fmt, lang))
            }
            Self::Callback(f) => Arc::clone(f),
        }
    }
}

impl fmt::Debug for LabelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Format(s) => f.debug_tuple("Format").field(s).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

#[derive(Clone)]
pub struct ViewMode {
    /// Lookup key, e.g. `"qday"`.
    pub key: String,
    /// Display name, translated through [`crate::i18n`].
    pub name: String,
    pub padding: Period,
    pub step: Period,
    /// Format of the per-tick lookup key used to find "today".
    pub date_format: String,
    pub column_width: Option<f32>,
    pub lower_text: LabelSource,
    pub upper_text: LabelSource,
    pub thick_line: Option<ThickLineFn>,
}

impl fmt::Debug for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewMode")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("padding", &self.padding)
            .field("step", &self.step)
            .field("date_format", &self.date_format)
            .field("column_width", &self.column_width)
            .field("lower_text", &self.lower_text)
            .field("upper_text", &self.upper_text)
            .field("thick_line", &self.thick_line.is_some())
            .finish()
    }
}

pub const BUILTIN_KEYS: &[&str] = &["year", "month", "week", "day", "hday", "qday", "hour"];

impl ViewMode {
    pub fn builtin(key: &str) -> Option<Self> {
        let mode = match key {
            "hour" => Self {
                key: key.into(),
                name: "Hour".into(),
                padding: Period::new(7, DateScale::Day),
                step: Period::new(1, DateScale::Hour),
                date_format: "%Y-%m-%d %H:".into(),
                column_width: None,
                lower_text: LabelSource::Format("%H".into()),
                upper_text: LabelSource::callback(|d, ld, lang| on_new_day(d, ld, "%-d %B", lang)),
                thick_line: None,
            },
            "qday" => Self {
                key: key.into(),
                name: "Quarter Day".into(),
                padding: Period::new(7, DateScale::Day),
                step: Period::new(6, DateScale::Hour),
                date_format: "%Y-%m-%d %H:".into(),
                column_width: None,
                lower_text: LabelSource::Format("%H".into()),
                upper_text: LabelSource::callback(|d, ld, lang| on_new_day(d, ld, "%-d %b", lang)),
                thick_line: None,
            },
            "hday" => Self {
                key: key.into(),
                name: "Half Day".into(),
                padding: Period::new(7, DateScale::Day),
                step: Period::new(12, DateScale::Hour),
                date_format: "%Y-%m-%d %H:".into(),
                column_width: None,
                lower_text: LabelSource::Format("%H".into()),
                upper_text: LabelSource::callback(|d, ld, lang| on_new_day(d, ld, "%-d %b", lang)),
                thick_line: None,
            },
            "day" => Self {
                key: key.into(),
                name: "Day".into(),
                padding: Period::new(7, DateScale::Day),
                step: Period::new(1, DateScale::Day),
                date_format: "%Y-%m-%d".into(),
                column_width: None,
                lower_text: LabelSource::callback(|d, ld, lang| on_new_day(d, ld, "%-d", lang)),
                upper_text: LabelSource::callback(|d, ld, lang| on_new_month(d, ld, "%B", lang)),
                thick_line: Some(Arc::new(|d| d.weekday() == Weekday::Mon)),
            },
            "week" => Self {
                key: key.into(),
                name: "Week".into(),
                padding: Period::new(14, DateScale::Day),
                step: Period::new(1, DateScale::Week),
                date_format: "%G-W%V".into(),
                column_width: Some(200.0),
                lower_text: LabelSource::callback(week_range),
                upper_text: LabelSource::callback(|d, ld, lang| on_new_month(d, ld, "%B", lang)),
                thick_line: Some(Arc::new(|d| (1..=7).contains(&d.day()))),
            },
            "month" => Self {
                key: key.into(),
                name: "Month".into(),
                padding: Period::new(14, DateScale::Day),
                step: Period::new(1, DateScale::Month),
                date_format: "%Y-%m".into(),
                column_width: Some(350.0),
                lower_text: LabelSource::Format("%B".into()),
                upper_text: LabelSource::callback(|d, ld, lang| {
                    if ld.map_or(true, |l| l.year() != d.year()) {
                        date_utils::format(d, "%Y", lang)
                    } else {
                        String::new()
                    }
                }),
                thick_line: Some(Arc::new(|d| d.month0() % 3 == 0)),
            },
            "year" => Self {
                key: key.into(),
                name: "Year".into(),
                padding: Period::new(1, DateScale::Year),
                step: Period::new(1, DateScale::Year),
                date_format: "%Y".into(),
                column_width: Some(600.0),
                lower_text: LabelSource::Format("%Y".into()),
                upper_text: LabelSource::callback(|d, ld, _| {
                    let decade = date_utils::decade(d);
                    if ld.map_or(true, |l| date_utils::decade(l) != decade) {
                        decade.to_string()
                    } else {
                        String::new()
                    }
                }),
                thick_line: None,
            },
            _ => return None,
        };
        Some(mode)
    }

    /// Apply a serialized override on top of this mode.
    pub fn with_override(mut self, over: &ViewModeOverride) -> Result<Self, GanttError> {
        if let Some(padding) = &over.padding {
            self.padding = parse_duration(padding)?;
        }
        if let Some(step) = &over.step {
            self.step = parse_duration(step)?;
        }
        if let Some(width) = over.column_width {
            self.column_width = Some(width);
        }
        if let Some(fmt) = &over.date_format {
            self.date_format = fmt.clone();
        }
        if let Some(fmt) = &over.lower_text {
            self.lower_text = LabelSource::Format(fmt.clone());
        }
        if let Some(fmt) = &over.upper_text {
            self.upper_text = LabelSource::Format(fmt.clone());
        }
        Ok(self)
    }
}

fn on_new_day(d: NaiveDateTime, ld: Option<NaiveDateTime>, fmt: &str, lang: &str) -> String {
    if ld.map_or(true, |l| l.day() != d.day()) {
        date_utils::format(d, fmt, lang)
    } else {
        String::new()
    }
}

fn on_new_month(d: NaiveDateTime, ld: Option<NaiveDateTime>, fmt: &str, lang: &str) -> String {
    if ld.map_or(true, |l| l.month() != d.month()) {
        date_utils::format(d, fmt, lang)
    } else {
        String::new()
    }
}

fn week_range(d: NaiveDateTime, ld: Option<NaiveDateTime>, lang: &str) -> String {
    let end = date_utils::add(d, 6, DateScale::Day);
    let end_fmt = if end.month() != d.month() { "%-d %b" } else { "%-d" };
    let begin_fmt = if ld.map_or(true, |l| l.month() != d.month()) {
        "%-d %b"
    } else {
        "%-d"
    };
    format!(
        "{} - {}",
        date_utils::format(d, begin_fmt, lang),
        date_utils::format(end, end_fmt, lang)
    )
}
