//! Scroll targets and the state kept in sync with the horizontal scroll.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::grid::{closest_cell, HeaderCell};
use super::{GanttConfig, Rect};
use crate::date_utils;
use crate::error::GanttError;
use crate::model::Task;

/// Distance past the bars after which the adjust affordance appears.
const ADJUST_MARGIN: f32 = 100.0;
pub const STICKY_SIDEBAR_DELAY: Duration = Duration::from_millis(200);

/// Logical scroll destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScrollTarget {
    Start,
    End,
    #[default]
    Today,
    /// Earliest task start.
    Min,
    /// Latest task end.
    Max,
    Date(NaiveDateTime),
}

impl FromStr for ScrollTarget {
    type Err = GanttError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "start" => Self::Start,
            "end" => Self::End,
            "today" => Self::Today,
            "min" => Self::Min,
            "max" => Self::Max,
            other => Self::Date(
                date_utils::parse_datetime(other)
                    .ok_or_else(|| GanttError::InvalidDate(other.to_string()))?,
            ),
        })
    }
}

impl TryFrom<String> for ScrollTarget {
    type Error = GanttError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ScrollTarget> for String {
    fn from(target: ScrollTarget) -> Self {
        target.to_string()
    }
}

impl fmt::Display for ScrollTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
            Self::Today => f.write_str("today"),
            Self::Min => f.write_str("min"),
            Self::Max => f.write_str("max"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Auto,
    #[default]
    Instant,
    Smooth,
}

/// Horizontal scroll the host should apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub left: f32,
    pub behavior: ScrollBehavior,
}

/// Date a scroll target points at, clamped to the axis range.
pub fn resolve_target(
    target: ScrollTarget,
    config: &GanttConfig,
    header: &[HeaderCell],
    tasks: &[Task],
    now: NaiveDateTime,
    lang: &str,
) -> NaiveDateTime {
    let clamp = |d: NaiveDateTime| d.clamp(config.gantt_start, config.gantt_end);
    match target {
        ScrollTarget::Start => config.gantt_start,
        ScrollTarget::End => config.gantt_end,
        ScrollTarget::Today => {
            let today = clamp(now);
            closest_cell(header, config, today, lang).map_or(today, |i| header[i].date)
        }
        ScrollTarget::Min => tasks
            .iter()
            .map(|t| t.start)
            .min()
            .map_or(config.gantt_start, clamp),
        ScrollTarget::Max => tasks
            .iter()
            .map(|t| t.end)
            .max()
            .map_or(config.gantt_start, clamp),
        ScrollTarget::Date(d) => clamp(d),
    }
}

/// Scroll offset placing `date` slightly left of the viewport center.
pub fn scroll_left_for(config: &GanttConfig, date: NaiveDateTime, viewport_width: f32) -> f32 {
    let left = config.x_of(date) - config.column_width / 6.0 - viewport_width / 2.0;
    let max = (config.grid_width() - viewport_width).max(0.0);
    left.clamp(0.0, max)
}

/// Dates under the scroll position: the left edge and the viewport center.
///
/// The left-edge date is refined once with the width of the upper header
/// label it falls under, so the current label does not flicker while the
/// viewport crosses label boundaries.
pub fn visible_dates(
    config: &GanttConfig,
    header: &[HeaderCell],
    scroll_left: f32,
    viewport_width: f32,
    lang: &str,
) -> (NaiveDateTime, NaiveDateTime, Option<usize>) {
    let upper = config.view_mode.upper_text.resolve();
    let find = |date: NaiveDateTime| {
        let text = upper(date, None, lang);
        header
            .iter()
            .position(|c| !c.upper_text.is_empty() && c.upper_text == text)
    };

    let center = config.date_at(scroll_left + viewport_width / 2.0);
    let mut start = config.date_at(scroll_left);
    let mut current = find(start);
    if let Some(i) = current {
        let label_width = header[i].upper_width.unwrap_or(0.0);
        start = config.date_at(scroll_left + label_width);
        current = find(start).or(current);
    }
    (start, center, current)
}

/// Button offering to jump back to the bars once they are out of sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjustHint {
    #[default]
    Hidden,
    /// Bars are left of the viewport.
    ScrollToMax,
    /// Bars are right of the viewport.
    ScrollToMin,
}

impl AdjustHint {
    pub fn evaluate(scroll_left: f32, viewport_width: f32, bars: &[Rect]) -> Self {
        let Some(min_start) = bars.iter().map(|r| r.x).reduce(f32::min) else {
            return Self::Hidden;
        };
        let max_end = bars.iter().map(Rect::end_x).fold(min_start, f32::max);
        if scroll_left > max_end + ADJUST_MARGIN {
            Self::ScrollToMax
        } else if scroll_left + viewport_width < min_start - ADJUST_MARGIN {
            Self::ScrollToMin
        } else {
            Self::Hidden
        }
    }

    pub fn target(self) -> Option<ScrollTarget> {
        match self {
            Self::Hidden => None,
            Self::ScrollToMax => Some(ScrollTarget::Max),
            Self::ScrollToMin => Some(ScrollTarget::Min),
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::ScrollToMin => "→",
            _ => "←",
        }
    }
}

/// Trailing-edge timer, restarted on every trigger.
#[derive(Debug, Clone, Copy)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True once, when the delay has elapsed since the last trigger.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Everything derived from the latest scroll position.
#[derive(Debug, Clone)]
pub struct ScrollState {
    pub left: f32,
    pub current_date_start: Option<NaiveDateTime>,
    pub current_date: Option<NaiveDateTime>,
    /// Restores the sticky sidebar once scrolling settles.
    pub sticky: Debounce,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            left: 0.0,
            current_date_start: None,
            current_date: None,
            sticky: Debounce::new(STICKY_SIDEBAR_DELAY),
        }
    }
}
