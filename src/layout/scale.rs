//! Time-scale resolution: date range and tick list for a view mode.

use chrono::NaiveDateTime;

use crate::date_utils::{self, DateScale, Period};
use crate::model::Task;
use crate::options::GanttOptions;
use crate::view_mode::ViewMode;

/// Derived configuration, rebuilt on every view-mode change.
#[derive(Debug, Clone)]
pub struct GanttConfig {
    pub view_mode: ViewMode,
    pub unit: DateScale,
    pub step: i64,
    pub column_width: f32,
    pub header_height: f32,
    pub bar_height: f32,
    pub padding: f32,
    pub gantt_start: NaiveDateTime,
    pub gantt_end: NaiveDateTime,
    pub dates: Vec<NaiveDateTime>,
}

impl GanttConfig {
    pub fn resolve(
        view_mode: ViewMode,
        tasks: &[Task],
        options: &GanttOptions,
        now: NaiveDateTime,
    ) -> Self {
        let step = view_mode.step;
        let column_width = options
            .column_width
            .or(view_mode.column_width)
            .unwrap_or(DEFAULT_COLUMN_WIDTH);
        let (gantt_start, gantt_end) = date_range(tasks, &view_mode, options, now);
        let dates = ticks(gantt_start, gantt_end, step);
        tracing::debug!(
            "resolved '{}' scale: {} .. {} ({} ticks)",
            view_mode.key,
            gantt_start,
            gantt_end,
            dates.len()
        );
        Self {
            unit: step.unit,
            step: step.quantity.max(1),
            column_width,
            header_height: options.lower_header_height + options.upper_header_height + 10.0,
            bar_height: options.bar_height,
            padding: options.padding,
            gantt_start,
            gantt_end,
            dates,
            view_mode,
        }
    }

    pub fn row_height(&self) -> f32 {
        self.bar_height + self.padding
    }
}

pub const DEFAULT_COLUMN_WIDTH: f32 = 45.0;

/// Range of the date axis.
///
/// Explicit `start_date`/`end_date` options seed the bounds and tasks outside
/// them widen the range. Both bounds are then snapped to the start of the step
/// unit and padded, and the start is truncated to midnight.
pub fn date_range(
    tasks: &[Task],
    view_mode: &ViewMode,
    options: &GanttOptions,
    now: NaiveDateTime,
) -> (NaiveDateTime, NaiveDateTime) {
    let unit = view_mode.step.unit;
    let padding = view_mode.padding;
    let first = tasks
        .iter()
        .map(|t| t.start)
        .chain(options.start_date)
        .min()
        .unwrap_or(now);
    let last = tasks
        .iter()
        .map(|t| t.end)
        .chain(options.end_date)
        .max()
        .unwrap_or(now);

    let start = date_utils::add(
        date_utils::start_of(first, unit),
        -padding.quantity,
        padding.unit,
    );
    let end = date_utils::add(
        date_utils::start_of(last, unit),
        padding.quantity,
        padding.unit,
    );
    let start = date_utils::start_of(start, DateScale::Day);
    (start, end.max(start))
}

/// Ticks from `start`, one step apart, up to and including the first tick
/// that reaches `end`.
pub fn ticks(start: NaiveDateTime, end: NaiveDateTime, step: Period) -> Vec<NaiveDateTime> {
    let quantity = step.quantity.max(1);
    let mut dates = vec![start];
    let mut current = start;
    while current < end {
        let next = date_utils::add(current, quantity, step.unit);
        if next <= current {
            tracing::warn!("date axis overflowed at {}", current);
            break;
        }
        dates.push(next);
        current = next;
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_utils::parse_datetime;
    use crate::model::TaskSpec;

    fn dt(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    fn tasks() -> Vec<Task> {
        vec![
            Task::from_spec(&TaskSpec::new("a", "A", "2024-01-10 09:30", "2024-01-12"), 0).unwrap(),
            Task::from_spec(&TaskSpec::new("b", "B", "2024-01-11", "2024-01-20 18:00"), 1).unwrap(),
        ]
    }

    #[test]
    fn day_range_is_snapped_then_padded() {
        let options = GanttOptions::default();
        let mode = options.view_mode_def("day").unwrap();
        let (start, end) = date_range(&tasks(), &mode, &options, dt("2000-01-01"));
        assert_eq!(start, dt("2024-01-03"));
        assert_eq!(end, dt("2024-01-27"));
    }

    #[test]
    fn month_range_pads_in_days_after_snapping() {
        let options = GanttOptions::default();
        let mode = options.view_mode_def("month").unwrap();
        let (start, end) = date_range(&tasks(), &mode, &options, dt("2000-01-01"));
        assert_eq!(start, dt("2023-12-18"));
        assert_eq!(end, dt("2024-01-15"));
    }

    #[test]
    fn explicit_bounds_are_snapped_and_padded() {
        let options = GanttOptions {
            start_date: Some(dt("2023-06-01 12:00")),
            end_date: Some(dt("2025-01-01")),
            ..Default::default()
        };
        let mode = options.view_mode_def("week").unwrap();
        let (start, end) = date_range(&tasks(), &mode, &options, dt("2000-01-01"));
        // Thursday snaps back to Monday 2023-05-29, then 14 days of padding.
        assert_eq!(start, dt("2023-05-15"));
        assert_eq!(end, dt("2025-01-13"));
    }

    #[test]
    fn explicit_bounds_inside_tasks_still_pad_day_view() {
        let options = GanttOptions {
            start_date: Some(dt("2024-01-10")),
            end_date: Some(dt("2024-01-20")),
            ..Default::default()
        };
        let mode = options.view_mode_def("day").unwrap();
        let (start, end) = date_range(&tasks(), &mode, &options, dt("2000-01-01"));
        assert_eq!(start, dt("2024-01-03"));
        assert_eq!(end, dt("2024-01-27"));
    }

    #[test]
    fn tasks_before_explicit_start_widen_the_range() {
        let options = GanttOptions {
            start_date: Some(dt("2024-02-01")),
            ..Default::default()
        };
        let mode = options.view_mode_def("day").unwrap();
        let (start, end) = date_range(&tasks(), &mode, &options, dt("2000-01-01"));
        assert_eq!(start, dt("2024-01-03"));
        assert_eq!(end, dt("2024-01-27"));

        let config = GanttConfig::resolve(mode, &tasks(), &options, dt("2000-01-01"));
        assert!(tasks().iter().all(|t| config.x_of(t.start) >= 0.0));
    }

    #[test]
    fn explicit_bounds_without_tasks() {
        let options = GanttOptions {
            start_date: Some(dt("2024-03-01")),
            end_date: Some(dt("2024-03-05")),
            ..Default::default()
        };
        let mode = options.view_mode_def("day").unwrap();
        let (start, end) = date_range(&[], &mode, &options, dt("2030-01-01"));
        assert_eq!(start, dt("2024-02-23"));
        assert_eq!(end, dt("2024-03-12"));
    }

    #[test]
    fn empty_task_list_centers_on_now() {
        let options = GanttOptions::default();
        let mode = options.view_mode_def("day").unwrap();
        let (start, end) = date_range(&[], &mode, &options, dt("2024-03-15 13:00"));
        assert_eq!(start, dt("2024-03-08"));
        assert_eq!(end, dt("2024-03-22"));
    }

    #[test]
    fn ticks_include_the_tick_reaching_the_end() {
        let step = Period::new(1, DateScale::Week);
        let dates = ticks(dt("2024-01-01"), dt("2024-01-16"), step);
        assert_eq!(dates.len(), 4);
        assert_eq!(dates[3], dt("2024-01-22"));
    }

    #[test]
    fn config_uses_option_column_width_first() {
        let options = GanttOptions {
            column_width: Some(60.0),
            ..Default::default()
        };
        let mode = options.view_mode_def("month").unwrap();
        let config = GanttConfig::resolve(mode, &tasks(), &options, dt("2000-01-01"));
        assert_eq!(config.column_width, 60.0);
        assert_eq!(config.header_height, 85.0);
        assert_eq!(config.unit, DateScale::Month);
    }
}
