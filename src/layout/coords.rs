//! Coordinate mapping between dates, slots and pixels.

use chrono::NaiveDateTime;

use super::GanttConfig;
use crate::date_utils::{self, DateScale};

impl GanttConfig {
    /// Horizontal offset of `date` from the start of the axis.
    pub fn x_of(&self, date: NaiveDateTime) -> f32 {
        let units = date_utils::diff(date, self.gantt_start, self.unit) / self.step as f64;
        (units * f64::from(self.column_width)) as f32
    }

    /// Vertical offset of the bar in `slot`.
    pub fn y_of(&self, slot: usize) -> f32 {
        self.header_height + self.padding / 2.0 + slot as f32 * self.row_height()
    }

    /// Number of columns spanned by `start..end`.
    ///
    /// Day and hour scales count the final unit so that a task inside one
    /// column still fills it.
    pub fn duration_in_columns(&self, start: NaiveDateTime, end: NaiveDateTime) -> f64 {
        let columns = date_utils::diff(end, start, self.unit) / self.step as f64;
        match self.unit {
            DateScale::Day | DateScale::Hour => columns + 1.0,
            _ => columns,
        }
    }

    pub fn width_of(&self, start: NaiveDateTime, end: NaiveDateTime) -> f32 {
        (self.duration_in_columns(start, end) * f64::from(self.column_width)) as f32
    }

    /// Inverse of [`x_of`](Self::x_of).
    pub fn date_at(&self, x: f32) -> NaiveDateTime {
        let units = f64::from(x) / f64::from(self.column_width) * self.step as f64;
        date_utils::add_fractional(self.gantt_start, units, self.unit)
    }

    /// Width of the whole date axis.
    pub fn grid_width(&self) -> f32 {
        self.dates.len() as f32 * self.column_width
    }

    /// Pixel width of a single calendar day on this scale.
    pub fn day_width(&self) -> f32 {
        let step = date_utils::Period::new(self.step, self.unit);
        (f64::from(self.column_width) / date_utils::convert_scales(step, DateScale::Day)) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_utils::parse_datetime;
    use crate::model::{Task, TaskSpec};
    use crate::options::{GanttOptions, ViewModeOverride};

    fn dt(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    fn config(mode: &str) -> GanttConfig {
        let mut options = GanttOptions::default();
        options.view_mode_overrides.insert(
            mode.to_string(),
            ViewModeOverride {
                padding: Some("0d".into()),
                ..Default::default()
            },
        );
        let tasks = vec![
            Task::from_spec(&TaskSpec::new("a", "A", "2024-01-01", "2024-01-03"), 0).unwrap(),
            Task::from_spec(&TaskSpec::new("b", "B", "2024-03-04", "2024-03-06"), 1).unwrap(),
        ];
        let mode = options.view_mode_def(mode).unwrap();
        GanttConfig::resolve(mode, &tasks, &options, dt("2000-01-01"))
    }

    #[test]
    fn day_scale_positions() {
        let config = config("day");
        assert_eq!(config.x_of(dt("2024-01-01")), 0.0);
        assert_eq!(config.x_of(dt("2024-01-04")), 135.0);
        assert_eq!(config.x_of(dt("2024-01-01 12:00")), 22.5);
        assert_eq!(config.width_of(dt("2024-01-01"), dt("2024-01-03")), 135.0);
    }

    #[test]
    fn rows_are_stacked_by_slot() {
        let config = config("day");
        assert_eq!(config.y_of(0), 94.0);
        assert_eq!(config.y_of(2), 94.0 + 2.0 * 48.0);
    }

    #[test]
    fn quarter_day_steps_divide_units() {
        let config = config("qday");
        assert_eq!(config.x_of(dt("2024-01-01 12:00")), 90.0);
        assert_eq!(config.width_of(dt("2024-01-01"), dt("2024-01-01 12:00")), 135.0);
    }

    #[test]
    fn month_scale_uses_thirty_day_months() {
        let config = config("month");
        assert_eq!(config.unit, DateScale::Month);
        let x = config.x_of(dt("2024-01-31"));
        assert!((x - 350.0).abs() < 0.01, "{x}");
        assert!((config.day_width() - 350.0 / 30.0).abs() < 0.001);
    }

    #[test]
    fn x_is_monotonic_and_invertible() {
        let config = config("week");
        let dates = ["2024-01-01", "2024-01-09 06:00", "2024-02-01", "2024-03-05"];
        let xs: Vec<f32> = dates.iter().map(|d| config.x_of(dt(d))).collect();
        assert!(xs.windows(2).all(|w| w[0] <= w[1]));
        let back = config.date_at(xs[1]) - dt("2024-01-09 06:00");
        assert!(back.num_seconds().abs() < 60, "{back}");
    }
}
