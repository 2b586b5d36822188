//! Backdrop of the chart: rows, ticks, holiday bands, header labels.

use chrono::{Datelike, NaiveDateTime, Weekday};

use super::{GanttConfig, Rect};
use crate::date_utils::{self, DateScale};
use crate::model::Group;
use crate::options::{GanttOptions, HolidayRule, Lines};

/// Vertical position of upper header labels.
const UPPER_LABEL_Y: f32 = 17.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub date: NaiveDateTime,
    pub x: f32,
    pub thick: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HolidayBand {
    pub rect: Rect,
    pub color: String,
    pub date: NaiveDateTime,
    /// Name of an explicitly listed holiday.
    pub label: Option<String>,
}

/// Labels of one tick column in the header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub date: NaiveDateTime,
    /// Sanitized `date_format` rendering used to look ticks up by date.
    pub key: String,
    pub x: f32,
    pub lower_text: String,
    pub upper_text: String,
    pub lower_y: f32,
    pub upper_y: f32,
    pub upper_width: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarRow {
    pub group_key: String,
    pub rect: Rect,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    pub width: f32,
    pub height: f32,
    pub header_height: f32,
    pub rows: Vec<Rect>,
    /// y of each horizontal row separator.
    pub row_lines: Vec<f32>,
    pub ticks: Vec<Tick>,
    pub holidays: Vec<HolidayBand>,
    /// x of the current-time marker when it falls inside the range.
    pub today_x: Option<f32>,
    pub header: Vec<HeaderCell>,
    /// Header cell marked as the current date.
    pub today_cell: Option<usize>,
    pub date_highlight: Option<Rect>,
}

impl GridGeometry {
    pub fn build(
        config: &GanttConfig,
        options: &GanttOptions,
        slots: usize,
        container_height: f32,
        now: NaiveDateTime,
        highlight: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> Self {
        let height = grid_height(config, options, slots, container_height);
        let header = header_cells(config, options);
        let in_range = now >= config.gantt_start && now <= config.gantt_end;
        let today_cell = in_range
            .then(|| closest_cell(&header, config, now, &options.language))
            .flatten();
        Self {
            width: config.grid_width(),
            height,
            header_height: config.header_height,
            rows: rows(config, height),
            row_lines: row_lines(config, options.lines, height),
            ticks: ticks(config, options.lines),
            holidays: holidays(config, options, height),
            today_x: in_range.then(|| config.x_of(now)),
            header,
            today_cell,
            date_highlight: highlight.map(|(start, end)| date_highlight(config, start, end, height)),
        }
    }
}

/// Content height, stretched to fill the container.
pub fn grid_height(
    config: &GanttConfig,
    options: &GanttOptions,
    slots: usize,
    container_height: f32,
) -> f32 {
    let content = config.header_height
        + options.padding
        + (options.bar_height + options.padding) * slots as f32
        - 10.0;
    content.max(container_height - 20.0)
}

fn rows(config: &GanttConfig, height: f32) -> Vec<Rect> {
    let row_height = config.row_height();
    if row_height <= 0.0 {
        return Vec::new();
    }
    let width = config.grid_width();
    let mut rows = Vec::new();
    let mut y = config.header_height;
    while y < height {
        rows.push(Rect::new(0.0, y, width, row_height));
        y += row_height;
    }
    rows
}

fn row_lines(config: &GanttConfig, lines: Lines, height: f32) -> Vec<f32> {
    if matches!(lines, Lines::Vertical | Lines::None) {
        return Vec::new();
    }
    rows(config, height).iter().map(Rect::end_y).collect()
}

/// Tick lines. Month and year scales space each tick by the true length of
/// its period so boundaries land on calendar dates.
fn ticks(config: &GanttConfig, lines: Lines) -> Vec<Tick> {
    if matches!(lines, Lines::Horizontal | Lines::None) {
        return Vec::new();
    }
    let thick_line = config.view_mode.thick_line.as_ref();
    let mut x = 0.0;
    config
        .dates
        .iter()
        .map(|&date| {
            let tick = Tick {
                date,
                x,
                thick: thick_line.is_some_and(|f| f(date)),
            };
            x += tick_spacing(config, date);
            tick
        })
        .collect()
}

fn tick_spacing(config: &GanttConfig, date: NaiveDateTime) -> f32 {
    let nominal = match config.unit {
        DateScale::Month => 30.0,
        DateScale::Year => 365.0,
        _ => return config.column_width,
    };
    let next = date_utils::add(date, config.step, config.unit);
    let days = (next - date).num_days() as f32;
    days * config.column_width / (nominal * config.step as f32)
}

fn holidays(config: &GanttConfig, options: &GanttOptions, height: f32) -> Vec<HolidayBand> {
    let width = config.day_width();
    let mut bands = Vec::new();
    for (color, rule) in &options.holidays {
        let mut day = config.gantt_start;
        while day <= config.gantt_end {
            let hit = match rule {
                HolidayRule::Keyword(_) => {
                    matches!(day.weekday(), Weekday::Sat | Weekday::Sun).then_some(None)
                }
                HolidayRule::Dates(list) => list
                    .iter()
                    .find(|h| h.date == day.date())
                    .map(|h| Some(h.name.clone())),
            };
            if let Some(label) = hit {
                bands.push(HolidayBand {
                    rect: Rect::new(
                        config.x_of(day).round(),
                        config.header_height,
                        width,
                        height - config.header_height,
                    ),
                    color: color.clone(),
                    date: day,
                    label,
                });
            }
            day = date_utils::add(day, 1, DateScale::Day);
        }
    }
    bands
}

fn header_cells(config: &GanttConfig, options: &GanttOptions) -> Vec<HeaderCell> {
    let lang = options.language.as_str();
    let upper = config.view_mode.upper_text.resolve();
    let lower = config.view_mode.lower_text.resolve();
    let mut last = None;
    config
        .dates
        .iter()
        .enumerate()
        .map(|(i, &date)| {
            let cell = HeaderCell {
                date,
                key: date_key(config, date, lang),
                x: i as f32 * config.column_width,
                lower_text: lower(date, last, lang),
                upper_text: upper(date, last, lang),
                lower_y: options.upper_header_height + 5.0,
                upper_y: UPPER_LABEL_Y,
                upper_width: None,
            };
            last = Some(date);
            cell
        })
        .collect()
}

pub fn date_key(config: &GanttConfig, date: NaiveDateTime, lang: &str) -> String {
    date_utils::sanitize(&date_utils::format(date, &config.view_mode.date_format, lang))
}

/// Header cell whose key matches `date`, walking back one unit at a time
/// for at most `step` units.
pub fn closest_cell(
    header: &[HeaderCell],
    config: &GanttConfig,
    date: NaiveDateTime,
    lang: &str,
) -> Option<usize> {
    let mut current = date;
    for _ in 0..=config.step {
        let key = date_key(config, current, lang);
        if let Some(i) = header.iter().position(|c| c.key == key) {
            return Some(i);
        }
        current = date_utils::add(current, -1, config.unit);
    }
    None
}

/// Band covering `start..=end` in whole columns.
pub fn date_highlight(
    config: &GanttConfig,
    start: NaiveDateTime,
    end: NaiveDateTime,
    height: f32,
) -> Rect {
    let x = config.x_of(start);
    let width = (config.duration_in_columns(start, end) * f64::from(config.column_width)) as f32;
    Rect::new(x, 0.0, width.max(0.0), height)
}

/// One sidebar row per group.
pub fn sidebar_rows(groups: &[Group], config: &GanttConfig, options: &GanttOptions) -> Vec<SidebarRow> {
    let width = options.sidebar_config.sidebar_width;
    let height = config.row_height();
    groups
        .iter()
        .enumerate()
        .map(|(i, group)| SidebarRow {
            group_key: group.key.clone(),
            rect: Rect::new(0.0, config.header_height + i as f32 * height, width, height),
            label: match &options.sidebar_config.get_label {
                Some(get_label) => (get_label.0)(group),
                None => group.name.clone(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_utils::parse_datetime;
    use crate::model::{Task, TaskSpec};
    use crate::options::{Holiday, ViewModeOverride};
    use std::collections::BTreeMap;

    fn dt(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    fn config(mode: &str, options: &mut GanttOptions, start: &str, end: &str) -> GanttConfig {
        options.view_mode_overrides.insert(
            mode.to_string(),
            ViewModeOverride {
                padding: Some("0d".into()),
                ..Default::default()
            },
        );
        let task = Task::from_spec(&TaskSpec::new("a", "A", start, end), 0).unwrap();
        let mode = options.view_mode_def(mode).unwrap();
        GanttConfig::resolve(mode, &[task], options, dt("2000-01-01"))
    }

    #[test]
    fn two_weekends_in_a_fortnight() {
        let mut options = GanttOptions::default();
        options.holidays = BTreeMap::from([("red".to_string(), HolidayRule::weekend())]);
        let config = config("day", &mut options, "2024-01-01", "2024-01-14");
        let grid = GridGeometry::build(&config, &options, 1, 0.0, dt("2000-01-01"), None);
        assert_eq!(grid.holidays.len(), 4);
        let xs: Vec<f32> = grid.holidays.iter().map(|h| h.rect.x).collect();
        assert_eq!(xs, vec![225.0, 270.0, 540.0, 585.0]);
        assert!(grid.holidays.iter().all(|h| h.color == "red" && h.rect.width == 45.0));
    }

    #[test]
    fn every_listed_holiday_is_highlighted() {
        let mut options = GanttOptions::default();
        options.holidays = BTreeMap::from([(
            "#fcc".to_string(),
            HolidayRule::Dates(vec![
                Holiday {
                    name: "New Year".into(),
                    date: dt("2024-01-01").date(),
                },
                Holiday {
                    name: "Epiphany".into(),
                    date: dt("2024-01-06").date(),
                },
            ]),
        )]);
        let config = config("day", &mut options, "2024-01-01", "2024-01-14");
        let grid = GridGeometry::build(&config, &options, 1, 0.0, dt("2000-01-01"), None);
        let labels: Vec<_> = grid.holidays.iter().map(|h| h.label.as_deref()).collect();
        assert_eq!(labels, vec![Some("New Year"), Some("Epiphany")]);
    }

    #[test]
    fn grid_height_fills_container() {
        let mut options = GanttOptions::default();
        let config = config("day", &mut options, "2024-01-01", "2024-01-14");
        assert_eq!(grid_height(&config, &options, 2, 0.0), 85.0 + 18.0 + 96.0 - 10.0);
        assert_eq!(grid_height(&config, &options, 2, 600.0), 580.0);
        let grid = GridGeometry::build(&config, &options, 2, 600.0, dt("2000-01-01"), None);
        assert_eq!(grid.rows.len(), 11);
        assert_eq!(grid.row_lines.len(), 11);
    }

    #[test]
    fn line_modes_select_ticks_and_rows() {
        let mut options = GanttOptions::default();
        let config = config("day", &mut options, "2024-01-01", "2024-01-14");
        options.lines = Lines::Vertical;
        let grid = GridGeometry::build(&config, &options, 2, 0.0, dt("2000-01-01"), None);
        assert!(grid.row_lines.is_empty());
        assert_eq!(grid.ticks.len(), config.dates.len());

        options.lines = Lines::Horizontal;
        let grid = GridGeometry::build(&config, &options, 2, 0.0, dt("2000-01-01"), None);
        assert!(grid.ticks.is_empty());
        assert!(!grid.row_lines.is_empty());
    }

    #[test]
    fn month_ticks_follow_calendar_lengths() {
        let mut options = GanttOptions::default();
        let config = config("month", &mut options, "2024-01-01", "2024-04-01");
        let grid = GridGeometry::build(&config, &options, 1, 0.0, dt("2000-01-01"), None);
        let xs: Vec<f32> = grid.ticks.iter().map(|t| t.x).collect();
        assert_eq!(xs[0], 0.0);
        assert!((xs[1] - 31.0 * 350.0 / 30.0).abs() < 0.01);
        assert!((xs[2] - 60.0 * 350.0 / 30.0).abs() < 0.01);
        assert!(grid.ticks[0].thick);
        // header labels keep a flat spacing
        assert_eq!(grid.header[2].x, 700.0);
    }

    #[test]
    fn today_marker_only_inside_range() {
        let mut options = GanttOptions::default();
        let config = config("day", &mut options, "2024-01-01", "2024-01-14");
        let inside = GridGeometry::build(&config, &options, 1, 0.0, dt("2024-01-03 12:00"), None);
        assert_eq!(inside.today_x, Some(112.5));
        assert_eq!(inside.today_cell, Some(2));
        let outside = GridGeometry::build(&config, &options, 1, 0.0, dt("2025-01-01"), None);
        assert_eq!(outside.today_x, None);
        assert_eq!(outside.today_cell, None);
    }

    #[test]
    fn closest_cell_walks_back_within_step() {
        let mut options = GanttOptions::default();
        let config = config("qday", &mut options, "2024-01-01", "2024-01-03");
        let grid = GridGeometry::build(&config, &options, 1, 0.0, dt("2000-01-01"), None);
        let cell = closest_cell(&grid.header, &config, dt("2024-01-01 14:37"), "en").unwrap();
        assert_eq!(grid.header[cell].date, dt("2024-01-01 12:00"));
    }

    #[test]
    fn date_highlight_spans_inclusive_days() {
        let mut options = GanttOptions::default();
        let config = config("day", &mut options, "2024-01-01", "2024-01-14");
        let range = Some((dt("2024-01-02"), dt("2024-01-04")));
        let grid = GridGeometry::build(&config, &options, 1, 0.0, dt("2000-01-01"), range);
        let rect = grid.date_highlight.unwrap();
        assert_eq!((rect.x, rect.width), (45.0, 135.0));
    }

    #[test]
    fn header_keys_and_labels() {
        let mut options = GanttOptions::default();
        let config = config("day", &mut options, "2024-01-30", "2024-02-02");
        let grid = GridGeometry::build(&config, &options, 1, 0.0, dt("2000-01-01"), None);
        assert_eq!(grid.header[0].key, "2024-01-30");
        assert_eq!(grid.header[0].upper_text, "January");
        assert_eq!(grid.header[1].upper_text, "");
        assert_eq!(grid.header[2].upper_text, "February");
        assert_eq!(grid.header[2].lower_text, "1");
        assert_eq!(grid.header[0].lower_y, 50.0);
    }

    #[test]
    fn sidebar_rows_per_group() {
        let mut options = GanttOptions::default();
        let config = config("day", &mut options, "2024-01-01", "2024-01-14");
        let groups = vec![Group::new("a", "Alpha"), Group::new("b", "Beta")];
        let rows = sidebar_rows(&groups, &config, &options);
        assert_eq!(rows[1].rect, Rect::new(0.0, 85.0 + 48.0, 200.0, 48.0));
        assert_eq!(rows[1].label, "Beta");
    }
}
