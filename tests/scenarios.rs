use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use gantt_svg::date_utils::{self, parse_datetime, parse_duration, DateScale};
use gantt_svg::layout::arrow::{ArrowParams, Endpoint};
use gantt_svg::layout::{ArrowGeometry, Route};
use gantt_svg::options::{HolidayRule, ViewModeOverride};
use gantt_svg::{
    Gantt, GanttData, GanttOptions, Rect, ScrollTarget, TaskSpec, ValidationError, Viewport,
};

fn dt(s: &str) -> NaiveDateTime {
    parse_datetime(s).unwrap()
}

fn unpadded(mode: &str) -> GanttOptions {
    let mut options = GanttOptions::default();
    options.view_mode = mode.to_string();
    options.view_mode_overrides.insert(
        mode.to_string(),
        ViewModeOverride {
            padding: Some("0d".into()),
            ..Default::default()
        },
    );
    options
}

fn build(tasks: Vec<TaskSpec>, options: GanttOptions) -> Gantt {
    let viewport = Viewport::new(1000.0, 500.0).unwrap();
    Gantt::with_clock(viewport, GanttData::new(tasks, vec![]), options, || {
        parse_datetime("2024-01-02 09:00").unwrap()
    })
    .unwrap()
}

fn two_tasks() -> Vec<TaskSpec> {
    vec![
        TaskSpec::new("A", "A", "2024-01-01", "2024-01-03"),
        TaskSpec::new("B", "B", "2024-01-04", "2024-01-06").with_dependencies(&["A"]),
    ]
}

#[test]
fn day_view_places_bars_by_column_and_routes_one_forward_arrow() {
    let mut options = unpadded("day");
    options.column_width = Some(45.0);
    let gantt = build(two_tasks(), options);

    assert_eq!(gantt.get_bar("A").unwrap().rect.x, 0.0);
    assert_eq!(gantt.get_bar("B").unwrap().rect.x, 135.0);

    let arrows = &gantt.scene().arrows;
    assert_eq!(arrows.len(), 1);
    assert_eq!((arrows[0].from_id.as_str(), arrows[0].to_id.as_str()), ("A", "B"));
    assert_eq!(arrows[0].route, Route::Forward);
}

#[test]
fn decade_long_task_is_rejected() {
    let mut tasks = two_tasks();
    tasks.push(TaskSpec::new("long", "Long", "2024-05-01", "2035-06-01"));
    let gantt = build(tasks, GanttOptions::default());

    assert!(gantt.tasks().iter().all(|t| t.id != "long"));
    assert!(gantt.get_bar("long").is_none());
    assert_eq!(
        gantt.rejected(),
        &[ValidationError::DurationTooLong { id: "long".into() }]
    );
}

#[test]
fn switching_view_modes_is_idempotent() {
    let fresh = build(two_tasks(), GanttOptions::default());

    let mut switched = build(two_tasks(), GanttOptions::default());
    switched.change_view_mode("month", ScrollTarget::Start).unwrap();
    assert_eq!(switched.get_current_view_mode(), "month");
    switched.change_view_mode("day", ScrollTarget::Start).unwrap();

    let (a, b) = (fresh.config(), switched.config());
    assert_eq!(a.gantt_start, b.gantt_start);
    assert_eq!(a.gantt_end, b.gantt_end);
    assert_eq!(a.dates, b.dates);
}

#[test]
fn weekend_bands_over_a_fortnight() {
    let mut options = unpadded("day");
    options.holidays = BTreeMap::from([("red".to_string(), HolidayRule::weekend())]);
    let gantt = build(
        vec![TaskSpec::new("A", "A", "2024-01-01", "2024-01-14")],
        options,
    );

    let bands = &gantt.scene().grid.holidays;
    assert_eq!(bands.len(), 4);
    assert!(bands.iter().all(|b| b.color == "red"));
    let days: Vec<_> = bands.iter().map(|b| b.date.format("%a").to_string()).collect();
    assert_eq!(days, vec!["Sat", "Sun", "Sat", "Sun"]);
}

#[test]
fn duration_strings_add_up() {
    let now = dt("2024-03-09 15:30");
    let period = parse_duration("3d").unwrap();
    let start = date_utils::start_of(now, DateScale::Day);
    assert_eq!(
        date_utils::add(start, period.quantity, period.unit),
        start + Duration::days(3)
    );
}

#[test]
fn accepted_tasks_end_after_they_start() {
    let tasks = vec![
        TaskSpec::new("ok", "Ok", "2024-01-01", "2024-01-02"),
        TaskSpec::new("same", "Same", "2024-01-02 10:00", "2024-01-02 10:00"),
        TaskSpec::new("back", "Back", "2024-01-05", "2024-01-01"),
    ];
    let gantt = build(tasks, GanttOptions::default());
    assert_eq!(gantt.tasks().len(), 1);
    assert!(gantt.tasks().iter().all(|t| t.end > t.start));
    assert_eq!(gantt.scene().bars.len(), 1);
}

#[test]
fn x_is_monotonic_in_start_date() {
    for mode in ["hour", "qday", "day", "week", "month", "year"] {
        let tasks = vec![
            TaskSpec::new("a", "A", "2024-01-01", "2024-01-02"),
            TaskSpec::new("b", "B", "2024-01-01 06:00", "2024-01-03"),
            TaskSpec::new("c", "C", "2024-02-10", "2024-03-01"),
        ];
        let gantt = build(tasks, unpadded(mode));
        let xs: Vec<f32> = ["a", "b", "c"]
            .iter()
            .map(|id| gantt.get_bar(id).unwrap().rect.x)
            .collect();
        assert!(xs.windows(2).all(|w| w[0] <= w[1]), "{mode}: {xs:?}");
    }
}

#[test]
fn arrow_turn_direction_depends_on_row_order() {
    let params = ArrowParams {
        header_height: 85.0,
        bar_height: 30.0,
        padding: 18.0,
        curve: 5.0,
        backward_threshold: 18.0,
    };
    let at = |x: f32, index: usize| Endpoint {
        rect: Rect::new(x, 85.0 + 9.0 + index as f32 * 48.0, 90.0, 30.0),
        index,
    };
    let up = ArrowGeometry::new("from", "to", at(0.0, 2), at(200.0, 0), &params);
    let down = ArrowGeometry::new("from", "to", at(0.0, 0), at(200.0, 2), &params);
    assert_ne!(up.clockwise, down.clockwise);
}

#[test]
fn dependency_closure_follows_chains() {
    let tasks = vec![
        TaskSpec::new("a", "A", "2024-01-01", "2024-01-02"),
        TaskSpec::new("b", "B", "2024-01-02", "2024-01-03").with_dependencies(&["a"]),
        TaskSpec::new("c", "C", "2024-01-03", "2024-01-04").with_dependencies(&["b"]),
        TaskSpec::new("d", "D", "2024-01-03", "2024-01-04").with_dependencies(&["a"]),
        TaskSpec::new("e", "E", "2024-01-03", "2024-01-04"),
    ];
    let gantt = build(tasks, GanttOptions::default());
    let mut all = gantt.dependents_of("a");
    all.sort();
    assert_eq!(all, vec!["b", "c", "d"]);
    assert!(gantt.dependents_of("e").is_empty());
}

#[test]
fn scroll_target_today_lands_near_viewport_center() {
    let gantt_tasks = vec![TaskSpec::new("a", "A", "2023-12-01", "2024-02-01")];
    let mut gantt = build(gantt_tasks, GanttOptions::default());
    let request = gantt
        .take_scroll_request()
        .expect("construction requests a scroll");
    let today_x = gantt.config().x_of(dt("2024-01-02"));
    let cw = gantt.config().column_width;
    assert_eq!(request.left, today_x - cw / 6.0 - 500.0);
}
