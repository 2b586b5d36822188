//! The chart engine: owns the data, the derived configuration and the
//! current scene, and exposes the operations a host drives it with.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{debug, warn};

use crate::date_utils;
use crate::error::{GanttError, ValidationError};
use crate::i18n;
use crate::layout::arrow::{ArrowParams, Endpoint};
use crate::layout::grid::{self, GridGeometry};
use crate::layout::scroll::{self, AdjustHint, ScrollState};
use crate::layout::{
    ArrowGeometry, BarGeometry, GanttConfig, Rect, ScrollBehavior, ScrollRequest, ScrollTarget,
    TextMeasure, Viewport,
};
use crate::model::{accept_tasks, DependencyGraph, GanttData, Group, Task, TaskSpec};
use crate::options::GanttOptions;
use crate::scene::{Highlighters, Scene, SideHeader, Sidebar, ViewModeOption};
use crate::view_mode::ViewMode;

/// Notifications queued for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum GanttEvent {
    BarClick { task: Task },
    ViewChange { mode: String },
    SideClick { group: Group },
}

impl GanttEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BarClick { .. } => "bar-click",
            Self::ViewChange { .. } => "view-change",
            Self::SideClick { .. } => "side-click",
        }
    }
}

type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub struct Gantt {
    viewport: Viewport,
    options: GanttOptions,
    groups: Vec<Group>,
    tasks: Vec<Task>,
    rejected: Vec<ValidationError>,
    graph: DependencyGraph,
    config: GanttConfig,
    scene: Scene,
    scroll: ScrollState,
    highlight: Option<(NaiveDateTime, NaiveDateTime)>,
    pending_scroll: Option<ScrollRequest>,
    events: VecDeque<GanttEvent>,
    clock: Clock,
}

impl Gantt {
    pub fn new(
        viewport: Viewport,
        data: GanttData,
        options: GanttOptions,
    ) -> Result<Self, GanttError> {
        Self::with_clock(viewport, data, options, date_utils::now)
    }

    /// Like [`Gantt::new`] with an explicit source for the current time.
    pub fn with_clock(
        viewport: Viewport,
        data: GanttData,
        options: GanttOptions,
        clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static,
    ) -> Result<Self, GanttError> {
        let clock: Clock = Arc::new(clock);
        let mode = options.view_mode_def(&options.view_mode)?;
        let (tasks, rejected) = validate(&data.tasks, &data.groups, &options.language);
        let config = GanttConfig::resolve(mode, &tasks, &options, clock());
        let mut gantt = Self {
            viewport,
            graph: DependencyGraph::build(&tasks),
            scene: empty_scene(&config),
            groups: data.groups,
            tasks,
            rejected,
            config,
            scroll: ScrollState::default(),
            highlight: None,
            pending_scroll: None,
            events: VecDeque::new(),
            clock,
            options,
        };
        let target = gantt.options.scroll_to;
        gantt.render(target);
        gantt.events.push_back(GanttEvent::ViewChange {
            mode: gantt.config.view_mode.key.clone(),
        });
        Ok(gantt)
    }

    /// Replace tasks and groups wholesale and re-render.
    pub fn refresh(&mut self, tasks: Vec<TaskSpec>, groups: Vec<Group>) {
        let (accepted, rejected) = validate(&tasks, &groups, &self.options.language);
        self.groups = groups;
        self.tasks = accepted;
        self.rejected = rejected;
        self.graph = DependencyGraph::build(&self.tasks);
        self.rebuild(self.config.view_mode.clone(), self.current_target());
    }

    /// Deep-merge a JSON patch into the options and re-render.
    pub fn update_options(&mut self, patch: &Value) -> Result<(), GanttError> {
        let options = self.options.merged(patch)?;
        self.set_options(options)
    }

    pub fn set_options(&mut self, options: GanttOptions) -> Result<(), GanttError> {
        let mode = options.view_mode_def(&self.config.view_mode.key)?;
        self.options = options;
        self.rebuild(mode, self.current_target());
        Ok(())
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.rebuild(self.config.view_mode.clone(), self.current_target());
    }

    /// Switch the time scale, rebuilding the configuration from scratch.
    pub fn change_view_mode(
        &mut self,
        name: &str,
        target: ScrollTarget,
    ) -> Result<ScrollRequest, GanttError> {
        let mode = self.options.view_mode_def(name)?;
        let request = self.rebuild(mode, target);
        self.events.push_back(GanttEvent::ViewChange {
            mode: name.to_string(),
        });
        Ok(request)
    }

    pub fn set_scroll_position(
        &mut self,
        target: ScrollTarget,
        behavior: ScrollBehavior,
    ) -> ScrollRequest {
        let date = scroll::resolve_target(
            target,
            &self.config,
            &self.scene.grid.header,
            &self.tasks,
            (self.clock)(),
            &self.options.language,
        );
        let request = ScrollRequest {
            left: scroll::scroll_left_for(&self.config, date, self.viewport.width),
            behavior,
        };
        self.pending_scroll = Some(request);
        request
    }

    /// Scroll request not yet applied by the host.
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.pending_scroll.take()
    }

    pub fn highlight_dates(&mut self, start: NaiveDateTime, end: NaiveDateTime) {
        self.highlight = Some((start, end));
        self.scene.grid.date_highlight =
            Some(grid::date_highlight(&self.config, start, end, self.scene.height));
    }

    pub fn reset_highlight_dates(&mut self) {
        self.highlight = None;
        self.scene.grid.date_highlight = None;
    }

    pub fn is_highlighting_dates(&self) -> bool {
        self.highlight.is_some()
    }

    pub fn get_bar(&self, id: &str) -> Option<&BarGeometry> {
        self.scene.bar(id)
    }

    pub fn get_current_view_mode(&self) -> &str {
        &self.config.view_mode.key
    }

    /// Date at the center of the viewport, known after the first scroll.
    pub fn get_current_date(&self) -> Option<NaiveDateTime> {
        self.scroll.current_date
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &GanttConfig {
        &self.config
    }

    pub fn options(&self) -> &GanttOptions {
        &self.options
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Tasks dropped by the last validation.
    pub fn rejected(&self) -> &[ValidationError] {
        &self.rejected
    }

    pub fn scroll_left(&self) -> f32 {
        self.scroll.left
    }

    /// Every task that transitively depends on `id`.
    pub fn dependents_of(&self, id: &str) -> Vec<String> {
        self.graph
            .all_dependents(id)
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn drain_events(&mut self) -> Vec<GanttEvent> {
        self.events.drain(..).collect()
    }

    /// Measure labels with `measure` and place them. Call after every render
    /// pass that the host intends to show.
    pub fn measure_and_reflow(&mut self, measure: &dyn TextMeasure) {
        let show_on_offset = self.options.bar_config.show_label_on_offset;
        for bar in &mut self.scene.bars {
            bar.measure_and_reflow(measure, show_on_offset);
        }
        for cell in &mut self.scene.grid.header {
            if !cell.upper_text.is_empty() {
                cell.upper_width = Some(measure.text_width(&cell.upper_text));
            }
        }
    }

    /// React to the host's horizontal scroll.
    pub fn on_scroll(&mut self, left: f32, now: Instant) {
        let dx = left - self.scroll.left;
        let (start, center, upper) = scroll::visible_dates(
            &self.config,
            &self.scene.grid.header,
            left,
            self.viewport.width,
            &self.options.language,
        );
        self.scroll.current_date_start = Some(start);
        self.scroll.current_date = Some(center);
        self.scene.current_upper = upper;

        let rects: Vec<Rect> = self.scene.bars.iter().map(|b| b.rect).collect();
        self.scene.adjust = AdjustHint::evaluate(left, self.viewport.width, &rects);

        if self.options.auto_move_label && dx != 0.0 {
            for bar in &mut self.scene.bars {
                bar.move_label_on_scroll(dx, left, self.viewport.width);
            }
        }

        if dx != 0.0 {
            if let Some(sidebar) = &mut self.scene.sidebar {
                sidebar.visible = false;
                self.scroll.sticky.trigger(now);
            }
        }
        self.scroll.left = left;
    }

    /// Advance timers. Returns true when the scene changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.scroll.sticky.poll(now) {
            return false;
        }
        match &mut self.scene.sidebar {
            Some(sidebar) => {
                sidebar.visible = true;
                sidebar.offset = self.scroll.left;
                true
            }
            None => false,
        }
    }

    /// When [`tick`](Self::tick) next needs to run.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scroll.sticky.pending()
    }

    pub fn click_bar(&mut self, id: &str) -> bool {
        let interactive = self.scene.bar(id).is_some_and(BarGeometry::is_interactive);
        match self.tasks.iter().find(|t| t.id == id) {
            Some(task) if interactive => {
                self.events.push_back(GanttEvent::BarClick { task: task.clone() });
                true
            }
            _ => false,
        }
    }

    pub fn click_sidebar(&mut self, group_key: &str) -> bool {
        match self.groups.iter().find(|g| g.key == group_key) {
            Some(group) => {
                self.events.push_back(GanttEvent::SideClick {
                    group: group.clone(),
                });
                true
            }
            None => false,
        }
    }

    /// Dispatch a click at chart coordinates to the sidebar or a bar.
    pub fn click_at(&mut self, x: f32, y: f32) -> bool {
        if let Some(key) = self.scene.sidebar_row_at(x, y).map(|r| r.group_key.clone()) {
            return self.click_sidebar(&key);
        }
        match self.scene.bar_at(x, y).map(|b| b.task_id.clone()) {
            Some(id) => self.click_bar(&id),
            None => false,
        }
    }

    /// Move the column and row highlighters under the pointer.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let cw = self.config.column_width;
        let column = Rect::new((x / cw).floor() * cw, 0.0, cw, self.scene.height);
        let row = self
            .scene
            .sidebar_row_at(x, y)
            .map(|r| Rect::new(0.0, r.rect.y, self.scene.width, r.rect.height));
        self.scene.highlighters = Highlighters {
            column: Some(column),
            row,
        };
    }

    pub fn pointer_left(&mut self) {
        self.scene.highlighters = Highlighters::default();
    }

    /// Move a bar horizontally and re-route the arrows attached to it.
    pub fn reposition_bar(&mut self, id: &str, x: f32) -> bool {
        let Some(bar) = self.scene.bars.iter_mut().find(|b| b.task_id == id) else {
            return false;
        };
        bar.set_x(x);
        let endpoints = endpoints(&self.scene.bars);
        let params = self.arrow_params();
        for arrow in self.scene.arrows.iter_mut().filter(|a| a.touches(id)) {
            if let (Some(&from), Some(&to)) =
                (endpoints.get(arrow.from_id.as_str()), endpoints.get(arrow.to_id.as_str()))
            {
                arrow.update(from, to, &params);
            }
        }
        true
    }

    fn current_target(&self) -> ScrollTarget {
        self.scroll
            .current_date
            .map_or(self.options.scroll_to, ScrollTarget::Date)
    }

    fn rebuild(&mut self, mode: ViewMode, target: ScrollTarget) -> ScrollRequest {
        self.config = GanttConfig::resolve(mode, &self.tasks, &self.options, (self.clock)());
        self.render(target)
    }

    fn arrow_params(&self) -> ArrowParams {
        ArrowParams {
            header_height: self.config.header_height,
            bar_height: self.options.bar_height,
            padding: self.options.padding,
            curve: self.options.arrow_curve,
            backward_threshold: self.options.backward_threshold(),
        }
    }

    /// Build a fresh scene for the current configuration.
    fn render(&mut self, target: ScrollTarget) -> ScrollRequest {
        let options = &self.options;
        let config = &self.config;
        let grouped = !self.groups.is_empty();
        let slots = if grouped {
            self.groups.len()
        } else {
            self.tasks.len()
        };
        let container_height = options.container_height.unwrap_or(self.viewport.height);
        let grid = GridGeometry::build(
            config,
            options,
            slots,
            container_height,
            (self.clock)(),
            self.highlight,
        );

        let bars: Vec<BarGeometry> = self
            .tasks
            .iter()
            .map(|task| {
                let group = task
                    .group_key
                    .as_ref()
                    .and_then(|key| self.groups.iter().find(|g| &g.key == key));
                BarGeometry::build(task, group, config, options)
            })
            .collect();

        let ends = endpoints(&bars);
        let params = self.arrow_params();
        let mut arrows = Vec::new();
        for task in &self.tasks {
            for dep in &task.dependencies {
                match (ends.get(dep.as_str()), ends.get(task.id.as_str())) {
                    (Some(&from), Some(&to)) => {
                        arrows.push(ArrowGeometry::new(dep.clone(), task.id.clone(), from, to, &params))
                    }
                    _ => debug!("no arrow for {} -> {}", dep, task.id),
                }
            }
        }

        let sidebar = (options.enable_left_sidebar_list && grouped).then(|| Sidebar {
            width: options.sidebar_config.sidebar_width,
            rows: grid::sidebar_rows(&self.groups, config, options),
            visible: true,
            offset: self.scroll.left,
        });

        debug!(
            "rendered '{}': {} bars, {} arrows, {} ticks",
            config.view_mode.key,
            bars.len(),
            arrows.len(),
            config.dates.len()
        );
        self.scene = Scene {
            view_mode: config.view_mode.key.clone(),
            width: grid.width,
            height: grid.height,
            upper_header_height: options.upper_header_height,
            lower_header_height: options.lower_header_height,
            side_header: side_header(options, &config.view_mode.key),
            grid,
            bars,
            arrows,
            sidebar,
            highlighters: Highlighters::default(),
            adjust: AdjustHint::Hidden,
            current_upper: None,
        };
        self.set_scroll_position(target, ScrollBehavior::Instant)
    }
}

fn validate(specs: &[TaskSpec], groups: &[Group], lang: &str) -> (Vec<Task>, Vec<ValidationError>) {
    let (tasks, rejected) = accept_tasks(specs, groups);
    for err in &rejected {
        warn!("{}", i18n::translate(err.i18n_key(), lang, &err.i18n_params()));
    }
    (tasks, rejected)
}

fn endpoints(bars: &[BarGeometry]) -> HashMap<&str, Endpoint> {
    bars.iter()
        .map(|b| {
            (
                b.task_id.as_str(),
                Endpoint {
                    rect: b.rect,
                    index: b.index,
                },
            )
        })
        .collect()
}

fn side_header(options: &GanttOptions, current: &str) -> SideHeader {
    let lang = options.language.as_str();
    let view_modes = if options.view_mode_select {
        options
            .view_modes
            .iter()
            .filter_map(|key| ViewMode::builtin(key))
            .map(|mode| ViewModeOption {
                label: i18n::translate(&mode.name, lang, &[]),
                selected: mode.key == current,
                key: mode.key,
            })
            .collect()
    } else {
        Vec::new()
    };
    SideHeader {
        today_button: options
            .today_button
            .then(|| i18n::translate("Today", lang, &[])),
        mode_label: i18n::translate("Mode", lang, &[]),
        view_modes,
    }
}

fn empty_scene(config: &GanttConfig) -> Scene {
    Scene {
        view_mode: config.view_mode.key.clone(),
        width: 0.0,
        height: 0.0,
        upper_header_height: 0.0,
        lower_header_height: 0.0,
        grid: GridGeometry {
            width: 0.0,
            height: 0.0,
            header_height: config.header_height,
            rows: Vec::new(),
            row_lines: Vec::new(),
            ticks: Vec::new(),
            holidays: Vec::new(),
            today_x: None,
            header: Vec::new(),
            today_cell: None,
            date_highlight: None,
        },
        bars: Vec::new(),
        arrows: Vec::new(),
        side_header: SideHeader::default(),
        sidebar: None,
        highlighters: Highlighters::default(),
        adjust: AdjustHint::Hidden,
        current_upper: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_utils::parse_datetime;
    use crate::layout::{ApproxMeasure, LabelPlacement, Route};
    use crate::options::ViewModeOverride;
    use serde_json::json;
    use std::time::Duration;

    fn dt(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    fn chart(tasks: Vec<TaskSpec>, groups: Vec<Group>, options: GanttOptions) -> Gantt {
        let viewport = Viewport::new(900.0, 400.0).unwrap();
        Gantt::with_clock(viewport, GanttData::new(tasks, groups), options, || {
            parse_datetime("2024-01-05 10:00").unwrap()
        })
        .unwrap()
    }

    fn sample() -> Vec<TaskSpec> {
        vec![
            TaskSpec::new("a", "Design", "2024-01-01", "2024-01-03"),
            TaskSpec::new("b", "Build", "2024-01-04", "2024-01-10").with_dependencies(&["a"]),
            TaskSpec::new("c", "Ship", "2024-01-11", "2024-01-12").with_dependencies(&["b"]),
        ]
    }

    #[test]
    fn construction_renders_and_emits_view_change() {
        let mut gantt = chart(sample(), vec![], GanttOptions::default());
        assert_eq!(gantt.scene().bars.len(), 3);
        assert_eq!(gantt.scene().arrows.len(), 2);
        assert_eq!(gantt.get_current_view_mode(), "day");
        let events = gantt.drain_events();
        assert_eq!(events, vec![GanttEvent::ViewChange { mode: "day".into() }]);
        assert!(gantt.take_scroll_request().is_some());
    }

    #[test]
    fn arrows_run_from_dependency_to_dependent() {
        let gantt = chart(sample(), vec![], GanttOptions::default());
        let arrow = &gantt.scene().arrows[0];
        assert_eq!((arrow.from_id.as_str(), arrow.to_id.as_str()), ("a", "b"));
        assert_eq!(arrow.route, Route::Forward);
    }

    #[test]
    fn invalid_view_mode_is_an_error() {
        let mut gantt = chart(sample(), vec![], GanttOptions::default());
        let err = gantt.change_view_mode("decade", ScrollTarget::Today).unwrap_err();
        assert!(matches!(err, GanttError::InvalidViewMode(name) if name == "decade"));
        assert_eq!(gantt.get_current_view_mode(), "day");
    }

    #[test]
    fn rejected_tasks_are_reported() {
        let mut specs = sample();
        specs.push(TaskSpec::new("z", "Bad", "2024-01-05", "2024-01-01"));
        let gantt = chart(specs, vec![], GanttOptions::default());
        assert_eq!(gantt.tasks().len(), 3);
        assert_eq!(
            gantt.rejected(),
            &[ValidationError::EndNotAfterStart { id: "z".into() }]
        );
    }

    #[test]
    fn clicks_emit_events() {
        let mut specs = sample();
        specs.push(
            TaskSpec::new("off", "Blocked", "2024-01-02", "2024-01-04")
                .with_kind(crate::model::TaskKind::Disabled),
        );
        let mut gantt = chart(specs, vec![], GanttOptions::default());
        gantt.drain_events();
        assert!(gantt.click_bar("b"));
        assert!(!gantt.click_bar("off"));
        assert!(!gantt.click_bar("nope"));
        let bar = gantt.get_bar("c").unwrap().rect;
        assert!(gantt.click_at(bar.mid_x(), bar.mid_y()));
        let names: Vec<_> = gantt.drain_events().iter().map(GanttEvent::name).collect();
        assert_eq!(names, vec!["bar-click", "bar-click"]);
    }

    #[test]
    fn sidebar_rows_emit_side_click() {
        let groups = vec![Group::new("dev", "Development"), Group::new("ops", "Operations")];
        let specs = vec![
            TaskSpec::new("a", "A", "2024-01-01", "2024-01-03").with_group("ops"),
            TaskSpec::new("b", "B", "2024-01-02", "2024-01-05").with_group("dev"),
        ];
        let options = GanttOptions {
            enable_left_sidebar_list: true,
            ..Default::default()
        };
        let mut gantt = chart(specs, groups, options);
        gantt.drain_events();
        assert_eq!(gantt.get_bar("a").unwrap().index, 1);
        let row = gantt.scene().sidebar.as_ref().unwrap().rows[1].rect;
        assert!(gantt.click_at(row.mid_x(), row.mid_y()));
        match gantt.drain_events().as_slice() {
            [GanttEvent::SideClick { group }] => assert_eq!(group.key, "ops"),
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn sticky_sidebar_reappears_after_scrolling_stops() {
        let groups = vec![Group::new("dev", "Development")];
        let specs = vec![TaskSpec::new("a", "A", "2024-01-01", "2024-01-03").with_group("dev")];
        let options = GanttOptions {
            enable_left_sidebar_list: true,
            ..Default::default()
        };
        let mut gantt = chart(specs, groups, options);
        let t0 = Instant::now();
        gantt.on_scroll(120.0, t0);
        assert!(!gantt.scene().sidebar.as_ref().unwrap().visible);
        assert!(!gantt.tick(t0 + Duration::from_millis(100)));
        assert!(gantt.tick(t0 + Duration::from_millis(250)));
        let sidebar = gantt.scene().sidebar.as_ref().unwrap();
        assert!(sidebar.visible);
        assert_eq!(sidebar.offset, 120.0);
    }

    #[test]
    fn highlight_survives_rerender() {
        let mut gantt = chart(sample(), vec![], GanttOptions::default());
        gantt.highlight_dates(dt("2024-01-02"), dt("2024-01-03"));
        assert!(gantt.is_highlighting_dates());
        gantt.change_view_mode("week", ScrollTarget::Start).unwrap();
        assert!(gantt.scene().grid.date_highlight.is_some());
        gantt.reset_highlight_dates();
        assert!(gantt.scene().grid.date_highlight.is_none());
        assert!(!gantt.is_highlighting_dates());
    }

    #[test]
    fn reposition_reroutes_arrows() {
        let mut gantt = chart(sample(), vec![], GanttOptions::default());
        let before = gantt.scene().arrows[0].clone();
        assert!(gantt.reposition_bar("b", 0.0));
        let after = &gantt.scene().arrows[0];
        assert_eq!(after.route, Route::Backward);
        assert_ne!(after.segments, before.segments);
        assert!(!gantt.reposition_bar("ghost", 10.0));
    }

    #[test]
    fn closure_of_dependents() {
        let gantt = chart(sample(), vec![], GanttOptions::default());
        let mut all = gantt.dependents_of("a");
        all.sort();
        assert_eq!(all, vec!["b", "c"]);
    }

    #[test]
    fn reflow_places_labels() {
        let mut gantt = chart(sample(), vec![], GanttOptions::default());
        gantt.measure_and_reflow(&ApproxMeasure::default());
        let a = gantt.get_bar("a").unwrap();
        assert_eq!(a.label.placement, LabelPlacement::Inside);
        assert!(gantt.scene().grid.header.iter().any(|c| c.upper_width.is_some()));
    }

    #[test]
    fn update_options_merges_and_rerenders() {
        let mut gantt = chart(sample(), vec![], GanttOptions::default());
        gantt.update_options(&json!({ "bar_height": 20, "language": "de" })).unwrap();
        assert_eq!(gantt.get_bar("a").unwrap().rect.height, 20.0);
        assert_eq!(gantt.scene().side_header.today_button.as_deref(), Some("Heute"));
        assert!(gantt.update_options(&json!({ "bar_height": "tall" })).is_err());
        assert_eq!(gantt.options().bar_height, 20.0);
    }

    #[test]
    fn view_mode_select_lists_translated_modes() {
        let options = GanttOptions {
            view_mode_select: true,
            view_modes: vec!["day".into(), "week".into(), "bogus".into()],
            language: "fr".into(),
            ..Default::default()
        };
        let gantt = chart(sample(), vec![], options);
        let modes = &gantt.scene().side_header.view_modes;
        assert_eq!(modes.len(), 2);
        assert_eq!(modes[0].label, "Jour");
        assert!(modes[0].selected);
        assert_eq!(modes[1].label, "Semaine");
    }

    #[test]
    fn scroll_tracks_current_date_and_adjust_hint() {
        let mut options = GanttOptions::default();
        options.view_mode_overrides.insert(
            "day".into(),
            ViewModeOverride {
                padding: Some("60d".into()),
                ..Default::default()
            },
        );
        let mut gantt = chart(sample(), vec![], options);
        gantt.on_scroll(0.0, Instant::now());
        assert_eq!(gantt.get_current_date(), Some(dt("2023-11-12")));
        assert_eq!(gantt.scene().adjust, AdjustHint::ScrollToMin);
        let last = gantt.scene().bars.iter().map(|b| b.rect.end_x()).fold(0.0, f32::max);
        gantt.on_scroll(last + 150.0, Instant::now());
        assert_eq!(gantt.scene().adjust, AdjustHint::ScrollToMax);
    }
}
