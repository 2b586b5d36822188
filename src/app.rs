use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use gantt_svg::date_utils::{self, parse_datetime};
use gantt_svg::io::{file, svg};
use gantt_svg::layout::LabelPlacement;
use gantt_svg::model::task::normalize_id;
use gantt_svg::{
    Gantt, GanttData, GanttEvent, GanttOptions, ScrollBehavior, ScrollRequest, ScrollTarget,
    TaskSpec, Viewport,
};

use crate::ui;
use crate::ui::chart::EguiMeasure;

/// Main application state.
pub struct GanttApp {
    pub gantt: Gantt,
    /// Source data, edited by drag-and-drop and saved back to disk.
    pub data: GanttData,
    pub file_path: Option<PathBuf>,
    pub scroll_goal: Option<ScrollRequest>,

    // Dialog state
    pub show_about: bool,
    pub show_highlight: bool,
    pub highlight_start: NaiveDate,
    pub highlight_end: NaiveDate,

    pub status_message: String,
    last_size: Option<egui::Vec2>,
}

impl GanttApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        gantt: Gantt,
        data: GanttData,
        file_path: Option<PathBuf>,
    ) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let today = date_utils::now().date();
        let status_message = match gantt.rejected().len() {
            0 => "Ready".to_string(),
            n => format!("{} tasks skipped, see log", n),
        };
        Self {
            gantt,
            data,
            file_path,
            scroll_goal: None,
            show_about: false,
            show_highlight: false,
            highlight_start: today,
            highlight_end: today + Duration::days(7),
            status_message,
            last_size: None,
        }
    }

    /// Demonstration chart around the current date.
    pub fn sample_data() -> GanttData {
        let today = date_utils::now().date();
        let day = |offset: i64| (today + Duration::days(offset)).format("%Y-%m-%d").to_string();
        GanttData::new(
            vec![
                TaskSpec::new("kickoff", "Project Kickoff", day(-5), day(-2)).with_progress(100.0),
                TaskSpec::new("requirements", "Requirements", day(-2), day(5))
                    .with_progress(60.0)
                    .with_dependencies(&["kickoff"]),
                TaskSpec::new("design", "UI Design", day(6), day(18)).with_dependencies(&["requirements"]),
                TaskSpec::new("backend", "Backend Development", day(6), day(28))
                    .with_progress(10.0)
                    .with_dependencies(&["requirements"]),
                TaskSpec::new("qa", "Testing & QA", day(22), day(30))
                    .with_dependencies(&["design", "backend"]),
                TaskSpec::new("launch", "Launch", day(31), day(32)).with_dependencies(&["qa"]),
            ],
            vec![],
        )
    }

    // --- File operations ---

    pub fn open_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Chart", &["json", "csv"])
            .pick_file()
        else {
            return;
        };
        match file::load_any(&path) {
            Ok(data) => {
                self.gantt.refresh(data.tasks.clone(), data.groups.clone());
                self.data = data;
                self.file_path = Some(path);
                self.status_message = match self.gantt.rejected().len() {
                    0 => format!("Loaded {} tasks", self.gantt.tasks().len()),
                    n => format!("Loaded {} tasks ({} skipped)", self.gantt.tasks().len(), n),
                };
            }
            Err(e) => self.status_message = format!("Error loading: {}", e),
        }
    }

    pub fn save_file(&mut self) {
        match self.file_path.clone().filter(|p| !is_csv(p)) {
            Some(path) => self.write_data(path),
            None => self.save_file_as(),
        }
    }

    pub fn save_file_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Chart", &["json"])
            .set_file_name("chart.json")
            .save_file()
        {
            self.write_data(path);
        }
    }

    fn write_data(&mut self, path: PathBuf) {
        match file::save_data(&self.data, &path) {
            Ok(()) => {
                self.status_message = format!("Saved {}", path.display());
                self.file_path = Some(path);
            }
            Err(e) => self.status_message = format!("Error saving: {}", e),
        }
    }

    pub fn export_svg(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG Image", &["svg"])
            .set_file_name("chart.svg")
            .save_file()
        else {
            return;
        };
        match svg::export_svg(&mut self.gantt, &path) {
            Ok(()) => self.status_message = format!("Exported {}", path.display()),
            Err(e) => self.status_message = format!("SVG export failed: {}", e),
        }
        // The export measured labels with approximate metrics.
        self.last_size = None;
    }

    pub fn open_settings_folder(&mut self) {
        let Some(dir) = GanttOptions::settings_path().and_then(|p| p.parent().map(PathBuf::from))
        else {
            self.status_message = "No settings folder on this platform".to_string();
            return;
        };
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
            self.status_message = format!("Couldn't open {}: {}", dir.display(), e);
        }
    }

    // --- Chart operations ---

    pub fn change_view_mode(&mut self, key: &str) {
        let target = self
            .gantt
            .get_current_date()
            .map_or(ScrollTarget::Today, ScrollTarget::Date);
        if let Err(e) = self.gantt.change_view_mode(key, target) {
            self.status_message = e.to_string();
        }
    }

    pub fn scroll_to(&mut self, target: ScrollTarget) {
        self.gantt.set_scroll_position(target, ScrollBehavior::Smooth);
    }

    /// Persist a dropped bar by shifting its task's dates.
    fn move_task(&mut self, id: &str, x: f32) {
        let Some(task) = self.gantt.tasks().iter().find(|t| t.id == id) else {
            return;
        };
        let delta = self.gantt.config().date_at(x) - task.start;
        let name = task.name.clone();
        let spec = self
            .data
            .tasks
            .iter_mut()
            .find(|s| s.id.as_deref().map(normalize_id).as_deref() == Some(id));
        let Some(spec) = spec else {
            tracing::debug!("task '{}' has a generated id, move not persisted", id);
            return;
        };
        let shift = |value: &mut Option<String>| {
            if let Some(date) = value.as_deref().and_then(parse_datetime) {
                *value = Some((date + delta).format("%Y-%m-%d %H:%M").to_string());
            }
        };
        shift(&mut spec.start);
        shift(&mut spec.end);
        let start = spec.start.clone().unwrap_or_default();
        self.gantt.refresh(self.data.tasks.clone(), self.data.groups.clone());
        self.status_message = format!("Moved '{}' to {}", name, start);
    }

    fn handle_events(&mut self) {
        for event in self.gantt.drain_events() {
            tracing::debug!("{}", event.name());
            self.status_message = match event {
                GanttEvent::BarClick { task } => format!(
                    "{}: {} - {}",
                    task.name,
                    task.start.format("%Y-%m-%d"),
                    task.end.format("%Y-%m-%d")
                ),
                GanttEvent::ViewChange { mode } => format!("View: {}", mode),
                GanttEvent::SideClick { group } => format!("Group: {}", group.name),
            };
        }
    }

    /// Keep the engine's viewport in sync with the panel and measure labels
    /// whenever a render left them unplaced.
    fn sync_layout(&mut self, ui: &egui::Ui) {
        let size = ui.available_size();
        if self.last_size != Some(size) {
            if let Ok(viewport) = Viewport::new(size.x, size.y) {
                self.gantt.resize(viewport);
            }
            self.last_size = Some(size);
        }
        let pending = self
            .gantt
            .scene()
            .bars
            .iter()
            .any(|b| b.label.placement == LabelPlacement::Pending);
        if pending {
            let measure = EguiMeasure {
                ctx: ui.ctx(),
                font: ui::theme::font_bar(),
            };
            self.gantt.measure_and_reflow(&measure);
        }
    }
}

fn is_csv(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle keyboard shortcuts outside closures to avoid borrow issues
        let should_open = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::O));
        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        if should_open {
            self.open_file();
        }
        if should_save {
            self.save_file();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let current = self
                            .gantt
                            .get_current_date()
                            .map(|d| d.format("%Y-%m-%d").to_string())
                            .unwrap_or_default();
                        ui.label(
                            egui::RichText::new(format!(
                                "Tasks: {}  ·  {}  ·  {}",
                                self.gantt.tasks().len(),
                                self.gantt.get_current_view_mode(),
                                current
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_CHART)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            self.sync_layout(ui);
            let interaction = ui::chart::show_chart(&mut self.gantt, &mut self.scroll_goal, ui);
            if let Some((id, x)) = interaction.moved {
                self.move_task(&id, x);
            }
        });

        self.handle_events();

        if self.show_highlight {
            ui::dialogs::show_highlight_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
    }
}
