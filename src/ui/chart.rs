use std::time::Instant;

use egui::{Align2, Color32, Id, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};
use gantt_svg::layout::{self, BarGeometry, BarStyle, LabelPlacement, TextMeasure};
use gantt_svg::{Gantt, ScrollBehavior, ScrollRequest};

use crate::ui::theme;

const SCROLL_ANIMATION_SECS: f32 = 0.35;

#[derive(Debug, Clone)]
struct DragSnapshot {
    start_x: f32,
    start_pointer_x: f32,
}

/// Result details from interactions in the chart.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// A bar dropped at a new column: `(task id, x)`.
    pub moved: Option<(String, f32)>,
}

/// Label widths measured with the egui font system.
pub struct EguiMeasure<'a> {
    pub ctx: &'a egui::Context,
    pub font: egui::FontId,
}

impl TextMeasure for EguiMeasure<'_> {
    fn text_width(&self, text: &str) -> f32 {
        self.ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(text.to_owned(), self.font.clone(), Color32::PLACEHOLDER)
                .size()
                .x
        })
    }
}

enum Action {
    Click(String),
    Drag(String, f32),
    Drop(String, f32),
    Hover(f32, f32),
    Leave,
    ClickAt(f32, f32),
}

/// Render the chart scene inside a scroll area and feed interactions back
/// into the engine.
pub fn show_chart(gantt: &mut Gantt, goal: &mut Option<ScrollRequest>, ui: &mut Ui) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    if let Some(request) = gantt.take_scroll_request() {
        *goal = Some(request);
    }

    let anim_id = Id::new("gantt-scroll-x");
    let mut area = egui::ScrollArea::both().auto_shrink([false, false]);
    match *goal {
        Some(request) => {
            let secs = match request.behavior {
                ScrollBehavior::Smooth => SCROLL_ANIMATION_SECS,
                ScrollBehavior::Auto | ScrollBehavior::Instant => 0.0,
            };
            let x = ui.ctx().animate_value_with_time(anim_id, request.left, secs);
            area = area.horizontal_scroll_offset(x);
            if (x - request.left).abs() < 0.5 {
                *goal = None;
            }
        }
        None => {
            ui.ctx().animate_value_with_time(anim_id, gantt.scroll_left(), 0.0);
        }
    }

    let mut actions = Vec::new();
    let output = area.show(ui, |ui| paint_scene(gantt, ui, &mut actions));

    let cw = gantt.config().column_width;
    for action in actions {
        match action {
            Action::Click(id) => {
                gantt.click_bar(&id);
            }
            Action::Drag(id, x) => {
                gantt.reposition_bar(&id, x);
            }
            Action::Drop(id, x) => {
                let snapped = (x / cw).round() * cw;
                gantt.reposition_bar(&id, snapped);
                interaction.moved = Some((id, snapped));
            }
            Action::Hover(x, y) => gantt.pointer_moved(x, y),
            Action::Leave => gantt.pointer_left(),
            Action::ClickAt(x, y) => {
                gantt.click_at(x, y);
            }
        }
    }

    let now = Instant::now();
    let left = output.state.offset.x;
    if left != gantt.scroll_left() || gantt.get_current_date().is_none() {
        gantt.on_scroll(left, now);
    }
    if gantt.tick(now) {
        ui.ctx().request_repaint();
    }
    if let Some(deadline) = gantt.next_deadline() {
        ui.ctx()
            .request_repaint_after(deadline.saturating_duration_since(now));
    }

    let hint = gantt.scene().adjust;
    if let Some(target) = hint.target() {
        let header = gantt.scene().grid.header_height;
        let button_rect = Rect::from_min_size(
            output.inner_rect.left_top() + Vec2::new(8.0, header + 8.0),
            Vec2::splat(28.0),
        );
        if ui.put(button_rect, egui::Button::new(hint.glyph())).clicked() {
            gantt.set_scroll_position(target, ScrollBehavior::Smooth);
        }
    }

    interaction
}

fn paint_scene(gantt: &Gantt, ui: &mut Ui, actions: &mut Vec<Action>) {
    let scene = gantt.scene();
    let grid = &scene.grid;
    let (response, painter) = ui.allocate_painter(Vec2::new(scene.width, scene.height), Sense::click());
    let origin = response.rect.min;
    let at = |x: f32, y: f32| origin + Vec2::new(x, y);
    let to_screen =
        |r: &layout::Rect| Rect::from_min_size(at(r.x, r.y), Vec2::new(r.width, r.height));

    painter.rect_filled(response.rect, 0.0, theme::BG_CHART);

    // Grid
    for y in &grid.row_lines {
        painter.line_segment([at(0.0, *y), at(grid.width, *y)], Stroke::new(1.0, theme::ROW_LINE));
    }
    for band in &grid.holidays {
        let color = theme::color_or(Some(&band.color), theme::BG_PANEL);
        painter.rect_filled(to_screen(&band.rect), 0.0, color);
    }
    if let Some(rect) = &grid.date_highlight {
        painter.rect_filled(to_screen(rect), 0.0, theme::DATE_HIGHLIGHT);
    }
    for rect in [scene.highlighters.column, scene.highlighters.row].iter().flatten() {
        painter.rect_filled(to_screen(rect), 0.0, theme::POINTER_HIGHLIGHT);
    }
    for tick in &grid.ticks {
        let stroke = if tick.thick {
            Stroke::new(0.8, theme::TICK_THICK)
        } else {
            Stroke::new(0.4, theme::TICK)
        };
        painter.line_segment([at(tick.x, grid.header_height), at(tick.x, grid.height)], stroke);
    }

    // Header
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(grid.width, grid.header_height)),
        0.0,
        theme::BG_HEADER,
    );
    for (i, cell) in grid.header.iter().enumerate() {
        if !cell.lower_text.is_empty() {
            let pos = at(cell.x + 4.0, cell.lower_y);
            if grid.today_cell == Some(i) {
                let galley =
                    painter.layout_no_wrap(cell.lower_text.clone(), theme::font_lower(), Color32::WHITE);
                let badge = Rect::from_min_size(pos, galley.size()).expand(3.0);
                painter.rect_filled(badge, Rounding::same(4.0), theme::TODAY_BADGE);
                painter.galley(pos, galley, Color32::WHITE);
            } else {
                painter.text(pos, Align2::LEFT_TOP, &cell.lower_text, theme::font_lower(), theme::TEXT_SECONDARY);
            }
        }
        if !cell.upper_text.is_empty() {
            let color = if scene.current_upper == Some(i) {
                theme::TEXT_PRIMARY
            } else {
                theme::TEXT_SECONDARY
            };
            painter.text(
                at(cell.x + 4.0, cell.upper_y),
                Align2::LEFT_CENTER,
                &cell.upper_text,
                theme::font_upper(),
                color,
            );
        }
    }

    // Arrows
    for arrow in &scene.arrows {
        for line in arrow.polylines() {
            let points: Vec<Pos2> = line.iter().map(|p| at(p[0], p[1])).collect();
            painter.add(Shape::line(points, Stroke::new(1.4, theme::ARROW)));
        }
    }

    // Bars
    for bar in &scene.bars {
        let rect = to_screen(&bar.rect);
        paint_bar(&painter, bar, rect, at(bar.label.x, bar.label.y));
        if let Some(thumb) = &bar.thumbnail {
            painter.rect_filled(
                Rect::from_min_size(at(thumb.x, thumb.y), Vec2::splat(thumb.size)),
                Rounding::same(thumb.size / 2.0),
                theme::BORDER_SUBTLE,
            );
        }

        let id = ui.make_persistent_id(("gantt-bar", &bar.task_id));
        let sense = if bar.is_interactive() {
            Sense::click_and_drag()
        } else {
            Sense::hover()
        };
        let response = ui.interact(rect, id, sense);
        if response.clicked() {
            actions.push(Action::Click(bar.task_id.clone()));
        }
        let ptr_x = response.interact_pointer_pos().map(|p| p.x).unwrap_or(0.0);
        if response.drag_started() {
            ui.ctx().data_mut(|data| {
                data.insert_temp(
                    id,
                    DragSnapshot {
                        start_x: bar.rect.x,
                        start_pointer_x: ptr_x,
                    },
                );
            });
        }
        if response.dragged() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
            if let Some(snapshot) = ui.ctx().data(|data| data.get_temp::<DragSnapshot>(id)) {
                let x = snapshot.start_x + ptr_x - snapshot.start_pointer_x;
                actions.push(Action::Drag(bar.task_id.clone(), x));
            }
        }
        if response.drag_stopped() {
            let snapshot = ui.ctx().data_mut(|data| {
                let snapshot = data.get_temp::<DragSnapshot>(id);
                data.remove::<DragSnapshot>(id);
                snapshot
            });
            // The pointer may already be gone on release; the preview x is current.
            if snapshot.is_some() {
                actions.push(Action::Drop(bar.task_id.clone(), bar.rect.x));
            }
        }

        if response.hovered() {
            if let Some(task) = gantt.tasks().iter().find(|t| t.id == bar.task_id) {
                egui::show_tooltip_at_pointer(
                    ui.ctx(),
                    ui.layer_id(),
                    Id::new(("bar-tip", &bar.task_id)),
                    |ui| {
                        ui.strong(&task.name);
                        ui.label(format!(
                            "{} - {}",
                            task.start.format("%d %b %Y"),
                            task.end.format("%d %b %Y")
                        ));
                        ui.label(format!("Progress: {:.0}%", task.progress));
                    },
                );
            }
        }
    }

    if let Some(x) = grid.today_x {
        painter.rect_filled(
            Rect::from_min_size(at(x, 0.0), Vec2::new(1.0, grid.height)),
            0.0,
            theme::TODAY_LINE,
        );
    }

    // Sidebar
    if let Some(sidebar) = scene.sidebar.as_ref().filter(|s| s.visible) {
        let shift = |r: &layout::Rect| to_screen(r).translate(Vec2::new(sidebar.offset, 0.0));
        painter.rect_filled(
            Rect::from_min_size(at(sidebar.offset, 0.0), Vec2::new(sidebar.width, scene.height)),
            0.0,
            theme::BG_CHART,
        );
        for row in &sidebar.rows {
            let rect = shift(&row.rect);
            painter.rect_stroke(rect, 0.0, Stroke::new(1.0, theme::BORDER_SUBTLE));
            painter.text(
                rect.left_center() + Vec2::new(10.0, 0.0),
                Align2::LEFT_CENTER,
                &row.label,
                theme::font_bar(),
                theme::TEXT_PRIMARY,
            );
        }
    }

    match response.hover_pos() {
        Some(pos) => {
            let local = pos - origin;
            actions.push(Action::Hover(local.x, local.y));
        }
        None if scene.highlighters.column.is_some() => actions.push(Action::Leave),
        None => {}
    }
    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let local = pos - origin;
            actions.push(Action::ClickAt(local.x, local.y));
        }
    }
}

fn paint_bar(painter: &egui::Painter, bar: &BarGeometry, rect: Rect, label_pos: Pos2) {
    let rounding = match &bar.style {
        BarStyle::Regular {
            corner_radius,
            color,
        } => {
            let fill = theme::color_or(color.as_deref(), theme::BAR);
            painter.rect_filled(rect, Rounding::same(*corner_radius), fill);
            Rounding::same(*corner_radius)
        }
        BarStyle::Hatched => {
            painter.rect_filled(rect, 0.0, theme::BAR);
            let clipped = painter.with_clip_rect(rect);
            let mut k = -rect.height();
            while k < rect.width() {
                clipped.line_segment(
                    [
                        Pos2::new(rect.left() + k, rect.bottom()),
                        Pos2::new(rect.left() + k + rect.height(), rect.top()),
                    ],
                    Stroke::new(0.6, theme::BAR_HATCH),
                );
                k += theme::HATCH_SPACING;
            }
            Rounding::ZERO
        }
    };

    if bar.progress > 0.0 {
        let progress = Rect::from_min_size(rect.min, Vec2::new(bar.progress_width(), rect.height()));
        painter.rect_filled(progress, rounding, theme::BAR_PROGRESS);
    }

    let (anchor, color) = match bar.label.placement {
        LabelPlacement::Hidden => return,
        LabelPlacement::Pending => (Align2::CENTER_CENTER, theme::TEXT_PRIMARY),
        LabelPlacement::Inside => (Align2::LEFT_CENTER, theme::TEXT_PRIMARY),
        LabelPlacement::Outside => (Align2::LEFT_CENTER, theme::TEXT_SECONDARY),
    };
    painter.text(label_pos, anchor, &bar.label.text, theme::font_bar(), color);
}
