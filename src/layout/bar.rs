//! Bar geometry and label placement.
//!
//! Bars are built in two phases: [`BarGeometry::build`] places the rectangle
//! and a provisional centered label, then [`BarGeometry::reflow`] adjusts the
//! label once its rendered width is known.

use super::{GanttConfig, Rect};
use crate::model::{Group, Task, TaskKind};
use crate::options::GanttOptions;

const LABEL_PADDING: f32 = 5.0;
const THUMBNAIL_INSET: (f32, f32) = (10.0, 2.0);

/// Measures rendered text so labels can be reflowed.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f32;
}

/// Width estimate for hosts without a text layout engine.
#[derive(Debug, Clone, Copy)]
pub struct ApproxMeasure {
    pub font_size: f32,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        Self { font_size: 12.0 }
    }
}

impl TextMeasure for ApproxMeasure {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size * 0.6
    }
}

/// Visual style, chosen once from the task kind.
#[derive(Debug, Clone, PartialEq)]
pub enum BarStyle {
    Regular {
        corner_radius: f32,
        color: Option<String>,
    },
    /// Square corners and a diagonal hatch fill.
    Hatched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPlacement {
    /// Not measured yet.
    Pending,
    Inside,
    /// Right of the bar because it overflows.
    Outside,
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarLabel {
    pub text: String,
    /// Left edge of the text.
    pub x: f32,
    /// Vertical center of the text.
    pub y: f32,
    pub width: Option<f32>,
    pub placement: LabelPlacement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub href: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    pub task_id: String,
    pub index: usize,
    pub rect: Rect,
    /// Percent complete, `0..=100`.
    pub progress: f32,
    pub style: BarStyle,
    pub label: BarLabel,
    pub thumbnail: Option<Thumbnail>,
    pub custom_class: Option<String>,
}

impl BarGeometry {
    pub fn build(
        task: &Task,
        group: Option<&Group>,
        config: &GanttConfig,
        options: &GanttOptions,
    ) -> Self {
        let rect = Rect::new(
            config.x_of(task.start),
            config.y_of(task.index),
            config.width_of(task.start, task.end),
            config.bar_height,
        );
        let style = match task.kind {
            TaskKind::Task => BarStyle::Regular {
                corner_radius: options.bar_corner_radius,
                color: task.color.clone(),
            },
            TaskKind::Disabled => BarStyle::Hatched,
        };
        let image_size = config.bar_height - 5.0;
        let thumbnail = task.thumbnail.as_ref().map(|href| Thumbnail {
            href: href.clone(),
            x: rect.x + THUMBNAIL_INSET.0,
            y: rect.y + THUMBNAIL_INSET.1,
            size: image_size,
        });
        let text = match &options.bar_config.get_label {
            Some(get_label) => (get_label.0)(task, group),
            None => task.name.clone(),
        };
        let label_x = match &thumbnail {
            Some(_) => rect.x + image_size + LABEL_PADDING,
            None => rect.mid_x(),
        };
        Self {
            task_id: task.id.clone(),
            index: task.index,
            progress: task.progress,
            style,
            label: BarLabel {
                text,
                x: label_x,
                y: rect.mid_y(),
                width: None,
                placement: LabelPlacement::Pending,
            },
            thumbnail,
            custom_class: task.custom_class.clone(),
            rect,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.style != BarStyle::Hatched
    }

    pub fn progress_width(&self) -> f32 {
        self.rect.width * self.progress / 100.0
    }

    fn image_offset(&self) -> f32 {
        self.thumbnail.as_ref().map_or(0.0, |t| t.size + 10.0)
    }

    /// Place the label now that its width is known.
    pub fn reflow(&mut self, label_width: f32, show_label_on_offset: bool) {
        let rect = self.rect;
        let image_offset = self.image_offset();
        self.label.width = Some(label_width);

        if label_width > rect.width {
            if !show_label_on_offset {
                self.label.placement = LabelPlacement::Hidden;
                return;
            }
            self.label.placement = LabelPlacement::Outside;
            match &mut self.thumbnail {
                Some(thumb) => {
                    thumb.x = rect.end_x() + LABEL_PADDING;
                    self.label.x = rect.end_x() + image_offset;
                }
                None => self.label.x = rect.end_x() + LABEL_PADDING,
            }
        } else {
            self.label.placement = LabelPlacement::Inside;
            match &mut self.thumbnail {
                Some(thumb) => {
                    thumb.x = rect.x + LABEL_PADDING;
                    let free = rect.width - image_offset;
                    self.label.x =
                        rect.x + image_offset + ((free - label_width) / 2.0).max(0.0);
                }
                None => self.label.x = rect.mid_x() - label_width / 2.0,
            }
        }
    }

    pub fn measure_and_reflow(&mut self, measure: &dyn TextMeasure, show_label_on_offset: bool) {
        let width = measure.text_width(&self.label.text);
        self.reflow(width, show_label_on_offset);
    }

    /// Slide an inside label along with a horizontal scroll of `dx`.
    ///
    /// The label only moves while its trailing edge stays inside the bar and
    /// on the near side of the viewport center, so it never drifts away.
    pub fn move_label_on_scroll(&mut self, dx: f32, scroll_left: f32, viewport_width: f32) {
        if self.label.placement == LabelPlacement::Outside || dx == 0.0 {
            return;
        }
        let label_width = self.label.width.unwrap_or(0.0);
        let image_width = self.thumbnail.as_ref().map_or(7.0, |t| t.size + 7.0);
        let new_x = self.label.x + dx;
        let label_end = new_x + label_width + 7.0;
        let viewport_center = scroll_left + viewport_width / 2.0;

        let forward = dx > 0.0 && label_end < self.rect.end_x() && label_end < viewport_center;
        let backward = dx < 0.0 && new_x - image_width > self.rect.x && label_end > viewport_center;
        if forward || backward {
            self.label.x = new_x;
            if let Some(thumb) = &mut self.thumbnail {
                thumb.x += dx;
            }
        }
    }

    /// Move the bar horizontally, carrying label and thumbnail along.
    pub fn set_x(&mut self, x: f32) {
        let dx = x - self.rect.x;
        self.rect.x = x;
        self.label.x += dx;
        if let Some(thumb) = &mut self.thumbnail {
            thumb.x += dx;
        }
    }
}
