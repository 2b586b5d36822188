//! Layout engine for interactive Gantt charts.
//!
//! [`Gantt`] validates tasks, resolves a time scale for the chosen view mode
//! and builds a [`Scene`]: bars, dependency arrows, the date grid and its
//! headers. Hosts paint the scene themselves or serialize it to SVG.

pub mod date_utils;
pub mod error;
pub mod gantt;
pub mod i18n;
pub mod io;
pub mod layout;
pub mod model;
pub mod options;
pub mod scene;
pub mod view_mode;

pub use error::{GanttError, ValidationError};
pub use gantt::{Gantt, GanttEvent};
pub use layout::{
    ApproxMeasure, Rect, ScrollBehavior, ScrollRequest, ScrollTarget, TextMeasure, Viewport,
};
pub use model::{GanttData, Group, Task, TaskSpec};
pub use options::GanttOptions;
pub use scene::Scene;
pub use view_mode::ViewMode;
