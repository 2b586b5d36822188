use std::path::Path;

use tracing::info;

use crate::error::GanttError;
use crate::gantt::Gantt;
use crate::layout::ApproxMeasure;

/// Lay out labels with approximate text metrics and serialize the scene.
pub fn render_svg(gantt: &mut Gantt) -> String {
    gantt.measure_and_reflow(&ApproxMeasure::default());
    gantt.scene().to_svg()
}

pub fn export_svg(gantt: &mut Gantt, path: &Path) -> Result<(), GanttError> {
    let svg = render_svg(gantt);
    std::fs::write(path, &svg)?;
    info!(
        "exported '{}' view ({} bars) to {}",
        gantt.get_current_view_mode(),
        gantt.scene().bars.len(),
        path.display()
    );
    Ok(())
}
