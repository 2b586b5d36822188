//! CLI argument definitions and the headless export path.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use gantt_svg::io::{file, svg};
use gantt_svg::{Gantt, GanttData, GanttOptions, ScrollTarget, Viewport};

#[derive(Debug, Parser)]
#[command(name = "gantt-svg", version, about = "Render Gantt charts to SVG or view them")]
pub struct Cli {
    /// Chart data: a JSON file (`{"tasks": [...], "groups": [...]}`) or a CSV task list.
    pub input: Option<PathBuf>,

    /// View mode: hour, qday, hday, day, week, month or year.
    #[arg(long)]
    pub view: Option<String>,

    /// Write the chart to this SVG file instead of opening the viewer.
    #[arg(long, value_name = "OUT.svg")]
    pub export: Option<PathBuf>,

    /// Options JSON merged over the defaults, replacing the user settings file.
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 720.0)]
    pub height: f32,

    /// Initial scroll target: start, end, today, min, max or a date.
    #[arg(long)]
    pub scroll: Option<ScrollTarget>,
}

impl Cli {
    /// Options from `--options` or the user settings, with CLI overrides applied.
    pub fn resolve_options(&self) -> anyhow::Result<GanttOptions> {
        let mut options = match &self.options {
            Some(path) => GanttOptions::load(path)
                .with_context(|| format!("reading options from {}", path.display()))?,
            None => GanttOptions::load_user_settings(),
        };
        if let Some(view) = &self.view {
            options.view_mode = view.clone();
        }
        if let Some(scroll) = self.scroll {
            options.scroll_to = scroll;
        }
        Ok(options)
    }

    pub fn load_data(&self) -> anyhow::Result<Option<GanttData>> {
        self.input
            .as_ref()
            .map(|path| {
                file::load_any(path).with_context(|| format!("loading {}", path.display()))
            })
            .transpose()
    }

    pub fn viewport(&self) -> anyhow::Result<Viewport> {
        Ok(Viewport::new(self.width, self.height)?)
    }
}

/// Render `cli.input` headlessly into `out`.
pub fn export(cli: &Cli, out: &PathBuf) -> anyhow::Result<()> {
    let Some(data) = cli.load_data()? else {
        bail!("an INPUT file is required with --export");
    };
    let mut gantt = Gantt::new(cli.viewport()?, data, cli.resolve_options()?)?;
    if !gantt.rejected().is_empty() {
        tracing::warn!("{} tasks were skipped", gantt.rejected().len());
    }
    svg::export_svg(&mut gantt, out).with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use gantt_svg::ScrollTarget;

    #[test]
    fn parses_export_invocation() {
        let cli = Cli::parse_from([
            "gantt-svg", "plan.json", "--view", "week", "--export", "out.svg", "--scroll", "start",
        ]);
        assert_eq!(cli.input.as_deref(), Some(std::path::Path::new("plan.json")));
        assert_eq!(cli.view.as_deref(), Some("week"));
        assert_eq!(cli.scroll, Some(ScrollTarget::Start));
        assert_eq!(cli.width, 1280.0);
    }

    #[test]
    fn cli_overrides_options() {
        let cli = Cli::parse_from(["gantt-svg", "--view", "month", "--scroll", "2024-03-01"]);
        let options = cli.resolve_options().unwrap();
        assert_eq!(options.view_mode, "month");
        assert!(matches!(options.scroll_to, ScrollTarget::Date(_)));
    }

    #[test]
    fn rejects_bad_viewport() {
        let cli = Cli::parse_from(["gantt-svg", "--width", "0"]);
        assert!(cli.viewport().is_err());
    }
}
