#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod cli;
mod ui;

use clap::Parser;
use gantt_svg::Gantt;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gantt_svg=info")),
        )
        .init();

    let cli = cli::Cli::parse();
    if let Some(out) = &cli.export {
        return cli::export(&cli, out);
    }

    let data = cli.load_data()?.unwrap_or_else(app::GanttApp::sample_data);
    let gantt = Gantt::new(cli.viewport()?, data.clone(), cli.resolve_options()?)?;
    let file_path = cli.input.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cli.width, cli.height])
            .with_min_inner_size([640.0, 360.0])
            .with_title("Gantt SVG"),
        ..Default::default()
    };

    eframe::run_native(
        "Gantt SVG",
        options,
        Box::new(move |cc| Ok(Box::new(app::GanttApp::new(cc, gantt, data, file_path)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
