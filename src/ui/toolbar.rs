use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icon;
use gantt_svg::{i18n, ScrollTarget, ViewMode};

use crate::app::GanttApp;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.button(format!("{}  Open...          Ctrl+O", icon::FOLDER_OPEN)).clicked() {
                app.open_file();
                ui.close_menu();
            }
            if ui.button(format!("{}  Save             Ctrl+S", icon::FLOPPY_DISK)).clicked() {
                app.save_file();
                ui.close_menu();
            }
            if ui.button("      Save As...").clicked() {
                app.save_file_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Export SVG...", icon::EXPORT)).clicked() {
                app.export_svg();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("      Open Settings Folder").clicked() {
                app.open_settings_folder();
                ui.close_menu();
            }
        });

        ui.menu_button("View", |ui| {
            let lang = app.gantt.options().language.clone();
            let current = app.gantt.get_current_view_mode().to_string();
            let keys = app.gantt.options().view_modes.clone();
            for mode in keys.iter().filter_map(|k| ViewMode::builtin(k)) {
                let label = i18n::translate(&mode.name, &lang, &[]);
                if ui.radio(mode.key == current, label).clicked() {
                    app.change_view_mode(&mode.key);
                    ui.close_menu();
                }
            }
            ui.separator();
            if ui.button(format!("{}  Highlight Dates...", icon::CALENDAR_BLANK)).clicked() {
                app.show_highlight = true;
                ui.close_menu();
            }
            if ui
                .add_enabled(app.gantt.is_highlighting_dates(), egui::Button::new("      Clear Highlight"))
                .clicked()
            {
                app.gantt.reset_highlight_dates();
                ui.close_menu();
            }
        });

        ui.menu_button("Help", |ui| {
            if ui.button(format!("{}  About", icon::INFO)).clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();
        show_side_header(app, ui);

        // Right-aligned file name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let name = app
                .file_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "(sample)".to_string());
            ui.label(RichText::new(name).size(11.0).weak());
        });
    });
}

/// "Today" button and view-mode select, as configured in the options.
fn show_side_header(app: &mut GanttApp, ui: &mut Ui) {
    let header = app.gantt.scene().side_header.clone();
    if let Some(label) = &header.today_button {
        if ui.button(format!("{}  {}", icon::CALENDAR_CHECK, label)).clicked() {
            app.scroll_to(ScrollTarget::Today);
        }
    }
    if header.view_modes.is_empty() {
        return;
    }
    let selected = header
        .view_modes
        .iter()
        .find(|m| m.selected)
        .map_or(header.mode_label.clone(), |m| m.label.clone());
    let mut choice = None;
    egui::ComboBox::from_id_salt("view-mode-select")
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for mode in &header.view_modes {
                if ui.selectable_label(mode.selected, &mode.label).clicked() {
                    choice = Some(mode.key.clone());
                }
            }
        });
    if let Some(key) = choice {
        app.change_view_mode(&key);
    }
}
