use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use spectra_formatter::profile::Instrument;

use crate::color::trace_color;
use crate::state::{AppState, StatusKind};

// ---------------------------------------------------------------------------
// Left side panel – loaded files and extracted data
// ---------------------------------------------------------------------------

/// Render the left panel: file list, skipped files, and the data table.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Files");
    ui.separator();

    if state.spectra.is_empty() && state.failures.is_empty() {
        ui.label("No files loaded.");
        return;
    }

    let count = state.spectra.len();
    let mut to_remove = None;
    for (idx, sp) in state.spectra.iter().enumerate() {
        ui.horizontal(|ui: &mut Ui| {
            if ui.small_button("✕").on_hover_text("Remove").clicked() {
                to_remove = Some(idx);
            }
            let text = RichText::new(&sp.name).color(trace_color(idx, count));
            if ui
                .selectable_label(state.selected == Some(idx), text)
                .clicked()
            {
                state.selected = Some(idx);
            }
        });
    }
    if let Some(idx) = to_remove {
        state.remove(idx);
    }

    if !state.failures.is_empty() {
        ui.separator();
        ui.strong("Skipped");
        for (name, reason) in &state.failures {
            ui.label(RichText::new(format!("{name}: {reason}")).color(Color32::RED));
        }
    }

    ui.separator();
    data_table(ui, state);
}

/// X/Y table of the selected spectrum.
fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(sp) = state.selected.and_then(|i| state.spectra.get(i)) else {
        return;
    };

    ui.strong(format!("{}  ({} points)", sp.name, sp.len()));
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(80.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong(&state.profile.x_header);
                });
                header.col(|ui| {
                    ui.strong(&state.profile.y_header);
                });
            })
            .body(|body| {
                body.rows(18.0, sp.len(), |mut row| {
                    let i = row.index();
                    row.col(|ui| {
                        ui.label(format!("{}", sp.x[i]));
                    });
                    row.col(|ui| {
                        ui.label(format!("{}", sp.y[i]));
                    });
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.spectra.is_empty(), egui::Button::new("Export .xlsx…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load profile…").clicked() {
                load_profile_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Clear").clicked() {
                state.clear();
                ui.close_menu();
            }
        });

        ui.separator();

        let mut instrument = state.instrument;
        egui::ComboBox::from_id_salt("instrument")
            .selected_text(state.profile.title.clone())
            .show_ui(ui, |ui: &mut Ui| {
                for inst in Instrument::ALL {
                    ui.selectable_value(&mut instrument, inst, inst.to_string());
                }
            });
        if instrument != state.instrument {
            state.set_instrument(instrument);
        }

        ui.separator();

        if !state.spectra.is_empty() {
            ui.label(format!("{} file(s) loaded", state.spectra.len()));
            ui.separator();
        }

        if let Some(status) = &state.status {
            let color = match status.kind {
                StatusKind::Info => ui.visuals().text_color(),
                StatusKind::Warning => ui.visuals().warn_fg_color,
                StatusKind::Error => Color32::RED,
            };
            ui.label(RichText::new(&status.text).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open JASCO text exports")
        .add_filter("Text export", &["txt", "TXT"])
        .pick_files();

    if let Some(paths) = files {
        state.open_paths(paths.as_slice());
    }
}

pub fn export_dialog(state: &mut AppState) {
    let target = rfd::FileDialog::new()
        .set_title("Save Excel workbook")
        .set_file_name(state.default_export_name())
        .add_filter("Excel workbook", &["xlsx"])
        .save_file();

    if let Some(path) = target {
        if let Err(e) = state.export_to(&path) {
            log::error!("Export failed: {e:#}");
            state.set_status(StatusKind::Error, format!("Error: {e:#}"));
        }
    }
}

pub fn load_profile_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Load chart profile")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load_profile(&path) {
            log::error!("Failed to load profile: {e:#}");
            state.set_status(StatusKind::Error, format!("Error: {e:#}"));
        }
    }
}
