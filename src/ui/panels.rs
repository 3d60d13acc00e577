use std::collections::BTreeSet;
use std::fmt::Display;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{Grade, Major, Semester};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered, only if the file exists) ----
    if let Some(uri) = &state.logo_uri {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(uri.as_str())
                    .max_width(ui.available_width() * 0.9)
                    .max_height(160.0)
                    .rounding(4.0),
            );
        });
        ui.add_space(4.0);
    }
    ui.separator();

    ui.heading(RichText::new("Filter").strong());

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Edit a copy so the state only recomputes on an actual change.
    let mut selection = state.selection.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            multiselect(ui, "Sort by Academic Term", Semester::ALL, &mut selection.semesters);
            multiselect(ui, "Sort by Major:", Major::ALL, &mut selection.majors);
            multiselect(ui, "Sort by Grade", Grade::ALL, &mut selection.grades);
            ui.separator();
        });

    state.set_selection(selection);
}

/// One collapsible group of checkboxes with All / None shortcuts.
fn multiselect<T>(ui: &mut Ui, title: &str, options: &[T], selected: &mut BTreeSet<T>)
where
    T: Copy + Ord + Display,
{
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    selected.extend(options.iter().copied());
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                }
            });

            for &value in options {
                let mut checked = selected.contains(&value);
                if ui.checkbox(&mut checked, value.to_string()).changed() {
                    if checked {
                        selected.insert(value);
                    } else {
                        selected.remove(&value);
                    }
                }
            }
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
        });

        ui.separator();

        if let (Some(ds), Some(summary)) = (&state.dataset, &state.summary) {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                summary.record_count
            ));
        }
        if let Some(path) = &state.source_path {
            ui.separator();
            ui.label(RichText::new(path.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open classroom data")
        .add_filter("Supported files", &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"])
        .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("OpenDocument", &["ods"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state
            .load(&path)
            .with_context(|| format!("opening {}", path.display()))
        {
            log::error!("{e:#}");
        }
    }
}
