use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::HourRange;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – the two controls
// ---------------------------------------------------------------------------

/// Render the control panel: feature selector and hour-range sliders.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    let columns = dataset.analysis_columns();
    let total = dataset.len();
    let fraud = dataset.fraud_count();

    // ---- Feature selector for the histogram ----
    ui.strong("Histogram feature");
    let current = state.controls.selected_feature.clone();
    let mut chosen: Option<String> = None;
    egui::ComboBox::from_id_salt("histogram_feature")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &columns {
                if ui.selectable_label(current == *col, col).clicked() {
                    chosen = Some(col.clone());
                }
            }
        });
    if let Some(col) = chosen {
        state.set_feature(col);
    }

    ui.separator();

    // ---- Hour-of-day range ----
    ui.strong("Hour range");
    let mut low = state.controls.hour_range.low;
    let mut high = state.controls.hour_range.high;

    let low_changed = ui
        .add(egui::Slider::new(&mut low, 0..=23).text("from"))
        .changed();
    let high_changed = ui
        .add(egui::Slider::new(&mut high, 0..=23).text("to"))
        .changed();

    if low_changed || high_changed {
        // Dragging one handle past the other moves both together.
        if low > high {
            if low_changed {
                high = low;
            } else {
                low = high;
            }
        }
        state.set_hour_range(HourRange::new(low, high));
    }

    ui.separator();

    // ---- Dataset summary ----
    ui.label(format!("{total} transactions loaded"));
    ui.label(format!("{fraud} labeled fraudulent"));
    if let Some(outputs) = &state.outputs {
        ui.label(format!("{} in selected hours", outputs.temporal.total_count()));
    }
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

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} transactions, {} fraudulent, {} features",
                ds.len(),
                ds.fraud_count(),
                ds.feature_names.len()
            ));
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
        .set_title("Open transaction data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} transactions with features {:?}",
                    dataset.len(),
                    dataset.feature_names
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
