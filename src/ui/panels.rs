use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::color::to_hex_color;
use crate::data::aggregate::CategoryField;
use crate::data::filter::BatchFilter;
use crate::data::loader::SourceSpec;
use crate::data::view::top_n_bounds;
use crate::state::{AppState, Tab};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Copy what we need so we can mutate state below.
    let cohorts = dataset.cohorts.clone();
    let controls = state.config.controls.clone();
    let (org_lo, org_hi) = top_n_bounds(dataset, CategoryField::Organization, controls.min_top_n);
    let (course_lo, course_hi) = top_n_bounds(dataset, CategoryField::Course, controls.min_top_n);
    let per_cohort: Vec<(String, usize)> = cohorts
        .iter()
        .map(|c| (c.clone(), dataset.records.iter().filter(|r| r.cohort == *c).count()))
        .collect();
    let total = dataset.len();
    let drops = dataset.drops.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Batch selector ----
            ui.strong("Select Batch");
            egui::ComboBox::from_id_salt("batch")
                .selected_text(state.filter.batch.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut state.filter.batch, BatchFilter::All, "All");
                    for label in &cohorts {
                        ui.selectable_value(
                            &mut state.filter.batch,
                            BatchFilter::Cohort(label.clone()),
                            label,
                        );
                    }
                });
            ui.add_space(8.0);

            // ---- Top-N and histogram sliders ----
            ui.add(
                Slider::new(&mut state.filter.top_organizations, org_lo..=org_hi)
                    .text("Top Organizations"),
            );
            ui.add(Slider::new(&mut state.filter.top_courses, course_lo..=course_hi).text("Top Courses"));
            ui.add(
                Slider::new(&mut state.filter.bins, controls.min_bins..=controls.max_bins)
                    .text("Histogram Bins"),
            );

            ui.horizontal(|ui: &mut Ui| {
                ui.label("Bin colour");
                ui.color_edit_button_srgba(&mut state.bin_color);
                ui.monospace(to_hex_color(state.bin_color));
            });
            ui.separator();

            // ---- Dataset statistics ----
            egui::CollapsingHeader::new(RichText::new("Dataset").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.label(format!("{total} records loaded"));
                    for (cohort, n) in &per_cohort {
                        ui.label(format!("  {cohort}: {n}"));
                    }
                    if drops.total == 0 {
                        ui.label("No rows dropped");
                    } else {
                        ui.label(format!("{} rows dropped", drops.total));
                        for (reason, n) in &drops.by_reason {
                            ui.label(RichText::new(format!("  {n} × {reason}")).weak());
                        }
                    }
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
            if ui.button("Open workbook…").clicked() {
                open_workbook_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open CSV sources…").clicked() {
                open_csv_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(src) = &state.source {
            ui.label(src.describe());
        }
        if let Some(ds) = &state.dataset {
            ui.label(format!("{} records, {} dropped", ds.len(), ds.drops.total));
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – tabs of charts
// ---------------------------------------------------------------------------

/// Render the tab strip and the active chart with its table.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a marks workbook to begin  (File → Open workbook…)");
        });
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Organizations, "📊 Top Organizations");
        ui.selectable_value(&mut state.tab, Tab::Histogram, "📈 Marks Histogram");
        ui.selectable_value(&mut state.tab, Tab::Courses, "📘 Top Courses");
    });
    ui.separator();

    let tab = state.tab;
    let bin_color = state.bin_color;
    let Some(view) = state.view() else {
        return;
    };
    if view.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No records match the current filters.");
        });
        return;
    }

    let chart_height = ui.available_height() * 0.6;
    match tab {
        Tab::Organizations => {
            ui.heading("Top Organizations by Count");
            plot::category_pie(ui, "org_pie", &view.organizations, chart_height);
            table::category_table(ui, CategoryField::Organization.title(), &view.organizations);
        }
        Tab::Histogram => {
            ui.heading("Marks Distribution Histogram");
            plot::marks_histogram(ui, &view.histogram, bin_color, chart_height);
            table::histogram_table(ui, &view.histogram);
        }
        Tab::Courses => {
            ui.heading("Top Courses by Count");
            plot::category_pie(ui, "course_pie", &view.courses, chart_height);
            table::category_table(ui, CategoryField::Course.title(), &view.courses);
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_workbook_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open marks workbook")
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xls", "xlsb", "ods"])
        .pick_file();

    if let Some(path) = file {
        state.open(SourceSpec::Workbook(path));
    }
}

/// Pick one CSV file per cohort; files are used in name order.
pub fn open_csv_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Open cohort CSV files")
        .add_filter("CSV", &["csv"])
        .pick_files();

    if let Some(mut paths) = files {
        paths.sort();
        match SourceSpec::from_paths(paths) {
            Ok(spec) => state.open(spec),
            Err(e) => {
                log::error!("{e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
