use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::slice_palette;
use crate::data::aggregate::{CategoryCount, HistogramBin};

const ROW_HEIGHT: f32 = 18.0;

/// Ranked counts next to a pie: swatch-coloured label, count, share.
pub fn category_table(ui: &mut Ui, title: &str, counts: &[CategoryCount]) {
    let total: usize = counts.iter().map(|c| c.count).sum();
    let colors = slice_palette(counts.len());

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::remainder())
        .column(Column::auto())
        .column(Column::auto())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong(title);
            });
            header.col(|ui| {
                ui.strong("Count");
            });
            header.col(|ui| {
                ui.strong("Share");
            });
        })
        .body(|mut body| {
            for (rank, (c, color)) in counts.iter().zip(colors).enumerate() {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.label(format!("{}", rank + 1));
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&c.label).color(color));
                    });
                    row.col(|ui| {
                        ui.label(c.count.to_string());
                    });
                    row.col(|ui| {
                        let share = if total == 0 {
                            0.0
                        } else {
                            c.count as f64 / total as f64 * 100.0
                        };
                        ui.label(format!("{share:.1}%"));
                    });
                });
            }
        });
}

/// One row per histogram bin.
pub fn histogram_table(ui: &mut Ui, bins: &[HistogramBin]) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder())
        .column(Column::auto())
        .column(Column::auto())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            header.col(|ui| {
                ui.strong("Marks Range");
            });
            header.col(|ui| {
                ui.strong("Students");
            });
            header.col(|ui| {
                ui.strong("Percentage");
            });
        })
        .body(|mut body| {
            for bin in bins {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.label(&bin.label);
                    });
                    row.col(|ui| {
                        ui.label(bin.count.to_string());
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.1}%", bin.percentage));
                    });
                });
            }
        });
}
