use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Polygon};

use crate::color::slice_palette;
use crate::data::aggregate::{CategoryCount, HistogramBin};

/// Arc resolution of a full circle.
const CIRCLE_SEGMENTS: usize = 180;

// ---------------------------------------------------------------------------
// Pie geometry
// ---------------------------------------------------------------------------

/// One slice of a pie, angles in radians counter-clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    /// Share of the pie, 0..=1.
    pub fraction: f64,
    pub start: f64,
    pub end: f64,
}

/// Lay out `counts` as consecutive slices covering the full circle.
pub fn pie_slices(counts: &[CategoryCount]) -> Vec<PieSlice> {
    let total: usize = counts.iter().map(|c| c.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut start = 0.0;
    counts
        .iter()
        .map(|c| {
            let fraction = c.count as f64 / total as f64;
            let end = start + fraction * TAU;
            let slice = PieSlice {
                label: c.label.clone(),
                count: c.count,
                fraction,
                start,
                end,
            };
            start = end;
            slice
        })
        .collect()
}

/// Outline of a slice: centre, then points along the arc.
fn slice_outline(slice: &PieSlice) -> Vec<[f64; 2]> {
    let sweep = slice.end - slice.start;
    let steps = ((sweep / TAU) * CIRCLE_SEGMENTS as f64).ceil().max(1.0) as usize;

    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for i in 0..=steps {
        // Start at 12 o'clock, go clockwise like a spreadsheet pie.
        let angle = slice.start + sweep * i as f64 / steps as f64;
        points.push([angle.sin(), angle.cos()]);
    }
    points
}

// ---------------------------------------------------------------------------
// Pie chart (top organizations / top courses)
// ---------------------------------------------------------------------------

/// Render a ranked category count as a pie; the legend carries each share.
pub fn category_pie(ui: &mut Ui, id: &str, counts: &[CategoryCount], height: f32) {
    let slices = pie_slices(counts);
    let colors = slice_palette(slices.len());

    Plot::new(id)
        .height(height)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (slice, color) in slices.iter().zip(colors) {
                let points: PlotPoints = slice_outline(slice).into_iter().collect();
                let name = format!("{}: {:.1}%", slice.label, slice.fraction * 100.0);
                plot_ui.polygon(
                    Polygon::new(points)
                        .name(name)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Marks histogram
// ---------------------------------------------------------------------------

/// Render the histogram as one bar per bin, labelled with its marks range.
pub fn marks_histogram(ui: &mut Ui, bins: &[HistogramBin], color: Color32, height: f32) {
    let bars: Vec<Bar> = bins
        .iter()
        .enumerate()
        .map(|(i, bin)| Bar::new(i as f64, bin.count as f64).name(&bin.label).width(0.9))
        .collect();

    let labels: Vec<String> = bins.iter().map(|b| b.label.clone()).collect();
    let percentages: Vec<f64> = bins.iter().map(|b| b.percentage).collect();

    let chart = BarChart::new(bars)
        .color(color)
        .name("Students")
        .element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
            let pct = percentages
                .get(bar.argument.round() as usize)
                .copied()
                .unwrap_or(0.0);
            format!(
                "{} Marks: {} students\nPercentage: {pct:.1}%",
                bar.name, bar.value
            )
        }));

    Plot::new("marks_histogram")
        .height(height)
        .x_axis_label("Marks Range")
        .y_axis_label("Number of Students")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            bin_tick_label(&labels, mark.value)
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Label for an x-axis tick: the bin label at integral positions, blank
/// elsewhere.
fn bin_tick_label(labels: &[String], value: f64) -> String {
    let i = value.round();
    if (value - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(label: &str, count: usize) -> CategoryCount {
        CategoryCount {
            label: label.into(),
            count,
        }
    }

    #[test]
    fn slices_cover_the_circle_in_rank_order() {
        let slices = pie_slices(&[count("A", 2), count("B", 1), count("C", 1)]);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].label, "A");
        assert!((slices[0].fraction - 0.5).abs() < 1e-12);
        assert_eq!(slices[0].start, 0.0);
        for w in slices.windows(2) {
            assert_eq!(w[0].end, w[1].start);
        }
        assert!((slices[2].end - TAU).abs() < 1e-9);
    }

    #[test]
    fn no_counts_no_slices() {
        assert!(pie_slices(&[]).is_empty());
    }

    #[test]
    fn outline_starts_at_centre_and_stays_on_unit_circle() {
        let slices = pie_slices(&[count("A", 1), count("B", 3)]);
        let outline = slice_outline(&slices[0]);
        assert_eq!(outline[0], [0.0, 0.0]);
        // First arc point is 12 o'clock.
        assert!((outline[1][0]).abs() < 1e-12 && (outline[1][1] - 1.0).abs() < 1e-12);
        for p in &outline[1..] {
            assert!(((p[0] * p[0] + p[1] * p[1]).sqrt() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn ticks_only_at_bin_positions() {
        let labels = vec!["10-25".to_string(), "25-40".to_string()];
        assert_eq!(bin_tick_label(&labels, 0.0), "10-25");
        assert_eq!(bin_tick_label(&labels, 1.0), "25-40");
        assert_eq!(bin_tick_label(&labels, 0.5), "");
        assert_eq!(bin_tick_label(&labels, 2.0), "");
        assert_eq!(bin_tick_label(&labels, -1.0), "");
    }
}
