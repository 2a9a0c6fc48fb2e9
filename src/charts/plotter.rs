//! Chart Plotter Module
//! Draws the dashboard's interactive bar, line and pie charts with egui_plot.

use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};
use std::f32::consts::TAU;

/// Bar fill shared by every bar chart.
pub const BAR_COLOR: Color32 = Color32::from_rgb(114, 188, 212);

/// Slice colors for pie charts.
pub const PALETTE: [Color32; 12] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(96, 125, 139),  // Blue Grey
    Color32::from_rgb(205, 220, 57),  // Lime
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(26, 188, 156),  // Teal
];

/// Largest angle covered by one convex wedge of a pie slice.
const MAX_WEDGE: f32 = 0.1;

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for the i-th slice.
    pub fn slice_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Category axis: points sit at x = 0, 1, 2... and carry their label.
    fn category_label(labels: &[String], value: f64) -> String {
        if value < 0.0 || (value - value.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(value.round() as usize).cloned().unwrap_or_default()
    }

    /// Draw a vertical bar chart, one bar per labelled value.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        id: &str,
        x_label: &str,
        y_label: &str,
        data: &[(String, f64)],
        height: f32,
    ) {
        let labels: Vec<String> = data.iter().map(|(l, _)| l.clone()).collect();

        Plot::new(id)
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = data
                    .iter()
                    .enumerate()
                    .map(|(i, (label, value))| Bar::new(i as f64, *value).width(0.6).name(label))
                    .collect();

                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name(y_label));
            });
    }

    /// Draw a line chart with a marker on every point.
    pub fn draw_line_chart(
        ui: &mut egui::Ui,
        id: &str,
        x_label: &str,
        y_label: &str,
        data: &[(String, f64)],
        height: f32,
    ) {
        let labels: Vec<String> = data.iter().map(|(l, _)| l.clone()).collect();

        Plot::new(id)
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                let points: Vec<[f64; 2]> = data
                    .iter()
                    .enumerate()
                    .map(|(i, (_, v))| [i as f64, *v])
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(PALETTE[0])
                        .width(2.0)
                        .name(y_label),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(PALETTE[0]),
                );
            });
    }

    /// Draw a pie chart from percentage shares, with a legend on the right.
    pub fn draw_pie_chart(ui: &mut egui::Ui, shares: &[(String, f64)], diameter: f32) {
        let total: f64 = shares.iter().map(|(_, v)| v).sum();
        if total <= 0.0 {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        }

        ui.horizontal(|ui| {
            let (rect, _) =
                ui.allocate_exact_size(egui::vec2(diameter, diameter), egui::Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = diameter / 2.0 - 4.0;

            // Start at 12 o'clock, clockwise
            let mut start = -TAU / 4.0;
            for (i, (_, share)) in shares.iter().enumerate() {
                let sweep = (share / total) as f32 * TAU;
                let color = Self::slice_color(i);

                // Each wedge stays below 180 degrees so it is convex
                let steps = ((sweep / MAX_WEDGE).ceil() as usize).max(1);
                for s in 0..steps {
                    let a0 = start + sweep * s as f32 / steps as f32;
                    let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                    let wedge = vec![
                        center,
                        center + radius * egui::Vec2::angled(a0),
                        center + radius * egui::Vec2::angled(a1),
                    ];
                    painter.add(egui::Shape::convex_polygon(wedge, color, egui::Stroke::NONE));
                }
                start += sweep;
            }

            ui.add_space(12.0);

            ui.vertical(|ui| {
                for (i, (label, share)) in shares.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 3.0, Self::slice_color(i));
                        ui.label(RichText::new(format!("{}  {:.1}%", label, share)).size(13.0));
                    });
                }
            });
        });
    }

    /// Draw a two-column value table.
    pub fn draw_value_table(
        ui: &mut egui::Ui,
        id: &str,
        headers: (&str, &str),
        rows: &[(String, String)],
    ) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(id))
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new(headers.0).strong().size(12.0));
                        ui.label(RichText::new(headers.1).strong().size(12.0));
                        ui.end_row();

                        for (key, value) in rows {
                            ui.label(RichText::new(key).size(12.0));
                            ui.label(RichText::new(value).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
