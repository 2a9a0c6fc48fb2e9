//! Chart Viewer Widget
//! Right side scrollable panel showing the dashboard sections in a fixed order.

use crate::charts::{chart_points, count_points, ChartPlotter};
use crate::gui::format::{format_currency, month_label, season_label};
use crate::report::DashboardSnapshot;
use crate::stats::{RfmAverages, RfmGroup, RfmMetric, RfmSummary};
use egui::{Color32, RichText, ScrollArea};

const CHART_HEIGHT: f32 = 260.0;
const SMALL_CHART_HEIGHT: f32 = 200.0;
const PIE_DIAMETER: f32 = 260.0;

/// Scrollable dashboard built from the latest snapshot.
pub struct ChartViewer {
    pub snapshot: Option<DashboardSnapshot>,
    currency: String,
    top_n: usize,
}

impl ChartViewer {
    pub fn new(currency: impl Into<String>, top_n: usize) -> Self {
        Self {
            snapshot: None,
            currency: currency.into(),
            top_n,
        }
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
    }

    pub fn set_snapshot(&mut self, snapshot: DashboardSnapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Draw the dashboard, or a placeholder without data.
    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(snapshot) = &self.snapshot else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("Bike Sharing Dataset 🚴").size(26.0).strong());
                ui.label(
                    RichText::new(format!(
                        "{} to {}  ·  {} rows",
                        snapshot.range.start, snapshot.range.end, snapshot.row_count
                    ))
                    .color(Color32::GRAY),
                );

                if snapshot.is_empty() {
                    ui.add_space(20.0);
                    ui.label(RichText::new("No rentals in the selected range").size(16.0));
                    return;
                }

                self.show_best_season(ui, snapshot);
                self.show_season_totals(ui, snapshot);
                self.show_rfm(
                    ui,
                    "RFM Analysis Based on Seasons 🏅",
                    "season_rfm",
                    &snapshot.season_rfm,
                    snapshot.season_averages,
                    false,
                );
                self.show_month_registered(ui, snapshot);
                self.show_rfm(
                    ui,
                    "Best Months Based on RFM Parameters 🏅",
                    "month_rfm",
                    &snapshot.month_rfm,
                    snapshot.month_averages,
                    true,
                );
            });
    }

    fn section_header(ui: &mut egui::Ui, text: &str) {
        ui.add_space(18.0);
        ui.separator();
        ui.label(RichText::new(text).size(18.0).strong());
        ui.add_space(6.0);
    }

    fn caption(ui: &mut egui::Ui, text: String) {
        ui.label(RichText::new(text).size(12.0).italics().color(Color32::GRAY));
    }

    /// Small framed metric: label above a large value.
    fn metric(ui: &mut egui::Ui, label: &str, value: String) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(6.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_min_width(200.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(22.0).strong());
                });
            });
    }

    fn show_best_season(&self, ui: &mut egui::Ui, snapshot: &DashboardSnapshot) {
        Self::section_header(ui, "Rentals in the Best Season 🏅");
        Self::metric(
            ui,
            &format!("Rentals in season {}", season_label(snapshot.best_season)),
            snapshot.best_season_rentals.to_string(),
        );
    }

    fn show_season_totals(&self, ui: &mut egui::Ui, snapshot: &DashboardSnapshot) {
        let points = count_points(&snapshot.season_total, season_label);
        let shares = chart_points(&snapshot.season_share, season_label);

        Self::section_header(ui, "Rentals per Season 🏅");
        ChartPlotter::draw_bar_chart(
            ui,
            "season_total_bar",
            "Season",
            "Rentals",
            &points,
            CHART_HEIGHT,
        );

        let leader = snapshot
            .season_share
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1));
        if let Some((season, share)) = leader {
            Self::caption(
                ui,
                format!(
                    "Season {} leads with {:.1}% of all rentals in the range.",
                    season_label(*season),
                    share
                ),
            );
        }

        Self::section_header(ui, "Share of Rentals per Season 🏅");
        ChartPlotter::draw_pie_chart(ui, &shares, PIE_DIAMETER);

        Self::section_header(ui, "Rentals per Season, Line Chart 🏅");
        ChartPlotter::draw_line_chart(
            ui,
            "season_total_line",
            "Season",
            "Rentals",
            &points,
            CHART_HEIGHT,
        );
    }

    fn show_month_registered(&self, ui: &mut egui::Ui, snapshot: &DashboardSnapshot) {
        let points = count_points(&snapshot.month_registered, month_label);
        let shares = chart_points(&snapshot.month_share, month_label);

        Self::section_header(ui, "Registered Users per Month 🏅");
        let rows: Vec<(String, String)> = snapshot
            .month_registered
            .iter()
            .map(|(&m, &v)| (month_label(m), v.to_string()))
            .collect();
        ChartPlotter::draw_value_table(
            ui,
            "month_registered_table",
            ("Month", "Registered"),
            &rows,
        );

        ui.add_space(8.0);
        ChartPlotter::draw_bar_chart(
            ui,
            "month_registered_bar",
            "Month",
            "Registered users",
            &points,
            CHART_HEIGHT,
        );
        if let Some((month, total)) = snapshot.peak_month {
            Self::caption(
                ui,
                format!("Month {} has the most registered users ({}).", month_label(month), total),
            );
        }

        Self::section_header(ui, "Share of Registered Users per Month 🏅");
        ChartPlotter::draw_pie_chart(ui, &shares, PIE_DIAMETER);

        Self::section_header(ui, "Registered Users per Month, Line Chart 🏅");
        ChartPlotter::draw_line_chart(
            ui,
            "month_registered_line",
            "Month",
            "Registered users",
            &points,
            CHART_HEIGHT,
        );
    }

    /// Averages plus one bar chart per measure. With `ranked`, each chart
    /// shows only the best `top_n` groups in rank order.
    fn show_rfm(
        &self,
        ui: &mut egui::Ui,
        title: &str,
        id: &str,
        summary: &RfmSummary,
        averages: Option<RfmAverages>,
        ranked: bool,
    ) {
        Self::section_header(ui, title);

        ui.horizontal(|ui| match averages {
            Some(avg) => {
                Self::metric(ui, "Average Recency (days)", format!("{:.1}", avg.recency));
                Self::metric(ui, "Average Frequency", format!("{:.2}", avg.frequency));
                Self::metric(ui, "Average Monetary", format_currency(avg.monetary, &self.currency));
            }
            None => {
                ui.label(RichText::new("No groups in range").color(Color32::GRAY));
            }
        });

        let label = |k: i64| match summary.group {
            RfmGroup::Season => season_label(k),
            RfmGroup::Month => month_label(k),
        };

        let measures = [
            (RfmMetric::Recency, "By Recency (days)"),
            (RfmMetric::Frequency, "By Frequency"),
            (RfmMetric::Monetary, "By Monetary"),
        ];

        ui.add_space(8.0);
        ui.columns(3, |columns| {
            for (column, (metric, heading)) in columns.iter_mut().zip(measures) {
                let series = if ranked {
                    summary.top(metric, self.top_n)
                } else {
                    summary.series(metric)
                };
                let points: Vec<(String, f64)> =
                    series.into_iter().map(|(k, v)| (label(k), v as f64)).collect();

                column.label(RichText::new(heading).size(14.0).strong());
                ChartPlotter::draw_bar_chart(
                    column,
                    &format!("{}_{:?}", id, metric),
                    "",
                    heading,
                    &points,
                    SMALL_CHART_HEIGHT,
                );
            }
        });
    }
}
