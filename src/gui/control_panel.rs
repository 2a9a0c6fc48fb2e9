//! Control Panel Widget
//! Left side panel with the dataset picker, date-range sliders and export.

use crate::data::{DateBounds, DateRange};
use chrono::{Duration, NaiveDate};
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Left side control panel with file selection and the date-range filter.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    bounds: Option<DateBounds>,
    /// Days after `bounds.min`.
    start_offset: i64,
    end_offset: i64,
    pub row_count: usize,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            bounds: None,
            start_offset: 0,
            end_offset: 0,
            row_count: 0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer the full date span of a freshly loaded dataset.
    pub fn set_bounds(&mut self, bounds: DateBounds) {
        self.bounds = Some(bounds);
        self.start_offset = 0;
        self.end_offset = bounds.span_days();
    }

    pub fn clear_bounds(&mut self) {
        self.bounds = None;
        self.export_enabled = false;
    }

    /// Range currently selected by the sliders.
    pub fn selected_range(&self) -> Option<DateRange> {
        let bounds = self.bounds?;
        let range = DateRange::new(
            bounds.min + Duration::days(self.start_offset),
            bounds.min + Duration::days(self.end_offset),
        );
        Some(range.clamp_to(bounds))
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn date_slider(ui: &mut egui::Ui, value: &mut i64, bounds: DateBounds) -> bool {
        let min = bounds.min;
        ui.add(
            egui::Slider::new(value, 0..=bounds.span_days())
                .custom_formatter(move |v, _| (min + Duration::days(v as i64)).to_string())
                .custom_parser(move |s| {
                    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                        .ok()
                        .map(|d| (d - min).num_days() as f64)
                }),
        )
        .changed()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚴 Bike Sharing")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Rental dashboard").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.bounds.is_some() {
                            ui.visuals().text_color()
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Date Range Section =====
        ui.label(RichText::new("📅 Date Range").size(14.0).strong());
        ui.add_space(5.0);

        match self.bounds {
            Some(bounds) => {
                ui.label(
                    RichText::new(format!("Dataset: {} to {}", bounds.min, bounds.max))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                ui.add_space(5.0);

                ui.label("Start date:");
                if Self::date_slider(ui, &mut self.start_offset, bounds) {
                    action = ControlPanelAction::RangeChanged;
                }
                ui.label("End date:");
                if Self::date_slider(ui, &mut self.end_offset, bounds) {
                    action = ControlPanelAction::RangeChanged;
                }

                if self.start_offset > self.end_offset {
                    ui.label(
                        RichText::new("Start date is after end date")
                            .size(11.0)
                            .color(Color32::from_rgb(255, 193, 7)),
                    );
                }

                ui.add_space(5.0);
                if ui.small_button("Reset to full range").clicked() {
                    self.set_bounds(bounds);
                    action = ControlPanelAction::RangeChanged;
                }
            }
            None => {
                ui.label(RichText::new("No data loaded").color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("💾 Export Report").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Export;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        if self.bounds.is_some() {
            ui.label(RichText::new(format!("{} rows in range", self.row_count)).size(11.0));
        }

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    RangeChanged,
    Export,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_bounds_select_full_range() {
        let bounds = DateBounds {
            min: date(2011, 1, 1),
            max: date(2012, 12, 31),
        };
        let mut panel = ControlPanel::new();
        assert_eq!(panel.selected_range(), None);

        panel.set_bounds(bounds);
        assert_eq!(panel.selected_range(), Some(DateRange::full(bounds)));

        panel.clear_bounds();
        assert_eq!(panel.selected_range(), None);
    }

    #[test]
    fn test_offsets_past_bounds_are_clamped() {
        let bounds = DateBounds {
            min: date(2011, 1, 1),
            max: date(2011, 12, 31),
        };
        let mut panel = ControlPanel::new();
        panel.set_bounds(bounds);
        panel.start_offset = -30;
        panel.end_offset = bounds.span_days() + 45;

        assert_eq!(panel.selected_range(), Some(DateRange::full(bounds)));
    }
}
