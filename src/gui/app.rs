//! Dashboard Main Application
//! Main window with control panel and chart viewer.
//!
//! Everything runs on the UI thread: a range change re-filters the table
//! and recomputes every aggregate before the next frame is drawn.

use crate::config::DashboardConfig;
use crate::data::{DataLoader, Dataset};
use crate::gui::format::{month_label, season_label};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::report::DashboardSnapshot;
use egui::{Color32, RichText, SidePanel};
use std::path::Path;
use tracing::{error, info, warn};

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    /// Loaded once per session, replaced only by picking another file.
    dataset: Option<Dataset>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    /// Shown instead of the dashboard when loading or computing fails.
    error: Option<String>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            chart_viewer: ChartViewer::new(config.currency.clone(), config.top_n),
            control_panel: ControlPanel::new(),
            dataset: None,
            error: None,
            config,
        };

        let path = app.config.dataset_path.clone();
        app.load_dataset(&path);
        app
    }

    /// Load a dataset and render the full date range.
    fn load_dataset(&mut self, path: &Path) {
        self.control_panel.csv_path = Some(path.to_path_buf());
        self.chart_viewer.clear();

        match DataLoader::load_csv(path) {
            Ok(dataset) => {
                self.control_panel.set_bounds(dataset.bounds());
                self.control_panel.set_status(format!(
                    "Loaded {} rows, {} columns",
                    dataset.get_row_count(),
                    dataset.get_columns().len()
                ));
                self.dataset = Some(dataset);
                self.error = None;
                self.recompute();
            }
            Err(e) => {
                error!(path = %path.display(), "failed to load dataset: {}", e);
                self.dataset = None;
                self.control_panel.clear_bounds();
                self.control_panel.set_status(format!("Error: {}", e));
                self.error = Some(e.to_string());
            }
        }
    }

    /// Filter and aggregate for the selected range.
    fn recompute(&mut self) {
        let (Some(dataset), Some(range)) = (&self.dataset, self.control_panel.selected_range())
        else {
            return;
        };

        match DashboardSnapshot::compute(dataset.get_dataframe(), range, self.config.best_season) {
            Ok(snapshot) => {
                self.control_panel.row_count = snapshot.row_count;
                self.control_panel.export_enabled = !snapshot.is_empty();
                self.chart_viewer.set_snapshot(snapshot);
                self.error = None;
            }
            Err(e) => {
                error!("failed to compute dashboard: {}", e);
                self.chart_viewer.clear();
                self.control_panel.export_enabled = false;
                self.control_panel.set_status(format!("Error: {}", e));
                self.error = Some(e.to_string());
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.load_dataset(&path);
        }
    }

    /// Write the chart images and report.json into a chosen folder.
    fn handle_export(&mut self) {
        let Some(snapshot) = &self.chart_viewer.snapshot else {
            self.control_panel.set_status("Nothing to export");
            return;
        };

        let mut dialog = rfd::FileDialog::new();
        if let Some(parent) = self
            .dataset
            .as_ref()
            .and_then(|d| d.get_file_path())
            .and_then(|p| p.parent())
        {
            dialog = dialog.set_directory(parent);
        }
        let Some(dir) = dialog.pick_folder() else {
            return; // User cancelled
        };

        match snapshot.export(&dir, season_label, month_label) {
            Ok(files) => {
                info!(dir = %dir.display(), files = files.len(), "exported report");
                self.control_panel.set_status(format!(
                    "Exported report and {} charts",
                    files.len().saturating_sub(1)
                ));
                if let Err(e) = open::that(&dir) {
                    warn!("could not open export folder: {}", e);
                }
            }
            Err(e) => {
                error!(dir = %dir.display(), "export failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::RangeChanged => self.recompute(),
                        ControlPanelAction::Export => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard, or the error that prevented it
        egui::CentralPanel::default().show(ctx, |ui| match &self.error {
            Some(message) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format!("⚠ {}", message))
                            .size(16.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                });
            }
            None => self.chart_viewer.show(ui),
        });
    }
}
