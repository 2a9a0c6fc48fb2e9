//! Bike Sharing Dashboard - Rental data exploration viewer
//!
//! Usage: `bike_dashboard [DATASET_PATH]`

use bike_dashboard::config::DashboardConfig;
use bike_dashboard::gui::DashboardApp;
use bike_dashboard::logging;
use eframe::egui;
use tracing::info;

fn main() -> anyhow::Result<()> {
    logging::init()?;

    let config = match DashboardConfig::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(e) => e.exit(),
    };
    info!(dataset = %config.dataset_path.display(), "starting dashboard");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Bike Sharing Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Bike Sharing Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {}", e))
}
