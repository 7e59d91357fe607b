mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::GamesDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load()?;
    log::info!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Games Market Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(GamesDashboardApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
