mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Context;
use app::ClassroomDashboardApp;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = config::load_or_default();
    let data_path = config.data_path.clone();

    // Loaded once; filter changes only re-aggregate this table.
    let mut state = AppState::new(config);
    if let Err(e) = state
        .load(&data_path)
        .with_context(|| format!("loading {}", data_path.display()))
    {
        log::error!("{e:#}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Classroom Dashboard",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the logo from disk.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(ClassroomDashboardApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
