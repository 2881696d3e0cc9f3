mod engine;
mod model;
mod ui;

use anyhow::{anyhow, Context};
use eframe::egui;

use crate::engine::storage::FileStore;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let dir = FileStore::default_dir();
    let store = FileStore::new(&dir)
        .with_context(|| format!("opening data directory {}", dir.display()))?;
    log::info!("data directory {}", dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("WeDart")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "WeDart",
        options,
        Box::new(|_cc| {
            Ok(Box::new(ui::app::WeDartApp::new(store)))
        }),
    )
    .map_err(|e| anyhow!("eframe: {e}"))
}
