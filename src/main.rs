mod app;
mod color;
mod state;
mod ui;

use app::SpectraFormatterApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Any arguments are treated as exports to open on start-up.
    let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Spectra Formatter – JASCO IR / UV-vis",
        options,
        Box::new(move |_cc| Ok(Box::new(SpectraFormatterApp::with_paths(&paths)))),
    )
}
