use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct SpectraFormatterApp {
    pub state: AppState,
}

impl SpectraFormatterApp {
    /// Start with files given on the command line already loaded.
    pub fn with_paths(paths: &[std::path::PathBuf]) -> Self {
        let mut app = Self::default();
        if !paths.is_empty() {
            app.state.open_paths(paths);
        }
        app
    }
}

impl eframe::App for SpectraFormatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Files dropped onto the window ----
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.state.open_paths(dropped.as_slice());
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: files and data table ----
        egui::SidePanel::left("file_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::spectral_plot(ui, &self.state);
        });
    }
}
