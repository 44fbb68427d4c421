use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::color::trace_color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Spectral plot (central panel)
// ---------------------------------------------------------------------------

/// Render the preview plot in the central panel.
pub fn spectral_plot(ui: &mut Ui, state: &AppState) {
    if state.spectra.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open JASCO .txt exports to preview them  (File → Open…)");
        });
        return;
    }

    let profile = &state.profile;
    let reversed = profile.x_reversed;
    let sign = if reversed { -1.0 } else { 1.0 };
    let (x_min, x_max) = profile.x_range(&state.spectra);
    let y_bounds = profile.y_range(&state.spectra);

    let mut plot = Plot::new("spectral_plot")
        .legend(Legend::default())
        .x_axis_label(profile.x_axis_name.clone())
        .y_axis_label(profile.y_axis_name.clone())
        .include_x(sign * x_min)
        .include_x(sign * x_max)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if reversed {
        // Mirrored data: show the original values on the ticks.
        plot = plot.x_axis_formatter(|mark, _range| format!("{}", -mark.value));
    }
    if let Some(min) = y_bounds.min {
        plot = plot.include_y(min);
    }
    if let Some(max) = y_bounds.max {
        plot = plot.include_y(max);
    }

    let traces = state.traces();
    let count = traces.len();

    plot.show(ui, |plot_ui| {
        for (idx, trace) in traces.into_iter().enumerate() {
            let points: PlotPoints = trace.points.into_iter().collect();
            let line = Line::new(points)
                .name(&trace.name)
                .color(trace_color(idx, count))
                .width(1.5);
            plot_ui.line(line);
        }
    });
}
