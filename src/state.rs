use std::path::Path;

use anyhow::{Context, Result};
use spectra_formatter::data::loader::load_batch;
use spectra_formatter::export;
use spectra_formatter::profile::{ChartProfile, Instrument};
use spectra_formatter::{LoadReport, Spectrum};

// ---------------------------------------------------------------------------
// Preview trace
// ---------------------------------------------------------------------------

/// One line of the preview plot, offset and (optionally) mirrored.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    /// Partial success, e.g. some files skipped.
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded spectra, in the order they were opened.
    pub spectra: Vec<Spectrum>,

    /// Files skipped by the last open, with the reason.
    pub failures: Vec<(String, String)>,

    /// Selected built-in preset (ignored once a custom profile is loaded).
    pub instrument: Instrument,

    /// Active chart profile.
    pub profile: ChartProfile,

    /// Spectrum shown in the data table.
    pub selected: Option<usize>,

    /// Outcome of the last action, shown in the top bar.
    pub status: Option<Status>,
}

impl Default for AppState {
    fn default() -> Self {
        let instrument = Instrument::default();
        Self {
            spectra: Vec::new(),
            failures: Vec::new(),
            instrument,
            profile: instrument.profile(),
            selected: None,
            status: None,
        }
    }
}

impl AppState {
    /// Load files and append the ones that parse.
    pub fn open_paths<P: AsRef<Path>>(&mut self, paths: &[P]) {
        let report = load_batch(paths);
        self.ingest(report);
    }

    /// Append a batch; failures replace the previous batch's.
    pub fn ingest(&mut self, report: LoadReport) {
        let added = report.spectra.len();
        self.spectra.extend(report.spectra);
        self.failures = report.failures;
        if self.selected.is_none() && !self.spectra.is_empty() {
            self.selected = Some(0);
        }
        if self.failures.is_empty() {
            self.set_status(StatusKind::Info, format!("Loaded {added} file(s)"));
        } else {
            let skipped = self.failures.len();
            self.set_status(
                StatusKind::Warning,
                format!("Loaded {added} file(s), skipped {skipped}"),
            );
        }
    }

    /// Drop one spectrum, keeping the table selection on a valid row.
    pub fn remove(&mut self, index: usize) {
        if index >= self.spectra.len() {
            return;
        }
        let removed = self.spectra.remove(index);
        log::info!("Removed {}", removed.name);
        self.selected = match self.selected {
            _ if self.spectra.is_empty() => None,
            Some(sel) if sel > index => Some(sel - 1),
            Some(sel) => Some(sel.min(self.spectra.len() - 1)),
            None => None,
        };
    }

    /// Forget everything that was loaded.
    pub fn clear(&mut self) {
        self.spectra.clear();
        self.failures.clear();
        self.selected = None;
        self.status = None;
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
    }

    /// Switch to a built-in preset.
    pub fn set_instrument(&mut self, instrument: Instrument) {
        self.instrument = instrument;
        self.profile = instrument.profile();
    }

    /// Replace the active profile with one read from JSON.
    pub fn load_profile(&mut self, path: &Path) -> Result<()> {
        self.profile = ChartProfile::from_json_file(path)?;
        log::info!("Using profile {} from {}", self.profile.title, path.display());
        Ok(())
    }

    /// Suggested name for the exported workbook.
    pub fn default_export_name(&self) -> String {
        self.profile.output_file_name_now()
    }

    /// Write the workbook for everything loaded.
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        export::save(&self.spectra, &self.profile, path)
            .with_context(|| format!("exporting {}", path.display()))?;
        self.set_status(StatusKind::Info, format!("Saved {}", path.display()));
        Ok(())
    }

    /// Plot lines with the profile's overlay offsets applied.
    ///
    /// Reversed axes are mirrored (x → -x); the plot relabels the ticks.
    pub fn traces(&self) -> Vec<Trace> {
        let count = self.spectra.len();
        let sign = if self.profile.x_reversed { -1.0 } else { 1.0 };
        self.spectra
            .iter()
            .enumerate()
            .map(|(k, sp)| {
                let offset = self.profile.overlay_offset(k, count);
                Trace {
                    name: sp.name.clone(),
                    points: sp.points().map(|(x, y)| [sign * x, y + offset]).collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(names: &[&str]) -> LoadReport {
        LoadReport {
            spectra: names
                .iter()
                .map(|n| Spectrum::new(*n, vec![1000.0, 2000.0], vec![50.0, 60.0]))
                .collect(),
            failures: Vec::new(),
        }
    }

    #[test]
    fn ir_traces_are_stacked_and_mirrored() {
        let mut state = AppState::default();
        state.set_instrument(Instrument::Ir);
        state.ingest(report(&["a.txt", "b.txt"]));

        let traces = state.traces();
        assert_eq!(traces[0].points, vec![[-1000.0, 90.0], [-2000.0, 100.0]]);
        assert_eq!(traces[1].points, vec![[-1000.0, 50.0], [-2000.0, 60.0]]);
    }

    #[test]
    fn uv_traces_are_untouched() {
        let mut state = AppState::default();
        state.set_instrument(Instrument::UvVis);
        state.ingest(report(&["a.txt", "b.txt"]));

        let traces = state.traces();
        assert_eq!(traces[0].points, vec![[1000.0, 50.0], [2000.0, 60.0]]);
        assert_eq!(traces[0].name, "a.txt");
    }

    #[test]
    fn batches_accumulate_and_failures_reset() {
        let mut state = AppState::default();
        let mut first = report(&["a.txt"]);
        first.failures.push(("bad.txt".into(), "no XYDATA".into()));
        state.ingest(first);
        assert_eq!(state.failures.len(), 1);

        state.ingest(report(&["b.txt"]));
        assert_eq!(state.spectra.len(), 2);
        assert!(state.failures.is_empty());
        assert_eq!(state.selected, Some(0));
    }

    #[test]
    fn remove_keeps_selection_valid() {
        let mut state = AppState::default();
        state.ingest(report(&["a.txt", "b.txt", "c.txt"]));
        state.selected = Some(2);

        state.remove(0);
        assert_eq!(state.selected, Some(1));
        state.remove(1);
        assert_eq!(state.selected, Some(0));
        state.remove(0);
        assert_eq!(state.selected, None);
        // Out of range is a no-op.
        state.remove(7);
    }

    #[test]
    fn successful_save_clears_warning_colour() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        let mut batch = report(&["a.txt"]);
        batch.failures.push(("bad.txt".into(), "no XYDATA".into()));
        state.ingest(batch);
        assert_eq!(state.status.as_ref().map(|s| s.kind), Some(StatusKind::Warning));

        state.export_to(&dir.path().join("out.xlsx")).unwrap();
        let status = state.status.clone().unwrap();
        assert_eq!(status.kind, StatusKind::Info);
        assert!(status.text.starts_with("Saved "));
        // The skipped list itself is still shown.
        assert_eq!(state.failures.len(), 1);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut state = AppState::default();
        state.ingest(report(&["a.txt"]));
        state.clear();
        assert!(state.spectra.is_empty());
        assert!(state.selected.is_none());
    }
}
