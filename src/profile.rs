use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::{Asia::Tokyo, Tz};
use serde::{Deserialize, Serialize};

use crate::data::model::Spectrum;

// ---------------------------------------------------------------------------
// Instrument – the built-in presets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Instrument {
    #[default]
    Ir,
    UvVis,
}

impl Instrument {
    pub const ALL: [Instrument; 2] = [Instrument::Ir, Instrument::UvVis];

    pub fn profile(self) -> ChartProfile {
        match self {
            Instrument::Ir => ChartProfile::ir(),
            Instrument::UvVis => ChartProfile::uv_vis(),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instrument::Ir => write!(f, "IR"),
            Instrument::UvVis => write!(f, "UV-vis"),
        }
    }
}

// ---------------------------------------------------------------------------
// Axis / naming options
// ---------------------------------------------------------------------------

/// How the Y axis range of the chart is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum YRange {
    /// Traces are stacked by the overlay step. The floor is rounded down to
    /// a multiple of ten below the smallest Y (ignoring the first
    /// `floor_skip_points` points of each trace); the ceiling leaves
    /// `headroom` above the topmost offset.
    Stacked {
        floor_skip_points: usize,
        headroom: f64,
    },
    /// Start at zero and let Excel pick the maximum.
    FromZero,
}

/// Layout of the time-stamped output file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileNameStyle {
    /// `IR_20240131_093000.xlsx`
    Prefixed,
    /// `20240131_UV-vis_093000.xlsx`
    DatePrefixed,
}

/// Manual plot-area placement as fractions of the chart area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotAreaLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Optional axis bounds; `None` lets the renderer decide.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

// ---------------------------------------------------------------------------
// ChartProfile
// ---------------------------------------------------------------------------

/// Every cosmetic setting that differs between instruments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartProfile {
    /// Short instrument tag, used in output file names.
    pub title: String,
    pub x_header: String,
    pub y_header: String,
    pub x_axis_name: String,
    pub y_axis_name: String,
    pub x_min: f64,
    pub x_max: f64,
    pub x_major_unit: f64,
    /// Extend `x_max` to the largest X in the data.
    #[serde(default)]
    pub x_max_follows_data: bool,
    /// Draw X high → low (IR convention).
    #[serde(default)]
    pub x_reversed: bool,
    /// Vertical distance between stacked traces.
    #[serde(default)]
    pub overlay_step: f64,
    pub y_range: YRange,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Extra chart height per loaded file.
    #[serde(default)]
    pub chart_height_per_file: u32,
    /// Inner plot-area placement; Excel's automatic layout when `None`.
    #[serde(default)]
    pub plot_area_layout: Option<PlotAreaLayout>,
    pub file_name: FileNameStyle,
}

impl Default for ChartProfile {
    fn default() -> Self {
        Self::ir()
    }
}

impl ChartProfile {
    /// Stacked transmittance traces, wavenumber axis reversed.
    pub fn ir() -> Self {
        Self {
            title: "IR".to_string(),
            x_header: "WL".to_string(),
            y_header: "%T".to_string(),
            x_axis_name: "Wavenumber / cm–1".to_string(),
            y_axis_name: "Transmittance (%)".to_string(),
            x_min: 500.0,
            x_max: 4000.0,
            x_major_unit: 500.0,
            x_max_follows_data: false,
            x_reversed: true,
            overlay_step: 40.0,
            y_range: YRange::Stacked {
                floor_skip_points: 104,
                headroom: 110.0,
            },
            chart_width: 460,
            chart_height: 370,
            chart_height_per_file: 80,
            plot_area_layout: None,
            file_name: FileNameStyle::Prefixed,
        }
    }

    /// Overlaid absorbance traces on a wavelength axis starting at 300 nm.
    pub fn uv_vis() -> Self {
        Self {
            title: "UV-vis".to_string(),
            x_header: "WL".to_string(),
            y_header: "Abs".to_string(),
            x_axis_name: "Wavelength / nm".to_string(),
            y_axis_name: "Absorbance".to_string(),
            x_min: 300.0,
            x_max: 700.0,
            x_major_unit: 100.0,
            x_max_follows_data: true,
            x_reversed: false,
            overlay_step: 0.0,
            y_range: YRange::FromZero,
            chart_width: 460,
            chart_height: 370,
            chart_height_per_file: 0,
            plot_area_layout: None,
            file_name: FileNameStyle::DatePrefixed,
        }
    }

    /// Read a profile from a JSON file (same layout as `serde_json` output).
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading profile {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing profile {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing profile")
    }

    /// Y offset of trace `index` out of `count`; the first trace sits on top.
    pub fn overlay_offset(&self, index: usize, count: usize) -> f64 {
        count.saturating_sub(index + 1) as f64 * self.overlay_step
    }

    /// X axis range for the given traces.
    pub fn x_range(&self, spectra: &[Spectrum]) -> (f64, f64) {
        let max = if self.x_max_follows_data {
            spectra
                .iter()
                .filter_map(Spectrum::x_max)
                .fold(self.x_max, f64::max)
        } else {
            self.x_max
        };
        (self.x_min, max)
    }

    /// Y axis bounds for the given traces (before any overlay is applied to
    /// the data, since the floor is taken from the bottom trace).
    pub fn y_range(&self, spectra: &[Spectrum]) -> AxisBounds {
        match &self.y_range {
            YRange::Stacked {
                floor_skip_points,
                headroom,
            } => {
                let floor = spectra
                    .iter()
                    .filter_map(|sp| sp.y_min_after(*floor_skip_points))
                    .reduce(f64::min)
                    .map(|m| (m / 10.0).floor() * 10.0 - 10.0);
                let top = spectra.len().saturating_sub(1) as f64 * self.overlay_step + headroom;
                AxisBounds {
                    min: floor,
                    max: Some(top),
                }
            }
            YRange::FromZero => AxisBounds {
                min: Some(0.0),
                max: None,
            },
        }
    }

    /// Chart size in pixels for `count` traces.
    pub fn chart_size(&self, count: usize) -> (u32, u32) {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        let extra = self.chart_height_per_file.saturating_mul(count);
        (self.chart_width, self.chart_height.saturating_add(extra))
    }

    /// Output workbook name stamped with `now` in Japan Standard Time.
    pub fn output_file_name<T: TimeZone>(&self, now: &DateTime<T>) -> String {
        let jst: DateTime<Tz> = now.with_timezone(&Tokyo);
        let date = jst.format("%Y%m%d");
        let time = jst.format("%H%M%S");
        match self.file_name {
            FileNameStyle::Prefixed => format!("{}_{date}_{time}.xlsx", self.title),
            FileNameStyle::DatePrefixed => format!("{date}_{}_{time}.xlsx", self.title),
        }
    }

    /// [`output_file_name`](Self::output_file_name) for the current instant.
    pub fn output_file_name_now(&self) -> String {
        self.output_file_name(&Utc::now())
    }
}
