//! Formatter for JASCO IR / UV-vis text exports.
//!
//! [`data`] reads the instrument's `.txt` dumps into [`Spectrum`]s,
//! [`profile`] holds the per-instrument cosmetics and [`export`] writes the
//! formatted `.xlsx` workbook with its chart.

pub mod data;
pub mod export;
pub mod profile;

pub use data::model::{LoadReport, Spectrum};
pub use profile::ChartProfile;
