use std::path::Path;

// ---------------------------------------------------------------------------
// Spectrum – one extracted X/Y table
// ---------------------------------------------------------------------------

/// A single spectrum extracted from one instrument export.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Source file name, extension included (e.g. `sample_01.txt`).
    pub name: String,
    /// Wavenumber / wavelength axis (x).
    pub x: Vec<f64>,
    /// Transmittance / absorbance axis (y) – same length as `x`.
    pub y: Vec<f64>,
}

impl Spectrum {
    pub fn new(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        debug_assert_eq!(x.len(), y.len());
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the spectrum has no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// File name without its extension; used as the chart series name.
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    /// Largest X value, `None` for an empty spectrum.
    pub fn x_max(&self) -> Option<f64> {
        self.x.iter().copied().reduce(f64::max)
    }

    /// Smallest Y value ignoring the first `skip` points.
    ///
    /// Series shorter than `skip` fall back to the minimum over all points.
    pub fn y_min_after(&self, skip: usize) -> Option<f64> {
        let tail = if self.y.len() > skip {
            &self.y[skip..]
        } else {
            &self.y[..]
        };
        tail.iter().copied().reduce(f64::min)
    }

    /// Iterate over `(x, y)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// LoadReport – outcome of a skip-and-continue batch load
// ---------------------------------------------------------------------------

/// Spectra that loaded, in input order, plus the files that were skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub spectra: Vec<Spectrum>,
    /// `(file name, error message)` for every skipped file.
    pub failures: Vec<(String, String)>,
}

impl LoadReport {
    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_extension() {
        let sp = Spectrum::new("PS film.txt", vec![], vec![]);
        assert_eq!(sp.stem(), "PS film");

        let sp = Spectrum::new("no_extension", vec![], vec![]);
        assert_eq!(sp.stem(), "no_extension");
    }

    #[test]
    fn y_min_skips_leading_points() {
        let sp = Spectrum::new("a.txt", vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 80.0, 60.0, 70.0]);
        assert_eq!(sp.y_min_after(0), Some(5.0));
        assert_eq!(sp.y_min_after(1), Some(60.0));
        // Shorter than the skip count: use every point.
        assert_eq!(sp.y_min_after(104), Some(5.0));
    }

    #[test]
    fn x_max_of_empty_is_none() {
        let sp = Spectrum::new("a.txt", vec![], vec![]);
        assert_eq!(sp.x_max(), None);
        assert!(sp.is_empty());
    }
}
