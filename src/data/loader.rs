use std::path::Path;

use anyhow::{bail, Context, Result};
use encoding_rs::SHIFT_JIS;

use super::extract::extract_xy;
use super::model::{LoadReport, Spectrum};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one instrument export from disk.
///
/// Only `.txt` exports are accepted; the spectrum is named after the file.
pub fn load_file(path: &Path) -> Result<Spectrum> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    if ext != "txt" {
        bail!("Unsupported file extension: .{ext} (expected a .txt export)");
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("invalid file name: {}", path.display()))?;
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    load_bytes(name, &bytes)
}

/// Decode and extract an export that is already in memory.
pub fn load_bytes(name: &str, bytes: &[u8]) -> Result<Spectrum> {
    let text = decode_text(bytes)?;
    let (x, y) = extract_xy(&text).with_context(|| format!("parsing {name}"))?;
    log::debug!("{name}: {} points", x.len());
    Ok(Spectrum::new(name, x, y))
}

/// Load every path, skipping (and recording) the ones that fail.
pub fn load_batch<P: AsRef<Path>>(paths: &[P]) -> LoadReport {
    let mut report = LoadReport::default();

    for path in paths {
        let path = path.as_ref();
        match load_file(path) {
            Ok(spectrum) => report.spectra.push(spectrum),
            Err(e) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                log::warn!("Skipping {name}: {e:#}");
                report.failures.push((name, format!("{e:#}")));
            }
        }
    }

    log::info!(
        "Loaded {} file(s), skipped {}",
        report.spectra.len(),
        report.failures.len()
    );
    report
}

// ---------------------------------------------------------------------------
// Text decoding
// ---------------------------------------------------------------------------

/// Decode raw export bytes.
///
/// JASCO Spectra Manager writes Shift_JIS. Plain UTF-8 (with or without BOM)
/// is tried first since pure-ASCII files are valid in both.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Ok(s.to_string());
    }

    match SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(cow) => Ok(cow.into_owned()),
        None => bail!("file is neither UTF-8 nor Shift_JIS text"),
    }
}
