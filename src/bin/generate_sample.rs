use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use encoding_rs::SHIFT_JIS;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// How the export closes its XYDATA block.
#[derive(Clone, Copy)]
enum Trailer {
    /// Blank line, separator, `##### Extended Information` section.
    ExtendedInfo,
    /// Blank line followed by free-form comments.
    BlankLine,
    /// Data runs to the end of the file.
    None,
}

struct SampleSpec<'a> {
    title: &'a str,
    data_type: &'a str,
    x_units: &'a str,
    y_units: &'a str,
    axis: Vec<f64>,
    values: Vec<f64>,
    trailer: Trailer,
}

/// Render a JASCO Spectra Manager style text export.
fn render(spec: &SampleSpec) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let first = |v: &[f64]| v.first().copied().unwrap_or_default();
    let last = |v: &[f64]| v.last().copied().unwrap_or_default();
    let min = spec.values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = spec.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    writeln!(out, "TITLE\t{}", spec.title)?;
    writeln!(out, "DATA TYPE\t{}", spec.data_type)?;
    writeln!(out, "ORIGIN\tJASCO")?;
    writeln!(out, "OWNER\t")?;
    writeln!(out, "SPECTROMETER/DATA SYSTEM\tJASCO Corp., sample generator")?;
    writeln!(out, "LOCALE\t1041")?;
    writeln!(out, "XUNITS\t{}", spec.x_units)?;
    writeln!(out, "YUNITS\t{}", spec.y_units)?;
    writeln!(out, "FIRSTX\t{}", first(&spec.axis))?;
    writeln!(out, "LASTX\t{}", last(&spec.axis))?;
    writeln!(out, "NPOINTS\t{}", spec.axis.len())?;
    writeln!(out, "FIRSTY\t{:.4}", first(&spec.values))?;
    writeln!(out, "MAXY\t{max:.4}")?;
    writeln!(out, "MINY\t{min:.4}")?;
    writeln!(out, "XYDATA")?;
    for (x, y) in spec.axis.iter().zip(&spec.values) {
        writeln!(out, "{x}\t{y:.4}")?;
    }

    match spec.trailer {
        Trailer::ExtendedInfo => {
            writeln!(out, "\n-------------------------------")?;
            writeln!(out, "##### Extended Information")?;
            writeln!(out, "\n[Comments]")?;
            writeln!(out, "サンプル\t{}", spec.title)?;
        }
        Trailer::BlankLine => {
            writeln!(out, "\n[Comments]")?;
            writeln!(out, "測定者\tsample generator")?;
        }
        Trailer::None => {}
    }
    Ok(out)
}

fn write_shift_jis(path: &Path, text: &str) -> Result<()> {
    let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
    if had_errors {
        log::warn!("{}: some characters are not representable in Shift_JIS", path.display());
    }
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

#[derive(Parser)]
#[command(about = "Write synthetic JASCO IR / UV-vis text exports for trying the formatter.")]
struct Args {
    /// Output directory (created if missing).
    #[arg(default_value = "samples")]
    out_dir: PathBuf,

    /// PRNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut rng = SimpleRng::new(args.seed);

    // IR: 4000 → 400 cm-1, step 2, transmittance dips.
    let wavenumbers: Vec<f64> = (0..1801).map(|i| 4000.0 - i as f64 * 2.0).collect();
    let ir_samples: [(&str, Vec<(f64, f64, f64)>, Trailer); 3] = [
        ("polystyrene", vec![(3026.0, 15.0, 35.0), (1601.0, 6.0, 30.0), (698.0, 8.0, 70.0)], Trailer::ExtendedInfo),
        ("ethanol", vec![(3340.0, 90.0, 60.0), (2970.0, 20.0, 40.0), (1045.0, 15.0, 65.0)], Trailer::BlankLine),
        ("acetone", vec![(1715.0, 12.0, 80.0), (1360.0, 10.0, 45.0), (1220.0, 12.0, 50.0)], Trailer::None),
    ];
    for (name, peaks, trailer) in ir_samples {
        let values: Vec<f64> = wavenumbers
            .iter()
            .map(|&wn| {
                let dip: f64 = peaks.iter().map(|&(mu, s, a)| gaussian(wn, mu, s, a)).sum();
                (95.0 - dip + rng.gauss(0.0, 0.3)).clamp(0.0, 100.0)
            })
            .collect();
        let spec = SampleSpec {
            title: name,
            data_type: "INFRARED SPECTRUM",
            x_units: "1/CM",
            y_units: "%T",
            axis: wavenumbers.clone(),
            values,
            trailer,
        };
        write_shift_jis(&args.out_dir.join(format!("IR_{name}.txt")), &render(&spec)?)?;
    }

    // UV-vis: 200 → 800 nm, step 1, absorbance bands.
    let wavelengths: Vec<f64> = (0..601).map(|i| 200.0 + i as f64).collect();
    let uv_samples: [(&str, Vec<(f64, f64, f64)>); 2] = [
        ("methylene_blue", vec![(664.0, 25.0, 0.9), (292.0, 15.0, 0.6)]),
        ("rhodamine_b", vec![(554.0, 20.0, 1.1), (355.0, 25.0, 0.15)]),
    ];
    for (name, peaks) in uv_samples {
        let values: Vec<f64> = wavelengths
            .iter()
            .map(|&wl| {
                let band: f64 = peaks.iter().map(|&(mu, s, a)| gaussian(wl, mu, s, a)).sum();
                band + rng.gauss(0.0, 0.002)
            })
            .collect();
        let spec = SampleSpec {
            title: name,
            data_type: "ULTRAVIOLET SPECTRUM",
            x_units: "NANOMETERS",
            y_units: "ABSORBANCE",
            axis: wavelengths.clone(),
            values,
            trailer: Trailer::BlankLine,
        };
        write_shift_jis(&args.out_dir.join(format!("UV_{name}.txt")), &render(&spec)?)?;
    }

    println!("Wrote 5 sample exports to {}", args.out_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectra_formatter::data::extract::{extract_xy, find_block, split_lines, BlockEnd};

    fn sample(trailer: Trailer) -> String {
        let spec = SampleSpec {
            title: "test",
            data_type: "INFRARED SPECTRUM",
            x_units: "1/CM",
            y_units: "%T",
            axis: vec![4000.0, 3998.0, 3996.0],
            values: vec![90.0, 85.5, 91.25],
            trailer,
        };
        render(&spec).unwrap()
    }

    #[test]
    fn rendered_exports_extract_with_each_trailer() {
        for (trailer, end) in [
            (Trailer::ExtendedInfo, BlockEnd::ExtendedInfo),
            (Trailer::BlankLine, BlockEnd::BlankLine),
            (Trailer::None, BlockEnd::EndOfFile),
        ] {
            let text = sample(trailer);
            let (x, y) = extract_xy(&text).unwrap();
            assert_eq!(x, vec![4000.0, 3998.0, 3996.0]);
            assert_eq!(y, vec![90.0, 85.5, 91.25]);
            assert_eq!(find_block(&split_lines(&text)).unwrap().end, end);
        }
    }
}
