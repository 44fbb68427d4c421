use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use spectra_formatter::data::loader::load_batch;
use spectra_formatter::export;
use spectra_formatter::profile::{ChartProfile, Instrument};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileArg {
    Ir,
    UvVis,
}

impl From<ProfileArg> for Instrument {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Ir => Instrument::Ir,
            ProfileArg::UvVis => Instrument::UvVis,
        }
    }
}

#[derive(Parser)]
#[command(about = "Convert JASCO IR / UV-vis text exports into a formatted Excel workbook.")]
struct Args {
    /// Exported `.txt` files, in overlay order.
    #[arg(required_unless_present = "print_profile")]
    files: Vec<PathBuf>,

    /// Built-in chart preset.
    #[arg(long, value_enum, default_value_t = ProfileArg::Ir)]
    profile: ProfileArg,

    /// JSON chart profile; overrides `--profile`.
    #[arg(long)]
    profile_file: Option<PathBuf>,

    /// Output workbook path (default: time-stamped name in `--out-dir`).
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Directory for the time-stamped workbook.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the selected profile as JSON and exit.
    #[arg(long)]
    print_profile: bool,
}

fn run(args: Args) -> Result<()> {
    let profile = match &args.profile_file {
        Some(path) => ChartProfile::from_json_file(path)?,
        None => Instrument::from(args.profile).profile(),
    };

    if args.print_profile {
        println!("{}", profile.to_json()?);
        return Ok(());
    }

    let report = load_batch(args.files.as_slice());
    for (name, reason) in &report.failures {
        eprintln!("skipped {name}: {reason}");
    }
    if report.is_empty() {
        bail!("none of the {} file(s) could be read", args.files.len());
    }

    let output = args
        .output
        .unwrap_or_else(|| args.out_dir.join(profile.output_file_name_now()));
    export::save(&report.spectra, &profile, &output)
        .with_context(|| format!("writing {}", output.display()))?;

    println!("{}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
