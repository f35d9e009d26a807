use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dfscore::data::tolerance::{MzTolerance, RtTolerance};
use dfsrun::data::in_memory::InMemoryScans;
use dfsrun::data::provider::ScanProvider;
use dfsrun::run::config::ScreenConfig;
use dfsrun::run::sink::FeatureCollection;
use dfsrun::run::task::ScreeningTask;

/// Screen a run of MS2 spectra for diagnostic fragment and neutral-loss
/// patterns, optionally building a target chromatogram per hit.
///
/// Spectra are read from a JSON dump: an array of objects with `scan_id`,
/// `ms_level`, `precursor_mz`, `retention_time` (minutes), `mz` and
/// `intensity` arrays.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input spectra, JSON
    #[arg(long)]
    spectra: PathBuf,
    /// Diagnostic target catalog, CSV: name, mz1;mz2;..., nl1;nl2;...
    #[arg(long)]
    catalog: PathBuf,
    /// Optional exclusion list, CSV: mz, rtStart, rtEnd
    #[arg(long)]
    exclusion: Option<PathBuf>,
    /// Hit-list output path; `{}` is replaced by the sanitized source name
    #[arg(long)]
    output: Option<PathBuf>,
    /// Lower bound of the precursor m/z acceptance range
    #[arg(long, default_value_t = 0.0)]
    precursor_mz_min: f64,
    /// Upper bound of the precursor m/z acceptance range
    #[arg(long, default_value_t = 10_000.0)]
    precursor_mz_max: f64,
    /// Absolute mass tolerance in Da
    #[arg(long, default_value_t = 0.01)]
    mz_tolerance_da: f64,
    /// Relative mass tolerance in ppm
    #[arg(long, default_value_t = 10.0)]
    mz_tolerance_ppm: f64,
    /// RT half-window of the chromatogram built per hit, in minutes
    #[arg(long, default_value_t = 0.5)]
    rt_tolerance: f64,
    /// Candidate-peak threshold as percent of the base peak intensity
    #[arg(long, default_value_t = 1.0)]
    base_peak_percent: f64,
    /// Candidate-peak threshold as an absolute intensity floor
    #[arg(long, default_value_t = 0.0)]
    min_intensity: f64,
    /// Classify only, do not build chromatograms
    #[arg(long, default_value_t = false)]
    no_chromatograms: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let provider = match InMemoryScans::from_json(&args.spectra) {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("could not read spectra from {}: {}", args.spectra.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let config = ScreenConfig {
        precursor_mz_min: args.precursor_mz_min,
        precursor_mz_max: args.precursor_mz_max,
        mz_tolerance: MzTolerance::new(args.mz_tolerance_da, args.mz_tolerance_ppm),
        rt_tolerance: RtTolerance::new(args.rt_tolerance),
        base_peak_fraction: args.base_peak_percent / 100.0,
        min_intensity: args.min_intensity,
        catalog_path: args.catalog,
        exclusion_path: args.exclusion,
        export_path: args.output,
        build_chromatograms: !args.no_chromatograms,
    };

    let collection_name = format!("{} targetChromatograms", provider.source_name());
    let mut collection = FeatureCollection::new(collection_name);
    let mut task = ScreeningTask::new(provider, config);

    match task.run(&mut collection) {
        Ok(summary) => {
            println!(
                "{} scans processed, {} hits, {} features{}",
                summary.processed_scans,
                summary.hit_scans,
                summary.features_built,
                if summary.cancelled { " (cancelled)" } else { "" }
            );
            for feature in &collection.features {
                println!(
                    "{},{},{},{},{},{}",
                    feature.row_id, feature.mz, feature.retention_time, feature.height, feature.area, feature.label
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("screening failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
