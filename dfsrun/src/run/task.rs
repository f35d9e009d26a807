use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dfscore::algorithm::chromatogram::{ChromatogramPoint, Feature};
use dfscore::algorithm::classify::classify;
use dfscore::data::target::MatchResult;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::provider::ScanProvider;
use crate::run::catalog::{read_targets, CatalogError};
use crate::run::config::ScreenConfig;
use crate::run::exclusion::read_exclusions;
use crate::run::export::HitWriter;
use crate::run::sink::FeatureSink;

/// Run-fatal failures of the screening task.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("could not establish screening baseline: {0}")]
    Catalog(#[from] CatalogError),
    #[error("could not write hit list: {0}")]
    Export(#[source] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Processing,
    Finished,
    Cancelled,
    Failed,
}

/// Shared cancellation flag, polled cooperatively by the task.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What a completed (or cancelled) run did.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenSummary {
    pub processed_scans: usize,
    pub hit_scans: usize,
    pub features_built: usize,
    pub cancelled: bool,
}

/// Sequential screening run over one scan provider.
///
/// Loads the catalog and exclusion baseline, classifies every scan in
/// provider order, builds a chromatogram feature per hit when enabled, and
/// appends hit rows to the export file. All state lives for one `run` call;
/// the configuration is immutable throughout.
pub struct ScreeningTask<P: ScanProvider> {
    provider: P,
    config: ScreenConfig,
    cancel: CancelToken,
    status: TaskStatus,
    processed_scans: usize,
    total_scans: usize,
}

impl<P: ScanProvider> ScreeningTask<P> {
    pub fn new(provider: P, config: ScreenConfig) -> Self {
        ScreeningTask {
            provider,
            config,
            cancel: CancelToken::new(),
            status: TaskStatus::Pending,
            processed_scans: 0,
            total_scans: 0,
        }
    }

    /// A clone of the cancellation token, for the host to trip from another
    /// thread of control.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Fraction of scans processed so far, 0 before the scan loop starts.
    pub fn finished_fraction(&self) -> f64 {
        if self.total_scans == 0 {
            0.0
        } else {
            self.processed_scans as f64 / self.total_scans as f64
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Runs the screen to completion, cancellation or failure.
    ///
    /// The catalog (and exclusion list, when enabled) must load before any
    /// scan is touched; a loader failure leaves the sink and output file
    /// untouched. A write failure ends the run but previously flushed rows
    /// remain valid.
    pub fn run(&mut self, sink: &mut dyn FeatureSink) -> Result<ScreenSummary, ScreenError> {
        self.status = TaskStatus::Processing;
        let source = self.provider.source_name().to_string();
        info!(source = %source, "started diagnostic fragmentation screening");

        let targets = match read_targets(&self.config.catalog_path) {
            Ok(targets) => targets,
            Err(err) => {
                self.status = TaskStatus::Failed;
                return Err(err.into());
            }
        };
        let exclusions = match &self.config.exclusion_path {
            Some(path) => match read_exclusions(path) {
                Ok(windows) => windows,
                Err(err) => {
                    self.status = TaskStatus::Failed;
                    return Err(err.into());
                }
            },
            None => Vec::new(),
        };

        sink.set_applied_method(format!(
            "diagnostic fragmentation screening: {}",
            self.config.describe()
        ));

        let mut writer = match &self.config.export_path {
            Some(template) => match HitWriter::create(template, &source) {
                Ok(writer) => Some(writer),
                Err(err) => {
                    self.status = TaskStatus::Failed;
                    return Err(ScreenError::Export(err));
                }
            },
            None => None,
        };

        let params = self.config.classifier_params();
        self.total_scans = self.provider.spectra().len();
        let mut summary = ScreenSummary::default();

        for index in 0..self.total_scans {
            if self.cancel.is_cancelled() {
                return Ok(self.finish_cancelled(summary, writer.as_mut()));
            }

            let spectrum = &self.provider.spectra()[index];
            let result = classify(spectrum, &targets, &exclusions, &params);

            if let Some(result) = result {
                debug!(scan_id = result.scan_id, label = %result.label(), "hit");
                summary.hit_scans += 1;

                if self.config.build_chromatograms {
                    match self.build_feature(&result) {
                        Some(feature) => {
                            sink.accept(feature);
                            summary.features_built += 1;
                        }
                        // cancelled mid-chromatogram, no partial feature
                        None => return Ok(self.finish_cancelled(summary, writer.as_mut())),
                    }
                }

                if let Some(writer) = writer.as_mut() {
                    if let Err(err) = writer.write_hit(&result).and_then(|_| writer.flush()) {
                        warn!(%err, "hit list write failed, ending run");
                        self.status = TaskStatus::Failed;
                        return Err(ScreenError::Export(err));
                    }
                }
            }

            self.processed_scans += 1;
            summary.processed_scans = self.processed_scans;
        }

        if let Some(writer) = writer.as_mut() {
            if let Err(err) = writer.flush() {
                self.status = TaskStatus::Failed;
                return Err(ScreenError::Export(err));
            }
        }

        self.status = TaskStatus::Finished;
        info!(
            source = %source,
            hits = summary.hit_scans,
            features = summary.features_built,
            "finished diagnostic fragmentation screening"
        );
        Ok(summary)
    }

    fn finish_cancelled(&mut self, mut summary: ScreenSummary, writer: Option<&mut HitWriter>) -> ScreenSummary {
        if let Some(writer) = writer {
            // keep already-written rows intact
            writer.flush().ok();
        }
        self.status = TaskStatus::Cancelled;
        summary.cancelled = true;
        info!("screening cancelled after {} scans", self.processed_scans);
        summary
    }

    /// Reconstructs the extracted-ion chromatogram around one hit and derives
    /// its feature. Returns `None` only when cancellation strikes while
    /// accumulating points.
    fn build_feature(&self, result: &MatchResult) -> Option<Feature> {
        let mz_range = self.config.mz_tolerance.bounds(result.precursor_mz);
        let rt_range = self.config.rt_tolerance.bounds(result.retention_time);
        let midpoint_mz = (mz_range.0 + mz_range.1) / 2.0;

        let mut points = Vec::new();
        for scan_id in self.provider.ms1_scan_ids_in_rt_range(rt_range.0, rt_range.1) {
            if self.cancel.is_cancelled() {
                return None;
            }
            let Some(scan) = self.provider.spectrum_by_id(scan_id) else {
                continue;
            };
            let point = match self.provider.base_peak_within(scan_id, mz_range.0, mz_range.1) {
                Some(peak) => ChromatogramPoint::new(scan_id, peak.mz, scan.retention_time, peak.intensity),
                None => ChromatogramPoint::new(scan_id, midpoint_mz, scan.retention_time, 0.0),
            };
            points.push(point);
        }

        let mut feature = Feature::from_points(points, result.label());
        if !feature.points.is_empty() {
            feature.fragment_scan = self.provider.best_fragment_scan(feature.rt_range, feature.mz_range);
            feature.ms2_fragment_scans = self.provider.ms2_fragment_scans(feature.rt_range, feature.mz_range);
        }
        Some(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::in_memory::InMemoryScans;
    use crate::run::sink::FeatureCollection;
    use dfscore::data::spectrum::Spectrum;
    use dfscore::data::tolerance::{MzTolerance, RtTolerance};
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("dfsrun-task-{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn config(catalog_path: PathBuf) -> ScreenConfig {
        ScreenConfig {
            precursor_mz_min: 0.0,
            precursor_mz_max: 2000.0,
            mz_tolerance: MzTolerance::new(0.01, 0.0),
            rt_tolerance: RtTolerance::new(1.0),
            base_peak_fraction: 0.0,
            min_intensity: 0.0,
            catalog_path,
            exclusion_path: None,
            export_path: None,
            build_chromatograms: true,
        }
    }

    fn provider() -> InMemoryScans {
        InMemoryScans::new(
            "run1",
            vec![
                Spectrum::new(1, 1, None, 10.2, vec![499.995], vec![100.0]),
                Spectrum::new(2, 2, Some(500.0), 10.5, vec![100.0, 200.0], vec![80.0, 90.0]),
                Spectrum::new(3, 1, None, 10.8, vec![500.002], vec![300.0]),
                Spectrum::new(4, 1, None, 12.5, vec![500.0], vec![50.0]),
            ],
        )
    }

    #[test]
    fn full_run_builds_features_for_hits() {
        let catalog = write_temp("hits.csv", "T,100;200,\n");
        let mut task = ScreeningTask::new(provider(), config(catalog.clone()));
        let mut sink = FeatureCollection::new("run1 targetChromatograms");

        let summary = task.run(&mut sink).unwrap();
        std::fs::remove_file(&catalog).ok();

        assert_eq!(summary.processed_scans, 4);
        assert_eq!(summary.hit_scans, 1);
        assert_eq!(summary.features_built, 1);
        assert_eq!(task.status(), TaskStatus::Finished);
        assert!((task.finished_fraction() - 1.0).abs() < 1e-12);

        let feature = &sink.features[0];
        assert_eq!(feature.row_id, 1);
        assert_eq!(feature.label, "target=T");
        // MS1 scans 1 and 3 fall in the RT window, scan 4 does not
        assert_eq!(feature.points.len(), 2);
        assert_eq!(feature.representative_scan, Some(3));
        assert_eq!(feature.ms2_fragment_scans, vec![2]);
        assert!(sink.applied_method.is_some());
    }

    #[test]
    fn missing_catalog_fails_before_scanning() {
        let missing = std::env::temp_dir().join("dfsrun-task-missing-catalog.csv");
        let mut task = ScreeningTask::new(provider(), config(missing));
        let mut sink = FeatureCollection::new("run1");

        assert!(task.run(&mut sink).is_err());
        assert_eq!(task.status(), TaskStatus::Failed);
        assert!(sink.is_empty());
    }

    #[test]
    fn cancellation_stops_before_the_next_scan() {
        let catalog = write_temp("cancel.csv", "T,100;200,\n");
        let mut task = ScreeningTask::new(provider(), config(catalog.clone()));
        task.cancel_token().cancel();
        let mut sink = FeatureCollection::new("run1");

        let summary = task.run(&mut sink).unwrap();
        std::fs::remove_file(&catalog).ok();

        assert!(summary.cancelled);
        assert_eq!(summary.processed_scans, 0);
        assert_eq!(task.status(), TaskStatus::Cancelled);
        assert!(sink.is_empty());
    }

    #[test]
    fn exclusion_list_suppresses_hits() {
        let catalog = write_temp("excl-catalog.csv", "T,100;200,\n");
        let exclusion = write_temp("excl-windows.csv", "500.0,10,11\n");
        let mut cfg = config(catalog.clone());
        cfg.exclusion_path = Some(exclusion.clone());

        let mut task = ScreeningTask::new(provider(), cfg);
        let mut sink = FeatureCollection::new("run1");
        let summary = task.run(&mut sink).unwrap();
        std::fs::remove_file(&catalog).ok();
        std::fs::remove_file(&exclusion).ok();

        assert_eq!(summary.hit_scans, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn hits_without_ms1_support_yield_degenerate_features() {
        let catalog = write_temp("degenerate.csv", "T,100,\n");
        let provider = InMemoryScans::new(
            "lonely",
            vec![Spectrum::new(1, 2, Some(500.0), 10.5, vec![100.0], vec![80.0])],
        );
        let mut task = ScreeningTask::new(provider, config(catalog.clone()));
        let mut sink = FeatureCollection::new("lonely");

        let summary = task.run(&mut sink).unwrap();
        std::fs::remove_file(&catalog).ok();

        assert_eq!(summary.features_built, 1);
        let feature = &sink.features[0];
        assert_eq!(feature.area, 0.0);
        assert_eq!(feature.height, 0.0);
        assert!(feature.fragment_scan.is_none());
    }
}
