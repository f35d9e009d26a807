//! End-to-end screening run: catalog + exclusion load, classification,
//! chromatogram building and hit export over the in-memory provider.

use std::io::Write;
use std::path::PathBuf;

use dfscore::data::spectrum::Spectrum;
use dfscore::data::tolerance::{MzTolerance, RtTolerance};
use dfsrun::data::in_memory::InMemoryScans;
use dfsrun::run::config::ScreenConfig;
use dfsrun::run::sink::FeatureCollection;
use dfsrun::run::task::{ScreeningTask, TaskStatus};

fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("dfsrun-screening-{}-{}", std::process::id(), name));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn acquisition() -> Vec<Spectrum> {
    vec![
        // MS1 trace around the first precursor
        Spectrum::new(1, 1, None, 9.8, vec![499.996], vec![0.0]),
        Spectrum::new(2, 1, None, 10.0, vec![499.998], vec![400.0]),
        // hit: fragment 100 and neutral loss 50 (-> 450) both present
        Spectrum::new(3, 2, Some(500.0), 10.1, vec![100.0, 450.0], vec![900.0, 600.0]),
        Spectrum::new(4, 1, None, 10.4, vec![500.004], vec![100.0]),
        // not a hit: fragment 100 missing
        Spectrum::new(5, 2, Some(600.0), 10.6, vec![300.0], vec![900.0]),
        // excluded precursor
        Spectrum::new(6, 2, Some(700.0), 11.0, vec![100.0, 650.0], vec![900.0, 700.0]),
    ]
}

fn config(catalog: PathBuf, exclusion: PathBuf, output: PathBuf) -> ScreenConfig {
    ScreenConfig {
        precursor_mz_min: 100.0,
        precursor_mz_max: 1000.0,
        mz_tolerance: MzTolerance::new(0.01, 0.0),
        rt_tolerance: RtTolerance::new(0.5),
        base_peak_fraction: 0.05,
        min_intensity: 100.0,
        catalog_path: catalog,
        exclusion_path: Some(exclusion),
        export_path: Some(output),
        build_chromatograms: true,
    }
}

#[test]
fn screening_run_end_to_end() {
    let catalog = write_temp(
        "catalog.csv",
        "WithLoss,100,50\nNeverMatches,,\nExcludedTarget,100,\n",
    );
    let exclusion = write_temp("exclusion.csv", "700.0,10.5,11.5\n");
    let output_template = std::env::temp_dir().join(format!(
        "dfsrun-screening-{}-{{}}-hits.csv",
        std::process::id()
    ));
    let output = std::env::temp_dir().join(format!(
        "dfsrun-screening-{}-run_01-hits.csv",
        std::process::id()
    ));
    std::fs::remove_file(&output).ok();

    let cfg = config(catalog.clone(), exclusion.clone(), output_template);
    let mut sink = FeatureCollection::new("run 01 targetChromatograms");

    // two runs against the same output path must append, not overwrite
    for _ in 0..2 {
        let provider = InMemoryScans::new("run 01", acquisition());
        let mut task = ScreeningTask::new(provider, cfg.clone());
        let summary = task.run(&mut sink).unwrap();

        assert_eq!(task.status(), TaskStatus::Finished);
        assert_eq!(summary.processed_scans, 6);
        // scan 3 matches both searchable targets, scan 5 matches none,
        // scan 6 is excluded
        assert_eq!(summary.hit_scans, 1);
        assert_eq!(summary.features_built, 1);
    }

    let content = std::fs::read_to_string(&output).unwrap();
    std::fs::remove_file(&catalog).ok();
    std::fs::remove_file(&exclusion).ok();
    std::fs::remove_file(&output).ok();

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "500,10.1,target=WithLoss;target=ExcludedTarget");
    assert_eq!(lines[0], lines[1]);

    // features accumulated across both runs with sequential ids
    assert_eq!(sink.len(), 2);
    assert_eq!(sink.features[0].row_id, 1);
    assert_eq!(sink.features[1].row_id, 2);

    let feature = &sink.features[0];
    assert_eq!(feature.label, "target=WithLoss;target=ExcludedTarget");
    // MS1 scans 1, 2 and 4 fall in the ±0.5 min window around 10.1
    assert_eq!(feature.points.len(), 3);
    assert_eq!(feature.representative_scan, Some(2));
    assert_eq!(feature.height, 400.0);
    assert_eq!(feature.fragment_scan, Some(3));
    assert_eq!(feature.ms2_fragment_scans, vec![3]);
    assert!(feature.area > 0.0);
    assert!(sink.applied_method.is_some());
}
