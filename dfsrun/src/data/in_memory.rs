use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use dfscore::data::spectrum::{DataPoint, Spectrum};

use crate::data::provider::ScanProvider;

/// Scan provider backed by a plain vector of spectra.
///
/// Spectra are kept in the order they were handed in, which is taken to be
/// acquisition order.
pub struct InMemoryScans {
    name: String,
    spectra: Vec<Spectrum>,
}

impl InMemoryScans {
    pub fn new(name: impl Into<String>, spectra: Vec<Spectrum>) -> Self {
        InMemoryScans {
            name: name.into(),
            spectra,
        }
    }

    /// Loads a JSON dump of spectra, naming the source after the file stem.
    pub fn from_json(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        let spectra: Vec<Spectrum> = serde_json::from_reader(BufReader::new(file))?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "spectra".to_string());
        Ok(InMemoryScans::new(name, spectra))
    }

    fn in_ranges(spectrum: &Spectrum, rt_range: (f64, f64), mz_range: (f64, f64)) -> bool {
        if spectrum.ms_level != 2 {
            return false;
        }
        let Some(precursor_mz) = spectrum.precursor_mz else {
            return false;
        };
        rt_range.0 <= spectrum.retention_time
            && spectrum.retention_time <= rt_range.1
            && mz_range.0 <= precursor_mz
            && precursor_mz <= mz_range.1
    }
}

impl ScanProvider for InMemoryScans {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn spectra(&self) -> &[Spectrum] {
        &self.spectra
    }

    fn spectrum_by_id(&self, scan_id: i32) -> Option<&Spectrum> {
        self.spectra.iter().find(|s| s.scan_id == scan_id)
    }

    fn ms1_scan_ids_in_rt_range(&self, rt_min: f64, rt_max: f64) -> Vec<i32> {
        self.spectra
            .iter()
            .filter(|s| s.ms_level == 1 && rt_min <= s.retention_time && s.retention_time <= rt_max)
            .map(|s| s.scan_id)
            .collect()
    }

    fn base_peak_within(&self, scan_id: i32, mz_min: f64, mz_max: f64) -> Option<DataPoint> {
        self.spectrum_by_id(scan_id)
            .and_then(|s| s.base_peak_within(mz_min, mz_max))
    }

    fn best_fragment_scan(&self, rt_range: (f64, f64), mz_range: (f64, f64)) -> Option<i32> {
        let mut best: Option<(i32, f64)> = None;
        for spectrum in &self.spectra {
            if !Self::in_ranges(spectrum, rt_range, mz_range) {
                continue;
            }
            let intensity = spectrum.base_peak().map(|p| p.intensity).unwrap_or(0.0);
            match best {
                Some((_, top)) if top >= intensity => {}
                _ => best = Some((spectrum.scan_id, intensity)),
            }
        }
        best.map(|(scan_id, _)| scan_id)
    }

    fn ms2_fragment_scans(&self, rt_range: (f64, f64), mz_range: (f64, f64)) -> Vec<i32> {
        self.spectra
            .iter()
            .filter(|s| Self::in_ranges(s, rt_range, mz_range))
            .map(|s| s.scan_id)
            .collect()
    }
}
