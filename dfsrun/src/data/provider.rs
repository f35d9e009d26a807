use dfscore::data::spectrum::{DataPoint, Spectrum};

/// Read-only access to an ordered run of scans.
///
/// The screening task is written against this seam so that classification and
/// chromatogram building stay independent of where the spectra come from; the
/// in-memory implementation backs tests and the CLI, a vendor-format reader
/// can slot in behind the same trait.
pub trait ScanProvider {
    /// Name of the underlying data source, used for output labelling and
    /// filename templating.
    fn source_name(&self) -> &str;

    /// All spectra of the run, in acquisition order.
    fn spectra(&self) -> &[Spectrum];

    fn spectrum_by_id(&self, scan_id: i32) -> Option<&Spectrum>;

    /// Scan ids of all MS1 spectra whose retention time falls in the closed
    /// window `[rt_min, rt_max]`, in acquisition order.
    fn ms1_scan_ids_in_rt_range(&self, rt_min: f64, rt_max: f64) -> Vec<i32>;

    /// The most intense data point of the given scan within the closed m/z
    /// window, if any.
    fn base_peak_within(&self, scan_id: i32, mz_min: f64, mz_max: f64) -> Option<DataPoint>;

    /// The most intense MS2 scan whose precursor falls inside the given
    /// RT and m/z spanning ranges.
    fn best_fragment_scan(&self, rt_range: (f64, f64), mz_range: (f64, f64)) -> Option<i32>;

    /// All MS2 scans whose precursor falls inside the given RT and m/z
    /// spanning ranges, in acquisition order.
    fn ms2_fragment_scans(&self, rt_range: (f64, f64), mz_range: (f64, f64)) -> Vec<i32>;
}
