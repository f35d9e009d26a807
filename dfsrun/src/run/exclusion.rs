use std::path::Path;

use dfscore::data::target::ExclusionWindow;
use tracing::warn;

use crate::run::catalog::{clean_field, csv_reader, CatalogError};

/// Loads the precursor/RT exclusion list.
///
/// Row format: `mz, rtStart, rtEnd`, all decimal; the RT interval is closed.
/// Same contract as the catalog loader: malformed rows are warned about and
/// skipped, anything preventing the read is fatal.
pub fn read_exclusions(path: &Path) -> Result<Vec<ExclusionWindow>, CatalogError> {
    let mut reader = csv_reader(path)?;
    let mut windows = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let fields: Option<Vec<f64>> = (0..3)
            .map(|i| record.get(i).and_then(|f| clean_field(f).parse::<f64>().ok()))
            .collect();

        match fields {
            Some(values) => windows.push(ExclusionWindow::new(values[0], values[1], values[2])),
            None => {
                warn!(line = line + 1, "skipping malformed exclusion row");
            }
        }
    }

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("dfsrun-exclusion-{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn exclusion_rows_parse_into_closed_windows() {
        let path = write_temp("ok.csv", "500.0,10,12\n600.5,1.5,2.5\n");
        let windows = read_exclusions(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0], ExclusionWindow::new(500.0, 10.0, 12.0));
        assert!(windows[0].contains_rt(12.0));
    }

    #[test]
    fn malformed_exclusion_rows_are_skipped() {
        let path = write_temp("bad.csv", "500.0,10,12\nnot-a-number,1,2\n700.0,3\n");
        let windows = read_exclusions(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn missing_exclusion_file_is_fatal() {
        let path = std::env::temp_dir().join("dfsrun-exclusion-does-not-exist.csv");
        assert!(read_exclusions(&path).is_err());
    }
}
