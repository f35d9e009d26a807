use std::num::ParseFloatError;
use std::path::Path;

use dfscore::data::target::DiagnosticTarget;
use thiserror::Error;
use tracing::warn;

/// Failure to establish a catalog or exclusion baseline. Always fatal for the
/// run; per-row parse problems are logged and skipped instead.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Strips a UTF-8 byte-order mark and surrounding whitespace from one field.
pub(crate) fn clean_field(field: &str) -> &str {
    field.trim().trim_start_matches('\u{feff}').trim()
}

/// Parses a semicolon-separated list of decimals; an empty field means "no
/// constraint of this kind".
fn parse_mz_list(field: &str) -> Result<Option<Vec<f64>>, ParseFloatError> {
    let field = clean_field(field);
    if field.is_empty() {
        return Ok(None);
    }
    field
        .split(';')
        .map(|token| token.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map(Some)
}

pub(crate) fn csv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, CatalogError> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })
}

/// Loads the diagnostic target catalog.
///
/// Row format: `name, mz1;mz2;..., nl1;nl2;...`. Either numeric column may be
/// empty, and a missing third column counts as an absent neutral-loss
/// constraint. Malformed rows are warned about and skipped; targets come back
/// in file order.
pub fn read_targets(path: &Path) -> Result<Vec<DiagnosticTarget>, CatalogError> {
    let mut reader = csv_reader(path)?;
    let mut targets = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let Some(name) = record.get(0).map(clean_field).filter(|name| !name.is_empty()) else {
            warn!(line = line + 1, "skipping catalog row without a target name");
            continue;
        };
        let Some(mz_field) = record.get(1) else {
            warn!(line = line + 1, name, "skipping catalog row without an m/z column");
            continue;
        };

        let fragment_mz = match parse_mz_list(mz_field) {
            Ok(list) => list,
            Err(err) => {
                warn!(line = line + 1, name, %err, "skipping catalog row with unparseable fragment m/z");
                continue;
            }
        };
        let neutral_loss = match record.get(2).map(parse_mz_list).unwrap_or(Ok(None)) {
            Ok(list) => list,
            Err(err) => {
                warn!(line = line + 1, name, %err, "skipping catalog row with unparseable neutral loss");
                continue;
            }
        };

        targets.push(DiagnosticTarget::new(name, fragment_mz, neutral_loss));
    }

    Ok(targets)
}
