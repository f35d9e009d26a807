use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use dfscore::data::target::MatchResult;

const NAME_PATTERN: &str = "{}";

/// Restricts a source name to `[A-Za-z0-9.-]`, mapping everything else to
/// `_`, so it is safe to splice into a filename.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Substitutes the `{}` placeholder in an output path with the sanitized
/// source name. Paths without the placeholder pass through unchanged.
pub fn resolve_output_path(template: &Path, source_name: &str) -> PathBuf {
    let template_str = template.to_string_lossy();
    if template_str.contains(NAME_PATTERN) {
        PathBuf::from(template_str.replace(NAME_PATTERN, &sanitize_name(source_name)))
    } else {
        template.to_path_buf()
    }
}

/// Append-mode writer for the hit list.
///
/// Repeated runs against the same path accumulate rows. The buffer is flushed
/// on [`HitWriter::flush`] and again on drop, so rows written before an early
/// exit survive it.
pub struct HitWriter {
    writer: BufWriter<std::fs::File>,
}

impl HitWriter {
    pub fn create(template: &Path, source_name: &str) -> io::Result<HitWriter> {
        let path = resolve_output_path(template, source_name);
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(HitWriter {
            writer: BufWriter::new(file),
        })
    }

    /// Appends one hit as `precursorMZ,retentionTime,target=A;target=B`.
    pub fn write_hit(&mut self, result: &MatchResult) -> io::Result<()> {
        writeln!(
            self.writer,
            "{},{},{}",
            result.precursor_mz,
            result.retention_time,
            result.label()
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
