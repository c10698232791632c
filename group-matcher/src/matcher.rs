use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use miette::{IntoDiagnostic, Result};
use tempfile::NamedTempFile;

use crate::engine::{EngineStats, GroupingEngine};
use crate::error::GroupingError;
use crate::report::Report;

/// Outcome of a complete [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub groups: usize,
    pub multi_member_groups: usize,
    pub stats: EngineStats,
    pub elapsed: Duration,
}

/// Groups the records in `input` and renders the report, without timing information.
#[tracing::instrument(skip_all)]
pub fn process(input: &str) -> Result<String> {
    let mut engine = GroupingEngine::default();
    engine.ingest(input.as_bytes()).into_diagnostic()?;

    let (grouping, lines) = engine.finish();
    Ok(Report::new(&grouping, &lines).to_string())
}

/// Reads records from `input`, groups them and writes the report to `output`.
///
/// The input is fully read before anything is written, and the report only
/// replaces `output` once it has been written completely.
#[tracing::instrument]
pub fn run(input: &Path, output: &Path) -> Result<Summary> {
    let start = Instant::now();

    let file = File::open(input).map_err(|e| GroupingError::input(input, e))?;
    let mut engine = GroupingEngine::default();
    engine
        .ingest(BufReader::new(file))
        .map_err(|e| GroupingError::input(input, e))?;

    let stats = engine.stats();
    let records = engine.len();
    let (grouping, lines) = engine.finish();

    let report = Report::new(&grouping, &lines).with_elapsed(start.elapsed());
    write_atomically(output, &report).map_err(|e| GroupingError::output(output, e))?;

    let summary = Summary {
        records,
        groups: grouping.len(),
        multi_member_groups: grouping.multi_member_count(),
        stats,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        groups = summary.groups,
        multi_member_groups = summary.multi_member_groups,
        "report written to {}",
        output.display()
    );
    Ok(summary)
}

fn write_atomically(path: &Path, report: &Report<'_>) -> io::Result<()> {
    // The temporary file must live on the same filesystem for the rename to be atomic
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write!(writer, "{report}")?;
        writer.flush()?;
    }

    // Temporary files are created owner-only: keep an existing report's mode, else 0644
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let permissions = match fs::metadata(path) {
            Ok(metadata) => metadata.permissions(),
            Err(_) => fs::Permissions::from_mode(0o644),
        };
        tmp.as_file().set_permissions(permissions)?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
