// ---------------------------------------------------------------------------
// Operation telemetry — an optional observer around engine calls.
//
// The engine never depends on this; callers that want per-operation timing
// wrap their calls in `OpLog::time`, which emits a tracing record and
// appends an `operation,elapsed_ms` row to a CSV file.
// ---------------------------------------------------------------------------

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

pub struct OpLog {
    csv_path: PathBuf,
}

impl OpLog {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
        }
    }

    /// Run `f`, logging its elapsed wall time. CSV append failures are
    /// logged and swallowed; telemetry is not a correctness dependency.
    pub fn time<T>(&self, operation: &str, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let result = f();
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        tracing::info!(operation, elapsed_ms, "operation completed");
        if let Err(e) = self.append(operation, elapsed_ms) {
            tracing::warn!("Failed to append telemetry row: {}", e);
        }
        result
    }

    fn append(&self, operation: &str, elapsed_ms: f64) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)?;
        writeln!(file, "{},{:.3}", operation, elapsed_ms)
    }
}
