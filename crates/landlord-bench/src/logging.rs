use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

/// Keeps the telemetry writer flushing until dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Installs a JSON subscriber writing to `telemetry.jsonl` beside the summary.
/// Does nothing unless structured logging is enabled.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
    run_id: &str,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_path = outputs.telemetry_path();
    if let Some(dir) = telemetry_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating telemetry directory at {}", dir.display()))?;
    }

    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // A subscriber may already be installed when running inside tests.
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!(target: "landlord_bench::run", run_id, "telemetry_started");

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn outputs(dir: &std::path::Path) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: dir.join("hands.jsonl"),
            summary_md: dir.join("nested").join("summary.md"),
        }
    }

    #[test]
    fn disabled_logging_installs_nothing() {
        let dir = tempdir().unwrap();
        let guard = init_logging(&LoggingConfig::default(), &outputs(dir.path()), "run").unwrap();
        assert!(guard.is_none());
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn structured_logging_creates_the_telemetry_file() {
        let dir = tempdir().unwrap();
        let config = LoggingConfig {
            enable_structured: true,
            tracing_level: "debug".into(),
        };
        let guard = init_logging(&config, &outputs(dir.path()), "run")
            .unwrap()
            .expect("guard");
        assert_eq!(
            guard.telemetry_path,
            dir.path().join("nested").join("telemetry.jsonl")
        );
        assert!(guard.telemetry_path.exists());
    }
}
