/*
[INPUT]:  Log level directive, optional log file, optional TUI log buffer
[OUTPUT]: Global tracing subscriber (stderr or TUI buffer, plus file)
[POS]:    Binary logging setup
[UPDATE]: 2026-09-02 Route TUI output into the Diagnostics buffer
[UPDATE]: 2026-09-06 Add optional non-blocking file layer
*/

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::tui::{LogBufferHandle, LogWriterFactory};

/// Primary destination for formatted events
pub(crate) enum LogSink {
    Stderr,
    Buffer(LogBufferHandle),
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must outlive
/// the program's logging.
pub(crate) fn init(level: &str, file: Option<&Path>, sink: LogSink) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(level).with_context(|| format!("invalid log level: {level}"))?;

    let (file_layer, guard) = match file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    let result = match sink {
        LogSink::Stderr => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogSink::Buffer(buffer) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(LogWriterFactory::new(buffer)),
            )
            .try_init(),
    };
    result
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}

fn file_writer(
    path: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path has no file name: {}", path.display()))?;
    fs::create_dir_all(directory)
        .with_context(|| format!("create log directory {}", directory.display()))?;
    let appender = tracing_appender::rolling::never(directory, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
