use crate::error::Result;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

/// Maps the repeatable `-v` flag (and `-q`) onto a tracing level filter.
fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber: a compact stderr layer, plus a plain
/// uncolored layer into `log_file` when one is given. Both commands run
/// synchronously on the main thread, so the file layer records targets but
/// no thread decoration.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(&path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true);

        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use tracing::info;

    #[test]
    fn verbosity_maps_onto_level_filters() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(3, false), LevelFilter::TRACE);
        assert_eq!(level_filter(250, false), LevelFilter::TRACE);
    }

    #[test]
    fn quiet_silences_every_verbosity() {
        for verbosity in 0..4 {
            assert_eq!(level_filter(verbosity, true), LevelFilter::OFF);
        }
    }

    #[test]
    fn file_layer_records_events_with_targets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("varmod.log");

        let file = File::create(&path).unwrap();
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true);
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            info!(models = 3, "build finished");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("build finished"));
        assert!(content.contains("models=3"));
        assert!(content.contains("INFO"));
    }

    #[test]
    fn unwritable_log_file_is_an_io_error() {
        // A directory path cannot be created as a file; the error surfaces
        // before any global subscriber is installed.
        let dir = tempfile::tempdir().unwrap();
        let result = setup_logging(0, false, Some(dir.path().to_path_buf()));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
