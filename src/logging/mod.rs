/*!
 * Logging Module
 * Rolling file logs plus console output, configured once at startup
 */
pub mod config;
pub mod middleware;

use std::io;
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::{
    non_blocking,
    non_blocking::{NonBlocking, WorkerGuard},
    rolling,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::AppConfig;
use self::config::LogSettings;

struct Writers {
    file: NonBlocking,
    error: NonBlocking,
    console: NonBlocking,
}

fn open_writers(directory: &Path) -> (Writers, Vec<WorkerGuard>) {
    std::fs::create_dir_all(directory).ok();

    // All events
    let (file, file_guard) = non_blocking(rolling::daily(directory, "app.log"));
    // Errors only
    let (error, error_guard) = non_blocking(rolling::daily(directory, "error.log"));
    let (console, console_guard) = non_blocking(io::stdout());

    (
        Writers {
            file,
            error,
            console,
        },
        vec![file_guard, error_guard, console_guard],
    )
}

/// The error file layer is attached below the format split so both
/// branches stack their layers on the same inner subscriber type.
fn build_subscriber(settings: &LogSettings, writers: Writers) -> Box<dyn Subscriber + Send + Sync> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter_directive()));

    let error_layer = fmt::layer()
        .with_writer(writers.error)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::ERROR);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(error_layer);

    if settings.json {
        let file_layer = fmt::layer()
            .json()
            .with_writer(writers.file)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true);

        let console_layer = fmt::layer()
            .json()
            .with_writer(writers.console)
            .with_target(false);

        Box::new(subscriber.with(file_layer).with(console_layer))
    } else {
        let file_layer = fmt::layer()
            .with_writer(writers.file)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false);

        let console_layer = fmt::layer()
            .with_writer(writers.console)
            .with_target(true)
            .pretty();

        Box::new(subscriber.with(file_layer).with(console_layer))
    }
}

/// Initialize the logging system. The returned guards flush the background
/// writers on drop, so hold them for the lifetime of the process.
pub fn init(app_config: &AppConfig) -> Vec<WorkerGuard> {
    let settings = LogSettings::from_config(app_config);
    let (writers, guards) = open_writers(&settings.directory);

    build_subscriber(&settings, writers).init();

    tracing::info!(
        environment = %app_config.environment,
        level = %settings.level,
        directory = %settings.directory.display(),
        "Logging initialized"
    );

    guards
}
