//! # Structured Logging Module
//!
//! Environment-aware structured logging that outputs to the console and,
//! optionally, to JSON log files for tracing transition and listener activity.

use crate::config::LoggingConfig;
use crate::constants::environments;
use chrono::Utc;
use std::fs;
use std::process;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging from loaded configuration.
///
/// Only the first call installs a subscriber; later calls are ignored.
pub fn init_with_config(environment: &str, log_level: &str, config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_ansi(true)
            .with_filter(EnvFilter::new(log_level));

        let mut log_file = None;
        let file_layer = if config.file_output && fs::create_dir_all(&config.log_directory).is_ok()
        {
            let pid = process::id();
            let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
            let file_name = format!("{environment}.{pid}.{timestamp}.log");
            log_file = Some(config.log_directory.join(&file_name));

            let file_appender = tracing_appender::rolling::never(&config.log_directory, file_name);
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            // The writer must outlive every log call in the process.
            std::mem::forget(guard);

            Some(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_level(true)
                    .with_ansi(false)
                    .json()
                    .with_filter(EnvFilter::new(log_level)),
            )
        } else {
            None
        };

        let subscriber = tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            pid = process::id(),
            environment = %environment,
            log_file = ?log_file,
            "STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get log level based on environment
pub fn log_level_for(environment: &str) -> String {
    match environment {
        environments::PRODUCTION => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log a committed transition
pub fn log_transition(manager: &str, operation: &str, previous: &str, current: &str, listeners: usize) {
    tracing::debug!(
        manager = %manager,
        operation = %operation,
        previous = %previous,
        current = %current,
        listeners = listeners,
        timestamp = %Utc::now().to_rfc3339(),
        "STATE_TRANSITION"
    );
}

/// Log a listener registry change
pub fn log_listener_operation(operation: &str, registered: usize) {
    tracing::trace!(
        operation = %operation,
        registered = registered,
        "LISTENER_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::warn!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "STATE_ERROR"
    );
}
