use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Standardized logging macros for consistent field names and message patterns across the service
///
/// These macros ensure:
/// - Consistent field naming conventions
/// - Appropriate logging levels for different scenarios
/// - Structured logging with context

// ============================================================================
// API Operation Logging Macros
// ============================================================================

/// Log the start of an API operation with consistent fields
#[macro_export]
macro_rules! log_api_start {
    ($operation:expr, request_id = $request_id:expr) => {
        tracing::debug!(
            operation = $operation,
            request_id = %$request_id,
            "API operation started"
        );
    };
    ($operation:expr) => {
        tracing::debug!(
            operation = $operation,
            "API operation started"
        );
    };
}

/// Log successful completion of an API operation
#[macro_export]
macro_rules! log_api_success {
    ($operation:expr, request_id = $request_id:expr, duration_ms = $duration:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            request_id = %$request_id,
            duration_ms = $duration,
            "API operation completed: {}", $msg
        );
    };
    ($operation:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            "API operation completed: {}", $msg
        );
    };
}

/// Log API warnings with context
#[macro_export]
macro_rules! log_api_warn {
    ($operation:expr, request_id = $request_id:expr, $msg:expr) => {
        tracing::warn!(
            operation = $operation,
            request_id = %$request_id,
            "API operation warning: {}", $msg
        );
    };
    ($operation:expr, $msg:expr) => {
        tracing::warn!(
            operation = $operation,
            "API operation warning: {}", $msg
        );
    };
}

/// Log API operation errors with consistent structure
#[macro_export]
macro_rules! log_api_error {
    ($operation:expr, request_id = $request_id:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            request_id = %$request_id,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
}

// ============================================================================
// Backend (Ollama) Logging Macros
// ============================================================================

/// Log calls to the inference backend
#[macro_export]
macro_rules! log_backend_operation {
    (start, $operation:expr, model = $model:expr, prompt_length = $length:expr) => {
        tracing::info!(
            component = "ollama",
            operation = $operation,
            model = %$model,
            prompt_length = $length,
            "Backend operation started"
        );
    };
    (success, $operation:expr, duration_ms = $duration:expr, response_length = $length:expr) => {
        tracing::info!(
            component = "ollama",
            operation = $operation,
            duration_ms = $duration,
            response_length = $length,
            "Backend operation completed successfully"
        );
    };
    (retry, attempt = $attempt:expr, max_attempts = $max:expr, error = $error:expr) => {
        tracing::warn!(
            component = "ollama",
            attempt = $attempt,
            max_attempts = $max,
            error = %$error,
            "Retry {}/{} after error: {}", $attempt, $max, $error
        );
    };
    (error, $operation:expr, error = $error:expr) => {
        tracing::error!(
            component = "ollama",
            operation = $operation,
            error = %$error,
            "Backend operation failed"
        );
    };
    (probe, ready = $ready:expr, $msg:expr) => {
        tracing::debug!(
            component = "ollama",
            operation = "readiness_probe",
            ready = $ready,
            "Readiness probe: {}", $msg
        );
    };
}

// ============================================================================
// System Event Logging Macros
// ============================================================================

/// Log system startup and shutdown events
#[macro_export]
macro_rules! log_system_event {
    (startup, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "startup",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (shutdown, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "shutdown",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (config, $msg:expr) => {
        tracing::info!(event_type = "configuration", "System event: {}", $msg);
    };
}

// ============================================================================
// Performance Logging Macros
// ============================================================================

/// Log performance metrics with consistent structure
#[macro_export]
macro_rules! log_performance {
    ($operation:expr, duration_ms = $duration:expr, attempts = $attempts:expr) => {
        tracing::debug!(
            event_type = "performance",
            operation = $operation,
            duration_ms = $duration,
            attempts = $attempts,
            "Performance metrics"
        );
    };
    ($operation:expr, duration_ms = $duration:expr) => {
        tracing::debug!(
            event_type = "performance",
            operation = $operation,
            duration_ms = $duration,
            "Performance metrics"
        );
    };
}

// ============================================================================
// Validation Logging Macros
// ============================================================================

/// Log validation results consistently
#[macro_export]
macro_rules! log_validation {
    (success, $component:expr, $msg:expr) => {
        tracing::debug!(
            event_type = "validation",
            component = $component,
            result = "success",
            "Validation completed: {}", $msg
        );
    };
    (failure, $component:expr, error = $error:expr) => {
        tracing::warn!(
            event_type = "validation",
            component = $component,
            result = "failure",
            error = %$error,
            "Validation failed"
        );
    };
}

/// Install the global subscriber: env filter, optional console output and
/// optional daily-rotated file output. Keep the returned guard alive for the
/// lifetime of the process or buffered file output is lost.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = config.console_enabled.then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(true)
    });

    let (file_layer, guard) = if config.file_enabled {
        std::fs::create_dir_all(&config.log_directory).unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not create log directory '{}': {}",
                config.log_directory, e
            );
        });

        let file_appender =
            tracing_appender::rolling::daily(&config.log_directory, "flashcard-api.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(non_blocking_file);

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    log_system_event!(
        startup,
        component = "logging",
        format!(
            "Logging initialized (console: {}, file: {})",
            config.console_enabled, config.file_enabled
        )
    );

    Ok(guard)
}
