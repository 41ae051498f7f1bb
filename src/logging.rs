use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming a log file path.
pub const LOG_FILE_ENV: &str = "STUDYBUDDY_LOG";

/// Initialize tracing.
///
/// Logs go to stderr so `studybuddy ask` output on stdout stays clean.
/// Set `STUDYBUDDY_LOG` to a file path to log to a file instead; the file
/// gets a unique name `{path}.{timestamp}.{pid}` so concurrent instances
/// don't clobber each other. `RUST_LOG` controls the filter (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(log_path) = std::env::var(LOG_FILE_ENV).ok().filter(|p| !p.trim().is_empty()) else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_timer(UtcTime::rfc_3339());
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init();
        return;
    };

    let pid = std::process::id();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let unique_path = format!("{}.{}.{}", log_path, timestamp, pid);

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: Failed to create log file: {}", unique_path);
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(UtcTime::rfc_3339());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
}
