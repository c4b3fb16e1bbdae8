use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file prefix.
pub const LOG_ENV: &str = "BULIN_LOG";

/// Initialize tracing with optional file output.
///
/// Logging is off by default because the editor owns the terminal.
/// Set `BULIN_LOG` to a file path to enable it; `RUST_LOG` picks the filter.
///
/// Each run writes to `{path}.{timestamp}.{pid}` so concurrent editors never
/// share a file.
pub fn init_tracing() {
    let Some(log_path) = std::env::var(LOG_ENV).ok() else {
        return;
    };

    let Ok(file) = std::fs::File::create(unique_path(&log_path)) else {
        eprintln!("Warning: Failed to create log file under {}", log_path);
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}

fn unique_path(log_path: &str) -> String {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}.{}.{}", log_path, timestamp, std::process::id())
}
