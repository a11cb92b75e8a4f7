use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human output for the local server.
    Compact,
    /// One JSON object per event, for CloudWatch.
    Json,
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(format: LogFormat, verbose: bool) -> &'static str {
    match (format, verbose) {
        (LogFormat::Compact, false) => "contact_relay=info",
        (LogFormat::Compact, true) => "contact_relay=debug,tower_http=debug,info",
        (LogFormat::Json, false) => "contact_relay=info,lambda_runtime=warn",
        (LogFormat::Json, true) => "contact_relay=debug,lambda_runtime=info",
    }
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(format, verbose)));

    let compact = (format == LogFormat::Compact).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .compact()
    });
    // Lambda stamps each log line itself.
    let json = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(false)
            .without_time()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(json)
        .init();
}

/// Shortens user-supplied text before it reaches the logs.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
