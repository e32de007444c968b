use anyhow::{Context, Result};
use tracing::{Level, Subscriber};
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    fmt::{time::ChronoUtc, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Environment variable overriding the default log level
pub const ENV_LOG_LEVEL: &str = "TOOL_PARSER_LOG_LEVEL";

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the application (default: WARN)
    pub level: Level,
    /// Whether to use json format for logs (default: false)
    pub json_format: bool,
    /// Path to store log files. If None, logs will only go to stderr
    pub log_dir: Option<String>,
    /// Whether to colorize logs when output is a terminal (default: true)
    pub colorize: bool,
    /// Log file name to use if log_dir is specified
    pub log_file_name: String,
    /// Log targets the level applies to
    pub log_targets: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            json_format: false,
            log_dir: None,
            colorize: true,
            log_file_name: "tool-call-extractor".to_string(),
            log_targets: vec!["tool_call_extractor".to_string()],
        }
    }
}

impl LoggingConfig {
    /// Default config with the level taken from `TOOL_PARSER_LOG_LEVEL` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(level) = std::env::var(ENV_LOG_LEVEL)
            .ok()
            .and_then(|value| parse_level(&value))
        {
            config.level = level;
        }
        config
    }
}

/// Parse a level name ("warn", "INFO", ...), ignoring case
pub fn parse_level(value: &str) -> Option<Level> {
    value.trim().parse::<Level>().ok()
}

/// Guard that keeps the file appender worker thread alive
///
/// This must be kept in scope for the duration of the program
/// to ensure logs are properly written to files
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

fn filter_string(config: &LoggingConfig) -> String {
    let level = config.level.as_str().to_ascii_lowercase();
    config
        .log_targets
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

fn fmt_layer<S, W>(writer: W, ansi: bool, json: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_timer(ChronoUtc::new(TIME_FORMAT.to_string()));
    if json {
        layer.json().flatten_event(true).boxed()
    } else {
        layer.boxed()
    }
}

/// Daily rolling file under `dir`, written from a background thread
fn open_log_file(dir: &str, file_name: &str) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name)
        .build(dir)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize the logging system with the given configuration
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once keeps the first subscriber. If the log directory is unusable
/// logging continues on stderr only.
pub fn init_logging(config: LoggingConfig) -> LogGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_string(&config)));

    let mut layers = vec![fmt_layer(std::io::stderr, config.colorize, config.json_format)];
    let mut file_guard = None;

    if let Some(dir) = &config.log_dir {
        match open_log_file(dir, &config.log_file_name) {
            Ok((writer, guard)) => {
                layers.push(fmt_layer(writer, false, config.json_format));
                file_guard = Some(guard);
            }
            Err(e) => eprintln!("File logging disabled: {:#}", e),
        }
    }

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init();

    LogGuard {
        _file_guard: file_guard,
    }
}
