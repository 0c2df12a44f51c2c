use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Verbosity levels, ordered from silent to everything
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Nothing = 0,
    User = 1,
    Error = 2,
    Warning = 3,
    #[default]
    Info = 4,
    Debug = 5,
    All = 6,
}

impl LogLevel {
    /// Create a LogLevel from an integer; out-of-range values give Info
    pub fn from_i32(level: i32) -> Self {
        match level {
            0 => LogLevel::Nothing,
            1 => LogLevel::User,
            2 => LogLevel::Error,
            3 => LogLevel::Warning,
            4 => LogLevel::Info,
            5 => LogLevel::Debug,
            6 => LogLevel::All,
            _ => LogLevel::Info,
        }
    }

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Parse a level name or number as written in a config file
    pub fn parse(s: &str) -> Result<Self> {
        let level = match s.trim().to_lowercase().as_str() {
            "nothing" | "off" | "none" => LogLevel::Nothing,
            "user" => LogLevel::User,
            "error" => LogLevel::Error,
            "warning" | "warn" => LogLevel::Warning,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "all" | "trace" => LogLevel::All,
            other => {
                let n: i32 = other.parse().with_context(|| {
                    format!(
                        "Invalid log level: {}. Valid options: nothing, user, error, warning, info, debug, all, 0-6",
                        s
                    )
                })?;
                if !(0..=6).contains(&n) {
                    anyhow::bail!("Log level out of range (0 to 6): {}", n);
                }
                LogLevel::from_i32(n)
            }
        };
        Ok(level)
    }

    /// Shift the level by `-q`/`-v` counts, saturating at both ends
    pub fn adjusted(self, verbose: u8, quiet: u8) -> Self {
        let level = self.as_i32() + i32::from(verbose) - i32::from(quiet);
        LogLevel::from_i32(level.clamp(0, 6))
    }

    /// The tracing filter for this level. User messages are always shown
    /// unless logging is off, so they share the error filter.
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::OFF,
            LogLevel::User | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::All => LevelFilter::TRACE,
        }
    }
}

/// Install the global fmt subscriber on stderr.
///
/// `RUST_LOG`, if set, takes precedence over `level`.
pub fn init(level: LogLevel) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.level_filter().into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

/// Run `f` with a temporary warning-level subscriber installed.
///
/// Used while loading the config, before the configured level is known.
pub fn bootstrap<T>(f: impl FnOnce() -> T) -> T {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::WARN)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}
