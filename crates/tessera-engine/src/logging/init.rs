use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses `env_logger` filter syntax, e.g.
/// `"tessera_engine=debug,wgpu_core=warn"`. When unset, `RUST_LOG` is read,
/// then `default_level` applies.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    /// wgpu is chatty at info; its crates are capped at this level unless a
    /// filter names them.
    pub wgpu_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            wgpu_level: log::LevelFilter::Warn,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Filter string handed to `env_logger`.
    fn resolve_filter(&self, rust_log: Option<String>) -> String {
        if let Some(filter) = self.env_filter.clone().or(rust_log) {
            return filter;
        }
        let level = self.default_level.as_str().to_ascii_lowercase();
        let wgpu = self.wgpu_level.as_str().to_ascii_lowercase();
        format!("{level},wgpu_core={wgpu},wgpu_hal={wgpu},naga={wgpu}")
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolve_filter(std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_timestamp_millis()
            .init();

        log::debug!("logging initialized ({filter})");
    });
}
