use std::sync::Once;

/// Logger configuration.
///
/// `filter` follows `env_logger` filter syntax (e.g. "info",
/// "tiamat_engine=debug"). When unset, `RUST_LOG` is consulted and the
/// fallback level is `info`.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub style: Option<env_logger::WriteStyle>,
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
///
/// Intended usage is early in `main`, before the first frame.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.style.unwrap_or(env_logger::WriteStyle::Auto));
        builder.init();

        log::debug!("logging initialized");
    });
}
