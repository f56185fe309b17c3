use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses `env_logger` syntax, e.g. `"info"` or
/// `"logodust_engine::logo=debug,wgpu_core=warn"`. It wins over `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Crates that log heavily at info during adapter and pipeline setup.
const NOISY_GPU_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Filter string to install: explicit config, then `RUST_LOG`, then the
/// default of info with GPU crates at warn.
fn resolve_filter(config: &LoggingConfig, rust_log: Option<String>) -> String {
    if let Some(f) = config.env_filter.as_ref().filter(|f| !f.trim().is_empty()) {
        return f.clone();
    }
    if let Some(f) = rust_log.filter(|f| !f.trim().is_empty()) {
        return f;
    }

    let mut filter = String::from("info");
    for module in NOISY_GPU_MODULES {
        filter.push_str(&format!(",{module}=warn"));
    }
    filter
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config, std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .format_timestamp_millis()
            .init();

        log::debug!("logging initialized with filter `{filter}`");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_beats_rust_log() {
        let config = LoggingConfig {
            env_filter: Some("debug".into()),
            ..LoggingConfig::default()
        };
        assert_eq!(resolve_filter(&config, Some("trace".into())), "debug");
    }

    #[test]
    fn rust_log_used_when_unconfigured() {
        assert_eq!(resolve_filter(&LoggingConfig::default(), Some("warn".into())), "warn");
    }

    #[test]
    fn default_quiets_gpu_crates() {
        let f = resolve_filter(&LoggingConfig::default(), Some("  ".into()));
        assert!(f.starts_with("info"));
        assert!(f.contains("wgpu_core=warn"));
        assert!(f.contains("naga=warn"));
    }
}
