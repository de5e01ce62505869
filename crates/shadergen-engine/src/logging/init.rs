use std::sync::Once;

use log::LevelFilter;

/// Crates below the engine that log GL/window probing noise at `info`.
const PLATFORM_MODULES: &[&str] = &["glutin", "glutin_winit", "winit", "calloop", "sctk"];

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "shadergen_engine=debug"). When unset, `RUST_LOG` is consulted, then
/// `default_level` with `platform_level` capping the windowing/GL crates.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub platform_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            platform_level: LevelFilter::Warn,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Where the active filter came from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterSource {
    Explicit(String),
    Environment(String),
    Defaults,
}

/// Explicit filter beats `RUST_LOG`, which beats the configured defaults.
/// Blank values count as unset.
fn filter_source(explicit: Option<String>, environment: Option<String>) -> FilterSource {
    let non_blank = |s: Option<String>| s.filter(|f| !f.trim().is_empty());
    match (non_blank(explicit), non_blank(environment)) {
        (Some(f), _) => FilterSource::Explicit(f),
        (None, Some(f)) => FilterSource::Environment(f),
        (None, None) => FilterSource::Defaults,
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent; subsequent calls are ignored. Call early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        let source = filter_source(config.env_filter, std::env::var("RUST_LOG").ok());
        match &source {
            FilterSource::Explicit(filter) | FilterSource::Environment(filter) => {
                builder.parse_filters(filter);
            }
            FilterSource::Defaults => {
                builder.filter_level(config.default_level);
                for module in PLATFORM_MODULES {
                    builder.filter_module(module, config.platform_level.min(config.default_level));
                }
            }
        }

        builder.write_style(config.write_style);
        builder.format_timestamp_millis();

        // A test harness may have installed its own logger already.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized ({source:?})");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_environment() {
        assert_eq!(
            filter_source(Some("debug".into()), Some("warn".into())),
            FilterSource::Explicit("debug".into())
        );
    }

    #[test]
    fn environment_used_without_explicit_filter() {
        assert_eq!(
            filter_source(None, Some("shadergen_engine=trace".into())),
            FilterSource::Environment("shadergen_engine=trace".into())
        );
    }

    #[test]
    fn blank_values_fall_through_to_defaults() {
        assert_eq!(filter_source(Some("  ".into()), Some(String::new())), FilterSource::Defaults);
    }
}
