use std::{collections::HashMap, sync::RwLock};

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

use crate::util::config::LoggingSettings;

static LOGGER_CONFIG: Lazy<RwLock<LoggingConfig>> =
    Lazy::new(|| RwLock::new(LoggingConfig::default()));

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub enum LogLevel {
    INFO,
    VERBOSE,
}

#[macro_export]
macro_rules! logln {
    ($($arg:tt)+) => {
        if $crate::util::logging::is_enabled(Self::CC) {
            ::tracing::info!(cc = Self::CC, $($arg)+);
        }
    };
}

#[macro_export]
macro_rules! logvbln {
    ($($arg:tt)+) => {
        if $crate::util::logging::is_enabled(Self::CC)
            && $crate::util::logging::is_at_level(Self::CC, $crate::util::logging::LogLevel::VERBOSE)
        {
            ::tracing::debug!(cc = Self::CC, $($arg)+);
        }
    };
}

// Warnings ignore the per-component switches.
#[macro_export]
macro_rules! logwarn {
    ($($arg:tt)+) => {
        ::tracing::warn!(cc = Self::CC, $($arg)+);
    };
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_str()));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    if settings.verbose {
        set_global_level(LogLevel::VERBOSE);
    }

    for cc in &settings.disabled {
        disable_cc(cc);
    }
}

pub fn is_enabled(cc: &str) -> bool {
    LOGGER_CONFIG
        .read()
        .map(|config| config.cc_enabled(cc))
        .unwrap_or(true)
}

pub fn is_at_level(cc: &str, level: LogLevel) -> bool {
    LOGGER_CONFIG
        .read()
        .map(|config| config.cc_at_level(cc, level))
        .unwrap_or(false)
}

pub fn disable_cc(cc: &str) {
    if let Ok(mut config) = LOGGER_CONFIG.write() {
        config.disable_cc(cc);
    }
}

pub fn enable_cc(cc: &str, level: LogLevel) {
    if let Ok(mut config) = LOGGER_CONFIG.write() {
        config.enable_cc(cc, level);
    }
}

pub fn set_global_logging(enabled: bool) {
    if let Ok(mut config) = LOGGER_CONFIG.write() {
        config.global_tracing_enabled = enabled;
    }
}

pub fn set_global_level(level: LogLevel) {
    if let Ok(mut config) = LOGGER_CONFIG.write() {
        config.global_level = level;
    }
}

pub struct LoggingConfig {
    global_tracing_enabled: bool,
    global_level: LogLevel,
    flags: HashMap<String, (bool, LogLevel)>, // <component, (enabled, level)>
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_tracing_enabled: true,
            global_level: LogLevel::INFO,
            flags: Default::default(),
        }
    }
}

impl LoggingConfig {
    pub fn cc_enabled(&self, cc: &str) -> bool {
        if !self.global_tracing_enabled {
            return false;
        }

        self.flags.get(cc).map(|flag| flag.0).unwrap_or(true)
    }

    pub fn cc_at_level(&self, cc: &str, level: LogLevel) -> bool {
        if self.global_level >= level {
            return true;
        }

        self.flags.get(cc).map(|flag| flag.1 >= level).unwrap_or(false)
    }

    pub fn enable_cc(&mut self, cc: &str, level: LogLevel) {
        self.flags.insert(cc.to_string(), (true, level));
    }

    pub fn disable_cc(&mut self, cc: &str) {
        self.flags.insert(cc.to_string(), (false, LogLevel::INFO));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_default_to_enabled_at_info() {
        let config = LoggingConfig::default();
        assert!(config.cc_enabled("Feed"));
        assert!(config.cc_at_level("Feed", LogLevel::INFO));
        assert!(!config.cc_at_level("Feed", LogLevel::VERBOSE));
    }

    #[test]
    fn per_component_flags() {
        let mut config = LoggingConfig::default();
        config.disable_cc("Feed");
        config.enable_cc("Progress", LogLevel::VERBOSE);

        assert!(!config.cc_enabled("Feed"));
        assert!(config.cc_at_level("Progress", LogLevel::VERBOSE));

        config.global_tracing_enabled = false;
        assert!(!config.cc_enabled("Progress"));
    }
}
