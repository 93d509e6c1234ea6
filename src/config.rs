//! Configuration management for the status dashboard

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::debounce::DEFAULT_DEBOUNCE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Optional JSON snapshot file; the built-in fixture is used when absent
    pub data_path: Option<String>,

    /// Viewport width used for the initial render
    pub viewport_width: u32,

    /// Quiet period before a resize burst is acted upon
    pub resize_debounce: Duration,

    /// Seed for the synthetic history generator
    pub history_seed: Option<u64>,

    /// Where to write the rendered page; stdout when absent
    pub output_path: Option<String>,

    /// Read viewport widths from stdin, one per line
    pub follow_resize_events: bool,

    /// Title of the rendered page
    pub page_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            viewport_width: 1280,
            resize_debounce: DEFAULT_DEBOUNCE,
            history_seed: None,
            output_path: None,
            follow_resize_events: false,
            page_title: "Service Status".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup("DASHBOARD_DATA_PATH") {
            if !path.trim().is_empty() {
                config.data_path = Some(path.trim().to_string());
            }
        }

        if let Some(width) = lookup("VIEWPORT_WIDTH") {
            if let Ok(width) = width.trim().parse() {
                config.viewport_width = width;
            }
        }

        if let Some(debounce) = lookup("RESIZE_DEBOUNCE_MS") {
            if let Ok(ms) = debounce.trim().parse::<u64>() {
                config.resize_debounce = Duration::from_millis(ms);
            }
        }

        if let Some(seed) = lookup("HISTORY_SEED") {
            if let Ok(seed) = seed.trim().parse() {
                config.history_seed = Some(seed);
            }
        }

        if let Some(output) = lookup("OUTPUT_PATH") {
            if !output.trim().is_empty() {
                config.output_path = Some(output.trim().to_string());
            }
        }

        if let Some(follow) = lookup("FOLLOW_RESIZE_EVENTS") {
            config.follow_resize_events = follow.to_lowercase() == "true";
        }

        if let Some(title) = lookup("PAGE_TITLE") {
            config.page_title = title;
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.viewport_width == 0 {
            return Err("viewport_width must be greater than 0".to_string());
        }

        if self.resize_debounce.is_zero() {
            return Err("resize_debounce must be greater than 0".to_string());
        }

        if self.page_title.trim().is_empty() {
            return Err("page_title cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.viewport_width, 1280);
        assert_eq!(config.resize_debounce, Duration::from_millis(120));
        assert!(config.data_path.is_none());
        assert!(!config.follow_resize_events);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DASHBOARD_DATA_PATH", "/tmp/status.json"),
            ("VIEWPORT_WIDTH", "700"),
            ("RESIZE_DEBOUNCE_MS", "250"),
            ("HISTORY_SEED", "42"),
            ("FOLLOW_RESIZE_EVENTS", "TRUE"),
        ]));

        assert_eq!(config.data_path.as_deref(), Some("/tmp/status.json"));
        assert_eq!(config.viewport_width, 700);
        assert_eq!(config.resize_debounce, Duration::from_millis(250));
        assert_eq!(config.history_seed, Some(42));
        assert!(config.follow_resize_events);
    }

    #[test]
    fn test_unparseable_values_keep_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("VIEWPORT_WIDTH", "wide"),
            ("HISTORY_SEED", "-3"),
        ]));

        assert_eq!(config.viewport_width, 1280);
        assert!(config.history_seed.is_none());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.viewport_width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.resize_debounce = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.page_title = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
