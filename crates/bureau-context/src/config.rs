//! Run configuration
//!
//! A [`RunConfig`] travels inside the input bundle of every agent invocation:
//! the analysis time window, the confidence threshold insights must clear,
//! the per-agent output budget, and free-form parameters.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Time window the run analyzes
    pub window: TimeWindow,
    /// Minimum confidence an insight needs to survive filtering
    pub confidence_threshold: f64,
    /// Maximum insights kept per agent invocation
    pub max_insights: usize,
    /// Free-form parameters
    pub params: ParamSet,
}

impl RunConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With confidence threshold
    #[inline]
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// With max insights per invocation
    #[inline]
    #[must_use]
    pub fn with_max_insights(mut self, max: usize) -> Self {
        self.max_insights = max;
        self
    }

    /// With time window
    #[inline]
    #[must_use]
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    /// With a free-form parameter
    #[inline]
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            window: TimeWindow::default(),
            confidence_threshold: 0.5,
            max_insights: 10,
            params: ParamSet::new(),
        }
    }
}

/// Analysis time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Window length in minutes
    pub minutes: u32,
}

impl TimeWindow {
    /// Create a window of the given length
    #[inline]
    #[must_use]
    pub fn minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    /// Window length as a duration
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.minutes) * 60)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self { minutes: 60 }
    }
}

/// Free-form parameter set
pub type ParamSet = HashMap<String, ParamValue>;

/// Parameter value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
    /// Arbitrary JSON value
    Json(serde_json::Value),
}

/// Get string value from a parameter set
#[inline]
#[must_use]
pub fn get_param_str<'a>(params: &'a ParamSet, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| match v {
        ParamValue::String(s) => Some(s.as_str()),
        _ => None,
    })
}

/// Get bool value from a parameter set
#[inline]
#[must_use]
pub fn get_param_bool(params: &ParamSet, key: &str) -> Option<bool> {
    params.get(key).and_then(|v| match v {
        ParamValue::Bool(b) => Some(*b),
        _ => None,
    })
}

/// Get float value from a parameter set, widening integers
#[inline]
#[must_use]
pub fn get_param_float(params: &ParamSet, key: &str) -> Option<f64> {
    params.get(key).and_then(|v| match v {
        ParamValue::Float(f) => Some(*f),
        ParamValue::Int(i) => Some(*i as f64),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_config_defaults() {
        let config = RunConfig::new();
        assert_eq!(config.confidence_threshold, 0.5);
        assert_eq!(config.max_insights, 10);
        assert_eq!(config.window.minutes, 60);
    }

    #[test]
    fn run_config_builder() {
        let config = RunConfig::new()
            .with_threshold(0.8)
            .with_max_insights(3)
            .with_window(TimeWindow::minutes(15))
            .with_param("aggressive", ParamValue::Bool(true));

        assert_eq!(config.confidence_threshold, 0.8);
        assert_eq!(config.max_insights, 3);
        assert_eq!(config.window.duration(), Duration::from_secs(900));
        assert_eq!(get_param_bool(&config.params, "aggressive"), Some(true));
    }

    #[test]
    fn param_getters() {
        let mut params = ParamSet::new();
        params.insert("name".to_string(), ParamValue::String("drift".to_string()));
        params.insert("limit".to_string(), ParamValue::Int(7));
        params.insert("ratio".to_string(), ParamValue::Float(0.25));

        assert_eq!(get_param_str(&params, "name"), Some("drift"));
        assert_eq!(get_param_float(&params, "limit"), Some(7.0));
        assert_eq!(get_param_float(&params, "ratio"), Some(0.25));
        assert_eq!(get_param_bool(&params, "name"), None);
    }
}
