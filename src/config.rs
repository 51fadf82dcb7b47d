//! Environment-level configuration for the analysis pipeline.
//!
//! Credential presence decides whether a stage talks to a real backend or
//! runs in dummy-fallback mode; the remaining knobs tune reconciliation,
//! history enrichment, and HTTP behavior. Invalid values fall back to the
//! documented defaults with a warning rather than failing startup.

use crate::pipeline::reconcile::DEFAULT_SIMILARITY_THRESHOLD;

pub const APP_NAME: &str = "Clinote";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Confidence assigned when a backend omits one. 0.5 states "no
/// information" without fabricating precision.
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// How many prior analysis summaries the medicine prompt may embed.
pub const DEFAULT_HISTORY_WINDOW: usize = 3;

pub const DEFAULT_SYMPTOM_MODEL: &str = "gpt-4";
pub const DEFAULT_MEDICINE_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 600;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub symptom_model: String,
    pub medicine_model: String,
    pub similarity_threshold: f64,
    pub history_window: usize,
    pub confidence_default: f32,
    pub http_timeout_secs: u64,
    pub max_output_tokens: u32,
}

impl Default for AnalysisConfig {
    /// Fully-offline configuration: no credentials, documented defaults.
    fn default() -> Self {
        Self {
            openai_api_key: None,
            gemini_api_key: None,
            symptom_model: DEFAULT_SYMPTOM_MODEL.into(),
            medicine_model: DEFAULT_MEDICINE_MODEL.into(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            history_window: DEFAULT_HISTORY_WINDOW,
            confidence_default: DEFAULT_CONFIDENCE,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            symptom_model: non_empty_var("CLINOTE_SYMPTOM_MODEL")
                .unwrap_or(defaults.symptom_model),
            medicine_model: non_empty_var("CLINOTE_MEDICINE_MODEL")
                .unwrap_or(defaults.medicine_model),
            similarity_threshold: parsed_var(
                "CLINOTE_SIMILARITY_THRESHOLD",
                defaults.similarity_threshold,
            ),
            history_window: parsed_var("CLINOTE_HISTORY_WINDOW", defaults.history_window),
            confidence_default: parsed_var(
                "CLINOTE_CONFIDENCE_DEFAULT",
                defaults.confidence_default,
            ),
            http_timeout_secs: parsed_var(
                "CLINOTE_HTTP_TIMEOUT_SECS",
                defaults.http_timeout_secs,
            ),
            max_output_tokens: defaults.max_output_tokens,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    parse_or_default(name, non_empty_var(name).as_deref(), default)
}

fn parse_or_default<T: std::str::FromStr + Copy>(name: &str, raw: Option<&str>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = raw, "unparseable value, using default");
            default
        }),
    }
}

pub fn default_log_filter() -> String {
    "clinote=info".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_offline() {
        let config = AnalysisConfig::default();
        assert!(config.openai_api_key.is_none());
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.symptom_model, "gpt-4");
        assert_eq!(config.medicine_model, "gemini-2.5-flash");
        assert!((config.similarity_threshold - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.history_window, 3);
        assert!((config.confidence_default - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn parse_or_default_accepts_valid_values() {
        assert!((parse_or_default("t", Some("0.75"), 0.6_f64) - 0.75).abs() < f64::EPSILON);
        assert_eq!(parse_or_default("t", Some("5"), 3_usize), 5);
    }

    #[test]
    fn parse_or_default_falls_back_on_garbage() {
        assert!((parse_or_default("t", Some("high"), 0.6_f64) - 0.6).abs() < f64::EPSILON);
        assert_eq!(parse_or_default("t", None, 3_usize), 3);
        assert_eq!(parse_or_default("t", Some("  7 "), 3_usize), 7);
    }

    #[test]
    fn app_identity() {
        assert_eq!(APP_NAME, "Clinote");
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
