//! Clinote — a deterministic clinical-note analysis pipeline.
//!
//! Takes an unstructured consultation transcript and produces structured,
//! auditable suggestions: extracted symptoms, candidate medicines, and the
//! reconciliation of those candidates against the known-medicine
//! vocabulary. Every model call is audited; transient backend failures
//! degrade to fixed dummy payloads instead of surfacing as errors.

pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins when set;
/// otherwise the crate's default filter applies. Safe to call more than
/// once (later calls are no-ops).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
