//! Logging handle passed down through a session.
//!
//! Nothing here is global except [`init`], which binaries and tests call once.

use std::sync::{Arc, Once};

use chrono::{DateTime, Local};

const DEFAULT_TARGET: &str = "rnc";

/// Where log records of one session go and how they are labelled.
#[derive(Debug, Clone)]
pub struct LogContext {
    target: Arc<str>,
    label: Arc<str>,
}

impl LogContext {
    pub fn new(target: impl Into<Arc<str>>, label: impl Into<Arc<str>>) -> Self {
        Self {
            target: target.into(),
            label: label.into(),
        }
    }

    /// Same target, different label. Used to tag a single query.
    pub fn with_label(&self, label: impl Into<Arc<str>>) -> Self {
        Self {
            target: self.target.clone(),
            label: label.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET, "session")
    }
}

/// Seconds elapsed since `since`, microsecond precision.
pub fn elapsed_secs(since: DateTime<Local>) -> f64 {
    (Local::now() - since)
        .num_microseconds()
        .map(|n| n as f64 / 1_000_000.0)
        .unwrap_or(0.0)
}

static INIT: Once = Once::new();

/// Initialise `env_logger` from `RUST_LOG`. Safe to call more than once.
pub fn init() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("warn"),
        )
        .try_init();
    });
}
