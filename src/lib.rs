// levelcheck Library - Public API

// Re-export error types
pub mod error;
pub use error::{LevelcheckError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::levels::{
    check_levels, EvaluationResult, LevelsEvaluator, LevelsOptions, ThresholdSpec,
};
pub use crate::core::rate::{Rate, RateTracker};
pub use crate::core::state::State;

// Initialize logging. Plugin output goes to stdout, so only warnings are
// shown unless RUST_LOG says otherwise.
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}
