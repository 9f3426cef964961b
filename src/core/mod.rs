// Core business logic module

pub mod config;
pub mod levels;
pub mod prediction;
pub mod rate;
pub mod render;
pub mod state;
pub mod value_store;

// Re-export commonly used items
pub use config::Config;
pub use levels::{
    check_levels, CheckContext, EvaluationResult, Levels, LevelsEvaluator, LevelsOptions,
    Perfdata, ThresholdSpec,
};
pub use prediction::{PredictionError, PredictionKey, Predictor, PredictiveParams};
pub use rate::{Rate, RateState, RateTracker, Unavailable};
pub use state::State;
pub use value_store::{FileValueStore, ItemState, MemoryValueStore, ValueStore};
