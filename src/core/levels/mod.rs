//! Threshold evaluation.
//!
//! Classifies a measured value against warn/crit levels and produces the
//! status text and perfdata every check plugin reports.

mod evaluator;
mod perfdata;
mod thresholds;

pub use evaluator::{
    check_levels, CheckContext, EvaluationResult, LevelsEvaluator, LevelsOptions, RenderFn,
};
pub use perfdata::Perfdata;
pub use thresholds::{Levels, ThresholdSpec};
