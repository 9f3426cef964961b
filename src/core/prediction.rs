//! Predictive levels.
//!
//! The historical prediction engine lives outside this crate. It is reached
//! through [`Predictor`]; [`ReferencePredictor`] turns a reference value taken
//! from any [`ReferenceSource`] into levels, the way the monitoring core
//! derives levels from its reference curves.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::levels::Levels;

/// Identifies one predicted metric: `(host, service, metric)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PredictionKey {
    pub host: String,
    pub service: String,
    pub metric: String,
}

impl PredictionKey {
    pub fn new<H, S, M>(host: H, service: S, metric: M) -> Self
    where
        H: Into<String>,
        S: Into<String>,
        M: Into<String>,
    {
        Self {
            host: host.into(),
            service: service.into(),
            metric: metric.into(),
        }
    }
}

/// Slice of time the reference curve is built over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Wday,
    Day,
    Hour,
    Minute,
}

/// How the distance between reference and level is expressed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelsMode {
    /// Fixed offsets, in the unit of the levels
    Absolute(f64, f64),
    /// Percent of the reference value
    Relative(f64, f64),
    /// Multiples of the standard deviation
    Stdev(f64, f64),
}

const DEFAULT_HORIZON_DAYS: u32 = 90;

fn default_horizon() -> u32 {
    DEFAULT_HORIZON_DAYS
}

/// Predictive levels configuration. Unknown keys are rejected so a misspelt
/// level key cannot silently disable the check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictiveParams {
    #[serde(default)]
    pub period: Period,
    /// Days of history to consider
    #[serde(default = "default_horizon")]
    pub horizon: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels_upper: Option<LevelsMode>,
    /// Upper levels never drop below these
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels_upper_min: Option<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels_lower: Option<LevelsMode>,
}

impl Default for PredictiveParams {
    fn default() -> Self {
        Self {
            period: Period::default(),
            horizon: DEFAULT_HORIZON_DAYS,
            levels_upper: None,
            levels_upper_min: None,
            levels_lower: None,
        }
    }
}

/// Failure of a prediction lookup.
///
/// `Config` is reported next to the measured value and the check goes on
/// without levels; `Other` turns the whole result UNKNOWN.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

/// Reference value and levels computed for one lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prediction {
    pub reference: Option<f64>,
    pub levels: Levels,
}

/// Source of predicted levels
pub trait Predictor {
    /// `levels_factor` is applied to absolute offsets and to `levels_upper_min`.
    fn predict(
        &self,
        key: &PredictionKey,
        params: &PredictiveParams,
        levels_factor: f64,
    ) -> Result<Prediction, PredictionError>;
}

/// Predictor used when no prediction engine is wired in
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPredictor;

impl Predictor for NoPredictor {
    fn predict(
        &self,
        _key: &PredictionKey,
        _params: &PredictiveParams,
        _levels_factor: f64,
    ) -> Result<Prediction, PredictionError> {
        Err(PredictionError::Config(
            "no prediction engine configured".to_string(),
        ))
    }
}

/// Reference point of the historical curve at the current time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub value: f64,
    pub stdev: Option<f64>,
}

pub trait ReferenceSource {
    /// `Ok(None)` means there is not enough history yet.
    fn reference(
        &self,
        key: &PredictionKey,
        params: &PredictiveParams,
    ) -> Result<Option<Reference>, PredictionError>;
}

/// Derives levels around the reference value of a [`ReferenceSource`]
#[derive(Debug, Clone, Default)]
pub struct ReferencePredictor<S> {
    source: S,
}

impl<S: ReferenceSource> ReferencePredictor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: ReferenceSource> Predictor for ReferencePredictor<S> {
    fn predict(
        &self,
        key: &PredictionKey,
        params: &PredictiveParams,
        levels_factor: f64,
    ) -> Result<Prediction, PredictionError> {
        let Some(reference) = self.source.reference(key, params)? else {
            log::debug!("no reference yet for {}/{}/{}", key.host, key.service, key.metric);
            return Ok(Prediction::default());
        };

        let levels = estimate_levels(&reference, params, levels_factor)?;
        Ok(Prediction {
            reference: Some(reference.value),
            levels,
        })
    }
}

/// Upper levels sit above the reference, lower levels below it.
pub fn estimate_levels(
    reference: &Reference,
    params: &PredictiveParams,
    levels_factor: f64,
) -> Result<Levels, PredictionError> {
    let mut levels = Levels::default();

    if let Some(mode) = params.levels_upper {
        let (warn, crit) = offsets(mode, reference, levels_factor)?;
        let mut warn_upper = reference.value + warn;
        let mut crit_upper = reference.value + crit;

        if let Some((min_warn, min_crit)) = params.levels_upper_min {
            warn_upper = warn_upper.max(min_warn * levels_factor);
            crit_upper = crit_upper.max(min_crit * levels_factor);
        }

        levels.warn_upper = Some(warn_upper);
        levels.crit_upper = Some(crit_upper);
    }

    if let Some(mode) = params.levels_lower {
        let (warn, crit) = offsets(mode, reference, levels_factor)?;
        levels.warn_lower = Some(reference.value - warn);
        levels.crit_lower = Some(reference.value - crit);
    }

    Ok(levels)
}

fn offsets(
    mode: LevelsMode,
    reference: &Reference,
    levels_factor: f64,
) -> Result<(f64, f64), PredictionError> {
    match mode {
        LevelsMode::Absolute(warn, crit) => Ok((warn * levels_factor, crit * levels_factor)),
        LevelsMode::Relative(warn, crit) => Ok((
            reference.value * warn / 100.0,
            reference.value * crit / 100.0,
        )),
        LevelsMode::Stdev(warn, crit) => match reference.stdev {
            Some(stdev) => Ok((stdev * warn, stdev * crit)),
            None => Err(PredictionError::Config(
                "standard deviation is not available".to_string(),
            )),
        },
    }
}

/// Reference values kept in memory, keyed by metric
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferences {
    references: HashMap<PredictionKey, Reference>,
}

impl InMemoryReferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: PredictionKey, reference: Reference) {
        self.references.insert(key, reference);
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

impl ReferenceSource for InMemoryReferences {
    fn reference(
        &self,
        key: &PredictionKey,
        _params: &PredictiveParams,
    ) -> Result<Option<Reference>, PredictionError> {
        Ok(self.references.get(key).copied())
    }
}
