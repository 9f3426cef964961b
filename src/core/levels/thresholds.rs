//! Threshold specifications and their normalized form.

use serde::{Deserialize, Serialize};

use crate::core::prediction::PredictiveParams;
use crate::error::{LevelcheckError, Result};

/// Normalized static levels. Every slot may be unset.
///
/// Lower levels are expected below the upper ones, but nothing enforces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Levels {
    pub warn_upper: Option<f64>,
    pub crit_upper: Option<f64>,
    pub warn_lower: Option<f64>,
    pub crit_lower: Option<f64>,
}

impl Levels {
    pub fn upper(warn: f64, crit: f64) -> Self {
        Self {
            warn_upper: Some(warn),
            crit_upper: Some(crit),
            ..Default::default()
        }
    }

    pub fn upper_lower(warn_upper: f64, crit_upper: f64, warn_lower: f64, crit_lower: f64) -> Self {
        Self {
            warn_upper: Some(warn_upper),
            crit_upper: Some(crit_upper),
            warn_lower: Some(warn_lower),
            crit_lower: Some(crit_lower),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.warn_upper.is_none()
            && self.crit_upper.is_none()
            && self.warn_lower.is_none()
            && self.crit_lower.is_none()
    }

    /// Multiply every configured slot by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |v: Option<f64>| v.map(|v| v * factor);
        Self {
            warn_upper: scale(self.warn_upper),
            crit_upper: scale(self.crit_upper),
            warn_lower: scale(self.warn_lower),
            crit_lower: scale(self.crit_lower),
        }
    }
}

/// Threshold configuration handed to the evaluator.
///
/// Deserializes from JSON `null`, an array of two or four numbers (each may be
/// `null`), or an object holding predictive parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholdSpec", into = "RawThresholdSpec")]
pub enum ThresholdSpec {
    #[default]
    None,
    /// `(warn_upper, crit_upper)`
    Upper(Option<f64>, Option<f64>),
    /// `(warn_upper, crit_upper, warn_lower, crit_lower)`
    UpperLower(Option<f64>, Option<f64>, Option<f64>, Option<f64>),
    Predictive(PredictiveParams),
}

impl ThresholdSpec {
    /// True when no level would ever trigger: no spec at all or only unset slots.
    pub fn is_unchecked(&self) -> bool {
        match self {
            ThresholdSpec::None => true,
            ThresholdSpec::Predictive(_) => false,
            _ => self.normalize().is_empty(),
        }
    }

    /// Static slots in `(warn_upper, crit_upper, warn_lower, crit_lower)` order.
    /// A pair has no lower levels. Predictive specs have no static slots.
    pub fn normalize(&self) -> Levels {
        match *self {
            ThresholdSpec::Upper(warn_upper, crit_upper) => Levels {
                warn_upper,
                crit_upper,
                warn_lower: None,
                crit_lower: None,
            },
            ThresholdSpec::UpperLower(warn_upper, crit_upper, warn_lower, crit_lower) => Levels {
                warn_upper,
                crit_upper,
                warn_lower,
                crit_lower,
            },
            ThresholdSpec::None | ThresholdSpec::Predictive(_) => Levels::default(),
        }
    }

    pub fn is_predictive(&self) -> bool {
        matches!(self, ThresholdSpec::Predictive(_))
    }
}

impl From<(f64, f64)> for ThresholdSpec {
    fn from((warn, crit): (f64, f64)) -> Self {
        ThresholdSpec::Upper(Some(warn), Some(crit))
    }
}

impl From<(f64, f64, f64, f64)> for ThresholdSpec {
    fn from((warn_upper, crit_upper, warn_lower, crit_lower): (f64, f64, f64, f64)) -> Self {
        ThresholdSpec::UpperLower(
            Some(warn_upper),
            Some(crit_upper),
            Some(warn_lower),
            Some(crit_lower),
        )
    }
}

impl From<Levels> for ThresholdSpec {
    fn from(levels: Levels) -> Self {
        ThresholdSpec::UpperLower(
            levels.warn_upper,
            levels.crit_upper,
            levels.warn_lower,
            levels.crit_lower,
        )
    }
}

impl From<PredictiveParams> for ThresholdSpec {
    fn from(params: PredictiveParams) -> Self {
        ThresholdSpec::Predictive(params)
    }
}

/// Tuple-shaped levels are validated eagerly: only 0, 2 or 4 slots are accepted.
impl TryFrom<Vec<Option<f64>>> for ThresholdSpec {
    type Error = LevelcheckError;

    fn try_from(slots: Vec<Option<f64>>) -> Result<Self> {
        match slots.as_slice() {
            [] => Ok(ThresholdSpec::None),
            [warn, crit] => Ok(ThresholdSpec::Upper(*warn, *crit)),
            [warn_upper, crit_upper, warn_lower, crit_lower] => Ok(ThresholdSpec::UpperLower(
                *warn_upper,
                *crit_upper,
                *warn_lower,
                *crit_lower,
            )),
            other => Err(LevelcheckError::invalid_levels(format!(
                "expected 2 or 4 levels, got {}",
                other.len()
            ))),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawThresholdSpec {
    Unset,
    Static(Vec<Option<f64>>),
    Predictive(serde_json::Map<String, serde_json::Value>),
}

impl TryFrom<RawThresholdSpec> for ThresholdSpec {
    type Error = LevelcheckError;

    fn try_from(raw: RawThresholdSpec) -> Result<Self> {
        match raw {
            RawThresholdSpec::Unset => Ok(ThresholdSpec::None),
            RawThresholdSpec::Static(slots) => ThresholdSpec::try_from(slots),
            // An empty mapping means "no levels", not "predict with defaults"
            RawThresholdSpec::Predictive(map) if map.is_empty() => Ok(ThresholdSpec::None),
            RawThresholdSpec::Predictive(map) => {
                let params: PredictiveParams =
                    serde_json::from_value(serde_json::Value::Object(map))?;
                Ok(ThresholdSpec::Predictive(params))
            }
        }
    }
}

impl From<ThresholdSpec> for RawThresholdSpec {
    fn from(spec: ThresholdSpec) -> Self {
        match spec {
            ThresholdSpec::None => RawThresholdSpec::Unset,
            ThresholdSpec::Upper(warn, crit) => RawThresholdSpec::Static(vec![warn, crit]),
            ThresholdSpec::UpperLower(warn_upper, crit_upper, warn_lower, crit_lower) => {
                RawThresholdSpec::Static(vec![warn_upper, crit_upper, warn_lower, crit_lower])
            }
            ThresholdSpec::Predictive(params) => match serde_json::to_value(params) {
                Ok(serde_json::Value::Object(map)) => RawThresholdSpec::Predictive(map),
                _ => RawThresholdSpec::Unset,
            },
        }
    }
}
