//! Generic check of a value against warn/crit levels.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::perfdata::Perfdata;
use super::thresholds::{Levels, ThresholdSpec};
use crate::core::prediction::{NoPredictor, PredictionError, PredictionKey, Predictor};
use crate::core::state::State;

/// Renders a number for the plugin output
pub type RenderFn<'a> = &'a dyn Fn(f64) -> String;

/// Host and service the evaluated value belongs to. Only used to key
/// predictive lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckContext {
    pub host: String,
    pub service: String,
}

impl CheckContext {
    pub fn new<H: Into<String>, S: Into<String>>(host: H, service: S) -> Self {
        Self {
            host: host.into(),
            service: service.into(),
        }
    }
}

/// Presentation and scaling options of a single evaluation
#[derive(Clone, Copy)]
pub struct LevelsOptions<'a> {
    /// Appended to rendered numbers. `/s`-style units and a bare `%` are glued
    /// on, anything else gets a separating space.
    pub unit: &'a str,
    /// Multiplier applied to the levels only, e.g. the number of CPUs for
    /// per-CPU load levels.
    pub factor: f64,
    /// Unit of the levels relative to the value, applied to levels and
    /// boundaries.
    pub scale: f64,
    pub state_markers: bool,
    pub render: Option<RenderFn<'a>>,
    pub label: Option<&'a str>,
    pub boundaries: Option<(f64, f64)>,
}

impl Default for LevelsOptions<'_> {
    fn default() -> Self {
        Self {
            unit: "",
            factor: 1.0,
            scale: 1.0,
            state_markers: false,
            render: None,
            label: None,
            boundaries: None,
        }
    }
}

impl<'a> LevelsOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit(mut self, unit: &'a str) -> Self {
        self.unit = unit;
        self
    }

    pub fn factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn state_markers(mut self, enabled: bool) -> Self {
        self.state_markers = enabled;
        self
    }

    pub fn render(mut self, render: RenderFn<'a>) -> Self {
        self.render = Some(render);
        self
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn boundaries(mut self, min: f64, max: f64) -> Self {
        self.boundaries = Some((min, max));
        self
    }

    fn unit_info(&self) -> String {
        if self.unit.starts_with('/') || self.unit == "%" {
            self.unit.to_string()
        } else if !self.unit.is_empty() {
            format!(" {}", self.unit)
        } else {
            String::new()
        }
    }
}

impl fmt::Debug for LevelsOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelsOptions")
            .field("unit", &self.unit)
            .field("factor", &self.factor)
            .field("scale", &self.scale)
            .field("state_markers", &self.state_markers)
            .field("render", &self.render.map(|_| "<fn>"))
            .field("label", &self.label)
            .field("boundaries", &self.boundaries)
            .finish()
    }
}

/// State, summary text and perfdata of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub state: State,
    pub text: String,
    pub perfdata: Vec<Perfdata>,
}

impl EvaluationResult {
    pub fn unknown<S: Into<String>>(text: S) -> Self {
        Self {
            state: State::Unknown,
            text: text.into(),
            perfdata: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.state == State::Ok
    }

    /// Space separated perfdata, empty when there is none
    pub fn perf_string(&self) -> String {
        self.perfdata
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.state, self.text)?;
        if !self.perfdata.is_empty() {
            write!(f, " | {}", self.perf_string())?;
        }
        Ok(())
    }
}

/// Evaluates values against static or predictive levels.
///
/// Without a predictor, predictive levels degrade to "no reference" notes.
pub struct LevelsEvaluator<'p> {
    context: CheckContext,
    predictor: &'p dyn Predictor,
}

impl Default for LevelsEvaluator<'static> {
    fn default() -> Self {
        Self::new(CheckContext::default())
    }
}

impl LevelsEvaluator<'static> {
    pub fn new(context: CheckContext) -> Self {
        Self {
            context,
            predictor: &NoPredictor,
        }
    }
}

impl<'p> LevelsEvaluator<'p> {
    pub fn with_predictor(context: CheckContext, predictor: &'p dyn Predictor) -> Self {
        Self { context, predictor }
    }

    pub fn context(&self) -> &CheckContext {
        &self.context
    }

    /// Check `value` against `spec`.
    ///
    /// `metric` names the perfdata entry; `None` or an empty name suppresses
    /// perfdata. Levels are multiplied by `factor * scale` before comparing.
    pub fn evaluate(
        &self,
        value: f64,
        metric: Option<&str>,
        spec: &ThresholdSpec,
        options: &LevelsOptions<'_>,
    ) -> EvaluationResult {
        let unit_info = options.unit_info();
        let scale = options.scale;
        let default_render = move |x: f64| format!("{:.2}", x / scale);
        let render: &dyn Fn(f64) -> String = match options.render {
            Some(render) => render,
            None => &default_render,
        };
        let metric = metric.filter(|name| !name.is_empty());

        let mut text = format!("{}{}", render(value), unit_info);
        if let Some(label) = options.label {
            text = format!("{}: {}", label, text);
        }

        if spec.is_unchecked() {
            return EvaluationResult {
                state: State::Ok,
                text,
                perfdata: build_perfdata(metric, value, options, &Levels::default(), None),
            };
        }

        let (levels, reference) = match spec {
            ThresholdSpec::Predictive(params) => {
                let Some(metric_name) = metric else {
                    return EvaluationResult::unknown("Metric name is empty");
                };

                let key = PredictionKey::new(
                    self.context.host.as_str(),
                    self.context.service.as_str(),
                    metric_name,
                );
                match self.predictor.predict(&key, params, options.factor * scale) {
                    Ok(prediction) => {
                        let reference = prediction.reference.filter(|r| *r != 0.0);
                        let note = match reference {
                            Some(r) => format!("predicted reference: {}", render(r)),
                            None => "no reference for prediction yet".to_string(),
                        };
                        text.push_str(&format!(" ({})", note));
                        (prediction.levels, reference)
                    }
                    Err(PredictionError::Config(e)) => {
                        log::debug!("predictive levels unavailable for {}: {}", metric_name, e);
                        text.push_str(&format!(" (no reference for prediction ({}))", e));
                        (Levels::default(), None)
                    }
                    Err(PredictionError::Other(e)) => {
                        log::warn!("prediction failed for {}: {}", metric_name, e);
                        return EvaluationResult::unknown(e);
                    }
                }
            }
            _ => (spec.normalize().scaled(options.factor * scale), None),
        };

        let (state, levels_text) = check_state(value, &levels, render, &unit_info);
        text.push_str(&levels_text);
        if options.state_markers {
            text.push_str(state.marker());
        }

        EvaluationResult {
            state,
            text,
            perfdata: build_perfdata(metric, value, options, &levels, reference),
        }
    }
}

/// Evaluate against static levels, without a prediction engine
pub fn check_levels(
    value: f64,
    metric: Option<&str>,
    spec: &ThresholdSpec,
    options: &LevelsOptions<'_>,
) -> EvaluationResult {
    LevelsEvaluator::default().evaluate(value, metric, spec, options)
}

/// Upper levels trip at or above, lower levels strictly below. CRIT is tested
/// before WARN, upper before lower.
fn check_state(
    value: f64,
    levels: &Levels,
    render: &dyn Fn(f64) -> String,
    unit_info: &str,
) -> (State, String) {
    let describe = |ty: &str, warn: Option<f64>, crit: Option<f64>| {
        let show = |v: Option<f64>| match v {
            Some(v) => format!("{}{}", render(v), unit_info),
            None => "never".to_string(),
        };
        format!(" (warn/crit {} {}/{})", ty, show(warn), show(crit))
    };

    if levels.crit_upper.is_some_and(|crit| value >= crit) {
        return (State::Crit, describe("at", levels.warn_upper, levels.crit_upper));
    }
    if levels.crit_lower.is_some_and(|crit| value < crit) {
        return (State::Crit, describe("below", levels.warn_lower, levels.crit_lower));
    }
    if levels.warn_upper.is_some_and(|warn| value >= warn) {
        return (State::Warn, describe("at", levels.warn_upper, levels.crit_upper));
    }
    if levels.warn_lower.is_some_and(|warn| value < warn) {
        return (State::Warn, describe("below", levels.warn_lower, levels.crit_lower));
    }
    (State::Ok, String::new())
}

fn build_perfdata(
    metric: Option<&str>,
    value: f64,
    options: &LevelsOptions<'_>,
    levels: &Levels,
    reference: Option<f64>,
) -> Vec<Perfdata> {
    let Some(name) = metric else {
        return Vec::new();
    };

    let mut perf = Perfdata::new(name, value, levels.warn_upper, levels.crit_upper);
    if let Some((min, max)) = options.boundaries {
        perf = perf.with_boundaries(Some(min * options.scale), Some(max * options.scale));
    }

    let mut perfdata = vec![perf];
    if let Some(reference) = reference {
        perfdata.push(Perfdata::new(format!("predict_{}", name), reference, None, None));
    }
    perfdata
}
