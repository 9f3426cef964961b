//! `levelcheck check` - evaluate one value against levels.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;

use crate::core::prediction::{InMemoryReferences, PredictionKey, Reference, ReferencePredictor};
use crate::core::{
    render, CheckContext, Config, LevelsEvaluator, LevelsOptions, State, ThresholdSpec,
};
use crate::ui::format_result;

/// Parse `80,90` or `80,90,10,5`. Empty slots and `none` leave a level unset.
pub fn parse_levels(input: &str) -> Result<ThresholdSpec> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(ThresholdSpec::None);
    }

    let slots = trimmed
        .split(',')
        .map(|slot| {
            let slot = slot.trim();
            if slot.is_empty() || slot.eq_ignore_ascii_case("none") {
                Ok(None)
            } else {
                slot.parse::<f64>()
                    .map(Some)
                    .with_context(|| format!("Invalid level '{}'", slot))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ThresholdSpec::try_from(slots)?)
}

fn renderer(name: &str) -> Result<fn(f64) -> String> {
    let render_fn: fn(f64) -> String = match name {
        "percent" => render::percent,
        "bytes" => render::bytes,
        "filesize" => render::filesize,
        "age" => render::age,
        "timestamp" => render::timestamp,
        "nic-speed" => render::nic_speed,
        other => bail!("Unknown renderer '{}'", other),
    };
    Ok(render_fn)
}

/// Returns the monitoring state code, used as the process exit code
pub fn execute(matches: &ArgMatches) -> Result<i32> {
    let config = Config::load()?;

    let value = *matches
        .get_one::<f64>("value")
        .context("Value argument is required")?;
    let metric = matches.get_one::<String>("metric").map(String::as_str);

    let spec = match (
        matches.get_one::<String>("levels"),
        matches.get_one::<String>("levels-json"),
    ) {
        (Some(levels), None) => parse_levels(levels)?,
        (None, Some(json)) => {
            serde_json::from_str(json).context("Failed to parse levels JSON")?
        }
        (None, None) => ThresholdSpec::None,
        (Some(_), Some(_)) => bail!("Use either --levels or --levels-json, not both"),
    };

    let render_fn = matches
        .get_one::<String>("render")
        .map(|name| renderer(name))
        .transpose()?;

    let mut options = LevelsOptions::new()
        .unit(matches.get_one::<String>("unit").map_or("", String::as_str))
        .factor(matches.get_one::<f64>("factor").copied().unwrap_or(1.0))
        .scale(matches.get_one::<f64>("scale").copied().unwrap_or(1.0))
        .state_markers(matches.get_flag("markers") || config.state_markers);
    if let Some(render_fn) = render_fn.as_ref() {
        options = options.render(render_fn);
    }
    if let Some(label) = matches.get_one::<String>("label") {
        options = options.label(label);
    }
    match (
        matches.get_one::<f64>("min").copied(),
        matches.get_one::<f64>("max").copied(),
    ) {
        (Some(min), Some(max)) => options = options.boundaries(min, max),
        (None, None) => {}
        _ => bail!("--min and --max must be given together"),
    }

    let context = CheckContext::new(
        matches.get_one::<String>("host").map_or("", String::as_str),
        matches.get_one::<String>("service").map_or("", String::as_str),
    );

    let mut references = InMemoryReferences::new();
    if let (Some(reference), Some(metric)) = (matches.get_one::<f64>("reference"), metric) {
        references.insert(
            PredictionKey::new(context.host.as_str(), context.service.as_str(), metric),
            Reference {
                value: *reference,
                stdev: matches.get_one::<f64>("stdev").copied(),
            },
        );
    }
    let predictor = ReferencePredictor::new(references);

    log::debug!("evaluating {} against {:?} with {:?}", value, spec, options);
    let evaluator = LevelsEvaluator::with_predictor(context, &predictor);
    let result = evaluator.evaluate(value, metric, &spec, &options);

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}", format_result(&result));
    }

    Ok(result.state.as_int())
}

/// Exit code for a finished `check`. A check that could not run at all is
/// UNKNOWN, never one of the threshold states.
pub fn exit_code(outcome: &Result<i32>) -> i32 {
    match outcome {
        Ok(code) => *code,
        Err(_) => State::Unknown.as_int(),
    }
}
