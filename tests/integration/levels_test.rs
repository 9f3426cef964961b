use levelcheck::core::levels::{check_levels, LevelsOptions, Perfdata, ThresholdSpec};
use levelcheck::core::{render, State};

#[test]
fn test_cpu_scenarios() {
    let spec = ThresholdSpec::from((80.0, 90.0));
    let opts = LevelsOptions::new().unit("%");

    let ok = check_levels(75.0, Some("cpu"), &spec, &opts);
    assert_eq!(ok.state, State::Ok);
    assert_eq!(ok.text, "75.00%");
    assert_eq!(
        ok.perfdata,
        vec![Perfdata::new("cpu", 75.0, Some(80.0), Some(90.0))]
    );

    let warn = check_levels(85.0, Some("cpu"), &spec, &opts);
    assert_eq!(warn.state, State::Warn);
    assert!(warn.text.contains("(warn/crit at 80.00%/90.00%)"));

    let crit = check_levels(95.0, Some("cpu"), &spec, &opts);
    assert_eq!(crit.state, State::Crit);
    assert!(crit.text.contains("(warn/crit at 80.00%/90.00%)"));
}

#[test]
fn test_crit_wins_over_warn_for_any_value_above() {
    let spec = ThresholdSpec::from((80.0, 90.0));
    for value in [90.0, 90.5, 100.0, 1e12] {
        let result = check_levels(value, None, &spec, &LevelsOptions::new());
        assert_eq!(result.state, State::Crit, "value {}", value);
    }
    for value in [80.0, 80.001, 85.0, 89.999] {
        let result = check_levels(value, None, &spec, &LevelsOptions::new());
        assert_eq!(result.state, State::Warn, "value {}", value);
    }
}

#[test]
fn test_crit_upper_without_warn_upper() {
    let spec = ThresholdSpec::Upper(None, Some(10.0));
    let result = check_levels(15.0, Some("temp"), &spec, &LevelsOptions::new().unit("°C"));
    assert_eq!(result.state, State::Crit);
    assert_eq!(result.text, "15.00 °C (warn/crit at never/10.00 °C)");
}

#[test]
fn test_upper_checked_before_lower() {
    // misconfigured: lower levels above the upper ones
    let spec = ThresholdSpec::from((10.0, 20.0, 50.0, 40.0));
    let result = check_levels(30.0, None, &spec, &LevelsOptions::new());
    assert_eq!(result.state, State::Crit);
    assert!(result.text.contains("warn/crit at"));
}

#[test]
fn test_boundaries_make_six_fields() {
    let opts = LevelsOptions::new().boundaries(0.0, 100.0);
    let result = check_levels(42.0, Some("usage"), &ThresholdSpec::None, &opts);
    let perf = &result.perfdata[0];
    assert_eq!((perf.min(), perf.max()), (Some(0.0), Some(100.0)));
    assert_eq!(perf.to_string(), "usage=42;;;0;100");
}

#[test]
fn test_human_readable_renderer() {
    let render = render::bytes;
    let opts = LevelsOptions::new()
        .unit("/s")
        .render(&render)
        .label("Write")
        .state_markers(true);
    let spec = ThresholdSpec::from((1024.0, 2048.0));

    let result = check_levels(4096.0, Some("disk_write_throughput"), &spec, &opts);
    assert_eq!(result.state, State::Crit);
    assert!(result.text.starts_with("Write: 4"));
    assert!(result.text.contains("KiB/s"));
    assert!(result.text.ends_with("(!!)"));
}

#[test]
fn test_levels_from_json_config() {
    let spec: ThresholdSpec = serde_json::from_str("[null, null, 5, 2]").unwrap();
    assert_eq!(
        check_levels(3.0, None, &spec, &LevelsOptions::new()).state,
        State::Warn
    );
    assert_eq!(
        check_levels(1.0, None, &spec, &LevelsOptions::new()).state,
        State::Crit
    );
}

#[test]
fn test_result_json_output() {
    let result = check_levels(
        85.0,
        Some("cpu"),
        &ThresholdSpec::from((80.0, 90.0)),
        &LevelsOptions::new(),
    );
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["state"], "WARN");
    assert_eq!(json["perfdata"][0]["name"], "cpu");
    assert_eq!(json["perfdata"][0]["warn"], 80.0);
}
