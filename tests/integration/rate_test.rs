use levelcheck::core::levels::{check_levels, LevelsOptions, ThresholdSpec};
use levelcheck::core::{FileValueStore, MemoryValueStore, Rate, RateTracker, State, Unavailable};
use tempfile::TempDir;

#[test]
fn test_never_seen_key_has_no_rate() {
    let mut tracker = RateTracker::new(MemoryValueStore::new());
    let outcome = tracker.rate("srv01.eth0.in_octets", 1000.0, 123_456.0, true);
    assert!(!outcome.is_available());
    assert_eq!(outcome.value(), None);
}

#[test]
fn test_rate_then_reset() {
    let mut tracker = RateTracker::new(MemoryValueStore::new());
    let (t0, v0) = (1000.0, 5_000.0);
    let (t1, v1) = (1060.0, 11_000.0);
    let (t2, v2) = (1120.0, 600.0);

    assert_eq!(
        tracker.rate("c", t0, v0, true),
        Rate::Unavailable(Unavailable::FirstSample)
    );
    assert_eq!(tracker.rate("c", t1, v1, true), Rate::Value((v1 - v0) / (t1 - t0)));
    assert_eq!(tracker.rate("c", t2, v2, true), Rate::Value(v2 / (t2 - t1)));
}

#[test]
fn test_keys_do_not_interfere() {
    let mut tracker = RateTracker::new(MemoryValueStore::new());
    let _ = tracker.rate("a", 0.0, 0.0, true);
    let _ = tracker.rate("b", 0.0, 1000.0, true);

    assert_eq!(tracker.rate("a", 10.0, 100.0, true), Rate::Value(10.0));
    assert_eq!(tracker.rate("b", 10.0, 1100.0, true), Rate::Value(10.0));
}

#[test]
fn test_rate_survives_process_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("state").join("counters.json");

    {
        let mut store = FileValueStore::load(&path).unwrap();
        let outcome = RateTracker::new(&mut store).rate("io.sda.read", 100.0, 1_000.0, true);
        assert_eq!(outcome, Rate::Unavailable(Unavailable::FirstSample));
        store.save().unwrap();
    }

    let mut store = FileValueStore::load(&path).unwrap();
    let outcome = RateTracker::new(&mut store).rate("io.sda.read", 110.0, 2_000.0, true);
    assert_eq!(outcome, Rate::Value(100.0));
}

#[test]
fn test_parallel_runs_do_not_reset_each_others_counters() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("counters.json");

    let mut run_a = FileValueStore::load(&path).unwrap();
    let mut run_b = FileValueStore::load(&path).unwrap();
    let _ = RateTracker::new(&mut run_a).rate("srv01.eth0.in", 100.0, 1_000.0, true);
    let _ = RateTracker::new(&mut run_b).rate("srv02.eth0.in", 100.0, 5_000.0, true);
    run_a.save().unwrap();
    run_b.save().unwrap();

    let mut store = FileValueStore::load(&path).unwrap();
    let mut tracker = RateTracker::new(&mut store);
    assert_eq!(tracker.rate("srv01.eth0.in", 110.0, 2_000.0, true), Rate::Value(100.0));
    assert_eq!(tracker.rate("srv02.eth0.in", 110.0, 5_500.0, true), Rate::Value(50.0));
}

#[test]
fn test_rate_feeds_levels() {
    let mut tracker = RateTracker::new(MemoryValueStore::new());
    let spec = ThresholdSpec::from((50.0, 100.0));
    let opts = LevelsOptions::new().unit("/s");

    let mut results = Vec::new();
    for (timestamp, value) in [(0.0, 0.0), (10.0, 600.0), (20.0, 1_800.0)] {
        if let Rate::Value(rate) = tracker.rate("events", timestamp, value, true) {
            results.push(check_levels(rate, Some("event_rate"), &spec, &opts));
        }
    }

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].state, State::Warn);
    assert_eq!(results[0].text, "60.00/s (warn/crit at 50.00/s/100.00/s)");
    assert_eq!(results[1].state, State::Crit);
}

#[test]
fn test_average_smooths_spikes() {
    let mut tracker = RateTracker::new(MemoryValueStore::new());
    let first = tracker.average("cpu.avg", 0.0, 10.0, 15.0);
    let spike = tracker.average("cpu.avg", 60.0, 100.0, 15.0);

    assert_eq!(first, 10.0);
    assert!(spike > 10.0 && spike < 20.0, "average was {}", spike);
}
