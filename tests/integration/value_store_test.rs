use levelcheck::core::{FileValueStore, ItemState, RateState, ValueStore};
use std::fs;
use tempfile::TempDir;

fn counter(timestamp: f64, value: f64) -> ItemState {
    ItemState::Counter(RateState {
        last_timestamp: timestamp,
        last_value: value,
    })
}

#[test]
fn test_missing_file_is_empty_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileValueStore::load(temp_dir.path().join("missing.json")).unwrap();
    assert!(store.keys().is_empty());
}

#[test]
fn test_empty_file_is_empty_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.json");
    fs::write(&path, "").unwrap();

    let store = FileValueStore::load(&path).unwrap();
    assert!(store.keys().is_empty());
}

#[test]
fn test_corrupt_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("corrupt.json");
    fs::write(&path, "{not json").unwrap();

    assert!(FileValueStore::load(&path).is_err());
}

#[test]
fn test_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("counters.json");

    let mut store = FileValueStore::load(&path).unwrap();
    store.set("if.eth0.in", counter(10.0, 100.0));
    store.set(
        "cpu.avg",
        ItemState::Average {
            timestamp: 10.0,
            average: 42.5,
        },
    );
    store.save().unwrap();

    let reloaded = FileValueStore::load(&path).unwrap();
    assert_eq!(reloaded.keys(), vec!["cpu.avg".to_string(), "if.eth0.in".to_string()]);
    assert_eq!(reloaded.get("if.eth0.in"), Some(counter(10.0, 100.0)));
}

#[test]
fn test_clear_prefix_persists() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("counters.json");

    let mut store = FileValueStore::load(&path).unwrap();
    store.set("srv01.if.in", counter(1.0, 1.0));
    store.set("srv01.if.out", counter(1.0, 1.0));
    store.set("srv02.if.in", counter(1.0, 1.0));
    assert_eq!(store.clear_prefix("srv01."), 2);
    store.save().unwrap();

    let reloaded = FileValueStore::load(&path).unwrap();
    assert_eq!(reloaded.keys(), vec!["srv02.if.in".to_string()]);
}

#[test]
fn test_concurrent_stores_keep_each_others_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("counters.json");

    let mut first = FileValueStore::load(&path).unwrap();
    let mut second = FileValueStore::load(&path).unwrap();
    first.set("srv01.if.in", counter(1.0, 10.0));
    second.set("srv02.if.in", counter(1.0, 20.0));
    first.save().unwrap();
    second.save().unwrap();

    let reloaded = FileValueStore::load(&path).unwrap();
    assert_eq!(
        reloaded.keys(),
        vec!["srv01.if.in".to_string(), "srv02.if.in".to_string()]
    );
    assert_eq!(reloaded.get("srv01.if.in"), Some(counter(1.0, 10.0)));
}

#[test]
fn test_removal_does_not_touch_keys_saved_meanwhile() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("counters.json");

    let mut seed = FileValueStore::load(&path).unwrap();
    seed.set("srv01.if.in", counter(1.0, 1.0));
    seed.save().unwrap();

    let mut clearer = FileValueStore::load(&path).unwrap();
    let mut writer = FileValueStore::load(&path).unwrap();
    writer.set("srv02.if.in", counter(2.0, 2.0));
    writer.save().unwrap();
    assert_eq!(clearer.clear_prefix("srv01."), 1);
    clearer.save().unwrap();

    let reloaded = FileValueStore::load(&path).unwrap();
    assert_eq!(reloaded.keys(), vec!["srv02.if.in".to_string()]);
    assert!(clearer.get("srv02.if.in").is_some());
    assert_eq!(clearer.pending(), 0);
}

#[test]
fn test_save_leaves_no_temporary_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("counters.json");

    let mut store = FileValueStore::load(&path).unwrap();
    store.set("if.eth0.in", counter(1.0, 1.0));
    store.save().unwrap();

    let names: Vec<String> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["counters.json".to_string()]);
}

#[test]
fn test_stale_partial_write_does_not_break_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("counters.json");

    let mut store = FileValueStore::load(&path).unwrap();
    store.set("if.eth0.in", counter(1.0, 1.0));
    store.save().unwrap();

    // a run killed halfway through writing only ever leaves its temporary file behind
    let partial = temp_dir
        .path()
        .join(format!("counters.json.{}.tmp", std::process::id()));
    fs::write(&partial, "{\"if.eth0.in\": {\"kind\": \"coun").unwrap();

    let mut store = FileValueStore::load(&path).unwrap();
    assert_eq!(store.get("if.eth0.in"), Some(counter(1.0, 1.0)));
    store.set("if.eth0.out", counter(2.0, 2.0));
    store.save().unwrap();

    let reloaded = FileValueStore::load(&path).unwrap();
    assert_eq!(reloaded.keys().len(), 2);
    assert!(!partial.exists());
}
