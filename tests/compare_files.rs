//! File-level comparison tests.
//!
//! Each test writes a pair of harness logs to a temp dir and runs
//! `compare_files` on them.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use tick_compare::{
    Aggregate, BoundedCache, CompareConfig, CompareError, IgnoreSet, Mode, NullSink, Outcome,
    Record, compare_files,
};

/// Build a log from ticks, each tick a list of `key value...` lines.
fn log(ticks: &[&[&str]]) -> String {
    let mut text = String::from("subscriber: created\n");
    for tick in ticks {
        text.push_str("MESSAGE\n");
        for line in *tick {
            text.push_str(line);
            text.push('\n');
        }
        text.push('\n');
    }
    text
}

fn price_log(prices: &[&str]) -> String {
    let lines: Vec<String> = prices.iter().map(|p| format!("price {p}")).collect();
    let ticks: Vec<Vec<&str>> = lines.iter().map(|l| vec![l.as_str()]).collect();
    let refs: Vec<&[&str]> = ticks.iter().map(Vec::as_slice).collect();
    log(&refs)
}

struct Pair {
    _dir: TempDir,
    source: PathBuf,
    target: PathBuf,
}

fn pair(source: &str, target: &str) -> Pair {
    let dir = tempfile::tempdir().unwrap();
    let source_path = dir.path().join("source.log");
    let target_path = dir.path().join("target.log");
    fs::write(&source_path, source).unwrap();
    fs::write(&target_path, target).unwrap();
    Pair {
        _dir: dir,
        source: source_path,
        target: target_path,
    }
}

fn compare(p: &Pair, config: &CompareConfig) -> Result<tick_compare::Comparison, CompareError> {
    compare_files(&p.source, &p.target, config, &mut NullSink)
}

#[test]
fn test_identical_logs_pass_exact() {
    let text = log(&[&["symbol ACME", "price 10"], &["symbol ACME", "price 11"]]);
    let p = pair(&text, &text);
    let c = compare(&p, &CompareConfig::default()).unwrap();
    assert_eq!(c.aggregate, Aggregate::Pass);
    assert!(c.succeeded(false));
    assert_eq!(c.passed, 2);
}

#[test]
fn test_scenario_single_tick() {
    let text = "MESSAGE\nprice 10\nsize 5\n";
    let p = pair(text, text);
    let c = compare(&p, &CompareConfig::default()).unwrap();
    assert_eq!(c.aggregate, Aggregate::Pass);
    assert_eq!(c.entries[0].source_line, Some(1));
    assert_eq!(c.entries[0].target_line, Some(1));
}

#[test]
fn test_truncated_target_fails_exact() {
    let p = pair(&price_log(&["10", "11"]), &price_log(&["10"]));
    let c = compare(&p, &CompareConfig::default()).unwrap();
    let outcomes: Vec<Outcome> = c.entries.iter().map(|e| e.outcome).collect();
    assert_eq!(outcomes, vec![Outcome::Pass, Outcome::Fail]);
    assert_eq!(c.entries[1].target_line, None);
    assert!(!c.succeeded(false));
}

#[test]
fn test_cached_permutation_within_window() {
    let p = pair(
        &price_log(&["1", "2", "3", "4", "5", "6", "7", "8"]),
        &price_log(&["3", "1", "2", "6", "4", "5", "8", "7"]),
    );
    let config = CompareConfig::new(Mode::Cached).with_cache_size(6);
    let c = compare(&p, &config).unwrap();
    assert_eq!(c.aggregate, Aggregate::Pass);
    assert_eq!(c.passed, 8);

    let c = compare(&p, &CompareConfig::new(Mode::Exact)).unwrap();
    assert_eq!(c.aggregate, Aggregate::Fail);
}

#[test]
fn test_cache_overflow_past_ceiling() {
    let mut cache = BoundedCache::new(std::num::NonZeroUsize::new(3).unwrap());
    let pushed: Vec<Result<(), CompareError>> = (1..=5)
        .map(|i| cache.push(Record::new(i).with_field("seq", &[&i.to_string()])))
        .collect();
    assert!(pushed[..4].iter().all(Result::is_ok));
    assert!(pushed[4].as_ref().unwrap_err().is_cache_overflow());
}

#[test]
fn test_exhaustive_reuses_target_tick() {
    let p = pair(&price_log(&["10", "10"]), &price_log(&["10"]));
    let c = compare(&p, &CompareConfig::new(Mode::Exhaustive)).unwrap();
    assert_eq!(c.passed, 2);
    assert_eq!(c.aggregate, Aggregate::Pass);
}

#[test]
fn test_exhaustive_empty_target() {
    let p = pair(&price_log(&["10"]), "no ticks here\n");
    let c = compare(&p, &CompareConfig::new(Mode::Exhaustive)).unwrap();
    assert_eq!(c.aggregate, Aggregate::Fail);
}

#[test]
fn test_cached_consumes_single_copy() {
    let p = pair(&price_log(&["10", "10"]), &price_log(&["10"]));
    let c = compare(&p, &CompareConfig::new(Mode::Cached)).unwrap();
    assert_eq!(c.passed, 1);
    assert_eq!(c.failed, 1);
}

#[test]
fn test_ignored_fields_equal_in_all_modes() {
    let source = log(&[&["price 10", "time 09:30:00.001"], &["price 11", "time 09:30:00.002"]]);
    let target = log(&[&["time 09:30:00.107", "price 10"], &["time 09:30:00.222", "price 11"]]);
    let p = pair(&source, &target);
    let ignore: IgnoreSet = ["time"].into_iter().collect();

    for mode in [Mode::Exact, Mode::Cached, Mode::Exhaustive] {
        let c = compare(&p, &CompareConfig::new(mode)).unwrap();
        assert_eq!(c.aggregate, Aggregate::Fail, "{mode} without ignores");

        let config = CompareConfig::new(mode).with_ignore(ignore.clone());
        let c = compare(&p, &config).unwrap();
        assert_eq!(c.aggregate, Aggregate::Pass, "{mode} ignoring time");
    }
}

#[test]
fn test_custom_marker() {
    let text = "TICK\nprice 1\nTICK\nprice 2\n";
    let p = pair(text, text);
    let config = CompareConfig::default().with_markers(vec!["TICK".to_string()]);
    let c = compare(&p, &config).unwrap();
    assert_eq!(c.passed, 2);

    // default marker finds nothing
    let c = compare(&p, &CompareConfig::default()).unwrap();
    assert_eq!(c.aggregate, Aggregate::Unresolved);
    assert!(!c.succeeded(false));
    assert!(c.succeeded(true));
}

#[test]
fn test_missing_target_is_fatal() {
    let p = pair(&price_log(&["1"]), "");
    fs::remove_file(&p.target).unwrap();
    let err = compare(&p, &CompareConfig::default()).unwrap_err();
    match err {
        CompareError::FileNotFound { path } => assert_eq!(path, p.target),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_source_is_fatal() {
    let p = pair("", &price_log(&["1"]));
    fs::remove_file(&p.source).unwrap();
    assert!(matches!(
        compare(&p, &CompareConfig::default()),
        Err(CompareError::FileNotFound { .. })
    ));
}
