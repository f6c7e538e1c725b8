use std::time::{Duration, Instant};

use tftclock::app::{next_deadline, RunState};
use tftclock::config::ClockConfig;

#[test]
fn a_burst_of_exit_events_terminates_once() {
    let mut state = RunState::Running;
    let transitions: usize = (0..5).map(|_| usize::from(state.terminate())).sum();
    assert_eq!(transitions, 1);
    assert_eq!(state, RunState::Terminated);
}

#[test]
fn the_schedule_never_lags_more_than_one_period() {
    let period = Duration::from_millis(250);
    let start = Instant::now();
    for offset_ms in [0u64, 100, 249, 250, 400, 900, 5000] {
        let now = start + Duration::from_millis(offset_ms);
        let next = next_deadline(start, period, now);
        assert!(next > now, "deadline in the past at offset {offset_ms}");
        assert!(
            next - now <= period,
            "schedule lags by more than one period at offset {offset_ms}"
        );
    }
}

#[test]
fn first_run_materializes_an_editable_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clock_conf.json");

    let written = ClockConfig::load(&path).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("date_style"));
    assert!(contents.contains("fb_device"));

    let reread = ClockConfig::load(&path).unwrap();
    assert_eq!(reread.format.date_style, written.format.date_style);
    assert_eq!(reread.display.tick_ms, written.display.tick_ms);
}

#[test]
fn edited_config_values_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clock_conf.json");

    let mut config = ClockConfig::load(&path).unwrap();
    config.format.clock_24hr = true;
    config.format.date_style = "iso".to_string();
    config.display.tick_ms = 1000;
    config.save(&path).unwrap();

    let reread = ClockConfig::load(&path).unwrap();
    assert!(reread.format.clock_24hr);
    assert_eq!(reread.format.date_style, "iso");
    assert_eq!(reread.display.tick_ms, 1000);
}
