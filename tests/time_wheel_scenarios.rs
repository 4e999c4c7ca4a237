//! Time Wheel Scenario Tests
//!
//! End-to-end behaviour of the headless wheel driven the way a host drives
//! it: viewport and layout reports, gestures, and 16 ms frame timestamps.

use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime};
use time_wheel::{
    is_same_bucket, offset_date, Admission, ArcGeometry, Decay, Direction, GeometryConfig,
    GestureConfig, RejectReason, SwitchPhase, TimeUnit, TimeWheel, WheelConfig, WheelEffect,
    WheelWindow,
};

const FRAME: Duration = Duration::from_millis(16);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap()
}

/// A Day wheel on 2025-03-10 that has been laid out once
fn mounted(t0: Instant) -> TimeWheel {
    init_tracing();
    let mut wheel = TimeWheel::new(WheelConfig::default(), day(2025, 3, 10), TimeUnit::Day)
        .unwrap()
        .with_directions(Box::new(|| Direction::Forward));
    wheel.set_viewport(390.0);
    wheel.finish_layout_pass(t0);
    wheel.tick(t0);
    wheel
}

fn run(wheel: &mut TimeWheel, from: Instant, frames: u32) -> (Vec<WheelEffect>, Instant) {
    let mut effects = Vec::new();
    let mut now = from;
    for _ in 0..frames {
        now += FRAME;
        wheel.tick(now);
        effects.extend(wheel.drain_effects());
    }
    (effects, now)
}

fn time_changes(effects: &[WheelEffect]) -> Vec<NaiveDateTime> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            WheelEffect::TimeChanged(date) => Some(*date),
            _ => None,
        })
        .collect()
}

/// Tapping the item three days ahead commits it exactly once, after the
/// indicator slide and the recentering scroll
#[test]
fn test_tap_three_days_ahead() {
    let t0 = Instant::now();
    let mut wheel = mounted(t0);
    let center = wheel.window().center_index();

    assert_eq!(wheel.tap(center + 3, t0), Admission::Accepted);

    // Nothing is reported while the indicator is still sliding (300 ms)
    let (early, now) = run(&mut wheel, t0, 18);
    assert!(time_changes(&early).is_empty());

    let (effects, _) = run(&mut wheel, now, 150);
    assert_eq!(time_changes(&effects), vec![day(2025, 3, 13)]);
    assert_eq!(wheel.visual_active_index(), center);
    assert_eq!(wheel.selected_time(), day(2025, 3, 13));
    assert_eq!(wheel.offset(), 0.0);
}

/// Week buckets follow ISO weeks starting on Monday
#[test]
fn test_week_buckets() {
    let monday = day(2025, 1, 6);
    assert!(is_same_bucket(monday, day(2025, 1, 12), TimeUnit::Week));
    assert!(!is_same_bucket(monday, day(2025, 1, 13), TimeUnit::Week));

    let window = WheelWindow::generate(monday, TimeUnit::Week, 30).unwrap();
    let center = window.center_index();
    assert_eq!(window.items()[center + 1].date, day(2025, 1, 13));
    assert_eq!(window.items()[center - 1].date, day(2024, 12, 30));
}

/// Every generated window is the base offset by whole units, strictly increasing
#[test]
fn test_windows_for_every_unit() {
    let base = NaiveDate::from_ymd_opt(2025, 1, 31)
        .and_then(|date| date.and_hms_opt(14, 0, 0))
        .unwrap();

    for unit in TimeUnit::ALL {
        let window = WheelWindow::generate(base, unit, 30).unwrap();
        let center = window.center_index() as i32;
        for (i, item) in window.items().iter().enumerate() {
            assert_eq!(item.date, offset_date(base, unit, i as i32 - center).unwrap());
            assert!(is_same_bucket(item.date, item.date, unit));
        }
        assert!(window.items().windows(2).all(|pair| pair[0].date < pair[1].date));
    }
}

/// The centre item is neither bowed nor rotated
#[test]
fn test_centre_item_is_flat() {
    let geometry = ArcGeometry::new(GeometryConfig::default(), 390.0);
    assert_eq!(geometry.arc_horizontal_offset(0.0), 0.0);
    assert_eq!(geometry.tangent_rotation(0.0), 0.0);
}

/// A fling far above the velocity ceiling coasts a bounded distance and
/// still lands exactly on an item
#[test]
fn test_fast_fling_is_bounded() {
    let config = GestureConfig::default();
    let bound = Decay::max_travel(config.max_velocity, config.decay_factor);

    let t0 = Instant::now();
    let mut decay = Decay::new(0.0, config.max_velocity, config.decay_factor, config.stop_velocity, t0);
    decay.advance(t0 + Duration::from_secs(5));
    assert!(decay.is_finished());
    assert!(decay.position() <= bound);

    let mut wheel = mounted(t0);
    assert!(wheel.drag_start().is_accepted());
    wheel.drag_move(-20.0);
    wheel.drag_end(-50.0, t0);

    let (effects, _) = run(&mut wheel, t0, 400);
    let committed = time_changes(&effects);
    assert_eq!(committed.len(), 1);

    // Release offset plus the coast plus at most half an item of snapping
    let spacing = wheel.config().geometry.item_spacing;
    let max_steps = ((20.0 + bound + spacing / 2.0) / spacing).floor() as i64;
    let steps = (committed[0] - day(2025, 3, 10)).num_days();
    assert!(steps > 0 && steps <= max_steps, "moved {steps} days");
    assert_eq!(wheel.offset(), 0.0);
}

/// Switching granularity waits for a pending selection to resolve
#[test]
fn test_unit_switch_waits_for_selection() {
    let t0 = Instant::now();
    let mut wheel = mounted(t0);
    let center = wheel.window().center_index();

    assert!(wheel.tap(center + 3, t0).is_accepted());
    assert_eq!(
        wheel.request_unit(TimeUnit::Month, t0 + FRAME),
        Admission::Rejected(RejectReason::TransitionPending)
    );
    assert_eq!(wheel.switch_phase(), SwitchPhase::Stable);
    assert_eq!(wheel.time_unit(), TimeUnit::Day);

    let (_, now) = run(&mut wheel, t0, 150);
    assert_eq!(wheel.pending_selection(), None);
    assert_eq!(wheel.request_unit(TimeUnit::Month, now), Admission::Accepted);

    let (effects, _) = run(&mut wheel, now, 300);
    assert!(effects.contains(&WheelEffect::TimeUnitChanged(TimeUnit::Month)));
    assert_eq!(wheel.time_unit(), TimeUnit::Month);
    assert_eq!(wheel.selected_time(), day(2025, 3, 13));
}
