// Scenario tests for the motion envelope state machine.

use std::time::Duration;

use lateral_core::clock::{clamped_delta, DeltaClock, TickPath};
use lateral_core::constants::RAMP_DURATION_MS;
use lateral_core::motion::{MotionEngine, Phase};
use lateral_core::waveform::{velocity_sign, Motion, WaveformConfig};

const TICK: Duration = Duration::from_millis(16);

fn sine_cfg() -> WaveformConfig {
    WaveformConfig {
        cycles_per_minute: 40.0,
        motion: Motion::Sine,
    }
}

fn tick_until(
    engine: &mut MotionEngine,
    cfg: &WaveformConfig,
    max_ticks: usize,
    mut done: impl FnMut(&MotionEngine) -> bool,
) -> bool {
    for _ in 0..max_ticks {
        engine.tick(TICK, cfg);
        if done(engine) {
            return true;
        }
    }
    false
}

#[test]
fn engine_starts_idle_and_centered() {
    let engine = MotionEngine::new();
    assert_eq!(engine.phase(), Phase::Idle);
    assert_eq!(engine.speed(), 0.0);
    assert_eq!(engine.virtual_time_ms(), 0.0);
    assert_eq!(engine.position(), 0.0);
    assert!(!engine.is_playing());
}

#[test]
fn ramp_is_monotonic_and_reaches_full_speed_on_time() {
    let cfg = sine_cfg();
    let mut engine = MotionEngine::new();
    engine.play();

    let ticks = (RAMP_DURATION_MS / 16.0).ceil() as usize;
    let mut prev_speed = 0.0;
    for i in 0..ticks {
        engine.tick(TICK, &cfg);
        assert!(
            engine.speed() >= prev_speed,
            "speed decreased during ramp at tick {i}: {} -> {}",
            prev_speed,
            engine.speed()
        );
        prev_speed = engine.speed();
    }
    assert_eq!(engine.speed(), 1.0);
    assert_eq!(engine.phase(), Phase::Steady);
}

#[test]
fn virtual_time_is_frozen_while_idle() {
    let cfg = sine_cfg();
    let mut engine = MotionEngine::new();
    for _ in 0..20 {
        engine.tick(TICK, &cfg);
    }
    assert_eq!(engine.virtual_time_ms(), 0.0);
    assert_eq!(engine.position(), 0.0);
}

#[test]
fn pause_heading_inbound_decelerates_to_exact_center() {
    let cfg = sine_cfg();
    let mut engine = MotionEngine::new();
    engine.play();
    assert!(tick_until(&mut engine, &cfg, 200, |e| e.phase() == Phase::Steady));

    // Scan to a point on the inbound leg around |position| 0.5.
    let found = tick_until(&mut engine, &cfg, 500, |e| {
        let inbound = velocity_sign(e.virtual_time_ms(), &cfg) * e.position() < 0.0;
        inbound && e.position().abs() > 0.4 && e.position().abs() < 0.6
    });
    assert!(found, "never reached the inbound window");

    engine.pause(&cfg);
    assert_eq!(engine.phase(), Phase::Decelerating);
    assert!(!engine.is_playing());

    // Must complete within a bounded number of ticks and land exactly.
    let stopped = tick_until(&mut engine, &cfg, 500, |e| e.phase() == Phase::Idle);
    assert!(stopped, "deceleration never completed");
    assert_eq!(engine.virtual_time_ms(), 0.0);
    assert_eq!(engine.speed(), 0.0);
    assert_eq!(engine.position(), 0.0);
}

#[test]
fn pause_heading_outbound_waits_for_the_edge() {
    let cfg = sine_cfg();
    let mut engine = MotionEngine::new();
    engine.play();
    assert!(tick_until(&mut engine, &cfg, 200, |e| e.phase() == Phase::Steady));

    // Scan to a point clearly heading away from center.
    let found = tick_until(&mut engine, &cfg, 500, |e| {
        let outbound = velocity_sign(e.virtual_time_ms(), &cfg) * e.position() > 0.0;
        outbound && e.position().abs() > 0.3 && e.position().abs() < 0.7
    });
    assert!(found, "never reached the outbound window");

    engine.pause(&cfg);
    assert_eq!(engine.phase(), Phase::WaitingForEdge);
    assert_eq!(engine.speed(), 1.0, "wait-for-edge holds full speed");

    // The excursion completes; deceleration begins near the extremum.
    let decel = tick_until(&mut engine, &cfg, 500, |e| e.phase() == Phase::Decelerating);
    assert!(decel, "never left WaitingForEdge");
    assert!(
        engine.position().abs() > 0.9,
        "deceleration began too far from the edge: {}",
        engine.position()
    );

    let stopped = tick_until(&mut engine, &cfg, 500, |e| e.phase() == Phase::Idle);
    assert!(stopped);
    assert_eq!(engine.virtual_time_ms(), 0.0);
    assert_eq!(engine.position(), 0.0);
}

#[test]
fn play_mid_deceleration_restarts_the_ramp_from_current_speed() {
    let cfg = sine_cfg();
    let mut engine = MotionEngine::new();
    engine.play();
    assert!(tick_until(&mut engine, &cfg, 200, |e| e.phase() == Phase::Steady));
    let found = tick_until(&mut engine, &cfg, 500, |e| {
        velocity_sign(e.virtual_time_ms(), &cfg) * e.position() < 0.0 && e.position().abs() > 0.4
    });
    assert!(found);
    engine.pause(&cfg);

    // Let the speed bleed off a little, then resume.
    for _ in 0..10 {
        engine.tick(TICK, &cfg);
    }
    assert_eq!(engine.phase(), Phase::Decelerating);
    let resume_speed = engine.speed();
    assert!(resume_speed < 1.0 && resume_speed > 0.0);
    let vt_at_resume = engine.virtual_time_ms();

    engine.play();
    assert_eq!(engine.phase(), Phase::RampingUp);
    let mut prev = resume_speed;
    for _ in 0..60 {
        engine.tick(TICK, &cfg);
        assert!(
            engine.speed() >= prev - 1e-12,
            "resumed ramp regressed: {prev} -> {}",
            engine.speed()
        );
        prev = engine.speed();
    }
    assert_eq!(engine.phase(), Phase::Steady);
    // Virtual time never reset: the stop episode was abandoned.
    assert!(engine.virtual_time_ms() > vt_at_resume);
}

#[test]
fn end_to_end_scenario_forty_cpm_sine() {
    let cfg = sine_cfg();
    let mut engine = MotionEngine::new();
    engine.play();

    // 800 ms of 16 ms ticks brings the ramp to exactly full speed.
    for _ in 0..50 {
        engine.tick(TICK, &cfg);
    }
    assert!((engine.speed() - 1.0).abs() < 0.01);
    assert_eq!(engine.phase(), Phase::Steady);

    // Pause where position is ~0.3 heading toward zero.
    let found = tick_until(&mut engine, &cfg, 1000, |e| {
        let inbound = velocity_sign(e.virtual_time_ms(), &cfg) < 0.0;
        inbound && e.position() > 0.25 && e.position() < 0.35
    });
    assert!(found, "never hit the pause window");
    engine.pause(&cfg);
    assert_eq!(engine.phase(), Phase::Decelerating);

    let stopped = tick_until(&mut engine, &cfg, 500, |e| e.phase() == Phase::Idle);
    assert!(stopped);
    assert_eq!(engine.virtual_time_ms(), 0.0);
    assert_eq!(engine.position(), 0.0);
    assert_eq!(engine.speed(), 0.0);
}

#[test]
fn oversized_deltas_are_clamped_per_path() {
    assert_eq!(
        clamped_delta(5000.0, TickPath::Frame),
        Duration::from_millis(50)
    );
    assert_eq!(
        clamped_delta(5000.0, TickPath::Interval),
        Duration::from_millis(100)
    );
    assert_eq!(clamped_delta(-20.0, TickPath::Frame), Duration::ZERO);
    assert_eq!(clamped_delta(8.0, TickPath::Frame), Duration::from_millis(8));
}

#[test]
fn delta_clock_clamps_and_resets() {
    let mut clock = DeltaClock::new();
    // First sample establishes the baseline only.
    assert_eq!(clock.advance(1000.0, TickPath::Frame), Duration::ZERO);
    assert_eq!(
        clock.advance(1016.0, TickPath::Frame),
        Duration::from_millis(16)
    );
    // A long stall collapses to the frame clamp.
    assert_eq!(
        clock.advance(9000.0, TickPath::Frame),
        Duration::from_millis(50)
    );
    clock.reset();
    assert_eq!(clock.advance(9100.0, TickPath::Frame), Duration::ZERO);
}

#[test]
fn a_five_second_gap_advances_no_further_than_the_clamp() {
    let cfg = sine_cfg();

    let mut gapped = MotionEngine::new();
    gapped.play();
    gapped.advance(0.0, TickPath::Frame, &cfg);
    gapped.advance(5000.0, TickPath::Frame, &cfg);

    let mut clamped = MotionEngine::new();
    clamped.play();
    clamped.advance(0.0, TickPath::Frame, &cfg);
    clamped.advance(50.0, TickPath::Frame, &cfg);

    assert_eq!(gapped.virtual_time_ms(), clamped.virtual_time_ms());
    assert_eq!(gapped.position(), clamped.position());
}

#[test]
fn both_tickers_share_one_baseline_and_never_double_advance() {
    let cfg = sine_cfg();

    let mut dual = MotionEngine::new();
    dual.play();
    let mut frame_only = MotionEngine::new();
    frame_only.play();

    for i in 0..100 {
        let now = i as f64 * 16.0;
        // Interval ticker fires immediately after the frame ticker.
        dual.advance(now, TickPath::Frame, &cfg);
        dual.advance(now, TickPath::Interval, &cfg);
        frame_only.advance(now, TickPath::Frame, &cfg);
    }

    assert!(
        (dual.virtual_time_ms() - frame_only.virtual_time_ms()).abs() < 1e-9,
        "dual-ticker engine drifted: {} vs {}",
        dual.virtual_time_ms(),
        frame_only.virtual_time_ms()
    );
}

#[test]
fn interval_ticker_carries_motion_when_frames_stall() {
    let cfg = sine_cfg();
    let mut engine = MotionEngine::new();
    engine.play();
    engine.advance(0.0, TickPath::Frame, &cfg);

    // Tab hidden: only the interval ticker fires, at a throttled cadence.
    let mut now = 0.0;
    for _ in 0..50 {
        now += 100.0;
        engine.advance(now, TickPath::Interval, &cfg);
    }
    assert!(
        engine.virtual_time_ms() > 0.0,
        "virtual time stalled while backgrounded"
    );
}
