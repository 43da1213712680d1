// Tests for the pure waveform generator.

use lateral_core::waveform::{position, velocity_sign, Motion, WaveformConfig};

fn cfg(cpm: f64, motion: Motion) -> WaveformConfig {
    WaveformConfig {
        cycles_per_minute: cpm,
        motion,
    }
}

#[test]
fn position_is_zero_at_time_zero_for_both_shapes() {
    assert_eq!(position(0.0, &cfg(40.0, Motion::Sine)), 0.0);
    assert_eq!(position(0.0, &cfg(40.0, Motion::Triangle)), 0.0);
}

#[test]
fn evaluation_is_idempotent() {
    let c = cfg(40.0, Motion::Sine);
    for i in 0..500 {
        let t = i as f64 * 13.7;
        assert_eq!(position(t, &c), position(t, &c));
    }
}

#[test]
fn position_is_bounded_for_all_shapes_and_rates() {
    for motion in [Motion::Sine, Motion::Triangle] {
        for cpm in [5.0, 40.0, 120.0] {
            let c = cfg(cpm, motion);
            for i in 0..2000 {
                let t = i as f64 * 7.3;
                let p = position(t, &c);
                assert!(
                    (-1.0..=1.0).contains(&p),
                    "position {p} out of bounds at t={t} cpm={cpm} {motion:?}"
                );
            }
        }
    }
}

#[test]
fn sine_reaches_one_at_quarter_period() {
    let c = cfg(40.0, Motion::Sine);
    let quarter = c.period_ms() / 4.0;
    assert!((position(quarter, &c) - 1.0).abs() < 1e-9);
    assert!((position(3.0 * quarter, &c) + 1.0).abs() < 1e-9);
}

#[test]
fn triangle_matches_sine_at_quarter_boundaries() {
    // Quarter-period symmetry: both shapes pass through 0, +1, 0, -1 at
    // the same times, so a shape switch never jumps position there.
    let period = cfg(40.0, Motion::Sine).period_ms();
    for (fraction, expected) in [(0.0, 0.0), (0.25, 1.0), (0.5, 0.0), (0.75, -1.0)] {
        let t = period * fraction;
        for motion in [Motion::Sine, Motion::Triangle] {
            let p = position(t, &cfg(40.0, motion));
            assert!(
                (p - expected).abs() < 1e-9,
                "{motion:?} at {fraction} period: expected {expected}, got {p}"
            );
        }
    }
}

#[test]
fn triangle_is_linear_on_the_rising_quarter() {
    let c = cfg(60.0, Motion::Triangle);
    let period = c.period_ms(); // 1000 ms
    // On [0, period/4) the ramp is position = 4 * t / period.
    for i in 0..25 {
        let t = i as f64 * 10.0;
        let expected = 4.0 * t / period;
        assert!((position(t, &c) - expected).abs() < 1e-9);
    }
}

#[test]
fn velocity_sign_tracks_quarter_phases() {
    for motion in [Motion::Sine, Motion::Triangle] {
        let c = cfg(40.0, motion);
        let period = c.period_ms();
        // Rising toward +1, falling through 0, falling toward -1, rising home.
        assert!(velocity_sign(0.1 * period, &c) > 0.0, "{motion:?} q=0.1");
        assert!(velocity_sign(0.3 * period, &c) < 0.0, "{motion:?} q=0.3");
        assert!(velocity_sign(0.6 * period, &c) < 0.0, "{motion:?} q=0.6");
        assert!(velocity_sign(0.9 * period, &c) > 0.0, "{motion:?} q=0.9");
    }
}

#[test]
fn motion_parse_accepts_known_names_only() {
    assert_eq!(Motion::parse("sine"), Some(Motion::Sine));
    assert_eq!(Motion::parse(" Triangle "), Some(Motion::Triangle));
    assert_eq!(Motion::parse("smooth"), Some(Motion::Sine));
    assert_eq!(Motion::parse("sawtooth"), None);
}
