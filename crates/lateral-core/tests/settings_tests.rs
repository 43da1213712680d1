// Tests for settings parsing, substitution fallbacks, and persistence.

use lateral_core::error::LateralError;
use lateral_core::reverb::ReverbType;
use lateral_core::settings::{MemoryStore, Settings, SettingsStore};
use lateral_core::waveform::Motion;

#[test]
fn defaults_are_sane() {
    let s = Settings::default();
    assert!(s.cycles_per_minute > 0.0);
    assert_eq!(s.motion, Motion::Sine);
    assert!(s.audio_enabled);
    assert!((0.0..=1.0).contains(&s.tone_volume));
    assert!((0.0..=1.0).contains(&s.reverb_mix));
    assert!(s.reverb_decay > 0.0);
}

#[test]
fn update_applies_valid_values() {
    let mut s = Settings::default();
    s.update("cycles_per_minute", "55.5").unwrap();
    assert_eq!(s.cycles_per_minute, 55.5);
    s.update("motion", "triangle").unwrap();
    assert_eq!(s.motion, Motion::Triangle);
    s.update("reverb_type", "cathedral").unwrap();
    assert_eq!(s.reverb_type, ReverbType::Cathedral);
    s.update("audio_enabled", "off").unwrap();
    assert!(!s.audio_enabled);
    s.update("reverb_decay", "4.25").unwrap();
    assert_eq!(s.reverb_decay, 4.25);
}

#[test]
fn unparsable_values_substitute_the_default() {
    let defaults = Settings::default();
    let mut s = Settings::default();
    s.update("cycles_per_minute", "not-a-number").unwrap();
    assert_eq!(s.cycles_per_minute, defaults.cycles_per_minute);
    s.update("frequency", "").unwrap();
    assert_eq!(s.frequency, defaults.frequency);
    s.update("motion", "squiggle").unwrap();
    assert_eq!(s.motion, defaults.motion);
    s.update("reverb_type", "cave").unwrap();
    assert_eq!(s.reverb_type, defaults.reverb_type);
}

#[test]
fn out_of_range_values_substitute_the_default() {
    let defaults = Settings::default();
    let mut s = Settings::default();
    s.update("cycles_per_minute", "0").unwrap();
    assert_eq!(s.cycles_per_minute, defaults.cycles_per_minute);
    s.update("tone_volume", "7.5").unwrap();
    assert_eq!(s.tone_volume, defaults.tone_volume);
    s.update("reverb_decay", "NaN").unwrap();
    assert_eq!(s.reverb_decay, defaults.reverb_decay);
}

#[test]
fn unknown_keys_error() {
    let mut s = Settings::default();
    let err = s.update("glitter", "1.0").unwrap_err();
    assert!(matches!(err, LateralError::UnknownSetting(k) if k == "glitter"));
}

#[test]
fn json_round_trip_preserves_every_field() {
    let mut s = Settings::default();
    s.update("cycles_per_minute", "72").unwrap();
    s.update("motion", "triangle").unwrap();
    s.update("reverb_enabled", "on").unwrap();
    s.update("reverb_type", "plate").unwrap();
    s.update("music_volume", "0.65").unwrap();

    let restored = Settings::from_json(&s.to_json());
    assert_eq!(restored.cycles_per_minute, s.cycles_per_minute);
    assert_eq!(restored.motion, s.motion);
    assert_eq!(restored.reverb_enabled, s.reverb_enabled);
    assert_eq!(restored.reverb_type, s.reverb_type);
    assert_eq!(restored.music_volume, s.music_volume);
}

#[test]
fn corrupt_json_falls_back_to_defaults() {
    let defaults = Settings::default();
    let restored = Settings::from_json("{not json");
    assert_eq!(restored.cycles_per_minute, defaults.cycles_per_minute);
    assert_eq!(restored.motion, defaults.motion);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let restored = Settings::from_json(r#"{"cycles_per_minute": 90.0}"#);
    assert_eq!(restored.cycles_per_minute, 90.0);
    assert_eq!(restored.frequency, Settings::default().frequency);
}

#[test]
fn memory_store_round_trips() {
    let store = MemoryStore::new();
    assert!(store.load().unwrap().is_none());

    let mut s = Settings::default();
    s.update("cycles_per_minute", "33").unwrap();
    store.save(&s).unwrap();

    let loaded = store.load().unwrap().expect("settings were saved");
    assert_eq!(loaded.cycles_per_minute, 33.0);
}
