// Tests for the bounded trail history.

use lateral_core::trail::TrailHistory;

#[test]
fn trail_is_capacity_bounded_and_ordered() {
    let mut trail = TrailHistory::new(4);
    for i in 0..10 {
        trail.push(i as f32);
        assert!(trail.len() <= 4);
    }
    let positions: Vec<f32> = trail.iter().collect();
    assert_eq!(positions, vec![6.0, 7.0, 8.0, 9.0]);
}

#[test]
fn newest_entry_is_last() {
    let mut trail = TrailHistory::default();
    trail.push(0.25);
    trail.push(-0.5);
    assert_eq!(trail.iter().last(), Some(-0.5));
}

#[test]
fn clear_empties_the_history() {
    let mut trail = TrailHistory::new(8);
    trail.push(1.0);
    trail.clear();
    assert!(trail.is_empty());
    assert_eq!(trail.len(), 0);
}
