use super::*;

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
}

#[test]
fn shift_unmerges_and_suppresses_snap() {
    let m = Modifiers { shift: true, ..Default::default() };
    assert!(m.unmerges());
    assert!(m.suppresses_snap());
    assert!(!m.angle_snaps());
}

#[test]
fn ctrl_angle_snaps_without_suppressing_snap() {
    let m = Modifiers { ctrl: true, ..Default::default() };
    assert!(m.angle_snaps());
    assert!(!m.suppresses_snap());
    assert!(!m.unmerges());
}

#[test]
fn ctrl_alt_suppresses_snap() {
    let m = Modifiers { ctrl: true, alt: true, ..Default::default() };
    assert!(m.suppresses_snap());
    assert!(m.angle_snaps());
}

#[test]
fn alt_alone_does_nothing() {
    let m = Modifiers { alt: true, ..Default::default() };
    assert!(!m.suppresses_snap());
    assert!(!m.angle_snaps());
    assert!(!m.unmerges());
}

// =============================================================
// GestureState
// =============================================================

#[test]
fn gesture_default_is_idle() {
    assert!(matches!(GestureState::default(), GestureState::Idle));
}
