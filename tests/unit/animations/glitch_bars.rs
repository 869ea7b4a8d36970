use super::*;
use crate::animations::harness::{Harness, assert_render_is_pure, diff_count};

#[test]
fn bars_tile_the_height_and_are_rebuilt_on_resize() {
    let mut m = GlitchBars::default();
    let mut h = Harness::new(&m, 120.0, 100.0, Parameters::new().with("bars", 10.0));
    h.init(&mut m);
    assert_eq!(m.bars.len(), 10);
    assert!(m.bars.iter().all(|b| b.y < 100.0 && b.height <= 10.0));

    h.resize(&mut m, 120.0, 40.0);
    assert_eq!(m.bars.len(), 10);
    assert!(m.bars.iter().all(|b| b.y < 40.0 && b.height <= 4.0));
}

#[test]
fn glitches_fire_once_per_interval() {
    let mut m = GlitchBars::default();
    let mut h = Harness::new(&m, 64.0, 64.0, Parameters::new().with("interval", 0.25));
    h.init(&mut m);
    h.step(&mut m, 0.1);
    assert_eq!(m.glitches, 0);
    h.step(&mut m, 0.2);
    assert_eq!(m.glitches, 1);
    assert!((m.timer - 0.05).abs() < 1e-9);
}

#[test]
fn zero_intensity_never_shifts() {
    let mut m = GlitchBars::default();
    let mut h = Harness::new(&m, 64.0, 64.0, Parameters::new().with("intensity", 0.0));
    h.init(&mut m);
    for _ in 0..20 {
        h.step(&mut m, 0.2);
    }
    assert!(m.bars.iter().all(|b| b.shift == 0.0));
}

#[test]
fn render_is_pure_and_reacts_to_glitches() {
    let mut m = GlitchBars::default();
    let mut h = Harness::new(&m, 96.0, 96.0, Parameters::new().with("intensity", 1.0));
    h.init(&mut m);
    assert_render_is_pure(&mut h, &m);
    let a = h.render(&m);
    h.step(&mut m, 0.5);
    assert!(diff_count(&a, &h.render(&m)) > 0);
}
