use super::*;
use crate::animations::harness::{Harness, assert_render_is_pure, diff_count};

fn full_density() -> Parameters {
    Parameters::new().with("density", 1.0).with("cell_size", 10.0)
}

#[test]
fn init_spawns_one_trail_per_column_at_full_density() {
    let mut m = MatrixRain::default();
    let mut h = Harness::new(&m, 100.0, 80.0, full_density());
    h.init(&mut m);
    assert_eq!((m.columns, m.rows), (10, 8));
    assert_eq!(m.trails.len(), 10);

    h.resize(&mut m, 40.0, 80.0);
    assert_eq!(m.columns, 4);
    assert_eq!(m.trails.len(), 4, "resize must replace, not append");
}

#[test]
fn init_is_deterministic_for_a_seed() {
    let mut a = MatrixRain::default();
    let mut b = MatrixRain::default();
    Harness::new(&a, 100.0, 80.0, Parameters::new()).init(&mut a);
    Harness::new(&b, 100.0, 80.0, Parameters::new()).init(&mut b);
    assert_eq!(a.trails, b.trails);
}

#[test]
fn trails_fall_and_leave_the_screen_without_respawn() {
    let mut m = MatrixRain::default();
    let mut h = Harness::new(&m, 100.0, 80.0, full_density().with("fall_speed", 60.0));
    h.init(&mut m);

    let heads: Vec<f64> = m.trails.iter().map(|t| t.head).collect();
    h.step(&mut m, 0.05);
    assert_eq!(m.trails.len(), heads.len());
    assert!(m.trails.iter().zip(&heads).all(|(t, before)| t.head > *before));

    h.params.insert("density", 0.0);
    for _ in 0..100 {
        h.step(&mut m, 0.1);
    }
    assert!(m.trails.is_empty());
}

#[test]
fn render_is_pure_and_animates() {
    let mut m = MatrixRain::default();
    let mut h = Harness::new(&m, 120.0, 120.0, full_density());
    h.init(&mut m);
    assert_render_is_pure(&mut h, &m);
    let a = h.render(&m);
    h.step(&mut m, 0.5);
    assert!(diff_count(&a, &h.render(&m)) > 0);
}
