use super::*;
use crate::animations::harness::{Harness, assert_render_is_pure, diff_count};
use crate::engine::module::FrameTiming;

fn harness(module: &ParticleNetwork, overrides: Parameters) -> Harness {
    Harness::new(module, 200.0, 120.0, overrides)
}

#[test]
fn init_fully_replaces_particles() {
    let mut m = ParticleNetwork::default();
    let mut h = harness(&m, Parameters::new().with("count", 100.0));
    h.init(&mut m);
    assert_eq!(m.particles.len(), 100);

    h.resize(&mut m, 80.0, 60.0);
    assert_eq!(m.particles.len(), 100);
    assert_eq!(m.bounds, Vec2::new(80.0, 60.0));
    assert!(
        m.particles
            .iter()
            .all(|p| p.pos.x <= 80.0 && p.pos.y <= 60.0)
    );
}

#[test]
fn same_seed_same_layout() {
    let mut a = ParticleNetwork::default();
    let mut b = ParticleNetwork::default();
    harness(&a, Parameters::new()).init(&mut a);
    harness(&b, Parameters::new()).init(&mut b);
    assert_eq!(a.particles, b.particles);

    let mut c = ParticleNetwork::default();
    harness(&c, Parameters::new().with("seed", 99.0)).init(&mut c);
    assert_ne!(a.particles, c.particles);
}

#[test]
fn particles_stay_inside_bounds() {
    let mut m = ParticleNetwork::default();
    let mut h = harness(&m, Parameters::new().with("speed", 200.0));
    h.init(&mut m);
    for _ in 0..200 {
        h.step(&mut m, 1.0 / 30.0);
    }
    assert!(m.particles.iter().all(|p| {
        (0.0..=200.0).contains(&p.pos.x) && (0.0..=120.0).contains(&p.pos.y)
    }));
}

#[test]
fn render_is_pure_and_changes_with_update() {
    let mut m = ParticleNetwork::default();
    let mut h = harness(&m, Parameters::new());
    h.init(&mut m);
    assert_render_is_pure(&mut h, &m);

    let before = h.render(&m);
    h.step(&mut m, 0.5);
    let after = h.render(&m);
    assert!(diff_count(&before, &after) > 0);
}

#[test]
fn cleanup_releases_particles() {
    let mut m = ParticleNetwork::default();
    let mut h = harness(&m, Parameters::new());
    h.init(&mut m);
    h.cleanup(&mut m);
    assert!(m.particles.is_empty());
}

#[test]
fn non_finite_speed_fails_the_update() {
    let mut m = ParticleNetwork::default();
    let mut h = harness(&m, Parameters::new().with("speed", f64::NAN));
    h.init(&mut m);
    let timing = FrameTiming {
        delta_time: 0.1,
        ..FrameTiming::default()
    };
    let ctx = AnimationContext::new(&mut h.surface, &h.params, timing);
    let err = m.update(&ctx).unwrap_err();
    assert!(matches!(err, CanvasFxError::Module(_)), "{err}");
}
