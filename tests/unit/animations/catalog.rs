use super::*;
use crate::{
    animations::harness::{Harness, assert_render_is_pure},
    engine::params::Parameters,
    registry::metadata::Category,
};

#[test]
fn one_builtin_per_category() {
    let registry = AnimationRegistry::new();
    register_builtins(&registry);
    assert_eq!(registry.count(), 5);
    for c in Category::ALL {
        assert_eq!(registry.get_by_category(c).len(), 1, "{c}");
    }
    let ids: Vec<String> = registry.get_all().into_iter().map(|m| m.id).collect();
    assert_eq!(ids, builtin_ids());
}

#[test]
fn schemas_validate_and_match_module_defaults() {
    for b in &BUILTINS {
        let meta = (b.metadata)();
        meta.validate().unwrap();
        assert_eq!(meta.id, b.id);
        let module = (b.create)();
        assert_eq!(module.default_parameters(), meta.default_parameters(), "{}", b.id);
        assert_eq!(module.name(), meta.name);
    }
}

#[test]
fn every_builtin_honors_the_module_contract() {
    for id in builtin_ids() {
        let factory = builtin_factory(id).unwrap();
        assert_eq!(factory.name(), id);
        let mut module = factory.create();
        let mut h = Harness::new(module.as_ref(), 80.0, 60.0, Parameters::new());
        h.init(module.as_mut());
        for _ in 0..5 {
            h.step(module.as_mut(), 1.0 / 60.0);
        }
        assert_render_is_pure(&mut h, module.as_ref());

        // Re-init after resize must be safe without cleanup.
        h.resize(module.as_mut(), 40.0, 30.0);
        h.step(module.as_mut(), 1.0 / 60.0);
        assert_render_is_pure(&mut h, module.as_ref());
        h.cleanup(module.as_mut());
    }
}

#[tokio::test]
async fn registry_serves_builtin_factories() {
    let registry = AnimationRegistry::new();
    register_builtins(&registry);
    let a = registry.get_by_id("sine-waves").await.unwrap();
    let b = registry.get_by_id("sine-waves").await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(builtin_factory("missing").is_none());
}
