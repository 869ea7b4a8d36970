//! Bundled animations and their registration.

use std::sync::Arc;

use crate::{
    animations::{glitch_bars, matrix_rain, particle_network, sine_waves, spiral_grid},
    engine::module::{AnimationModule, FnFactory, LoadedAnimation},
    registry::{
        animation_registry::{AnimationLoader, AnimationRegistry},
        metadata::AnimationMetadata,
    },
};

struct Builtin {
    id: &'static str,
    metadata: fn() -> AnimationMetadata,
    create: fn() -> Box<dyn AnimationModule>,
}

const BUILTINS: [Builtin; 5] = [
    Builtin {
        id: particle_network::ID,
        metadata: particle_network::metadata,
        create: particle_network::create,
    },
    Builtin {
        id: sine_waves::ID,
        metadata: sine_waves::metadata,
        create: sine_waves::create,
    },
    Builtin {
        id: spiral_grid::ID,
        metadata: spiral_grid::metadata,
        create: spiral_grid::create,
    },
    Builtin {
        id: matrix_rain::ID,
        metadata: matrix_rain::metadata,
        create: matrix_rain::create,
    },
    Builtin {
        id: glitch_bars::ID,
        metadata: glitch_bars::metadata,
        create: glitch_bars::create,
    },
];

/// Ids of the bundled animations in registration order.
pub fn builtin_ids() -> Vec<&'static str> {
    BUILTINS.iter().map(|b| b.id).collect()
}

/// Factory for a bundled animation, bypassing the registry.
pub fn builtin_factory(id: &str) -> Option<LoadedAnimation> {
    BUILTINS
        .iter()
        .find(|b| b.id == id)
        .map(|b| Arc::new(FnFactory::new(b.id, b.create)) as LoadedAnimation)
}

/// Register every bundled animation. Call once at startup before querying `registry`.
pub fn register_builtins(registry: &AnimationRegistry) {
    for b in &BUILTINS {
        let metadata = (b.metadata)();
        if let Err(e) = metadata.validate() {
            tracing::warn!(id = b.id, error = %e, "bundled animation has an invalid schema");
        }
        let factory: LoadedAnimation = Arc::new(FnFactory::new(b.id, b.create));
        registry.register(metadata, AnimationLoader::ready(factory));
    }
    tracing::debug!(count = BUILTINS.len(), "bundled animations registered");
}

#[cfg(test)]
#[path = "../../tests/unit/animations/catalog.rs"]
mod tests;
