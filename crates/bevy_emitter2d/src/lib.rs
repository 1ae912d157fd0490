//! # bevy_emitter2d
//!
//! CPU-simulated 2D particle emitters for Bevy.
//!
//! Each [`Emitter`] owns a fixed-capacity particle pool and a declarative
//! [`EmitterConfig`]. Once per frame, [`Emitter::update`] spawns, moves and
//! retires particles, and [`Emitter::draw`] turns the live ones into
//! renderer-agnostic [`DrawCommand`]s. Randomness is injected, so a seeded
//! generator replays the exact same effect.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_emitter2d::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins((DefaultPlugins, Emitter2dPlugin))
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn(Camera2d);
//!     if let Some(fire) = preset("Fire", 2000) {
//!         commands.spawn((fire, Transform::from_xyz(0.0, -100.0, 0.0)));
//!     }
//! }
//! ```
//!
//! Without the plugin, the core is plain data and functions:
//!
//! ```rust
//! use bevy_emitter2d::prelude::*;
//!
//! let mut rng = fastrand::Rng::with_seed(7);
//! let mut emitter = preset("Sparks", 256).unwrap();
//! for _ in 0..60 {
//!     emitter.update(1.0 / 60.0, &mut rng);
//! }
//! let mut commands: Vec<DrawCommand> = Vec::new();
//! let stats = emitter.draw(None, &mut commands);
//! assert_eq!(stats.drawn, commands.len());
//! ```

pub mod config;
pub mod container;
pub mod draw;
pub mod easing;
pub mod emitter;
pub mod interpolate;
pub mod particle;
pub mod presets;
pub mod random;
pub mod render;

pub use config::{Atlas, Container, EmitterConfig, Force, Gradient, ParticleBlendMode, Ramp, ValueRange};
pub use draw::{DrawCommand, DrawShape, DrawStats, ParticleRenderer};
pub use easing::Easing;
pub use emitter::{Emitter, EmitterFlags, EmitterPhase, FALLBACK_DT};
pub use particle::{Particle, ParticlePool};
pub use presets::{default_presets, preset};
pub use random::{ParticleRng, RandomSource};
pub use render::{GizmoRenderer, ParticleCulling, ParticleStats, draw_container_outline};

use bevy::prelude::*;

pub mod prelude {
    pub use crate::config::{
        Atlas, Container, EmitterConfig, Force, Gradient, ParticleBlendMode, Ramp, ValueRange,
    };
    pub use crate::draw::{DrawCommand, DrawShape, DrawStats, ParticleRenderer};
    pub use crate::easing::Easing;
    pub use crate::emitter::{Emitter, EmitterFlags, EmitterPhase};
    pub use crate::presets::{default_presets, preset};
    pub use crate::random::{ParticleRng, RandomSource};
    pub use crate::render::{ParticleCulling, ParticleStats};
    pub use crate::Emitter2dPlugin;
}

/// Steps and draws every `Emitter` component each frame.
///
/// Emitters follow their entity's `Transform`. Drawing goes through gizmos,
/// culled by [`ParticleCulling`]; per-frame counters land in
/// [`ParticleStats`].
pub struct Emitter2dPlugin;

impl Plugin for Emitter2dPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<EmitterConfig>()
            .register_type::<ValueRange>()
            .register_type::<Ramp>()
            .register_type::<Force>()
            .register_type::<Atlas>()
            .register_type::<Gradient>()
            .register_type::<Container>()
            .register_type::<ParticleBlendMode>()
            .register_type::<Easing>()
            .init_resource::<ParticleRng>()
            .init_resource::<ParticleCulling>()
            .init_resource::<ParticleStats>()
            .add_systems(
                Update,
                (
                    render::sync_emitter_transforms,
                    render::update_emitters,
                    render::draw_emitters,
                )
                    .chain(),
            );
    }
}
