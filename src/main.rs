//! Main binary for running the particle editor standalone.
//!
//! Pass a `.fx.ron` path to open it on startup.

use bevy::prelude::*;
use bevy_particle_editor::ParticleEditorPlugin;

fn main() {
    let effect_path = std::env::args().nth(1);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Particle Editor".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(ParticleEditorPlugin { effect_path })
        .run();
}
