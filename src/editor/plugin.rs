use bevy::prelude::*;
use bevy_emitter2d::{Emitter2dPlugin, preset};

use super::camera::EditorCameraPlugin;
use super::input::EditorInputPlugin;
use super::overlay::EditorOverlayPlugin;
use super::state::ParticleEditor;
use crate::constants::limits::MAX_PARTICLES;
use crate::document::{DocumentPlugin, LoadEffectEvent};
use crate::options::OptionsPlugin;

/// Preset seeded into an empty editor
const STARTER_PRESET: &str = "Fire";

/// Main editor plugin that bundles all editor functionality
#[derive(Default)]
pub struct ParticleEditorPlugin {
    /// Effect file to open on startup. Without one the editor starts with a
    /// single preset emitter.
    pub effect_path: Option<String>,
}

impl Plugin for ParticleEditorPlugin {
    fn build(&self, app: &mut App) {
        app
            // Engine
            .add_plugins(Emitter2dPlugin)
            .init_resource::<ParticleEditor>()
            // Editor core
            .add_plugins(OptionsPlugin)
            .add_plugins(DocumentPlugin)
            .add_plugins(EditorCameraPlugin)
            .add_plugins(EditorInputPlugin)
            .add_plugins(EditorOverlayPlugin)
            // Setup
            .insert_resource(StartupEffect(self.effect_path.clone()))
            .add_systems(Startup, open_startup_effect);
    }
}

#[derive(Resource)]
struct StartupEffect(Option<String>);

fn open_startup_effect(
    startup: Res<StartupEffect>,
    mut editor: ResMut<ParticleEditor>,
    mut load_events: MessageWriter<LoadEffectEvent>,
) {
    if let Some(path) = &startup.0 {
        load_events.write(LoadEffectEvent { path: path.clone() });
        return;
    }

    match preset(STARTER_PRESET, MAX_PARTICLES) {
        Some(emitter) => {
            if let Some(index) = editor.push_emitter(emitter) {
                editor.select(index);
            }
        }
        None => warn!("Starter preset '{}' not found", STARTER_PRESET),
    }
}
