use bevy::prelude::*;
use bevy::window::{FileDragAndDrop, PrimaryWindow};
use bevy_emitter2d::{EmitterFlags, ParticleRng};
use std::path::Path;

use super::camera::{EditorCamera, cursor_world_position};
use super::state::ParticleEditor;
use crate::constants::{EFFECT_EXTENSION, PICK_RADIUS};
use crate::document::{EffectFile, LoadEffectEvent, SaveEffectEvent};
use crate::options::EditorOptions;

pub struct EditorInputPlugin;

impl Plugin for EditorInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EmitterDrag>().add_systems(
            Update,
            (
                handle_clipboard_shortcuts,
                handle_emitter_shortcuts,
                handle_file_shortcuts,
                handle_dropped_files,
                handle_view_toggles,
                drag_emitters,
            ),
        );
    }
}

/// Offset between the cursor and the emitter being dragged
#[derive(Resource, Default)]
pub struct EmitterDrag {
    pub offset: Option<Vec2>,
}

fn ctrl_pressed(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight])
}

/// Ctrl+C / Ctrl+V copy and paste the active emitter
fn handle_clipboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor: ResMut<ParticleEditor>,
) {
    if !ctrl_pressed(&keyboard) {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyC) && editor.copy() {
        info!("Copied emitter {:?}", editor.active());
    } else if keyboard.just_pressed(KeyCode::KeyV) && editor.paste() {
        info!("Pasted into emitter {:?}", editor.active());
    }
}

/// Add, remove, reorder, select, sync and pause emitters
fn handle_emitter_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor: ResMut<ParticleEditor>,
    mut rng: ResMut<ParticleRng>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
) {
    if ctrl_pressed(&keyboard) {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyN) {
        let position = match (window_query.single(), camera_query.single()) {
            (Ok(window), Ok((camera, transform))) => {
                cursor_world_position(window, camera, transform).unwrap_or(Vec2::ZERO)
            }
            _ => Vec2::ZERO,
        };
        if let Some(index) = editor.add_emitter(position, &mut rng.0) {
            editor.select(index);
        }
    }

    if keyboard.just_pressed(KeyCode::Delete) {
        editor.remove_emitter();
    }
    if keyboard.just_pressed(KeyCode::PageUp) {
        editor.move_up();
    }
    if keyboard.just_pressed(KeyCode::PageDown) {
        editor.move_down();
    }
    if keyboard.just_pressed(KeyCode::Tab) {
        editor.cycle_active();
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        editor.deselect();
    }
    if keyboard.just_pressed(KeyCode::Space) {
        editor.sync();
    }
    if keyboard.just_pressed(KeyCode::KeyP) {
        if let Some(emitter) = editor.active_emitter_mut() {
            emitter.flags.toggle(EmitterFlags::PAUSED);
        }
    }
}

/// Ctrl+S saves, Ctrl+O reloads the current document
fn handle_file_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    file: Res<EffectFile>,
    mut save_events: MessageWriter<SaveEffectEvent>,
    mut load_events: MessageWriter<LoadEffectEvent>,
) {
    if !ctrl_pressed(&keyboard) {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyS) {
        save_events.write(SaveEffectEvent {
            path: file.path_or_default(),
        });
    } else if keyboard.just_pressed(KeyCode::KeyO) {
        load_events.write(LoadEffectEvent {
            path: file.path_or_default(),
        });
    }
}

/// Effect path for a file dropped onto the window, `None` for anything that
/// is not an effect document.
pub fn dropped_effect_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    if !name.ends_with(&format!(".{}", EFFECT_EXTENSION)) {
        return None;
    }
    path.to_str().map(str::to_string)
}

fn handle_dropped_files(
    mut drops: MessageReader<FileDragAndDrop>,
    mut load_events: MessageWriter<LoadEffectEvent>,
) {
    for drop in drops.read() {
        let FileDragAndDrop::DroppedFile { path_buf, .. } = drop else {
            continue;
        };
        match dropped_effect_path(path_buf) {
            Some(path) => {
                load_events.write(LoadEffectEvent { path });
            }
            None => warn!(
                "Ignoring dropped file {:?}: only .{} effects can be opened",
                path_buf, EFFECT_EXTENSION
            ),
        }
    }
}

/// G toggles the grid, F3 the debug overlay, F4 the origin placeholder
fn handle_view_toggles(keyboard: Res<ButtonInput<KeyCode>>, mut options: ResMut<EditorOptions>) {
    if keyboard.just_pressed(KeyCode::KeyG) && !ctrl_pressed(&keyboard) {
        options.show_grid = !options.show_grid;
    }
    if keyboard.just_pressed(KeyCode::F3) {
        options.show_debug = !options.show_debug;
    }
    if keyboard.just_pressed(KeyCode::F4) {
        options.show_placeholder = !options.show_placeholder;
    }
}

/// Left click picks the emitter under the cursor; dragging moves the active
/// emitter.
fn drag_emitters(
    buttons: Res<ButtonInput<MouseButton>>,
    mut drag: ResMut<EmitterDrag>,
    mut editor: ResMut<ParticleEditor>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
) {
    if buttons.just_released(MouseButton::Left) {
        drag.offset = None;
        return;
    }

    let (Ok(window), Ok((camera, camera_transform))) = (window_query.single(), camera_query.single())
    else {
        return;
    };
    let Some(cursor) = cursor_world_position(window, camera, camera_transform) else {
        return;
    };

    if buttons.just_pressed(MouseButton::Left) {
        if let Some(index) = editor.pick(cursor, PICK_RADIUS) {
            editor.select(index);
        }
        drag.offset = editor.active_emitter().map(|e| e.position - cursor);
        return;
    }

    if let (true, Some(offset)) = (buttons.pressed(MouseButton::Left), drag.offset) {
        if let Some(emitter) = editor.active_emitter_mut() {
            emitter.position = cursor + offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_effect_files_are_opened_on_drop() {
        assert_eq!(
            dropped_effect_path(Path::new("/tmp/fx/campfire.fx.ron")),
            Some("/tmp/fx/campfire.fx.ron".to_string())
        );
        assert_eq!(dropped_effect_path(Path::new("/tmp/fx/spark.png")), None);
        assert_eq!(dropped_effect_path(Path::new("/tmp/options.ron")), None);
        assert_eq!(dropped_effect_path(Path::new("/")), None);
    }
}
