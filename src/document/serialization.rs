use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use std::path::Path;

use super::EffectDocument;
use crate::constants::{DEFAULT_EFFECT_PATH, EFFECT_EXTENSION};
use crate::editor::ParticleEditor;
use crate::options::EditorOptions;

/// Event to save the current effect
#[derive(Message)]
pub struct SaveEffectEvent {
    pub path: String,
}

/// Event to load an effect, replacing the current one
#[derive(Message)]
pub struct LoadEffectEvent {
    pub path: String,
}

/// Resource to track the current effect file
#[derive(Resource, Default)]
pub struct EffectFile {
    /// Path of the open document (None if never saved or loaded)
    pub path: Option<String>,
}

impl EffectFile {
    /// Get the display name for the current file
    pub fn display_name(&self) -> &str {
        self.path
            .as_ref()
            .and_then(|p| Path::new(p).file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
    }

    /// Path shortcuts should save to or load from
    pub fn path_or_default(&self) -> String {
        self.path
            .clone()
            .unwrap_or_else(|| DEFAULT_EFFECT_PATH.to_string())
    }
}

pub struct DocumentPlugin;

impl Plugin for DocumentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EffectFile>()
            .add_message::<SaveEffectEvent>()
            .add_message::<LoadEffectEvent>()
            .add_systems(
                Update,
                (handle_save_effect, handle_load_effect, update_window_title),
            );
    }
}

fn handle_save_effect(
    mut events: MessageReader<SaveEffectEvent>,
    editor: Res<ParticleEditor>,
    mut file: ResMut<EffectFile>,
) {
    for event in events.read() {
        match EffectDocument::from_editor(&editor).save(&event.path) {
            Ok(()) => {
                info!("Effect saved to: {}", event.path);
                file.path = Some(event.path.clone());
            }
            Err(e) => {
                error!("Failed to save effect to '{}': {}", event.path, e);
            }
        }
    }
}

fn handle_load_effect(
    mut events: MessageReader<LoadEffectEvent>,
    mut editor: ResMut<ParticleEditor>,
    mut file: ResMut<EffectFile>,
) {
    for event in events.read() {
        info!("Loading effect from: {}", event.path);
        if !event.path.ends_with(EFFECT_EXTENSION) {
            warn!("'{}' does not end in .{}", event.path, EFFECT_EXTENSION);
        }
        match EffectDocument::load(&event.path) {
            Ok(document) => {
                let count = document.apply(&mut editor);
                info!("Effect '{}' loaded with {} emitters", editor.name(), count);
                file.path = Some(event.path.clone());
            }
            Err(e) => {
                error!("Failed to load effect '{}': {}", event.path, e);
            }
        }
    }
}

/// Title with the effect name and file, plus the frame counters while the
/// debug overlay is on.
pub fn window_title(editor: &ParticleEditor, file: &EffectFile, show_stats: bool) -> String {
    let title = format!("Particle Editor - {} ({})", editor.name(), file.display_name());
    if show_stats {
        format!("{} | {}", title, editor.status_line())
    } else {
        title
    }
}

fn update_window_title(
    editor: Res<ParticleEditor>,
    file: Res<EffectFile>,
    options: Res<EditorOptions>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !editor.is_changed() && !file.is_changed() && !options.is_changed() {
        return;
    }
    let title = window_title(&editor, &file, options.show_debug);
    for mut window in &mut windows {
        if window.title != title {
            window.title = title.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_uses_file_name() {
        let mut file = EffectFile::default();
        assert_eq!(file.display_name(), "Untitled");
        assert_eq!(file.path_or_default(), DEFAULT_EFFECT_PATH);

        file.path = Some("effects/campfire.fx.ron".into());
        assert_eq!(file.display_name(), "campfire.fx.ron");
        assert_eq!(file.path_or_default(), "effects/campfire.fx.ron");
    }

    #[test]
    fn title_shows_stats_only_when_asked() {
        let editor = ParticleEditor::default();
        let file = EffectFile::default();
        assert_eq!(window_title(&editor, &file, false), "Particle Editor - untitled (Untitled)");
        let with_stats = window_title(&editor, &file, true);
        assert!(with_stats.ends_with(&editor.status_line()), "{}", with_stats);
    }
}
