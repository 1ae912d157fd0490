use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::{GRID_SPACING, colors};

/// Editor display options that persist to disk.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EditorOptions {
    pub show_grid: bool,
    /// Emitter markers, timer bars and container outlines for the selection.
    pub show_debug: bool,
    /// Reference cross at the world origin.
    pub show_placeholder: bool,
    pub background: Srgba,
    pub foreground: Srgba,
    pub grid_color: Srgba,
    pub debug_color: Srgba,
    pub grid_spacing: f32,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_debug: true,
            show_placeholder: false,
            background: colors::BACKGROUND.to_srgba(),
            foreground: colors::FOREGROUND.to_srgba(),
            grid_color: colors::GRID.to_srgba(),
            debug_color: colors::DEBUG.to_srgba(),
            grid_spacing: GRID_SPACING,
        }
    }
}

impl EditorOptions {
    /// Get the options file path
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("bevy_particle_editor");
            p.push("options.ron");
            p
        })
    }

    /// Load options from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(content) => Self::from_ron(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse options, falling back to defaults on malformed input.
    pub fn from_ron(content: &str) -> Self {
        ron::from_str(content).unwrap_or_else(|e| {
            warn!("Ignoring malformed editor options: {}", e);
            Self::default()
        })
    }

    /// Save options to disk
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            error!("Could not determine config directory");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {}", e);
                return;
            }
        }

        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    error!("Failed to save editor options: {}", e);
                } else {
                    info!("Editor options saved to: {:?}", path);
                }
            }
            Err(e) => {
                error!("Failed to serialize editor options: {}", e);
            }
        }
    }
}

pub struct OptionsPlugin;

impl Plugin for OptionsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(EditorOptions::load())
            .add_systems(Update, (apply_clear_color, save_options_on_exit));
    }
}

fn apply_clear_color(options: Res<EditorOptions>, mut clear_color: ResMut<ClearColor>) {
    if options.is_changed() {
        clear_color.0 = options.background.into();
    }
}

fn save_options_on_exit(mut exits: MessageReader<AppExit>, options: Res<EditorOptions>) {
    if exits.read().next().is_some() {
        options.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options = EditorOptions::from_ron("(show_grid: false, grid_spacing: 16.0)");
        assert!(!options.show_grid);
        assert_eq!(options.grid_spacing, 16.0);
        assert!(options.show_debug);
        assert_eq!(options.background, EditorOptions::default().background);
    }

    #[test]
    fn garbage_yields_defaults() {
        assert_eq!(EditorOptions::from_ron("not ron at all"), EditorOptions::default());
    }

    #[test]
    fn options_round_trip() {
        let options = EditorOptions {
            show_placeholder: true,
            debug_color: Srgba::new(1.0, 0.0, 0.0, 1.0),
            ..default()
        };
        let text = ron::ser::to_string_pretty(&options, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(EditorOptions::from_ron(&text), options);
    }
}
