//! Effect documents: the on-disk form of everything an editor holds.
//!
//! Only configuration and settings are stored. Live particles and timers
//! are never persisted, so a loaded effect always starts from the top of its
//! cycle.

mod serialization;

pub use serialization::*;

use bevy::prelude::*;
use bevy_emitter2d::{Emitter, EmitterConfig, EmitterFlags, ParticleBlendMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::constants::limits::{MAX_COLORS, MAX_EMITTERS, MAX_FORCES, MAX_PARTICLES};
use crate::editor::ParticleEditor;

/// Current document format version.
pub const DOCUMENT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum DocumentError {
    Io(std::io::Error),
    Serialize(ron::Error),
    Parse(ron::error::SpannedError),
    /// The file had no content at all.
    Empty,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Serialize(e) => write!(f, "failed to serialize effect: {}", e),
            Self::Parse(e) => write!(f, "failed to parse effect: {}", e),
            Self::Empty => write!(f, "effect file is empty"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialize(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Empty => None,
        }
    }
}

impl From<std::io::Error> for DocumentError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Serialized form of one emitter.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EmitterDocument {
    pub position: Vec2,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    pub life: f32,
    pub delay: f32,
    #[serde(default)]
    pub blend_mode: ParticleBlendMode,
    #[serde(default)]
    pub flags: EmitterFlags,
    pub config: EmitterConfig,
}

fn default_capacity() -> usize {
    MAX_PARTICLES
}

impl From<&Emitter> for EmitterDocument {
    fn from(e: &Emitter) -> Self {
        Self {
            position: e.position,
            capacity: e.capacity(),
            life: e.life,
            delay: e.delay,
            blend_mode: e.blend_mode,
            flags: e.flags,
            config: e.config.clone(),
        }
    }
}

impl EmitterDocument {
    /// Build a fresh emitter, cutting anything over the editor limits.
    pub fn to_emitter(&self) -> Emitter {
        let mut config = self.config.clone();

        if config.gradient.colors.len() > MAX_COLORS {
            warn!(
                "Gradient has {} colors, keeping the first {}",
                config.gradient.colors.len(),
                MAX_COLORS
            );
            config.gradient.colors.truncate(MAX_COLORS);
        }
        if config.forces.len() > MAX_FORCES {
            warn!(
                "Emitter has {} forces, keeping the first {}",
                config.forces.len(),
                MAX_FORCES
            );
            config.forces.truncate(MAX_FORCES);
        }

        let capacity = if self.capacity > MAX_PARTICLES {
            warn!(
                "Emitter capacity {} clamped to {}",
                self.capacity, MAX_PARTICLES
            );
            MAX_PARTICLES
        } else {
            self.capacity
        };

        Emitter::new(capacity)
            .with_config(config)
            .with_position(self.position)
            .with_life(self.life)
            .with_delay(self.delay)
            .with_blend_mode(self.blend_mode)
            .with_flags(self.flags)
    }
}

/// A whole effect: a name and its ordered emitters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EffectDocument {
    #[serde(default)]
    pub version: u32,
    pub name: String,
    pub emitters: Vec<EmitterDocument>,
}

impl EffectDocument {
    pub fn from_editor(editor: &ParticleEditor) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            name: editor.name().to_string(),
            emitters: editor.emitters().iter().map(EmitterDocument::from).collect(),
        }
    }

    /// Replace the editor's effect with this document. Returns how many
    /// emitters were loaded.
    pub fn apply(&self, editor: &mut ParticleEditor) -> usize {
        if self.version > DOCUMENT_VERSION {
            warn!(
                "Effect '{}' has format version {}, newer than {}",
                self.name, self.version, DOCUMENT_VERSION
            );
        }
        if self.emitters.len() > MAX_EMITTERS {
            warn!(
                "Effect '{}' has {} emitters, loading the first {}",
                self.name,
                self.emitters.len(),
                MAX_EMITTERS
            );
        }

        editor.clear();
        editor.set_name(&self.name);
        self.emitters
            .iter()
            .take(MAX_EMITTERS)
            .filter_map(|doc| editor.push_emitter(doc.to_emitter()))
            .count()
    }

    pub fn to_ron(&self) -> Result<String, DocumentError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(DocumentError::Serialize)
    }

    pub fn from_ron(content: &str) -> Result<Self, DocumentError> {
        if content.trim().is_empty() {
            return Err(DocumentError::Empty);
        }
        ron::from_str(content).map_err(DocumentError::Parse)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let content = self.to_ron()?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path)?;
        Self::from_ron(&content)
    }
}

#[cfg(test)]
mod tests {
    use bevy_emitter2d::{Container, Force, Gradient};

    use super::*;

    fn sample_editor() -> ParticleEditor {
        let mut rng = fastrand::Rng::with_seed(8);
        let mut editor = ParticleEditor::default();
        editor.set_name("test fx");
        editor.add_emitter(Vec2::new(-40.0, 0.0), &mut rng);
        editor.add_emitter(Vec2::new(40.0, 0.0), &mut rng);

        let e = &mut editor.emitters_mut()[1];
        e.config.container = Container::Ring { inner: 4.0, outer: 12.0 };
        e.config.forces.push(Force::new(270.0, 50.0));
        e.flags = EmitterFlags::LOOP | EmitterFlags::DRAW_TRIANGLES;
        e.blend_mode = ParticleBlendMode::Additive;
        e.delay = 0.5;
        editor
    }

    #[test]
    fn editor_round_trips_through_ron() {
        let editor = sample_editor();
        let doc = EffectDocument::from_editor(&editor);
        let text = doc.to_ron().unwrap();
        let back = EffectDocument::from_ron(&text).unwrap();
        assert_eq!(back, doc);

        let mut loaded = ParticleEditor::default();
        assert_eq!(back.apply(&mut loaded), 2);
        assert_eq!(loaded.name(), "test_fx");
        for (a, b) in editor.emitters().iter().zip(loaded.emitters()) {
            assert_eq!(a.config, b.config);
            assert_eq!(a.position, b.position);
            assert_eq!(a.flags, b.flags);
            assert_eq!(a.blend_mode, b.blend_mode);
            assert_eq!(a.delay, b.delay);
            assert_eq!(a.life, b.life);
        }
    }

    #[test]
    fn flags_are_written_by_name() {
        let doc = EffectDocument::from_editor(&sample_editor());
        let text = doc.to_ron().unwrap();
        assert!(text.contains("LOOP"), "{}", text);
        assert!(text.contains("DRAW_TRIANGLES"), "{}", text);
    }

    #[test]
    fn apply_clamps_to_editor_limits() {
        let mut emitter = EmitterDocument::from(&Emitter::new(10));
        emitter.capacity = MAX_PARTICLES * 4;
        emitter.config.gradient = Gradient::new(vec![Srgba::WHITE; MAX_COLORS + 5]);
        emitter.config.forces = vec![Force::new(0.0, 1.0); MAX_FORCES + 2];

        let built = emitter.to_emitter();
        assert_eq!(built.capacity(), MAX_PARTICLES);
        assert_eq!(built.config.gradient.len(), MAX_COLORS);
        assert_eq!(built.config.forces.len(), MAX_FORCES);

        let doc = EffectDocument {
            version: DOCUMENT_VERSION,
            name: "many".into(),
            emitters: vec![emitter; MAX_EMITTERS + 3],
        };
        let mut editor = ParticleEditor::default();
        assert_eq!(doc.apply(&mut editor), MAX_EMITTERS);
        assert_eq!(editor.len(), MAX_EMITTERS);
    }

    #[test]
    fn apply_replaces_existing_emitters() {
        let mut editor = sample_editor();
        editor.select(1);
        let doc = EffectDocument {
            version: DOCUMENT_VERSION,
            name: "solo".into(),
            emitters: vec![EmitterDocument::from(&Emitter::new(4))],
        };
        assert_eq!(doc.apply(&mut editor), 1);
        assert_eq!(editor.len(), 1);
        assert_eq!(editor.active(), None);
        assert_eq!(editor.id(0), Some(0));
    }

    #[test]
    fn loaded_effect_replays_like_the_original() {
        let mut original = sample_editor();
        let text = EffectDocument::from_editor(&original).to_ron().unwrap();
        let mut loaded = ParticleEditor::default();
        EffectDocument::from_ron(&text).unwrap().apply(&mut loaded);

        let mut rng_original = fastrand::Rng::with_seed(99);
        let mut rng_loaded = fastrand::Rng::with_seed(99);
        for step in 0..120 {
            let dt = if step % 3 == 0 { 0.02 } else { 1.0 / 60.0 };
            assert_eq!(
                original.update(dt, &mut rng_original),
                loaded.update(dt, &mut rng_loaded),
                "step {}",
                step
            );
            for (a, b) in original.emitters().iter().zip(loaded.emitters()) {
                assert_eq!(a.last_spawned(), b.last_spawned(), "step {}", step);
            }
        }
        for (a, b) in original.emitters().iter().zip(loaded.emitters()) {
            assert!(a.alive() > 0);
            assert_eq!(a.pool().slots(), b.pool().slots());
        }
    }

    #[test]
    fn pool_capacity_survives_load_and_save() {
        let doc = EffectDocument {
            version: DOCUMENT_VERSION,
            name: "small".into(),
            emitters: vec![EmitterDocument::from(&Emitter::new(64))],
        };
        let mut editor = ParticleEditor::default();
        doc.apply(&mut editor);
        assert_eq!(editor.emitters()[0].capacity(), 64);

        let saved = EffectDocument::from_editor(&editor);
        assert_eq!(saved.emitters[0].capacity, 64);
        assert_eq!(saved, doc);
    }

    #[test]
    fn empty_and_malformed_input_are_errors() {
        assert!(matches!(EffectDocument::from_ron("  \n"), Err(DocumentError::Empty)));
        let err = EffectDocument::from_ron("(name: 3)").unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse effect"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("bevy_particle_editor_missing.fx.ron");
        let _ = fs::remove_file(&path);
        assert!(matches!(EffectDocument::load(&path), Err(DocumentError::Io(_))));
    }

    #[test]
    fn save_then_load_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "bevy_particle_editor_{}.fx.ron",
            std::process::id()
        ));
        let doc = EffectDocument::from_editor(&sample_editor());
        doc.save(&path).unwrap();
        let back = EffectDocument::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(back, doc);
    }
}
