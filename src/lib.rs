//! # Bevy Particle Editor
//!
//! An editor for 2D particle effects built on `bevy_emitter2d`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_particle_editor::ParticleEditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ParticleEditorPlugin::default())
//!         .run();
//! }
//! ```
//!
//! ## Controls
//!
//! - **N**: add an emitter under the cursor
//! - **Delete**: remove the selected emitter
//! - **Tab** / **Escape**: cycle / clear the selection
//! - **PageUp** / **PageDown**: move the selection in draw order
//! - **Ctrl+C** / **Ctrl+V**: copy settings / paste them onto the selection
//! - **Space**: restart all emitters together
//! - **P**: pause the selected emitter
//! - **Ctrl+S** / **Ctrl+O**: save / reload the effect file
//! - **G**, **F3**, **F4**: grid, debug overlay, origin cross
//! - Left drag moves emitters, right drag pans, scroll zooms.

pub mod constants;
pub mod document;
pub mod editor;
pub mod options;

// Re-export the main plugin
pub use editor::{ParticleEditor, ParticleEditorPlugin};

// Re-export document types and events
pub use document::{
    DocumentError, EffectDocument, EffectFile, EmitterDocument, LoadEffectEvent, SaveEffectEvent,
};

pub use options::EditorOptions;
