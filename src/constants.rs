//! Centralized constants for the particle editor.

use bevy::prelude::*;

/// Hard limits of the editor.
pub mod limits {
    /// Emitters in one effect.
    pub const MAX_EMITTERS: usize = 8;
    /// Particle slots per emitter.
    pub const MAX_PARTICLES: usize = 2000;
    /// Colors in one gradient.
    pub const MAX_COLORS: usize = 16;
    /// Forces per emitter.
    pub const MAX_FORCES: usize = 4;
    /// Effect names are cut to one less than this many characters.
    pub const MAX_NAME_LEN: usize = 32;
}

/// Default colors used when no options file exists.
pub mod colors {
    use super::*;

    pub const BACKGROUND: Color = Color::srgb(0.08, 0.08, 0.1);
    pub const FOREGROUND: Color = Color::srgb(0.9, 0.9, 0.9);
    pub const GRID: Color = Color::srgba(0.4, 0.4, 0.45, 0.35);
    pub const DEBUG: Color = Color::srgb(0.2, 0.9, 0.4);
}

/// Starting values for new emitters.
pub mod emitter_defaults {
    pub const EMISSION: u32 = 10;
    pub const SIZE: (f32, f32) = (1.0, 2.0);
    pub const AGE: f32 = 4.0;
    pub const SPEED: f32 = 80.0;
    pub const ANGLE: (f32, f32) = (0.0, 360.0);
    pub const LIFE: f32 = 4.0;

    /// Saturation and value of the random starting color.
    pub const COLOR_SATURATION: f32 = 0.4;
    pub const COLOR_VALUE: f32 = 0.89;
}

/// Golden ratio conjugate, used to spread random hues.
pub const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_034;

/// Default grid spacing in world units.
pub const GRID_SPACING: f32 = 32.0;

/// Cursor distance within which a click picks an emitter.
pub const PICK_RADIUS: f32 = 12.0;

/// Extension of saved effect documents.
pub const EFFECT_EXTENSION: &str = "fx.ron";

/// Document used by save/load shortcuts when no file is open.
pub const DEFAULT_EFFECT_PATH: &str = "effect.fx.ron";
