//! Declarative emitter configuration.
//!
//! Everything here is plain data: serializable (serde) and reflectable so an
//! editor or loader can read and write it between frames. The simulation
//! only reads it.

use bevy::color::palettes::basic::RED;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::random::RandomSource;

// ---------------------------------------------------------------------------
// Scalar ranges and curves
// ---------------------------------------------------------------------------

/// A `{min, max}` pair sampled uniformly at spawn time. `min <= max` is not
/// enforced.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn constant(value: f32) -> Self {
        Self { min: value, max: value }
    }

    pub fn sample(&self, rng: &mut impl RandomSource) -> f32 {
        rng.range(self.min, self.max)
    }
}

/// A `{start, end}` pair eased over a particle's lifetime.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct Ramp {
    pub start: f32,
    pub end: f32,
}

impl Ramp {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub const fn constant(value: f32) -> Self {
        Self { start: value, end: value }
    }

    /// Value of the ramp for a particle that is `time` seconds into a `life`
    /// second lifespan.
    pub fn eval(&self, easing: Easing, time: f32, life: f32) -> f32 {
        easing.ease(time, self.start, self.end - self.start, life)
    }
}

// ---------------------------------------------------------------------------
// Forces
// ---------------------------------------------------------------------------

/// Constant force applied to every particle of an emitter.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct Force {
    /// Direction in degrees.
    pub direction: f32,
    /// Signed strength in units per second.
    pub strength: f32,
}

impl Force {
    pub const fn new(direction: f32, strength: f32) -> Self {
        Self { direction, strength }
    }

    pub fn vector(&self) -> Vec2 {
        Vec2::from_angle(self.direction.to_radians()) * self.strength
    }
}

// ---------------------------------------------------------------------------
// Texture atlas
// ---------------------------------------------------------------------------

/// Describes the (externally owned) texture an emitter draws with.
///
/// The texture itself is never touched here; only its pixel dimensions and
/// frame grid are read.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct Atlas {
    /// Pixel size of the bound texture, `None` when drawing untextured shapes.
    pub texture_size: Option<UVec2>,
    /// Horizontal frame count.
    pub hframes: u32,
    /// Vertical frame count.
    pub vframes: u32,
    /// How many times the animation plays over a particle's life.
    pub loops: u32,
}

impl Atlas {
    pub fn is_textured(&self) -> bool {
        self.texture_size.is_some()
    }

    pub fn frame_count(&self) -> u32 {
        self.hframes.saturating_mul(self.vframes)
    }

    /// Whether the texture is split into more than one frame.
    pub fn is_multi_frame(&self) -> bool {
        self.frame_count() > 1
    }

    /// Pixel size of one frame (the whole texture for single-frame atlases).
    pub fn frame_size(&self) -> Vec2 {
        let size = self.texture_size.unwrap_or_default().as_vec2();
        if self.is_multi_frame() {
            size / Vec2::new(self.hframes as f32, self.vframes as f32)
        } else {
            size
        }
    }

    /// Source rectangle of `frame`, laid out row-major.
    pub fn frame_rect(&self, frame: u32) -> Rect {
        let size = self.frame_size();
        if !self.is_multi_frame() {
            return Rect::from_corners(Vec2::ZERO, size);
        }
        let column = frame % self.hframes;
        let row = (frame / self.hframes) % self.vframes;
        let min = Vec2::new(column as f32 * size.x, row as f32 * size.y);
        Rect::from_corners(min, min + size)
    }
}

// ---------------------------------------------------------------------------
// Color gradient
// ---------------------------------------------------------------------------

/// Colors spread evenly over a particle's lifetime.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Reflect)]
pub struct Gradient {
    pub colors: Vec<Srgba>,
}

impl Gradient {
    /// Returned when a gradient has no colors at all.
    pub const MISSING: Srgba = RED;

    pub fn new(colors: impl IntoIterator<Item = Srgba>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
        }
    }

    pub fn constant(color: Srgba) -> Self {
        Self { colors: vec![color] }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Container shapes
// ---------------------------------------------------------------------------

/// Shape particles are spawned from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub enum Container {
    #[default]
    Point,
    Rect {
        width: f32,
        height: f32,
    },
    Circle {
        radius: f32,
    },
    /// Radii are swapped at sampling time when `inner > outer`.
    Ring {
        inner: f32,
        outer: f32,
    },
}

impl Container {
    /// One of each shape with starter dimensions.
    pub const ALL: [Self; 4] = [
        Self::Point,
        Self::Rect {
            width: 64.0,
            height: 64.0,
        },
        Self::Circle { radius: 32.0 },
        Self::Ring {
            inner: 16.0,
            outer: 32.0,
        },
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Rect { .. } => "Rectangle",
            Self::Circle { .. } => "Circle",
            Self::Ring { .. } => "Ring",
        }
    }

    /// The two shape parameters as stored by editors (unused slots are 0).
    pub fn options(&self) -> (f32, f32) {
        match *self {
            Self::Point => (0.0, 0.0),
            Self::Rect { width, height } => (width, height),
            Self::Circle { radius } => (radius, 0.0),
            Self::Ring { inner, outer } => (inner, outer),
        }
    }
}

// ---------------------------------------------------------------------------
// Blending
// ---------------------------------------------------------------------------

/// Blend mode the renderer should use for an emitter's particles.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum ParticleBlendMode {
    #[default]
    Alpha,
    Additive,
    Multiplied,
    AddColors,
    SubtractColors,
    AlphaPremultiply,
}

impl ParticleBlendMode {
    pub const ALL: [Self; 6] = [
        Self::Alpha,
        Self::Additive,
        Self::Multiplied,
        Self::AddColors,
        Self::SubtractColors,
        Self::AlphaPremultiply,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Alpha => "Alpha",
            Self::Additive => "Additive",
            Self::Multiplied => "Multiplied",
            Self::AddColors => "Add Colors",
            Self::SubtractColors => "Subtract Colors",
            Self::AlphaPremultiply => "Alpha Premultiply",
        }
    }
}

// ---------------------------------------------------------------------------
// Emitter configuration
// ---------------------------------------------------------------------------

/// Full particle configuration of one emitter. `Default` is the zeroed
/// configuration a fresh emitter starts with.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Reflect)]
pub struct EmitterConfig {
    /// Maximum number of live particles.
    pub emission: u32,
    /// `0` spreads spawning over the emitter life, otherwise the burst count.
    pub pulses: u32,

    /// Initial particle size.
    pub size: ValueRange,
    /// Spawn angle in degrees.
    pub angle: ValueRange,
    /// Particle lifespan in seconds.
    pub age: ValueRange,
    /// Per-axis jitter added to the spawn origin.
    pub offset: ValueRange,
    /// Initial speed.
    pub speed: ValueRange,

    /// Multiplier applied to the initial size.
    pub scale: Ramp,
    /// Linear acceleration added to the speed.
    pub acc: Ramp,
    /// Tangential acceleration.
    pub tacc: Ramp,
    /// Rotation in degrees.
    pub rotation: Ramp,

    pub forces: Vec<Force>,
    pub atlas: Atlas,
    pub gradient: Gradient,
    pub easing: Easing,
    pub container: Container,
}
