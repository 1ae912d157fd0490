//! Draw-data builder.
//!
//! Turns the live particles of an emitter into renderer-agnostic draw
//! commands. Rasterization is left to a [`ParticleRenderer`].

use bevy::prelude::*;

use crate::config::ParticleBlendMode;
use crate::container::rotate_point;
use crate::emitter::{Emitter, EmitterFlags};
use crate::interpolate::{animation_frame, color_at, rotation_at, size_at};
use crate::particle::Particle;

const TRIANGLE_AREA: f32 = 0.433_012_7; // sqrt(3) / 4

/// Footprint of a draw command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawShape {
    /// Four corners, textured when the command carries a source rect.
    Quad,
    /// Three corners; the fourth corner slot is unused.
    Triangle,
}

/// One particle, ready for a renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub shape: DrawShape,
    /// Rotated corners in world space, counter-clockwise.
    pub corners: [Vec2; 4],
    pub center: Vec2,
    /// Unrotated extent of the footprint.
    pub size: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    pub color: Srgba,
    /// Stroke the footprint instead of filling it.
    pub outline: bool,
    /// Atlas region in texture pixels, `None` for untextured particles.
    pub source: Option<Rect>,
    pub blend_mode: ParticleBlendMode,
}

impl DrawCommand {
    /// Corners that make up the footprint (3 or 4).
    pub fn points(&self) -> &[Vec2] {
        match self.shape {
            DrawShape::Quad => &self.corners,
            DrawShape::Triangle => &self.corners[..3],
        }
    }
}

/// Consumer of draw commands.
pub trait ParticleRenderer {
    fn submit(&mut self, command: DrawCommand);
}

impl ParticleRenderer for Vec<DrawCommand> {
    fn submit(&mut self, command: DrawCommand) {
        self.push(command);
    }
}

/// Diagnostics of one draw pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Particles submitted to the renderer.
    pub drawn: usize,
    /// Approximate pixels covered.
    pub pixels: u64,
}

impl std::ops::AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: Self) {
        self.drawn += rhs.drawn;
        self.pixels += rhs.pixels;
    }
}

impl Emitter {
    /// Submit every visible live particle to `renderer`.
    ///
    /// A particle is visible when any corner of its footprint lies inside
    /// `cull`; with no culling rectangle everything is visible. Disabled or
    /// empty emitters draw nothing.
    pub fn draw(&self, cull: Option<Rect>, renderer: &mut impl ParticleRenderer) -> DrawStats {
        let mut stats = DrawStats::default();
        if self.flags.contains(EmitterFlags::DISABLED) || self.pool().is_empty() {
            return stats;
        }

        let alive = self.pool().iter_alive();
        let ordered: Box<dyn Iterator<Item = &Particle>> =
            if self.flags.contains(EmitterFlags::REVERSE_DRAW_ORDER) {
                Box::new(alive.rev())
            } else {
                Box::new(alive)
            };

        for particle in ordered {
            let (command, pixels) = self.build_command(particle);
            if let Some(cull) = cull {
                if !command.points().iter().any(|c| cull.contains(*c)) {
                    continue;
                }
            }
            renderer.submit(command);
            stats.drawn += 1;
            stats.pixels += pixels as u64;
        }

        stats
    }

    fn build_command(&self, particle: &Particle) -> (DrawCommand, f32) {
        let config = &self.config;
        let flags = self.flags;

        let size = size_at(config, particle);
        let rotation = rotation_at(config, flags, particle);
        let color = color_at(&config.gradient, config.easing, particle.time, particle.life);
        let outline = flags.contains(EmitterFlags::DRAW_OUTLINE);

        let mut center = particle.position;
        if flags.contains(EmitterFlags::WORLD_SPACE) {
            center += self.position;
        }

        let atlas = &config.atlas;
        let (shape, extent, source, pixels) = if atlas.is_textured() {
            let extent = atlas.frame_size() * size;
            let frame = animation_frame(
                atlas,
                config.easing,
                particle,
                flags.contains(EmitterFlags::MULTITEXTURE),
            );
            let source = atlas.frame_rect(frame);
            (DrawShape::Quad, extent, Some(source), extent.x * extent.y)
        } else if flags.contains(EmitterFlags::DRAW_TRIANGLES) {
            let pixels = if outline {
                3.0 * size
            } else {
                size * size * TRIANGLE_AREA
            };
            (DrawShape::Triangle, Vec2::splat(size), None, pixels)
        } else {
            let pixels = if outline { 4.0 * size } else { size * size };
            (DrawShape::Quad, Vec2::splat(size), None, pixels)
        };

        let half = extent / 2.0;
        let local = match shape {
            DrawShape::Quad => [
                Vec2::new(-half.x, -half.y),
                Vec2::new(half.x, -half.y),
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
            ],
            DrawShape::Triangle => [
                Vec2::new(0.0, -half.y),
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
                Vec2::ZERO,
            ],
        };
        let corners = local.map(|c| rotate_point(center, center + c, rotation));

        let command = DrawCommand {
            shape,
            corners,
            center,
            size: extent,
            rotation,
            color,
            outline,
            source,
            blend_mode: self.blend_mode,
        };
        (command, pixels.abs())
    }
}
