//! The emitter: owns a particle pool and steps it once per frame.

use bevy::prelude::*;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::config::{EmitterConfig, ParticleBlendMode};
use crate::container::rotate_point;
use crate::particle::{MIN_PARTICLE_LIFE, Particle, ParticlePool};
use crate::random::RandomSource;

/// Frame delta used when the caller passes exactly zero.
pub const FALLBACK_DT: f32 = 0.0016;

bitflags! {
    /// Behaviour switches of an emitter.
    #[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[serde(transparent)]
    pub struct EmitterFlags: u32 {
        /// Neither updated nor drawn.
        const DISABLED = 1 << 0;
        /// Drawn but frozen in time.
        const PAUSED = 1 << 1;
        /// Spawn anywhere inside the container instead of on its outline.
        const SPAWN_INSIDE = 1 << 2;
        /// Draw newest slots first.
        const REVERSE_DRAW_ORDER = 1 << 3;
        /// Keep origins emitter-relative and add the emitter position at draw
        /// time instead of at spawn.
        const WORLD_SPACE = 1 << 4;
        /// Untextured particles are triangles instead of squares.
        const DRAW_TRIANGLES = 1 << 5;
        /// Untextured particles are outlined instead of filled.
        const DRAW_OUTLINE = 1 << 6;
        /// Add the spawn angle to the rotation curve.
        const DIRECTIONAL_ROTATION = 1 << 7;
        /// Restart the emission cycle after the cooldown.
        const LOOP = 1 << 8;
        /// Treat the atlas frames as independent textures picked at spawn.
        const MULTITEXTURE = 1 << 9;
    }
}

/// Where an emitter is in its `delay → life → delay` cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitterPhase {
    /// Waiting out the initial delay.
    Waiting,
    /// Inside the emission window.
    Emitting,
    /// Emission window closed, waiting out the trailing delay.
    Cooldown,
    /// One-shot emitter that has run its full cycle, or an emitter with no life.
    Finished,
}

/// A particle emitter.
///
/// Configuration and settings are public so editors and loaders can change
/// them between frames. The pool capacity is fixed at construction.
#[derive(Component, Clone, Debug)]
pub struct Emitter {
    /// World position of the emitter.
    pub position: Vec2,
    pub config: EmitterConfig,
    /// Length of the emission window in seconds. `0` disables spawning.
    pub life: f32,
    /// Seconds to wait before the emission window opens, and again after it
    /// closes when looping.
    pub delay: f32,
    pub blend_mode: ParticleBlendMode,
    pub flags: EmitterFlags,

    pool: ParticlePool,
    /// Time since the last spawn event.
    spawn_timer: f32,
    /// Time since the emission cycle began.
    emit_timer: f32,
    /// Fractional particles owed by continuous emission.
    spawn_accumulator: f32,
    last_spawned: usize,
    total_spawned: u64,
}

impl Emitter {
    /// Emitter with a zeroed configuration and `capacity` free slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            position: Vec2::ZERO,
            config: EmitterConfig::default(),
            life: 0.0,
            delay: 0.0,
            blend_mode: ParticleBlendMode::default(),
            flags: EmitterFlags::empty(),
            pool: ParticlePool::with_capacity(capacity),
            spawn_timer: 0.0,
            emit_timer: 0.0,
            spawn_accumulator: 0.0,
            last_spawned: 0,
            total_spawned: 0,
        }
    }

    pub fn with_config(mut self, config: EmitterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_life(mut self, life: f32) -> Self {
        self.life = life;
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_flags(mut self, flags: EmitterFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_blend_mode(mut self, blend_mode: ParticleBlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn alive(&self) -> usize {
        self.pool.alive()
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    pub fn emit_timer(&self) -> f32 {
        self.emit_timer
    }

    /// Particles spawned by the most recent [`Emitter::update`].
    pub fn last_spawned(&self) -> usize {
        self.last_spawned
    }

    /// Particles spawned since construction or the last restart.
    pub fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    pub fn is_running(&self) -> bool {
        !self
            .flags
            .intersects(EmitterFlags::DISABLED | EmitterFlags::PAUSED)
    }

    pub fn phase(&self) -> EmitterPhase {
        let t = self.emit_timer;
        if self.life <= 0.0 {
            EmitterPhase::Finished
        } else if t <= self.delay {
            EmitterPhase::Waiting
        } else if t < self.delay + self.life {
            EmitterPhase::Emitting
        } else if t < 2.0 * self.delay + self.life {
            EmitterPhase::Cooldown
        } else {
            EmitterPhase::Finished
        }
    }

    /// Free every particle and rewind the emission cycle.
    pub fn restart(&mut self) {
        self.pool.clear();
        self.spawn_timer = 0.0;
        self.emit_timer = 0.0;
        self.spawn_accumulator = 0.0;
        self.last_spawned = 0;
        self.total_spawned = 0;
    }

    /// Copy configuration and settings from `other`, keeping this emitter's
    /// pool allocation, and restart.
    pub fn copy_settings_from(&mut self, other: &Emitter) {
        self.position = other.position;
        self.config = other.config.clone();
        self.life = other.life;
        self.delay = other.delay;
        self.blend_mode = other.blend_mode;
        self.flags = other.flags;
        self.restart();
    }

    /// A new emitter with the same settings and an empty pool of `capacity`.
    pub fn resized(&self, capacity: usize) -> Self {
        let mut emitter = Self::new(capacity);
        emitter.copy_settings_from(self);
        emitter
    }

    /// Step the simulation by `dt` seconds. Returns how many particles were
    /// integrated; disabled or paused emitters do nothing and return 0.
    pub fn update(&mut self, dt: f32, rng: &mut impl RandomSource) -> usize {
        self.last_spawned = 0;
        if !self.is_running() {
            return 0;
        }

        let dt = if dt == 0.0 { FALLBACK_DT } else { dt };

        self.spawn(dt, rng);

        let config = &self.config;
        let forces: Vec2 = config.forces.iter().map(|f| f.vector()).sum();
        let updated = self
            .pool
            .step(|p| integrate(p, config, forces, dt));

        self.advance_cycle(dt);
        updated
    }

    fn spawn(&mut self, dt: f32, rng: &mut impl RandomSource) {
        let alive = self.pool.alive();
        let emission = self.config.emission as usize;
        let window_open =
            self.emit_timer > self.delay && self.emit_timer < self.delay + self.life;

        if alive >= emission || self.life == 0.0 || !window_open {
            return;
        }

        let pulses = self.config.pulses as usize;
        let (target, mut tick) = if pulses == 0 {
            self.spawn_accumulator += emission as f32 / self.life * dt;
            (self.spawn_accumulator.floor() as usize, dt)
        } else {
            (emission / pulses, self.life / pulses as f32)
        };

        // An empty pool spawns right away instead of waiting a full tick.
        if alive == 0 {
            tick = self.spawn_timer;
        }

        let rate = target.min(emission - alive);

        if self.spawn_timer >= tick {
            self.spawn_timer -= tick;
            if pulses == 0 {
                self.spawn_accumulator -= target as f32;
            }

            let (config, flags, position) = (&self.config, self.flags, self.position);
            let spawned = self
                .pool
                .spawn_into_dead(rate, || spawn_particle(config, flags, position, rng));
            self.last_spawned = spawned;
            self.total_spawned += spawned as u64;
        }
        self.spawn_timer += dt;
    }

    fn advance_cycle(&mut self, dt: f32) {
        let cycle_end = 2.0 * self.delay + self.life;

        if self.flags.contains(EmitterFlags::LOOP) {
            if self.emit_timer > cycle_end {
                debug!("emitter at {} restarting its emission cycle", self.position);
                self.emit_timer = self.delay;
                self.spawn_accumulator = 0.0;
            } else {
                self.emit_timer += dt;
            }
        } else if self.emit_timer < cycle_end {
            self.emit_timer += dt;
        }
    }

    /// Sample a fresh particle from this emitter's configuration.
    pub fn generate_particle(&self, rng: &mut impl RandomSource) -> Particle {
        spawn_particle(&self.config, self.flags, self.position, rng)
    }
}

fn spawn_particle(
    config: &EmitterConfig,
    flags: EmitterFlags,
    position: Vec2,
    rng: &mut impl RandomSource,
) -> Particle {
    let offset = Vec2::new(config.offset.sample(rng), config.offset.sample(rng));
    let angle = config.angle.sample(rng);

    let texture_index = if config.atlas.is_multi_frame() {
        rng.index(config.atlas.frame_count() as usize)
    } else {
        0
    };

    let spawn = config
        .container
        .sample(angle, flags.contains(EmitterFlags::SPAWN_INSIDE), rng);

    let mut origin = spawn.origin + offset;
    if !flags.contains(EmitterFlags::WORLD_SPACE) {
        origin += position;
    }

    let size = config.size.sample(rng);
    let speed = config.speed.sample(rng);
    let life = config.age.sample(rng).max(MIN_PARTICLE_LIFE);

    Particle {
        origin,
        direction: spawn.direction,
        position: origin,
        size,
        speed,
        time: 0.0,
        life,
        angle: spawn.angle,
        texture_index,
    }
}

/// Advance one particle by `dt`.
///
/// Tangential acceleration rotates the linear step's end point a quarter turn
/// around itself, away from or toward the origin depending on its sign. It
/// approximates orbiting and ignores the distance to the origin.
fn integrate(p: &mut Particle, config: &EmitterConfig, forces: Vec2, dt: f32) {
    let easing = config.easing;

    let speed = (p.speed + config.acc.eval(easing, p.time, p.life)) * dt;
    let next = p.position + p.direction * speed;

    let tacc = config.tacc.eval(easing, p.time, p.life) * dt;
    p.position = if tacc != 0.0 {
        let (normal, angle) = if tacc < 0.0 {
            (p.origin - next, -90.0)
        } else {
            (next - p.origin, 90.0)
        };
        let target = next + normal.normalize_or_zero() * tacc;
        rotate_point(next, target, angle)
    } else {
        next
    };

    p.position += forces * dt;
    p.time += dt;
}
