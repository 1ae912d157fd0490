//! Built-in emitter presets.

use bevy::prelude::*;

use crate::config::{
    Container, EmitterConfig, Force, Gradient, ParticleBlendMode, Ramp, ValueRange,
};
use crate::easing::Easing;
use crate::emitter::{Emitter, EmitterFlags};

/// Return the built-in presets as `(name, emitter)` pairs, each with a pool
/// of `capacity` slots.
pub fn default_presets(capacity: usize) -> Vec<(&'static str, Emitter)> {
    vec![
        ("Fire", fire(capacity)),
        ("Smoke", smoke(capacity)),
        ("Sparks", sparks(capacity)),
        ("Ring Burst", ring_burst(capacity)),
        ("Snow", snow(capacity)),
        ("Orbit", orbit(capacity)),
    ]
}

/// Look up a built-in preset by name, ignoring case.
pub fn preset(name: &str, capacity: usize) -> Option<Emitter> {
    default_presets(capacity)
        .into_iter()
        .find(|(preset_name, _)| preset_name.eq_ignore_ascii_case(name))
        .map(|(_, emitter)| emitter)
}

/// Rising additive flames from a small disc.
fn fire(capacity: usize) -> Emitter {
    Emitter::new(capacity)
        .with_config(EmitterConfig {
            emission: 120,
            size: ValueRange::new(8.0, 14.0),
            angle: ValueRange::new(70.0, 110.0),
            age: ValueRange::new(0.8, 1.4),
            speed: ValueRange::new(40.0, 70.0),
            scale: Ramp::new(1.0, 0.2),
            acc: Ramp::new(0.0, 30.0),
            gradient: Gradient::new([
                Srgba::new(1.0, 0.95, 0.6, 1.0),
                Srgba::new(1.0, 0.55, 0.1, 0.9),
                Srgba::new(0.8, 0.1, 0.0, 0.0),
            ]),
            easing: Easing::QuadOut,
            container: Container::Circle { radius: 8.0 },
            ..default()
        })
        .with_life(4.0)
        .with_blend_mode(ParticleBlendMode::Additive)
        .with_flags(EmitterFlags::SPAWN_INSIDE | EmitterFlags::LOOP)
}

/// Slow grey puffs that grow and drift with the wind.
fn smoke(capacity: usize) -> Emitter {
    Emitter::new(capacity)
        .with_config(EmitterConfig {
            emission: 40,
            size: ValueRange::new(10.0, 18.0),
            angle: ValueRange::new(80.0, 100.0),
            age: ValueRange::new(2.0, 3.5),
            speed: ValueRange::new(20.0, 35.0),
            scale: Ramp::new(1.0, 3.0),
            forces: vec![Force::new(0.0, 10.0)],
            gradient: Gradient::new([
                Srgba::new(0.5, 0.5, 0.5, 0.5),
                Srgba::new(0.7, 0.7, 0.7, 0.0),
            ]),
            easing: Easing::SineOut,
            container: Container::Rect {
                width: 30.0,
                height: 6.0,
            },
            ..default()
        })
        .with_life(4.0)
        .with_flags(EmitterFlags::SPAWN_INSIDE | EmitterFlags::LOOP)
}

/// Periodic bursts of fast triangles pulled down by gravity.
fn sparks(capacity: usize) -> Emitter {
    Emitter::new(capacity)
        .with_config(EmitterConfig {
            emission: 40,
            pulses: 1,
            size: ValueRange::new(2.0, 3.0),
            angle: ValueRange::new(0.0, 360.0),
            age: ValueRange::new(0.4, 0.9),
            speed: ValueRange::new(120.0, 220.0),
            scale: Ramp::new(1.0, 0.0),
            acc: Ramp::new(0.0, -150.0),
            forces: vec![Force::new(270.0, 120.0)],
            gradient: Gradient::new([
                Srgba::WHITE,
                Srgba::new(1.0, 0.9, 0.3, 1.0),
                Srgba::new(1.0, 0.4, 0.0, 0.0),
            ]),
            easing: Easing::CubicOut,
            ..default()
        })
        .with_life(0.5)
        .with_delay(0.5)
        .with_blend_mode(ParticleBlendMode::Additive)
        .with_flags(EmitterFlags::DRAW_TRIANGLES | EmitterFlags::LOOP)
}

/// Outlined squares leaving both edges of a ring, spinning as they go.
fn ring_burst(capacity: usize) -> Emitter {
    Emitter::new(capacity)
        .with_config(EmitterConfig {
            emission: 72,
            pulses: 1,
            size: ValueRange::constant(6.0),
            angle: ValueRange::new(0.0, 360.0),
            age: ValueRange::constant(1.2),
            speed: ValueRange::constant(60.0),
            scale: Ramp::new(1.0, 0.5),
            rotation: Ramp::new(0.0, 180.0),
            gradient: Gradient::new([
                Srgba::new(0.4, 1.0, 1.0, 1.0),
                Srgba::new(0.1, 0.3, 1.0, 0.0),
            ]),
            easing: Easing::CubicOut,
            container: Container::Ring {
                inner: 20.0,
                outer: 40.0,
            },
            ..default()
        })
        .with_life(1.0)
        .with_delay(0.3)
        .with_flags(
            EmitterFlags::DRAW_OUTLINE | EmitterFlags::DIRECTIONAL_ROTATION | EmitterFlags::LOOP,
        )
}

/// Wide band of flakes falling slowly and sideways.
fn snow(capacity: usize) -> Emitter {
    Emitter::new(capacity)
        .with_config(EmitterConfig {
            emission: 150,
            size: ValueRange::new(2.0, 4.0),
            angle: ValueRange::new(260.0, 280.0),
            age: ValueRange::new(6.0, 8.0),
            speed: ValueRange::new(20.0, 40.0),
            scale: Ramp::constant(1.0),
            forces: vec![Force::new(0.0, 8.0)],
            gradient: Gradient::new([
                Srgba::new(1.0, 1.0, 1.0, 0.9),
                Srgba::new(0.9, 0.95, 1.0, 0.0),
            ]),
            container: Container::Rect {
                width: 600.0,
                height: 10.0,
            },
            ..default()
        })
        .with_position(Vec2::new(0.0, 200.0))
        .with_life(8.0)
        .with_flags(EmitterFlags::SPAWN_INSIDE | EmitterFlags::LOOP)
}

/// Particles swirling out of a circle under tangential acceleration.
fn orbit(capacity: usize) -> Emitter {
    Emitter::new(capacity)
        .with_config(EmitterConfig {
            emission: 60,
            size: ValueRange::new(3.0, 5.0),
            angle: ValueRange::new(0.0, 360.0),
            age: ValueRange::constant(3.0),
            speed: ValueRange::constant(10.0),
            scale: Ramp::constant(1.0),
            tacc: Ramp::constant(120.0),
            rotation: Ramp::new(0.0, 360.0),
            gradient: Gradient::new([
                Srgba::new(1.0, 0.3, 0.9, 1.0),
                Srgba::new(0.4, 0.1, 0.8, 0.0),
            ]),
            container: Container::Circle { radius: 30.0 },
            ..default()
        })
        .with_life(3.0)
        .with_flags(EmitterFlags::DIRECTIONAL_ROTATION | EmitterFlags::LOOP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_names_are_unique() {
        let presets = default_presets(16);
        let mut names: Vec<&str> = presets.iter().map(|(n, _)| *n).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), presets.len());
    }

    #[test]
    fn every_preset_emits_and_respects_its_budget() {
        let mut rng = fastrand::Rng::with_seed(21);
        for (name, mut emitter) in default_presets(2000) {
            let mut peak = 0;
            for _ in 0..300 {
                emitter.update(1.0 / 60.0, &mut rng);
                peak = peak.max(emitter.alive());
                assert!(emitter.alive() <= emitter.config.emission as usize, "{}", name);
            }
            assert!(peak > 0, "{} never emitted", name);

            let mut commands = Vec::new();
            let stats = emitter.draw(None, &mut commands);
            assert_eq!(stats.drawn, commands.len(), "{}", name);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let fire = preset("fire", 8).unwrap();
        assert_eq!(fire.capacity(), 8);
        assert!(preset("ring burst", 8).is_some());
        assert!(preset("volcano", 8).is_none());
    }
}
