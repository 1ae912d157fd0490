//! Per-particle properties derived from age: color, size, rotation and
//! animation frame.

use bevy::prelude::*;

use crate::config::{Atlas, EmitterConfig, Gradient};
use crate::easing::Easing;
use crate::emitter::EmitterFlags;
use crate::particle::Particle;

/// Gradient color for a particle `time` seconds into a `life` second span.
///
/// The colors are spread evenly: with `n` colors, each of the `n - 1`
/// segments lasts `life / (n - 1)` seconds and is eased with `easing`.
pub fn color_at(gradient: &Gradient, easing: Easing, time: f32, life: f32) -> Srgba {
    let colors = &gradient.colors;
    match colors.len() {
        0 => return Gradient::MISSING,
        1 => return colors[0],
        _ => {}
    }
    if life <= 0.0 {
        return colors[0];
    }

    let segments = (colors.len() - 1) as f32;
    let span = life / segments;
    let index = ((time * segments / life).floor().max(0.0) as usize).min(colors.len() - 2);
    let local = (time - index as f32 * span).clamp(0.0, span);

    let (a, b) = (colors[index], colors[index + 1]);
    let channel = |from: f32, to: f32| easing.ease(local, from, to - from, span).clamp(0.0, 1.0);

    let alpha = if a.alpha != b.alpha {
        channel(a.alpha, b.alpha)
    } else {
        b.alpha
    };

    Srgba::new(
        channel(a.red, b.red),
        channel(a.green, b.green),
        channel(a.blue, b.blue),
        alpha,
    )
}

/// Current size: the spawn size scaled by the scale ramp.
pub fn size_at(config: &EmitterConfig, particle: &Particle) -> f32 {
    particle.size * config.scale.eval(config.easing, particle.time, particle.life)
}

/// Current rotation in degrees.
pub fn rotation_at(config: &EmitterConfig, flags: EmitterFlags, particle: &Particle) -> f32 {
    let mut start = config.rotation.start;
    if flags.contains(EmitterFlags::DIRECTIONAL_ROTATION) {
        start += particle.angle;
    }
    config.easing.ease(
        particle.time,
        start,
        config.rotation.end - config.rotation.start,
        particle.life,
    )
}

/// Atlas frame to draw.
///
/// Multitexture emitters keep the frame picked at spawn. Otherwise the
/// frame runs from the first to the last over the particle life, `loops`
/// times.
pub fn animation_frame(
    atlas: &Atlas,
    easing: Easing,
    particle: &Particle,
    multitexture: bool,
) -> u32 {
    if !atlas.is_multi_frame() {
        return 0;
    }
    if multitexture {
        return particle.texture_index as u32;
    }

    let last = (atlas.frame_count().saturating_mul(atlas.loops.max(1)) - 1) as f32;
    easing
        .ease(particle.time, 0.0, last, particle.life)
        .clamp(0.0, last) as u32
}

#[cfg(test)]
mod tests {
    use bevy::color::palettes::basic::{BLUE, LIME, RED};

    use super::*;
    use crate::config::Ramp;

    fn close(a: Srgba, b: Srgba) -> bool {
        (a.red - b.red).abs() < 1e-4
            && (a.green - b.green).abs() < 1e-4
            && (a.blue - b.blue).abs() < 1e-4
            && (a.alpha - b.alpha).abs() < 1e-4
    }

    #[test]
    fn empty_gradient_is_red_sentinel() {
        assert_eq!(color_at(&Gradient::default(), Easing::Linear, 1.0, 2.0), RED);
    }

    #[test]
    fn single_color_is_constant() {
        let g = Gradient::constant(BLUE);
        assert_eq!(color_at(&g, Easing::QuadOut, 0.3, 2.0), BLUE);
    }

    #[test]
    fn two_colors_blend_at_half_life() {
        let g = Gradient::new([RED, BLUE]);
        let mid = color_at(&g, Easing::Linear, 1.0, 2.0);
        assert!(close(mid, Srgba::new(0.5, 0.0, 0.5, 1.0)), "{:?}", mid);
    }

    #[test]
    fn endpoints_hit_first_and_last_colors() {
        let g = Gradient::new([RED, LIME, BLUE]);
        assert!(close(color_at(&g, Easing::Linear, 0.0, 3.0), RED));
        assert!(close(color_at(&g, Easing::Linear, 1.5, 3.0), LIME));
        assert!(close(color_at(&g, Easing::Linear, 3.0, 3.0), BLUE));
        // Past the end stays on the last color.
        assert!(close(color_at(&g, Easing::Linear, 4.0, 3.0), BLUE));
    }

    #[test]
    fn alpha_fades_only_when_it_differs() {
        let g = Gradient::new([Srgba::new(1.0, 1.0, 1.0, 1.0), Srgba::new(1.0, 1.0, 1.0, 0.0)]);
        let c = color_at(&g, Easing::Linear, 0.5, 1.0);
        assert!((c.alpha - 0.5).abs() < 1e-4);

        let g = Gradient::new([Srgba::new(0.0, 0.0, 0.0, 0.3), Srgba::new(1.0, 1.0, 1.0, 0.3)]);
        assert_eq!(color_at(&g, Easing::BackOut, 0.2, 1.0).alpha, 0.3);
    }

    #[test]
    fn overshooting_easings_are_clamped() {
        let g = Gradient::new([Srgba::BLACK, Srgba::WHITE]);
        for i in 0..=20 {
            let c = color_at(&g, Easing::ElasticOut, i as f32 * 0.05, 1.0);
            assert!((0.0..=1.0).contains(&c.red));
        }
    }

    #[test]
    fn size_follows_scale_ramp() {
        let config = EmitterConfig {
            scale: Ramp::new(1.0, 3.0),
            ..default()
        };
        let p = Particle {
            size: 4.0,
            time: 1.0,
            life: 2.0,
            ..default()
        };
        assert!((size_at(&config, &p) - 8.0).abs() < 1e-5);
    }

    #[test]
    fn directional_rotation_adds_spawn_angle() {
        let config = EmitterConfig {
            rotation: Ramp::new(0.0, 90.0),
            ..default()
        };
        let p = Particle {
            time: 1.0,
            life: 2.0,
            angle: 30.0,
            ..default()
        };
        assert!((rotation_at(&config, EmitterFlags::empty(), &p) - 45.0).abs() < 1e-4);
        assert!((rotation_at(&config, EmitterFlags::DIRECTIONAL_ROTATION, &p) - 75.0).abs() < 1e-4);
    }

    #[test]
    fn animation_runs_across_frames_and_loops() {
        let atlas = Atlas {
            texture_size: Some(UVec2::new(64, 16)),
            hframes: 4,
            vframes: 1,
            loops: 2,
        };
        let at = |time: f32| {
            let p = Particle {
                time,
                life: 1.0,
                ..default()
            };
            animation_frame(&atlas, Easing::Linear, &p, false)
        };
        assert_eq!(at(0.0), 0);
        assert_eq!(at(0.5), 3);
        assert_eq!(at(1.0), 7);
        assert_eq!(at(2.0), 7);
    }

    #[test]
    fn oversized_animation_grid_saturates() {
        let atlas = Atlas {
            texture_size: Some(UVec2::new(64, 16)),
            hframes: u32::MAX,
            vframes: 2,
            loops: 3,
        };
        let p = Particle {
            time: 1.0,
            life: 1.0,
            ..default()
        };
        assert!(animation_frame(&atlas, Easing::Linear, &p, false) > 0);
    }

    #[test]
    fn multitexture_keeps_spawn_frame() {
        let atlas = Atlas {
            texture_size: Some(UVec2::new(64, 16)),
            hframes: 4,
            vframes: 1,
            loops: 1,
        };
        let p = Particle {
            time: 0.9,
            life: 1.0,
            texture_index: 2,
            ..default()
        };
        assert_eq!(animation_frame(&atlas, Easing::Linear, &p, true), 2);
        assert_eq!(animation_frame(&Atlas::default(), Easing::Linear, &p, true), 0);
    }
}
