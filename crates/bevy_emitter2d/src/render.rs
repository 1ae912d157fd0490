//! Bevy adapter: systems that step and draw `Emitter` components, and a
//! gizmo-backed renderer.

use bevy::prelude::*;

use crate::config::Container;
use crate::draw::{DrawCommand, DrawShape, DrawStats, ParticleRenderer};
use crate::emitter::Emitter;
use crate::random::ParticleRng;

/// Visible world rectangle used to cull particles. `None` draws everything.
#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct ParticleCulling(pub Option<Rect>);

/// Counters from the most recent frame.
#[derive(Resource, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParticleStats {
    pub updated: usize,
    pub drawn: usize,
    pub pixels: u64,
}

impl ParticleStats {
    pub fn record_draw(&mut self, stats: DrawStats) {
        self.drawn += stats.drawn;
        self.pixels += stats.pixels;
    }
}

/// Draws particles as gizmo line strips.
///
/// Gizmos cannot fill, so filled footprints get their diagonals drawn as
/// well. Texture regions are ignored.
pub struct GizmoRenderer<'a, 'w, 's> {
    pub gizmos: &'a mut Gizmos<'w, 's>,
}

impl<'a, 'w, 's> GizmoRenderer<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>) -> Self {
        Self { gizmos }
    }
}

impl ParticleRenderer for GizmoRenderer<'_, '_, '_> {
    fn submit(&mut self, command: DrawCommand) {
        let color = Color::from(command.color);
        let points = command.points();
        self.gizmos
            .linestrip_2d(points.iter().copied().chain([points[0]]), color);

        if command.outline {
            return;
        }
        match command.shape {
            DrawShape::Quad => {
                self.gizmos.line_2d(points[0], points[2], color);
                self.gizmos.line_2d(points[1], points[3], color);
            }
            DrawShape::Triangle => {
                let base = (points[1] + points[2]) / 2.0;
                self.gizmos.line_2d(points[0], base, color);
            }
        }
    }
}

/// Outline of the emitter's spawn container, centered on the emitter.
pub fn draw_container_outline(gizmos: &mut Gizmos, emitter: &Emitter, color: Color) {
    let center = emitter.position;
    match emitter.config.container {
        Container::Point => {
            gizmos.line_2d(center - Vec2::X * 4.0, center + Vec2::X * 4.0, color);
            gizmos.line_2d(center - Vec2::Y * 4.0, center + Vec2::Y * 4.0, color);
        }
        Container::Rect { width, height } => {
            let half = Vec2::new(width, height) / 2.0;
            gizmos.linestrip_2d(
                [
                    center + Vec2::new(-half.x, -half.y),
                    center + Vec2::new(half.x, -half.y),
                    center + Vec2::new(half.x, half.y),
                    center + Vec2::new(-half.x, half.y),
                    center + Vec2::new(-half.x, -half.y),
                ],
                color,
            );
        }
        Container::Circle { radius } => {
            gizmos.circle_2d(Isometry2d::from_translation(center), radius, color);
        }
        Container::Ring { inner, outer } => {
            gizmos.circle_2d(Isometry2d::from_translation(center), inner, color);
            gizmos.circle_2d(Isometry2d::from_translation(center), outer, color);
        }
    }
}

/// Copy entity translations into emitter positions.
pub fn sync_emitter_transforms(mut query: Query<(&Transform, &mut Emitter), Changed<Transform>>) {
    for (transform, mut emitter) in &mut query {
        emitter.position = transform.translation.truncate();
    }
}

pub fn update_emitters(
    time: Res<Time>,
    mut rng: ResMut<ParticleRng>,
    mut stats: ResMut<ParticleStats>,
    mut query: Query<&mut Emitter>,
) {
    let dt = time.delta_secs();
    stats.updated = 0;
    for mut emitter in &mut query {
        stats.updated += emitter.update(dt, &mut rng.0);
    }
}

pub fn draw_emitters(
    mut gizmos: Gizmos,
    culling: Res<ParticleCulling>,
    mut stats: ResMut<ParticleStats>,
    query: Query<&Emitter>,
) {
    stats.drawn = 0;
    stats.pixels = 0;

    let mut renderer = GizmoRenderer::new(&mut gizmos);
    for emitter in &query {
        let drawn = emitter.draw(culling.0, &mut renderer);
        stats.record_draw(drawn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmitterConfig, ValueRange};

    fn fountain() -> Emitter {
        Emitter::new(32)
            .with_config(EmitterConfig {
                emission: 8,
                pulses: 1,
                age: ValueRange::constant(5.0),
                size: ValueRange::constant(1.0),
                ..default()
            })
            .with_life(2.0)
    }

    #[test]
    fn update_system_steps_every_emitter() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .insert_resource(ParticleRng::with_seed(3))
            .init_resource::<ParticleStats>()
            .add_systems(Update, (sync_emitter_transforms, update_emitters).chain());

        let entity = app
            .world_mut()
            .spawn((fountain(), Transform::from_xyz(40.0, -8.0, 0.0)))
            .id();
        app.world_mut().spawn(fountain());

        app.update();
        app.update();

        let emitter = app.world().get::<Emitter>(entity).unwrap();
        assert_eq!(emitter.position, Vec2::new(40.0, -8.0));
        assert_eq!(emitter.alive(), 8);
        assert_eq!(app.world().resource::<ParticleStats>().updated, 16);
    }

    #[test]
    fn stats_record_draws() {
        let mut stats = ParticleStats::default();
        stats.record_draw(DrawStats { drawn: 3, pixels: 30 });
        stats.record_draw(DrawStats { drawn: 1, pixels: 2 });
        assert_eq!(stats.drawn, 4);
        assert_eq!(stats.pixels, 32);
    }
}
