use bevy::prelude::*;
use bevy_emitter2d::{GizmoRenderer, ParticleCulling, ParticleRng, draw_container_outline};

use super::state::ParticleEditor;
use crate::options::EditorOptions;

/// Length of the timer bars under the selected emitter
const TIMER_BAR_WIDTH: f32 = 48.0;
/// Grid lines are skipped past this many per axis
const MAX_GRID_LINES: usize = 400;

pub struct EditorOverlayPlugin;

impl Plugin for EditorOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                tick_editor,
                draw_grid,
                draw_editor_emitters,
                draw_debug_overlay,
                draw_placeholder,
            )
                .chain(),
        );
    }
}

fn tick_editor(time: Res<Time>, mut rng: ResMut<ParticleRng>, mut editor: ResMut<ParticleEditor>) {
    editor.update(time.delta_secs(), &mut rng.0);
}

/// World positions of the grid lines along one axis inside `[min, max]`.
pub fn grid_lines(min: f32, max: f32, spacing: f32) -> Vec<f32> {
    if spacing <= 0.0 || max < min {
        return Vec::new();
    }
    let first = (min / spacing).ceil() as i64;
    let last = (max / spacing).floor() as i64;
    if last < first || (last - first) as usize >= MAX_GRID_LINES {
        return Vec::new();
    }
    (first..=last).map(|i| i as f32 * spacing).collect()
}

fn draw_grid(mut gizmos: Gizmos, options: Res<EditorOptions>, culling: Res<ParticleCulling>) {
    let Some(view) = culling.0 else {
        return;
    };
    if !options.show_grid {
        return;
    }

    let color = Color::from(options.grid_color);
    for x in grid_lines(view.min.x, view.max.x, options.grid_spacing) {
        gizmos.line_2d(Vec2::new(x, view.min.y), Vec2::new(x, view.max.y), color);
    }
    for y in grid_lines(view.min.y, view.max.y, options.grid_spacing) {
        gizmos.line_2d(Vec2::new(view.min.x, y), Vec2::new(view.max.x, y), color);
    }
}

fn draw_editor_emitters(
    mut gizmos: Gizmos,
    culling: Res<ParticleCulling>,
    mut editor: ResMut<ParticleEditor>,
) {
    let mut renderer = GizmoRenderer::new(&mut gizmos);
    editor.draw(culling.0, &mut renderer);
}

/// Fraction of the way through a timer, for the overlay bars.
fn progress(value: f32, total: f32) -> f32 {
    if total <= 0.0 {
        0.0
    } else {
        (value / total).clamp(0.0, 1.0)
    }
}

/// Markers for every emitter, plus the container outline and the spawn and
/// cycle timers for the selected one.
fn draw_debug_overlay(mut gizmos: Gizmos, options: Res<EditorOptions>, editor: Res<ParticleEditor>) {
    if !options.show_debug {
        return;
    }

    let color = Color::from(options.debug_color);
    let dim = color.with_alpha(0.4);
    for (index, emitter) in editor.emitters().iter().enumerate() {
        let marker = if editor.active() == Some(index) { color } else { dim };
        gizmos.circle_2d(Isometry2d::from_translation(emitter.position), 4.0, marker);
    }

    let Some(emitter) = editor.active_emitter() else {
        return;
    };
    draw_container_outline(&mut gizmos, emitter, color);

    let cycle = 2.0 * emitter.delay + emitter.life;
    let tick = if emitter.config.pulses > 0 {
        emitter.life / emitter.config.pulses as f32
    } else {
        emitter.life
    };
    let bars = [
        progress(emitter.emit_timer(), cycle),
        progress(emitter.spawn_timer(), tick),
    ];
    let origin = emitter.position + Vec2::new(-TIMER_BAR_WIDTH / 2.0, -12.0);
    for (row, fraction) in bars.into_iter().enumerate() {
        let start = origin - Vec2::Y * (row as f32 * 4.0);
        gizmos.line_2d(start, start + Vec2::X * TIMER_BAR_WIDTH, dim);
        gizmos.line_2d(start, start + Vec2::X * TIMER_BAR_WIDTH * fraction, color);
    }
}

fn draw_placeholder(mut gizmos: Gizmos, options: Res<EditorOptions>) {
    if !options.show_placeholder {
        return;
    }
    let color = Color::from(options.foreground);
    gizmos.line_2d(Vec2::new(-16.0, 0.0), Vec2::new(16.0, 0.0), color);
    gizmos.line_2d(Vec2::new(0.0, -16.0), Vec2::new(0.0, 16.0), color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_lines_cover_the_view() {
        assert_eq!(grid_lines(-40.0, 70.0, 32.0), vec![-32.0, 0.0, 32.0, 64.0]);
        assert!(grid_lines(0.0, 10.0, 0.0).is_empty());
        assert!(grid_lines(0.0, 1.0e6, 1.0).is_empty());
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress(1.0, 0.0), 0.0);
        assert_eq!(progress(1.0, 4.0), 0.25);
        assert_eq!(progress(9.0, 4.0), 1.0);
    }
}
