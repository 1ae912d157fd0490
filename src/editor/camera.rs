use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_emitter2d::ParticleCulling;

/// Smallest orthographic scale (most zoomed in)
const MIN_ZOOM: f32 = 0.1;
/// Largest orthographic scale (most zoomed out)
const MAX_ZOOM: f32 = 8.0;
/// Scale change per scroll unit
const ZOOM_SPEED: f32 = 0.1;

pub struct EditorCameraPlugin;

impl Plugin for EditorCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_editor_camera)
            .add_systems(Update, (camera_pan, camera_zoom, update_culling).chain());
    }
}

/// Marker component for the editor camera
#[derive(Component)]
pub struct EditorCamera;

fn spawn_editor_camera(mut commands: Commands) {
    commands.spawn((Camera2d, EditorCamera));
}

/// Pan with the right mouse button held
fn camera_pan(
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    mut query: Query<(&mut Transform, &Projection), With<EditorCamera>>,
) {
    if !buttons.pressed(MouseButton::Right) || motion.delta == Vec2::ZERO {
        return;
    }

    for (mut transform, projection) in &mut query {
        let scale = ortho_scale(projection);
        // Screen y points down, world y points up
        transform.translation.x -= motion.delta.x * scale;
        transform.translation.y += motion.delta.y * scale;
    }
}

fn camera_zoom(
    scroll: Res<AccumulatedMouseScroll>,
    mut query: Query<&mut Projection, With<EditorCamera>>,
) {
    let scroll_y = scroll.delta.y;
    if scroll_y == 0.0 {
        return;
    }

    for mut projection in &mut query {
        if let Projection::Orthographic(ortho) = &mut *projection {
            ortho.scale = (ortho.scale * (1.0 - scroll_y * ZOOM_SPEED)).clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }
}

/// Keep the culling rectangle on what the camera sees
fn update_culling(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Transform, &Projection), With<EditorCamera>>,
    mut culling: ResMut<ParticleCulling>,
) {
    let (Ok(window), Ok((transform, projection))) = (window_query.single(), camera_query.single())
    else {
        culling.0 = None;
        return;
    };

    let visible = visible_rect(transform.translation.truncate(), window.size(), ortho_scale(projection));
    if culling.0 != Some(visible) {
        culling.0 = Some(visible);
    }
}

fn ortho_scale(projection: &Projection) -> f32 {
    match projection {
        Projection::Orthographic(ortho) => ortho.scale,
        _ => 1.0,
    }
}

/// World rectangle covered by a viewport of `size` logical pixels.
pub fn visible_rect(center: Vec2, size: Vec2, scale: f32) -> Rect {
    Rect::from_center_size(center, size * scale)
}

/// World position under the cursor, if it is inside the window.
pub fn cursor_world_position(
    window: &Window,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Vec2> {
    let cursor = window.cursor_position()?;
    camera.viewport_to_world_2d(camera_transform, cursor).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_rect_scales_with_zoom() {
        let r = visible_rect(Vec2::new(100.0, 0.0), Vec2::new(800.0, 600.0), 0.5);
        assert_eq!(r.min, Vec2::new(-100.0, -150.0));
        assert_eq!(r.max, Vec2::new(300.0, 150.0));
    }
}
