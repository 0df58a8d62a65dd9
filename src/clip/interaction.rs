use bevy::{
    prelude::*,
    window::{CursorIcon, PrimaryWindow, SystemCursorIcon},
};
use clipview_geometry::{PointerEvent, Response};

use super::{ClipPointer, ClipTool};
use clipview_camera::OrbitCameraSettings;

/// Cursor ray through the current pointer position, if the pointer is over
/// the window.
fn cursor_ray(
    window: &Window,
    camera: &Camera,
    camera_tf: &GlobalTransform,
) -> Option<Ray3d> {
    let cursor_pos = window.cursor_position()?;
    camera.viewport_to_world(camera_tf, cursor_pos).ok()
}

/// Picks the face under the cursor while no drag is in progress and mirrors
/// the result onto the window cursor.
pub fn handle_clip_hover(
    mut tool: ResMut<ClipTool>,
    mut pointer: ResMut<ClipPointer>,
    window: Single<(Entity, &Window), With<PrimaryWindow>>,
    camera: Single<(&Camera, &GlobalTransform)>,
    mut commands: Commands,
) {
    if pointer.0.is_dragging() {
        return;
    }
    // Hover churn must not look like a bounds edit to the mesh systems.
    let Some(session) = &mut tool.bypass_change_detection().session else {
        return;
    };
    let (window_entity, window) = *window;
    let (camera, camera_tf) = *camera;
    let Some(ray) = cursor_ray(window, camera, camera_tf) else {
        return;
    };

    match pointer.0.dispatch(PointerEvent::Moved(ray), &mut session.clip_box) {
        Response::HoverChanged { to: Some(_), .. } => {
            commands
                .entity(window_entity)
                .insert(CursorIcon::from(SystemCursorIcon::Pointer));
        }
        Response::HoverChanged { to: None, .. } => {
            commands.entity(window_entity).remove::<CursorIcon>();
        }
        _ => {}
    }
}

/// Turns left-button input into press/drag/release transitions and applies
/// the resulting bound edits.
pub fn handle_clip_drag(
    mouse: Res<ButtonInput<MouseButton>>,
    mut tool: ResMut<ClipTool>,
    mut pointer: ResMut<ClipPointer>,
    window: Single<(Entity, &Window), With<PrimaryWindow>>,
    camera: Single<(&Camera, &GlobalTransform)>,
    mut orbit_query: Query<&mut OrbitCameraSettings>,
    mut commands: Commands,
) {
    if tool.session.is_none() {
        return;
    }
    let (window_entity, window) = *window;
    let (camera, camera_tf) = *camera;
    let ray = cursor_ray(window, camera, camera_tf);

    let event = if !pointer.0.is_dragging() {
        if mouse.just_pressed(MouseButton::Left) {
            let Some(ray) = ray else { return };
            PointerEvent::Pressed {
                ray,
                camera_pos: camera_tf.translation(),
            }
        } else {
            return;
        }
    } else if mouse.just_released(MouseButton::Left) {
        PointerEvent::Released
    } else if mouse.pressed(MouseButton::Left) {
        match ray {
            Some(ray) => PointerEvent::Moved(ray),
            None => return,
        }
    } else {
        // Release happened outside the window; end the drag anyway.
        PointerEvent::Released
    };

    // Dispatch without flagging the resource; only a real bounds edit below
    // marks it changed for the mesh systems.
    let response = match &mut tool.bypass_change_detection().session {
        Some(session) => pointer.0.dispatch(event, &mut session.clip_box),
        None => return,
    };

    match response {
        Response::DragStarted(_) => {
            for mut orbit in &mut orbit_query {
                orbit.enable_pan = false;
                orbit.enable_zoom = false;
                orbit.enable_rotate = false;
            }
            commands
                .entity(window_entity)
                .insert(CursorIcon::from(SystemCursorIcon::Move));
        }
        Response::BoundsChanged(_) => {
            tool.set_changed();
        }
        Response::DragEnded => {
            for mut orbit in &mut orbit_query {
                orbit.enable_pan = true;
                orbit.enable_zoom = true;
                orbit.enable_rotate = true;
            }
            commands.entity(window_entity).remove::<CursorIcon>();
        }
        _ => {}
    }
}
