use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};

pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, camera_system);
    }
}

/// Settings component placed on the camera entity to enable orbit controls.
///
/// Controls:
/// - Right-click + drag: orbit around the focus point (yaw/pitch)
/// - Middle-click + drag: pan the focus point in the view plane
/// - Scroll wheel: zoom toward/away from the focus point
///
/// The per-gesture `enable_*` flags exist so interaction tools can freeze
/// individual gestures (a face drag must not also orbit the camera) without
/// tearing the controller down.
#[derive(Component)]
pub struct OrbitCameraSettings {
    /// Point the camera orbits and looks at.
    pub focus: Vec3,
    /// Orbit sensitivity (radians per pixel).
    pub sensitivity: f32,
    /// Pan speed (view-plane units per pixel, scaled by distance).
    pub pan_speed: f32,
    /// Zoom speed (fraction of the current distance per scroll line).
    pub zoom_speed: f32,
    /// Closest the camera may zoom to the focus point.
    pub min_radius: f32,
    /// Master switch; when false all input is drained and ignored.
    pub enabled: bool,
    pub enable_rotate: bool,
    pub enable_pan: bool,
    pub enable_zoom: bool,
}

impl Default for OrbitCameraSettings {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            sensitivity: 0.005,
            pan_speed: 0.0015,
            zoom_speed: 0.1,
            min_radius: 0.2,
            enabled: true,
            enable_rotate: true,
            enable_pan: true,
            enable_zoom: true,
        }
    }
}

fn camera_system(
    mouse: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut scroll_events: MessageReader<MouseWheel>,
    mut camera_query: Query<(&mut OrbitCameraSettings, &mut Transform)>,
) {
    let mut motion = Vec2::ZERO;
    for event in mouse_motion.read() {
        motion += event.delta;
    }
    let mut scroll = 0.0;
    for event in scroll_events.read() {
        scroll += match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.01,
        };
    }

    for (mut settings, mut transform) in &mut camera_query {
        if !settings.enabled {
            continue;
        }

        let mut offset = transform.translation - settings.focus;
        let mut radius = offset.length().max(settings.min_radius);

        // Orbit (only while right-click held)
        if mouse.pressed(MouseButton::Right) && settings.enable_rotate && motion != Vec2::ZERO {
            let mut yaw = offset.x.atan2(offset.z);
            let mut pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
            yaw -= motion.x * settings.sensitivity;
            pitch = (pitch + motion.y * settings.sensitivity).clamp(
                -std::f32::consts::FRAC_PI_2 + 0.01,
                std::f32::consts::FRAC_PI_2 - 0.01,
            );
            offset = Vec3::new(
                radius * pitch.cos() * yaw.sin(),
                radius * pitch.sin(),
                radius * pitch.cos() * yaw.cos(),
            );
        }

        // Pan (middle-click): moves the focus point in the view plane
        if mouse.pressed(MouseButton::Middle) && settings.enable_pan && motion != Vec2::ZERO {
            let right = transform.right().as_vec3();
            let up = transform.up().as_vec3();
            let pan = (-right * motion.x + up * motion.y) * settings.pan_speed * radius;
            settings.focus += pan;
        }

        // Zoom toward/away from the focus point
        if scroll != 0.0 && settings.enable_zoom {
            radius = (radius * (1.0 - scroll * settings.zoom_speed)).max(settings.min_radius);
            offset = offset.normalize_or_zero() * radius;
        }

        transform.translation = settings.focus + offset;
        transform.look_at(settings.focus, Vec3::Y);
    }
}
