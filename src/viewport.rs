use bevy::prelude::*;
use bevy_infinite_grid::InfiniteGridPlugin;
use clipview_camera::OrbitCameraSettings;

use crate::ViewerEntity;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InfiniteGridPlugin)
            .add_systems(Startup, setup_viewport);
    }
}

fn setup_viewport(mut commands: Commands) {
    commands.spawn((
        Name::new("Viewer camera"),
        ViewerEntity,
        Camera3d::default(),
        Transform::from_xyz(4.0, 3.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCameraSettings::default(),
    ));

    commands.spawn((bevy_infinite_grid::InfiniteGrid, ViewerEntity));
}
