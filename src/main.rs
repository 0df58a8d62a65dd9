use bevy::prelude::*;
use clipview::{ClipTarget, ViewerPlugin};

fn main() -> AppExit {
    App::new()
        .add_plugins((DefaultPlugins, ViewerPlugin))
        .add_systems(Startup, spawn_scene)
        .run()
}

fn spawn_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            shadows_enabled: true,
            illuminance: 10000.0,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 10.0)
            .with_rotation(Quat::from_euler(EulerRot::XYZ, -0.8, 0.4, 0.0)),
    ));

    // Demo model; press C to toggle the clip box around it.
    commands.spawn((
        Name::new("Model"),
        ClipTarget,
        Mesh3d(meshes.add(Torus::new(0.6, 1.2))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.55, 0.85),
            ..default()
        })),
        Transform::from_xyz(0.0, 1.2, 0.0),
    ));

    info!("press C to toggle the clip box");
}
