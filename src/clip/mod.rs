mod gizmo_overlay;
mod interaction;
mod material;
mod mesh;

use bevy::{
    asset::embedded_asset,
    camera::primitives::Aabb,
    prelude::*,
    window::CursorIcon,
};
use clipview_camera::OrbitCameraSettings;
use clipview_geometry::{ClipBox, PointerState};

use crate::ViewerEntity;
use crate::config::ViewerSettings;

pub use material::{SectionClipExtension, SectionMaterial};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// Marker for the model the clip box sections. The C key toggles clip mode
/// on the (single) tagged entity; hosts embedding the viewer can instead
/// write [`ClipRequest`] messages for any mesh entity.
#[derive(Component, Default)]
pub struct ClipTarget;

/// Marker on the generated translucent back-face quads.
#[derive(Component)]
pub struct ClipFaceEntity;

/// Overlay mesh kept in sync with the clip volume: scale follows the box
/// size and translation its center on every bounds change.
#[derive(Component)]
pub struct CapBox;

/// Host-facing open/close surface for clip-interaction mode.
#[derive(Message, Debug, Clone, Copy)]
pub enum ClipRequest {
    Open(Entity),
    Close,
}

/// Active clip session, if any. Change detection on this resource drives
/// regeneration of the derived renderables, so hover-only pointer churn is
/// kept out of it (see [`ClipPointer`]).
#[derive(Resource, Default)]
pub struct ClipTool {
    pub session: Option<ClipSession>,
}

pub struct ClipSession {
    pub target: Entity,
    pub clip_box: ClipBox,
    /// The target's material before clip mode replaced it, restored on close.
    base_material: Handle<StandardMaterial>,
    section_material: Handle<SectionMaterial>,
    face_material: Handle<StandardMaterial>,
}

/// Hover/drag pointer state, fed by the interaction systems.
#[derive(Resource, Default)]
pub struct ClipPointer(pub PointerState);

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct ClipPlugin;

impl Plugin for ClipPlugin {
    fn build(&self, app: &mut App) {
        embedded_asset!(app, "shaders/clip_section.wgsl");
        app.add_plugins(MaterialPlugin::<SectionMaterial>::default())
            .init_resource::<ClipTool>()
            .init_resource::<ClipPointer>()
            .add_message::<ClipRequest>()
            .add_systems(
                Update,
                (
                    handle_clip_toggle_key,
                    handle_clip_requests,
                    interaction::handle_clip_hover,
                    interaction::handle_clip_drag,
                    mesh::regenerate_clip_meshes,
                    mesh::sync_cap_boxes,
                    gizmo_overlay::draw_clip_box_edges,
                )
                    .chain(),
            );
    }
}

// ---------------------------------------------------------------------------
// Open / close
// ---------------------------------------------------------------------------

/// C toggles clip mode on the tagged target.
fn handle_clip_toggle_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    tool: Res<ClipTool>,
    targets: Query<Entity, With<ClipTarget>>,
    mut requests: MessageWriter<ClipRequest>,
) {
    if !keyboard.just_pressed(KeyCode::KeyC) {
        return;
    }
    if tool.session.is_some() {
        requests.write(ClipRequest::Close);
    } else if let Ok(target) = targets.single() {
        requests.write(ClipRequest::Open(target));
    }
}

fn handle_clip_requests(
    mut requests: MessageReader<ClipRequest>,
    mut tool: ResMut<ClipTool>,
    mut pointer: ResMut<ClipPointer>,
    settings: Res<ViewerSettings>,
    targets: Query<(&Aabb, &GlobalTransform, &MeshMaterial3d<StandardMaterial>)>,
    generated: Query<Entity, Or<(With<ClipFaceEntity>, With<CapBox>)>>,
    windows: Query<Entity, With<Window>>,
    mut orbit_query: Query<&mut OrbitCameraSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut section_materials: ResMut<Assets<SectionMaterial>>,
    mut commands: Commands,
) {
    for request in requests.read() {
        match *request {
            ClipRequest::Open(target) => {
                if tool.session.is_some() {
                    warn!("clip mode is already open");
                    continue;
                }
                let Ok((aabb, global_tf, material)) = targets.get(target) else {
                    warn!("clip target {target} has no mesh bounds or material");
                    continue;
                };
                let (low, high) = world_bounds(aabb, global_tf);
                let clip_box =
                    match ClipBox::from_bounds_with_min_size(low, high, settings.min_size) {
                        Ok(clip_box) => clip_box,
                        Err(err) => {
                            warn!("cannot open clip mode: {err}");
                            continue;
                        }
                    };

                let base_material = material.0.clone();
                let Some(base) = standard_materials.get(&base_material).cloned() else {
                    warn!("clip target material is not loaded yet");
                    continue;
                };
                let section_material = section_materials.add(SectionMaterial {
                    base,
                    extension: SectionClipExtension::from_planes(&clip_box.planes),
                });
                if let Ok(mut ec) = commands.get_entity(target) {
                    ec.remove::<MeshMaterial3d<StandardMaterial>>()
                        .insert(MeshMaterial3d(section_material.clone()));
                }

                let face_material = standard_materials.add(StandardMaterial {
                    base_color: Color::WHITE.with_alpha(settings.face_opacity),
                    alpha_mode: AlphaMode::Blend,
                    unlit: true,
                    cull_mode: Some(bevy::render::render_resource::Face::Front),
                    ..default()
                });

                if settings.cap_enabled {
                    commands.spawn((
                        Name::new("Clip cap"),
                        CapBox,
                        ViewerEntity,
                        Mesh3d(meshes.add(Cuboid::new(1.0, 1.0, 1.0))),
                        MeshMaterial3d(standard_materials.add(StandardMaterial {
                            base_color: settings.cap_color(),
                            alpha_mode: AlphaMode::Blend,
                            unlit: true,
                            cull_mode: None,
                            double_sided: true,
                            ..default()
                        })),
                        Transform::from_translation(clip_box.center())
                            .with_scale(clip_box.size()),
                    ));
                }

                pointer.0 = PointerState::default();
                tool.session = Some(ClipSession {
                    target,
                    clip_box,
                    base_material,
                    section_material,
                    face_material,
                });
                info!("clip mode opened");
            }
            ClipRequest::Close => {
                let Some(session) = tool.session.take() else {
                    continue;
                };
                if let Ok(mut ec) = commands.get_entity(session.target) {
                    ec.remove::<MeshMaterial3d<SectionMaterial>>()
                        .insert(MeshMaterial3d(session.base_material.clone()));
                }
                for entity in &generated {
                    commands.entity(entity).despawn();
                }
                for window in &windows {
                    commands.entity(window).remove::<CursorIcon>();
                }
                // A close mid-drag must not leave the camera frozen.
                for mut orbit in &mut orbit_query {
                    orbit.enable_pan = true;
                    orbit.enable_zoom = true;
                    orbit.enable_rotate = true;
                }
                pointer.0 = PointerState::default();
                info!("clip mode closed");
            }
        }
    }
}

/// World-space bounds of an entity's local-space `Aabb`.
fn world_bounds(aabb: &Aabb, global_tf: &GlobalTransform) -> (Vec3, Vec3) {
    let center = Vec3::from(aabb.center);
    let half = Vec3::from(aabb.half_extents);
    let mut low = Vec3::MAX;
    let mut high = Vec3::MIN;
    for i in 0..8 {
        let corner = center
            + half
                * Vec3::new(
                    if i & 1 == 0 { -1.0 } else { 1.0 },
                    if i & 2 == 0 { -1.0 } else { 1.0 },
                    if i & 4 == 0 { -1.0 } else { 1.0 },
                );
        let world = global_tf.transform_point(corner);
        low = low.min(world);
        high = high.max(world);
    }
    (low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;
    use clipview_geometry::FaceAxis;

    #[test]
    fn open_close_round_trip_restores_the_scene() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(ViewerSettings {
                cap_enabled: true,
                ..default()
            })
            .init_resource::<ClipTool>()
            .init_resource::<ClipPointer>()
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<Assets<SectionMaterial>>()
            .add_message::<ClipRequest>()
            .add_systems(
                Update,
                (handle_clip_requests, mesh::regenerate_clip_meshes).chain(),
            );

        let base = app
            .world_mut()
            .resource_mut::<Assets<StandardMaterial>>()
            .add(StandardMaterial::default());
        let target = app
            .world_mut()
            .spawn((
                Aabb::from_min_max(Vec3::splat(-1.0), Vec3::splat(1.0)),
                GlobalTransform::default(),
                MeshMaterial3d(base.clone()),
            ))
            .id();
        let camera = app
            .world_mut()
            .spawn(OrbitCameraSettings {
                enable_pan: false,
                enable_zoom: false,
                enable_rotate: false,
                ..default()
            })
            .id();

        app.world_mut()
            .resource_mut::<Messages<ClipRequest>>()
            .write(ClipRequest::Open(target));
        app.update();

        assert!(app.world().resource::<ClipTool>().session.is_some());
        assert!(
            app.world()
                .get::<MeshMaterial3d<StandardMaterial>>(target)
                .is_none()
        );
        assert!(
            app.world()
                .get::<MeshMaterial3d<SectionMaterial>>(target)
                .is_some()
        );
        let faces = app
            .world_mut()
            .query_filtered::<Entity, With<ClipFaceEntity>>()
            .iter(app.world())
            .count();
        assert_eq!(faces, 6);
        let caps = app
            .world_mut()
            .query_filtered::<Entity, With<CapBox>>()
            .iter(app.world())
            .count();
        assert_eq!(caps, 1);

        // Close mid-hover with the camera gestures still frozen.
        app.world_mut().resource_mut::<ClipPointer>().0 = PointerState::Hovering(FaceAxis::X2);
        app.world_mut()
            .resource_mut::<Messages<ClipRequest>>()
            .write(ClipRequest::Close);
        app.update();

        assert!(app.world().resource::<ClipTool>().session.is_none());
        assert_eq!(
            app.world()
                .get::<MeshMaterial3d<StandardMaterial>>(target)
                .unwrap()
                .0,
            base
        );
        assert!(
            app.world()
                .get::<MeshMaterial3d<SectionMaterial>>(target)
                .is_none()
        );
        let leftovers = app
            .world_mut()
            .query_filtered::<Entity, Or<(With<ClipFaceEntity>, With<CapBox>)>>()
            .iter(app.world())
            .count();
        assert_eq!(leftovers, 0);
        assert!(app.world().resource::<ClipPointer>().0.active_face().is_none());
        let orbit = app.world().get::<OrbitCameraSettings>(camera).unwrap();
        assert!(orbit.enable_pan && orbit.enable_zoom && orbit.enable_rotate);
    }

    #[test]
    fn world_bounds_follow_the_transform() {
        let aabb = Aabb::from_min_max(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 1.0, 2.0));
        let global_tf = GlobalTransform::from(Transform::from_xyz(10.0, 0.0, 0.0));
        let (low, high) = world_bounds(&aabb, &global_tf);
        assert!((low - Vec3::new(9.0, 0.0, -2.0)).length() < 1e-5);
        assert!((high - Vec3::new(11.0, 1.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn rotated_target_still_yields_axis_aligned_bounds() {
        let aabb = Aabb::from_min_max(Vec3::new(-1.0, -1.0, -3.0), Vec3::new(1.0, 1.0, 3.0));
        // A quarter turn around y swaps the x and z extents.
        let global_tf = GlobalTransform::from(Transform::from_rotation(Quat::from_rotation_y(
            std::f32::consts::FRAC_PI_2,
        )));
        let (low, high) = world_bounds(&aabb, &global_tf);
        assert!((low - Vec3::new(-3.0, -1.0, -1.0)).length() < 1e-4);
        assert!((high - Vec3::new(3.0, 1.0, 1.0)).length() < 1e-4);
    }
}
