use bevy::{
    mesh::{Indices, PrimitiveTopology},
    prelude::*,
};
use clipview_geometry::BoxFace;

use super::{CapBox, ClipFaceEntity, ClipTool, SectionMaterial};
use crate::ViewerEntity;

/// Two triangles over the face corners, facing into the box. The faces are
/// rendered front-culled so only the inside of the box shows through the
/// cut-away model.
const QUAD_INDICES: [u32; 6] = [0, 3, 2, 0, 2, 1];

fn face_quad_mesh(face: &BoxFace) -> Mesh {
    let normal = -face.axis.outward_normal();
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, default());
    mesh.insert_attribute(
        Mesh::ATTRIBUTE_POSITION,
        face.corners.iter().map(|c| c.to_array()).collect::<Vec<_>>(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, vec![normal.to_array(); 4]);
    mesh.insert_attribute(
        Mesh::ATTRIBUTE_UV_0,
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
    );
    mesh.insert_indices(Indices::U32(QUAD_INDICES.to_vec()));
    mesh
}

/// Rebuilds the derived renderables whenever the clip volume changed: the
/// shader planes on the sectioned model and the six translucent face quads.
pub fn regenerate_clip_meshes(
    tool: Res<ClipTool>,
    face_entities: Query<Entity, With<ClipFaceEntity>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut section_materials: ResMut<Assets<SectionMaterial>>,
    mut commands: Commands,
) {
    if !tool.is_changed() {
        return;
    }
    let Some(session) = &tool.session else {
        return;
    };

    if let Some(material) = section_materials.get_mut(&session.section_material) {
        material.extension.set_planes(&session.clip_box.planes);
    }

    for entity in &face_entities {
        commands.entity(entity).despawn();
    }
    for face in &session.clip_box.faces {
        commands.spawn((
            Name::new(format!("Clip face {}", face.axis.label())),
            ClipFaceEntity,
            ViewerEntity,
            Mesh3d(meshes.add(face_quad_mesh(face))),
            MeshMaterial3d(session.face_material.clone()),
        ));
    }
}

/// Keeps any cap-box overlay congruent with the clip volume.
pub fn sync_cap_boxes(
    tool: Res<ClipTool>,
    mut cap_query: Query<&mut Transform, With<CapBox>>,
) {
    if !tool.is_changed() {
        return;
    }
    let Some(session) = &tool.session else {
        return;
    };
    for mut transform in &mut cap_query {
        transform.translation = session.clip_box.center();
        transform.scale = session.clip_box.size();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipview_geometry::{ClipBox, FaceAxis};

    #[test]
    fn face_quads_are_two_triangles_over_four_corners() {
        let clip_box = ClipBox::from_bounds(Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
        let mesh = face_quad_mesh(clip_box.face(FaceAxis::X2));
        assert_eq!(mesh.count_vertices(), 4);
        match mesh.indices() {
            Some(Indices::U32(indices)) => assert_eq!(indices.len(), 6),
            other => panic!("unexpected indices: {other:?}"),
        }
    }
}
