use bevy::math::{Dir3, Ray3d, Vec3};

use crate::clip_box::{BoxFace, ClipBox, EPSILON, FaceAxis};

/// Result of a successful ray/face pick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceHit {
    pub axis: FaceAxis,
    /// Distance along the ray.
    pub distance: f32,
    pub point: Vec3,
}

/// Transient plane used during a drag to turn pointer rays into points
/// constrained to one axis of motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundPlane {
    pub origin: Vec3,
    pub normal: Dir3,
}

/// Intersect a ray with one box face. The face plane is hit first, then the
/// point is tested against the quad's in-plane extent.
pub fn ray_face_hit(ray: Ray3d, face: &BoxFace) -> Option<(f32, Vec3)> {
    let normal = face.axis.outward_normal();
    let denom = normal.dot(*ray.direction);
    if denom.abs() < EPSILON {
        return None;
    }
    let t = (face.corners[0] - ray.origin).dot(normal) / denom;
    if t <= 0.0 {
        return None;
    }
    let point = ray.origin + *ray.direction * t;

    // The quad is axis-aligned, so the extent test reduces to ranges on the
    // two in-plane coordinates.
    let c = face.axis.coord();
    for axis in [(c + 1) % 3, (c + 2) % 3] {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for corner in &face.corners {
            min = min.min(corner[axis]);
            max = max.max(corner[axis]);
        }
        if point[axis] < min - EPSILON || point[axis] > max + EPSILON {
            return None;
        }
    }
    Some((t, point))
}

/// Pick the face nearest to the ray origin, if any.
pub fn pick_face(ray: Ray3d, clip_box: &ClipBox) -> Option<FaceHit> {
    let mut best: Option<FaceHit> = None;
    for face in &clip_box.faces {
        if let Some((t, point)) = ray_face_hit(ray, face) {
            if best.is_none_or(|b| t < b.distance) {
                best = Some(FaceHit {
                    axis: face.axis,
                    distance: t,
                    point,
                });
            }
        }
    }
    best
}

/// Build the drag ground plane for a face grab.
///
/// The plane passes through the grab point with the dragged axis' coordinate
/// zeroed, and faces the camera as closely as the axis constraint allows: the
/// normal is the camera position with its component along the face normal
/// projected off.
pub fn ground_plane(axis: FaceAxis, grab_point: Vec3, camera_pos: Vec3) -> GroundPlane {
    let mut origin = grab_point;
    origin[axis.coord()] = 0.0;
    let along_axis = camera_pos.project_onto(axis.outward_normal());
    let toward_camera = camera_pos - along_axis;
    // Camera sitting exactly on the dragged axis leaves no rejection to face;
    // any perpendicular keeps the plane valid.
    let normal = Dir3::new(toward_camera)
        .or_else(|_| Dir3::new(axis.outward_normal().any_orthonormal_vector()))
        .unwrap_or(Dir3::X);
    GroundPlane { origin, normal }
}

/// Intersect a ray with the ground plane. Grazing or receding rays miss,
/// which drag handling treats as "no update this frame".
pub fn ray_ground_hit(ray: Ray3d, ground: &GroundPlane) -> Option<Vec3> {
    let denom = ground.normal.dot(*ray.direction);
    if denom.abs() < EPSILON {
        return None;
    }
    let t = (ground.origin - ray.origin).dot(*ground.normal) / denom;
    if t <= 0.0 {
        return None;
    }
    Some(ray.origin + *ray.direction * t)
}
