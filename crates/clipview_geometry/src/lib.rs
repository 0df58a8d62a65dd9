//! Geometry core of the clip-box viewer: the axis-aligned clip box with its
//! derived faces/edges/planes, screen-ray picking against it, and the
//! hover/drag pointer state machine. No ECS or rendering here — the viewer
//! crate feeds this from systems and mirrors the results into the scene.

mod clip_box;
mod picking;
mod pointer;

pub use clip_box::{
    BoxFace, BoxLine, ClipBox, ClipBoxError, ClipPlane, DEFAULT_MIN_SIZE, FaceAxis,
};
pub use picking::{FaceHit, GroundPlane, ground_plane, pick_face, ray_face_hit, ray_ground_hit};
pub use pointer::{DragState, PointerEvent, PointerState, Response};
