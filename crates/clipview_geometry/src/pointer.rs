use bevy::math::{Ray3d, Vec3};

use crate::clip_box::{ClipBox, FaceAxis};
use crate::picking::{GroundPlane, ground_plane, pick_face, ray_ground_hit};

/// Pointer input, already converted to a world-space ray by the caller.
#[derive(Clone, Copy, Debug)]
pub enum PointerEvent {
    Moved(Ray3d),
    Pressed { ray: Ray3d, camera_pos: Vec3 },
    Released,
}

/// In-flight drag gesture: which bound is being edited and the ground plane
/// pointer rays are resolved against.
#[derive(Clone, Copy, Debug)]
pub struct DragState {
    pub axis: FaceAxis,
    pub ground: GroundPlane,
    /// Last resolved ground-plane point; a `Moved` to the same point is a
    /// no-op frame.
    pub last_point: Vec3,
}

/// Hover/drag state machine. Exactly one mutator of the clip box exists at a
/// time: only the `Dragging` state ever edits bounds, and every transition
/// goes through [`dispatch`](PointerState::dispatch).
#[derive(Clone, Debug, Default)]
pub enum PointerState {
    #[default]
    Idle,
    Hovering(FaceAxis),
    Dragging(DragState),
}

/// What a dispatched event changed, for the caller to mirror into cursor,
/// camera-control and redraw state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Response {
    None,
    HoverChanged {
        from: Option<FaceAxis>,
        to: Option<FaceAxis>,
    },
    DragStarted(FaceAxis),
    BoundsChanged(FaceAxis),
    DragEnded,
}

impl PointerState {
    /// The face whose edges should highlight: the hovered face, or the
    /// dragged face for the duration of a gesture.
    pub fn active_face(&self) -> Option<FaceAxis> {
        match self {
            PointerState::Idle => None,
            PointerState::Hovering(axis) => Some(*axis),
            PointerState::Dragging(drag) => Some(drag.axis),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, PointerState::Dragging(_))
    }

    /// Advance the state machine by one pointer event.
    ///
    /// While dragging, `Moved` rays are cast against the ground plane only;
    /// a miss (grazing angle), a stationary pointer, or a clamp that pins the
    /// bound in place all leave the box untouched and return
    /// [`Response::None`]. Outside a drag, rays are cast against the box
    /// faces to maintain hover. A bounds edit always rebuilds the box's
    /// derived geometry before returning.
    pub fn dispatch(&mut self, event: PointerEvent, clip_box: &mut ClipBox) -> Response {
        match event {
            PointerEvent::Moved(ray) => match self {
                PointerState::Dragging(drag) => {
                    let Some(point) = ray_ground_hit(ray, &drag.ground) else {
                        return Response::None;
                    };
                    let axis = drag.axis;
                    if point == drag.last_point {
                        return Response::None;
                    }
                    drag.last_point = point;
                    // The clamp can swallow the whole motion (bound pinned at
                    // a limit); only a bound that actually moved is a change.
                    let before = clip_box.bound(axis);
                    clip_box.set_bound(axis, point[axis.coord()]);
                    if clip_box.bound(axis) == before {
                        return Response::None;
                    }
                    clip_box.rebuild();
                    Response::BoundsChanged(axis)
                }
                _ => {
                    let from = self.active_face();
                    let to = pick_face(ray, clip_box).map(|hit| hit.axis);
                    if from == to {
                        return Response::None;
                    }
                    *self = match to {
                        Some(axis) => PointerState::Hovering(axis),
                        None => PointerState::Idle,
                    };
                    Response::HoverChanged { from, to }
                }
            },
            PointerEvent::Pressed { ray, camera_pos } => {
                // A press only grabs a face that is already hovered; the ray
                // is re-cast so the grab point is exact.
                let PointerState::Hovering(_) = self else {
                    return Response::None;
                };
                let Some(hit) = pick_face(ray, clip_box) else {
                    return Response::None;
                };
                *self = PointerState::Dragging(DragState {
                    axis: hit.axis,
                    ground: ground_plane(hit.axis, hit.point, camera_pos),
                    last_point: hit.point,
                });
                Response::DragStarted(hit.axis)
            }
            PointerEvent::Released => {
                if self.is_dragging() {
                    *self = PointerState::Idle;
                    Response::DragEnded
                } else {
                    Response::None
                }
            }
        }
    }
}
