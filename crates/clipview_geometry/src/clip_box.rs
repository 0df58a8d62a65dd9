use bevy::math::Vec3;
use thiserror::Error;

/// Minimum thickness the box may be shrunk to on any axis.
pub const DEFAULT_MIN_SIZE: f32 = 0.0002;

pub(crate) const EPSILON: f32 = 1e-4;

#[derive(Debug, Error)]
pub enum ClipBoxError {
    #[error("clip box bounds are not finite")]
    NonFiniteBounds,
    #[error("clip box extent {extent} on axis {axis} is below the minimum thickness {min_size}")]
    DegenerateBounds {
        axis: char,
        extent: f32,
        min_size: f32,
    },
}

/// One of the six box faces, identified by the bound it controls:
/// `X1` is the low-x face, `X2` the high-x face, and so on.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum FaceAxis {
    X1,
    X2,
    Y1,
    Y2,
    Z1,
    Z2,
}

impl FaceAxis {
    /// All six faces, in the order the face array is generated.
    pub const ALL: [FaceAxis; 6] = [
        FaceAxis::Y2,
        FaceAxis::Y1,
        FaceAxis::X1,
        FaceAxis::X2,
        FaceAxis::Z2,
        FaceAxis::Z1,
    ];

    /// Index of the coordinate this face's bound lives on (x=0, y=1, z=2).
    pub fn coord(self) -> usize {
        match self {
            FaceAxis::X1 | FaceAxis::X2 => 0,
            FaceAxis::Y1 | FaceAxis::Y2 => 1,
            FaceAxis::Z1 | FaceAxis::Z2 => 2,
        }
    }

    /// Whether this face edits the high bound (the "2" faces).
    pub fn is_high(self) -> bool {
        matches!(self, FaceAxis::X2 | FaceAxis::Y2 | FaceAxis::Z2)
    }

    /// Unit normal pointing away from the box interior.
    pub fn outward_normal(self) -> Vec3 {
        match self {
            FaceAxis::X1 => Vec3::NEG_X,
            FaceAxis::X2 => Vec3::X,
            FaceAxis::Y1 => Vec3::NEG_Y,
            FaceAxis::Y2 => Vec3::Y,
            FaceAxis::Z1 => Vec3::NEG_Z,
            FaceAxis::Z2 => Vec3::Z,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FaceAxis::X1 => "x1",
            FaceAxis::X2 => "x2",
            FaceAxis::Y1 => "y1",
            FaceAxis::Y2 => "y2",
            FaceAxis::Z1 => "z1",
            FaceAxis::Z2 => "z2",
        }
    }
}

/// Half-space cutting plane. The normal points inward (toward the kept
/// region); a point is retained when `dot(normal, p) - distance >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipPlane {
    pub normal: Vec3,
    pub distance: f32,
}

impl ClipPlane {
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    pub fn keeps(&self, point: Vec3) -> bool {
        self.signed_distance(point) >= 0.0
    }
}

/// Planar quad bounding the clip box on one side. `lines` are indices into
/// the owning [`ClipBox`]'s line array, one per bordering edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxFace {
    pub axis: FaceAxis,
    /// Quad corners, wound so the two covering triangles face outward
    /// with the index order `[0, 3, 2, 0, 2, 1]`.
    pub corners: [Vec3; 4],
    pub lines: [usize; 4],
}

/// One box edge, shared by exactly two adjacent faces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxLine {
    pub start: Vec3,
    pub end: Vec3,
    pub faces: [FaceAxis; 2],
}

impl BoxLine {
    /// Whether this edge borders the given face.
    pub fn borders(&self, axis: FaceAxis) -> bool {
        self.faces.contains(&axis)
    }
}

// Corner numbering (see `corners()`): 0..4 on the high-y plane, 4..8 on the
// low-y plane, winding low-z -> high-z.
const FACE_CORNERS: [(FaceAxis, [usize; 4]); 6] = [
    (FaceAxis::Y2, [0, 1, 2, 3]),
    (FaceAxis::Y1, [4, 7, 6, 5]),
    (FaceAxis::X1, [0, 3, 7, 4]),
    (FaceAxis::X2, [1, 5, 6, 2]),
    (FaceAxis::Z2, [2, 6, 7, 3]),
    (FaceAxis::Z1, [0, 4, 5, 1]),
];

const EDGES: [(usize, usize, FaceAxis, FaceAxis); 12] = [
    // high-y ring
    (0, 1, FaceAxis::Y2, FaceAxis::Z1),
    (1, 2, FaceAxis::Y2, FaceAxis::X2),
    (2, 3, FaceAxis::Y2, FaceAxis::Z2),
    (3, 0, FaceAxis::Y2, FaceAxis::X1),
    // low-y ring
    (4, 5, FaceAxis::Y1, FaceAxis::Z1),
    (5, 6, FaceAxis::Y1, FaceAxis::X2),
    (6, 7, FaceAxis::Y1, FaceAxis::Z2),
    (7, 4, FaceAxis::Y1, FaceAxis::X1),
    // verticals
    (0, 4, FaceAxis::X1, FaceAxis::Z1),
    (1, 5, FaceAxis::X2, FaceAxis::Z1),
    (2, 6, FaceAxis::X2, FaceAxis::Z2),
    (3, 7, FaceAxis::X1, FaceAxis::Z2),
];

/// Axis-aligned box bounding the region of the model that stays visible.
/// Derived geometry (faces, lines, planes) is regenerated wholesale by
/// [`ClipBox::rebuild`] whenever the bounds change.
#[derive(Clone, Debug)]
pub struct ClipBox {
    pub low: Vec3,
    pub high: Vec3,
    /// Bounds at creation time; a face can never be dragged past these.
    pub low_init: Vec3,
    pub high_init: Vec3,
    pub min_size: f32,
    pub faces: [BoxFace; 6],
    pub lines: [BoxLine; 12],
    pub planes: [ClipPlane; 6],
}

impl ClipBox {
    pub fn from_bounds(low: Vec3, high: Vec3) -> Result<Self, ClipBoxError> {
        Self::from_bounds_with_min_size(low, high, DEFAULT_MIN_SIZE)
    }

    pub fn from_bounds_with_min_size(
        low: Vec3,
        high: Vec3,
        min_size: f32,
    ) -> Result<Self, ClipBoxError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(ClipBoxError::NonFiniteBounds);
        }
        for (i, axis) in ['x', 'y', 'z'].into_iter().enumerate() {
            let extent = high[i] - low[i];
            if extent < min_size {
                return Err(ClipBoxError::DegenerateBounds {
                    axis,
                    extent,
                    min_size,
                });
            }
        }

        let placeholder_face = BoxFace {
            axis: FaceAxis::Y2,
            corners: [Vec3::ZERO; 4],
            lines: [0; 4],
        };
        let placeholder_line = BoxLine {
            start: Vec3::ZERO,
            end: Vec3::ZERO,
            faces: [FaceAxis::Y2; 2],
        };
        let placeholder_plane = ClipPlane {
            normal: Vec3::Y,
            distance: 0.0,
        };
        let mut clip_box = Self {
            low,
            high,
            low_init: low,
            high_init: high,
            min_size,
            faces: [placeholder_face; 6],
            lines: [placeholder_line; 12],
            planes: [placeholder_plane; 6],
        };
        clip_box.rebuild();
        Ok(clip_box)
    }

    /// Move the bound controlled by `axis` toward `value`, clamped so the box
    /// never inverts (a `min_size` gap always remains to the opposite bound)
    /// and never grows past the initial bounds.
    ///
    /// Callers must [`rebuild`](Self::rebuild) before the geometry is read.
    pub fn set_bound(&mut self, axis: FaceAxis, value: f32) {
        let i = axis.coord();
        if axis.is_high() {
            self.high[i] = (self.low[i] + self.min_size).max(self.high_init[i].min(value));
        } else {
            self.low[i] = self.low_init[i].max((self.high[i] - self.min_size).min(value));
        }
    }

    /// Recompute the 8 corners, 6 faces, 12 lines and 6 planes from the
    /// current bounds. Idempotent for unchanged bounds.
    pub fn rebuild(&mut self) {
        let corners = self.corners();

        for (slot, (axis, idx)) in self.faces.iter_mut().zip(FACE_CORNERS) {
            let lines = face_line_indices(axis);
            *slot = BoxFace {
                axis,
                corners: [
                    corners[idx[0]],
                    corners[idx[1]],
                    corners[idx[2]],
                    corners[idx[3]],
                ],
                lines,
            };
        }

        for (slot, (a, b, fa, fb)) in self.lines.iter_mut().zip(EDGES) {
            *slot = BoxLine {
                start: corners[a],
                end: corners[b],
                faces: [fa, fb],
            };
        }

        for (slot, face) in self.planes.iter_mut().zip(&self.faces) {
            let normal = -face.axis.outward_normal();
            *slot = ClipPlane {
                normal,
                distance: normal.dot(face.corners[0]),
            };
        }
    }

    /// The 8 box corners: 0..4 ring the high-y plane, 4..8 the low-y plane.
    pub fn corners(&self) -> [Vec3; 8] {
        let (l, h) = (self.low, self.high);
        [
            Vec3::new(l.x, h.y, l.z),
            Vec3::new(h.x, h.y, l.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(l.x, h.y, h.z),
            Vec3::new(l.x, l.y, l.z),
            Vec3::new(h.x, l.y, l.z),
            Vec3::new(h.x, l.y, h.z),
            Vec3::new(l.x, l.y, h.z),
        ]
    }

    /// Current value of the bound this face controls.
    pub fn bound(&self, axis: FaceAxis) -> f32 {
        let i = axis.coord();
        if axis.is_high() { self.high[i] } else { self.low[i] }
    }

    pub fn size(&self) -> Vec3 {
        self.high - self.low
    }

    pub fn center(&self) -> Vec3 {
        (self.low + self.high) * 0.5
    }

    /// Whether a point lies inside all six clip planes.
    pub fn contains(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.keeps(point))
    }

    pub fn face(&self, axis: FaceAxis) -> &BoxFace {
        &self.faces[face_index(axis)]
    }
}

fn face_index(axis: FaceAxis) -> usize {
    FACE_CORNERS
        .iter()
        .position(|(a, _)| *a == axis)
        .unwrap_or_default()
}

fn face_line_indices(axis: FaceAxis) -> [usize; 4] {
    let mut out = [0usize; 4];
    let mut n = 0;
    for (i, (_, _, fa, fb)) in EDGES.iter().enumerate() {
        if *fa == axis || *fb == axis {
            out[n] = i;
            n += 1;
        }
    }
    debug_assert_eq!(n, 4);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> ClipBox {
        ClipBox::from_bounds_with_min_size(Vec3::splat(-1.0), Vec3::splat(1.0), 0.0002).unwrap()
    }

    #[test]
    fn degenerate_bounds_rejected() {
        assert!(ClipBox::from_bounds(Vec3::ZERO, Vec3::ZERO).is_err());
        assert!(ClipBox::from_bounds(Vec3::splat(f32::NAN), Vec3::ONE).is_err());
        assert!(ClipBox::from_bounds(Vec3::ONE, Vec3::ZERO).is_err());
    }

    #[test]
    fn set_bound_clamps_to_initial_extent() {
        let mut clip_box = unit_box();
        clip_box.set_bound(FaceAxis::X2, 5.0);
        assert_eq!(clip_box.high.x, 1.0);
        clip_box.set_bound(FaceAxis::Y1, -7.5);
        assert_eq!(clip_box.low.y, -1.0);
    }

    #[test]
    fn set_bound_clamps_to_min_thickness() {
        let mut clip_box = unit_box();
        clip_box.set_bound(FaceAxis::X2, -2.0);
        assert_eq!(clip_box.high.x, -1.0 + 0.0002);
        clip_box.set_bound(FaceAxis::Z1, 9.0);
        assert_eq!(clip_box.low.z, 1.0 - 0.0002);
    }

    #[test]
    fn box_never_inverts_under_random_drags() {
        let mut clip_box = unit_box();
        // Deterministic pseudo-random walk over all six bounds.
        let mut seed = 0x2545f49u64;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let axis = FaceAxis::ALL[(seed >> 33) as usize % 6];
            let value = ((seed >> 40) as f32 / 8388608.0) * 6.0 - 3.0;
            clip_box.set_bound(axis, value);
            clip_box.rebuild();
            for i in 0..3 {
                assert!(clip_box.high[i] - clip_box.low[i] >= clip_box.min_size);
                assert!(clip_box.low[i] >= clip_box.low_init[i]);
                assert!(clip_box.high[i] <= clip_box.high_init[i]);
            }
        }
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut clip_box = unit_box();
        clip_box.set_bound(FaceAxis::Y2, 0.3);
        clip_box.rebuild();
        let faces = clip_box.faces;
        let lines = clip_box.lines;
        let planes = clip_box.planes;
        clip_box.rebuild();
        assert_eq!(faces, clip_box.faces);
        assert_eq!(lines, clip_box.lines);
        assert_eq!(planes, clip_box.planes);
    }

    #[test]
    fn planes_keep_the_interior() {
        let mut clip_box = unit_box();
        clip_box.set_bound(FaceAxis::X2, 0.5);
        clip_box.rebuild();
        assert!(clip_box.contains(Vec3::ZERO));
        assert!(!clip_box.contains(Vec3::new(0.75, 0.0, 0.0)));
        assert!(!clip_box.contains(Vec3::new(0.0, 1.5, 0.0)));
        assert!(clip_box.contains(Vec3::new(-0.99, -0.99, 0.99)));
    }

    #[test]
    fn plane_normals_point_inward() {
        let clip_box = unit_box();
        let center = clip_box.center();
        for plane in &clip_box.planes {
            assert!(plane.signed_distance(center) > 0.0);
        }
    }

    #[test]
    fn edge_topology_is_consistent() {
        let clip_box = unit_box();
        // Every face links 4 distinct lines, and each linked line borders it.
        for face in &clip_box.faces {
            for (i, &li) in face.lines.iter().enumerate() {
                assert!(clip_box.lines[li].borders(face.axis));
                assert!(face.lines[i + 1..].iter().all(|&lj| lj != li));
            }
        }
        // Every line is referenced by exactly its two faces.
        for (i, line) in clip_box.lines.iter().enumerate() {
            let referencing = clip_box
                .faces
                .iter()
                .filter(|f| f.lines.contains(&i))
                .count();
            assert_eq!(referencing, 2);
            assert_ne!(line.faces[0], line.faces[1]);
            assert!((line.end - line.start).length() > 0.0);
        }
        // No two lines share both endpoints.
        for (i, a) in clip_box.lines.iter().enumerate() {
            for b in &clip_box.lines[i + 1..] {
                let same = (a.start == b.start && a.end == b.end)
                    || (a.start == b.end && a.end == b.start);
                assert!(!same);
            }
        }
    }

    #[test]
    fn face_corners_lie_on_their_bound() {
        let mut clip_box = unit_box();
        clip_box.set_bound(FaceAxis::Z1, -0.25);
        clip_box.rebuild();
        for face in &clip_box.faces {
            let i = face.axis.coord();
            let bound = if face.axis.is_high() {
                clip_box.high[i]
            } else {
                clip_box.low[i]
            };
            for corner in &face.corners {
                assert_eq!(corner[i], bound);
            }
        }
    }
}
