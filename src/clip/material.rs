use bevy::pbr::{ExtendedMaterial, MaterialExtension};
use bevy::prelude::*;
use bevy::render::render_resource::{AsBindGroup, ShaderType};
use bevy::shader::ShaderRef;

use clipview_geometry::ClipPlane;

/// The clipped model's material: its original `StandardMaterial` extended
/// with the six half-space discards.
pub type SectionMaterial = ExtendedMaterial<StandardMaterial, SectionClipExtension>;

const SHADER_PATH: &str = "embedded://clipview/clip/shaders/clip_section.wgsl";

/// GPU layout of the clip planes: inward normal in `xyz`, signed distance in
/// `w`; a fragment is kept when `dot(n, p) - d >= 0` for every plane.
#[derive(Clone, Copy, Debug, Default, ShaderType)]
pub struct ClipPlanesUniform {
    pub planes: [Vec4; 6],
    pub count: u32,
}

#[derive(Asset, AsBindGroup, TypePath, Debug, Clone, Default)]
pub struct SectionClipExtension {
    #[uniform(100)]
    pub clip: ClipPlanesUniform,
}

impl SectionClipExtension {
    pub fn from_planes(planes: &[ClipPlane; 6]) -> Self {
        let mut extension = Self::default();
        extension.set_planes(planes);
        extension
    }

    pub fn set_planes(&mut self, planes: &[ClipPlane; 6]) {
        for (slot, plane) in self.clip.planes.iter_mut().zip(planes) {
            *slot = plane.normal.extend(plane.distance);
        }
        self.clip.count = planes.len() as u32;
    }
}

impl MaterialExtension for SectionClipExtension {
    fn fragment_shader() -> ShaderRef {
        SHADER_PATH.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipview_geometry::ClipBox;

    #[test]
    fn planes_pack_normal_and_distance() {
        let clip_box = ClipBox::from_bounds(Vec3::splat(-1.0), Vec3::splat(2.0)).unwrap();
        let extension = SectionClipExtension::from_planes(&clip_box.planes);
        assert_eq!(extension.clip.count, 6);
        for (packed, plane) in extension.clip.planes.iter().zip(&clip_box.planes) {
            assert_eq!(packed.truncate(), plane.normal);
            assert_eq!(packed.w, plane.distance);
        }
        // Every packed plane keeps the box center.
        let center = clip_box.center();
        for packed in &extension.clip.planes {
            assert!(packed.truncate().dot(center) - packed.w >= 0.0);
        }
    }
}
