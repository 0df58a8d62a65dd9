pub mod clip;
pub mod config;
pub mod viewport;

use bevy::prelude::*;

pub use clip::{ClipPlugin, ClipRequest, ClipTarget, ClipTool};
pub use config::ViewerSettings;

/// Tag component for entities the viewer itself spawns (camera, grid,
/// generated clip geometry), so hosts can tell them apart from scene content.
#[derive(Component, Default)]
pub struct ViewerEntity;

pub struct ViewerPlugin;

impl Plugin for ViewerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ViewerSettings::load_or_default())
            .add_plugins((
                clipview_camera::OrbitCameraPlugin,
                viewport::ViewportPlugin,
                ClipPlugin,
            ));
    }
}
