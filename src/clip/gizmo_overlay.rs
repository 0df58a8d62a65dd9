use bevy::prelude::*;

use super::{ClipPointer, ClipTool};
use crate::config::ViewerSettings;

/// Immediate-mode wireframe over the box edges. Edges bordering the hovered
/// or dragged face light up in the active color.
pub fn draw_clip_box_edges(
    tool: Res<ClipTool>,
    pointer: Res<ClipPointer>,
    settings: Res<ViewerSettings>,
    mut gizmos: Gizmos,
) {
    let Some(session) = &tool.session else {
        return;
    };
    let active = pointer.0.active_face();
    let base = settings.line_color();
    let highlight = settings.line_active_color();

    for line in &session.clip_box.lines {
        let color = match active {
            Some(face) if line.borders(face) => highlight,
            _ => base,
        };
        gizmos.line(line.start, line.end, color);
    }
}
