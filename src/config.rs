use std::fs;
use std::path::Path;

use anyhow::Context;
use bevy::prelude::*;
use serde::Deserialize;

use clipview_geometry::DEFAULT_MIN_SIZE;

/// Optional settings file, read from the working directory at startup.
pub const SETTINGS_PATH: &str = "clipview.json";

/// Viewer appearance and clip-box tuning. Every field is optional in the
/// file; missing fields fall back to the defaults below.
#[derive(Resource, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ViewerSettings {
    /// Minimum thickness the clip box may be shrunk to on any axis.
    pub min_size: f32,
    /// Opacity of the translucent box faces that back the cross-section.
    pub face_opacity: f32,
    pub line_color: [f32; 3],
    pub line_active_color: [f32; 3],
    /// Spawn a cap-box overlay that tracks the clip volume.
    pub cap_enabled: bool,
    pub cap_color: [f32; 4],
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            face_opacity: 0.2,
            // 0xe1f2fb / 0x00ffff, the classic wireframe pair
            line_color: [0.882, 0.949, 0.984],
            line_active_color: [0.0, 1.0, 1.0],
            cap_enabled: false,
            cap_color: [0.85, 0.85, 0.85, 0.15],
        }
    }
}

impl ViewerSettings {
    pub fn load_or_default() -> Self {
        match Self::load(Path::new(SETTINGS_PATH)) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(err) => {
                warn!("ignoring {SETTINGS_PATH}: {err:#}");
                Self::default()
            }
        }
    }

    fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(settings))
    }

    pub fn line_color(&self) -> Color {
        let [r, g, b] = self.line_color;
        Color::srgb(r, g, b)
    }

    pub fn line_active_color(&self) -> Color {
        let [r, g, b] = self.line_active_color;
        Color::srgb(r, g, b)
    }

    pub fn cap_color(&self) -> Color {
        let [r, g, b, a] = self.cap_color;
        Color::srgba(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let settings: ViewerSettings =
            serde_json::from_str(r#"{ "face_opacity": 0.5, "cap_enabled": true }"#).unwrap();
        assert_eq!(settings.face_opacity, 0.5);
        assert!(settings.cap_enabled);
        assert_eq!(settings.min_size, DEFAULT_MIN_SIZE);
        assert_eq!(settings.line_active_color, [0.0, 1.0, 1.0]);
    }

    #[test]
    fn empty_object_is_all_defaults() {
        let settings: ViewerSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.min_size, ViewerSettings::default().min_size);
    }
}
