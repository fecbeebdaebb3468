use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{VectaError, VectaResult};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of top-level history entries. `0` keeps everything.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: 1000 }
    }
}

/// What the animator does when it advances past the end frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    #[default]
    Repeat,
    Stop,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub start_frame: i32,
    pub end_frame: i32,
    pub fps: f64,
    pub play_mode: PlayMode,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            start_frame: 1,
            end_frame: 100,
            fps: 24.0,
            play_mode: PlayMode::Repeat,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathConfig {
    /// Number of knots used when an ellipse is converted to a path.
    pub ellipse_segments: i64,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            ellipse_segments: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EditorConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

impl EditorConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn load_from_file(path: &Path) -> VectaResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)
            .map_err(|e| VectaError::config(e.to_string(), path))?;
        config.validate().map_err(|msg| VectaError::config(msg, path))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> VectaResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| VectaError::config(e.to_string(), path))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.animation.end_frame < self.animation.start_frame {
            return Err(format!(
                "animation end_frame {} is before start_frame {}",
                self.animation.end_frame, self.animation.start_frame
            ));
        }
        if self.animation.fps <= 0.0 {
            return Err("animation fps must be positive".into());
        }
        if self.paths.ellipse_segments < 3 {
            return Err("paths.ellipse_segments must be at least 3".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_sections() {
        let config = EditorConfig::from_toml_str("[history]\nmax_entries = 5\n").unwrap();
        assert_eq!(config.history.max_entries, 5);
        assert_eq!(config.animation.start_frame, 1);
        assert_eq!(config.animation.play_mode, PlayMode::Repeat);
        assert_eq!(config.paths.ellipse_segments, 4);
    }

    #[test]
    fn test_play_mode_lowercase() {
        let config = EditorConfig::from_toml_str(
            "[animation]\nstart_frame = 0\nend_frame = 10\nfps = 30.0\nplay_mode = \"stop\"\n",
        )
        .unwrap();
        assert_eq!(config.animation.play_mode, PlayMode::Stop);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut config = EditorConfig::default();
        config.animation.start_frame = 50;
        config.animation.end_frame = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vecta.toml");
        let mut config = EditorConfig::default();
        config.history.max_entries = 42;
        config.save_to_file(&path).unwrap();
        let loaded = EditorConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.history.max_entries, 42);
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[history]\nmax_entries = \"many\"\n").unwrap();
        let err = EditorConfig::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
