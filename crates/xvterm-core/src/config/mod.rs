pub mod theme;

use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub use theme::Theme;

use crate::cell::CursorStyle;
use crate::renderer::Geometry;

/// Compile-time fallback shell, matching `original_source/config.h`'s
/// `SHELL "/bin/bash"`. `Config::shell()` prefers `$SHELL` and an explicit
/// `[general] shell = "..."` override over this constant.
pub const DEFAULT_SHELL: &str = "/bin/bash";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub font: FontConfig,
    pub geometry: GeometryConfig,
    pub cursor: CursorConfig,
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub shell: String,
    pub working_directory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub size: f32,
}

/// The initial grid size plus the cell-pixel geometry the renderer draws
/// with. `original_source/config.h`'s `CHAR_W`/`CHAR_H`/`TOPMOST`/
/// `LEFTMOST` (6, 12, 10, 2) are the defaults; `cols`/`rows` default to a
/// conventional 80x24 rather than the source's conflated `WIDTH`/`HEIGHT`
/// (71x307, which the source uses as both the X window's pixel size and
/// the grid's column/row count).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub cols: u16,
    pub rows: u16,
    pub char_w: u32,
    pub char_h: u32,
    pub topmost: i32,
    pub leftmost: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub style: String,
    pub blink: bool,
    pub blink_interval_ms: u64,
}

impl Config {
    /// Load config from the default path, falling back to defaults if
    /// absent. Malformed config is a load error, not silently ignored.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_dir() -> PathBuf {
        ProjectDirs::from("", "", "xvterm")
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(|| dirs_fallback().join("xvterm"))
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Resolve the shell to use: explicit config, then `$SHELL`, then
    /// [`DEFAULT_SHELL`].
    pub fn shell(&self) -> String {
        if !self.general.shell.is_empty() {
            return self.general.shell.clone();
        }
        std::env::var("SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_string())
    }

    pub fn working_directory(&self) -> PathBuf {
        if !self.general.working_directory.is_empty() {
            return PathBuf::from(&self.general.working_directory);
        }
        dirs_fallback()
    }

    pub fn render_geometry(&self) -> Geometry {
        Geometry {
            char_w: self.geometry.char_w,
            char_h: self.geometry.char_h,
            topmost: self.geometry.topmost,
            leftmost: self.geometry.leftmost,
        }
    }

    /// Initial window size in pixels, derived from `geometry.cols`/`rows`
    /// the same way the event loop's resize handler converts pixels back
    /// to cols/rows (inverse of `pixel/char - margin`).
    pub fn initial_pixel_size(&self) -> (u32, u32) {
        let g = &self.geometry;
        let w = g.cols as u32 * g.char_w + 2 * g.leftmost as u32;
        let h = (g.rows as u32 + 1) * g.char_h;
        (w, h)
    }

    pub fn cursor_style(&self) -> CursorStyle {
        match self.cursor.style.as_str() {
            "line" => CursorStyle::Line,
            "none" => CursorStyle::None,
            _ => CursorStyle::Block,
        }
    }
}

fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            font: FontConfig::default(),
            geometry: GeometryConfig::default(),
            cursor: CursorConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            shell: String::new(),
            working_directory: String::new(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "fixed".to_string(),
            size: 14.0,
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            char_w: 6,
            char_h: 12,
            topmost: 10,
            leftmost: 2,
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            style: "block".to_string(),
            blink: true,
            blink_interval_ms: 530,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_falls_back_to_env_then_default() {
        let cfg = Config::default();
        std::env::remove_var("SHELL");
        assert_eq!(cfg.shell(), DEFAULT_SHELL);
    }

    #[test]
    fn explicit_shell_overrides_everything() {
        let mut cfg = Config::default();
        cfg.general.shell = "/bin/zsh".to_string();
        assert_eq!(cfg.shell(), "/bin/zsh");
    }

    #[test]
    fn initial_pixel_size_matches_geometry_formula() {
        let cfg = Config::default();
        let (w, h) = cfg.initial_pixel_size();
        assert_eq!(w, 80 * 6 + 2 * 2);
        assert_eq!(h, (24 + 1) * 12);
    }

    #[test]
    fn unknown_cursor_style_falls_back_to_block() {
        let mut cfg = Config::default();
        cfg.cursor.style = "bogus".to_string();
        assert_eq!(cfg.cursor_style(), CursorStyle::Block);
    }
}
