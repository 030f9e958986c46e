//! Sandbox configuration file handling

use anyhow::{Context, Result};
use kurve_animation::{ClockConfig, Easing};
use kurve_paint::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default config file name
pub const CONFIG_FILE: &str = "kurve.toml";

/// Top-level sandbox configuration (kurve.toml)
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct SandboxConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub curve: CurveConfig,
    #[serde(default)]
    pub clock: ClockSection,
    #[serde(default)]
    pub sprite: SpriteConfig,
}

/// Container the control points live in
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    700
}

fn default_height() -> u32 {
    500
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Curve runner configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CurveConfig {
    /// Number of control points, start and end included
    #[serde(default = "default_points")]
    pub points: usize,
    /// Placement seed; a random one is picked and logged when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Side of the square drag handles
    #[serde(default = "default_point_size")]
    pub point_size: f32,
    /// Virtual run time in milliseconds
    #[serde(default = "default_curve_duration")]
    pub duration_ms: u64,
}

fn default_points() -> usize {
    4
}

fn default_point_size() -> f32 {
    15.0
}

fn default_curve_duration() -> u64 {
    5000
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            points: default_points(),
            seed: None,
            point_size: default_point_size(),
            duration_ms: default_curve_duration(),
        }
    }
}

/// Animation clock tuning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClockSection {
    #[serde(default = "default_step")]
    pub step: f32,
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
    #[serde(default = "default_segments")]
    pub segments: usize,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default = "default_line_width")]
    pub line_width: f32,
    /// `#rrggbb` or `#rrggbbaa`
    #[serde(default = "default_line_color")]
    pub line_color: String,
}

fn default_step() -> f32 {
    1.5
}

fn default_interval() -> u64 {
    25
}

fn default_segments() -> usize {
    15
}

fn default_line_width() -> f32 {
    4.0
}

fn default_line_color() -> String {
    "#c7c7c7".to_string()
}

impl Default for ClockSection {
    fn default() -> Self {
        Self {
            step: default_step(),
            interval_ms: default_interval(),
            segments: default_segments(),
            easing: Easing::default(),
            line_width: default_line_width(),
            line_color: default_line_color(),
        }
    }
}

impl ClockSection {
    /// Build the clock configuration, parsing the line color
    pub fn to_clock_config(&self) -> Result<ClockConfig> {
        let line_color = Color::parse_hex(&self.line_color)
            .with_context(|| format!("Invalid line color {:?}", self.line_color))?;
        Ok(ClockConfig {
            step: self.step,
            interval: Duration::from_millis(self.interval_ms),
            segments: self.segments,
            easing: self.easing,
            line_width: self.line_width,
            line_color,
            ..ClockConfig::default()
        })
    }
}

/// Sprite runner configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpriteConfig {
    #[serde(default = "default_sheet")]
    pub sheet: String,
    #[serde(default = "default_frame_side")]
    pub frame_width: u32,
    #[serde(default = "default_frame_side")]
    pub frame_height: u32,
    /// Sheet row to play, counted from 1
    #[serde(default = "default_row")]
    pub row: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_true")]
    pub looping: bool,
    /// Row played once after the main row, counted from 1
    #[serde(default)]
    pub chain_row: Option<u32>,
    /// Virtual run time in milliseconds
    #[serde(default = "default_sprite_duration")]
    pub duration_ms: u64,
}

fn default_sheet() -> String {
    "assets/crown.png".to_string()
}

fn default_frame_side() -> u32 {
    100
}

fn default_row() -> u32 {
    2
}

fn default_fps() -> u32 {
    12
}

fn default_true() -> bool {
    true
}

fn default_sprite_duration() -> u64 {
    2000
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            sheet: default_sheet(),
            frame_width: default_frame_side(),
            frame_height: default_frame_side(),
            row: default_row(),
            fps: default_fps(),
            looping: true,
            chain_row: None,
            duration_ms: default_sprite_duration(),
        }
    }
}

impl SandboxConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Write the configuration to `path`, refusing to replace an existing
    /// file unless `force` is set
    pub fn save(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            anyhow::bail!(
                "{} already exists. Use --force to overwrite it.",
                path.display()
            );
        }
        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = SandboxConfig::from_toml("").unwrap();
        assert_eq!(config, SandboxConfig::default());
        assert_eq!(config.window.width, 700);
        assert_eq!(config.curve.points, 4);
        assert_eq!(config.sprite.fps, 12);
        assert_eq!(config.sprite.row, 2);
    }

    #[test]
    fn test_partial_tables_keep_other_defaults() {
        let config = SandboxConfig::from_toml(
            r##"
            [curve]
            points = 6
            seed = 42

            [clock]
            easing = "ease-in-out-cubic"
            line_color = "#ff0000"
            "##,
        )
        .unwrap();

        assert_eq!(config.curve.points, 6);
        assert_eq!(config.curve.seed, Some(42));
        assert_eq!(config.curve.point_size, 15.0);
        assert_eq!(config.clock.easing, Easing::EaseInOutCubic);
        assert_eq!(config.clock.step, 1.5);

        let clock = config.clock.to_clock_config().unwrap();
        assert_eq!(clock.line_color.to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(clock.interval, Duration::from_millis(25));
    }

    #[test]
    fn test_default_clock_matches_library_default() {
        let clock = ClockSection::default().to_clock_config().unwrap();
        let library = ClockConfig::default();
        assert_eq!(clock.step, library.step);
        assert_eq!(clock.interval, library.interval);
        assert_eq!(clock.segments, library.segments);
        assert_eq!(clock.line_color.to_rgba8(), library.line_color.to_rgba8());
    }

    #[test]
    fn test_bad_color_rejected() {
        let section = ClockSection {
            line_color: "grey".to_string(),
            ..ClockSection::default()
        };
        assert!(section.to_clock_config().is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = SandboxConfig::default();
        config.sprite.chain_row = Some(3);
        config.curve.seed = Some(7);
        let text = config.to_toml().unwrap();
        assert_eq!(SandboxConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_unknown_easing_rejected() {
        assert!(SandboxConfig::from_toml("[clock]\neasing = \"bouncy\"").is_err());
    }
}
