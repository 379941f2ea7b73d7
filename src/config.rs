use anyhow::{bail, Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::core::{
    AnimationParams, ControlPolygon, TextureSlot, CONTROL_POINT_COUNT, DEFAULT_CONTROL_POINTS,
};

/// Window and off-screen framebuffer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 720,
            title: "FrameBuffer".to_string(),
        }
    }
}

/// Sprite image locations, relative to `directory`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub directory: PathBuf,
    pub background: String,
    pub left_wing: String,
    pub right_wing: String,
    pub body: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("assets"),
            background: "background.png".to_string(),
            left_wing: "dragon_wing.png".to_string(),
            right_wing: "dragon_wing.png".to_string(),
            body: "bat_body.png".to_string(),
        }
    }
}

impl AssetConfig {
    pub fn path_for(&self, slot: TextureSlot) -> PathBuf {
        let file = match slot {
            TextureSlot::Background => &self.background,
            TextureSlot::LeftWing => &self.left_wing,
            TextureSlot::RightWing => &self.right_wing,
            TextureSlot::Body => &self.body,
        };
        self.directory.join(file)
    }
}

/// Full demo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub animation: AnimationParams,
    /// Control point marker size in pixels; also sets the pick radius
    pub point_size: f32,
    pub control_points: [[f32; 2]; CONTROL_POINT_COUNT],
    pub assets: AssetConfig,
    pub clear_color: [f64; 4],
    pub show_hud: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            animation: AnimationParams::default(),
            point_size: 10.0,
            control_points: DEFAULT_CONTROL_POINTS.map(|p| p.to_array()),
            assets: AssetConfig::default(),
            clear_color: [1.0, 1.0, 1.0, 1.0],
            show_hud: true,
        }
    }
}

impl DemoConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("Invalid configuration JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to load config: {}", path.display()))
    }

    /// Config file named on the command line (or defaults), with CLI overrides applied
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(dir) = &cli.assets {
            config.assets.directory = dir.clone();
        }
        if let Some(speed) = cli.bezier_speed {
            config.animation.bezier_speed = speed;
        }
        if let Some(factor) = cli.speed_factor {
            config.animation.speed_factor = factor;
        }
        if cli.no_ui {
            config.show_hud = false;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            bail!(
                "Window size must be non-zero, got {}x{}",
                self.window.width,
                self.window.height
            );
        }
        if !(self.point_size.is_finite() && self.point_size > 0.0) {
            bail!("point_size must be a positive number, got {}", self.point_size);
        }
        if !self.animation.bezier_speed.is_finite() || !self.animation.speed_factor.is_finite() {
            bail!("Animation speeds must be finite");
        }
        if self.control_points.iter().flatten().any(|c| !c.is_finite()) {
            bail!("Control points must be finite");
        }
        Ok(())
    }

    pub fn control_polygon(&self) -> ControlPolygon {
        ControlPolygon::new(self.control_points.map(Vec2::from_array))
    }
}
