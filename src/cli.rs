// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "bat-flight")]
#[command(about = "Bat sprite flying along an editable Bezier curve", long_about = None)]
pub struct Cli {
    /// Disable the HUD overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory containing the sprite images
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Curve laps per second
    #[arg(long)]
    pub bezier_speed: Option<f32>,

    /// Spin and flap speed multiplier
    #[arg(long)]
    pub speed_factor: Option<f32>,
}
