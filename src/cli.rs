use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "tftclock",
    author,
    version,
    about = "Fullscreen clock for small TFT touchscreens"
)]
pub struct Cli {
    /// Path to the configuration file (written with defaults on first run)
    #[arg(long, default_value = "clock_conf.json")]
    pub config: PathBuf,

    /// Render into a desktop window instead of the framebuffer
    #[arg(long)]
    pub windowed: bool,

    /// Override the framebuffer device from the configuration
    #[arg(long, value_name = "DEVICE")]
    pub fb: Option<String>,
}
