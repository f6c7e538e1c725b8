use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default)]
    pub colors: ColorConfig,
    #[serde(default)]
    pub label: LabelConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            colors: ColorConfig::default(),
            label: LabelConfig::default(),
            format: FormatConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl ClockConfig {
    /// Loads the configuration file, writing one with default values on the
    /// first run so it can be edited in place.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default = ClockConfig::default();
            default.save(path)?;
            log::info!("wrote default configuration to {}", path.display());
            return Ok(default);
        }

        let contents =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let mut config: ClockConfig = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.display.apply_defaults();
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "ColorConfig::default_background")]
    pub background: String,
    #[serde(default = "ColorConfig::default_time")]
    pub time: String,
    #[serde(default = "ColorConfig::default_date")]
    pub date: String,
    #[serde(default = "ColorConfig::default_label")]
    pub label: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: Self::default_background(),
            time: Self::default_time(),
            date: Self::default_date(),
            label: Self::default_label(),
        }
    }
}

impl ColorConfig {
    fn default_background() -> String {
        "#000000".to_string()
    }
    fn default_time() -> String {
        "#ff8c00".to_string()
    }
    fn default_date() -> String {
        "#9aa0a6".to_string()
    }
    fn default_label() -> String {
        "#9aa0a6".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "LabelConfig::default_text")]
    pub text: String,
    #[serde(default = "LabelConfig::default_show")]
    pub show: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            text: Self::default_text(),
            show: Self::default_show(),
        }
    }
}

impl LabelConfig {
    fn default_text() -> String {
        "BOTSERVER-HK".to_string()
    }
    fn default_show() -> bool {
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default = "FormatConfig::default_clock_24hr")]
    pub clock_24hr: bool,
    #[serde(default = "FormatConfig::default_date_style")]
    pub date_style: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            clock_24hr: Self::default_clock_24hr(),
            date_style: Self::default_date_style(),
        }
    }
}

impl FormatConfig {
    fn default_clock_24hr() -> bool {
        false
    }
    fn default_date_style() -> String {
        "weekday-mdy".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "DisplayConfig::default_fb_device")]
    pub fb_device: String,
    #[serde(default = "DisplayConfig::default_window_width")]
    pub window_width: u32,
    #[serde(default = "DisplayConfig::default_window_height")]
    pub window_height: u32,
    #[serde(default = "DisplayConfig::default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fb_device: Self::default_fb_device(),
            window_width: Self::default_window_width(),
            window_height: Self::default_window_height(),
            tick_ms: Self::default_tick_ms(),
        }
    }
}

impl DisplayConfig {
    fn default_fb_device() -> String {
        "/dev/fb1".to_string()
    }
    const fn default_window_width() -> u32 {
        320
    }
    const fn default_window_height() -> u32 {
        240
    }
    const fn default_tick_ms() -> u64 {
        250
    }

    fn apply_defaults(&mut self) {
        if self.fb_device.trim().is_empty() {
            self.fb_device = Self::default_fb_device();
        }
        if self.tick_ms == 0 {
            log::warn!("tick_ms 0 is not usable, using 250");
            self.tick_ms = Self::default_tick_ms();
        }
        if self.window_width == 0 || self.window_height == 0 {
            self.window_width = Self::default_window_width();
            self.window_height = Self::default_window_height();
        }
    }
}
