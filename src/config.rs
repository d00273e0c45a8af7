// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::charset::PRESETS;
use crate::error::ConfigError;
use crate::palette::Rgb;
use crate::runtime::ColorMode;

pub const DEFAULT_BACKGROUND: Rgb = Rgb::new(0x00, 0x2D, 0x72);
pub const DEFAULT_GLYPH: Rgb = Rgb::new(0x68, 0xAC, 0xE5);
pub const DEFAULT_FADE: f32 = 0.08;
pub const DEFAULT_CELL_SIZE: u32 = 16;
/// Keeps `u16::MAX` terminal cells addressable in `u32` pixels.
pub const MAX_CELL_SIZE: u32 = 4096;

pub const DEFAULT_PANELS: [&str; 4] = ["about", "updates", "experience", "contact"];

/// Smallest fall speed, in cell heights per tick.
pub const MIN_SPEED_CELLS: f32 = 0.02;

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn terminal_is_utf8() -> bool {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.is_empty())
        .is_some_and(|v| {
            let v = v.to_ascii_uppercase();
            v.contains("UTF-8") || v.contains("UTF8")
        })
}

pub fn detect_color_mode() -> ColorMode {
    let colorterm = std::env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = std::env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }

    ColorMode::Color16
}

pub fn color_mode_from_bits(bits: u8) -> Result<ColorMode, ConfigError> {
    match bits {
        0 => Ok(ColorMode::Mono),
        4 | 16 => Ok(ColorMode::Color16),
        8 => Ok(ColorMode::Color256),
        24 => Ok(ColorMode::TrueColor),
        _ => Err(ConfigError::OutOfRange {
            name: "--colormode",
            value: bits.to_string(),
            min: "0".to_string(),
            max: "24 (allowed: 0,16,8,24)".to_string(),
        }),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct F32Range {
    pub low: f32,
    pub high: f32,
}

impl FromStr for F32Range {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| "expected: LOW,HIGH".to_string())?;
        let low: f32 = a
            .trim()
            .parse()
            .map_err(|_| "invalid low value".to_string())?;
        let high: f32 = b
            .trim()
            .parse()
            .map_err(|_| "invalid high value".to_string())?;
        if !low.is_finite() || !high.is_finite() || low <= 0.0 || low > high {
            return Err("range must be finite, >0 and low <= high".to_string());
        }
        Ok(Self { low, high })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct U16Range {
    pub low: u16,
    pub high: u16,
}

impl FromStr for U16Range {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| "expected: NUM1,NUM2".to_string())?;
        let low: u16 = a
            .trim()
            .parse()
            .map_err(|_| "invalid low value".to_string())?;
        let high: u16 = b
            .trim()
            .parse()
            .map_err(|_| "invalid high value".to_string())?;
        if low == 0 || high == 0 || low > high {
            return Err("range must be >0 and low <= high".to_string());
        }
        Ok(Self { low, high })
    }
}

/// `ID=TEXT` pair given to `--content`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelContent {
    pub panel: String,
    pub text: String,
}

impl FromStr for PanelContent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, text) = s
            .split_once('=')
            .ok_or_else(|| "expected: PANEL=TEXT".to_string())?;
        let id = id.trim();
        if id.is_empty() {
            return Err("panel id must not be empty".to_string());
        }
        // Literal "\n" in shell arguments breaks lines.
        Ok(Self {
            panel: id.to_string(),
            text: text.replace("\\n", "\n"),
        })
    }
}

/// Colors and geometry the rain draws with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainConfig {
    pub background: Rgb,
    pub glyph: Rgb,
    pub fade_opacity: f32,
    pub cell_size: u32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND,
            glyph: DEFAULT_GLYPH,
            fade_opacity: DEFAULT_FADE,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl RainConfig {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(self.fade_opacity > 0.0 && self.fade_opacity < 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "--fade",
                value: self.fade_opacity.to_string(),
                min: "0 (exclusive)".to_string(),
                max: "1 (exclusive)".to_string(),
            });
        }
        require_range("--cell-size", self.cell_size, 1, MAX_CELL_SIZE)?;
        Ok(self)
    }
}

/// Visual tunables of the simulation. None of these are contracts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RainParams {
    /// Fall speed range in cell heights per tick.
    pub speed: F32Range,
    /// Ticks between head glyph changes.
    pub glyph_ticks: U16Range,
    /// Highlighted glyphs drawn behind the head, 0..=2.
    pub trail_highlight: u8,
    /// Recycle margin as a fraction of the surface height.
    pub recycle_spread: f32,
}

impl Default for RainParams {
    fn default() -> Self {
        Self {
            speed: F32Range {
                low: 0.25,
                high: 0.75,
            },
            glyph_ticks: U16Range { low: 4, high: 12 },
            trail_highlight: 2,
            recycle_spread: 0.5,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "bluerain", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        long = "background",
        default_value = "#002D72",
        help_heading = "APPEARANCE",
        help = "Background color (#RRGGBB)"
    )]
    pub background: String,

    #[arg(
        long = "glyph",
        default_value = "#68ACE5",
        help_heading = "APPEARANCE",
        help = "Glyph / accent color (#RRGGBB)"
    )]
    pub glyph: String,

    #[arg(
        long = "fade",
        default_value_t = DEFAULT_FADE,
        help_heading = "APPEARANCE",
        help = "Trail fade opacity per frame (exclusive 0..1)"
    )]
    pub fade: f32,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8,24). Default: detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u8>,

    #[arg(
        long = "trail",
        default_value_t = 2,
        help_heading = "APPEARANCE",
        help = "Highlighted glyphs behind each head (min 0 max 2)"
    )]
    pub trail: u8,

    #[arg(
        long = "cell-size",
        default_value_t = DEFAULT_CELL_SIZE,
        help_heading = "RAIN",
        help = "Glyph cell size in pixels; one terminal cell is one glyph cell"
    )]
    pub cell_size: u32,

    #[arg(
        long = "speed",
        default_value = "0.25,0.75",
        help_heading = "RAIN",
        help = "Fall speed range in cells per frame: LOW,HIGH"
    )]
    pub speed: F32Range,

    #[arg(
        long = "glyph-ticks",
        default_value = "4,12",
        help_heading = "RAIN",
        help = "Frames between head glyph changes: LOW,HIGH"
    )]
    pub glyph_ticks: U16Range,

    #[arg(
        long = "charset",
        default_value = "auto",
        help_heading = "RAIN",
        help = "Charset preset (see --list-charsets)"
    )]
    pub charset: String,

    #[arg(
        long = "chars",
        help_heading = "RAIN",
        help = "Extra glyph ranges as hex code point pairs, e.g. 30,39,41,46"
    )]
    pub chars: Option<String>,

    #[arg(
        long = "seed",
        help_heading = "RAIN",
        help = "Seed for the rain (random if unset)"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 30.0,
        help_heading = "GENERAL",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write logs to this file (filter with RUST_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "panels",
        value_delimiter = ',',
        default_values_t = DEFAULT_PANELS.map(String::from),
        help_heading = "PANELS",
        help = "The four panel ids, in navigation order"
    )]
    pub panels: Vec<String>,

    #[arg(
        long = "default-panel",
        default_value = "about",
        help_heading = "PANELS",
        help = "Panel shown at startup"
    )]
    pub default_panel: String,

    #[arg(
        long = "content",
        help_heading = "PANELS",
        help = "Panel text as PANEL=TEXT (repeatable; \\n breaks lines)"
    )]
    pub content: Vec<PanelContent>,

    #[arg(
        long = "no-border",
        help_heading = "PANELS",
        help = "Draw the panel box without border characters"
    )]
    pub no_border: bool,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List available charset presets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

fn require_range<T: PartialOrd + ToString>(
    name: &'static str,
    v: T,
    min: T,
    max: T,
) -> Result<T, ConfigError> {
    if v < min || v > max {
        return Err(ConfigError::OutOfRange {
            name,
            value: v.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(v)
}

impl Args {
    pub fn rain_config(&self) -> Result<RainConfig, ConfigError> {
        RainConfig {
            background: self.background.parse()?,
            glyph: self.glyph.parse()?,
            fade_opacity: self.fade,
            cell_size: self.cell_size,
        }
        .validate()
    }

    pub fn rain_params(&self) -> Result<RainParams, ConfigError> {
        let low = require_range("--speed low", self.speed.low, MIN_SPEED_CELLS, 64.0)?;
        let high = require_range("--speed high", self.speed.high, MIN_SPEED_CELLS, 64.0)?;
        Ok(RainParams {
            speed: F32Range { low, high },
            glyph_ticks: self.glyph_ticks,
            trail_highlight: require_range("--trail", self.trail, 0, 2)?,
            ..RainParams::default()
        })
    }

    pub fn fps(&self) -> Result<f64, ConfigError> {
        if !self.fps.is_finite() {
            return Err(ConfigError::OutOfRange {
                name: "--fps",
                value: self.fps.to_string(),
                min: "1".to_string(),
                max: "240".to_string(),
            });
        }
        require_range("--fps", self.fps, 1.0, 240.0)
    }

    /// `None` when no positive duration was requested.
    pub fn duration_secs(&self) -> Result<Option<f64>, ConfigError> {
        match self.duration {
            Some(s) if s.is_finite() && s > 0.0 => {
                require_range("--duration", s, 0.1, 86400.0).map(Some)
            }
            Some(s) if !s.is_finite() => Err(ConfigError::OutOfRange {
                name: "--duration",
                value: s.to_string(),
                min: "0.1".to_string(),
                max: "86400".to_string(),
            }),
            _ => Ok(None),
        }
    }

    pub fn color_mode(&self) -> Result<ColorMode, ConfigError> {
        match self.colormode {
            Some(bits) => color_mode_from_bits(bits),
            None => Ok(detect_color_mode()),
        }
    }
}

pub fn print_list_charsets() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE CHARSET PRESETS:\x1b[0m");
    } else {
        println!("AVAILABLE CHARSET PRESETS:");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    for (name, desc) in PRESETS {
        println!("{:<12} {}", name, desc);
    }
}
