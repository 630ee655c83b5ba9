use crate::errors::AppResult;
use crate::measure::TextStyle;
use clap::{Parser, ValueEnum};
use config::{
    Config as ConfigCrate, ConfigError as ConfigCrateError, Environment, File, Map, Source, Value,
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// Defaults tuned for a 14px medium-weight label font
const DEFAULT_WRAP_WIDTH: usize = 25;
const DEFAULT_FONT_SIZE: f64 = 14.0;
const DEFAULT_FONT_WEIGHT: u16 = 500;
const DEFAULT_CHAR_WIDTH_FACTOR: f64 = 0.6;
const DEFAULT_LINE_HEIGHT: f64 = 18.0;
const DEFAULT_PADDING_X: f64 = 16.0;
const DEFAULT_PADDING_Y: f64 = 12.0;
const DEFAULT_MIN_LEAF_ANGLE: f64 = 0.2;
const DEFAULT_WIDTH_TO_ANGLE_DIVISOR: f64 = 250.0;
const DEFAULT_SIBLING_GAP: f64 = 0.05;
const DEFAULT_LEVEL_SPACING: f64 = 120.0;
const DEFAULT_CLEARANCE: f64 = 50.0;

const ENV_PREFIX: &str = "VISUALMIND";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Positioned mind map as pretty JSON
    #[default]
    Json,
    /// Indented outline of the parsed tree
    Outline,
}

// Optional fields so each source only overrides what it sets.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    wrap_width: Option<usize>,
    font_size: Option<f64>,
    font_weight: Option<u16>,
    char_width_factor: Option<f64>,
    line_height: Option<f64>,
    padding_x: Option<f64>,
    padding_y: Option<f64>,
    min_leaf_angle: Option<f64>,
    width_to_angle_divisor: Option<f64>,
    sibling_gap: Option<f64>,
    level_spacing: Option<f64>,
    clearance: Option<f64>,
    format: Option<OutputFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Wrap budget for node labels, in display columns
    pub wrap_width: usize,
    pub font_size: f64,
    pub font_weight: u16,
    /// Average glyph advance as a fraction of the font size
    pub char_width_factor: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    /// Smallest angle (radians) a leaf may claim
    pub min_leaf_angle: f64,
    /// Leaf width divided by this gives its angle in radians
    pub width_to_angle_divisor: f64,
    /// Angle (radians) left between neighbouring sibling subtrees
    pub sibling_gap: f64,
    pub level_spacing: f64,
    pub clearance: f64,
    pub format: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wrap_width: DEFAULT_WRAP_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            font_weight: DEFAULT_FONT_WEIGHT,
            char_width_factor: DEFAULT_CHAR_WIDTH_FACTOR,
            line_height: DEFAULT_LINE_HEIGHT,
            padding_x: DEFAULT_PADDING_X,
            padding_y: DEFAULT_PADDING_Y,
            min_leaf_angle: DEFAULT_MIN_LEAF_ANGLE,
            width_to_angle_divisor: DEFAULT_WIDTH_TO_ANGLE_DIVISOR,
            sibling_gap: DEFAULT_SIBLING_GAP,
            level_spacing: DEFAULT_LEVEL_SPACING,
            clearance: DEFAULT_CLEARANCE,
            format: OutputFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_size: self.font_size,
            font_weight: self.font_weight,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wrap_width == 0 {
            return Err(ConfigError::ValidationError(
                "wrap_width must be at least 1".to_string(),
            ));
        }

        let positive = [
            ("font_size", self.font_size),
            ("line_height", self.line_height),
            ("width_to_angle_divisor", self.width_to_angle_divisor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let non_negative = [
            ("char_width_factor", self.char_width_factor),
            ("padding_x", self.padding_x),
            ("padding_y", self.padding_y),
            ("min_leaf_angle", self.min_leaf_angle),
            ("sibling_gap", self.sibling_gap),
            ("level_spacing", self.level_spacing),
            ("clearance", self.clearance),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        Ok(())
    }
}

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "Turn an indented outline into a radial mind map", long_about = None)]
pub struct CliArgs {
    /// Outline file to lay out (reads stdin when omitted)
    pub filename: Option<PathBuf>,

    /// Title of the map; defaults to the file name
    #[arg(long)]
    pub title: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a custom configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub debug_config: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    #[arg(long)]
    pub wrap_width: Option<usize>,
    #[arg(long)]
    pub font_size: Option<f64>,
    #[arg(long)]
    pub font_weight: Option<u16>,
    #[arg(long)]
    pub char_width_factor: Option<f64>,
    #[arg(long)]
    pub line_height: Option<f64>,
    #[arg(long)]
    pub padding_x: Option<f64>,
    #[arg(long)]
    pub padding_y: Option<f64>,
    #[arg(long)]
    pub min_leaf_angle: Option<f64>,
    #[arg(long)]
    pub width_to_angle_divisor: Option<f64>,
    #[arg(long)]
    pub sibling_gap: Option<f64>,
    #[arg(long)]
    pub level_spacing: Option<f64>,
    #[arg(long)]
    pub clearance: Option<f64>,
}

/// Resolve the configuration: args > environment > file > defaults.
pub fn load_config(args: &CliArgs) -> AppResult<AppConfig> {
    let env_source = Environment::with_prefix(ENV_PREFIX).try_parsing(true);
    // Missing variables are fine; only a broken environment source is ignored here.
    let env_map: Map<String, Value> = env_source.collect().unwrap_or_default();

    Ok(build_config_from_args(args, Some(env_map))?)
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "visualmind").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn build_config_from_args(
    args: &CliArgs,
    override_source: Option<Map<String, Value>>,
) -> Result<AppConfig, ConfigError> {
    let config_file_path = args.config.clone().or_else(default_config_path);

    let mut config_builder = ConfigCrate::builder();

    if let Some(path) = config_file_path {
        // An explicit --config must exist; the default location is optional
        let required = args.config.is_some();
        config_builder = config_builder.add_source(File::from(path).required(required));
    }

    if let Some(overrides) = override_source {
        for (key, value) in overrides {
            config_builder = config_builder.set_override(key, value)?;
        }
    }

    let loaded: FileConfig = config_builder.build()?.try_deserialize()?;

    let config = AppConfig {
        wrap_width: args
            .wrap_width
            .or(loaded.wrap_width)
            .unwrap_or(DEFAULT_WRAP_WIDTH),
        font_size: args
            .font_size
            .or(loaded.font_size)
            .unwrap_or(DEFAULT_FONT_SIZE),
        font_weight: args
            .font_weight
            .or(loaded.font_weight)
            .unwrap_or(DEFAULT_FONT_WEIGHT),
        char_width_factor: args
            .char_width_factor
            .or(loaded.char_width_factor)
            .unwrap_or(DEFAULT_CHAR_WIDTH_FACTOR),
        line_height: args
            .line_height
            .or(loaded.line_height)
            .unwrap_or(DEFAULT_LINE_HEIGHT),
        padding_x: args
            .padding_x
            .or(loaded.padding_x)
            .unwrap_or(DEFAULT_PADDING_X),
        padding_y: args
            .padding_y
            .or(loaded.padding_y)
            .unwrap_or(DEFAULT_PADDING_Y),
        min_leaf_angle: args
            .min_leaf_angle
            .or(loaded.min_leaf_angle)
            .unwrap_or(DEFAULT_MIN_LEAF_ANGLE),
        width_to_angle_divisor: args
            .width_to_angle_divisor
            .or(loaded.width_to_angle_divisor)
            .unwrap_or(DEFAULT_WIDTH_TO_ANGLE_DIVISOR),
        sibling_gap: args
            .sibling_gap
            .or(loaded.sibling_gap)
            .unwrap_or(DEFAULT_SIBLING_GAP),
        level_spacing: args
            .level_spacing
            .or(loaded.level_spacing)
            .unwrap_or(DEFAULT_LEVEL_SPACING),
        clearance: args
            .clearance
            .or(loaded.clearance)
            .unwrap_or(DEFAULT_CLEARANCE),
        format: args.format.or(loaded.format).unwrap_or_default(),
    };

    config.validate()?;
    Ok(config)
}
