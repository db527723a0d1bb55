use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::utils::paths::AppPaths;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for sort markers and search icons
    pub use_glyphs: bool,

    /// Show the global search input above the table
    pub show_search: bool,

    /// Show the "Showing X to Y of Z entries" line
    pub show_page_info: bool,

    /// Show the "Go to page" input
    pub show_page_input: bool,

    /// Show the windowed pagination buttons
    pub show_pagination: bool,

    /// Show the page-size chooser
    pub show_page_size_chooser: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Quiet window before a search input propagates, in milliseconds
    pub debounce_ms: u64,

    /// Rows per page when a table first renders
    pub default_page_size: usize,

    /// Choices offered by the page-size chooser
    pub page_size_options: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "default", "dark", "light"
    pub color_scheme: String,

    /// Accent color for highlighted options and focused borders
    pub accent: String,

    /// Header row color
    pub header: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            behavior: BehaviorConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            show_search: true,
            show_page_info: true,
            show_page_input: true,
            show_pagination: true,
            show_page_size_chooser: true,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            default_page_size: 10,
            page_size_options: vec![5, 10, 25, 50, 100, 500],
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            color_scheme: "default".to_string(),
            accent: "cyan".to_string(),
            header: "blue".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, creating it on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        AppPaths::config_file()
    }

    /// Default config file with comments, for --generate-config
    pub fn create_default_with_comments() -> String {
        r#"# datadeck configuration file
# Location: ~/.config/datadeck/config.toml (Linux/macOS)
#           %APPDATA%\datadeck\config.toml (Windows)

[display]
# Use Unicode glyphs for sort markers and the search icon
# Set to false for ASCII-only mode (better compatibility)
use_glyphs = true

# Show the global search input above the table
show_search = true

# Show the "Showing X to Y of Z entries" line
show_page_info = true

# Show the "Go to page" input
show_page_input = true

# Show the windowed pagination buttons
show_pagination = true

# Show the page-size chooser
show_page_size_chooser = true

[behavior]
# Quiet window before a search input propagates (milliseconds)
debounce_ms = 500

# Rows per page when a table first renders
default_page_size = 10

# Choices offered by the page-size chooser
page_size_options = [5, 10, 25, 50, 100, 500]

[theme]
# Color scheme: "default", "dark", "light"
color_scheme = "default"

# Accent color: "yellow", "red", "green", "blue", "magenta", "cyan", "white"
accent = "cyan"

# Header row color
header = "blue"
"#
        .to_string()
    }
}
