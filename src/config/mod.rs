use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Directory name under the platform config dir.
pub const APP_DIR: &str = "mdedit";

/// Editor configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Editing behaviour
    #[serde(default)]
    pub editor: EditorConfig,

    /// Colours
    #[serde(default)]
    pub ui: UiConfig,
}

/// Editor settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EditorConfig {
    /// Rows moved by Ctrl-E / Ctrl-Y
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: usize,

    /// Number of actions kept in history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Show line numbers
    #[serde(default = "default_true")]
    pub show_line_numbers: bool,

    /// Number rows relative to the cursor row
    #[serde(default = "default_true")]
    pub relative_line_numbers: bool,
}

/// Colour names understood by ratatui (`"yellow"`, `"#ffaa00"`, `"244"`).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UiConfig {
    #[serde(default = "default_heading")]
    pub heading: String,

    #[serde(default = "default_blockquote")]
    pub blockquote: String,

    #[serde(default = "default_code")]
    pub code: String,

    #[serde(default = "default_list_marker")]
    pub list_marker: String,

    #[serde(default = "default_line_number")]
    pub line_number: String,

    #[serde(default = "default_link")]
    pub link: String,
}

// Default values
fn default_scroll_lines() -> usize {
    1
}
fn default_history_limit() -> usize {
    1000
}
fn default_true() -> bool {
    true
}
fn default_heading() -> String {
    "yellow".to_string()
}
fn default_blockquote() -> String {
    "gray".to_string()
}
fn default_code() -> String {
    "green".to_string()
}
fn default_list_marker() -> String {
    "cyan".to_string()
}
fn default_line_number() -> String {
    "darkgray".to_string()
}
fn default_link() -> String {
    "blue".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scroll_lines: default_scroll_lines(),
            history_limit: default_history_limit(),
            show_line_numbers: default_true(),
            relative_line_numbers: default_true(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            heading: default_heading(),
            blockquote: default_blockquote(),
            code: default_code(),
            list_marker: default_list_marker(),
            line_number: default_line_number(),
            link: default_link(),
        }
    }
}

/// `<config_dir>/mdedit`, when the platform has a config dir.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Configuration manager
pub struct ConfigManager {
    /// The config
    config: Config,

    /// The path to the config file
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager
    pub fn new(config_dir: &Path) -> Self {
        let config_path = config_dir.join("config.json");

        Self {
            config: Config::default(),
            config_path,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the config. A missing file leaves the defaults in place.
    pub fn load(&mut self) -> Result<()> {
        if self.config_path.exists() {
            let config_str = fs::read_to_string(&self.config_path)
                .with_context(|| format!("reading {}", self.config_path.display()))?;
            self.config = serde_json::from_str(&config_str)
                .map_err(|e| anyhow!("Failed to parse config: {}", e))?;
        }

        Ok(())
    }

    /// Save the config
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let config_str = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_path, config_str)
            .with_context(|| format!("writing {}", self.config_path.display()))?;
        Ok(())
    }

    /// Get the config
    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the config
    pub fn get_config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Update a setting
    pub fn update_setting(&mut self, path: &str, value: serde_json::Value) -> Result<()> {
        let editor = &mut self.config.editor;
        let ui = &mut self.config.ui;
        match path {
            "editor.scrollLines" => editor.scroll_lines = expect_usize(&value)?,
            "editor.historyLimit" => editor.history_limit = expect_usize(&value)?,
            "editor.showLineNumbers" => editor.show_line_numbers = expect_bool(&value)?,
            "editor.relativeLineNumbers" => editor.relative_line_numbers = expect_bool(&value)?,
            "ui.heading" => ui.heading = expect_string(&value)?,
            "ui.blockquote" => ui.blockquote = expect_string(&value)?,
            "ui.code" => ui.code = expect_string(&value)?,
            "ui.listMarker" => ui.list_marker = expect_string(&value)?,
            "ui.lineNumber" => ui.line_number = expect_string(&value)?,
            "ui.link" => ui.link = expect_string(&value)?,
            _ => return Err(anyhow!("Unsupported setting path: {}", path)),
        }

        Ok(())
    }

    /// Get a setting by path
    pub fn get_setting(&self, path: &str) -> Result<serde_json::Value> {
        let editor = &self.config.editor;
        let ui = &self.config.ui;
        let value = match path {
            "editor.scrollLines" => serde_json::json!(editor.scroll_lines),
            "editor.historyLimit" => serde_json::json!(editor.history_limit),
            "editor.showLineNumbers" => serde_json::json!(editor.show_line_numbers),
            "editor.relativeLineNumbers" => serde_json::json!(editor.relative_line_numbers),
            "ui.heading" => serde_json::json!(ui.heading),
            "ui.blockquote" => serde_json::json!(ui.blockquote),
            "ui.code" => serde_json::json!(ui.code),
            "ui.listMarker" => serde_json::json!(ui.list_marker),
            "ui.lineNumber" => serde_json::json!(ui.line_number),
            "ui.link" => serde_json::json!(ui.link),
            _ => return Err(anyhow!("Unsupported setting path: {}", path)),
        };
        Ok(value)
    }
}

fn expect_usize(value: &serde_json::Value) -> Result<usize> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| anyhow!("Expected number"))
}

fn expect_bool(value: &serde_json::Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| anyhow!("Expected boolean"))
}

fn expect_string(value: &serde_json::Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Expected string"))
}
