//! Editor configuration file
//!
//! JSON at `<config dir>/karnaugh-editor/config.json`. Every field has a
//! default so partial files load; out-of-range values are clamped with a
//! warning rather than rejected.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::color::Rgb;
use crate::constants::{export, palette, variables};

use super::style::MapStyle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Variables of a freshly created map
    #[serde(default = "default_variable_count")]
    pub variable_count: usize,
    #[serde(default = "default_variable_names")]
    pub variable_names: Vec<String>,

    /// Color of the first group drawn in a session
    #[serde(default = "default_initial_group_color")]
    pub initial_group_color: Rgb,
    /// Preview color of a selection in progress
    #[serde(default = "default_selection_color")]
    pub selection_color: Rgb,
    /// Preview selections in the color the group will get instead
    #[serde(default)]
    pub use_group_color_for_selection: bool,

    #[serde(default = "MapStyle::screen")]
    pub style: MapStyle,
    #[serde(default)]
    pub export: ExportSettings,
}

/// Fixed-size rendering used for image export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_export_cell_size")]
    pub cell_size: u32,
    #[serde(default = "default_export_border")]
    pub border_width: u32,
    /// Solid background; transparent when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Rgb>,
    /// TrueType font for labels and values; system fonts are tried when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
    #[serde(default)]
    pub style: MapStyle,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_variable_count() -> usize {
    variables::DEFAULT_COUNT
}

fn default_variable_names() -> Vec<String> {
    variables::DEFAULT_NAMES.iter().map(|n| n.to_string()).collect()
}

fn default_initial_group_color() -> Rgb {
    Rgb::from(palette::INITIAL_GROUP_COLOR)
}

fn default_selection_color() -> Rgb {
    Rgb::from(palette::SELECTION_COLOR)
}

fn default_export_cell_size() -> u32 {
    export::CELL_SIZE
}

fn default_export_border() -> u32 {
    export::BORDER_WIDTH
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            cell_size: default_export_cell_size(),
            border_width: default_export_border(),
            background: None,
            font_path: None,
            style: MapStyle::default(),
        }
    }
}

impl ExportSettings {
    /// Clamp sizes and style into drawable ranges
    pub fn validate_and_clamp(&mut self) {
        use crate::constants::validation::*;

        if !(MIN_EXPORT_CELL_SIZE..=MAX_EXPORT_CELL_SIZE).contains(&self.cell_size) {
            let clamped = self.cell_size.clamp(MIN_EXPORT_CELL_SIZE, MAX_EXPORT_CELL_SIZE);
            warn!(cell_size = self.cell_size, using = clamped, "export cell_size out of range, clamping");
            self.cell_size = clamped;
        }

        if self.border_width > MAX_EXPORT_BORDER {
            warn!(border_width = self.border_width, max = MAX_EXPORT_BORDER, "export border_width exceeds maximum, clamping");
            self.border_width = MAX_EXPORT_BORDER;
        }

        self.style.validate_and_clamp("export.style");
    }

    /// Copy with every value clamped
    pub fn clamped(&self) -> Self {
        let mut settings = self.clone();
        settings.validate_and_clamp();
        settings
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            variable_count: default_variable_count(),
            variable_names: default_variable_names(),
            initial_group_color: default_initial_group_color(),
            selection_color: default_selection_color(),
            use_group_color_for_selection: false,
            style: MapStyle::screen(),
            export: ExportSettings::default(),
        }
    }
}

impl EditorConfig {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    /// Load the config from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load the config from `path`, writing defaults there if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, creating default config");
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config JSON from {}", path.display()))?;

        config.validate_and_clamp();
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Clamp every value into its supported range
    pub fn validate_and_clamp(&mut self) {
        if !(variables::MIN_COUNT..=variables::MAX_COUNT).contains(&self.variable_count) {
            let clamped = self.variable_count.clamp(variables::MIN_COUNT, variables::MAX_COUNT);
            warn!(variable_count = self.variable_count, using = clamped, "variable_count out of range, clamping");
            self.variable_count = clamped;
        }

        // Blank or missing names fall back to the default letter at that position
        let mut names: Vec<String> = self.variable_names.iter().map(|n| n.trim().to_string()).collect();
        names.resize(variables::MAX_COUNT.max(names.len()), String::new());
        for (name, fallback) in names.iter_mut().zip(variables::DEFAULT_NAMES) {
            if name.is_empty() {
                warn!(using = fallback, "missing variable name, using default");
                *name = fallback.to_string();
            }
        }
        names.retain(|n| !n.is_empty());
        self.variable_names = names;

        self.style.validate_and_clamp("style");
        self.export.validate_and_clamp();
    }

    /// Names for a map with `count` variables
    pub fn names_for(&self, count: usize) -> Vec<String> {
        self.variable_names.iter().take(count).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::validation;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Log sink shared between a test and its subscriber
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn with_captured_log<T>(f: impl FnOnce() -> T) -> (T, String) {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, log.text())
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = EditorConfig::load_from(&path).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert!(path.exists());

        let reloaded = EditorConfig::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r##"{ "variable_count": 3, "export": { "cell_size": 64 } }"##).unwrap();

        let config = EditorConfig::load_from(&path).unwrap();
        assert_eq!(config.variable_count, 3);
        assert_eq!(config.export.cell_size, 64);
        assert_eq!(config.export.border_width, export::BORDER_WIDTH);
        assert_eq!(config.initial_group_color, Rgb::new(255, 0, 0));
        assert_eq!(config.style, MapStyle::screen());
        assert_eq!(config.names_for(3), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r##"{ "selection_color": "not a color" }"##).unwrap();
        assert!(EditorConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_validate_and_clamp() {
        let mut config = EditorConfig {
            variable_count: 12,
            variable_names: vec!["X".to_string(), " ".to_string()],
            ..EditorConfig::default()
        };
        config.export.cell_size = 2;
        config.export.border_width = 10_000;

        config.validate_and_clamp();

        assert_eq!(config.variable_count, variables::MAX_COUNT);
        assert_eq!(config.names_for(4), vec!["X", "B", "C", "D"]);
        assert_eq!(config.variable_names.len(), variables::MAX_COUNT);
        assert_eq!(config.export.cell_size, validation::MIN_EXPORT_CELL_SIZE);
        assert_eq!(config.export.border_width, validation::MAX_EXPORT_BORDER);
    }

    #[test]
    fn test_clamping_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r##"{ "variable_count": 12, "export": { "cell_size": 2 } }"##).unwrap();

        let (config, log) = with_captured_log(|| EditorConfig::load_from(&path).unwrap());

        assert_eq!(config.variable_count, variables::MAX_COUNT);
        assert!(log.contains("variable_count out of range, clamping"), "log: {log}");
        assert!(log.contains("export cell_size out of range, clamping"), "log: {log}");
    }

    #[test]
    fn test_default_creation_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let (_, log) = with_captured_log(|| EditorConfig::load_from(&path).unwrap());

        assert!(log.contains("Config file not found, creating default config"), "log: {log}");
    }

    #[test]
    fn test_export_settings_clamped_copy() {
        let settings = ExportSettings {
            cell_size: u32::MAX,
            border_width: u32::MAX,
            ..ExportSettings::default()
        };
        let clamped = settings.clamped();
        assert_eq!(clamped.cell_size, validation::MAX_EXPORT_CELL_SIZE);
        assert_eq!(clamped.border_width, validation::MAX_EXPORT_BORDER);
        assert_eq!(settings.cell_size, u32::MAX);
    }
}
