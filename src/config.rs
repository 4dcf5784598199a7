use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::clipboard::default_clipboard_command;
use crate::error::{LabelError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "labeler.toml";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// `root/<camera_id>/<track_id>/<images>`; asked for with a folder picker when unset.
    pub data_root: Option<PathBuf>,
    pub output_csv: PathBuf,
    /// Narrowest a grid column may get before the grid drops a column.
    pub min_cell_width: f32,
    /// Longest side of an uploaded texture, in pixels.
    pub max_texture_side: u32,
    pub copy_on_select: bool,
    /// Program and arguments; the image path is appended.
    pub clipboard_command: Vec<String>,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_root: None,
            output_csv: PathBuf::from("labels.csv"),
            min_cell_width: 150.0,
            max_texture_side: 512,
            copy_on_select: true,
            clipboard_command: default_clipboard_command(),
            log_level: LogLevel::Info,
        }
    }
}

pub fn parse_config(contents: &str, file_path: &Path) -> Result<Config> {
    toml::from_str::<Config>(contents)
        .map_err(|source| LabelError::Config { path: file_path.to_path_buf(), source })
}

pub fn load_config_from_file(file_path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(file_path).map_err(|e| LabelError::io(file_path, e))?;
    parse_config(&contents, file_path)
}

/// Like [`load_config_from_file`], but a missing file yields the defaults.
pub fn load_config_or_default(file_path: &Path) -> Result<Config> {
    match fs::read_to_string(file_path) {
        Ok(contents) => parse_config(&contents, file_path),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(LabelError::io(file_path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse_config("", Path::new("x.toml")).unwrap();
        assert_eq!(cfg.output_csv, PathBuf::from("labels.csv"));
        assert_eq!(cfg.min_cell_width, 150.0);
        assert_eq!(cfg.clipboard_command[0], "xclip");
        assert_eq!(cfg.log_level, LogLevel::Info);
    }

    #[test]
    fn fields_override_defaults() {
        let cfg = parse_config(
            r#"
            data_root = "/data/tracks"
            output_csv = "out/labels.csv"
            min_cell_width = 200
            copy_on_select = false
            clipboard_command = ["wl-copy", "--type", "image/png"]
            log_level = "debug"
            "#,
            Path::new("x.toml"),
        )
        .unwrap();
        assert_eq!(cfg.data_root, Some(PathBuf::from("/data/tracks")));
        assert_eq!(cfg.min_cell_width, 200.0);
        assert!(!cfg.copy_on_select);
        assert_eq!(cfg.clipboard_command.len(), 3);
        assert_eq!(cfg.log_level.to_level_filter(), log::LevelFilter::Debug);
        assert_eq!(cfg.max_texture_side, 512);
    }

    #[test]
    fn bad_toml_is_reported() {
        assert!(matches!(
            parse_config("min_cell_width = \"wide\"", Path::new("x.toml")),
            Err(LabelError::Config { .. })
        ));
    }

    #[test]
    fn missing_default_file_is_fine_but_explicit_is_not() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("labeler.toml");
        assert!(load_config_or_default(&path).is_ok());
        assert!(load_config_from_file(&path).is_err());
    }
}
