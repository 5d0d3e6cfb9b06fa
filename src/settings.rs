use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::results::RESULTS_FILE_NAME;

pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const LOG_FILE_NAME: &str = "flashdeck.log";
pub const MIN_TYPING_SPEED: u32 = 10;
pub const MAX_TYPING_SPEED: u32 = 200;
pub const DEFAULT_TYPING_SPEED: u32 = 50;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings file at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write settings file at {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Review settings handed to every session when it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Characters revealed per second.
    pub typing_speed: u32,
    pub sound_enabled: bool,
    /// Directory holding `typing.mp3`, `right.mp3` and `wrong.mp3`.
    pub sounds_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            typing_speed: DEFAULT_TYPING_SPEED,
            sound_enabled: true,
            sounds_dir: None,
        }
    }
}

/// Files the application keeps in its data directory.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub results: PathBuf,
    pub settings: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    pub fn in_dir(data_dir: PathBuf, results_override: Option<PathBuf>) -> Self {
        Self {
            results: results_override.unwrap_or_else(|| data_dir.join(RESULTS_FILE_NAME)),
            settings: data_dir.join(SETTINGS_FILE_NAME),
            log_file: data_dir.join(LOG_FILE_NAME),
            data_dir,
        }
    }
}

pub fn clamp_typing_speed(speed: u32) -> u32 {
    speed.clamp(MIN_TYPING_SPEED, MAX_TYPING_SPEED)
}

impl Settings {
    pub fn with_typing_speed(mut self, speed: u32) -> Self {
        self.typing_speed = clamp_typing_speed(speed);
        self
    }

    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Delay between two revealed characters.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(1000 / clamp_typing_speed(self.typing_speed)))
    }

    pub fn sounds_dir_or(&self, data_dir: &Path) -> PathBuf {
        self.sounds_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("sounds"))
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let parsed: Settings =
            serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let speed = parsed.typing_speed;
        Ok(parsed.with_typing_speed(speed))
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let contents = format!("{}\n", serde_json::to_string_pretty(self)?);
        fs::write(path, contents).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn app_paths_live_in_data_dir() {
        let paths = AppPaths::in_dir(PathBuf::from("/data"), None);
        assert_eq!(paths.results, Path::new("/data/flashcard_results.json"));
        assert_eq!(paths.settings, Path::new("/data/settings.json"));

        let paths = AppPaths::in_dir(PathBuf::from("/data"), Some(PathBuf::from("r.json")));
        assert_eq!(paths.results, Path::new("r.json"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(&dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.typing_speed, 50);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn typing_speed_is_clamped() {
        assert_eq!(Settings::default().with_typing_speed(1).typing_speed, 10);
        assert_eq!(Settings::default().with_typing_speed(500).typing_speed, 200);
        assert_eq!(Settings::default().with_typing_speed(75).typing_speed, 75);
    }

    #[test]
    fn tick_interval_follows_speed() {
        let settings = Settings::default().with_typing_speed(100);
        assert_eq!(settings.tick_interval(), Duration::from_millis(10));
        let settings = Settings::default().with_typing_speed(30);
        assert_eq!(settings.tick_interval(), Duration::from_millis(33));
    }

    #[test]
    fn partial_file_fills_defaults_and_clamps() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, r#"{ "typing_speed": 999 }"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.typing_speed, MAX_TYPING_SPEED);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        let settings = Settings::default().with_typing_speed(120).with_sound(false);
        settings.save(&path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().ends_with('\n'));
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, "typing_speed = 10").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
    }
}
