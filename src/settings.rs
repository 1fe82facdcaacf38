//! Persistent user preferences.

use dirs_next as dirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

impl WeightUnit {
    /// Short label shown next to weights. Weights are stored as entered.
    pub fn label(self) -> &'static str {
        match self {
            WeightUnit::Lbs => "lbs",
            WeightUnit::Kg => "kg",
        }
    }
}

fn default_true() -> bool {
    true
}

/// Preferences that survive restarts.
///
/// Every field has a serde default so an older or partial file still loads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub weight_unit: WeightUnit,
    /// Exercise the history list was last filtered to.
    #[serde(default)]
    pub active_filter: Option<String>,
    #[serde(default = "default_true")]
    pub show_pr_markers: bool,
    /// Overrides the directory workouts are saved in.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub last_export_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::Lbs,
            active_filter: None,
            show_pr_markers: true,
            data_dir: None,
            last_export_dir: None,
        }
    }
}

impl Settings {
    const FILE: &'static str = "workout_tracker_settings.json";

    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Load settings from the JSON configuration file, falling back to
    /// defaults when it is missing or unreadable.
    pub fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&data) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("Ignoring invalid settings file {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, settings not saved");
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create config directory {}: {e}", parent.display());
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(data) => {
                if let Err(e) = std::fs::write(&path, data) {
                    log::warn!("Failed to save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }

    /// Directory the workout file lives in.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(crate::persistence::FileStore::default_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn with_config_home<F: FnOnce()>(f: F) {
        use std::env;

        let _guard = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let prev_config = env::var_os("XDG_CONFIG_HOME");
        unsafe {
            env::set_var("XDG_CONFIG_HOME", dir.path());
        }

        f();

        if let Some(val) = prev_config {
            unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            }
        } else {
            unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }

    #[test]
    fn settings_roundtrip() {
        let s = Settings {
            weight_unit: WeightUnit::Kg,
            active_filter: Some("Squat".into()),
            show_pr_markers: false,
            data_dir: Some(PathBuf::from("/tmp/workouts")),
            last_export_dir: Some("/tmp".into()),
        };
        let json = serde_json::to_string(&s).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, loaded);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let loaded: Settings = serde_json::from_str("{\"weight_unit\": \"Kg\"}").unwrap();
        assert_eq!(loaded.weight_unit, WeightUnit::Kg);
        assert!(loaded.show_pr_markers);
        assert!(loaded.active_filter.is_none());
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn save_and_load_from_config_dir() {
        with_config_home(|| {
            let mut s = Settings::default();
            s.active_filter = Some("Bench Press".into());
            s.save();
            let loaded = Settings::load();
            assert_eq!(loaded.active_filter.as_deref(), Some("Bench Press"));

            std::fs::write(Settings::path().unwrap(), "not json").unwrap();
            assert_eq!(Settings::load(), Settings::default());
        });
    }

    #[test]
    fn data_dir_override() {
        let mut s = Settings::default();
        s.data_dir = Some(PathBuf::from("/srv/lifts"));
        assert_eq!(s.data_dir(), Some(PathBuf::from("/srv/lifts")));
    }

    #[test]
    fn unit_labels() {
        assert_eq!(WeightUnit::Lbs.label(), "lbs");
        assert_eq!(WeightUnit::Kg.label(), "kg");
    }
}
