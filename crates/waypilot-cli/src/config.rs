//! Configuration Vault – reads/writes `~/.waypilot/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use waypilot_runtime::PilotTuning;

/// Persisted user configuration stored in `~/.waypilot/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding recorded routes, one `<name>.json` per route.
    /// Empty means `~/.waypilot/paths`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path_dir: String,

    /// Route loaded by `/run`.
    #[serde(default = "default_active_path")]
    pub active_path: String,

    /// Scheduler tick period.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Extra ticks allowed after Ctrl-C while an action awaits confirmation.
    #[serde(default = "default_shutdown_grace_ticks")]
    pub shutdown_grace_ticks: u32,

    /// Behavior thresholds and timeouts.
    #[serde(default)]
    pub tuning: PilotTuning,
}

fn default_active_path() -> String {
    "demo".to_string()
}
fn default_tick_interval_ms() -> u64 {
    50
}
fn default_shutdown_grace_ticks() -> u32 {
    40
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path_dir: String::new(),
            active_path: default_active_path(),
            tick_interval_ms: default_tick_interval_ms(),
            shutdown_grace_ticks: default_shutdown_grace_ticks(),
            tuning: PilotTuning::default(),
        }
    }
}

impl Config {
    /// The route directory, falling back to `~/.waypilot/paths`.
    pub fn paths_dir(&self) -> PathBuf {
        if self.path_dir.is_empty() {
            waypilot_dir_for_home(&home_dir()).join("paths")
        } else {
            PathBuf::from(&self.path_dir)
        }
    }
}

fn home_dir() -> String {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string())
}

fn waypilot_dir_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".waypilot")
}

/// Return the path to `~/.waypilot/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(&home_dir())
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    waypilot_dir_for_home(home).join("config.toml")
}

/// Load the config from disk with `WAYPILOT_*` overrides applied.
/// Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    let mut cfg = load_from(&config_path())?;
    if let Some(cfg) = cfg.as_mut() {
        apply_env_overrides(cfg);
    }
    Ok(cfg)
}

/// Load the config from a specific path, without env overrides.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Apply `WAYPILOT_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `WAYPILOT_PATH_DIR` | `path_dir` |
/// | `WAYPILOT_ACTIVE_PATH` | `active_path` |
/// | `WAYPILOT_TICK_MS` | `tick_interval_ms` (ignored unless a positive integer) |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("WAYPILOT_PATH_DIR") {
        cfg.path_dir = v;
    }
    if let Ok(v) = std::env::var("WAYPILOT_ACTIVE_PATH") {
        cfg.active_path = v;
    }
    if let Ok(v) = std::env::var("WAYPILOT_TICK_MS")
        && let Ok(ms) = v.parse::<u64>()
        && ms > 0
    {
        cfg.tick_interval_ms = ms;
    }
}

/// Save the config to disk, creating `~/.waypilot/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // Owner only (rwx------) on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypilot_runtime::LootPolicy;

    #[cfg(unix)]
    #[test]
    fn config_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let file_mode = std::fs::metadata(&path).expect("file").permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        let parent = path.parent().expect("parent");
        let dir_mode = std::fs::metadata(parent).expect("dir").permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn roundtrip_keeps_tuning() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let mut cfg = Config::default();
        cfg.active_path = "rotworms".into();
        cfg.tuning.loot_policy = LootPolicy::Newest;
        cfg.tuning.heal_below_percent = 55;
        save_to(&cfg, &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.active_path, "rotworms");
        assert_eq!(loaded.tick_interval_ms, 50);
        assert_eq!(loaded.tuning.loot_policy, LootPolicy::Newest);
        assert_eq!(loaded.tuning.heal_below_percent, 55);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tick_interval_ms = 100\n\n[tuning]\ncombat_enabled = false\n")
            .expect("write");
        let cfg = load_from(&path).expect("load ok").expect("some");
        assert_eq!(cfg.tick_interval_ms, 100);
        assert_eq!(cfg.shutdown_grace_ticks, 40);
        assert_eq!(cfg.active_path, "demo");
        assert!(!cfg.tuning.combat_enabled);
        assert_eq!(cfg.tuning.max_wait_ticks, 6);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tick_interval_ms = \"fast\"").expect("write");
        assert!(load_from(&path).is_err());
    }

    #[test]
    fn config_path_points_to_waypilot_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".waypilot"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn explicit_path_dir_wins() {
        let cfg = Config {
            path_dir: "/srv/routes".into(),
            ..Config::default()
        };
        assert_eq!(cfg.paths_dir(), PathBuf::from("/srv/routes"));
        assert!(Config::default().paths_dir().ends_with(".waypilot/paths"));
    }

    // A single test, so the variables are never set concurrently.
    #[test]
    fn env_overrides() {
        // SAFETY: only this test touches WAYPILOT_* variables.
        unsafe {
            std::env::set_var("WAYPILOT_PATH_DIR", "/tmp/routes");
            std::env::set_var("WAYPILOT_ACTIVE_PATH", "dragons");
            std::env::set_var("WAYPILOT_TICK_MS", "75");
        }
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.path_dir, "/tmp/routes");
        assert_eq!(cfg.active_path, "dragons");
        assert_eq!(cfg.tick_interval_ms, 75);

        unsafe { std::env::set_var("WAYPILOT_TICK_MS", "0") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.tick_interval_ms, 50);

        unsafe {
            std::env::remove_var("WAYPILOT_PATH_DIR");
            std::env::remove_var("WAYPILOT_ACTIVE_PATH");
            std::env::remove_var("WAYPILOT_TICK_MS");
        }
    }
}
