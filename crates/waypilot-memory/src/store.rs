//! JSON-file persistence for routes.
//!
//! # Storage layout
//!
//! One file per route, `<dir>/<name>.json`, holding a pretty-printed array of
//! flat waypoint records:
//!
//! | field       | type   | present for                     |
//! |-------------|--------|---------------------------------|
//! | `type`      | string | always: `move`, `step`, `use_item`, `right_click` |
//! | `x`,`y`,`z` | int    | always                          |
//! | `direction` | string | `step`, `use_item`, `right_click` |
//! | `item`      | string | `use_item`                      |
//!
//! Records are read and written verbatim; a save followed by a load returns
//! the same ordered list.
//!
//! # Example
//!
//! ```rust
//! use waypilot_memory::PathStore;
//! use waypilot_types::{Tile, Waypoint};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = PathStore::new(dir.path());
//! let route = vec![Waypoint::Move { tile: Tile::new(3, 4, 7) }];
//!
//! store.save("cave", &route).unwrap();
//! assert_eq!(store.load("cave").unwrap(), route);
//! assert_eq!(store.list().unwrap(), vec!["cave".to_string()]);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use waypilot_types::{PilotError, Waypoint};

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can arise while loading or saving routes.
#[derive(Error, Debug)]
pub enum PathStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed route {name}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid route name {0:?}: use letters, digits, '_' and '-'")]
    InvalidName(String),
    #[error("route not found: {0}")]
    NotFound(String),
}

impl From<PathStoreError> for PilotError {
    fn from(e: PathStoreError) -> Self {
        PilotError::PathStore(e.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PathStore
// ─────────────────────────────────────────────────────────────────────────────

/// A directory of saved routes.
#[derive(Debug, Clone)]
pub struct PathStore {
    dir: PathBuf,
}

impl PathStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the route called `name`.
    pub fn load(&self, name: &str) -> Result<Vec<Waypoint>, PathStoreError> {
        let path = self.file_for(name)?;
        let text = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                PathStoreError::NotFound(name.to_string())
            } else {
                PathStoreError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        let waypoints: Vec<Waypoint> =
            serde_json::from_str(&text).map_err(|source| PathStoreError::Json {
                name: name.to_string(),
                source,
            })?;
        debug!(name, waypoints = waypoints.len(), "route loaded");
        Ok(waypoints)
    }

    /// Save `waypoints` as the route called `name`, replacing any previous
    /// file.  The directory is created if needed.
    pub fn save(&self, name: &str, waypoints: &[Waypoint]) -> Result<(), PathStoreError> {
        let path = self.file_for(name)?;
        fs::create_dir_all(&self.dir).map_err(|source| PathStoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let json =
            serde_json::to_string_pretty(waypoints).map_err(|source| PathStoreError::Json {
                name: name.to_string(),
                source,
            })?;
        fs::write(&path, json).map_err(|source| PathStoreError::Io {
            path: path.clone(),
            source,
        })?;
        info!(name, waypoints = waypoints.len(), path = %path.display(), "route saved");
        Ok(())
    }

    /// Names of every saved route, sorted.  A missing directory is an empty
    /// list.
    pub fn list(&self) -> Result<Vec<String>, PathStoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PathStoreError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .filter(|name| is_valid_name(name))
            .collect();
        names.sort();
        Ok(names)
    }

    fn file_for(&self, name: &str) -> Result<PathBuf, PathStoreError> {
        if !is_valid_name(name) {
            return Err(PathStoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
