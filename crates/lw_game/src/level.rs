//! Level files: world size, spawn point and the static obstacle list.
//!
//! Obstacles keep their authored order when turned into an `ObstacleSet`,
//! and that order is the collision tie-break. `LevelWatcher` polls the file's
//! mtime so the host can reload obstacles between ticks.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use glam::IVec2;
use lw_core::geometry::Rect;

use crate::collision::{Obstacle, ObstacleSet, WorldBounds};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub world: LevelWorld,
    #[serde(default)]
    pub spawn: LevelSpawn,
    #[serde(default)]
    pub obstacles: Vec<LevelObstacle>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct LevelWorld {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelSpawn {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LevelObstacle {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl LevelFile {
    pub fn world_bounds(&self) -> WorldBounds {
        WorldBounds::new(self.world.width, self.world.height)
    }

    pub fn spawn_position(&self) -> IVec2 {
        IVec2::new(self.spawn.x, self.spawn.y)
    }

    /// Snapshot of the obstacles in authored order, tagged with `version`.
    pub fn obstacle_set(&self, version: u64) -> ObstacleSet {
        self.obstacles
            .iter()
            .map(|o| Obstacle {
                rect: Rect::new(o.x, o.y, o.width, o.height),
                visible: o.visible,
            })
            .collect::<ObstacleSet>()
            .with_version(version)
    }
}

/// Polls the level file between ticks and hands back a freshly loaded level
/// only when its content differs from the one currently applied.
pub struct LevelWatcher {
    level_path: PathBuf,
    last_seen_modified: Option<SystemTime>,
    applied: LevelFile,
}

impl LevelWatcher {
    pub fn new(level_path: PathBuf, applied: LevelFile) -> Self {
        let last_seen_modified = modified_time(&level_path);
        Self {
            level_path,
            last_seen_modified,
            applied,
        }
    }

    /// `None` when the file is untouched, or touched without changing the
    /// level. A failed load leaves the applied level as it was.
    pub fn poll(&mut self) -> Option<Result<LevelFile, String>> {
        if !self.file_changed() {
            return None;
        }
        let level = match load_level_from_path(&self.level_path) {
            Ok(level) => level,
            Err(err) => return Some(Err(err)),
        };
        if level == self.applied {
            log::debug!(
                "Level file {} rewritten without changes",
                self.level_path.display()
            );
            return None;
        }
        self.applied = level.clone();
        Some(Ok(level))
    }

    fn file_changed(&mut self) -> bool {
        let current = modified_time(&self.level_path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

pub fn load_level_from_path(level_path: &Path) -> Result<LevelFile, String> {
    let raw = fs::read_to_string(level_path)
        .map_err(|e| format!("Failed to read level file {}: {e}", level_path.display()))?;
    let level: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", level_path.display()))?;
    validate_level(&level)?;
    Ok(level)
}

fn validate_level(level: &LevelFile) -> Result<(), String> {
    if level.version != "0.1" {
        return Err(format!(
            "Level validation failed: unsupported version '{}'",
            level.version
        ));
    }
    if level.level_id.is_empty() {
        return Err("Level validation failed: level_id is empty".to_string());
    }
    if level.world.width <= 0 || level.world.height <= 0 {
        return Err(format!(
            "Level validation failed: world size {}x{} must be positive",
            level.world.width, level.world.height
        ));
    }
    if level.obstacles.is_empty() {
        log::warn!(
            "Level '{}' has no obstacles. This is allowed but often accidental.",
            level.level_id
        );
    }

    let mut ids = HashSet::new();
    for obstacle in &level.obstacles {
        if obstacle.id.is_empty() {
            return Err("Level validation failed: obstacle with empty id".to_string());
        }
        if !ids.insert(obstacle.id.as_str()) {
            return Err(format!(
                "Level validation failed: duplicate obstacle id '{}'",
                obstacle.id
            ));
        }
        if obstacle.width < 0 || obstacle.height < 0 {
            return Err(format!(
                "Level validation failed: obstacle '{}' has negative size {}x{}",
                obstacle.id, obstacle.width, obstacle.height
            ));
        }
    }
    Ok(())
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

const fn default_visible() -> bool {
    true
}
