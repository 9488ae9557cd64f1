use super::types::PlayerSnapshot;
use crate::config::config_dir;
use crate::error::Result;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

pub fn player_save_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("player.json"))
}

/// Read a player file. Unlike the config, a missing or malformed player is
/// an error: there is nothing sensible to rank without one.
pub fn load_player(path: &Path) -> Result<PlayerSnapshot> {
    let json = fs::read_to_string(path)?;
    let player: PlayerSnapshot = serde_json::from_str(&json)?;
    tracing::debug!(
        path = %path.display(),
        items = player.equipment.len(),
        artifacts = player.artifacts.len(),
        "loaded player"
    );
    Ok(player)
}

/// Write `player` as pretty JSON, stamping the save time.
pub fn save_player(player: &PlayerSnapshot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut stamped = player.clone();
    stamped.saved_at = Some(Utc::now().timestamp());
    let json = serde_json::to_string_pretty(&stamped)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_path_format() {
        if let Ok(path) = player_save_path() {
            assert!(path.ends_with(".gearcalc/player.json"));
        }
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_player(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"name\": 3").unwrap();
        assert!(load_player(&path).is_err());
    }
}
