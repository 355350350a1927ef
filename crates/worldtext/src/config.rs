//! Persisted per-map configuration
//!
//! One JSON file per map key holding an array of [`WorldTextConfigEntry`].
//! An empty file is the literal array `[]`. Origin and rotation are kept in
//! their string-encoded `"x y z"` form for compatibility with existing
//! files; parsing them is the registry's job and is strict.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WorldTextError;
use crate::line::TextLine;
use crate::placement::TextPlacement;

/// Serialized description of one multiline text, sufficient to respawn it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldTextConfigEntry {
    /// Placement mode
    pub placement: TextPlacement,
    /// Line contents in display order
    pub lines: Vec<TextLine>,
    /// Spawn origin as `"x y z"`
    pub abs_origin: String,
    /// Spawn rotation as `"x y z"`
    pub abs_rotation: String,
}

/// Config file path for a map key under the given data directory
pub fn map_config_path(dir: &Path, map_key: &str) -> PathBuf {
    dir.join(format!("worldtext_{map_key}.json"))
}

/// Read and deserialize the entry list from a config file
///
/// # Errors
/// Returns [`WorldTextError::Io`] when the file cannot be read and
/// [`WorldTextError::Deserialize`] when its contents do not match the
/// schema.
pub fn read_entries(path: &Path) -> Result<Vec<WorldTextConfigEntry>, WorldTextError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Serialize and write the entry list, overwriting the config file
///
/// # Errors
/// Returns [`WorldTextError::Io`] when the file cannot be written.
pub fn write_entries(path: &Path, entries: &[WorldTextConfigEntry]) -> Result<(), WorldTextError> {
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(path, json)?;
    Ok(())
}

/// Seed an absent config file with the empty array
///
/// # Errors
/// Returns [`WorldTextError::Io`] when the file cannot be created.
pub fn seed_missing(path: &Path) -> Result<(), WorldTextError> {
    if !path.exists() {
        fs::write(path, "[]")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Color;

    #[test]
    fn test_entry_json_shape() {
        let entry = WorldTextConfigEntry {
            placement: TextPlacement::Wall,
            lines: vec![TextLine::new("hello", Color::YELLOW, 24)],
            abs_origin: "1 2 3".to_string(),
            abs_rotation: "0 270 90".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["placement"], 1);
        assert_eq!(json["absOrigin"], "1 2 3");
        assert_eq!(json["absRotation"], "0 270 90");
        assert_eq!(json["lines"][0]["fontSize"], 24);
    }

    #[test]
    fn test_entry_accepts_string_placement() {
        let json = r#"{
            "placement": "Floor",
            "lines": [{"text": "t", "color": {"r":255,"g":255,"b":255,"a":255}, "fontSize": 20}],
            "absOrigin": "0 0 0",
            "absRotation": "0 0 0"
        }"#;
        let entry: WorldTextConfigEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.placement, TextPlacement::Floor);
    }

    #[test]
    fn test_empty_file_is_empty_list() {
        let entries: Vec<WorldTextConfigEntry> = serde_json::from_str("[]").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_map_config_path_embeds_map_key() {
        let path = map_config_path(Path::new("/data"), "de_dust2");
        assert_eq!(path, Path::new("/data/worldtext_de_dust2.json"));
    }
}
