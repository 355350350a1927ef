//! Named text presets
//!
//! Preset blocks are data, not code: a JSON table of named line lists that
//! admins can extend without touching the plugin. A small built-in table
//! ships for when no file is present.

use std::fs;
use std::path::Path;

use log::{error, info};
use serde::{Deserialize, Serialize};
use worldtext::prelude::{Color, TextLine};

/// Font size used when neither the preset line nor the caller picks one
pub const DEFAULT_FONT_SIZE: u32 = 20;

/// One line of a preset: content, color, and an optional fixed font size
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetLine {
    /// Displayed string
    pub text: String,
    /// Render color
    pub color: Color,
    /// Fixed size overriding the caller-provided one, if set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

/// A named block of preset lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    /// Lookup name, matched case-insensitively
    pub name: String,
    /// Lines in display order
    pub lines: Vec<PresetLine>,
}

impl Preset {
    /// Materialize the preset into text lines at the given font size
    ///
    /// Lines carrying their own fixed size keep it; the rest take
    /// `font_size`.
    pub fn to_lines(&self, font_size: u32) -> Vec<TextLine> {
        self.lines
            .iter()
            .map(|line| {
                TextLine::new(
                    line.text.clone(),
                    line.color,
                    line.font_size.unwrap_or(font_size),
                )
            })
            .collect()
    }
}

/// The loaded preset table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetTable {
    presets: Vec<Preset>,
}

impl PresetTable {
    /// Load the table from a JSON file, falling back to the built-ins
    ///
    /// An absent file is the normal case and silently uses the defaults; a
    /// file that fails to parse is logged and also falls back.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path).map_err(|err| err.to_string()).and_then(|json| {
            serde_json::from_str::<Self>(&json).map_err(|err| err.to_string())
        }) {
            Ok(table) if table.presets.is_empty() => {
                error!("preset file {} is empty, using built-ins", path.display());
                Self::default()
            }
            Ok(table) => {
                info!("loaded {} preset(s) from {}", table.presets.len(), path.display());
                table
            }
            Err(err) => {
                error!("failed to load presets from {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Look up a preset by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
    }

    /// The preset used by the plain spawn command
    pub fn default_preset(&self) -> &Preset {
        self.get("default").unwrap_or(&self.presets[0])
    }

    /// Names of every loaded preset
    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|preset| preset.name.as_str()).collect()
    }
}

impl Default for PresetTable {
    fn default() -> Self {
        let line = |text: &str, color: Color, size: Option<u32>| PresetLine {
            text: text.to_string(),
            color,
            font_size: size,
        };
        Self {
            presets: vec![
                Preset {
                    name: "default".to_string(),
                    lines: vec![
                        line("This is a world text!", Color::YELLOW, Some(24)),
                        line("Edit the map config to change it.", Color::CYAN, Some(18)),
                        line("Placed by an admin.", Color::RED, Some(20)),
                    ],
                },
                Preset {
                    name: "warning".to_string(),
                    lines: vec![
                        line("WARNING", Color::YELLOW, None),
                        line("Do not pass this point", Color::YELLOW, None),
                        line("Crossing may get you banned", Color::YELLOW, None),
                    ],
                },
                Preset {
                    name: "restricted".to_string(),
                    lines: vec![
                        line("", Color::RED, None),
                        line("Restricted area", Color::RED, None),
                        line("", Color::RED, None),
                    ],
                },
            ],
        }
    }
}
