//! # Registry & Persistence Manager
//!
//! Owns every live multiline text for the current map together with the
//! loaded per-map config list, and keeps the two in step: mutations that
//! touch persisted texts rewrite the in-memory config list and save it in
//! the same operation. Explicit single-writer design; there is no dirty
//! tracking, [`Registry::save_config`] writes whatever the list holds.

use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::config::{self, WorldTextConfigEntry};
use crate::error::WorldTextError;
use crate::geometry::{self, Angles, Vec3};
use crate::host::{EntityHandle, TextEntityBackend};
use crate::line::TextLine;
use crate::multiline::{MultilineText, TextId};
use crate::placement::TextPlacement;

const FIRST_ID: TextId = 1;

/// Snapshot of one live text's identity and pose
#[derive(Debug, Clone)]
pub struct WorldTextInfo {
    /// Registry id
    pub id: TextId,
    /// Placement mode
    pub placement: TextPlacement,
    /// Number of lines
    pub line_count: usize,
    /// Spawn origin
    pub origin: Vec3,
    /// Spawn rotation
    pub rotation: Angles,
    /// Whether a matching config entry exists
    pub persisted: bool,
}

/// Live world texts of the current map plus their persisted counterparts
///
/// Created empty at map start and reset at map end. Insertion order equals
/// id order; ids are never reused across remove/add cycles until a full
/// map-end reset.
#[derive(Debug)]
pub struct Registry {
    texts: Vec<MultilineText>,
    loaded_configs: Option<Vec<WorldTextConfigEntry>>,
    config_path: Option<PathBuf>,
    next_id: TextId,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            texts: Vec::new(),
            loaded_configs: None,
            config_path: None,
            next_id: FIRST_ID,
        }
    }

    /// Live texts in insertion order
    pub fn texts(&self) -> &[MultilineText] {
        &self.texts
    }

    /// Number of live texts
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether no texts are live
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Whether a config load has happened since the last reset
    pub fn is_loaded(&self) -> bool {
        self.loaded_configs.is_some()
    }

    /// Look up a live text by id
    pub fn get(&self, id: TextId) -> Option<&MultilineText> {
        self.texts.iter().find(|text| text.id() == id)
    }

    /// Resolve the per-map config path ahead of the first load
    ///
    /// Called at map start so that texts persisted before the first config
    /// load still have a file to save into.
    pub fn set_config_path(&mut self, path: PathBuf) {
        self.config_path = Some(path);
    }

    /// Load the per-map config file and spawn every persisted text
    ///
    /// An absent file leaves the registry empty without error. A file that
    /// fails to deserialize is logged and degrades to an empty list. Every
    /// entry's origin/rotation strings are parsed strictly before anything
    /// spawns; one malformed entry aborts the whole load and leaves the
    /// registry empty rather than partially populated.
    pub fn load_config(
        &mut self,
        backend: &mut dyn TextEntityBackend,
        dir: &Path,
        map_key: &str,
    ) {
        let path = config::map_config_path(dir, map_key);
        self.config_path = Some(path.clone());

        if !path.exists() {
            debug!("no world text config at {}", path.display());
            self.loaded_configs = Some(Vec::new());
            return;
        }

        let entries = match config::read_entries(&path) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to load world text config {}: {err}", path.display());
                self.loaded_configs = Some(Vec::new());
                return;
            }
        };

        let mut poses = Vec::with_capacity(entries.len());
        for entry in &entries {
            let pose = geometry::parse_vector(&entry.abs_origin)
                .and_then(|origin| Ok((origin, entry.abs_rotation.parse::<Angles>()?)));
            match pose {
                Ok(pose) => poses.push(pose),
                Err(err) => {
                    error!(
                        "malformed entry in world text config {}: {err}",
                        path.display()
                    );
                    self.loaded_configs = Some(Vec::new());
                    return;
                }
            }
        }

        for (entry, (origin, rotation)) in entries.iter().zip(poses) {
            let id = self.allocate_id();
            let mut text = MultilineText::new(id, entry.lines.clone(), true);
            text.spawn(backend, origin, rotation, entry.placement);
            self.texts.push(text);
        }
        info!(
            "loaded {} world text(s) from {}",
            entries.len(),
            path.display()
        );
        self.loaded_configs = Some(entries);
    }

    /// Write the current loaded-config list back to the per-map file
    ///
    /// Persists the config list, not the live registry; callers mutate the
    /// list first and then save.
    ///
    /// # Errors
    /// Returns [`WorldTextError::Io`] when the file cannot be written.
    pub fn save_config(&self) -> Result<(), WorldTextError> {
        let Some(path) = &self.config_path else {
            debug!("save_config skipped: no map config resolved yet");
            return Ok(());
        };
        config::write_entries(path, self.loaded_configs.as_deref().unwrap_or(&[]))
    }

    /// Construct and spawn a new text, returning its id
    ///
    /// When `save` is set, a corresponding config entry is appended and the
    /// file persisted immediately.
    pub fn add(
        &mut self,
        backend: &mut dyn TextEntityBackend,
        placement: TextPlacement,
        lines: Vec<TextLine>,
        origin: Vec3,
        rotation: Angles,
        save: bool,
    ) -> TextId {
        let id = self.allocate_id();
        let mut text = MultilineText::new(id, lines, save);
        text.spawn(backend, origin, rotation, placement);
        if save {
            let entry = WorldTextConfigEntry {
                placement,
                lines: text.lines().to_vec(),
                abs_origin: geometry::format_vector(&text.origin()),
                abs_rotation: text.rotation().to_string(),
            };
            self.loaded_configs.get_or_insert_with(Vec::new).push(entry);
            self.persist();
        }
        self.texts.push(text);
        id
    }

    /// Dispose a text and drop it from the registry
    ///
    /// When `remove_from_config` is set, config entries matching the text by
    /// value (lines plus stringified origin and rotation) are dropped and
    /// the file persisted.
    ///
    /// # Errors
    /// Returns [`WorldTextError::NotFound`] when the id is not live.
    pub fn remove(
        &mut self,
        backend: &mut dyn TextEntityBackend,
        id: TextId,
        remove_from_config: bool,
    ) -> Result<(), WorldTextError> {
        let index = self
            .texts
            .iter()
            .position(|text| text.id() == id)
            .ok_or(WorldTextError::NotFound(id))?;
        let mut text = self.texts.remove(index);
        text.dispose(backend);
        if remove_from_config {
            if let Some(configs) = &mut self.loaded_configs {
                configs.retain(|entry| !config_match(&text, entry));
            }
            self.persist();
        }
        Ok(())
    }

    /// Update a text's line contents; see [`MultilineText::update`]
    ///
    /// # Errors
    /// Returns [`WorldTextError::NotFound`] when the id is not live.
    pub fn update(
        &mut self,
        backend: &mut dyn TextEntityBackend,
        id: TextId,
        lines: Option<Vec<TextLine>>,
    ) -> Result<(), WorldTextError> {
        let text = self
            .texts
            .iter_mut()
            .find(|text| text.id() == id)
            .ok_or(WorldTextError::NotFound(id))?;
        text.update(backend, lines);
        Ok(())
    }

    /// Teleport a text to a new pose
    ///
    /// When `modify_config` is set, config entries matching the old pose by
    /// value are rewritten to the new origin/rotation and the file
    /// persisted. The match key is captured before the move; a float
    /// round-trip that changed the stored strings means no entry matches
    /// and the config is left as it was.
    ///
    /// # Errors
    /// Returns [`WorldTextError::NotFound`] when the id is not live.
    pub fn teleport(
        &mut self,
        backend: &mut dyn TextEntityBackend,
        id: TextId,
        origin: Vec3,
        rotation: Angles,
        modify_config: bool,
    ) -> Result<(), WorldTextError> {
        let text = self
            .texts
            .iter_mut()
            .find(|text| text.id() == id)
            .ok_or(WorldTextError::NotFound(id))?;
        let old_lines = text.lines().to_vec();
        let old_origin = geometry::format_vector(&text.origin());
        let old_rotation = text.rotation().to_string();
        text.teleport(backend, origin, rotation);
        if modify_config {
            if let Some(configs) = &mut self.loaded_configs {
                for entry in configs.iter_mut().filter(|entry| {
                    entry.lines == old_lines
                        && entry.abs_origin == old_origin
                        && entry.abs_rotation == old_rotation
                }) {
                    entry.abs_origin = geometry::format_vector(&origin);
                    entry.abs_rotation = rotation.to_string();
                }
            }
            self.persist();
        }
        Ok(())
    }

    /// Handles of a text's live line entities, in display order
    ///
    /// # Errors
    /// Returns [`WorldTextError::NotFound`] when the id is not live.
    pub fn line_entities(&self, id: TextId) -> Result<Vec<EntityHandle>, WorldTextError> {
        self.get(id)
            .map(MultilineText::entities)
            .ok_or(WorldTextError::NotFound(id))
    }

    /// Snapshot a text's identity and pose
    ///
    /// # Errors
    /// Returns [`WorldTextError::NotFound`] when the id is not live.
    pub fn info(&self, id: TextId) -> Result<WorldTextInfo, WorldTextError> {
        let text = self.get(id).ok_or(WorldTextError::NotFound(id))?;
        let persisted = self
            .loaded_configs
            .as_deref()
            .is_some_and(|configs| configs.iter().any(|entry| config_match(text, entry)));
        Ok(WorldTextInfo {
            id: text.id(),
            placement: text.placement(),
            line_count: text.lines().len(),
            origin: text.origin(),
            rotation: text.rotation(),
            persisted,
        })
    }

    /// Dispose everything and re-run the config load
    ///
    /// All entity handles are released before anything respawns, so a
    /// reload never leaves duplicate text on the map. Ids keep counting up;
    /// only a map-end reset rewinds them.
    pub fn reload(&mut self, backend: &mut dyn TextEntityBackend, dir: &Path, map_key: &str) {
        for text in &mut self.texts {
            text.dispose(backend);
        }
        self.texts.clear();
        self.loaded_configs = None;
        self.load_config(backend, dir, map_key);
    }

    /// Nearest text whose origin lies within `max_distance` of `point`
    ///
    /// Linear scan with strict less-than comparison; on equal distances the
    /// first text in registry order wins.
    pub fn find_nearest(&self, point: Vec3, max_distance: f32) -> Option<&MultilineText> {
        let mut best: Option<(&MultilineText, f32)> = None;
        for text in &self.texts {
            let distance = (text.origin() - point).norm();
            if distance < max_distance && best.map_or(true, |(_, nearest)| distance < nearest) {
                best = Some((text, distance));
            }
        }
        best.map(|(text, _)| text)
    }

    /// Dispose and drop every text not flagged for persistence
    pub fn remove_all_temporary(&mut self, backend: &mut dyn TextEntityBackend) {
        self.texts.retain_mut(|text| {
            if text.save_to_config() {
                true
            } else {
                text.dispose(backend);
                false
            }
        });
    }

    /// Re-render every live text in place (round start)
    pub fn update_all(&mut self, backend: &mut dyn TextEntityBackend) {
        for text in &mut self.texts {
            text.update(backend, None);
        }
    }

    /// Full map-end reset: clear both lists, drop the path, rewind ids
    ///
    /// Host-side map teardown already destroyed the entities; stale handles
    /// held by the cleared texts are simply dropped.
    pub fn reset(&mut self) {
        self.texts.clear();
        self.loaded_configs = None;
        self.config_path = None;
        self.next_id = FIRST_ID;
    }

    fn allocate_id(&mut self) -> TextId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Save and log a failure instead of propagating it; registry mutations
    /// themselves never fail on persistence.
    fn persist(&self) {
        if let Err(err) = self.save_config() {
            error!("failed to persist world text config: {err}");
        }
    }
}

fn config_match(text: &MultilineText, entry: &WorldTextConfigEntry) -> bool {
    entry.lines == text.lines()
        && entry.abs_origin == geometry::format_vector(&text.origin())
        && entry.abs_rotation == text.rotation().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryTextBackend;
    use crate::line::Color;

    fn lines() -> Vec<TextLine> {
        vec![TextLine::new("test", Color::WHITE, 20)]
    }

    fn add_at(
        registry: &mut Registry,
        backend: &mut MemoryTextBackend,
        origin: Vec3,
        save: bool,
    ) -> TextId {
        registry.add(
            backend,
            TextPlacement::Floor,
            lines(),
            origin,
            Angles::ZERO,
            save,
        )
    }

    #[test]
    fn test_ids_are_monotonic_and_not_reused() {
        let mut backend = MemoryTextBackend::new();
        let mut registry = Registry::new();
        let a = add_at(&mut registry, &mut backend, Vec3::zeros(), false);
        let b = add_at(&mut registry, &mut backend, Vec3::zeros(), false);
        registry.remove(&mut backend, b, false).unwrap();
        let c = add_at(&mut registry, &mut backend, Vec3::zeros(), false);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_remove_then_operate_is_not_found() {
        let mut backend = MemoryTextBackend::new();
        let mut registry = Registry::new();
        let id = add_at(&mut registry, &mut backend, Vec3::zeros(), false);
        registry.remove(&mut backend, id, false).unwrap();
        assert!(matches!(
            registry.update(&mut backend, id, None),
            Err(WorldTextError::NotFound(_))
        ));
        assert!(matches!(
            registry.remove(&mut backend, id, false),
            Err(WorldTextError::NotFound(_))
        ));
        assert!(matches!(
            registry.line_entities(id),
            Err(WorldTextError::NotFound(_))
        ));
        assert!(matches!(
            registry.teleport(&mut backend, id, Vec3::zeros(), Angles::ZERO, false),
            Err(WorldTextError::NotFound(_))
        ));
    }

    #[test]
    fn test_find_nearest_picks_minimum_within_radius() {
        let mut backend = MemoryTextBackend::new();
        let mut registry = Registry::new();
        let point = Vec3::zeros();
        let expected = add_at(&mut registry, &mut backend, Vec3::new(50.0, 0.0, 0.0), false);
        add_at(&mut registry, &mut backend, Vec3::new(150.0, 0.0, 0.0), false);
        add_at(&mut registry, &mut backend, Vec3::new(0.0, 99.9, 0.0), false);
        let nearest = registry.find_nearest(point, 100.0).unwrap();
        assert_eq!(nearest.id(), expected);
    }

    #[test]
    fn test_find_nearest_ignores_texts_beyond_radius() {
        let mut backend = MemoryTextBackend::new();
        let mut registry = Registry::new();
        add_at(&mut registry, &mut backend, Vec3::new(150.0, 0.0, 0.0), false);
        add_at(&mut registry, &mut backend, Vec3::new(0.0, 120.0, 0.0), false);
        let inside = add_at(&mut registry, &mut backend, Vec3::new(0.0, 99.9, 0.0), false);
        let nearest = registry.find_nearest(Vec3::zeros(), 100.0).unwrap();
        assert_eq!(nearest.id(), inside);
    }

    #[test]
    fn test_find_nearest_requires_radius() {
        let mut backend = MemoryTextBackend::new();
        let mut registry = Registry::new();
        add_at(&mut registry, &mut backend, Vec3::new(150.0, 0.0, 0.0), false);
        add_at(&mut registry, &mut backend, Vec3::new(0.0, 101.0, 0.0), false);
        assert!(registry.find_nearest(Vec3::zeros(), 100.0).is_none());
    }

    #[test]
    fn test_find_nearest_tie_prefers_registry_order() {
        let mut backend = MemoryTextBackend::new();
        let mut registry = Registry::new();
        let first = add_at(&mut registry, &mut backend, Vec3::new(10.0, 0.0, 0.0), false);
        add_at(&mut registry, &mut backend, Vec3::new(0.0, 10.0, 0.0), false);
        assert_eq!(registry.find_nearest(Vec3::zeros(), 100.0).unwrap().id(), first);
    }

    #[test]
    fn test_remove_all_temporary_keeps_persisted() {
        let mut backend = MemoryTextBackend::new();
        let mut registry = Registry::new();
        add_at(&mut registry, &mut backend, Vec3::zeros(), false);
        let kept = add_at(&mut registry, &mut backend, Vec3::zeros(), true);
        add_at(&mut registry, &mut backend, Vec3::zeros(), false);
        registry.remove_all_temporary(&mut backend);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.texts()[0].id(), kept);
        // Only the kept text's entity survives on the host.
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_reset_clears_everything_and_rewinds_ids() {
        let mut backend = MemoryTextBackend::new();
        let mut registry = Registry::new();
        add_at(&mut registry, &mut backend, Vec3::zeros(), false);
        registry.reset();
        assert!(registry.is_empty());
        assert!(!registry.is_loaded());
        let id = add_at(&mut registry, &mut backend, Vec3::zeros(), false);
        assert_eq!(id, 1);
    }
}
