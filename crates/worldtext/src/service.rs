//! # World Text Service
//!
//! Capability-style surface other modules program against. The service owns
//! the registry, the host backend, and the per-map bookkeeping; consumers
//! hold it as `&mut dyn WorldTextApi` resolved once at startup.
//!
//! Everything runs on the host's single simulation thread; operations are
//! synchronous and atomic with respect to each other. A multi-threaded host
//! must wrap the whole service in one mutex, since saving reads the config
//! list that other operations mutate.

use std::path::PathBuf;

use log::{error, info};

use crate::config;
use crate::error::WorldTextError;
use crate::geometry::{Angles, Vec3};
use crate::host::{ActorState, EntityHandle, TextEntityBackend};
use crate::line::TextLine;
use crate::multiline::TextId;
use crate::placement::{spawn_pose, TextPlacement};
use crate::registry::{Registry, WorldTextInfo};

/// Operations exposed to other modules
pub trait WorldTextApi {
    /// Spawn a text at an explicit pose, returning its id
    fn add_world_text(
        &mut self,
        placement: TextPlacement,
        lines: Vec<TextLine>,
        origin: Vec3,
        rotation: Angles,
        save: bool,
    ) -> TextId;

    /// Spawn a text anchored to an actor's position and facing
    fn add_world_text_at_actor(
        &mut self,
        actor: &dyn ActorState,
        placement: TextPlacement,
        lines: Vec<TextLine>,
        save: bool,
    ) -> TextId;

    /// Update a text's lines; `None` re-renders the current contents
    ///
    /// # Errors
    /// Returns [`WorldTextError::NotFound`] when the id is unknown.
    fn update_world_text(
        &mut self,
        id: TextId,
        lines: Option<Vec<TextLine>>,
    ) -> Result<(), WorldTextError>;

    /// Remove a text, optionally dropping its config entry
    ///
    /// # Errors
    /// Returns [`WorldTextError::NotFound`] when the id is unknown.
    fn remove_world_text(&mut self, id: TextId, remove_from_config: bool)
        -> Result<(), WorldTextError>;

    /// Move a text, optionally rewriting its config entry
    ///
    /// # Errors
    /// Returns [`WorldTextError::NotFound`] when the id is unknown.
    fn teleport_world_text(
        &mut self,
        id: TextId,
        origin: Vec3,
        rotation: Angles,
        modify_config: bool,
    ) -> Result<(), WorldTextError>;

    /// Handles of a text's live line entities, in display order
    ///
    /// # Errors
    /// Returns [`WorldTextError::NotFound`] when the id is unknown.
    fn line_entities(&self, id: TextId) -> Result<Vec<EntityHandle>, WorldTextError>;

    /// Id of the nearest text within `max_distance` of `point`
    fn find_nearest(&self, point: Vec3, max_distance: f32) -> Option<TextId>;

    /// Snapshot a text's identity and pose
    ///
    /// # Errors
    /// Returns [`WorldTextError::NotFound`] when the id is unknown.
    fn text_info(&self, id: TextId) -> Result<WorldTextInfo, WorldTextError>;

    /// Dispose every text not flagged for persistence
    fn remove_all_temporary(&mut self);
}

/// Owner of the registry, backend, and per-map lifecycle
pub struct WorldTextService<B: TextEntityBackend> {
    registry: Registry,
    backend: B,
    data_dir: PathBuf,
    current_map: Option<String>,
}

impl<B: TextEntityBackend> WorldTextService<B> {
    /// Create a service persisting configs under `data_dir`
    pub fn new(backend: B, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry: Registry::new(),
            backend,
            data_dir: data_dir.into(),
            current_map: None,
        }
    }

    /// The live registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The host backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the host backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Map key of the running map, if one started
    pub fn current_map(&self) -> Option<&str> {
        self.current_map.as_deref()
    }

    /// Host event: a map started
    ///
    /// Resolves the per-map config path and seeds an absent file with the
    /// empty array so later saves and loads always have a file to work on.
    pub fn on_map_start(&mut self, map_key: &str) {
        info!("world texts: map {map_key} started");
        self.current_map = Some(map_key.to_string());
        let path = config::map_config_path(&self.data_dir, map_key);
        if let Err(err) = config::seed_missing(&path) {
            error!("failed to seed world text config {}: {err}", path.display());
        }
        self.registry.set_config_path(path);
    }

    /// Host event: the map ended; drops all state and rewinds ids
    pub fn on_map_end(&mut self) {
        info!("world texts: map ended, registry reset");
        self.registry.reset();
        self.current_map = None;
    }

    /// Host event: a round started
    ///
    /// Loads the per-map config on the first round after map start, then
    /// re-renders every live text in place.
    pub fn on_round_start(&mut self) {
        if let Some(map_key) = self.current_map.clone() {
            if !self.registry.is_loaded() {
                self.registry
                    .load_config(&mut self.backend, &self.data_dir, &map_key);
            }
        }
        self.registry.update_all(&mut self.backend);
    }

    /// Dispose everything live and re-spawn from the config file
    ///
    /// Returns `false` when no map is active.
    pub fn reload(&mut self) -> bool {
        let Some(map_key) = self.current_map.clone() else {
            return false;
        };
        self.registry
            .reload(&mut self.backend, &self.data_dir, &map_key);
        true
    }
}

impl<B: TextEntityBackend> WorldTextApi for WorldTextService<B> {
    fn add_world_text(
        &mut self,
        placement: TextPlacement,
        lines: Vec<TextLine>,
        origin: Vec3,
        rotation: Angles,
        save: bool,
    ) -> TextId {
        self.registry
            .add(&mut self.backend, placement, lines, origin, rotation, save)
    }

    fn add_world_text_at_actor(
        &mut self,
        actor: &dyn ActorState,
        placement: TextPlacement,
        lines: Vec<TextLine>,
        save: bool,
    ) -> TextId {
        let (origin, rotation) = spawn_pose(actor, placement, &lines);
        self.add_world_text(placement, lines, origin, rotation, save)
    }

    fn update_world_text(
        &mut self,
        id: TextId,
        lines: Option<Vec<TextLine>>,
    ) -> Result<(), WorldTextError> {
        self.registry.update(&mut self.backend, id, lines)
    }

    fn remove_world_text(
        &mut self,
        id: TextId,
        remove_from_config: bool,
    ) -> Result<(), WorldTextError> {
        self.registry.remove(&mut self.backend, id, remove_from_config)
    }

    fn teleport_world_text(
        &mut self,
        id: TextId,
        origin: Vec3,
        rotation: Angles,
        modify_config: bool,
    ) -> Result<(), WorldTextError> {
        self.registry
            .teleport(&mut self.backend, id, origin, rotation, modify_config)
    }

    fn line_entities(&self, id: TextId) -> Result<Vec<EntityHandle>, WorldTextError> {
        self.registry.line_entities(id)
    }

    fn find_nearest(&self, point: Vec3, max_distance: f32) -> Option<TextId> {
        self.registry
            .find_nearest(point, max_distance)
            .map(crate::multiline::MultilineText::id)
    }

    fn text_info(&self, id: TextId) -> Result<WorldTextInfo, WorldTextError> {
        self.registry.info(id)
    }

    fn remove_all_temporary(&mut self) {
        self.registry.remove_all_temporary(&mut self.backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryTextBackend;
    use crate::line::Color;

    fn lines(n: usize) -> Vec<TextLine> {
        (0..n)
            .map(|i| TextLine::new(format!("line {i}"), Color::WHITE, 20))
            .collect()
    }

    fn service() -> WorldTextService<MemoryTextBackend> {
        WorldTextService::new(MemoryTextBackend::new(), std::env::temp_dir())
    }

    #[test]
    fn test_spawn_then_line_entities_returns_all_handles() {
        for n in 1..=4 {
            let mut service = service();
            let id = service.add_world_text(
                TextPlacement::Wall,
                lines(n),
                Vec3::new(0.0, 0.0, 50.0),
                Angles::ZERO,
                false,
            );
            let handles = service.line_entities(id).unwrap();
            assert_eq!(handles.len(), n);
            for (i, handle) in handles.iter().enumerate() {
                let entity = service.backend().get(*handle).unwrap();
                assert_eq!(entity.text, format!("line {i}"));
            }
        }
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut service = service();
        assert!(matches!(
            service.update_world_text(42, None),
            Err(WorldTextError::NotFound(42))
        ));
        assert!(matches!(
            service.text_info(42),
            Err(WorldTextError::NotFound(42))
        ));
    }

    #[test]
    fn test_add_at_actor_uses_placement_pose() {
        struct Actor;
        impl ActorState for Actor {
            fn origin(&self) -> Vec3 {
                Vec3::new(0.0, 0.0, 0.0)
            }
            fn rotation(&self) -> Angles {
                Angles::ZERO
            }
            fn eye_offset_z(&self) -> f32 {
                64.0
            }
            fn is_alive(&self) -> bool {
                true
            }
        }
        let mut service = service();
        let id = service.add_world_text_at_actor(&Actor, TextPlacement::Floor, lines(1), false);
        let info = service.text_info(id).unwrap();
        // Floor lift plus the +X nudge for yaw 0.
        assert_eq!(info.origin, Vec3::new(15.0, 0.0, 1.0));
        assert_eq!(info.rotation, Angles::new(0.0, 270.0, 0.0));
        assert!(!info.persisted);
    }

    #[test]
    fn test_remove_all_temporary_via_api() {
        let mut service = service();
        let keep = service.add_world_text(
            TextPlacement::Floor,
            lines(1),
            Vec3::zeros(),
            Angles::ZERO,
            true,
        );
        let drop = service.add_world_text(
            TextPlacement::Floor,
            lines(1),
            Vec3::zeros(),
            Angles::ZERO,
            false,
        );
        service.remove_all_temporary();
        assert!(service.text_info(keep).is_ok());
        assert!(service.text_info(drop).is_err());
    }
}
