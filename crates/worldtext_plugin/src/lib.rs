//! # WorldText Plugin Glue
//!
//! Binds the [`worldtext`] service to a host: command dispatch, preset
//! tables, and lifecycle event forwarding. The host resolves permissions
//! and parses chat input; this crate gets the already-split arguments and
//! an [`ActorState`] for the invoker.

use std::path::{Path, PathBuf};

use worldtext::host::{ActorState, TextEntityBackend};
use worldtext::prelude::WorldTextService;

pub mod commands;
pub mod presets;

pub use presets::PresetTable;

/// The plugin: service plus presets, driven by host events and commands
pub struct WorldTextPlugin<B: TextEntityBackend> {
    service: WorldTextService<B>,
    presets: PresetTable,
}

impl<B: TextEntityBackend> WorldTextPlugin<B> {
    /// Create a plugin persisting map configs under `data_dir`
    ///
    /// Presets are read from `presets.json` in the same directory, falling
    /// back to the built-in table.
    pub fn new(backend: B, data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let presets = PresetTable::load(&data_dir.join("presets.json"));
        Self {
            service: WorldTextService::new(backend, data_dir),
            presets,
        }
    }

    /// Replace the preset table, e.g. from a custom file location
    pub fn with_presets(mut self, path: &Path) -> Self {
        self.presets = PresetTable::load(path);
        self
    }

    /// The wrapped service
    pub fn service(&self) -> &WorldTextService<B> {
        &self.service
    }

    /// Mutable access to the wrapped service
    pub fn service_mut(&mut self) -> &mut WorldTextService<B> {
        &mut self.service
    }

    /// Host event: a map started
    pub fn on_map_start(&mut self, map_key: &str) {
        self.service.on_map_start(map_key);
    }

    /// Host event: the map ended
    pub fn on_map_end(&mut self) {
        self.service.on_map_end();
    }

    /// Host event: a round started
    pub fn on_round_start(&mut self) {
        self.service.on_round_start();
    }

    /// Dispatch a named command, returning the reply for the invoker
    ///
    /// Unknown names fall through with a short notice so the host can chain
    /// other handlers.
    pub fn dispatch(&mut self, command: &str, actor: &dyn ActorState, args: &[&str]) -> String {
        match command {
            "wt" | "worldtext" => {
                commands::spawn_at_actor(&mut self.service, &self.presets, actor, args)
            }
            "wtpreset" => {
                commands::spawn_preset_at_actor(&mut self.service, &self.presets, actor, args)
            }
            "rwt" | "removeworldtext" => commands::remove_nearest(&mut self.service, actor),
            "wt_reload" => commands::reload(&mut self.service),
            "wti" => commands::info_nearest(&self.service, actor),
            other => format!("[WorldText] Unknown command {other:?}."),
        }
    }
}
