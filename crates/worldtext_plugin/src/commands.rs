//! Command handlers
//!
//! Thin glue between the host's command dispatch and the service. Each
//! handler validates its arguments, requires a live actor, performs one
//! service operation, and returns a short status string for the invoker.
//! Permission checks belong to the host dispatcher and are not repeated
//! here.

use worldtext::host::{ActorState, TextEntityBackend};
use worldtext::prelude::{TextPlacement, WorldTextApi, WorldTextService};

use crate::presets::{PresetTable, DEFAULT_FONT_SIZE};

/// Search radius for the nearest-text commands, in world units
pub const NEAREST_RANGE: f32 = 100.0;

const PREFIX: &str = "[WorldText]";

fn require_alive(actor: &dyn ActorState) -> Option<String> {
    if actor.is_alive() {
        None
    } else {
        Some(format!("{PREFIX} Only live players can use this command."))
    }
}

fn parse_placement(arg: &str) -> Result<TextPlacement, String> {
    arg.parse()
        .map_err(|()| format!("{PREFIX} Invalid placement {arg:?}. Use 'floor' or 'wall'."))
}

/// Spawn the default preset at the actor: `<floor|wall>`
pub fn spawn_at_actor<B: TextEntityBackend>(
    service: &mut WorldTextService<B>,
    presets: &PresetTable,
    actor: &dyn ActorState,
    args: &[&str],
) -> String {
    let Some(arg) = args.first() else {
        return format!("{PREFIX} Usage: <floor|wall>");
    };
    if let Some(refusal) = require_alive(actor) {
        return refusal;
    }
    let placement = match parse_placement(arg) {
        Ok(placement) => placement,
        Err(message) => return message,
    };

    let lines = presets.default_preset().to_lines(DEFAULT_FONT_SIZE);
    let id = service.add_world_text_at_actor(actor, placement, lines, true);
    format!("{PREFIX} Spawned text {id}. Edit the map config to change its content.")
}

/// Spawn a named preset at the actor: `<floor|wall> <preset> <font_size>`
pub fn spawn_preset_at_actor<B: TextEntityBackend>(
    service: &mut WorldTextService<B>,
    presets: &PresetTable,
    actor: &dyn ActorState,
    args: &[&str],
) -> String {
    let [placement_arg, preset_arg, size_arg] = args else {
        return format!("{PREFIX} Usage: <floor|wall> <preset> <font_size>");
    };
    if let Some(refusal) = require_alive(actor) {
        return refusal;
    }
    let placement = match parse_placement(placement_arg) {
        Ok(placement) => placement,
        Err(message) => return message,
    };
    let Ok(font_size) = size_arg.parse::<u32>() else {
        return format!("{PREFIX} Invalid font size {size_arg:?}.");
    };
    let Some(preset) = presets.get(preset_arg) else {
        return format!(
            "{PREFIX} Unknown preset {preset_arg:?}. Available: {}.",
            presets.names().join(", ")
        );
    };

    let id = service.add_world_text_at_actor(actor, placement, preset.to_lines(font_size), true);
    format!("{PREFIX} Spawned preset {} as text {id}.", preset.name)
}

/// Remove the nearest text within range of the actor
pub fn remove_nearest<B: TextEntityBackend>(
    service: &mut WorldTextService<B>,
    actor: &dyn ActorState,
) -> String {
    if let Some(refusal) = require_alive(actor) {
        return refusal;
    }
    let Some(id) = service.find_nearest(actor.origin(), NEAREST_RANGE) else {
        return format!("{PREFIX} Move closer to the text you want to remove.");
    };
    match service.remove_world_text(id, true) {
        Ok(()) => format!("{PREFIX} Text {id} removed."),
        Err(err) => format!("{PREFIX} {err}"),
    }
}

/// Dispose everything live and re-spawn from the config file
pub fn reload<B: TextEntityBackend>(service: &mut WorldTextService<B>) -> String {
    if service.reload() {
        format!("{PREFIX} Configuration reloaded.")
    } else {
        format!("{PREFIX} No active map.")
    }
}

/// Describe the nearest text within range of the actor
pub fn info_nearest<B: TextEntityBackend>(
    service: &WorldTextService<B>,
    actor: &dyn ActorState,
) -> String {
    if let Some(refusal) = require_alive(actor) {
        return refusal;
    }
    let Some(id) = service.find_nearest(actor.origin(), NEAREST_RANGE) else {
        return format!("{PREFIX} Move closer to a text to inspect it.");
    };
    match service.text_info(id) {
        Ok(info) => format!(
            "{PREFIX} Text {id}: {} placement, {} line(s), at {} rot {}, saved in config: {}",
            info.placement,
            info.line_count,
            worldtext::geometry::format_vector(&info.origin),
            info.rotation,
            if info.persisted { "yes" } else { "no" },
        ),
        Err(err) => format!("{PREFIX} {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldtext::prelude::*;

    struct TestActor {
        origin: Vec3,
        alive: bool,
    }

    impl ActorState for TestActor {
        fn origin(&self) -> Vec3 {
            self.origin
        }
        fn rotation(&self) -> Angles {
            Angles::ZERO
        }
        fn eye_offset_z(&self) -> f32 {
            64.0
        }
        fn is_alive(&self) -> bool {
            self.alive
        }
    }

    fn actor() -> TestActor {
        TestActor {
            origin: Vec3::zeros(),
            alive: true,
        }
    }

    fn service() -> WorldTextService<MemoryTextBackend> {
        WorldTextService::new(MemoryTextBackend::new(), std::env::temp_dir())
    }

    #[test]
    fn test_spawn_requires_placement_argument() {
        let mut service = service();
        let reply = spawn_at_actor(&mut service, &PresetTable::default(), &actor(), &[]);
        assert!(reply.contains("Usage"));
        assert!(service.registry().is_empty());
    }

    #[test]
    fn test_spawn_rejects_dead_actor() {
        let mut service = service();
        let dead = TestActor {
            origin: Vec3::zeros(),
            alive: false,
        };
        let reply = spawn_at_actor(&mut service, &PresetTable::default(), &dead, &["floor"]);
        assert!(reply.contains("live players"));
        assert!(service.registry().is_empty());
    }

    #[test]
    fn test_spawn_rejects_unknown_placement() {
        let mut service = service();
        let reply = spawn_at_actor(&mut service, &PresetTable::default(), &actor(), &["ceiling"]);
        assert!(reply.contains("Invalid placement"));
        assert!(service.registry().is_empty());
    }

    #[test]
    fn test_spawn_creates_default_preset_text() {
        let mut service = service();
        let reply = spawn_at_actor(&mut service, &PresetTable::default(), &actor(), &["wall"]);
        assert!(reply.contains("Spawned text"));
        assert_eq!(service.registry().len(), 1);
        let text = &service.registry().texts()[0];
        assert_eq!(text.placement(), TextPlacement::Wall);
        assert_eq!(text.lines().len(), 3);
        assert!(text.save_to_config());
    }

    #[test]
    fn test_spawn_preset_applies_uniform_size() {
        let mut service = service();
        let reply = spawn_preset_at_actor(
            &mut service,
            &PresetTable::default(),
            &actor(),
            &["floor", "warning", "28"],
        );
        assert!(reply.contains("Spawned preset warning"));
        let text = &service.registry().texts()[0];
        assert!(text.lines().iter().all(|line| line.font_size == 28));
    }

    #[test]
    fn test_spawn_preset_reports_unknown_name() {
        let mut service = service();
        let reply = spawn_preset_at_actor(
            &mut service,
            &PresetTable::default(),
            &actor(),
            &["floor", "nope", "28"],
        );
        assert!(reply.contains("Unknown preset"));
        assert!(service.registry().is_empty());
    }

    #[test]
    fn test_remove_nearest_requires_proximity() {
        let mut service = service();
        service.add_world_text(
            TextPlacement::Floor,
            vec![TextLine::new("far", Color::WHITE, 20)],
            Vec3::new(500.0, 0.0, 0.0),
            Angles::ZERO,
            false,
        );
        let reply = remove_nearest(&mut service, &actor());
        assert!(reply.contains("Move closer"));
        assert_eq!(service.registry().len(), 1);
    }

    #[test]
    fn test_remove_nearest_removes_in_range() {
        let mut service = service();
        service.add_world_text(
            TextPlacement::Floor,
            vec![TextLine::new("near", Color::WHITE, 20)],
            Vec3::new(30.0, 0.0, 0.0),
            Angles::ZERO,
            false,
        );
        let reply = remove_nearest(&mut service, &actor());
        assert!(reply.contains("removed"));
        assert!(service.registry().is_empty());
    }

    #[test]
    fn test_info_nearest_describes_text() {
        let mut service = service();
        service.add_world_text(
            TextPlacement::Wall,
            vec![TextLine::new("a", Color::WHITE, 20), TextLine::new("b", Color::WHITE, 20)],
            Vec3::new(10.0, 0.0, 0.0),
            Angles::new(0.0, 270.0, 90.0),
            false,
        );
        let reply = info_nearest(&service, &actor());
        assert!(reply.contains("Wall placement"));
        assert!(reply.contains("2 line(s)"));
        assert!(reply.contains("saved in config: no"));
    }

    #[test]
    fn test_reload_without_map_reports_it() {
        let mut service = service();
        assert!(reload(&mut service).contains("No active map"));
    }
}
