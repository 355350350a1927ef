//! Headless demo session
//!
//! Drives the plugin against the in-memory host the way a game server
//! would: map start, round start, admin commands, API calls, reload, map
//! end. Run with `RUST_LOG=debug` to watch the registry work.

use worldtext::prelude::*;
use worldtext_plugin::WorldTextPlugin;

struct DemoAdmin {
    origin: Vec3,
    rotation: Angles,
}

impl ActorState for DemoAdmin {
    fn origin(&self) -> Vec3 {
        self.origin
    }

    fn rotation(&self) -> Angles {
        self.rotation
    }

    fn eye_offset_z(&self) -> f32 {
        64.0
    }

    fn is_alive(&self) -> bool {
        true
    }
}

fn main() {
    env_logger::init();

    let data_dir = std::env::temp_dir().join("worldtext_demo");
    if let Err(err) = std::fs::create_dir_all(&data_dir) {
        eprintln!("cannot create {}: {err}", data_dir.display());
        return;
    }
    println!("map configs under {}", data_dir.display());

    let mut plugin = WorldTextPlugin::new(MemoryTextBackend::new(), &data_dir);
    plugin.on_map_start("de_demo");
    plugin.on_round_start();

    let admin = DemoAdmin {
        origin: Vec3::new(100.0, 250.0, 0.0),
        rotation: Angles::new(0.0, 87.0, 0.0),
    };

    for (command, args) in [
        ("wt", vec!["wall"]),
        ("wtpreset", vec!["floor", "warning", "26"]),
        ("wti", vec![]),
    ] {
        println!("> {command} {}", args.join(" "));
        println!("{}", plugin.dispatch(command, &admin, &args));
    }

    // API-driven consumer: a transient scoreboard the next round wipes.
    let service = plugin.service_mut();
    let scoreboard = service.add_world_text(
        TextPlacement::Wall,
        vec![
            TextLine::new("Round 1", Color::WHITE, 30),
            TextLine::new("0 : 0", Color::LIME, 26),
        ],
        Vec3::new(0.0, 0.0, 160.0),
        Angles::new(0.0, 270.0, 90.0),
        false,
    );
    service
        .update_world_text(
            scoreboard,
            Some(vec![
                TextLine::new("Round 2", Color::WHITE, 30),
                TextLine::new("1 : 0", Color::LIME, 26),
            ]),
        )
        .expect("scoreboard is live");
    service.remove_all_temporary();

    println!("> rwt");
    println!("{}", plugin.dispatch("rwt", &admin, &[]));
    println!("> wt_reload");
    println!("{}", plugin.dispatch("wt_reload", &admin, &[]));

    let registry = plugin.service().registry();
    println!(
        "{} text(s) live, {} host entit(ies)",
        registry.len(),
        plugin.service().backend().len()
    );
    for text in registry.texts() {
        println!(
            "  #{} {} {} line(s) at {}",
            text.id(),
            text.placement(),
            text.lines().len(),
            worldtext::geometry::format_vector(&text.origin()),
        );
    }

    plugin.on_map_end();
}
