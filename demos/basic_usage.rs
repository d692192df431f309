//! Walkthrough of the plugin lifecycle: register achievements, attach
//! conditions and progress, unlock by polling and by host event, save the
//! world, reload it, and watch the history replay silently.
//!
//! Run with `cargo run --example basic_usage`.

use voxel_achievements::achievements::{DEFAULT_ART, GamerId, ModId, Player, Progress, Session};
use voxel_achievements::save::WorldSaves;
use voxel_achievements::{AchievementsApi, AchievementsPlugin, HostEvent, ItemId, PluginConfig};

/// Stand-in for the host's running world.
struct Game {
    day: u32,
    blocks_mined: u32,
}

impl Session for Game {
    fn days_into_game(&self) -> u32 {
        self.day
    }
}

/// Stand-in for a connected player.
struct Gamer(u64);

impl Player for Gamer {
    fn gamer_id(&self) -> GamerId {
        GamerId(self.0)
    }
}

fn register_content(plugin: &mut AchievementsPlugin<Game, Gamer>) {
    let owner = ModId::new("demo");

    plugin.add_achievement(
        &owner,
        "miner",
        "Miner",
        "Mine 10 blocks",
        DEFAULT_ART,
        DEFAULT_ART,
    );
    plugin
        .add_unlock_condition(&owner, "miner", Box::new(|game: &Game, _| game.blocks_mined >= 10))
        .unwrap();
    plugin
        .add_progress_func(
            &owner,
            "miner",
            Box::new(|game: &Game, _| Progress::new((game.blocks_mined as f32 / 10.0).min(1.0))),
        )
        .unwrap();

    plugin.add_achievement(
        &owner,
        "author",
        "Author",
        "Write a book",
        DEFAULT_ART,
        DEFAULT_ART,
    );
    plugin.subscribe(
        "book_written",
        Box::new(|view, ctx, player, _| {
            view.manager
                .unlock_achievement(ctx, player, &ModId::new("demo"), "author");
        }),
    );
}

fn report(plugin: &AchievementsPlugin<Game, Gamer>, player: &Gamer) {
    let manager = plugin.manager();
    println!("  unlocked:");
    for a in manager.unlocked_achievements(player) {
        println!("    [x] {} - {}", a.name(), a.desc());
    }
    println!("  locked:");
    for a in manager.locked_achievements(player) {
        println!("    [ ] {} - {}", a.name(), a.desc());
    }
}

fn main() {
    let owner = ModId::new("demo");
    let mut game = Game {
        day: 3,
        blocks_mined: 0,
    };
    let player = Gamer(7);

    let save_dir = std::env::temp_dir().join("voxel_achievements_demo");
    let saves = WorldSaves::new(&save_dir).expect("save directory");

    let mut plugin = AchievementsPlugin::new(PluginConfig::default(), 64);
    register_content(&mut plugin);
    println!("registered {} achievements", plugin.manager().len());
    report(&plugin, &player);

    // Part-way there: progress reports but nothing unlocks.
    game.blocks_mined = 4;
    plugin.update(&game, &player, 0.05);
    let progress = plugin
        .get_progress(&game, &player, &owner, "miner")
        .expect("miner has progress");
    println!(
        "\nafter mining 4 blocks, miner progress: {}",
        progress.text.as_deref().unwrap_or("?")
    );

    // Enough blocks: the poller picks it up within a frame or two.
    game.blocks_mined = 12;
    plugin.update(&game, &player, 0.05);
    plugin.update(&game, &player, 0.05);

    // An event-driven unlock goes through the handler table.
    plugin.handle_event(&game, &player, &HostEvent::BookWritten);
    plugin.handle_event(&game, &player, &HostEvent::ItemCrafted { item: ItemId(7) });
    plugin.update(&game, &player, 0.05);

    println!("\nafter playing:");
    report(&plugin, &player);
    for toast in plugin.notifications().visible() {
        let unlocked = plugin
            .manager()
            .achievement(toast.handle)
            .expect("toast names a registered achievement");
        println!("  toast: {} (chime: {})", unlocked.name(), toast.sound);
    }
    println!(
        "  crafted item 7: {} time(s)",
        plugin.crafted_count(&player, ItemId(7))
    );

    plugin.save_world(&saves, 107).expect("save world");
    println!("\nsaved to {}", saves.dir().display());

    // A fresh session with the same content: loading replays the history
    // silently on the player's first update.
    let mut reloaded = AchievementsPlugin::new(PluginConfig::default(), 64);
    register_content(&mut reloaded);
    reloaded.load_world(&saves).expect("load world");
    reloaded.update(&game, &player, 0.05);

    println!("\nafter reload:");
    report(&reloaded, &player);
    println!(
        "  queued toasts after replay: {} (replay is silent)",
        reloaded.notifications().len()
    );
    println!(
        "  crafted item 7: {} time(s)",
        reloaded.crafted_count(&player, ItemId(7))
    );
}
