//! REPL – Read-Eval-Print Loop for the waypilot interactive shell.
//!
//! Supported slash-commands:
//!   /help               – show this list
//!   /settings           – interactively edit `~/.waypilot/config.toml`
//!   /paths              – list saved routes
//!   /show <name>        – print the waypoints of a saved route
//!   /record-demo [name] – save the built-in demo route
//!   /run [ticks]        – hunt the demo world along the active route
//!   /quit | /exit       – gracefully exit the CLI

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use waypilot_memory::{PathRepository, PathStore, PathStoreError};
use waypilot_runtime::{LootPolicy, Pilot};
use waypilot_types::Waypoint;

use crate::config::{self, Config};
use crate::demo;
use crate::host::HostLoop;

const DEFAULT_RUN_TICKS: u64 = 400;

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration; when set the REPL exits cleanly.
pub fn run(shutdown: Arc<AtomicBool>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "waypilot>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            continue;
        };
        let arg = words.next();

        match cmd {
            "/help" => cmd_help(),
            "/settings" => cmd_settings(),
            "/paths" => cmd_paths(),
            "/show" => match arg {
                Some(name) => cmd_show(name),
                None => println!("{} /show <name>", "Usage:".yellow()),
            },
            "/record-demo" => cmd_record_demo(arg.unwrap_or("demo")),
            "/run" => match parse_ticks(arg) {
                Some(ticks) => cmd_run(ticks, &shutdown),
                None => println!("{} /run [ticks]", "Usage:".yellow()),
            },
            "/quit" | "/exit" => {
                println!("{}", "Goodbye.".green());
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            other => {
                println!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "/help".bold()
                );
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handlers
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_help() {
    println!();
    println!("{}", "waypilot Commands".bold().underline());
    println!("  {}           – edit ~/.waypilot/config.toml settings", "/settings".bold().cyan());
    println!("  {}              – list saved routes", "/paths".bold().cyan());
    println!("  {}        – print a saved route", "/show <name>".bold().cyan());
    println!("  {} – save the demo route", "/record-demo [name]".bold().cyan());
    println!("  {}        – hunt the demo world along the active route", "/run [ticks]".bold().cyan());
    println!("  {}        – exit the CLI", "/quit  /exit".bold().cyan());
    println!();
}

fn cmd_settings() {
    let mut cfg = match config::load() {
        Ok(Some(c)) => c,
        Ok(None) => Config::default(),
        Err(e) => {
            println!("{}: {}", "Error loading config".red(), e);
            return;
        }
    };

    println!("{}", "Settings Editor".bold().underline());
    println!("  (press Enter to keep the current value)");

    cfg.active_path = prompt_str(
        &format!("  Active route       [{}]: ", cfg.active_path),
        &cfg.active_path,
    );
    cfg.tick_interval_ms = prompt_num(
        &format!("  Tick interval (ms) [{}]: ", cfg.tick_interval_ms),
        cfg.tick_interval_ms,
    )
    .max(1);
    cfg.tuning.heal_below_percent = prompt_num(
        &format!("  Heal below (%)     [{}]: ", cfg.tuning.heal_below_percent),
        cfg.tuning.heal_below_percent,
    )
    .min(100);
    cfg.tuning.heal_potion = prompt_str(
        &format!("  Heal potion        [{}]: ", cfg.tuning.heal_potion),
        &cfg.tuning.heal_potion,
    );
    cfg.tuning.mana_heal_hotkey = prompt_str(
        &format!("  Mana heal hotkey   [{}]: ", cfg.tuning.mana_heal_hotkey),
        &cfg.tuning.mana_heal_hotkey,
    );
    cfg.tuning.combat_enabled = prompt_bool(
        &format!("  Combat enabled     [{}]: ", cfg.tuning.combat_enabled),
        cfg.tuning.combat_enabled,
    );
    cfg.tuning.loot_enabled = prompt_bool(
        &format!("  Loot enabled       [{}]: ", cfg.tuning.loot_enabled),
        cfg.tuning.loot_enabled,
    );
    let policy = prompt_str(
        &format!("  Loot order         [{}]: ", cfg.tuning.loot_policy),
        &cfg.tuning.loot_policy.to_string(),
    );
    cfg.tuning.loot_policy = match policy.to_lowercase().as_str() {
        "newest" => LootPolicy::Newest,
        _ => LootPolicy::Oldest,
    };

    match config::save(&cfg) {
        Ok(()) => println!(
            "{} {}",
            "✓ Settings saved to".green(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
}

fn cmd_paths() {
    let cfg = load_config_or_default();
    let store = PathStore::new(cfg.paths_dir());

    println!("{}", "Saved Routes".bold().underline());
    println!("  Directory : {}", store.dir().display().to_string().dimmed());
    match store.list() {
        Ok(names) if names.is_empty() => {
            println!("  {}", "no routes saved yet".yellow());
            println!("  Try {} to save the demo route.", "/record-demo".bold());
        }
        Ok(names) => {
            for name in names {
                let marker = if name == cfg.active_path { "▶" } else { " " };
                println!("    {} {}", marker.green(), name.bold());
            }
        }
        Err(e) => println!("{}: {}", "Error listing routes".red(), e),
    }
}

fn cmd_show(name: &str) {
    let cfg = load_config_or_default();
    let store = PathStore::new(cfg.paths_dir());
    match store.load(name) {
        Ok(waypoints) => {
            println!("{} {}", "Route".bold().underline(), name.bold());
            for (i, wp) in waypoints.iter().enumerate() {
                println!("  {:>3}  {}", i, describe(wp));
            }
        }
        Err(e) => println!("{}: {}", "Error loading route".red(), e),
    }
}

fn cmd_record_demo(name: &str) {
    let cfg = load_config_or_default();
    let store = PathStore::new(cfg.paths_dir());
    match store.save(name, &demo::route()) {
        Ok(()) => println!(
            "{} {} ({} waypoints)",
            "✓ Saved route".green(),
            name.bold(),
            demo::route().len()
        ),
        Err(e) => println!("{}: {}", "Error saving route".red(), e),
    }
}

fn cmd_run(ticks: u64, shutdown: &AtomicBool) {
    let cfg = load_config_or_default();
    let store = PathStore::new(cfg.paths_dir());

    let waypoints = match resolve_route(&store, &cfg.active_path) {
        Ok(RouteSource::Saved(w)) => {
            println!("  Route   : {} ({} waypoints)", cfg.active_path.bold(), w.len());
            w
        }
        Ok(RouteSource::Demo(w)) => {
            println!(
                "  Route   : {} {}",
                "demo".bold(),
                format!("('{}' not saved)", cfg.active_path).dimmed()
            );
            w
        }
        Err(e) => {
            println!("{}: {}", "Error loading route".red(), e);
            return;
        }
    };

    let host = HostLoop {
        interval: Duration::from_millis(cfg.tick_interval_ms),
        grace_ticks: cfg.shutdown_grace_ticks,
        pace: true,
    };
    let mut pilot = Pilot::new(cfg.tuning.clone());
    let mut world = demo::world();
    let mut route = PathRepository::new(waypoints);

    println!(
        "  Running {} ticks at {} ms. Press {} to stop.",
        ticks.to_string().yellow(),
        cfg.tick_interval_ms,
        "Ctrl-C".bold()
    );
    let summary = host.run(&mut pilot, &mut world, &mut route, ticks, shutdown);

    println!("{}", "═══════════════════════════════════════".bold());
    if summary.interrupted {
        println!(
            "  {} after {} ticks ({} grace)",
            "Stopped".yellow().bold(),
            summary.ticks,
            summary.grace_used
        );
    } else {
        println!("  {} {} ticks", "✓ Completed".green().bold(), summary.ticks);
    }
    let vitals = world.vitals();
    println!("  Position  : {}", summary.final_tile);
    println!(
        "  Vitals    : {}% health, {}% mana",
        vitals.health_percent, vitals.mana_percent
    );
    println!("  Creatures : {} left", world.creatures().len());
    println!("  Corpses   : {} unlooted", world.corpses().len());
    println!("  Waypoint  : {} of {}", route.position(), route.len());
    println!("  Inputs    : {}", world.dispatched().len());
    println!(
        "  Ignored   : {} creatures, {} corpses",
        pilot.ledger().ignored_count(),
        pilot.loot_ledger().skipped().len()
    );
    for (behavior, left) in pilot.cooldowns().active(summary.finished_at) {
        println!(
            "  Disabled  : {} for {:.0}s",
            behavior.yellow(),
            left.as_secs_f32()
        );
    }
    if let Some(task) = summary.last_task {
        println!("  Last task : {}", task.cyan());
    }
    println!("{}", "═══════════════════════════════════════".bold());
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Where the route for `/run` came from.
#[derive(Debug, PartialEq)]
enum RouteSource {
    Saved(Vec<Waypoint>),
    Demo(Vec<Waypoint>),
}

/// Load `name` from the store; an unsaved route falls back to the demo.
fn resolve_route(store: &PathStore, name: &str) -> Result<RouteSource, PathStoreError> {
    match store.load(name) {
        Ok(w) => Ok(RouteSource::Saved(w)),
        Err(PathStoreError::NotFound(_)) => Ok(RouteSource::Demo(demo::route())),
        Err(e) => Err(e),
    }
}

/// `None` when the argument is present but not a positive integer.
fn parse_ticks(arg: Option<&str>) -> Option<u64> {
    match arg {
        None => Some(DEFAULT_RUN_TICKS),
        Some(raw) => raw.parse::<u64>().ok().filter(|&n| n > 0),
    }
}

fn describe(wp: &Waypoint) -> String {
    match wp {
        Waypoint::Move { tile } => format!("move        {tile}"),
        Waypoint::Step { tile, direction } => format!("step        {tile} → {direction}"),
        Waypoint::UseItem {
            item,
            tile,
            direction,
        } => format!("use {item:<7} {tile} → {direction}"),
        Waypoint::RightClick { tile, direction } => format!("right-click {tile} → {direction}"),
    }
}

fn load_config_or_default() -> Config {
    match config::load() {
        Ok(Some(c)) => c,
        Ok(None) => Config::default(),
        Err(e) => {
            println!("{}: {} – using defaults", "Config error".red(), e);
            Config::default()
        }
    }
}

/// Prompt for a number.  Returns `default` when the user presses Enter.
fn prompt_num<T>(msg: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    let raw = prompt_str(msg, &default.to_string());
    match raw.parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            println!(
                "  {} '{}' is not a valid number, keeping {}",
                "Warning:".yellow(),
                raw,
                default
            );
            default
        }
    }
}

fn prompt_bool(msg: &str, default: bool) -> bool {
    match prompt_str(msg, &default.to_string()).to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" => true,
        "false" | "no" | "n" | "off" => false,
        _ => default,
    }
}

/// Prompt for a string value.  Returns `default` when the user presses Enter.
fn prompt_str(msg: &str, default: &str) -> String {
    print!("{}", msg);
    io::stdout().flush().ok();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => {
            let trimmed = line.trim().to_string();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed
            }
        }
        Err(_) => default.to_string(),
    }
}
