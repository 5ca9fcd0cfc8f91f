//! `waypilot` – command line front end for the waypilot scheduler.
//!
//! 1. Initialises tracing (`RUST_LOG`, `WAYPILOT_LOG_FORMAT=json`, and an
//!    OTLP exporter when `OTEL_EXPORTER_OTLP_ENDPOINT` is set).
//! 2. Writes a default `~/.waypilot/config.toml` on first run.
//! 3. Drops the user into an **interactive REPL** with slash-commands
//!    (`/settings`, `/paths`, `/run`, `/help`).
//! 4. Intercepts **Ctrl-C**: a running hunt stops at the next tick boundary,
//!    after any pending floor change or loot has been confirmed.

mod config;
mod demo;
mod host;
mod repl;

use colored::Colorize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

fn main() {
    let _telemetry = waypilot_runtime::init_tracing("waypilot");

    print_banner();

    // ── Shared shutdown flag ──────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – stopping at the next safe tick …".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; graceful shutdown on Ctrl-C will not be available");
    }

    // ── First run ─────────────────────────────────────────────────────────
    match config::load() {
        Ok(None) => write_default_config(),
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            println!("  Active route: {}", cfg.active_path.bold());
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
        }
    }

    println!();
    println!("  Type {} for a list of commands.\n", "/help".bold().cyan());

    repl::run(shutdown);
}

fn write_default_config() {
    println!("  No configuration found.  Writing defaults.");
    match config::save(&config::Config::default()) {
        Ok(()) => println!(
            "  {} Config saved to {}",
            "✓".green().bold(),
            config::config_path().display().to_string().bold()
        ),
        Err(e) => println!("{}: {}", "Error saving config".red(), e),
    }
    println!(
        "  Try {} then {} to watch the demo hunt.",
        "/record-demo".bold(),
        "/run".bold()
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"                          _ __      __ "#.bold().cyan());
    println!("{}", r#" _    _____ ___ _____  (_) /__  / /_"#.bold().cyan());
    println!("{}", r#"| |/|/ / _ `/ // / _ \/ / / _ \/ __/"#.bold().cyan());
    println!("{}", r#"|__,__/\_,_/\_, / .__/_/_/\___/\__/ "#.bold().cyan());
    println!("{}", r#"           /___/_/                  "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "waypilot".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Tick-driven hunting scheduler");
    println!();
}
