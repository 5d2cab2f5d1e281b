//! CLI entry point for hypr-app-macros
//!
//! Provides command-line interface for listing registered applications,
//! checking hotkey conflicts, running macros and exporting hotkeys.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use hypr_app_macros::automation::{ClientMode, HyprlandClient};
use hypr_app_macros::config::{self, RegistryConfig, DEFAULT_CONFIG_PATH, DEFAULT_EXPORT_PATH};
use hypr_app_macros::core::MacroOutcome;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hypr-app-macros")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the application registry file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List applications, their macros and hotkeys
    List,

    /// Validate the registry file and check for hotkey conflicts
    Check,

    /// Run a macro of a registered application
    Run {
        /// Registered application name
        app: String,

        /// Macro name
        #[arg(value_name = "MACRO")]
        macro_name: String,

        /// Print the commands instead of sending them to Hyprland
        #[arg(long)]
        dry_run: bool,
    },

    /// Show which registered application owns the focused window
    Active,

    /// Write hotkeys as a Hyprland bind snippet
    Export {
        /// Output file
        #[arg(short, long, default_value = DEFAULT_EXPORT_PATH)]
        output: PathBuf,
    },

    /// Register hotkeys with the running Hyprland instance
    Apply,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = RegistryConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::List => list_applications(&config),
        Commands::Check => check_conflicts(&config),
        Commands::Run { app, macro_name, dry_run } => run_macro(&config, &app, &macro_name, dry_run),
        Commands::Active => show_active(&config),
        Commands::Export { output } => export_hotkeys(&config, &output),
        Commands::Apply => apply_hotkeys(&config),
    }
}

/// Config path to pass along in hotkey commands, `None` for the default file
fn forwarded_config(config: &RegistryConfig) -> anyhow::Result<Option<&Path>> {
    let default = config::expand_path(Path::new(DEFAULT_CONFIG_PATH))?;

    if config.path() == default.as_path() {
        Ok(None)
    } else {
        Ok(Some(config.path()))
    }
}

/// List all applications in the registry
fn list_applications(config: &RegistryConfig) -> anyhow::Result<()> {
    let registry = config.registry();

    println!("{}", format!("Applications from: {}\n", config.path().display()).bold());

    for (name, descriptor) in registry.iter() {
        println!("{} {}", name.cyan().bold(), format!("{}", descriptor).dimmed());

        for macro_name in registry.macro_names(descriptor)? {
            println!("  {} {}", "•".green(), macro_name);
        }
    }

    if !config.hotkeys().is_empty() {
        println!("\n{}", "Hotkeys".bold());
        for hotkey in config.hotkeys() {
            println!(
                "{} → {}.{}",
                format!("{}", hotkey.key_combo).cyan().bold(),
                hotkey.app.green(),
                hotkey.macro_name
            );
        }
    }

    if let Some(layout) = config.layout() {
        println!("\n{} Layout forced to {}", "→".cyan(), layout);
    }

    println!(
        "\n{} Total: {} applications, {} hotkeys",
        "✓".green(),
        registry.len(),
        config.hotkeys().len()
    );

    Ok(())
}

/// Check hotkeys for conflicts
fn check_conflicts(config: &RegistryConfig) -> anyhow::Result<()> {
    println!("{} Parsed config: {}", "→".cyan(), config.path().display());
    println!(
        "{} Found {} applications and {} hotkeys\n",
        "✓".green(),
        config.registry().len(),
        config.hotkeys().len()
    );

    let conflicts = config.conflicts();

    if conflicts.is_empty() {
        println!("{} {}", "✓".green().bold(), "No conflicts detected!".bold());
        return Ok(());
    }

    println!(
        "{} Found {} conflict{}:\n",
        "✗".red().bold(),
        conflicts.len(),
        if conflicts.len() == 1 { "" } else { "s" }
    );

    for (i, conflict) in conflicts.iter().enumerate() {
        println!(
            "{} {}",
            format!("Conflict {}", i + 1).yellow().bold(),
            format!("{}", conflict.key_combo).cyan()
        );

        for (idx, target) in conflict.targets.iter().enumerate() {
            println!("  {} {}", format!("{}.", idx + 1).dimmed(), target.magenta());
        }
        println!();
    }

    println!("{}", "⚠ Only one of these macros will run!".yellow());
    std::process::exit(1);
}

/// Run one macro, live or as a dry run
fn run_macro(config: &RegistryConfig, app: &str, macro_name: &str, dry_run: bool) -> anyhow::Result<()> {
    let mode = if dry_run { ClientMode::DryRun } else { ClientMode::Live };
    let client = HyprlandClient::new(mode).with_layout(config.layout().cloned());

    let outcome = config.registry().invoke(app, macro_name, &client)?;

    if dry_run {
        for command in client.sent_commands() {
            println!("{} {}", "→".cyan(), command);
        }
    }

    if outcome == MacroOutcome::Skipped {
        println!("{} {} has no window, macro skipped", "⚠".yellow(), app.bold());
    }

    Ok(())
}

/// Show which registered application owns the focused window
fn show_active(config: &RegistryConfig) -> anyhow::Result<()> {
    let client = HyprlandClient::new(ClientMode::ReadOnly);

    let Some((class, title)) = client.focused_window()? else {
        println!("{}", "No focused window".yellow());
        return Ok(());
    };

    match config.registry().find_by_window(&class, &title) {
        Some((name, descriptor)) => {
            println!("{} {} ({})", "✓".green(), name.cyan().bold(), title);
            for macro_name in config.registry().macro_names(descriptor)? {
                println!("  {} {}", "•".green(), macro_name);
            }
        }
        None => println!("{} {} [{}] is not registered", "✗".red(), title, class),
    }

    Ok(())
}

/// Export hotkeys as a bind snippet
fn export_hotkeys(config: &RegistryConfig, output: &Path) -> anyhow::Result<()> {
    let output = config::expand_path(output)?;

    config::write_hotkeys(&output, config.hotkeys(), forwarded_config(config)?)?;

    println!(
        "{} Wrote {} hotkeys to {}",
        "✓".green(),
        config.hotkeys().len(),
        output.display()
    );
    println!("  Add {} to hyprland.conf", format!("source = {}", output.display()).cyan());

    Ok(())
}

/// Register every hotkey with the running compositor
fn apply_hotkeys(config: &RegistryConfig) -> anyhow::Result<()> {
    let conflicts = config.conflicts();
    if !conflicts.is_empty() {
        println!(
            "{} {} conflicting hotkey combination(s), run `check` for details",
            "⚠".yellow(),
            conflicts.len()
        );
    }

    let client = HyprlandClient::new(ClientMode::Live);
    let forwarded = forwarded_config(config)?;

    for hotkey in config.hotkeys() {
        client
            .add_hotkey(hotkey, forwarded)
            .with_context(|| format!("Failed to bind {}", hotkey))?;
    }

    println!("{} Applied {} hotkeys", "✓".green(), config.hotkeys().len());

    Ok(())
}
