//! archbook - Interactive Ansible playbook generator for Arch Linux installs
//!
//! Asks for the target machine, disk layout and system settings, then writes
//! an inventory, roles and a playbook ready for `ansible-playbook`.

use anyhow::Result;
use archbook::cleanup::Cleaner;
use archbook::config::{DiskConfig, GeneratorConfig, LayoutMode, Settings};
use archbook::disk::layouts::print_layout_summary;
use archbook::generate::Generator;
use archbook::utils::prompt::success;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "archbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Dry run mode - show what would be written without touching the disk
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    /// Directory holding generated playbooks
    #[arg(long, global = true, env = "ARCHBOOK_PLAYBOOKS_DIR")]
    playbooks_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a playbook (interactive unless a config file is given)
    Generate {
        /// Path to an answers file
        #[arg(short, long)]
        config: Option<String>,

        /// Playbook name (overrides the answers file)
        #[arg(long)]
        name: Option<String>,
    },

    /// Preview the partition layout for a disk
    Plan {
        /// Target disk device (e.g., /dev/sda)
        #[arg(short, long)]
        device: String,

        /// Layout mode: uefi or bios
        #[arg(short, long, default_value = "uefi")]
        layout: String,

        /// EFI partition size in MiB (default 512 for uefi, 0 for bios)
        #[arg(long, allow_negative_numbers = true)]
        efi_size: Option<i64>,

        /// Swap partition size in GiB
        #[arg(long, allow_negative_numbers = true)]
        swap_size: i64,
    },

    /// Validate an answers file
    Validate {
        /// Path to answers file
        config: String,
    },

    /// Generate a sample answers file
    GenerateConfig {
        /// Output path for the answers file
        #[arg(short, long, default_value = "archbook.toml")]
        output: String,
    },

    /// Remove a generated playbook
    Clean {
        /// Playbook name
        name: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let dry_run = cli.dry_run;
    if dry_run {
        info!("Running in dry-run mode - no files will be written");
    }

    let playbooks_dir = cli.playbooks_dir;

    match cli.command {
        Some(Commands::Generate { config, name }) => {
            cmd_generate(config, name, playbooks_dir, dry_run)?;
        }
        Some(Commands::Plan {
            device,
            layout,
            efi_size,
            swap_size,
        }) => {
            cmd_plan(&device, &layout, efi_size, swap_size)?;
        }
        Some(Commands::Validate { config }) => {
            cmd_validate(&config)?;
        }
        Some(Commands::GenerateConfig { output }) => {
            cmd_generate_config(&output)?;
        }
        Some(Commands::Clean { name, yes }) => {
            cmd_clean(&name, yes, playbooks_dir, dry_run)?;
        }
        None => {
            // Default: run interactive wizard
            cmd_generate(None, None, playbooks_dir, dry_run)?;
        }
    }

    Ok(())
}

fn settings_with(playbooks_dir: Option<PathBuf>, mut settings: Settings) -> Settings {
    if let Some(dir) = playbooks_dir {
        settings.playbooks_dir = dir;
    }
    settings
}

fn cmd_generate(
    config_path: Option<String>,
    name: Option<String>,
    playbooks_dir: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let mut config = if let Some(path) = config_path {
        info!("Loading answers from {}", path);
        let mut config = GeneratorConfig::from_file(&path)?;
        config.settings = settings_with(playbooks_dir, config.settings);
        if let Some(n) = name {
            config.name = n;
        }
        config
    } else {
        info!("Starting interactive playbook wizard");
        GeneratorConfig::from_wizard(name, settings_with(playbooks_dir, Settings::default()))?
    };
    config.name = config.name.trim().to_string();

    let root = Generator::new(config, dry_run).run()?;
    success(&format!("Playbook written to {}", root.display()));
    Ok(())
}

fn cmd_plan(device: &str, layout: &str, efi_size: Option<i64>, swap_size: i64) -> Result<()> {
    let mode: LayoutMode = layout.parse()?;
    let efi_size = efi_size.unwrap_or(match mode {
        LayoutMode::Uefi => 512,
        LayoutMode::Bios => 0,
    });

    let disk = DiskConfig {
        device: device.to_string(),
        layout: mode,
        efi_size_mib: efi_size,
        swap_size_gib: swap_size,
    };
    print_layout_summary(&disk.plan()?);
    Ok(())
}

fn cmd_validate(config_path: &str) -> Result<()> {
    let config = GeneratorConfig::from_file(config_path)?;
    config.validate()?;
    Generator::new(config, true).prepare()?;
    success("Configuration is valid");
    Ok(())
}

fn cmd_generate_config(output: &str) -> Result<()> {
    let sample = GeneratorConfig::sample();
    let content = sample.to_toml()?;
    std::fs::write(output, content)?;
    success(&format!("Sample configuration written to {}", output));
    Ok(())
}

fn cmd_clean(name: &str, yes: bool, playbooks_dir: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let settings = settings_with(playbooks_dir, Settings::default());
    Cleaner::new(dry_run).clean(&settings, name, yes)?;
    Ok(())
}
