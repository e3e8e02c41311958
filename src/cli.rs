use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{BuildConfig, Frontend, Strategy};
use crate::desktop;
use crate::web;

#[derive(Parser)]
#[command(name = "punchpack")]
#[command(about = "Release build and packaging tool for the punchcards frontends")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build one frontend in release mode and package it for upload
    Package {
        /// Frontend to build and package
        #[arg(long, value_enum)]
        frontend: Frontend,

        /// Directory release bundles are staged under
        #[arg(long)]
        build_path: PathBuf,

        /// Directory finished uploads are written to
        #[arg(long)]
        upload_path: PathBuf,

        /// Path to the frontend crate
        #[arg(long)]
        crate_path: PathBuf,

        /// Repository root holding README.md and LICENSE
        #[arg(long)]
        root_path: PathBuf,

        /// Target OS tag baked into the bundle name
        #[arg(long)]
        os: String,
    },

    /// Check that the external tools the packager shells out to are available
    Doctor,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Package {
            frontend,
            build_path,
            upload_path,
            crate_path,
            root_path,
            os,
        } => package_command(frontend, build_path, upload_path, crate_path, root_path, os),
        Commands::Doctor => doctor_command(),
    }
}

fn package_command(
    frontend: Frontend,
    build_path: PathBuf,
    upload_path: PathBuf,
    crate_path: PathBuf,
    root_path: PathBuf,
    os: String,
) -> Result<()> {
    let config = BuildConfig::resolve(frontend, build_path, upload_path, crate_path, root_path, os)?;

    println!(
        "Packaging {} v{} for {}",
        config.frontend.as_str(),
        config.version,
        config.os
    );

    match config.frontend.strategy() {
        Strategy::Desktop {
            binary_name,
            output_prefix,
        } => desktop::package(&config, &binary_name, &output_prefix),
        Strategy::Web => web::package(&config),
    }
}

fn doctor_command() -> Result<()> {
    println!("punchpack doctor - checking required tools...\n");

    check_command_available("cargo", "Rust toolchain")?;
    check_command_available("git", "revision stamping")?;
    check_command_available("bash", "web build script")?;

    println!("\n✓ punchpack doctor check complete");

    Ok(())
}

fn check_command_available(command: &str, description: &str) -> Result<()> {
    match which::which(command) {
        Ok(path) => {
            println!("✓ {} found at: {}", description, path.display());
            Ok(())
        }
        Err(_) => {
            println!("✗ {} not found ({})", description, command);
            Err(anyhow::anyhow!("{} is required but not found in PATH", description))
        }
    }
}
