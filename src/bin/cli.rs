//! anvil-edit CLI
//!
//! Command-line interface for reading and editing block entities stored
//! in region files.

use std::path::PathBuf;
use std::process::ExitCode;

use anvil_edit::nbt::Compound;
use anvil_edit::{coords, editor, Config, RegionFile, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// anvil-edit CLI
#[derive(Parser, Debug)]
#[command(name = "anvil-edit")]
#[command(about = "Edit block entities inside Anvil region files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Block entity operations
    Map {
        #[command(subcommand)]
        action: MapAction,
    },
}

#[derive(Subcommand, Debug)]
enum MapAction {
    /// Print the block entity at a position as JSON
    Get {
        #[command(flatten)]
        target: Target,
    },

    /// Create a block entity, or update the one already there
    Create {
        #[command(flatten)]
        target: Target,

        /// Block entity id (e.g. minecraft:chest)
        #[arg(long, default_value = "")]
        id: String,

        /// JSON object with extra NBT fields
        #[arg(long, default_value = "")]
        data: String,

        /// Path to a JSON file with extra NBT fields
        #[arg(long)]
        data_file: Option<PathBuf>,
    },

    /// Delete the block entity at a position
    Delete {
        #[command(flatten)]
        target: Target,
    },
}

/// Flags shared by every map subcommand
#[derive(Args, Debug)]
struct Target {
    /// Directory containing r.*.*.mca files
    #[arg(long)]
    region_dir: Option<PathBuf>,

    /// Path to a single region file
    #[arg(long)]
    region_file: Option<PathBuf>,

    /// Block X coordinate
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    x: i32,

    /// Block Y coordinate
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    y: i32,

    /// Block Z coordinate
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    z: i32,

    /// Also print the region path on stdout
    #[arg(long)]
    print_region: bool,
}

const EXIT_ERROR: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,anvil_edit=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Commands::Map { action } = cli.command;
    let outcome = match action {
        MapAction::Get { target } => map_get(&target),
        MapAction::Create {
            target,
            id,
            data,
            data_file,
        } => map_create(&target, &id, data, data_file),
        MapAction::Delete { target } => map_delete(&target),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

// =============================================================================
// Subcommands
// =============================================================================

fn map_get(target: &Target) -> Result<ExitCode> {
    let (region, path) = open_region(target)?;
    let (chunk, _, _) = load_chunk(&region, target)?;
    region.close()?;

    let Some(entity) = editor::find(&chunk, target.x, target.y, target.z) else {
        eprintln!(
            "not found at ({},{},{}) in {}",
            target.x,
            target.y,
            target.z,
            path.display()
        );
        return Ok(ExitCode::from(EXIT_NOT_FOUND));
    };

    println!("{}", serde_json::to_string_pretty(entity)?);
    report_region(target, &path);
    Ok(ExitCode::SUCCESS)
}

fn map_create(
    target: &Target,
    id: &str,
    mut data: String,
    data_file: Option<PathBuf>,
) -> Result<ExitCode> {
    if data.is_empty() {
        if let Some(file) = data_file {
            data = std::fs::read_to_string(file)?;
        }
    }

    let mut overrides = Compound::new();
    editor::merge_overrides(&mut overrides, &data)?;

    let (region, path) = open_region(target)?;
    let (mut chunk, cx, cz) = load_chunk(&region, target)?;
    editor::upsert(&mut chunk, target.x, target.y, target.z, id, &overrides);
    region.write_value(cx, cz, &chunk)?;
    region.close()?;

    println!("ok");
    report_region(target, &path);
    Ok(ExitCode::SUCCESS)
}

fn map_delete(target: &Target) -> Result<ExitCode> {
    let (region, path) = open_region(target)?;
    let (mut chunk, cx, cz) = load_chunk(&region, target)?;

    if !editor::delete(&mut chunk, target.x, target.y, target.z) {
        region.close()?;
        eprintln!("not found at ({},{},{})", target.x, target.y, target.z);
        return Ok(ExitCode::from(EXIT_NOT_FOUND));
    }

    region.write_value(cx, cz, &chunk)?;
    region.close()?;

    println!("ok");
    report_region(target, &path);
    Ok(ExitCode::SUCCESS)
}

// =============================================================================
// Helpers
// =============================================================================

fn open_region(target: &Target) -> Result<(RegionFile, PathBuf)> {
    if let Some(file) = &target.region_file {
        let path = std::fs::canonicalize(file)?;
        let region = RegionFile::open(&path)?;
        return Ok((region, path));
    }
    let Some(dir) = &target.region_dir else {
        return Err(anvil_edit::RegionError::InvalidArgument(
            "either --region-dir or --region-file must be specified".to_string(),
        ));
    };
    let config = Config::builder().region_dir(dir).build();
    RegionFile::open_for_world(&config, target.x, target.z)
}

/// Decode the chunk containing the target block; returns it with its slot
fn load_chunk(region: &RegionFile, target: &Target) -> Result<(Compound, u32, u32)> {
    let (abs_cx, abs_cz) = coords::world_to_chunk(target.x, target.z);
    let (cx, cz) = coords::in_region_chunk(abs_cx, abs_cz);
    tracing::debug!(abs_cx, abs_cz, cx, cz, "loading chunk");
    let chunk = region.read_value(cx, cz)?;
    Ok((chunk, cx, cz))
}

fn report_region(target: &Target, path: &std::path::Path) {
    if target.print_region {
        println!("region: {}", path.display());
    } else {
        eprintln!("region: {}", path.display());
    }
}
