//! fieldmap: command-line front end for annotated map fields.
//!
//! Reads a `Mapdata.json` document (and, where needed, the map image it
//! was drawn on) and runs the geometry and minimap crates over it:
//!
//! - `regenerate`: recompute every field's pin and radius and save
//! - `minimaps`: render one PNG per field into a directory
//! - `list`: print each field's pin, radius and crop window
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin fieldmap -- regenerate Mapdata.json --map-image map.png
//! cargo run --release --bin fieldmap -- minimaps Mapdata.json map.png --out-dir minimaps
//! ```
//!
//! Progress is logged to stderr through `tracing` (`RUST_LOG` overrides
//! the default `info` level); results go to stdout.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use fieldmap_geometry::{FieldRegistry, GeometryConfig, MapData, MapExtent};
use fieldmap_minimap::{minimap_file_name, render_minimap};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error>;

/// Regenerate field pins and render per-field minimaps from map data.
#[derive(Parser)]
#[command(name = "fieldmap", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recompute pins and radii and write the map data back.
    Regenerate(RegenerateArgs),
    /// Render a minimap PNG for every field with a pin and radius.
    Minimaps(MinimapsArgs),
    /// Print a summary of every field.
    List(ListArgs),
}

#[derive(Args)]
struct RegenerateArgs {
    /// Path to the map data JSON.
    mapdata: PathBuf,

    /// Map image, used for the map size when the JSON has none.
    #[arg(long)]
    map_image: Option<PathBuf>,

    /// Where to write the result. Defaults to overwriting `MAPDATA`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep existing pins and only recompute radii from them.
    #[arg(long)]
    keep_pins: bool,

    #[command(flatten)]
    geometry: GeometryArgs,
}

#[derive(Args)]
struct MinimapsArgs {
    /// Path to the map data JSON.
    mapdata: PathBuf,

    /// Map image the fields were drawn on (PNG, JPEG, BMP, WebP).
    map_image: PathBuf,

    /// Directory to write `<name>_minimap.png` files into.
    #[arg(short, long)]
    out_dir: PathBuf,
}

#[derive(Args)]
struct ListArgs {
    /// Path to the map data JSON.
    mapdata: PathBuf,

    /// Map image, used for the map size when the JSON has none.
    #[arg(long)]
    map_image: Option<PathBuf>,

    /// Output as JSON instead of a text table.
    #[arg(long)]
    json: bool,
}

/// Sampling resolution flags shared by commands that recompute geometry.
#[derive(Args)]
struct GeometryArgs {
    /// Steps per axis of the center-finding grid search.
    #[arg(long, default_value_t = GeometryConfig::DEFAULT_GRID_STEPS, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    grid_steps: u32,

    /// Number of rays cast when estimating a field's radius.
    #[arg(long, default_value_t = GeometryConfig::DEFAULT_RAY_COUNT, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    ray_count: u32,

    /// Full geometry config as a JSON string.
    ///
    /// When provided, `--grid-steps` and `--ray-count` are ignored.
    #[arg(long)]
    config_json: Option<String>,
}

/// Build a [`GeometryConfig`] from CLI arguments.
///
/// `--config-json` wins over the individual flags.
fn config_from_args(args: &GeometryArgs) -> Result<GeometryConfig, String> {
    let config = if let Some(ref json) = args.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        GeometryConfig {
            grid_steps: args.grid_steps,
            ray_count: args.ray_count,
        }
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Regenerate(args) => regenerate(&args),
        Command::Minimaps(args) => minimaps(&args),
        Command::List(args) => list(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_map_data(path: &Path) -> Result<MapData, BoxError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("reading {}: {e}", path.display()))?;
    let data = serde_json::from_str(&text)
        .map_err(|e| format!("parsing {}: {e}", path.display()))?;
    Ok(data)
}

/// Map size read from the image header, without decoding pixels.
fn image_extent(path: &Path) -> Result<MapExtent, BoxError> {
    let (width, height) = image::image_dimensions(path)
        .map_err(|e| format!("reading {}: {e}", path.display()))?;
    Ok(MapExtent::new(width, height)?)
}

/// Load map data into a registry, falling back to the map image's size
/// when the document has no `map_size`.
fn load_registry(mapdata: &Path, map_image: Option<&Path>) -> Result<FieldRegistry, BoxError> {
    let data = load_map_data(mapdata)?;
    let fallback = match (data.map_size, map_image) {
        (None, Some(image)) => Some(image_extent(image)?),
        _ => None,
    };
    let registry = FieldRegistry::from_map_data(data, fallback).map_err(|e| {
        format!("{e} (pass --map-image to take the size from the map image)")
    })?;
    info!(
        fields = registry.len(),
        width = registry.extent().width(),
        height = registry.extent().height(),
        "loaded {}",
        mapdata.display()
    );
    Ok(registry)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn regenerate(args: &RegenerateArgs) -> Result<(), BoxError> {
    let config = config_from_args(&args.geometry)?;
    let mut registry = load_registry(&args.mapdata, args.map_image.as_deref())?;
    registry.set_config(config)?;

    let total = registry.len();
    if args.keep_pins {
        registry.refresh_radii()?;
        println!("Refreshed radii for {total} fields");
    } else {
        let updated = registry.regenerate_all();
        println!("Regenerated {updated} of {total} fields");
    }

    let output = args.output.as_deref().unwrap_or(&args.mapdata);
    let json = serde_json::to_string_pretty(&registry.into_map_data())?;
    std::fs::write(output, json).map_err(|e| format!("writing {}: {e}", output.display()))?;
    info!("saved {}", output.display());
    Ok(())
}

fn minimaps(args: &MinimapsArgs) -> Result<(), BoxError> {
    let map = image::open(&args.map_image)
        .map_err(|e| format!("reading {}: {e}", args.map_image.display()))?
        .into_rgba8();
    let extent = MapExtent::new(map.width(), map.height())?;

    // Crop windows must fit the image actually being cropped.
    let mut data = load_map_data(&args.mapdata)?;
    if let Some(stored) = data.map_size
        && stored != extent
    {
        warn!(
            stored_width = stored.width(),
            stored_height = stored.height(),
            image_width = extent.width(),
            image_height = extent.height(),
            "map_size differs from the map image; using the image size"
        );
    }
    data.map_size = Some(extent);
    let registry = FieldRegistry::from_map_data(data, None)?;

    std::fs::create_dir_all(&args.out_dir)
        .map_err(|e| format!("creating {}: {e}", args.out_dir.display()))?;

    let plan = registry.minimap_plan();
    let mut saved = 0;
    for job in &plan {
        let minimap = match render_minimap(&map, job.field, job.crop) {
            Ok(minimap) => minimap,
            Err(e) => {
                warn!(field = %job.field.name, "skipping minimap: {e}");
                continue;
            }
        };
        let path = args.out_dir.join(minimap_file_name(&job.field.name, job.index));
        minimap
            .save(&path)
            .map_err(|e| format!("writing {}: {e}", path.display()))?;
        debug!(field = %job.field.name, crop = ?job.crop, "wrote {}", path.display());
        saved += 1;
    }

    let skipped = registry.len() - saved;
    println!(
        "Saved {saved} minimaps to {} ({skipped} fields skipped)",
        args.out_dir.display()
    );
    Ok(())
}

fn list(args: &ListArgs) -> Result<(), BoxError> {
    let registry = load_registry(&args.mapdata, args.map_image.as_deref())?;

    if args.json {
        let summaries: Vec<_> = registry
            .iter()
            .enumerate()
            .map(|(index, field)| {
                serde_json::json!({
                    "index": index,
                    "fieldname": field.name,
                    "color": field.color,
                    "pinpoint": field.anchor,
                    "radius": field.radius,
                    "crop": registry.crop_box(index).ok().flatten(),
                    "minimap": minimap_file_name(&field.name, index),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!(
        "{:>3}  {:<24} {:>18} {:>8}  crop",
        "#", "field", "pin", "radius"
    );
    for (index, field) in registry.iter().enumerate() {
        let pin = field
            .anchor
            .map_or_else(|| "-".to_string(), |p| format!("({:.1}, {:.1})", p.x, p.y));
        let radius = field
            .radius
            .map_or_else(|| "-".to_string(), |r| format!("{r:.1}"));
        let crop = match registry.crop_box(index) {
            Ok(Some(c)) => format!("{},{} .. {},{}", c.left, c.top, c.right, c.bottom),
            _ => "-".to_string(),
        };
        println!("{index:>3}  {:<24} {pin:>18} {radius:>8}  {crop}", field.name);
    }
    Ok(())
}
