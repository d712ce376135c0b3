use clap::Parser;
use hexmapper::config::{load_config, load_config_from, save_config};
use hexmapper::errors::HexMapResult;
use hexmapper::map::{HexMap, MapGenerator};
use std::path::PathBuf;
use tracing::Level;

mod mapgen {
    pub mod cli_utils;
    pub mod config_builder;
    pub mod preview;
}

use mapgen::cli_utils::*;
use mapgen::config_builder::ConfigBuilder;
use mapgen::preview::{PREVIEW_SCALE, write_preview};

#[derive(Parser, Clone)]
#[command(name = "mapgen")]
#[command(about = "Generate seeded hex maps with rivers, roads and labels")]
struct Args {
    /// Map size in tiles (format: WIDTHxHEIGHT); defaults to the config value
    #[arg(long)]
    size: Option<String>,

    /// Random seed for reproducible generation
    #[arg(long)]
    seed: Option<u32>,

    /// Terrain mix preset (balanced, water-heavy, forest-heavy)
    #[arg(long)]
    preset: Option<String>,

    /// Clustering preset (none, normal)
    #[arg(long)]
    clustering: Option<String>,

    /// Config file to start from instead of the user config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of rivers to attempt
    #[arg(long)]
    rivers: Option<u32>,

    /// Number of roads to attempt
    #[arg(long)]
    roads: Option<u32>,

    /// River length bounds in tiles (format: MIN,MAX)
    #[arg(long)]
    river_length: Option<String>,

    /// Tile scale used for pixel paths
    #[arg(long)]
    scale: Option<f64>,

    /// Write a PNG preview of the generated map to this path
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Save the effective configuration to the user config file
    #[arg(long)]
    save_config: bool,

    /// Log every generation step
    #[arg(long, short)]
    verbose: bool,
}

fn build_generator(args: &Args) -> HexMapResult<MapGenerator> {
    let base = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };
    let size = args.size.as_deref().map(parse_size).transpose()?;
    let river_length = args.river_length.as_deref().map(parse_length_range).transpose()?;

    let config = ConfigBuilder::new(base)
        .preset(args.preset.clone())
        .clustering(args.clustering.clone())
        .size(size)
        .rivers(args.rivers)
        .roads(args.roads)
        .river_length(river_length)
        .scale(args.scale)
        .build()?;

    MapGenerator::new(config)
}

fn main() -> HexMapResult<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let generator = build_generator(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let map = generator.generate(seed)?;

    if args.save_config {
        let path = save_config(generator.config())?;
        println!("Config saved to: {}", path.display());
    }

    if let Some(path) = &args.preview {
        write_preview(&map, path, PREVIEW_SCALE)?;
        println!("Preview written to: {}", path.display());
    }

    print_map_summary(&map);
    Ok(())
}

fn print_map_summary(map: &HexMap) {
    let (pixel_width, pixel_height) = map.pixel_size();

    println!("\nMap summary:");
    println!("  Seed: {}", map.seed);
    println!(
        "  Terrain: {}x{} tiles at scale {} ({:.0}x{:.0} px)",
        map.terrain.width, map.terrain.height, map.scale, pixel_width, pixel_height
    );
    for (terrain, count) in map.terrain_counts() {
        let share = count as f64 * 100.0 / map.terrain.len() as f64;
        println!("    {terrain}: {count} tiles ({share:.1}%)");
    }
    println!(
        "  Features: {} mountain ranges, {} wheatfields, {} settlements",
        map.mountain_ranges,
        map.wheatfields,
        map.settlements.len()
    );
    println!(
        "  Rivers: {} ({} tiles)",
        map.rivers.len(),
        map.rivers.occupied_count()
    );
    println!(
        "  Roads: {} ({} bridges, {} settlements unconnected)",
        map.roads.len(),
        map.roads.bridges.len(),
        map.roads.unconnected
    );
    println!(
        "  Water: {} lakes, {} coastal tiles",
        map.lakes.len(),
        map.coastal_waters.len()
    );

    if !map.labels.is_empty() {
        println!("  Labels:");
        for label in &map.labels {
            let subtitle = label.subtitle();
            if subtitle.is_empty() {
                println!("    {} at {} ({})", label.name, label.coord, label.terrain);
            } else {
                println!(
                    "    {} at {} ({}): {}",
                    label.name, label.coord, label.terrain, subtitle
                );
            }
        }
    }
}
