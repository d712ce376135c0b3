use crate::config::GeneratorConfig;
use crate::errors::HexMapResult;
use crate::labels::{MapLabel, place_labels};
use crate::rng::Mulberry32;
use crate::terrain::constants::{HEX_HEIGHT, HEX_WIDTH, HORIZONTAL_SPACING_RATIO, VERTICAL_SPACING_RATIO};
use crate::terrain::features::{carve_mountain_ranges, generate_wheat_fields_around_settlements};
use crate::terrain::field::generate_terrain_map;
use crate::terrain::rivers::{RiverNetwork, generate_rivers};
use crate::terrain::roads::{RoadNetwork, generate_road_network};
use crate::terrain::water::{find_coastal_waters, find_enclosed_lakes};
use crate::terrain::{HexCoord, TerrainGrid, TerrainType};
use tracing::info;

/// Everything produced by one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct HexMap {
    pub seed: u32,
    pub scale: f64,
    pub terrain: TerrainGrid,
    pub mountain_ranges: usize,
    pub wheatfields: usize,
    pub settlements: Vec<HexCoord>,
    pub rivers: RiverNetwork,
    pub roads: RoadNetwork,
    pub labels: Vec<MapLabel>,
    pub lakes: Vec<Vec<HexCoord>>,
    pub coastal_waters: Vec<HexCoord>,
}

impl HexMap {
    /// Pixel extent of the tiled map at its scale, including the half-row
    /// drop of odd columns
    pub fn pixel_size(&self) -> (f64, f64) {
        let hex_width = HEX_WIDTH * self.scale;
        let hex_height = HEX_HEIGHT * self.scale;
        let h_spacing = hex_width * HORIZONTAL_SPACING_RATIO;
        let v_spacing = hex_height * VERTICAL_SPACING_RATIO;
        let column_drop = if self.terrain.width > 1 { v_spacing / 2.0 } else { 0.0 };

        (
            h_spacing * (self.terrain.width - 1) as f64 + hex_width,
            v_spacing * (self.terrain.height - 1) as f64 + hex_height + column_drop,
        )
    }

    /// Tile count per terrain type, skipping types that do not occur
    pub fn terrain_counts(&self) -> Vec<(TerrainType, usize)> {
        TerrainType::ALL
            .into_iter()
            .map(|terrain| (terrain, self.terrain.count(terrain)))
            .filter(|&(_, count)| count > 0)
            .collect()
    }
}

/// Runs the generation pipeline for a validated configuration
#[derive(Debug, Clone)]
pub struct MapGenerator {
    config: GeneratorConfig,
}

impl MapGenerator {
    pub fn new(config: GeneratorConfig) -> HexMapResult<Self> {
        config.validate_all()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a complete map. The terrain field draws from its own stream
    /// seeded with `seed`; every later stage shares a second stream with the
    /// same seed, in this order: mountain ranges, wheatfields, rivers, roads,
    /// labels.
    pub fn generate(&self, seed: u32) -> HexMapResult<HexMap> {
        let config = &self.config;
        let scale = config.scale_factor;
        info!(
            "Generating {}x{} map with seed {}",
            config.width, config.height, seed
        );

        let mut terrain = generate_terrain_map(config.width, config.height, seed, &config.terrain)?;
        let mut rng = Mulberry32::new(seed);

        let mountain_ranges = carve_mountain_ranges(&mut terrain, &mut rng);
        let mountains = terrain.positions_of(TerrainType::Mountain);
        let waters = terrain.positions_of(TerrainType::Water);
        let settlements = terrain.positions_of(TerrainType::Urban);
        info!(
            "Terrain ready: {} mountain ranges, {} mountains, {} water tiles, {} settlements",
            mountain_ranges,
            mountains.len(),
            waters.len(),
            settlements.len()
        );

        let wheatfields = generate_wheat_fields_around_settlements(&mut terrain, &settlements, &mut rng);
        let rivers = generate_rivers(&mut terrain, mountains, &waters, &config.rivers, scale, &mut rng);
        let roads = generate_road_network(&settlements, &terrain, &mut rng, &config.roads, scale, &rivers);
        let labels = place_labels(&terrain, &config.labels, &mut rng, scale);

        let lakes = find_enclosed_lakes(&terrain);
        let coastal_waters = find_coastal_waters(&terrain);
        info!(
            "Map complete: {} rivers, {} roads, {} labels, {} lakes",
            rivers.len(),
            roads.len(),
            labels.len(),
            lakes.len()
        );

        Ok(HexMap {
            seed,
            scale,
            terrain,
            mountain_ranges,
            wheatfields,
            settlements,
            rivers,
            roads,
            labels,
            lakes,
            coastal_waters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TerrainSettings, terrain_preset};
    use crate::errors::HexMapError;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            width: 18,
            height: 14,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_full_pipeline_is_deterministic() {
        let generator = MapGenerator::new(small_config()).unwrap();
        let a = generator.generate(42).unwrap();
        let b = generator.generate(42).unwrap();
        assert_eq!(a, b);

        let c = generator.generate(43).unwrap();
        assert_ne!(a.terrain, c.terrain);
    }

    #[test]
    fn test_full_pipeline_invariants() {
        let generator = MapGenerator::new(small_config()).unwrap();
        for seed in [1, 7, 99, 2024] {
            let map = generator.generate(seed).unwrap();
            assert_eq!(map.terrain.len(), 18 * 14);
            assert!((1..=2).contains(&map.mountain_ranges));
            assert_eq!(map.terrain.count(TerrainType::WheatField), map.wheatfields);

            for river in map.rivers.rivers() {
                assert!(map.terrain.is_water(*river.hexes.last().unwrap()));
                assert!(river.hexes.len() > generator.config().rivers.min_length as usize);
            }
            for path in &map.roads.hex_paths {
                assert!(path.iter().all(|&tile| !map.terrain.is_water(tile)));
            }
            assert_eq!(map.roads.polylines.len(), map.roads.hex_paths.len());
            assert!(map.labels.len() <= map.terrain.len());
        }
    }

    #[test]
    fn test_terrain_stage_matches_field_generator() {
        let mut config = GeneratorConfig {
            width: 10,
            height: 10,
            terrain: terrain_preset("balanced").unwrap(),
            ..GeneratorConfig::default()
        };
        config.rivers.count = 0;
        config.roads.count = 0;

        let map = MapGenerator::new(config.clone()).unwrap().generate(42).unwrap();
        let field = generate_terrain_map(10, 10, 42, &config.terrain).unwrap();

        // Later stages only ever turn tiles into mountain or wheatfield here
        for coord in field.coords() {
            let before = field.get(coord).unwrap();
            let after = map.terrain.get(coord).unwrap();
            assert!(
                before == after
                    || after == TerrainType::Mountain
                    || (before == TerrainType::Plains && after == TerrainType::WheatField),
                "{coord}: {before} became {after}"
            );
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.terrain.insert(TerrainType::Water, TerrainSettings::new(95, 0.0));
        assert!(matches!(
            MapGenerator::new(config),
            Err(HexMapError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_pixel_size() {
        let mut config = small_config();
        config.scale_factor = 0.5;
        let map = MapGenerator::new(config).unwrap().generate(5).unwrap();
        let (width, height) = map.pixel_size();
        assert!((width - (233.0 * 0.75 * 17.0 + 233.0)).abs() < 1e-9);
        assert!(height > 202.5 * 0.866 * 13.0);

        let total: usize = map.terrain_counts().iter().map(|&(_, n)| n).sum();
        assert_eq!(total, map.terrain.len());
    }
}
