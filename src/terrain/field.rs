use super::hex::neighbors;
use super::{HexCoord, TerrainGrid, TerrainTable, TerrainType};
use crate::config::TerrainSettings;
use crate::errors::{HexMapError, HexMapResult};
use crate::rng::Mulberry32;
use tracing::debug;

/// Normalized base weights and clustering coefficients, indexed by
/// [`TerrainType::index`]
struct FieldWeights {
    base: [f64; TerrainType::COUNT],
    clustering: [f64; TerrainType::COUNT],
}

impl FieldWeights {
    fn from_settings(settings: &TerrainTable<TerrainSettings>) -> HexMapResult<Self> {
        let mut base = [0.0; TerrainType::COUNT];
        let mut clustering = [0.0; TerrainType::COUNT];

        for (terrain, entry) in settings.iter() {
            if terrain.is_field_generated() {
                base[terrain.index()] = entry.percentage.fraction();
            }
            clustering[terrain.index()] = entry.clustering.get();
        }

        let total: f64 = base.iter().sum();
        if total <= 0.0 {
            return Err(HexMapError::InvalidConfig {
                reason: "At least one terrain type needs a non-zero percentage".to_string(),
            });
        }
        for weight in &mut base {
            *weight /= total;
        }

        Ok(Self { base, clustering })
    }

    /// Draw a terrain given how many of each type already surround the cell
    fn sample(&self, counts: &[u32; TerrainType::COUNT], rng: &mut Mulberry32) -> TerrainType {
        let mut adjusted = [0.0; TerrainType::COUNT];
        for (i, weight) in adjusted.iter_mut().enumerate() {
            *weight = self.base[i] * (1.0 + self.clustering[i] * counts[i] as f64);
        }

        // Repulsion can push the total to zero or below
        let mut total: f64 = adjusted.iter().sum();
        if total <= 0.0 {
            total = 1.0;
        }

        let roll = rng.next_f64();
        let mut cumulative = 0.0;
        for terrain in TerrainType::ALL {
            cumulative += adjusted[terrain.index()] / total;
            if roll <= cumulative {
                return terrain;
            }
        }
        TerrainType::Plains
    }
}

/// Fill a `width` x `height` grid from a fresh stream seeded with `seed`.
///
/// Cells are visited row-major and each one only counts neighbours that were
/// already assigned (smaller `r`, or same `r` and smaller `q`). Changing that
/// order changes every generated map.
pub fn generate_terrain_map(
    width: u32,
    height: u32,
    seed: u32,
    settings: &TerrainTable<TerrainSettings>,
) -> HexMapResult<TerrainGrid> {
    if width == 0 || height == 0 {
        return Err(HexMapError::InvalidGridSize { width, height });
    }

    let weights = FieldWeights::from_settings(settings)?;
    let mut rng = Mulberry32::new(seed);
    let mut cells: Vec<TerrainType> = Vec::with_capacity(width as usize * height as usize);

    for r in 0..height as i32 {
        for q in 0..width as i32 {
            let mut counts = [0u32; TerrainType::COUNT];
            for n in neighbors(HexCoord::new(q, r), width, height) {
                if n.r < r || (n.r == r && n.q < q) {
                    let assigned = cells[n.r as usize * width as usize + n.q as usize];
                    counts[assigned.index()] += 1;
                }
            }
            cells.push(weights.sample(&counts, &mut rng));
        }
    }

    debug!("Generated {}x{} terrain field from seed {}", width, height, seed);
    TerrainGrid::new(width, height, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{apply_clustering_preset, terrain_preset};

    fn mix(entries: &[(TerrainType, u32, f64)]) -> TerrainTable<TerrainSettings> {
        entries
            .iter()
            .map(|&(terrain, pct, clustering)| (terrain, TerrainSettings::new(pct, clustering)))
            .collect()
    }

    fn parse_rows(rows: &[&str]) -> Vec<TerrainType> {
        rows.iter()
            .flat_map(|row| row.split_whitespace())
            .map(|name| name.parse().unwrap())
            .collect()
    }

    #[test]
    fn test_every_cell_assigned() {
        let settings = terrain_preset("balanced").unwrap();
        let grid = generate_terrain_map(13, 7, 99, &settings).unwrap();
        assert_eq!(grid.len(), 13 * 7);
        assert!(grid.cells().iter().all(|t| t.is_field_generated()));
    }

    #[test]
    fn test_same_seed_same_grid() {
        let mut settings = terrain_preset("forest-heavy").unwrap();
        apply_clustering_preset(&mut settings, "normal");

        let a = generate_terrain_map(30, 20, 1234, &settings).unwrap();
        let b = generate_terrain_map(30, 20, 1234, &settings).unwrap();
        let c = generate_terrain_map(30, 20, 1235, &settings).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_half_water_half_plains_converges() {
        let settings = mix(&[
            (TerrainType::Water, 50, 0.0),
            (TerrainType::Plains, 50, 0.0),
        ]);
        let grid = generate_terrain_map(100, 100, 2024, &settings).unwrap();

        let water = grid.count(TerrainType::Water) as f64 / grid.len() as f64;
        assert!((water - 0.5).abs() < 0.05, "water fraction was {water}");
        assert_eq!(
            grid.count(TerrainType::Water) + grid.count(TerrainType::Plains),
            grid.len()
        );
    }

    #[test]
    fn test_single_type_fills_grid() {
        let settings = mix(&[(TerrainType::Dune, 100, 2.0)]);
        let grid = generate_terrain_map(6, 6, 5, &settings).unwrap();
        assert_eq!(grid.count(TerrainType::Dune), 36);
    }

    #[test]
    fn test_strong_repulsion_falls_back_to_weights_of_one() {
        // With two water and two forest predecessors every weight is zero;
        // the total is replaced by one and the draw falls through to plains.
        let settings = mix(&[
            (TerrainType::Water, 50, -0.5),
            (TerrainType::Forest, 50, -0.5),
        ]);
        let grid = generate_terrain_map(20, 20, 77, &settings).unwrap();
        assert_eq!(grid.len(), 400);
        assert!(
            grid.cells()
                .iter()
                .all(|t| matches!(t, TerrainType::Water | TerrainType::Forest | TerrainType::Plains))
        );
    }

    #[test]
    fn test_negative_total_never_picks_repelled_type() {
        // One water predecessor gives water 0.5 * (1 - 10) and a negative total
        let settings = mix(&[
            (TerrainType::Water, 50, -10.0),
            (TerrainType::Forest, 50, 0.0),
        ]);
        let grid = generate_terrain_map(30, 30, 11, &settings).unwrap();

        let mut repelled = 0;
        for coord in grid.coords() {
            let has_water_predecessor = neighbors(coord, 30, 30)
                .into_iter()
                .filter(|n| n.r < coord.r || (n.r == coord.r && n.q < coord.q))
                .any(|n| grid.is_water(n));
            if has_water_predecessor {
                repelled += 1;
                assert_ne!(grid.get(coord), Some(TerrainType::Water), "{coord} next to water");
            }
        }
        assert!(repelled > 0);
        assert!(grid.count(TerrainType::Water) < 450);
    }

    #[test]
    fn test_zero_percentages_rejected() {
        let settings = mix(&[(TerrainType::Water, 0, 0.0)]);
        assert!(generate_terrain_map(4, 4, 1, &settings).is_err());
        let settings = mix(&[(TerrainType::Water, 100, 0.0)]);
        assert!(matches!(
            generate_terrain_map(0, 4, 1, &settings),
            Err(HexMapError::InvalidGridSize { .. })
        ));
    }

    #[test]
    fn test_wheatfield_percentage_ignored() {
        let settings = mix(&[
            (TerrainType::Plains, 50, 0.0),
            (TerrainType::WheatField, 50, 0.0),
        ]);
        let grid = generate_terrain_map(10, 10, 3, &settings).unwrap();
        assert_eq!(grid.count(TerrainType::Plains), 100);
    }

    #[test]
    fn test_seed_42_balanced_fixture() {
        let settings = terrain_preset("balanced").unwrap();
        let grid = generate_terrain_map(10, 10, 42, &settings).unwrap();

        let expected = parse_rows(&[
            "forest plains mountain forest water plains wetland forest mountain plains",
            "wetland mountain forest plains water plains forest forest water plains",
            "forest water plains water wetland water water forest plains water",
            "water forest plains forest plains plains water water plains plains",
            "wetland forest wetland plains forest mountain plains wetland wetland wetland",
            "water forest forest forest mountain water mountain plains mountain water",
            "water water plains plains forest mountain water forest mountain wetland",
            "forest water plains forest water urban plains mountain plains plains",
            "plains plains plains forest wetland plains forest forest urban mountain",
            "plains plains wetland water forest plains forest mountain water plains",
        ]);
        assert_eq!(grid.cells(), expected.as_slice());
    }

    #[test]
    fn test_seed_7_clustered_fixture() {
        let mut settings = terrain_preset("balanced").unwrap();
        apply_clustering_preset(&mut settings, "normal");
        let grid = generate_terrain_map(8, 6, 7, &settings).unwrap();

        let expected = parse_rows(&[
            "water water urban forest plains plains plains wetland",
            "wetland forest water water forest plains wetland plains",
            "wetland plains water urban water forest wetland water",
            "water water plains forest water mountain plains plains",
            "plains urban plains mountain mountain water water water",
            "plains water water forest plains wetland water mountain",
        ]);
        assert_eq!(grid.cells(), expected.as_slice());
    }
}
