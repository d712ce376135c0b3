use super::constants::*;
use super::hex::neighbors;
use super::{HexCoord, TerrainGrid, TerrainType};
use crate::rng::Mulberry32;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Stamp a wandering run of mountain tiles starting at `start`.
///
/// The heading drifts by up to 45 degrees per step and the position is
/// clamped to the grid, so a range that hits an edge slides along it.
pub fn generate_mountain_range(start: HexCoord, grid: &mut TerrainGrid, rng: &mut Mulberry32) {
    let length = MOUNTAIN_RANGE_MIN_LENGTH + rng.below(MOUNTAIN_RANGE_LENGTH_SPREAD);
    let mut heading = rng.next_f64() * TAU;
    let mut current = start;
    let max_q = grid.width as i32 - 1;
    let max_r = grid.height as i32 - 1;

    for _ in 0..length {
        if !grid.set(current, TerrainType::Mountain) {
            continue;
        }

        heading += rng.centered() * FRAC_PI_2;
        current.q = (current.q + heading.cos().round() as i32).clamp(0, max_q);
        current.r = (current.r + heading.sin().round() as i32).clamp(0, max_r);
    }
}

/// Carve one or two ranges from random starting tiles; returns how many
pub fn carve_mountain_ranges(grid: &mut TerrainGrid, rng: &mut Mulberry32) -> usize {
    let ranges = rng.below(MAX_MOUNTAIN_RANGES) + 1;
    for _ in 0..ranges {
        let start = HexCoord::new(
            rng.below(grid.width as usize) as i32,
            rng.below(grid.height as usize) as i32,
        );
        generate_mountain_range(start, grid, rng);
    }
    ranges
}

/// Turn plains next to each settlement into wheatfields. Neighbours are
/// visited in direction-table order and a draw is only made for plains tiles
/// while the settlement is under its cap. Returns the number converted.
pub fn generate_wheat_fields_around_settlements(
    grid: &mut TerrainGrid,
    settlements: &[HexCoord],
    rng: &mut Mulberry32,
) -> usize {
    let mut converted = 0;

    for &settlement in settlements {
        let mut fields = 0;
        for n in neighbors(settlement, grid.width, grid.height) {
            if fields < MAX_WHEATFIELDS_PER_SETTLEMENT
                && grid.get(n) == Some(TerrainType::Plains)
                && rng.next_f64() < WHEATFIELD_CHANCE
            {
                grid.set(n, TerrainType::WheatField);
                fields += 1;
            }
        }
        converted += fields;
    }

    converted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mountain_range_length_bounds() {
        for seed in 0..50 {
            let mut grid = TerrainGrid::filled(30, 30, TerrainType::Plains).unwrap();
            let mut rng = Mulberry32::new(seed);
            generate_mountain_range(HexCoord::new(15, 15), &mut grid, &mut rng);

            let mountains = grid.count(TerrainType::Mountain);
            assert!((1..10).contains(&mountains), "seed {seed}: {mountains} tiles");
            assert_eq!(grid.get(HexCoord::new(15, 15)), Some(TerrainType::Mountain));
        }
    }

    #[test]
    fn test_mountain_range_stays_in_bounds_at_corner() {
        let mut grid = TerrainGrid::filled(3, 3, TerrainType::Water).unwrap();
        let mut rng = Mulberry32::new(11);
        generate_mountain_range(HexCoord::new(0, 0), &mut grid, &mut rng);
        assert!(grid.count(TerrainType::Mountain) >= 1);
        assert_eq!(grid.len(), 9);
    }

    #[test]
    fn test_mountain_range_is_deterministic() {
        let run = |seed| {
            let mut grid = TerrainGrid::filled(12, 12, TerrainType::Forest).unwrap();
            let mut rng = Mulberry32::new(seed);
            carve_mountain_ranges(&mut grid, &mut rng);
            grid
        };
        assert_eq!(run(8), run(8));
    }

    #[test]
    fn test_carve_count() {
        for seed in 0..20 {
            let mut grid = TerrainGrid::filled(10, 10, TerrainType::Plains).unwrap();
            let mut rng = Mulberry32::new(seed);
            let ranges = carve_mountain_ranges(&mut grid, &mut rng);
            assert!(ranges == 1 || ranges == 2);
        }
    }

    #[test]
    fn test_wheatfields_only_replace_plains() {
        let mut grid = TerrainGrid::filled(5, 5, TerrainType::Plains).unwrap();
        let town = HexCoord::new(2, 2);
        grid.set(town, TerrainType::Urban);
        grid.set(HexCoord::new(3, 2), TerrainType::Forest);

        let mut rng = Mulberry32::new(3);
        let converted = generate_wheat_fields_around_settlements(&mut grid, &[town], &mut rng);

        assert_eq!(grid.count(TerrainType::WheatField), converted);
        assert!(converted <= 5);
        assert_eq!(grid.get(HexCoord::new(3, 2)), Some(TerrainType::Forest));
        assert_eq!(grid.get(town), Some(TerrainType::Urban));
        for n in neighbors(town, 5, 5) {
            assert_ne!(grid.get(n), Some(TerrainType::Water));
        }
    }

    #[test]
    fn test_wheatfields_draw_only_for_plains() {
        // No plains around the settlement, so the stream is left untouched
        let mut grid = TerrainGrid::filled(4, 4, TerrainType::Forest).unwrap();
        let town = HexCoord::new(1, 1);
        grid.set(town, TerrainType::Urban);

        let mut rng = Mulberry32::new(21);
        let converted = generate_wheat_fields_around_settlements(&mut grid, &[town], &mut rng);
        assert_eq!(converted, 0);
        assert_eq!(rng.next_f64(), Mulberry32::new(21).next_f64());
    }
}
