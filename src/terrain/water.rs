use super::hex::{hex_distance, neighbors};
use super::{HexCoord, TerrainGrid};
use pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Closest water tile to `start` by hex distance. Ties go to the earliest
/// entry in `waters`.
pub fn find_nearest_water(start: HexCoord, waters: &[HexCoord]) -> Option<HexCoord> {
    let mut nearest = None;
    let mut best = i32::MAX;
    for &water in waters {
        let distance = hex_distance(start, water);
        if distance < best {
            best = distance;
            nearest = Some(water);
        }
    }
    nearest
}

/// Connected water regions that never touch land, in row-major discovery order.
/// Regions running off the map edge still count as enclosed as long as every
/// in-bounds neighbour is water.
pub fn find_enclosed_lakes(grid: &TerrainGrid) -> Vec<Vec<HexCoord>> {
    let mut visited: HashSet<HexCoord> = HashSet::new();
    let mut lakes = Vec::new();

    for coord in grid.coords() {
        if !grid.is_water(coord) || visited.contains(&coord) {
            continue;
        }

        let region: Vec<HexCoord> = bfs_reach(coord, |&c| {
            neighbors(c, grid.width, grid.height)
                .into_iter()
                .filter(|&n| grid.is_water(n))
        })
        .collect();
        visited.extend(region.iter().copied());

        let enclosed = region.iter().all(|&c| {
            neighbors(c, grid.width, grid.height)
                .into_iter()
                .all(|n| grid.is_water(n))
        });
        if enclosed {
            lakes.push(region);
        }
    }

    lakes
}

/// Water tiles with at least one land neighbour, row-major
pub fn find_coastal_waters(grid: &TerrainGrid) -> Vec<HexCoord> {
    grid.coords()
        .filter(|&coord| grid.is_water(coord))
        .filter(|&coord| {
            neighbors(coord, grid.width, grid.height)
                .into_iter()
                .any(|n| !grid.is_water(n))
        })
        .collect()
}
