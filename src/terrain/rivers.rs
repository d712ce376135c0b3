use super::constants::*;
use super::growth::{Arrival, GrowthFailure, GrowthPolicy, Walk, grow_path};
use super::hex::{hex_distance, pixel_to_hex};
use super::smoothing::{PixelPolyline, smooth_path};
use super::water::find_nearest_water;
use super::{HexCoord, HexPath, TerrainGrid, TerrainType};
use crate::config::RiverSettings;
use crate::rng::Mulberry32;
use glam::DVec2;
use std::collections::HashSet;
use tracing::{debug, info};

/// How candidate steps are weighted while a river grows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiverWeighting {
    /// Favour plains, then any land, scaled by progress toward the target
    TerrainCost,
    /// Favour steps along the normal of recent momentum, only moving closer
    /// to the target when that is possible
    Meander,
}

/// Length limits and weighting for a single river
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiverShape {
    pub min_length: usize,
    pub max_length: usize,
    pub weighting: RiverWeighting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct River {
    pub hexes: HexPath,
    pub points: PixelPolyline,
}

/// Committed rivers and every tile they claim
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiverNetwork {
    rivers: Vec<River>,
    occupied: HashSet<HexCoord>,
}

impl RiverNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self, coord: HexCoord) -> bool {
        self.occupied.contains(&coord)
    }

    pub fn commit(&mut self, river: River) {
        self.occupied.extend(river.hexes.iter().copied());
        self.rivers.push(river);
    }

    pub fn rivers(&self) -> &[River] {
        &self.rivers
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    pub fn len(&self) -> usize {
        self.rivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rivers.is_empty()
    }
}

struct RiverPolicy<'a> {
    shape: RiverShape,
    existing: &'a RiverNetwork,
}

impl RiverPolicy<'_> {
    fn meander_weights(&self, walk: &Walk, candidates: &[HexCoord]) -> Vec<(HexCoord, f64)> {
        let current = walk.current();
        let momentum: DVec2 = walk.recent_steps(MEANDER_HISTORY).sum();
        let bias = momentum.perp();

        let remaining = hex_distance(current, walk.target);
        let closer: Vec<HexCoord> = candidates
            .iter()
            .copied()
            .filter(|&c| hex_distance(c, walk.target) < remaining)
            .collect();
        let pool = if closer.is_empty() { candidates } else { &closer };

        pool.iter()
            .map(|&c| (c, 1.0 + bias.dot(current.step_to(c)).abs()))
            .collect()
    }

    fn terrain_weights(&self, walk: &Walk, grid: &TerrainGrid, candidates: &[HexCoord]) -> Vec<(HexCoord, f64)> {
        let span = hex_distance(walk.source, walk.target).max(1) as f64;

        candidates
            .iter()
            .map(|&c| {
                let terrain_weight = match grid.get(c) {
                    Some(TerrainType::Plains) => RIVER_PLAINS_WEIGHT,
                    Some(TerrainType::Water) | None => 1.0,
                    Some(_) => RIVER_LAND_WEIGHT,
                };
                let progress = (1.0 - hex_distance(c, walk.target) as f64 / span)
                    .max(RIVER_MIN_PROGRESS_WEIGHT);
                (c, terrain_weight * (1.0 + progress))
            })
            .collect()
    }
}

impl GrowthPolicy for RiverPolicy<'_> {
    fn length_budget(&self) -> usize {
        self.shape.max_length
    }

    fn arrive(&self, walk: &Walk, grid: &TerrainGrid) -> Arrival {
        if walk.len() >= self.shape.min_length && grid.is_water(walk.current()) {
            Arrival::Reached
        } else {
            Arrival::Pending
        }
    }

    fn admits(&self, walk: &Walk, grid: &TerrainGrid, candidate: HexCoord) -> bool {
        walk.len() >= self.shape.min_length || !grid.is_water(candidate)
    }

    fn shortcut(&self, walk: &Walk, grid: &TerrainGrid, candidates: &[HexCoord]) -> Option<HexCoord> {
        if walk.len() < self.shape.min_length {
            return None;
        }
        candidates.iter().copied().find(|&c| grid.is_water(c))
    }

    fn weigh(&self, walk: &Walk, grid: &TerrainGrid, candidates: &[HexCoord]) -> Vec<(HexCoord, f64)> {
        match self.shape.weighting {
            RiverWeighting::Meander => self.meander_weights(walk, candidates),
            RiverWeighting::TerrainCost => self.terrain_weights(walk, grid, candidates),
        }
    }

    fn check_step(&self, next: HexCoord) -> Result<(), GrowthFailure> {
        if self.existing.is_occupied(next) {
            Err(GrowthFailure::Collision(next))
        } else {
            Ok(())
        }
    }
}

/// Grow one river from `source` until it runs into water.
///
/// Water is off limits until the path holds `min_length` tiles; after that
/// the first water neighbour ends the river immediately. Drawing a tile
/// already claimed by `existing` abandons the whole river. Only paths that
/// end on water are returned, and `existing` is never modified.
pub fn generate_river_path(
    source: HexCoord,
    target: HexCoord,
    grid: &TerrainGrid,
    rng: &mut Mulberry32,
    shape: RiverShape,
    existing: &RiverNetwork,
) -> Result<HexPath, GrowthFailure> {
    let policy = RiverPolicy { shape, existing };
    grow_path(&policy, source, target, grid, rng)
}

/// Run up to `settings.count` river attempts, each from a randomly removed
/// mountain toward its nearest water tile. The first attempt uses terrain
/// cost weighting and the rest meander. A successful river is smoothed and
/// committed, and a land tile under its final point becomes wetland.
pub fn generate_rivers(
    grid: &mut TerrainGrid,
    mut sources: Vec<HexCoord>,
    waters: &[HexCoord],
    settings: &RiverSettings,
    scale: f64,
    rng: &mut Mulberry32,
) -> RiverNetwork {
    let mut network = RiverNetwork::new();

    for attempt in 0..settings.count {
        if sources.is_empty() || waters.is_empty() {
            break;
        }

        let source = sources.remove(rng.below(sources.len()));
        let Some(target) = find_nearest_water(source, waters) else {
            break;
        };

        let shape = RiverShape {
            min_length: settings.min_length as usize,
            max_length: settings.max_length as usize,
            weighting: if attempt == 0 {
                RiverWeighting::TerrainCost
            } else {
                RiverWeighting::Meander
            },
        };

        match generate_river_path(source, target, grid, rng, shape, &network) {
            Ok(hexes) => {
                let points = smooth_path(
                    &hexes,
                    rng,
                    settings.curvature.get(),
                    settings.segments.get(),
                    scale,
                );

                if let Some(&mouth) = points.last() {
                    let tile = pixel_to_hex(mouth, scale);
                    if grid.get(tile).is_some_and(|t| !t.is_water()) {
                        grid.set(tile, TerrainType::Wetland);
                    }
                }

                debug!("River {} from {} reached water in {} tiles", network.len(), source, hexes.len());
                network.commit(River { hexes, points });
            }
            Err(failure) => debug!("River from {} toward {} abandoned: {}", source, target, failure),
        }
    }

    info!(
        "Placed {} of {} requested rivers covering {} tiles",
        network.len(),
        settings.count,
        network.occupied_count()
    );
    network
}
