use super::constants::*;
use super::growth::{Arrival, GrowthFailure, GrowthPolicy, Walk, grow_path};
use super::hex::hex_distance;
use super::rivers::RiverNetwork;
use super::smoothing::{PixelPolyline, offset_path, smooth_path};
use super::{HexCoord, HexPath, TerrainGrid, TerrainType};
use crate::config::RoadSettings;
use crate::rng::Mulberry32;
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadNetwork {
    pub hex_paths: Vec<HexPath>,
    /// Smoothed and offset pixel paths, one per entry in `hex_paths`
    pub polylines: Vec<PixelPolyline>,
    /// Settlements the spanning phase could not reach
    pub unconnected: usize,
    /// Road tiles that are also river tiles, in first-seen order
    pub bridges: Vec<HexCoord>,
}

impl RoadNetwork {
    pub fn len(&self) -> usize {
        self.hex_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hex_paths.is_empty()
    }
}

struct RoadPolicy;

impl GrowthPolicy for RoadPolicy {
    fn length_budget(&self) -> usize {
        ROAD_MAX_STEPS.min(ROAD_MAX_LENGTH) + 1
    }

    fn arrive(&self, walk: &Walk, _grid: &TerrainGrid) -> Arrival {
        if walk.current() == walk.target {
            Arrival::Reached
        } else if hex_distance(walk.current(), walk.target) < ROAD_SNAP_DISTANCE {
            Arrival::SnapTo(walk.target)
        } else {
            Arrival::Pending
        }
    }

    fn admits(&self, _walk: &Walk, grid: &TerrainGrid, candidate: HexCoord) -> bool {
        !grid.is_water(candidate)
    }

    fn weigh(&self, walk: &Walk, grid: &TerrainGrid, candidates: &[HexCoord]) -> Vec<(HexCoord, f64)> {
        let span = hex_distance(walk.source, walk.target).max(1) as f64;

        candidates
            .iter()
            .map(|&c| {
                let terrain_weight = match grid.get(c) {
                    Some(TerrainType::Plains) => ROAD_PLAINS_WEIGHT,
                    Some(TerrainType::Forest) => ROAD_FOREST_WEIGHT,
                    Some(TerrainType::Mountain) => ROAD_MOUNTAIN_WEIGHT,
                    _ => 1.0,
                };
                let progress = 1.0 - hex_distance(c, walk.target) as f64 / span;
                (c, terrain_weight * (1.0 + progress))
            })
            .collect()
    }
}

/// Grow a single road between two settlements. Water is never entered, and
/// the walk snaps onto `end` once it is within two tiles of it.
pub fn generate_road_path(
    start: HexCoord,
    end: HexCoord,
    grid: &TerrainGrid,
    rng: &mut Mulberry32,
) -> Result<HexPath, GrowthFailure> {
    grow_path(&RoadPolicy, start, end, grid, rng)
}

/// Closest (connected, unconnected) pair by hex distance, skipping pairs that
/// already failed. Earlier pairs win ties.
fn closest_pair(
    connected: &[HexCoord],
    unconnected: &[HexCoord],
    failed: &HashSet<(HexCoord, HexCoord)>,
) -> Option<(HexCoord, HexCoord)> {
    let mut best = None;
    let mut best_distance = i32::MAX;

    for &from in connected {
        for &to in unconnected {
            if failed.contains(&(from, to)) {
                continue;
            }
            let distance = hex_distance(from, to);
            if distance < best_distance {
                best_distance = distance;
                best = Some((from, to));
            }
        }
    }

    best
}

/// Connect settlements with a spanning backbone, then add random extra
/// roads until `settings.count` roads exist or the attempt budget runs out.
///
/// Every road is smoothed, then each is shifted sideways by a random amount
/// within `settings.offset_range` so overlapping roads separate visually.
/// Roads may share tiles with each other. Road tiles that cross a river are
/// reported as bridges.
pub fn generate_road_network(
    settlements: &[HexCoord],
    grid: &TerrainGrid,
    rng: &mut Mulberry32,
    settings: &RoadSettings,
    scale: f64,
    rivers: &RiverNetwork,
) -> RoadNetwork {
    let mut network = RoadNetwork::default();
    if settlements.len() < 2 {
        return network;
    }

    // Spanning backbone
    let mut connected = vec![settlements[0]];
    let mut unconnected: Vec<HexCoord> = settlements[1..].to_vec();
    let mut failed = HashSet::new();
    let max_attempts = settlements.len() * MST_ATTEMPTS_PER_SETTLEMENT;
    let mut attempts = 0;

    while !unconnected.is_empty() && attempts < max_attempts {
        attempts += 1;
        let Some((from, to)) = closest_pair(&connected, &unconnected, &failed) else {
            // Every remaining pair has failed once; give them all another go
            failed.clear();
            continue;
        };

        match generate_road_path(from, to, grid, rng) {
            Ok(path) => {
                network.hex_paths.push(path);
                unconnected.retain(|&s| s != to);
                connected.push(to);
            }
            Err(failure) => {
                debug!("Road {} -> {} failed: {}", from, to, failure);
                failed.insert((from, to));
            }
        }
    }

    network.unconnected = unconnected.len();
    if network.unconnected > 0 {
        warn!(
            "{} of {} settlements left off the road network after {} attempts",
            network.unconnected,
            settlements.len(),
            attempts
        );
    }

    // Extra connections
    let backbone = settlements.len() - 1;
    let wanted = (settings.count as usize).saturating_sub(backbone);
    let max_extra_attempts = settlements.len() * EXTRA_ROAD_ATTEMPTS_PER_SETTLEMENT;
    let mut extra = 0;
    let mut extra_attempts = 0;

    while extra < wanted && extra_attempts < max_extra_attempts {
        extra_attempts += 1;
        let a = settlements[rng.below(settlements.len())];
        let b = settlements[rng.below(settlements.len())];
        if a == b {
            continue;
        }

        match generate_road_path(a, b, grid, rng) {
            Ok(path) => {
                network.hex_paths.push(path);
                extra += 1;
            }
            Err(failure) => debug!("Extra road {} -> {} failed: {}", a, b, failure),
        }
    }
    if extra < wanted {
        warn!("Only {} of {} extra roads could be placed", extra, wanted);
    }

    let smoothed: Vec<PixelPolyline> = network
        .hex_paths
        .iter()
        .map(|path| {
            smooth_path(
                path,
                rng,
                settings.curvature.get(),
                settings.segments.get(),
                scale,
            )
        })
        .collect();
    network.polylines = smoothed
        .iter()
        .map(|points| offset_path(points, rng.centered() * settings.offset_range))
        .collect();

    let mut seen = HashSet::new();
    network.bridges = network
        .hex_paths
        .iter()
        .flatten()
        .copied()
        .filter(|&tile| rivers.is_occupied(tile) && seen.insert(tile))
        .collect();

    info!(
        "Built {} roads between {} settlements ({} bridges)",
        network.len(),
        settlements.len(),
        network.bridges.len()
    );
    network
}
