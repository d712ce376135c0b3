//! Weighted random walk shared by river and road generation.
//!
//! A walk starts at a source tile and repeatedly steps to an unvisited
//! neighbour chosen by weighted draw until its [`GrowthPolicy`] says it has
//! arrived. Policies decide which neighbours are allowed, how they are
//! weighted, and what counts as arriving; the walk itself owns the visited
//! set and the length budget.

use super::hex::neighbors;
use super::{HexCoord, HexPath, TerrainGrid};
use crate::rng::Mulberry32;
use glam::DVec2;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthFailure {
    #[error("No eligible neighbour to continue from")]
    DeadEnd,

    #[error("Next tile {0} is already taken")]
    Collision(HexCoord),

    #[error("Length budget used up before reaching the target")]
    BudgetExhausted,
}

/// What a policy decides when looking at the head of the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    Pending,
    /// The current tile completes the path
    Reached,
    /// Append this tile and finish
    SnapTo(HexCoord),
}

/// In-progress path plus the bookkeeping policies are allowed to inspect
#[derive(Debug, Clone)]
pub struct Walk {
    pub source: HexCoord,
    pub target: HexCoord,
    path: HexPath,
    visited: HashSet<HexCoord>,
}

impl Walk {
    fn new(source: HexCoord, target: HexCoord) -> Self {
        Self {
            source,
            target,
            path: vec![source],
            visited: HashSet::from([source]),
        }
    }

    pub fn current(&self) -> HexCoord {
        self.path[self.path.len() - 1]
    }

    /// Number of tiles on the path so far, source included
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn has_visited(&self, coord: HexCoord) -> bool {
        self.visited.contains(&coord)
    }

    /// Up to `count` most recent step vectors, oldest first
    pub fn recent_steps(&self, count: usize) -> impl Iterator<Item = DVec2> + '_ {
        let skip = self.path.len().saturating_sub(count + 1);
        self.path[skip..].windows(2).map(|step| step[0].step_to(step[1]))
    }

    fn push(&mut self, coord: HexCoord) {
        self.visited.insert(coord);
        self.path.push(coord);
    }
}

pub trait GrowthPolicy {
    /// Upper bound on path length; the walk fails once it is reached
    fn length_budget(&self) -> usize;

    fn arrive(&self, walk: &Walk, grid: &TerrainGrid) -> Arrival;

    /// Whether an unvisited neighbour may be considered at all
    fn admits(&self, walk: &Walk, grid: &TerrainGrid, candidate: HexCoord) -> bool;

    /// A candidate to jump to and finish on, bypassing the weighted draw
    fn shortcut(&self, _walk: &Walk, _grid: &TerrainGrid, _candidates: &[HexCoord]) -> Option<HexCoord> {
        None
    }

    /// Weighted candidates for the draw. May return a subset of `candidates`.
    fn weigh(&self, walk: &Walk, grid: &TerrainGrid, candidates: &[HexCoord]) -> Vec<(HexCoord, f64)>;

    /// Final veto on the drawn tile
    fn check_step(&self, _next: HexCoord) -> Result<(), GrowthFailure> {
        Ok(())
    }
}

/// Grow a path from `source` toward `target`. On failure nothing is
/// returned; partial paths never leave this function.
pub fn grow_path<P: GrowthPolicy>(
    policy: &P,
    source: HexCoord,
    target: HexCoord,
    grid: &TerrainGrid,
    rng: &mut Mulberry32,
) -> Result<HexPath, GrowthFailure> {
    let mut walk = Walk::new(source, target);

    while walk.len() < policy.length_budget() {
        match policy.arrive(&walk, grid) {
            Arrival::Reached => return Ok(walk.path),
            Arrival::SnapTo(last) => {
                walk.push(last);
                return Ok(walk.path);
            }
            Arrival::Pending => {}
        }

        let candidates: Vec<HexCoord> = neighbors(walk.current(), grid.width, grid.height)
            .into_iter()
            .filter(|&n| !walk.has_visited(n) && policy.admits(&walk, grid, n))
            .collect();

        if let Some(exit) = policy.shortcut(&walk, grid, &candidates) {
            walk.push(exit);
            return Ok(walk.path);
        }

        if candidates.is_empty() {
            return Err(GrowthFailure::DeadEnd);
        }

        let weighted = policy.weigh(&walk, grid, &candidates);
        let next = rng.pick_weighted(&weighted).ok_or(GrowthFailure::DeadEnd)?;
        policy.check_step(next)?;
        walk.push(next);
    }

    Err(GrowthFailure::BudgetExhausted)
}
